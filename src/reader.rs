use std::convert::Infallible;
use std::fs::File;
use std::io::{self, Read};

/// An object that provides bytes to the tokenizer.
///
/// See [`crate::Tokenizer::new`] for more information.
pub trait Reader {
    /// The error returned by this reader.
    ///
    /// Any error returned from a reader is fatal for the compaction run that uses it.
    type Error: std::error::Error;

    /// Return a new byte from the input stream, or `None` at the end of the input.
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error>;

    /// Read an arbitrary amount of bytes up until the next byte that is contained in `needle`.
    ///
    /// Return either:
    ///
    /// 1. A chunk of consumed bytes that does not contain any byte from `needle`. The chunk can
    ///    be arbitrarily large or small.
    /// 2. If the next byte is included in `needle`, a slice with just that byte.
    ///
    /// The default implementation reads one byte at a time and ignores the needle. Readers with an
    /// in-memory buffer should override it.
    ///
    /// # Example
    ///
    /// ```rust
    /// use compacthtml::{Reader, Readable};
    ///
    /// let mut reader = "hello world".to_reader();
    /// let mut chunks = Vec::new();
    /// let mut char_buf = [0; 4];
    /// while let Some(xs) = reader.read_until(&[b' ', b'r'], &mut char_buf).unwrap() {
    ///     chunks.push(String::from_utf8(xs.to_vec()).unwrap());
    /// }
    ///
    /// assert_eq!(chunks, &["hello", " ", "wo", "r", "ld"]);
    /// ```
    fn read_until<'b>(
        &'b mut self,
        needle: &[u8],
        char_buf: &'b mut [u8; 4],
    ) -> Result<Option<&'b [u8]>, Self::Error> {
        let _needle = needle;

        match self.read_byte()? {
            Some(x) => {
                char_buf[0] = x;
                Ok(Some(&char_buf[..1]))
            }
            None => Ok(None),
        }
    }
}

/// An object that can be converted into a [`crate::Reader`].
///
/// For example, any string can be converted into a [`StringReader`], such that
/// `Tokenizer::new("<p>hi</p>")` works.
pub trait Readable<'a> {
    /// The reader type to which this type should be converted.
    type Reader: Reader + 'a;

    /// Convert self to some sort of reader.
    fn to_reader(self) -> Self::Reader;
}

impl<'a, R: 'a + Reader> Readable<'a> for R {
    type Reader = Self;

    fn to_reader(self) -> Self::Reader {
        self
    }
}

/// Reads HTML from an in-memory buffer. It cannot fail.
#[derive(Debug)]
pub struct StringReader<'a> {
    input: &'a [u8],
}

impl<'a> StringReader<'a> {
    fn new(input: &'a [u8]) -> Self {
        StringReader { input }
    }
}

impl<'a> Reader for StringReader<'a> {
    type Error = Infallible;

    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        match self.input.split_first() {
            Some((&rv, rest)) => {
                self.input = rest;
                Ok(Some(rv))
            }
            None => Ok(None),
        }
    }

    fn read_until<'b>(
        &'b mut self,
        needle: &[u8],
        _: &'b mut [u8; 4],
    ) -> Result<Option<&'b [u8]>, Self::Error> {
        if self.input.is_empty() {
            return Ok(None);
        }

        let at = match fast_find(needle, self.input) {
            Some(0) => 1,
            Some(needle_pos) => needle_pos,
            None => self.input.len(),
        };
        let (rv, new_input) = self.input.split_at(at);
        self.input = new_input;
        Ok(Some(rv))
    }
}

impl<'a> Readable<'a> for &'a str {
    type Reader = StringReader<'a>;

    fn to_reader(self) -> Self::Reader {
        StringReader::new(self.as_bytes())
    }
}

impl<'a> Readable<'a> for &'a String {
    type Reader = StringReader<'a>;

    fn to_reader(self) -> Self::Reader {
        StringReader::new(self.as_bytes())
    }
}

impl<'a> Readable<'a> for &'a Vec<u8> {
    type Reader = StringReader<'a>;

    fn to_reader(self) -> Self::Reader {
        StringReader::new(self.as_slice())
    }
}

impl<'a> Readable<'a> for &'a [u8] {
    type Reader = StringReader<'a>;

    fn to_reader(self) -> Self::Reader {
        StringReader::new(self)
    }
}

/// An [`IoReader`] reads HTML from any type that implements `std::io::Read`, such as a file, a
/// socket, or the receiving end of a streaming compaction.
///
/// No extra I/O buffering is required: the reader keeps its own 16kb heap-allocated buffer.
///
/// ```rust
/// use compacthtml::{IoReader, Token, Tokenizer};
///
/// let tokenizer = Tokenizer::new(IoReader::new("<b>bold</b>".as_bytes()));
/// let names: Vec<_> = tokenizer
///     .filter_map(|token| match token.unwrap() {
///         Token::StartTag(tag) => Some(String::from_utf8(tag.name.0).unwrap()),
///         _ => None,
///     })
///     .collect();
///
/// assert_eq!(names, &["b"]);
/// ```
pub struct IoReader<R: Read> {
    buf: Box<[u8; BUF_SIZE]>,
    buf_offset: usize,
    buf_len: usize,
    reader: R,
}

const BUF_SIZE: usize = 16 * 1024;

impl<R: Read> IoReader<R> {
    /// Construct a new `IoReader` from any type that implements `Read`.
    pub fn new(reader: R) -> Self {
        IoReader {
            buf: Box::new([0; BUF_SIZE]),
            buf_offset: 0,
            buf_len: 0,
            reader,
        }
    }

    /// Refill the buffer once it has been drained. Returns the number of unread bytes.
    fn fill_buf(&mut self) -> Result<usize, io::Error> {
        if self.buf_offset == self.buf_len {
            self.buf_offset = 0;
            self.buf_len = loop {
                match self.reader.read(&mut self.buf[..]) {
                    Ok(n) => break n,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            };
        }
        Ok(self.buf_len - self.buf_offset)
    }
}

impl<R: Read> std::fmt::Debug for IoReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IoReader")
            .field("buffered", &(self.buf_len - self.buf_offset))
            .finish_non_exhaustive()
    }
}

impl<R: Read> Reader for IoReader<R> {
    type Error = io::Error;

    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        if self.fill_buf()? == 0 {
            return Ok(None);
        }
        let rv = self.buf[self.buf_offset];
        self.buf_offset += 1;
        Ok(Some(rv))
    }

    fn read_until<'b>(
        &'b mut self,
        needle: &[u8],
        _: &'b mut [u8; 4],
    ) -> Result<Option<&'b [u8]>, Self::Error> {
        if self.fill_buf()? == 0 {
            return Ok(None);
        }

        let buf = &self.buf[self.buf_offset..self.buf_len];
        let len = match fast_find(needle, buf) {
            Some(0) => 1,
            Some(needle_pos) => needle_pos,
            None => buf.len(),
        };
        self.buf_offset += len;
        Ok(Some(&buf[..len]))
    }
}

impl<'a> Readable<'a> for File {
    type Reader = IoReader<File>;

    fn to_reader(self) -> Self::Reader {
        IoReader::new(self)
    }
}

#[inline]
pub(crate) fn fast_find(needle: &[u8], haystack: &[u8]) -> Option<usize> {
    #[cfg(feature = "memchr")]
    match *needle {
        [a] => return memchr::memchr(a, haystack),
        [a, b] => return memchr::memchr2(a, b, haystack),
        [a, b, c] => return memchr::memchr3(a, b, c, haystack),
        _ => (),
    }

    haystack.iter().position(|b| needle.contains(b))
}

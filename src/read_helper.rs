use crate::Reader;

/// Wraps a [`Reader`] with a pushback buffer, so the state machine can look ahead and change its
/// mind.
#[derive(Debug)]
pub(crate) struct ReadHelper<R: Reader> {
    reader: R,
    to_reconsume: Vec<u8>,
}

impl<R: Reader> ReadHelper<R> {
    pub(crate) fn new(reader: R) -> Self {
        ReadHelper {
            reader,
            to_reconsume: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn read_byte(&mut self) -> Result<Option<u8>, R::Error> {
        match self.to_reconsume.pop() {
            Some(x) => Ok(Some(x)),
            None => self.reader.read_byte(),
        }
    }

    /// Put a byte back. The next read returns it again.
    #[inline]
    pub(crate) fn unread_byte(&mut self, x: u8) {
        self.to_reconsume.push(x);
    }

    /// Like [`Reader::read_until`], but serves bytes that were put back first.
    #[inline]
    pub(crate) fn read_until<'b>(
        &'b mut self,
        needle: &[u8],
        char_buf: &'b mut [u8; 4],
    ) -> Result<Option<&'b [u8]>, R::Error> {
        match self.to_reconsume.pop() {
            Some(x) => {
                char_buf[0] = x;
                Ok(Some(&char_buf[..1]))
            }
            None => self.reader.read_until(needle, char_buf),
        }
    }

    /// Consume `s` if the input continues with it, and return the bytes as they were written.
    /// Otherwise consume nothing.
    ///
    /// `case_sensitive=false` compares ignoring ASCII case.
    pub(crate) fn try_read_string(
        &mut self,
        s: &[u8],
        case_sensitive: bool,
    ) -> Result<Option<Vec<u8>>, R::Error> {
        let mut consumed = Vec::with_capacity(s.len());
        for &expected in s {
            let matches = match self.read_byte()? {
                Some(x) => {
                    consumed.push(x);
                    x == expected || (!case_sensitive && x.eq_ignore_ascii_case(&expected))
                }
                None => false,
            };

            if !matches {
                while let Some(x) = consumed.pop() {
                    self.unread_byte(x);
                }
                return Ok(None);
            }
        }

        Ok(Some(consumed))
    }
}

use std::convert::Infallible;
use std::io::{Read, Write};
use std::sync::Arc;

use crate::rewriter::{IoOutput, Output, Rewriter};
use crate::stream::{self, Completion, StreamInput};
use crate::{CompactError, IoReader, Minifier, PassThrough, Readable, Reader, Tokenizer};

const DEFAULT_PIPE_CAPACITY: usize = 16;

/// Compaction settings, and the entry point to both the synchronous and the streaming mode.
///
/// A `Compactor` holds no per-run state. Clone it freely and share it between threads; every
/// call starts from an empty element stack.
///
/// ```
/// use compacthtml::Compactor;
///
/// let compactor = Compactor::new();
/// assert_eq!(
///     compactor.compact("<ul>\n  <li><b>one</b>  <i>two</i></li>\n</ul>\n").unwrap(),
///     "<ul><li><b>one</b> <i>two</i></li></ul>"
/// );
/// ```
#[derive(Clone, Debug)]
pub struct Compactor {
    pub(crate) css_minifier: Arc<dyn Minifier>,
    pub(crate) script_minifier: Arc<dyn Minifier>,
    pub(crate) pipe_capacity: usize,
}

#[cfg(feature = "css")]
fn default_css_minifier() -> Arc<dyn Minifier> {
    Arc::new(crate::CssMinifier)
}

#[cfg(not(feature = "css"))]
fn default_css_minifier() -> Arc<dyn Minifier> {
    Arc::new(crate::PassThrough)
}

impl Default for Compactor {
    fn default() -> Self {
        Compactor {
            css_minifier: default_css_minifier(),
            script_minifier: Arc::new(PassThrough),
            pipe_capacity: DEFAULT_PIPE_CAPACITY,
        }
    }
}

impl Compactor {
    /// Create a compactor with the default hooks. `<script>` bodies are left untouched.
    /// `<style>` bodies are minified with `CssMinifier` when the `css` feature is enabled, and
    /// left untouched otherwise.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the text of every `<style>` element through `minifier`.
    #[must_use]
    pub fn css_minifier(mut self, minifier: impl Minifier + 'static) -> Self {
        self.css_minifier = Arc::new(minifier);
        self
    }

    /// Run the text of every `<script>` element through `minifier`.
    #[must_use]
    pub fn script_minifier(mut self, minifier: impl Minifier + 'static) -> Self {
        self.script_minifier = Arc::new(minifier);
        self
    }

    /// How many written chunks may be queued between the producer and the worker of a streaming
    /// run before [`StreamInput`] writes block. `0` makes every write wait for the worker.
    #[must_use]
    pub fn pipe_capacity(mut self, capacity: usize) -> Self {
        self.pipe_capacity = capacity;
        self
    }

    /// Compact a string of HTML.
    ///
    /// This can only fail if a minifier hook returns bytes that are not UTF-8.
    pub fn compact(&self, html: &str) -> Result<String, CompactError> {
        Ok(String::from_utf8(self.compact_bytes(html.as_bytes()))?)
    }

    /// Compact HTML bytes. Invalid UTF-8 in text is replaced with `U+FFFD`.
    #[must_use]
    pub fn compact_bytes(&self, html: &[u8]) -> Vec<u8> {
        match self.pump::<_, _, Infallible>(html.to_reader(), Vec::with_capacity(html.len())) {
            Ok(out) => out,
            Err(e) => match e {},
        }
    }

    /// Compact everything `input` produces into `output`, on the current thread, and return
    /// `output` once all of it is written and flushed.
    pub fn compact_to<R: Read, W: Write>(&self, input: R, output: W) -> Result<W, CompactError> {
        let output = IoOutput(output);
        let IoOutput(output) = self.pump::<_, _, CompactError>(IoReader::new(input), output)?;
        Ok(output)
    }

    /// Start a streaming run on a background thread that writes into `output`.
    ///
    /// Write HTML into the returned [`StreamInput`] while it is being produced, then drop or
    /// [`close`](StreamInput::close) it. The [`Completion`] resolves exactly once, after the last
    /// byte has been written to `output` or the run failed.
    ///
    /// ```
    /// use std::io::Write;
    ///
    /// let (done, mut input) = compacthtml::Compactor::new().stream(Vec::new());
    /// input.write_all(b"<p>\n  streamed\n").unwrap();
    /// input.write_all(b"  text </p>").unwrap();
    /// input.close();
    ///
    /// assert_eq!(done.wait().unwrap(), b"<p>streamed text </p>");
    /// ```
    pub fn stream<W: Write + Send + 'static>(&self, output: W) -> (Completion<W>, StreamInput) {
        stream::spawn(self.clone(), output)
    }

    /// Drive the tokenizer into the rewriter until the input ends or fails.
    pub(crate) fn pump<R, O, E>(&self, input: R, output: O) -> Result<O, E>
    where
        R: Reader,
        O: Output,
        E: From<R::Error> + From<O::Error>,
    {
        let mut rewriter = Rewriter::new(output, self);
        for token in Tokenizer::new(input) {
            rewriter.write_token(token?)?;
        }
        Ok(rewriter.finish()?)
    }
}

/// Compact a string of HTML with the default settings.
///
/// ```
/// assert_eq!(
///     compacthtml::compact("<div> <span>x</span>   <span>y</span> </div>").unwrap(),
///     "<div><span>x</span> <span>y</span></div>"
/// );
/// ```
pub fn compact(html: &str) -> Result<String, CompactError> {
    Compactor::new().compact(html)
}

/// Start a streaming run with the default settings. See [`Compactor::stream`].
pub fn compact_stream<W: Write + Send + 'static>(output: W) -> (Completion<W>, StreamInput) {
    Compactor::new().stream(output)
}

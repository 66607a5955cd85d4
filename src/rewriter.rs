use std::borrow::Cow;
use std::convert::Infallible;
use std::io::Write;

use crate::classify::{is_inline, is_void};
use crate::error::WriteError;
use crate::stack::ElementStack;
use crate::{Attribute, Compactor, StartTag, Token};

/// Bytes that force an attribute value into quotes, from the HTML5 unquoted attribute value
/// syntax.
const NEEDS_QUOTES: &[u8] = b" \t\r\n\x0c\"'=<>`";

/// Where a [`Rewriter`] puts its bytes.
pub(crate) trait Output {
    type Error;

    fn put(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Called once after the last token.
    fn finish(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Output for Vec<u8> {
    type Error = Infallible;

    fn put(&mut self, bytes: &[u8]) -> Result<(), Infallible> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

/// Any [`Write`] as an [`Output`].
pub(crate) struct IoOutput<W>(pub(crate) W);

impl<W: Write> Output for IoOutput<W> {
    type Error = WriteError;

    fn put(&mut self, bytes: &[u8]) -> Result<(), WriteError> {
        self.0.write_all(bytes).map_err(WriteError)
    }

    fn finish(&mut self) -> Result<(), WriteError> {
        self.0.flush().map_err(WriteError)
    }
}

/// Writes tokens back out as HTML, dropping whitespace that does not change how the document
/// renders.
///
/// Whitespace is judged per block: text is left-trimmed at the start of a block and after a
/// space, and a lone space directly inside a block-level element is held back until the next tag
/// shows whether it separates two inline elements.
pub(crate) struct Rewriter<'c, O: Output> {
    out: O,
    stack: ElementStack,
    compactor: &'c Compactor,
}

impl<'c, O: Output> Rewriter<'c, O> {
    pub(crate) fn new(out: O, compactor: &'c Compactor) -> Self {
        Rewriter {
            out,
            stack: ElementStack::default(),
            compactor,
        }
    }

    /// Finish the output and hand it back.
    pub(crate) fn finish(mut self) -> Result<O, O::Error> {
        self.out.finish()?;
        Ok(self.out)
    }

    pub(crate) fn write_token(&mut self, token: Token) -> Result<(), O::Error> {
        match token {
            Token::Text(text) => self.write_text(&text),
            Token::StartTag(tag) => self.write_start_tag(&tag),
            Token::EndTag(tag) => self.write_end_tag(&tag.name),
            Token::Comment(data) => {
                self.out.put(b"<!--")?;
                self.out.put(&data)?;
                self.out.put(b"-->")
            }
            Token::Doctype(data) => {
                self.out.put(b"<!")?;
                self.out.put(&data)?;
                self.out.put(b">")
            }
        }
    }

    fn write_text(&mut self, raw: &[u8]) -> Result<(), O::Error> {
        match self.stack.peek() {
            Some(b"script") => {
                let js = self.compactor.script_minifier.minify(raw);
                return self.out.put(&js);
            }
            Some(b"style") => {
                let css = self.compactor.css_minifier.minify(raw);
                return self.out.put(&css);
            }
            Some(b"plaintext") => return self.out.put(raw),
            _ => (),
        }

        if self.stack.is_current_literal() {
            let text = String::from_utf8_lossy(raw);
            return self
                .out
                .put(html_escape::encode_text(&text).as_bytes());
        }

        let collapsed = collapse_whitespace(raw);
        let top_is_inline = self.stack.peek().is_some_and(is_inline);
        let block = self.stack.current_block();

        let mut s = &collapsed[..];
        if block.is_empty() || block.ends_with_space() {
            s = s.strip_prefix(b" ").unwrap_or(s);
        }
        if s.is_empty() {
            return Ok(());
        }
        if s == b" " && !top_is_inline {
            block.space_delayed = true;
            return Ok(());
        }

        if block.space_delayed {
            block.space_delayed = false;
            if s[0] != b' ' {
                self.out.put(b" ")?;
            }
        }

        let text = String::from_utf8_lossy(s);
        block.add(&text);
        self.out
            .put(html_escape::encode_text(&text).as_bytes())
    }

    /// A space held back in the current block survives only if the next tag is an inline one.
    fn resolve_delayed_space(&mut self, name: &[u8]) -> Result<(), O::Error> {
        let block = self.stack.current_block();
        if block.space_delayed {
            block.space_delayed = false;
            if is_inline(name) {
                block.add(" ");
                self.out.put(b" ")?;
            }
        }
        Ok(())
    }

    fn write_start_tag(&mut self, tag: &StartTag) -> Result<(), O::Error> {
        self.resolve_delayed_space(&tag.name)?;
        self.stack.push(&tag.name);

        self.out.put(b"<")?;
        self.out.put(&tag.name)?;
        let mut last_quoted = true;
        for attr in &tag.attributes {
            last_quoted = write_attribute(&mut self.out, attr)?;
        }

        if tag.self_closing {
            if !last_quoted {
                self.out.put(b" ")?;
            }
            self.out.put(b"/>")?;
            self.stack.pop();
        } else {
            self.out.put(b">")?;
            if is_void(&tag.name) {
                self.stack.pop();
            }
        }

        Ok(())
    }

    fn write_end_tag(&mut self, name: &[u8]) -> Result<(), O::Error> {
        self.resolve_delayed_space(name)?;
        self.out.put(b"</")?;
        self.out.put(name)?;
        self.out.put(b">")?;

        if self.stack.pop_until(name) == 0 {
            log::trace!(
                target: "compacthtml::rewriter",
                "end tag </{}> has no open element, depth {}",
                String::from_utf8_lossy(name),
                self.stack.depth()
            );
        }
        Ok(())
    }
}

/// Write ` name=value`, quoting the value only if it has to be. Returns whether quotes were used.
fn write_attribute<O: Output>(out: &mut O, attr: &Attribute) -> Result<bool, O::Error> {
    out.put(b" ")?;
    out.put(&attr.name)?;
    out.put(b"=")?;

    let value = attr.value.to_string_lossy();
    let quoted = value.is_empty() || value.bytes().any(|b| NEEDS_QUOTES.contains(&b));
    if quoted {
        out.put(b"\"")?;
        out.put(html_escape::encode_double_quoted_attribute(&value).as_bytes())?;
        out.put(b"\"")?;
    } else {
        // only `&` can be left to escape here, the rest would have forced quotes
        out.put(html_escape::encode_text(&value).as_bytes())?;
    }
    Ok(quoted)
}

/// Replace every run of spaces, tabs, carriage returns and newlines with a single space.
fn collapse_whitespace(s: &[u8]) -> Cow<'_, [u8]> {
    let is_space = |b: &u8| matches!(b, b' ' | b'\t' | b'\r' | b'\n');
    let needs_work = s
        .windows(2)
        .any(|w| is_space(&w[0]) && is_space(&w[1]))
        || s.iter().any(|b| is_space(b) && *b != b' ');
    if !needs_work {
        return Cow::Borrowed(s);
    }

    let mut rv = Vec::with_capacity(s.len());
    let mut in_space = false;
    for &b in s {
        if is_space(&b) {
            if !in_space {
                rv.push(b' ');
            }
            in_space = true;
        } else {
            rv.push(b);
            in_space = false;
        }
    }
    Cow::Owned(rv)
}

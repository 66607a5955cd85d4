#![deny(missing_docs)]
// HTML passed through here is usually untrusted input from the internet.
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod classify;
mod compactor;
mod emitter;
mod entities;
mod error;
mod htmlstring;
mod machine;
mod machine_helper;
mod minify;
mod read_helper;
mod reader;
mod rewriter;
mod stack;
mod state;
mod stream;
mod token;
mod tokenizer;

pub use classify::{classify, ElementKind};
pub use compactor::{compact, compact_stream, Compactor};
pub use error::{CompactError, ParseError};
pub use htmlstring::HtmlString;
#[cfg(feature = "css")]
pub use minify::CssMinifier;
pub use minify::{Minifier, PassThrough};
pub use reader::{IoReader, Readable, Reader, StringReader};
pub use stream::{Completion, StreamInput};
pub use token::{Attribute, EndTag, StartTag, Token};
pub use tokenizer::{InfallibleTokenizer, Tokenizer};

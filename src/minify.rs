use std::borrow::Cow;
use std::fmt;

/// A hook that rewrites the body of a `<style>` or `<script>` element.
///
/// Compaction never looks inside those elements itself. It hands the text to a minifier exactly
/// once per element and writes the result as-is, without escaping. By default scripts go
/// through [`PassThrough`], and stylesheets through `CssMinifier` when the `css` feature is
/// enabled (it is by default).
///
/// Closures taking `&[u8]` and returning `Vec<u8>` are minifiers too:
///
/// ```
/// use compacthtml::Compactor;
///
/// let compactor = Compactor::new().css_minifier(|css: &[u8]| {
///     css.iter().copied().filter(|b| !b.is_ascii_whitespace()).collect::<Vec<u8>>()
/// });
///
/// assert_eq!(
///     compactor.compact("<style> a { color : red } </style>").unwrap(),
///     "<style>a{color:red}</style>"
/// );
/// ```
pub trait Minifier: Send + Sync {
    /// Return the minified form of `source`.
    fn minify<'a>(&self, source: &'a [u8]) -> Cow<'a, [u8]>;
}

impl<F> Minifier for F
where
    F: Fn(&[u8]) -> Vec<u8> + Send + Sync,
{
    fn minify<'a>(&self, source: &'a [u8]) -> Cow<'a, [u8]> {
        Cow::Owned(self(source))
    }
}

/// Writes element bodies unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThrough;

impl Minifier for PassThrough {
    fn minify<'a>(&self, source: &'a [u8]) -> Cow<'a, [u8]> {
        Cow::Borrowed(source)
    }
}

/// Minifies stylesheets with [`lightningcss`].
///
/// A stylesheet that does not parse, or is not UTF-8, is written unchanged.
///
/// ```
/// use compacthtml::{Compactor, CssMinifier};
///
/// let compactor = Compactor::new().css_minifier(CssMinifier);
/// assert_eq!(
///     compactor.compact("<style>\n  p > a  { color: red }\n</style>").unwrap(),
///     "<style>p>a{color:red}</style>"
/// );
/// ```
#[cfg(feature = "css")]
#[derive(Debug, Default, Clone, Copy)]
pub struct CssMinifier;

#[cfg(feature = "css")]
impl Minifier for CssMinifier {
    fn minify<'a>(&self, source: &'a [u8]) -> Cow<'a, [u8]> {
        let Ok(css) = std::str::from_utf8(source) else {
            return Cow::Borrowed(source);
        };

        match minify_stylesheet(css) {
            Ok(code) => Cow::Owned(code.into_bytes()),
            Err(e) => {
                log::debug!(
                    target: "compacthtml::rewriter",
                    "leaving stylesheet as is, it does not minify: {}",
                    e
                );
                Cow::Borrowed(source)
            }
        }
    }
}

#[cfg(feature = "css")]
fn minify_stylesheet(css: &str) -> Result<String, String> {
    use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};

    let mut sheet = StyleSheet::parse(css, ParserOptions::default()).map_err(|e| e.to_string())?;
    sheet
        .minify(MinifyOptions::default())
        .map_err(|e| e.to_string())?;
    let printed = sheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| e.to_string())?;
    Ok(printed.code)
}

impl fmt::Debug for dyn Minifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Minifier")
    }
}

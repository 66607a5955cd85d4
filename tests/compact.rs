use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use compacthtml::{compact, CompactError, Compactor, PassThrough};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case::empty_block("<div>  </div>", "<div></div>")]
#[case::empty_inline("<span>  </span>", "<span></span>")]
#[case::space_before_first_inline("<div> <span>x</span></div>", "<div><span>x</span></div>")]
#[case::space_after_last_inline("<div><span>x</span> </div>", "<div><span>x</span></div>")]
#[case::trailing_space_in_inline_is_kept("<div><span> x </span></div>", "<div><span>x </span></div>")]
#[case::spaces_on_both_sides(
    "<div> <span> x </span> </div>",
    "<div><span>x </span></div>"
)]
#[case::space_between_padded_inlines(
    "<div><span> x </span> <span> y </span></div>",
    "<div><span>x </span><span>y </span></div>"
)]
#[case::trailing_document_space(
    "<div> <span> x </span> <span> y </span></div> ",
    "<div><span>x </span><span>y </span></div>"
)]
#[case::one_space_between_inlines(
    "<div><span>x</span>  <span>y</span></div>",
    "<div><span>x</span> <span>y</span></div>"
)]
#[case::inline_surrounded_by_space("<div> <span>x</span> </div>", "<div><span>x</span></div>")]
#[case::pre_is_literal("<pre> \n\t  </pre>", "<pre> \n\t  </pre>")]
#[case::literal_is_inherited("<pre><div> \n\t  </div></pre>", "<pre><div> \n\t  </div></pre>")]
#[case::unquoted_attribute(r#"<div class="test"></div>"#, "<div class=test></div>")]
#[case::quoted_attribute(r#"<div class="a=b"></div>"#, r#"<div class="a=b"></div>"#)]
#[case::no_double_escaping(
    "<div>&lt;i&gt;hi&lt;/i&gt;</div>",
    "<div>&lt;i&gt;hi&lt;/i&gt;</div>"
)]
#[case::legacy_reference("<p>&copy 2024</p>", "<p>\u{a9} 2024</p>")]
#[case::references_without_semicolon("<p>1 &lt 2 &amp 3</p>", "<p>1 &lt; 2 &amp; 3</p>")]
#[case::numeric_without_semicolon("<p>&#65 &#x41</p>", "<p>A A</p>")]
#[case::invalid_numeric("<p>&#0; &#xD800; &#x110000;</p>", "<p>\u{fffd} \u{fffd} \u{fffd}</p>")]
#[case::reference_in_url(
    r#"<a href="/?a=1&copy=2">x</a>"#,
    r#"<a href="/?a=1&amp;copy=2">x</a>"#
)]
fn compacts(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(compact(input).unwrap(), expected);
}

#[rstest]
#[case::between_blocks("<div>a</div> <div>b</div>", "<div>a</div><div>b</div>")]
#[case::before_block("<div><b>a</b> <p>b</p></div>", "<div><b>a</b><p>b</p></div>")]
#[case::words("<p>one \n two\t\tthree</p>", "<p>one two three</p>")]
#[case::newlines_between_items(
    "<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>",
    "<ul><li>a</li><li>b</li></ul>"
)]
#[case::text_after_inline("<p><b>a</b> b</p>", "<p><b>a</b> b</p>")]
#[case::form_feed_is_not_collapsed("<p>a\x0cb</p>", "<p>a\x0cb</p>")]
fn collapses_whitespace(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(compact(input).unwrap(), expected);
}

#[rstest]
#[case::br("<p>a<br>b</p>", "<p>a<br>b</p>")]
#[case::br_between_spaces("<p>a <br> b</p>", "<p>a <br>b</p>")]
#[case::img_before_space("<p>see<img src=x.png> here</p>", "<p>see<img src=x.png> here</p>")]
#[case::hr_between_text("<div>a <hr> b</div>", "<div>a <hr>b</div>")]
#[case::meta_in_head(
    "<head>\n  <meta charset=utf-8>\n  <title>x</title>\n</head>",
    "<head><meta charset=utf-8><title>x</title></head>"
)]
fn void_elements(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(compact(input).unwrap(), expected);
}

#[rstest]
#[case::unquoted_then_slash(r#"<img src="a.png"/>"#, "<img src=a.png />")]
#[case::quoted_then_slash(r#"<img alt="a b"/>"#, r#"<img alt="a b"/>"#)]
#[case::no_attributes("<br/>", "<br/>")]
#[case::empty_value(r#"<input disabled="">"#, r#"<input disabled="">"#)]
#[case::ampersand_in_unquoted(r#"<a href="?a=1&amp;b=2">x</a>"#, r#"<a href="?a=1&amp;b=2">x</a>"#)]
#[case::ampersand_without_equals(r#"<a title="x&amp;y">x</a>"#, "<a title=x&amp;y>x</a>")]
#[case::single_quote(r#"<p title="it's">x</p>"#, r#"<p title="it's">x</p>"#)]
#[case::double_quote(r#"<p title='say "hi"'>x</p>"#, r#"<p title="say &quot;hi&quot;">x</p>"#)]
#[case::attribute_order(
    r#"<p id="a" class="b" data-c="c">x</p>"#,
    "<p id=a class=b data-c=c>x</p>"
)]
fn attributes(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(compact(input).unwrap(), expected);
}

#[test]
fn comments_and_doctype_pass_through() {
    assert_eq!(
        compact("<!DOCTYPE html>\n<!-- a  comment -->\n<p>x</p>").unwrap(),
        "<!DOCTYPE html><!-- a  comment --><p>x</p>"
    );
}

#[test]
fn textarea_is_literal_and_escaped() {
    assert_eq!(
        compact("<textarea>  a &lt; b\n  </textarea>").unwrap(),
        "<textarea>  a &lt; b\n  </textarea>"
    );
}

#[test]
fn script_is_written_verbatim() {
    let js = "<script>\n  if (a < b && c) {\n    go();\n  }\n</script>";
    assert_eq!(compact(js).unwrap(), js);
}

#[test]
fn escaped_script_keeps_inner_end_tag() {
    let html = "<script><!-- document.write('<script></script>'); --></script>\n<p> x </p>";
    assert_eq!(
        compact(html).unwrap(),
        "<script><!-- document.write('<script></script>'); --></script><p>x </p>"
    );
}

#[test]
fn plaintext_is_verbatim_and_stable() {
    let once = compact("<p>a</p> <plaintext>a &amp; b\n  <i>c</i>").unwrap();
    assert_eq!(once, "<p>a</p><plaintext>a &amp; b\n  <i>c</i>");
    assert_eq!(compact(&once).unwrap(), once);
}

#[test]
fn comment_closed_with_bang() {
    assert_eq!(
        compact("<p>a</p><!-- x --!><p>b</p>").unwrap(),
        "<p>a</p><!-- x --><p>b</p>"
    );
}

#[test]
fn style_goes_through_the_css_hook_once_per_element() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let compactor = Compactor::new().css_minifier(move |css: &[u8]| {
        counter.fetch_add(1, Ordering::SeqCst);
        css.iter()
            .copied()
            .filter(|b| !b.is_ascii_whitespace())
            .collect::<Vec<u8>>()
    });

    let out = compactor
        .compact("<style>\n  a  { color: red }\n</style>\n<p> x </p>\n<style> b {} </style>")
        .unwrap();
    assert_eq!(out, "<style>a{color:red}</style><p>x </p><style>b{}</style>");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn style_is_not_collapsed_without_a_hook() {
    let html = "<style>\n  a  { color: red }\n</style>";
    let compactor = Compactor::new().css_minifier(PassThrough);
    assert_eq!(compactor.compact(html).unwrap(), html);
}

#[cfg(feature = "css")]
#[test]
fn style_is_minified_by_default() {
    assert_eq!(
        compact("<style>\n  p > a  { color: red }\n</style>\n<p> x </p>").unwrap(),
        "<style>p>a{color:red}</style><p>x </p>"
    );
}

#[cfg(feature = "css")]
#[test]
fn style_that_is_not_utf8_is_kept() {
    assert_eq!(
        Compactor::new().compact_bytes(b"<style>a{content:'\xff'}</style>"),
        b"<style>a{content:'\xff'}</style>"
    );
}

#[test]
fn script_hook_is_used() {
    let compactor = Compactor::new().script_minifier(|js: &[u8]| js.trim_ascii().to_vec());
    assert_eq!(
        compactor.compact("<script>\n  go();\n</script>").unwrap(),
        "<script>go();</script>"
    );
}

#[test]
fn non_utf8_hook_output_is_an_error() {
    let compactor = Compactor::new().css_minifier(|_: &[u8]| vec![0xffu8, 0xfe]);
    assert!(matches!(
        compactor.compact("<style>a{}</style>"),
        Err(CompactError::InvalidUtf8(_))
    ));
    assert_eq!(
        compactor.compact_bytes(b"<style>a{}</style>"),
        b"<style>\xff\xfe</style>"
    );
}

#[test]
fn unmatched_end_tag_is_written() {
    assert_eq!(compact("<div>a</span> b</div>").unwrap(), "<div>a</span> b</div>");
}

#[test]
fn end_tag_closes_implicitly_closed_elements() {
    assert_eq!(
        compact("<ul><li>a <li>b</ul> <p> c </p>").unwrap(),
        "<ul><li>a <li>b</ul><p>c </p>"
    );
}

#[test]
fn compact_to_writes_into_any_writer() {
    let out = Compactor::new()
        .compact_to("<p>\n  a\n</p>".as_bytes(), Vec::new())
        .unwrap();
    assert_eq!(out, b"<p>a </p>");
}

#[test]
fn compact_bytes_replaces_invalid_utf8() {
    assert_eq!(
        Compactor::new().compact_bytes(b"<p> a\xff  b </p>"),
        "<p>a\u{fffd} b </p>".as_bytes()
    );
}

#[test]
fn write_failures_are_write_errors() {
    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    assert!(matches!(
        Compactor::new().compact_to("<p>x</p>".as_bytes(), Broken),
        Err(CompactError::Write(e)) if e.kind() == io::ErrorKind::BrokenPipe
    ));
}

#[test]
fn compactor_is_reusable_and_shareable() {
    fn assert_send_sync<T: Send + Sync + Clone>(_: &T) {}

    let compactor = Compactor::new();
    assert_send_sync(&compactor);
    assert_eq!(compactor.compact("<p> a </p>").unwrap(), "<p>a </p>");
    assert_eq!(compactor.compact("<p> a </p>").unwrap(), "<p>a </p>");
}

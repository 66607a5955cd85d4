use std::io::Write;

use compacthtml::{compact, compact_stream};
use proptest::prelude::*;

/// Well-formed markup out of block and inline elements, words and whitespace runs. No literal
/// elements, attributes or entities.
fn markup() -> impl Strategy<Value = String> {
    let leaf = prop_oneof!["[a-z]{1,4}( [a-z]{1,4})?", "[ \t\r\n]{1,3}"];
    leaf.prop_recursive(4, 48, 4, |inner| {
        (
            prop::sample::select(vec![
                "div", "p", "ul", "li", "h1", "span", "b", "i", "em", "a",
            ]),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(name, children)| format!("<{name}>{}</{name}>", children.concat()))
    })
}

fn without_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_ascii_whitespace()).collect()
}

proptest! {
    #[test]
    fn compaction_is_idempotent(html in markup()) {
        let once = compact(&html).unwrap();
        let twice = compact(&once).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn whitespace_runs_are_collapsed(html in markup()) {
        let out = compact(&html).unwrap();
        prop_assert!(!out.contains("  "), "double space in {:?}", out);
        prop_assert!(!out.contains(['\t', '\r', '\n']), "unexpected whitespace in {:?}", out);
    }

    #[test]
    fn only_whitespace_is_removed(html in markup()) {
        let out = compact(&html).unwrap();
        prop_assert_eq!(without_whitespace(&out), without_whitespace(&html));
        prop_assert!(out.len() <= html.len());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn streaming_agrees_with_synchronous(html in markup(), chunk_size in 1usize..16) {
        let (done, mut input) = compact_stream(Vec::new());
        for chunk in html.as_bytes().chunks(chunk_size) {
            input.write_all(chunk).unwrap();
        }
        input.close();

        let streamed = String::from_utf8(done.wait().unwrap()).unwrap();
        prop_assert_eq!(streamed, compact(&html).unwrap());
    }
}

//! Fixed element classification.
//!
//! Compaction pretends to know how every element is displayed. The tables below hold for default
//! browser styles only; markup whose `display` is changed by CSS or scripts may lose meaningful
//! whitespace.

/// How whitespace around and inside an element is treated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ElementKind {
    /// Contents are kept exactly as written: `pre`, `textarea`, `script` and `template`.
    Literal,
    /// Whitespace around the element may separate words and is collapsed, not dropped.
    Inline,
    /// Whitespace directly inside or around the element is insignificant.
    Block,
}

// from https://developer.mozilla.org/en-US/docs/HTML/Inline_elements, with script and textarea
// removed
const INLINE: &[&[u8]] = &[
    b"b", b"big", b"i", b"small", b"tt", b"abbr", b"acronym", b"cite", b"code", b"dfn", b"em",
    b"kbd", b"strong", b"samp", b"var", b"a", b"bdo", b"br", b"img", b"map", b"object", b"q",
    b"span", b"sub", b"sup", b"button", b"input", b"label", b"select",
];

const LITERAL: &[&[u8]] = &[b"pre", b"textarea", b"script", b"template"];

// https://html.spec.whatwg.org/#void-elements
const VOID: &[&[u8]] = &[
    b"area", b"base", b"br", b"col", b"embed", b"hr", b"img", b"input", b"link", b"meta",
    b"param", b"source", b"track", b"wbr",
];

/// Classify an element by its (lowercase) name.
///
/// ```
/// use compacthtml::{classify, ElementKind};
///
/// assert_eq!(classify(b"pre"), ElementKind::Literal);
/// assert_eq!(classify(b"em"), ElementKind::Inline);
/// assert_eq!(classify(b"article"), ElementKind::Block);
/// ```
#[must_use]
pub fn classify(name: &[u8]) -> ElementKind {
    if LITERAL.contains(&name) {
        ElementKind::Literal
    } else if is_inline(name) {
        ElementKind::Inline
    } else {
        ElementKind::Block
    }
}

#[inline]
pub(crate) fn is_inline(name: &[u8]) -> bool {
    INLINE.contains(&name)
}

/// Elements that never have contents or an end tag.
#[inline]
pub(crate) fn is_void(name: &[u8]) -> bool {
    VOID.contains(&name)
}

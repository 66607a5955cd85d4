use crate::HtmlString;

/// A single attribute of a start tag, such as `class="x"`.
///
/// The value is stored with character references already decoded.
#[derive(Debug, Default, Eq, PartialEq, Clone)]
pub struct Attribute {
    /// The attribute's name, ASCII-lowercased.
    pub name: HtmlString,
    /// The attribute's value. Empty for attributes written without a value.
    pub value: HtmlString,
}

/// A HTML start tag, such as `<p>` or `<a href=x>`.
#[derive(Debug, Default, Eq, PartialEq, Clone)]
pub struct StartTag {
    /// Whether this tag was written as `<name/>`. No [`EndTag`] follows a self-closing tag.
    pub self_closing: bool,

    /// The start tag's name, such as `"p"` or `"a"`, ASCII-lowercased.
    pub name: HtmlString,

    /// The attributes in source order.
    ///
    /// Duplicate attributes are ignored after the first one, the same way browsers do.
    pub attributes: Vec<Attribute>,
}

/// A HTML end/close tag, such as `</p>` or `</a>`.
#[derive(Debug, Default, Eq, PartialEq, Clone)]
pub struct EndTag {
    /// The ending tag's name, such as `"p"` or `"a"`.
    pub name: HtmlString,
}

/// The tokens the [`crate::Tokenizer`] produces.
///
/// The end of the input is the end of the iterator, and read failures are `Err` items, so neither
/// is a variant here.
#[derive(Debug, Eq, PartialEq, Clone)]
pub enum Token {
    /// A HTML start tag, including self-closing ones.
    StartTag(StartTag),
    /// A HTML end tag.
    EndTag(EndTag),
    /// Character data between tags.
    ///
    /// Character references are decoded, except inside `<script>`, `<style>` and `<plaintext>`
    /// where the text is passed on exactly as written.
    Text(HtmlString),
    /// The contents of a comment, without `<!--` and `-->`.
    Comment(HtmlString),
    /// Everything between `<!` and `>` of a doctype declaration, such as `DOCTYPE html`.
    Doctype(HtmlString),
}

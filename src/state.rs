/// The tokenizer's states.
///
/// This is a subset of the [WHATWG tokenizer states](https://html.spec.whatwg.org/#tokenization),
/// just enough to cut HTML into the tokens compaction needs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum State {
    Data,
    RcData,
    RawText,
    ScriptData,
    PlainText,
    /// Saw `<` inside one of the text-only elements. Carries the state to return to.
    TextLessThanSign(TextState),
    /// Inside `<!--` in script data. Only a `</script>` ends the element here.
    ScriptDataEscaped,
    ScriptDataEscapedDashDash,
    /// Inside `<!--<script>` in script data. Not even `</script>` ends the element here.
    ScriptDataDoubleEscaped,
    ScriptDataDoubleEscapedDashDash,
    TagOpen,
    EndTagOpen,
    TagName,
    BeforeAttributeName,
    AttributeName,
    AfterAttributeName,
    BeforeAttributeValue,
    AttributeValueDoubleQuoted,
    AttributeValueSingleQuoted,
    AttributeValueUnquoted,
    AfterAttributeValueQuoted,
    SelfClosingStartTag,
    MarkupDeclarationOpen,
    CommentStart,
    Comment,
    BogusComment,
    Doctype,
    CharacterReference,
    NamedCharacterReference,
    AmbiguousAmpersand,
    NumericCharacterReference,
    HexadecimalCharacterReferenceStart,
    HexadecimalCharacterReference,
    DecimalCharacterReference,
    NumericCharacterReferenceEnd,
}

impl State {
    /// Whether a character reference started in this state belongs to an attribute value.
    pub(crate) fn is_attribute_value(self) -> bool {
        matches!(
            self,
            State::AttributeValueDoubleQuoted
                | State::AttributeValueSingleQuoted
                | State::AttributeValueUnquoted
        )
    }
}

/// States that consume the contents of an element as text until its end tag shows up.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum TextState {
    RcData,
    RawText,
    ScriptData,
    ScriptDataEscaped,
}

impl TextState {
    pub(crate) fn state(self) -> State {
        match self {
            TextState::RcData => State::RcData,
            TextState::RawText => State::RawText,
            TextState::ScriptData => State::ScriptData,
            TextState::ScriptDataEscaped => State::ScriptDataEscaped,
        }
    }
}

/// Pick the state that follows a start tag, based on the tag name alone.
///
/// A real tree builder decides this with knowledge of the document. Looking only at the name is
/// not standards-compliant, but is what compaction needs to keep script and style bodies intact.
pub(crate) fn naive_next_state(tag_name: &[u8]) -> Option<State> {
    match tag_name {
        b"textarea" | b"title" => Some(State::RcData),
        b"plaintext" => Some(State::PlainText),
        b"script" => Some(State::ScriptData),
        b"style" => Some(State::RawText),
        _ => None,
    }
}

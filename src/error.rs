use std::io;

macro_rules! impl_error {
    ($(
        $string:literal <=> $variant:ident,
    )*) => {
        /// Recoverable [parse errors](https://html.spec.whatwg.org/#parse-errors) the tokenizer
        /// can run into.
        ///
        /// None of these abort compaction. The tokenizer recovers the way a browser would and
        /// reports the error through the `log` facade.
        #[derive(Debug, Eq, PartialEq, Clone, Copy)]
        pub enum ParseError {
            $(
                #[doc = concat!("The `", $string, "` error code of the HTML standard.")]
                $variant
            ),*
        }

        impl std::str::FromStr for ParseError {
            type Err = ();

            /// Parse a `kebab-case` error code as written in the HTML standard into an enum
            /// variant.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $string => Ok(Self::$variant), )*
                    _ => Err(())
                }
            }
        }

        impl ParseError {
            /// Convert an enum variant back into the `kebab-case` error code.
            #[must_use]
            pub fn as_str(&self) -> &'static str {
                match *self {
                    $( Self::$variant => $string, )*
                }
            }
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.as_str().fmt(f)
    }
}

impl_error! {
    "abrupt-closing-of-empty-comment" <=> AbruptClosingOfEmptyComment,
    "absence-of-digits-in-numeric-character-reference" <=> AbsenceOfDigitsInNumericCharacterReference,
    "cdata-in-html-content" <=> CdataInHtmlContent,
    "character-reference-outside-unicode-range" <=> CharacterReferenceOutsideUnicodeRange,
    "control-character-reference" <=> ControlCharacterReference,
    "duplicate-attribute" <=> DuplicateAttribute,
    "end-tag-with-attributes" <=> EndTagWithAttributes,
    "end-tag-with-trailing-solidus" <=> EndTagWithTrailingSolidus,
    "eof-before-tag-name" <=> EofBeforeTagName,
    "eof-in-comment" <=> EofInComment,
    "eof-in-doctype" <=> EofInDoctype,
    "eof-in-script-html-comment-like-text" <=> EofInScriptHtmlCommentLikeText,
    "eof-in-tag" <=> EofInTag,
    "incorrectly-closed-comment" <=> IncorrectlyClosedComment,
    "incorrectly-opened-comment" <=> IncorrectlyOpenedComment,
    "invalid-first-character-of-tag-name" <=> InvalidFirstCharacterOfTagName,
    "missing-attribute-value" <=> MissingAttributeValue,
    "missing-end-tag-name" <=> MissingEndTagName,
    "missing-semicolon-after-character-reference" <=> MissingSemicolonAfterCharacterReference,
    "missing-whitespace-between-attributes" <=> MissingWhitespaceBetweenAttributes,
    "noncharacter-character-reference" <=> NoncharacterCharacterReference,
    "null-character-reference" <=> NullCharacterReference,
    "surrogate-character-reference" <=> SurrogateCharacterReference,
    "unexpected-character-in-attribute-name" <=> UnexpectedCharacterInAttributeName,
    "unexpected-character-in-unquoted-attribute-value" <=> UnexpectedCharacterInUnquotedAttributeValue,
    "unexpected-equals-sign-before-attribute-name" <=> UnexpectedEqualsSignBeforeAttributeName,
    "unexpected-question-mark-instead-of-tag-name" <=> UnexpectedQuestionMarkInsteadOfTagName,
    "unexpected-solidus-in-tag" <=> UnexpectedSolidusInTag,
    "unknown-named-character-reference" <=> UnknownNamedCharacterReference,
}

/// Everything that can make a compaction run fail.
///
/// Malformed HTML is never one of them, see [`ParseError`]. A failure affects only the run that
/// produced it: output written before the failure stays written, nothing is written after.
#[derive(Debug, thiserror::Error)]
pub enum CompactError {
    /// The input could not be read. In streaming mode this is also what the worker reports when
    /// the producer calls [`crate::StreamInput::abort`].
    #[error("failed to read html input: {0}")]
    Read(#[from] io::Error),

    /// The output destination rejected a write.
    #[error("failed to write compacted html: {0}")]
    Write(#[source] io::Error),

    /// A minifier hook produced bytes that are not UTF-8, so the result cannot be returned as a
    /// `String`.
    #[error("compacted html is not valid utf-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// The caller stopped waiting for a streaming run and the worker was told to stop.
    #[error("streaming compaction was cancelled")]
    Cancelled,

    /// The streaming worker stopped without a result, because it panicked or could not be
    /// started.
    #[error("streaming compaction worker stopped without a result")]
    WorkerLost,
}

/// A failed write to the output of a run, kept apart from read failures until it becomes a
/// [`CompactError::Write`].
#[derive(Debug)]
pub(crate) struct WriteError(pub(crate) io::Error);

impl From<WriteError> for CompactError {
    fn from(e: WriteError) -> Self {
        CompactError::Write(e.0)
    }
}

impl From<std::convert::Infallible> for CompactError {
    fn from(e: std::convert::Infallible) -> Self {
        match e {}
    }
}

#[cfg(test)]
mod tests {
    use super::ParseError;

    #[test]
    fn error_codes_round_trip_through_from_str() {
        let err: ParseError = "eof-in-tag".parse().unwrap();
        assert_eq!(err, ParseError::EofInTag);
        assert_eq!(err.to_string(), "eof-in-tag");
        assert!("not-an-error".parse::<ParseError>().is_err());
    }
}

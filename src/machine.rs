use crate::entities::try_read_character_reference;
use crate::machine_helper::push_digit;
use crate::state::{State, TextState};
use crate::{ParseError, Reader, Tokenizer};

pub(crate) enum ControlToken {
    Eof,
    Continue,
}

const WHITESPACE: &[u8] = b"\t\n\x0c\r ";

#[inline]
fn is_whitespace(x: u8) -> bool {
    WHITESPACE.contains(&x)
}

/// Bytes that end a tag name.
#[inline]
fn is_tag_name_end(x: u8) -> bool {
    is_whitespace(x) || x == b'/' || x == b'>'
}

// Note: This is not implemented as a method on Tokenizer because the macros below need to borrow
// individual fields of the tokenizer.
pub(crate) fn consume<R: Reader>(slf: &mut Tokenizer<R>) -> Result<ControlToken, R::Error> {
    macro_rules! cont {
        () => {{
            return Ok(ControlToken::Continue);
        }};
    }

    macro_rules! eof {
        () => {{
            return Ok(ControlToken::Eof);
        }};
    }

    macro_rules! switch_to {
        ($state:expr) => {{
            slf.state = $state;
            cont!()
        }};
    }

    macro_rules! reconsume_in {
        ($c:expr, $state:expr) => {{
            slf.reader.unread_byte($c);
            switch_to!($state)
        }};
    }

    macro_rules! enter_state {
        ($state:expr) => {{
            slf.machine_helper.enter_state(slf.state);
            switch_to!($state)
        }};
    }

    macro_rules! reconsume_in_return_state {
        ($c:expr) => {{
            if let Some(c) = $c {
                slf.reader.unread_byte(c);
            }
            switch_to!(slf.machine_helper.pop_return_state())
        }};
    }

    macro_rules! flush_character_reference {
        () => {
            slf.machine_helper
                .flush_code_points_consumed_as_character_reference(&mut slf.emitter)
        };
    }

    macro_rules! error {
        ($e:expr) => {
            slf.emitter.emit_error($e)
        };
    }

    macro_rules! emit_current_tag {
        () => {{
            let next_state = slf.emitter.emit_current_tag();
            switch_to!(next_state)
        }};
    }

    macro_rules! eof_in_tag {
        () => {{
            error!(ParseError::EofInTag);
            slf.emitter.discard_current_tag();
            eof!()
        }};
    }

    let mut char_buf = [0; 4];

    match slf.state {
        State::Data => match slf.reader.read_until(b"<&", &mut char_buf)? {
            Some(b"<") => switch_to!(State::TagOpen),
            Some(b"&") => enter_state!(State::CharacterReference),
            Some(xs) => {
                slf.emitter.emit_string(xs);
                cont!()
            }
            None => eof!(),
        },

        State::RcData | State::RawText | State::ScriptData => {
            let (text_state, needle) = match slf.state {
                State::RcData => (TextState::RcData, &b"<&"[..]),
                State::RawText => (TextState::RawText, &b"<"[..]),
                _ => (TextState::ScriptData, &b"<"[..]),
            };
            match slf.reader.read_until(needle, &mut char_buf)? {
                Some(b"<") => switch_to!(State::TextLessThanSign(text_state)),
                Some(b"&") => enter_state!(State::CharacterReference),
                Some(xs) => {
                    slf.emitter.emit_string(xs);
                    cont!()
                }
                None => eof!(),
            }
        }

        State::PlainText => match slf.reader.read_until(&[], &mut char_buf)? {
            Some(xs) => {
                slf.emitter.emit_string(xs);
                cont!()
            }
            None => eof!(),
        },

        State::TextLessThanSign(text_state) => {
            let mut end_tag = b"/".to_vec();
            end_tag.extend_from_slice(slf.emitter.last_start_tag());

            if let Some(written) = slf.reader.try_read_string(&end_tag, false)? {
                match slf.reader.read_byte()? {
                    Some(c) if is_tag_name_end(c) => {
                        slf.emitter.init_end_tag();
                        slf.emitter.push_tag_name(&written[1..]);
                        reconsume_in!(c, State::BeforeAttributeName)
                    }
                    c => {
                        if let Some(c) = c {
                            slf.reader.unread_byte(c);
                        }
                        slf.emitter.emit_string(b"<");
                        slf.emitter.emit_string(&written);
                        switch_to!(text_state.state())
                    }
                }
            }

            slf.emitter.emit_string(b"<");
            match text_state {
                TextState::ScriptData => {
                    if slf.reader.try_read_string(b"!--", true)?.is_some() {
                        slf.emitter.emit_string(b"!--");
                        switch_to!(State::ScriptDataEscapedDashDash)
                    }
                }
                TextState::ScriptDataEscaped => {
                    if let Some(name) = slf.reader.try_read_string(b"script", false)? {
                        slf.emitter.emit_string(&name);
                        match slf.reader.read_byte()? {
                            Some(c) if is_tag_name_end(c) => {
                                slf.emitter.emit_string(&[c]);
                                switch_to!(State::ScriptDataDoubleEscaped)
                            }
                            Some(c) => slf.reader.unread_byte(c),
                            None => (),
                        }
                    }
                }
                TextState::RcData | TextState::RawText => (),
            }
            switch_to!(text_state.state())
        }

        State::ScriptDataEscaped => match slf.reader.read_until(b"-<", &mut char_buf)? {
            Some(b"-") => {
                slf.emitter.emit_string(b"-");
                if slf.reader.try_read_string(b"-", true)?.is_some() {
                    slf.emitter.emit_string(b"-");
                    switch_to!(State::ScriptDataEscapedDashDash)
                }
                cont!()
            }
            Some(b"<") => switch_to!(State::TextLessThanSign(TextState::ScriptDataEscaped)),
            Some(xs) => {
                slf.emitter.emit_string(xs);
                cont!()
            }
            None => {
                error!(ParseError::EofInScriptHtmlCommentLikeText);
                eof!()
            }
        },

        State::ScriptDataEscapedDashDash => match slf.reader.read_byte()? {
            Some(b'-') => {
                slf.emitter.emit_string(b"-");
                cont!()
            }
            Some(b'>') => {
                slf.emitter.emit_string(b">");
                switch_to!(State::ScriptData)
            }
            Some(c) => reconsume_in!(c, State::ScriptDataEscaped),
            None => {
                error!(ParseError::EofInScriptHtmlCommentLikeText);
                eof!()
            }
        },

        State::ScriptDataDoubleEscaped => match slf.reader.read_until(b"-<", &mut char_buf)? {
            Some(b"-") => {
                slf.emitter.emit_string(b"-");
                if slf.reader.try_read_string(b"-", true)?.is_some() {
                    slf.emitter.emit_string(b"-");
                    switch_to!(State::ScriptDataDoubleEscapedDashDash)
                }
                cont!()
            }
            Some(b"<") => {
                slf.emitter.emit_string(b"<");
                if let Some(end_tag) = slf.reader.try_read_string(b"/script", false)? {
                    slf.emitter.emit_string(&end_tag);
                    match slf.reader.read_byte()? {
                        Some(c) if is_tag_name_end(c) => {
                            slf.emitter.emit_string(&[c]);
                            switch_to!(State::ScriptDataEscaped)
                        }
                        Some(c) => slf.reader.unread_byte(c),
                        None => (),
                    }
                }
                cont!()
            }
            Some(xs) => {
                slf.emitter.emit_string(xs);
                cont!()
            }
            None => {
                error!(ParseError::EofInScriptHtmlCommentLikeText);
                eof!()
            }
        },

        State::ScriptDataDoubleEscapedDashDash => match slf.reader.read_byte()? {
            Some(b'-') => {
                slf.emitter.emit_string(b"-");
                cont!()
            }
            Some(b'>') => {
                slf.emitter.emit_string(b">");
                switch_to!(State::ScriptData)
            }
            Some(c) => reconsume_in!(c, State::ScriptDataDoubleEscaped),
            None => {
                error!(ParseError::EofInScriptHtmlCommentLikeText);
                eof!()
            }
        },

        State::TagOpen => match slf.reader.read_byte()? {
            Some(b'!') => switch_to!(State::MarkupDeclarationOpen),
            Some(b'/') => switch_to!(State::EndTagOpen),
            Some(c) if c.is_ascii_alphabetic() => {
                slf.emitter.init_start_tag();
                reconsume_in!(c, State::TagName)
            }
            Some(c @ b'?') => {
                error!(ParseError::UnexpectedQuestionMarkInsteadOfTagName);
                slf.emitter.init_comment();
                reconsume_in!(c, State::BogusComment)
            }
            Some(c) => {
                error!(ParseError::InvalidFirstCharacterOfTagName);
                slf.emitter.emit_string(b"<");
                reconsume_in!(c, State::Data)
            }
            None => {
                error!(ParseError::EofBeforeTagName);
                slf.emitter.emit_string(b"<");
                eof!()
            }
        },

        State::EndTagOpen => match slf.reader.read_byte()? {
            Some(c) if c.is_ascii_alphabetic() => {
                slf.emitter.init_end_tag();
                reconsume_in!(c, State::TagName)
            }
            Some(b'>') => {
                error!(ParseError::MissingEndTagName);
                switch_to!(State::Data)
            }
            Some(c) => {
                error!(ParseError::InvalidFirstCharacterOfTagName);
                slf.emitter.init_comment();
                reconsume_in!(c, State::BogusComment)
            }
            None => {
                error!(ParseError::EofBeforeTagName);
                slf.emitter.emit_string(b"</");
                eof!()
            }
        },

        State::TagName => match slf.reader.read_until(b"\t\n\x0c\r />", &mut char_buf)? {
            Some(&[c]) if is_whitespace(c) => switch_to!(State::BeforeAttributeName),
            Some(b"/") => switch_to!(State::SelfClosingStartTag),
            Some(b">") => emit_current_tag!(),
            Some(xs) => {
                slf.emitter.push_tag_name(xs);
                cont!()
            }
            None => eof_in_tag!(),
        },

        State::BeforeAttributeName => match slf.reader.read_byte()? {
            Some(c) if is_whitespace(c) => cont!(),
            Some(c @ (b'/' | b'>')) => reconsume_in!(c, State::AfterAttributeName),
            Some(b'=') => {
                error!(ParseError::UnexpectedEqualsSignBeforeAttributeName);
                slf.emitter.init_attribute();
                slf.emitter.push_attribute_name(b"=");
                switch_to!(State::AttributeName)
            }
            Some(c) => {
                slf.emitter.init_attribute();
                reconsume_in!(c, State::AttributeName)
            }
            None => eof_in_tag!(),
        },

        State::AttributeName => match slf.reader.read_until(b"\t\n\x0c\r />=", &mut char_buf)? {
            Some(&[c]) if is_whitespace(c) || c == b'/' || c == b'>' => {
                reconsume_in!(c, State::AfterAttributeName)
            }
            Some(b"=") => switch_to!(State::BeforeAttributeValue),
            Some(xs) => {
                if xs.iter().any(|x| matches!(x, b'"' | b'\'' | b'<')) {
                    error!(ParseError::UnexpectedCharacterInAttributeName);
                }
                slf.emitter.push_attribute_name(xs);
                cont!()
            }
            None => eof_in_tag!(),
        },

        State::AfterAttributeName => match slf.reader.read_byte()? {
            Some(c) if is_whitespace(c) => cont!(),
            Some(b'/') => switch_to!(State::SelfClosingStartTag),
            Some(b'=') => switch_to!(State::BeforeAttributeValue),
            Some(b'>') => emit_current_tag!(),
            Some(c) => {
                slf.emitter.init_attribute();
                reconsume_in!(c, State::AttributeName)
            }
            None => eof_in_tag!(),
        },

        State::BeforeAttributeValue => match slf.reader.read_byte()? {
            Some(c) if is_whitespace(c) => cont!(),
            Some(b'"') => switch_to!(State::AttributeValueDoubleQuoted),
            Some(b'\'') => switch_to!(State::AttributeValueSingleQuoted),
            Some(b'>') => {
                error!(ParseError::MissingAttributeValue);
                emit_current_tag!()
            }
            Some(c) => reconsume_in!(c, State::AttributeValueUnquoted),
            None => eof_in_tag!(),
        },

        State::AttributeValueDoubleQuoted => match slf.reader.read_until(b"\"&", &mut char_buf)? {
            Some(b"\"") => switch_to!(State::AfterAttributeValueQuoted),
            Some(b"&") => enter_state!(State::CharacterReference),
            Some(xs) => {
                slf.emitter.push_attribute_value(xs);
                cont!()
            }
            None => eof_in_tag!(),
        },

        State::AttributeValueSingleQuoted => match slf.reader.read_until(b"'&", &mut char_buf)? {
            Some(b"'") => switch_to!(State::AfterAttributeValueQuoted),
            Some(b"&") => enter_state!(State::CharacterReference),
            Some(xs) => {
                slf.emitter.push_attribute_value(xs);
                cont!()
            }
            None => eof_in_tag!(),
        },

        State::AttributeValueUnquoted => {
            match slf.reader.read_until(b"\t\n\x0c\r >&", &mut char_buf)? {
                Some(&[c]) if is_whitespace(c) => switch_to!(State::BeforeAttributeName),
                Some(b">") => emit_current_tag!(),
                Some(b"&") => enter_state!(State::CharacterReference),
                Some(xs) => {
                    if xs.iter().any(|x| matches!(x, b'"' | b'\'' | b'<' | b'=' | b'`')) {
                        error!(ParseError::UnexpectedCharacterInUnquotedAttributeValue);
                    }
                    slf.emitter.push_attribute_value(xs);
                    cont!()
                }
                None => eof_in_tag!(),
            }
        }

        State::AfterAttributeValueQuoted => match slf.reader.read_byte()? {
            Some(c) if is_whitespace(c) => switch_to!(State::BeforeAttributeName),
            Some(b'/') => switch_to!(State::SelfClosingStartTag),
            Some(b'>') => emit_current_tag!(),
            Some(c) => {
                error!(ParseError::MissingWhitespaceBetweenAttributes);
                reconsume_in!(c, State::BeforeAttributeName)
            }
            None => eof_in_tag!(),
        },

        State::SelfClosingStartTag => match slf.reader.read_byte()? {
            Some(b'>') => {
                slf.emitter.set_self_closing();
                emit_current_tag!()
            }
            Some(c) => {
                error!(ParseError::UnexpectedSolidusInTag);
                reconsume_in!(c, State::BeforeAttributeName)
            }
            None => eof_in_tag!(),
        },

        State::MarkupDeclarationOpen => {
            if slf.reader.try_read_string(b"--", true)?.is_some() {
                slf.emitter.init_comment();
                switch_to!(State::CommentStart)
            } else if let Some(keyword) = slf.reader.try_read_string(b"doctype", false)? {
                slf.emitter.init_doctype(&keyword);
                switch_to!(State::Doctype)
            } else if let Some(cdata) = slf.reader.try_read_string(b"[CDATA[", true)? {
                error!(ParseError::CdataInHtmlContent);
                slf.emitter.init_comment();
                slf.emitter.push_comment(&cdata);
                switch_to!(State::BogusComment)
            } else {
                error!(ParseError::IncorrectlyOpenedComment);
                slf.emitter.init_comment();
                switch_to!(State::BogusComment)
            }
        }

        State::CommentStart => {
            if slf.reader.try_read_string(b">", true)?.is_some()
                || slf.reader.try_read_string(b"->", true)?.is_some()
            {
                error!(ParseError::AbruptClosingOfEmptyComment);
                slf.emitter.emit_current_comment();
                switch_to!(State::Data)
            }
            switch_to!(State::Comment)
        }

        State::Comment => match slf.reader.read_until(b"-", &mut char_buf)? {
            Some(b"-") => {
                if slf.reader.try_read_string(b"->", true)?.is_some() {
                    slf.emitter.emit_current_comment();
                    switch_to!(State::Data)
                }
                if slf.reader.try_read_string(b"-!>", true)?.is_some() {
                    error!(ParseError::IncorrectlyClosedComment);
                    slf.emitter.emit_current_comment();
                    switch_to!(State::Data)
                }
                slf.emitter.push_comment(b"-");
                cont!()
            }
            Some(xs) => {
                slf.emitter.push_comment(xs);
                cont!()
            }
            None => {
                error!(ParseError::EofInComment);
                slf.emitter.emit_current_comment();
                eof!()
            }
        },

        State::BogusComment => match slf.reader.read_until(b">", &mut char_buf)? {
            Some(b">") => {
                slf.emitter.emit_current_comment();
                switch_to!(State::Data)
            }
            Some(xs) => {
                slf.emitter.push_comment(xs);
                cont!()
            }
            None => {
                slf.emitter.emit_current_comment();
                eof!()
            }
        },

        State::Doctype => match slf.reader.read_until(b">", &mut char_buf)? {
            Some(b">") => {
                slf.emitter.emit_current_doctype();
                switch_to!(State::Data)
            }
            Some(xs) => {
                slf.emitter.push_doctype(xs);
                cont!()
            }
            None => {
                error!(ParseError::EofInDoctype);
                slf.emitter.emit_current_doctype();
                eof!()
            }
        },

        State::CharacterReference => {
            slf.machine_helper.temporary_buffer.clear();
            slf.machine_helper.temporary_buffer.push(b'&');

            match slf.reader.read_byte()? {
                Some(x) if x.is_ascii_alphanumeric() => {
                    reconsume_in!(x, State::NamedCharacterReference)
                }
                Some(b'#') => {
                    slf.machine_helper.temporary_buffer.push(b'#');
                    switch_to!(State::NumericCharacterReference)
                }
                c => {
                    flush_character_reference!();
                    reconsume_in_return_state!(c)
                }
            }
        }

        State::NamedCharacterReference => {
            let Some(char_ref) = try_read_character_reference(&mut slf.reader)? else {
                flush_character_reference!();
                switch_to!(State::AmbiguousAmpersand)
            };

            let next_character = slf.reader.read_byte()?;
            if !slf.machine_helper.is_consumed_as_part_of_an_attribute()
                || char_ref.ends_with_semicolon()
                || !matches!(next_character, Some(x) if x == b'=' || x.is_ascii_alphanumeric())
            {
                if !char_ref.ends_with_semicolon() {
                    error!(ParseError::MissingSemicolonAfterCharacterReference);
                }

                slf.machine_helper.temporary_buffer.clear();
                slf.machine_helper
                    .temporary_buffer
                    .extend_from_slice(char_ref.characters.as_bytes());
            } else {
                slf.machine_helper
                    .temporary_buffer
                    .extend_from_slice(&char_ref.name);
            }

            flush_character_reference!();
            reconsume_in_return_state!(next_character)
        }

        State::AmbiguousAmpersand => match slf.reader.read_byte()? {
            Some(x) if x.is_ascii_alphanumeric() => {
                if slf.machine_helper.is_consumed_as_part_of_an_attribute() {
                    slf.emitter.push_attribute_value(&[x]);
                } else {
                    slf.emitter.emit_string(&[x]);
                }
                cont!()
            }
            c => {
                if c == Some(b';') {
                    error!(ParseError::UnknownNamedCharacterReference);
                }
                reconsume_in_return_state!(c)
            }
        },

        State::NumericCharacterReference => {
            slf.machine_helper.character_reference_code = 0;

            match slf.reader.read_byte()? {
                Some(x @ (b'x' | b'X')) => {
                    slf.machine_helper.temporary_buffer.push(x);
                    switch_to!(State::HexadecimalCharacterReferenceStart)
                }
                Some(x @ b'0'..=b'9') => reconsume_in!(x, State::DecimalCharacterReference),
                c => {
                    error!(ParseError::AbsenceOfDigitsInNumericCharacterReference);
                    flush_character_reference!();
                    reconsume_in_return_state!(c)
                }
            }
        }

        State::HexadecimalCharacterReferenceStart => match slf.reader.read_byte()? {
            Some(x) if x.is_ascii_hexdigit() => {
                reconsume_in!(x, State::HexadecimalCharacterReference)
            }
            c => {
                error!(ParseError::AbsenceOfDigitsInNumericCharacterReference);
                flush_character_reference!();
                reconsume_in_return_state!(c)
            }
        },

        State::HexadecimalCharacterReference => match slf.reader.read_byte()? {
            Some(x) if x.is_ascii_hexdigit() => {
                let digit = char::from(x).to_digit(16).unwrap_or(0);
                let code = &mut slf.machine_helper.character_reference_code;
                *code = push_digit(*code, 16, digit);
                cont!()
            }
            Some(b';') => switch_to!(State::NumericCharacterReferenceEnd),
            c => {
                error!(ParseError::MissingSemicolonAfterCharacterReference);
                if let Some(c) = c {
                    slf.reader.unread_byte(c);
                }
                switch_to!(State::NumericCharacterReferenceEnd)
            }
        },

        State::DecimalCharacterReference => match slf.reader.read_byte()? {
            Some(x @ b'0'..=b'9') => {
                let code = &mut slf.machine_helper.character_reference_code;
                *code = push_digit(*code, 10, u32::from(x - b'0'));
                cont!()
            }
            Some(b';') => switch_to!(State::NumericCharacterReferenceEnd),
            c => {
                error!(ParseError::MissingSemicolonAfterCharacterReference);
                if let Some(c) = c {
                    slf.reader.unread_byte(c);
                }
                switch_to!(State::NumericCharacterReferenceEnd)
            }
        },

        State::NumericCharacterReferenceEnd => {
            let code = match slf.machine_helper.character_reference_code {
                0x00 => {
                    error!(ParseError::NullCharacterReference);
                    0xfffd
                }
                0x11_0000.. => {
                    error!(ParseError::CharacterReferenceOutsideUnicodeRange);
                    0xfffd
                }
                0xd800..=0xdfff => {
                    error!(ParseError::SurrogateCharacterReference);
                    0xfffd
                }
                x @ 0xfdd0..=0xfdef => {
                    error!(ParseError::NoncharacterCharacterReference);
                    x
                }
                x if x & 0xfffe == 0xfffe => {
                    error!(ParseError::NoncharacterCharacterReference);
                    x
                }
                x @ (0x0d | 0x01..=0x08 | 0x0b | 0x0e..=0x1f | 0x7f..=0x9f) => {
                    error!(ParseError::ControlCharacterReference);
                    windows_1252_replacement(x).unwrap_or(x)
                }
                x => x,
            };

            let c = char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER);
            slf.machine_helper.temporary_buffer.clear();
            slf.machine_helper
                .temporary_buffer
                .extend_from_slice(c.encode_utf8(&mut char_buf).as_bytes());
            flush_character_reference!();
            switch_to!(slf.machine_helper.pop_return_state())
        }
    }
}

/// Numeric references to C1 controls mean the character at that position in windows-1252.
fn windows_1252_replacement(code: u32) -> Option<u32> {
    let c = match code {
        0x80 => 0x20ac,
        0x82 => 0x201a,
        0x83 => 0x0192,
        0x84 => 0x201e,
        0x85 => 0x2026,
        0x86 => 0x2020,
        0x87 => 0x2021,
        0x88 => 0x02c6,
        0x89 => 0x2030,
        0x8a => 0x0160,
        0x8b => 0x2039,
        0x8c => 0x0152,
        0x8e => 0x017d,
        0x91 => 0x2018,
        0x92 => 0x2019,
        0x93 => 0x201c,
        0x94 => 0x201d,
        0x95 => 0x2022,
        0x96 => 0x2013,
        0x97 => 0x2014,
        0x98 => 0x02dc,
        0x99 => 0x2122,
        0x9a => 0x0161,
        0x9b => 0x203a,
        0x9c => 0x0153,
        0x9e => 0x017e,
        0x9f => 0x0178,
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{Attribute, EndTag, StartTag, Token, Tokenizer};

    fn tokenize(html: &str) -> Vec<Token> {
        Tokenizer::new(html).infallible().collect()
    }

    fn start(name: &str, attributes: &[(&str, &str)]) -> Token {
        Token::StartTag(StartTag {
            self_closing: false,
            name: name.into(),
            attributes: attributes
                .iter()
                .map(|&(name, value)| Attribute {
                    name: name.into(),
                    value: value.into(),
                })
                .collect(),
        })
    }

    fn end(name: &str) -> Token {
        Token::EndTag(EndTag { name: name.into() })
    }

    fn text(s: &str) -> Token {
        Token::Text(s.into())
    }

    #[test]
    fn attributes_keep_source_order_and_first_duplicate() {
        assert_eq!(
            tokenize(r#"<A Zeta=1 alpha='two words' zeta=3 checked>"#),
            vec![start(
                "a",
                &[("zeta", "1"), ("alpha", "two words"), ("checked", "")]
            )]
        );
    }

    #[test]
    fn character_references_are_decoded_outside_raw_text() {
        assert_eq!(
            tokenize("<p title=\"a&amp;b\">&lt;i&gt;</p>"),
            vec![start("p", &[("title", "a&b")]), text("<i>"), end("p")]
        );
    }

    #[test]
    fn script_and_style_bodies_are_raw() {
        assert_eq!(
            tokenize("<script>if (a < b && c) {}</script><style>a>b{}</style >"),
            vec![
                start("script", &[]),
                text("if (a < b && c) {}"),
                end("script"),
                start("style", &[]),
                text("a>b{}"),
                end("style"),
            ]
        );
    }

    #[test]
    fn raw_text_only_ends_at_its_own_end_tag() {
        assert_eq!(
            tokenize("<script>document.write('</b></scripts>')</SCRIPT>"),
            vec![
                start("script", &[]),
                text("document.write('</b></scripts>')"),
                end("script"),
            ]
        );
    }

    #[test]
    fn textarea_decodes_but_ignores_tags() {
        assert_eq!(
            tokenize("<textarea><b>&amp;</b></textarea>"),
            vec![start("textarea", &[]), text("<b>&</b>"), end("textarea")]
        );
    }

    #[test]
    fn comments_doctypes_and_bogus_comments() {
        assert_eq!(
            tokenize("<!doctype html><!-- a -- b --><!----><?xml x?><![CDATA[y]]>"),
            vec![
                Token::Doctype("doctype html".into()),
                Token::Comment(" a -- b ".into()),
                Token::Comment("".into()),
                Token::Comment("?xml x?".into()),
                Token::Comment("[CDATA[y]]".into()),
            ]
        );
    }

    #[test]
    fn self_closing_and_stray_less_than() {
        assert_eq!(
            tokenize("a < b<br/><img src=x />"),
            vec![
                text("a < b"),
                Token::StartTag(StartTag {
                    self_closing: true,
                    name: "br".into(),
                    attributes: Vec::new(),
                }),
                Token::StartTag(StartTag {
                    self_closing: true,
                    name: "img".into(),
                    attributes: vec![Attribute {
                        name: "src".into(),
                        value: "x".into(),
                    }],
                }),
            ]
        );
    }

    #[test]
    fn legacy_references_decode_without_semicolon() {
        assert_eq!(
            tokenize("<p>&copy 2024 &lt &amp; &notit; &hellip</p>"),
            vec![start("p", &[]), text("\u{a9} 2024 < & \u{ac}it; &hellip"), end("p")]
        );
    }

    #[test]
    fn numeric_references() {
        assert_eq!(
            tokenize("&#65 &#x41; &#X6a;&#0; &#x110000; &#xD800; &#x80; &#; &#xg;"),
            vec![text("A A j\u{fffd} \u{fffd} \u{fffd} \u{20ac} &#; &#xg;")]
        );
    }

    #[test]
    fn attribute_references_followed_by_name_characters_stay_undecoded() {
        assert_eq!(
            tokenize(r#"<a href="?x=1&copy=2&lang=en" title='&copyright &copy; &amp-'>"#),
            vec![start(
                "a",
                &[
                    ("href", "?x=1&copy=2&lang=en"),
                    ("title", "&copyright \u{a9} &-"),
                ]
            )]
        );
        assert_eq!(
            tokenize("<img alt=a&ampb&amp;c>"),
            vec![start("img", &[("alt", "a&ampb&c")])]
        );
    }

    #[test]
    fn text_references_ignore_what_follows() {
        assert_eq!(tokenize("&copyright"), vec![text("\u{a9}right")]);
    }

    #[test]
    fn comment_closed_with_bang() {
        assert_eq!(
            tokenize("<!-- x --!><p>"),
            vec![Token::Comment(" x ".into()), start("p", &[])]
        );
    }

    #[test]
    fn script_end_tag_inside_escaped_script_is_text() {
        let js = "<!-- document.write('<script></script>'); -->";
        assert_eq!(
            tokenize(&format!("<script>{js}</script><p>")),
            vec![start("script", &[]), text(js), end("script"), start("p", &[])]
        );
    }

    #[test]
    fn escaped_script_still_ends_at_its_end_tag() {
        assert_eq!(
            tokenize("<script><!-- a < b </script>x"),
            vec![start("script", &[]), text("<!-- a < b "), end("script"), text("x")]
        );
        assert_eq!(
            tokenize("<script><!--></script>x"),
            vec![start("script", &[]), text("<!-->"), end("script"), text("x")]
        );
    }

    #[test]
    fn plaintext_runs_to_the_end() {
        assert_eq!(
            tokenize("<plaintext>a &amp; </plaintext><b>"),
            vec![start("plaintext", &[]), text("a &amp; </plaintext><b>")]
        );
    }

    #[test]
    fn truncated_tag_is_dropped() {
        assert_eq!(tokenize("hi<div class="), vec![text("hi")]);
    }
}

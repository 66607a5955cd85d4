use std::collections::VecDeque;
use std::mem;

use crate::state::{naive_next_state, State};
use crate::{Attribute, EndTag, HtmlString, ParseError, StartTag, Token};

#[derive(Debug)]
enum CurrentToken {
    StartTag(StartTag),
    EndTag(EndTag),
    Comment(HtmlString),
    Doctype(HtmlString),
}

/// Collects the pieces the state machine hands it and produces finished [`Token`]s.
#[derive(Debug)]
pub(crate) struct Emitter {
    current_characters: Vec<u8>,
    current_token: Option<CurrentToken>,
    current_attribute: Option<Attribute>,
    last_start_tag: HtmlString,
    emitted_tokens: VecDeque<Token>,
}

impl Default for Emitter {
    fn default() -> Self {
        Emitter {
            current_characters: Vec::new(),
            current_token: None,
            current_attribute: None,
            last_start_tag: HtmlString::default(),
            emitted_tokens: VecDeque::new(),
        }
    }
}

impl Emitter {
    fn emit_token(&mut self, token: Token) {
        self.flush_current_characters();
        self.emitted_tokens.push_front(token);
    }

    fn flush_current_attribute(&mut self) {
        let Some(attr) = self.current_attribute.take() else {
            return;
        };

        match self.current_token {
            Some(CurrentToken::StartTag(ref mut tag)) => {
                let duplicate = tag.attributes.iter().any(|x| x.name == attr.name);
                if !duplicate {
                    tag.attributes.push(attr);
                    return;
                }
                self.emit_error(ParseError::DuplicateAttribute);
            }
            Some(CurrentToken::EndTag(_)) => {
                self.emit_error(ParseError::EndTagWithAttributes);
            }
            _ => debug_assert!(false, "attribute outside of a tag"),
        }
    }

    pub(crate) fn flush_current_characters(&mut self) {
        if self.current_characters.is_empty() {
            return;
        }

        let s = mem::take(&mut self.current_characters);
        self.emitted_tokens.push_front(Token::Text(HtmlString(s)));
    }

    pub(crate) fn emit_error(&mut self, error: ParseError) {
        log::debug!(target: "compacthtml::tokenizer", "recovered from parse error: {}", error);
    }

    pub(crate) fn pop_token(&mut self) -> Option<Token> {
        self.emitted_tokens.pop_back()
    }

    pub(crate) fn emit_string(&mut self, s: &[u8]) {
        self.current_characters.extend_from_slice(s);
    }

    pub(crate) fn init_start_tag(&mut self) {
        self.current_token = Some(CurrentToken::StartTag(StartTag::default()));
    }

    pub(crate) fn init_end_tag(&mut self) {
        self.current_token = Some(CurrentToken::EndTag(EndTag::default()));
    }

    pub(crate) fn init_comment(&mut self) {
        self.current_token = Some(CurrentToken::Comment(HtmlString::default()));
    }

    /// Start a doctype. `keyword` is the word `doctype` in whatever casing the input used.
    pub(crate) fn init_doctype(&mut self, keyword: &[u8]) {
        self.current_token = Some(CurrentToken::Doctype(keyword.into()));
    }

    pub(crate) fn push_tag_name(&mut self, s: &[u8]) {
        match self.current_token {
            Some(CurrentToken::StartTag(StartTag { ref mut name, .. }))
            | Some(CurrentToken::EndTag(EndTag { ref mut name })) => {
                name.extend(s.iter().map(u8::to_ascii_lowercase));
            }
            _ => debug_assert!(false, "tag name outside of a tag"),
        }
    }

    pub(crate) fn init_attribute(&mut self) {
        self.flush_current_attribute();
        self.current_attribute = Some(Attribute::default());
    }

    pub(crate) fn push_attribute_name(&mut self, s: &[u8]) {
        if let Some(attr) = self.current_attribute.as_mut() {
            attr.name.extend(s.iter().map(u8::to_ascii_lowercase));
        }
    }

    pub(crate) fn push_attribute_value(&mut self, s: &[u8]) {
        if let Some(attr) = self.current_attribute.as_mut() {
            attr.value.extend_from_slice(s);
        }
    }

    pub(crate) fn set_self_closing(&mut self) {
        match self.current_token {
            Some(CurrentToken::StartTag(ref mut tag)) => tag.self_closing = true,
            Some(CurrentToken::EndTag(_)) => {
                self.emit_error(ParseError::EndTagWithTrailingSolidus);
            }
            _ => debug_assert!(false, "solidus outside of a tag"),
        }
    }

    /// Emit the current tag and return the state the tokenizer continues in.
    pub(crate) fn emit_current_tag(&mut self) -> State {
        self.flush_current_attribute();
        let (token, next_state) = match self.current_token.take() {
            Some(CurrentToken::StartTag(tag)) => {
                self.last_start_tag = tag.name.clone();
                let next_state = if tag.self_closing {
                    None
                } else {
                    naive_next_state(&tag.name)
                };
                (Token::StartTag(tag), next_state)
            }
            Some(CurrentToken::EndTag(tag)) => {
                self.last_start_tag.clear();
                (Token::EndTag(tag), None)
            }
            other => {
                debug_assert!(false, "not a tag: {:?}", other);
                return State::Data;
            }
        };
        self.emit_token(token);
        next_state.unwrap_or(State::Data)
    }

    /// Drop a tag that was cut off by the end of the input.
    pub(crate) fn discard_current_tag(&mut self) {
        self.current_attribute = None;
        self.current_token = None;
    }

    pub(crate) fn push_comment(&mut self, s: &[u8]) {
        match self.current_token {
            Some(CurrentToken::Comment(ref mut data)) | Some(CurrentToken::Doctype(ref mut data)) => {
                data.extend_from_slice(s);
            }
            _ => debug_assert!(false, "comment data outside of a comment"),
        }
    }

    pub(crate) fn push_doctype(&mut self, s: &[u8]) {
        self.push_comment(s);
    }

    pub(crate) fn emit_current_comment(&mut self) {
        match self.current_token.take() {
            Some(CurrentToken::Comment(data)) => self.emit_token(Token::Comment(data)),
            other => debug_assert!(false, "not a comment: {:?}", other),
        }
    }

    pub(crate) fn emit_current_doctype(&mut self) {
        match self.current_token.take() {
            Some(CurrentToken::Doctype(data)) => self.emit_token(Token::Doctype(data)),
            other => debug_assert!(false, "not a doctype: {:?}", other),
        }
    }

    /// The name of the start tag whose contents are being read, used to find the end of
    /// RCDATA, RAWTEXT and script data.
    pub(crate) fn last_start_tag(&self) -> &[u8] {
        &self.last_start_tag
    }
}

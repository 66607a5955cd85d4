use std::convert::Infallible;

use crate::emitter::Emitter;
use crate::machine;
use crate::machine_helper::MachineHelper;
use crate::read_helper::ReadHelper;
use crate::state::State;
use crate::{Readable, Reader, Token};

/// A HTML tokenizer. See crate-level docs for basic usage.
///
/// The tokenizer is an iterator over `Result<Token, R::Error>`. HTML syntax errors are recovered
/// from and never show up as items; an `Err` item means the reader failed, and is the last item
/// the iterator produces.
#[derive(Debug)]
pub struct Tokenizer<R: Reader> {
    eof: bool,
    pub(crate) state: State,
    pub(crate) machine_helper: MachineHelper,
    pub(crate) emitter: Emitter,
    pub(crate) reader: ReadHelper<R>,
}

impl<R: Reader> Tokenizer<R> {
    /// Create a new tokenizer from some input.
    ///
    /// `input` can be `&str`, `&String`, `&[u8]` or `&Vec<u8>`, a `File`, or any other
    /// [`crate::Reader`] such as an [`crate::IoReader`].
    pub fn new<'a, S: Readable<'a, Reader = R>>(input: S) -> Self {
        Tokenizer {
            eof: false,
            state: State::Data,
            machine_helper: MachineHelper::default(),
            emitter: Emitter::default(),
            reader: ReadHelper::new(input.to_reader()),
        }
    }
}

impl<R: Reader<Error = Infallible>> Tokenizer<R> {
    /// Statically assert that this iterator is infallible.
    ///
    /// Call this to get rid of error handling when tokenizing HTML from strings.
    pub fn infallible(self) -> InfallibleTokenizer<R> {
        InfallibleTokenizer(self)
    }
}

impl<R: Reader> Iterator for Tokenizer<R> {
    type Item = Result<Token, R::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.emitter.pop_token() {
                break Some(Ok(token));
            } else if !self.eof {
                match machine::consume(self) {
                    Ok(machine::ControlToken::Continue) => (),
                    Ok(machine::ControlToken::Eof) => {
                        self.eof = true;
                        self.emitter.flush_current_characters();
                    }
                    Err(e) => {
                        self.eof = true;
                        break Some(Err(e));
                    }
                }
            } else {
                break None;
            }
        }
    }
}

/// A kind of tokenizer that directly yields tokens when used as an iterator, so `Token` instead of
/// `Result<Token, _>`.
///
/// This is the return value of [`Tokenizer::infallible`].
#[derive(Debug)]
pub struct InfallibleTokenizer<R: Reader<Error = Infallible>>(Tokenizer<R>);

impl<R: Reader<Error = Infallible>> Iterator for InfallibleTokenizer<R> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        match self.0.next()? {
            Ok(token) => Some(token),
            Err(e) => match e {},
        }
    }
}

use markup5ever::data::NAMED_ENTITIES;

use crate::read_helper::ReadHelper;
use crate::Reader;

/// A named character reference found in the input.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct CharRef {
    /// The name as written, without the leading `&`. Legacy references like `&amp` have no
    /// trailing `;`.
    pub(crate) name: Vec<u8>,
    /// The characters the reference stands for.
    pub(crate) characters: String,
}

impl CharRef {
    pub(crate) fn ends_with_semicolon(&self) -> bool {
        self.name.last() == Some(&b';')
    }
}

/// Consume the longest named character reference at the current position.
///
/// The table maps every prefix of a reference name to `(0, 0)`, so the input can be matched one
/// byte at a time and abandoned as soon as no name starts with what was read. Bytes read past the
/// longest match are put back. If nothing matches, nothing is consumed.
pub(crate) fn try_read_character_reference<R: Reader>(
    reader: &mut ReadHelper<R>,
) -> Result<Option<CharRef>, R::Error> {
    let mut name = String::new();
    let mut longest = None;

    while let Some(x) = reader.read_byte()? {
        if !x.is_ascii_alphanumeric() && x != b';' {
            reader.unread_byte(x);
            break;
        }

        name.push(char::from(x));
        match NAMED_ENTITIES.get(name.as_str()) {
            None => break,
            Some(&(0, _)) => (),
            Some(&code_points) => longest = Some((name.len(), code_points)),
        }

        if x == b';' {
            break;
        }
    }

    let matched = longest.unwrap_or((0, (0, 0)));
    for x in name.bytes().skip(matched.0).rev() {
        reader.unread_byte(x);
    }

    let (len, (first, second)) = matched;
    if len == 0 {
        return Ok(None);
    }

    name.truncate(len);
    let characters = [first, second]
        .into_iter()
        .filter(|&c| c != 0)
        .filter_map(char::from_u32)
        .collect();

    Ok(Some(CharRef {
        name: name.into_bytes(),
        characters,
    }))
}

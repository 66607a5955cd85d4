use crate::emitter::Emitter;
use crate::state::State;

/// Scratch state for character references, which can be entered from text and from attribute
/// values and have to find their way back.
#[derive(Debug, Default)]
pub(crate) struct MachineHelper {
    pub(crate) temporary_buffer: Vec<u8>,
    pub(crate) character_reference_code: u32,
    return_state: Option<State>,
}

impl MachineHelper {
    pub(crate) fn is_consumed_as_part_of_an_attribute(&self) -> bool {
        self.return_state.is_some_and(State::is_attribute_value)
    }

    /// Hand the temporary buffer to whatever the reference was found in.
    pub(crate) fn flush_code_points_consumed_as_character_reference(
        &mut self,
        emitter: &mut Emitter,
    ) {
        if self.is_consumed_as_part_of_an_attribute() {
            emitter.push_attribute_value(&self.temporary_buffer);
        } else {
            emitter.emit_string(&self.temporary_buffer);
        }
        self.temporary_buffer.clear();
    }

    pub(crate) fn enter_state(&mut self, current: State) {
        debug_assert!(self.return_state.is_none());
        self.return_state = Some(current);
    }

    pub(crate) fn pop_return_state(&mut self) -> State {
        debug_assert!(self.return_state.is_some());
        self.return_state.take().unwrap_or(State::Data)
    }
}

/// Advance a numeric character reference by one digit. Codes past the Unicode range stick at
/// `0x110000`, so long runs of digits cannot overflow.
pub(crate) fn push_digit(code: u32, base: u32, digit: u32) -> u32 {
    (code * base + digit).min(0x11_0000)
}

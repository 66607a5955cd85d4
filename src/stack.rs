use crate::classify::{classify, ElementKind};
use crate::HtmlString;

/// Index of a [`Block`] in the side table of an [`ElementStack`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct BlockId(usize);

/// Whitespace bookkeeping for one block-level element and the inline elements inside it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Block {
    has_emitted_any: bool,
    ends_with_space: bool,
    /// A single space was swallowed and may still need to be written, depending on what comes
    /// next.
    pub(crate) space_delayed: bool,
}

impl Block {
    pub(crate) fn is_empty(&self) -> bool {
        !self.has_emitted_any
    }

    pub(crate) fn ends_with_space(&self) -> bool {
        self.ends_with_space
    }

    /// Record text that was written into this block.
    pub(crate) fn add(&mut self, s: &str) {
        if !s.is_empty() {
            self.has_emitted_any = true;
            self.ends_with_space = s.ends_with(' ');
        }
    }
}

#[derive(Debug)]
struct Frame {
    name: HtmlString,
    literal: bool,
    block: BlockId,
    owns_block: bool,
}

/// The currently open elements.
///
/// Blocks nest the same way frames do, so they live in a side table that grows and shrinks with
/// the stack. Entry 0 belongs to the document itself and is current while no element is open.
#[derive(Debug)]
pub(crate) struct ElementStack {
    frames: Vec<Frame>,
    blocks: Vec<Block>,
}

impl Default for ElementStack {
    fn default() -> Self {
        ElementStack {
            frames: Vec::new(),
            blocks: vec![Block::default()],
        }
    }
}

impl ElementStack {
    pub(crate) fn push(&mut self, name: &[u8]) {
        let kind = classify(name);
        let parent = self.frames.last();
        let literal = kind == ElementKind::Literal || parent.is_some_and(|f| f.literal);

        let (block, owns_block) = match parent {
            Some(parent) if kind == ElementKind::Inline => (parent.block, false),
            _ => {
                self.blocks.push(Block::default());
                (BlockId(self.blocks.len() - 1), true)
            }
        };

        self.frames.push(Frame {
            name: name.into(),
            literal,
            block,
            owns_block,
        });
    }

    /// Close the innermost element and return its name. `None` if nothing is open.
    pub(crate) fn pop(&mut self) -> Option<HtmlString> {
        let frame = self.frames.pop()?;
        if frame.owns_block {
            debug_assert_eq!(frame.block.0, self.blocks.len() - 1);
            self.blocks.pop();
        }
        Some(frame.name)
    }

    /// Close elements up to and including the innermost one called `name`.
    ///
    /// Returns how many elements were closed, zero if no such element is open.
    pub(crate) fn pop_until(&mut self, name: &[u8]) -> usize {
        let Some(pos) = self.frames.iter().rposition(|f| f.name == name) else {
            return 0;
        };
        let closed = self.frames.len() - pos;
        for _ in 0..closed {
            self.pop();
        }
        closed
    }

    pub(crate) fn peek(&self) -> Option<&[u8]> {
        self.frames.last().map(|f| &f.name[..])
    }

    pub(crate) fn current_block(&mut self) -> &mut Block {
        let id = self.frames.last().map_or(BlockId(0), |f| f.block);
        &mut self.blocks[id.0]
    }

    pub(crate) fn is_current_literal(&self) -> bool {
        self.frames.last().is_some_and(|f| f.literal)
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_children_share_the_block_of_their_parent() {
        let mut stack = ElementStack::default();
        stack.push(b"div");
        stack.current_block().add("x");
        stack.push(b"span");
        stack.push(b"b");
        assert!(!stack.current_block().is_empty());

        stack.push(b"p");
        assert!(stack.current_block().is_empty());
        assert_eq!(stack.blocks.len(), 3);

        assert_eq!(stack.pop().unwrap(), b"p");
        assert_eq!(stack.blocks.len(), 2);
        stack.current_block().add("y ");
        assert_eq!(stack.pop().unwrap(), b"b");
        assert_eq!(stack.pop().unwrap(), b"span");
        assert!(stack.current_block().ends_with_space());
    }

    #[test]
    fn inline_element_on_empty_stack_gets_its_own_block() {
        let mut stack = ElementStack::default();
        stack.current_block().add("top");
        stack.push(b"span");
        assert!(stack.current_block().is_empty());
        stack.pop();
        assert!(!stack.current_block().is_empty());
    }

    #[test]
    fn literal_is_inherited() {
        let mut stack = ElementStack::default();
        stack.push(b"div");
        assert!(!stack.is_current_literal());
        stack.push(b"pre");
        stack.push(b"span");
        stack.push(b"div");
        assert!(stack.is_current_literal());
        stack.pop_until(b"pre");
        assert!(!stack.is_current_literal());
        assert_eq!(stack.peek(), Some(&b"div"[..]));
    }

    #[test]
    fn popping_an_empty_stack_is_harmless() {
        let mut stack = ElementStack::default();
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.pop_until(b"div"), 0);
        assert_eq!(stack.peek(), None);
        assert_eq!(stack.blocks.len(), 1);
    }

    #[test]
    fn pop_until_closes_implicitly_closed_elements() {
        let mut stack = ElementStack::default();
        stack.push(b"ul");
        stack.push(b"li");
        stack.push(b"p");
        assert_eq!(stack.pop_until(b"ul"), 3);
        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.blocks.len(), 1);
    }
}

//! Code point cursor over shared text

use std::sync::Arc;

/// Moves one code point at a time in either direction over a text
#[derive(Debug, Clone)]
pub(crate) struct CodePointCursor {
    text: Arc<str>,
    index: usize,
}

impl CodePointCursor {
    pub(crate) fn new(text: Arc<str>) -> Self {
        Self { text, index: 0 }
    }

    /// Whether this cursor walks the very same text allocation
    pub(crate) fn is_over(&self, text: &Arc<str>) -> bool {
        Arc::ptr_eq(&self.text, text)
    }

    pub(crate) fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    pub(crate) fn index(&self) -> usize {
        self.index
    }

    /// Clamps to the text and backs off to a character boundary.
    pub(crate) fn set_index(&mut self, index: usize) {
        let mut index = index.min(self.text.len());
        while !self.text.is_char_boundary(index) {
            index -= 1;
        }
        self.index = index;
    }

    /// Code point before the cursor; the cursor moves in front of it.
    pub(crate) fn previous(&mut self) -> Option<char> {
        let ch = self.text[..self.index].chars().next_back()?;
        self.index -= ch.len_utf8();
        Some(ch)
    }

    /// Code point at the cursor; the cursor moves past it.
    pub(crate) fn next(&mut self) -> Option<char> {
        let ch = self.text[self.index..].chars().next()?;
        self.index += ch.len_utf8();
        Some(ch)
    }
}

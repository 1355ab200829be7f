//! Sentence boundary detector contract and a reference implementation
//!
//! Positions are UTF-8 byte offsets into the detector's text. Moves that run
//! off either end of the text return `None`.

use std::sync::Arc;

/// Cursor over sentence boundaries of a text
///
/// Every text has a boundary at offset 0 and at `text().len()`. The cursor
/// always sits on a boundary, reported by [`current`](Self::current).
pub trait BreakIterator {
    /// Move to the first boundary and return it
    fn first(&mut self) -> usize;

    /// Move to the last boundary and return it
    fn last(&mut self) -> usize;

    /// Advance to the next boundary
    fn next(&mut self) -> Option<usize>;

    /// Move `n` boundaries forward, or backward when `n` is negative
    fn next_by(&mut self, n: i32) -> Option<usize>;

    /// Step back to the previous boundary
    fn previous(&mut self) -> Option<usize>;

    /// First boundary after `offset`
    fn following(&mut self, offset: usize) -> Option<usize>;

    /// Last boundary before `offset`
    fn preceding(&mut self, offset: usize) -> Option<usize>;

    /// Whether `offset` is a boundary; moves the cursor to `offset` when it is
    fn is_boundary(&mut self, offset: usize) -> bool;

    /// Boundary the cursor sits on
    fn current(&self) -> usize;

    /// Text being analyzed
    fn text(&self) -> &Arc<str>;

    /// Replace the text and move to its first boundary
    fn set_text(&mut self, text: Arc<str>);
}

impl<B: BreakIterator + ?Sized> BreakIterator for Box<B> {
    fn first(&mut self) -> usize {
        (**self).first()
    }

    fn last(&mut self) -> usize {
        (**self).last()
    }

    fn next(&mut self) -> Option<usize> {
        (**self).next()
    }

    fn next_by(&mut self, n: i32) -> Option<usize> {
        (**self).next_by(n)
    }

    fn previous(&mut self) -> Option<usize> {
        (**self).previous()
    }

    fn following(&mut self, offset: usize) -> Option<usize> {
        (**self).following(offset)
    }

    fn preceding(&mut self, offset: usize) -> Option<usize> {
        (**self).preceding(offset)
    }

    fn is_boundary(&mut self, offset: usize) -> bool {
        (**self).is_boundary(offset)
    }

    fn current(&self) -> usize {
        (**self).current()
    }

    fn text(&self) -> &Arc<str> {
        (**self).text()
    }

    fn set_text(&mut self, text: Arc<str>) {
        (**self).set_text(text)
    }
}

/// Cursor over a precomputed, sorted list of boundary offsets
///
/// Detectors that find all their boundaries up front keep one of these and
/// forward the cursor moves of [`BreakIterator`] to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryList {
    offsets: Vec<usize>,
    index: usize,
}

impl BoundaryList {
    /// Create a cursor at the first boundary.
    ///
    /// Offsets are sorted and deduplicated; an empty list becomes `[0]`.
    pub fn new(mut offsets: Vec<usize>) -> Self {
        offsets.sort_unstable();
        offsets.dedup();
        if offsets.is_empty() {
            offsets.push(0);
        }
        Self { offsets, index: 0 }
    }

    /// All boundaries in ascending order
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Move to the first boundary
    pub fn first(&mut self) -> usize {
        self.index = 0;
        self.offsets[0]
    }

    /// Move to the last boundary
    pub fn last(&mut self) -> usize {
        self.index = self.offsets.len() - 1;
        self.offsets[self.index]
    }

    /// Advance one boundary
    pub fn next(&mut self) -> Option<usize> {
        if self.index + 1 < self.offsets.len() {
            self.index += 1;
            Some(self.offsets[self.index])
        } else {
            None
        }
    }

    /// Step back one boundary
    pub fn previous(&mut self) -> Option<usize> {
        if self.index > 0 {
            self.index -= 1;
            Some(self.offsets[self.index])
        } else {
            None
        }
    }

    /// Move `n` boundaries; stops at the first `None`
    pub fn next_by(&mut self, n: i32) -> Option<usize> {
        let mut result = Some(self.current());
        for _ in 0..n.unsigned_abs() {
            result = if n > 0 { self.next() } else { self.previous() };
            if result.is_none() {
                break;
            }
        }
        result
    }

    /// Past the last boundary the cursor moves to the last one.
    pub fn following(&mut self, offset: usize) -> Option<usize> {
        let index = self.offsets.partition_point(|&b| b <= offset);
        if index < self.offsets.len() {
            self.index = index;
            Some(self.offsets[index])
        } else {
            self.last();
            None
        }
    }

    /// Before the first boundary the cursor moves to the first one.
    pub fn preceding(&mut self, offset: usize) -> Option<usize> {
        let index = self.offsets.partition_point(|&b| b < offset);
        if index > 0 {
            self.index = index - 1;
            Some(self.offsets[self.index])
        } else {
            self.first();
            None
        }
    }

    /// Moves to `offset` when it is a boundary, otherwise to the following one.
    pub fn is_boundary(&mut self, offset: usize) -> bool {
        match self.offsets.binary_search(&offset) {
            Ok(index) => {
                self.index = index;
                true
            }
            Err(_) => {
                self.following(offset);
                false
            }
        }
    }

    /// Boundary under the cursor
    pub fn current(&self) -> usize {
        self.offsets[self.index]
    }
}

const DEFAULT_TERMINATORS: [char; 3] = ['.', '!', '?'];

fn is_closer(ch: char) -> bool {
    matches!(
        ch,
        ')' | ']' | '}' | '"' | '\'' | '\u{2019}' | '\u{201D}' | '\u{00BB}'
    )
}

/// Minimal detector that breaks after sentence terminators
///
/// A boundary follows each run of terminators together with any closing
/// punctuation and whitespace after it, unless the next character is
/// lowercase or a digit. A single `.` between a letter and an uppercase
/// letter, as in "U.S.A.", is not a boundary either. It knows nothing about abbreviations, which makes it
/// a natural inner detector for [`ExceptionFilter`](crate::ExceptionFilter).
#[derive(Debug, Clone)]
pub struct TerminatorBreakIterator {
    text: Arc<str>,
    terminators: Vec<char>,
    boundaries: BoundaryList,
}

impl TerminatorBreakIterator {
    /// Break after `.`, `!` and `?`
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self::with_terminators(text, DEFAULT_TERMINATORS.to_vec())
    }

    /// Break after the given terminator characters
    pub fn with_terminators(text: impl Into<Arc<str>>, terminators: Vec<char>) -> Self {
        let text = text.into();
        let boundaries = BoundaryList::new(find_boundaries(&text, &terminators));
        Self {
            text,
            terminators,
            boundaries,
        }
    }

    /// All boundaries of the current text
    pub fn boundaries(&self) -> &[usize] {
        self.boundaries.offsets()
    }
}

fn find_boundaries(text: &str, terminators: &[char]) -> Vec<usize> {
    let mut offsets = vec![0];
    let mut before = None;
    let mut chars = text.char_indices().peekable();
    while let Some((_, ch)) = chars.next() {
        if !terminators.contains(&ch) {
            before = Some(ch);
            continue;
        }
        let mut last = ch;
        let mut run = 1;
        while let Some((_, c)) = chars.next_if(|&(_, c)| terminators.contains(&c)) {
            last = c;
            run += 1;
        }
        // A lone full stop between a letter and an uppercase letter ("U.S")
        // stays inside the sentence.
        let joins_letters = ch == '.'
            && run == 1
            && before.is_some_and(char::is_alphabetic)
            && chars.peek().is_some_and(|&(_, next)| next.is_uppercase());
        if joins_letters {
            before = Some(ch);
            continue;
        }
        while let Some((_, c)) = chars.next_if(|&(_, c)| is_closer(c)) {
            last = c;
        }
        while let Some((_, c)) = chars.next_if(|&(_, c)| c.is_whitespace()) {
            last = c;
        }
        before = Some(last);
        match chars.peek() {
            Some(&(_, next)) if next.is_lowercase() || next.is_numeric() => {}
            Some(&(offset, _)) => offsets.push(offset),
            None => {}
        }
    }
    offsets.push(text.len());
    offsets
}

impl BreakIterator for TerminatorBreakIterator {
    fn first(&mut self) -> usize {
        self.boundaries.first()
    }

    fn last(&mut self) -> usize {
        self.boundaries.last()
    }

    fn next(&mut self) -> Option<usize> {
        self.boundaries.next()
    }

    fn next_by(&mut self, n: i32) -> Option<usize> {
        self.boundaries.next_by(n)
    }

    fn previous(&mut self) -> Option<usize> {
        self.boundaries.previous()
    }

    fn following(&mut self, offset: usize) -> Option<usize> {
        self.boundaries.following(offset)
    }

    fn preceding(&mut self, offset: usize) -> Option<usize> {
        self.boundaries.preceding(offset)
    }

    fn is_boundary(&mut self, offset: usize) -> bool {
        self.boundaries.is_boundary(offset)
    }

    fn current(&self) -> usize {
        self.boundaries.current()
    }

    fn text(&self) -> &Arc<str> {
        &self.text
    }

    fn set_text(&mut self, text: Arc<str>) {
        self.boundaries = BoundaryList::new(find_boundaries(&text, &self.terminators));
        self.text = text;
    }
}

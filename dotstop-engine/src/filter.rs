//! Abbreviation-aware break filtering
//!
//! [`ExceptionFilter`] wraps a detector and drops the candidates that sit
//! right after a known abbreviation. Abbreviations are stored reversed in one
//! trie so they can be matched backward from a candidate. Abbreviations with
//! an internal separator ("Ph.D.") only put their first segment ("Ph.") in
//! the reverse trie, marked [`PARTIAL`], and are confirmed by walking a second,
//! forward trie over the full string.

use std::sync::Arc;

use dotstop_trie::{MatchResult, TrieCursor, UnitTrie};
use log::trace;

use crate::detector::BreakIterator;
use crate::text_cursor::CodePointCursor;

/// Reverse-trie value for a prefix that needs the forward trie to decide
pub const PARTIAL: i32 = 1;

/// Trie value for a complete exception
pub const MATCH: i32 = 2;

/// Reverse and forward tries consulted by [`ExceptionFilter`]
///
/// Produced by [`FilterBuilder::build_tries`](crate::FilterBuilder::build_tries).
/// Without a reverse trie the filter passes every candidate through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExceptionTries {
    /// Exceptions and partial prefixes, reversed by code point
    pub reverse: Option<UnitTrie>,
    /// Exceptions with an internal separator, unreversed
    pub forward: Option<UnitTrie>,
}

impl ExceptionTries {
    /// True when neither trie exists
    pub fn is_empty(&self) -> bool {
        self.reverse.is_none() && self.forward.is_none()
    }
}

/// Detector decorator that suppresses breaks after exceptions
///
/// Reports a subset of the wrapped detector's boundaries and never
/// suppresses the start or end of the text.
///
/// ```
/// use dotstop_engine::{BreakIterator, FilterBuilder, TerminatorBreakIterator};
///
/// let mut builder = FilterBuilder::new();
/// builder.suppress_break_after("Mrs.");
/// let text = "I saw Mrs. Smith today. She waved.";
/// let mut filter = builder.wrap(TerminatorBreakIterator::new(text))?;
///
/// assert_eq!(filter.next(), Some(24));
/// assert_eq!(filter.next(), Some(text.len()));
/// assert_eq!(filter.next(), None);
/// # Ok::<(), dotstop_engine::EngineError>(())
/// ```
#[derive(Debug)]
pub struct ExceptionFilter<B> {
    inner: B,
    reverse: Option<TrieCursor>,
    forward: Option<TrieCursor>,
    /// Recreated whenever the wrapped detector's text changes
    text: Option<CodePointCursor>,
}

impl<B: BreakIterator> ExceptionFilter<B> {
    /// Wrap `inner` with the given tries
    pub fn new(inner: B, tries: ExceptionTries) -> Self {
        Self {
            inner,
            reverse: tries.reverse.as_ref().map(UnitTrie::cursor),
            forward: tries.forward.as_ref().map(UnitTrie::cursor),
            text: None,
        }
    }

    /// The wrapped detector
    pub fn inner(&self) -> &B {
        &self.inner
    }

    /// Release the wrapped detector
    pub fn into_inner(self) -> B {
        self.inner
    }

    fn sync_text(&mut self) {
        let current = self
            .text
            .as_ref()
            .is_some_and(|cursor| cursor.is_over(self.inner.text()));
        if !current {
            self.text = Some(CodePointCursor::new(Arc::clone(self.inner.text())));
        }
    }

    /// Whether the candidate at `n` follows an exception.
    fn is_exception_at(&mut self, n: usize) -> bool {
        let (Some(text), Some(reverse)) = (self.text.as_mut(), self.reverse.as_mut()) else {
            return false;
        };
        text.set_index(n);
        // One space may separate the abbreviation from the candidate.
        if let Some(ch) = text.previous() {
            if ch != ' ' {
                text.set_index(n);
            }
        }

        reverse.reset();
        let mut best = None;
        let mut result = MatchResult::NoValue;
        while let Some(ch) = text.previous() {
            result = reverse.next_for_code_point(ch);
            if !result.has_next() {
                break;
            }
            if result.has_value() {
                best = reverse.value().map(|value| (text.index(), value));
            }
        }
        if result == MatchResult::FinalValue {
            best = reverse.value().map(|value| (text.index(), value));
        }

        match best {
            Some((_, MATCH)) => true,
            Some((start, PARTIAL)) => {
                let Some(forward) = self.forward.as_mut() else {
                    return false;
                };
                forward.reset();
                text.set_index(start);
                let mut result = MatchResult::NoValue;
                while let Some(ch) = text.next() {
                    result = forward.next_for_code_point(ch);
                    if !result.has_next() {
                        break;
                    }
                }
                result == MatchResult::FinalValue
            }
            _ => false,
        }
    }

    /// First unsuppressed boundary at or after the wrapped detector's answer.
    fn filter_forward(&mut self, candidate: Option<usize>) -> Option<usize> {
        if self.reverse.is_none() {
            return candidate;
        }
        let mut n = candidate?;
        self.sync_text();
        let len = self.inner.text().len();
        while n != len && self.is_exception_at(n) {
            trace!("suppressed break at {n}");
            n = self.inner.next()?;
        }
        Some(n)
    }

    /// Last unsuppressed boundary at or before the wrapped detector's answer.
    fn filter_backward(&mut self, candidate: Option<usize>) -> Option<usize> {
        if self.reverse.is_none() {
            return candidate;
        }
        let mut n = candidate?;
        self.sync_text();
        while n != 0 && self.is_exception_at(n) {
            trace!("suppressed break at {n}");
            n = self.inner.previous()?;
        }
        Some(n)
    }
}

impl<B: BreakIterator> BreakIterator for ExceptionFilter<B> {
    fn first(&mut self) -> usize {
        self.inner.first()
    }

    fn last(&mut self) -> usize {
        self.inner.last()
    }

    fn next(&mut self) -> Option<usize> {
        let candidate = self.inner.next();
        self.filter_forward(candidate)
    }

    fn next_by(&mut self, n: i32) -> Option<usize> {
        let candidate = self.inner.next_by(n);
        if n < 0 {
            self.filter_backward(candidate)
        } else {
            self.filter_forward(candidate)
        }
    }

    fn previous(&mut self) -> Option<usize> {
        let candidate = self.inner.previous();
        self.filter_backward(candidate)
    }

    fn following(&mut self, offset: usize) -> Option<usize> {
        let candidate = self.inner.following(offset);
        self.filter_forward(candidate)
    }

    fn preceding(&mut self, offset: usize) -> Option<usize> {
        let candidate = self.inner.preceding(offset);
        self.filter_backward(candidate)
    }

    fn is_boundary(&mut self, offset: usize) -> bool {
        if !self.inner.is_boundary(offset) {
            return false;
        }
        if self.reverse.is_none() || offset == 0 || offset >= self.inner.text().len() {
            return true;
        }
        self.sync_text();
        !self.is_exception_at(offset)
    }

    fn current(&self) -> usize {
        self.inner.current()
    }

    fn text(&self) -> &Arc<str> {
        self.inner.text()
    }

    fn set_text(&mut self, text: Arc<str>) {
        self.inner.set_text(text);
        self.text = None;
    }
}

//! Shared helpers for engine integration tests

#![allow(dead_code)]

use std::sync::Arc;

use dotstop_engine::{BoundaryList, BreakIterator};

/// Detector that proposes exactly the offsets it was given
pub struct ScriptedBreakIterator {
    text: Arc<str>,
    boundaries: BoundaryList,
}

impl ScriptedBreakIterator {
    /// Boundaries at 0, at the end, and at `offsets`
    pub fn new(text: &str, offsets: &[usize]) -> Self {
        let mut all = vec![0, text.len()];
        all.extend_from_slice(offsets);
        Self {
            text: Arc::from(text),
            boundaries: BoundaryList::new(all),
        }
    }

    /// Boundaries at 0, at the end, and after every space
    pub fn after_spaces(text: &str) -> Self {
        let offsets: Vec<usize> = text.match_indices(' ').map(|(i, _)| i + 1).collect();
        Self::new(text, &offsets)
    }
}

impl BreakIterator for ScriptedBreakIterator {
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
        self.boundaries = BoundaryList::new(vec![0, text.len()]);
        self.text = text;
    }
}

/// All boundaries walking forward from the first
pub fn forward(detector: &mut dyn BreakIterator) -> Vec<usize> {
    let mut found = vec![detector.first()];
    while let Some(offset) = detector.next() {
        found.push(offset);
    }
    found
}

/// All boundaries walking backward from the last, in ascending order
pub fn backward(detector: &mut dyn BreakIterator) -> Vec<usize> {
    let mut found = vec![detector.last()];
    while let Some(offset) = detector.previous() {
        found.push(offset);
    }
    found.reverse();
    found
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

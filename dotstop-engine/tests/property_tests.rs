//! Property-based tests for exception filtering

mod common;

use common::{backward, forward};
use dotstop_engine::*;
use proptest::prelude::*;

const ABBREVIATIONS: &[&str] = &[
    "Mr.", "Mrs.", "Dr.", "Ph.D.", "Ph.", "U.S.", "U.S.A.", "U.K.", "e.g.", "Mlle.", "é.",
];

const WORDS: &[&str] = &[
    "Smith", "went", "home.", "It", "rained!", "Why?", "café.", "Zoë", "ok", "D.", "A.",
];

fn arb_text() -> impl Strategy<Value = String> {
    let token = prop_oneof![
        prop::sample::select(ABBREVIATIONS),
        prop::sample::select(WORDS),
    ];
    let gap = prop::sample::select(&[" ", " ", " ", "  "][..]);
    prop::collection::vec((token, gap), 1..30).prop_map(|tokens| {
        tokens
            .into_iter()
            .map(|(token, gap)| format!("{token}{gap}"))
            .collect::<String>()
            .trim_end()
            .to_string()
    })
}

fn arb_builder() -> impl Strategy<Value = FilterBuilder> {
    prop::sample::subsequence(ABBREVIATIONS, 0..=ABBREVIATIONS.len()).prop_map(|exceptions| {
        let mut builder = FilterBuilder::new();
        for exception in exceptions {
            builder.suppress_break_after(exception);
        }
        builder
    })
}

proptest! {
    #[test]
    fn prop_filtered_boundaries_are_a_subset(text in arb_text(), builder in arb_builder()) {
        let inner = forward(&mut TerminatorBreakIterator::new(text.as_str()));
        let mut filter = builder.wrap(TerminatorBreakIterator::new(text.as_str())).unwrap();
        let filtered = forward(&mut filter);

        prop_assert_eq!(filtered.first(), Some(&0));
        prop_assert_eq!(filtered.last(), Some(&text.len()));
        for offset in &filtered {
            prop_assert!(inner.contains(offset), "{} not proposed by the detector", offset);
        }
        prop_assert!(filtered.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn prop_both_directions_agree(text in arb_text(), builder in arb_builder()) {
        let mut filter = builder.wrap(TerminatorBreakIterator::new(text.as_str())).unwrap();
        let ahead = forward(&mut filter);
        let behind = backward(&mut filter);
        prop_assert_eq!(ahead, behind);
    }

    #[test]
    fn prop_is_boundary_matches_iteration(text in arb_text(), builder in arb_builder()) {
        let inner = forward(&mut TerminatorBreakIterator::new(text.as_str()));
        let mut filter = builder.wrap(TerminatorBreakIterator::new(text.as_str())).unwrap();
        let filtered = forward(&mut filter);

        for offset in inner {
            prop_assert_eq!(filter.is_boundary(offset), filtered.contains(&offset), "offset {}", offset);
        }
    }

    #[test]
    fn prop_no_exceptions_is_identity(text in arb_text()) {
        let inner = forward(&mut TerminatorBreakIterator::new(text.as_str()));
        let mut filter = FilterBuilder::new()
            .wrap(TerminatorBreakIterator::new(text.as_str()))
            .unwrap();
        prop_assert_eq!(forward(&mut filter), inner);
    }
}

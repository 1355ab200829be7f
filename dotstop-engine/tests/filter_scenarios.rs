//! End-to-end filtering scenarios

mod common;

use common::{backward, forward, init_logging, ScriptedBreakIterator};
use dotstop_engine::*;

fn builder(exceptions: &[&str]) -> FilterBuilder {
    let mut builder = FilterBuilder::new();
    for exception in exceptions {
        builder.suppress_break_after(*exception);
    }
    builder
}

#[test]
fn test_title_before_name_is_suppressed() {
    init_logging();
    let text = "I saw Mrs. Smith today. She waved.";
    let inner = TerminatorBreakIterator::new(text);
    assert_eq!(inner.boundaries(), &[0, 11, 24, 34]);

    let mut filter = builder(&["Mrs."]).wrap(inner).unwrap();
    assert_eq!(forward(&mut filter), vec![0, 24, text.len()]);
    assert_eq!(backward(&mut filter), vec![0, 24, text.len()]);
}

#[test]
fn test_degree_resolved_through_forward_trie() {
    init_logging();
    let text = "He has a Ph.D. degree. Good.";
    // A detector that breaks inside "Ph.D." but not before "degree".
    let inner = ScriptedBreakIterator::new(text, &[12, 23]);

    let mut filter = builder(&["Ph.D."]).wrap(inner).unwrap();
    assert_eq!(forward(&mut filter), vec![0, 23, text.len()]);
    assert!(!filter.is_boundary(12));
    assert!(filter.is_boundary(23));

    let mut filter = builder(&["Ph.D."])
        .wrap(TerminatorBreakIterator::new(text))
        .unwrap();
    assert_eq!(forward(&mut filter), vec![0, 23, text.len()]);
}

#[test]
fn test_english_list_keeps_dotted_abbreviations_whole() {
    let builder = FilterBuilder::for_language("en").unwrap();
    for text in [
        "He lives in the U.S. now.",
        "She moved to the U.S.A. last year.",
        "Ask Jo Lee, D.D.S. for help.",
    ] {
        let mut filter = builder.wrap(TerminatorBreakIterator::new(text)).unwrap();
        assert_eq!(forward(&mut filter), vec![0, text.len()], "{text}");
    }

    let text = "Ask Dr. Lee, D.D.S. Then leave.";
    let mut filter = builder.wrap(TerminatorBreakIterator::new(text)).unwrap();
    assert_eq!(forward(&mut filter), vec![0, 20, text.len()]);
}

#[test]
fn test_consecutive_exceptions_are_all_suppressed() {
    init_logging();
    let text = "Mr. and Mrs. Brown arrived.";
    let inner = ScriptedBreakIterator::new(text, &[4, 13]);

    let mut filter = builder(&["Mr.", "Mrs."]).wrap(inner).unwrap();
    assert_eq!(forward(&mut filter), vec![0, text.len()]);
    assert_eq!(backward(&mut filter), vec![0, text.len()]);
    assert_eq!(filter.following(0), Some(text.len()));
    assert_eq!(filter.preceding(text.len()), Some(0));
}

#[test]
fn test_empty_builder_returns_same_detector() {
    let detector: Box<dyn BreakIterator> = Box::new(TerminatorBreakIterator::new("A. B."));
    let before = &*detector as *const dyn BreakIterator as *const ();

    let wrapped = FilterBuilder::new().wrap_iterator_with_filter(detector).unwrap();
    let after = &*wrapped as *const dyn BreakIterator as *const ();
    assert_eq!(before, after);
}

#[test]
fn test_boxed_filter_wraps_when_not_empty() {
    let text = "See Dr. Who. Then leave.";
    let detector: Box<dyn BreakIterator> = Box::new(TerminatorBreakIterator::new(text));
    let mut wrapped = builder(&["Dr."]).wrap_iterator_with_filter(detector).unwrap();
    assert_eq!(forward(&mut *wrapped), vec![0, 13, text.len()]);
}

#[test]
fn test_only_one_space_is_skipped() {
    let one = "Mrs. Smith";
    let mut filter = builder(&["Mrs."]).wrap(TerminatorBreakIterator::new(one)).unwrap();
    assert_eq!(forward(&mut filter), vec![0, one.len()]);

    let two = "Mrs.  Smith";
    let mut filter = builder(&["Mrs."]).wrap(TerminatorBreakIterator::new(two)).unwrap();
    assert_eq!(forward(&mut filter), vec![0, 6, two.len()]);
}

#[test]
fn test_candidate_directly_after_abbreviation() {
    let text = "Mr.Smith";
    let mut filter = builder(&["Mr."]).wrap(ScriptedBreakIterator::new(text, &[3])).unwrap();
    assert!(!filter.is_boundary(3));
    assert_eq!(forward(&mut filter), vec![0, text.len()]);
}

#[test]
fn test_end_of_text_is_never_suppressed() {
    let text = "Ask Mr.";
    let mut filter = builder(&["Mr."]).wrap(TerminatorBreakIterator::new(text)).unwrap();
    assert_eq!(filter.last(), text.len());
    assert!(filter.is_boundary(text.len()));
    assert_eq!(forward(&mut filter), vec![0, text.len()]);
}

#[test]
fn test_filtering_is_idempotent() {
    let text = "Mr. Smith met Dr. Jones. They talked. Prof. Lee left.";
    let mut filter = FilterBuilder::for_language("en")
        .unwrap()
        .wrap(TerminatorBreakIterator::new(text))
        .unwrap();
    let first = forward(&mut filter);
    let second = forward(&mut filter);
    assert_eq!(first, second);
    assert_eq!(first, vec![0, 25, 38, text.len()]);
    assert_eq!(backward(&mut filter), first);
}

#[test]
fn test_filtered_boundaries_are_a_subset() {
    let text = "Mr. A. B. Mrs. C. U.S. D.";
    let mut inner = ScriptedBreakIterator::after_spaces(text);
    let all = forward(&mut inner);

    let mut filter = FilterBuilder::for_language("en").unwrap().wrap(inner).unwrap();
    let kept = forward(&mut filter);
    assert!(kept.iter().all(|offset| all.contains(offset)));
    assert!(kept.len() < all.len());
    assert_eq!(kept.first(), Some(&0));
    assert_eq!(kept.last(), Some(&text.len()));
}

#[test]
fn test_next_by_filters_in_its_direction() {
    let text = "Mr. and Mrs. Brown arrived.";
    let mut filter = builder(&["Mrs."])
        .wrap(ScriptedBreakIterator::new(text, &[4, 8, 13, 19]))
        .unwrap();
    filter.first();
    // Two steps land on 8, which is kept.
    assert_eq!(filter.next_by(2), Some(8));
    // One more lands on 13, suppressed, so the filter moves on to 19.
    assert_eq!(filter.next_by(1), Some(19));
    // Stepping back lands on 13 again and keeps going back to 8.
    assert_eq!(filter.next_by(-1), Some(8));
}

#[test]
fn test_set_text_through_filter() {
    let mut filter = builder(&["Mrs."])
        .wrap(TerminatorBreakIterator::new("Hi."))
        .unwrap();
    filter.set_text("Mrs. Smith. Bye.".into());
    assert_eq!(&**filter.text(), "Mrs. Smith. Bye.");
    assert_eq!(forward(&mut filter), vec![0, 12, 16]);
    assert_eq!(filter.into_inner().boundaries(), &[0, 5, 12, 16]);
}

#[test]
fn test_german_abbreviations() {
    let text = "Der Preis inkl. MwSt. ist gut. Danke.";
    let mut filter = builder(&["inkl.", "MwSt."])
        .wrap(ScriptedBreakIterator::new(text, &[16, 22, 31]))
        .unwrap();
    assert_eq!(forward(&mut filter), vec![0, 31, text.len()]);
}

#[test]
fn test_multibyte_text_before_candidate() {
    let text = "Voir Mlle. Dupré. Fin.";
    let mut filter = builder(&["Mlle.", "é."])
        .wrap(TerminatorBreakIterator::new(text))
        .unwrap();
    // "Dupré." ends in an exception too, so only the end survives.
    assert_eq!(forward(&mut filter), vec![0, text.len()]);
}

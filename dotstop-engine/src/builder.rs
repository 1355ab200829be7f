//! Exception filter construction

use std::collections::BTreeSet;

use dotstop_trie::{BuildMode, TrieBuilder};
use log::debug;

use crate::config::{get_exception_config, ExceptionConfig};
use crate::detector::BreakIterator;
use crate::error::Result;
use crate::filter::{ExceptionFilter, ExceptionTries, MATCH, PARTIAL};

const DEFAULT_SEPARATOR: char = '.';

/// Collects exception strings and turns them into an [`ExceptionFilter`]
///
/// A string such as `"Mr."` suppresses a break right after it. Strings
/// containing the separator before their last character (`"Ph.D."`) are
/// matched in two steps: their first segment backward, then the whole string
/// forward.
#[derive(Debug, Clone)]
pub struct FilterBuilder {
    filter_set: BTreeSet<String>,
    separator: char,
}

impl Default for FilterBuilder {
    fn default() -> Self {
        Self {
            filter_set: BTreeSet::new(),
            separator: DEFAULT_SEPARATOR,
        }
    }
}

impl FilterBuilder {
    /// Create a builder with no exceptions
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a builder from an exception list
    pub fn from_config(config: &ExceptionConfig) -> Self {
        let mut builder = Self::new().with_separator(config.exceptions.separator);
        for exception in &config.exceptions.suppress_after {
            builder.suppress_break_after(exception.as_str());
        }
        builder
    }

    /// Seed a builder from the embedded list for a language code
    pub fn for_language(code: &str) -> Result<Self> {
        let config = get_exception_config(code)?;
        Ok(Self::from_config(config))
    }

    /// Split exceptions on `separator` instead of `.`
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Suppress breaks after `exception`; false if it was already present
    pub fn suppress_break_after(&mut self, exception: impl Into<String>) -> bool {
        self.filter_set.insert(exception.into())
    }

    /// Stop suppressing breaks after `exception`; false if it was absent
    pub fn unsuppress_break_after(&mut self, exception: &str) -> bool {
        self.filter_set.remove(exception)
    }

    /// Number of exceptions
    pub fn len(&self) -> usize {
        self.filter_set.len()
    }

    /// True when no exception was added
    pub fn is_empty(&self) -> bool {
        self.filter_set.is_empty()
    }

    /// Exceptions in ascending order
    pub fn exceptions(&self) -> impl Iterator<Item = &str> {
        self.filter_set.iter().map(String::as_str)
    }

    /// Build the reverse and forward tries for the current exceptions.
    ///
    /// A trie that would be empty is left out.
    pub fn build_tries(&self) -> Result<ExceptionTries> {
        let exceptions: Vec<&str> = self.exceptions().collect();
        let partial = self.mark_partial(&exceptions);

        let mut reverse = TrieBuilder::new();
        let mut forward = TrieBuilder::new();
        for (exception, partial) in exceptions.iter().zip(&partial) {
            match partial {
                Partial::No => {
                    reverse.add(&reversed(exception), MATCH)?;
                }
                Partial::FirstOfPrefix(prefix) => {
                    reverse.add(&reversed(prefix), PARTIAL)?;
                    forward.add(exception, MATCH)?;
                }
                Partial::SharesPrefix => {
                    forward.add(exception, MATCH)?;
                }
            }
        }

        debug!(
            "building exception tries: {} reverse entries, {} forward entries",
            reverse.len(),
            forward.len()
        );
        Ok(ExceptionTries {
            reverse: build_if_any(&mut reverse)?,
            forward: build_if_any(&mut forward)?,
        })
    }

    /// Decide which exceptions go through the forward trie.
    ///
    /// An exception with the separator before its last character is partial,
    /// and so is every exception sharing its prefix up to that separator. Each
    /// distinct prefix goes into the reverse trie once, on behalf of the
    /// first exception that introduced it.
    fn mark_partial<'a>(&self, exceptions: &[&'a str]) -> Vec<Partial<'a>> {
        let mut partial = vec![Partial::No; exceptions.len()];
        for (i, exception) in exceptions.iter().enumerate() {
            let Some(at) = exception.find(self.separator) else {
                continue;
            };
            let prefix_len = at + self.separator.len_utf8();
            if prefix_len == exception.len() {
                continue;
            }
            let prefix = &exception[..prefix_len];

            let mut already_added = false;
            for (j, other) in exceptions.iter().enumerate() {
                if j == i || !other.starts_with(prefix) {
                    continue;
                }
                if partial[j] == Partial::No {
                    partial[j] = Partial::SharesPrefix;
                } else {
                    already_added = true;
                }
            }
            if !already_added && partial[i] == Partial::No {
                partial[i] = Partial::FirstOfPrefix(prefix);
            }
        }
        partial
    }

    /// Wrap `inner` in an [`ExceptionFilter`] over the current exceptions
    pub fn wrap<B: BreakIterator>(&self, inner: B) -> Result<ExceptionFilter<B>> {
        Ok(ExceptionFilter::new(inner, self.build_tries()?))
    }

    /// Wrap a boxed detector; without exceptions the same box comes back.
    pub fn wrap_iterator_with_filter(
        &self,
        detector: Box<dyn BreakIterator>,
    ) -> Result<Box<dyn BreakIterator>> {
        if self.is_empty() {
            return Ok(detector);
        }
        Ok(Box::new(self.wrap(detector)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Partial<'a> {
    No,
    /// Adds `prefix` to the reverse trie
    FirstOfPrefix(&'a str),
    SharesPrefix,
}

fn reversed(s: &str) -> String {
    s.chars().rev().collect()
}

fn build_if_any(builder: &mut TrieBuilder) -> Result<Option<dotstop_trie::UnitTrie>> {
    if builder.is_empty() {
        return Ok(None);
    }
    Ok(Some(builder.build(BuildMode::Fast)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder(exceptions: &[&str]) -> FilterBuilder {
        let mut builder = FilterBuilder::new();
        for exception in exceptions {
            builder.suppress_break_after(*exception);
        }
        builder
    }

    #[test]
    fn test_set_semantics() {
        let mut builder = FilterBuilder::new();
        assert!(builder.suppress_break_after("Mr."));
        assert!(!builder.suppress_break_after("Mr."));
        assert!(builder.unsuppress_break_after("Mr."));
        assert!(!builder.unsuppress_break_after("Mr."));
        assert!(builder.is_empty());
    }

    #[test]
    fn test_plain_exceptions_go_reverse() {
        let tries = builder(&["Mr.", "Mrs."]).build_tries().unwrap();
        let reverse = tries.reverse.unwrap();
        assert_eq!(reverse.get(".rM"), Some(MATCH));
        assert_eq!(reverse.get(".srM"), Some(MATCH));
        assert!(tries.forward.is_none());
    }

    #[test]
    fn test_internal_separator_is_partial() {
        let tries = builder(&["Ph.D."]).build_tries().unwrap();
        let reverse = tries.reverse.unwrap();
        assert_eq!(reverse.get(".hP"), Some(PARTIAL));
        assert_eq!(reverse.get(".D.hP"), None);
        assert_eq!(tries.forward.unwrap().get("Ph.D."), Some(MATCH));
    }

    #[test]
    fn test_siblings_share_one_prefix() {
        let tries = builder(&["U.S.", "U.S.A.", "U.K.", "Ut."]).build_tries().unwrap();
        let reverse: Vec<(Vec<u16>, i32)> = tries.reverse.unwrap().entries().collect();
        let expected = vec![
            (".U".encode_utf16().collect::<Vec<u16>>(), PARTIAL),
            (".tU".encode_utf16().collect(), MATCH),
        ];
        assert_eq!(reverse, expected);

        let forward = tries.forward.unwrap();
        for exception in ["U.K.", "U.S.", "U.S.A."] {
            assert_eq!(forward.get(exception), Some(MATCH), "{exception}");
        }
    }

    #[test]
    fn test_prefix_equal_to_exception_is_not_duplicated() {
        // "Ph." is both an exception and the prefix of "Ph.D.".
        let tries = builder(&["Ph.", "Ph.D."]).build_tries().unwrap();
        assert_eq!(tries.reverse.unwrap().get(".hP"), Some(PARTIAL));
        let forward = tries.forward.unwrap();
        assert_eq!(forward.get("Ph."), Some(MATCH));
        assert_eq!(forward.get("Ph.D."), Some(MATCH));
    }

    #[test]
    fn test_custom_separator() {
        let tries = builder(&["z.B", "Abs:x:"])
            .with_separator(':')
            .build_tries()
            .unwrap();
        assert_eq!(tries.reverse.as_ref().unwrap().get("B.z"), Some(MATCH));
        assert_eq!(tries.reverse.as_ref().unwrap().get(":sbA"), Some(PARTIAL));
        assert_eq!(tries.forward.unwrap().get("Abs:x:"), Some(MATCH));
    }

    #[test]
    fn test_empty_builder_has_no_tries() {
        let tries = FilterBuilder::new().build_tries().unwrap();
        assert!(tries.is_empty());
    }

    #[test]
    fn test_supplementary_characters_reverse_by_code_point() {
        let tries = builder(&["😀x."]).build_tries().unwrap();
        assert_eq!(tries.reverse.unwrap().get(".x😀"), Some(MATCH));
    }
}

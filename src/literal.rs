//! A minimal token vocabulary: `<word>` matches one input element equal
//! to `word`. Not part of the core engine — a demo/test collaborator
//! in the same role as the teacher's `lexer::token` module, used by the
//! CLI reference harness and by the facade's end-to-end tests.

use std::sync::Arc;

use crate::expr::Predicate;
use crate::FactoryResult;

/// Builds a factory where a token body `w` matches any input element
/// equal to `w` under `==`, for a `String`-tokenized input sequence.
pub fn literal_word_factory() -> impl Fn(&str) -> FactoryResult<String> + Send + Sync {
    |raw: &str| {
        let word = raw.to_string();
        let predicate: Predicate<String> = Arc::new(move |element: &String| *element == word);
        Ok(predicate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_equal_words_only() {
        let factory = literal_word_factory();
        let predicate = factory("cat").unwrap();
        assert!(predicate(&"cat".to_string()));
        assert!(!predicate(&"dog".to_string()));
    }
}

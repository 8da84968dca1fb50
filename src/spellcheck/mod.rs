//! Interactive spell-checking of reconstructed chapter text.
//!
//! Detection ([`scan`]) finds every occurrence of a word the dictionary does
//! not know; resolution ([`SpellChecker::check`]) walks those occurrences and
//! applies the user's decisions, remembering ignore-all and replace-all
//! choices for the rest of the run.

mod dictionary;
mod engine;
mod prompter;
mod tokenizer;

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub use dictionary::{Dictionary, SymSpellDictionary, UserDictionary};
pub use engine::{DecisionMemory, Replacement, SpellChecker};
pub use prompter::{Answer, Prompter, ScriptedPrompter, TerminalPrompter};
pub use tokenizer::{
    depunctuate_leading, depunctuate_trailing, is_punctuation, scan, Token, UnknownWord,
};

#[derive(Debug, Error)]
pub enum SpellCheckError {
    #[error("dictionary file {path:?}: {source}")]
    Dictionary {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("prompt I/O error: {0}")]
    Prompt(#[from] io::Error),

    #[error("prompt input closed")]
    InputClosed,

    #[error("choice {choice} is not one of the {options} options")]
    InvalidChoice { choice: usize, options: usize },

    #[error("expected {expected} answer from script")]
    UnexpectedAnswer { expected: &'static str },
}

pub type Result<T> = std::result::Result<T, SpellCheckError>;

#[cfg(test)]
pub(crate) mod test_support {
    use super::Dictionary;
    use std::collections::{HashMap, HashSet};

    /// Fixed word set with canned suggestions
    #[derive(Debug, Default)]
    pub struct WordSet {
        pub words: HashSet<String>,
        pub suggestions: HashMap<String, Vec<String>>,
    }

    impl WordSet {
        pub fn new(words: &[&str]) -> Self {
            Self {
                words: words.iter().map(|w| w.to_lowercase()).collect(),
                suggestions: HashMap::new(),
            }
        }

        pub fn suggest(mut self, word: &str, candidates: &[&str]) -> Self {
            self.suggestions.insert(
                word.to_string(),
                candidates.iter().map(|c| c.to_string()).collect(),
            );
            self
        }
    }

    impl Dictionary for WordSet {
        fn is_known(&self, word: &str) -> bool {
            !super::dictionary::should_check(word) || self.words.contains(&word.to_lowercase())
        }

        fn candidates(&self, word: &str) -> Vec<String> {
            self.suggestions.get(word).cloned().unwrap_or_default()
        }

        fn add(&mut self, word: &str) {
            self.words.insert(word.to_lowercase());
        }
    }
}

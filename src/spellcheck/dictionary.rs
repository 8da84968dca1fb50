use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use symspell::{AsciiStringStrategy, SymSpell, Verbosity};
use tracing::{debug, info};

use super::tokenizer::is_punctuation;
use super::{Result, SpellCheckError};

/// Spelling oracle consulted by the scanner and the resolution loop
pub trait Dictionary {
    fn is_known(&self, word: &str) -> bool;

    /// Subset of `words` the dictionary does not know
    fn unknown(&self, words: &[&str]) -> HashSet<String> {
        words
            .iter()
            .filter(|word| !self.is_known(word))
            .map(|word| word.to_string())
            .collect()
    }

    /// Replacement candidates, best first
    fn candidates(&self, word: &str) -> Vec<String>;

    /// Learn a word for the rest of the session
    fn add(&mut self, word: &str);
}

/// Whether a word needs a dictionary lookup at all. Empty strings, lone
/// punctuation marks and numbers never do.
pub fn should_check(word: &str) -> bool {
    let mut chars = word.chars();
    match (chars.next(), chars.next()) {
        (None, _) => false,
        (Some(c), None) if is_punctuation(c) => false,
        _ => !(word.chars().any(|c| c.is_ascii_digit()) && word.parse::<f64>().is_ok()),
    }
}

/// Dictionary backed by a SymSpell index; lookups are case-insensitive
pub struct SymSpellDictionary {
    symspell: SymSpell<AsciiStringStrategy>,
    len: usize,
}

impl std::fmt::Debug for SymSpellDictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymSpellDictionary")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

impl SymSpellDictionary {
    pub const MAX_EDIT_DISTANCE: i64 = 2;

    pub fn new() -> Self {
        Self {
            symspell: SymSpell::default(),
            len: 0,
        }
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dictionary = Self::new();
        dictionary.extend(words);
        dictionary
    }

    /// Number of entries loaded, duplicates included
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Add one word with a frequency count; blank or multi-word input is ignored
    pub fn insert(&mut self, word: &str, count: u64) -> bool {
        let word = word.trim().to_lowercase();
        if word.is_empty() || word.contains(char::is_whitespace) {
            return false;
        }
        let line = format!("{} {}", word, count.max(1));
        let loaded = self.symspell.load_dictionary_line(&line, 0, 1, " ");
        if loaded {
            self.len += 1;
        }
        loaded
    }

    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            self.insert(word.as_ref(), 1);
        }
    }

    /// Load a word list: one word per line, optionally followed by a
    /// frequency count ("the 23135851162")
    pub fn load_word_list(&mut self, path: &Path) -> Result<usize> {
        let text = fs::read_to_string(path).map_err(|source| SpellCheckError::Dictionary {
            path: path.to_path_buf(),
            source,
        })?;

        let before = self.len;
        for line in text.lines() {
            let mut fields = line.split_whitespace();
            if let Some(word) = fields.next() {
                let count = fields.next().and_then(|c| c.parse().ok()).unwrap_or(1);
                self.insert(word, count);
            }
        }

        let loaded = self.len - before;
        info!("Loaded {} words from {:?}", loaded, path);
        Ok(loaded)
    }
}

impl Default for SymSpellDictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl Dictionary for SymSpellDictionary {
    fn is_known(&self, word: &str) -> bool {
        if !should_check(word) {
            return true;
        }
        !self
            .symspell
            .lookup(&word.to_lowercase(), Verbosity::Top, 0)
            .is_empty()
    }

    fn candidates(&self, word: &str) -> Vec<String> {
        let capitalized = word.chars().next().is_some_and(char::is_uppercase);

        self.symspell
            .lookup(&word.to_lowercase(), Verbosity::Closest, Self::MAX_EDIT_DISTANCE)
            .into_iter()
            .filter(|suggestion| suggestion.distance > 0)
            .map(|suggestion| {
                if capitalized {
                    capitalize(&suggestion.term)
                } else {
                    suggestion.term
                }
            })
            .collect()
    }

    fn add(&mut self, word: &str) {
        debug!("Adding {:?} to the session dictionary", word);
        self.insert(word, 1);
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Newline-delimited file of words the user taught the dictionary.
///
/// Appends are not deduplicated and not locked against concurrent runs.
#[derive(Debug, Clone)]
pub struct UserDictionary {
    path: PathBuf,
}

impl UserDictionary {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored words. A missing file is created empty and read
    /// once more; a second failure is returned.
    pub fn load(&self) -> Result<Vec<String>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("Creating user dictionary: {:?}", self.path);
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.path)
                    .map_err(|source| self.error(source))?;
                fs::read_to_string(&self.path).map_err(|source| self.error(source))?
            }
            Err(source) => return Err(self.error(source)),
        };

        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Append words, one per line. Nothing is written for an empty list.
    pub fn append(&self, words: &[String]) -> Result<()> {
        if words.is_empty() {
            return Ok(());
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| self.error(source))?;

        writeln!(file, "{}", words.join("\n")).map_err(|source| self.error(source))?;
        info!("Saved {} words to {:?}", words.len(), self.path);
        Ok(())
    }

    fn error(&self, source: io::Error) -> SpellCheckError {
        SpellCheckError::Dictionary {
            path: self.path.clone(),
            source,
        }
    }
}

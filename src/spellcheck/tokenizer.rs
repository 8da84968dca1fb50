use std::collections::HashMap;

use super::dictionary::Dictionary;

/// ASCII punctuation plus the em dash
const PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~\u{2014}";

/// Number of tokens of context shown on each side of a flagged word
pub const CONTEXT_WORDS: usize = 10;

pub fn is_punctuation(c: char) -> bool {
    PUNCTUATION.contains(c)
}

/// Split a token into its leading punctuation and the rest.
///
/// Single characters and all-punctuation tokens are returned untouched.
pub fn depunctuate_leading(token: &str) -> (&str, &str) {
    if token.chars().nth(1).is_none() {
        return ("", token);
    }
    match token.find(|c: char| !is_punctuation(c)) {
        Some(end) => token.split_at(end),
        None => ("", token),
    }
}

/// Split a token into the rest and its trailing punctuation.
pub fn depunctuate_trailing(token: &str) -> (&str, &str) {
    if token.chars().nth(1).is_none() {
        return (token, "");
    }
    match token.char_indices().rev().find(|(_, c)| !is_punctuation(*c)) {
        Some((i, c)) => token.split_at(i + c.len_utf8()),
        None => (token, ""),
    }
}

/// One space-separated token with its punctuation peeled off
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub leading: String,
    pub core: String,
    pub trailing: String,
    /// Empty or punctuation-only token, kept only to hold its index
    pub placeholder: bool,
}

impl Token {
    pub fn parse(raw: &str) -> Self {
        let punctuation_only = raw.chars().count() > 1 && raw.chars().all(is_punctuation);
        if raw.is_empty() || punctuation_only {
            return Self {
                leading: String::new(),
                core: raw.to_string(),
                trailing: String::new(),
                placeholder: true,
            };
        }

        let (leading, rest) = depunctuate_leading(raw);
        let (core, trailing) = depunctuate_trailing(rest);
        Self {
            leading: leading.to_string(),
            core: core.to_string(),
            trailing: trailing.to_string(),
            placeholder: false,
        }
    }

    pub fn as_written(&self) -> String {
        format!("{}{}{}", self.leading, self.core, self.trailing)
    }
}

/// One occurrence of a word the dictionary does not know
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownWord {
    pub word: String,
    pub context_before: Vec<String>,
    pub context_after: Vec<String>,
    /// Token index within the scanned text
    pub position: usize,
    pub leading: String,
    pub trailing: String,
    pub suggestions: Vec<String>,
}

impl UnknownWord {
    /// The token exactly as it appeared in the text
    pub fn as_written(&self) -> String {
        format!("{}{}{}", self.leading, self.word, self.trailing)
    }
}

/// True for hyphenated words whose parts are all known ("well-known").
/// Em dashes count as hyphens; empty parts are ignored.
fn is_known_compound<D: Dictionary + ?Sized>(word: &str, dictionary: &D) -> bool {
    let normalized = word.replace('\u{2014}', "-");
    if !normalized.contains('-') {
        return false;
    }
    let parts: Vec<&str> = normalized.split('-').filter(|p| !p.is_empty()).collect();
    !parts.is_empty() && dictionary.unknown(&parts).is_empty()
}

/// Find every occurrence of an unknown word in `text`, in reading order.
///
/// Tokens come from splitting on single spaces, so positions line up with
/// `text.split(' ')`. A word that occurs several times yields one entry per
/// position.
pub fn scan<D: Dictionary + ?Sized>(text: &str, dictionary: &D) -> Vec<UnknownWord> {
    let raw: Vec<&str> = text.split(' ').collect();
    let tokens: Vec<Token> = raw.iter().map(|t| Token::parse(t)).collect();

    let words: Vec<&str> = tokens
        .iter()
        .filter(|t| !t.placeholder)
        .map(|t| t.core.as_str())
        .collect();

    let mut unknown = dictionary.unknown(&words);
    unknown.retain(|word| !is_known_compound(word, dictionary));

    let mut suggestions: HashMap<&str, Vec<String>> = HashMap::new();
    let mut occurrences = Vec::new();

    for (position, token) in tokens.iter().enumerate() {
        if token.placeholder || !unknown.contains(&token.core) {
            continue;
        }

        let candidates = suggestions
            .entry(token.core.as_str())
            .or_insert_with(|| dictionary.candidates(&token.core))
            .clone();

        let before_start = position.saturating_sub(CONTEXT_WORDS);
        let after_end = (position + 1 + CONTEXT_WORDS).min(raw.len());

        occurrences.push(UnknownWord {
            word: token.core.clone(),
            context_before: raw[before_start..position].iter().map(|s| s.to_string()).collect(),
            context_after: raw[position + 1..after_end].iter().map(|s| s.to_string()).collect(),
            position,
            leading: token.leading.clone(),
            trailing: token.trailing.clone(),
            suggestions: candidates,
        });
    }

    occurrences
}

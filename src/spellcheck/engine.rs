use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, info};

use super::dictionary::{Dictionary, UserDictionary};
use super::prompter::Prompter;
use super::tokenizer::{scan, UnknownWord};
use super::{Result, SpellCheckError};

/// Suggestions offered per flagged word
pub const MAX_SUGGESTIONS: usize = 4;

const FIXED_OPTIONS: [&str; 4] = [
    "[Ignore]",
    "[Ignore all]",
    "[Add to dictionary]",
    "[Choose custom word]",
];

/// A replacement chosen for a word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub text: String,
    /// Keep the occurrence's own surrounding punctuation
    pub keep_punctuation: bool,
}

impl Replacement {
    fn render(&self, occurrence: &UnknownWord) -> String {
        if self.keep_punctuation {
            format!("{}{}{}", occurrence.leading, self.text, occurrence.trailing)
        } else {
            self.text.clone()
        }
    }
}

/// Decisions that outlive a single chapter
#[derive(Debug, Default, Clone)]
pub struct DecisionMemory {
    pub ignore_all: HashSet<String>,
    pub replacements: HashMap<String, Replacement>,
    /// Words taught to the dictionary, in the order they were added
    pub additions: Vec<String>,
}

/// Interactive spell-checker for one run over a book
pub struct SpellChecker<D: Dictionary> {
    dictionary: D,
    memory: DecisionMemory,
    store: Option<UserDictionary>,
}

impl<D: Dictionary> SpellChecker<D> {
    pub fn new(dictionary: D) -> Self {
        Self {
            dictionary,
            memory: DecisionMemory::default(),
            store: None,
        }
    }

    /// Persist dictionary additions to `store` when the run finishes
    pub fn with_store(mut self, store: UserDictionary) -> Self {
        self.store = Some(store);
        self
    }

    pub fn dictionary(&self) -> &D {
        &self.dictionary
    }

    pub fn memory(&self) -> &DecisionMemory {
        &self.memory
    }

    /// Resolve every unknown word in `text` and return the corrected text.
    ///
    /// Occurrences are handled in reading order. Ignore-all and replace-all
    /// decisions from earlier calls are applied without prompting.
    pub fn check(&mut self, text: &str, prompter: &mut dyn Prompter) -> Result<String> {
        let mut queue: VecDeque<UnknownWord> = scan(text, &self.dictionary).into();
        let mut buffer: Vec<String> = text.split(' ').map(str::to_string).collect();
        debug!("{} unknown word occurrences", queue.len());

        while let Some(current) = queue.pop_front() {
            if self.memory.ignore_all.contains(&current.word) {
                drop_word(&mut queue, &current.word);
                continue;
            }

            if let Some(replacement) = self.memory.replacements.get(&current.word).cloned() {
                replace_all(&mut buffer, &mut queue, &current, &replacement);
                continue;
            }

            prompter.show(&current)?;

            let mut options: Vec<String> = FIXED_OPTIONS.iter().map(|o| o.to_string()).collect();
            options.extend(current.suggestions.iter().take(MAX_SUGGESTIONS).cloned());

            match prompter.choose("Suggestions", &options)? {
                0 => {}
                1 => {
                    drop_word(&mut queue, &current.word);
                    self.memory.ignore_all.insert(current.word.clone());
                }
                2 => {
                    self.dictionary.add(&current.word);
                    drop_word(&mut queue, &current.word);
                    self.memory.additions.push(current.word.clone());
                }
                3 => {
                    let punctuation = prompter.choose("Replace punctuation also?", &yes_no())?;
                    let text = prompter.input("Type the correct word")?;
                    let replacement = Replacement {
                        text,
                        keep_punctuation: punctuation == 0,
                    };
                    self.apply(&mut buffer, &mut queue, current, replacement, prompter)?;
                }
                choice => {
                    let text = current.suggestions.get(choice - FIXED_OPTIONS.len()).cloned().ok_or(
                        SpellCheckError::InvalidChoice {
                            choice,
                            options: options.len(),
                        },
                    )?;
                    let replacement = Replacement {
                        text,
                        keep_punctuation: true,
                    };
                    self.apply(&mut buffer, &mut queue, current, replacement, prompter)?;
                }
            }
        }

        Ok(buffer.join(" "))
    }

    fn apply(
        &mut self,
        buffer: &mut [String],
        queue: &mut VecDeque<UnknownWord>,
        current: UnknownWord,
        replacement: Replacement,
        prompter: &mut dyn Prompter,
    ) -> Result<()> {
        if prompter.choose("Replace all instances?", &yes_no())? == 1 {
            replace_all(buffer, queue, &current, &replacement);
            self.memory.replacements.insert(current.word, replacement);
        } else {
            buffer[current.position] = replacement.render(&current);
        }
        Ok(())
    }

    /// End the run: append the words added during it to the user dictionary
    pub fn finish(self) -> Result<DecisionMemory> {
        if let Some(store) = &self.store {
            store.append(&self.memory.additions)?;
        }
        info!(
            "Spell-check finished: {} ignored, {} replaced, {} added",
            self.memory.ignore_all.len(),
            self.memory.replacements.len(),
            self.memory.additions.len()
        );
        Ok(self.memory)
    }
}

fn yes_no() -> Vec<String> {
    vec!["No".to_string(), "Yes".to_string()]
}

fn drop_word(queue: &mut VecDeque<UnknownWord>, word: &str) {
    queue.retain(|occurrence| occurrence.word != word);
}

/// Replace `current` and every queued occurrence of the same word
fn replace_all(
    buffer: &mut [String],
    queue: &mut VecDeque<UnknownWord>,
    current: &UnknownWord,
    replacement: &Replacement,
) {
    buffer[current.position] = replacement.render(current);
    for occurrence in queue.iter().filter(|o| o.word == current.word) {
        buffer[occurrence.position] = replacement.render(occurrence);
    }
    drop_word(queue, &current.word);
}

use std::collections::VecDeque;
use std::io::{self, BufRead, StdinLock, Stdout, Write};

use super::tokenizer::UnknownWord;
use super::{Result, SpellCheckError};

/// User interaction needed by the resolution loop
pub trait Prompter {
    /// Present a flagged word in its context
    fn show(&mut self, occurrence: &UnknownWord) -> Result<()>;

    /// Pick one of `options`, returning its index
    fn choose(&mut self, title: &str, options: &[String]) -> Result<usize>;

    /// Free-text answer
    fn input(&mut self, prompt: &str) -> Result<String>;
}

/// Numbered menus on a terminal.
///
/// Non-numeric or out-of-range answers print an error and ask again; only a
/// closed input stream ends the prompt with an error.
pub struct TerminalPrompter<R, W> {
    reader: R,
    writer: W,
}

impl TerminalPrompter<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(SpellCheckError::InputClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn show(&mut self, occurrence: &UnknownWord) -> Result<()> {
        writeln!(
            self.writer,
            "\n{} {}\x1b[1;31m{}\x1b[0m{} {}",
            occurrence.context_before.join(" "),
            occurrence.leading,
            occurrence.word,
            occurrence.trailing,
            occurrence.context_after.join(" ")
        )?;
        Ok(())
    }

    fn choose(&mut self, title: &str, options: &[String]) -> Result<usize> {
        if options.is_empty() {
            return Err(SpellCheckError::InvalidChoice { choice: 0, options: 0 });
        }

        loop {
            writeln!(self.writer, "=== {} ===", title)?;
            for (n, option) in options.iter().enumerate() {
                writeln!(self.writer, "[{}] {}", n, option)?;
            }
            write!(self.writer, "\n[>] ")?;
            self.writer.flush()?;

            match self.read_line()?.trim().parse::<usize>() {
                Ok(choice) if choice < options.len() => return Ok(choice),
                _ => {
                    writeln!(self.writer, "=== ERROR! ===")?;
                    writeln!(self.writer, "Please choose one of the provided options.\n")?;
                }
            }
        }
    }

    fn input(&mut self, prompt: &str) -> Result<String> {
        write!(self.writer, "{} [>] ", prompt)?;
        self.writer.flush()?;
        self.read_line()
    }
}

/// One pre-recorded answer for [`ScriptedPrompter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Choice(usize),
    Text(String),
}

/// Replays a fixed list of answers; used for headless runs and tests
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    /// Words shown so far, in order
    pub shown: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            shown: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn show(&mut self, occurrence: &UnknownWord) -> Result<()> {
        self.shown.push(occurrence.word.clone());
        Ok(())
    }

    fn choose(&mut self, _title: &str, options: &[String]) -> Result<usize> {
        match self.answers.pop_front() {
            Some(Answer::Choice(choice)) if choice < options.len() => Ok(choice),
            Some(Answer::Choice(choice)) => Err(SpellCheckError::InvalidChoice {
                choice,
                options: options.len(),
            }),
            Some(Answer::Text(_)) => Err(SpellCheckError::UnexpectedAnswer { expected: "a choice" }),
            None => Err(SpellCheckError::InputClosed),
        }
    }

    fn input(&mut self, _prompt: &str) -> Result<String> {
        match self.answers.pop_front() {
            Some(Answer::Text(text)) => Ok(text),
            Some(Answer::Choice(_)) => Err(SpellCheckError::UnexpectedAnswer { expected: "text" }),
            None => Err(SpellCheckError::InputClosed),
        }
    }
}

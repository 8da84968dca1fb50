use thiserror::Error;

/// Error returned when a string is neither digits nor English number words
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseNumberError {
    #[error("no number words found in {0:?}")]
    Empty(String),
    #[error("unrecognized text {rest:?} in {input:?}")]
    UnknownWord { input: String, rest: String },
    #[error("number {0:?} is too large")]
    Overflow(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberWord {
    Value(u64),
    Hundred,
    Scale(u64),
    And,
}

const NUMBER_WORDS: &[(&str, NumberWord)] = &[
    ("zero", NumberWord::Value(0)),
    ("one", NumberWord::Value(1)),
    ("two", NumberWord::Value(2)),
    ("three", NumberWord::Value(3)),
    ("four", NumberWord::Value(4)),
    ("five", NumberWord::Value(5)),
    ("six", NumberWord::Value(6)),
    ("seven", NumberWord::Value(7)),
    ("eight", NumberWord::Value(8)),
    ("nine", NumberWord::Value(9)),
    ("ten", NumberWord::Value(10)),
    ("eleven", NumberWord::Value(11)),
    ("twelve", NumberWord::Value(12)),
    ("thirteen", NumberWord::Value(13)),
    ("fourteen", NumberWord::Value(14)),
    ("fifteen", NumberWord::Value(15)),
    ("sixteen", NumberWord::Value(16)),
    ("seventeen", NumberWord::Value(17)),
    ("eighteen", NumberWord::Value(18)),
    ("nineteen", NumberWord::Value(19)),
    ("twenty", NumberWord::Value(20)),
    ("thirty", NumberWord::Value(30)),
    ("forty", NumberWord::Value(40)),
    ("fifty", NumberWord::Value(50)),
    ("sixty", NumberWord::Value(60)),
    ("seventy", NumberWord::Value(70)),
    ("eighty", NumberWord::Value(80)),
    ("ninety", NumberWord::Value(90)),
    ("hundred", NumberWord::Hundred),
    ("thousand", NumberWord::Scale(1_000)),
    ("million", NumberWord::Scale(1_000_000)),
    ("billion", NumberWord::Scale(1_000_000_000)),
    ("and", NumberWord::And),
];

/// Parse a cardinal number written as digits ("12") or English words
/// ("twelve", "twenty-one", "one hundred and five").
///
/// Spaces are optional between words, so the space-stripped form used for
/// heading detection ("twentyone") parses as well.
pub fn parse_number(input: &str) -> Result<u64, ParseNumberError> {
    let trimmed = input.trim();

    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        return trimmed
            .parse::<u64>()
            .map_err(|_| ParseNumberError::Overflow(input.to_string()));
    }

    let words = segment(input)?;
    combine(input, &words)
}

/// Split lower-cased text into number words, longest match first.
fn segment(input: &str) -> Result<Vec<NumberWord>, ParseNumberError> {
    let lowered = input.to_lowercase();
    let mut rest = lowered.as_str();
    let mut words = Vec::new();

    loop {
        rest = rest.trim_start_matches(|c: char| c == '-' || c.is_whitespace());
        if rest.is_empty() {
            break;
        }

        let longest = NUMBER_WORDS
            .iter()
            .filter(|(text, _)| rest.starts_with(text))
            .max_by_key(|(text, _)| text.len());

        match longest {
            Some((text, word)) => {
                words.push(*word);
                rest = &rest[text.len()..];
            }
            None => {
                return Err(ParseNumberError::UnknownWord {
                    input: input.to_string(),
                    rest: rest.to_string(),
                })
            }
        }
    }

    if !words.iter().any(|w| *w != NumberWord::And) {
        return Err(ParseNumberError::Empty(input.to_string()));
    }

    Ok(words)
}

fn combine(input: &str, words: &[NumberWord]) -> Result<u64, ParseNumberError> {
    let overflow = || ParseNumberError::Overflow(input.to_string());
    let mut total: u64 = 0;
    let mut current: u64 = 0;

    for word in words {
        match *word {
            NumberWord::Value(v) => current = current.checked_add(v).ok_or_else(overflow)?,
            NumberWord::Hundred => {
                current = current.max(1).checked_mul(100).ok_or_else(overflow)?;
            }
            NumberWord::Scale(scale) => {
                let group = current.max(1).checked_mul(scale).ok_or_else(overflow)?;
                total = total.checked_add(group).ok_or_else(overflow)?;
                current = 0;
            }
            NumberWord::And => {}
        }
    }

    total.checked_add(current).ok_or_else(overflow)
}

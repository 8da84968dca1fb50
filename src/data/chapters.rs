use std::ops::Range;
use tracing::debug;

use crate::utils::numbers::parse_number;

/// A detected chapter start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterBoundary {
    /// Index of the page the heading was found on
    pub start_page: usize,
    /// The heading line exactly as extracted
    pub heading: String,
    /// Parsed chapter number, informational only
    pub number: u64,
}

/// Chapter number of a heading line such as "Chapter One" or "CHAPTER 12".
///
/// The line is lower-cased and stripped of whitespace before matching, so
/// "C hapter Twenty One" is accepted too.
pub fn detect_heading(line: &str) -> Option<u64> {
    let normalized: String = line
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let remainder = normalized.strip_prefix("chapter")?;
    parse_number(remainder).ok()
}

/// Scan every line of every page for chapter headings.
///
/// Headings are neither deduplicated nor checked for sequence; each match
/// yields a boundary in page order.
pub fn locate_chapters<P: AsRef<str>>(pages: &[P]) -> Vec<ChapterBoundary> {
    let mut boundaries = Vec::new();

    for (page_index, page) in pages.iter().enumerate() {
        for line in page.as_ref().split('\n') {
            if let Some(number) = detect_heading(line) {
                debug!("Chapter {} heading on page {}: {:?}", number, page_index, line);
                boundaries.push(ChapterBoundary {
                    start_page: page_index,
                    heading: line.to_string(),
                    number,
                });
            }
        }
    }

    boundaries
}

/// Half-open page range of each chapter; the last one runs to the end of
/// the document
pub fn chapter_ranges(boundaries: &[ChapterBoundary], total_pages: usize) -> Vec<Range<usize>> {
    boundaries
        .iter()
        .enumerate()
        .map(|(i, boundary)| {
            let end = boundaries
                .get(i + 1)
                .map(|next| next.start_page)
                .unwrap_or(total_pages);
            boundary.start_page..end
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_detect_heading() {
        assert_eq!(detect_heading("Chapter One"), Some(1));
        assert_eq!(detect_heading("CHAPTER 2"), Some(2));
        assert_eq!(detect_heading("  chapter   twenty one "), Some(21));
        assert_eq!(detect_heading("Chapter Forty-Two"), Some(42));
        assert_eq!(detect_heading("Chapter"), None);
        assert_eq!(detect_heading("Chapter One: The Beginning"), None);
        assert_eq!(detect_heading("Chapters of my life"), None);
        assert_eq!(detect_heading("The first chapter 1"), None);
    }

    #[test]
    fn test_locate_chapters_keeps_original_line() {
        let pages = vec![
            "Chapter One\nHello wrld.",
            "More txt here.",
            "Some text\nCHAPTER  2\nNew start",
        ];
        let boundaries = locate_chapters(&pages);
        assert_eq!(
            boundaries,
            vec![
                ChapterBoundary { start_page: 0, heading: "Chapter One".into(), number: 1 },
                ChapterBoundary { start_page: 2, heading: "CHAPTER  2".into(), number: 2 },
            ]
        );
    }

    #[test]
    fn test_locate_chapters_does_not_deduplicate() {
        let pages = vec!["Chapter 3\nChapter 1", "Chapter 3"];
        let starts: Vec<usize> = locate_chapters(&pages).iter().map(|b| b.start_page).collect();
        assert_eq!(starts, vec![0, 0, 1]);
    }

    #[test]
    fn test_no_chapters() {
        let pages = vec!["Just some prose.", "And more."];
        assert!(locate_chapters(&pages).is_empty());
        assert!(chapter_ranges(&[], 2).is_empty());
    }

    #[test]
    fn test_chapter_ranges() {
        let pages = vec!["Chapter 1", "a", "Chapter 2", "b", "c"];
        let boundaries = locate_chapters(&pages);
        assert_eq!(chapter_ranges(&boundaries, pages.len()), vec![0..2, 2..5]);
    }

    proptest! {
        #[test]
        fn prop_digit_headings_detected(n in 0u64..100_000, pad in " {0,3}") {
            let line = format!("Chapter{}{}{}", pad, n, pad);
            prop_assert_eq!(detect_heading(&line), Some(n));
        }

        #[test]
        fn prop_ranges_are_half_open(starts in prop::collection::vec(0usize..50, 1..8), extra in 0usize..5) {
            let mut starts = starts;
            starts.sort_unstable();
            let total = starts[starts.len() - 1] + 1 + extra;
            let boundaries: Vec<ChapterBoundary> = starts
                .iter()
                .map(|&start_page| ChapterBoundary { start_page, heading: String::new(), number: 0 })
                .collect();

            let ranges = chapter_ranges(&boundaries, total);
            prop_assert_eq!(ranges.len(), boundaries.len());
            for (i, range) in ranges.iter().enumerate() {
                prop_assert_eq!(range.start, starts[i]);
                let expected_end = starts.get(i + 1).copied().unwrap_or(total);
                prop_assert_eq!(range.end, expected_end);
            }
        }
    }
}

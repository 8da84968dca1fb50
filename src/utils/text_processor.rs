use regex::Regex;
use std::sync::LazyLock;

use crate::config::PageNumberPosition;

/// Hyphenated line wraps: "-\n", "\n-", "- \n", "\n -"
static HYPHEN_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"- ?\n|\n ?-").unwrap());

static MULTI_SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());

/// Drop the running page number from one page's text.
///
/// Runs per page, before pages are joined, because the first/last token of
/// a page is only identifiable while the page is still separate.
pub fn strip_page_number(text: &str, position: PageNumberPosition) -> String {
    let tokens: Vec<&str> = text.split(' ').collect();

    let is_number = |token: &str| {
        let token = token.replace('\n', "");
        !token.is_empty() && token.chars().all(char::is_numeric)
    };

    match position {
        PageNumberPosition::Top if is_number(tokens[0]) => tokens[1..].join(" "),
        PageNumberPosition::Bottom if is_number(tokens[tokens.len() - 1]) => {
            tokens[..tokens.len() - 1].join(" ")
        }
        _ => text.to_string(),
    }
}

/// Remove the first occurrence of the heading line (with its line break).
/// Repeated running headers further down are left alone.
pub fn remove_heading(text: &str, heading: &str) -> String {
    text.replacen(&format!("{}\n", heading), "", 1)
}

/// Join hyphen-broken and soft-wrapped lines into one line of prose and
/// replace curly quotes with straight ones.
pub fn reflow_text(text: &str) -> String {
    let text = HYPHEN_BREAK_RE.replace_all(text, "");
    let text = text.replace('\n', " ");
    let text = MULTI_SPACE_RE.replace_all(&text, " ");

    text.replace(['\u{201c}', '\u{201d}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'")
}

/// Rebuild the continuous text of one chapter from its page range
pub fn reconstruct_chapter(
    pages: &[String],
    position: PageNumberPosition,
    heading: &str,
) -> String {
    let joined = pages
        .iter()
        .map(|page| strip_page_number(page, position))
        .collect::<Vec<_>>()
        .join("\n");

    reflow_text(&remove_heading(&joined, heading))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_strip_page_number_top() {
        assert_eq!(
            strip_page_number("7 The story continues", PageNumberPosition::Top),
            "The story continues"
        );
        assert_eq!(
            strip_page_number("\n12 More text", PageNumberPosition::Top),
            "More text"
        );
        assert_eq!(
            strip_page_number("Seven dwarves", PageNumberPosition::Top),
            "Seven dwarves"
        );
    }

    #[test]
    fn test_strip_page_number_bottom() {
        assert_eq!(
            strip_page_number("the end of the page 42", PageNumberPosition::Bottom),
            "the end of the page"
        );
        assert_eq!(
            strip_page_number("the end of 1984.", PageNumberPosition::Bottom),
            "the end of 1984."
        );
    }

    #[test]
    fn test_strip_page_number_none() {
        assert_eq!(
            strip_page_number("7 The story continues", PageNumberPosition::None),
            "7 The story continues"
        );
        assert_eq!(strip_page_number("", PageNumberPosition::Top), "");
    }

    #[test]
    fn test_remove_heading_first_occurrence_only() {
        let text = "Chapter One\nIt began.\nChapter One\nAgain.";
        assert_eq!(
            remove_heading(text, "Chapter One"),
            "It began.\nChapter One\nAgain."
        );
    }

    #[test]
    fn test_reflow_hyphenation_and_quotes() {
        let text = "a beau-\ntiful \u{201c}day\u{201d}\nit\u{2019}s  here";
        assert_eq!(reflow_text(text), "a beautiful \"day\" it's here");
        assert_eq!(reflow_text("some- \nthing\n -else"), "somethingelse");
    }

    #[test]
    fn test_reconstruct_chapter_end_to_end() {
        let pages = vec!["Chapter One\nHello wrld.".to_string(), "More txt here.".to_string()];
        let text = reconstruct_chapter(&pages, PageNumberPosition::None, "Chapter One");
        assert_eq!(text, "Hello wrld. More txt here.");
    }

    #[test]
    fn test_reconstruct_chapter_with_page_numbers() {
        let pages = vec![
            "Chapter 2\nThe night was dark 14".to_string(),
            "and stormy. 15".to_string(),
        ];
        let text = reconstruct_chapter(&pages, PageNumberPosition::Bottom, "Chapter 2");
        assert_eq!(text, "The night was dark and stormy.");
    }

    proptest! {
        #[test]
        fn prop_reflow_is_idempotent(s in "[a-z \\n\\-\u{201c}\u{201d}\u{2018}\u{2019}]{0,40}") {
            let once = reflow_text(&s);
            prop_assert_eq!(reflow_text(&once), once);
        }
    }
}

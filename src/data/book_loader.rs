use anyhow::Result;
use std::path::Path;
use tracing::{info, warn};

use super::chapters::{chapter_ranges, locate_chapters, ChapterBoundary};
use crate::config::PageNumberPosition;
use crate::utils::{ensure_searchable, reconstruct_chapter, PageSource, PdfContent};

/// One reconstructed chapter, ready for spell-checking and packaging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub title: String,
    pub text: String,
}

/// Open a PDF for reading, running OCR first when it is not searchable
pub fn load_pages(path: &Path, searchable: Option<bool>) -> Result<PdfContent> {
    let content = ensure_searchable(path, searchable)?;

    if !content.has_text {
        anyhow::bail!(
            "PDF has no extractable text: {:?}. Run without marking it searchable to OCR it.",
            path
        );
    }

    Ok(content)
}

/// Reconstruct the text of each located chapter
pub fn build_chapters<S: PageSource + ?Sized>(
    source: &S,
    boundaries: &[ChapterBoundary],
    position: PageNumberPosition,
) -> Vec<Chapter> {
    let ranges = chapter_ranges(boundaries, source.page_count());

    boundaries
        .iter()
        .zip(ranges)
        .enumerate()
        .map(|(i, (boundary, range))| Chapter {
            title: chapter_title(&boundary.heading, i),
            text: reconstruct_chapter(source.page_range(range), position, &boundary.heading),
        })
        .collect()
}

/// Locate chapter headings and rebuild every chapter of a document
pub fn load_chapters<S: PageSource + ?Sized>(
    source: &S,
    position: PageNumberPosition,
) -> Vec<Chapter> {
    let boundaries = locate_chapters(source.pages());

    if boundaries.is_empty() {
        warn!("No chapter headings found in {} pages", source.page_count());
    } else {
        info!("Found {} chapters", boundaries.len());
    }

    build_chapters(source, &boundaries, position)
}

fn chapter_title(heading: &str, index: usize) -> String {
    let title = heading.split_whitespace().collect::<Vec<_>>().join(" ");
    if title.is_empty() {
        format!("Chapter {}", index + 1)
    } else {
        title
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::pdf_parser::tests::write_pdf;
    use tempfile::TempDir;

    fn pages(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_single_chapter_book() {
        let source = pages(&["Chapter One\nHello wrld.", "More txt here."]);
        let chapters = load_chapters(&source, PageNumberPosition::None);

        assert_eq!(
            chapters,
            vec![Chapter {
                title: "Chapter One".to_string(),
                text: "Hello wrld. More txt here.".to_string(),
            }]
        );
    }

    #[test]
    fn test_chapters_split_at_heading_pages() {
        let source = pages(&[
            "Chapter One\nIt was a dark",
            "2 and stormy night.",
            "CHAPTER  TWO\nMorning came.",
        ]);
        let chapters = load_chapters(&source, PageNumberPosition::Top);

        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].text, "It was a dark and stormy night.");
        assert_eq!(chapters[1].title, "CHAPTER TWO");
        assert_eq!(chapters[1].text, "Morning came.");
    }

    #[test]
    fn test_no_headings_yields_no_chapters() {
        let source = pages(&["Preface", "Just prose."]);
        assert!(load_chapters(&source, PageNumberPosition::None).is_empty());
    }

    #[test]
    fn test_chapter_title_fallback() {
        assert_eq!(chapter_title("  Chapter   Nine ", 8), "Chapter Nine");
        assert_eq!(chapter_title("   ", 2), "Chapter 3");
    }

    #[test]
    fn test_chapters_from_pdf_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("book.pdf");
        write_pdf(
            &path,
            &[
                &["Chapter One", "Hello world."],
                &["More text here."],
                &["Chapter Two", "Second chapter."],
            ],
        );

        let content = load_pages(&path, None).unwrap();
        assert_eq!(content.page_count(), 3);

        let starts: Vec<usize> = locate_chapters(content.pages())
            .iter()
            .map(|b| b.start_page)
            .collect();
        assert_eq!(starts, vec![0, 2]);

        let chapters = load_chapters(&content, PageNumberPosition::None);
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].title, "Chapter One");
        assert_eq!(chapters[0].text.trim(), "Hello world. More text here.");
        assert_eq!(chapters[1].title, "Chapter Two");
        assert_eq!(chapters[1].text.trim(), "Second chapter.");
    }

    #[test]
    fn test_missing_pdf_is_an_error() {
        assert!(load_pages(Path::new("/nonexistent/book.pdf"), Some(true)).is_err());
    }
}

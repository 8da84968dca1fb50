use anyhow::{Context, Result};
use pdf_extract::extract_text_by_pages;
use std::ops::Range;
use std::path::Path;
use tracing::{info, warn};

/// Ordered per-page plain text of a document
pub trait PageSource {
    /// All pages in document order
    fn pages(&self) -> &[String];

    fn page_count(&self) -> usize {
        self.pages().len()
    }

    /// Contiguous slice of pages, clamped to the document
    fn page_range(&self, range: Range<usize>) -> &[String] {
        let pages = self.pages();
        let end = range.end.min(pages.len());
        let start = range.start.min(end);
        &pages[start..end]
    }
}

impl PageSource for Vec<String> {
    fn pages(&self) -> &[String] {
        self
    }
}

/// Text extracted from a PDF, one string per page
#[derive(Debug, Clone)]
pub struct PdfContent {
    pub pages: Vec<String>,
    pub has_text: bool,
}

impl PdfContent {
    /// Extract the text of every page of a PDF file
    pub fn open(path: &Path) -> Result<Self> {
        info!("Extracting text from PDF: {:?}", path);

        let pages = extract_text_by_pages(path)
            .with_context(|| format!("Failed to extract text from PDF: {:?}", path))?;

        let content = Self::from_pages(pages);
        if !content.has_text {
            warn!("PDF appears to be scanned or has no extractable text: {:?}", path);
        }

        info!("Extracted {} pages from PDF", content.pages.len());
        Ok(content)
    }

    pub fn from_pages(pages: Vec<String>) -> Self {
        let has_text = pages.iter().any(|page| !page.trim().is_empty());
        Self { pages, has_text }
    }
}

impl PageSource for PdfContent {
    fn pages(&self) -> &[String] {
        &self.pages
    }
}

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{info, warn};

use super::pdf_parser::PdfContent;

/// Check if a PDF is likely scanned (has no extractable text)
pub fn is_scanned_pdf(path: &Path) -> Result<bool> {
    let content = PdfContent::open(path)?;
    Ok(!content.has_text)
}

/// Path of the text-searchable copy written next to the input,
/// `book.pdf` -> `book_searchable.pdf`
pub fn searchable_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "book".to_string());
    input.with_file_name(format!("{}_searchable.pdf", stem))
}

/// Produce a text-searchable copy of a scanned PDF using OCRmyPDF
///
/// Note: This requires OCRmyPDF (and its Tesseract backend) to be installed.
/// Install:
/// - Linux: sudo apt-get install ocrmypdf
/// - Mac: brew install ocrmypdf
/// - Windows: https://ocrmypdf.readthedocs.io/en/latest/installation.html
pub fn ocr_pdf(input: &Path, output: &Path) -> Result<()> {
    info!("Creating text-searchable file: {:?}", output);

    let version_check = Command::new("ocrmypdf").arg("--version").output();
    if version_check.is_err() {
        anyhow::bail!(
            "OCRmyPDF is not installed or not in PATH. \
             Please install it: https://ocrmypdf.readthedocs.io"
        );
    }

    let result = Command::new("ocrmypdf")
        .arg(input)
        .arg(output)
        .output()
        .with_context(|| format!("Failed to run ocrmypdf on {:?}", input))?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        warn!("ocrmypdf stderr: {}", stderr.trim());
        anyhow::bail!("OCR failed for {:?} ({})", input, result.status);
    }

    info!("OCR complete: {:?}", output);
    Ok(())
}

/// Open a PDF for text extraction, running OCR first when it is not
/// text-searchable. `searchable` overrides auto-detection; when detecting,
/// the text extracted for the check is reused.
pub fn ensure_searchable(path: &Path, searchable: Option<bool>) -> Result<PdfContent> {
    match searchable {
        Some(true) => return PdfContent::open(path),
        Some(false) => {}
        None => {
            let content = PdfContent::open(path)?;
            if content.has_text {
                return Ok(content);
            }
            info!("PDF appears to be scanned, running OCR");
        }
    }

    let output = searchable_path(path);
    ocr_pdf(path, &output)?;
    PdfContent::open(&output)
}

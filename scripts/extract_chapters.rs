use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bookify::config::PageNumberPosition;
use bookify::data::{build_chapters, chapter_ranges, load_pages, locate_chapters};

#[derive(Debug, Parser)]
#[command(author, version, about = "Extract reconstructed chapters from a PDF as plain text")]
struct Args {
    /// Input PDF
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory for chapter files
    #[arg(short, long)]
    output: PathBuf,

    /// Where page numbers are printed in the PDF
    #[arg(long, value_enum, default_value_t = PageNumberPosition::None)]
    page_numbers: PageNumberPosition,

    /// Whether the PDF already has a text layer (detected when omitted)
    #[arg(long)]
    searchable: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChapterMetadata {
    filename: String,
    title: String,
    number: u64,
    first_page: usize,
    last_page: usize,
    character_count: usize,
    word_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
struct BookMetadata {
    source: PathBuf,
    total_pages: usize,
    page_numbers: PageNumberPosition,
    total_chapters: usize,
    chapters: Vec<ChapterMetadata>,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    info!("Extracting chapters from {:?}", args.input);
    info!("Output directory: {:?}", args.output);

    fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create output directory: {:?}", args.output))?;

    let content = load_pages(&args.input, args.searchable)?;
    let boundaries = locate_chapters(&content.pages);

    if boundaries.is_empty() {
        warn!("No chapter headings found in {:?}", args.input);
    }

    let ranges = chapter_ranges(&boundaries, content.pages.len());
    let chapters = build_chapters(&content, &boundaries, args.page_numbers);

    let mut entries = Vec::with_capacity(chapters.len());
    for (i, ((chapter, boundary), range)) in chapters.iter().zip(&boundaries).zip(ranges).enumerate() {
        let filename = format!("ch{:02}.txt", i + 1);
        let path = args.output.join(&filename);

        let character_count = chapter.text.chars().count();
        fs::write(&path, &chapter.text)
            .with_context(|| format!("Failed to write chapter: {:?}", path))?;
        info!("{}: {} ({} characters)", filename, chapter.title, character_count);

        entries.push(ChapterMetadata {
            filename,
            title: chapter.title.clone(),
            number: boundary.number,
            first_page: range.start + 1,
            last_page: range.end,
            character_count,
            word_count: chapter.text.split_whitespace().count(),
        });
    }

    let metadata = BookMetadata {
        source: args.input.clone(),
        total_pages: content.pages.len(),
        page_numbers: args.page_numbers,
        total_chapters: entries.len(),
        chapters: entries,
    };

    let metadata_path = args.output.join("metadata.json");
    let metadata_json = serde_json::to_string_pretty(&metadata)?;
    fs::write(&metadata_path, metadata_json)
        .with_context(|| format!("Failed to write metadata: {:?}", metadata_path))?;
    info!("Metadata saved to: {:?}", metadata_path);

    info!("Extraction complete!");
    info!("Summary:");
    info!("  - Pages: {}", metadata.total_pages);
    info!("  - Chapters: {}", metadata.total_chapters);

    Ok(())
}

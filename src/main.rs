use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use bookify::config::{BookConfig, PageNumberPosition, SpellCheckConfig};
use bookify::data::{chapter_ranges, load_pages, locate_chapters};
use bookify::pipeline::{convert, open_spell_checker};
use bookify::spellcheck::TerminalPrompter;

#[derive(Debug, Parser)]
#[command(author, version, about = "Convert PDF books to EPUB")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Convert a PDF into an EPUB
    Convert(ConvertArgs),
    /// List the chapters detected in a PDF
    Chapters(ChaptersArgs),
    /// Interactively spell-check a plain text file
    Spellcheck(SpellcheckArgs),
}

#[derive(Debug, Args)]
struct ConvertArgs {
    /// Path to configuration JSON file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,
    /// Source PDF
    #[arg(long)]
    pdf: Option<PathBuf>,
    /// Whether the PDF already has a text layer (detected when omitted)
    #[arg(long)]
    searchable: Option<bool>,
    #[arg(long)]
    title: Option<String>,
    /// ISBN or other identifier
    #[arg(long)]
    identifier: Option<String>,
    #[arg(long)]
    language: Option<String>,
    #[arg(long)]
    author: Option<String>,
    /// Cover image (PNG, JPEG, GIF or WebP)
    #[arg(long)]
    cover: Option<PathBuf>,
    /// Where page numbers are printed in the PDF
    #[arg(long, value_enum)]
    page_numbers: Option<PageNumberPosition>,
    /// Output EPUB path (defaults to `<title>.epub`)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Spell-check every chapter before packaging
    #[arg(long)]
    spell_check: bool,
    #[arg(long)]
    word_list: Option<PathBuf>,
    #[arg(long)]
    user_dictionary: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ChaptersArgs {
    #[arg(long)]
    pdf: PathBuf,
    #[arg(long)]
    searchable: Option<bool>,
}

#[derive(Debug, Args)]
struct SpellcheckArgs {
    /// Text file to check
    #[arg(short, long)]
    input: PathBuf,
    /// Where to write the corrected text (defaults to `<stem>_checked.txt`)
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[arg(long)]
    word_list: Option<PathBuf>,
    #[arg(long)]
    user_dictionary: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert(args) => convert_command(args),
        Commands::Chapters(args) => chapters_command(args),
        Commands::Spellcheck(args) => spellcheck_command(args),
    }
}

fn convert_command(args: ConvertArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {:?}", path);
            BookConfig::load(path)?
        }
        None => BookConfig::default(),
    };

    if let Some(pdf) = args.pdf {
        config.pdf = pdf;
    }
    if args.searchable.is_some() {
        config.searchable = args.searchable;
    }
    if let Some(title) = args.title {
        config.title = title;
    }
    if args.identifier.is_some() {
        config.identifier = args.identifier;
    }
    if let Some(language) = args.language {
        config.language = language;
    }
    if let Some(author) = args.author {
        config.author = author;
    }
    if let Some(cover) = args.cover {
        config.cover = cover;
    }
    if let Some(position) = args.page_numbers {
        config.page_numbers = position;
    }
    if args.output.is_some() {
        config.output = args.output;
    }
    if args.spell_check {
        config.spell_check.enabled = true;
    }
    if args.word_list.is_some() {
        config.spell_check.word_list = args.word_list;
    }
    if args.user_dictionary.is_some() {
        config.spell_check.user_dictionary = args.user_dictionary;
    }

    info!("Converting {:?} (page numbers: {})", config.pdf, config.page_numbers);

    let mut prompter = TerminalPrompter::stdio();
    let output = convert(&config, &mut prompter)?;

    info!("EPUB written to {:?}", output);
    Ok(())
}

fn chapters_command(args: ChaptersArgs) -> Result<()> {
    let content = load_pages(&args.pdf, args.searchable)?;
    let boundaries = locate_chapters(&content.pages);
    let ranges = chapter_ranges(&boundaries, content.pages.len());

    info!("{} chapters in {} pages", boundaries.len(), content.pages.len());
    for (boundary, range) in boundaries.iter().zip(ranges) {
        println!(
            "{:>4}  pages {:>4}-{:<4}  {}",
            boundary.number,
            range.start + 1,
            range.end,
            boundary.heading.trim()
        );
    }

    Ok(())
}

fn spellcheck_command(args: SpellcheckArgs) -> Result<()> {
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read input file: {:?}", args.input))?;

    let config = SpellCheckConfig {
        enabled: true,
        word_list: args.word_list,
        user_dictionary: args.user_dictionary,
    };
    let mut checker = open_spell_checker(&config)?;
    let mut prompter = TerminalPrompter::stdio();

    let corrected = checker.check(&text, &mut prompter)?;
    checker.finish()?;

    let output = args.output.unwrap_or_else(|| checked_path(&args.input));
    fs::write(&output, corrected)
        .with_context(|| format!("Failed to write output file: {:?}", output))?;

    info!("Corrected text written to {:?}", output);
    Ok(())
}

fn checked_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}_checked.txt", stem))
}

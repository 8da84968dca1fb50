use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use crate::config::{BookConfig, SpellCheckConfig};
use crate::data::{load_chapters, load_pages, Chapter};
use crate::spellcheck::{Dictionary, Prompter, SpellChecker, SymSpellDictionary, UserDictionary};
use crate::utils::{write_epub, BookMetadata, CoverImage, EpubBook, PageSource};

/// Build the dictionary for one run: the base word list plus every word
/// the user taught it in earlier runs
pub fn open_spell_checker(config: &SpellCheckConfig) -> Result<SpellChecker<SymSpellDictionary>> {
    let mut dictionary = base_dictionary(config.word_list_path())?;

    let store = UserDictionary::new(config.user_dictionary_path());
    let learned = store.load().context("Failed to load user dictionary")?;
    info!("Loaded {} words from user dictionary {:?}", learned.len(), store.path());
    dictionary.extend(&learned);

    Ok(SpellChecker::new(dictionary).with_store(store))
}

/// Without a base word list every word of the book would be flagged
fn base_dictionary(word_list: Option<PathBuf>) -> Result<SymSpellDictionary> {
    let path = word_list.with_context(|| {
        format!(
            "No word list found at {}; pass one with --word-list or set spell_check.word_list",
            SpellCheckConfig::SYSTEM_WORD_LIST
        )
    })?;

    let mut dictionary = SymSpellDictionary::new();
    let loaded = dictionary
        .load_word_list(&path)
        .with_context(|| format!("Failed to load word list: {:?}", path))?;
    anyhow::ensure!(loaded > 0, "Word list {:?} contains no words", path);

    Ok(dictionary)
}

/// Run the interactive pass over every chapter in order, sharing one
/// decision memory
pub fn spell_check_chapters<D: Dictionary>(
    checker: &mut SpellChecker<D>,
    chapters: &mut [Chapter],
    prompter: &mut dyn Prompter,
) -> Result<()> {
    let total = chapters.len();
    for (i, chapter) in chapters.iter_mut().enumerate() {
        info!("Spell-checking chapter {}/{}: {}", i + 1, total, chapter.title);
        chapter.text = checker
            .check(&chapter.text, prompter)
            .with_context(|| format!("Spell-check failed in {:?}", chapter.title))?;
    }
    Ok(())
}

/// Convert the configured PDF into an EPUB and return the output path
pub fn convert(config: &BookConfig, prompter: &mut dyn Prompter) -> Result<PathBuf> {
    config.validate()?;

    let cover = CoverImage::load(&config.cover)?;
    let pages = load_pages(&config.pdf, config.searchable)?;

    convert_pages(config, &pages, cover, prompter)
}

/// Everything after text extraction: segmentation, reconstruction,
/// optional spell-check and packaging
pub fn convert_pages<S: PageSource + ?Sized>(
    config: &BookConfig,
    source: &S,
    cover: CoverImage,
    prompter: &mut dyn Prompter,
) -> Result<PathBuf> {
    let mut chapters = load_chapters(source, config.page_numbers);

    if config.spell_check.enabled {
        let mut checker = open_spell_checker(&config.spell_check)?;
        spell_check_chapters(&mut checker, &mut chapters, prompter)?;
        checker.finish().context("Failed to save user dictionary")?;
    }

    let book = EpubBook {
        metadata: BookMetadata {
            identifier: config.identifier(),
            title: config.title.clone(),
            language: config.language.clone(),
            author: config.author.clone(),
        },
        chapters,
        cover: Some(cover),
    };

    let output = config.output_path();
    write_epub(&book, &output)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spellcheck::{Answer, ScriptedPrompter};
    use crate::utils::epub_writer::tests::PNG_BYTES;
    use std::fs::{self, File};
    use std::io::Read;
    use tempfile::TempDir;

    fn pages() -> Vec<String> {
        vec!["Chapter One\nHello wrld.".to_string(), "More txt here.".to_string()]
    }

    fn config(dir: &TempDir) -> BookConfig {
        BookConfig {
            title: "Test Book".to_string(),
            pdf: dir.path().join("book.pdf"),
            cover: dir.path().join("cover.png"),
            output: Some(dir.path().join("out.epub")),
            ..BookConfig::default()
        }
    }

    fn chapter_xhtml(path: &std::path::Path, n: usize) -> String {
        let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut text = String::new();
        archive
            .by_name(&format!("OEBPS/ch{}.xhtml", n))
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        text
    }

    #[test]
    fn test_convert_pages_without_spell_check() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        let cover = CoverImage::from_bytes(PNG_BYTES.to_vec()).unwrap();
        let mut prompter = ScriptedPrompter::default();

        let output = convert_pages(&config, &pages(), cover, &mut prompter).unwrap();
        assert_eq!(output, dir.path().join("out.epub"));

        let chapter = chapter_xhtml(&output, 1);
        assert!(chapter.contains("<h1>Chapter One</h1>"));
        assert!(chapter.contains("<p>Hello wrld. More txt here.</p>"));
        assert!(prompter.shown.is_empty());
    }

    #[test]
    fn test_convert_pages_with_spell_check() {
        let dir = TempDir::new().unwrap();
        let word_list = dir.path().join("words.txt");
        fs::write(&word_list, "hello\nworld\nmore\ntext\nhere\n").unwrap();

        let mut config = config(&dir);
        config.spell_check = SpellCheckConfig {
            enabled: true,
            word_list: Some(word_list),
            user_dictionary: Some(dir.path().join("user-dictionary")),
        };

        let cover = CoverImage::from_bytes(PNG_BYTES.to_vec()).unwrap();
        let mut prompter = ScriptedPrompter::new([
            Answer::Choice(4),
            Answer::Choice(0),
            Answer::Choice(4),
            Answer::Choice(0),
        ]);

        let output = convert_pages(&config, &pages(), cover, &mut prompter).unwrap();
        assert_eq!(prompter.shown, vec!["wrld", "txt"]);
        assert!(chapter_xhtml(&output, 1).contains("<p>Hello world. More text here.</p>"));
        assert!(dir.path().join("user-dictionary").exists());
    }

    #[test]
    fn test_spell_check_memory_spans_chapters() {
        let dir = TempDir::new().unwrap();
        let config = SpellCheckConfig {
            enabled: true,
            word_list: Some(dir.path().join("words.txt")),
            user_dictionary: Some(dir.path().join("dict")),
        };
        fs::write(dir.path().join("words.txt"), "the\n").unwrap();
        fs::write(dir.path().join("dict"), "Sam\n").unwrap();

        let mut checker = open_spell_checker(&config).unwrap();
        let mut chapters = vec![
            Chapter { title: "One".into(), text: "the Frodo".into() },
            Chapter { title: "Two".into(), text: "Frodo the".into() },
        ];
        let mut prompter = ScriptedPrompter::new([Answer::Choice(2)]);

        spell_check_chapters(&mut checker, &mut chapters, &mut prompter).unwrap();
        checker.finish().unwrap();

        assert_eq!(prompter.shown, vec!["Frodo"]);
        assert_eq!(fs::read_to_string(dir.path().join("dict")).unwrap(), "Sam\nFrodo\n");
    }

    #[test]
    fn test_missing_word_list_is_an_error() {
        let err = base_dictionary(None).unwrap_err();
        assert!(format!("{:#}", err).contains("--word-list"));
    }

    #[test]
    fn test_empty_word_list_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("words.txt");
        fs::write(&path, "\n").unwrap();
        assert!(base_dictionary(Some(path)).is_err());
        assert!(base_dictionary(Some(dir.path().join("missing.txt"))).is_err());
    }

    #[test]
    fn test_base_dictionary_knows_common_words() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("words.txt");
        fs::write(&path, "the\ncat\nsat\non\nmat\n").unwrap();

        let dictionary = base_dictionary(Some(path)).unwrap();
        assert!(crate::spellcheck::scan("The cat sat on the mat.", &dictionary).is_empty());
    }

    #[test]
    fn test_missing_cover_fails_before_reading_pdf() {
        let dir = TempDir::new().unwrap();
        let mut prompter = ScriptedPrompter::default();

        let err = convert(&config(&dir), &mut prompter).unwrap_err();
        assert!(format!("{:#}", err).contains("cover"));
        assert!(!dir.path().join("out.epub").exists());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut prompter = ScriptedPrompter::default();
        assert!(convert(&BookConfig::default(), &mut prompter).is_err());
    }
}

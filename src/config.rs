use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Where running page numbers sit on each page of the source PDF
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PageNumberPosition {
    Top,
    Bottom,
    #[default]
    None,
}

impl fmt::Display for PageNumberPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::None => "none",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellCheckConfig {
    pub enabled: bool,
    /// Base word list, one word per line with an optional frequency column
    pub word_list: Option<PathBuf>,
    /// Words learned in earlier runs; appended to at the end of each run
    pub user_dictionary: Option<PathBuf>,
}

impl SpellCheckConfig {
    pub const SYSTEM_WORD_LIST: &'static str = "/usr/share/dict/words";
    pub const USER_DICTIONARY_NAME: &'static str = ".bookify-dictionary";

    /// Configured word list, or the system one when it exists
    pub fn word_list_path(&self) -> Option<PathBuf> {
        self.word_list.clone().or_else(|| {
            let system = PathBuf::from(Self::SYSTEM_WORD_LIST);
            system.exists().then_some(system)
        })
    }

    /// Configured user dictionary, or `~/.bookify-dictionary`
    pub fn user_dictionary_path(&self) -> PathBuf {
        self.user_dictionary.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(Self::USER_DICTIONARY_NAME)
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookConfig {
    pub pdf: PathBuf,
    /// `None` means detect whether the PDF needs OCR
    pub searchable: Option<bool>,
    pub title: String,
    /// ISBN or other identifier; a random UUID when absent
    pub identifier: Option<String>,
    pub language: String,
    pub author: String,
    pub cover: PathBuf,
    pub page_numbers: PageNumberPosition,
    pub output: Option<PathBuf>,
    pub spell_check: SpellCheckConfig,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            pdf: PathBuf::new(),
            searchable: None,
            title: String::new(),
            identifier: None,
            language: "en".to_string(),
            author: String::new(),
            cover: PathBuf::new(),
            page_numbers: PageNumberPosition::default(),
            output: None,
            spell_check: SpellCheckConfig::default(),
        }
    }
}

impl BookConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: Self = serde_json::from_str(&config_str)
            .with_context(|| format!("Failed to parse config JSON: {:?}", path))?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.title.trim().is_empty(), "book title must not be empty");
        anyhow::ensure!(!self.pdf.as_os_str().is_empty(), "path to the PDF is required");
        anyhow::ensure!(!self.cover.as_os_str().is_empty(), "path to the cover image is required");
        anyhow::ensure!(!self.language.trim().is_empty(), "language code must not be empty");
        Ok(())
    }

    /// Configured identifier, or a fresh random one
    pub fn identifier(&self) -> String {
        match &self.identifier {
            Some(id) if !id.trim().is_empty() => id.clone(),
            _ => Uuid::new_v4().to_string(),
        }
    }

    /// Configured output path, or `<title>.epub` in the working directory
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let file_name: String = self
                .title
                .chars()
                .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
                .collect();
            PathBuf::from(format!("{}.epub", file_name))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample() -> BookConfig {
        BookConfig {
            pdf: PathBuf::from("book.pdf"),
            title: "A Tale".to_string(),
            cover: PathBuf::from("cover.png"),
            ..BookConfig::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = BookConfig::default();
        assert_eq!(config.language, "en");
        assert_eq!(config.page_numbers, PageNumberPosition::None);
        assert!(!config.spell_check.enabled);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"pdf": "novel.pdf", "title": "Novel", "cover": "c.jpg",
                "page_numbers": "bottom", "spell_check": {{"enabled": true}}}}"#
        )
        .unwrap();

        let config = BookConfig::load(file.path()).unwrap();
        assert_eq!(config.title, "Novel");
        assert_eq!(config.page_numbers, PageNumberPosition::Bottom);
        assert!(config.spell_check.enabled);
        assert_eq!(config.language, "en");
        config.validate().unwrap();
    }

    #[test]
    fn test_identifier_falls_back_to_uuid() {
        let mut config = sample();
        let generated = config.identifier();
        assert!(Uuid::parse_str(&generated).is_ok());

        config.identifier = Some("978-3-16-148410-0".to_string());
        assert_eq!(config.identifier(), "978-3-16-148410-0");
    }

    #[test]
    fn test_output_path_from_title() {
        let mut config = sample();
        config.title = "AC/DC".to_string();
        assert_eq!(config.output_path(), PathBuf::from("AC_DC.epub"));
    }

    #[test]
    fn test_user_dictionary_override() {
        let mut spell = SpellCheckConfig::default();
        assert!(spell
            .user_dictionary_path()
            .ends_with(SpellCheckConfig::USER_DICTIONARY_NAME));
        spell.user_dictionary = Some(PathBuf::from("/tmp/words.txt"));
        assert_eq!(spell.user_dictionary_path(), PathBuf::from("/tmp/words.txt"));
    }
}

//! Convert PDF books into EPUB: chapter detection, text reconstruction and
//! interactive spell-checking.

pub mod config;
pub mod data;
pub mod pipeline;
pub mod spellcheck;
pub mod utils;

// Re-export commonly used types
pub use config::{BookConfig, PageNumberPosition, SpellCheckConfig};
pub use data::{Chapter, ChapterBoundary};
pub use pipeline::{convert, open_spell_checker};
pub use spellcheck::{SpellChecker, TerminalPrompter};

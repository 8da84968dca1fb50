pub mod epub_writer;
pub mod numbers;
pub mod ocr;
pub mod pdf_parser;
pub mod text_processor;

pub use epub_writer::{write_epub, BookMetadata, CoverImage, EpubBook};
pub use numbers::{parse_number, ParseNumberError};
pub use ocr::{ensure_searchable, is_scanned_pdf, ocr_pdf, searchable_path};
pub use pdf_parser::{PageSource, PdfContent};
pub use text_processor::{reconstruct_chapter, reflow_text, remove_heading, strip_page_number};

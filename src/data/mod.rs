mod book_loader;
mod chapters;

pub use book_loader::{build_chapters, load_chapters, load_pages, Chapter};
pub use chapters::{chapter_ranges, detect_heading, locate_chapters, ChapterBoundary};

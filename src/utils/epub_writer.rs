use anyhow::{Context, Result};
use image::ImageFormat;
use std::fs::{self, File};
use std::io::{Seek, Write};
use std::path::Path;
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::data::Chapter;

#[derive(Debug, Clone)]
pub struct BookMetadata {
    pub identifier: String,
    pub title: String,
    pub language: String,
    pub author: String,
}

/// Cover image bytes with a sniffed media type
#[derive(Debug, Clone)]
pub struct CoverImage {
    pub extension: &'static str,
    pub media_type: &'static str,
    pub data: Vec<u8>,
}

impl CoverImage {
    /// Read a cover image from disk; unreadable or unsupported files are errors
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read(path)
            .with_context(|| format!("Failed to read cover image: {:?}", path))?;
        Self::from_bytes(data).with_context(|| format!("Invalid cover image: {:?}", path))
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let format = image::guess_format(&data).context("Unrecognized image data")?;
        let (extension, media_type) = match format {
            ImageFormat::Png => ("png", "image/png"),
            ImageFormat::Jpeg => ("jpg", "image/jpeg"),
            ImageFormat::Gif => ("gif", "image/gif"),
            ImageFormat::WebP => ("webp", "image/webp"),
            other => anyhow::bail!("Unsupported cover image format: {:?}", other),
        };

        Ok(Self {
            extension,
            media_type,
            data,
        })
    }

    fn href(&self) -> String {
        format!("images/cover.{}", self.extension)
    }
}

/// Everything needed to package one EPUB
#[derive(Debug, Clone)]
pub struct EpubBook {
    pub metadata: BookMetadata,
    pub chapters: Vec<Chapter>,
    pub cover: Option<CoverImage>,
}

const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

const NAV_CSS: &str = "body { font-family: serif; }\nol { list-style-type: none; }\n";

/// Write `book` to an EPUB file at `path`
pub fn write_epub(book: &EpubBook, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create EPUB file: {:?}", path))?;
    write_epub_to_writer(book, file)
        .with_context(|| format!("Failed to write EPUB file: {:?}", path))?;

    info!("Wrote {} chapters to {:?}", book.chapters.len(), path);
    Ok(())
}

pub fn write_epub_to_writer<W: Write + Seek>(book: &EpubBook, writer: W) -> Result<()> {
    let mut zip = ZipWriter::new(writer);
    let stored = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    let deflated =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    // mimetype must be the first entry, uncompressed
    zip.start_file("mimetype", stored)?;
    zip.write_all(b"application/epub+zip")?;

    zip.start_file("META-INF/container.xml", deflated)?;
    zip.write_all(CONTAINER_XML.as_bytes())?;

    zip.start_file("OEBPS/content.opf", deflated)?;
    zip.write_all(generate_opf(book).as_bytes())?;

    zip.start_file("OEBPS/toc.ncx", deflated)?;
    zip.write_all(generate_ncx(book).as_bytes())?;

    zip.start_file("OEBPS/nav.xhtml", deflated)?;
    zip.write_all(generate_nav(book).as_bytes())?;

    zip.start_file("OEBPS/style/nav.css", deflated)?;
    zip.write_all(NAV_CSS.as_bytes())?;

    for (i, chapter) in book.chapters.iter().enumerate() {
        zip.start_file(format!("OEBPS/{}", chapter_href(i)), deflated)?;
        zip.write_all(generate_chapter(chapter, &book.metadata.language).as_bytes())?;
    }

    if let Some(cover) = &book.cover {
        zip.start_file(format!("OEBPS/{}", cover.href()), stored)?;
        zip.write_all(&cover.data)?;
    }

    zip.finish()?;
    Ok(())
}

fn chapter_href(index: usize) -> String {
    format!("ch{}.xhtml", index + 1)
}

fn generate_opf(book: &EpubBook) -> String {
    let meta = &book.metadata;
    let mut opf = String::new();

    opf.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="BookId">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
"#,
    );
    opf.push_str(&format!(
        "    <dc:identifier id=\"BookId\">{}</dc:identifier>\n",
        escape_xml(&meta.identifier)
    ));
    opf.push_str(&format!("    <dc:title>{}</dc:title>\n", escape_xml(&meta.title)));
    opf.push_str(&format!(
        "    <dc:language>{}</dc:language>\n",
        escape_xml(&meta.language)
    ));
    if !meta.author.is_empty() {
        opf.push_str(&format!(
            "    <dc:creator>{}</dc:creator>\n",
            escape_xml(&meta.author)
        ));
    }
    if book.cover.is_some() {
        // EPUB 2 readers still look for this
        opf.push_str("    <meta name=\"cover\" content=\"cover\"/>\n");
    }
    opf.push_str("  </metadata>\n  <manifest>\n");

    opf.push_str("    <item id=\"ncx\" href=\"toc.ncx\" media-type=\"application/x-dtbncx+xml\"/>\n");
    opf.push_str("    <item id=\"nav\" href=\"nav.xhtml\" media-type=\"application/xhtml+xml\" properties=\"nav\"/>\n");
    opf.push_str("    <item id=\"style_nav\" href=\"style/nav.css\" media-type=\"text/css\"/>\n");
    for i in 0..book.chapters.len() {
        opf.push_str(&format!(
            "    <item id=\"ch{}\" href=\"{}\" media-type=\"application/xhtml+xml\"/>\n",
            i + 1,
            chapter_href(i)
        ));
    }
    if let Some(cover) = &book.cover {
        opf.push_str(&format!(
            "    <item id=\"cover\" href=\"{}\" media-type=\"{}\" properties=\"cover-image\"/>\n",
            cover.href(),
            cover.media_type
        ));
    }
    opf.push_str("  </manifest>\n  <spine toc=\"ncx\">\n");

    opf.push_str("    <itemref idref=\"nav\"/>\n");
    for i in 0..book.chapters.len() {
        opf.push_str(&format!("    <itemref idref=\"ch{}\"/>\n", i + 1));
    }
    opf.push_str("  </spine>\n</package>\n");

    opf
}

fn generate_ncx(book: &EpubBook) -> String {
    let mut ncx = String::new();

    ncx.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head>
"#,
    );
    ncx.push_str(&format!(
        "    <meta name=\"dtb:uid\" content=\"{}\"/>\n",
        escape_xml(&book.metadata.identifier)
    ));
    ncx.push_str("    <meta name=\"dtb:depth\" content=\"1\"/>\n  </head>\n");
    ncx.push_str(&format!(
        "  <docTitle><text>{}</text></docTitle>\n  <navMap>\n",
        escape_xml(&book.metadata.title)
    ));

    for (i, chapter) in book.chapters.iter().enumerate() {
        ncx.push_str(&format!(
            "    <navPoint id=\"ch{n}\" playOrder=\"{n}\">\n      <navLabel><text>{}</text></navLabel>\n      <content src=\"{}\"/>\n    </navPoint>\n",
            escape_xml(&chapter.title),
            chapter_href(i),
            n = i + 1
        ));
    }

    ncx.push_str("  </navMap>\n</ncx>\n");
    ncx
}

fn generate_nav(book: &EpubBook) -> String {
    let items: String = book
        .chapters
        .iter()
        .enumerate()
        .map(|(i, chapter)| {
            format!(
                "      <li><a href=\"{}\">{}</a></li>\n",
                chapter_href(i),
                escape_xml(&chapter.title)
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" xml:lang="{lang}">
<head>
  <title>{title}</title>
  <link rel="stylesheet" type="text/css" href="style/nav.css"/>
</head>
<body>
  <nav epub:type="toc" id="toc">
    <h1>{title}</h1>
    <ol>
{items}    </ol>
  </nav>
</body>
</html>
"#,
        lang = escape_xml(&book.metadata.language),
        title = escape_xml(&book.metadata.title),
        items = items
    )
}

fn generate_chapter(chapter: &Chapter, language: &str) -> String {
    let title = escape_xml(&chapter.title);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="{lang}">
<head>
  <title>{title}</title>
</head>
<body>
  <h1>{title}</h1>
  <p>{body}</p>
</body>
</html>
"#,
        lang = escape_xml(language),
        title = title,
        body = escape_xml(&chapter.text)
    )
}

fn escape_xml(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

//! PDF document assembly.
//!
//! Collects finished page content streams and assembles the complete file:
//! header, font and page objects, cross-reference table, and trailer.

use super::content::ContentStream;
use super::font::Font;
use super::object::Object;
use crate::error::Result;
use std::io::Write;

/// Configuration for document assembly.
#[derive(Debug, Clone)]
pub struct DocumentConfig {
    /// PDF version written in the header.
    pub version: String,
    /// Document title metadata.
    pub title: Option<String>,
    /// Document author metadata.
    pub author: Option<String>,
    /// Creator application metadata.
    pub creator: Option<String>,
    /// Compress content streams with FlateDecode.
    pub compress: bool,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            version: "1.7".to_string(),
            title: None,
            author: None,
            creator: Some("invoice_press".to_string()),
            compress: false,
        }
    }
}

impl DocumentConfig {
    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the document author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Enable or disable FlateDecode compression of content streams.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}

/// Compress data for the FlateDecode filter.
fn compress_data(data: &[u8]) -> std::io::Result<Vec<u8>> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

struct PageData {
    width: f32,
    height: f32,
    content: ContentStream,
}

/// Assembles pages into a complete PDF byte sequence.
pub struct DocumentWriter {
    config: DocumentConfig,
    pages: Vec<PageData>,
}

impl DocumentWriter {
    /// Create a writer with default configuration.
    pub fn new() -> Self {
        Self::with_config(DocumentConfig::default())
    }

    /// Create a writer with explicit configuration.
    pub fn with_config(config: DocumentConfig) -> Self {
        Self {
            config,
            pages: Vec::new(),
        }
    }

    /// Append a finished page.
    pub fn add_page(&mut self, width: f32, height: f32, content: ContentStream) -> &mut Self {
        self.pages.push(PageData {
            width,
            height,
            content,
        });
        self
    }

    /// Number of pages added so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Assemble the complete document.
    ///
    /// Object numbering: 1 = catalog, 2 = page tree, 3..4 = fonts, then a
    /// page/content pair per page, and finally the info dictionary.
    pub fn finish(self) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        let mut xref: Vec<(u32, usize)> = Vec::new();

        writeln!(output, "%PDF-{}", self.config.version)?;
        // Binary comment marker recommended for files carrying binary data.
        output.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

        let catalog_id = 1u32;
        let pages_id = 2u32;
        let regular_font_id = 3u32;
        let bold_font_id = 4u32;
        let first_page_id = 5u32;
        let info_id = first_page_id + 2 * self.pages.len() as u32;
        let total_objects = info_id + 1;

        let emit = |id: u32, obj: &Object, out: &mut Vec<u8>, xref: &mut Vec<(u32, usize)>| {
            xref.push((id, out.len()));
            out.extend_from_slice(&obj.to_indirect_bytes(id, 0));
        };

        // Catalog and page tree
        let page_refs: Vec<Object> = (0..self.pages.len())
            .map(|i| Object::reference(first_page_id + 2 * i as u32))
            .collect();
        let catalog = Object::dict(vec![
            ("Type", Object::name("Catalog")),
            ("Pages", Object::reference(pages_id)),
        ]);
        let page_tree = Object::dict(vec![
            ("Type", Object::name("Pages")),
            ("Kids", Object::Array(page_refs)),
            ("Count", Object::Integer(self.pages.len() as i64)),
        ]);
        emit(catalog_id, &catalog, &mut output, &mut xref);
        emit(pages_id, &page_tree, &mut output, &mut xref);

        // Font objects shared by all pages
        for (id, font) in [(regular_font_id, Font::Regular), (bold_font_id, Font::Bold)] {
            let font_obj = Object::dict(vec![
                ("Type", Object::name("Font")),
                ("Subtype", Object::name("Type1")),
                ("BaseFont", Object::name(font.base_name())),
                ("Encoding", Object::name("WinAnsiEncoding")),
            ]);
            emit(id, &font_obj, &mut output, &mut xref);
        }

        let font_resources = Object::dict(vec![
            (Font::Regular.resource_name(), Object::reference(regular_font_id)),
            (Font::Bold.resource_name(), Object::reference(bold_font_id)),
        ]);

        // Page and content pairs
        for (i, page) in self.pages.iter().enumerate() {
            let page_id = first_page_id + 2 * i as u32;
            let content_id = page_id + 1;

            let page_obj = Object::dict(vec![
                ("Type", Object::name("Page")),
                ("Parent", Object::reference(pages_id)),
                (
                    "MediaBox",
                    Object::Array(vec![
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Real(page.width as f64),
                        Object::Real(page.height as f64),
                    ]),
                ),
                ("Contents", Object::reference(content_id)),
                ("Resources", Object::dict(vec![("Font", font_resources.clone())])),
            ]);
            emit(page_id, &page_obj, &mut output, &mut xref);

            let raw = page.content.build();
            let (data, compressed) = if self.config.compress {
                match compress_data(&raw) {
                    Ok(deflated) => (deflated, true),
                    Err(_) => (raw, false),
                }
            } else {
                (raw, false)
            };
            let mut dict = Object::map(vec![("Length", Object::Integer(data.len() as i64))]);
            if compressed {
                dict.insert("Filter".to_string(), Object::name("FlateDecode"));
            }
            emit(content_id, &Object::Stream { dict, data }, &mut output, &mut xref);
        }

        // Info dictionary
        let mut info_entries = Vec::new();
        if let Some(title) = &self.config.title {
            info_entries.push(("Title", Object::string(title)));
        }
        if let Some(author) = &self.config.author {
            info_entries.push(("Author", Object::string(author)));
        }
        if let Some(creator) = &self.config.creator {
            info_entries.push(("Creator", Object::string(creator)));
        }
        emit(info_id, &Object::dict(info_entries), &mut output, &mut xref);

        // Cross-reference table and trailer
        let xref_start = output.len();
        writeln!(output, "xref")?;
        writeln!(output, "0 {}", total_objects)?;
        writeln!(output, "0000000000 65535 f ")?;
        xref.sort_by_key(|(id, _)| *id);
        for (_, offset) in &xref {
            writeln!(output, "{:010} 00000 n ", offset)?;
        }

        let trailer = Object::dict(vec![
            ("Size", Object::Integer(total_objects as i64)),
            ("Root", Object::reference(catalog_id)),
            ("Info", Object::reference(info_id)),
        ]);
        writeln!(output, "trailer")?;
        output.extend_from_slice(&trailer.to_bytes());
        writeln!(output)?;
        writeln!(output, "startxref")?;
        writeln!(output, "{}", xref_start)?;
        write!(output, "%%EOF")?;

        Ok(output)
    }
}

impl Default for DocumentWriter {
    fn default() -> Self {
        Self::new()
    }
}

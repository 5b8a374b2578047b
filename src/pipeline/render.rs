//! PDF output: replay layout instructions into a PDF file with pdf-writer.
//!
//! The document uses only the two standard Type1 faces, Helvetica and
//! Helvetica-Bold, which every PDF viewer ships, so nothing is embedded and
//! a transcript of an hour-long video stays in the tens of kilobytes.
//! Standard fonts only cover WinAnsiEncoding; text is transcoded to it and
//! anything outside it becomes `?`.
//!
//! Each page gets its own Flate-compressed content stream. A `PageBreak`
//! finalises the current stream; the page object is written once all
//! streams are known.

use crate::config::LayoutGeometry;
use crate::error::Vtt2PdfError;
use crate::pipeline::layout::{DrawInstruction, TextStyle};
use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str, TextStr};
use std::path::Path;
use tracing::debug;

const BODY_FONT: Name<'static> = Name(b"F1");
const TITLE_FONT: Name<'static> = Name(b"F2");

/// A finished PDF held in memory.
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub pages: usize,
}

/// Build a PDF from a title and its layout instructions.
pub fn render_pdf(
    title: &str,
    instructions: &[DrawInstruction],
    geometry: &LayoutGeometry,
) -> RenderedPdf {
    let contents = page_contents(instructions, geometry);
    let n = contents.len();

    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let body_font_id = alloc();
    let title_font_id = alloc();
    let info_id = alloc();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    pdf.type1_font(body_font_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    pdf.type1_font(title_font_id)
        .base_font(Name(b"Helvetica-Bold"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    for (i, content) in contents.into_iter().enumerate() {
        {
            let mut page = pdf.page(page_ids[i]);
            page.media_box(Rect::new(0.0, 0.0, geometry.page_width, geometry.page_height))
                .parent(pages_id)
                .contents(content_ids[i]);
            page.resources()
                .fonts()
                .pair(BODY_FONT, body_font_id)
                .pair(TITLE_FONT, title_font_id);
        }

        let raw = content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&raw, 6);
        pdf.stream(content_ids[i], &compressed)
            .filter(Filter::FlateDecode);
    }

    pdf.document_info(info_id)
        .title(TextStr(title))
        .producer(TextStr(concat!("vtt2pdf ", env!("CARGO_PKG_VERSION"))));

    let bytes = pdf.finish();
    debug!("Rendered {} pages, {} bytes", n, bytes.len());
    RenderedPdf { bytes, pages: n }
}

/// Split the instruction stream into one content stream per page.
fn page_contents(instructions: &[DrawInstruction], geometry: &LayoutGeometry) -> Vec<Content> {
    let mut pages = Vec::new();
    let mut current = Content::new();

    for instruction in instructions {
        match instruction {
            DrawInstruction::DrawLine { text, x, y, style } => {
                let (font, size) = match style {
                    TextStyle::Title => (TITLE_FONT, geometry.title_font_size),
                    TextStyle::Body => (BODY_FONT, geometry.body_font_size),
                };
                let encoded = encode_win_ansi(text);
                current.begin_text();
                current.set_font(font, size);
                current.next_line(*x, *y);
                current.show(Str(&encoded));
                current.end_text();
            }
            DrawInstruction::PageBreak => {
                pages.push(std::mem::replace(&mut current, Content::new()));
            }
        }
    }

    pages.push(current);
    pages
}

/// Transcode to WinAnsiEncoding (Windows-1252).
///
/// Latin-1 maps straight through; the typographic characters captions are
/// fond of (curly quotes, dashes, ellipsis) map to their 0x80–0x9F slots.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7E}' => c as u8,
            '\u{A0}'..='\u{FF}' => c as u32 as u8,
            '\u{20AC}' => 0x80,
            '\u{201A}' => 0x82,
            '\u{0192}' => 0x83,
            '\u{201E}' => 0x84,
            '\u{2026}' => 0x85,
            '\u{2020}' => 0x86,
            '\u{2021}' => 0x87,
            '\u{02C6}' => 0x88,
            '\u{2030}' => 0x89,
            '\u{0160}' => 0x8A,
            '\u{2039}' => 0x8B,
            '\u{0152}' => 0x8C,
            '\u{017D}' => 0x8E,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{02DC}' => 0x98,
            '\u{2122}' => 0x99,
            '\u{0161}' => 0x9A,
            '\u{203A}' => 0x9B,
            '\u{0153}' => 0x9C,
            '\u{017E}' => 0x9E,
            '\u{0178}' => 0x9F,
            '\t' => b' ',
            _ => b'?',
        })
        .collect()
}

/// Write `bytes` to `path` atomically, creating the parent directory.
///
/// The PDF is written to a temp file next to the target and renamed into
/// place, so an interrupted run never leaves a truncated PDF behind.
pub fn write_pdf(bytes: &[u8], path: &Path) -> Result<(), Vtt2PdfError> {
    use std::io::Write;

    let write_err = |source: std::io::Error| Vtt2PdfError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent).map_err(write_err)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".vtt2pdf-")
        .suffix(".pdf.tmp")
        .tempfile_in(&parent)
        .map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::layout::layout;

    fn count(haystack: &[u8], needle: &[u8]) -> usize {
        haystack
            .windows(needle.len())
            .filter(|w| *w == needle)
            .count()
    }

    #[test]
    fn test_single_page_document() {
        let g = LayoutGeometry::default();
        let instructions = layout("Title", &["Hello there.".to_string()], &g);
        let doc = render_pdf("Title", &instructions, &g);

        assert_eq!(doc.pages, 1);
        assert!(doc.bytes.starts_with(b"%PDF-"));
        let page_objects =
            count(&doc.bytes, b"/Type /Page") - count(&doc.bytes, b"/Type /Pages");
        assert_eq!(page_objects, 1);
        assert_eq!(count(&doc.bytes, b"/Helvetica-Bold"), 1);
        assert!(count(&doc.bytes, b"/FlateDecode") >= 1);
    }

    #[test]
    fn test_page_breaks_become_pages() {
        let g = LayoutGeometry::default();
        let instructions = vec![
            DrawInstruction::DrawLine {
                text: "one".into(),
                x: 72.0,
                y: 700.0,
                style: TextStyle::Body,
            },
            DrawInstruction::PageBreak,
            DrawInstruction::DrawLine {
                text: "two".into(),
                x: 72.0,
                y: 720.0,
                style: TextStyle::Body,
            },
            DrawInstruction::PageBreak,
        ];
        let doc = render_pdf("Three pages", &instructions, &g);
        assert_eq!(doc.pages, 3);
        assert!(count(&doc.bytes, b"/Count 3") == 1);
    }

    #[test]
    fn test_title_in_document_info() {
        let g = LayoutGeometry::default();
        let doc = render_pdf("Lecture 7", &layout("Lecture 7", &[], &g), &g);
        assert_eq!(count(&doc.bytes, b"/Title (Lecture 7)"), 1);
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("Plain"), b"Plain".to_vec());
        assert_eq!(encode_win_ansi("café"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(
            encode_win_ansi("\u{201C}hi\u{201D} \u{2014} it\u{2019}s\u{2026}"),
            vec![0x93, b'h', b'i', 0x94, b' ', 0x97, b' ', b'i', b't', 0x92, b's', 0x85]
        );
        assert_eq!(encode_win_ansi("日本"), b"??".to_vec());
    }

    #[test]
    fn test_write_pdf_creates_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out/nested/doc.pdf");
        write_pdf(b"%PDF-1.7 test", &path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.7 test");

        // overwrite in place
        write_pdf(b"%PDF-1.7 again", &path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.7 again");

        let leftovers = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter(|e| {
                e.as_ref()
                    .map(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
                    .unwrap_or(false)
            })
            .count();
        assert_eq!(leftovers, 0);
    }
}

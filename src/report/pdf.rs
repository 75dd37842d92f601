//! Minimal PDF 1.4 writer
//!
//! Text-only pages using the standard Helvetica/Courier fonts with
//! WinAnsiEncoding, uncompressed content streams and a byte-exact xref table.

use std::io::Write;

use super::{DocumentLine, ReportDocument, RenderError};

const PAGE_WIDTH: u32 = 595;
const PAGE_HEIGHT: u32 = 842;
const MARGIN_LEFT: u32 = 56;
const MARGIN_TOP: u32 = 64;
const LEADING: u32 = 16;
const LINES_PER_PAGE: usize = 46;

// Fixed object numbers; page objects follow.
const CATALOG: usize = 1;
const PAGES: usize = 2;
const FONT_REGULAR: usize = 3;
const FONT_BOLD: usize = 4;
const FONT_MONO: usize = 5;
const FIRST_PAGE: usize = 6;

pub(super) fn render(doc: &ReportDocument) -> Result<Vec<u8>, RenderError> {
    let pages: Vec<&[DocumentLine]> = if doc.lines.is_empty() {
        vec![doc.lines.as_slice()]
    } else {
        doc.lines.chunks(LINES_PER_PAGE).collect()
    };

    let mut writer = PdfWriter::new();
    writer.header()?;

    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", page_object(i)))
        .collect();

    writer.object(CATALOG, format!("<< /Type /Catalog /Pages {PAGES} 0 R >>").as_bytes())?;
    writer.object(
        PAGES,
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        )
        .as_bytes(),
    )?;
    writer.object(FONT_REGULAR, font("Helvetica").as_bytes())?;
    writer.object(FONT_BOLD, font("Helvetica-Bold").as_bytes())?;
    writer.object(FONT_MONO, font("Courier").as_bytes())?;

    for (index, lines) in pages.iter().enumerate() {
        let page = page_object(index);
        let contents = page + 1;
        writer.object(
            page,
            format!(
                "<< /Type /Page /Parent {PAGES} 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                 /Resources << /Font << /F1 {FONT_REGULAR} 0 R /F2 {FONT_BOLD} 0 R /F3 {FONT_MONO} 0 R >> >> \
                 /Contents {contents} 0 R >>"
            )
            .as_bytes(),
        )?;
        writer.stream(contents, &content_stream(lines))?;
    }

    writer.finish(CATALOG)
}

const fn page_object(index: usize) -> usize {
    FIRST_PAGE + index * 2
}

fn font(base: &str) -> String {
    format!("<< /Type /Font /Subtype /Type1 /BaseFont /{base} /Encoding /WinAnsiEncoding >>")
}

/// Text operators for one page.
fn content_stream(lines: &[DocumentLine]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(
        format!(
            "BT\n{LEADING} TL\n{MARGIN_LEFT} {} Td\n",
            PAGE_HEIGHT - MARGIN_TOP
        )
        .as_bytes(),
    );
    for line in lines {
        let (font, size, text) = match line {
            DocumentLine::Title(s) => ("F2", 18, s.as_str()),
            DocumentLine::Heading(s) => ("F2", 13, s.as_str()),
            DocumentLine::Text(s) => ("F1", 11, s.as_str()),
            DocumentLine::Table(s) => ("F3", 10, s.as_str()),
            DocumentLine::Blank => ("F1", 11, ""),
        };
        out.extend_from_slice(format!("/{font} {size} Tf\n(").as_bytes());
        out.extend_from_slice(&escape(text));
        out.extend_from_slice(b") Tj\nT*\n");
    }
    out.extend_from_slice(b"ET\n");
    out
}

/// Encode as a WinAnsi literal string body.
///
/// Latin-1 characters map to their own code; anything else becomes `?`.
fn escape(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push(b'\\');
                out.push(ch as u8);
            }
            ' '..='~' => out.push(ch as u8),
            '\u{a0}'..='\u{ff}' => out.push(u8::try_from(u32::from(ch)).unwrap_or(b'?')),
            _ => out.push(b'?'),
        }
    }
    out
}

/// Tracks byte offsets of objects for the xref table.
struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<(usize, usize)>,
}

impl PdfWriter {
    fn new() -> Self {
        Self {
            buf: Vec::new(),
            offsets: Vec::new(),
        }
    }

    fn header(&mut self) -> Result<(), RenderError> {
        self.buf.write_all(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n")?;
        Ok(())
    }

    fn object(&mut self, number: usize, body: &[u8]) -> Result<(), RenderError> {
        self.offsets.push((number, self.buf.len()));
        write!(self.buf, "{number} 0 obj\n")?;
        self.buf.write_all(body)?;
        self.buf.write_all(b"\nendobj\n")?;
        Ok(())
    }

    fn stream(&mut self, number: usize, data: &[u8]) -> Result<(), RenderError> {
        self.offsets.push((number, self.buf.len()));
        write!(self.buf, "{number} 0 obj\n<< /Length {} >>\nstream\n", data.len())?;
        self.buf.write_all(data)?;
        self.buf.write_all(b"\nendstream\nendobj\n")?;
        Ok(())
    }

    fn finish(mut self, root: usize) -> Result<Vec<u8>, RenderError> {
        self.offsets.sort_unstable_by_key(|(number, _)| *number);
        let size = self.offsets.len() + 1;
        let xref_at = self.buf.len();

        write!(self.buf, "xref\n0 {size}\n")?;
        self.buf.write_all(b"0000000000 65535 f \n")?;
        for (_, offset) in &self.offsets {
            write!(self.buf, "{offset:010} 00000 n \n")?;
        }
        write!(
            self.buf,
            "trailer\n<< /Size {size} /Root {root} 0 R >>\nstartxref\n{xref_at}\n%%EOF\n"
        )?;
        Ok(self.buf)
    }
}

//! Plain-text rendering

use super::{DocumentLine, ReportDocument};

pub(super) fn render(doc: &ReportDocument) -> String {
    let mut out = String::new();
    for line in &doc.lines {
        match line {
            DocumentLine::Title(s) => {
                out.push_str(s);
                out.push('\n');
                out.push_str(&"=".repeat(s.chars().count()));
            }
            DocumentLine::Heading(s) => {
                out.push_str(s);
                out.push('\n');
                out.push_str(&"-".repeat(s.chars().count()));
            }
            DocumentLine::Text(s) | DocumentLine::Table(s) => out.push_str(s),
            DocumentLine::Blank => {}
        }
        out.push('\n');
    }
    out
}

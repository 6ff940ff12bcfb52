//! Minimal PDF writer for plain text.
//!
//! Produces a PDF 1.4 file using one of the standard Type 1 fonts, so no
//! font data needs embedding. Text is wrapped at a fixed column width and
//! flows onto as many A4 pages as it needs. Characters outside the
//! WinAnsi encoding are written as `?`.

use std::io::Write;

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 42.5;
const FONT_SIZE: f32 = 10.0;
const LEADING: f32 = 13.0;

/// Column at which lines are wrapped.
pub const WRAP_COLUMNS: usize = 90;

/// Render `content` as a PDF document.
pub fn render_pdf(content: &str, title: &str, font: &str) -> Vec<u8> {
    let lines = wrap_text(content, WRAP_COLUMNS);
    let per_page = lines_per_page();
    let pages: Vec<&[String]> = if lines.is_empty() {
        vec![&lines[..]]
    } else {
        lines.chunks(per_page).collect()
    };

    let mut objects: Vec<Vec<u8>> = Vec::with_capacity(4 + pages.len() * 2);
    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", page_object_id(i)))
        .collect();

    objects.push(b"<< /Type /Catalog /Pages 2 0 R >>".to_vec());
    objects.push(
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        )
        .into_bytes(),
    );
    objects.push(
        format!(
            "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
            base_font(font)
        )
        .into_bytes(),
    );
    let mut info = b"<< /Producer (Inkpad) /Title (".to_vec();
    info.extend(pdf_string(title));
    info.extend_from_slice(b") >>");
    objects.push(info);

    for (i, page_lines) in pages.iter().enumerate() {
        objects.push(
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                PAGE_WIDTH,
                PAGE_HEIGHT,
                page_object_id(i) + 1
            )
            .into_bytes(),
        );
        let stream = page_stream(page_lines);
        let mut body = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
        body.extend(stream);
        body.extend_from_slice(b"\nendstream");
        objects.push(body);
    }

    write_document(&objects)
}

/// Wrap text at `columns` characters, breaking at the last space where
/// possible. Tabs expand to four spaces.
pub fn wrap_text(content: &str, columns: usize) -> Vec<String> {
    let columns = columns.max(1);
    let mut out = Vec::new();
    if content.is_empty() {
        return out;
    }
    for raw in content.split('\n') {
        let line = raw.trim_end_matches('\r').replace('\t', "    ");
        let chars: Vec<char> = line.chars().collect();
        let mut start = 0;
        while chars.len() - start > columns {
            let window = &chars[start..start + columns];
            // A space just past the window still lets the whole window fit
            if chars[start + columns] == ' ' {
                out.push(window.iter().collect());
                start += columns + 1;
                continue;
            }
            match window.iter().rposition(|c| *c == ' ').filter(|&i| i > 0) {
                Some(space) => {
                    out.push(window[..space].iter().collect());
                    start += space + 1;
                }
                None => {
                    out.push(window.iter().collect());
                    start += columns;
                }
            }
        }
        out.push(chars[start..].iter().collect());
    }
    out
}

fn lines_per_page() -> usize {
    ((PAGE_HEIGHT - 2.0 * MARGIN) / LEADING).floor() as usize
}

fn page_object_id(page_index: usize) -> usize {
    5 + page_index * 2
}

fn base_font(font: &str) -> &'static str {
    let font = font.to_ascii_lowercase();
    if font.contains("monospace") || font.contains("courier") {
        "Courier"
    } else if font.contains("sans-serif") || !font.contains("serif") {
        "Helvetica"
    } else {
        "Times-Roman"
    }
}

fn page_stream(lines: &[String]) -> Vec<u8> {
    let mut stream = format!(
        "BT\n/F1 {} Tf\n{} TL\n{} {} Td\n",
        FONT_SIZE,
        LEADING,
        MARGIN,
        PAGE_HEIGHT - MARGIN - FONT_SIZE
    )
    .into_bytes();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            stream.extend_from_slice(b"T* ");
        }
        stream.push(b'(');
        stream.extend(pdf_string(line));
        stream.extend_from_slice(b") Tj\n");
    }
    stream.extend_from_slice(b"ET");
    stream
}

/// Encode text for a PDF literal string in WinAnsi.
fn pdf_string(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        let byte = match c {
            ' '..='~' => c as u8,
            '\u{A0}'..='\u{FF}' => c as u32 as u8,
            '€' => 0x80,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            _ => b'?',
        };
        if matches!(byte, b'(' | b')' | b'\\') {
            out.push(b'\\');
        }
        out.push(byte);
    }
    out
}

fn write_document(objects: &[Vec<u8>]) -> Vec<u8> {
    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        // Writing into a Vec cannot fail
        let _ = writeln!(out, "{} 0 obj", i + 1);
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_offset = out.len();
    let _ = write!(out, "xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        let _ = writeln!(out, "{:010} 00000 n ", offset);
    }
    let _ = write!(
        out,
        "trailer\n<< /Size {} /Root 1 0 R /Info 4 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    );
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

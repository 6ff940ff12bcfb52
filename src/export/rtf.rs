//! Rich Text Format output.

/// Render `content` as a single-font RTF document.
///
/// Backslashes and braces are escaped, newlines become paragraph breaks and
/// characters outside ASCII are written as `\uN?` escapes.
pub fn render_rtf(content: &str, font: &str) -> String {
    let mut out = String::with_capacity(content.len() + 96);
    out.push_str("{\\rtf1\\ansi\\deff0 {\\fonttbl {\\f0 ");
    out.push_str(&rtf_font_name(font));
    out.push_str(";}}\\f0\\fs24 ");

    for c in content.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '\n' => out.push_str("\\par "),
            '\r' => {}
            '\t' => out.push_str("\\tab "),
            c if c.is_ascii() => out.push(c),
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    // RTF takes signed 16-bit code units
                    out.push_str(&format!("\\u{}?", *unit as i16));
                }
            }
        }
    }
    out.push('}');
    out
}

/// First family of a CSS font list, unquoted; RTF has no fallback lists.
fn rtf_font_name(font: &str) -> String {
    let first = font
        .split(',')
        .next()
        .unwrap_or("")
        .trim()
        .trim_matches(|c| c == '\'' || c == '"');
    match first {
        "" | "sans-serif" => "Arial".to_string(),
        "serif" => "Times New Roman".to_string(),
        "monospace" => "Courier New".to_string(),
        name => name
            .chars()
            .filter(|c| !matches!(c, '\\' | '{' | '}' | ';'))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rtf_header_and_font() {
        let rtf = render_rtf("hi", "Georgia, 'Times New Roman', serif");
        assert!(rtf.starts_with("{\\rtf1\\ansi"));
        assert!(rtf.contains("{\\f0 Georgia;}"));
        assert!(rtf.ends_with("hi}"));
    }

    #[test]
    fn test_rtf_escapes_control_characters() {
        let rtf = render_rtf("a\\b {c}\nnext", "monospace");
        assert!(rtf.contains("a\\\\b \\{c\\}\\par next"));
        assert!(rtf.contains("Courier New"));
    }

    #[test]
    fn test_rtf_unicode_escapes() {
        let rtf = render_rtf("é", "serif");
        assert!(rtf.contains("\\u233?"));
    }
}

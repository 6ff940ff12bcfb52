//! Standalone HTML wrapper around a document.

/// Wrap `content` in a minimal HTML page, preserving whitespace in a
/// `<pre>` block rendered with `font`.
pub fn render_html(content: &str, title: &str, font: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <title>{title}</title>
  <style>
    body {{ font-family: {font}; padding: 20px; line-height: 1.6; }}
    pre {{ font-family: inherit; white-space: pre-wrap; word-wrap: break-word; }}
  </style>
</head>
<body>
  <pre>{body}</pre>
</body>
</html>
"#,
        title = html_escape(title),
        font = css_font_family(font),
        body = html_escape(content),
    )
}

/// HTML-escape a string.
pub fn html_escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Strip characters that could close the style block.
fn css_font_family(font: &str) -> String {
    let cleaned: String = font
        .chars()
        .filter(|c| !matches!(c, '{' | '}' | ';' | '<' | '>'))
        .collect();
    if cleaned.trim().is_empty() {
        "sans-serif".to_string()
    } else {
        cleaned
    }
}

//! Anonymous paste upload to a dpaste-style service.
//!
//! The service takes a form with the content, a syntax name and an expiry,
//! and answers with the paste URL as plain text.

use super::http::{agent, USER_AGENT};
use crate::error::{Error, Result};
use log::{debug, info};

/// Days before an uploaded paste expires.
pub const PASTE_EXPIRY_DAYS: u32 = 7;

/// Syntax name the service should highlight with.
pub fn paste_syntax(is_code_mode: bool) -> &'static str {
    if is_code_mode {
        "js"
    } else {
        "text"
    }
}

/// Form fields for a paste upload.
pub fn paste_fields(content: &str, is_code_mode: bool) -> Vec<(&'static str, String)> {
    vec![
        ("content", content.to_string()),
        ("syntax", paste_syntax(is_code_mode).to_string()),
        ("expiry_days", PASTE_EXPIRY_DAYS.to_string()),
    ]
}

/// Pull the paste URL out of the response body.
pub fn parse_paste_response(body: &str) -> Result<String> {
    let url = body.trim().trim_matches('"');
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(url.to_string())
    } else {
        Err(Error::RemoteService(format!(
            "Unexpected paste response: {}",
            url.chars().take(80).collect::<String>()
        )))
    }
}

/// Upload `content` to `service_url` and return the paste URL.
pub fn upload_paste(service_url: &str, content: &str, is_code_mode: bool) -> Result<String> {
    if service_url.trim().is_empty() {
        return Err(Error::Validation("No paste service is configured".to_string()));
    }
    debug!("Uploading paste ({} bytes) to {}", content.len(), service_url);

    let fields = paste_fields(content, is_code_mode);
    let mut response = agent()
        .post(service_url.trim())
        .header("User-Agent", USER_AGENT)
        .send_form(fields.iter().map(|(k, v)| (*k, v.as_str())))?;

    let text = response
        .body_mut()
        .read_to_string()
        .map_err(|e| Error::RemoteService(e.to_string()))?;
    let url = parse_paste_response(&text)?;
    info!("Created paste {}", url);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields() {
        let fields = paste_fields("body", true);
        assert_eq!(fields[0], ("content", "body".to_string()));
        assert_eq!(fields[1], ("syntax", "js".to_string()));
        assert_eq!(fields[2], ("expiry_days", "7".to_string()));
        assert_eq!(paste_fields("b", false)[1].1, "text");
    }

    #[test]
    fn test_parse_response_trims_url() {
        assert_eq!(
            parse_paste_response("https://dpaste.com/ABC123\n").unwrap(),
            "https://dpaste.com/ABC123"
        );
        assert_eq!(
            parse_paste_response("\"https://dpaste.com/X\"").unwrap(),
            "https://dpaste.com/X"
        );
    }

    #[test]
    fn test_parse_response_rejects_non_url() {
        assert!(matches!(
            parse_paste_response("Error: content required"),
            Err(Error::RemoteService(_))
        ));
    }

    #[test]
    fn test_empty_service_url_is_rejected() {
        assert!(matches!(
            upload_paste("", "x", false),
            Err(Error::Validation(_))
        ));
    }
}

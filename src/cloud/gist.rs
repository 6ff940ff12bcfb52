//! GitHub gist upload.

use super::http::{agent, USER_AGENT};
use crate::error::{Error, Result};
use log::{debug, info};
use serde_json::{json, Value};

pub const GIST_API_URL: &str = "https://api.github.com/gists";

/// Build the JSON body for a new gist holding a single file.
pub fn gist_payload(file_name: &str, content: &str, description: &str, public: bool) -> Value {
    let mut files = serde_json::Map::new();
    files.insert(file_name.to_string(), json!({ "content": content }));
    json!({
        "description": description,
        "public": public,
        "files": files,
    })
}

/// Extract the browser URL from a gist creation response.
pub fn parse_gist_response(body: &str) -> Result<String> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| Error::RemoteService(format!("Unexpected gist response: {}", e)))?;
    value
        .get("html_url")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::RemoteService("Gist response has no html_url".to_string()))
}

/// Create a gist and return its URL.
pub fn upload_gist(
    token: &str,
    file_name: &str,
    content: &str,
    description: &str,
    public: bool,
) -> Result<String> {
    let token = token.trim();
    if token.is_empty() {
        return Err(Error::Validation("A GitHub token is required".to_string()));
    }
    let body = serde_json::to_string(&gist_payload(file_name, content, description, public))?;

    debug!("Creating gist '{}' ({} bytes)", file_name, content.len());
    let mut response = agent()
        .post(GIST_API_URL)
        .header("Authorization", &format!("Bearer {}", token))
        .header("Accept", "application/vnd.github+json")
        .header("User-Agent", USER_AGENT)
        .header("Content-Type", "application/json")
        .send(body.as_str())?;

    let text = response
        .body_mut()
        .read_to_string()
        .map_err(|e| Error::RemoteService(e.to_string()))?;
    let url = parse_gist_response(&text)?;
    info!("Created gist {}", url);
    Ok(url)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let payload = gist_payload("note.txt", "hello", "From Inkpad", false);
        assert_eq!(payload["description"], "From Inkpad");
        assert_eq!(payload["public"], false);
        assert_eq!(payload["files"]["note.txt"]["content"], "hello");
    }

    #[test]
    fn test_parse_response_reads_html_url() {
        let body = r#"{"id":"abc","html_url":"https://gist.github.com/u/abc"}"#;
        assert_eq!(
            parse_gist_response(body).unwrap(),
            "https://gist.github.com/u/abc"
        );
    }

    #[test]
    fn test_parse_response_without_url_is_remote_error() {
        assert!(matches!(
            parse_gist_response(r#"{"message":"Bad credentials"}"#),
            Err(Error::RemoteService(_))
        ));
        assert!(matches!(
            parse_gist_response("<html>"),
            Err(Error::RemoteService(_))
        ));
    }

    #[test]
    fn test_missing_token_is_rejected_before_network() {
        let result = upload_gist("  ", "a.txt", "x", "", false);
        assert!(matches!(result, Err(Error::Validation(_))));
    }
}

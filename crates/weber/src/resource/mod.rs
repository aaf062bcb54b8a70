// ABOUTME: Document source resolution: URL classification, blocking HTTP fetch, local file reads.
// ABOUTME: Decodes bodies strictly as UTF-8 unless the response declares another charset.

use std::borrow::Cow;
use std::fs;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::{Result, WeberError};
use crate::options::LoadOptions;

/// Maximum allowed body size for remote documents (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

// Scheme, then a domain, localhost or dotted IPv4 host, optional port and path.
static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)^(?:http|ftp)s?://",
        r"(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+(?:[A-Z]{2,6}\.?|[A-Z0-9-]{2,}\.?)|",
        r"localhost|",
        r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})",
        r"(?::\d+)?",
        r"(?:/?|[/?]\S+)$",
    ))
    .unwrap()
});

/// A loaded document source.
#[derive(Debug, Clone)]
pub struct Loaded {
    /// The path or URL that was loaded.
    pub source: String,
    pub text: String,
    pub content_type: Option<String>,
}

/// Returns true if `source` is a remote address rather than a local path.
pub fn is_website(source: &str) -> bool {
    URL_RE.is_match(source)
}

/// Load `source` from the network or the local filesystem.
pub fn load_source(source: &str, opts: &LoadOptions) -> Result<Loaded> {
    if is_website(source) {
        fetch(source, opts)
    } else {
        read_file(source)
    }
}

/// Read a local file as UTF-8 text.
pub fn read_file(path: &str) -> Result<Loaded> {
    let bytes = fs::read(path)
        .map_err(|e| WeberError::load(path, "ReadFile", Some(anyhow::Error::new(e))))?;
    let text = decode_body(&bytes, None).map_err(|e| WeberError::load(path, "ReadFile", Some(e)))?;
    debug!(path, bytes = bytes.len(), "read local document");
    Ok(Loaded {
        source: path.to_string(),
        text,
        content_type: None,
    })
}

/// Fetch a remote document with a blocking GET.
pub fn fetch(url: &str, opts: &LoadOptions) -> Result<Loaded> {
    let parsed = url::Url::parse(url).map_err(|e| {
        WeberError::load(url, "Fetch", Some(anyhow::anyhow!("invalid URL: {}", e)))
    })?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(WeberError::load(
            url,
            "Fetch",
            Some(anyhow::anyhow!("unsupported scheme {}", scheme)),
        ));
    }

    let client = reqwest::blocking::Client::builder()
        .timeout(opts.timeout)
        .user_agent(opts.user_agent.as_str())
        .build()
        .map_err(|e| {
            WeberError::load(url, "Fetch", Some(anyhow::anyhow!("client setup failed: {}", e)))
        })?;

    let response = client.get(parsed).send().map_err(|e| {
        WeberError::load(url, "Fetch", Some(anyhow::anyhow!("request failed: {}", e)))
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(WeberError::load(
            url,
            "Fetch",
            Some(anyhow::anyhow!("HTTP status {}", status.as_u16())),
        ));
    }

    if let Some(len) = response.content_length() {
        if len as usize > MAX_CONTENT_LENGTH {
            return Err(WeberError::load(
                url,
                "Fetch",
                Some(anyhow::anyhow!("content too large")),
            ));
        }
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_lowercase());

    let body = response.bytes().map_err(|e| {
        WeberError::load(url, "Fetch", Some(anyhow::anyhow!("failed to read body: {}", e)))
    })?;
    if body.len() > MAX_CONTENT_LENGTH {
        return Err(WeberError::load(
            url,
            "Fetch",
            Some(anyhow::anyhow!("content too large")),
        ));
    }

    let text = decode_body(&body, content_type.as_deref())
        .map_err(|e| WeberError::load(url, "Fetch", Some(e)))?;
    debug!(url, status = status.as_u16(), bytes = body.len(), "fetched remote document");

    Ok(Loaded {
        source: url.to_string(),
        text,
        content_type,
    })
}

/// Decode with the declared charset, or strict UTF-8 when none is declared.
fn decode_body(body: &[u8], content_type: Option<&str>) -> anyhow::Result<String> {
    let encoding = content_type
        .and_then(extract_charset)
        .and_then(|charset| encoding_rs::Encoding::for_label(charset.as_bytes()))
        .unwrap_or(encoding_rs::UTF_8);

    let body = if encoding == encoding_rs::UTF_8 {
        body.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(body)
    } else {
        body
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(Cow::into_owned)
        .ok_or_else(|| anyhow::anyhow!("body is not valid {}", encoding.name()))
}

/// Extract charset value from Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    let lower = content_type.to_lowercase();
    for part in lower.split(';') {
        let trimmed = part.trim();
        if let Some(charset) = trimmed.strip_prefix("charset=") {
            let charset = charset.trim_matches('"').trim_matches('\'');
            return Some(charset.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_website() {
        assert!(is_website("http://example.com"));
        assert!(is_website("https://www.example.co.uk/path/page.html?q=1"));
        assert!(is_website("HTTPS://EXAMPLE.COM/"));
        assert!(is_website("ftp://files.example.org/pub"));
        assert!(is_website("ftps://files.example.org"));
        assert!(is_website("http://localhost:8080/index.html"));
        assert!(is_website("http://127.0.0.1:3000"));

        assert!(!is_website("page.html"));
        assert!(!is_website("./test/basic/test.html"));
        assert!(!is_website("/tmp/example.com"));
        assert!(!is_website("file:///tmp/page.html"));
        assert!(!is_website("http://"));
        assert!(!is_website("http://example.com/with space"));
    }

    #[test]
    fn test_extract_charset() {
        assert_eq!(
            extract_charset("text/html; charset=utf-8"),
            Some("utf-8".to_string())
        );
        assert_eq!(
            extract_charset("text/html; charset=\"ISO-8859-1\""),
            Some("iso-8859-1".to_string())
        );
        assert_eq!(extract_charset("text/html"), None);
    }

    #[test]
    fn test_decode_declared_charset() {
        let latin1: &[u8] = &[0x63, 0x61, 0x66, 0xe9];
        let decoded = decode_body(latin1, Some("text/html; charset=iso-8859-1")).unwrap();
        assert_eq!(decoded, "caf\u{e9}");
    }

    #[test]
    fn test_decode_strict_utf8() {
        assert_eq!(decode_body(b"\xEF\xBB\xBFhello", None).unwrap(), "hello");
        assert!(decode_body(&[0x63, 0x61, 0x66, 0xe9], None).is_err());
    }

    #[test]
    fn test_read_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("page.html");
        fs::write(&path, "<p>Foo</p>").unwrap();
        let path = path.to_string_lossy().to_string();

        let loaded = load_source(&path, &LoadOptions::default()).unwrap();
        assert_eq!(loaded.text, "<p>Foo</p>");
        assert_eq!(loaded.source, path);
    }

    #[test]
    fn test_read_missing_file() {
        let err = load_source("definitely/not/here.html", &LoadOptions::default()).unwrap_err();
        assert!(err.is_load());
        assert_eq!(err.op, "ReadFile");
    }

    #[test]
    fn test_fetch_ok() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/page");
            then.status(200)
                .header("content-type", "text/html; charset=utf-8")
                .body("<p>Foo</p>");
        });

        let loaded = load_source(&server.url("/page"), &LoadOptions::default()).unwrap();
        mock.assert();
        assert_eq!(loaded.text, "<p>Foo</p>");
        assert_eq!(
            loaded.content_type.as_deref(),
            Some("text/html; charset=utf-8")
        );
    }

    #[test]
    fn test_fetch_non_success_status() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404).body("not found");
        });

        let err = load_source(&server.url("/missing"), &LoadOptions::default()).unwrap_err();
        mock.assert();
        assert!(err.is_load());
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn test_fetch_unsupported_scheme() {
        let err = fetch("ftp://files.example.org/pub", &LoadOptions::default()).unwrap_err();
        assert!(err.is_load());
        assert!(err.to_string().contains("unsupported scheme"));
    }
}

//! Single-page fetch with charset-aware decoding.
//!
//! The federation serves pages in either UTF-8 or windows-1256 and the
//! declared charset is only sometimes right, so the body is always taken as
//! raw bytes and decoded here rather than letting the HTTP client guess.

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};

use crate::{ScrapeConfig, ScrapeError};

#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    pub fn new(config: &ScrapeConfig) -> Result<Self, ScrapeError> {
        let client = reqwest::Client::builder()
            .gzip(true)
            .brotli(true)
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }

    /// Fetch one page and return its decoded text. Network errors and
    /// non-2xx statuses are hard failures; there is no retry here.
    pub async fn fetch_text(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "text/html")
            .header(ACCEPT_LANGUAGE, "en")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.bytes().await?;
        Ok(decode_body(&body, &content_type))
    }
}

/// Decode a raw response body. If the declared charset names the legacy
/// single-byte Arabic encoding, use windows-1256; otherwise assume UTF-8.
/// Byte-sniffing autodetection is deliberately not attempted.
pub fn decode_body(bytes: &[u8], content_type: &str) -> String {
    if content_type.contains("1256") {
        let (text, _, _) = encoding_rs::WINDOWS_1256.decode(bytes);
        text.into_owned()
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_1256_charset_decodes_arabic() {
        // "الهلال" in windows-1256
        let bytes = [0xC7, 0xE1, 0xE5, 0xE1, 0xC7, 0xE1];
        let text = decode_body(&bytes, "text/html; charset=windows-1256");
        assert_eq!(text, "الهلال");
    }

    #[test]
    fn missing_charset_falls_back_to_utf8() {
        let text = decode_body("الهلال".as_bytes(), "text/html");
        assert_eq!(text, "الهلال");
    }

    #[test]
    fn utf8_declared_pages_are_untouched() {
        let text = decode_body(b"<html>Al Hilal</html>", "text/html; charset=utf-8");
        assert_eq!(text, "<html>Al Hilal</html>");
    }
}

//! Fetching and heuristic extraction for federation championship pages.
//!
//! The upstream site exposes no API, only bilingual HTML with a legacy
//! Arabic encoding, so everything here is best-effort: extractors degrade to
//! empty lists when a page's layout is unrecognizable, and callers treat
//! zero rows as "nothing found" rather than an error.

use std::time::Duration;

use scraper::{ElementRef, Selector};
use thiserror::Error;

mod fetch;
mod fixtures;
mod orchestrator;
mod standings;
mod teams;

pub use fetch::{decode_body, PageFetcher};
pub use fixtures::extract_fixtures;
pub use orchestrator::{parse_championship, scrape_batch, ChampionshipSource, SaffSite};
pub use standings::extract_standings;
pub use teams::extract_teams;

pub const CRATE_NAME: &str = "saff-scrape";

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("http status {status} for {url}")]
    HttpStatus { status: u16, url: String },
    #[error("invalid selector: {0}")]
    Selector(String),
}

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    /// Delay inserted between requests in a batch. The federation site is
    /// treated as rate-limited; scraping is strictly sequential.
    pub request_delay: Duration,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.saff.com.sa/en".to_string(),
            user_agent: "Sadara-Sports-Platform/1.0 (data-integration)".to_string(),
            timeout: Duration::from_secs(15),
            request_delay: Duration::from_millis(1500),
        }
    }
}

impl ScrapeConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("SAFF_BASE_URL").unwrap_or(defaults.base_url),
            user_agent: std::env::var("SAFF_USER_AGENT").unwrap_or(defaults.user_agent),
            timeout: std::env::var("SAFF_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            request_delay: std::env::var("SAFF_REQUEST_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_delay),
        }
    }
}

fn selector(source: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(source).map_err(|e| ScrapeError::Selector(e.to_string()))
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Pull the external team id out of a team-profile href (`team.php?id=NNN`).
fn extract_team_id(href: &str) -> Option<i32> {
    let rest = &href[href.find("id=")? + 3..];
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse::<i32>().ok().filter(|id| *id > 0)
}

/// Integer parse tolerating a leading `+`, used for goal difference.
fn parse_stat(text: &str) -> Option<i32> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    trimmed.parse().ok()
}

fn leading_digits(text: &str) -> Option<i32> {
    let digits: String = text
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_id_comes_from_href_query() {
        assert_eq!(extract_team_id("team.php?id=1001"), Some(1001));
        assert_eq!(extract_team_id("/en/team.php?id=42&lang=ar"), Some(42));
        assert_eq!(extract_team_id("team.php?id=0"), None);
        assert_eq!(extract_team_id("team.php"), None);
        assert_eq!(extract_team_id("team.php?id=abc"), None);
    }

    #[test]
    fn stat_parse_tolerates_plus_sign() {
        assert_eq!(parse_stat("+12"), Some(12));
        assert_eq!(parse_stat("-3"), Some(-3));
        assert_eq!(parse_stat(" 7 "), Some(7));
        assert_eq!(parse_stat("vs"), None);
    }
}

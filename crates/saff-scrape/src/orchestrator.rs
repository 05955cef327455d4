//! Per-championship scraping and sequential batch orchestration.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use scraper::Html;

use saff_core::ScrapeBundle;

use crate::{
    extract_fixtures, extract_standings, extract_teams, PageFetcher, ScrapeConfig, ScrapeError,
};

/// Run all extractors over one championship page. Parsing happens entirely
/// here so the parsed document never crosses an await point.
pub fn parse_championship(
    html: &str,
    saff_id: i32,
    season: &str,
) -> Result<ScrapeBundle, ScrapeError> {
    let document = Html::parse_document(html);
    Ok(ScrapeBundle {
        saff_id,
        season: season.to_string(),
        standings: extract_standings(&document)?,
        fixtures: extract_fixtures(&document)?,
        teams: extract_teams(&document)?,
        scraped_at: Utc::now(),
    })
}

/// Source of championship data. The live site is the only production
/// implementation; tests substitute canned bundles.
#[async_trait]
pub trait ChampionshipSource: Send + Sync {
    async fn scrape_one(&self, saff_id: i32, season: &str) -> Result<ScrapeBundle, ScrapeError>;
}

/// The federation website itself.
pub struct SaffSite {
    fetcher: PageFetcher,
    base_url: String,
}

impl SaffSite {
    pub fn new(config: &ScrapeConfig) -> Result<Self, ScrapeError> {
        Ok(Self {
            fetcher: PageFetcher::new(config)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ChampionshipSource for SaffSite {
    async fn scrape_one(&self, saff_id: i32, season: &str) -> Result<ScrapeBundle, ScrapeError> {
        let url = format!("{}/championship.php?id={saff_id}", self.base_url);
        let html = self.fetcher.fetch_text(&url).await?;
        parse_championship(&html, saff_id, season)
    }
}

/// Scrape a list of championships one at a time, with a fixed delay between
/// requests. A failed scrape is logged and yields an empty bundle; it never
/// aborts the batch. `on_progress` receives (done, total, label) after each
/// championship.
pub async fn scrape_batch(
    source: &dyn ChampionshipSource,
    saff_ids: &[i32],
    season: &str,
    delay: Duration,
    mut on_progress: impl FnMut(usize, usize, &str),
) -> Vec<ScrapeBundle> {
    let total = saff_ids.len();
    let mut bundles = Vec::with_capacity(total);

    for (i, &saff_id) in saff_ids.iter().enumerate() {
        let bundle = match source.scrape_one(saff_id, season).await {
            Ok(bundle) => bundle,
            Err(err) => {
                tracing::warn!(saff_id, error = %err, "championship scrape failed");
                ScrapeBundle::empty(saff_id, season)
            }
        };
        bundles.push(bundle);
        on_progress(i + 1, total, &format!("Championship #{saff_id}"));

        if i + 1 < total && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    bundles
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubSource {
        fail_ids: Vec<i32>,
    }

    #[async_trait]
    impl ChampionshipSource for StubSource {
        async fn scrape_one(
            &self,
            saff_id: i32,
            season: &str,
        ) -> Result<ScrapeBundle, ScrapeError> {
            if self.fail_ids.contains(&saff_id) {
                return Err(ScrapeError::HttpStatus {
                    status: 503,
                    url: format!("championship.php?id={saff_id}"),
                });
            }
            Ok(ScrapeBundle::empty(saff_id, season))
        }
    }

    #[tokio::test]
    async fn batch_isolates_failures_and_reports_progress() {
        let source = StubSource { fail_ids: vec![342] };
        let mut progress = Vec::new();
        let bundles = scrape_batch(
            &source,
            &[333, 342, 335],
            "2025-2026",
            Duration::ZERO,
            |done, total, label| progress.push((done, total, label.to_string())),
        )
        .await;

        assert_eq!(bundles.len(), 3);
        assert_eq!(bundles[1].saff_id, 342);
        assert!(bundles[1].standings.is_empty());
        assert_eq!(
            progress,
            vec![
                (1, 3, "Championship #333".to_string()),
                (2, 3, "Championship #342".to_string()),
                (3, 3, "Championship #335".to_string()),
            ]
        );
    }

    #[test]
    fn championship_page_parses_into_one_bundle() {
        let html = r#"
            <table>
              <thead><tr><th>#</th><th>Team</th><th>P</th><th>Pts</th></tr></thead>
              <tbody>
                <tr><td>1</td><td><a href="team.php?id=1001">Al Hilal</a></td><td>10</td><td>23</td></tr>
              </tbody>
            </table>
            <table>
              <tr><td><a href="?calendar_date=2025-09-12">Fri</a></td></tr>
              <tr>
                <td>18:00</td>
                <td><a href="team.php?id=1001">Al Hilal</a></td>
                <td><a href="team.php?id=1002">Al Nassr</a></td>
              </tr>
            </table>"#;
        let bundle = parse_championship(html, 333, "2025-2026").unwrap();
        assert_eq!(bundle.saff_id, 333);
        assert_eq!(bundle.standings.len(), 1);
        assert_eq!(bundle.fixtures.len(), 1);
        assert_eq!(bundle.teams.len(), 2);
    }
}

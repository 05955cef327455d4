//! Persistence seam for the SAFF competition mirror.
//!
//! All reconciliation, mapping and import logic goes through [`MirrorStore`]
//! so the sync service and the HTTP layer never see a concrete database.
//! [`PgStore`] is the production implementation; [`MemoryStore`] backs tests
//! and offline runs.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use saff_core::{
    AgencyValue, Category, Club, DataType, Fixture, FixtureStatus, NewMatch, ScrapeBundle,
    Standing, TeamMap, Tournament, TournamentMeta, TournamentSeed,
};

mod memory;
mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

pub const CRATE_NAME: &str = "saff-store";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Page selector for list endpoints. 1-based.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 50,
        }
    }
}

impl Pagination {
    pub fn clamp(self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, 200),
        }
    }

    pub fn offset(self) -> usize {
        let p = self.clamp();
        (p.page as usize - 1) * p.per_page as usize
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TournamentFilter {
    pub category: Option<Category>,
    pub tier: Option<i32>,
    pub agency_value: Option<AgencyValue>,
    /// Case-insensitive substring match against the English name.
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StandingFilter {
    pub tournament_id: Option<Uuid>,
    pub saff_tournament_id: Option<i32>,
    pub season: Option<String>,
    pub club_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FixtureFilter {
    pub tournament_id: Option<Uuid>,
    pub saff_tournament_id: Option<i32>,
    pub season: Option<String>,
    pub club_id: Option<Uuid>,
    pub status: Option<FixtureStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamMapFilter {
    pub season: Option<String>,
    #[serde(default)]
    pub unmapped_only: bool,
}

/// Standing row joined with its tournament's display metadata.
#[derive(Debug, Clone, Serialize)]
pub struct StandingView {
    #[serde(flatten)]
    pub standing: Standing,
    pub tournament: TournamentMeta,
}

#[derive(Debug, Clone, Serialize)]
pub struct FixtureView {
    #[serde(flatten)]
    pub fixture: Fixture,
    pub tournament: TournamentMeta,
}

/// Row counts written by one snapshot transaction.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SnapshotCounts {
    pub standings: usize,
    pub fixtures: usize,
    pub teams: usize,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Stats {
    pub tournaments: i64,
    pub active_tournaments: i64,
    pub standings: i64,
    pub fixtures: i64,
    pub team_maps: i64,
    pub unmapped_team_maps: i64,
    pub clubs: i64,
    pub matches: i64,
}

/// Storage operations used by the sync service and the HTTP layer.
///
/// Each method that mutates several tables (snapshots, mapping, promotion)
/// is one transaction in the Postgres implementation.
#[async_trait]
pub trait MirrorStore: Send + Sync {
    /// Insert catalog entries that do not exist yet; never updates or
    /// deletes. Returns the number of newly created rows.
    async fn seed_tournaments(&self, seeds: &[TournamentSeed]) -> Result<usize, StoreError>;

    async fn list_tournaments(
        &self,
        filter: &TournamentFilter,
        page: Pagination,
    ) -> Result<Page<Tournament>, StoreError>;

    /// Catalog rows for the given external ids; unknown ids are skipped.
    async fn tournaments_by_saff_ids(&self, saff_ids: &[i32])
        -> Result<Vec<Tournament>, StoreError>;

    async fn active_tournaments_by_agency(
        &self,
        agency_values: &[AgencyValue],
    ) -> Result<Vec<Tournament>, StoreError>;

    /// Replace the mirror rows for one tournament and season with the
    /// scraped bundle, in a single transaction. Requested data types whose
    /// scraped set is empty are left untouched. Team maps are created where
    /// missing, never updated. Always bumps `last_synced_at`.
    async fn apply_snapshot(
        &self,
        tournament: &Tournament,
        season: &str,
        bundle: &ScrapeBundle,
        data_types: &[DataType],
    ) -> Result<SnapshotCounts, StoreError>;

    async fn list_standings(&self, filter: &StandingFilter)
        -> Result<Vec<StandingView>, StoreError>;

    async fn list_fixtures(&self, filter: &FixtureFilter) -> Result<Vec<FixtureView>, StoreError>;

    async fn list_team_maps(&self, filter: &TeamMapFilter) -> Result<Vec<TeamMap>, StoreError>;

    /// Attach a club to one (external team id, season) pair and cascade the
    /// club reference into that team's standing and fixture rows for the
    /// season. The club must already exist.
    async fn map_team_to_club(
        &self,
        saff_team_id: i32,
        season: &str,
        club_id: Uuid,
    ) -> Result<TeamMap, StoreError>;

    async fn team_map_for(
        &self,
        saff_team_id: i32,
        season: &str,
    ) -> Result<Option<TeamMap>, StoreError>;

    async fn find_or_create_club(
        &self,
        name: &str,
        name_ar: Option<&str>,
        league: &str,
    ) -> Result<(Club, bool), StoreError>;

    /// Fixtures for one tournament and season that have no match reference
    /// yet, in date order.
    async fn unimported_fixtures(
        &self,
        tournament_id: Uuid,
        season: &str,
    ) -> Result<Vec<Fixture>, StoreError>;

    /// Create the internal match and write its id back onto the fixture.
    async fn promote_fixture(
        &self,
        fixture_id: Uuid,
        new_match: &NewMatch,
    ) -> Result<Uuid, StoreError>;

    async fn stats(&self) -> Result<Stats, StoreError>;
}

//! Core domain model for the SAFF competition mirror.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod catalog;

pub use catalog::{tournament_seed, TournamentSeed};

pub const CRATE_NAME: &str = "saff-core";

/// Competition category as rendered on the federation's championships page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Pro,
    Youth,
    YouthD1,
    YouthD2,
    Grassroots,
    Women,
    Futsal,
    Beach,
    Esports,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Pro => "pro",
            Category::Youth => "youth",
            Category::YouthD1 => "youth-d1",
            Category::YouthD2 => "youth-d2",
            Category::Grassroots => "grassroots",
            Category::Women => "women",
            Category::Futsal => "futsal",
            Category::Beach => "beach",
            Category::Esports => "esports",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "pro" => Some(Category::Pro),
            "youth" => Some(Category::Youth),
            "youth-d1" => Some(Category::YouthD1),
            "youth-d2" => Some(Category::YouthD2),
            "grassroots" => Some(Category::Grassroots),
            "women" => Some(Category::Women),
            "futsal" => Some(Category::Futsal),
            "beach" => Some(Category::Beach),
            "esports" => Some(Category::Esports),
            _ => None,
        }
    }
}

/// Internal priority tag controlling how often a tournament is synchronized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgencyValue {
    Critical,
    High,
    Medium,
    Low,
    Scouting,
    Niche,
}

impl AgencyValue {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgencyValue::Critical => "Critical",
            AgencyValue::High => "High",
            AgencyValue::Medium => "Medium",
            AgencyValue::Low => "Low",
            AgencyValue::Scouting => "Scouting",
            AgencyValue::Niche => "Niche",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "Critical" => Some(AgencyValue::Critical),
            "High" => Some(AgencyValue::High),
            "Medium" => Some(AgencyValue::Medium),
            "Low" => Some(AgencyValue::Low),
            "Scouting" => Some(AgencyValue::Scouting),
            "Niche" => Some(AgencyValue::Niche),
            _ => None,
        }
    }
}

/// Fixture lifecycle state. `Completed` is derived from the presence of a
/// score; `Cancelled` is only ever set by operators, never by the scraper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureStatus {
    Upcoming,
    Completed,
    Cancelled,
}

impl FixtureStatus {
    pub fn from_home_score(home_score: Option<i32>) -> Self {
        if home_score.is_some() {
            FixtureStatus::Completed
        } else {
            FixtureStatus::Upcoming
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FixtureStatus::Upcoming => "upcoming",
            FixtureStatus::Completed => "completed",
            FixtureStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "upcoming" => Some(FixtureStatus::Upcoming),
            "completed" => Some(FixtureStatus::Completed),
            "cancelled" => Some(FixtureStatus::Cancelled),
            _ => None,
        }
    }
}

/// Which mirror tables a fetch request should refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Standings,
    Fixtures,
    Teams,
}

/// Which promotions an import request should perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportType {
    Clubs,
    Matches,
}

/// Persisted catalog row for one federation championship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: Uuid,
    /// Federation-assigned id from `championship.php?id=...`.
    pub saff_id: i32,
    pub name: String,
    pub name_ar: String,
    pub category: Category,
    pub tier: i32,
    pub agency_value: AgencyValue,
    pub icon: Option<String>,
    pub is_active: bool,
    pub last_synced_at: Option<DateTime<Utc>>,
}

/// Display metadata attached to standing/fixture list rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentMeta {
    pub id: Uuid,
    pub saff_id: i32,
    pub name: String,
    pub name_ar: String,
    pub category: Category,
    pub tier: i32,
}

impl From<&Tournament> for TournamentMeta {
    fn from(t: &Tournament) -> Self {
        Self {
            id: t.id,
            saff_id: t.saff_id,
            name: t.name.clone(),
            name_ar: t.name_ar.clone(),
            category: t.category,
            tier: t.tier,
        }
    }
}

/// One standings row as extracted from the page, not yet tournament-bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedStanding {
    pub position: i32,
    pub saff_team_id: i32,
    pub team_name_en: String,
    pub team_name_ar: String,
    pub played: i32,
    pub won: i32,
    pub drawn: i32,
    pub lost: i32,
    pub goals_for: i32,
    pub goals_against: i32,
    pub goal_difference: i32,
    pub points: i32,
}

/// One fixture as extracted from the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedFixture {
    pub date: NaiveDate,
    pub time: Option<String>,
    pub saff_home_team_id: i32,
    pub home_team_name_en: String,
    pub saff_away_team_id: i32,
    pub away_team_name_en: String,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub stadium: String,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedTeam {
    pub saff_team_id: i32,
    pub team_name_en: String,
}

/// Everything one championship page yields in a single scrape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeBundle {
    pub saff_id: i32,
    pub season: String,
    pub standings: Vec<ScrapedStanding>,
    pub fixtures: Vec<ScrapedFixture>,
    pub teams: Vec<ScrapedTeam>,
    pub scraped_at: DateTime<Utc>,
}

impl ScrapeBundle {
    /// Empty bundle standing in for a failed scrape, so one bad tournament
    /// never aborts a batch.
    pub fn empty(saff_id: i32, season: &str) -> Self {
        Self {
            saff_id,
            season: season.to_string(),
            standings: Vec::new(),
            fixtures: Vec::new(),
            teams: Vec::new(),
            scraped_at: Utc::now(),
        }
    }
}

/// Persisted standings row, fully replaced on every successful sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub id: Uuid,
    pub tournament_id: Uuid,
    pub season: String,
    pub position: i32,
    pub saff_team_id: i32,
    pub team_name_en: String,
    pub team_name_ar: String,
    pub played: i32,
    pub won: i32,
    pub drawn: i32,
    pub lost: i32,
    pub goals_for: i32,
    pub goals_against: i32,
    pub goal_difference: i32,
    pub points: i32,
    pub club_id: Option<Uuid>,
}

/// Persisted fixture row. `match_id` is the import promoter's back-reference
/// and gates re-import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: Uuid,
    pub tournament_id: Uuid,
    pub season: String,
    pub week: Option<i32>,
    pub match_date: NaiveDate,
    pub match_time: Option<String>,
    pub saff_home_team_id: i32,
    pub home_team_name_en: String,
    pub home_team_name_ar: String,
    pub saff_away_team_id: i32,
    pub away_team_name_en: String,
    pub away_team_name_ar: String,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub stadium: Option<String>,
    pub city: Option<String>,
    pub status: FixtureStatus,
    pub home_club_id: Option<Uuid>,
    pub away_club_id: Option<Uuid>,
    pub match_id: Option<Uuid>,
}

/// Bridge between one external team id (within one season) and at most one
/// internal club.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMap {
    pub id: Uuid,
    pub saff_team_id: i32,
    pub season: String,
    pub team_name_en: String,
    pub team_name_ar: String,
    pub city: Option<String>,
    pub club_id: Option<Uuid>,
}

/// Minimal internal club record as seen by this subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    pub id: Uuid,
    pub name: String,
    pub name_ar: Option<String>,
    pub country: String,
    pub city: Option<String>,
    pub league: Option<String>,
}

/// Input for promoting one fixture into an internal match record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMatch {
    pub home_club_id: Uuid,
    pub away_club_id: Uuid,
    pub competition: String,
    pub season: String,
    pub match_date: NaiveDate,
    pub venue: Option<String>,
    pub status: FixtureStatus,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
}

/// Internal match record created by the import promoter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: Uuid,
    pub home_club_id: Uuid,
    pub away_club_id: Uuid,
    pub competition: String,
    pub season: String,
    pub match_date: NaiveDate,
    pub venue: Option<String>,
    pub status: FixtureStatus,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_through_str() {
        for c in [
            Category::Pro,
            Category::YouthD1,
            Category::YouthD2,
            Category::Grassroots,
            Category::Esports,
        ] {
            assert_eq!(Category::parse(c.as_str()), Some(c));
        }
        assert_eq!(Category::parse("rugby"), None);
    }

    #[test]
    fn status_derivation_follows_home_score() {
        assert_eq!(
            FixtureStatus::from_home_score(Some(0)),
            FixtureStatus::Completed
        );
        assert_eq!(
            FixtureStatus::from_home_score(None),
            FixtureStatus::Upcoming
        );
    }

    #[test]
    fn seed_catalog_ids_are_unique() {
        let seed = tournament_seed();
        let mut ids: Vec<i32> = seed.iter().map(|t| t.saff_id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), seed.len());
        assert!(seed.iter().any(|t| t.saff_id == 333));
    }
}

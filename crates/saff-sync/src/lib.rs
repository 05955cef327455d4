//! Tiered sync service: scheduling, reconciliation, mapping and import
//! promotion on top of the scrape and store crates.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Duration as ChronoDuration, NaiveTime, Utc};
use serde::Serialize;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};

use saff_core::{
    tournament_seed, AgencyValue, DataType, FixtureStatus, ImportType, NewMatch, Tournament,
};
use saff_scrape::{scrape_batch, ChampionshipSource};
use saff_store::{MirrorStore, TeamMapFilter};

pub const CRATE_NAME: &str = "saff-sync";

/// One tier of the fixed sync schedule. Cron expressions are the plain
/// 5-field form, evaluated in UTC; the scheduler crate gets a seconds
/// field prepended.
#[derive(Debug, Clone, Copy)]
pub struct SyncSchedule {
    pub name: &'static str,
    pub cron: &'static str,
    pub agency_values: &'static [AgencyValue],
}

pub const SCHEDULES: &[SyncSchedule] = &[
    SyncSchedule {
        name: "critical-high",
        cron: "0 */12 * * *",
        agency_values: &[AgencyValue::Critical, AgencyValue::High],
    },
    SyncSchedule {
        name: "medium",
        cron: "0 4 * * *",
        agency_values: &[AgencyValue::Medium],
    },
    SyncSchedule {
        name: "scouting-low",
        cron: "0 3 * * 0",
        agency_values: &[AgencyValue::Scouting, AgencyValue::Low],
    },
];

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub season: String,
    pub scheduler_enabled: bool,
    /// Delay before the warm-up sync of critical tournaments at startup.
    pub startup_delay: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            season: "2025-2026".to_string(),
            scheduler_enabled: false,
            startup_delay: Duration::from_secs(30),
        }
    }
}

impl SyncConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            season: std::env::var("SAFF_SEASON").unwrap_or(defaults.season),
            scheduler_enabled: std::env::var("SAFF_SCHEDULER_ENABLED")
                .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "True"))
                .unwrap_or(defaults.scheduler_enabled),
            startup_delay: std::env::var("SAFF_STARTUP_SYNC_DELAY_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.startup_delay),
        }
    }
}

/// Totals from one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct SyncCounts {
    pub tournaments: usize,
    pub standings: usize,
    pub fixtures: usize,
    pub teams: usize,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct ImportCounts {
    pub clubs_created: usize,
    pub clubs_linked: usize,
    pub matches_created: usize,
    pub fixtures_skipped: usize,
}

#[derive(Debug, Default)]
struct StatusInner {
    last_run: Option<DateTime<Utc>>,
    last_success: Option<DateTime<Utc>>,
    last_error: Option<String>,
    last_result: Option<SyncCounts>,
    total_runs: u64,
    total_errors: u64,
}

/// Shared, advisory sync state. The running flag is a single-flight guard,
/// not a lock: concurrent triggers are skipped, never queued.
#[derive(Debug, Default)]
pub struct SyncState {
    running: AtomicBool,
    inner: Mutex<StatusInner>,
}

impl SyncState {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StatusInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn try_begin(&self) -> bool {
        self.running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn finish(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn record_start(&self) {
        let mut inner = self.lock();
        inner.last_run = Some(Utc::now());
        inner.total_runs += 1;
    }

    fn record_success(&self, counts: SyncCounts) {
        let mut inner = self.lock();
        inner.last_success = Some(Utc::now());
        inner.last_error = None;
        inner.last_result = Some(counts);
    }

    fn record_error(&self, message: String) {
        let mut inner = self.lock();
        inner.last_error = Some(message);
        inner.total_errors += 1;
    }
}

/// Clears the running flag when dropped, so a panicking run cannot wedge
/// the single-flight guard.
struct RunningGuard<'a>(&'a SyncState);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.finish();
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleReport {
    pub name: &'static str,
    pub cron: &'static str,
    pub agency_values: Vec<AgencyValue>,
    pub next_run: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncStatusReport {
    pub running: bool,
    pub season: String,
    pub last_run: Option<DateTime<Utc>>,
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub last_result: Option<SyncCounts>,
    pub total_runs: u64,
    pub total_errors: u64,
    pub schedules: Vec<ScheduleReport>,
}

const ALL_DATA_TYPES: &[DataType] = &[DataType::Standings, DataType::Fixtures, DataType::Teams];

/// Orchestrates the mirror: catalog seeding, scheduled and manual
/// reconciliation, club mapping fallout and import promotion.
pub struct MirrorService {
    store: Arc<dyn MirrorStore>,
    source: Arc<dyn ChampionshipSource>,
    config: SyncConfig,
    state: Arc<SyncState>,
    request_delay: Duration,
}

impl MirrorService {
    pub fn new(
        store: Arc<dyn MirrorStore>,
        source: Arc<dyn ChampionshipSource>,
        config: SyncConfig,
        request_delay: Duration,
    ) -> Self {
        Self {
            store,
            source,
            config,
            state: Arc::new(SyncState::new()),
            request_delay,
        }
    }

    pub fn season(&self) -> &str {
        &self.config.season
    }

    pub fn state(&self) -> Arc<SyncState> {
        Arc::clone(&self.state)
    }

    pub fn store(&self) -> Arc<dyn MirrorStore> {
        Arc::clone(&self.store)
    }

    /// Idempotently load the static tournament catalog.
    pub async fn seed_catalog(&self) -> Result<usize> {
        let created = self
            .store
            .seed_tournaments(tournament_seed())
            .await
            .context("seeding tournament catalog")?;
        info!(created, "tournament catalog seeded");
        Ok(created)
    }

    /// Scrape the given championships and replace their mirror rows.
    /// External ids with no catalog entry are skipped. A persistence error
    /// stops the remaining tournaments in this call.
    pub async fn fetch_from_source(
        &self,
        saff_ids: &[i32],
        season: &str,
        data_types: &[DataType],
    ) -> Result<SyncCounts> {
        let tournaments = self
            .store
            .tournaments_by_saff_ids(saff_ids)
            .await
            .context("resolving championship ids against the catalog")?;
        if tournaments.len() < saff_ids.len() {
            info!(
                requested = saff_ids.len(),
                matched = tournaments.len(),
                "some requested ids are not in the catalog"
            );
        }

        let ids: Vec<i32> = tournaments.iter().map(|t| t.saff_id).collect();
        let bundles = scrape_batch(
            self.source.as_ref(),
            &ids,
            season,
            self.request_delay,
            |done, total, label| info!(done, total, label, "scrape progress"),
        )
        .await;

        let mut counts = SyncCounts {
            tournaments: tournaments.len(),
            ..Default::default()
        };
        for (tournament, bundle) in tournaments.iter().zip(&bundles) {
            let snapshot = self
                .store
                .apply_snapshot(tournament, season, bundle, data_types)
                .await
                .with_context(|| format!("persisting snapshot for {}", tournament.name))?;
            counts.standings += snapshot.standings;
            counts.fixtures += snapshot.fixtures;
            counts.teams += snapshot.teams;
            info!(
                tournament = %tournament.name,
                standings = snapshot.standings,
                fixtures = snapshot.fixtures,
                teams = snapshot.teams,
                "snapshot applied"
            );
        }
        Ok(counts)
    }

    /// Promote mirror rows into the internal club and match tables.
    pub async fn import_to_sadara(
        &self,
        saff_ids: &[i32],
        season: &str,
        import_types: &[ImportType],
    ) -> Result<ImportCounts> {
        let tournaments = self
            .store
            .tournaments_by_saff_ids(saff_ids)
            .await
            .context("resolving championship ids against the catalog")?;
        let mut counts = ImportCounts::default();

        if import_types.contains(&ImportType::Clubs) {
            for tournament in &tournaments {
                self.import_clubs(tournament, season, &mut counts).await?;
            }
        }

        if import_types.contains(&ImportType::Matches) {
            for tournament in &tournaments {
                self.import_matches(tournament, season, &mut counts).await?;
            }
        }

        Ok(counts)
    }

    /// Link every unmapped team map of the season, creating clubs as
    /// needed. Linking goes through [`MirrorStore::map_team_to_club`], which
    /// cascades club references onto that team's standing and fixture rows.
    /// The league tag comes from the tournament whose pass runs first.
    async fn import_clubs(
        &self,
        tournament: &Tournament,
        season: &str,
        counts: &mut ImportCounts,
    ) -> Result<()> {
        let unmapped = self
            .store
            .list_team_maps(&TeamMapFilter {
                season: Some(season.to_string()),
                unmapped_only: true,
            })
            .await?;

        for map in unmapped {
            let name_ar = (!map.team_name_ar.is_empty()).then_some(map.team_name_ar.as_str());
            let (club, created) = self
                .store
                .find_or_create_club(&map.team_name_en, name_ar, &tournament.name)
                .await
                .with_context(|| format!("creating club for {}", map.team_name_en))?;
            self.store
                .map_team_to_club(map.saff_team_id, season, club.id)
                .await?;
            if created {
                counts.clubs_created += 1;
            }
            counts.clubs_linked += 1;
        }
        Ok(())
    }

    async fn import_matches(
        &self,
        tournament: &Tournament,
        season: &str,
        counts: &mut ImportCounts,
    ) -> Result<()> {
        let pending = self
            .store
            .unimported_fixtures(tournament.id, season)
            .await?;
        for fixture in &pending {
            let home = self
                .store
                .team_map_for(fixture.saff_home_team_id, season)
                .await?
                .and_then(|m| m.club_id);
            let away = self
                .store
                .team_map_for(fixture.saff_away_team_id, season)
                .await?
                .and_then(|m| m.club_id);
            let (Some(home_club_id), Some(away_club_id)) = (home, away) else {
                counts.fixtures_skipped += 1;
                continue;
            };

            let new_match = NewMatch {
                home_club_id,
                away_club_id,
                competition: tournament.name.clone(),
                season: season.to_string(),
                match_date: fixture.match_date,
                venue: fixture.stadium.clone(),
                status: if fixture.status == FixtureStatus::Cancelled {
                    FixtureStatus::Cancelled
                } else {
                    FixtureStatus::from_home_score(fixture.home_score)
                },
                home_score: fixture.home_score,
                away_score: fixture.away_score,
            };
            self.store
                .promote_fixture(fixture.id, &new_match)
                .await
                .with_context(|| format!("promoting fixture {}", fixture.id))?;
            counts.matches_created += 1;
        }
        Ok(())
    }

    /// One guarded sync pass over the active tournaments of the given
    /// agency tiers, against the given season (configured season when
    /// `None`). Returns `None` when skipped (already running) or when no
    /// active tournaments match.
    pub async fn run_sync(
        &self,
        agency_values: &[AgencyValue],
        season: Option<&str>,
        trigger: &str,
    ) -> Result<Option<SyncCounts>> {
        if !self.state.try_begin() {
            warn!(trigger, "sync already in progress, skipping");
            return Ok(None);
        }
        let _guard = RunningGuard(self.state.as_ref());
        self.state.record_start();

        let result = self.run_sync_inner(agency_values, season, trigger).await;
        match &result {
            Ok(Some(counts)) => self.state.record_success(*counts),
            Ok(None) => {}
            Err(err) => self.state.record_error(format!("{err:#}")),
        }
        result
    }

    async fn run_sync_inner(
        &self,
        agency_values: &[AgencyValue],
        season: Option<&str>,
        trigger: &str,
    ) -> Result<Option<SyncCounts>> {
        let season = season.unwrap_or(&self.config.season);
        let tournaments = self
            .store
            .active_tournaments_by_agency(agency_values)
            .await
            .context("selecting active tournaments")?;
        if tournaments.is_empty() {
            info!(trigger, "no active tournaments for this tier, nothing to sync");
            return Ok(None);
        }

        info!(
            trigger,
            tournaments = tournaments.len(),
            season,
            "sync started"
        );
        let ids: Vec<i32> = tournaments.iter().map(|t| t.saff_id).collect();
        let counts = self
            .fetch_from_source(&ids, season, ALL_DATA_TYPES)
            .await?;
        info!(
            trigger,
            standings = counts.standings,
            fixtures = counts.fixtures,
            teams = counts.teams,
            "sync finished"
        );
        Ok(Some(counts))
    }

    pub fn sync_status(&self) -> SyncStatusReport {
        let now = Utc::now();
        let schedules = SCHEDULES
            .iter()
            .map(|s| ScheduleReport {
                name: s.name,
                cron: s.cron,
                agency_values: s.agency_values.to_vec(),
                next_run: next_run_estimate(s.cron, now)
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "see cron expression".to_string()),
            })
            .collect();

        let inner = self.state.lock();
        SyncStatusReport {
            running: self.state.is_running(),
            season: self.config.season.clone(),
            last_run: inner.last_run,
            last_success: inner.last_success,
            last_error: inner.last_error.clone(),
            last_result: inner.last_result,
            total_runs: inner.total_runs,
            total_errors: inner.total_errors,
            schedules,
        }
    }
}

/// Best-effort next-fire-time for the schedule table's cron shapes:
/// fixed minute with either `*/N` hours or a fixed hour, optionally pinned
/// to one numeric day of week. Anything else yields `None`.
pub fn next_run_estimate(cron: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let fields: Vec<&str> = cron.split_whitespace().collect();
    let [minute, hour, dom, month, dow] = fields.as_slice() else {
        return None;
    };
    if *dom != "*" || *month != "*" {
        return None;
    }
    let minute: u32 = minute.parse().ok()?;

    enum HourSpec {
        Every(u32),
        At(u32),
    }
    let hour_spec = if let Some(step) = hour.strip_prefix("*/") {
        HourSpec::Every(step.parse().ok()?)
    } else {
        HourSpec::At(hour.parse().ok()?)
    };
    let dow: Option<u32> = match *dow {
        "*" => None,
        other => Some(other.parse().ok()?),
    };

    let today = now.date_naive();
    for day_offset in 0..8 {
        let date = today + ChronoDuration::days(day_offset);
        if let Some(wanted) = dow {
            if date.weekday().num_days_from_sunday() != wanted % 7 {
                continue;
            }
        }
        for h in 0..24u32 {
            match hour_spec {
                HourSpec::Every(step) if step == 0 || h % step != 0 => continue,
                HourSpec::At(at) if h != at => continue,
                _ => {}
            }
            let candidate = date
                .and_time(NaiveTime::from_hms_opt(h, minute, 0)?)
                .and_utc();
            if candidate > now {
                return Some(candidate);
            }
        }
    }
    None
}

/// Register the cron jobs and the delayed warm-up sync. Returns `None`
/// when the scheduler is disabled by configuration.
pub async fn start_scheduler(service: Arc<MirrorService>) -> Result<Option<JobScheduler>> {
    if !service.config.scheduler_enabled {
        info!("scheduler disabled by configuration");
        return Ok(None);
    }

    let sched = JobScheduler::new().await.context("creating scheduler")?;
    for schedule in SCHEDULES {
        let svc = Arc::clone(&service);
        // Seconds field prepended for the 6-field syntax the crate expects.
        let cron = format!("0 {}", schedule.cron);
        let job = Job::new_async(cron.as_str(), move |_uuid, _lock| {
            let svc = Arc::clone(&svc);
            Box::pin(async move {
                if let Err(err) = svc.run_sync(schedule.agency_values, None, schedule.name).await {
                    error!(schedule = schedule.name, error = %format!("{err:#}"), "scheduled sync failed");
                }
            })
        })
        .with_context(|| format!("creating job for schedule {}", schedule.name))?;
        sched.add(job).await.context("adding scheduler job")?;
    }

    let warmup = Arc::clone(&service);
    let delay = service.config.startup_delay;
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if let Err(err) = warmup.run_sync(&[AgencyValue::Critical], None, "startup").await {
            error!(error = %format!("{err:#}"), "startup sync failed");
        }
    });

    sched.start().await.context("starting scheduler")?;
    Ok(Some(sched))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone};
    use saff_core::{
        ScrapeBundle, ScrapedFixture, ScrapedStanding, ScrapedTeam,
    };
    use saff_scrape::ScrapeError;
    use saff_store::{FixtureFilter, MemoryStore, StandingFilter};

    /// Canned source serving one realistic bundle for the top league and
    /// empty pages for everything else.
    struct CannedSource;

    #[async_trait]
    impl ChampionshipSource for CannedSource {
        async fn scrape_one(
            &self,
            saff_id: i32,
            season: &str,
        ) -> Result<ScrapeBundle, ScrapeError> {
            if saff_id != 333 {
                return Ok(ScrapeBundle::empty(saff_id, season));
            }
            Ok(ScrapeBundle {
                saff_id,
                season: season.to_string(),
                standings: vec![
                    ScrapedStanding {
                        position: 1,
                        saff_team_id: 1001,
                        team_name_en: "Al Hilal".to_string(),
                        team_name_ar: String::new(),
                        played: 10,
                        won: 7,
                        drawn: 2,
                        lost: 1,
                        goals_for: 20,
                        goals_against: 8,
                        goal_difference: 12,
                        points: 23,
                    },
                    ScrapedStanding {
                        position: 2,
                        saff_team_id: 1002,
                        team_name_en: "Al Nassr".to_string(),
                        team_name_ar: String::new(),
                        played: 10,
                        won: 6,
                        drawn: 2,
                        lost: 2,
                        goals_for: 18,
                        goals_against: 10,
                        goal_difference: 8,
                        points: 20,
                    },
                ],
                fixtures: vec![ScrapedFixture {
                    date: NaiveDate::from_ymd_opt(2025, 9, 12).unwrap(),
                    time: Some("18:00".to_string()),
                    saff_home_team_id: 1001,
                    home_team_name_en: "Al Hilal".to_string(),
                    saff_away_team_id: 1002,
                    away_team_name_en: "Al Nassr".to_string(),
                    home_score: Some(2),
                    away_score: Some(1),
                    stadium: "Kingdom Arena".to_string(),
                    city: "Riyadh".to_string(),
                }],
                teams: vec![
                    ScrapedTeam {
                        saff_team_id: 1001,
                        team_name_en: "Al Hilal".to_string(),
                    },
                    ScrapedTeam {
                        saff_team_id: 1002,
                        team_name_en: "Al Nassr".to_string(),
                    },
                ],
                scraped_at: Utc::now(),
            })
        }
    }

    fn service() -> MirrorService {
        MirrorService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(CannedSource),
            SyncConfig::default(),
            Duration::ZERO,
        )
    }

    #[tokio::test]
    async fn seed_then_sync_then_map_then_import() {
        let svc = service();

        let created = svc.seed_catalog().await.unwrap();
        assert_eq!(created, tournament_seed().len());
        assert_eq!(svc.seed_catalog().await.unwrap(), 0);

        let counts = svc
            .run_sync(&[AgencyValue::Critical], None, "test")
            .await
            .unwrap()
            .expect("tournaments should match");
        assert_eq!(counts.standings, 2);
        assert_eq!(counts.fixtures, 1);
        assert_eq!(counts.teams, 2);

        let standings = svc
            .store()
            .list_standings(&StandingFilter {
                saff_tournament_id: Some(333),
                ..Default::default()
            })
            .await
            .unwrap();
        let hilal = &standings[0];
        assert_eq!(hilal.standing.team_name_en, "Al Hilal");
        assert_eq!(hilal.standing.played, 10);
        assert_eq!(hilal.standing.goal_difference, 12);
        assert_eq!(hilal.standing.points, 23);

        let imports = svc
            .import_to_sadara(&[333], "2025-2026", &[ImportType::Clubs, ImportType::Matches])
            .await
            .unwrap();
        assert_eq!(imports.clubs_created, 2);
        assert_eq!(imports.clubs_linked, 2);
        assert_eq!(imports.matches_created, 1);
        assert_eq!(imports.fixtures_skipped, 0);

        // Re-import is a no-op thanks to the match back-reference.
        let again = svc
            .import_to_sadara(&[333], "2025-2026", &[ImportType::Clubs, ImportType::Matches])
            .await
            .unwrap();
        assert_eq!(again, ImportCounts::default());

        let stats = svc.store().stats().await.unwrap();
        assert_eq!(stats.clubs, 2);
        assert_eq!(stats.matches, 1);
        assert_eq!(stats.unmapped_team_maps, 0);
    }

    #[tokio::test]
    async fn matches_need_both_sides_mapped() {
        let svc = service();
        svc.seed_catalog().await.unwrap();
        svc.run_sync(&[AgencyValue::Critical], None, "test").await.unwrap();

        // Map only the home side.
        let (club, _) = svc
            .store()
            .find_or_create_club("Al Hilal", None, "Roshn Saudi League")
            .await
            .unwrap();
        svc.store()
            .map_team_to_club(1001, "2025-2026", club.id)
            .await
            .unwrap();

        let imports = svc
            .import_to_sadara(&[333], "2025-2026", &[ImportType::Matches])
            .await
            .unwrap();
        assert_eq!(imports.matches_created, 0);
        assert_eq!(imports.fixtures_skipped, 1);
    }

    #[tokio::test]
    async fn concurrent_sync_is_skipped() {
        let svc = service();
        svc.seed_catalog().await.unwrap();

        assert!(svc.state.try_begin());
        let result = svc
            .run_sync(&[AgencyValue::Critical], None, "test")
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(svc.sync_status().total_runs, 0);
        svc.state.finish();

        let result = svc
            .run_sync(&[AgencyValue::Critical], None, "test")
            .await
            .unwrap();
        assert!(result.is_some());
        assert!(!svc.state.is_running());
        assert_eq!(svc.sync_status().total_runs, 1);
    }

    #[tokio::test]
    async fn sync_with_no_matching_tier_is_a_noop() {
        let svc = service();
        svc.seed_catalog().await.unwrap();
        let result = svc.run_sync(&[], None, "test").await.unwrap();
        assert!(result.is_none());
        let status = svc.sync_status();
        assert_eq!(status.total_runs, 1);
        assert!(status.last_success.is_none());
    }

    #[tokio::test]
    async fn mapping_cascade_updates_fixture_sides() {
        let svc = service();
        svc.seed_catalog().await.unwrap();
        svc.run_sync(&[AgencyValue::Critical], None, "test").await.unwrap();

        svc.import_to_sadara(&[333], "2025-2026", &[ImportType::Clubs])
            .await
            .unwrap();
        let fixtures = svc
            .store()
            .list_fixtures(&FixtureFilter {
                saff_tournament_id: Some(333),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(fixtures[0].fixture.home_club_id.is_some());
        assert!(fixtures[0].fixture.away_club_id.is_some());
    }

    #[tokio::test]
    async fn club_import_links_every_unmapped_team_in_season() {
        let svc = service();
        svc.seed_catalog().await.unwrap();
        svc.run_sync(&[AgencyValue::Critical], None, "test").await.unwrap();

        // A team known only from another tournament's scrape.
        let king_cup = svc
            .store()
            .tournaments_by_saff_ids(&[342])
            .await
            .unwrap()
            .remove(0);
        let bundle = ScrapeBundle {
            saff_id: 342,
            season: "2025-2026".to_string(),
            standings: vec![],
            fixtures: vec![],
            teams: vec![ScrapedTeam {
                saff_team_id: 1003,
                team_name_en: "Al Ahli".to_string(),
            }],
            scraped_at: Utc::now(),
        };
        svc.store()
            .apply_snapshot(&king_cup, "2025-2026", &bundle, &[DataType::Teams])
            .await
            .unwrap();

        let imports = svc
            .import_to_sadara(&[333], "2025-2026", &[ImportType::Clubs])
            .await
            .unwrap();
        assert_eq!(imports.clubs_created, 3);
        assert_eq!(imports.clubs_linked, 3);

        let unmapped = svc
            .store()
            .list_team_maps(&TeamMapFilter {
                season: Some("2025-2026".to_string()),
                unmapped_only: true,
            })
            .await
            .unwrap();
        assert!(unmapped.is_empty());
    }

    #[tokio::test]
    async fn manual_sync_honors_season_override() {
        let svc = service();
        svc.seed_catalog().await.unwrap();
        svc.run_sync(&[AgencyValue::Critical], Some("2024-2025"), "test")
            .await
            .unwrap();

        let overridden = svc
            .store()
            .list_standings(&StandingFilter {
                season: Some("2024-2025".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(overridden.len(), 2);

        let configured = svc
            .store()
            .list_standings(&StandingFilter {
                season: Some("2025-2026".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(configured.is_empty());
    }

    #[test]
    fn running_flag_clears_on_panic() {
        let state = SyncState::new();
        assert!(state.try_begin());
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = RunningGuard(&state);
            panic!("boom");
        }));
        assert!(result.is_err());
        assert!(!state.is_running());
    }

    #[test]
    fn estimator_handles_every_n_hours() {
        let now = Utc.with_ymd_and_hms(2025, 9, 12, 13, 30, 0).unwrap();
        let next = next_run_estimate("0 */12 * * *", now).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2025, 9, 13, 0, 0, 0).unwrap());

        let before_noon = Utc.with_ymd_and_hms(2025, 9, 12, 3, 0, 0).unwrap();
        let next = next_run_estimate("0 */12 * * *", before_noon).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2025, 9, 12, 12, 0, 0).unwrap());
    }

    #[test]
    fn estimator_handles_fixed_hour() {
        let now = Utc.with_ymd_and_hms(2025, 9, 12, 5, 0, 0).unwrap();
        let next = next_run_estimate("0 4 * * *", now).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2025, 9, 13, 4, 0, 0).unwrap());
    }

    #[test]
    fn estimator_handles_weekly_day() {
        // 2025-09-12 is a Friday; next Sunday 03:00 is the 14th.
        let now = Utc.with_ymd_and_hms(2025, 9, 12, 10, 0, 0).unwrap();
        let next = next_run_estimate("0 3 * * 0", now).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2025, 9, 14, 3, 0, 0).unwrap());
    }

    #[test]
    fn estimator_gives_up_on_unsupported_shapes() {
        let now = Utc::now();
        assert!(next_run_estimate("0 4 1 * *", now).is_none());
        assert!(next_run_estimate("not a cron", now).is_none());
    }

    #[test]
    fn status_report_covers_all_schedules() {
        let svc = service();
        let status = svc.sync_status();
        assert_eq!(status.schedules.len(), 3);
        assert!(status
            .schedules
            .iter()
            .all(|s| s.next_run != "see cron expression"));
    }
}

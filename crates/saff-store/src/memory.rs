//! In-memory [`MirrorStore`] used by tests and offline runs.
//!
//! Mutations lock one mutex around the whole dataset, which gives the same
//! all-or-nothing visibility as the Postgres transactions without any of the
//! machinery. Not meant for concurrent production use.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use saff_core::{
    AgencyValue, Club, DataType, Fixture, FixtureStatus, MatchRecord, NewMatch, ScrapeBundle,
    Standing, TeamMap, Tournament, TournamentMeta, TournamentSeed,
};

use crate::{
    FixtureFilter, FixtureView, MirrorStore, Page, Pagination, SnapshotCounts, StandingFilter,
    StandingView, Stats, StoreError, TeamMapFilter, TournamentFilter,
};

#[derive(Debug, Default)]
struct Inner {
    tournaments: Vec<Tournament>,
    standings: Vec<Standing>,
    fixtures: Vec<Fixture>,
    team_maps: Vec<TeamMap>,
    clubs: Vec<Club>,
    matches: Vec<MatchRecord>,
}

impl Inner {
    fn mapped_club(&self, saff_team_id: i32, season: &str) -> Option<Uuid> {
        self.team_maps
            .iter()
            .find(|m| m.saff_team_id == saff_team_id && m.season == season)
            .and_then(|m| m.club_id)
    }

    fn meta_for(&self, tournament_id: Uuid) -> Option<TournamentMeta> {
        self.tournaments
            .iter()
            .find(|t| t.id == tournament_id)
            .map(TournamentMeta::from)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl MirrorStore for MemoryStore {
    async fn seed_tournaments(&self, seeds: &[TournamentSeed]) -> Result<usize, StoreError> {
        let mut inner = self.lock();
        let mut created = 0;
        for seed in seeds {
            if inner.tournaments.iter().any(|t| t.saff_id == seed.saff_id) {
                continue;
            }
            inner.tournaments.push(Tournament {
                id: Uuid::new_v4(),
                saff_id: seed.saff_id,
                name: seed.name.to_string(),
                name_ar: seed.name_ar.to_string(),
                category: seed.category,
                tier: seed.tier,
                agency_value: seed.agency_value,
                icon: Some(seed.icon.to_string()),
                is_active: true,
                last_synced_at: None,
            });
            created += 1;
        }
        Ok(created)
    }

    async fn list_tournaments(
        &self,
        filter: &TournamentFilter,
        page: Pagination,
    ) -> Result<Page<Tournament>, StoreError> {
        let inner = self.lock();
        let needle = filter.search.as_deref().map(str::to_lowercase);
        let mut items: Vec<Tournament> = inner
            .tournaments
            .iter()
            .filter(|t| filter.category.map_or(true, |c| t.category == c))
            .filter(|t| filter.tier.map_or(true, |tier| t.tier == tier))
            .filter(|t| filter.agency_value.map_or(true, |a| t.agency_value == a))
            .filter(|t| {
                needle
                    .as_deref()
                    .map_or(true, |n| t.name.to_lowercase().contains(n))
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| (a.tier, &a.name).cmp(&(b.tier, &b.name)));

        let total = items.len() as u64;
        let page = page.clamp();
        let items = items
            .into_iter()
            .skip(page.offset())
            .take(page.per_page as usize)
            .collect();
        Ok(Page {
            items,
            page: page.page,
            per_page: page.per_page,
            total,
        })
    }

    async fn tournaments_by_saff_ids(
        &self,
        saff_ids: &[i32],
    ) -> Result<Vec<Tournament>, StoreError> {
        let inner = self.lock();
        Ok(saff_ids
            .iter()
            .filter_map(|id| inner.tournaments.iter().find(|t| t.saff_id == *id))
            .cloned()
            .collect())
    }

    async fn active_tournaments_by_agency(
        &self,
        agency_values: &[AgencyValue],
    ) -> Result<Vec<Tournament>, StoreError> {
        let inner = self.lock();
        Ok(inner
            .tournaments
            .iter()
            .filter(|t| t.is_active && agency_values.contains(&t.agency_value))
            .cloned()
            .collect())
    }

    async fn apply_snapshot(
        &self,
        tournament: &Tournament,
        season: &str,
        bundle: &ScrapeBundle,
        data_types: &[DataType],
    ) -> Result<SnapshotCounts, StoreError> {
        let mut inner = self.lock();
        let mut counts = SnapshotCounts::default();

        if data_types.contains(&DataType::Teams) {
            for team in &bundle.teams {
                let exists = inner
                    .team_maps
                    .iter()
                    .any(|m| m.saff_team_id == team.saff_team_id && m.season == season);
                if !exists {
                    inner.team_maps.push(TeamMap {
                        id: Uuid::new_v4(),
                        saff_team_id: team.saff_team_id,
                        season: season.to_string(),
                        team_name_en: team.team_name_en.clone(),
                        team_name_ar: String::new(),
                        city: None,
                        club_id: None,
                    });
                }
            }
            counts.teams = bundle.teams.len();
        }

        if data_types.contains(&DataType::Standings) && !bundle.standings.is_empty() {
            inner
                .standings
                .retain(|s| !(s.tournament_id == tournament.id && s.season == season));
            for row in &bundle.standings {
                let club_id = inner.mapped_club(row.saff_team_id, season);
                inner.standings.push(Standing {
                    id: Uuid::new_v4(),
                    tournament_id: tournament.id,
                    season: season.to_string(),
                    position: row.position,
                    saff_team_id: row.saff_team_id,
                    team_name_en: row.team_name_en.clone(),
                    team_name_ar: row.team_name_ar.clone(),
                    played: row.played,
                    won: row.won,
                    drawn: row.drawn,
                    lost: row.lost,
                    goals_for: row.goals_for,
                    goals_against: row.goals_against,
                    goal_difference: row.goal_difference,
                    points: row.points,
                    club_id,
                });
            }
            counts.standings = bundle.standings.len();
        }

        if data_types.contains(&DataType::Fixtures) && !bundle.fixtures.is_empty() {
            inner
                .fixtures
                .retain(|f| !(f.tournament_id == tournament.id && f.season == season));
            for row in &bundle.fixtures {
                let home_club_id = inner.mapped_club(row.saff_home_team_id, season);
                let away_club_id = inner.mapped_club(row.saff_away_team_id, season);
                inner.fixtures.push(Fixture {
                    id: Uuid::new_v4(),
                    tournament_id: tournament.id,
                    season: season.to_string(),
                    week: None,
                    match_date: row.date,
                    match_time: row.time.clone(),
                    saff_home_team_id: row.saff_home_team_id,
                    home_team_name_en: row.home_team_name_en.clone(),
                    home_team_name_ar: String::new(),
                    saff_away_team_id: row.saff_away_team_id,
                    away_team_name_en: row.away_team_name_en.clone(),
                    away_team_name_ar: String::new(),
                    home_score: row.home_score,
                    away_score: row.away_score,
                    stadium: (!row.stadium.is_empty()).then(|| row.stadium.clone()),
                    city: (!row.city.is_empty()).then(|| row.city.clone()),
                    status: FixtureStatus::from_home_score(row.home_score),
                    home_club_id,
                    away_club_id,
                    match_id: None,
                });
            }
            counts.fixtures = bundle.fixtures.len();
        }

        if let Some(t) = inner
            .tournaments
            .iter_mut()
            .find(|t| t.id == tournament.id)
        {
            t.last_synced_at = Some(Utc::now());
        }

        Ok(counts)
    }

    async fn list_standings(
        &self,
        filter: &StandingFilter,
    ) -> Result<Vec<StandingView>, StoreError> {
        let inner = self.lock();
        let saff_tournament = filter.saff_tournament_id.and_then(|saff_id| {
            inner
                .tournaments
                .iter()
                .find(|t| t.saff_id == saff_id)
                .map(|t| t.id)
        });
        let mut rows: Vec<StandingView> = inner
            .standings
            .iter()
            .filter(|s| filter.tournament_id.map_or(true, |id| s.tournament_id == id))
            .filter(|s| saff_tournament.map_or(filter.saff_tournament_id.is_none(), |id| s.tournament_id == id))
            .filter(|s| filter.season.as_deref().map_or(true, |x| s.season == x))
            .filter(|s| filter.club_id.map_or(true, |id| s.club_id == Some(id)))
            .filter_map(|s| {
                Some(StandingView {
                    standing: s.clone(),
                    tournament: inner.meta_for(s.tournament_id)?,
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            (a.tournament.tier, a.standing.position).cmp(&(b.tournament.tier, b.standing.position))
        });
        Ok(rows)
    }

    async fn list_fixtures(&self, filter: &FixtureFilter) -> Result<Vec<FixtureView>, StoreError> {
        let inner = self.lock();
        let saff_tournament = filter.saff_tournament_id.and_then(|saff_id| {
            inner
                .tournaments
                .iter()
                .find(|t| t.saff_id == saff_id)
                .map(|t| t.id)
        });
        let mut rows: Vec<FixtureView> = inner
            .fixtures
            .iter()
            .filter(|f| filter.tournament_id.map_or(true, |id| f.tournament_id == id))
            .filter(|f| saff_tournament.map_or(filter.saff_tournament_id.is_none(), |id| f.tournament_id == id))
            .filter(|f| filter.season.as_deref().map_or(true, |x| f.season == x))
            .filter(|f| {
                filter.club_id.map_or(true, |id| {
                    f.home_club_id == Some(id) || f.away_club_id == Some(id)
                })
            })
            .filter(|f| filter.status.map_or(true, |x| f.status == x))
            .filter(|f| filter.from.map_or(true, |d| f.match_date >= d))
            .filter(|f| filter.to.map_or(true, |d| f.match_date <= d))
            .filter_map(|f| {
                Some(FixtureView {
                    fixture: f.clone(),
                    tournament: inner.meta_for(f.tournament_id)?,
                })
            })
            .collect();
        rows.sort_by_key(|v| (v.fixture.match_date, v.fixture.match_time.clone()));
        Ok(rows)
    }

    async fn list_team_maps(&self, filter: &TeamMapFilter) -> Result<Vec<TeamMap>, StoreError> {
        let inner = self.lock();
        let mut rows: Vec<TeamMap> = inner
            .team_maps
            .iter()
            .filter(|m| filter.season.as_deref().map_or(true, |x| m.season == x))
            .filter(|m| !filter.unmapped_only || m.club_id.is_none())
            .cloned()
            .collect();
        rows.sort_by_key(|m| m.saff_team_id);
        Ok(rows)
    }

    async fn map_team_to_club(
        &self,
        saff_team_id: i32,
        season: &str,
        club_id: Uuid,
    ) -> Result<TeamMap, StoreError> {
        let mut inner = self.lock();
        let club = inner
            .clubs
            .iter()
            .find(|c| c.id == club_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("club {club_id}")))?;

        let map = match inner
            .team_maps
            .iter_mut()
            .find(|m| m.saff_team_id == saff_team_id && m.season == season)
        {
            Some(existing) => {
                existing.club_id = Some(club_id);
                existing.clone()
            }
            None => {
                let map = TeamMap {
                    id: Uuid::new_v4(),
                    saff_team_id,
                    season: season.to_string(),
                    team_name_en: club.name.clone(),
                    team_name_ar: club.name_ar.clone().unwrap_or_default(),
                    city: club.city.clone(),
                    club_id: Some(club_id),
                };
                inner.team_maps.push(map.clone());
                map
            }
        };

        for s in inner
            .standings
            .iter_mut()
            .filter(|s| s.saff_team_id == saff_team_id && s.season == season)
        {
            s.club_id = Some(club_id);
        }
        for f in inner.fixtures.iter_mut().filter(|f| f.season == season) {
            if f.saff_home_team_id == saff_team_id {
                f.home_club_id = Some(club_id);
            }
            if f.saff_away_team_id == saff_team_id {
                f.away_club_id = Some(club_id);
            }
        }

        Ok(map)
    }

    async fn team_map_for(
        &self,
        saff_team_id: i32,
        season: &str,
    ) -> Result<Option<TeamMap>, StoreError> {
        let inner = self.lock();
        Ok(inner
            .team_maps
            .iter()
            .find(|m| m.saff_team_id == saff_team_id && m.season == season)
            .cloned())
    }

    async fn find_or_create_club(
        &self,
        name: &str,
        name_ar: Option<&str>,
        league: &str,
    ) -> Result<(Club, bool), StoreError> {
        let mut inner = self.lock();
        if let Some(existing) = inner
            .clubs
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
        {
            return Ok((existing.clone(), false));
        }
        let club = Club {
            id: Uuid::new_v4(),
            name: name.to_string(),
            name_ar: name_ar.map(str::to_string),
            country: "Saudi Arabia".to_string(),
            city: None,
            league: Some(league.to_string()),
        };
        inner.clubs.push(club.clone());
        Ok((club, true))
    }

    async fn unimported_fixtures(
        &self,
        tournament_id: Uuid,
        season: &str,
    ) -> Result<Vec<Fixture>, StoreError> {
        let inner = self.lock();
        let mut rows: Vec<Fixture> = inner
            .fixtures
            .iter()
            .filter(|f| {
                f.tournament_id == tournament_id && f.season == season && f.match_id.is_none()
            })
            .cloned()
            .collect();
        rows.sort_by_key(|f| f.match_date);
        Ok(rows)
    }

    async fn promote_fixture(
        &self,
        fixture_id: Uuid,
        new_match: &NewMatch,
    ) -> Result<Uuid, StoreError> {
        let mut inner = self.lock();
        let match_id = Uuid::new_v4();
        let fixture = inner
            .fixtures
            .iter_mut()
            .find(|f| f.id == fixture_id)
            .ok_or_else(|| StoreError::NotFound(format!("fixture {fixture_id}")))?;
        fixture.match_id = Some(match_id);
        inner.matches.push(MatchRecord {
            id: match_id,
            home_club_id: new_match.home_club_id,
            away_club_id: new_match.away_club_id,
            competition: new_match.competition.clone(),
            season: new_match.season.clone(),
            match_date: new_match.match_date,
            venue: new_match.venue.clone(),
            status: new_match.status,
            home_score: new_match.home_score,
            away_score: new_match.away_score,
        });
        Ok(match_id)
    }

    async fn stats(&self) -> Result<Stats, StoreError> {
        let inner = self.lock();
        Ok(Stats {
            tournaments: inner.tournaments.len() as i64,
            active_tournaments: inner.tournaments.iter().filter(|t| t.is_active).count() as i64,
            standings: inner.standings.len() as i64,
            fixtures: inner.fixtures.len() as i64,
            team_maps: inner.team_maps.len() as i64,
            unmapped_team_maps: inner.team_maps.iter().filter(|m| m.club_id.is_none()).count()
                as i64,
            clubs: inner.clubs.len() as i64,
            matches: inner.matches.len() as i64,
        })
    }
}

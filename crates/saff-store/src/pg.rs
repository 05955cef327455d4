//! Postgres implementation of [`MirrorStore`] over non-macro `sqlx` queries.
//!
//! Enum-ish columns (category, agency value, status) are stored as TEXT and
//! parsed on the way out; a value that fails to parse surfaces as a decode
//! error rather than being silently dropped.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::{QueryBuilder, Row};
use tracing::debug;
use uuid::Uuid;

use saff_core::{
    AgencyValue, Category, Club, DataType, Fixture, FixtureStatus, NewMatch, ScrapeBundle,
    Standing, TeamMap, Tournament, TournamentMeta, TournamentSeed,
};

use crate::{
    FixtureFilter, FixtureView, MirrorStore, Page, Pagination, SnapshotCounts, StandingFilter,
    StandingView, Stats, StoreError, TeamMapFilter, TournamentFilter,
};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn decode_err(column: &str, value: &str) -> sqlx::Error {
    sqlx::Error::Decode(format!("unrecognized {column} value: {value}").into())
}

fn tournament_from_row(row: &PgRow) -> Result<Tournament, sqlx::Error> {
    let category: String = row.try_get("category")?;
    let agency: String = row.try_get("agency_value")?;
    Ok(Tournament {
        id: row.try_get("id")?,
        saff_id: row.try_get("saff_id")?,
        name: row.try_get("name")?,
        name_ar: row.try_get("name_ar")?,
        category: Category::parse(&category).ok_or_else(|| decode_err("category", &category))?,
        tier: row.try_get("tier")?,
        agency_value: AgencyValue::parse(&agency)
            .ok_or_else(|| decode_err("agency_value", &agency))?,
        icon: row.try_get("icon")?,
        is_active: row.try_get("is_active")?,
        last_synced_at: row.try_get("last_synced_at")?,
    })
}

fn meta_from_row(row: &PgRow) -> Result<TournamentMeta, sqlx::Error> {
    let category: String = row.try_get("t_category")?;
    Ok(TournamentMeta {
        id: row.try_get("t_id")?,
        saff_id: row.try_get("t_saff_id")?,
        name: row.try_get("t_name")?,
        name_ar: row.try_get("t_name_ar")?,
        category: Category::parse(&category).ok_or_else(|| decode_err("category", &category))?,
        tier: row.try_get("t_tier")?,
    })
}

fn standing_from_row(row: &PgRow) -> Result<Standing, sqlx::Error> {
    Ok(Standing {
        id: row.try_get("id")?,
        tournament_id: row.try_get("tournament_id")?,
        season: row.try_get("season")?,
        position: row.try_get("position")?,
        saff_team_id: row.try_get("saff_team_id")?,
        team_name_en: row.try_get("team_name_en")?,
        team_name_ar: row.try_get("team_name_ar")?,
        played: row.try_get("played")?,
        won: row.try_get("won")?,
        drawn: row.try_get("drawn")?,
        lost: row.try_get("lost")?,
        goals_for: row.try_get("goals_for")?,
        goals_against: row.try_get("goals_against")?,
        goal_difference: row.try_get("goal_difference")?,
        points: row.try_get("points")?,
        club_id: row.try_get("club_id")?,
    })
}

fn fixture_from_row(row: &PgRow) -> Result<Fixture, sqlx::Error> {
    let status: String = row.try_get("status")?;
    Ok(Fixture {
        id: row.try_get("id")?,
        tournament_id: row.try_get("tournament_id")?,
        season: row.try_get("season")?,
        week: row.try_get("week")?,
        match_date: row.try_get("match_date")?,
        match_time: row.try_get("match_time")?,
        saff_home_team_id: row.try_get("saff_home_team_id")?,
        home_team_name_en: row.try_get("home_team_name_en")?,
        home_team_name_ar: row.try_get("home_team_name_ar")?,
        saff_away_team_id: row.try_get("saff_away_team_id")?,
        away_team_name_en: row.try_get("away_team_name_en")?,
        away_team_name_ar: row.try_get("away_team_name_ar")?,
        home_score: row.try_get("home_score")?,
        away_score: row.try_get("away_score")?,
        stadium: row.try_get("stadium")?,
        city: row.try_get("city")?,
        status: FixtureStatus::parse(&status).ok_or_else(|| decode_err("status", &status))?,
        home_club_id: row.try_get("home_club_id")?,
        away_club_id: row.try_get("away_club_id")?,
        match_id: row.try_get("match_id")?,
    })
}

fn team_map_from_row(row: &PgRow) -> Result<TeamMap, sqlx::Error> {
    Ok(TeamMap {
        id: row.try_get("id")?,
        saff_team_id: row.try_get("saff_team_id")?,
        season: row.try_get("season")?,
        team_name_en: row.try_get("team_name_en")?,
        team_name_ar: row.try_get("team_name_ar")?,
        city: row.try_get("city")?,
        club_id: row.try_get("club_id")?,
    })
}

fn club_from_row(row: &PgRow) -> Result<Club, sqlx::Error> {
    Ok(Club {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        name_ar: row.try_get("name_ar")?,
        country: row.try_get("country")?,
        city: row.try_get("city")?,
        league: row.try_get("league")?,
    })
}

const STANDING_VIEW_COLUMNS: &str = r#"
    s.id, s.tournament_id, s.season, s."position", s.saff_team_id,
    s.team_name_en, s.team_name_ar, s.played, s.won, s.drawn, s.lost,
    s.goals_for, s.goals_against, s.goal_difference, s.points, s.club_id,
    t.id AS t_id, t.saff_id AS t_saff_id, t.name AS t_name,
    t.name_ar AS t_name_ar, t.category AS t_category, t.tier AS t_tier
"#;

const FIXTURE_VIEW_COLUMNS: &str = r#"
    f.id, f.tournament_id, f.season, f.week, f.match_date, f.match_time,
    f.saff_home_team_id, f.home_team_name_en, f.home_team_name_ar,
    f.saff_away_team_id, f.away_team_name_en, f.away_team_name_ar,
    f.home_score, f.away_score, f.stadium, f.city, f.status,
    f.home_club_id, f.away_club_id, f.match_id,
    t.id AS t_id, t.saff_id AS t_saff_id, t.name AS t_name,
    t.name_ar AS t_name_ar, t.category AS t_category, t.tier AS t_tier
"#;

#[async_trait]
impl MirrorStore for PgStore {
    async fn seed_tournaments(&self, seeds: &[TournamentSeed]) -> Result<usize, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut created = 0;
        for seed in seeds {
            let result = sqlx::query(
                r#"
                INSERT INTO saff_tournaments
                    (id, saff_id, name, name_ar, category, tier, agency_value, icon, is_active)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE)
                ON CONFLICT (saff_id) DO NOTHING
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(seed.saff_id)
            .bind(seed.name)
            .bind(seed.name_ar)
            .bind(seed.category.as_str())
            .bind(seed.tier)
            .bind(seed.agency_value.as_str())
            .bind(seed.icon)
            .execute(&mut *tx)
            .await?;
            created += result.rows_affected() as usize;
        }
        tx.commit().await?;
        Ok(created)
    }

    async fn list_tournaments(
        &self,
        filter: &TournamentFilter,
        page: Pagination,
    ) -> Result<Page<Tournament>, StoreError> {
        let page = page.clamp();

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM saff_tournaments WHERE TRUE");
        let mut select = QueryBuilder::new(
            "SELECT id, saff_id, name, name_ar, category, tier, agency_value, icon, is_active, \
             last_synced_at FROM saff_tournaments WHERE TRUE",
        );
        for qb in [&mut count, &mut select] {
            if let Some(category) = filter.category {
                qb.push(" AND category = ").push_bind(category.as_str());
            }
            if let Some(tier) = filter.tier {
                qb.push(" AND tier = ").push_bind(tier);
            }
            if let Some(agency) = filter.agency_value {
                qb.push(" AND agency_value = ").push_bind(agency.as_str());
            }
            if let Some(search) = &filter.search {
                qb.push(" AND name ILIKE ")
                    .push_bind(format!("%{search}%"));
            }
        }
        select.push(" ORDER BY tier, name LIMIT ");
        select.push_bind(page.per_page as i64);
        select.push(" OFFSET ");
        select.push_bind(page.offset() as i64);

        let total: i64 = count.build().fetch_one(&self.pool).await?.try_get(0)?;
        let rows = select.build().fetch_all(&self.pool).await?;
        let items = rows
            .iter()
            .map(tournament_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page {
            items,
            page: page.page,
            per_page: page.per_page,
            total: total as u64,
        })
    }

    async fn tournaments_by_saff_ids(
        &self,
        saff_ids: &[i32],
    ) -> Result<Vec<Tournament>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, saff_id, name, name_ar, category, tier, agency_value, icon,
                   is_active, last_synced_at
              FROM saff_tournaments
             WHERE saff_id = ANY($1)
             ORDER BY tier, name
            "#,
        )
        .bind(saff_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .iter()
            .map(tournament_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn active_tournaments_by_agency(
        &self,
        agency_values: &[AgencyValue],
    ) -> Result<Vec<Tournament>, StoreError> {
        let values: Vec<String> = agency_values.iter().map(|v| v.as_str().to_string()).collect();
        let rows = sqlx::query(
            r#"
            SELECT id, saff_id, name, name_ar, category, tier, agency_value, icon,
                   is_active, last_synced_at
              FROM saff_tournaments
             WHERE is_active AND agency_value = ANY($1)
             ORDER BY tier, name
            "#,
        )
        .bind(&values)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .iter()
            .map(tournament_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn apply_snapshot(
        &self,
        tournament: &Tournament,
        season: &str,
        bundle: &ScrapeBundle,
        data_types: &[DataType],
    ) -> Result<SnapshotCounts, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut counts = SnapshotCounts::default();

        if data_types.contains(&DataType::Teams) {
            for team in &bundle.teams {
                sqlx::query(
                    r#"
                    INSERT INTO saff_team_maps (id, saff_team_id, season, team_name_en, team_name_ar)
                    VALUES ($1, $2, $3, $4, '')
                    ON CONFLICT (saff_team_id, season) DO NOTHING
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(team.saff_team_id)
                .bind(season)
                .bind(&team.team_name_en)
                .execute(&mut *tx)
                .await?;
            }
            counts.teams = bundle.teams.len();
        }

        if data_types.contains(&DataType::Standings) && !bundle.standings.is_empty() {
            sqlx::query("DELETE FROM saff_standings WHERE tournament_id = $1 AND season = $2")
                .bind(tournament.id)
                .bind(season)
                .execute(&mut *tx)
                .await?;
            for row in &bundle.standings {
                sqlx::query(
                    r#"
                    INSERT INTO saff_standings
                        (id, tournament_id, season, "position", saff_team_id, team_name_en,
                         team_name_ar, played, won, drawn, lost, goals_for, goals_against,
                         goal_difference, points, club_id)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                            (SELECT club_id FROM saff_team_maps
                              WHERE saff_team_id = $5 AND season = $3))
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(tournament.id)
                .bind(season)
                .bind(row.position)
                .bind(row.saff_team_id)
                .bind(&row.team_name_en)
                .bind(&row.team_name_ar)
                .bind(row.played)
                .bind(row.won)
                .bind(row.drawn)
                .bind(row.lost)
                .bind(row.goals_for)
                .bind(row.goals_against)
                .bind(row.goal_difference)
                .bind(row.points)
                .execute(&mut *tx)
                .await?;
            }
            counts.standings = bundle.standings.len();
        }

        if data_types.contains(&DataType::Fixtures) && !bundle.fixtures.is_empty() {
            sqlx::query("DELETE FROM saff_fixtures WHERE tournament_id = $1 AND season = $2")
                .bind(tournament.id)
                .bind(season)
                .execute(&mut *tx)
                .await?;
            for row in &bundle.fixtures {
                let status = FixtureStatus::from_home_score(row.home_score);
                sqlx::query(
                    r#"
                    INSERT INTO saff_fixtures
                        (id, tournament_id, season, match_date, match_time,
                         saff_home_team_id, home_team_name_en, home_team_name_ar,
                         saff_away_team_id, away_team_name_en, away_team_name_ar,
                         home_score, away_score, stadium, city, status,
                         home_club_id, away_club_id)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, '', $8, $9, '', $10, $11, $12, $13, $14,
                            (SELECT club_id FROM saff_team_maps
                              WHERE saff_team_id = $6 AND season = $3),
                            (SELECT club_id FROM saff_team_maps
                              WHERE saff_team_id = $8 AND season = $3))
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(tournament.id)
                .bind(season)
                .bind(row.date)
                .bind(&row.time)
                .bind(row.saff_home_team_id)
                .bind(&row.home_team_name_en)
                .bind(row.saff_away_team_id)
                .bind(&row.away_team_name_en)
                .bind(row.home_score)
                .bind(row.away_score)
                .bind((!row.stadium.is_empty()).then_some(row.stadium.as_str()))
                .bind((!row.city.is_empty()).then_some(row.city.as_str()))
                .bind(status.as_str())
                .execute(&mut *tx)
                .await?;
            }
            counts.fixtures = bundle.fixtures.len();
        }

        sqlx::query("UPDATE saff_tournaments SET last_synced_at = NOW() WHERE id = $1")
            .bind(tournament.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!(
            tournament = %tournament.name,
            standings = counts.standings,
            fixtures = counts.fixtures,
            teams = counts.teams,
            "snapshot committed"
        );
        Ok(counts)
    }

    async fn list_standings(
        &self,
        filter: &StandingFilter,
    ) -> Result<Vec<StandingView>, StoreError> {
        let mut qb = QueryBuilder::new("SELECT ");
        qb.push(STANDING_VIEW_COLUMNS);
        qb.push(
            " FROM saff_standings s JOIN saff_tournaments t ON t.id = s.tournament_id WHERE TRUE",
        );
        if let Some(id) = filter.tournament_id {
            qb.push(" AND s.tournament_id = ").push_bind(id);
        }
        if let Some(saff_id) = filter.saff_tournament_id {
            qb.push(" AND t.saff_id = ").push_bind(saff_id);
        }
        if let Some(season) = &filter.season {
            qb.push(" AND s.season = ").push_bind(season);
        }
        if let Some(club_id) = filter.club_id {
            qb.push(" AND s.club_id = ").push_bind(club_id);
        }
        qb.push(r#" ORDER BY t.tier, s."position""#);

        let rows = qb.build().fetch_all(&self.pool).await?;
        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            out.push(StandingView {
                standing: standing_from_row(row)?,
                tournament: meta_from_row(row)?,
            });
        }
        Ok(out)
    }

    async fn list_fixtures(&self, filter: &FixtureFilter) -> Result<Vec<FixtureView>, StoreError> {
        let mut qb = QueryBuilder::new("SELECT ");
        qb.push(FIXTURE_VIEW_COLUMNS);
        qb.push(
            " FROM saff_fixtures f JOIN saff_tournaments t ON t.id = f.tournament_id WHERE TRUE",
        );
        if let Some(id) = filter.tournament_id {
            qb.push(" AND f.tournament_id = ").push_bind(id);
        }
        if let Some(saff_id) = filter.saff_tournament_id {
            qb.push(" AND t.saff_id = ").push_bind(saff_id);
        }
        if let Some(season) = &filter.season {
            qb.push(" AND f.season = ").push_bind(season);
        }
        if let Some(club_id) = filter.club_id {
            qb.push(" AND (f.home_club_id = ")
                .push_bind(club_id)
                .push(" OR f.away_club_id = ")
                .push_bind(club_id)
                .push(")");
        }
        if let Some(status) = filter.status {
            qb.push(" AND f.status = ").push_bind(status.as_str());
        }
        if let Some(from) = filter.from {
            qb.push(" AND f.match_date >= ").push_bind(from);
        }
        if let Some(to) = filter.to {
            qb.push(" AND f.match_date <= ").push_bind(to);
        }
        qb.push(" ORDER BY f.match_date, f.match_time NULLS LAST");

        let rows = qb.build().fetch_all(&self.pool).await?;
        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            out.push(FixtureView {
                fixture: fixture_from_row(row)?,
                tournament: meta_from_row(row)?,
            });
        }
        Ok(out)
    }

    async fn list_team_maps(&self, filter: &TeamMapFilter) -> Result<Vec<TeamMap>, StoreError> {
        let mut qb = QueryBuilder::new(
            "SELECT id, saff_team_id, season, team_name_en, team_name_ar, city, club_id \
             FROM saff_team_maps WHERE TRUE",
        );
        if let Some(season) = &filter.season {
            qb.push(" AND season = ").push_bind(season);
        }
        if filter.unmapped_only {
            qb.push(" AND club_id IS NULL");
        }
        qb.push(" ORDER BY saff_team_id");

        let rows = qb.build().fetch_all(&self.pool).await?;
        Ok(rows
            .iter()
            .map(team_map_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn map_team_to_club(
        &self,
        saff_team_id: i32,
        season: &str,
        club_id: Uuid,
    ) -> Result<TeamMap, StoreError> {
        let mut tx = self.pool.begin().await?;

        let club_row = sqlx::query(
            "SELECT id, name, name_ar, country, city, league FROM clubs WHERE id = $1",
        )
        .bind(club_id)
        .fetch_optional(&mut *tx)
        .await?;
        let club = match club_row {
            Some(row) => club_from_row(&row)?,
            None => return Err(StoreError::NotFound(format!("club {club_id}"))),
        };

        let map_row = sqlx::query(
            r#"
            INSERT INTO saff_team_maps
                (id, saff_team_id, season, team_name_en, team_name_ar, city, club_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (saff_team_id, season) DO UPDATE SET club_id = EXCLUDED.club_id
            RETURNING id, saff_team_id, season, team_name_en, team_name_ar, city, club_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(saff_team_id)
        .bind(season)
        .bind(&club.name)
        .bind(club.name_ar.as_deref().unwrap_or_default())
        .bind(&club.city)
        .bind(club_id)
        .fetch_one(&mut *tx)
        .await?;
        let map = team_map_from_row(&map_row)?;

        sqlx::query(
            "UPDATE saff_standings SET club_id = $1 WHERE saff_team_id = $2 AND season = $3",
        )
        .bind(club_id)
        .bind(saff_team_id)
        .bind(season)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "UPDATE saff_fixtures SET home_club_id = $1 WHERE saff_home_team_id = $2 AND season = $3",
        )
        .bind(club_id)
        .bind(saff_team_id)
        .bind(season)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "UPDATE saff_fixtures SET away_club_id = $1 WHERE saff_away_team_id = $2 AND season = $3",
        )
        .bind(club_id)
        .bind(saff_team_id)
        .bind(season)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(map)
    }

    async fn team_map_for(
        &self,
        saff_team_id: i32,
        season: &str,
    ) -> Result<Option<TeamMap>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, saff_team_id, season, team_name_en, team_name_ar, city, club_id
              FROM saff_team_maps
             WHERE saff_team_id = $1 AND season = $2
            "#,
        )
        .bind(saff_team_id)
        .bind(season)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(team_map_from_row).transpose()?)
    }

    async fn find_or_create_club(
        &self,
        name: &str,
        name_ar: Option<&str>,
        league: &str,
    ) -> Result<(Club, bool), StoreError> {
        if let Some(row) = sqlx::query(
            "SELECT id, name, name_ar, country, city, league FROM clubs WHERE LOWER(name) = LOWER($1)",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?
        {
            return Ok((club_from_row(&row)?, false));
        }

        let row = sqlx::query(
            r#"
            INSERT INTO clubs (id, name, name_ar, country, league)
            VALUES ($1, $2, $3, 'Saudi Arabia', $4)
            RETURNING id, name, name_ar, country, city, league
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(name_ar)
        .bind(league)
        .fetch_one(&self.pool)
        .await?;
        Ok((club_from_row(&row)?, true))
    }

    async fn unimported_fixtures(
        &self,
        tournament_id: Uuid,
        season: &str,
    ) -> Result<Vec<Fixture>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, tournament_id, season, week, match_date, match_time,
                   saff_home_team_id, home_team_name_en, home_team_name_ar,
                   saff_away_team_id, away_team_name_en, away_team_name_ar,
                   home_score, away_score, stadium, city, status,
                   home_club_id, away_club_id, match_id
              FROM saff_fixtures
             WHERE tournament_id = $1 AND season = $2 AND match_id IS NULL
             ORDER BY match_date
            "#,
        )
        .bind(tournament_id)
        .bind(season)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .iter()
            .map(fixture_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn promote_fixture(
        &self,
        fixture_id: Uuid,
        new_match: &NewMatch,
    ) -> Result<Uuid, StoreError> {
        let mut tx = self.pool.begin().await?;
        let match_id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO matches
                (id, home_club_id, away_club_id, competition, season, match_date,
                 venue, status, home_score, away_score)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(match_id)
        .bind(new_match.home_club_id)
        .bind(new_match.away_club_id)
        .bind(&new_match.competition)
        .bind(&new_match.season)
        .bind(new_match.match_date)
        .bind(&new_match.venue)
        .bind(new_match.status.as_str())
        .bind(new_match.home_score)
        .bind(new_match.away_score)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query("UPDATE saff_fixtures SET match_id = $1 WHERE id = $2")
            .bind(match_id)
            .bind(fixture_id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("fixture {fixture_id}")));
        }

        tx.commit().await?;
        Ok(match_id)
    }

    async fn stats(&self) -> Result<Stats, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM saff_tournaments) AS tournaments,
                (SELECT COUNT(*) FROM saff_tournaments WHERE is_active) AS active_tournaments,
                (SELECT COUNT(*) FROM saff_standings) AS standings,
                (SELECT COUNT(*) FROM saff_fixtures) AS fixtures,
                (SELECT COUNT(*) FROM saff_team_maps) AS team_maps,
                (SELECT COUNT(*) FROM saff_team_maps WHERE club_id IS NULL) AS unmapped_team_maps,
                (SELECT COUNT(*) FROM clubs) AS clubs,
                (SELECT COUNT(*) FROM matches) AS matches
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(Stats {
            tournaments: row.try_get("tournaments")?,
            active_tournaments: row.try_get("active_tournaments")?,
            standings: row.try_get("standings")?,
            fixtures: row.try_get("fixtures")?,
            team_maps: row.try_get("team_maps")?,
            unmapped_team_maps: row.try_get("unmapped_team_maps")?,
            clubs: row.try_get("clubs")?,
            matches: row.try_get("matches")?,
        })
    }
}

//! JSON API over the mirror for downstream platform services.
//!
//! Read endpoints only touch the store, so they keep working when the
//! upstream site is down; scraping happens behind `/fetch` and the sync
//! trigger.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::error;
use uuid::Uuid;

use chrono::NaiveDate;
use saff_core::{AgencyValue, Category, DataType, FixtureStatus, ImportType};
use saff_store::{
    FixtureFilter, MirrorStore, Page, Pagination, StandingFilter, StoreError, TeamMapFilter,
    TournamentFilter,
};
use saff_sync::MirrorService;

pub const CRATE_NAME: &str = "saff-web";

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<MirrorService>,
}

impl AppState {
    pub fn new(service: Arc<MirrorService>) -> Self {
        Self { service }
    }

    fn store(&self) -> Arc<dyn MirrorStore> {
        self.service.store()
    }
}

enum ApiError {
    NotFound(String),
    Internal(anyhow::Error),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => ApiError::NotFound(what),
            other => ApiError::Internal(other.into()),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(what) => (StatusCode::NOT_FOUND, format!("not found: {what}")),
            ApiError::Internal(err) => {
                error!(error = %format!("{err:#}"), "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{err:#}"))
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/tournaments", get(list_tournaments))
        .route("/tournaments/seed", post(seed_tournaments))
        .route("/fetch", post(fetch_from_source))
        .route("/standings", get(list_standings))
        .route("/fixtures", get(list_fixtures))
        .route("/team-maps", get(list_team_maps))
        .route("/team-maps/map", post(map_team))
        .route("/import", post(import_to_sadara))
        .route("/stats", get(stats))
        .route("/sync/status", get(sync_status))
        .route("/sync/trigger", post(trigger_sync))
        .with_state(Arc::new(state))
}

pub async fn serve_from_env(service: Arc<MirrorService>) -> anyhow::Result<()> {
    let port: u16 = std::env::var("SAFF_WEB_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8080);
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "listening");
    axum::serve(listener, app(AppState::new(service))).await?;
    Ok(())
}

fn page_of(page: Option<u32>, per_page: Option<u32>) -> Pagination {
    let defaults = Pagination::default();
    Pagination {
        page: page.unwrap_or(defaults.page),
        per_page: per_page.unwrap_or(defaults.per_page),
    }
}

/// The store returns full filtered lists (the sync service consumes them
/// whole); list endpoints slice them into pages here.
fn paginate<T>(items: Vec<T>, page: Pagination) -> Page<T> {
    let page = page.clamp();
    let total = items.len() as u64;
    let items = items
        .into_iter()
        .skip(page.offset())
        .take(page.per_page as usize)
        .collect();
    Page {
        items,
        page: page.page,
        per_page: page.per_page,
        total,
    }
}

#[derive(Debug, Default, Deserialize)]
struct TournamentsQuery {
    category: Option<Category>,
    tier: Option<i32>,
    agency_value: Option<AgencyValue>,
    search: Option<String>,
    page: Option<u32>,
    per_page: Option<u32>,
}

async fn list_tournaments(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TournamentsQuery>,
) -> Result<Response, ApiError> {
    let filter = TournamentFilter {
        category: query.category,
        tier: query.tier,
        agency_value: query.agency_value,
        search: query.search,
    };
    let page = page_of(query.page, query.per_page);
    let result = state.store().list_tournaments(&filter, page).await?;
    Ok(Json(result).into_response())
}

#[derive(Debug, Serialize)]
struct SeedResponse {
    created: usize,
}

async fn seed_tournaments(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let created = state.service.seed_catalog().await?;
    Ok(Json(SeedResponse { created }).into_response())
}

#[derive(Debug, Deserialize)]
struct FetchRequest {
    saff_ids: Vec<i32>,
    season: Option<String>,
    data_types: Option<Vec<DataType>>,
}

async fn fetch_from_source(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FetchRequest>,
) -> Result<Response, ApiError> {
    let season = request
        .season
        .unwrap_or_else(|| state.service.season().to_string());
    let data_types = request
        .data_types
        .unwrap_or_else(|| vec![DataType::Standings, DataType::Fixtures, DataType::Teams]);
    let counts = state
        .service
        .fetch_from_source(&request.saff_ids, &season, &data_types)
        .await?;
    Ok(Json(counts).into_response())
}

#[derive(Debug, Default, Deserialize)]
struct StandingsQuery {
    tournament_id: Option<Uuid>,
    saff_tournament_id: Option<i32>,
    season: Option<String>,
    club_id: Option<Uuid>,
    page: Option<u32>,
    per_page: Option<u32>,
}

async fn list_standings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StandingsQuery>,
) -> Result<Response, ApiError> {
    let filter = StandingFilter {
        tournament_id: query.tournament_id,
        saff_tournament_id: query.saff_tournament_id,
        season: query.season,
        club_id: query.club_id,
    };
    let rows = state.store().list_standings(&filter).await?;
    Ok(Json(paginate(rows, page_of(query.page, query.per_page))).into_response())
}

#[derive(Debug, Default, Deserialize)]
struct FixturesQuery {
    tournament_id: Option<Uuid>,
    saff_tournament_id: Option<i32>,
    season: Option<String>,
    club_id: Option<Uuid>,
    status: Option<FixtureStatus>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    page: Option<u32>,
    per_page: Option<u32>,
}

async fn list_fixtures(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FixturesQuery>,
) -> Result<Response, ApiError> {
    let filter = FixtureFilter {
        tournament_id: query.tournament_id,
        saff_tournament_id: query.saff_tournament_id,
        season: query.season,
        club_id: query.club_id,
        status: query.status,
        from: query.from,
        to: query.to,
    };
    let rows = state.store().list_fixtures(&filter).await?;
    Ok(Json(paginate(rows, page_of(query.page, query.per_page))).into_response())
}

#[derive(Debug, Default, Deserialize)]
struct TeamMapsQuery {
    season: Option<String>,
    #[serde(default)]
    unmapped_only: bool,
    page: Option<u32>,
    per_page: Option<u32>,
}

async fn list_team_maps(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TeamMapsQuery>,
) -> Result<Response, ApiError> {
    let filter = TeamMapFilter {
        season: query.season,
        unmapped_only: query.unmapped_only,
    };
    let rows = state.store().list_team_maps(&filter).await?;
    Ok(Json(paginate(rows, page_of(query.page, query.per_page))).into_response())
}

#[derive(Debug, Deserialize)]
struct MapTeamRequest {
    saff_team_id: i32,
    season: Option<String>,
    club_id: Uuid,
}

async fn map_team(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MapTeamRequest>,
) -> Result<Response, ApiError> {
    let season = request
        .season
        .unwrap_or_else(|| state.service.season().to_string());
    let map = state
        .store()
        .map_team_to_club(request.saff_team_id, &season, request.club_id)
        .await?;
    Ok(Json(map).into_response())
}

#[derive(Debug, Deserialize)]
struct ImportRequest {
    saff_ids: Vec<i32>,
    season: Option<String>,
    import_types: Option<Vec<ImportType>>,
}

async fn import_to_sadara(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ImportRequest>,
) -> Result<Response, ApiError> {
    let season = request
        .season
        .unwrap_or_else(|| state.service.season().to_string());
    let import_types = request
        .import_types
        .unwrap_or_else(|| vec![ImportType::Clubs, ImportType::Matches]);
    let counts = state
        .service
        .import_to_sadara(&request.saff_ids, &season, &import_types)
        .await?;
    Ok(Json(counts).into_response())
}

async fn stats(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let stats = state.store().stats().await?;
    Ok(Json(stats).into_response())
}

async fn sync_status(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    Ok(Json(state.service.sync_status()).into_response())
}

#[derive(Debug, Default, Deserialize)]
struct TriggerRequest {
    agency_values: Option<Vec<AgencyValue>>,
    season: Option<String>,
}

/// Fire-and-forget: the sync runs in the background and its outcome lands
/// in `/sync/status`.
async fn trigger_sync(
    State(state): State<Arc<AppState>>,
    body: Option<Json<TriggerRequest>>,
) -> Response {
    let TriggerRequest {
        agency_values,
        season,
    } = body.map(|Json(b)| b).unwrap_or_default();
    let agency_values =
        agency_values.unwrap_or_else(|| vec![AgencyValue::Critical, AgencyValue::High]);
    let service = Arc::clone(&state.service);
    tokio::spawn(async move {
        if let Err(err) = service
            .run_sync(&agency_values, season.as_deref(), "manual")
            .await
        {
            error!(error = %format!("{err:#}"), "manual sync failed");
        }
    });
    (
        StatusCode::ACCEPTED,
        Json(serde_json::json!({ "status": "triggered" })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use chrono::{NaiveDate, Utc};
    use http_body_util::BodyExt;
    use saff_core::{ScrapeBundle, ScrapedFixture, ScrapedStanding, ScrapedTeam};
    use saff_scrape::{ChampionshipSource, ScrapeError};
    use saff_store::MemoryStore;
    use saff_sync::SyncConfig;
    use std::time::Duration;
    use tower::ServiceExt;

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
                standings: vec![ScrapedStanding {
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
                }],
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

    fn test_app() -> Router {
        let service = Arc::new(MirrorService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(CannedSource),
            SyncConfig::default(),
            Duration::ZERO,
        ));
        app(AppState::new(service))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn seed_and_list_tournaments() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(post_json("/tournaments/seed", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let seeded = body_json(response).await;
        assert_eq!(seeded["created"], 45);

        let response = app
            .oneshot(get_req("/tournaments?category=pro&per_page=10"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let page = body_json(response).await;
        assert_eq!(page["total"], 7);
        assert_eq!(page["items"][0]["saff_id"], 342); // King Cup sorts first in tier 1
    }

    #[tokio::test]
    async fn fetch_then_read_standings_and_fixtures() {
        let app = test_app();
        app.clone()
            .oneshot(post_json("/tournaments/seed", serde_json::json!({})))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(post_json("/fetch", serde_json::json!({ "saff_ids": [333] })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let counts = body_json(response).await;
        assert_eq!(counts["standings"], 1);
        assert_eq!(counts["fixtures"], 1);

        let response = app
            .clone()
            .oneshot(get_req("/standings?saff_tournament_id=333"))
            .await
            .unwrap();
        let standings = body_json(response).await;
        assert_eq!(standings["total"], 1);
        assert_eq!(standings["items"][0]["team_name_en"], "Al Hilal");
        assert_eq!(standings["items"][0]["goal_difference"], 12);
        assert_eq!(standings["items"][0]["tournament"]["saff_id"], 333);

        let response = app
            .oneshot(get_req("/fixtures?status=completed"))
            .await
            .unwrap();
        let fixtures = body_json(response).await;
        assert_eq!(fixtures["items"][0]["home_score"], 2);
        assert_eq!(fixtures["items"][0]["stadium"], "Kingdom Arena");
    }

    #[tokio::test]
    async fn mapping_unknown_club_is_404() {
        let app = test_app();
        app.clone()
            .oneshot(post_json("/tournaments/seed", serde_json::json!({})))
            .await
            .unwrap();

        let response = app
            .oneshot(post_json(
                "/team-maps/map",
                serde_json::json!({
                    "saff_team_id": 1001,
                    "club_id": Uuid::new_v4(),
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn status_and_trigger() {
        let app = test_app();

        let response = app.clone().oneshot(get_req("/sync/status")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let status = body_json(response).await;
        assert_eq!(status["running"], false);
        assert_eq!(status["schedules"].as_array().unwrap().len(), 3);

        let response = app
            .oneshot(post_json(
                "/sync/trigger",
                serde_json::json!({ "season": "2024-2025" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn stats_empty_store() {
        let app = test_app();
        let response = app.oneshot(get_req("/stats")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let stats = body_json(response).await;
        assert_eq!(stats["tournaments"], 0);
        assert_eq!(stats["matches"], 0);
    }
}

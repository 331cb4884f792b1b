//! Single binary web server: REST API over the in-memory bracket store.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable via DNS on a VPS.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080),
//! TOURNAMENT_TTL_HOURS (inactive tournaments are dropped after this many hours).

use actix_web::{
    get, post, put,
    web::{Data, Json, Path, Query},
    App, HttpRequest, HttpResponse, HttpServer, Responder,
};
use bracket_tournament_web::{
    create_tournament, parse_roster_csv, shuffle_entries, BracketView, PlayerEntry,
    ResultSubmission, StoreError, Tournament, TournamentError, TournamentId, TournamentStore,
};
use serde::Deserialize;
use std::time::Duration;

type AppState = Data<TournamentStore>;

/// Header carrying the caller's identity; checked against the tournament owner.
const OWNER_HEADER: &str = "X-Owner-Id";

/// How often inactive tournaments are swept.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(30 * 60);

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    players: Vec<PlayerEntry>,
    /// Randomize the draw before seeding.
    #[serde(default)]
    shuffle: bool,
    #[serde(default)]
    owner_id: Option<String>,
}

#[derive(Deserialize)]
struct ImportQuery {
    name: String,
    #[serde(default)]
    shuffle: bool,
    #[serde(default)]
    owner_id: Option<String>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

fn owner(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(OWNER_HEADER)
        .and_then(|v| v.to_str().ok())
}

fn error_response(e: StoreError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        StoreError::NotFound(_) => HttpResponse::NotFound().json(body),
        StoreError::Forbidden => HttpResponse::Forbidden().json(body),
        StoreError::Lock => HttpResponse::InternalServerError().json(body),
        StoreError::Tournament(TournamentError::MatchAlreadyCompleted(_)) => {
            HttpResponse::Conflict().json(body)
        }
        StoreError::Tournament(_) => HttpResponse::BadRequest().json(body),
    }
}

/// Seed, build and store a new tournament.
fn create_and_store(
    state: &TournamentStore,
    name: &str,
    mut entries: Vec<PlayerEntry>,
    shuffle: bool,
    owner_id: Option<String>,
) -> HttpResponse {
    if shuffle {
        shuffle_entries(&mut entries, &mut rand::thread_rng());
    }
    let mut tournament: Tournament = match create_tournament(name, entries) {
        Ok(t) => t,
        Err(e) => return error_response(e.into()),
    };
    tournament.owner_id = owner_id;
    let response = HttpResponse::Ok().json(&tournament);
    match state.insert(tournament) {
        Ok(id) => {
            log::info!("Created tournament {}", id);
            response
        }
        Err(e) => error_response(e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "bracket-tournament-web",
    })
}

/// List tournaments, newest first. With an X-Owner-Id header, only that owner's.
#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState, req: HttpRequest) -> HttpResponse {
    match state.list(owner(&req)) {
        Ok(summaries) => HttpResponse::Ok().json(&summaries),
        Err(e) => error_response(e),
    }
}

/// Create a tournament from a JSON roster (returns it with id; client stores id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let body = body.into_inner();
    create_and_store(&state, &body.name, body.players, body.shuffle, body.owner_id)
}

/// Create a tournament from a CSV roster (`name,handicap` header).
#[post("/api/tournaments/import")]
async fn api_import_tournament(state: AppState, query: Query<ImportQuery>, body: String) -> HttpResponse {
    let entries = match parse_roster_csv(body.as_bytes()) {
        Ok(entries) => entries,
        Err(e) => return error_response(e.into()),
    };
    let query = query.into_inner();
    create_and_store(&state, &query.name, entries, query.shuffle, query.owner_id)
}

/// Get a tournament by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.get(path.id) {
        Ok(t) => HttpResponse::Ok().json(&t),
        Err(e) => error_response(e),
    }
}

/// Bracket grouped by named rounds with players resolved (for rendering).
#[get("/api/tournaments/{id}/bracket")]
async fn api_get_bracket(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.read(path.id, BracketView::from_tournament) {
        Ok(view) => HttpResponse::Ok().json(&view),
        Err(e) => error_response(e),
    }
}

/// Flat tournament/player/match rows (for a storage collaborator). Owner only.
#[get("/api/tournaments/{id}/records")]
async fn api_get_records(state: AppState, path: Path<TournamentPath>, req: HttpRequest) -> HttpResponse {
    match state.records(path.id, owner(&req)) {
        Ok(records) => HttpResponse::Ok().json(&records),
        Err(e) => error_response(e),
    }
}

/// Start the tournament (Draft -> Ongoing). Owner only.
#[post("/api/tournaments/{id}/start")]
async fn api_start_tournament(state: AppState, path: Path<TournamentPath>, req: HttpRequest) -> HttpResponse {
    match state.start(path.id, owner(&req)) {
        Ok(t) => HttpResponse::Ok().json(&t),
        Err(e) => error_response(e),
    }
}

/// Record one match result and advance the winner. Owner only, tournament must be ongoing.
#[put("/api/tournaments/{id}/matches/result")]
async fn api_submit_result(
    state: AppState,
    path: Path<TournamentPath>,
    req: HttpRequest,
    body: Json<ResultSubmission>,
) -> HttpResponse {
    match state.submit_result(path.id, owner(&req), &body) {
        Ok((advancement, t)) => HttpResponse::Ok().json(serde_json::json!({
            "advancement": advancement,
            "tournament": t,
        })),
        Err(e) => error_response(e),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_ttl_hours() -> u64 {
    12
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let ttl_hours: u64 = std::env::var("TOURNAMENT_TTL_HOURS")
        .ok()
        .and_then(|h| h.parse().ok())
        .unwrap_or_else(default_ttl_hours);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(TournamentStore::with_ttl_hours(ttl_hours));

    // Background task: periodically remove tournaments inactive for longer than the TTL
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            match state_cleanup.cleanup_inactive() {
                Ok(0) => {}
                Ok(removed) => log::info!(
                    "Cleaned up {} inactive tournament(s) (no activity for {}h)",
                    removed,
                    ttl_hours
                ),
                Err(e) => log::error!("Cleanup failed: {}", e),
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_list_tournaments)
            .service(api_create_tournament)
            .service(api_import_tournament)
            .service(api_get_tournament)
            .service(api_get_bracket)
            .service(api_get_records)
            .service(api_start_tournament)
            .service(api_submit_result)
    })
    .bind(bind)?
    .run()
    .await
}

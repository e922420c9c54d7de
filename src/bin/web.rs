//! Single binary web server: JSON API over the in-memory store.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT, SWISS_ROUNDS,
//! EVENT_CHANNEL_CAPACITY.

use actix_web::{
    get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use circuit_tournament_web::{
    standings_csv, CircuitId, Config, ErrorKind, GameMatch, MatchId, Participant, ParticipantId,
    ParticipantStatus, RankedEntry, Stage, StageId, StageType, Store, Tournament, TournamentError,
    TournamentFormat, TournamentId,
};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use tokio::sync::broadcast::error::RecvError;

type AppState = Data<RwLock<Store>>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(default)]
    format: TournamentFormat,
    /// Falls back to the configured default.
    swiss_rounds: Option<u32>,
}

#[derive(Serialize)]
struct TournamentDetails<'a> {
    #[serde(flatten)]
    tournament: &'a Tournament,
    participants: Vec<&'a Participant>,
    stages: Vec<&'a Stage>,
}

#[derive(Deserialize)]
struct AddParticipantBody {
    team_name: Option<String>,
    seed: Option<u32>,
}

#[derive(Deserialize)]
struct SetStatusBody {
    status: ParticipantStatus,
}

#[derive(Deserialize)]
struct SetSeedBody {
    seed: Option<u32>,
}

#[derive(Deserialize)]
struct CreateStageBody {
    name: String,
    stage_type: StageType,
    #[serde(default)]
    order: u32,
}

/// Remote procedure input: `{stageId, format}`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateMatchesBody {
    stage_id: StageId,
    format: TournamentFormat,
}

#[derive(Serialize)]
struct GenerateMatchesResponse {
    matches: Vec<GameMatch>,
}

#[derive(Deserialize)]
struct RecordResultBody {
    score_p1: u32,
    score_p2: u32,
}

/// Remote procedure input: `{tournamentId}`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalculateRankingBody {
    tournament_id: TournamentId,
}

#[derive(Serialize)]
struct RankingResponse {
    ranking: Vec<RankedEntry>,
}

#[derive(Deserialize)]
struct CreateCircuitBody {
    name: String,
}

#[derive(Deserialize)]
struct AddCircuitTournamentBody {
    tournament_id: TournamentId,
    #[serde(default)]
    order: u32,
    #[serde(default = "default_multiplier")]
    points_multiplier: u32,
}

fn default_multiplier() -> u32 {
    1
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and participant id.
#[derive(Deserialize)]
struct TournamentParticipantPath {
    id: TournamentId,
    participant_id: ParticipantId,
}

#[derive(Deserialize)]
struct StagePath {
    id: StageId,
}

#[derive(Deserialize)]
struct MatchPath {
    id: MatchId,
}

#[derive(Deserialize)]
struct CircuitPath {
    id: CircuitId,
}

/// Map a domain error to a status code with `{ "error": message }`.
fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e.kind() {
        ErrorKind::Validation => HttpResponse::BadRequest().json(body),
        ErrorKind::Consistency => HttpResponse::UnprocessableEntity().json(body),
        ErrorKind::InvalidState => HttpResponse::Conflict().json(body),
        ErrorKind::NotFound => HttpResponse::NotFound().json(body),
    }
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "circuit-tournament-web",
    })
}

/// Create a new draft tournament.
#[post("/api/tournaments")]
async fn api_create_tournament(
    state: AppState,
    config: Data<Config>,
    body: Json<CreateTournamentBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let body = body.into_inner();
    let swiss_rounds = body.swiss_rounds.unwrap_or(config.swiss_rounds).max(1);
    let t = g.create_tournament(body.name.trim(), body.format, swiss_rounds);
    HttpResponse::Ok().json(t)
}

/// Tournament with its participants and stages.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.tournament(path.id) {
        Ok(tournament) => HttpResponse::Ok().json(TournamentDetails {
            tournament,
            participants: g.participants(path.id),
            stages: g.stages(path.id),
        }),
        Err(e) => error_response(&e),
    }
}

/// Register a participant (status `registered`).
#[post("/api/tournaments/{id}/participants")]
async fn api_add_participant(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<AddParticipantBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let body = body.into_inner();
    match g.add_participant(path.id, body.team_name, body.seed) {
        Ok(p) => HttpResponse::Ok().json(p),
        Err(e) => error_response(&e),
    }
}

/// Confirm, eliminate, ... a participant.
#[put("/api/tournaments/{id}/participants/{participant_id}/status")]
async fn api_set_participant_status(
    state: AppState,
    path: Path<TournamentParticipantPath>,
    body: Json<SetStatusBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.set_participant_status(path.id, path.participant_id, body.status) {
        Ok(p) => HttpResponse::Ok().json(p),
        Err(e) => error_response(&e),
    }
}

#[put("/api/tournaments/{id}/participants/{participant_id}/seed")]
async fn api_set_participant_seed(
    state: AppState,
    path: Path<TournamentParticipantPath>,
    body: Json<SetSeedBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.set_participant_seed(path.id, path.participant_id, body.seed) {
        Ok(p) => HttpResponse::Ok().json(p),
        Err(e) => error_response(&e),
    }
}

/// Create a pending stage.
#[post("/api/tournaments/{id}/stages")]
async fn api_create_stage(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<CreateStageBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let body = body.into_inner();
    match g.create_stage(path.id, body.name.trim(), body.stage_type, body.order) {
        Ok(stage) => HttpResponse::Ok().json(stage),
        Err(e) => error_response(&e),
    }
}

/// Close an active stage once all its matches are completed.
#[post("/api/stages/{id}/complete")]
async fn api_complete_stage(state: AppState, path: Path<StagePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.complete_stage(path.id) {
        Ok(stage) => HttpResponse::Ok().json(stage),
        Err(e) => error_response(&e),
    }
}

/// Generate matches for a stage, persist them, and activate the stage.
#[post("/api/generate-matches")]
async fn api_generate_matches(state: AppState, body: Json<GenerateMatchesBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.generate_stage_matches(body.stage_id, body.format) {
        Ok(matches) => HttpResponse::Ok().json(GenerateMatchesResponse { matches }),
        Err(e) => {
            log::warn!("Match generation for stage {} failed: {}", body.stage_id, e);
            error_response(&e)
        }
    }
}

/// Record the score of a match (winner derived from the scores).
#[put("/api/matches/{id}/result")]
async fn api_record_result(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<RecordResultBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.record_match_result(path.id, body.score_p1, body.score_p2) {
        Ok(m) => HttpResponse::Ok().json(m),
        Err(e) => error_response(&e),
    }
}

/// Ranking over all completed matches of a tournament.
#[post("/api/calculate-tournament-ranking")]
async fn api_calculate_ranking(state: AppState, body: Json<CalculateRankingBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.tournament_ranking(body.tournament_id) {
        Ok(ranking) => HttpResponse::Ok().json(RankingResponse { ranking }),
        Err(e) => {
            log::error!("Ranking for tournament {} failed: {}", body.tournament_id, e);
            error_response(&e)
        }
    }
}

#[get("/api/tournaments/{id}/ranking.csv")]
async fn api_ranking_csv(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let ranking = match g.tournament_ranking(path.id) {
        Ok(r) => r,
        Err(e) => return error_response(&e),
    };
    match standings_csv(&ranking) {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(csv),
        Err(e) => {
            log::error!("CSV export failed: {}", e);
            HttpResponse::InternalServerError().body("export error")
        }
    }
}

#[post("/api/circuits")]
async fn api_create_circuit(state: AppState, body: Json<CreateCircuitBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(g.create_circuit(body.name.trim()))
}

/// Attach a tournament to a circuit with a points multiplier.
#[post("/api/circuits/{id}/tournaments")]
async fn api_add_circuit_tournament(
    state: AppState,
    path: Path<CircuitPath>,
    body: Json<AddCircuitTournamentBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.add_circuit_tournament(path.id, body.tournament_id, body.order, body.points_multiplier) {
        Ok(c) => HttpResponse::Ok().json(c),
        Err(e) => error_response(&e),
    }
}

#[get("/api/circuits/{id}/ranking")]
async fn api_circuit_ranking(state: AppState, path: Path<CircuitPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.circuit_ranking(path.id) {
        Ok(ranking) => HttpResponse::Ok().json(RankingResponse { ranking }),
        Err(e) => error_response(&e),
    }
}

fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(api_health)
        .service(api_create_tournament)
        .service(api_get_tournament)
        .service(api_add_participant)
        .service(api_set_participant_status)
        .service(api_set_participant_seed)
        .service(api_create_stage)
        .service(api_complete_stage)
        .service(api_generate_matches)
        .service(api_record_result)
        .service(api_calculate_ranking)
        .service(api_ranking_csv)
        .service(api_create_circuit)
        .service(api_add_circuit_tournament)
        .service(api_circuit_ranking);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let store = Store::new(config.event_capacity);
    let mut events = store.subscribe();
    let state = Data::new(RwLock::new(store));
    let config = Data::new(config);

    // Background task: report stale rankings whenever the store changes.
    actix_web::rt::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => log::info!(
                    "Ranking of tournament {} is stale ({:?})",
                    event.tournament_id(),
                    event
                ),
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("Change listener lagged, skipped {} event(s)", skipped)
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(config.clone())
            .configure(configure)
    })
    .bind(bind)?
    .run()
    .await
}

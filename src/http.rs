//! REST API over the store. Every write runs in one store transaction.

use crate::api::v1::{
    BracketView, CreatedResponse, ErrorBody, FinalizeResponse, MatchView, PhaseView, PlayerView,
    RankingView, RefereeView, SeededResponse, TournamentView, VERSION,
};
use crate::config::EngineConfig;
use crate::logic::{
    adjust_player_points, create_player, create_referee, create_tournament, finalize_match,
    player_rankings, referee_rankings, register_player, seed_bracket, set_referee_availability,
    start_match,
};
use crate::models::{
    ErrorKind, MatchId, MatchResult, NewPlayer, NewReferee, NewTournament, PlayerId, RefereeId,
    TournamentError, TournamentId,
};
use crate::store::{Session, Store};
use actix_web::{
    get, post, put,
    web::{self, Data, Json, Path, Query},
    HttpResponse, Responder,
};
use chrono::Utc;
use serde::Deserialize;
use std::collections::HashMap;

/// Shared by all workers.
pub struct AppContext {
    pub store: Store,
    pub engine: EngineConfig,
}

impl AppContext {
    pub fn new(store: Store, engine: EngineConfig) -> Self {
        Self { store, engine }
    }
}

type AppState = Data<AppContext>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
    api_version: u32,
}

#[derive(Deserialize)]
struct RegisterBody {
    player_id: PlayerId,
}

#[derive(Deserialize)]
struct AvailabilityBody {
    available: bool,
}

#[derive(Deserialize)]
struct SeedBody {
    entrants: Vec<PlayerId>,
}

#[derive(Deserialize)]
struct PointsBody {
    /// May be negative.
    points: i32,
}

#[derive(Deserialize)]
struct PlayerListQuery {
    /// Order by ranking instead of id.
    #[serde(default)]
    ranking: bool,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and referee id.
#[derive(Deserialize)]
struct TournamentRefereePath {
    id: TournamentId,
    referee_id: RefereeId,
}

#[derive(Deserialize)]
struct MatchPath {
    id: MatchId,
}

#[derive(Deserialize)]
struct PlayerPath {
    id: PlayerId,
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = ErrorBody::from(e);
    match e.kind() {
        ErrorKind::NotFound => HttpResponse::NotFound().json(body),
        ErrorKind::InvalidInput => HttpResponse::BadRequest().json(body),
        ErrorKind::Conflict => HttpResponse::Conflict().json(body),
        ErrorKind::Integrity => {
            log::error!("Integrity error: {}", e);
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn respond<T: serde::Serialize>(result: Result<T, TournamentError>) -> HttpResponse {
    match result {
        Ok(body) => HttpResponse::Ok().json(body),
        Err(e) => error_response(&e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tennis-bracket-web",
        api_version: VERSION,
    })
}

#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    HttpResponse::Ok().json(
        state
            .store
            .read(|s| s.tournaments().map(TournamentView::from).collect::<Vec<_>>()),
    )
}

#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<NewTournament>) -> HttpResponse {
    let new = body.into_inner();
    let result = state
        .store
        .transaction(|s| create_tournament(s, new))
        .map(|id| CreatedResponse { id });
    respond(result)
}

fn bracket_view(session: &Session, tournament_id: TournamentId) -> Result<BracketView, TournamentError> {
    session.tournament(tournament_id)?;
    let mut phases: Vec<_> = session.phases_of(tournament_id).collect();
    phases.sort_by_key(|p| p.name);
    let phases = phases
        .into_iter()
        .map(|phase| {
            let matches = session
                .matches_in_phase(tournament_id, phase.id)
                .map(MatchView::from)
                .collect();
            let byes = session
                .byes_into(tournament_id, phase.id)
                .map(|b| b.player_id)
                .collect();
            PhaseView::new(phase, matches, byes)
        })
        .collect();
    Ok(BracketView {
        version: VERSION,
        tournament_id,
        phases,
    })
}

/// Matches of a tournament grouped by phase.
#[get("/api/tournaments/{id}/matches")]
async fn api_tournament_matches(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.store.read(|s| bracket_view(s, path.id)))
}

#[post("/api/tournaments/{id}/registrations")]
async fn api_register_player(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<RegisterBody>,
) -> HttpResponse {
    let result = state
        .store
        .transaction(|s| register_player(s, path.id, body.player_id, Utc::now()))
        .map(|id| CreatedResponse { id });
    respond(result)
}

#[put("/api/tournaments/{id}/referees/{referee_id}")]
async fn api_referee_availability(
    state: AppState,
    path: Path<TournamentRefereePath>,
    body: Json<AvailabilityBody>,
) -> HttpResponse {
    let result = state
        .store
        .transaction(|s| set_referee_availability(s, path.id, path.referee_id, body.available));
    match result {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}

/// Seed the opening phase from an ordered entrant list.
#[post("/api/tournaments/{id}/bracket")]
async fn api_seed_bracket(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<SeedBody>,
) -> HttpResponse {
    let result = state
        .store
        .transaction(|s| seed_bracket(s, &state.engine, path.id, &body.entrants))
        .map(|matches| SeededResponse {
            version: VERSION,
            tournament_id: path.id,
            matches,
        });
    respond(result)
}

#[post("/api/matches/{id}/start")]
async fn api_start_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    match state.store.transaction(|s| start_match(s, path.id)) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}

/// Record a match result and advance the bracket.
#[put("/api/matches/{id}/result")]
async fn api_finalize_match(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<MatchResult>,
) -> HttpResponse {
    let result = body.into_inner();
    let outcome = state
        .store
        .transaction(|s| finalize_match(s, &state.engine, path.id, result));
    if let Err(e) = &outcome {
        log::warn!("Rejected result for match {}: {}", path.id, e);
    }
    respond(outcome.map(FinalizeResponse::from))
}

#[get("/api/rankings/players")]
async fn api_player_rankings(state: AppState) -> HttpResponse {
    HttpResponse::Ok().json(state.store.read(|s| RankingView::from(player_rankings(s))))
}

#[get("/api/rankings/referees")]
async fn api_referee_rankings(state: AppState) -> HttpResponse {
    HttpResponse::Ok().json(state.store.read(|s| RankingView::from(referee_rankings(s))))
}

#[post("/api/players")]
async fn api_create_player(state: AppState, body: Json<NewPlayer>) -> HttpResponse {
    let new = body.into_inner();
    let result = state
        .store
        .transaction(|s| create_player(s, new))
        .map(|id| CreatedResponse { id });
    respond(result)
}

fn player_views(session: &Session, by_ranking: bool) -> Vec<PlayerView> {
    let ranks: HashMap<PlayerId, usize> = player_rankings(session)
        .into_iter()
        .map(|entry| (entry.id, entry.rank))
        .collect();
    let mut views: Vec<PlayerView> = session
        .players()
        .map(|p| PlayerView::new(p, ranks.get(&p.id).copied().unwrap_or_default()))
        .collect();
    if by_ranking {
        views.sort_by_key(|v| v.rank);
    }
    views
}

/// All players by id, or by ranking with `?ranking=true`.
#[get("/api/players")]
async fn api_list_players(state: AppState, query: Query<PlayerListQuery>) -> HttpResponse {
    HttpResponse::Ok().json(state.store.read(|s| player_views(s, query.ranking)))
}

/// Add (or with a negative value, remove) points outside of match results.
#[put("/api/players/{id}/points")]
async fn api_adjust_points(
    state: AppState,
    path: Path<PlayerPath>,
    body: Json<PointsBody>,
) -> HttpResponse {
    let result = state.store.transaction(|s| {
        adjust_player_points(s, path.id, body.points)?;
        let views = player_views(s, false);
        views
            .into_iter()
            .find(|v| v.id == path.id)
            .ok_or(TournamentError::PlayerNotFound(path.id))
    });
    respond(result)
}

#[post("/api/referees")]
async fn api_create_referee(state: AppState, body: Json<NewReferee>) -> HttpResponse {
    let new = body.into_inner();
    let result = state
        .store
        .transaction(|s| create_referee(s, new))
        .map(|id| CreatedResponse { id });
    respond(result)
}

#[get("/api/referees")]
async fn api_list_referees(state: AppState) -> HttpResponse {
    HttpResponse::Ok().json(
        state
            .store
            .read(|s| s.referees().map(RefereeView::from).collect::<Vec<_>>()),
    )
}

/// Register every route on an actix `App`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health)
        .service(api_list_tournaments)
        .service(api_create_tournament)
        .service(api_tournament_matches)
        .service(api_register_player)
        .service(api_referee_availability)
        .service(api_seed_bracket)
        .service(api_start_match)
        .service(api_finalize_match)
        .service(api_player_rankings)
        .service(api_referee_rankings)
        .service(api_create_player)
        .service(api_list_players)
        .service(api_adjust_points)
        .service(api_create_referee)
        .service(api_list_referees);
}

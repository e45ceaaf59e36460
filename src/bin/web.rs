//! Single binary web server: JSON API over in-memory classes and brackets.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, MEDAL_MIN_FORMS_STANDARD, MEDAL_MIN_DEFAULT, RUST_LOG.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use competition_bracket::{
    aggregate, read_roster, BracketError, Class, ClassId, Discipline, Division, EligibilityRule,
    Format, Gender, MatchId, MatchMetadata, Participant, Seeding, ServiceConfig,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory state: one division (class + roster + bracket) per class id.
/// The write lock serializes every mutation, so concurrent results never interleave.
type AppState = Data<RwLock<HashMap<ClassId, Division>>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateClassBody {
    name: String,
    #[serde(default)]
    discipline: Discipline,
    #[serde(default)]
    format: Format,
    #[serde(default)]
    age_category: String,
    #[serde(default)]
    weight_band: Option<String>,
    #[serde(default)]
    gender: Option<Gender>,
    #[serde(default)]
    roster: Vec<Participant>,
}

#[derive(Deserialize, Default)]
struct CreateBracketBody {
    #[serde(default)]
    seeding: Seeding,
}

#[derive(Deserialize)]
struct RecordResultBody {
    score_a: u32,
    score_b: u32,
    #[serde(default)]
    metadata: MatchMetadata,
}

#[derive(Deserialize)]
struct DeciderBody {
    challenger: usize,
}

#[derive(Deserialize)]
struct TallyQuery {
    level: Option<String>,
}

/// Path segment: class id (e.g. /api/classes/{id})
#[derive(Deserialize)]
struct ClassPath {
    id: ClassId,
}

/// Path segments: class id and match id (e.g. /api/classes/{id}/matches/{match_id})
#[derive(Deserialize)]
struct ClassMatchPath {
    id: ClassId,
    match_id: MatchId,
}

fn error_response(e: &BracketError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        BracketError::BracketNotFound | BracketError::MatchNotFound(_) => {
            HttpResponse::NotFound().json(body)
        }
        BracketError::BracketAlreadyExists => HttpResponse::Conflict().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn division_json(d: &Division) -> serde_json::Value {
    serde_json::json!({ "division": d, "state": d.state() })
}

/// Run `f` against one division under the write lock.
fn with_division<F>(state: &AppState, id: ClassId, f: F) -> HttpResponse
where
    F: FnOnce(&mut Division) -> Result<HttpResponse, BracketError>,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let division = match g.get_mut(&id) {
        Some(d) => d,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No class" })),
    };
    match f(division) {
        Ok(resp) => resp,
        Err(e) => {
            log::debug!("class {}: {}", id, e);
            error_response(&e)
        }
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "competition-bracket",
    })
}

/// Create a class with its approved roster (no bracket yet).
#[post("/api/classes")]
async fn api_create_class(state: AppState, body: Json<CreateClassBody>) -> HttpResponse {
    let body = body.into_inner();
    let class = Class {
        weight_band: body.weight_band,
        gender: body.gender,
        ..Class::new(body.name.trim(), body.discipline, body.format)
            .with_age_category(body.age_category)
    };
    let id = class.id;
    let division = Division::new(class, body.roster);
    let resp = HttpResponse::Ok().json(division_json(&division));
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.insert(id, division);
    resp
}

#[get("/api/classes/{id}")]
async fn api_get_class(state: AppState, path: Path<ClassPath>) -> HttpResponse {
    with_division(&state, path.id, |d| Ok(HttpResponse::Ok().json(division_json(d))))
}

/// Replace the roster from a CSV body. Rejected while a bracket exists.
#[post("/api/classes/{id}/roster")]
async fn api_replace_roster(state: AppState, path: Path<ClassPath>, body: String) -> HttpResponse {
    let roster = match read_roster(body.as_bytes()) {
        Ok(r) => r,
        Err(e) => return HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    };
    with_division(&state, path.id, |d| {
        if d.bracket.is_some() {
            return Err(BracketError::BracketAlreadyExists);
        }
        d.roster = roster;
        Ok(HttpResponse::Ok().json(division_json(d)))
    })
}

#[post("/api/classes/{id}/bracket")]
async fn api_create_bracket(
    state: AppState,
    path: Path<ClassPath>,
    body: Option<Json<CreateBracketBody>>,
) -> HttpResponse {
    let seeding = body.map(|b| b.into_inner().seeding).unwrap_or_default();
    with_division(&state, path.id, |d| {
        d.create_bracket(&seeding, &mut rand::thread_rng())?;
        Ok(HttpResponse::Ok().json(division_json(d)))
    })
}

#[delete("/api/classes/{id}/bracket")]
async fn api_delete_bracket(state: AppState, path: Path<ClassPath>) -> HttpResponse {
    with_division(&state, path.id, |d| {
        d.delete()?;
        Ok(HttpResponse::Ok().json(division_json(d)))
    })
}

/// Discard the bracket (and all results) and build a new random one.
#[post("/api/classes/{id}/bracket/reshuffle")]
async fn api_reshuffle(state: AppState, path: Path<ClassPath>) -> HttpResponse {
    with_division(&state, path.id, |d| {
        d.reshuffle(&mut rand::thread_rng())?;
        Ok(HttpResponse::Ok().json(division_json(d)))
    })
}

#[post("/api/classes/{id}/bracket/clear")]
async fn api_clear_results(state: AppState, path: Path<ClassPath>) -> HttpResponse {
    with_division(&state, path.id, |d| {
        d.clear_results()?;
        Ok(HttpResponse::Ok().json(division_json(d)))
    })
}

#[post("/api/classes/{id}/bracket/decider")]
async fn api_open_decider(
    state: AppState,
    path: Path<ClassPath>,
    body: Json<DeciderBody>,
) -> HttpResponse {
    with_division(&state, path.id, |d| {
        d.open_decider(body.challenger)?;
        Ok(HttpResponse::Ok().json(division_json(d)))
    })
}

#[put("/api/classes/{id}/matches/{match_id}")]
async fn api_record_result(
    state: AppState,
    path: Path<ClassMatchPath>,
    body: Json<RecordResultBody>,
) -> HttpResponse {
    let body = body.into_inner();
    with_division(&state, path.id, |d| {
        d.record_result(path.match_id, body.score_a, body.score_b, body.metadata)?;
        Ok(HttpResponse::Ok().json(division_json(d)))
    })
}

#[get("/api/classes/{id}/medals")]
async fn api_class_medals(state: AppState, path: Path<ClassPath>) -> HttpResponse {
    with_division(&state, path.id, |d| Ok(HttpResponse::Ok().json(d.medals()?)))
}

/// Per-dojo medal ranking across all eligible classes, optionally for one age category.
#[get("/api/medals/tally")]
async fn api_tally(
    state: AppState,
    rule: Data<EligibilityRule>,
    query: Query<TallyQuery>,
) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let ranking = aggregate(
        g.values().filter_map(Division::tally_entry),
        query.level.as_deref(),
        &rule,
    );
    HttpResponse::Ok().json(ranking)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServiceConfig::from_env();
    log::info!(
        "Starting server at http://{}:{} (medal floors: forms/standard {}, default {})",
        config.host,
        config.port,
        config.eligibility.forms_standard_min,
        config.eligibility.default_min
    );

    let state = Data::new(RwLock::new(HashMap::<ClassId, Division>::new()));
    let rule = Data::new(config.eligibility);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(rule.clone())
            .service(api_health)
            .service(api_create_class)
            .service(api_get_class)
            .service(api_replace_roster)
            .service(api_create_bracket)
            .service(api_delete_bracket)
            .service(api_reshuffle)
            .service(api_clear_results)
            .service(api_open_decider)
            .service(api_record_result)
            .service(api_class_medals)
            .service(api_tally)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

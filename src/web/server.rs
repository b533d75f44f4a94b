use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, HeaderValue, Method, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{error, info, warn};

use crate::attestation::{sample_attestations, AttestationRequest};
use crate::engine::{CredibilityEngine, RecordOptions};
use crate::error::Error;
use crate::manifest;
use crate::userkey::Userkey;
use crate::webhook::WebhookEvent;

/// Largest fid list accepted by the batch endpoint
pub const MAX_BATCH: usize = 100;

/// Web server - Mini App ページと JSON API
pub struct WebServer {
    engine: Arc<CredibilityEngine>,
}

#[derive(Clone)]
struct AppState {
    engine: Arc<CredibilityEngine>,
}

#[derive(Deserialize)]
struct CredibilityQuery {
    breakdown: Option<bool>,
    profile: Option<bool>,
}

#[derive(Deserialize)]
struct ScoreQuery {
    userkey: Option<String>,
}

#[derive(Deserialize)]
struct BatchQuery {
    fids: Option<String>,
}

#[derive(Deserialize)]
struct FidQuery {
    fid: Option<String>,
}

impl WebServer {
    pub fn new(engine: Arc<CredibilityEngine>) -> Self {
        Self { engine }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let web = &self.engine.config.web;
        let app = build_router(self.engine.clone());

        let addr = format!("{}:{}", web.address, web.port);
        info!("🌐 Mini App listening on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await?;
        Ok(())
    }
}

/// Build the full router (pages, API, static files).
pub fn build_router(engine: Arc<CredibilityEngine>) -> Router {
    // Mini App hosts embed us cross-origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let static_dir = ServeDir::new(&engine.config.web.static_dir);
    let state = AppState { engine };

    Router::new()
        .route("/", get(landing))
        .route("/miniapp", get(miniapp_page))
        .route("/credibility", get(credibility_page))
        .route("/.well-known/farcaster.json", get(farcaster_manifest))
        .route("/og-image.png", get(og_image))
        .route("/splash.png", get(splash_image))
        .route("/api/credibility/:fid", get(api_credibility))
        .route("/api/score", get(api_score))
        .route("/api/score/batch", get(api_score_batch))
        .route("/api/attestation", get(api_attestations).post(api_submit_attestation))
        .route("/api/webhook", post(api_webhook))
        .nest_service("/static", static_dir)
        .fallback(not_found)
        .layer(cors)
        .with_state(state)
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": message, "field": field })),
            )
                .into_response(),
            other => {
                if other.is_upstream() {
                    error!("Ethos lookup failed: {}", other);
                } else {
                    error!("Request failed: {}", other);
                }
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to fetch credibility data" })),
                )
                    .into_response()
            }
        }
    }
}

fn parse_fid(raw: &str) -> Result<u64, Error> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| Error::validation("fid", "Invalid FID"))
}

// --- Credibility API ---

async fn api_credibility(
    State(state): State<AppState>,
    Path(fid): Path<String>,
    params: Result<Query<CredibilityQuery>, QueryRejection>,
) -> Result<Response, Error> {
    let fid = parse_fid(&fid)?;
    let Query(params) = params.map_err(|e| {
        warn!("Rejected credibility query: {}", e);
        Error::validation("query", "breakdown and profile must be true or false")
    })?;
    let opts = RecordOptions {
        breakdown: params.breakdown.unwrap_or(false),
        profile: params.profile.unwrap_or(false),
    };
    let record = state.engine.credibility(fid, opts).await?;
    Ok(Json(record).into_response())
}

async fn api_score(
    State(state): State<AppState>,
    Query(params): Query<ScoreQuery>,
) -> Result<Response, Error> {
    let key: Userkey = params
        .userkey
        .ok_or_else(|| {
            Error::validation(
                "userkey",
                format!(
                    "userkey required, one of: {}",
                    Userkey::supported_formats().join(", ")
                ),
            )
        })?
        .parse()?;

    match state.engine.score(&key).await? {
        Some(raw) => Ok(Json(raw).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "No Ethos profile", "userkey": key.to_string() })),
        )
            .into_response()),
    }
}

async fn api_score_batch(
    State(state): State<AppState>,
    Query(params): Query<BatchQuery>,
) -> Result<Response, Error> {
    let raw = params
        .fids
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| Error::validation("fids", "fids required"))?;
    let fids = raw
        .split(',')
        .map(parse_fid)
        .collect::<Result<Vec<u64>, Error>>()?;
    if fids.len() > MAX_BATCH {
        return Err(Error::validation(
            "fids",
            format!("at most {} fids per batch", MAX_BATCH),
        ));
    }

    let scores = state.engine.scores(&fids).await;
    Ok(Json(scores).into_response())
}

// --- Attestations ---

async fn api_attestations(Query(params): Query<FidQuery>) -> Result<Response, Error> {
    let fid = params
        .fid
        .as_deref()
        .ok_or_else(|| Error::validation("fid", "FID required"))
        .and_then(parse_fid)?;
    Ok(Json(sample_attestations(fid)).into_response())
}

async fn api_submit_attestation(
    body: Result<Json<AttestationRequest>, JsonRejection>,
) -> Result<Response, Error> {
    let Json(request) = body.map_err(|e| {
        warn!("Rejected attestation body: {}", e);
        Error::validation("attestation", "Invalid attestation body")
    })?;
    let attestation = request.submit()?;
    info!(
        "Attestation {} for fid {} ({:?}, {})",
        attestation.id, attestation.target_fid, attestation.category, attestation.score
    );
    Ok((StatusCode::CREATED, Json(attestation)).into_response())
}

// --- Webhook ---

async fn api_webhook(body: Bytes) -> Response {
    match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(payload) => {
            WebhookEvent::parse(&payload).log(&payload);
            Json(json!({ "success": true })).into_response()
        }
        Err(e) => {
            warn!("Webhook body is not JSON: {}", e);
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid webhook payload" })),
            )
                .into_response()
        }
    }
}

// --- Pages & assets ---

async fn farcaster_manifest(State(state): State<AppState>) -> Json<serde_json::Value> {
    let config = &state.engine.config;
    Json(manifest::farcaster_manifest(&config.web, &config.manifest))
}

/// Landing page
async fn landing() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

async fn miniapp_page(State(state): State<AppState>) -> Html<String> {
    shell_page(&state, "Get My Ethos Score", "/credibility")
}

async fn credibility_page(State(state): State<AppState>) -> Html<String> {
    shell_page(&state, "Check My Ethos Score", "/credibility")
}

fn shell_page(state: &AppState, button: &str, launch_path: &str) -> Html<String> {
    let meta = manifest::embed_meta(&state.engine.config.web.public_url, button, launch_path);
    Html(include_str!("../../static/miniapp.html").replace("{{FC_MINIAPP}}", &escape_attr(&meta.to_string())))
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;").replace('\'', "&#39;").replace('<', "&lt;")
}

async fn og_image() -> Response {
    svg(include_str!("../../static/og-image.svg"))
}

async fn splash_image() -> Response {
    svg(include_str!("../../static/splash.svg"))
}

fn svg(body: &'static str) -> Response {
    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("image/svg+xml")),
            (
                header::CACHE_CONTROL,
                HeaderValue::from_static("public, max-age=31536000, immutable"),
            ),
        ],
        body,
    )
        .into_response()
}

async fn not_found() -> (StatusCode, Html<&'static str>) {
    (StatusCode::NOT_FOUND, Html(include_str!("../../static/404.html")))
}

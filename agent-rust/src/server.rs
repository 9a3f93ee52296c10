//! HTTP surface: generation, analysis and sandboxed previews for a single
//! editor session.

use crate::{
    preview::SandboxDocument, AnalysisInput, Framework, GenerationRequest,
    Generator, SandboxMessage, Session, SessionSummary, CODE_ANALYZER_ID,
};
use axum::{
    extract::State,
    http::{
        header::{CONTENT_SECURITY_POLICY, CONTENT_TYPE},
        HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct AppState {
    generator: Arc<Generator>,
    session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new(generator: Generator, session: Session) -> Self {
        Self {
            generator: Arc::new(generator),
            session: Arc::new(Mutex::new(session)),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateBody {
    #[serde(default)]
    prompt: String,
    #[serde(default)]
    framework: String,
    #[serde(default)]
    provider: String,
    #[serde(default)]
    api_key: String,
}

#[derive(Serialize)]
struct GenerateResponse {
    code: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Default, Deserialize)]
struct PreviewBody {
    code: Option<String>,
    framework: Option<Framework>,
    running: Option<bool>,
    entry: Option<String>,
}

#[derive(Deserialize)]
struct PlaybackBody {
    running: bool,
}

type ErrorResponse = (StatusCode, Json<ErrorBody>);

fn internal_error(error: &impl ToString) -> ErrorResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: error.to_string(),
        }),
    )
}

async fn home_handler() -> &'static str {
    "Welcome to Glimpse!\nPOST /api/generate to turn a prompt into a live preview."
}

async fn generate_handler(
    State(state): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<GenerateResponse>, ErrorResponse> {
    let (framework, outcome) = match GenerationRequest::parse(
        body.prompt,
        &body.framework,
        &body.provider,
        body.api_key,
    ) {
        Ok(request) => (
            Some(request.framework),
            state.generator.generate(&request).await,
        ),
        Err(error) => (None, Err(error)),
    };

    let mut session = state.session.lock().await;
    let framework = framework.unwrap_or_else(|| session.framework());
    let code = session
        .apply_generation(framework, outcome)
        .await
        .map_err(|error| internal_error(&error))?;

    Ok(Json(GenerateResponse { code }))
}

async fn analyze_handler(
    State(state): State<AppState>,
    Json(input): Json<AnalysisInput>,
) -> Result<Json<Value>, ErrorResponse> {
    let input = serde_json::to_value(input).map_err(|error| internal_error(&error))?;
    let session = state.session.lock().await;
    let result = session
        .registry()
        .run_one(CODE_ANALYZER_ID, input)
        .await
        .map_err(|error| internal_error(&error))?;

    Ok(Json(result))
}

async fn render_preview_handler(
    State(state): State<AppState>,
    Json(body): Json<PreviewBody>,
) -> Response {
    preview_response(&state, body).await
}

async fn current_preview_handler(State(state): State<AppState>) -> Response {
    preview_response(&state, PreviewBody::default()).await
}

async fn preview_response(state: &AppState, body: PreviewBody) -> Response {
    let mut session = state.session.lock().await;

    if let Some(framework) = body.framework {
        session.set_framework(framework);
    }
    if let Some(running) = body.running {
        session.set_running(running);
    }
    if let Some(code) = body.code {
        session.apply_edit(code).await;
    }

    match session.render_with_entry(body.entry.as_deref()) {
        Some(document) => sandboxed(StatusCode::OK, &document),
        None => sandboxed(
            StatusCode::NOT_FOUND,
            &SandboxDocument::error_display("No code provided"),
        ),
    }
}

fn sandboxed(status: StatusCode, document: &SandboxDocument) -> Response {
    (
        status,
        [
            (CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (CONTENT_SECURITY_POLICY, document.content_security_policy()),
        ],
        document.html().to_string(),
    )
        .into_response()
}

async fn preview_event_handler(
    State(state): State<AppState>,
    Json(message): Json<SandboxMessage>,
) -> StatusCode {
    state.session.lock().await.apply_sandbox_message(&message);
    StatusCode::NO_CONTENT
}

async fn playback_handler(
    State(state): State<AppState>,
    Json(body): Json<PlaybackBody>,
) -> Json<SessionSummary> {
    let mut session = state.session.lock().await;
    session.set_running(body.running);
    Json(session.summary())
}

async fn reload_handler(State(state): State<AppState>) -> Json<SessionSummary> {
    let mut session = state.session.lock().await;
    session.reload().await;
    Json(session.summary())
}

async fn session_handler(State(state): State<AppState>) -> Json<SessionSummary> {
    Json(state.session.lock().await.summary())
}

pub fn router(state: AppState, app_origin: HeaderValue) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/api/generate", post(generate_handler))
        .route("/api/analyze", post(analyze_handler))
        .route(
            "/api/preview",
            post(render_preview_handler).get(current_preview_handler),
        )
        .route("/api/preview/events", post(preview_event_handler))
        .route("/api/playback", post(playback_handler))
        .route("/api/reload", post(reload_handler))
        .route("/api/session", get(session_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(app_origin)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([CONTENT_TYPE]),
        )
        .with_state(state)
}

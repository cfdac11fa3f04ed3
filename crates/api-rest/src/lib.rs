//! # API REST
//!
//! HTTP front end for Lambda Repo.
//!
//! Handles:
//! - Maven repository reads and uploads under `/repository`
//! - Health checks and OpenAPI/Swagger documentation
//! - REST-specific concerns (status mapping, body limits, CORS, request tracing)
//!
//! Uses `api-shared` for common types and `lambda-repo-core` for all repository logic.

#![warn(rust_2018_idioms)]

use api_shared::{HealthRes, HealthService};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, OriginalUri, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use repo_core::{ReadOutcome, RepoError, RepositoryService};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    service: RepositoryService,
}

impl AppState {
    pub fn new(service: RepositoryService) -> Self {
        Self { service }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, read_root, read_path, upload),
    components(schemas(HealthRes))
)]
struct ApiDoc;

/// Builds the REST application.
///
/// Upload bodies are capped at the configured `max_upload_bytes`; larger requests are
/// rejected with `413 Payload Too Large` before reaching the repository.
pub fn router(state: AppState) -> Router {
    let max_upload_bytes = state.service.config().max_upload_bytes();

    Router::new()
        .route("/health", get(health))
        .route("/repository", get(read_root))
        .route("/repository/", get(read_root))
        .route("/repository/*path", get(read_path).put(upload))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Repository errors as plain-text responses.
///
/// Only the public message is sent; server-side failures are logged with full detail.
pub struct ApiError(RepoError);

impl From<RepoError> for ApiError {
    fn from(error: RepoError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if self.0.is_server_error() {
            tracing::error!("request failed: {:?}", self.0);
        }
        (status, self.0.public_message()).into_response()
    }
}

fn outcome_response(outcome: ReadOutcome) -> Response {
    match outcome {
        ReadOutcome::Artifact(artifact) => {
            ([(header::CONTENT_TYPE, artifact.content_type())], artifact.body).into_response()
        }
        ReadOutcome::Listing(listing) => Html(listing.document).into_response(),
        ReadOutcome::Redirect(location) => {
            (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint, used by load balancers and monitoring.
#[axum::debug_handler]
async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/repository/",
    responses(
        (status = 200, description = "Root directory listing"),
        (status = 302, description = "Redirect to the trailing-slash form"),
        (status = 404, description = "Repository is empty")
    )
)]
/// Lists the top level of the repository.
#[axum::debug_handler]
async fn read_root(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> Result<Response, ApiError> {
    let outcome = state.service.read(None, uri.path()).await?;
    Ok(outcome_response(outcome))
}

#[utoipa::path(
    get,
    path = "/repository/{path}",
    params(
        ("path" = String, Path, description = "Repository path of a file or directory")
    ),
    responses(
        (status = 200, description = "File contents or directory listing"),
        (status = 302, description = "Directory requested without a trailing slash"),
        (status = 400, description = "Path cannot address a stored object"),
        (status = 404, description = "File or directory not found"),
        (status = 500, description = "Internal server error")
    )
)]
/// Serves a repository file, or an HTML listing for a directory.
///
/// Directory requests must end in `/`; otherwise the client is redirected there first.
#[axum::debug_handler]
async fn read_path(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(path): Path<String>,
) -> Result<Response, ApiError> {
    let outcome = state.service.read(Some(&path), uri.path()).await?;
    Ok(outcome_response(outcome))
}

#[utoipa::path(
    put,
    path = "/repository/{path}",
    params(
        ("path" = String, Path, description = "Repository path of the file to store")
    ),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "File stored"),
        (status = 400, description = "Not a repository file or invalid coordinates"),
        (status = 403, description = "Release version already exists"),
        (status = 413, description = "Upload exceeds the configured limit"),
        (status = 500, description = "Internal server error")
    )
)]
/// Uploads a repository file. Release artifacts cannot be overwritten.
#[axum::debug_handler]
async fn upload(
    State(state): State<AppState>,
    Path(path): Path<String>,
    body: Bytes,
) -> Result<&'static str, ApiError> {
    state.service.write(&path, body).await?;
    Ok("Uploaded")
}

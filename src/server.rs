//! HTTP boundary for the pipeline.
//!
//! ## Routes
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | POST | `/v1/emails` | Send an email and return the stored record |
//! | GET | `/v1/emails` | List every stored record |
//! | GET | `/health` | Liveness and version |
//!
//! Failures are scoped to the request: a transport failure is `502`, a
//! store failure `500`, a missing recipient `422`. The body names the
//! stage that failed:
//!
//! ```json
//! {"error": {"stage": "transport", "message": "Send error: connection refused"}}
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use mailrecord::server;
//!
//! let app = server::router(pipeline);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, app).await?;
//! ```

use axum::{
    extract::State,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        Method, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{PipelineError, StoreError};
use crate::pipeline::EmailPipeline;
use crate::record::{EmailRecord, NewEmail};

/// Create the API router.
pub fn router(pipeline: EmailPipeline) -> Router {
    Router::new()
        .route("/v1/emails", get(list_emails).post(create_email))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(pipeline)
}

/// Any origin; only the methods and headers the API uses.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([ACCEPT, AUTHORIZATION, CONTENT_TYPE])
}

/// Error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    stage: &'static str,
    message: String,
}

/// A pipeline error scoped to one response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    stage: &'static str,
    message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        let status = match &err {
            PipelineError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PipelineError::Transport(_) => StatusCode::BAD_GATEWAY,
            PipelineError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            stage: err.stage(),
            message: err.to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        PipelineError::Store(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                stage: self.stage,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// POST /v1/emails - Send, then record.
async fn create_email(
    State(pipeline): State<EmailPipeline>,
    Json(email): Json<NewEmail>,
) -> Result<Json<EmailRecord>, ApiError> {
    let record = pipeline.create(email).await?;
    Ok(Json(record))
}

/// GET /v1/emails - All records, `[]` when empty.
async fn list_emails(
    State(pipeline): State<EmailPipeline>,
) -> Result<Json<Vec<EmailRecord>>, ApiError> {
    let records = pipeline.list_all().await?;
    Ok(Json(records))
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
    provider: &'static str,
}

/// GET /health
async fn health(State(pipeline): State<EmailPipeline>) -> Json<Health> {
    Json(Health {
        status: "ok",
        version: crate::VERSION,
        provider: pipeline.provider_name(),
    })
}

/// Re-exports for tests that drive the router directly.
pub mod reexports {
    pub use axum::body::Body;
    pub use axum::http::{Request, StatusCode};
}

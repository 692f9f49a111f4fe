//! HTTP intake for LeadScope.
//!
//! Routes:
//! - `POST /register` validates a registration, hands it to the dispatcher,
//!   and answers immediately with the assigned request id.
//! - `GET /health/` is a liveness probe.
//! - `GET /health/detailed` adds version, uptime, and service status.

pub mod error;

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use leadscope_core::RegistrationDispatcher;
use leadscope_shared::{RegisterRequest, RequestId};

pub use error::ApiError;

/// Registration bodies are a few hundred bytes; anything near this is abuse.
const BODY_LIMIT_BYTES: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    dispatcher: Arc<dyn RegistrationDispatcher>,
    started_at: Instant,
    firecrawl_configured: bool,
}

impl AppState {
    pub fn new(dispatcher: Arc<dyn RegistrationDispatcher>, firecrawl_configured: bool) -> Self {
        Self {
            dispatcher,
            started_at: Instant::now(),
            firecrawl_configured,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub request_id: RequestId,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub dispatcher: String,
    pub firecrawl: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime_seconds: u64,
    pub services: ServiceStatus,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let Json(request) = payload?;
    let request = request.validated()?;

    info!(
        contact = %request.display_name(),
        website = request.company_website.as_deref().unwrap_or("-"),
        "registration received"
    );

    let receipt = state.dispatcher.dispatch(request)?;

    Ok(Json(RegisterResponse {
        success: true,
        message: "Registration queued for processing".into(),
        request_id: receipt.request_id,
        timestamp: receipt.timestamp,
    }))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        timestamp: Utc::now(),
    })
}

async fn health_detailed(State(state): State<AppState>) -> Json<DetailedHealthResponse> {
    let firecrawl = if state.firecrawl_configured {
        "configured"
    } else {
        "missing_credentials"
    };

    Json(DetailedHealthResponse {
        status: "healthy".into(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        services: ServiceStatus {
            dispatcher: "operational".into(),
            firecrawl: firecrawl.into(),
        },
    })
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/health", get(health))
        .route("/health/", get(health))
        .route("/health/detailed", get(health_detailed))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
}

/// Serve on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "LeadScope API listening");
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            shutdown.await;
            info!("shutting down gracefully");
        })
        .await
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use leadscope_core::DispatchReceipt;
    use leadscope_shared::{LeadScopeError, Result};
    use tower::ServiceExt;

    use super::*;

    /// Records dispatched requests; optionally refuses them.
    #[derive(Default)]
    struct RecordingDispatcher {
        seen: Mutex<Vec<RegisterRequest>>,
        refuse: bool,
    }

    impl RegistrationDispatcher for RecordingDispatcher {
        fn dispatch(&self, request: RegisterRequest) -> Result<DispatchReceipt> {
            if self.refuse {
                return Err(LeadScopeError::Dispatch("queue unavailable".into()));
            }
            self.seen.lock().unwrap().push(request);
            Ok(DispatchReceipt {
                request_id: RequestId::new(),
                timestamp: Utc::now(),
            })
        }
    }

    fn app(dispatcher: Arc<RecordingDispatcher>, firecrawl: bool) -> Router {
        router(AppState::new(dispatcher, firecrawl))
    }

    fn post_json(body: serde_json::Value) -> Request<Body> {
        Request::post("/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn register_queues_normalized_request() {
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let response = app(dispatcher.clone(), true)
            .oneshot(post_json(serde_json::json!({
                "first_name": "Sarah",
                "last_name": "Chen",
                "company_website": "acme.test",
                "linkedin": "sarahchen"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Registration queued for processing");
        assert!(body["request_id"].is_string());

        let seen = dispatcher.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].company_website.as_deref(), Some("https://acme.test"));
        assert_eq!(
            seen[0].linkedin.as_deref(),
            Some("https://linkedin.com/in/sarahchen")
        );
    }

    #[tokio::test]
    async fn register_without_any_url_is_422() {
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let response = app(dispatcher.clone(), true)
            .oneshot(post_json(serde_json::json!({
                "first_name": "Sarah",
                "last_name": "Chen",
                "company_website": "  "
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(
            body["detail"],
            "At least one of company_website or linkedin must be provided"
        );
        assert!(dispatcher.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn register_missing_name_is_422() {
        let response = app(Arc::new(RecordingDispatcher::default()), true)
            .oneshot(post_json(serde_json::json!({
                "last_name": "Chen",
                "company_website": "https://acme.test"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert!(body["detail"].as_str().unwrap().contains("first_name"));
    }

    #[tokio::test]
    async fn dispatch_failure_is_500() {
        let dispatcher = Arc::new(RecordingDispatcher {
            refuse: true,
            ..RecordingDispatcher::default()
        });
        let response = app(dispatcher, true)
            .oneshot(post_json(serde_json::json!({
                "first_name": "Sarah",
                "last_name": "Chen",
                "linkedin": "https://linkedin.com/in/sarahchen"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn health_answers_with_and_without_trailing_slash() {
        for uri in ["/health", "/health/"] {
            let response = app(Arc::new(RecordingDispatcher::default()), true)
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(json_body(response).await["status"], "healthy");
        }
    }

    #[tokio::test]
    async fn detailed_health_reports_missing_credentials() {
        let response = app(Arc::new(RecordingDispatcher::default()), false)
            .oneshot(
                Request::get("/health/detailed")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(body["services"]["dispatcher"], "operational");
        assert_eq!(body["services"]["firecrawl"], "missing_credentials");
        assert!(body["uptime_seconds"].is_u64());
    }
}

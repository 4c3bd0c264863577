//! Numa Web Server
//!
//! Axum-based REST API over an in-memory [`Ledger`]: bill entry, the daily
//! budget, agent previews and runs, the activity feed and receipt parsing.
//!
//! State lives for the life of the process; nothing is persisted.

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use numa_core::{AllocationEngine, AnthropicVisionExtractor, Ledger, ReceiptExtractor};

mod handlers;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    pub ledger: RwLock<Ledger>,
    pub engine: AllocationEngine,
    /// Receipt extraction backend; `None` disables `/api/receipts/parse`
    pub extractor: Option<Box<dyn ReceiptExtractor>>,
}

/// Create the application router
///
/// Receipt extraction is enabled when `ANTHROPIC_API_KEY` is set.
pub fn create_router(ledger: Ledger, engine: AllocationEngine, config: ServerConfig) -> Router {
    let extractor = AnthropicVisionExtractor::from_env();
    match extractor {
        Some(ref e) => info!(
            "Receipt extraction configured: {} (model: {})",
            e.host(),
            e.model()
        ),
        None => info!("ℹ️  Receipt extraction not configured (set ANTHROPIC_API_KEY to enable)"),
    }

    create_router_with_options(
        ledger,
        engine,
        config,
        extractor.map(|e| Box::new(e) as Box<dyn ReceiptExtractor>),
    )
}

/// Create the application router with an explicit extractor (for testing)
pub fn create_router_with_options(
    ledger: Ledger,
    engine: AllocationEngine,
    config: ServerConfig,
    extractor: Option<Box<dyn ReceiptExtractor>>,
) -> Router {
    let cors = build_cors(&config);

    let state = Arc::new(AppState {
        ledger: RwLock::new(ledger),
        engine,
        extractor,
    });

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/dashboard", get(handlers::dashboard))
        .route("/budget", put(handlers::update_budget))
        .route("/bills", get(handlers::list_bills).post(handlers::create_bill))
        .route("/bills/:id/paid", post(handlers::mark_bill_paid))
        .route("/bills/:id/defer", post(handlers::defer_bill))
        .route("/agent/preview", post(handlers::preview_agent))
        .route("/agent/run", post(handlers::run_agent))
        .route("/activity", get(handlers::list_activity))
        .route("/receipts/parse", post(handlers::parse_receipt));

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

fn build_cors(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        cors
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

/// Start the server
pub async fn serve(ledger: Ledger, engine: AllocationEngine, host: &str, port: u16) -> anyhow::Result<()> {
    serve_with_config(ledger, engine, host, port, ServerConfig::default()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    ledger: Ledger,
    engine: AllocationEngine,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if host != "127.0.0.1" && host != "localhost" {
        warn!("⚠️  No authentication - binding to {} exposes the ledger to the network", host);
    }

    info!(
        daily_limit = ledger.daily_limit(),
        "Starting with an empty ledger"
    );

    let app = create_router(ledger, engine, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn service_unavailable(msg: &str) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();

        // Caller mistakes keep their message and a 4xx status
        match err.downcast_ref::<numa_core::Error>() {
            Some(numa_core::Error::InvalidInput(msg)) => return Self::bad_request(msg),
            Some(numa_core::Error::NotFound(what)) => {
                return Self::not_found(&format!("Not found: {}", what))
            }
            _ => {}
        }

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

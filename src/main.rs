//! Planner backend server entrypoint.
//!
//! Wires configuration, the Airtable client, and the axum router, then
//! serves until shutdown. Missing billing or store credentials are logged
//! loudly but do not stop the process: the affected endpoints answer 500
//! until the environment is fixed.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use planner_backend::adapters::airtable::AirtableClient;
use planner_backend::adapters::http::billing::{api_router, BillingAppState};
use planner_backend::config::AppConfig;
use planner_backend::domain::billing::SignatureVerifier;
use planner_backend::ports::UserStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.server.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(err) = config.validate() {
        // Degraded start: webhook and chat endpoints answer 500 until the
        // missing values arrive, but health stays up.
        tracing::warn!(error = %err, "starting with incomplete configuration");
    }

    let verifier = if config.billing.is_configured() {
        Some(SignatureVerifier::new(config.billing.signing_secret()))
    } else {
        tracing::warn!("billing signing secret not set; webhook endpoint disabled");
        None
    };

    let user_store: Option<Arc<dyn UserStore>> = if config.airtable.is_configured() {
        Some(Arc::new(AirtableClient::new(&config.airtable)))
    } else {
        tracing::warn!("Airtable credentials not set; record store disabled");
        None
    };

    let state = BillingAppState {
        verifier,
        user_store,
    };

    let cors = build_cors(&config);

    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .nest("/api", api_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .with_state(state);

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "planner backend listening");

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "ok"
}

/// Restrict CORS to configured origins; fall open in development where no
/// origins are listed.
fn build_cors(config: &AppConfig) -> CorsLayer {
    let origins = config.server.cors_origins_list();
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods(Any)
        .allow_headers(Any)
}

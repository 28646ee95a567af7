pub mod api;
pub mod config;
pub mod error;
pub mod relay;
pub mod store;

use std::sync::Arc;
use actix::{Actor, Addr};
use actix_web::HttpResponse;

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use config::Settings;

pub use relay::{RelayServer, WsSession};
pub use store::{Blueprint, BlueprintStore};

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Application state shared across all components
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub store: Arc<BlueprintStore>,
    pub relay: Addr<RelayServer>,
}

impl AppState {
    /// Build the state from settings: one store, one relay actor.
    ///
    /// Must be called from within a running actix system, since the relay
    /// actor starts here.
    pub fn new(config: Settings) -> Self {
        let store = Arc::new(BlueprintStore::new());
        let relay = RelayServer::new(store.clone(), config.relay.strict_events).start();
        Self {
            config: Arc::new(config),
            store,
            relay,
        }
    }
}

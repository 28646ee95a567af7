//! Blueprint store for the blueprints server
//!
//! This module owns the authoritative blueprint collection and the
//! operations the HTTP API and the realtime relay run against it.

mod models;
mod operations;

pub use models::Blueprint;
pub use operations::BlueprintStore;

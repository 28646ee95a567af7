//! HTTP API for the blueprints server

pub mod handlers;

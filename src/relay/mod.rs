//! Realtime relay for the blueprints server
//!
//! This module handles WebSocket sessions, room membership, and the
//! fan-out of draw events to every other client viewing the same room.

mod server;
mod session;

pub use server::{ClientEvent, Connect, Disconnect, Draw, DrawPayload, Join, RelayServer, ServerEvent};
pub use session::WsSession;

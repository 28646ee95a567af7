use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web_actors::ws;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::relay::server::{ClientEvent, Connect, Disconnect, Draw, Join, RelayServer, ServerEvent};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);

/// One WebSocket connection to the relay.
///
/// The session parses inbound JSON events and forwards them to the
/// `RelayServer` as actor messages; events the relay fans out arrive here
/// and are serialized back onto the socket.
pub struct WsSession {
    id: Uuid,
    peer_addr: String,
    relay: Addr<RelayServer>,
    last_heartbeat: Instant,
}

impl WsSession {
    pub fn new(relay: Addr<RelayServer>, peer_addr: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            peer_addr,
            relay,
            last_heartbeat: Instant::now(),
        }
    }

    /// Process an incoming text frame
    fn handle_client_event(&mut self, text: &str, ctx: &mut <Self as Actor>::Context) {
        match serde_json::from_str::<ClientEvent>(text) {
            Ok(ClientEvent::JoinRoom(room)) => {
                self.relay.do_send(Join {
                    id: self.id,
                    room,
                });
            }
            Ok(ClientEvent::DrawEvent(payload)) => {
                self.relay.do_send(Draw {
                    id: self.id,
                    event: payload,
                });
            }
            Err(e) => {
                // Fail closed: the frame is dropped, the sender is told why
                warn!("Invalid event from {}: {}", self.peer_addr, e);
                self.send_event(ctx, ServerEvent::Error {
                    message: format!("Invalid event format: {}", e),
                });
            }
        }
    }

    /// Send a server event to the client
    fn send_event(&self, ctx: &mut <Self as Actor>::Context, event: ServerEvent) {
        match serde_json::to_string(&event) {
            Ok(json_str) => {
                ctx.text(json_str);
            }
            Err(e) => {
                error!("Failed to serialize server event: {}", e);
            }
        }
    }

    /// Start the heartbeat process
    fn start_heartbeat(&self, ctx: &mut <Self as Actor>::Context) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |act, ctx| {
            if Instant::now().duration_since(act.last_heartbeat) > CLIENT_TIMEOUT {
                warn!("Heartbeat timeout for session {}, disconnecting", act.id);
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!("WebSocket session established with {} (id: {})", self.peer_addr, self.id);
        self.start_heartbeat(ctx);
        self.relay.do_send(Connect {
            id: self.id,
            addr: ctx.address().recipient(),
        });
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.relay.do_send(Disconnect { id: self.id });
        info!("WebSocket session closed with {} (id: {})", self.peer_addr, self.id);
    }
}

/// Events fanned out by the relay are written back to the socket.
impl Handler<ServerEvent> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: ServerEvent, ctx: &mut Self::Context) {
        self.send_event(ctx, msg);
    }
}

impl StreamHandler<std::result::Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: std::result::Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.handle_client_event(&text, ctx);
            }
            Ok(ws::Message::Binary(bin)) => {
                info!("Received binary frame from {} of {} bytes", self.peer_addr, bin.len());
                // Binary frames are not part of the protocol
                self.send_event(ctx, ServerEvent::Error {
                    message: "Binary messages are not supported".to_string(),
                });
            }
            Ok(ws::Message::Close(reason)) => {
                info!("WebSocket closed from {}: {:?}", self.peer_addr, reason);
                ctx.close(reason);
                ctx.stop();
            }
            Ok(_) => {
                // Continuation/Nop frames need no handling
            }
            Err(e) => {
                error!("Error handling WebSocket frame from {}: {}", self.peer_addr, e);
                ctx.stop();
            }
        }
    }
}

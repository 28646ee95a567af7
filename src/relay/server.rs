use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use actix::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::store::BlueprintStore;

/// An event received from a client over the realtime channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Subscribe the sender to a room. Any string is a valid room name;
    /// rooms come into existence on first join.
    JoinRoom(String),
    /// Append a point to a blueprint and relay it to the room.
    DrawEvent(DrawPayload),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawPayload {
    pub author: String,
    pub name: String,
    pub room: String,
    pub point: Value,
}

/// An event pushed to clients over the realtime channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Message)]
#[rtype(result = "()")]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// A point was appended to a blueprint someone in the room is viewing.
    BlueprintUpdate { points: Vec<Value> },
    /// The sender's last event was rejected.
    Error { message: String },
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Connect {
    pub id: Uuid,
    pub addr: Recipient<ServerEvent>,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Disconnect {
    pub id: Uuid,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Join {
    pub id: Uuid,
    pub room: String,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Draw {
    pub id: Uuid,
    pub event: DrawPayload,
}

/// Room membership and fan-out for the realtime channel.
///
/// The actor mailbox processes one event at a time, so the store append
/// and the broadcast for a draw event always complete before the next
/// event is handled. Sessions deliver to their own clients in mailbox
/// order; there is no ordering guarantee across different clients.
pub struct RelayServer {
    sessions: HashMap<Uuid, Recipient<ServerEvent>>,
    rooms: HashMap<String, HashSet<Uuid>>,
    store: Arc<BlueprintStore>,
    strict_events: bool,
}

impl RelayServer {
    pub fn new(store: Arc<BlueprintStore>, strict_events: bool) -> Self {
        Self {
            sessions: HashMap::new(),
            rooms: HashMap::new(),
            store,
            strict_events,
        }
    }

    /// Send an event to every session in `room` except `sender`.
    fn broadcast(&self, room: &str, sender: Uuid, event: ServerEvent) {
        let Some(members) = self.rooms.get(room) else {
            return;
        };
        for id in members {
            if *id == sender {
                continue;
            }
            if let Some(addr) = self.sessions.get(id) {
                addr.do_send(event.clone());
            }
        }
    }

    fn send_to(&self, id: Uuid, event: ServerEvent) {
        if let Some(addr) = self.sessions.get(&id) {
            addr.do_send(event);
        }
    }
}

impl Actor for RelayServer {
    type Context = Context<Self>;
}

impl Handler<Connect> for RelayServer {
    type Result = ();

    fn handle(&mut self, msg: Connect, _: &mut Context<Self>) {
        info!("Session {} connected to relay", msg.id);
        self.sessions.insert(msg.id, msg.addr);
    }
}

impl Handler<Disconnect> for RelayServer {
    type Result = ();

    fn handle(&mut self, msg: Disconnect, _: &mut Context<Self>) {
        self.sessions.remove(&msg.id);
        // Drop the session from every room it joined and reap rooms left
        // empty, so membership bookkeeping cannot grow without bound.
        for members in self.rooms.values_mut() {
            members.remove(&msg.id);
        }
        self.rooms.retain(|_, members| !members.is_empty());
        info!("Session {} disconnected from relay", msg.id);
    }
}

impl Handler<Join> for RelayServer {
    type Result = ();

    fn handle(&mut self, msg: Join, _: &mut Context<Self>) {
        if !self.sessions.contains_key(&msg.id) {
            warn!("Join for unknown session {}", msg.id);
            return;
        }
        info!("Session {} joined room {}", msg.id, msg.room);
        self.rooms.entry(msg.room).or_default().insert(msg.id);
    }
}

impl Handler<Draw> for RelayServer {
    type Result = ();

    fn handle(&mut self, msg: Draw, _: &mut Context<Self>) {
        let Draw { id, event } = msg;

        if let Err(e) = self
            .store
            .append_point(&event.author, &event.name, event.point.clone())
        {
            if self.strict_events {
                warn!("Rejecting draw event from {}: {}", id, e);
                self.send_to(id, ServerEvent::Error {
                    message: e.to_string(),
                });
                return;
            }
            // Lenient mode mirrors the original behavior: the append is
            // dropped but the room still hears about the point.
            debug!("Dropping point for missing blueprint {}/{}", event.author, event.name);
        }

        self.broadcast(
            &event.room,
            id,
            ServerEvent::BlueprintUpdate {
                points: vec![event.point],
            },
        );
    }
}

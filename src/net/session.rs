use tokio::sync::mpsc;

use crate::net::messages::{ClientMessage, ServerMessage};

/// Liveness of a connected session. `AwaitingPong` means a probe went out
/// and the grace window is open; a second probe firing in that state marks
/// the session `Dead`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Alive,
    AwaitingPong,
    Dead,
}

#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub session_id: u64,
    pub message: ClientMessage,
}

#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub session_id: u64,
    pub message: ServerMessage,
}

#[derive(Debug)]
pub struct SessionHandle {
    pub id: u64,
    pub outbound_tx: mpsc::Sender<ServerMessage>,
}

impl SessionHandle {
    pub fn new(id: u64, outbound_tx: mpsc::Sender<ServerMessage>) -> Self {
        Self { id, outbound_tx }
    }
}

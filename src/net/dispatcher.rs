use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tracing::debug;

use crate::game::evolution::EngineError;
use crate::net::messages::ServerMessage;
use crate::net::session::{InboundMessage, OutboundMessage, SessionHandle};
use crate::state::hub::GameHub;

/// Single serialization point for the shared game. Placements, ticks and
/// session churn all go through the one lock, so no two mutations of the
/// grid or round ever interleave.
#[derive(Clone)]
pub struct DispatcherHandle {
    inner: Arc<Mutex<Dispatcher>>,
}

impl DispatcherHandle {
    pub fn new(hub: GameHub) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Dispatcher::new(hub))),
        }
    }

    /// Register a session and deliver its join snapshot.
    pub async fn register_session(&self, session: SessionHandle) {
        let outbound = {
            let mut guard = self.inner.lock().await;
            guard.sessions.insert(session.id, session.outbound_tx);
            guard.hub.join(session.id)
        };

        for msg in outbound {
            self.send_outbound(msg).await;
        }
    }

    pub async fn unregister_session(&self, session_id: u64) {
        let mut guard = self.inner.lock().await;
        guard.sessions.remove(&session_id);
        guard.hub.leave(session_id);
    }

    pub async fn handle_inbound(&self, inbound: InboundMessage) -> Vec<OutboundMessage> {
        let mut guard = self.inner.lock().await;
        guard.hub.handle_message(inbound.session_id, inbound.message)
    }

    /// Fire-and-forget delivery: a session whose buffer is full simply
    /// misses this message, and a closed channel is cleaned up when its
    /// connection actor unregisters.
    pub async fn send_outbound(&self, outbound: OutboundMessage) {
        let guard = self.inner.lock().await;
        if let Some(tx) = guard.sessions.get(&outbound.session_id) {
            if tx.try_send(outbound.message).is_err() {
                debug!(session_id = outbound.session_id, "dropped outbound message");
            }
        }
    }

    pub async fn tick(&self) -> Result<Vec<OutboundMessage>, EngineError> {
        let mut guard = self.inner.lock().await;
        guard.hub.tick()
    }

    pub async fn set_timer(&self, timer: u32) -> Vec<OutboundMessage> {
        let mut guard = self.inner.lock().await;
        guard.hub.set_timer(timer)
    }
}

struct Dispatcher {
    hub: GameHub,
    sessions: HashMap<u64, mpsc::Sender<ServerMessage>>,
}

impl Dispatcher {
    fn new(hub: GameHub) -> Self {
        Self {
            hub,
            sessions: HashMap::new(),
        }
    }
}

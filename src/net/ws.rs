use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Duration, Instant};
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::config::{OUTBOUND_BUFFER, PING_PERIOD_SECS, TICK_INTERVAL_SECS};
use crate::net::codec::{decode_client, encode_server};
use crate::net::dispatcher::DispatcherHandle;
use crate::net::messages::{ClientMessage, ServerMessage};
use crate::net::session::{InboundMessage, Liveness, SessionHandle};

pub struct WsServer;

impl WsServer {
    pub async fn serve(addr: &str, dispatcher: DispatcherHandle) -> tokio::io::Result<()> {
        let listener = TcpListener::bind(addr).await?;
        info!(addr, "listening for sessions");
        let mut next_id: u64 = 1;

        let clock = dispatcher.clone();
        tokio::spawn(async move {
            run_clock(clock).await;
        });

        loop {
            let (stream, peer) = listener.accept().await?;
            let dispatcher = dispatcher.clone();
            let session_id = next_id;
            next_id = next_id.saturating_add(1);

            tokio::spawn(async move {
                debug!(session_id, %peer, "connection accepted");
                run_session(session_id, stream, dispatcher).await;
            });
        }
    }
}

/// Wall-clock driver for the shared game: counts the sub-tick timer down
/// once per second and runs a simulation tick when it reaches zero. Fires
/// regardless of client activity; only a corrupt grid stops it.
async fn run_clock(dispatcher: DispatcherHandle) {
    let second = Duration::from_secs(1);
    let mut ticker = interval_at(Instant::now() + second, second);
    let mut remaining = TICK_INTERVAL_SECS;

    loop {
        ticker.tick().await;

        remaining = remaining.saturating_sub(1);
        for msg in dispatcher.set_timer(remaining).await {
            dispatcher.send_outbound(msg).await;
        }
        if remaining > 0 {
            continue;
        }

        match dispatcher.tick().await {
            Ok(outbound) => {
                for msg in outbound {
                    dispatcher.send_outbound(msg).await;
                }
            }
            Err(err) => {
                error!(%err, "simulation invariant broken, stopping the game");
                return;
            }
        }
        remaining = TICK_INTERVAL_SECS;
    }
}

async fn run_session(
    session_id: u64,
    stream: tokio::net::TcpStream,
    dispatcher: DispatcherHandle,
) {
    let ws_stream = match accept_async(stream).await {
        Ok(stream) => stream,
        Err(err) => {
            debug!(session_id, %err, "handshake failed");
            return;
        }
    };
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (outbound_tx, mut outbound_rx) = mpsc::channel(OUTBOUND_BUFFER);

    dispatcher
        .register_session(SessionHandle::new(session_id, outbound_tx))
        .await;

    // Liveness probing runs on its own period, independent of the tick
    // clock; a probe that fires while the previous one is unanswered means
    // the grace window has closed.
    let ping_period = Duration::from_secs(PING_PERIOD_SECS);
    let mut probe = interval_at(Instant::now() + ping_period, ping_period);
    let mut liveness = Liveness::Alive;

    loop {
        tokio::select! {
            inbound = ws_receiver.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        liveness = Liveness::Alive;
                        handle_payload(session_id, text.as_bytes(), &dispatcher).await;
                    }
                    Some(Ok(Message::Binary(bytes))) => {
                        liveness = Liveness::Alive;
                        handle_payload(session_id, &bytes, &dispatcher).await;
                    }
                    Some(Ok(Message::Pong(_))) => {
                        liveness = Liveness::Alive;
                    }
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => {
                        break;
                    }
                    _ => {}
                }
            }
            outbound = outbound_rx.recv() => {
                if let Some(msg) = outbound {
                    match encode_server(msg) {
                        Ok(payload) => {
                            if ws_sender.send(Message::Text(payload)).await.is_err() {
                                break;
                            }
                        }
                        Err(err) => warn!(session_id, %err, "failed to encode message"),
                    }
                } else {
                    break;
                }
            }
            _ = probe.tick() => {
                if liveness == Liveness::AwaitingPong {
                    liveness = Liveness::Dead;
                    break;
                }
                liveness = Liveness::AwaitingPong;
                if let Ok(payload) = encode_server(ServerMessage::Ping) {
                    if ws_sender.send(Message::Text(payload)).await.is_err() {
                        break;
                    }
                }
            }
        }
    }

    dispatcher.unregister_session(session_id).await;
    if liveness == Liveness::Dead {
        info!(session_id, "session lost to liveness timeout");
    } else {
        debug!(session_id, "session disconnected");
    }
}

async fn handle_payload(session_id: u64, bytes: &[u8], dispatcher: &DispatcherHandle) {
    let msg = match decode_client(bytes) {
        Ok(msg) => msg,
        Err(err) => {
            debug!(session_id, %err, "undecodable message ignored");
            return;
        }
    };

    // An application-level pong only feeds the liveness state handled by
    // the session actor above; everything else goes to the hub.
    if msg == ClientMessage::Pong {
        return;
    }

    let outbound = dispatcher
        .handle_inbound(InboundMessage {
            session_id,
            message: msg,
        })
        .await;
    for out in outbound {
        dispatcher.send_outbound(out).await;
    }
}

// ============================================================================
// Helpdesk Infrastructure - Realtime Transport
// File: crates/helpdesk-infrastructure/src/realtime/connector.rs
// ============================================================================
//! Transport for the realtime channel.
//!
//! A [`Connector`] opens one connection and hands back a [`Link`]: an
//! outbound queue, an inbound queue, and a shutdown token. The inbound
//! queue ends when the remote side closes.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::{HeaderValue, AUTHORIZATION};
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use helpdesk_core::RealtimeEvent;

use super::RealtimeError;

pub struct Link {
    pub outbound: mpsc::UnboundedSender<RealtimeEvent>,
    pub inbound: mpsc::UnboundedReceiver<RealtimeEvent>,
    /// Cancelled by the channel to tear the transport down.
    pub shutdown: CancellationToken,
}

#[async_trait]
pub trait Connector: Send + Sync {
    async fn open(&self, url: &str, token: &str) -> Result<Link, RealtimeError>;
}

/// WebSocket transport. Frames are JSON-encoded [`RealtimeEvent`]s sent as
/// text messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

#[async_trait]
impl Connector for WsConnector {
    async fn open(&self, url: &str, token: &str) -> Result<Link, RealtimeError> {
        let mut request = url
            .into_client_request()
            .map_err(|e| RealtimeError::Connection(e.to_string()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| RealtimeError::Connection(e.to_string()))?;
        request.headers_mut().insert(AUTHORIZATION, bearer);

        info!(url = %url, "Connecting to realtime endpoint");
        let (ws_stream, _response) = connect_async(request)
            .await
            .map_err(|e| RealtimeError::Connection(e.to_string()))?;
        info!("Realtime WebSocket connected");

        let (mut sink, mut stream) = ws_stream.split();
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<RealtimeEvent>();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();

        // Stops the writer when either side goes away.
        let writer_stop = shutdown.child_token();
        let reader_done = writer_stop.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = writer_stop.cancelled() => break,
                    event = outbound_rx.recv() => {
                        let Some(event) = event else { break };
                        let frame = match serde_json::to_string(&event) {
                            Ok(frame) => frame,
                            Err(e) => {
                                warn!(event = %event.event, error = %e, "Dropping unserializable realtime event");
                                continue;
                            }
                        };
                        if let Err(e) = sink.send(Message::Text(frame)).await {
                            warn!(error = %e, "Realtime send failed");
                            break;
                        }
                    }
                }
            }
            let _ = sink.close().await;
            debug!("Realtime writer stopped");
        });

        let reader_shutdown = shutdown.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = reader_shutdown.cancelled() => break,
                    message = stream.next() => match message {
                        Some(Ok(Message::Text(text))) => {
                            match serde_json::from_str::<RealtimeEvent>(&text) {
                                Ok(event) => {
                                    if inbound_tx.send(event).is_err() {
                                        break;
                                    }
                                }
                                Err(e) => warn!(error = %e, "Ignoring malformed realtime frame"),
                            }
                        }
                        Some(Ok(Message::Close(frame))) => {
                            info!(?frame, "Realtime server closed the connection");
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            warn!(error = %e, "Realtime receive error");
                            break;
                        }
                        None => break,
                    }
                }
            }
            reader_done.cancel();
            debug!("Realtime reader stopped");
        });

        Ok(Link {
            outbound: outbound_tx,
            inbound: inbound_rx,
            shutdown,
        })
    }
}

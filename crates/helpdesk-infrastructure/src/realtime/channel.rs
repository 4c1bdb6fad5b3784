// ============================================================================
// Helpdesk Infrastructure - Realtime Channel
// File: crates/helpdesk-infrastructure/src/realtime/channel.rs
// ============================================================================
//! Single authenticated realtime connection per channel.
//!
//! Connecting is explicit: [`RealtimeChannel::ensure_connected`] returns a
//! [`RealtimeHandle`], and listeners and emission live on the handle. Every
//! inbound event is delivered to the listeners of its name and to the
//! ordered [`RealtimeChannel::messages`] stream.

use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use helpdesk_core::{RealtimeEvent, SessionContext};

use super::connector::{Connector, Link};

const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Error)]
pub enum RealtimeError {
    #[error("No access token available for the realtime connection")]
    MissingToken,

    #[error("Realtime connection failed: {0}")]
    Connection(String),

    #[error("Realtime connection is closed")]
    Closed,
}

struct Fanout {
    messages: broadcast::Sender<RealtimeEvent>,
    events: Mutex<HashMap<String, broadcast::Sender<Value>>>,
}

impl Fanout {
    fn new() -> Self {
        let (messages, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            messages,
            events: Mutex::new(HashMap::new()),
        }
    }

    fn on(&self, event: &str) -> broadcast::Receiver<Value> {
        let mut events = self.events.lock();
        events.retain(|_, tx| tx.receiver_count() > 0);
        events
            .entry(event.to_string())
            .or_insert_with(|| broadcast::channel(EVENT_CAPACITY).0)
            .subscribe()
    }

    fn dispatch(&self, event: RealtimeEvent) {
        {
            let mut events = self.events.lock();
            if let Some(tx) = events.get(&event.event) {
                if tx.receiver_count() == 0 {
                    events.remove(&event.event);
                } else {
                    let _ = tx.send(event.data.clone());
                }
            }
        }
        let _ = self.messages.send(event);
    }
}

struct Connection {
    outbound: mpsc::UnboundedSender<RealtimeEvent>,
    open: Arc<AtomicBool>,
    shutdown: CancellationToken,
}

impl Connection {
    fn start(link: Link, fanout: Arc<Fanout>) -> Self {
        let Link {
            outbound,
            mut inbound,
            shutdown,
        } = link;
        let open = Arc::new(AtomicBool::new(true));

        let router_open = open.clone();
        let router_shutdown = shutdown.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = router_shutdown.cancelled() => break,
                    message = inbound.recv() => match message {
                        Some(event) => fanout.dispatch(event),
                        None => {
                            info!("Realtime connection closed by remote");
                            break;
                        }
                    }
                }
            }
            router_open.store(false, Ordering::SeqCst);
        });

        Self {
            outbound,
            open,
            shutdown,
        }
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst) && !self.shutdown.is_cancelled()
    }

    fn handle(&self, fanout: Arc<Fanout>) -> RealtimeHandle {
        RealtimeHandle {
            outbound: self.outbound.clone(),
            open: self.open.clone(),
            fanout,
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.open.store(false, Ordering::SeqCst);
        self.shutdown.cancel();
    }
}

/// Access to an open connection.
#[derive(Clone)]
pub struct RealtimeHandle {
    outbound: mpsc::UnboundedSender<RealtimeEvent>,
    open: Arc<AtomicBool>,
    fanout: Arc<Fanout>,
}

impl RealtimeHandle {
    /// Payloads of every future event named `event`.
    pub fn on(&self, event: &str) -> broadcast::Receiver<Value> {
        self.fanout.on(event)
    }

    pub fn messages(&self) -> broadcast::Receiver<RealtimeEvent> {
        self.fanout.messages.subscribe()
    }

    pub fn emit(&self, event: &str, data: Value) -> Result<(), RealtimeError> {
        if !self.is_open() {
            return Err(RealtimeError::Closed);
        }
        self.outbound
            .send(RealtimeEvent::new(event, data))
            .map_err(|_| RealtimeError::Closed)
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}

pub struct RealtimeChannel {
    url: String,
    session: Arc<SessionContext>,
    connector: Arc<dyn Connector>,
    connection: tokio::sync::Mutex<Option<Connection>>,
    fanout: Arc<Fanout>,
}

impl RealtimeChannel {
    pub fn new(url: impl Into<String>, session: Arc<SessionContext>, connector: Arc<dyn Connector>) -> Self {
        Self {
            url: url.into(),
            session,
            connector,
            connection: tokio::sync::Mutex::new(None),
            fanout: Arc::new(Fanout::new()),
        }
    }

    /// Opens the connection if needed. Failures are logged, not returned.
    pub async fn connect(&self) {
        match self.ensure_connected().await {
            Ok(_) => {}
            Err(RealtimeError::MissingToken) => {
                warn!("No access token available, skipping realtime connection")
            }
            Err(e) => error!("Realtime connect failed: {}", e),
        }
    }

    /// Returns the open connection, opening one with the current access
    /// token when there is none or the previous one was closed remotely.
    pub async fn ensure_connected(&self) -> Result<RealtimeHandle, RealtimeError> {
        let mut connection = self.connection.lock().await;

        if let Some(existing) = connection.as_ref() {
            if existing.is_open() {
                return Ok(existing.handle(self.fanout.clone()));
            }
            debug!("Previous realtime connection is closed, reopening");
        }
        // Drops any closed connection before opening a new one.
        *connection = None;

        let token = self
            .session
            .access_token()
            .ok_or(RealtimeError::MissingToken)?;

        let link = self.connector.open(&self.url, &token).await?;
        let opened = Connection::start(link, self.fanout.clone());
        let handle = opened.handle(self.fanout.clone());
        *connection = Some(opened);

        info!(url = %self.url, "Realtime channel connected");
        Ok(handle)
    }

    pub async fn on(&self, event: &str) -> Result<broadcast::Receiver<Value>, RealtimeError> {
        let handle = self.ensure_connected().await?;
        Ok(handle.on(event))
    }

    pub async fn emit(&self, event: &str, data: Value) -> Result<(), RealtimeError> {
        self.ensure_connected().await?.emit(event, data)
    }

    /// Every inbound event in arrival order. Does not connect.
    pub fn messages(&self) -> broadcast::Receiver<RealtimeEvent> {
        self.fanout.messages.subscribe()
    }

    pub async fn disconnect(&self) {
        if self.connection.lock().await.take().is_some() {
            info!("Realtime channel disconnected");
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.connection
            .lock()
            .await
            .as_ref()
            .is_some_and(Connection::is_open)
    }
}

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::FleetsyncConfig;
use crate::connection::ws::WsTransport;
use crate::connection::{Backoff, ConnectionManager, ConnectionState, FeedTransport};
use crate::display::DisplaySink;
use crate::reconciler::Reconciler;
use crate::state::AssetRegistry;

/// One asset-synchronization session: the registry, the reconciler, and the
/// feed connection driver, with an explicit construction/teardown lifecycle.
///
/// All mutable state lives in the session rather than at module level, so
/// multiple independent sessions can coexist (tests, multi-view embedders).
pub struct TrackerSession<S> {
    registry: Arc<AssetRegistry>,
    reconciler: Arc<Reconciler<S>>,
    state_rx: watch::Receiver<ConnectionState>,
    stop_tx: watch::Sender<bool>,
    driver: JoinHandle<()>,
    http: reqwest::Client,
    snapshot_url: Option<String>,
}

impl<S: DisplaySink + 'static> TrackerSession<S> {
    /// Start a session over the configured WebSocket feed.
    ///
    /// Must be called from within a Tokio runtime; the connection driver is
    /// spawned immediately and retries indefinitely until [`stop`] is called.
    ///
    /// [`stop`]: TrackerSession::stop
    pub fn from_config(config: &FleetsyncConfig, sink: S) -> Result<Self> {
        let transport = WsTransport::from_http_base(&config.feed.base_url, &config.feed.ws_path)?;
        let snapshot_url = format!(
            "{}{}",
            config.feed.base_url.trim_end_matches('/'),
            config.feed.snapshot_path
        );
        Ok(Self::start(
            transport,
            config.backoff.to_backoff(),
            sink,
            Some(snapshot_url),
        ))
    }

    /// Start a session over an arbitrary transport
    pub fn start<T>(transport: T, backoff: Backoff, sink: S, snapshot_url: Option<String>) -> Self
    where
        T: FeedTransport + 'static,
    {
        let registry = Arc::new(AssetRegistry::new());
        let reconciler = Arc::new(Reconciler::new(Arc::clone(&registry), sink));
        let (stop_tx, stop_rx) = watch::channel(false);

        let manager = ConnectionManager::new(transport, Arc::clone(&reconciler), backoff, stop_rx);
        let state_rx = manager.subscribe_state();
        let driver = tokio::spawn(manager.run());

        Self {
            registry,
            reconciler,
            state_rx,
            stop_tx,
            driver,
            http: reqwest::Client::new(),
            snapshot_url,
        }
    }

    /// Current connection state
    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Observe connection-state transitions
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Shared read access to the registry
    pub fn registry(&self) -> Arc<AssetRegistry> {
        Arc::clone(&self.registry)
    }

    /// True between (re)connect and the next snapshot
    pub fn awaiting_snapshot(&self) -> bool {
        self.reconciler.awaiting_snapshot()
    }

    /// Fit the view to all known assets; no-op while the registry is empty
    pub fn fit_view(&self) {
        self.reconciler.fit_view();
    }

    /// Ask the backend for a fresh snapshot.
    ///
    /// Advisory only: a plain HTTP GET whose response body is discarded. The
    /// push feed remains the sole state authority, and the backend may ignore
    /// the request in favor of its own push cadence.
    pub async fn request_snapshot(&self) -> Result<()> {
        let url = self
            .snapshot_url
            .as_ref()
            .context("No snapshot endpoint configured")?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .context("Snapshot request failed")?;
        debug!(status = %response.status(), "Snapshot request acknowledged");
        Ok(())
    }

    /// Suppress further reconnect attempts and transition the connection to
    /// its terminal `Stopped` state. Interrupts an in-flight backoff wait.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    /// Wait for the connection driver to finish, after [`stop`]
    ///
    /// [`stop`]: TrackerSession::stop
    pub async fn join(self) {
        if let Err(e) = self.driver.await {
            warn!(error = %e, "Connection driver task failed");
        }
    }
}

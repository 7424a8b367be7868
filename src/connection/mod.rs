use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::display::DisplaySink;
use crate::reconciler::Reconciler;

pub mod ws;


/// Feed connection lifecycle states
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    /// Constructed, not yet driven
    Idle,
    /// Dial attempt in progress
    Connecting,
    /// Feed connection established
    Open,
    /// Connection lost; exactly one reconnect is scheduled
    ClosedPendingRetry,
    /// Terminal, entered only via stop
    Stopped,
}

/// Bounded exponential backoff for reconnect scheduling.
///
/// Yields the current delay and doubles the next one up to the ceiling;
/// a successful connection resets the delay to the floor. With floor 1s and
/// ceiling 10s the sequence is 1, 2, 4, 8, 10, 10, ...
#[derive(Clone, Debug)]
pub struct Backoff {
    floor: Duration,
    ceiling: Duration,
    current: Duration,
}

impl Backoff {
    pub fn new(floor: Duration, ceiling: Duration) -> Self {
        Self {
            floor,
            ceiling,
            current: floor,
        }
    }

    /// Delay before the next attempt; doubles the following delay, clamped
    /// to the ceiling
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (delay * 2).min(self.ceiling);
        delay
    }

    /// Back to the floor value, after a successful connection
    pub fn reset(&mut self) {
        self.current = self.floor;
    }
}

/// A dialable source of feed messages.
///
/// Abstracts the transport so the connection manager is testable without a
/// network. [`ws::WsTransport`] is the production implementation.
#[async_trait]
pub trait FeedTransport: Send {
    type Stream: FeedStream + 'static;

    /// Establish a fresh connection.
    ///
    /// Called once per attempt; a disposed stream is never reused.
    async fn dial(&mut self) -> Result<Self::Stream>;
}

/// One established feed connection
#[async_trait]
pub trait FeedStream: Send {
    /// Next inbound payload: `Some(Ok(text))` for a message, `Some(Err(_))`
    /// on transport error, `None` on clean close.
    async fn next_message(&mut self) -> Option<Result<String>>;
}

/// Keeps exactly one logical feed connection alive, retrying forever with
/// bounded exponential backoff.
///
/// Messages are handed to the [`Reconciler`] in arrival order. A transport
/// error is handled identically to a clean close: both flow through the
/// single retry path, so no close is ever handled twice. There is no maximum
/// retry count; `stop()` on the owning session suppresses further retries
/// and transitions to the terminal `Stopped` state.
pub struct ConnectionManager<T, S> {
    transport: T,
    reconciler: Arc<Reconciler<S>>,
    backoff: Backoff,
    state_tx: watch::Sender<ConnectionState>,
    stop_rx: watch::Receiver<bool>,
}

impl<T: FeedTransport, S: DisplaySink> ConnectionManager<T, S> {
    pub fn new(
        transport: T,
        reconciler: Arc<Reconciler<S>>,
        backoff: Backoff,
        stop_rx: watch::Receiver<bool>,
    ) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Idle);
        Self {
            transport,
            reconciler,
            backoff,
            state_tx,
            stop_rx,
        }
    }

    /// Observe connection-state transitions
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    fn set_state(&self, state: ConnectionState) {
        let _ = self.state_tx.send(state);
    }

    fn stop_requested(&self) -> bool {
        *self.stop_rx.borrow()
    }

    /// Drive the connection until stopped: dial, pump messages, back off,
    /// redial.
    pub async fn run(mut self) {
        let mut stop_rx = self.stop_rx.clone();

        'outer: loop {
            if self.stop_requested() {
                break;
            }

            self.set_state(ConnectionState::Connecting);
            let dialed = tokio::select! {
                result = self.transport.dial() => result,
                _ = stop_rx.changed() => break 'outer,
            };

            match dialed {
                Ok(mut stream) => {
                    self.set_state(ConnectionState::Open);
                    self.backoff.reset();
                    self.reconciler.on_connected();

                    loop {
                        let next = tokio::select! {
                            message = stream.next_message() => message,
                            _ = stop_rx.changed() => break 'outer,
                        };
                        match next {
                            Some(Ok(payload)) => {
                                // Malformed payloads are dropped; the
                                // connection is unaffected
                                if let Err(e) = self.reconciler.apply_raw(&payload) {
                                    warn!(error = %e, "Dropping malformed feed message");
                                }
                            }
                            Some(Err(e)) => {
                                warn!(error = %e, "Feed transport error");
                                break;
                            }
                            None => {
                                info!("Feed connection closed");
                                break;
                            }
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Feed connect failed");
                }
            }

            self.set_state(ConnectionState::ClosedPendingRetry);
            let delay = self.backoff.next_delay();
            info!(delay_ms = delay.as_millis() as u64, "Reconnect scheduled");
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = stop_rx.changed() => break 'outer,
            }
        }

        self.set_state(ConnectionState::Stopped);
        info!("Connection manager stopped");
    }
}

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::asset::Asset;
use crate::display::DisplaySink;
use crate::feed::FeedMessage;
use crate::state::AssetRegistry;


/// Margin fraction applied to the viewport bounds for fit-view requests
const FIT_PADDING: f64 = 0.2;

/// Converts inbound feed messages into registry mutations and display-sink
/// instructions.
///
/// Stateless with respect to messages beyond the registry content itself:
/// updates for one id are last-write-wins, and a snapshot always wins over
/// anything before it.
pub struct Reconciler<S> {
    registry: Arc<AssetRegistry>,
    sink: S,

    /// Set on (re)connect, cleared by the next snapshot
    awaiting_snapshot: AtomicBool,
}

impl<S: DisplaySink> Reconciler<S> {
    pub fn new(registry: Arc<AssetRegistry>, sink: S) -> Self {
        Self {
            registry,
            sink,
            awaiting_snapshot: AtomicBool::new(true),
        }
    }

    /// Decode and apply one raw feed payload.
    ///
    /// A malformed payload is returned as a decode error for the caller to
    /// log and drop; registry and sink are untouched.
    pub fn apply_raw(&self, raw: &str) -> Result<(), serde_json::Error> {
        let message = FeedMessage::decode(raw)?;
        self.apply(message);
        Ok(())
    }

    /// Apply one decoded feed message
    pub fn apply(&self, message: FeedMessage) {
        match message {
            FeedMessage::Snapshot { data } => self.apply_snapshot(&data),
            FeedMessage::AssetUpdate { data } => self.apply_update(data),
            FeedMessage::Unknown => {
                // Forward compatibility: not an error
                debug!("Ignoring feed message of unknown type");
            }
        }
    }

    /// The connection (re)opened; the backend sends a fresh snapshot first
    pub fn on_connected(&self) {
        self.awaiting_snapshot.store(true, Ordering::SeqCst);
        info!("Feed connected, awaiting snapshot");
    }

    /// True between (re)connect and the next snapshot
    pub fn awaiting_snapshot(&self) -> bool {
        self.awaiting_snapshot.load(Ordering::SeqCst)
    }

    /// Fit the view to all known assets, padded by a fixed margin.
    ///
    /// Pull operation triggered externally (e.g., a user action). No-op while
    /// the registry is empty; never panics.
    pub fn fit_view(&self) {
        if let Some(bounds) = self.registry.bounds() {
            self.sink.fit_to_bounds(bounds.padded(FIT_PADDING));
        }
    }

    fn apply_snapshot(&self, assets: &[Asset]) {
        self.awaiting_snapshot.store(false, Ordering::SeqCst);

        // Clear-and-repopulate keeps markers in lockstep with the registry
        self.sink.clear_all();
        let count = self.registry.replace_all(assets);

        for asset in assets {
            self.sink
                .upsert_marker(&asset.id, asset.position(), &marker_label(asset));
        }
        self.sink.set_asset_count(count);
    }

    fn apply_update(&self, asset: Asset) {
        let id = asset.id.clone();
        let position = asset.position();
        let label = marker_label(&asset);

        let previous = self.registry.upsert(asset);
        if previous.is_none() {
            debug!(id = %id, "Update for unseen asset, inserting");
        }

        self.sink.upsert_marker(&id, position, &label);
    }
}

/// Marker label: name, speed to one decimal, heading to the nearest whole
/// degree (normalized to [0, 360)), and status.
fn marker_label(asset: &Asset) -> String {
    format!(
        "{} | {:.1} kph | {}\u{00b0} | {}",
        asset.name,
        round_to_decimal(asset.speed_kph),
        round_heading(asset.heading_deg),
        asset.status
    )
}

/// Round half away from zero to one decimal place
fn round_to_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Nearest whole degree in [0, 360)
fn round_heading(heading_deg: f64) -> u32 {
    heading_deg.round().rem_euclid(360.0) as u32
}

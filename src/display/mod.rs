use tracing::{debug, info};

use crate::asset::{GeoBounds, GeoPoint};

/// Render instructions the reconciler issues to the map layer.
///
/// Implemented externally by the embedding application (a Leaflet-style map
/// widget in the original deployment). The reconciler guarantees the sink is
/// kept in lockstep with the registry: every marker corresponds to a registry
/// entry and vice versa.
///
/// `remove_marker` exists for embedders that prune markers themselves; the
/// reconciler never calls it because snapshot semantics are
/// clear-and-repopulate (`clear_all` followed by upserts).
pub trait DisplaySink: Send + Sync {
    /// Create or move the marker for `id` and set its label
    fn upsert_marker(&self, id: &str, position: GeoPoint, label: &str);

    /// Remove the marker for `id`
    fn remove_marker(&self, id: &str);

    /// Remove every marker
    fn clear_all(&self);

    /// Total-count notification, issued once per snapshot
    fn set_asset_count(&self, count: usize);

    /// Fit the viewport to the given (already padded) bounds
    fn fit_to_bounds(&self, bounds: GeoBounds);
}

/// Sink that logs every instruction through `tracing`.
///
/// Used by the headless binary; doubles as a reference implementation.
#[derive(Default)]
pub struct TraceSink;

impl TraceSink {
    pub fn new() -> Self {
        Self
    }
}

impl DisplaySink for TraceSink {
    fn upsert_marker(&self, id: &str, position: GeoPoint, label: &str) {
        debug!(
            id = %id,
            lat = position.lat,
            lng = position.lng,
            label = %label,
            "Upsert marker"
        );
    }

    fn remove_marker(&self, id: &str) {
        debug!(id = %id, "Remove marker");
    }

    fn clear_all(&self) {
        debug!("Clear all markers");
    }

    fn set_asset_count(&self, count: usize) {
        info!(count = count, "Asset count");
    }

    fn fit_to_bounds(&self, bounds: GeoBounds) {
        info!(
            south = bounds.south,
            west = bounds.west,
            north = bounds.north,
            east = bounds.east,
            "Fit view to bounds"
        );
    }
}

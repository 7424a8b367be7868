use dashmap::DashMap;
use std::sync::RwLock;
use tracing::info;

use crate::asset::{Asset, GeoBounds};

/// Authoritative in-memory set of currently-visible assets.
///
/// At most one [`Asset`] exists per `id`. The registry is the single source
/// of truth for what is rendered: the reconciler keeps the display sink in
/// lockstep with it. Entries are never pruned individually; only a new
/// snapshot removes assets, by clearing and repopulating the whole map.
pub struct AssetRegistry {
    /// Lock-free concurrent map for fast reads from outside the driver task
    assets: DashMap<String, Asset>,

    /// Viewport bounds derived from every known position; `None` while empty
    bounds: RwLock<Option<GeoBounds>>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self {
            assets: DashMap::new(),
            bounds: RwLock::new(None),
        }
    }

    /// Clear and fully repopulate from a snapshot.
    ///
    /// Entries absent from the snapshot are implicitly removed; bounds are
    /// rebuilt from scratch. Returns the new asset count.
    pub fn replace_all(&self, assets: &[Asset]) -> usize {
        self.assets.clear();
        for asset in assets {
            self.assets.insert(asset.id.clone(), asset.clone());
        }

        let bounds = GeoBounds::from_positions(assets.iter().map(|a| a.position()));
        *self.bounds.write().expect("bounds lock poisoned") = bounds;

        info!(assets = assets.len(), "Registry replaced from snapshot");
        self.assets.len()
    }

    /// Insert or replace one asset (last write wins) and extend the bounds
    /// with its position. Returns the previous entry, if any.
    pub fn upsert(&self, asset: Asset) -> Option<Asset> {
        let position = asset.position();
        let previous = self.assets.insert(asset.id.clone(), asset);

        let mut bounds = self.bounds.write().expect("bounds lock poisoned");
        match bounds.as_mut() {
            Some(b) => b.extend(position),
            None => *bounds = Some(GeoBounds::point(position)),
        }

        previous
    }

    /// Get asset by ID
    pub fn get(&self, id: &str) -> Option<Asset> {
        self.assets.get(id).map(|a| a.clone())
    }

    /// Get all assets
    pub fn all(&self) -> Vec<Asset> {
        self.assets.iter().map(|a| a.value().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Current viewport bounds; valid only while the registry is non-empty
    pub fn bounds(&self) -> Option<GeoBounds> {
        *self.bounds.read().expect("bounds lock poisoned")
    }
}

impl Default for AssetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

use serde::Deserialize;

use crate::asset::Asset;

#[cfg(test)]
mod tests;

/// Inbound feed message envelope.
///
/// The backend pushes two message kinds over the feed connection,
/// distinguished by the `type` tag:
/// - `snapshot`: full replacement of the tracked-asset set
/// - `asset_update`: insert-or-update for a single asset
///
/// Unknown `type` values decode to [`FeedMessage::Unknown`] so newer backends
/// can add message kinds without breaking older clients.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedMessage {
    Snapshot { data: Vec<Asset> },
    AssetUpdate { data: Asset },
    #[serde(other)]
    Unknown,
}

impl FeedMessage {
    /// Decode a raw feed payload.
    ///
    /// A malformed payload is a decode error for that single message; it does
    /// not affect the connection (the caller logs and drops it).
    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Asset represents one tracked entity at its most recent known position.
///
/// The `id` is the only join key across feed messages; all other fields are
/// replaced wholesale on update (last write wins).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Asset {
    /// Stable unique identifier (e.g., "asset-001")
    pub id: String,

    /// Display label
    pub name: String,

    /// WGS84 latitude
    pub lat: f64,

    /// WGS84 longitude
    pub lng: f64,

    /// Compass heading, 0-360
    pub heading_deg: f64,

    /// Non-negative speed
    pub speed_kph: f64,

    /// Free-form classification (e.g., "moving", "stopped")
    pub status: String,

    /// Producer timestamp, if the feed provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<DateTime<Utc>>,
}

impl Asset {
    pub fn position(&self) -> GeoPoint {
        GeoPoint {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

/// A single WGS84 position
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Minimal rectangle covering a set of positions.
///
/// Valid only while derived from at least one position; an empty registry
/// has no bounds (`Option<GeoBounds>` at the call sites).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    /// Degenerate bounds covering a single point
    pub fn point(p: GeoPoint) -> Self {
        Self {
            south: p.lat,
            west: p.lng,
            north: p.lat,
            east: p.lng,
        }
    }

    /// Grow to include `p`
    pub fn extend(&mut self, p: GeoPoint) {
        self.south = self.south.min(p.lat);
        self.north = self.north.max(p.lat);
        self.west = self.west.min(p.lng);
        self.east = self.east.max(p.lng);
    }

    /// Fold bounds from positions; `None` when the iterator is empty
    pub fn from_positions<I: IntoIterator<Item = GeoPoint>>(positions: I) -> Option<Self> {
        let mut iter = positions.into_iter();
        let mut bounds = Self::point(iter.next()?);
        for p in iter {
            bounds.extend(p);
        }
        Some(bounds)
    }

    /// Bounds grown on every side by `fraction` of the corresponding span
    pub fn padded(&self, fraction: f64) -> Self {
        let lat_margin = (self.north - self.south) * fraction;
        let lng_margin = (self.east - self.west) * fraction;
        Self {
            south: self.south - lat_margin,
            west: self.west - lng_margin,
            north: self.north + lat_margin,
            east: self.east + lng_margin,
        }
    }

    pub fn contains(&self, p: GeoPoint) -> bool {
        p.lat >= self.south && p.lat <= self.north && p.lng >= self.west && p.lng <= self.east
    }
}

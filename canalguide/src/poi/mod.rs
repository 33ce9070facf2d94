//! Points of interest
//!
//! A tour is a fixed list of [`PointOfInterest`] values. The list is loaded
//! once (from a JSON catalog or the built-in canal tour) and shared read-only
//! between the proximity engine and the presentation layer.
//!
//! # Catalog Format
//!
//! ```json
//! [
//!   {
//!     "id": "westerkerk",
//!     "name": "Westerkerk",
//!     "coordinates": [4.883060408403026, 52.37458759069162],
//!     "description": "...",
//!     "audioUrl": "https://example.org/westerkerk.mp3"
//!   }
//! ]
//! ```
//!
//! Coordinates are stored GeoJSON-style as `[longitude, latitude]`.

mod catalog;
mod draft;

pub use catalog::{CatalogError, PoiCatalog};
pub use draft::{DraftError, NewPoi};

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Stable identity of a point of interest within a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoiId(String);

impl PoiId {
    /// Create an id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PoiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PoiId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PoiId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A named location on the tour with descriptive and audio content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterest {
    /// Unique, stable identifier.
    pub id: PoiId,
    /// Display name.
    pub name: String,
    /// Location of the point of interest.
    #[serde(with = "lng_lat")]
    pub coordinates: Coordinate,
    /// Description shown on the info card.
    #[serde(default)]
    pub description: String,
    /// Opaque locator for the audio commentary (usually a URL).
    #[serde(rename = "audioUrl", default)]
    pub audio_ref: String,
}

impl PointOfInterest {
    /// Create a point of interest.
    pub fn new(
        id: impl Into<PoiId>,
        name: impl Into<String>,
        coordinates: Coordinate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coordinates,
            description: String::new(),
            audio_ref: String::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the audio locator.
    pub fn with_audio_ref(mut self, audio_ref: impl Into<String>) -> Self {
        self.audio_ref = audio_ref.into();
        self
    }

    /// Whether this point of interest has audio commentary.
    pub fn has_audio(&self) -> bool {
        !self.audio_ref.is_empty()
    }
}

/// Shared, immutable handle to a point of interest.
pub type SharedPoi = Arc<PointOfInterest>;

/// Serde adapter for GeoJSON `[longitude, latitude]` pairs.
mod lng_lat {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::geo::Coordinate;

    pub fn serialize<S: Serializer>(coord: &Coordinate, serializer: S) -> Result<S::Ok, S::Error> {
        [coord.longitude, coord.latitude].serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Coordinate, D::Error> {
        let [longitude, latitude] = <[f64; 2]>::deserialize(deserializer)?;
        Ok(Coordinate::new(latitude, longitude))
    }
}

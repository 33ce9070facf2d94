//! POI catalog loading and validation.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use super::{PoiId, PointOfInterest, SharedPoi};
use crate::geo::{CoordError, Coordinate};

/// Errors that can occur while loading or saving a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// I/O error reading or writing the catalog file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog is not valid JSON or has the wrong shape.
    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A point of interest has invalid coordinates.
    #[error("POI '{id}' has invalid coordinates: {source}")]
    InvalidCoordinates {
        id: PoiId,
        #[source]
        source: CoordError,
    },

    /// Two points of interest share an id.
    #[error("Duplicate POI id '{0}'")]
    DuplicateId(PoiId),
}

/// An ordered, validated list of points of interest.
///
/// Order matters: the proximity engine evaluates and emits events in
/// catalog order.
#[derive(Debug, Clone, Default)]
pub struct PoiCatalog {
    pois: Vec<SharedPoi>,
}

impl PoiCatalog {
    /// Build a catalog, validating ids and coordinates.
    pub fn new(pois: Vec<PointOfInterest>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(pois.len());
        for poi in &pois {
            poi.coordinates
                .validate()
                .map_err(|source| CatalogError::InvalidCoordinates {
                    id: poi.id.clone(),
                    source,
                })?;
            if !seen.insert(poi.id.clone()) {
                return Err(CatalogError::DuplicateId(poi.id.clone()));
            }
        }

        Ok(Self {
            pois: pois.into_iter().map(Arc::new).collect(),
        })
    }

    /// Parse a catalog from its JSON representation.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let pois: Vec<PointOfInterest> = serde_json::from_str(json)?;
        Self::new(pois)
    }

    /// Load a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&contents)?;
        tracing::info!(
            path = %path.display(),
            count = catalog.len(),
            "Loaded POI catalog"
        );
        Ok(catalog)
    }

    /// Write the catalog to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        let pois: Vec<&PointOfInterest> = self.pois.iter().map(Arc::as_ref).collect();
        let json = serde_json::to_string_pretty(&pois)?;
        std::fs::write(path, json)?;
        tracing::debug!(path = %path.display(), count = self.len(), "Saved POI catalog");
        Ok(())
    }

    /// Append a point of interest, rejecting duplicate ids.
    pub fn push(&mut self, poi: PointOfInterest) -> Result<(), CatalogError> {
        poi.coordinates
            .validate()
            .map_err(|source| CatalogError::InvalidCoordinates {
                id: poi.id.clone(),
                source,
            })?;
        if self.get(&poi.id).is_some() {
            return Err(CatalogError::DuplicateId(poi.id));
        }
        self.pois.push(Arc::new(poi));
        Ok(())
    }

    /// The built-in Amsterdam canal tour stops, in route order.
    pub fn amsterdam_canal_tour() -> Self {
        let stops = [
            (
                "keizersgracht-brouwersgracht",
                "Keizergracht naar Brouwers",
                52.37974977474141,
                4.889843100194469,
                "Where the Keizersgracht meets the Brouwersgracht, once lined with breweries and warehouses.",
            ),
            (
                "noorderkerk",
                "Noorderkerk",
                52.379487162752895,
                4.887454684643103,
                "Protestant church built in 1620-1623 for the poor of the Jordaan.",
            ),
            (
                "huis-met-de-hoofden",
                "Huis met de Hoofden",
                52.376467393423354,
                4.886981607172686,
                "Canal house from 1622 decorated with six classical heads.",
            ),
            (
                "anne-frank-huis",
                "Anne Frank Huis",
                52.37553316857546,
                4.8838016826306045,
                "The house where Anne Frank hid during the Second World War.",
            ),
            (
                "westerkerk",
                "Westerkerk",
                52.37458759069162,
                4.883060408403026,
                "Renaissance church whose tower is the tallest in the city centre.",
            ),
        ];

        let pois = stops
            .into_iter()
            .map(|(id, name, lat, lon, description)| {
                Arc::new(
                    PointOfInterest::new(id, name, Coordinate::new(lat, lon))
                        .with_description(description),
                )
            })
            .collect();

        Self { pois }
    }

    /// Look up a point of interest by id.
    pub fn get(&self, id: &PoiId) -> Option<&SharedPoi> {
        self.pois.iter().find(|p| &p.id == id)
    }

    /// Position of a point of interest in catalog order.
    pub fn position(&self, id: &PoiId) -> Option<usize> {
        self.pois.iter().position(|p| &p.id == id)
    }

    /// Shared handles to all points of interest, in order.
    pub fn pois(&self) -> &[SharedPoi] {
        &self.pois
    }

    /// Iterate over the points of interest in order.
    pub fn iter(&self) -> impl Iterator<Item = &SharedPoi> {
        self.pois.iter()
    }

    /// Number of points of interest.
    pub fn len(&self) -> usize {
        self.pois.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.pois.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "id": "1",
            "name": "Noorderkerk",
            "coordinates": [4.887454684643103, 52.379487162752895],
            "description": "Church",
            "audioUrl": ""
        },
        {
            "id": "2",
            "name": "Westerkerk",
            "coordinates": [4.883060408403026, 52.37458759069162],
            "description": "Church",
            "audioUrl": "https://example.org/w.mp3"
        }
    ]"#;

    #[test]
    fn test_from_json_preserves_order() {
        let catalog = PoiCatalog::from_json_str(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.pois()[0].name, "Noorderkerk");
        assert_eq!(catalog.pois()[1].name, "Westerkerk");
        assert_eq!(catalog.position(&PoiId::new("2")), Some(1));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"[
            {"id": "1", "name": "A", "coordinates": [4.0, 52.0]},
            {"id": "1", "name": "B", "coordinates": [4.1, 52.1]}
        ]"#;
        let result = PoiCatalog::from_json_str(json);
        assert!(matches!(result, Err(CatalogError::DuplicateId(id)) if id.as_str() == "1"));
    }

    #[test]
    fn test_out_of_range_coordinates_rejected() {
        let json = r#"[{"id": "1", "name": "A", "coordinates": [4.0, 95.0]}]"#;
        let result = PoiCatalog::from_json_str(json);
        assert!(matches!(
            result,
            Err(CatalogError::InvalidCoordinates { .. })
        ));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            PoiCatalog::from_json_str("{not json"),
            Err(CatalogError::Json(_))
        ));
    }

    #[test]
    fn test_push_rejects_duplicate() {
        let mut catalog = PoiCatalog::from_json_str(SAMPLE).unwrap();
        let dup = PointOfInterest::new("1", "Again", Coordinate::new(52.0, 4.0));
        assert!(matches!(
            catalog.push(dup),
            Err(CatalogError::DuplicateId(_))
        ));

        let fresh = PointOfInterest::new("3", "New", Coordinate::new(52.0, 4.0));
        catalog.push(fresh).unwrap();
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pois.json");

        let catalog = PoiCatalog::amsterdam_canal_tour();
        catalog.save(&path).unwrap();

        let loaded = PoiCatalog::load(&path).unwrap();
        assert_eq!(loaded.len(), catalog.len());
        for (a, b) in loaded.iter().zip(catalog.iter()) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.name, b.name);
            assert_eq!(a.description, b.description);
            assert!(a.coordinates.distance_to(&b.coordinates) < 0.001);
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = PoiCatalog::load(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }

    #[test]
    fn test_builtin_tour() {
        let catalog = PoiCatalog::amsterdam_canal_tour();
        assert_eq!(catalog.len(), 5);
        assert!(catalog.get(&PoiId::new("westerkerk")).is_some());
        assert!(catalog.iter().all(|p| p.coordinates.validate().is_ok()));
    }
}

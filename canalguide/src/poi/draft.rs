//! Admin-side drafts of new points of interest.

use thiserror::Error;

use super::{PoiId, PointOfInterest};
use crate::geo::{CoordError, Coordinate};

/// Reasons a draft cannot become a point of interest.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DraftError {
    /// A required field is empty or missing.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The coordinate text could not be parsed.
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(#[from] CoordError),
}

/// A partially filled-in point of interest, as entered in the admin form.
///
/// Name, coordinates and description are required; the audio locator is
/// optional.
#[derive(Debug, Clone, Default)]
pub struct NewPoi {
    pub name: Option<String>,
    /// Coordinates in `lat,lng` text form.
    pub coordinates: Option<String>,
    pub description: Option<String>,
    pub audio_ref: Option<String>,
}

impl NewPoi {
    /// Validate the draft and build a point of interest with an id derived
    /// from the current wall-clock time in milliseconds.
    pub fn build(self) -> Result<PointOfInterest, DraftError> {
        let id = chrono::Utc::now().timestamp_millis().to_string();
        self.build_with_id(id)
    }

    /// Validate the draft and build a point of interest with the given id.
    pub fn build_with_id(self, id: impl Into<PoiId>) -> Result<PointOfInterest, DraftError> {
        let name = required(self.name, "name")?;
        let coordinates: Coordinate = required(self.coordinates, "coordinates")?.parse()?;
        let description = required(self.description, "description")?;

        Ok(PointOfInterest {
            id: id.into(),
            name,
            coordinates,
            description,
            audio_ref: self.audio_ref.unwrap_or_default(),
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, DraftError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(DraftError::MissingField(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_draft() -> NewPoi {
        NewPoi {
            name: Some("Westerkerk".to_string()),
            coordinates: Some("52.3745, 4.8830".to_string()),
            description: Some("Church".to_string()),
            audio_ref: None,
        }
    }

    #[test]
    fn test_build_complete_draft() {
        let poi = complete_draft().build_with_id("w").unwrap();
        assert_eq!(poi.id, PoiId::new("w"));
        assert_eq!(poi.name, "Westerkerk");
        assert_eq!(poi.coordinates, Coordinate::new(52.3745, 4.8830));
        assert!(poi.audio_ref.is_empty());
    }

    #[test]
    fn test_build_generates_numeric_id() {
        let poi = complete_draft().build().unwrap();
        assert!(poi.id.as_str().parse::<i64>().is_ok());
    }

    #[test]
    fn test_missing_fields() {
        let mut draft = complete_draft();
        draft.name = Some("   ".to_string());
        assert_eq!(
            draft.build_with_id("x").unwrap_err(),
            DraftError::MissingField("name")
        );

        let mut draft = complete_draft();
        draft.description = None;
        assert_eq!(
            draft.build_with_id("x").unwrap_err(),
            DraftError::MissingField("description")
        );
    }

    #[test]
    fn test_bad_coordinates() {
        let mut draft = complete_draft();
        draft.coordinates = Some("north of the canal".to_string());
        assert!(matches!(
            draft.build_with_id("x"),
            Err(DraftError::InvalidCoordinates(_))
        ));
    }
}

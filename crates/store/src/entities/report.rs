//! Report document entity.

use hydrasense_common::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::documents::Document;

/// Geographic coordinates of a water source.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees, [-90, 90].
    pub latitude: f64,
    /// Longitude in degrees, [-180, 180].
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new coordinate pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// A water-quality report as written to the reports collection.
///
/// Field names are pinned to the wire format of already-stored documents
/// and must not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    /// The user who submitted the report, or `"anonymous"`.
    #[serde(rename = "UserId")]
    pub user_id: String,
    /// Display name of the water body.
    #[serde(rename = "WaterSourceName")]
    pub water_source_name: String,
    /// Coordinates; an unset location is written as the zero pair.
    #[serde(rename = "Location")]
    pub location: GeoPoint,
    /// pH reading, [0, 14].
    pub ph: f64,
    /// Turbidity reading in NTU, [0, 100].
    pub turbidity: f64,
    /// Temperature reading in degrees Celsius, [0, 40].
    pub temperature: f64,
    /// Durable photo URL, or `""` when no photo was attached.
    #[serde(rename = "imageProof")]
    pub image_proof: String,
}

impl ReportDocument {
    /// Convert to the schemaless document shape the store appends.
    pub fn into_document(self) -> AppResult<Document> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => Ok(map),
            Ok(_) => Err(AppError::Internal(
                "Report did not serialize to an object".to_string(),
            )),
            Err(e) => Err(AppError::Internal(format!(
                "Failed to serialize report: {e}"
            ))),
        }
    }

    /// Parse a stored document back into a report.
    pub fn from_document(document: &Document) -> AppResult<Self> {
        serde_json::from_value(serde_json::Value::Object(document.clone()))
            .map_err(|e| AppError::Internal(format!("Malformed report document: {e}")))
    }

    /// Whether a photo was attached to this report.
    #[must_use]
    pub fn has_photo(&self) -> bool {
        !self.image_proof.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> ReportDocument {
        ReportDocument {
            user_id: "anonymous".to_string(),
            water_source_name: "Test Lake".to_string(),
            location: GeoPoint::new(40.78, -73.96),
            ph: 7.0,
            turbidity: 5.0,
            temperature: 20.0,
            image_proof: String::new(),
        }
    }

    #[test]
    fn test_wire_field_names() {
        let document = sample().into_document().unwrap();

        assert!(document.contains_key("UserId"));
        assert!(document.contains_key("WaterSourceName"));
        assert!(document.contains_key("Location"));
        assert!(document.contains_key("ph"));
        assert!(document.contains_key("turbidity"));
        assert!(document.contains_key("temperature"));
        assert!(document.contains_key("imageProof"));

        let location = document["Location"].as_object().unwrap();
        assert_eq!(location["latitude"].as_f64(), Some(40.78));
        assert_eq!(location["longitude"].as_f64(), Some(-73.96));
    }

    #[test]
    fn test_has_photo() {
        let mut report = sample();
        assert!(!report.has_photo());

        report.image_proof = "https://cdn.example.com/images/1.jpg".to_string();
        assert!(report.has_photo());
    }
}

//! Report review entities.

use chrono::{DateTime, Utc};
use hydrasense_common::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::documents::{Document, DocumentId};

/// Review status assigned by backend moderation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Awaiting review.
    #[default]
    Pending,
    /// Verified by a reviewer.
    Approved,
    /// Rejected by a reviewer.
    Rejected,
}

/// One previously submitted report plus its review metadata.
///
/// Entries are created backend-side when a moderator reviews a
/// submission and are read-only from the client's perspective.
/// `reviewed_at` and `review_comments` are only present once the entry
/// has left [`ReportStatus::Pending`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportHistoryEntry {
    /// Document identifier of the submitted report.
    #[serde(default)]
    pub id: DocumentId,
    /// Display name of the water body.
    #[serde(rename = "locationName")]
    pub source_name: String,
    /// Human-readable address of the water body.
    #[serde(rename = "locationAddress", default)]
    pub location_address: String,
    /// pH reading.
    pub ph: f64,
    /// Turbidity reading in NTU.
    pub turbidity: f64,
    /// Temperature reading in degrees Celsius.
    pub temperature: f64,
    /// When the report was submitted.
    #[serde(rename = "submittedAt")]
    pub submitted_at: DateTime<Utc>,
    /// When the report was reviewed.
    #[serde(rename = "reviewedAt", default)]
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Current review status.
    pub status: ReportStatus,
    /// Reviewer comments.
    #[serde(rename = "reviewComments", default)]
    pub review_comments: Option<String>,
}

impl ReportHistoryEntry {
    /// Parse a stored history document.
    pub fn from_document(id: DocumentId, document: &Document) -> AppResult<Self> {
        let mut entry: Self =
            serde_json::from_value(serde_json::Value::Object(document.clone()))
                .map_err(|e| AppError::Internal(format!("Malformed history document: {e}")))?;
        entry.id = id;
        Ok(entry)
    }

    /// Whether this entry has been reviewed.
    #[must_use]
    pub fn is_reviewed(&self) -> bool {
        self.status != ReportStatus::Pending
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_values() {
        assert_eq!(
            serde_json::to_string(&ReportStatus::Approved).unwrap(),
            "\"approved\""
        );
        let status: ReportStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(status, ReportStatus::Pending);
    }

    #[test]
    fn test_pending_entry_carries_no_review_metadata() {
        let raw = serde_json::json!({
            "locationName": "Brooklyn Bridge Fountain",
            "locationAddress": "Brooklyn, NY",
            "ph": 7.5,
            "turbidity": 1.0,
            "temperature": 22.0,
            "submittedAt": "2024-01-11T11:10:00Z",
            "status": "pending",
        });
        let document = raw.as_object().unwrap().clone();
        let entry = ReportHistoryEntry::from_document("doc1".to_string(), &document).unwrap();

        assert_eq!(entry.id, "doc1");
        assert!(!entry.is_reviewed());
        assert!(entry.reviewed_at.is_none());
        assert!(entry.review_comments.is_none());
    }
}

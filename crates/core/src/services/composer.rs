//! Report composition and submission.

use std::sync::Arc;

use chrono::Utc;
use hydrasense_common::{BlobStore, photo_storage_key};
use hydrasense_store::{AuthGateway, DocumentId, DocumentStore, GeoPoint, ReportDocument};
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

/// Reporter id recorded when no session exists.
pub const ANONYMOUS_REPORTER: &str = "anonymous";

/// Default pH for a pristine draft.
pub const DEFAULT_PH: f64 = 7.0;
/// Default turbidity (NTU) for a pristine draft.
pub const DEFAULT_TURBIDITY: f64 = 5.0;
/// Default temperature (°C) for a pristine draft.
pub const DEFAULT_TEMPERATURE: f64 = 20.0;

/// Photo attached to a draft, held in memory until upload.
#[derive(Debug, Clone)]
pub struct PhotoAttachment {
    /// Raw image bytes.
    pub data: Vec<u8>,
    /// MIME content type.
    pub content_type: String,
}

impl PhotoAttachment {
    /// Create a JPEG attachment.
    #[must_use]
    pub fn jpeg(data: Vec<u8>) -> Self {
        Self {
            data,
            content_type: "image/jpeg".to_string(),
        }
    }
}

/// In-progress report field state.
///
/// Each numeric field is pinned to its default until changed;
/// [`Default`] restores the pristine draft.
#[derive(Debug, Clone, Validate)]
pub struct ReportDraft {
    /// Display name of the water body.
    #[validate(length(min = 1, message = "Water source name is required"))]
    pub source_name: String,
    /// Coordinates, if the reporter provided them.
    #[validate(custom(function = validate_location))]
    pub location: Option<GeoPoint>,
    /// pH reading.
    #[validate(range(min = 0.0, max = 14.0, message = "pH must be between 0 and 14"))]
    pub ph: f64,
    /// Turbidity reading in NTU.
    #[validate(range(min = 0.0, max = 100.0, message = "Turbidity must be between 0 and 100 NTU"))]
    pub turbidity: f64,
    /// Temperature reading in degrees Celsius.
    #[validate(range(min = 0.0, max = 40.0, message = "Temperature must be between 0 and 40 °C"))]
    pub temperature: f64,
}

impl Default for ReportDraft {
    fn default() -> Self {
        Self {
            source_name: String::new(),
            location: None,
            ph: DEFAULT_PH,
            turbidity: DEFAULT_TURBIDITY,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

fn validate_location(location: &GeoPoint) -> Result<(), ValidationError> {
    if !(-90.0..=90.0).contains(&location.latitude) {
        return Err(ValidationError::new("latitude")
            .with_message("Latitude must be between -90 and 90".into()));
    }
    if !(-180.0..=180.0).contains(&location.longitude) {
        return Err(ValidationError::new("longitude")
            .with_message("Longitude must be between -180 and 180".into()));
    }
    Ok(())
}

/// Submission failure.
///
/// Neither collaborator variant is retried automatically; the message
/// is surfaced to the user as-is.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The draft failed validation; nothing was uploaded or written.
    #[error("Invalid report: {0}")]
    Invalid(#[from] ValidationErrors),
    /// The photo upload failed; the record write was not attempted.
    #[error("Photo upload failed: {0}")]
    PhotoUploadFailed(String),
    /// The record write failed. The photo (if any) is already durable,
    /// so a retry reuses its URL instead of re-uploading.
    #[error("Report write failed: {0}")]
    WriteFailed(String),
}

/// Composes and submits water-quality reports.
///
/// Holds the in-progress draft and the collaborator seams. `submit` is
/// one suspending call with two sequential awaits: the photo upload and
/// the document write, in that order. There is no cancellation
/// contract; a caller that drops the future simply never observes the
/// result.
pub struct ReportComposer {
    auth: Arc<dyn AuthGateway>,
    documents: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
    collection: String,
    draft: ReportDraft,
    photo: Option<PhotoAttachment>,
    // Durable URL from a submit attempt whose write failed afterwards.
    uploaded_photo_url: Option<String>,
}

impl ReportComposer {
    /// Create a new composer with a pristine draft.
    pub fn new(
        auth: Arc<dyn AuthGateway>,
        documents: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            auth,
            documents,
            blobs,
            collection: collection.into(),
            draft: ReportDraft::default(),
            photo: None,
            uploaded_photo_url: None,
        }
    }

    /// The current draft.
    #[must_use]
    pub const fn draft(&self) -> &ReportDraft {
        &self.draft
    }

    /// Mutable access to the current draft.
    pub const fn draft_mut(&mut self) -> &mut ReportDraft {
        &mut self.draft
    }

    /// The currently attached photo, if any.
    #[must_use]
    pub const fn photo(&self) -> Option<&PhotoAttachment> {
        self.photo.as_ref()
    }

    /// Attach a photo, replacing any previous one.
    pub fn attach_photo(&mut self, photo: PhotoAttachment) {
        self.photo = Some(photo);
        self.uploaded_photo_url = None;
    }

    /// Remove the attached photo.
    pub fn clear_photo(&mut self) {
        self.photo = None;
        self.uploaded_photo_url = None;
    }

    /// Validate the current draft without submitting it.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        self.draft.validate()
    }

    /// Submit the current draft.
    ///
    /// Resolves the reporter from the current session (falling back to
    /// [`ANONYMOUS_REPORTER`]), uploads the photo if one is attached,
    /// then appends the report document. On success the draft resets to
    /// defaults and the new document id is returned.
    ///
    /// Not idempotent: after [`SubmitError::WriteFailed`] the photo URL
    /// is kept, and a retry writes a new document referencing it. The
    /// duplicate is accepted, not deduplicated.
    pub async fn submit(&mut self) -> Result<DocumentId, SubmitError> {
        self.draft.validate()?;

        let reporter_id = self
            .auth
            .current_user_id()
            .await
            .unwrap_or_else(|| ANONYMOUS_REPORTER.to_string());

        // Upload strictly before the write; a failed upload
        // short-circuits the submission.
        let image_proof = if let Some(url) = self.uploaded_photo_url.clone() {
            url
        } else if let Some(photo) = &self.photo {
            let key = photo_storage_key(Utc::now().timestamp_millis());
            let blob = self
                .blobs
                .upload(&key, &photo.data, &photo.content_type)
                .await
                .map_err(|e| {
                    tracing::warn!(key = %key, error = %e, "Photo upload failed");
                    SubmitError::PhotoUploadFailed(e.to_string())
                })?;
            self.uploaded_photo_url = Some(blob.url.clone());
            blob.url
        } else {
            String::new()
        };

        let report = ReportDocument {
            user_id: reporter_id.clone(),
            water_source_name: self.draft.source_name.clone(),
            location: self.draft.location.unwrap_or_default(),
            ph: self.draft.ph,
            turbidity: self.draft.turbidity,
            temperature: self.draft.temperature,
            image_proof,
        };

        let document = report
            .into_document()
            .map_err(|e| SubmitError::WriteFailed(e.to_string()))?;
        let document_id = self
            .documents
            .append(&self.collection, document)
            .await
            .map_err(|e| {
                tracing::warn!(collection = %self.collection, error = %e, "Report write failed");
                SubmitError::WriteFailed(e.to_string())
            })?;

        tracing::info!(
            reporter_id = %reporter_id,
            document_id = %document_id,
            "Report submitted"
        );

        self.draft = ReportDraft::default();
        self.photo = None;
        self.uploaded_photo_url = None;
        Ok(document_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_pristine_draft_defaults() {
        let draft = ReportDraft::default();
        assert_eq!(draft.source_name, "");
        assert!(draft.location.is_none());
        assert_eq!(draft.ph, DEFAULT_PH);
        assert_eq!(draft.turbidity, DEFAULT_TURBIDITY);
        assert_eq!(draft.temperature, DEFAULT_TEMPERATURE);
    }

    #[test]
    fn test_validation_requires_source_name() {
        let draft = ReportDraft::default();
        let errors = draft.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("source_name"));
    }

    #[test]
    fn test_validation_rejects_out_of_range_readings() {
        let draft = ReportDraft {
            source_name: "Test Lake".to_string(),
            ph: 15.2,
            ..ReportDraft::default()
        };
        let errors = draft.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("ph"));

        let draft = ReportDraft {
            source_name: "Test Lake".to_string(),
            turbidity: 120.0,
            ..ReportDraft::default()
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_coordinates() {
        let draft = ReportDraft {
            source_name: "Test Lake".to_string(),
            location: Some(GeoPoint::new(95.0, 0.0)),
            ..ReportDraft::default()
        };
        let errors = draft.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("location"));
    }

    #[test]
    fn test_validation_accepts_unset_location() {
        let draft = ReportDraft {
            source_name: "Test Lake".to_string(),
            ..ReportDraft::default()
        };
        assert!(draft.validate().is_ok());
    }
}

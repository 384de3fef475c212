//! Community dashboard feed.

use std::sync::Arc;

use hydrasense_store::{DocumentFilter, DocumentStore, ReportDocument};
use serde::Serialize;

use crate::services::catalog::CatalogError;

/// Safety classification derived from a report's pH reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyStatus {
    /// Reading inside the safe pH band.
    Safe,
    /// Reading outside the safe pH band.
    Polluted,
}

/// pH band considered safe.
const SAFE_PH_MIN: f64 = 6.5;
const SAFE_PH_MAX: f64 = 8.5;

/// Classify a pH reading.
#[must_use]
pub fn classify(ph: f64) -> SafetyStatus {
    if (SAFE_PH_MIN..=SAFE_PH_MAX).contains(&ph) {
        SafetyStatus::Safe
    } else {
        SafetyStatus::Polluted
    }
}

/// One dashboard feed entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedEntry {
    /// Display name of the water body.
    pub source_name: String,
    /// pH reading.
    pub ph: f64,
    /// Derived safety classification.
    pub safety: SafetyStatus,
}

impl From<ReportDocument> for FeedEntry {
    fn from(report: ReportDocument) -> Self {
        Self {
            safety: classify(report.ph),
            source_name: report.water_source_name,
            ph: report.ph,
        }
    }
}

/// Fetches recent reports across all reporters for the dashboard.
pub struct CommunityFeed {
    documents: Arc<dyn DocumentStore>,
    collection: String,
}

impl CommunityFeed {
    /// Create a feed reading from the given reports collection.
    pub fn new(documents: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            documents,
            collection: collection.into(),
        }
    }

    /// The newest `limit` reports, newest first.
    ///
    /// The collection is append-only, so the newest documents sit at
    /// the tail of the arrival order. Documents that fail to parse are
    /// skipped rather than failing the whole feed.
    pub async fn recent(&self, limit: usize) -> Result<Vec<FeedEntry>, CatalogError> {
        let documents = self
            .documents
            .query_all(&self.collection, &DocumentFilter::All)
            .await
            .map_err(|e| {
                tracing::warn!(collection = %self.collection, error = %e, "Feed load failed");
                CatalogError::LoadFailed(e.to_string())
            })?;

        let entries: Vec<FeedEntry> = documents
            .iter()
            .rev()
            .filter_map(|(id, document)| match ReportDocument::from_document(document) {
                Ok(report) => Some(FeedEntry::from(report)),
                Err(e) => {
                    tracing::warn!(document_id = %id, error = %e, "Skipping malformed report");
                    None
                }
            })
            .take(limit)
            .collect();

        Ok(entries)
    }
}

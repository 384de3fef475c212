//! Report history catalog.

use std::sync::Arc;

use hydrasense_store::{DocumentFilter, DocumentStore, ReportHistoryEntry, ReportStatus};
use serde::Serialize;
use thiserror::Error;

/// Status filter for the history view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Identity filter: every loaded entry.
    #[default]
    All,
    /// Entries awaiting review.
    Pending,
    /// Approved entries.
    Approved,
    /// Rejected entries.
    Rejected,
}

impl StatusFilter {
    /// The filters in display order.
    pub const CHIPS: [Self; 4] = [Self::All, Self::Pending, Self::Approved, Self::Rejected];

    /// Whether an entry with the given status passes this filter.
    #[must_use]
    pub fn matches(self, status: ReportStatus) -> bool {
        match self {
            Self::All => true,
            Self::Pending => status == ReportStatus::Pending,
            Self::Approved => status == ReportStatus::Approved,
            Self::Rejected => status == ReportStatus::Rejected,
        }
    }
}

/// Counts by status over the full loaded set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SummaryCounts {
    /// All loaded entries.
    pub total: usize,
    /// Approved entries.
    pub approved: usize,
    /// Pending entries.
    pub pending: usize,
    /// Rejected entries.
    pub rejected: usize,
}

/// History load failure.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The fetch failed; the previously loaded set is unchanged and the
    /// caller may retry.
    #[error("Failed to load report history: {0}")]
    LoadFailed(String),
}

/// Presents a reporter's submitted-report history.
///
/// `load` replaces the in-memory set; `filter` and the count
/// derivations are pure views over it and can be re-derived at any
/// time.
pub struct ReportCatalog {
    documents: Arc<dyn DocumentStore>,
    collection: String,
    loaded: Vec<ReportHistoryEntry>,
}

impl ReportCatalog {
    /// Create a catalog reading from the given history collection.
    pub fn new(documents: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            documents,
            collection: collection.into(),
            loaded: Vec::new(),
        }
    }

    /// Fetch all history entries for a reporter, in arrival order.
    ///
    /// One suspending fetch, no pagination. On failure the previously
    /// loaded set is kept so the caller can retry or keep rendering
    /// stale entries.
    pub async fn load(
        &mut self,
        reporter_id: &str,
    ) -> Result<&[ReportHistoryEntry], CatalogError> {
        let filter = DocumentFilter::ByReporter(reporter_id.to_string());
        let documents = self
            .documents
            .query_all(&self.collection, &filter)
            .await
            .map_err(|e| {
                tracing::warn!(
                    collection = %self.collection,
                    reporter_id = %reporter_id,
                    error = %e,
                    "History load failed"
                );
                CatalogError::LoadFailed(e.to_string())
            })?;

        let mut entries = Vec::with_capacity(documents.len());
        for (id, document) in documents {
            let entry = ReportHistoryEntry::from_document(id, &document)
                .map_err(|e| CatalogError::LoadFailed(e.to_string()))?;
            entries.push(entry);
        }

        self.loaded = entries;
        Ok(&self.loaded)
    }

    /// The full loaded set in load order.
    #[must_use]
    pub fn entries(&self) -> &[ReportHistoryEntry] {
        &self.loaded
    }

    /// Entries passing the given filter, in load order.
    #[must_use]
    pub fn filter(&self, filter: StatusFilter) -> Vec<&ReportHistoryEntry> {
        self.loaded
            .iter()
            .filter(|entry| filter.matches(entry.status))
            .collect()
    }

    /// Counts by status over the full loaded set, independent of any
    /// active filter.
    #[must_use]
    pub fn summary_counts(&self) -> SummaryCounts {
        let mut counts = SummaryCounts {
            total: self.loaded.len(),
            ..SummaryCounts::default()
        };
        for entry in &self.loaded {
            match entry.status {
                ReportStatus::Approved => counts.approved += 1,
                ReportStatus::Pending => counts.pending += 1,
                ReportStatus::Rejected => counts.rejected += 1,
            }
        }
        counts
    }

    /// Per-chip entry counts in display order.
    #[must_use]
    pub fn filter_counts(&self) -> [(StatusFilter, usize); 4] {
        StatusFilter::CHIPS.map(|chip| {
            let count = self
                .loaded
                .iter()
                .filter(|entry| chip.matches(entry.status))
                .count();
            (chip, count)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hydrasense_store::DocumentId;

    fn entry(id: &str, status: ReportStatus) -> ReportHistoryEntry {
        ReportHistoryEntry {
            id: DocumentId::from(id),
            source_name: format!("Source {id}"),
            location_address: "New York, NY".to_string(),
            ph: 7.2,
            turbidity: 3.0,
            temperature: 18.0,
            submitted_at: Utc.with_ymd_and_hms(2024, 1, 15, 16, 0, 0).unwrap(),
            reviewed_at: (status != ReportStatus::Pending)
                .then(|| Utc.with_ymd_and_hms(2024, 1, 15, 19, 50, 0).unwrap()),
            status,
            review_comments: (status != ReportStatus::Pending)
                .then(|| "Report verified.".to_string()),
        }
    }

    fn catalog_with(entries: Vec<ReportHistoryEntry>) -> ReportCatalog {
        let documents = Arc::new(hydrasense_store::test_utils::InMemoryDocumentStore::new());
        let mut catalog = ReportCatalog::new(documents, "ReportReviews");
        catalog.loaded = entries;
        catalog
    }

    #[test]
    fn test_filter_all_is_identity() {
        let catalog = catalog_with(vec![
            entry("a", ReportStatus::Approved),
            entry("b", ReportStatus::Pending),
            entry("c", ReportStatus::Rejected),
        ]);

        let all = catalog.filter(StatusFilter::All);
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, "a");
        assert_eq!(all[2].id, "c");
    }

    #[test]
    fn test_filters_partition_the_loaded_set() {
        let catalog = catalog_with(vec![
            entry("a", ReportStatus::Approved),
            entry("b", ReportStatus::Approved),
            entry("c", ReportStatus::Pending),
            entry("d", ReportStatus::Rejected),
        ]);

        let partitioned: usize = [
            StatusFilter::Pending,
            StatusFilter::Approved,
            StatusFilter::Rejected,
        ]
        .iter()
        .map(|&f| catalog.filter(f).len())
        .sum();
        assert_eq!(partitioned, catalog.entries().len());

        for filter in [
            StatusFilter::Pending,
            StatusFilter::Approved,
            StatusFilter::Rejected,
        ] {
            assert!(
                catalog
                    .filter(filter)
                    .iter()
                    .all(|entry| filter.matches(entry.status))
            );
        }
    }

    #[test]
    fn test_summary_counts_scenario() {
        let catalog = catalog_with(vec![
            entry("a", ReportStatus::Approved),
            entry("b", ReportStatus::Approved),
            entry("c", ReportStatus::Pending),
            entry("d", ReportStatus::Rejected),
        ]);

        let counts = catalog.summary_counts();
        assert_eq!(counts.total, 4);
        assert_eq!(counts.approved, 2);
        assert_eq!(counts.pending, 1);
        assert_eq!(counts.rejected, 1);
        assert_eq!(
            counts.approved + counts.pending + counts.rejected,
            counts.total
        );

        let approved = catalog.filter(StatusFilter::Approved);
        assert_eq!(approved.len(), 2);
        // Relative order from the loaded set is preserved.
        assert_eq!(approved[0].id, "a");
        assert_eq!(approved[1].id, "b");
    }

    #[test]
    fn test_filter_counts_in_chip_order() {
        let catalog = catalog_with(vec![
            entry("a", ReportStatus::Approved),
            entry("b", ReportStatus::Pending),
        ]);

        let counts = catalog.filter_counts();
        assert_eq!(counts[0], (StatusFilter::All, 2));
        assert_eq!(counts[1], (StatusFilter::Pending, 1));
        assert_eq!(counts[2], (StatusFilter::Approved, 1));
        assert_eq!(counts[3], (StatusFilter::Rejected, 0));
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = catalog_with(Vec::new());
        assert_eq!(catalog.summary_counts(), SummaryCounts::default());
        assert!(catalog.filter(StatusFilter::All).is_empty());
    }
}

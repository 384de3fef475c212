//! Document store collaborator seam.
//!
//! The backend stores schemaless JSON documents in named collections.
//! The client only ever appends new documents and reads collections
//! back; updates and deletes are server-side concerns.

use hydrasense_common::AppResult;
use serde_json::{Map, Value};

/// Backend-assigned document identifier.
pub type DocumentId = String;

/// A schemaless document as the backend stores it.
pub type Document = Map<String, Value>;

/// Wire field that identifies the submitting user on report documents.
pub const REPORTER_FIELD: &str = "UserId";

/// Filter for [`DocumentStore::query_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DocumentFilter {
    /// Every document in the collection.
    #[default]
    All,
    /// Documents whose reporter field equals the given user id.
    ByReporter(String),
}

impl DocumentFilter {
    /// Whether a document matches this filter.
    #[must_use]
    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Self::All => true,
            Self::ByReporter(reporter_id) => document
                .get(REPORTER_FIELD)
                .and_then(Value::as_str)
                .is_some_and(|id| id == reporter_id),
        }
    }
}

/// Document store backend trait.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Append a new document to a collection and return its id.
    async fn append(&self, collection: &str, document: Document) -> AppResult<DocumentId>;

    /// Fetch all matching documents from a collection in arrival order.
    async fn query_all(
        &self,
        collection: &str,
        filter: &DocumentFilter,
    ) -> AppResult<Vec<(DocumentId, Document)>>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn document_for(user: &str) -> Document {
        let mut document = Document::new();
        document.insert(
            REPORTER_FIELD.to_string(),
            Value::String(user.to_string()),
        );
        document
    }

    #[test]
    fn test_filter_matches() {
        let document = document_for("user1");

        assert!(DocumentFilter::All.matches(&document));
        assert!(DocumentFilter::ByReporter("user1".to_string()).matches(&document));
        assert!(!DocumentFilter::ByReporter("user2".to_string()).matches(&document));
    }

    #[test]
    fn test_filter_rejects_missing_reporter_field() {
        let document = Document::new();
        assert!(!DocumentFilter::ByReporter("user1".to_string()).matches(&document));
    }
}

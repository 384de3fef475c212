//! Remote collaborator seams for hydrasense.
//!
//! The backend is a hosted platform the client talks to through three
//! narrow seams, each a trait with a reqwest-backed implementation:
//!
//! - [`DocumentStore`]: append-only collections of schemaless JSON
//!   documents ([`RestDocumentStore`])
//! - [`AuthGateway`]: email/password sessions ([`RestAuthGateway`])
//! - wire-level entities pinning the document field names
//!
//! In-memory fakes for every seam live in [`test_utils`] behind the
//! `test-utils` feature.

pub mod auth;
pub mod documents;
pub mod entities;
pub mod remote;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use auth::{AuthGateway, Credentials, RestAuthGateway, Session};
pub use documents::{Document, DocumentFilter, DocumentId, DocumentStore, REPORTER_FIELD};
pub use entities::{GeoPoint, ReportDocument, ReportHistoryEntry, ReportStatus};
pub use remote::RestDocumentStore;

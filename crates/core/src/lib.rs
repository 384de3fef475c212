//! Core business logic for hydrasense.
//!
//! Wires the collaborator seams from `hydrasense-store` into the
//! client workflows:
//!
//! - [`ReportComposer`]: draft state, validation, and the two-phase
//!   submit (photo upload, then document write)
//! - [`ReportCatalog`]: a reporter's history with status filtering and
//!   summary counts
//! - [`CommunityFeed`]: recent reports across all reporters with a
//!   derived safety classification
//! - [`AccountService`]: email/password session flows

pub mod services;

pub use services::*;

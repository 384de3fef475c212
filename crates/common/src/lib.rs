//! Common utilities and shared types for hydrasense.
//!
//! This crate provides foundational components used across all hydrasense
//! crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Storage**: Blob storage backends (local, HTTP) for report photos
//!
//! # Example
//!
//! ```no_run
//! use hydrasense_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod storage;

pub use config::{AuthConfig, BackendConfig, Config};
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use storage::{
    BlobStore, HttpStorage, LocalStorage, StorageConfig, UploadedBlob, photo_storage_key,
};

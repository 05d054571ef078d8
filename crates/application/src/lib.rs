//! Application layer of the catalog.
//!
//! - [`ApplicationService`] wraps every write in one unit of work and
//!   dispatches events only after it commits
//! - [`Storage`] abstracts blob storage for uploaded media
//! - [`use_cases`] holds the catalog operations

pub mod error;
pub mod service;
pub mod storage;
pub mod use_cases;

pub use error::{ApplicationError, Result};
pub use service::ApplicationService;
pub use storage::{InMemoryStorage, Storage, StorageError, StoreFile, StoredFile};

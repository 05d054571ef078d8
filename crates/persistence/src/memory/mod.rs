//! In-memory storage backend.

mod repository;
mod transaction;
mod unit_of_work;

pub use repository::InMemoryRepository;
pub use transaction::InMemoryTransaction;
pub use unit_of_work::InMemoryUnitOfWork;

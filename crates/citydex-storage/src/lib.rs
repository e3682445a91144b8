pub mod memory;
pub mod sqlite;

pub use citydex_core::repository::{ReadRepository, Repository, Result};
pub use citydex_core::StorageError;
pub use memory::InMemoryRepository;
pub use sqlite::SqliteRepository;

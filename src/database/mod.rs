pub mod help_request;
pub mod manager;
pub mod memory;
pub mod repository;
pub mod store;

pub use help_request::HelpRequestRepository;
pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryRepository;
pub use repository::{PgQueryAs, PgRepository, Repository};
pub use store::Store;

pub mod store;
pub use store::{DocumentStore, UserFilter, UserStore};
pub mod user_repo;
pub use user_repo::UserRepository;
pub mod document_repo;
pub use document_repo::DocumentRepository;
pub mod memory;
pub use memory::{MemoryDocumentStore, MemoryUserStore};

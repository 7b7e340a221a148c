pub mod blob;
pub mod fs;
pub mod memory;

pub use blob::{BlobError, BlobStore};
pub use fs::FsBlobStore;
pub use memory::MemoryBlobStore;

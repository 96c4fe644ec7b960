#![forbid(unsafe_code)]

pub mod fs;
pub mod repository;

pub use repository::{DatasetSource, InMemoryRepository, ProgressStore, Storage, StorageError};

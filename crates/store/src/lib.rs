//! Content store layer for agora.
//!
//! The feed keeps every item in one document collection owned by a managed
//! store. This crate holds the document model ([`entities`]), the narrow
//! gateway the engine talks to the store through ([`gateway`]), an in-memory
//! gateway implementation for tests and local development ([`memory`]), and
//! the repository that wraps every mutation in the read-transform-write
//! protocol ([`repositories`]).

pub mod entities;
pub mod gateway;
pub mod memory;
pub mod repositories;

pub use gateway::{ContentStore, PutOutcome, Version, Versioned};
pub use memory::MemoryContentStore;
pub use repositories::ContentItemRepository;

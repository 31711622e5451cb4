//! Persistence gateway
//!
//! The namespace is an opaque asynchronous key-value store; every write is a
//! full-value overwrite of one key. Two implementations are provided: a JSON
//! file on disk and an in-memory map with failure injection for tests.

mod file;
mod gateway;
mod memory;

pub use file::FileGateway;
pub use gateway::{Namespace, PersistenceGateway};
pub use memory::MemoryGateway;

//! Storage abstraction and implementations for Vocal Boost.
//!
//! This crate provides a trait-based storage interface with an in-memory
//! backend and a JSON-file backend, plus the built-in course fixtures.

#![warn(missing_docs)]

pub mod trait_;
pub mod memory;
pub mod json_storage;
pub mod fixtures;

pub use trait_::{Storage, StorageError, Result};
pub use memory::MemoryStorage;
pub use json_storage::JsonStorage;

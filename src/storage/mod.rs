//! Storage implementations of the CRUD data-access traits

pub mod in_memory;

pub use in_memory::{IdGenerator, InMemoryCrudStore, SequentialIds};

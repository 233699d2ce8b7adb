//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define data access contracts for jokes.
//! - Isolate SQLite query details from the store and view layers.
//!
//! # Invariants
//! - Repository writes enforce `Joke::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod joke_repo;

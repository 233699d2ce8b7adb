//! Domain model for jokes and their ratings.
//!
//! # Responsibility
//! - Define canonical data structures used by store and view state.
//! - Own the rating label set and the rating-to-glyph table.
//!
//! # Invariants
//! - Every joke is identified by a stable `JokeId`, never by its text.

pub mod joke;
pub mod rating;

//! Core domain logic for the DadJokes app.
//! This crate is the single source of truth for joke storage and view state;
//! the mobile shell only renders what it exposes.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;
pub mod ui;

pub use logging::{
    default_log_level, init_logging, logging_status, LogLevel, LoggingError, LoggingStatus,
};
pub use model::joke::{Joke, JokeId, JokeValidationError};
pub use model::rating::{rating_glyph, Rating};
pub use repo::joke_repo::{
    JokeListQuery, JokeRepository, JokeSort, RepoError, RepoResult, SqliteJokeRepository,
};
pub use store::{JokeStore, StoreEvent, StoreResult, StoreSubscription};
pub use ui::add_form::{AddForm, SubmitOutcome};
pub use ui::card::{CardPhase, DragOffset, DragOutcome, JokeCard, PunchlineStyle};
pub use ui::deferred::{DeferredQueue, TaskId};
pub use ui::gallery::GalleryView;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

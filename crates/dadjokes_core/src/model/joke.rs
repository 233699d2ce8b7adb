//! Joke domain model.
//!
//! # Responsibility
//! - Define the persisted two-part joke record.
//! - Validate required text fields before persistence.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another joke.
//! - `setup` and `punchline` are non-empty for every persisted joke.
//! - Jokes are immutable once stored; there is no edit-in-place path.

use crate::model::rating::Rating;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for every joke.
///
/// Used for list identity, card identity and deletion. Two jokes with the
/// same setup text remain distinguishable through it.
pub type JokeId = Uuid;

/// Persisted two-part joke with a reaction rating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Joke {
    pub uuid: JokeId,
    /// First line, shown on the card face. Also the sort key.
    pub setup: String,
    /// Hidden until the card is tapped.
    pub punchline: String,
    pub rating: Rating,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Validation errors for required joke fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JokeValidationError {
    EmptySetup,
    EmptyPunchline,
}

impl Display for JokeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySetup => write!(f, "setup must not be empty"),
            Self::EmptyPunchline => write!(f, "punchline must not be empty"),
        }
    }
}

impl Error for JokeValidationError {}

impl Joke {
    /// Creates a new joke with a generated stable ID and current timestamp.
    pub fn new(setup: impl Into<String>, punchline: impl Into<String>, rating: Rating) -> Self {
        Self::with_id(Uuid::new_v4(), setup, punchline, rating)
    }

    /// Creates a joke with a caller-provided ID.
    ///
    /// This constructor does not validate text fields.
    pub fn with_id(
        uuid: JokeId,
        setup: impl Into<String>,
        punchline: impl Into<String>,
        rating: Rating,
    ) -> Self {
        Self {
            uuid,
            setup: setup.into(),
            punchline: punchline.into(),
            rating,
            created_at: now_epoch_ms(),
        }
    }

    /// Checks required fields. Whitespace-only text counts as present.
    pub fn validate(&self) -> Result<(), JokeValidationError> {
        if self.setup.is_empty() {
            return Err(JokeValidationError::EmptySetup);
        }
        if self.punchline.is_empty() {
            return Err(JokeValidationError::EmptyPunchline);
        }
        Ok(())
    }

    /// Display glyph for this joke's rating.
    pub fn glyph(&self) -> &'static str {
        self.rating.glyph()
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

//! Reaction ratings and their display glyphs.
//!
//! # Invariants
//! - Labels are case-sensitive and match the persisted `jokes.rating` values.
//! - `rating_glyph` is total: unknown labels map to the neutral glyph.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

const GLYPH_SOB: &str = "😭";
const GLYPH_SIGH: &str = "😔";
const GLYPH_SMIRK: &str = "😏";
const GLYPH_NEUTRAL: &str = "😐";

/// How the audience reacted to a joke.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rating {
    Sob,
    Sigh,
    #[default]
    Silence,
    Smirk,
}

impl Rating {
    /// All ratings in the order the add form offers them.
    pub const ALL: [Rating; 4] = [Rating::Sob, Rating::Sigh, Rating::Silence, Rating::Smirk];

    pub fn label(self) -> &'static str {
        match self {
            Self::Sob => "Sob",
            Self::Sigh => "Sigh",
            Self::Silence => "Silence",
            Self::Smirk => "Smirk",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Sob" => Some(Self::Sob),
            "Sigh" => Some(Self::Sigh),
            "Silence" => Some(Self::Silence),
            "Smirk" => Some(Self::Smirk),
            _ => None,
        }
    }

    pub fn glyph(self) -> &'static str {
        rating_glyph(self.label())
    }
}

impl Display for Rating {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Maps a rating label to its display glyph.
///
/// `Silence`, empty and unrecognized labels all fall back to 😐.
pub fn rating_glyph(label: &str) -> &'static str {
    match label {
        "Sob" => GLYPH_SOB,
        "Sigh" => GLYPH_SIGH,
        "Smirk" => GLYPH_SMIRK,
        _ => GLYPH_NEUTRAL,
    }
}

//! Flutter-facing bridge for the DadJokes core.

pub mod api;

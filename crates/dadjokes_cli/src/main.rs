//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `dadjokes_core` linkage.
//! - Optionally print the jokes stored in a database file, setup-ascending.

use dadjokes_core::{JokeSort, JokeStore};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("dadjokes_core ping={}", dadjokes_core::ping());
    println!("dadjokes_core version={}", dadjokes_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    let listing = JokeStore::open(&db_path).and_then(|store| store.query(JokeSort::SetupAscending));
    let jokes = match listing {
        Ok(jokes) => jokes,
        Err(err) => {
            eprintln!("failed to read `{db_path}`: {err}");
            return ExitCode::FAILURE;
        }
    };

    println!("jokes={}", jokes.len());
    for joke in jokes {
        println!("{} {} / {}", joke.glyph(), joke.setup, joke.punchline);
    }
    ExitCode::SUCCESS
}

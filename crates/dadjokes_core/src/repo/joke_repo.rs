//! Joke repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/read/delete APIs over the `jokes` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Joke::validate()` before SQL mutations.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Deletion is a hard delete; there is no tombstone.

use crate::db::DbError;
use crate::model::joke::{Joke, JokeId, JokeValidationError};
use crate::model::rating::Rating;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const JOKE_SELECT_SQL: &str = "SELECT
    uuid,
    setup,
    punchline,
    rating,
    created_at
FROM jokes";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for joke persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(JokeValidationError),
    Db(DbError),
    NotFound(JokeId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "joke not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted joke data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<JokeValidationError> for RepoError {
    fn from(value: JokeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Sort order for joke listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JokeSort {
    /// Lexicographic by setup, ties broken by id.
    #[default]
    SetupAscending,
    SetupDescending,
}

/// Query options for listing jokes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JokeListQuery {
    pub sort: JokeSort,
}

/// Repository interface for joke persistence.
pub trait JokeRepository {
    fn create_joke(&self, joke: &Joke) -> RepoResult<JokeId>;
    fn get_joke(&self, id: JokeId) -> RepoResult<Option<Joke>>;
    fn list_jokes(&self, query: &JokeListQuery) -> RepoResult<Vec<Joke>>;
    /// Removes one joke. Returns `NotFound` when no row matched.
    fn delete_joke(&self, id: JokeId) -> RepoResult<()>;
    fn count_jokes(&self) -> RepoResult<u64>;
}

/// SQLite-backed joke repository.
pub struct SqliteJokeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteJokeRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_jokes_table(conn)?;
        Ok(Self { conn })
    }
}

impl JokeRepository for SqliteJokeRepository<'_> {
    fn create_joke(&self, joke: &Joke) -> RepoResult<JokeId> {
        joke.validate()?;

        self.conn.execute(
            "INSERT INTO jokes (
                uuid,
                setup,
                punchline,
                rating,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                joke.uuid.to_string(),
                joke.setup.as_str(),
                joke.punchline.as_str(),
                joke.rating.label(),
                joke.created_at,
            ],
        )?;

        Ok(joke.uuid)
    }

    fn get_joke(&self, id: JokeId) -> RepoResult<Option<Joke>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{JOKE_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_joke_row(row)?));
        }

        Ok(None)
    }

    fn list_jokes(&self, query: &JokeListQuery) -> RepoResult<Vec<Joke>> {
        let order = match query.sort {
            JokeSort::SetupAscending => "setup ASC, uuid ASC",
            JokeSort::SetupDescending => "setup DESC, uuid ASC",
        };
        let mut stmt = self
            .conn
            .prepare(&format!("{JOKE_SELECT_SQL} ORDER BY {order};"))?;
        let mut rows = stmt.query([])?;
        let mut jokes = Vec::new();

        while let Some(row) = rows.next()? {
            jokes.push(parse_joke_row(row)?);
        }

        Ok(jokes)
    }

    fn delete_joke(&self, id: JokeId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM jokes WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn count_jokes(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM jokes;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative joke count `{count}`")))
    }
}

fn ensure_jokes_table(conn: &Connection) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'jokes'
        );",
        [],
        |row| row.get(0),
    )?;
    if exists == 0 {
        return Err(RepoError::InvalidData(
            "jokes table is missing; open the connection through db::open_db".to_string(),
        ));
    }
    Ok(())
}

fn parse_joke_row(row: &Row<'_>) -> RepoResult<Joke> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in jokes.uuid"))
    })?;

    let rating_text: String = row.get("rating")?;
    let rating = Rating::from_label(&rating_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid rating `{rating_text}` in jokes.rating"))
    })?;

    let joke = Joke {
        uuid,
        setup: row.get("setup")?,
        punchline: row.get("punchline")?,
        rating,
        created_at: row.get("created_at")?,
    };
    joke.validate()?;
    Ok(joke)
}

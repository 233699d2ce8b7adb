//! Joke store use-cases.
//!
//! # Responsibility
//! - Validate and persist new jokes, delete jokes, run sorted queries.
//! - Log every mutation outcome as a metadata-only event.
//!
//! # Invariants
//! - Validation failures are silent no-ops (`Ok(None)`), never errors.
//! - Persistence failures are logged here, then returned to the caller.
//! - Joke text never reaches the log.

use crate::db::{open_db, open_db_in_memory};
use crate::model::joke::{Joke, JokeId};
use crate::model::rating::Rating;
use crate::repo::joke_repo::{
    JokeListQuery, JokeRepository, JokeSort, RepoError, RepoResult, SqliteJokeRepository,
};
use crate::store::subscription::{StoreEvent, StoreSubscription, Subscribers};
use log::{debug, error, info};
use rusqlite::Connection;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::mpsc;

pub type StoreResult<T> = RepoResult<T>;

/// Local persistent collection of jokes.
pub struct JokeStore {
    conn: Connection,
    subscribers: RefCell<Subscribers>,
}

impl JokeStore {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection) -> StoreResult<Self> {
        SqliteJokeRepository::try_new(&conn)?;
        Ok(Self {
            conn,
            subscribers: RefCell::new(Subscribers::default()),
        })
    }

    /// Opens (or creates) the store file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::new(open_db(path)?)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::new(open_db_in_memory()?)
    }

    /// Registers a new change listener.
    pub fn subscribe(&self) -> StoreSubscription {
        let (tx, rx) = mpsc::channel();
        self.subscribers.borrow_mut().push(tx);
        StoreSubscription::new(rx)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Returns every stored joke in the requested order.
    pub fn query(&self, sort: JokeSort) -> StoreResult<Vec<Joke>> {
        self.repo()?.list_jokes(&JokeListQuery { sort })
    }

    pub fn get(&self, id: JokeId) -> StoreResult<Option<Joke>> {
        self.repo()?.get_joke(id)
    }

    pub fn count(&self) -> StoreResult<u64> {
        self.repo()?.count_jokes()
    }

    /// Creates and commits a new joke.
    ///
    /// # Contract
    /// - Returns `Ok(None)` without writing when setup, punchline or rating
    ///   is empty, or when `rating` is not a known label.
    /// - Returns the stored joke on success and notifies subscribers.
    pub fn add(&self, setup: &str, punchline: &str, rating: &str) -> StoreResult<Option<Joke>> {
        if setup.is_empty() || punchline.is_empty() || rating.is_empty() {
            debug!("event=joke_add module=store status=rejected reason=empty_field");
            return Ok(None);
        }
        let Some(rating) = Rating::from_label(rating) else {
            debug!("event=joke_add module=store status=rejected reason=unknown_rating");
            return Ok(None);
        };

        let joke = Joke::new(setup, punchline, rating);
        match self.repo().and_then(|repo| repo.create_joke(&joke)) {
            Ok(id) => {
                info!("event=joke_add module=store status=ok joke_id={id} rating={rating}");
                self.publish(StoreEvent::Added(id));
                Ok(Some(joke))
            }
            Err(err) => {
                error!("event=joke_add module=store status=error error={err}");
                Err(err)
            }
        }
    }

    /// Deletes one joke and commits.
    ///
    /// Returns `Ok(false)` when the joke was already gone.
    pub fn remove(&self, id: JokeId) -> StoreResult<bool> {
        match self.repo().and_then(|repo| repo.delete_joke(id)) {
            Ok(()) => {
                info!("event=joke_remove module=store status=ok joke_id={id}");
                self.publish(StoreEvent::Removed(id));
                Ok(true)
            }
            Err(RepoError::NotFound(_)) => {
                debug!("event=joke_remove module=store status=missing joke_id={id}");
                Ok(false)
            }
            Err(err) => {
                error!("event=joke_remove module=store status=error joke_id={id} error={err}");
                Err(err)
            }
        }
    }

    /// Deletes the jokes at `offsets` of the setup-ascending listing.
    ///
    /// All deletions commit together. Out-of-range offsets are ignored.
    /// Returns the number of jokes removed.
    pub fn remove_at(&self, offsets: &[usize]) -> StoreResult<usize> {
        match self.remove_at_inner(offsets) {
            Ok(removed) => {
                info!(
                    "event=joke_remove_at module=store status=ok requested={} removed={}",
                    offsets.len(),
                    removed.len()
                );
                for id in &removed {
                    self.publish(StoreEvent::Removed(*id));
                }
                Ok(removed.len())
            }
            Err(err) => {
                error!("event=joke_remove_at module=store status=error error={err}");
                Err(err)
            }
        }
    }

    fn remove_at_inner(&self, offsets: &[usize]) -> StoreResult<Vec<JokeId>> {
        let offsets = offsets.iter().copied().collect::<BTreeSet<_>>();
        let tx = self.conn.unchecked_transaction()?;
        let removed = {
            let repo = SqliteJokeRepository::try_new(&tx)?;
            let targets = repo
                .list_jokes(&JokeListQuery::default())?
                .into_iter()
                .enumerate()
                .filter(|(index, _)| offsets.contains(index))
                .map(|(_, joke)| joke.uuid)
                .collect::<Vec<_>>();
            for id in &targets {
                repo.delete_joke(*id)?;
            }
            targets
        };
        tx.commit()?;
        Ok(removed)
    }

    fn repo(&self) -> StoreResult<SqliteJokeRepository<'_>> {
        SqliteJokeRepository::try_new(&self.conn)
    }

    fn publish(&self, event: StoreEvent) {
        self.subscribers.borrow_mut().publish(event);
    }
}

#[cfg(test)]
mod tests {
    use super::JokeStore;
    use crate::repo::joke_repo::JokeSort;
    use crate::store::StoreEvent;

    #[test]
    fn subscribers_receive_events_in_commit_order() {
        let store = JokeStore::open_in_memory().unwrap();
        let subscription = store.subscribe();

        let joke = store.add("setup", "punchline", "Sob").unwrap().unwrap();
        assert!(store.remove(joke.uuid).unwrap());

        assert_eq!(
            subscription.drain(),
            vec![StoreEvent::Added(joke.uuid), StoreEvent::Removed(joke.uuid)]
        );
        assert_eq!(subscription.try_next(), None);
    }

    #[test]
    fn rejected_add_publishes_nothing() {
        let store = JokeStore::open_in_memory().unwrap();
        let subscription = store.subscribe();

        assert!(store.add("", "punchline", "Sob").unwrap().is_none());
        assert!(store.add("setup", "punchline", "Giggle").unwrap().is_none());
        assert!(subscription.drain().is_empty());
    }

    #[test]
    fn dropped_subscription_is_pruned_on_publish() {
        let store = JokeStore::open_in_memory().unwrap();
        let kept = store.subscribe();
        drop(store.subscribe());
        assert_eq!(store.subscriber_count(), 2);

        store.add("setup", "punchline", "Sigh").unwrap();
        assert_eq!(store.subscriber_count(), 1);
        assert_eq!(kept.drain().len(), 1);
    }

    #[test]
    fn remove_missing_returns_false_without_event() {
        let store = JokeStore::open_in_memory().unwrap();
        let joke = store.add("setup", "punchline", "Sob").unwrap().unwrap();
        store.remove(joke.uuid).unwrap();

        let subscription = store.subscribe();
        assert!(!store.remove(joke.uuid).unwrap());
        assert!(subscription.drain().is_empty());
        assert!(store.query(JokeSort::SetupAscending).unwrap().is_empty());
    }
}

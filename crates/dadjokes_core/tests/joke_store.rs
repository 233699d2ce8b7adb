use dadjokes_core::db::open_db_in_memory;
use dadjokes_core::{
    Joke, JokeRepository, JokeSort, JokeStore, Rating, RepoError, SqliteJokeRepository,
};
use rusqlite::Connection;

fn setups(store: &JokeStore) -> Vec<String> {
    store
        .query(JokeSort::SetupAscending)
        .unwrap()
        .into_iter()
        .map(|joke| joke.setup)
        .collect()
}

#[test]
fn add_with_empty_fields_leaves_count_unchanged() {
    let store = JokeStore::open_in_memory().unwrap();
    store.add("existing", "joke", "Sob").unwrap();

    assert!(store.add("", "punchline", "Sob").unwrap().is_none());
    assert!(store.add("setup", "", "Sob").unwrap().is_none());
    assert!(store.add("", "", "Sob").unwrap().is_none());
    assert!(store.add("setup", "punchline", "").unwrap().is_none());

    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn add_increments_count_and_query_sorts_by_setup() {
    let store = JokeStore::open_in_memory().unwrap();

    store.add("B", "x", "Sob").unwrap().unwrap();
    assert_eq!(store.count().unwrap(), 1);
    store.add("A", "y", "Sigh").unwrap().unwrap();
    assert_eq!(store.count().unwrap(), 2);

    assert_eq!(setups(&store), vec!["A", "B"]);
}

#[test]
fn ordering_is_lexicographic_not_case_folded() {
    let store = JokeStore::open_in_memory().unwrap();
    for setup in ["banana", "Apple", "apple", "Banana"] {
        store.add(setup, "p", "Silence").unwrap();
    }

    assert_eq!(setups(&store), vec!["Apple", "Banana", "apple", "banana"]);
    let descending = store
        .query(JokeSort::SetupDescending)
        .unwrap()
        .into_iter()
        .map(|joke| joke.setup)
        .collect::<Vec<_>>();
    assert_eq!(descending, vec!["banana", "apple", "Banana", "Apple"]);
}

#[test]
fn duplicate_setups_remain_distinct_jokes() {
    let store = JokeStore::open_in_memory().unwrap();
    let first = store.add("Same", "one", "Sob").unwrap().unwrap();
    let second = store.add("Same", "two", "Smirk").unwrap().unwrap();
    assert_ne!(first.uuid, second.uuid);

    assert!(store.remove(first.uuid).unwrap());

    let remaining = store.query(JokeSort::SetupAscending).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].uuid, second.uuid);
    assert_eq!(remaining[0].punchline, "two");
}

#[test]
fn remove_decrements_count_and_hides_joke() {
    let store = JokeStore::open_in_memory().unwrap();
    let keep = store.add("keep", "p", "Sob").unwrap().unwrap();
    let gone = store.add("gone", "p", "Sigh").unwrap().unwrap();

    assert!(store.remove(gone.uuid).unwrap());

    assert_eq!(store.count().unwrap(), 1);
    assert!(store.get(gone.uuid).unwrap().is_none());
    let ids = store
        .query(JokeSort::SetupAscending)
        .unwrap()
        .into_iter()
        .map(|joke| joke.uuid)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![keep.uuid]);
}

#[test]
fn remove_at_uses_sorted_offsets_and_ignores_out_of_range() {
    let store = JokeStore::open_in_memory().unwrap();
    for setup in ["c", "a", "d", "b"] {
        store.add(setup, "p", "Smirk").unwrap();
    }

    let removed = store.remove_at(&[1, 3, 3, 42]).unwrap();

    assert_eq!(removed, 2);
    assert_eq!(setups(&store), vec!["a", "c"]);
}

#[test]
fn unknown_rating_label_is_rejected() {
    let store = JokeStore::open_in_memory().unwrap();
    assert!(store.add("setup", "punchline", "smirk").unwrap().is_none());
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn repository_validates_before_insert() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteJokeRepository::try_new(&conn).unwrap();

    let err = repo
        .create_joke(&Joke::new("", "punchline", Rating::Sob))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(repo.count_jokes().unwrap(), 0);
}

#[test]
fn repository_delete_missing_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteJokeRepository::try_new(&conn).unwrap();
    let joke = Joke::new("setup", "punchline", Rating::Sigh);

    let err = repo.delete_joke(joke.uuid).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == joke.uuid));
}

#[test]
fn repository_roundtrips_all_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteJokeRepository::try_new(&conn).unwrap();
    let joke = Joke::new("What do you call a fake noodle?", "An impasta.", Rating::Sob);

    repo.create_joke(&joke).unwrap();

    assert_eq!(repo.get_joke(joke.uuid).unwrap(), Some(joke));
}

#[test]
fn corrupt_rating_row_is_reported_not_masked() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "PRAGMA ignore_check_constraints = ON;
         INSERT INTO jokes (uuid, setup, punchline, rating, created_at)
         VALUES ('00000000-0000-0000-0000-000000000001', 's', 'p', 'Giggle', 0);",
    )
    .unwrap();
    let repo = SqliteJokeRepository::try_new(&conn).unwrap();

    let err = repo.list_jokes(&Default::default()).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("Giggle")));
}

#[test]
fn repository_requires_migrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    assert!(matches!(
        SqliteJokeRepository::try_new(&conn),
        Err(RepoError::InvalidData(_))
    ));
}

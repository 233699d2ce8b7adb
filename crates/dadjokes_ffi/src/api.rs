//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose gallery, card and add-form operations to Dart via FRB.
//! - Flatten view state into plain snapshot structs the widgets render.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call is `sync` and runs on the Flutter UI thread; the gallery
//!   session lives in a thread-local and is never shared across threads.
//! - Joke ids cross the boundary as hyphenated UUID strings.

use dadjokes_core::ui::add_form::{FORM_TITLE, SUBMIT_LABEL};
use dadjokes_core::ui::gallery::{ADD_TRIGGER_LABEL, GALLERY_TITLE};
use dadjokes_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    rating_glyph as rating_glyph_inner, AddForm, CardPhase, DragOffset, DragOutcome,
    GalleryView, JokeCard, JokeId, JokeStore, SubmitOutcome,
};
use log::{info, warn};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;
use uuid::Uuid;

const DB_FILE_NAME: &str = "dadjokes.sqlite3";
const DB_PATH_ENV: &str = "DADJOKES_DB_PATH";

thread_local! {
    static GALLERY: RefCell<Option<GalleryView>> = const { RefCell::new(None) };
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One card as the widget tree renders it.
#[derive(Debug, Clone, PartialEq)]
pub struct CardSnapshot {
    pub joke_id: String,
    pub setup: String,
    pub punchline: String,
    pub rating: String,
    pub glyph: String,
    pub punchline_visible: bool,
    pub punchline_blur: f32,
    pub punchline_opacity: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    /// Dismiss animation running; removal pending.
    pub deleting: bool,
    /// Decorative asset name, `Dad1` to `Dad4`.
    pub image_asset: String,
}

/// Whole-screen state for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GallerySnapshot {
    /// `false` when no gallery session is open on this thread.
    pub open: bool,
    pub title: String,
    pub add_trigger_label: String,
    pub add_form_visible: bool,
    pub form_title: String,
    pub submit_label: String,
    pub cards: Vec<CardSnapshot>,
    /// Milliseconds until the next pending delete is due, if any.
    pub next_tick_in_ms: Option<u64>,
}

/// Result envelope for the add form submit button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddFormResponse {
    /// Whether a joke was stored.
    pub ok: bool,
    pub joke_id: Option<String>,
    /// Form stays open on rejection and on storage failure.
    pub form_visible: bool,
    /// Diagnostic text; not meant for display.
    pub message: String,
}

/// Opens the gallery session on the calling thread.
///
/// An empty `db_path` falls back to `DADJOKES_DB_PATH`, then to a file in
/// the temp directory. Reopening replaces the previous session and drops its
/// pending deletes.
///
/// # FFI contract
/// - Sync call, DB-backed execution; runs migrations on first open.
/// - Never panics.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn gallery_open(db_path: String) -> String {
    let path = resolve_db_path(db_path.as_str());
    match JokeStore::open(&path) {
        Ok(store) => {
            let gallery = GalleryView::new(Rc::new(store));
            info!(
                "event=gallery_open module=ffi status=ok cards={}",
                gallery.cards().len()
            );
            GALLERY.with(|slot| *slot.borrow_mut() = Some(gallery));
            String::new()
        }
        Err(err) => {
            warn!("event=gallery_open module=ffi status=error error={err}");
            format!("gallery_open failed: {err}")
        }
    }
}

/// Closes the session, cancelling any pending deletes.
///
/// # FFI contract
/// - Sync call, non-blocking. No-op when nothing is open.
#[flutter_rust_bridge::frb(sync)]
pub fn gallery_close() {
    GALLERY.with(|slot| slot.borrow_mut().take());
}

/// Applies store changes and returns the current screen state.
///
/// # FFI contract
/// - Sync call, DB-backed only when the store changed since the last call.
/// - Never panics; returns `open = false` when no session exists.
#[flutter_rust_bridge::frb(sync)]
pub fn gallery_snapshot() -> GallerySnapshot {
    with_gallery(closed_snapshot(), |gallery| {
        gallery.sync();
        let now = Instant::now();
        GallerySnapshot {
            open: true,
            title: GALLERY_TITLE.to_string(),
            add_trigger_label: ADD_TRIGGER_LABEL.to_string(),
            add_form_visible: gallery.is_add_form_visible(),
            form_title: FORM_TITLE.to_string(),
            submit_label: SUBMIT_LABEL.to_string(),
            cards: gallery.cards().iter().map(to_card_snapshot).collect(),
            next_tick_in_ms: gallery.next_due().map(|due| {
                u64::try_from(due.saturating_duration_since(now).as_millis()).unwrap_or(u64::MAX)
            }),
        }
    })
}

/// "Add Joke" button handler. Returns the new form visibility.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Returns `false` when no session is open.
#[flutter_rust_bridge::frb(sync)]
pub fn gallery_toggle_add_form() -> bool {
    with_gallery(false, |gallery| {
        gallery.toggle_add_form();
        gallery.is_add_form_visible()
    })
}

/// Sheet binding: the shell reports dismissal with `false`.
#[flutter_rust_bridge::frb(sync)]
pub fn gallery_set_add_form_visible(visible: bool) {
    with_gallery((), |gallery| gallery.set_add_form_visible(visible));
}

/// Runs due deletes. Call from the frame loop after `next_tick_in_ms`.
///
/// # FFI contract
/// - Sync call, DB-backed execution when a delete is due.
/// - Never panics; storage failures are logged and count as not removed.
/// - Returns the number of jokes removed.
#[flutter_rust_bridge::frb(sync)]
pub fn gallery_tick() -> u32 {
    with_gallery(0, |gallery| {
        u32::try_from(gallery.tick(Instant::now())).unwrap_or(u32::MAX)
    })
}

/// List-edit removal by display offsets.
///
/// # FFI contract
/// - Sync call, DB-backed execution; all removals commit together.
/// - Out-of-range offsets are ignored.
/// - Returns the number removed, `0` on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn gallery_remove_at(offsets: Vec<u32>) -> u32 {
    let offsets = offsets
        .into_iter()
        .filter_map(|offset| usize::try_from(offset).ok())
        .collect::<Vec<_>>();
    with_gallery(0, |gallery| {
        u32::try_from(gallery.remove_at(&offsets)).unwrap_or(u32::MAX)
    })
}

/// Toggles one card's punchline.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Returns the new visibility, `false` for unknown or malformed ids.
#[flutter_rust_bridge::frb(sync)]
pub fn card_tap(joke_id: String) -> bool {
    let Some(id) = parse_joke_id(&joke_id) else {
        return false;
    };
    with_gallery(false, |gallery| gallery.tap_card(id).unwrap_or(false))
}

/// Drag update with the total translation since the drag began.
#[flutter_rust_bridge::frb(sync)]
pub fn card_drag(joke_id: String, dx: f32, dy: f32) -> bool {
    let Some(id) = parse_joke_id(&joke_id) else {
        return false;
    };
    with_gallery(false, |gallery| {
        gallery.drag_card(id, DragOffset::new(dx, dy))
    })
}

/// Drag release. Returns `dismiss`, `snap_back`, or empty string for
/// unknown ids.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - `dismiss` schedules the delete; the shell drives it via `gallery_tick`.
#[flutter_rust_bridge::frb(sync)]
pub fn card_drag_end(joke_id: String) -> String {
    let Some(id) = parse_joke_id(&joke_id) else {
        return String::new();
    };
    let outcome = with_gallery(None, |gallery| gallery.end_drag(id, Instant::now()));
    match outcome {
        Some(DragOutcome::Dismiss) => "dismiss".to_string(),
        Some(DragOutcome::SnapBack) => "snap_back".to_string(),
        None => String::new(),
    }
}

/// Submits the add form with the current field values.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Closes the form only when a joke was stored.
#[flutter_rust_bridge::frb(sync)]
pub fn add_form_submit(setup: String, punchline: String, rating: String) -> AddFormResponse {
    with_gallery(
        AddFormResponse {
            ok: false,
            joke_id: None,
            form_visible: false,
            message: "gallery is not open".to_string(),
        },
        |gallery| {
            {
                let form = gallery.add_form_mut();
                form.setup = setup;
                form.punchline = punchline;
                form.rating = rating;
            }
            let outcome = gallery.submit_add_form();
            let form_visible = gallery.is_add_form_visible();
            match outcome {
                SubmitOutcome::Saved(joke) => AddFormResponse {
                    ok: true,
                    joke_id: Some(joke.uuid.to_string()),
                    form_visible,
                    message: "Joke added.".to_string(),
                },
                SubmitOutcome::Rejected => AddFormResponse {
                    ok: false,
                    joke_id: None,
                    form_visible,
                    message: "Missing field.".to_string(),
                },
                SubmitOutcome::Failed => AddFormResponse {
                    ok: false,
                    joke_id: None,
                    form_visible,
                    message: "Save failed; see logs.".to_string(),
                },
            }
        },
    )
}

/// Picker options for the add form.
#[flutter_rust_bridge::frb(sync)]
pub fn rating_labels() -> Vec<String> {
    AddForm::ratings().iter().map(|label| label.to_string()).collect()
}

/// Glyph for a rating label; unknown labels get the neutral face.
#[flutter_rust_bridge::frb(sync)]
pub fn rating_glyph(label: String) -> String {
    rating_glyph_inner(label.as_str()).to_string()
}

/// Cover-flow tilt in degrees around the y axis for a card whose left edge
/// sits at `min_x` in global coordinates.
///
/// # FFI contract
/// - Sync call, pure; safe to call every frame.
#[flutter_rust_bridge::frb(sync)]
pub fn card_rotation_degrees(min_x: f32) -> f32 {
    JokeCard::rotation_degrees(min_x)
}

fn with_gallery<T>(closed: T, f: impl FnOnce(&mut GalleryView) -> T) -> T {
    GALLERY.with(|slot| match slot.borrow_mut().as_mut() {
        Some(gallery) => f(gallery),
        None => closed,
    })
}

fn closed_snapshot() -> GallerySnapshot {
    GallerySnapshot {
        open: false,
        title: GALLERY_TITLE.to_string(),
        add_trigger_label: ADD_TRIGGER_LABEL.to_string(),
        add_form_visible: false,
        form_title: FORM_TITLE.to_string(),
        submit_label: SUBMIT_LABEL.to_string(),
        cards: Vec::new(),
        next_tick_in_ms: None,
    }
}

fn to_card_snapshot(card: &JokeCard) -> CardSnapshot {
    let joke = card.joke();
    let style = card.punchline_style();
    let offset = card.offset();
    CardSnapshot {
        joke_id: joke.uuid.to_string(),
        setup: joke.setup.clone(),
        punchline: joke.punchline.clone(),
        rating: joke.rating.label().to_string(),
        glyph: card.glyph().to_string(),
        punchline_visible: card.is_punchline_visible(),
        punchline_blur: style.blur_radius,
        punchline_opacity: style.opacity,
        offset_x: offset.x,
        offset_y: offset.y,
        deleting: card.phase() == CardPhase::Deleting,
        image_asset: card.image_asset(),
    }
}

fn parse_joke_id(raw: &str) -> Option<JokeId> {
    Uuid::parse_str(raw.trim()).ok()
}

fn resolve_db_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        return PathBuf::from(trimmed);
    }
    if let Ok(value) = std::env::var(DB_PATH_ENV) {
        let value = value.trim();
        if !value.is_empty() {
            return PathBuf::from(value);
        }
    }
    std::env::temp_dir().join(DB_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::{
        add_form_submit, card_drag, card_drag_end, card_rotation_degrees, card_tap, core_version,
        gallery_close, gallery_open, gallery_remove_at, gallery_set_add_form_visible,
        gallery_snapshot, gallery_tick, gallery_toggle_add_form, init_logging, ping,
        rating_glyph, rating_labels,
    };
    use std::time::Duration;

    fn open_temp_gallery() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("jokes.sqlite3");
        let error = gallery_open(path.to_string_lossy().into_owned());
        assert!(error.is_empty(), "{error}");
        dir
    }

    fn add(setup: &str) -> String {
        gallery_set_add_form_visible(true);
        let response = add_form_submit(
            setup.to_string(),
            "punchline".to_string(),
            "Sob".to_string(),
        );
        assert!(response.ok, "{}", response.message);
        response.joke_id.expect("saved joke should return id")
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        assert!(!init_logging("verbose".to_string(), "tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn closed_session_returns_inert_defaults() {
        gallery_close();
        let snapshot = gallery_snapshot();
        assert!(!snapshot.open);
        assert!(snapshot.cards.is_empty());
        assert!(!card_tap(uuid::Uuid::new_v4().to_string()));
        assert_eq!(gallery_tick(), 0);
        assert!(!add_form_submit("a".into(), "b".into(), "Sob".into()).ok);
    }

    #[test]
    fn added_jokes_appear_sorted_with_glyphs() {
        let _dir = open_temp_gallery();
        add("B");
        add("A");

        let snapshot = gallery_snapshot();
        assert!(snapshot.open);
        assert_eq!(snapshot.title, "All Groan Up");
        assert_eq!(snapshot.add_trigger_label, "Add Joke");
        assert_eq!(snapshot.form_title, "Add New Joke");
        assert_eq!(snapshot.submit_label, "Add A New Joke");
        assert!(!snapshot.add_form_visible);
        let setups = snapshot
            .cards
            .iter()
            .map(|card| card.setup.as_str())
            .collect::<Vec<_>>();
        assert_eq!(setups, vec!["A", "B"]);
        assert!(snapshot.cards.iter().all(|card| card.glyph == "😭"));
        assert!(snapshot.cards.iter().all(|card| card.punchline_opacity == 0.25));
        gallery_close();
    }

    #[test]
    fn rejected_submit_keeps_form_open() {
        let _dir = open_temp_gallery();
        assert!(gallery_toggle_add_form());

        let response = add_form_submit(String::new(), "p".into(), "Silence".into());
        assert!(!response.ok);
        assert!(response.form_visible);
        assert!(gallery_snapshot().cards.is_empty());
        gallery_close();
    }

    #[test]
    fn tap_and_short_drag_round_trip() {
        let _dir = open_temp_gallery();
        let id = add("A");

        assert!(card_tap(id.clone()));
        assert!(!card_tap(id.clone()));
        assert!(card_drag(id.clone(), 0.0, -100.0));
        assert_eq!(card_drag_end(id.clone()), "snap_back");

        let card = &gallery_snapshot().cards[0];
        assert_eq!(card.offset_y, 0.0);
        assert!(!card.deleting);
        assert_eq!(card_drag_end("not-a-uuid".into()), "");
        gallery_close();
    }

    #[test]
    fn long_drag_removes_joke_after_delay() {
        let _dir = open_temp_gallery();
        let id = add("A");

        assert!(card_drag(id.clone(), 0.0, -250.0));
        assert_eq!(card_drag_end(id), "dismiss");
        let snapshot = gallery_snapshot();
        assert!(snapshot.cards[0].deleting);
        assert!(snapshot.next_tick_in_ms.is_some());

        std::thread::sleep(Duration::from_millis(350));
        assert_eq!(gallery_tick(), 1);
        assert!(gallery_snapshot().cards.is_empty());
        gallery_close();
    }

    #[test]
    fn remove_at_deletes_by_display_offset() {
        let _dir = open_temp_gallery();
        add("C");
        add("A");
        add("B");

        assert_eq!(gallery_remove_at(vec![1]), 1);
        let setups = gallery_snapshot()
            .cards
            .into_iter()
            .map(|card| card.setup)
            .collect::<Vec<_>>();
        assert_eq!(setups, vec!["A", "C"]);
        gallery_close();
    }

    #[test]
    fn rating_helpers_expose_fixed_tables() {
        assert_eq!(rating_labels(), vec!["Sob", "Sigh", "Silence", "Smirk"]);
        assert_eq!(rating_glyph("Sigh".into()), "😔");
        assert_eq!(rating_glyph("whatever".into()), "😐");
    }

    #[test]
    fn card_rotation_tilts_against_scroll_position() {
        assert_eq!(card_rotation_degrees(0.0), 0.0);
        assert_eq!(card_rotation_degrees(300.0), -30.0);
        assert_eq!(card_rotation_degrees(-20.0), 2.0);
    }
}

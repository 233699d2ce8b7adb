//! Presentation state for the joke gallery.
//!
//! # Responsibility
//! - Hold per-view state (cards, drag offsets, form fields) independent of
//!   any widget toolkit.
//! - Translate gestures into store calls.
//!
//! # Invariants
//! - Everything here runs on the UI thread; the store is shared via `Rc`.
//! - Deferred work is polled through `GalleryView::tick`, never threaded.

pub mod add_form;
pub mod card;
pub mod deferred;
pub mod gallery;

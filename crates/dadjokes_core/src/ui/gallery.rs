//! Horizontal gallery of joke cards bound to the store.
//!
//! # Responsibility
//! - Mirror the store's setup-ascending listing as one card per joke.
//! - Route taps and drags to cards and schedule post-animation deletes.
//! - Own the add-form presentation flag and form state.
//!
//! # Invariants
//! - Cards are matched to jokes by `JokeId`; per-card state survives syncs.
//! - A card torn down during sync has its pending delete cancelled.
//! - Dropping the gallery cancels every pending delete.

use crate::model::joke::JokeId;
use crate::repo::joke_repo::JokeSort;
use crate::store::{JokeStore, StoreSubscription};
use crate::ui::add_form::{AddForm, SubmitOutcome};
use crate::ui::card::{DragOffset, DragOutcome, JokeCard, DELETE_DELAY};
use crate::ui::deferred::DeferredQueue;
use log::{debug, error, warn};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Instant;

pub const GALLERY_TITLE: &str = "All Groan Up";
pub const ADD_TRIGGER_LABEL: &str = "Add Joke";

pub struct GalleryView {
    store: Rc<JokeStore>,
    subscription: StoreSubscription,
    cards: Vec<JokeCard>,
    deferred: DeferredQueue<JokeId>,
    add_form: AddForm,
    add_form_visible: bool,
}

impl GalleryView {
    /// Subscribes to `store` and builds the initial card list.
    ///
    /// A failing initial query is logged and leaves the gallery empty.
    pub fn new(store: Rc<JokeStore>) -> Self {
        let subscription = store.subscribe();
        let mut gallery = Self {
            store,
            subscription,
            cards: Vec::new(),
            deferred: DeferredQueue::new(),
            add_form: AddForm::new(),
            add_form_visible: false,
        };
        gallery.reload();
        gallery
    }

    /// Cards in display order (setup ascending).
    pub fn cards(&self) -> &[JokeCard] {
        &self.cards
    }

    pub fn card(&self, id: JokeId) -> Option<&JokeCard> {
        self.cards.iter().find(|card| card.id() == id)
    }

    pub fn pending_deletes(&self) -> usize {
        self.deferred.len()
    }

    /// Earliest pending delete, so the frame loop knows when to tick.
    pub fn next_due(&self) -> Option<Instant> {
        self.deferred.next_due()
    }

    /// Applies store notifications. Returns `true` when the cards changed.
    pub fn sync(&mut self) -> bool {
        let events = self.subscription.drain();
        if events.is_empty() {
            return false;
        }
        debug!(
            "event=gallery_sync module=ui status=start events={}",
            events.len()
        );
        self.reload();
        true
    }

    /// Toggles the punchline of one card. Returns the new visibility.
    pub fn tap_card(&mut self, id: JokeId) -> Option<bool> {
        self.card_mut(id).map(JokeCard::tap)
    }

    /// Feeds an in-progress drag. Returns `false` for unknown cards.
    pub fn drag_card(&mut self, id: JokeId, translation: DragOffset) -> bool {
        match self.card_mut(id) {
            Some(card) => {
                card.drag_changed(translation);
                true
            }
            None => false,
        }
    }

    /// Releases a drag. A dismissal schedules the store delete after
    /// `DELETE_DELAY`, once per card.
    pub fn end_drag(&mut self, id: JokeId, now: Instant) -> Option<DragOutcome> {
        let index = self.cards.iter().position(|card| card.id() == id)?;
        let outcome = self.cards[index].drag_ended();
        if outcome == DragOutcome::Dismiss && !self.cards[index].has_pending_delete() {
            let task = self.deferred.schedule(now, DELETE_DELAY, id);
            self.cards[index].set_pending_delete(task);
            debug!("event=card_dismiss module=ui status=scheduled joke_id={id}");
        }
        Some(outcome)
    }

    /// Runs deletes that are due at `now`, then syncs.
    ///
    /// Returns the number of jokes removed from the store.
    pub fn tick(&mut self, now: Instant) -> usize {
        let mut removed = 0;
        for id in self.deferred.take_due(now) {
            if let Some(card) = self.card_mut(id) {
                card.take_pending_delete();
            }
            match self.store.remove(id) {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(err) => {
                    warn!("event=card_dismiss module=ui status=error joke_id={id} error={err}")
                }
            }
        }
        self.sync();
        removed
    }

    /// List-edit removal by display offsets.
    pub fn remove_at(&mut self, offsets: &[usize]) -> usize {
        let removed = match self.store.remove_at(offsets) {
            Ok(removed) => removed,
            Err(err) => {
                warn!("event=gallery_remove_at module=ui status=error error={err}");
                0
            }
        };
        self.sync();
        removed
    }

    pub fn is_add_form_visible(&self) -> bool {
        self.add_form_visible
    }

    /// Presents or dismisses the add form. Presenting starts from a blank
    /// form.
    pub fn set_add_form_visible(&mut self, visible: bool) {
        if visible && !self.add_form_visible {
            self.add_form = AddForm::new();
        }
        self.add_form_visible = visible;
    }

    pub fn toggle_add_form(&mut self) {
        self.set_add_form_visible(!self.add_form_visible);
    }

    pub fn add_form(&self) -> &AddForm {
        &self.add_form
    }

    pub fn add_form_mut(&mut self) -> &mut AddForm {
        &mut self.add_form
    }

    /// Submits the add form; closes it and syncs when the joke was saved.
    pub fn submit_add_form(&mut self) -> SubmitOutcome {
        if !self.add_form_visible {
            return SubmitOutcome::Rejected;
        }
        let outcome = self.add_form.submit(&self.store);
        if matches!(outcome, SubmitOutcome::Saved(_)) {
            self.add_form_visible = false;
            self.sync();
        }
        outcome
    }

    fn card_mut(&mut self, id: JokeId) -> Option<&mut JokeCard> {
        self.cards.iter_mut().find(|card| card.id() == id)
    }

    fn reload(&mut self) {
        let jokes = match self.store.query(JokeSort::SetupAscending) {
            Ok(jokes) => jokes,
            Err(err) => {
                error!("event=gallery_reload module=ui status=error error={err}");
                return;
            }
        };

        let mut previous = std::mem::take(&mut self.cards)
            .into_iter()
            .map(|card| (card.id(), card))
            .collect::<HashMap<_, _>>();
        self.cards = jokes
            .into_iter()
            .map(|joke| {
                previous
                    .remove(&joke.uuid)
                    .unwrap_or_else(|| JokeCard::new(joke))
            })
            .collect();

        for (id, mut card) in previous {
            if let Some(task) = card.take_pending_delete() {
                self.deferred.cancel(task);
                debug!("event=card_teardown module=ui status=cancelled joke_id={id}");
            }
        }
    }
}

impl Drop for GalleryView {
    fn drop(&mut self) {
        if !self.deferred.is_empty() {
            debug!(
                "event=gallery_teardown module=ui status=cancelled pending={}",
                self.deferred.len()
            );
        }
    }
}

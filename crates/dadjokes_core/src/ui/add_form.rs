//! Add-joke form state.
//!
//! # Invariants
//! - Submission with an empty field writes nothing and keeps field values.
//! - Persistence failures are logged; the caller keeps the form open.

use crate::model::joke::Joke;
use crate::model::rating::Rating;
use crate::store::JokeStore;
use log::warn;

pub const FORM_TITLE: &str = "Add New Joke";
pub const SUBMIT_LABEL: &str = "Add A New Joke";

/// Result of pressing the submit button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A required field was empty. Nothing changed.
    Rejected,
    /// The joke was committed; the form should close.
    Saved(Joke),
    /// The commit failed and was logged. The form stays open.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddForm {
    pub setup: String,
    pub punchline: String,
    /// Selected rating label.
    pub rating: String,
}

impl Default for AddForm {
    fn default() -> Self {
        Self {
            setup: String::new(),
            punchline: String::new(),
            rating: Rating::default().label().to_string(),
        }
    }
}

impl AddForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Picker options in display order.
    pub fn ratings() -> [&'static str; 4] {
        Rating::ALL.map(Rating::label)
    }

    pub fn can_submit(&self) -> bool {
        !self.setup.is_empty() && !self.punchline.is_empty() && !self.rating.is_empty()
    }

    pub fn submit(&self, store: &JokeStore) -> SubmitOutcome {
        if !self.can_submit() {
            return SubmitOutcome::Rejected;
        }
        match store.add(&self.setup, &self.punchline, &self.rating) {
            Ok(Some(joke)) => SubmitOutcome::Saved(joke),
            Ok(None) => SubmitOutcome::Rejected,
            Err(err) => {
                warn!("event=add_form_submit module=ui status=error error={err}");
                SubmitOutcome::Failed
            }
        }
    }
}

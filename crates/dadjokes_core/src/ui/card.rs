//! Interactive state for one joke card.
//!
//! # Responsibility
//! - Toggle punchline visibility on tap.
//! - Track the drag offset and decide between snap-back and dismissal.
//! - Hold the decorative image choice for the card lifetime.
//!
//! # Invariants
//! - A card never mutates its joke; deletion goes through the store.
//! - Once `Deleting`, taps and drags are ignored.
//! - `image_index` stays in `1..=IMAGE_COUNT` and never changes.

use crate::model::joke::{Joke, JokeId};
use crate::ui::deferred::TaskId;
use rand::Rng;
use std::time::Duration;

/// Vertical drag offset a release must go past (upwards) to delete the card.
pub const DELETE_THRESHOLD: f32 = -200.0;
/// Time between starting the dismiss animation and removing the joke.
pub const DELETE_DELAY: Duration = Duration::from_millis(300);
/// Where a dismissed card is parked, well above the screen.
pub const DISMISSED_OFFSET_Y: f32 = -1000.0;
pub const IMAGE_COUNT: u8 = 4;

const COLLAPSED_BLUR: f32 = 6.0;
const COLLAPSED_OPACITY: f32 = 0.25;

/// Drag translation in logical units. Only `y` drives behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragOffset {
    pub x: f32,
    pub y: f32,
}

impl DragOffset {
    pub const ZERO: DragOffset = DragOffset { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardPhase {
    Resting,
    Dragging,
    /// Off-screen animation started; joke removal is pending.
    Deleting,
}

/// Result of releasing a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    SnapBack,
    Dismiss,
}

/// Render hints for the punchline text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PunchlineStyle {
    pub blur_radius: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone)]
pub struct JokeCard {
    joke: Joke,
    punchline_visible: bool,
    offset: DragOffset,
    phase: CardPhase,
    image_index: u8,
    pending_delete: Option<TaskId>,
}

impl JokeCard {
    /// Creates a collapsed card with a random decorative image.
    pub fn new(joke: Joke) -> Self {
        let image_index = rand::thread_rng().gen_range(1..=IMAGE_COUNT);
        Self::with_image(joke, image_index)
    }

    /// Creates a collapsed card with a fixed image, clamped into range.
    pub fn with_image(joke: Joke, image_index: u8) -> Self {
        Self {
            joke,
            punchline_visible: false,
            offset: DragOffset::ZERO,
            phase: CardPhase::Resting,
            image_index: image_index.clamp(1, IMAGE_COUNT),
            pending_delete: None,
        }
    }

    pub fn id(&self) -> JokeId {
        self.joke.uuid
    }

    pub fn joke(&self) -> &Joke {
        &self.joke
    }

    pub fn is_punchline_visible(&self) -> bool {
        self.punchline_visible
    }

    pub fn offset(&self) -> DragOffset {
        self.offset
    }

    pub fn phase(&self) -> CardPhase {
        self.phase
    }

    pub fn image_index(&self) -> u8 {
        self.image_index
    }

    /// Asset name of the decorative image, `Dad1` to `Dad4`.
    pub fn image_asset(&self) -> String {
        format!("Dad{}", self.image_index)
    }

    pub fn glyph(&self) -> &'static str {
        self.joke.glyph()
    }

    /// Toggles punchline visibility. Returns the new visibility.
    pub fn tap(&mut self) -> bool {
        if self.phase != CardPhase::Deleting {
            self.punchline_visible = !self.punchline_visible;
        }
        self.punchline_visible
    }

    pub fn punchline_style(&self) -> PunchlineStyle {
        if self.punchline_visible {
            PunchlineStyle {
                blur_radius: 0.0,
                opacity: 1.0,
            }
        } else {
            PunchlineStyle {
                blur_radius: COLLAPSED_BLUR,
                opacity: COLLAPSED_OPACITY,
            }
        }
    }

    /// Follows the finger: `translation` is the total drag since it began.
    pub fn drag_changed(&mut self, translation: DragOffset) {
        if self.phase == CardPhase::Deleting {
            return;
        }
        self.offset = translation;
        self.phase = CardPhase::Dragging;
    }

    /// Releases the drag.
    ///
    /// Past the threshold the card parks off-screen and enters `Deleting`;
    /// the caller schedules the actual removal after `DELETE_DELAY`.
    pub fn drag_ended(&mut self) -> DragOutcome {
        if self.phase == CardPhase::Deleting {
            return DragOutcome::Dismiss;
        }
        if self.offset.y < DELETE_THRESHOLD {
            self.offset = DragOffset::new(0.0, DISMISSED_OFFSET_Y);
            self.phase = CardPhase::Deleting;
            DragOutcome::Dismiss
        } else {
            self.offset = DragOffset::ZERO;
            self.phase = CardPhase::Resting;
            DragOutcome::SnapBack
        }
    }

    /// Cover-flow tilt around the y axis for a card whose left edge sits at
    /// `min_x` in global coordinates.
    pub fn rotation_degrees(min_x: f32) -> f32 {
        -min_x / 10.0
    }

    pub(crate) fn set_pending_delete(&mut self, task: TaskId) {
        self.pending_delete = Some(task);
    }

    pub(crate) fn has_pending_delete(&self) -> bool {
        self.pending_delete.is_some()
    }

    pub(crate) fn take_pending_delete(&mut self) -> Option<TaskId> {
        self.pending_delete.take()
    }
}

#[cfg(test)]
mod tests {
    use super::{CardPhase, DragOffset, DragOutcome, JokeCard, DISMISSED_OFFSET_Y};
    use crate::model::joke::Joke;
    use crate::model::rating::Rating;

    fn card() -> JokeCard {
        JokeCard::with_image(Joke::new("setup", "punchline", Rating::Smirk), 2)
    }

    #[test]
    fn tap_pairs_return_to_original_visibility() {
        let mut card = card();
        assert!(!card.is_punchline_visible());
        assert!(card.tap());
        assert!(!card.tap());
        assert!(!card.is_punchline_visible());
    }

    #[test]
    fn punchline_style_follows_visibility() {
        let mut card = card();
        let hidden = card.punchline_style();
        assert_eq!(hidden.blur_radius, 6.0);
        assert_eq!(hidden.opacity, 0.25);

        card.tap();
        let shown = card.punchline_style();
        assert_eq!(shown.blur_radius, 0.0);
        assert_eq!(shown.opacity, 1.0);
    }

    #[test]
    fn short_drag_snaps_back_to_zero() {
        let mut card = card();
        card.drag_changed(DragOffset::new(12.0, -100.0));
        assert_eq!(card.phase(), CardPhase::Dragging);
        assert_eq!(card.offset().y, -100.0);

        assert_eq!(card.drag_ended(), DragOutcome::SnapBack);
        assert_eq!(card.offset(), DragOffset::ZERO);
        assert_eq!(card.phase(), CardPhase::Resting);
    }

    #[test]
    fn threshold_is_strict() {
        let mut card = card();
        card.drag_changed(DragOffset::new(0.0, -200.0));
        assert_eq!(card.drag_ended(), DragOutcome::SnapBack);
    }

    #[test]
    fn long_upward_drag_dismisses_and_freezes_card() {
        let mut card = card();
        card.drag_changed(DragOffset::new(5.0, -250.0));
        assert_eq!(card.drag_ended(), DragOutcome::Dismiss);
        assert_eq!(card.phase(), CardPhase::Deleting);
        assert_eq!(card.offset().y, DISMISSED_OFFSET_Y);

        card.drag_changed(DragOffset::new(0.0, 0.0));
        assert_eq!(card.offset().y, DISMISSED_OFFSET_Y);
        assert!(!card.tap());
    }

    #[test]
    fn downward_drag_never_dismisses() {
        let mut card = card();
        card.drag_changed(DragOffset::new(0.0, 900.0));
        assert_eq!(card.drag_ended(), DragOutcome::SnapBack);
    }

    #[test]
    fn image_choice_is_in_range() {
        for _ in 0..64 {
            let card = JokeCard::new(Joke::new("s", "p", Rating::Sob));
            assert!((1..=4).contains(&card.image_index()));
            assert!(card.image_asset().starts_with("Dad"));
        }
        assert_eq!(
            JokeCard::with_image(Joke::new("s", "p", Rating::Sob), 9).image_index(),
            4
        );
    }

    #[test]
    fn rotation_tilts_against_scroll_position() {
        assert_eq!(JokeCard::rotation_degrees(100.0), -10.0);
        assert_eq!(JokeCard::rotation_degrees(-50.0), 5.0);
    }
}

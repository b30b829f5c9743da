//! Alternating slot tracking
//!
//! Each output surface shows background and text through two image slots per
//! channel. New content is loaded into the hidden slot and the scene animates
//! from the front slot to it, so a visible image is never overwritten.

use crate::frame::{Frame, FrameKey};

/// One of the two alternating image buffers of a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Slot {
    #[default]
    One,
    Two,
}

impl Slot {
    pub fn other(self) -> Slot {
        match self {
            Slot::One => Slot::Two,
            Slot::Two => Slot::One,
        }
    }
}

/// Direction of the animated handoff between slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotDirection {
    OneToTwo,
    TwoToOne,
}

impl SlotDirection {
    /// Direction that brings `slot` to the front
    pub fn towards(slot: Slot) -> Self {
        match slot {
            Slot::One => SlotDirection::TwoToOne,
            Slot::Two => SlotDirection::OneToTwo,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SlotDirection::OneToTwo => "1to2",
            SlotDirection::TwoToOne => "2to1",
        }
    }
}

/// Result of feeding an image into a slot tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotUpdate {
    /// Same image as the one on screen; nothing to do
    Unchanged,
    /// The image goes into `slot`, which becomes the front slot
    Flipped { slot: Slot, direction: SlotDirection },
}

impl SlotUpdate {
    pub fn changed(&self) -> bool {
        matches!(self, SlotUpdate::Flipped { .. })
    }

    pub fn direction(&self) -> Option<SlotDirection> {
        match self {
            SlotUpdate::Flipped { direction, .. } => Some(*direction),
            SlotUpdate::Unchanged => None,
        }
    }
}

/// Two-state front-slot machine for a single channel
#[derive(Debug, Clone, Default)]
pub struct SlotTracker {
    front: Slot,
    last: Option<FrameKey>,
}

impl SlotTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot currently in front
    pub fn front(&self) -> Slot {
        self.front
    }

    /// Identity of the image last shown through this channel
    pub fn last_key(&self) -> Option<FrameKey> {
        self.last
    }

    /// Flip only when `frame` differs from the image already shown
    pub fn update(&mut self, frame: &Frame) -> SlotUpdate {
        if self.last == Some(frame.key()) {
            return SlotUpdate::Unchanged;
        }
        let (slot, direction) = self.flip(frame);
        SlotUpdate::Flipped { slot, direction }
    }

    /// Forget the last image so the next update flips even for the same frame
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Flip unconditionally, even for an identical image
    ///
    /// Returns the slot the image goes into and the direction to animate.
    pub fn flip(&mut self, frame: &Frame) -> (Slot, SlotDirection) {
        self.last = Some(frame.key());
        self.front = self.front.other();
        (self.front, SlotDirection::towards(self.front))
    }
}

/// Slot state of one render target
#[derive(Debug, Clone, Default)]
pub struct SlotState {
    pub background: SlotTracker,
    pub text: SlotTracker,
    /// Whether the last update changed the background
    pub is_new_background: bool,
}

impl SlotState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background_front_is_slot2(&self) -> bool {
        self.background.front() == Slot::Two
    }

    pub fn text_front_is_slot2(&self) -> bool {
        self.text.front() == Slot::Two
    }

    pub fn last_background_key(&self) -> Option<FrameKey> {
        self.background.last_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Size;

    fn frame() -> Frame {
        Frame::empty(Size::new(2, 2))
    }

    #[test]
    fn test_first_update_moves_to_slot_two() {
        let mut tracker = SlotTracker::new();
        assert_eq!(tracker.front(), Slot::One);
        let update = tracker.update(&frame());
        assert_eq!(
            update,
            SlotUpdate::Flipped {
                slot: Slot::Two,
                direction: SlotDirection::OneToTwo
            }
        );
    }

    #[test]
    fn test_identical_frame_does_not_flip() {
        let mut tracker = SlotTracker::new();
        let image = frame();
        assert!(tracker.update(&image).changed());
        let front = tracker.front();
        assert_eq!(tracker.update(&image.clone()), SlotUpdate::Unchanged);
        assert_eq!(tracker.front(), front);
    }

    #[test]
    fn test_flip_ignores_identity() {
        let mut tracker = SlotTracker::new();
        let image = frame();
        tracker.flip(&image);
        let (slot, direction) = tracker.flip(&image);
        assert_eq!((slot, direction), (Slot::One, SlotDirection::TwoToOne));
        assert_eq!(tracker.front(), Slot::One);
        assert_eq!(tracker.last_key(), Some(image.key()));
    }

    #[test]
    fn test_invalidate_reloads_same_frame() {
        let mut tracker = SlotTracker::new();
        let image = frame();
        tracker.update(&image);
        tracker.invalidate();
        assert_eq!(tracker.last_key(), None);
        assert_eq!(
            tracker.update(&image),
            SlotUpdate::Flipped {
                slot: Slot::One,
                direction: SlotDirection::TwoToOne
            }
        );
    }

    #[test]
    fn test_alternation_parity() {
        let mut state = SlotState::new();
        for n in 1..=7u32 {
            state.background.update(&frame());
            assert_eq!(state.background_front_is_slot2(), n % 2 == 1);
        }
        assert!(!state.text_front_is_slot2());
    }
}

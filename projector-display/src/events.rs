//! Control events emitted by render targets
//!
//! Scene signals arrive with raw integer payloads and may be interleaved with
//! render calls; targets normalize them into `DisplayEvent`s and push them
//! onto a channel the controller drains at its own pace.

use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};

use crate::frame::Size;
use crate::output::TargetId;
use crate::playback::PlaybackState;
use crate::scene::SceneSignal;

/// Events for the UI/controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEvent {
    ExitSlide,
    NextSlide,
    PrevSlide,
    VideoPositionChanged(Duration),
    VideoDurationChanged(Duration),
    VideoPlaybackStateChanged(PlaybackState),
    VideoStopped,
    EnabledChanged(bool),
    ResolutionChanged(Size),
    ThemeChanged {
        mirror_primary: bool,
        theme_id: Option<i64>,
    },
}

fn millis(raw: i64) -> Duration {
    Duration::from_millis(raw.max(0) as u64)
}

impl From<SceneSignal> for DisplayEvent {
    fn from(signal: SceneSignal) -> Self {
        match signal {
            SceneSignal::ExitClicked => DisplayEvent::ExitSlide,
            SceneSignal::NextClicked => DisplayEvent::NextSlide,
            SceneSignal::PrevClicked => DisplayEvent::PrevSlide,
            SceneSignal::PositionChanged(ms) => DisplayEvent::VideoPositionChanged(millis(ms)),
            SceneSignal::DurationChanged(ms) => DisplayEvent::VideoDurationChanged(millis(ms)),
            SceneSignal::PlaybackStateChanged(raw) => {
                DisplayEvent::VideoPlaybackStateChanged(PlaybackState::from_raw(raw))
            }
            SceneSignal::PlaybackStopped => DisplayEvent::VideoStopped,
        }
    }
}

/// Keys an output window reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    Back,
    Forward,
    Enter,
    Return,
    Escape,
    Other,
}

/// Navigation event for a released key
pub fn key_action(key: Key) -> Option<DisplayEvent> {
    match key {
        Key::Left | Key::Up | Key::PageUp | Key::Back => Some(DisplayEvent::PrevSlide),
        Key::Right | Key::Down | Key::PageDown | Key::Forward | Key::Enter | Key::Return => {
            Some(DisplayEvent::NextSlide)
        }
        Key::Escape => Some(DisplayEvent::ExitSlide),
        Key::Other => None,
    }
}

/// An event tagged with the target that raised it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetEvent {
    pub target: TargetId,
    pub event: DisplayEvent,
}

/// Create the event channel shared by all targets
pub fn event_channel() -> (Sender<TargetEvent>, Receiver<TargetEvent>) {
    crossbeam_channel::unbounded()
}

/// Sending half bound to one target
#[derive(Debug, Clone)]
pub struct EventSink {
    target: TargetId,
    tx: Sender<TargetEvent>,
}

impl EventSink {
    pub fn new(target: TargetId, tx: Sender<TargetEvent>) -> Self {
        Self { target, tx }
    }

    /// Standalone sink with its own receiver
    pub fn detached(target: TargetId) -> (Self, Receiver<TargetEvent>) {
        let (tx, rx) = event_channel();
        (Self::new(target, tx), rx)
    }

    pub fn emit(&self, event: DisplayEvent) {
        tracing::debug!(target_id = %self.target, ?event, "Display event");
        if self
            .tx
            .send(TargetEvent {
                target: self.target,
                event,
            })
            .is_err()
        {
            tracing::debug!(target_id = %self.target, "Event receiver dropped");
        }
    }
}

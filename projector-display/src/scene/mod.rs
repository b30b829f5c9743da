//! Scene renderer boundary
//!
//! The scene renderer owns the actual display surface: four image slots
//! (two background, two text), a foreground video player, a looping background
//! video layer, navigation controls and overlays. Render targets drive it only
//! through this typed interface.

mod recording;

pub use recording::{RecordingScene, SceneCall, SceneLog};

use std::path::Path;

use crate::frame::{Frame, Size};
use crate::playback::LowerThirdConfig;
use crate::render::{FillMode, Slot, SlotDirection, TransitionType};

/// Named image slots of a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSlot {
    Back1,
    Back2,
    Text1,
    Text2,
}

impl ImageSlot {
    pub fn background(slot: Slot) -> Self {
        match slot {
            Slot::One => ImageSlot::Back1,
            Slot::Two => ImageSlot::Back2,
        }
    }

    pub fn text(slot: Slot) -> Self {
        match slot {
            Slot::One => ImageSlot::Text1,
            Slot::Two => ImageSlot::Text2,
        }
    }

    /// Object name used by declarative scenes
    pub fn object_name(&self) -> &'static str {
        match self {
            ImageSlot::Back1 => "backImage1",
            ImageSlot::Back2 => "backImage2",
            ImageSlot::Text1 => "textImage1",
            ImageSlot::Text2 => "textImage2",
        }
    }
}

/// Foreground video playback parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoMode {
    /// 0.0 to 1.0
    pub volume: f32,
    pub looping: bool,
    pub fill: FillMode,
}

impl VideoMode {
    /// Full volume, single playback, whole frame visible
    pub fn foreground() -> Self {
        Self {
            volume: 1.0,
            looping: false,
            fill: FillMode::KeepAspect,
        }
    }
}

/// Placement of the navigation button group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlsPlacement {
    pub x: i32,
    pub y: i32,
    pub button_size: u32,
    pub opacity: f32,
}

/// Raw signals emitted by the scene renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneSignal {
    ExitClicked,
    NextClicked,
    PrevClicked,
    /// Playback position in milliseconds
    PositionChanged(i64),
    /// Media duration in milliseconds
    DurationChanged(i64),
    /// Raw player state (0 stopped, 1 playing, 2 paused)
    PlaybackStateChanged(i32),
    PlaybackStopped,
}

/// Display surface driven by a render target
pub trait SceneRenderer {
    /// Resize the root item to the effective render size
    fn set_root_size(&mut self, size: Size);

    /// Load an image into a slot, positioned at `origin`
    fn set_slot_image(&mut self, slot: ImageSlot, frame: &Frame, origin: (i32, i32));

    /// Background slots are hidden while a background video is shown
    fn set_slot_visible(&mut self, slot: ImageSlot, visible: bool);

    /// Cancel any running slot animation
    fn stop_transitions(&mut self);

    fn transition_back(&mut self, direction: SlotDirection, transition: TransitionType);

    fn transition_text(&mut self, direction: SlotDirection, transition: TransitionType);

    fn set_video_source(&mut self, path: &Path, mode: VideoMode);

    fn play_video(&mut self);

    fn pause_video(&mut self);

    fn stop_video(&mut self);

    /// 0.0 to 1.0
    fn set_video_volume(&mut self, volume: f32);

    fn set_video_position(&mut self, position_ms: i64);

    fn set_background_video(&mut self, path: &Path, looping: bool, fill: FillMode);

    fn stop_background_video(&mut self);

    fn pause_background_video(&mut self);

    fn resume_background_video(&mut self);

    fn position_controls(&mut self, placement: ControlsPlacement);

    fn set_controls_visible(&mut self, visible: bool);

    /// `None` removes the logo
    fn set_logo_overlay(&mut self, path: Option<&Path>);

    fn set_lower_third(&mut self, config: &LowerThirdConfig);
}

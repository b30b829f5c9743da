//! Recording scene renderer
//!
//! Keeps an ordered log of every call instead of drawing. Used for headless
//! runs and to observe what a render target asked the scene to do.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::{ControlsPlacement, ImageSlot, SceneRenderer, VideoMode};
use crate::frame::{Frame, FrameKey, Size};
use crate::playback::LowerThirdConfig;
use crate::render::{FillMode, SlotDirection, TransitionType};

/// One recorded scene call
#[derive(Debug, Clone, PartialEq)]
pub enum SceneCall {
    SetRootSize(Size),
    SetSlotImage {
        slot: ImageSlot,
        key: FrameKey,
        size: Size,
        origin: (i32, i32),
    },
    SetSlotVisible(ImageSlot, bool),
    StopTransitions,
    TransitionBack(SlotDirection, TransitionType),
    TransitionText(SlotDirection, TransitionType),
    SetVideoSource(PathBuf, VideoMode),
    PlayVideo,
    PauseVideo,
    StopVideo,
    SetVideoVolume(f32),
    SetVideoPosition(i64),
    SetBackgroundVideo {
        path: PathBuf,
        looping: bool,
        fill: FillMode,
    },
    StopBackgroundVideo,
    PauseBackgroundVideo,
    ResumeBackgroundVideo,
    PositionControls(ControlsPlacement),
    SetControlsVisible(bool),
    SetLogoOverlay(Option<PathBuf>),
    SetLowerThird(LowerThirdConfig),
}

/// Shared handle to the call log of a `RecordingScene`
#[derive(Debug, Clone, Default)]
pub struct SceneLog(Rc<RefCell<Vec<SceneCall>>>);

impl SceneLog {
    /// Snapshot of all calls so far
    pub fn calls(&self) -> Vec<SceneCall> {
        self.0.borrow().clone()
    }

    /// Remove and return all calls so far
    pub fn take(&self) -> Vec<SceneCall> {
        std::mem::take(&mut *self.0.borrow_mut())
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Number of recorded calls matching `predicate`
    pub fn count(&self, predicate: impl Fn(&SceneCall) -> bool) -> usize {
        self.0.borrow().iter().filter(|c| predicate(c)).count()
    }

    fn push(&self, call: SceneCall) {
        tracing::trace!(?call, "scene call");
        self.0.borrow_mut().push(call);
    }
}

/// Scene renderer that records calls
#[derive(Debug, Default)]
pub struct RecordingScene {
    log: SceneLog,
}

impl RecordingScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the call log; stays valid after the scene is moved into a target
    pub fn log(&self) -> SceneLog {
        self.log.clone()
    }
}

impl SceneRenderer for RecordingScene {
    fn set_root_size(&mut self, size: Size) {
        self.log.push(SceneCall::SetRootSize(size));
    }

    fn set_slot_image(&mut self, slot: ImageSlot, frame: &Frame, origin: (i32, i32)) {
        self.log.push(SceneCall::SetSlotImage {
            slot,
            key: frame.key(),
            size: frame.size(),
            origin,
        });
    }

    fn set_slot_visible(&mut self, slot: ImageSlot, visible: bool) {
        self.log.push(SceneCall::SetSlotVisible(slot, visible));
    }

    fn stop_transitions(&mut self) {
        self.log.push(SceneCall::StopTransitions);
    }

    fn transition_back(&mut self, direction: SlotDirection, transition: TransitionType) {
        self.log.push(SceneCall::TransitionBack(direction, transition));
    }

    fn transition_text(&mut self, direction: SlotDirection, transition: TransitionType) {
        self.log.push(SceneCall::TransitionText(direction, transition));
    }

    fn set_video_source(&mut self, path: &Path, mode: VideoMode) {
        self.log.push(SceneCall::SetVideoSource(path.to_path_buf(), mode));
    }

    fn play_video(&mut self) {
        self.log.push(SceneCall::PlayVideo);
    }

    fn pause_video(&mut self) {
        self.log.push(SceneCall::PauseVideo);
    }

    fn stop_video(&mut self) {
        self.log.push(SceneCall::StopVideo);
    }

    fn set_video_volume(&mut self, volume: f32) {
        self.log.push(SceneCall::SetVideoVolume(volume));
    }

    fn set_video_position(&mut self, position_ms: i64) {
        self.log.push(SceneCall::SetVideoPosition(position_ms));
    }

    fn set_background_video(&mut self, path: &Path, looping: bool, fill: FillMode) {
        self.log.push(SceneCall::SetBackgroundVideo {
            path: path.to_path_buf(),
            looping,
            fill,
        });
    }

    fn stop_background_video(&mut self) {
        self.log.push(SceneCall::StopBackgroundVideo);
    }

    fn pause_background_video(&mut self) {
        self.log.push(SceneCall::PauseBackgroundVideo);
    }

    fn resume_background_video(&mut self) {
        self.log.push(SceneCall::ResumeBackgroundVideo);
    }

    fn position_controls(&mut self, placement: ControlsPlacement) {
        self.log.push(SceneCall::PositionControls(placement));
    }

    fn set_controls_visible(&mut self, visible: bool) {
        self.log.push(SceneCall::SetControlsVisible(visible));
    }

    fn set_logo_overlay(&mut self, path: Option<&Path>) {
        self.log.push(SceneCall::SetLogoOverlay(path.map(Path::to_path_buf)));
    }

    fn set_lower_third(&mut self, config: &LowerThirdConfig) {
        self.log.push(SceneCall::SetLowerThird(config.clone()));
    }
}

//! Playback and overlay control
//!
//! Thin command surface in front of the scene renderer's media players and
//! overlays. Keeps just enough state to avoid redundant work: the background
//! video currently set, the volume to restore after unmuting, and the overlay
//! configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::frame::Color;
use crate::render::FillMode;
use crate::scene::SceneRenderer;
use crate::settings::FontSpec;

/// Playback state of the foreground video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Not playing
    #[default]
    Stopped,
    /// Currently playing
    Playing,
    /// Paused (retains position)
    Paused,
}

impl PlaybackState {
    /// Map a raw player state (0 stopped, 1 playing, 2 paused)
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => PlaybackState::Playing,
            2 => PlaybackState::Paused,
            _ => PlaybackState::Stopped,
        }
    }
}

/// Lower-third caption overlay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowerThirdConfig {
    pub visible: bool,
    pub text: String,
    pub font: FontSpec,
    pub background: Color,
    pub text_color: Color,
}

impl Default for LowerThirdConfig {
    fn default() -> Self {
        Self {
            visible: false,
            text: String::new(),
            font: FontSpec::default(),
            // Semi-transparent black
            background: Color::rgba(0, 0, 0, 200),
            text_color: Color::WHITE,
        }
    }
}

/// Playback and overlay state of one render target
#[derive(Debug, Clone)]
pub struct PlaybackControl {
    state: PlaybackState,
    /// 0 to 100
    volume: u8,
    muted: bool,
    background_video: Option<PathBuf>,
    logo: Option<PathBuf>,
    lower_third: LowerThirdConfig,
}

impl Default for PlaybackControl {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackControl {
    pub fn new() -> Self {
        Self {
            state: PlaybackState::Stopped,
            volume: 100,
            muted: false,
            background_video: None,
            logo: None,
            lower_third: LowerThirdConfig::default(),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Background video currently playing, if any
    pub fn background_video(&self) -> Option<&Path> {
        self.background_video.as_deref()
    }

    pub fn logo(&self) -> Option<&Path> {
        self.logo.as_deref()
    }

    pub fn lower_third(&self) -> &LowerThirdConfig {
        &self.lower_third
    }

    pub fn play(&mut self, scene: &mut dyn SceneRenderer) {
        scene.play_video();
        self.state = PlaybackState::Playing;
    }

    pub fn pause(&mut self, scene: &mut dyn SceneRenderer) {
        scene.pause_video();
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    pub fn stop(&mut self, scene: &mut dyn SceneRenderer) {
        scene.stop_video();
        self.state = PlaybackState::Stopped;
    }

    /// Set the volume (0 to 100); applied immediately unless muted
    pub fn set_volume(&mut self, scene: &mut dyn SceneRenderer, level: u8) {
        self.volume = level.min(100);
        if !self.muted {
            scene.set_video_volume(self.volume as f32 / 100.0);
        }
    }

    /// Mute or restore the last volume
    pub fn set_muted(&mut self, scene: &mut dyn SceneRenderer, muted: bool) {
        self.muted = muted;
        let volume = if muted { 0.0 } else { self.volume as f32 / 100.0 };
        scene.set_video_volume(volume);
    }

    pub fn seek(&mut self, scene: &mut dyn SceneRenderer, position_ms: i64) {
        scene.set_video_position(position_ms.max(0));
    }

    /// Start a looping background video
    ///
    /// Returns `false` without touching the scene when `path` is already the
    /// current background video.
    pub fn set_background_video(
        &mut self,
        scene: &mut dyn SceneRenderer,
        path: &Path,
        looping: bool,
        fill: FillMode,
    ) -> bool {
        if self.background_video.as_deref() == Some(path) {
            return false;
        }
        tracing::debug!(path = %path.display(), looping, fill = fill.name(), "Starting background video");
        scene.set_background_video(path, looping, fill);
        self.background_video = Some(path.to_path_buf());
        true
    }

    /// Stop the background video; returns `false` if none was set
    pub fn stop_background_video(&mut self, scene: &mut dyn SceneRenderer) -> bool {
        if self.background_video.take().is_none() {
            return false;
        }
        scene.stop_background_video();
        true
    }

    pub fn pause_background_video(&mut self, scene: &mut dyn SceneRenderer) {
        if self.background_video.is_some() {
            scene.pause_background_video();
        }
    }

    pub fn resume_background_video(&mut self, scene: &mut dyn SceneRenderer) {
        if self.background_video.is_some() {
            scene.resume_background_video();
        }
    }

    /// Show a logo image, or remove it with `None`
    ///
    /// A logo that does not exist on disk is removed instead of shown.
    pub fn set_logo_overlay(&mut self, scene: &mut dyn SceneRenderer, path: Option<&Path>) -> Result<(), RenderError> {
        match path {
            Some(path) if !path.exists() => {
                tracing::warn!(path = %path.display(), "Logo overlay not found");
                self.logo = None;
                scene.set_logo_overlay(None);
                Err(RenderError::MissingAsset(path.to_path_buf()))
            }
            _ => {
                self.logo = path.map(Path::to_path_buf);
                scene.set_logo_overlay(path);
                Ok(())
            }
        }
    }

    pub fn set_lower_third_config(&mut self, scene: &mut dyn SceneRenderer, config: LowerThirdConfig) {
        scene.set_lower_third(&config);
        self.lower_third = config;
    }

    pub fn show_lower_third(&mut self, scene: &mut dyn SceneRenderer, text: impl Into<String>) {
        self.lower_third.text = text.into();
        self.lower_third.visible = true;
        scene.set_lower_third(&self.lower_third);
    }

    pub fn hide_lower_third(&mut self, scene: &mut dyn SceneRenderer) {
        self.lower_third.visible = false;
        scene.set_lower_third(&self.lower_third);
    }

    /// Record a state reported by the player
    pub fn observe_state(&mut self, state: PlaybackState) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{RecordingScene, SceneCall};

    #[test]
    fn test_background_video_is_idempotent() {
        let mut scene = RecordingScene::new();
        let log = scene.log();
        let mut control = PlaybackControl::new();
        let path = Path::new("a.mp4");

        assert!(control.set_background_video(&mut scene, path, true, FillMode::Stretch));
        assert!(!control.set_background_video(&mut scene, path, true, FillMode::Stretch));
        assert_eq!(
            log.count(|c| matches!(c, SceneCall::SetBackgroundVideo { .. })),
            1
        );
        assert_eq!(control.background_video(), Some(path));
    }

    #[test]
    fn test_stop_background_video_clears_path() {
        let mut scene = RecordingScene::new();
        let log = scene.log();
        let mut control = PlaybackControl::new();
        assert!(!control.stop_background_video(&mut scene));
        control.set_background_video(&mut scene, Path::new("a.mp4"), true, FillMode::Stretch);
        assert!(control.stop_background_video(&mut scene));
        assert!(control.background_video().is_none());
        // Same path starts again after a stop
        assert!(control.set_background_video(&mut scene, Path::new("a.mp4"), true, FillMode::Stretch));
        assert_eq!(log.count(|c| *c == SceneCall::StopBackgroundVideo), 1);
    }

    #[test]
    fn test_mute_restores_volume() {
        let mut scene = RecordingScene::new();
        let log = scene.log();
        let mut control = PlaybackControl::new();
        control.set_volume(&mut scene, 40);
        control.set_muted(&mut scene, true);
        control.set_volume(&mut scene, 60);
        control.set_muted(&mut scene, false);
        assert_eq!(
            log.calls(),
            vec![
                SceneCall::SetVideoVolume(0.4),
                SceneCall::SetVideoVolume(0.0),
                SceneCall::SetVideoVolume(0.6),
            ]
        );
        assert_eq!(control.volume(), 60);
    }

    #[test]
    fn test_volume_is_clamped() {
        let mut scene = RecordingScene::new();
        let mut control = PlaybackControl::new();
        control.set_volume(&mut scene, 250);
        assert_eq!(control.volume(), 100);
    }

    #[test]
    fn test_transport_state() {
        let mut scene = RecordingScene::new();
        let mut control = PlaybackControl::new();
        control.pause(&mut scene);
        assert_eq!(control.state(), PlaybackState::Stopped);
        control.play(&mut scene);
        control.pause(&mut scene);
        assert_eq!(control.state(), PlaybackState::Paused);
        control.stop(&mut scene);
        assert_eq!(control.state(), PlaybackState::Stopped);
    }

    #[test]
    fn test_missing_logo_is_removed() {
        let mut scene = RecordingScene::new();
        let log = scene.log();
        let mut control = PlaybackControl::new();
        let result = control.set_logo_overlay(&mut scene, Some(Path::new("/no/such/logo.png")));
        assert!(matches!(result, Err(RenderError::MissingAsset(_))));
        assert!(control.logo().is_none());
        assert_eq!(log.calls(), vec![SceneCall::SetLogoOverlay(None)]);
    }

    #[test]
    fn test_lower_third_toggle() {
        let mut scene = RecordingScene::new();
        let mut control = PlaybackControl::new();
        control.show_lower_third(&mut scene, "Welcome");
        assert!(control.lower_third().visible);
        assert_eq!(control.lower_third().text, "Welcome");
        control.hide_lower_third(&mut scene);
        assert!(!control.lower_third().visible);
        assert_eq!(control.lower_third().text, "Welcome");
    }

    #[test]
    fn test_raw_state_mapping() {
        assert_eq!(PlaybackState::from_raw(1), PlaybackState::Playing);
        assert_eq!(PlaybackState::from_raw(2), PlaybackState::Paused);
        assert_eq!(PlaybackState::from_raw(0), PlaybackState::Stopped);
        assert_eq!(PlaybackState::from_raw(-3), PlaybackState::Stopped);
    }
}

//! Per-surface render target
//!
//! A render target turns content events into slot updates for one output
//! surface: it resolves the background, asks the rasterizer for the text
//! overlay, scales the background to the effective render size, flips the
//! alternating slots and tells the scene which transition to run.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::controls::place_controls;
use crate::content::{AnnounceSlide, Content, ContentRasterizer, PassiveText, Stanza, Verse, VideoInfo};
use crate::error::{RenderError, RenderOutcome};
use crate::events::{key_action, DisplayEvent, EventSink, Key};
use crate::frame::{Color, Frame, Size};
use crate::playback::{LowerThirdConfig, PlaybackControl, PlaybackState};
use crate::render::{
    centered_origin, scale, FillMode, ScreenFormat, SlotState, SlotUpdate, TransitionCommand, TransitionType,
};
use crate::scene::{ImageSlot, SceneRenderer, SceneSignal, VideoMode};
use crate::settings::{BackgroundType, DisplayControlsSettings, SlideShowSettings, StyleSettings};

/// Maximum number of display targets (primary plus three secondaries)
pub const MAX_DISPLAY_TARGETS: u8 = 4;

/// Identifies an output surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TargetId {
    /// Display target, numbered from 1 (the primary display)
    Display(u8),
    /// Streaming/virtual output
    Virtual,
}

impl TargetId {
    pub const PRIMARY: TargetId = TargetId::Display(1);

    /// Zero-based index of a display target
    pub fn display_index(&self) -> Option<usize> {
        match *self {
            TargetId::Display(n) if (1..=MAX_DISPLAY_TARGETS).contains(&n) => Some(n as usize - 1),
            _ => None,
        }
    }

    /// Display target for a zero-based index
    pub fn from_display_index(index: usize) -> Option<Self> {
        (index < MAX_DISPLAY_TARGETS as usize).then(|| TargetId::Display(index as u8 + 1))
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetId::Display(n) => write!(f, "Display {}", n),
            TargetId::Virtual => write!(f, "Virtual Output"),
        }
    }
}

/// Background currently driving a target
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BackgroundKind {
    /// Nothing rendered yet
    #[default]
    None,
    SolidColor(Color),
    StaticImage,
    LoopingVideo(PathBuf),
}

/// One output surface and its rendering state
pub struct RenderTarget {
    id: TargetId,
    scene: Option<Box<dyn SceneRenderer>>,
    rasterizer: Arc<dyn ContentRasterizer>,
    events: EventSink,
    format: ScreenFormat,
    window_size: Size,
    /// Effective size after format resolution
    render_size: Size,
    /// Used when no background is configured or an asset is missing
    fallback_color: Color,
    background: BackgroundKind,
    slots: SlotState,
    playback: PlaybackControl,
    /// Transition of the last presented update
    transition: TransitionType,
    controls: Option<DisplayControlsSettings>,
    /// Foreground video loaded and should play on present
    foreground_video: bool,
    /// Background image slots hidden behind a background video
    back_slots_hidden: bool,
    solid_cache: Option<(Color, Frame)>,
    empty_cache: Option<Frame>,
}

impl RenderTarget {
    /// Create a target for a window of `window_size` with the automatic format
    pub fn new(id: TargetId, window_size: Size, rasterizer: Arc<dyn ContentRasterizer>, events: EventSink) -> Self {
        Self {
            id,
            scene: None,
            rasterizer,
            events,
            format: ScreenFormat::default(),
            window_size,
            render_size: window_size,
            fallback_color: Color::TRANSPARENT,
            background: BackgroundKind::None,
            slots: SlotState::new(),
            playback: PlaybackControl::new(),
            transition: TransitionType::None,
            controls: None,
            foreground_video: false,
            back_slots_hidden: false,
            solid_cache: None,
            empty_cache: None,
        }
    }

    pub fn id(&self) -> TargetId {
        self.id
    }

    /// Whether a scene renderer is attached
    pub fn is_initialized(&self) -> bool {
        self.scene.is_some()
    }

    pub fn format(&self) -> &ScreenFormat {
        &self.format
    }

    pub fn window_size(&self) -> Size {
        self.window_size
    }

    /// Size content is rasterized and scaled to
    pub fn render_size(&self) -> Size {
        self.render_size
    }

    pub fn background(&self) -> &BackgroundKind {
        &self.background
    }

    pub fn slots(&self) -> &SlotState {
        &self.slots
    }

    pub fn playback(&self) -> &PlaybackControl {
        &self.playback
    }

    /// Transition used by the last update
    pub fn last_transition(&self) -> TransitionType {
        self.transition
    }

    /// Whether a foreground video is loaded
    pub fn in_foreground_video(&self) -> bool {
        self.foreground_video
    }

    pub fn fallback_color(&self) -> Color {
        self.fallback_color
    }

    pub fn set_fallback_color(&mut self, color: Color) {
        self.fallback_color = color;
    }

    pub(crate) fn emit(&self, event: DisplayEvent) {
        self.events.emit(event);
    }

    /// Attach the scene renderer; render calls are no-ops until this happens
    pub fn attach_scene(&mut self, mut scene: Box<dyn SceneRenderer>) {
        scene.set_root_size(self.render_size);
        if let Some(settings) = self.controls {
            scene.position_controls(place_controls(&settings, self.window_size));
        }
        self.scene = Some(scene);
        tracing::info!(target_id = %self.id, size = %self.render_size, "Scene attached");
    }

    /// Detach and return the scene renderer
    pub fn detach_scene(&mut self) -> Option<Box<dyn SceneRenderer>> {
        let scene = self.scene.take();
        if scene.is_some() {
            tracing::info!(target_id = %self.id, "Scene detached");
        }
        scene
    }

    /// Window or display size changed
    pub fn resize(&mut self, window_size: Size) {
        if window_size == self.window_size {
            return;
        }
        self.window_size = window_size;
        self.apply_format();
        if let (Some(settings), Some(scene)) = (self.controls, self.scene.as_deref_mut()) {
            scene.position_controls(place_controls(&settings, window_size));
        }
    }

    /// Change the output format and recompute the render size
    pub fn set_format(&mut self, format: ScreenFormat) {
        self.format = format;
        self.apply_format();
    }

    fn apply_format(&mut self) {
        let size = self.format.resolve(self.window_size);
        if size == self.render_size {
            return;
        }
        tracing::debug!(
            target_id = %self.id,
            window = %self.window_size,
            render = %size,
            preset = self.format.preset.name(),
            "Render size changed"
        );
        self.render_size = size;
        self.solid_cache = None;
        self.empty_cache = None;
        // The loaded background was scaled for the old size
        self.slots.background.invalidate();
        if let Some(scene) = self.scene.as_deref_mut() {
            scene.set_root_size(size);
        }
    }

    /// Show a plain caption; never fades
    pub fn render_passive_text(&mut self, text: &PassiveText, style: &StyleSettings) -> RenderOutcome {
        if self.scene.is_none() {
            return self.unavailable("passive");
        }
        self.foreground_video = false;
        let background = self.select_background(style);
        let overlay = if text.caption.is_empty() {
            self.empty_frame()
        } else {
            self.rasterize(Content::Passive(text), style)
        };
        self.present(background, overlay, TransitionType::None)
    }

    pub fn render_bible_text(&mut self, verse: &Verse, style: &StyleSettings) -> RenderOutcome {
        self.render_text(Content::Bible(verse), style)
    }

    pub fn render_song_text(&mut self, stanza: &Stanza, style: &StyleSettings) -> RenderOutcome {
        self.render_text(Content::Song(stanza), style)
    }

    pub fn render_announce_text(&mut self, announcement: &AnnounceSlide, style: &StyleSettings) -> RenderOutcome {
        self.render_text(Content::Announcement(announcement), style)
    }

    fn render_text(&mut self, content: Content<'_>, style: &StyleSettings) -> RenderOutcome {
        if self.scene.is_none() {
            return self.unavailable(content.kind_name());
        }
        self.foreground_video = false;
        let background = self.select_background(style);
        let overlay = self.rasterize(content, style);
        self.present(background, overlay, TransitionType::for_style(style))
    }

    /// Show a slide image full screen with an empty text layer
    pub fn render_slide_show(&mut self, slide: &Frame, settings: &SlideShowSettings) -> RenderOutcome {
        if self.scene.is_none() {
            return self.unavailable("slideshow");
        }
        self.foreground_video = false;
        self.stop_background_video_internal();
        let mode = if slide.size().fits_strictly_inside(self.render_size) && !settings.expand_small {
            FillMode::None
        } else {
            settings.fit_type.fill_mode()
        };
        self.background = BackgroundKind::StaticImage;
        let overlay = self.empty_frame();
        self.present(Some((slide.clone(), mode)), overlay, TransitionType::Fade)
    }

    /// Play a video in the foreground over a cleared background
    pub fn render_video(&mut self, video: &VideoInfo) -> RenderOutcome {
        if self.scene.is_none() {
            return self.unavailable("video");
        }
        self.stop_background_video_internal();
        let background = self.fallback_background();
        let overlay = self.empty_frame();

        if video.file_path.exists() {
            if let Some(scene) = self.scene.as_deref_mut() {
                scene.set_video_source(&video.file_path, VideoMode::foreground());
            }
            self.foreground_video = true;
            tracing::info!(target_id = %self.id, path = %video.file_path.display(), name = %video.name, "Playing video");
        } else {
            let error = RenderError::MissingAsset(video.file_path.clone());
            tracing::warn!(target_id = %self.id, %error, "Video not played");
            self.foreground_video = false;
        }
        self.present(Some((background, FillMode::Stretch)), overlay, TransitionType::None)
    }

    /// Clear the text layer and keep the background
    pub fn render_not_text(&mut self) -> RenderOutcome {
        if self.scene.is_none() {
            return self.unavailable("not-text");
        }
        let overlay = self.empty_frame();
        self.present(None, overlay, self.transition)
    }

    fn unavailable(&self, kind: &str) -> RenderOutcome {
        tracing::debug!(target_id = %self.id, kind, "No scene attached, skipping render");
        RenderOutcome::Skipped(RenderError::RendererUnavailable)
    }

    /// Decide the background for a text update
    ///
    /// Returns `None` when a background video carries the background and the
    /// image slots must be left alone.
    fn select_background(&mut self, style: &StyleSettings) -> Option<(Frame, FillMode)> {
        if let Some(path) = style.video_background() {
            if path.exists() {
                if let Some(scene) = self.scene.as_deref_mut() {
                    self.playback.set_background_video(
                        scene,
                        path,
                        style.background_video_loop,
                        style.background_video_fill,
                    );
                }
                self.background = BackgroundKind::LoopingVideo(path.clone());
                return None;
            }
            let error = RenderError::MissingAsset(path.clone());
            tracing::warn!(target_id = %self.id, %error, "Background video unavailable, using fallback color");
            self.stop_background_video_internal();
            return Some((self.fallback_background(), FillMode::Stretch));
        }

        self.stop_background_video_internal();
        let frame = match (style.background_type, &style.background_image) {
            (BackgroundType::Picture, Some(image)) => {
                self.background = BackgroundKind::StaticImage;
                image.clone()
            }
            (BackgroundType::Picture, None) => {
                tracing::warn!(target_id = %self.id, "Background picture not set, using fallback color");
                self.fallback_background()
            }
            (BackgroundType::SolidColor, _) => {
                self.background = BackgroundKind::SolidColor(style.background_color);
                self.solid_frame(style.background_color)
            }
            (BackgroundType::None | BackgroundType::Video, _) => self.fallback_background(),
        };
        Some((frame, FillMode::Stretch))
    }

    fn fallback_background(&mut self) -> Frame {
        self.background = BackgroundKind::SolidColor(self.fallback_color);
        self.solid_frame(self.fallback_color)
    }

    /// Solid frame for `color`, reused while color and size stay the same
    fn solid_frame(&mut self, color: Color) -> Frame {
        match &self.solid_cache {
            Some((cached, frame)) if *cached == color && frame.size() == self.render_size => frame.clone(),
            _ => {
                let frame = Frame::solid(color, self.render_size);
                self.solid_cache = Some((color, frame.clone()));
                frame
            }
        }
    }

    fn empty_frame(&mut self) -> Frame {
        match &self.empty_cache {
            Some(frame) if frame.size() == self.render_size => frame.clone(),
            _ => {
                let frame = Frame::empty(self.render_size);
                self.empty_cache = Some(frame.clone());
                frame
            }
        }
    }

    fn rasterize(&mut self, content: Content<'_>, style: &StyleSettings) -> Frame {
        match self.rasterizer.rasterize(content, style, self.render_size) {
            Ok(frame) => frame,
            Err(err) => {
                let error = match err {
                    RenderError::RasterizationFailure(_) => err,
                    other => RenderError::RasterizationFailure(other.to_string()),
                };
                tracing::warn!(target_id = %self.id, kind = content.kind_name(), %error, "Showing blank text");
                self.empty_frame()
            }
        }
    }

    fn stop_background_video_internal(&mut self) {
        if let Some(scene) = self.scene.as_deref_mut() {
            self.playback.stop_background_video(scene);
        }
    }

    /// Load the hidden slots and run the handoff
    fn present(
        &mut self,
        background: Option<(Frame, FillMode)>,
        text: Frame,
        transition: TransitionType,
    ) -> RenderOutcome {
        let render_size = self.render_size;
        let Some(scene) = self.scene.as_deref_mut() else {
            return RenderOutcome::Skipped(RenderError::RendererUnavailable);
        };

        let back_update = background
            .as_ref()
            .map(|(frame, _)| self.slots.background.update(frame))
            .unwrap_or(SlotUpdate::Unchanged);
        self.slots.is_new_background = back_update.changed();
        let (text_slot, text_direction) = self.slots.text.flip(&text);

        TransitionCommand::cancel_running(scene);

        let hide_back = background.is_none() && matches!(self.background, BackgroundKind::LoopingVideo(_));
        if hide_back != self.back_slots_hidden && (hide_back || background.is_some()) {
            for slot in [ImageSlot::Back1, ImageSlot::Back2] {
                scene.set_slot_visible(slot, !hide_back);
            }
            self.back_slots_hidden = hide_back;
        }

        if let (SlotUpdate::Flipped { slot, .. }, Some((frame, mode))) = (back_update, &background) {
            let scaled = match scale(frame, render_size, *mode) {
                Ok(scaled) => scaled,
                Err(error) => {
                    tracing::warn!(target_id = %self.id, %error, "Background not scaled");
                    frame.clone()
                }
            };
            scene.set_slot_image(ImageSlot::background(slot), &scaled, centered_origin(scaled.size(), render_size));
        }
        scene.set_slot_image(ImageSlot::text(text_slot), &text, (0, 0));

        if self.foreground_video {
            self.playback.play(scene);
        } else if self.playback.state() != PlaybackState::Stopped {
            self.playback.stop(scene);
        }

        let command = TransitionCommand {
            transition,
            background: back_update.direction(),
            text: text_direction,
        };
        command.start(scene);
        self.transition = transition;

        tracing::debug!(
            target_id = %self.id,
            transition = transition.name(),
            background = command.background.map(|d| d.name()),
            text = text_direction.name(),
            "Presented update"
        );
        RenderOutcome::Presented {
            background_changed: self.slots.is_new_background,
        }
    }

    pub fn play(&mut self) {
        if let Some(scene) = self.scene.as_deref_mut() {
            self.playback.play(scene);
        }
    }

    pub fn pause(&mut self) {
        if let Some(scene) = self.scene.as_deref_mut() {
            self.playback.pause(scene);
        }
    }

    pub fn stop(&mut self) {
        if let Some(scene) = self.scene.as_deref_mut() {
            self.playback.stop(scene);
        }
    }

    /// Volume from 0 to 100
    pub fn set_volume(&mut self, level: u8) {
        if let Some(scene) = self.scene.as_deref_mut() {
            self.playback.set_volume(scene, level);
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        if let Some(scene) = self.scene.as_deref_mut() {
            self.playback.set_muted(scene, muted);
        }
    }

    pub fn seek(&mut self, position_ms: i64) {
        if let Some(scene) = self.scene.as_deref_mut() {
            self.playback.seek(scene, position_ms);
        }
    }

    /// Start a background video directly; `false` if it was already playing
    pub fn set_background_video(&mut self, path: &Path, looping: bool, fill: FillMode) -> bool {
        let Some(scene) = self.scene.as_deref_mut() else {
            return false;
        };
        let started = self.playback.set_background_video(scene, path, looping, fill);
        self.background = BackgroundKind::LoopingVideo(path.to_path_buf());
        started
    }

    pub fn stop_background_video(&mut self) -> bool {
        match self.scene.as_deref_mut() {
            Some(scene) => self.playback.stop_background_video(scene),
            None => false,
        }
    }

    pub fn pause_background_video(&mut self) {
        if let Some(scene) = self.scene.as_deref_mut() {
            self.playback.pause_background_video(scene);
        }
    }

    pub fn resume_background_video(&mut self) {
        if let Some(scene) = self.scene.as_deref_mut() {
            self.playback.resume_background_video(scene);
        }
    }

    pub fn set_logo_overlay(&mut self, path: Option<&Path>) -> Result<(), RenderError> {
        let scene = self.scene.as_deref_mut().ok_or(RenderError::RendererUnavailable)?;
        self.playback.set_logo_overlay(scene, path)
    }

    pub fn set_lower_third_config(&mut self, config: LowerThirdConfig) {
        if let Some(scene) = self.scene.as_deref_mut() {
            self.playback.set_lower_third_config(scene, config);
        }
    }

    pub fn show_lower_third(&mut self, text: &str) {
        if let Some(scene) = self.scene.as_deref_mut() {
            self.playback.show_lower_third(scene, text);
        }
    }

    pub fn hide_lower_third(&mut self) {
        if let Some(scene) = self.scene.as_deref_mut() {
            self.playback.hide_lower_third(scene);
        }
    }

    /// Place the navigation controls; remembered for later resizes
    pub fn position_controls(&mut self, settings: DisplayControlsSettings) {
        self.controls = Some(settings);
        if let Some(scene) = self.scene.as_deref_mut() {
            scene.position_controls(place_controls(&settings, self.window_size));
        }
    }

    pub fn set_controls_visible(&mut self, visible: bool) {
        if let Some(scene) = self.scene.as_deref_mut() {
            scene.set_controls_visible(visible);
        }
    }

    /// Feed a raw signal from the scene renderer
    pub fn handle_scene_signal(&mut self, signal: SceneSignal) {
        match signal {
            SceneSignal::PlaybackStateChanged(raw) => self.playback.observe_state(PlaybackState::from_raw(raw)),
            SceneSignal::PlaybackStopped => {
                self.foreground_video = false;
                self.playback.observe_state(PlaybackState::Stopped);
            }
            _ => {}
        }
        self.events.emit(signal.into());
    }

    /// Handle a released key; returns whether it was consumed
    pub fn handle_key(&mut self, key: Key) -> bool {
        match key_action(key) {
            Some(event) => {
                self.events.emit(event);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::BlankRasterizer;
    use crate::events::TargetEvent;
    use crate::render::{FormatPreset, SlotDirection};
    use crate::scene::{RecordingScene, SceneCall, SceneLog};
    use crate::settings::SlideFit;
    use crossbeam_channel::Receiver;

    struct FailingRasterizer;

    impl ContentRasterizer for FailingRasterizer {
        fn rasterize(&self, _content: Content<'_>, _style: &StyleSettings, _size: Size) -> Result<Frame, RenderError> {
            Err(RenderError::RasterizationFailure("bad font".to_string()))
        }
    }

    fn target_with(rasterizer: Arc<dyn ContentRasterizer>) -> (RenderTarget, SceneLog, Receiver<TargetEvent>) {
        let (sink, rx) = EventSink::detached(TargetId::PRIMARY);
        let mut target = RenderTarget::new(TargetId::PRIMARY, Size::new(64, 36), rasterizer, sink);
        let scene = RecordingScene::new();
        let log = scene.log();
        target.attach_scene(Box::new(scene));
        log.clear();
        (target, log, rx)
    }

    fn target() -> (RenderTarget, SceneLog, Receiver<TargetEvent>) {
        target_with(Arc::new(BlankRasterizer))
    }

    fn verse() -> Verse {
        Verse {
            primary_text: "For God so loved the world".to_string(),
            primary_caption: "John 3:16".to_string(),
            ..Default::default()
        }
    }

    fn transitions(log: &SceneLog) -> Vec<SceneCall> {
        log.calls()
            .into_iter()
            .filter(|c| {
                matches!(
                    c,
                    SceneCall::StopTransitions | SceneCall::TransitionBack(..) | SceneCall::TransitionText(..)
                )
            })
            .collect()
    }

    #[test]
    fn test_target_id_display() {
        assert_eq!(TargetId::PRIMARY.to_string(), "Display 1");
        assert_eq!(TargetId::Virtual.to_string(), "Virtual Output");
        assert_eq!(TargetId::Display(3).display_index(), Some(2));
        assert_eq!(TargetId::Display(5).display_index(), None);
        assert_eq!(TargetId::from_display_index(3), Some(TargetId::Display(4)));
        assert_eq!(TargetId::from_display_index(4), None);
    }

    #[test]
    fn test_identical_background_does_not_flip() {
        let (mut target, log, _rx) = target();
        let style = StyleSettings::default().with_background_image(Frame::solid(Color::rgb(10, 20, 30), Size::new(8, 8)));

        assert!(target.render_bible_text(&verse(), &style).background_changed());
        assert!(target.slots().background_front_is_slot2());
        assert!(target.slots().text_front_is_slot2());

        log.clear();
        let outcome = target.render_bible_text(&verse(), &style);
        assert_eq!(outcome, RenderOutcome::Presented { background_changed: false });
        assert!(target.slots().background_front_is_slot2());
        assert!(!target.slots().text_front_is_slot2());
        assert_eq!(
            transitions(&log),
            vec![
                SceneCall::StopTransitions,
                SceneCall::TransitionText(SlotDirection::TwoToOne, TransitionType::Fade),
            ]
        );
    }

    #[test]
    fn test_new_background_transitions_both() {
        let (mut target, log, _rx) = target();
        let style = StyleSettings::default().with_solid_color(Color::rgb(0, 0, 128));
        target.render_song_text(&Stanza::default(), &style);
        assert_eq!(
            transitions(&log),
            vec![
                SceneCall::StopTransitions,
                SceneCall::TransitionBack(SlotDirection::OneToTwo, TransitionType::Fade),
                SceneCall::TransitionText(SlotDirection::OneToTwo, TransitionType::Fade),
            ]
        );
        assert_eq!(target.background(), &BackgroundKind::SolidColor(Color::rgb(0, 0, 128)));
    }

    #[test]
    fn test_stop_transitions_before_loading_slots() {
        let (mut target, log, _rx) = target();
        target.render_announce_text(&AnnounceSlide::default(), &StyleSettings::default());
        let calls = log.calls();
        assert_eq!(calls[0], SceneCall::StopTransitions);
        assert!(matches!(calls[1], SceneCall::SetSlotImage { slot: ImageSlot::Back2, .. }));
        assert!(matches!(calls[2], SceneCall::SetSlotImage { slot: ImageSlot::Text2, .. }));
    }

    #[test]
    fn test_solid_background_is_reused() {
        let (mut target, _log, _rx) = target();
        let style = StyleSettings::default();
        target.render_bible_text(&verse(), &style);
        let key = target.slots().last_background_key();
        assert!(!target.render_song_text(&Stanza::default(), &style).background_changed());
        assert_eq!(target.slots().last_background_key(), key);
        assert_eq!(target.background(), &BackgroundKind::SolidColor(Color::TRANSPARENT));
    }

    #[test]
    fn test_passive_text_never_fades() {
        let (mut target, log, _rx) = target();
        let text = PassiveText {
            caption: "Welcome".to_string(),
        };
        target.render_passive_text(&text, &StyleSettings::default());
        assert_eq!(target.last_transition(), TransitionType::None);
        assert!(log
            .calls()
            .contains(&SceneCall::TransitionText(SlotDirection::OneToTwo, TransitionType::None)));
    }

    #[test]
    fn test_sequential_transition() {
        let (mut target, _log, _rx) = target();
        let mut style = StyleSettings::default();
        style.sequential_transition = true;
        target.render_bible_text(&verse(), &style);
        assert_eq!(target.last_transition(), TransitionType::Sequence);
        style.use_fading = false;
        target.render_bible_text(&verse(), &style);
        assert_eq!(target.last_transition(), TransitionType::None);
    }

    #[test]
    fn test_rasterization_failure_shows_blank_text() {
        let (mut target, log, _rx) = target_with(Arc::new(FailingRasterizer));
        let outcome = target.render_bible_text(&verse(), &StyleSettings::default());
        assert!(outcome.is_presented());
        let text_size = log.calls().into_iter().find_map(|c| match c {
            SceneCall::SetSlotImage {
                slot: ImageSlot::Text2,
                size,
                ..
            } => Some(size),
            _ => None,
        });
        assert_eq!(text_size, Some(Size::new(64, 36)));
    }

    #[test]
    fn test_missing_background_video_falls_back() {
        let (mut target, log, _rx) = target();
        target.set_fallback_color(Color::BLACK);
        let style = StyleSettings::default().with_background_video("/no/such/loop.mp4");
        let outcome = target.render_bible_text(&verse(), &style);
        assert!(outcome.background_changed());
        assert_eq!(target.background(), &BackgroundKind::SolidColor(Color::BLACK));
        assert_eq!(log.count(|c| matches!(c, SceneCall::SetBackgroundVideo { .. })), 0);
    }

    #[test]
    fn test_background_video_keeps_slots() {
        let (mut target, log, _rx) = target();
        let path = std::env::temp_dir().join("projector-display-target-loop.mp4");
        std::fs::write(&path, b"loop").unwrap();
        let style = StyleSettings::default().with_background_video(&path);

        let outcome = target.render_bible_text(&verse(), &style);
        target.render_bible_text(&verse(), &style);

        assert!(!outcome.background_changed());
        assert!(!target.slots().background_front_is_slot2());
        assert_eq!(target.background(), &BackgroundKind::LoopingVideo(path.clone()));
        assert_eq!(log.count(|c| matches!(c, SceneCall::SetBackgroundVideo { .. })), 1);

        // Switching away stops the loop
        target.render_bible_text(&verse(), &StyleSettings::default());
        assert_eq!(log.count(|c| *c == SceneCall::StopBackgroundVideo), 1);
        assert!(target.playback().background_video().is_none());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_uninitialized_target_is_noop() {
        let (sink, _rx) = EventSink::detached(TargetId::Display(2));
        let mut target = RenderTarget::new(TargetId::Display(2), Size::new(64, 36), Arc::new(BlankRasterizer), sink);
        let outcome = target.render_bible_text(&verse(), &StyleSettings::default());
        assert_eq!(outcome, RenderOutcome::Skipped(RenderError::RendererUnavailable));
        assert_eq!(target.render_not_text(), RenderOutcome::Skipped(RenderError::RendererUnavailable));
        assert!(!target.slots().text_front_is_slot2());
        assert!(matches!(target.set_logo_overlay(None), Err(RenderError::RendererUnavailable)));
    }

    #[test]
    fn test_not_text_keeps_background() {
        let (mut target, log, _rx) = target();
        target.render_bible_text(&verse(), &StyleSettings::default());
        log.clear();
        let outcome = target.render_not_text();
        assert_eq!(outcome, RenderOutcome::Presented { background_changed: false });
        assert_eq!(log.count(|c| matches!(c, SceneCall::TransitionBack(..))), 0);
        assert_eq!(
            log.count(|c| matches!(c, SceneCall::SetSlotImage { slot: ImageSlot::Text1, .. })),
            1
        );
    }

    #[test]
    fn test_slide_show_fill_modes() {
        let (mut target, log, _rx) = target();
        let small = Frame::solid(Color::WHITE, Size::new(16, 9));
        let mut settings = SlideShowSettings {
            expand_small: false,
            fit_type: SlideFit::Fit,
        };

        target.render_slide_show(&small, &settings);
        assert!(log.calls().contains(&SceneCall::SetSlotImage {
            slot: ImageSlot::Back2,
            key: small.key(),
            size: Size::new(16, 9),
            origin: (24, 13),
        }));
        assert_eq!(target.last_transition(), TransitionType::Fade);

        log.clear();
        settings.expand_small = true;
        let small = Frame::solid(Color::WHITE, Size::new(16, 16));
        target.render_slide_show(&small, &settings);
        let placed = log.calls().into_iter().find_map(|c| match c {
            SceneCall::SetSlotImage {
                slot: ImageSlot::Back1,
                size,
                origin,
                ..
            } => Some((size, origin)),
            _ => None,
        });
        assert_eq!(placed, Some((Size::new(36, 36), (14, 0))));

        log.clear();
        settings.fit_type = SlideFit::Fill;
        let tall = Frame::solid(Color::WHITE, Size::new(100, 200));
        target.render_slide_show(&tall, &settings);
        let placed = log.calls().into_iter().find_map(|c| match c {
            SceneCall::SetSlotImage {
                slot: ImageSlot::Back2,
                size,
                origin,
                ..
            } => Some((size, origin)),
            _ => None,
        });
        assert_eq!(placed, Some((Size::new(64, 128), (0, -46))));
    }

    #[test]
    fn test_video_guard() {
        let (mut target, log, rx) = target();
        let path = std::env::temp_dir().join("projector-display-target-video.mp4");
        std::fs::write(&path, b"video").unwrap();
        let video = VideoInfo {
            file_path: path.clone(),
            name: "Intro".to_string(),
        };

        target.render_video(&video);
        assert!(target.in_foreground_video());
        assert_eq!(target.playback().state(), PlaybackState::Playing);
        assert!(log
            .calls()
            .contains(&SceneCall::SetVideoSource(path.clone(), VideoMode::foreground())));
        assert_eq!(target.last_transition(), TransitionType::None);

        // Any other content stops the foreground video
        log.clear();
        target.render_bible_text(&verse(), &StyleSettings::default());
        assert!(!target.in_foreground_video());
        assert_eq!(log.count(|c| *c == SceneCall::StopVideo), 1);
        assert_eq!(target.playback().state(), PlaybackState::Stopped);

        target.render_video(&video);
        target.handle_scene_signal(SceneSignal::PlaybackStopped);
        assert!(!target.in_foreground_video());
        let events: Vec<_> = rx.try_iter().map(|e| e.event).collect();
        assert_eq!(events, vec![DisplayEvent::VideoStopped]);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_video_is_not_played() {
        let (mut target, log, _rx) = target();
        let outcome = target.render_video(&VideoInfo {
            file_path: PathBuf::from("/no/such/video.mp4"),
            name: String::new(),
        });
        assert!(outcome.is_presented());
        assert!(!target.in_foreground_video());
        assert_eq!(log.count(|c| matches!(c, SceneCall::SetVideoSource(..))), 0);
        assert_eq!(log.count(|c| *c == SceneCall::PlayVideo), 0);
    }

    #[test]
    fn test_format_changes_render_size() {
        let (sink, _rx) = EventSink::detached(TargetId::PRIMARY);
        let mut target = RenderTarget::new(TargetId::PRIMARY, Size::new(2000, 1000), Arc::new(BlankRasterizer), sink);
        let scene = RecordingScene::new();
        let log = scene.log();
        target.attach_scene(Box::new(scene));

        target.set_format(ScreenFormat::new(FormatPreset::Hd16x9));
        assert_eq!(target.render_size(), Size::new(1777, 1000));
        assert!(log.calls().contains(&SceneCall::SetRootSize(Size::new(1777, 1000))));

        target.resize(Size::new(1920, 1080));
        assert_eq!(target.render_size(), Size::new(1920, 1080));
    }

    #[test]
    fn test_resize_reloads_picture_background() {
        let (mut target, log, _rx) = target();
        let picture = Frame::solid(Color::rgb(200, 100, 0), Size::new(16, 9));
        let style = StyleSettings::default().with_background_image(picture.clone());
        target.render_bible_text(&verse(), &style);

        target.resize(Size::new(128, 72));
        log.clear();
        let outcome = target.render_bible_text(&verse(), &style);

        assert_eq!(outcome, RenderOutcome::Presented { background_changed: true });
        let loaded = log.calls().into_iter().find_map(|c| match c {
            SceneCall::SetSlotImage {
                slot: ImageSlot::Back1,
                key,
                size,
                ..
            } => Some((key, size)),
            _ => None,
        });
        assert_eq!(loaded.map(|(_, size)| size), Some(Size::new(128, 72)));
        assert_ne!(loaded.map(|(key, _)| key), Some(picture.key()));
        assert_eq!(target.slots().last_background_key(), Some(picture.key()));
    }

    #[test]
    fn test_background_video_hides_image_slots() {
        let (mut target, log, _rx) = target();
        let path = std::env::temp_dir().join("projector-display-target-hidden.mp4");
        std::fs::write(&path, b"loop").unwrap();
        let style = StyleSettings::default().with_background_video(&path);
        let visibility = |log: &SceneLog| -> Vec<SceneCall> {
            log.calls()
                .into_iter()
                .filter(|c| matches!(c, SceneCall::SetSlotVisible(..)))
                .collect()
        };

        target.render_bible_text(&verse(), &style);
        target.render_not_text();
        assert_eq!(
            visibility(&log),
            vec![
                SceneCall::SetSlotVisible(ImageSlot::Back1, false),
                SceneCall::SetSlotVisible(ImageSlot::Back2, false),
            ]
        );

        log.clear();
        target.render_bible_text(&verse(), &StyleSettings::default());
        assert_eq!(
            visibility(&log),
            vec![
                SceneCall::SetSlotVisible(ImageSlot::Back1, true),
                SceneCall::SetSlotVisible(ImageSlot::Back2, true),
            ]
        );
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_controls_follow_resize() {
        let (mut target, log, _rx) = target();
        target.position_controls(DisplayControlsSettings::default());
        target.resize(Size::new(1920, 1080));
        let placements: Vec<_> = log
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                SceneCall::PositionControls(p) => Some((p.x, p.y)),
                _ => None,
            })
            .collect();
        assert_eq!(placements.last(), Some(&(878, 1012)));
    }

    #[test]
    fn test_keys_emit_navigation() {
        let (mut target, _log, rx) = target();
        assert!(target.handle_key(Key::PageDown));
        assert!(target.handle_key(Key::Escape));
        assert!(!target.handle_key(Key::Other));
        let events: Vec<_> = rx.try_iter().map(|e| e.event).collect();
        assert_eq!(events, vec![DisplayEvent::NextSlide, DisplayEvent::ExitSlide]);
    }

    #[test]
    fn test_playback_signals_update_state() {
        let (mut target, _log, rx) = target();
        target.handle_scene_signal(SceneSignal::PlaybackStateChanged(1));
        assert_eq!(target.playback().state(), PlaybackState::Playing);
        target.handle_scene_signal(SceneSignal::PositionChanged(2500));
        let events: Vec<_> = rx.try_iter().map(|e| e.event).collect();
        assert_eq!(
            events,
            vec![
                DisplayEvent::VideoPlaybackStateChanged(PlaybackState::Playing),
                DisplayEvent::VideoPositionChanged(std::time::Duration::from_millis(2500)),
            ]
        );
    }
}

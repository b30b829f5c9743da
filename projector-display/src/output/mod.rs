//! Output module for multi-display rendering
//!
//! Handles the display targets, the virtual output, physical display
//! assignment and fan-out of content to every active surface.

mod assignment;
mod controls;
mod target;
mod virtual_output;

pub use assignment::{ActiveChange, AssignmentError, DisplayAssignment};
pub use controls::{button_size_px, place_controls, CONTROLS_MARGIN};
pub use target::{BackgroundKind, RenderTarget, TargetId, MAX_DISPLAY_TARGETS};
pub use virtual_output::{VirtualOutput, VirtualResolution};

use std::path::Path;
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};

use crate::config::DisplayConfig;
use crate::content::{AnnounceSlide, ContentRasterizer, PassiveText, Stanza, Verse, VideoInfo};
use crate::error::{RenderError, RenderOutcome};
use crate::events::{event_channel, DisplayEvent, EventSink, Key, TargetEvent};
use crate::frame::{Frame, Size};
use crate::playback::LowerThirdConfig;
use crate::render::{FillMode, ScreenFormat};
use crate::scene::{SceneRenderer, SceneSignal};
use crate::settings::{DisplayControlsSettings, SlideShowSettings, StyleSet};

/// Window size used for a target without a physical display
const DEFAULT_WINDOW: Size = Size::new(1920, 1080);

/// Manages all render targets
pub struct OutputManager {
    /// Display targets, index 0 is the primary display
    displays: Vec<RenderTarget>,
    virtual_output: VirtualOutput,
    assignment: DisplayAssignment,
    /// Sizes of the connected physical displays
    screen_sizes: Vec<Size>,
    controls: DisplayControlsSettings,
    events_tx: Sender<TargetEvent>,
    events_rx: Receiver<TargetEvent>,
}

impl OutputManager {
    /// Create a manager for the given physical displays
    ///
    /// The primary target is assigned to the first display; secondary
    /// targets and the virtual output start switched off.
    pub fn new(rasterizer: Arc<dyn ContentRasterizer>, screen_sizes: Vec<Size>) -> Self {
        let (events_tx, events_rx) = event_channel();
        let assignment = DisplayAssignment::new(screen_sizes.len());
        let displays = (0..MAX_DISPLAY_TARGETS as usize)
            .filter_map(TargetId::from_display_index)
            .map(|id| {
                let window = assignment
                    .assigned(id)
                    .and_then(|screen| screen_sizes.get(screen).copied())
                    .unwrap_or(DEFAULT_WINDOW);
                RenderTarget::new(id, window, rasterizer.clone(), EventSink::new(id, events_tx.clone()))
            })
            .collect();
        let virtual_output = VirtualOutput::new(rasterizer, EventSink::new(TargetId::Virtual, events_tx.clone()));

        tracing::info!(screens = screen_sizes.len(), "Output manager created");
        Self {
            displays,
            virtual_output,
            assignment,
            screen_sizes,
            controls: DisplayControlsSettings::default(),
            events_tx,
            events_rx,
        }
    }

    /// Create a manager and apply a configuration
    pub fn with_config(rasterizer: Arc<dyn ContentRasterizer>, screen_sizes: Vec<Size>, config: &DisplayConfig) -> Self {
        let mut manager = Self::new(rasterizer, screen_sizes);
        manager.apply_config(config);
        manager
    }

    /// Apply formats, display assignment, controls and virtual output settings
    ///
    /// Invalid assignments are logged and left unassigned.
    pub fn apply_config(&mut self, config: &DisplayConfig) {
        for (index, entry) in config.displays.iter().enumerate().take(self.displays.len()) {
            let target = &mut self.displays[index];
            target.set_format(entry.format);
            target.set_fallback_color(entry.fallback_color);
        }

        for (index, entry) in config.displays.iter().enumerate().take(self.displays.len()) {
            let Some(id) = TargetId::from_display_index(index) else {
                continue;
            };
            let screen = match (index, entry.screen) {
                (0, None) => Some(0),
                (_, screen) => screen,
            };
            if self.assignment.assigned(id) == screen {
                continue;
            }
            if let Err(e) = self.assign_display(id, screen) {
                tracing::warn!("Display assignment from configuration ignored: {}", e);
            }
        }

        self.position_controls(config.controls);

        let virtual_config = &config.virtual_output;
        if let Err(e) = self.virtual_output.set_resolution(virtual_config.resolution) {
            tracing::warn!("Virtual output resolution ignored: {}", e);
        }
        self.virtual_output
            .set_theme(virtual_config.mirror_primary, virtual_config.theme_id);
        if let Err(e) = self.virtual_output.set_logo_overlay(virtual_config.logo.as_deref()) {
            tracing::warn!("Virtual output logo ignored: {}", e);
        }
        self.virtual_output.set_enabled(virtual_config.enabled);
        tracing::info!(active = ?self.assignment.active_targets(), "Display configuration applied");
    }

    /// Sender for events raised outside the targets
    pub fn event_sender(&self) -> Sender<TargetEvent> {
        self.events_tx.clone()
    }

    /// All events emitted since the last call, in emission order
    pub fn drain_events(&self) -> Vec<TargetEvent> {
        self.events_rx.try_iter().collect()
    }

    pub fn assignment(&self) -> &DisplayAssignment {
        &self.assignment
    }

    pub fn virtual_output(&self) -> &VirtualOutput {
        &self.virtual_output
    }

    pub fn virtual_output_mut(&mut self) -> &mut VirtualOutput {
        &mut self.virtual_output
    }

    /// Look up a target by id
    pub fn target(&self, id: TargetId) -> Option<&RenderTarget> {
        match id {
            TargetId::Virtual => Some(self.virtual_output.target()),
            TargetId::Display(_) => id.display_index().and_then(|i| self.displays.get(i)),
        }
    }

    pub fn target_mut(&mut self, id: TargetId) -> Option<&mut RenderTarget> {
        match id {
            TargetId::Virtual => Some(self.virtual_output.target_mut()),
            TargetId::Display(_) => id.display_index().and_then(|i| self.displays.get_mut(i)),
        }
    }

    /// Whether a target receives content
    pub fn is_active(&self, id: TargetId) -> bool {
        match id {
            TargetId::Virtual => self.virtual_output.is_enabled(),
            TargetId::Display(_) => self.assignment.is_active(id),
        }
    }

    /// Attach the scene renderer of a target
    pub fn attach_scene(&mut self, id: TargetId, scene: Box<dyn SceneRenderer>) -> Result<(), RenderError> {
        match id {
            TargetId::Virtual => self.virtual_output.initialize(Some(scene)),
            TargetId::Display(_) => {
                let target = self.target_mut(id).ok_or(RenderError::TargetDisabled)?;
                target.attach_scene(scene);
                Ok(())
            }
        }
    }

    /// Assign a physical display to a display target
    pub fn assign_display(&mut self, id: TargetId, screen: Option<usize>) -> Result<(), AssignmentError> {
        let changes = self.assignment.assign(id, screen)?;
        if let Some(size) = screen.and_then(|s| self.screen_sizes.get(s).copied()) {
            if let Some(target) = self.target_mut(id) {
                target.resize(size);
            }
        }
        self.publish_changes(&changes);
        Ok(())
    }

    /// Physical displays were added, removed or resized
    pub fn set_screens(&mut self, screen_sizes: Vec<Size>) {
        let changes = self.assignment.set_display_count(screen_sizes.len());
        self.screen_sizes = screen_sizes;
        for index in 0..self.displays.len() {
            let size = TargetId::from_display_index(index)
                .and_then(|id| self.assignment.assigned(id))
                .and_then(|screen| self.screen_sizes.get(screen).copied());
            if let Some(size) = size {
                self.displays[index].resize(size);
            }
        }
        tracing::info!(screens = self.screen_sizes.len(), "Screens changed");
        self.publish_changes(&changes);
    }

    fn publish_changes(&self, changes: &[ActiveChange]) {
        for change in changes {
            if let Some(target) = self.target(change.target) {
                target.emit(DisplayEvent::EnabledChanged(change.active));
            }
        }
    }

    /// Change the format of one target
    pub fn set_format(&mut self, id: TargetId, format: ScreenFormat) {
        if let Some(target) = self.target_mut(id) {
            target.set_format(format);
        }
    }

    /// Window of a target was resized
    pub fn resize(&mut self, id: TargetId, size: Size) {
        if let Some(target) = self.target_mut(id) {
            target.resize(size);
        }
    }

    /// Run `render` on every target, with disabled ones reported as skipped
    fn fan_out(
        &mut self,
        mut render: impl FnMut(&mut RenderTarget) -> RenderOutcome,
    ) -> Vec<(TargetId, RenderOutcome)> {
        let mut outcomes = Vec::with_capacity(self.displays.len() + 1);
        for target in &mut self.displays {
            let id = target.id();
            let outcome = if self.assignment.is_active(id) {
                render(target)
            } else {
                RenderOutcome::Skipped(RenderError::TargetDisabled)
            };
            outcomes.push((id, outcome));
        }
        outcomes.push((TargetId::Virtual, self.virtual_output.render_with(&mut render)));
        outcomes
    }

    /// Run `f` on every active target
    fn for_each_active(&mut self, mut f: impl FnMut(&mut RenderTarget)) {
        for target in &mut self.displays {
            if self.assignment.is_active(target.id()) {
                f(target);
            }
        }
        if self.virtual_output.is_enabled() {
            f(self.virtual_output.target_mut());
        }
    }

    pub fn render_passive_text(&mut self, text: &PassiveText, styles: &StyleSet) -> Vec<(TargetId, RenderOutcome)> {
        let mirror = self.virtual_output.is_mirroring_primary();
        self.fan_out(|target| target.render_passive_text(text, styles.resolve(target.id(), mirror)))
    }

    pub fn render_bible_text(&mut self, verse: &Verse, styles: &StyleSet) -> Vec<(TargetId, RenderOutcome)> {
        let mirror = self.virtual_output.is_mirroring_primary();
        self.fan_out(|target| target.render_bible_text(verse, styles.resolve(target.id(), mirror)))
    }

    pub fn render_song_text(&mut self, stanza: &Stanza, styles: &StyleSet) -> Vec<(TargetId, RenderOutcome)> {
        let mirror = self.virtual_output.is_mirroring_primary();
        self.fan_out(|target| target.render_song_text(stanza, styles.resolve(target.id(), mirror)))
    }

    pub fn render_announce_text(
        &mut self,
        announcement: &AnnounceSlide,
        styles: &StyleSet,
    ) -> Vec<(TargetId, RenderOutcome)> {
        let mirror = self.virtual_output.is_mirroring_primary();
        self.fan_out(|target| target.render_announce_text(announcement, styles.resolve(target.id(), mirror)))
    }

    pub fn render_slide_show(&mut self, slide: &Frame, settings: &SlideShowSettings) -> Vec<(TargetId, RenderOutcome)> {
        self.fan_out(|target| target.render_slide_show(slide, settings))
    }

    pub fn render_video(&mut self, video: &VideoInfo) -> Vec<(TargetId, RenderOutcome)> {
        self.fan_out(|target| target.render_video(video))
    }

    pub fn render_not_text(&mut self) -> Vec<(TargetId, RenderOutcome)> {
        self.fan_out(|target| target.render_not_text())
    }

    pub fn play(&mut self) {
        self.for_each_active(|target| target.play());
    }

    pub fn pause(&mut self) {
        self.for_each_active(|target| target.pause());
    }

    pub fn stop(&mut self) {
        self.for_each_active(|target| target.stop());
    }

    pub fn set_volume(&mut self, level: u8) {
        self.for_each_active(|target| target.set_volume(level));
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.for_each_active(|target| target.set_muted(muted));
    }

    pub fn seek(&mut self, position_ms: i64) {
        self.for_each_active(|target| target.seek(position_ms));
    }

    pub fn set_background_video(&mut self, path: &Path, looping: bool, fill: FillMode) {
        self.for_each_active(|target| {
            target.set_background_video(path, looping, fill);
        });
    }

    pub fn stop_background_video(&mut self) {
        self.for_each_active(|target| {
            target.stop_background_video();
        });
    }

    pub fn pause_background_video(&mut self) {
        self.for_each_active(|target| target.pause_background_video());
    }

    pub fn resume_background_video(&mut self) {
        self.for_each_active(|target| target.resume_background_video());
    }

    /// Logo overlay of the virtual output
    pub fn set_logo_overlay(&mut self, path: Option<&Path>) -> Result<(), RenderError> {
        self.virtual_output.set_logo_overlay(path)
    }

    pub fn set_lower_third_config(&mut self, config: LowerThirdConfig) {
        self.virtual_output.set_lower_third_config(config);
    }

    pub fn show_lower_third(&mut self, text: &str) {
        self.virtual_output.show_lower_third(text);
    }

    pub fn hide_lower_third(&mut self) {
        self.virtual_output.hide_lower_third();
    }

    /// Place the navigation controls on every target
    pub fn position_controls(&mut self, settings: DisplayControlsSettings) {
        self.controls = settings;
        for target in &mut self.displays {
            target.position_controls(settings);
        }
        self.virtual_output.target_mut().position_controls(settings);
    }

    pub fn controls(&self) -> &DisplayControlsSettings {
        &self.controls
    }

    pub fn set_controls_visible(&mut self, visible: bool) {
        for target in &mut self.displays {
            target.set_controls_visible(visible);
        }
        self.virtual_output.target_mut().set_controls_visible(visible);
    }

    /// Route a raw scene signal to its target
    pub fn handle_scene_signal(&mut self, id: TargetId, signal: SceneSignal) {
        if let Some(target) = self.target_mut(id) {
            target.handle_scene_signal(signal);
        }
    }

    /// Route a key release from a target's window
    pub fn handle_key(&mut self, id: TargetId, key: Key) -> bool {
        self.target_mut(id).is_some_and(|target| target.handle_key(key))
    }
}

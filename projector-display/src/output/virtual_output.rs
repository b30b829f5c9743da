//! Virtual/streaming output
//!
//! An off-screen render target at a fixed resolution, typically captured by
//! streaming software. It can mirror the primary display's style or use its
//! own theme, and carries a logo and lower-third overlay.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::target::{RenderTarget, TargetId};
use crate::content::{AnnounceSlide, ContentRasterizer, PassiveText, Stanza, Verse, VideoInfo};
use crate::error::{RenderError, RenderOutcome};
use crate::events::{DisplayEvent, EventSink};
use crate::frame::{Frame, Size};
use crate::playback::LowerThirdConfig;
use crate::scene::SceneRenderer;
use crate::settings::{SlideShowSettings, StyleSettings};

/// Output resolution of the virtual output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VirtualResolution {
    /// 1280x720
    Hd720,
    /// 1920x1080
    #[default]
    Hd1080,
    /// 2560x1440
    Qhd1440,
    Custom { width: u32, height: u32 },
}

impl VirtualResolution {
    pub fn size(&self) -> Size {
        match *self {
            VirtualResolution::Hd720 => Size::new(1280, 720),
            VirtualResolution::Hd1080 => Size::new(1920, 1080),
            VirtualResolution::Qhd1440 => Size::new(2560, 1440),
            VirtualResolution::Custom { width, height } => Size::new(width, height),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            VirtualResolution::Hd720 => "720p",
            VirtualResolution::Hd1080 => "1080p",
            VirtualResolution::Qhd1440 => "1440p",
            VirtualResolution::Custom { .. } => "Custom",
        }
    }
}

/// The virtual output and its state
pub struct VirtualOutput {
    target: RenderTarget,
    enabled: bool,
    resolution: VirtualResolution,
    mirror_primary: bool,
    theme_id: Option<i64>,
    /// Kept so it can be applied once a scene is attached
    logo: Option<PathBuf>,
    lower_third: LowerThirdConfig,
}

impl VirtualOutput {
    /// Create a disabled virtual output at 1080p that mirrors the primary display
    pub fn new(rasterizer: Arc<dyn ContentRasterizer>, events: EventSink) -> Self {
        let resolution = VirtualResolution::default();
        Self {
            target: RenderTarget::new(TargetId::Virtual, resolution.size(), rasterizer, events),
            enabled: false,
            resolution,
            mirror_primary: true,
            theme_id: None,
            logo: None,
            lower_third: LowerThirdConfig::default(),
        }
    }

    /// Attach the scene renderer
    ///
    /// Fails with `RendererUnavailable` when no scene could be created.
    /// Overlays configured earlier are applied to the new scene.
    pub fn initialize(&mut self, scene: Option<Box<dyn SceneRenderer>>) -> Result<(), RenderError> {
        let Some(scene) = scene else {
            tracing::warn!("Failed to initialize virtual output: no scene renderer");
            return Err(RenderError::RendererUnavailable);
        };
        self.target.attach_scene(scene);
        self.target.set_lower_third_config(self.lower_third.clone());
        if let Some(logo) = self.logo.clone() {
            if let Err(e) = self.target.set_logo_overlay(Some(logo.as_path())) {
                tracing::warn!("Virtual output logo not applied: {}", e);
                self.logo = None;
            }
        }
        tracing::info!(resolution = %self.resolution.size(), "Virtual output initialized");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.target.is_initialized()
    }

    pub fn target(&self) -> &RenderTarget {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut RenderTarget {
        &mut self.target
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Switch the output on or off; returns whether the state changed
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        if self.enabled == enabled {
            return false;
        }
        self.enabled = enabled;
        if enabled && !self.target.is_initialized() {
            tracing::warn!("Virtual output enabled before a scene renderer was attached");
        }
        tracing::info!(enabled, "Virtual output state changed");
        self.target.emit(DisplayEvent::EnabledChanged(enabled));
        true
    }

    pub fn resolution(&self) -> VirtualResolution {
        self.resolution
    }

    pub fn size(&self) -> Size {
        self.resolution.size()
    }

    /// Switch to a resolution preset
    pub fn set_resolution(&mut self, resolution: VirtualResolution) -> Result<(), RenderError> {
        let size = resolution.size();
        if size.is_empty() {
            return Err(RenderError::InvalidDimension {
                width: size.width,
                height: size.height,
            });
        }
        self.resolution = resolution;
        self.target.resize(size);
        tracing::info!(preset = resolution.name(), %size, "Virtual output resolution changed");
        self.target.emit(DisplayEvent::ResolutionChanged(size));
        Ok(())
    }

    pub fn set_custom_resolution(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.set_resolution(VirtualResolution::Custom { width, height })
    }

    /// Choose between mirroring the primary display and an own theme
    pub fn set_theme(&mut self, mirror_primary: bool, theme_id: Option<i64>) {
        self.mirror_primary = mirror_primary;
        self.theme_id = theme_id;
        tracing::debug!(mirror_primary, ?theme_id, "Virtual output theme changed");
        self.target.emit(DisplayEvent::ThemeChanged {
            mirror_primary,
            theme_id,
        });
    }

    pub fn is_mirroring_primary(&self) -> bool {
        self.mirror_primary
    }

    pub fn theme_id(&self) -> Option<i64> {
        self.theme_id
    }

    pub fn logo(&self) -> Option<&Path> {
        self.logo.as_deref()
    }

    /// Show a logo in the corner, or remove it with `None`
    pub fn set_logo_overlay(&mut self, path: Option<&Path>) -> Result<(), RenderError> {
        if let Some(path) = path {
            if !path.exists() {
                self.logo = None;
                if self.target.is_initialized() {
                    // Clears the overlay on the scene
                    return self.target.set_logo_overlay(Some(path));
                }
                return Err(RenderError::MissingAsset(path.to_path_buf()));
            }
        }
        self.logo = path.map(Path::to_path_buf);
        if self.target.is_initialized() {
            self.target.set_logo_overlay(path)?;
        }
        tracing::debug!(logo = ?self.logo, "Virtual output logo set");
        Ok(())
    }

    pub fn lower_third(&self) -> &LowerThirdConfig {
        &self.lower_third
    }

    pub fn set_lower_third_config(&mut self, config: LowerThirdConfig) {
        self.lower_third = config.clone();
        self.target.set_lower_third_config(config);
    }

    pub fn show_lower_third(&mut self, text: &str) {
        self.lower_third.text = text.to_string();
        self.lower_third.visible = true;
        self.target.show_lower_third(text);
        tracing::debug!(text, "Lower third shown");
    }

    pub fn hide_lower_third(&mut self) {
        self.lower_third.visible = false;
        self.target.hide_lower_third();
    }

    /// Run a render call on the target unless the output is disabled
    pub fn render_with(&mut self, render: impl FnOnce(&mut RenderTarget) -> RenderOutcome) -> RenderOutcome {
        if !self.enabled {
            return RenderOutcome::Skipped(RenderError::TargetDisabled);
        }
        render(&mut self.target)
    }

    pub fn render_passive_text(&mut self, text: &PassiveText, style: &StyleSettings) -> RenderOutcome {
        self.render_with(|target| target.render_passive_text(text, style))
    }

    pub fn render_bible_text(&mut self, verse: &Verse, style: &StyleSettings) -> RenderOutcome {
        self.render_with(|target| target.render_bible_text(verse, style))
    }

    pub fn render_song_text(&mut self, stanza: &Stanza, style: &StyleSettings) -> RenderOutcome {
        self.render_with(|target| target.render_song_text(stanza, style))
    }

    pub fn render_announce_text(&mut self, announcement: &AnnounceSlide, style: &StyleSettings) -> RenderOutcome {
        self.render_with(|target| target.render_announce_text(announcement, style))
    }

    pub fn render_slide_show(&mut self, slide: &Frame, settings: &SlideShowSettings) -> RenderOutcome {
        self.render_with(|target| target.render_slide_show(slide, settings))
    }

    pub fn render_video(&mut self, video: &VideoInfo) -> RenderOutcome {
        self.render_with(|target| target.render_video(video))
    }

    pub fn render_not_text(&mut self) -> RenderOutcome {
        self.render_with(|target| target.render_not_text())
    }
}

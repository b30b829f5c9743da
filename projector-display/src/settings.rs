//! Style settings consumed by the render targets
//!
//! Settings are owned by the caller and handed in fresh on every render call;
//! targets never keep them between calls.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::frame::{Color, Frame};
use crate::output::TargetId;
use crate::render::FillMode;

/// Background choice of a style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BackgroundType {
    /// Target fallback color
    #[default]
    None,
    /// The style's own background color
    SolidColor,
    /// Static background image
    Picture,
    /// Looping background video
    Video,
}

impl BackgroundType {
    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            BackgroundType::None => "None",
            BackgroundType::SolidColor => "Solid Color",
            BackgroundType::Picture => "Picture",
            BackgroundType::Video => "Video",
        }
    }
}

/// Vertical placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VerticalAlign {
    Top,
    #[default]
    Middle,
    Bottom,
}

/// Horizontal placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HorizontalAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Font description passed through to the rasterizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub point_size: u32,
    pub bold: bool,
    pub italic: bool,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "Arial".to_string(),
            point_size: 24,
            bold: false,
            italic: false,
        }
    }
}

/// Style of a text content kind (passive, bible, song, announcement)
#[derive(Debug, Clone)]
pub struct StyleSettings {
    /// Cross-fade between slides
    pub use_fading: bool,
    /// Fade background before text (only with `use_fading`)
    pub sequential_transition: bool,
    pub use_shadow: bool,
    pub use_blur_shadow: bool,
    pub background_type: BackgroundType,
    /// Used by `BackgroundType::SolidColor`
    pub background_color: Color,
    /// Used by `BackgroundType::Picture`
    pub background_image: Option<Frame>,
    /// Used by `BackgroundType::Video`
    pub background_video_path: Option<PathBuf>,
    pub background_video_loop: bool,
    pub background_video_fill: FillMode,
    pub font: FontSpec,
    pub text_color: Color,
    pub vertical_align: VerticalAlign,
    pub horizontal_align: HorizontalAlign,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            use_fading: true,
            sequential_transition: false,
            use_shadow: true,
            use_blur_shadow: false,
            background_type: BackgroundType::None,
            background_color: Color::BLACK,
            background_image: None,
            background_video_path: None,
            background_video_loop: true,
            background_video_fill: FillMode::Stretch,
            font: FontSpec::default(),
            text_color: Color::WHITE,
            vertical_align: VerticalAlign::Middle,
            horizontal_align: HorizontalAlign::Center,
        }
    }
}

impl StyleSettings {
    /// Style with a static background image
    pub fn with_background_image(mut self, image: Frame) -> Self {
        self.background_type = BackgroundType::Picture;
        self.background_image = Some(image);
        self
    }

    /// Style with a looping background video
    pub fn with_background_video(mut self, path: impl Into<PathBuf>) -> Self {
        self.background_type = BackgroundType::Video;
        self.background_video_path = Some(path.into());
        self
    }

    /// Style with a solid background color
    pub fn with_solid_color(mut self, color: Color) -> Self {
        self.background_type = BackgroundType::SolidColor;
        self.background_color = color;
        self
    }

    /// Video path when the style asks for a non-empty background video
    pub fn video_background(&self) -> Option<&PathBuf> {
        if self.background_type != BackgroundType::Video {
            return None;
        }
        self.background_video_path
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

/// How slides are fitted when expanded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SlideFit {
    /// Whole slide visible
    #[default]
    Fit,
    /// Cover the screen, cropping the slide
    Fill,
}

impl SlideFit {
    pub fn fill_mode(&self) -> FillMode {
        match self {
            SlideFit::Fit => FillMode::KeepAspect,
            SlideFit::Fill => FillMode::KeepAspectExpand,
        }
    }
}

/// Slideshow presentation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SlideShowSettings {
    /// Upscale slides smaller than the screen
    pub expand_small: bool,
    pub fit_type: SlideFit,
}

/// Style entry of one render target
#[derive(Debug, Clone, Default)]
pub struct TargetStyle {
    /// Use the primary display's style instead of `settings`
    pub inherit_primary: bool,
    pub settings: StyleSettings,
}

impl TargetStyle {
    pub fn own(settings: StyleSettings) -> Self {
        Self {
            inherit_primary: false,
            settings,
        }
    }

    pub fn inherited() -> Self {
        Self {
            inherit_primary: true,
            settings: StyleSettings::default(),
        }
    }
}

/// Styles of a content kind for every target
///
/// Index 0 is the primary display; secondary displays follow in order.
#[derive(Debug, Clone)]
pub struct StyleSet {
    displays: Vec<TargetStyle>,
    virtual_output: Option<StyleSettings>,
}

impl StyleSet {
    /// All targets use `primary`
    pub fn uniform(primary: StyleSettings) -> Self {
        Self {
            displays: vec![TargetStyle::own(primary)],
            virtual_output: None,
        }
    }

    /// Add the style of the next secondary display
    pub fn with_display(mut self, style: TargetStyle) -> Self {
        self.displays.push(style);
        self
    }

    /// Give the virtual output its own style
    pub fn with_virtual_output(mut self, settings: StyleSettings) -> Self {
        self.virtual_output = Some(settings);
        self
    }

    pub fn primary(&self) -> &StyleSettings {
        &self.displays[0].settings
    }

    /// Style to use for `target`
    ///
    /// Missing or inheriting entries fall back to the primary style; the
    /// virtual output only uses its own style when `mirror_primary` is off.
    pub fn resolve(&self, target: TargetId, mirror_primary: bool) -> &StyleSettings {
        match target {
            TargetId::Virtual => match (&self.virtual_output, mirror_primary) {
                (Some(settings), false) => settings,
                _ => self.primary(),
            },
            TargetId::Display(_) => target
                .display_index()
                .and_then(|i| self.displays.get(i))
                .filter(|entry| !entry.inherit_primary)
                .map(|entry| &entry.settings)
                .unwrap_or_else(|| self.primary()),
        }
    }
}

impl Default for StyleSet {
    fn default() -> Self {
        Self::uniform(StyleSettings::default())
    }
}

/// On-screen navigation controls of a display
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayControlsSettings {
    /// Index into the button size table (0..=5)
    pub button_size: u32,
    pub alignment_v: VerticalAlign,
    pub alignment_h: HorizontalAlign,
    /// 0.0 to 1.0
    pub opacity: f32,
}

impl Default for DisplayControlsSettings {
    fn default() -> Self {
        Self {
            button_size: 3,
            alignment_v: VerticalAlign::Bottom,
            alignment_h: HorizontalAlign::Center,
            opacity: 0.3,
        }
    }
}

//! Screen format resolution
//!
//! Decides the pixel size content is rendered at, given the requested output
//! format and the actual window size of the surface.

use serde::{Deserialize, Serialize};

use crate::frame::Size;

/// Aspect differences below this are treated as a match
pub const ASPECT_TOLERANCE: f64 = 0.01;

/// Output format preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FormatPreset {
    /// Follow the window size
    #[default]
    Auto,
    Sd4x3,
    Hd16x9,
    Hd16x10,
    Ultrawide21x9,
    Vertical9x16,
    Custom,
}

impl FormatPreset {
    /// Nominal resolution, `None` for `Auto`
    pub fn resolution(&self, custom: Size) -> Option<Size> {
        match self {
            FormatPreset::Auto => None,
            FormatPreset::Sd4x3 => Some(Size::new(1024, 768)),
            FormatPreset::Hd16x9 => Some(Size::new(1920, 1080)),
            FormatPreset::Hd16x10 => Some(Size::new(1920, 1200)),
            FormatPreset::Ultrawide21x9 => Some(Size::new(2560, 1080)),
            FormatPreset::Vertical9x16 => Some(Size::new(1080, 1920)),
            FormatPreset::Custom => Some(custom),
        }
    }

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            FormatPreset::Auto => "Auto",
            FormatPreset::Sd4x3 => "4:3 (SD)",
            FormatPreset::Hd16x9 => "16:9 (HD)",
            FormatPreset::Hd16x10 => "16:10 (HD)",
            FormatPreset::Ultrawide21x9 => "Ultrawide 21:9",
            FormatPreset::Vertical9x16 => "Vertical 9:16",
            FormatPreset::Custom => "Custom",
        }
    }

    /// Get all presets in settings order
    pub fn all() -> &'static [FormatPreset] {
        &[
            FormatPreset::Auto,
            FormatPreset::Sd4x3,
            FormatPreset::Hd16x9,
            FormatPreset::Hd16x10,
            FormatPreset::Ultrawide21x9,
            FormatPreset::Vertical9x16,
            FormatPreset::Custom,
        ]
    }
}

/// Format configuration of one render target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenFormat {
    pub preset: FormatPreset,
    /// Only meaningful for `FormatPreset::Custom`
    pub custom_size: Size,
    pub maintain_aspect: bool,
    /// Cover the window and clip instead of letterboxing
    pub crop_to_fit: bool,
}

impl Default for ScreenFormat {
    fn default() -> Self {
        Self {
            preset: FormatPreset::Auto,
            custom_size: Size::new(1920, 1080),
            maintain_aspect: true,
            crop_to_fit: false,
        }
    }
}

impl ScreenFormat {
    pub fn new(preset: FormatPreset) -> Self {
        Self {
            preset,
            ..Default::default()
        }
    }

    pub fn custom(width: u32, height: u32) -> Self {
        Self {
            preset: FormatPreset::Custom,
            custom_size: Size::new(width, height),
            ..Default::default()
        }
    }

    /// Nominal format resolution, `None` for `Auto`
    pub fn resolution(&self) -> Option<Size> {
        self.preset.resolution(self.custom_size)
    }

    /// Effective render size for a window of `window` pixels
    pub fn resolve(&self, window: Size) -> Size {
        resolve(self, window)
    }
}

/// Compute the effective render size for a window
pub fn resolve(format: &ScreenFormat, window: Size) -> Size {
    if format.preset == FormatPreset::Auto || !format.maintain_aspect {
        return window;
    }

    let (Some(format_aspect), Some(window_aspect)) = (
        format.resolution().and_then(|r| r.aspect_ratio()),
        window.aspect_ratio(),
    ) else {
        return window;
    };

    if (format_aspect - window_aspect).abs() < ASPECT_TOLERANCE {
        return window;
    }

    let wider_window = window_aspect > format_aspect;
    // Crop covers the window (scale up the short side), letterbox fits in it
    let match_width = wider_window == format.crop_to_fit;
    if match_width {
        let height = (window.width as f64 / format_aspect) as u32;
        Size::new(window.width, height)
    } else {
        let width = (window.height as f64 * format_aspect) as u32;
        Size::new(width, window.height)
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// Reduced aspect ratio label for a size, e.g. "16:9"
pub fn aspect_ratio_label(size: Size) -> String {
    if size.is_empty() {
        return "-".to_string();
    }
    let d = gcd(size.width, size.height);
    let (w, h) = (size.width / d, size.height / d);
    match (w, h) {
        (16, 9) => "16:9".to_string(),
        (4, 3) => "4:3".to_string(),
        (8, 5) => "16:10".to_string(),
        (64, 27) => "21:9".to_string(),
        (9, 16) => "9:16".to_string(),
        _ => format!("{}:{}", w, h),
    }
}

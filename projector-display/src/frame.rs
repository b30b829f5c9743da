//! Frames, sizes and colors
//!
//! A `Frame` is an immutable RGBA image with a process-unique identity key.
//! Clones share the key, so "is this the same background as last time" is an
//! O(1) comparison instead of a pixel diff.

use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// Pixel size of a frame, window or render target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width / height, or `None` for an empty size
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(self.width as f64 / self.height as f64)
        }
    }

    /// True when this size is strictly smaller than `other` in both dimensions
    pub fn fits_strictly_inside(&self, other: Size) -> bool {
        self.width < other.width && self.height < other.height
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// RGBA8 color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub fn to_pixel(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, self.a])
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::TRANSPARENT
    }
}

/// Identity of a frame's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameKey(u64);

/// Counter for generating unique frame keys
static FRAME_KEY_COUNTER: AtomicU64 = AtomicU64::new(1);

fn next_frame_key() -> FrameKey {
    FrameKey(FRAME_KEY_COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// Shared immutable image with a stable identity key
#[derive(Clone)]
pub struct Frame {
    key: FrameKey,
    image: Arc<RgbaImage>,
}

impl Frame {
    /// Wrap a decoded image; every call produces a new identity
    pub fn new(image: RgbaImage) -> Self {
        Self {
            key: next_frame_key(),
            image: Arc::new(image),
        }
    }

    /// Fully transparent frame
    pub fn empty(size: Size) -> Self {
        Self::new(RgbaImage::new(size.width, size.height))
    }

    /// Frame filled with a single color
    pub fn solid(color: Color, size: Size) -> Self {
        Self::new(RgbaImage::from_pixel(size.width, size.height, color.to_pixel()))
    }

    /// Load an image file from disk
    pub fn open(path: &Path) -> Result<Self, RenderError> {
        if !path.exists() {
            return Err(RenderError::MissingAsset(path.to_path_buf()));
        }
        let image = image::open(path).map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Failed to decode image");
            RenderError::MissingAsset(path.to_path_buf())
        })?;
        Ok(Self::new(image.into_rgba8()))
    }

    pub fn key(&self) -> FrameKey {
        self.key
    }

    pub fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// True when both frames carry the same identity
    pub fn same_content(&self, other: &Frame) -> bool {
        self.key == other.key
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("key", &self.key)
            .field("size", &self.size())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_identity() {
        let a = Frame::empty(Size::new(4, 4));
        let b = a.clone();
        assert!(a.same_content(&b));
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_identical_pixels_are_distinct_frames() {
        let a = Frame::solid(Color::BLACK, Size::new(2, 2));
        let b = Frame::solid(Color::BLACK, Size::new(2, 2));
        assert!(!a.same_content(&b));
    }

    #[test]
    fn test_solid_fill() {
        let frame = Frame::solid(Color::rgb(10, 20, 30), Size::new(3, 2));
        assert_eq!(frame.size(), Size::new(3, 2));
        assert_eq!(frame.image().get_pixel(2, 1), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_open_missing_file() {
        let result = Frame::open(Path::new("/definitely/not/here.png"));
        assert!(matches!(result, Err(RenderError::MissingAsset(_))));
    }

    #[test]
    fn test_size_aspect() {
        assert_eq!(Size::new(0, 10).aspect_ratio(), None);
        assert!((Size::new(1920, 1080).aspect_ratio().unwrap() - 16.0 / 9.0).abs() < 1e-9);
        assert!(Size::new(10, 10).fits_strictly_inside(Size::new(11, 11)));
        assert!(!Size::new(10, 12).fits_strictly_inside(Size::new(11, 11)));
    }
}

//! Fill-mode scaling
//!
//! Maps a source image onto a target size. Output dimensions are fully
//! determined by the fill mode; pixels are resampled with `image::imageops`.

use image::imageops::{self, FilterType};
use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::frame::{Frame, Size};

/// How a source image is fitted into a target rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FillMode {
    /// Resize to exactly the target size, ignoring aspect ratio
    #[default]
    Stretch,
    /// Preserve aspect ratio and fit inside the target (letterbox)
    KeepAspect,
    /// Preserve aspect ratio and cover the target (crop)
    KeepAspectExpand,
    /// Leave the image untouched
    None,
}

impl FillMode {
    /// Map the stored settings index (0 stretch, 1 fit, 2 fill, other none)
    pub fn from_index(index: i32) -> Self {
        match index {
            0 => FillMode::Stretch,
            1 => FillMode::KeepAspect,
            2 => FillMode::KeepAspectExpand,
            _ => FillMode::None,
        }
    }

    pub fn index(&self) -> i32 {
        match self {
            FillMode::Stretch => 0,
            FillMode::KeepAspect => 1,
            FillMode::KeepAspectExpand => 2,
            FillMode::None => 3,
        }
    }

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            FillMode::Stretch => "Stretch",
            FillMode::KeepAspect => "Fit",
            FillMode::KeepAspectExpand => "Fill",
            FillMode::None => "None",
        }
    }
}

/// Compute the output size for `source` fitted into `target`
pub fn scaled_size(source: Size, target: Size, mode: FillMode) -> Result<Size, RenderError> {
    if mode == FillMode::None {
        return Ok(source);
    }
    if target.is_empty() {
        return Err(RenderError::InvalidDimension {
            width: target.width,
            height: target.height,
        });
    }
    if mode == FillMode::Stretch {
        return Ok(target);
    }
    if source.is_empty() {
        return Err(RenderError::InvalidDimension {
            width: source.width,
            height: source.height,
        });
    }

    let (sw, sh) = (source.width as u64, source.height as u64);
    let (tw, th) = (target.width as u64, target.height as u64);

    // Width that keeps the aspect ratio when the height matches the target
    let width_at_target_height = th * sw / sh;
    let use_height = match mode {
        FillMode::KeepAspect => width_at_target_height <= tw,
        _ => width_at_target_height >= tw,
    };

    let (w, h) = if use_height {
        (width_at_target_height, th)
    } else {
        (tw, tw * sh / sw)
    };

    Ok(Size::new(clamp_dimension(w), clamp_dimension(h)))
}

fn clamp_dimension(value: u64) -> u32 {
    value.clamp(1, u32::MAX as u64) as u32
}

/// Scale a frame into the target size
///
/// Returns the input unchanged (same identity) when no resampling is needed.
pub fn scale(frame: &Frame, target: Size, mode: FillMode) -> Result<Frame, RenderError> {
    let size = scaled_size(frame.size(), target, mode)?;
    if size == frame.size() {
        return Ok(frame.clone());
    }
    let resized = imageops::resize(frame.image(), size.width, size.height, FilterType::Triangle);
    Ok(Frame::new(resized))
}

/// Offset that centers an image of `size` inside `target`
///
/// Images larger than the target get a negative offset so the overflow is
/// clipped evenly on both sides.
pub fn centered_origin(size: Size, target: Size) -> (i32, i32) {
    let x = (target.width as i64 - size.width as i64) / 2;
    let y = (target.height as i64 - size.height as i64) / 2;
    (x as i32, y as i32)
}

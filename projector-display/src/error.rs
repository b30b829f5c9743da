//! Render error taxonomy
//!
//! None of these escape a render call: targets log them and degrade visually,
//! reporting what happened through `RenderOutcome`.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised inside the render path
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("Invalid dimension {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },
    #[error("Missing asset: {}", .0.display())]
    MissingAsset(PathBuf),
    #[error("Scene renderer is not initialized")]
    RendererUnavailable,
    #[error("Rasterization failed: {0}")]
    RasterizationFailure(String),
    #[error("Output target is disabled")]
    TargetDisabled,
}

/// Result of a render call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// New content was pushed to the scene
    Presented {
        /// Whether the background slot flipped
        background_changed: bool,
    },
    /// Nothing was shown; the target was not ready or is switched off
    Skipped(RenderError),
}

impl RenderOutcome {
    pub fn is_presented(&self) -> bool {
        matches!(self, RenderOutcome::Presented { .. })
    }

    pub fn background_changed(&self) -> bool {
        matches!(
            self,
            RenderOutcome::Presented {
                background_changed: true
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RenderError::InvalidDimension { width: 0, height: 1080 };
        assert_eq!(err.to_string(), "Invalid dimension 0x1080");
        let err = RenderError::MissingAsset(PathBuf::from("/media/loop.mp4"));
        assert_eq!(err.to_string(), "Missing asset: /media/loop.mp4");
    }

    #[test]
    fn test_outcome_helpers() {
        let presented = RenderOutcome::Presented { background_changed: true };
        assert!(presented.is_presented());
        assert!(presented.background_changed());
        let skipped = RenderOutcome::Skipped(RenderError::RendererUnavailable);
        assert!(!skipped.is_presented());
        assert!(!skipped.background_changed());
    }
}

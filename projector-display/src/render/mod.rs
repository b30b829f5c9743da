//! Render core
//!
//! Pure building blocks used by every render target:
//! - Fill-mode scaling of background images
//! - Alternating slot tracking for flicker-free swaps
//! - Screen format resolution
//! - Transition commands

pub mod format;
pub mod scale;
pub mod slots;
pub mod transition;

pub use format::{aspect_ratio_label, resolve, FormatPreset, ScreenFormat, ASPECT_TOLERANCE};
pub use scale::{centered_origin, scale, scaled_size, FillMode};
pub use slots::{Slot, SlotDirection, SlotState, SlotTracker, SlotUpdate};
pub use transition::{TransitionCommand, TransitionType};

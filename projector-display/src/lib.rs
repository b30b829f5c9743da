//! Projector Display Library
//!
//! Render and transition engine for projection outputs: up to four display
//! targets plus a virtual output, each presenting text, slides and video over
//! a background with crossfades between alternating image slots.

pub mod config;
pub mod content;
pub mod error;
pub mod events;
pub mod frame;
pub mod output;
pub mod playback;
pub mod render;
pub mod scene;
pub mod settings;
pub mod telemetry;

// Re-export commonly used types
pub use config::{ConfigError, DisplayConfig};
pub use content::{AnnounceSlide, BlankRasterizer, Content, ContentRasterizer, PassiveText, Stanza, Verse, VideoInfo};
pub use error::{RenderError, RenderOutcome};
pub use events::{DisplayEvent, Key, TargetEvent};
pub use frame::{Color, Frame, Size};
pub use output::{OutputManager, RenderTarget, TargetId, VirtualOutput, VirtualResolution};
pub use playback::{LowerThirdConfig, PlaybackControl, PlaybackState};
pub use render::{FillMode, FormatPreset, ScreenFormat, TransitionType};
pub use scene::{SceneRenderer, SceneSignal};
pub use settings::{DisplayControlsSettings, SlideShowSettings, StyleSet, StyleSettings};
pub use telemetry::{init_logging, LogConfig, LogGuard};

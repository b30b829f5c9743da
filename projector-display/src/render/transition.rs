//! Transition commands sent to the scene renderer

use serde::{Deserialize, Serialize};

use super::slots::SlotDirection;
use crate::scene::SceneRenderer;
use crate::settings::StyleSettings;

/// Animation used when swapping slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TransitionType {
    /// Instant swap
    #[default]
    None,
    /// Cross-fade background and text together
    Fade,
    /// Fade the background first, then the text
    Sequence,
}

impl TransitionType {
    /// Transition requested by a style
    pub fn for_style(style: &StyleSettings) -> Self {
        match (style.use_fading, style.sequential_transition) {
            (false, _) => TransitionType::None,
            (true, false) => TransitionType::Fade,
            (true, true) => TransitionType::Sequence,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TransitionType::None => "none",
            TransitionType::Fade => "fade",
            TransitionType::Sequence => "seq",
        }
    }
}

/// One complete slot handoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionCommand {
    pub transition: TransitionType,
    /// `None` when the background did not change
    pub background: Option<SlotDirection>,
    pub text: SlotDirection,
}

impl TransitionCommand {
    /// Cancel whatever is still animating
    ///
    /// Must be called before new images are loaded into the hidden slots.
    pub fn cancel_running(scene: &mut dyn SceneRenderer) {
        scene.stop_transitions();
    }

    /// Start the slot handoff
    pub fn start(&self, scene: &mut dyn SceneRenderer) {
        if let Some(direction) = self.background {
            scene.transition_back(direction, self.transition);
        }
        scene.transition_text(self.text, self.transition);
    }
}

//! Placement of the on-screen navigation controls

use crate::frame::Size;
use crate::scene::ControlsPlacement;
use crate::settings::{DisplayControlsSettings, HorizontalAlign, VerticalAlign};

/// Distance between the button group and the window edge
pub const CONTROLS_MARGIN: i32 = 20;

/// Button edge length in pixels for a size index
pub fn button_size_px(index: u32) -> u32 {
    match index {
        0 => 16,
        1 => 24,
        2 => 32,
        3 => 48,
        4 => 64,
        5 => 96,
        _ => 48,
    }
}

/// Top-left position of the prev/exit/next button group inside `window`
pub fn place_controls(settings: &DisplayControlsSettings, window: Size) -> ControlsPlacement {
    let size = button_size_px(settings.button_size);
    let button = size as i32;
    // Three buttons and their spacing
    let group_width = button * 3 + 20;
    let (width, height) = (window.width as i32, window.height as i32);

    let y = match settings.alignment_v {
        VerticalAlign::Top => CONTROLS_MARGIN,
        VerticalAlign::Middle => (height - button) / 2,
        VerticalAlign::Bottom => height - button - CONTROLS_MARGIN,
    };
    let x = match settings.alignment_h {
        HorizontalAlign::Left => CONTROLS_MARGIN,
        HorizontalAlign::Center => (width - group_width) / 2,
        HorizontalAlign::Right => width - group_width - CONTROLS_MARGIN,
    };

    ControlsPlacement {
        x,
        y,
        button_size: size,
        opacity: settings.opacity.clamp(0.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_sizes() {
        assert_eq!(button_size_px(0), 16);
        assert_eq!(button_size_px(5), 96);
        assert_eq!(button_size_px(42), 48);
    }

    #[test]
    fn test_default_placement() {
        let placement = place_controls(&DisplayControlsSettings::default(), Size::new(1920, 1080));
        assert_eq!(
            placement,
            ControlsPlacement {
                x: 878,
                y: 1012,
                button_size: 48,
                opacity: 0.3,
            }
        );
    }

    #[test]
    fn test_top_right_placement() {
        let settings = DisplayControlsSettings {
            button_size: 0,
            alignment_v: VerticalAlign::Top,
            alignment_h: HorizontalAlign::Right,
            opacity: 2.0,
        };
        let placement = place_controls(&settings, Size::new(1280, 720));
        assert_eq!((placement.x, placement.y), (1280 - 68 - 20, 20));
        assert_eq!(placement.opacity, 1.0);
    }

    #[test]
    fn test_middle_left_placement() {
        let settings = DisplayControlsSettings {
            button_size: 4,
            alignment_v: VerticalAlign::Middle,
            alignment_h: HorizontalAlign::Left,
            ..Default::default()
        };
        let placement = place_controls(&settings, Size::new(800, 600));
        assert_eq!((placement.x, placement.y), (20, 268));
    }
}

//! The editor's fixed toolbar, described as data: slider ranges and defaults,
//! the export format/resolution choices, and the physics toggle label. The
//! control set is deliberately not configurable.

/// Inclusive slider range with a UI step and initial value.
#[derive(Debug, Clone, Copy)]
pub struct Slider {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

impl Slider {
    /// Clamp a raw UI value into the slider's range.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

pub const FONT_SIZE_SLIDER: Slider = Slider {
    min: 10.0,
    max: 50.0,
    step: 1.0,
    default: 14.0,
};

/// Scale factor applied against each node's original size. The default of 0.1
/// shrinks nodes to a tenth on first use; that matches the reference editor
/// and is kept as-is (see DESIGN.md).
pub const NODE_SIZE_SLIDER: Slider = Slider {
    min: 0.1,
    max: 10.0,
    step: 0.1,
    default: 0.1,
};

pub const PHYSICS_DISTANCE_SLIDER: Slider = Slider {
    min: 50.0,
    max: 500.0,
    step: 10.0,
    default: 200.0,
};

/// DPI choices offered by the resolution selector.
pub const RESOLUTIONS: [u32; 3] = [200, 300, 600];

pub fn physics_toggle_label(enabled: bool) -> &'static str {
    if enabled {
        "Disable Physics"
    } else {
        "Enable Physics"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sliders_clamp_out_of_range_input() {
        assert_eq!(FONT_SIZE_SLIDER.clamp(9.0), 10.0);
        assert_eq!(FONT_SIZE_SLIDER.clamp(60.0), 50.0);
        assert_eq!(NODE_SIZE_SLIDER.clamp(0.05), 0.1);
        assert_eq!(PHYSICS_DISTANCE_SLIDER.clamp(1000.0), 500.0);
    }

    #[test]
    fn toggle_label_reflects_state() {
        assert_eq!(physics_toggle_label(true), "Disable Physics");
        assert_eq!(physics_toggle_label(false), "Enable Physics");
    }

    #[test]
    fn resolution_choices_cover_print_and_screen() {
        assert_eq!(RESOLUTIONS, [200, 300, 600]);
    }
}

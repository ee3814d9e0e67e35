//! Color themes
//!
//! The simulation only tracks a theme index; every `theme_interval` passes
//! in normal mode it moves to the next one.

use crate::tuning::THEME_PALETTES;

/// Palette for one theme
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    pub sky: [f32; 4],
    pub pipe: [f32; 4],
    pub pipe_cap: [f32; 4],
}

pub const THEMES: [Theme; THEME_PALETTES] = [
    Theme {
        name: "day",
        sky: [0.44, 0.77, 0.81, 1.0],
        pipe: [0.45, 0.75, 0.18, 1.0],
        pipe_cap: [0.33, 0.58, 0.12, 1.0],
    },
    Theme {
        name: "dusk",
        sky: [0.95, 0.6, 0.4, 1.0],
        pipe: [0.55, 0.35, 0.55, 1.0],
        pipe_cap: [0.42, 0.25, 0.42, 1.0],
    },
    Theme {
        name: "night",
        sky: [0.08, 0.1, 0.25, 1.0],
        pipe: [0.25, 0.45, 0.6, 1.0],
        pipe_cap: [0.18, 0.33, 0.45, 1.0],
    },
    Theme {
        name: "dawn",
        sky: [0.98, 0.85, 0.75, 1.0],
        pipe: [0.85, 0.45, 0.35, 1.0],
        pipe_cap: [0.7, 0.33, 0.25, 1.0],
    },
];

/// Theme for an index; out-of-range indices wrap
pub fn theme(index: usize) -> &'static Theme {
    &THEMES[index % THEMES.len()]
}

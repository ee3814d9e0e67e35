//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`]. The defaults are the
//! reference 400x600 playfield; overrides can be loaded from JSON and are
//! validated before a session is built from them.

use serde::{Deserialize, Serialize};

/// Number of colour palettes the renderer ships
pub const THEME_PALETTES: usize = 4;

/// Rejected tuning values
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TuningError {
    #[error("Playfield must be positive, got {width}x{height}")]
    InvalidBounds { width: f32, height: f32 },
    #[error("Bird must have a positive size")]
    InvalidBird,
    #[error("Pipe width must be positive, got {0}")]
    InvalidPipeWidth(f32),
    #[error("Gap range is inverted: min {min} > max {max}")]
    InvertedGapRange { min: f32, max: f32 },
    #[error("Gap of {gap} does not fit between margins in a playfield {height} tall")]
    GapDoesNotFit { gap: f32, height: f32 },
    #[error("Warm-up gap {0} is outside the gap range")]
    WarmupGapOutOfRange(f32),
    #[error("Obstacle spacing must be positive, got {0}")]
    InvalidSpacing(f32),
    #[error("Theme interval and theme count must be non-zero")]
    InvalidThemeCycle,
    #[error("Theme count {0} exceeds the {THEME_PALETTES} available palettes")]
    TooManyThemes(usize),
    #[error("Speed values must not be negative")]
    NegativeSpeed,
    #[error("Failed to parse tuning: {0}")]
    Parse(String),
}

/// Gameplay constants for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    pub bounds_width: f32,
    pub bounds_height: f32,

    // === Bird physics ===
    /// Added to velocity every tick
    pub gravity: f32,
    /// Velocity set by a jump (negative = up)
    pub jump_force: f32,
    /// Radians of tilt per unit of velocity
    pub rotation_scale: f32,
    /// Tilt clamp in either direction (radians)
    pub max_rotation: f32,
    pub bird_x: f32,
    pub bird_width: f32,
    pub bird_height: f32,

    // === Obstacles ===
    pub pipe_width: f32,
    pub min_gap: f32,
    pub max_gap: f32,
    /// Minimum distance from the top of the playfield to a gap
    pub top_margin: f32,
    /// Minimum distance from the bottom of a gap to the floor
    pub bottom_margin: f32,
    /// A new obstacle spawns once the newest one is left of `bounds_width - spawn_threshold`
    pub spawn_threshold: f32,
    /// Horizontal distance between consecutive obstacles
    pub obstacle_spacing: f32,
    /// Obstacles placed when a session is created
    pub initial_obstacles: usize,
    /// Obstacles spawned right after the pre-seeded ones that use a centered `warmup_gap`
    pub warmup_obstacles: usize,
    pub warmup_gap: f32,

    // === Difficulty ===
    pub initial_pipe_speed: f32,
    /// Normal mode: passes between theme changes
    pub theme_interval: u32,
    /// At most [`THEME_PALETTES`]
    pub theme_count: usize,
    pub theme_speed_step: f32,
    /// Hard mode: speed added on every pass
    pub hard_speed_step: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            bounds_width: 400.0,
            bounds_height: 600.0,

            gravity: 0.25,
            jump_force: -6.0,
            rotation_scale: 0.1,
            max_rotation: std::f32::consts::FRAC_PI_4,
            bird_x: 100.0,
            bird_width: 35.0,
            bird_height: 25.0,

            pipe_width: 60.0,
            min_gap: 180.0,
            max_gap: 280.0,
            top_margin: 50.0,
            bottom_margin: 50.0,
            spawn_threshold: 200.0,
            obstacle_spacing: 260.0,
            initial_obstacles: 3,
            warmup_obstacles: 1,
            warmup_gap: 220.0,

            initial_pipe_speed: 2.0,
            theme_interval: 50,
            theme_count: THEME_PALETTES,
            theme_speed_step: 0.2,
            hard_speed_step: 0.5,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that a session built from these values can uphold the gap invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.bounds_width <= 0.0 || self.bounds_height <= 0.0 {
            return Err(TuningError::InvalidBounds {
                width: self.bounds_width,
                height: self.bounds_height,
            });
        }
        if self.bird_width <= 0.0 || self.bird_height <= 0.0 {
            return Err(TuningError::InvalidBird);
        }
        if self.pipe_width <= 0.0 {
            return Err(TuningError::InvalidPipeWidth(self.pipe_width));
        }
        if self.min_gap > self.max_gap {
            return Err(TuningError::InvertedGapRange {
                min: self.min_gap,
                max: self.max_gap,
            });
        }
        if self.top_margin + self.max_gap + self.bottom_margin > self.bounds_height {
            return Err(TuningError::GapDoesNotFit {
                gap: self.max_gap,
                height: self.bounds_height,
            });
        }
        if self.warmup_obstacles > 0
            && !(self.min_gap..=self.max_gap).contains(&self.warmup_gap)
        {
            return Err(TuningError::WarmupGapOutOfRange(self.warmup_gap));
        }
        if self.obstacle_spacing <= 0.0 {
            return Err(TuningError::InvalidSpacing(self.obstacle_spacing));
        }
        if self.theme_interval == 0 || self.theme_count == 0 {
            return Err(TuningError::InvalidThemeCycle);
        }
        if self.theme_count > THEME_PALETTES {
            return Err(TuningError::TooManyThemes(self.theme_count));
        }
        if self.initial_pipe_speed < 0.0 || self.theme_speed_step < 0.0 || self.hard_speed_step < 0.0
        {
            return Err(TuningError::NegativeSpeed);
        }
        Ok(())
    }

    /// Bird start height (vertically centered)
    pub fn bird_start_y(&self) -> f32 {
        self.bounds_height / 2.0
    }

    /// Highest allowed gap top for a gap of the given height
    pub fn max_gap_top(&self, gap_height: f32) -> f32 {
        self.bounds_height - gap_height - self.bottom_margin
    }
}

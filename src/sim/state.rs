//! Game session state and the play-state machine

use serde::{Deserialize, Serialize};

use super::bird::Bird;
use super::collision::Crash;
use super::obstacles::{Obstacle, ObstacleField};
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Session built, waiting for the start action
    #[default]
    Idle,
    /// Active gameplay
    Playing,
    /// Frozen; still rendered
    Paused,
    /// Run ended, no more ticks until restart
    GameOver,
}

impl GamePhase {
    /// Start action
    pub fn start(self) -> Self {
        match self {
            GamePhase::Idle => GamePhase::Playing,
            other => other,
        }
    }

    /// Pause-toggle action. No effect in Idle or GameOver.
    pub fn toggle_pause(self) -> Self {
        match self {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => other,
        }
    }

    /// Host surface lost focus
    pub fn lose_focus(self) -> Self {
        match self {
            GamePhase::Playing => GamePhase::Paused,
            other => other,
        }
    }

    /// Any collision
    pub fn crash(self) -> Self {
        match self {
            GamePhase::Playing => GamePhase::GameOver,
            other => other,
        }
    }

    /// Restart action; re-enters play directly
    pub fn restart(self) -> Self {
        match self {
            GamePhase::GameOver => GamePhase::Playing,
            other => other,
        }
    }

    /// A run is in progress (settings are locked)
    pub fn is_active(self) -> bool {
        matches!(self, GamePhase::Playing | GamePhase::Paused)
    }
}

/// Things that happened during a tick, drained by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    /// Fires once per jump (sound trigger)
    Flapped,
    Paused,
    Resumed,
    Passed { obstacle_id: u32, score: u32 },
    NewHighScore(u32),
    ThemeChanged(usize),
    SpeedChanged(f32),
    Crashed(Crash),
}

/// Per-session values carried in from outside the simulation
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub high_score: u32,
    pub hard_mode: bool,
    pub cosmetic: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            high_score: 0,
            hard_mode: false,
            cosmetic: crate::cosmetics::BASE_COSMETIC.to_string(),
        }
    }
}

/// One play session. Replaced wholesale on restart.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub score: u32,
    pub high_score: u32,
    /// Always equal to `score`
    pub pipes_passed: u32,
    pub theme_index: usize,
    /// Shared scroll speed of every obstacle; never decreases within a session
    pub pipe_speed: f32,
    /// Fixed for the lifetime of the session
    pub hard_mode: bool,
    /// Playing ticks simulated
    pub time_ticks: u64,
    pub bird: Bird,
    pub field: ObstacleField,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create an Idle session with pre-seeded obstacles
    pub fn new(seed: u64, tuning: &Tuning, options: SessionOptions) -> Self {
        Self {
            seed,
            phase: GamePhase::Idle,
            score: 0,
            high_score: options.high_score,
            pipes_passed: 0,
            theme_index: 0,
            pipe_speed: tuning.initial_pipe_speed,
            hard_mode: options.hard_mode,
            time_ticks: 0,
            bird: Bird::new(tuning, options.cosmetic),
            field: ObstacleField::new(seed, tuning),
            events: Vec::new(),
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        self.field.obstacles()
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

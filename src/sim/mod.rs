//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per tick
//! - Seeded RNG only
//! - Stable iteration order (obstacles in spawn order)
//! - No rendering, storage or platform dependencies

pub mod bird;
pub mod collision;
pub mod obstacles;
pub mod scoring;
pub mod state;
pub mod tick;

pub use bird::Bird;
pub use collision::{Crash, check as check_collision, inside_gap, out_of_bounds, overlaps_horizontally};
pub use obstacles::{Obstacle, ObstacleField};
pub use state::{GameEvent, GamePhase, GameState, SessionOptions};
pub use tick::{TickInput, tick};

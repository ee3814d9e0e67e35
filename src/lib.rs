//! Skyflap - a side-scrolling obstacle-dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bird physics, obstacles, scoring, game state)
//! - `game`: Host orchestration (frame scheduling, persistence, unlocks)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Frame scheduling abstraction
//! - `persistence`: Key-value storage backends
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod cosmetics;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use cosmetics::{CATALOG, Cosmetic, UnlockGate};
pub use game::{Action, Game, GameError};
pub use highscores::HighScore;
pub use settings::Settings;
pub use tuning::Tuning;

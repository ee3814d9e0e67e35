//! Pass counting, high score tracking and difficulty progression
//!
//! Normal mode rotates the theme and nudges the speed every
//! `theme_interval` passes. Hard mode never touches the theme and speeds
//! up on every pass instead.

use super::state::{GameEvent, GameState};
use crate::tuning::Tuning;

/// Award every obstacle the bird has cleared this tick. Returns how many.
pub fn record_passes(state: &mut GameState, tuning: &Tuning) -> u32 {
    let flipped = state.field.mark_passed(state.bird.x, tuning.pipe_width);
    for &obstacle_id in &flipped {
        award_pass(state, obstacle_id, tuning);
    }
    flipped.len() as u32
}

/// Score one pass and apply its consequences
pub fn award_pass(state: &mut GameState, obstacle_id: u32, tuning: &Tuning) {
    state.score += 1;
    state.pipes_passed += 1;
    debug_assert_eq!(state.score, state.pipes_passed);

    let score = state.score;
    state.push_event(GameEvent::Passed { obstacle_id, score });

    if score > state.high_score {
        state.high_score = score;
        state.push_event(GameEvent::NewHighScore(score));
    }

    adjust_difficulty(state, tuning);
}

/// Apply the difficulty rule for the session's mode after a pass
pub fn adjust_difficulty(state: &mut GameState, tuning: &Tuning) {
    if state.hard_mode {
        state.pipe_speed += tuning.hard_speed_step;
        state.push_event(GameEvent::SpeedChanged(state.pipe_speed));
        return;
    }

    if state.pipes_passed % tuning.theme_interval == 0 {
        state.theme_index = (state.theme_index + 1) % tuning.theme_count;
        state.pipe_speed += tuning.theme_speed_step;
        log::info!(
            "Theme {} at {} passes, speed {:.2}",
            state.theme_index,
            state.pipes_passed,
            state.pipe_speed
        );
        state.push_event(GameEvent::ThemeChanged(state.theme_index));
        state.push_event(GameEvent::SpeedChanged(state.pipe_speed));
    }
}

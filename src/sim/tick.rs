//! Fixed-step simulation tick
//!
//! One call per scheduled frame. Physics, obstacles, collision and scoring
//! only run while Playing.

use super::collision;
use super::scoring;
use super::state::{GameEvent, GamePhase, GameState};
use crate::tuning::Tuning;

/// Input edges for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump / confirm (starts the run when Idle)
    pub flap: bool,
    /// Pause toggle
    pub pause: bool,
    /// Host surface lost focus
    pub focus_lost: bool,
}

/// Advance the session by one tick
pub fn tick(state: &mut GameState, input: &TickInput, tuning: &Tuning) {
    if input.focus_lost {
        let next = state.phase.lose_focus();
        if next != state.phase {
            state.phase = next;
            state.push_event(GameEvent::Paused);
            log::info!("Auto-paused (focus lost)");
        }
    }

    // Focus loss wins over a pause toggle in the same tick
    if input.pause && !input.focus_lost {
        let next = state.phase.toggle_pause();
        if next != state.phase {
            state.push_event(if next == GamePhase::Paused {
                GameEvent::Paused
            } else {
                GameEvent::Resumed
            });
            state.phase = next;
        }
    }

    if input.flap {
        match state.phase {
            GamePhase::Idle => {
                state.phase = state.phase.start();
                state.push_event(GameEvent::Started);
                log::info!(
                    "Run started (seed {}, hard mode {})",
                    state.seed,
                    state.hard_mode
                );
            }
            GamePhase::Playing => {
                state.bird.flap(tuning);
                state.push_event(GameEvent::Flapped);
            }
            _ => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;

    state.bird.integrate(tuning);
    state.field.scroll(state.pipe_speed);

    if let Some(crash) = collision::check(&state.bird, state.field.obstacles(), tuning) {
        state.phase = state.phase.crash();
        state.push_event(GameEvent::Crashed(crash));
        log::debug!(
            "Crashed ({:?}) at tick {} with score {}",
            crash,
            state.time_ticks,
            state.score
        );
        return;
    }

    scoring::record_passes(state, tuning);
    state.field.recycle(tuning);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::Crash;
    use crate::sim::state::SessionOptions;
    use proptest::prelude::*;

    fn new_state() -> GameState {
        GameState::new(12345, &Tuning::default(), SessionOptions::default())
    }

    fn flap() -> TickInput {
        TickInput {
            flap: true,
            ..Default::default()
        }
    }

    fn pause() -> TickInput {
        TickInput {
            pause: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_tick_idle_to_playing() {
        let tuning = Tuning::default();
        let mut state = new_state();

        // Nothing moves while Idle
        tick(&mut state, &TickInput::default(), &tuning);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.bird.y, 300.0);
        assert_eq!(state.obstacles()[0].x, 460.0);

        tick(&mut state, &flap(), &tuning);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.drain_events(), vec![GameEvent::Started]);
        // Start does not jump
        assert!((state.bird.velocity - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_ten_ticks_of_gravity() {
        let tuning = Tuning::default();
        let mut state = new_state();
        state.phase = GamePhase::Playing;

        for i in 1..=10 {
            let before = state.bird.velocity;
            tick(&mut state, &TickInput::default(), &tuning);
            assert!((state.bird.velocity - before - 0.25).abs() < 1e-6, "tick {i}");
        }
        assert!((state.bird.velocity - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_flap_sets_jump_force_and_fires_once() {
        let tuning = Tuning::default();
        let mut state = new_state();
        state.phase = GamePhase::Playing;
        state.bird.velocity = 5.0;

        tick(&mut state, &flap(), &tuning);
        // Overwritten to -6 then one tick of gravity
        assert!((state.bird.velocity - (-5.75)).abs() < 1e-6);
        let events = state.drain_events();
        assert_eq!(
            events.iter().filter(|e| **e == GameEvent::Flapped).count(),
            1
        );
    }

    #[test]
    fn test_tick_pause() {
        let tuning = Tuning::default();
        let mut state = new_state();
        tick(&mut state, &flap(), &tuning);

        tick(&mut state, &pause(), &tuning);
        assert_eq!(state.phase, GamePhase::Paused);

        // Frozen while paused, flaps ignored
        let bird = state.bird.clone();
        let xs: Vec<f32> = state.obstacles().iter().map(|o| o.x).collect();
        tick(&mut state, &TickInput::default(), &tuning);
        tick(&mut state, &flap(), &tuning);
        assert_eq!(state.bird, bird);
        assert_eq!(
            state.obstacles().iter().map(|o| o.x).collect::<Vec<_>>(),
            xs
        );

        tick(&mut state, &pause(), &tuning);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_pause_ignored_when_idle() {
        let tuning = Tuning::default();
        let mut state = new_state();
        tick(&mut state, &pause(), &tuning);
        assert_eq!(state.phase, GamePhase::Idle);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_focus_loss_pauses() {
        let tuning = Tuning::default();
        let mut state = new_state();
        state.phase = GamePhase::Playing;

        let input = TickInput {
            focus_lost: true,
            ..Default::default()
        };
        tick(&mut state, &input, &tuning);
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_focus_loss_with_pause_stays_paused() {
        let tuning = Tuning::default();
        let mut state = new_state();
        state.phase = GamePhase::Playing;

        let input = TickInput {
            pause: true,
            focus_lost: true,
            ..Default::default()
        };
        tick(&mut state, &input, &tuning);
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.drain_events(), vec![GameEvent::Paused]);

        // Already paused: the toggle does not resume while focus is gone
        tick(&mut state, &input, &tuning);
        assert_eq!(state.phase, GamePhase::Paused);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_floor_crash_ends_run() {
        let tuning = Tuning::default();
        let mut state = new_state();
        state.phase = GamePhase::Playing;
        state.bird.y = 574.0;
        state.bird.velocity = 1.0;

        tick(&mut state, &TickInput::default(), &tuning);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::Crashed(Crash::Floor))
        );

        // GameOver is inert
        let y = state.bird.y;
        tick(&mut state, &flap(), &tuning);
        tick(&mut state, &pause(), &tuning);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.bird.y, y);
    }

    #[test]
    fn test_pipe_crash_awards_nothing() {
        let tuning = Tuning::default();
        let mut state = new_state();
        state.phase = GamePhase::Playing;
        {
            let obstacles = state.field.obstacles_mut();
            // Already cleared by x, but another obstacle blocks the bird
            obstacles[0].x = 30.0;
            obstacles[1].x = 110.0;
            obstacles[1].gap_top = 50.0;
            obstacles[1].gap_height = 180.0;
        }

        tick(&mut state, &TickInput::default(), &tuning);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_passing_scores() {
        let tuning = Tuning::default();
        let mut state = new_state();
        state.phase = GamePhase::Playing;
        // Trailing edge 101 -> 99 after the move
        state.field.obstacles_mut()[0].x = 41.0;
        state.field.obstacles_mut()[0].gap_top = 150.0;
        state.field.obstacles_mut()[0].gap_height = 280.0;

        tick(&mut state, &TickInput::default(), &tuning);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 1);
        assert_eq!(state.pipes_passed, 1);
        assert_eq!(state.high_score, 1);
        assert!(state.obstacles()[0].passed);
    }

    #[test]
    fn test_fast_scroll_scores_before_recycling() {
        let tuning = Tuning::default();
        let mut state = new_state();
        state.phase = GamePhase::Playing;
        // Faster than bird_x: the obstacle leaves the screen in a single tick
        state.pipe_speed = 150.0;
        state.field.obstacles_mut()[0].x = 41.0;
        state.field.obstacles_mut()[0].gap_top = 150.0;
        state.field.obstacles_mut()[0].gap_height = 280.0;
        let id = state.obstacles()[0].id;

        tick(&mut state, &TickInput::default(), &tuning);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 1);
        assert_eq!(state.pipes_passed, 1);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::Passed { obstacle_id: id, score: 1 })
        );
        assert!(state.obstacles().iter().all(|o| o.id != id));
    }

    #[test]
    fn test_determinism() {
        let tuning = Tuning::default();
        let mut state1 = GameState::new(99999, &tuning, SessionOptions::default());
        let mut state2 = GameState::new(99999, &tuning, SessionOptions::default());

        for step in 0..400 {
            let input = TickInput {
                flap: step % 18 == 0,
                ..Default::default()
            };
            tick(&mut state1, &input, &tuning);
            tick(&mut state2, &input, &tuning);
        }

        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.bird, state2.bird);
        assert_eq!(state1.obstacles(), state2.obstacles());
    }

    proptest! {
        #[test]
        fn prop_score_matches_passes(seed in any::<u64>(), flaps in proptest::collection::vec(any::<bool>(), 1..600)) {
            let tuning = Tuning::default();
            let mut state = GameState::new(seed, &tuning, SessionOptions::default());
            let mut passed_ids = std::collections::BTreeSet::new();

            for (i, flap) in flaps.into_iter().enumerate() {
                let input = TickInput { flap: flap && i % 4 == 0, ..Default::default() };
                let score_before = state.score;
                tick(&mut state, &input, &tuning);

                let mut newly = 0;
                for event in state.drain_events() {
                    if let GameEvent::Passed { obstacle_id, .. } = event {
                        // An obstacle is never counted twice
                        prop_assert!(passed_ids.insert(obstacle_id));
                        newly += 1;
                    }
                }
                prop_assert_eq!(state.score, score_before + newly);
                prop_assert_eq!(state.score, state.pipes_passed);
                for obstacle in state.obstacles() {
                    if passed_ids.contains(&obstacle.id) {
                        prop_assert!(obstacle.passed);
                    }
                }
            }
        }
    }
}

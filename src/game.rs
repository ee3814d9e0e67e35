//! Host-side game orchestration
//!
//! [`Game`] owns the active session, the persisted profile (high score,
//! unlocks, settings), the store and the frame scheduler. The simulation
//! reports what happened through events; this layer turns them into store
//! writes, unlocks and notifications. Store failures are logged and never
//! interrupt a frame.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::cosmetics::{self, Appearance, BASE_COSMETIC, CATALOG, Cosmetic, UnlockGate};
use crate::highscores::HighScore;
use crate::persistence::KeyValueStore;
use crate::platform::FrameScheduler;
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, SessionOptions, TickInput, tick};
use crate::tuning::{Tuning, TuningError};

/// Rendered frames an unlock notice stays visible
pub const NOTICE_FRAMES: u32 = 180;

/// Player actions delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Jump / confirm
    Flap,
    PauseToggle,
    Restart,
    /// Host surface lost focus
    FocusLost,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Cannot change this during a run")]
    SessionActive,
    #[error("Unknown cosmetic: {0}")]
    UnknownCosmetic(String),
    #[error("Cosmetic not unlocked yet: {0}")]
    LockedCosmetic(String),
}

/// Transient "cosmetic unlocked" banner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlockNotice {
    pub cosmetic: &'static Cosmetic,
    pub frames_left: u32,
}

pub struct Game<S: KeyValueStore> {
    tuning: Tuning,
    settings: Settings,
    state: GameState,
    unlocks: UnlockGate,
    high_score: HighScore,
    store: S,
    scheduler: FrameScheduler,
    /// Source of per-session seeds
    seeds: Pcg32,
    /// Edges collected since the last frame
    input: TickInput,
    /// Appearance of the selected cosmetic (owns the hue phase)
    skin: Appearance,
    notices: Vec<UnlockNotice>,
    new_unlocks: Vec<&'static Cosmetic>,
    events: Vec<GameEvent>,
}

impl<S: KeyValueStore> Game<S> {
    /// Load the profile from `store` and build an Idle session
    pub fn new(tuning: Tuning, store: S, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;

        let settings = Settings::load(&store);
        let unlocks = UnlockGate::load(&store);
        let high_score = HighScore::load(&store);
        let mut seeds = Pcg32::seed_from_u64(seed);

        let cosmetic = resolve_cosmetic(&settings.cosmetic, &unlocks);
        let state = GameState::new(
            seeds.random(),
            &tuning,
            SessionOptions {
                high_score: high_score.best,
                hard_mode: settings.hard_mode,
                cosmetic: cosmetic.id.to_string(),
            },
        );

        log::info!(
            "Game ready: {} cosmetics unlocked, high score {}",
            unlocks.len(),
            high_score.best
        );

        Ok(Self {
            tuning,
            settings,
            state,
            unlocks,
            high_score,
            store,
            scheduler: FrameScheduler::running(),
            seeds,
            input: TickInput::default(),
            skin: cosmetic.appearance,
            notices: Vec::new(),
            new_unlocks: Vec::new(),
            events: Vec::new(),
        })
    }

    /// Deliver a player action. Returns true when the frame loop was stopped
    /// and the host must request a new frame.
    pub fn press(&mut self, action: Action) -> bool {
        match action {
            Action::Flap | Action::Restart if self.state.is_game_over() => self.restart(),
            Action::Restart => false,
            Action::Flap => {
                self.input.flap = true;
                false
            }
            Action::PauseToggle => {
                self.input.pause = true;
                false
            }
            Action::FocusLost => {
                self.input.focus_lost = true;
                false
            }
        }
    }

    /// Run one scheduled frame's update. Returns whether to schedule another.
    pub fn frame(&mut self) -> bool {
        if !self.scheduler.begin_frame() {
            return false;
        }

        self.decay_notices();

        let input = std::mem::take(&mut self.input);
        tick(&mut self.state, &input, &self.tuning);
        self.handle_events();

        if self.state.is_game_over() {
            self.scheduler.stop();
        }
        self.scheduler.is_running()
    }

    fn handle_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::Passed { score, .. } => self.check_unlocks(score),
                GameEvent::NewHighScore(score) => {
                    if self.high_score.submit(score, &mut self.store) {
                        log::info!("New high score: {}", score);
                    }
                }
                GameEvent::Crashed(crash) => {
                    log::info!(
                        "Game over ({:?}): score {}, best {}",
                        crash,
                        self.state.score,
                        self.high_score.best
                    );
                }
                _ => {}
            }
            self.events.push(event);
        }
    }

    fn check_unlocks(&mut self, score: u32) {
        let newly = self.unlocks.check(score, self.state.hard_mode);
        if newly.is_empty() {
            return;
        }
        for &cosmetic in &newly {
            log::info!("Unlocked cosmetic '{}' at score {}", cosmetic.name, score);
            self.notices.push(UnlockNotice {
                cosmetic,
                frames_left: NOTICE_FRAMES,
            });
        }
        self.new_unlocks.extend(newly);
        self.unlocks.persist(&mut self.store);
    }

    fn decay_notices(&mut self) {
        for notice in &mut self.notices {
            notice.frames_left = notice.frames_left.saturating_sub(1);
        }
        self.notices.retain(|n| n.frames_left > 0);
    }

    /// Replace the session and go straight back into play
    fn restart(&mut self) -> bool {
        self.unlocks.reload(&self.store);

        let seed = self.seeds.random();
        let mut state = GameState::new(seed, &self.tuning, self.session_options());
        state.phase = GamePhase::GameOver.restart();
        state.push_event(GameEvent::Started);
        self.state = state;
        self.input = TickInput::default();

        log::info!(
            "Restarted (seed {}, hard mode {})",
            seed,
            self.state.hard_mode
        );
        self.scheduler.start()
    }

    fn session_options(&self) -> SessionOptions {
        let cosmetic = resolve_cosmetic(&self.settings.cosmetic, &self.unlocks);
        SessionOptions {
            high_score: self.high_score.best,
            hard_mode: self.settings.hard_mode,
            cosmetic: cosmetic.id.to_string(),
        }
    }

    /// Toggle hard mode for the next run. Rejected during a run.
    pub fn set_hard_mode(&mut self, hard_mode: bool) -> Result<(), GameError> {
        if self.state.phase.is_active() {
            return Err(GameError::SessionActive);
        }
        self.settings.hard_mode = hard_mode;
        self.settings.save(&mut self.store);
        if self.state.phase == GamePhase::Idle {
            self.state.hard_mode = hard_mode;
        }
        log::info!("Hard mode {}", if hard_mode { "on" } else { "off" });
        Ok(())
    }

    /// Turn sound effects on or off. Allowed at any time.
    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.settings.sound_enabled = enabled;
        self.settings.save(&mut self.store);
        log::info!("Sound {}", if enabled { "on" } else { "off" });
    }

    /// Select an unlocked cosmetic. Rejected during a run.
    pub fn select_cosmetic(&mut self, id: &str) -> Result<&'static Cosmetic, GameError> {
        if self.state.phase.is_active() {
            return Err(GameError::SessionActive);
        }
        let cosmetic =
            cosmetics::find(id).ok_or_else(|| GameError::UnknownCosmetic(id.to_string()))?;
        if !self.unlocks.is_unlocked(id) {
            return Err(GameError::LockedCosmetic(id.to_string()));
        }

        self.settings.cosmetic = cosmetic.id.to_string();
        self.settings.save(&mut self.store);
        self.state.bird.cosmetic = cosmetic.id.to_string();
        self.skin = cosmetic.appearance;
        Ok(cosmetic)
    }

    /// Select the next unlocked cosmetic in catalog order
    pub fn cycle_cosmetic(&mut self) -> Result<&'static Cosmetic, GameError> {
        let current = CATALOG
            .iter()
            .position(|c| c.id == self.state.bird.cosmetic)
            .unwrap_or(0);
        let next = (1..=CATALOG.len())
            .map(|offset| &CATALOG[(current + offset) % CATALOG.len()])
            .find(|c| self.unlocks.is_unlocked(c.id))
            .map(|c| c.id)
            .unwrap_or(BASE_COSMETIC);
        self.select_cosmetic(next)
    }

    /// Bird colour for this render; advances cycling cosmetics. Call once per render.
    pub fn next_skin_color(&mut self) -> [f32; 4] {
        self.skin.advance();
        self.skin.color()
    }

    /// Events since the last drain (sound triggers etc.)
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Cosmetics unlocked since the last drain
    pub fn drain_new_unlocks(&mut self) -> Vec<&'static Cosmetic> {
        std::mem::take(&mut self.new_unlocks)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn unlocks(&self) -> &UnlockGate {
        &self.unlocks
    }

    pub fn high_score(&self) -> u32 {
        self.high_score.best
    }

    pub fn notices(&self) -> &[UnlockNotice] {
        &self.notices
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Selected cosmetic if known and unlocked, otherwise the base one
fn resolve_cosmetic(id: &str, unlocks: &UnlockGate) -> &'static Cosmetic {
    cosmetics::find(id)
        .filter(|c| unlocks.is_unlocked(c.id))
        .unwrap_or(&CATALOG[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{FailingStore, MemoryStore, keys, load_json};

    fn new_game() -> Game<MemoryStore> {
        Game::new(Tuning::default(), MemoryStore::new(), 7).unwrap()
    }

    /// Drive `n` frames that each pass exactly one obstacle
    fn score_passes<S: KeyValueStore>(game: &mut Game<S>, n: u32) {
        for _ in 0..n {
            game.state.bird.y = 300.0;
            game.state.bird.velocity = 0.0;
            let obstacle = game
                .state
                .field
                .obstacles_mut()
                .iter_mut()
                .find(|o| !o.passed)
                .unwrap();
            obstacle.x = 41.0;
            assert!(game.frame());
        }
    }

    fn crash<S: KeyValueStore>(game: &mut Game<S>) {
        game.state.bird.y = 599.0;
        game.frame();
        assert_eq!(game.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_startup_defaults() {
        let game = new_game();
        assert_eq!(game.phase(), GamePhase::Idle);
        assert_eq!(game.high_score(), 0);
        assert_eq!(game.unlocks().unlocked().collect::<Vec<_>>(), vec![BASE_COSMETIC]);
        assert!(game.scheduler().is_running());
        assert_eq!(game.state().bird.cosmetic, BASE_COSMETIC);
    }

    #[test]
    fn test_startup_survives_failing_store() {
        let mut game = Game::new(Tuning::default(), FailingStore::default(), 7).unwrap();
        assert_eq!(game.high_score(), 0);

        game.press(Action::Flap);
        game.frame();
        score_passes(&mut game, 12);
        assert_eq!(game.state().score, 12);
        assert_eq!(game.high_score(), 12);
        assert!(game.unlocks().is_unlocked("crimson"));
        assert!(game.store().writes_attempted > 0);
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let tuning = Tuning {
            min_gap: 500.0,
            ..Default::default()
        };
        assert!(Game::new(tuning, MemoryStore::new(), 1).is_err());
    }

    #[test]
    fn test_inputs_apply_on_next_frame() {
        let mut game = new_game();
        assert!(!game.press(Action::Flap));
        assert_eq!(game.phase(), GamePhase::Idle);
        game.frame();
        assert_eq!(game.phase(), GamePhase::Playing);

        game.press(Action::PauseToggle);
        assert!(game.frame());
        assert_eq!(game.phase(), GamePhase::Paused);

        // Restart outside GameOver does nothing
        assert!(!game.press(Action::Restart));
        game.frame();
        assert_eq!(game.phase(), GamePhase::Paused);
    }

    #[test]
    fn test_game_over_stops_and_restart_resumes() {
        let mut game = new_game();
        game.press(Action::Flap);
        game.frame();
        score_passes(&mut game, 3);
        let first_seed = game.state().seed;

        game.state.bird.y = 599.0;
        assert!(!game.frame());
        assert!(!game.scheduler().is_running());

        // Stopped: frames do nothing
        let y = game.state().bird.y;
        assert!(!game.frame());
        assert_eq!(game.state().bird.y, y);

        // Restart goes straight back into play with a fresh session
        assert!(game.press(Action::Flap));
        assert_eq!(game.phase(), GamePhase::Playing);
        assert!(game.scheduler().is_running());
        assert_eq!(game.state().score, 0);
        assert_eq!(game.state().high_score, 3);
        assert_ne!(game.state().seed, first_seed);
        assert!(game.frame());
    }

    #[test]
    fn test_high_score_persisted() {
        let mut game = new_game();
        game.press(Action::Flap);
        game.frame();
        score_passes(&mut game, 4);

        assert_eq!(load_json::<u32>(game.store(), keys::HIGH_SCORE), Some(4));
        let events = game.drain_events();
        assert!(events.contains(&GameEvent::NewHighScore(4)));
    }

    #[test]
    fn test_unlock_notice_and_persistence() {
        let mut game = new_game();
        game.press(Action::Flap);
        game.frame();
        score_passes(&mut game, 10);

        assert!(game.unlocks().is_unlocked("crimson"));
        assert_eq!(game.notices().len(), 1);
        assert_eq!(game.notices()[0].cosmetic.id, "crimson");
        let fresh: Vec<&str> = game.drain_new_unlocks().iter().map(|c| c.id).collect();
        assert_eq!(fresh, vec!["crimson"]);
        assert!(game.drain_new_unlocks().is_empty());

        let stored: Vec<String> =
            load_json(game.store(), keys::UNLOCKED_COSMETICS).unwrap();
        assert!(stored.contains(&"crimson".to_string()));

        // Notice expires, paused frames included
        game.press(Action::PauseToggle);
        for _ in 0..NOTICE_FRAMES {
            game.frame();
        }
        assert!(game.notices().is_empty());
    }

    #[test]
    fn test_hard_mode_locked_during_run() {
        let mut game = new_game();
        game.set_hard_mode(true).unwrap();
        assert!(game.state().hard_mode);
        assert!(game.settings().hard_mode);

        game.press(Action::Flap);
        game.frame();
        assert_eq!(game.set_hard_mode(false), Err(GameError::SessionActive));

        game.press(Action::PauseToggle);
        game.frame();
        assert_eq!(game.set_hard_mode(false), Err(GameError::SessionActive));
        assert!(game.state().hard_mode);
    }

    #[test]
    fn test_sound_toggle_persists_mid_run() {
        let mut game = new_game();
        game.press(Action::Flap);
        game.frame();
        assert!(game.settings().sound_enabled);

        game.set_sound_enabled(false);
        assert!(!game.settings().sound_enabled);
        assert_eq!(game.settings().effective_sfx_volume(), 0.0);
        assert_eq!(game.phase(), GamePhase::Playing);

        let stored: Settings = load_json(game.store(), keys::SETTINGS).unwrap();
        assert!(!stored.sound_enabled);
    }

    #[test]
    fn test_hard_mode_unlock_is_permanent() {
        let mut game = new_game();
        game.set_hard_mode(true).unwrap();
        game.press(Action::Flap);
        game.frame();
        score_passes(&mut game, 15);
        assert!(game.unlocks().is_unlocked("shadow"));
        crash(&mut game);

        // Toggle applies to the next session only
        game.set_hard_mode(false).unwrap();
        assert!(game.state().hard_mode);
        game.press(Action::Restart);
        assert!(!game.state().hard_mode);
        assert!(game.unlocks().is_unlocked("shadow"));

        // Reload from a fresh Game over the same store
        let store = game.store().clone();
        let reloaded = Game::new(Tuning::default(), store, 1).unwrap();
        assert!(reloaded.unlocks().is_unlocked("shadow"));
    }

    #[test]
    fn test_cosmetic_selection_rules() {
        let mut game = new_game();
        assert_eq!(
            game.select_cosmetic("nope"),
            Err(GameError::UnknownCosmetic("nope".into()))
        );
        assert_eq!(
            game.select_cosmetic("prism"),
            Err(GameError::LockedCosmetic("prism".into()))
        );

        game.press(Action::Flap);
        game.frame();
        score_passes(&mut game, 10);
        assert_eq!(
            game.select_cosmetic("crimson"),
            Err(GameError::SessionActive)
        );
        crash(&mut game);

        assert_eq!(game.select_cosmetic("crimson").map(|c| c.id), Ok("crimson"));
        assert_eq!(game.settings().cosmetic, "crimson");
        game.press(Action::Restart);
        assert_eq!(game.state().bird.cosmetic, "crimson");
    }

    #[test]
    fn test_cycle_cosmetic_skips_locked() {
        let mut game = new_game();
        assert_eq!(game.cycle_cosmetic().map(|c| c.id), Ok(BASE_COSMETIC));

        game.unlocks.check(25, false);
        assert_eq!(game.cycle_cosmetic().map(|c| c.id), Ok("crimson"));
        assert_eq!(game.cycle_cosmetic().map(|c| c.id), Ok("azure"));
        assert_eq!(game.cycle_cosmetic().map(|c| c.id), Ok(BASE_COSMETIC));
    }

    #[test]
    fn test_skin_color_cycles_once_per_render() {
        let mut store = MemoryStore::new();
        store
            .set(keys::UNLOCKED_COSMETICS, r#"["classic","prism"]"#)
            .unwrap();
        let mut game = Game::new(Tuning::default(), store, 3).unwrap();
        game.select_cosmetic("prism").unwrap();

        let a = game.next_skin_color();
        let b = game.next_skin_color();
        assert_ne!(a, b);
        assert_eq!(game.skin, Appearance::CyclingHue { phase: 2 });
    }

    #[test]
    fn test_saved_selection_restored_only_if_unlocked() {
        let mut store = MemoryStore::new();
        store
            .set(keys::SETTINGS, r#"{ "cosmetic": "emerald", "hard_mode": true }"#)
            .unwrap();
        let game = Game::new(Tuning::default(), store, 3).unwrap();
        assert_eq!(game.state().bird.cosmetic, BASE_COSMETIC);
        assert!(game.state().hard_mode);
    }
}

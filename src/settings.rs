//! Player preferences
//!
//! Persisted under `settings`. Hard mode and the selected cosmetic only
//! change outside active play; a new session reads both from here.

use serde::{Deserialize, Serialize};

use crate::cosmetics::BASE_COSMETIC;
use crate::persistence::{KeyValueStore, keys, load_json, save_json};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Gameplay ===
    /// Hard difficulty curve for the next session
    pub hard_mode: bool,
    /// Cosmetic id for the next session
    pub cosmetic: String,

    // === Audio ===
    /// Play a sound on each jump (and other cues)
    pub sound_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute when the window loses focus
    pub mute_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hard_mode: false,
            cosmetic: BASE_COSMETIC.to_string(),

            sound_enabled: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            mute_on_blur: true,
        }
    }
}

impl Settings {
    /// Load settings, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json::<Settings>(store, keys::SETTINGS) {
            Some(settings) => {
                log::info!("Loaded settings");
                settings.sanitized()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> bool {
        let saved = save_json(store, keys::SETTINGS, self);
        if saved {
            log::info!("Settings saved");
        }
        saved
    }

    /// Effective sound-effect gain (0 when sound is off)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.sound_enabled {
            self.master_volume * self.sfx_volume
        } else {
            0.0
        }
    }

    fn sanitized(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        if self.cosmetic.is_empty() {
            self.cosmetic = BASE_COSMETIC.to_string();
        }
        self
    }
}

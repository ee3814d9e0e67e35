//! Bird cosmetics and score-gated unlocking
//!
//! The unlocked set is plain data persisted under `unlockedCosmetics`.
//! It only ever grows: reloading merges stored ids into memory and nothing
//! revokes an id, even if the mode that earned it is never played again.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, keys, load_json, save_json};

/// Always unlocked, also the fallback selection
pub const BASE_COSMETIC: &str = "classic";

/// Hue shift per rendered frame for cycling cosmetics (degrees)
pub const HUE_STEP_DEGREES: f32 = 3.0;

/// How a cosmetic colours the bird
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Appearance {
    SolidColor([u8; 3]),
    /// Hue rotates with `phase`, which advances once per render
    CyclingHue { phase: u64 },
}

impl Appearance {
    /// Call exactly once per rendered frame
    pub fn advance(&mut self) {
        if let Appearance::CyclingHue { phase } = self {
            *phase += 1;
        }
    }

    pub fn rgb(&self) -> [u8; 3] {
        match *self {
            Appearance::SolidColor(rgb) => rgb,
            Appearance::CyclingHue { phase } => {
                let hue = (phase as f32 * HUE_STEP_DEGREES) % 360.0;
                hue_to_rgb(hue)
            }
        }
    }

    /// Linear RGBA for the renderer
    pub fn color(&self) -> [f32; 4] {
        let [r, g, b] = self.rgb();
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
    }
}

/// Fully saturated colour for a hue in degrees
fn hue_to_rgb(hue: f32) -> [u8; 3] {
    let h = hue / 60.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    [(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8]
}

/// A selectable bird variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cosmetic {
    pub id: &'static str,
    pub name: &'static str,
    pub required_score: u32,
    pub requires_hard_mode: bool,
    pub appearance: Appearance,
}

impl Cosmetic {
    /// Unlock rule for a single scoring event
    pub fn qualifies(&self, score: u32, hard_mode: bool) -> bool {
        score >= self.required_score && (!self.requires_hard_mode || hard_mode)
    }
}

pub static CATALOG: [Cosmetic; 6] = [
    Cosmetic {
        id: BASE_COSMETIC,
        name: "Classic",
        required_score: 0,
        requires_hard_mode: false,
        appearance: Appearance::SolidColor([0xFF, 0xD7, 0x00]),
    },
    Cosmetic {
        id: "crimson",
        name: "Crimson",
        required_score: 10,
        requires_hard_mode: false,
        appearance: Appearance::SolidColor([0xE7, 0x4C, 0x3C]),
    },
    Cosmetic {
        id: "azure",
        name: "Azure",
        required_score: 25,
        requires_hard_mode: false,
        appearance: Appearance::SolidColor([0x34, 0x98, 0xDB]),
    },
    Cosmetic {
        id: "emerald",
        name: "Emerald",
        required_score: 50,
        requires_hard_mode: false,
        appearance: Appearance::SolidColor([0x2E, 0xCC, 0x71]),
    },
    Cosmetic {
        id: "shadow",
        name: "Shadow",
        required_score: 15,
        requires_hard_mode: true,
        appearance: Appearance::SolidColor([0x2C, 0x2C, 0x34]),
    },
    Cosmetic {
        id: "prism",
        name: "Prism",
        required_score: 30,
        requires_hard_mode: true,
        appearance: Appearance::CyclingHue { phase: 0 },
    },
];

/// Look up a catalog entry by id
pub fn find(id: &str) -> Option<&'static Cosmetic> {
    CATALOG.iter().find(|c| c.id == id)
}

/// Set of unlocked cosmetic ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockGate {
    unlocked: BTreeSet<String>,
}

impl Default for UnlockGate {
    fn default() -> Self {
        Self::new()
    }
}

impl UnlockGate {
    /// Only the base cosmetic
    pub fn new() -> Self {
        let mut unlocked = BTreeSet::new();
        unlocked.insert(BASE_COSMETIC.to_string());
        Self { unlocked }
    }

    /// Seed from the store; read failure leaves just the base cosmetic
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let mut gate = Self::new();
        gate.reload(store);
        gate
    }

    /// Merge stored ids into memory. Never removes anything.
    pub fn reload(&mut self, store: &dyn KeyValueStore) {
        if let Some(stored) = load_json::<Vec<String>>(store, keys::UNLOCKED_COSMETICS) {
            self.unlocked.extend(stored);
        }
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    pub fn unlocked(&self) -> impl Iterator<Item = &str> {
        self.unlocked.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.unlocked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unlocked.is_empty()
    }

    /// Unlock every locked cosmetic this scoring event qualifies for.
    /// Returns the newly unlocked entries in catalog order.
    pub fn check(&mut self, score: u32, hard_mode: bool) -> Vec<&'static Cosmetic> {
        let mut newly = Vec::new();
        for cosmetic in CATALOG.iter() {
            if !self.unlocked.contains(cosmetic.id) && cosmetic.qualifies(score, hard_mode) {
                self.unlocked.insert(cosmetic.id.to_string());
                newly.push(cosmetic);
            }
        }
        newly
    }

    /// Write the full set back. Failure is logged; memory is kept.
    pub fn persist(&self, store: &mut dyn KeyValueStore) -> bool {
        let ids: Vec<&str> = self.unlocked().collect();
        save_json(store, keys::UNLOCKED_COSMETICS, &ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{FailingStore, MemoryStore};
    use proptest::prelude::*;

    #[test]
    fn test_base_always_unlocked() {
        assert!(UnlockGate::new().is_unlocked(BASE_COSMETIC));
        assert!(UnlockGate::load(&MemoryStore::new()).is_unlocked(BASE_COSMETIC));
        let gate = UnlockGate::load(&FailingStore::default());
        assert_eq!(gate.unlocked().collect::<Vec<_>>(), vec![BASE_COSMETIC]);
    }

    #[test]
    fn test_score_thresholds() {
        let mut gate = UnlockGate::new();
        assert!(gate.check(9, false).is_empty());

        let newly: Vec<&str> = gate.check(10, false).iter().map(|c| c.id).collect();
        assert_eq!(newly, vec!["crimson"]);

        // Reported once only
        assert!(gate.check(10, false).is_empty());

        let newly: Vec<&str> = gate.check(60, false).iter().map(|c| c.id).collect();
        assert_eq!(newly, vec!["azure", "emerald"]);
    }

    #[test]
    fn test_hard_mode_cosmetics_need_hard_mode() {
        let mut gate = UnlockGate::new();
        gate.check(1000, false);
        assert!(!gate.is_unlocked("shadow"));
        assert!(!gate.is_unlocked("prism"));

        let newly: Vec<&str> = gate.check(15, true).iter().map(|c| c.id).collect();
        assert_eq!(newly, vec!["shadow"]);
        let newly: Vec<&str> = gate.check(30, true).iter().map(|c| c.id).collect();
        assert_eq!(newly, vec!["prism"]);
    }

    #[test]
    fn test_persist_and_reload_only_grows() {
        let mut store = MemoryStore::new();
        let mut gate = UnlockGate::new();
        gate.check(20, true);
        assert!(gate.persist(&mut store));

        let loaded = UnlockGate::load(&store);
        assert!(loaded.is_unlocked("crimson"));
        assert!(loaded.is_unlocked("shadow"));

        // A store that lost entries does not revoke anything in memory
        store
            .set(keys::UNLOCKED_COSMETICS, r#"["classic"]"#)
            .unwrap();
        gate.reload(&store);
        assert!(gate.is_unlocked("shadow"));
    }

    #[test]
    fn test_failed_persist_keeps_memory() {
        let mut gate = UnlockGate::new();
        gate.check(10, false);
        let mut store = FailingStore::default();
        assert!(!gate.persist(&mut store));
        assert!(gate.is_unlocked("crimson"));
    }

    #[test]
    fn test_cycling_hue_advances_per_call() {
        let mut appearance = find("prism").unwrap().appearance;
        let first = appearance.rgb();
        appearance.advance();
        appearance.advance();
        assert_eq!(appearance, Appearance::CyclingHue { phase: 2 });
        assert_ne!(appearance.rgb(), first);

        let mut solid = find(BASE_COSMETIC).unwrap().appearance;
        solid.advance();
        assert_eq!(solid.rgb(), [0xFF, 0xD7, 0x00]);
    }

    #[test]
    fn test_hue_wheel_primaries() {
        assert_eq!(hue_to_rgb(0.0), [255, 0, 0]);
        assert_eq!(hue_to_rgb(120.0), [0, 255, 0]);
        assert_eq!(hue_to_rgb(240.0), [0, 0, 255]);
    }

    proptest! {
        #[test]
        fn prop_hard_only_never_unlocks_in_normal(scores in proptest::collection::vec(0u32..10_000, 1..50)) {
            let mut gate = UnlockGate::new();
            for score in scores {
                gate.check(score, false);
            }
            for cosmetic in CATALOG.iter().filter(|c| c.requires_hard_mode) {
                prop_assert!(!gate.is_unlocked(cosmetic.id));
            }
        }
    }
}

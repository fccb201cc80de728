//! Player preferences
//!
//! Persisted to LocalStorage on wasm. Game state itself is never persisted;
//! only these UI-level preferences survive a reload.

use serde::{Deserialize, Serialize};

use crate::sim::GameMode;

/// Which gameplay variant the session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    #[default]
    Runner,
    Racer,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Runner => "Runner",
            Variant::Racer => "Racer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "runner" => Some(Variant::Runner),
            "racer" => Some(Variant::Racer),
            _ => None,
        }
    }

    pub fn mode(&self) -> GameMode {
        match self {
            Variant::Runner => GameMode::Runner,
            Variant::Racer => GameMode::Racer,
        }
    }

    /// Sequencer step length. Two tempos across the variants.
    pub fn step_ms(&self) -> i32 {
        match self {
            Variant::Runner => 200,
            Variant::Racer => 160,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Gameplay variant
    pub variant: Variant,
    /// Global mute: gates all synthesis and stops the sequencer timer
    pub muted: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            muted: false,
            master_volume: 0.8,
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "ninja_dash_settings";

    /// Load from LocalStorage, falling back to defaults
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|s| s.get_item(Self::STORAGE_KEY).ok())
            .flatten();
        match stored {
            Some(json) => serde_json::from_str(&json).unwrap_or_default(),
            None => Self::default(),
        }
    }

    /// Save to LocalStorage (best effort)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            if let Some(storage) = web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
            {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_round_trip() {
        let settings = Settings {
            variant: Variant::Racer,
            muted: true,
            master_volume: 0.5,
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.variant, Variant::Racer);
        assert!(back.muted);
        assert_eq!(back.master_volume, 0.5);
    }

    #[test]
    fn test_variant_parse() {
        assert_eq!(Variant::from_str("racer"), Some(Variant::Racer));
        assert_eq!(Variant::from_str("Runner"), Some(Variant::Runner));
        assert_eq!(Variant::from_str("pong"), None);
    }

    #[test]
    fn test_variant_tempo_in_band() {
        for v in [Variant::Runner, Variant::Racer] {
            let ms = v.step_ms();
            assert!((150..=220).contains(&ms));
        }
    }
}

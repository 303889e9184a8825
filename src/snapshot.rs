//! Read-only view of a session for renderers.

use crate::difficulty::Difficulty;
use crate::effects::{Particle, TextPopup};
use crate::powerups::PowerUpKind;
use crate::session::GameState;
use crate::word_manager::WordTier;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WordView {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub tier: WordTier,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PowerUpView {
    pub kind: PowerUpKind,
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

/// A running timed effect.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectStatus {
    pub kind: PowerUpKind,
    pub remaining_ms: f64,
    /// Remaining fraction of the full duration (1.0 right after pickup).
    pub progress: f64,
}

impl EffectStatus {
    /// Whole seconds left, rounded up the way the HUD shows it.
    pub fn seconds_left(&self) -> u32 {
        (self.remaining_ms / 1000.0).ceil() as u32
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionSnapshot {
    pub state: GameState,
    pub difficulty: Difficulty,
    pub score: u32,
    pub lives: i32,
    pub level: u32,
    pub words_until_level_up: u32,
    pub words_per_level: u32,
    pub wpm: u32,
    pub accuracy: u32,
    pub current_speed: f64,
    pub input: String,
    pub field_width: f64,
    pub field_height: f64,
    pub words: Vec<WordView>,
    pub powerups: Vec<PowerUpView>,
    pub effects: Vec<EffectStatus>,
    pub particles: Vec<Particle>,
    pub popups: Vec<TextPopup>,
    pub shake_offset: (f64, f64),
}

impl SessionSnapshot {
    /// Words typed toward the next level.
    pub fn level_progress(&self) -> u32 {
        self.words_per_level.saturating_sub(self.words_until_level_up)
    }

    pub fn is_effect_active(&self, kind: PowerUpKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }
}

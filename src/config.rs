//! Tunable game constants.
//!
//! Everything the simulation needs to know about the play field lives in
//! [`GameConfig`]. The defaults reproduce the shipped 640×480 game; a front end
//! can load an override from JSON when the `serde_json` feature is enabled.

#[cfg(feature = "serde_json")]
use crate::error::GameError;
use crate::difficulty::Difficulty;

/// One nominal frame at 60 Hz. Speeds and lifetimes were tuned in frames, the
/// simulation scales them by `dt / FRAME_MS`.
pub const FRAME_MS: f64 = 1000.0 / 60.0;

/// Largest frame delta the front end feeds into a tick.
pub const MAX_FRAME_DT_MS: f64 = 100.0;

/// Hard cap on falling-word speed (pixels per nominal frame).
pub const MAX_WORD_SPEED: f64 = 3.0;

/// Speed multiplier applied on every level up.
pub const SPEED_INCREASE_FACTOR: f64 = 1.1;

/// Correct words needed per level.
pub const WORDS_FOR_LEVEL_UP: u32 = 5;

/// Horizontal offset per character used to locate a matched word's centre.
pub const CHAR_WIDTH_ESTIMATE: f64 = 6.0;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub field_width: f64,
    pub field_height: f64,
    /// Words spawn with x in `[spawn_margin_left, field_width - spawn_margin_right)`.
    pub spawn_margin_left: f64,
    pub spawn_margin_right: f64,
    pub word_spawn_y: f64,
    /// Minimum |dx| between a new word and any active word above `near_top_y`.
    pub min_word_separation: f64,
    pub near_top_y: f64,
    pub max_spawn_attempts: u32,
    /// A word at or below `field_height - miss_line_offset` counts as missed.
    pub miss_line_offset: f64,
    /// Words past `field_height + word_exit_offset` are dropped from the field.
    pub word_exit_offset: f64,
    pub powerup_spawn_chance: f64,
    pub max_powerups: usize,
    pub powerup_speed: f64,
    pub powerup_size: f64,
    pub powerup_margin: f64,
    pub powerup_spawn_y: f64,
    pub powerup_exit_offset: f64,
    pub freeze_duration_ms: f64,
    pub shield_duration_ms: f64,
    pub words_for_level_up: u32,
    pub speed_increase_factor: f64,
    pub max_word_speed: f64,
    pub default_difficulty: Difficulty,
    /// `log` level name used by the wasm console logger ("error" .. "trace").
    pub log_level: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: 640.0,
            field_height: 480.0,
            spawn_margin_left: 30.0,
            spawn_margin_right: 70.0,
            word_spawn_y: -20.0,
            min_word_separation: 80.0,
            near_top_y: 60.0,
            max_spawn_attempts: 8,
            miss_line_offset: 30.0,
            word_exit_offset: 20.0,
            powerup_spawn_chance: 0.01,
            max_powerups: 2,
            powerup_speed: 0.8,
            powerup_size: 16.0,
            powerup_margin: 50.0,
            powerup_spawn_y: -30.0,
            powerup_exit_offset: 30.0,
            freeze_duration_ms: 5_000.0,
            shield_duration_ms: 10_000.0,
            words_for_level_up: WORDS_FOR_LEVEL_UP,
            speed_increase_factor: SPEED_INCREASE_FACTOR,
            max_word_speed: MAX_WORD_SPEED,
            default_difficulty: Difficulty::Medium,
            log_level: "info".to_string(),
        }
    }
}

impl GameConfig {
    pub fn center(&self) -> (f64, f64) {
        (self.field_width / 2.0, self.field_height / 2.0)
    }

    pub fn miss_line(&self) -> f64 {
        self.field_height - self.miss_line_offset
    }

    pub fn word_exit_line(&self) -> f64 {
        self.field_height + self.word_exit_offset
    }

    pub fn powerup_exit_line(&self) -> f64 {
        self.field_height + self.powerup_exit_offset
    }

    pub fn collection_radius(&self) -> f64 {
        self.powerup_size * 2.0
    }

    /// Span words may spawn in; never empty even on a tiny field.
    pub fn word_spawn_range(&self) -> (f64, f64) {
        let lo = self.spawn_margin_left;
        let hi = (self.field_width - self.spawn_margin_right).max(lo + 1.0);
        (lo, hi)
    }

    pub fn powerup_spawn_range(&self) -> (f64, f64) {
        let lo = self.powerup_margin;
        let hi = (self.field_width - self.powerup_margin).max(lo + 1.0);
        (lo, hi)
    }

    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }

    /// Parse a (possibly partial) JSON override; missing keys keep their defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let cfg: GameConfig =
            serde_json::from_str(json).map_err(|e| GameError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    #[cfg(feature = "serde_json")]
    fn validate(&self) -> Result<(), GameError> {
        if self.field_width <= 0.0 || self.field_height <= 0.0 {
            return Err(GameError::Config("field dimensions must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.powerup_spawn_chance) {
            return Err(GameError::Config("powerup_spawn_chance must be within 0..=1".into()));
        }
        if self.words_for_level_up == 0 {
            return Err(GameError::Config("words_for_level_up must be at least 1".into()));
        }
        if self.word_exit_line() <= self.miss_line() {
            return Err(GameError::Config("word exit line must lie below the miss line".into()));
        }
        if self.field_width - self.spawn_margin_right <= self.spawn_margin_left {
            return Err(GameError::Config("word spawn band is empty".into()));
        }
        if self.min_word_separation < 0.0 {
            return Err(GameError::Config("min_word_separation must not be negative".into()));
        }
        if self.max_spawn_attempts == 0 {
            return Err(GameError::Config("max_spawn_attempts must be at least 1".into()));
        }
        if self.max_word_speed <= 0.0 || self.speed_increase_factor < 1.0 {
            return Err(GameError::Config("speed ramp must be non-decreasing and capped above zero".into()));
        }
        Ok(())
    }
}

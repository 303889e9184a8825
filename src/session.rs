//! The per-frame orchestrator.
//!
//! `GameSession` owns every manager and all scoring state. A front end calls
//! [`GameSession::tick`] once per animation frame with the elapsed time, feeds
//! keyboard input through [`GameSession::handle_key`] (or the finer-grained
//! methods) and renders [`GameSession::snapshot`].

use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

use crate::config::{FRAME_MS, GameConfig};
use crate::difficulty::Difficulty;
use crate::effects::{DEFAULT_BURST_COUNT, EffectsManager};
use crate::error::GameError;
use crate::powerups::{PowerUpKind, PowerUpManager};
use crate::snapshot::{EffectStatus, PowerUpView, SessionSnapshot, WordView};
use crate::word_manager::{WordManager, WordMatch};

const MATCH_COLOR: &str = "#55ff55";
const PICKUP_COLOR: &str = "#ffff55";
const LEVEL_COLOR: &str = "#55ffff";
const DANGER_COLOR: &str = "#ff5555";
const MISS_SHAKE: f64 = 5.0;
const LIFE_LOST_SHAKE: f64 = 8.0;
const LEVEL_POPUP_Y: f64 = 160.0;
const LIFE_POPUP_Y: f64 = 120.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameState {
    #[default]
    SelectingDifficulty,
    Playing,
    GameOver,
}

/// Audio the front end should play; playback failures are its problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SoundCue {
    Type,
    Correct,
    Wrong,
    PowerUp,
}

impl SoundCue {
    /// Id of the `<audio>` element carrying this cue.
    pub fn element_id(self) -> &'static str {
        match self {
            SoundCue::Type => "typeSound",
            SoundCue::Correct => "correctSound",
            SoundCue::Wrong => "wrongSound",
            SoundCue::PowerUp => "powerupSound",
        }
    }
}

/// What a submission did.
#[derive(Clone, Debug, PartialEq)]
pub enum Submission {
    /// Blank input, or not playing.
    Ignored,
    Matched {
        word: WordMatch,
        leveled_up: bool,
        powerup: Option<PowerUpKind>,
    },
    Missed,
}

pub struct GameSession {
    config: GameConfig,
    state: GameState,
    difficulty: Difficulty,
    score: u32,
    lives: i32,
    level: u32,
    words_until_level_up: u32,
    clock_ms: f64,
    start_ms: f64,
    // Set on game over so the final WPM stops drifting.
    end_ms: Option<f64>,
    last_spawn_ms: Option<f64>,
    total_chars_typed: u32,
    correct_words: u32,
    input: String,
    cues: Vec<SoundCue>,
    words: WordManager,
    powerups: PowerUpManager,
    effects: EffectsManager,
}

impl GameSession {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut master = SmallRng::seed_from_u64(seed);
        let difficulty = config.default_difficulty;
        Self {
            words: WordManager::new(config.clone(), master.next_u64()),
            powerups: PowerUpManager::new(config.clone(), master.next_u64()),
            effects: EffectsManager::new(master.next_u64()),
            state: GameState::SelectingDifficulty,
            difficulty,
            score: 0,
            lives: difficulty.profile().lives as i32,
            level: 1,
            words_until_level_up: config.words_for_level_up,
            clock_ms: 0.0,
            start_ms: 0.0,
            end_ms: None,
            last_spawn_ms: None,
            total_chars_typed: 0,
            correct_words: 0,
            input: String::new(),
            cues: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> i32 {
        self.lives
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn words_until_level_up(&self) -> u32 {
        self.words_until_level_up
    }

    pub fn total_chars_typed(&self) -> u32 {
        self.total_chars_typed
    }

    pub fn correct_words(&self) -> u32 {
        self.correct_words
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn word_manager(&self) -> &WordManager {
        &self.words
    }

    pub fn word_manager_mut(&mut self) -> &mut WordManager {
        &mut self.words
    }

    pub fn powerup_manager(&self) -> &PowerUpManager {
        &self.powerups
    }

    pub fn powerup_manager_mut(&mut self) -> &mut PowerUpManager {
        &mut self.powerups
    }

    pub fn effects(&self) -> &EffectsManager {
        &self.effects
    }

    // --- State transitions -----------------------------------------------------

    pub fn select_difficulty(&mut self, id: Difficulty) -> Result<(), GameError> {
        if self.state != GameState::SelectingDifficulty {
            return Err(GameError::InvalidState {
                action: "select a difficulty",
                state: self.state,
            });
        }
        let profile = id.profile();
        self.difficulty = id;
        self.words.set_difficulty(id);
        self.lives = profile.lives as i32;
        self.score = 0;
        self.level = 1;
        self.words_until_level_up = self.config.words_for_level_up;
        self.total_chars_typed = 0;
        self.correct_words = 0;
        self.input.clear();
        self.start_ms = self.clock_ms;
        self.end_ms = None;
        self.last_spawn_ms = None;
        self.state = GameState::Playing;

        let (cx, cy) = self.config.center();
        self.effects
            .add_text_popup(format!("{} MODE!", profile.label), cx, cy, profile.color);
        info!("game started on {id}: {} lives, speed {}", profile.lives, profile.word_speed);
        Ok(())
    }

    /// Discard the round and return to difficulty selection. Leaves the session
    /// indistinguishable (in its snapshot) from a freshly built one.
    pub fn reset_game(&mut self) {
        let difficulty = self.config.default_difficulty;
        self.state = GameState::SelectingDifficulty;
        self.difficulty = difficulty;
        self.score = 0;
        self.lives = difficulty.profile().lives as i32;
        self.level = 1;
        self.words_until_level_up = self.config.words_for_level_up;
        self.start_ms = self.clock_ms;
        self.end_ms = None;
        self.last_spawn_ms = None;
        self.total_chars_typed = 0;
        self.correct_words = 0;
        self.input.clear();
        self.cues.clear();
        self.words.clear_words();
        self.words.set_difficulty(difficulty);
        self.powerups.clear();
        self.effects.clear();
        info!("session reset");
    }

    // --- Frame -----------------------------------------------------------------

    /// Advance the simulation by `dt_ms` milliseconds.
    pub fn tick(&mut self, dt_ms: f64) {
        let dt = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
        self.clock_ms += dt;
        let frames = dt / FRAME_MS;

        if self.state != GameState::Playing {
            self.effects.tick(dt);
            return;
        }

        self.powerups.tick(dt);
        self.powerups.try_spawn(frames);
        self.effects.tick(dt);

        if !self.powerups.is_effect_active(PowerUpKind::Freeze) {
            let delay = self.words.profile().spawn_delay_ms;
            let due = self
                .last_spawn_ms
                .is_none_or(|last| self.clock_ms - last > delay);
            if due {
                self.words.spawn_word();
                self.last_spawn_ms = Some(self.clock_ms);
            }
            self.words.tick(frames);
        }

        let missed = self.words.take_missed_words();
        if missed == 0 {
            return;
        }
        if self.powerups.is_effect_active(PowerUpKind::Shield) {
            debug!("shield absorbed {missed} missed word(s)");
            return;
        }
        for _ in 0..missed {
            self.lose_life();
            if self.state == GameState::GameOver {
                break;
            }
        }
    }

    fn lose_life(&mut self) {
        self.lives -= 1;
        self.effects.add_screen_shake(LIFE_LOST_SHAKE);
        let (cx, _) = self.config.center();
        self.effects.add_text_popup("-LIFE!", cx, LIFE_POPUP_Y, DANGER_COLOR);
        if self.lives <= 0 {
            self.state = GameState::GameOver;
            self.end_ms = Some(self.clock_ms);
            info!("game over: score {} at level {}", self.score, self.level);
        }
    }

    // --- Input -----------------------------------------------------------------

    /// Route one `KeyboardEvent.key` value according to the current state.
    pub fn handle_key(&mut self, key: &str) -> Result<(), GameError> {
        match self.state {
            GameState::SelectingDifficulty => {
                let digit = single_char(key)
                    .ok_or_else(|| GameError::UnknownDifficulty(key.to_string()))?;
                self.select_difficulty(Difficulty::from_digit(digit)?)
            }
            GameState::Playing => {
                match key {
                    "Enter" => {
                        self.submit_input();
                    }
                    "Backspace" => self.backspace(),
                    "Escape" => self.clear_input(),
                    _ => {
                        if let Some(c) = single_char(key) {
                            self.type_char(c);
                        }
                    }
                }
                Ok(())
            }
            GameState::GameOver => {
                self.reset_game();
                Ok(())
            }
        }
    }

    pub fn type_char(&mut self, c: char) {
        if self.state != GameState::Playing || c.is_control() {
            return;
        }
        self.input.push(c);
        self.total_chars_typed += 1;
        self.cues.push(SoundCue::Type);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Submit the typed buffer and clear it.
    pub fn submit_input(&mut self) -> Submission {
        let typed = std::mem::take(&mut self.input);
        self.submit_word(&typed)
    }

    pub fn submit_word(&mut self, text: &str) -> Submission {
        let typed = text.trim();
        if typed.is_empty() || self.state != GameState::Playing {
            return Submission::Ignored;
        }

        let Some(word) = self.words.check_word(typed) else {
            self.cues.push(SoundCue::Wrong);
            self.effects.add_screen_shake(MISS_SHAKE);
            let (cx, cy) = self.config.center();
            self.effects.add_text_popup("MISS!", cx, cy, DANGER_COLOR);
            return Submission::Missed;
        };

        self.cues.push(SoundCue::Correct);
        self.effects
            .add_pixel_burst(word.x, word.y, MATCH_COLOR, DEFAULT_BURST_COUNT);
        self.effects.add_text_popup("+1", word.x, word.y, MATCH_COLOR);

        let factor = self.award_word();
        let leveled_up = factor > 1.0;
        if leveled_up {
            let (cx, _) = self.config.center();
            self.effects
                .add_text_popup(format!("LEVEL {}!", self.level), cx, LEVEL_POPUP_Y, LEVEL_COLOR);
            info!("level {} reached", self.level);
        }
        self.words.increase_speed(factor);

        let powerup = self.powerups.check_collection(word.x, word.y);
        if let Some(kind) = powerup {
            self.apply_powerup(kind, word.x, word.y);
        }
        Submission::Matched { word, leveled_up, powerup }
    }

    /// Score a correct word; returns the speed factor to apply.
    fn award_word(&mut self) -> f64 {
        self.score += 1;
        self.correct_words += 1;
        self.words_until_level_up = self.words_until_level_up.saturating_sub(1);
        if self.words_until_level_up == 0 {
            self.level += 1;
            self.words_until_level_up = self.config.words_for_level_up;
            self.config.speed_increase_factor
        } else {
            1.0
        }
    }

    fn apply_powerup(&mut self, kind: PowerUpKind, x: f64, y: f64) {
        self.cues.push(SoundCue::PowerUp);
        self.effects
            .add_pixel_burst(x, y, PICKUP_COLOR, DEFAULT_BURST_COUNT);
        self.effects.add_text_popup(kind.announcement(), x, y, kind.color());
        let timed = match kind {
            PowerUpKind::Freeze => Some(self.config.freeze_duration_ms),
            PowerUpKind::Shield => Some(self.config.shield_duration_ms),
            PowerUpKind::Clear => {
                self.words.clear_words();
                None
            }
            PowerUpKind::ExtraLife => {
                self.lives += 1;
                None
            }
        };
        if let Some(duration) = timed {
            if let Err(err) = self.powerups.activate_effect(kind, duration) {
                warn!("power-up not applied: {err}");
            }
        }
        debug!("collected {kind:?}");
    }

    // --- Derived stats ---------------------------------------------------------

    fn elapsed_ms(&self) -> f64 {
        self.end_ms.unwrap_or(self.clock_ms) - self.start_ms
    }

    /// Characters / 5 per minute, with at least one minute on the clock.
    pub fn wpm(&self) -> u32 {
        let minutes = (self.elapsed_ms() / 60_000.0).max(1.0);
        (self.total_chars_typed as f64 / 5.0 / minutes).floor() as u32
    }

    pub fn accuracy(&self) -> u32 {
        if self.total_chars_typed == 0 {
            return 0;
        }
        let ratio = (self.correct_words * 5) as f64 / self.total_chars_typed.max(1) as f64;
        ((ratio * 100.0).floor() as u32).min(100)
    }

    /// Queued sound cues since the last call.
    pub fn drain_cues(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.cues)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let words = self
            .words
            .active_words()
            .map(|w| WordView { text: w.text.clone(), x: w.x, y: w.y, tier: w.tier() })
            .collect();
        let powerups = self
            .powerups
            .powerups()
            .iter()
            .filter(|p| p.active)
            .map(|p| PowerUpView { kind: p.kind, x: p.x, y: p.y, size: self.config.powerup_size })
            .collect();
        let effects = [PowerUpKind::Freeze, PowerUpKind::Shield]
            .into_iter()
            .filter(|k| self.powerups.is_effect_active(*k))
            .map(|kind| EffectStatus {
                kind,
                remaining_ms: self.powerups.effect_remaining_ms(kind),
                progress: self.powerups.effect_progress(kind),
            })
            .collect();
        SessionSnapshot {
            state: self.state,
            difficulty: self.difficulty,
            score: self.score,
            lives: self.lives,
            level: self.level,
            words_until_level_up: self.words_until_level_up,
            words_per_level: self.config.words_for_level_up,
            wpm: self.wpm(),
            accuracy: self.accuracy(),
            current_speed: self.words.current_speed(),
            input: self.input.clone(),
            field_width: self.config.field_width,
            field_height: self.config.field_height,
            words,
            powerups,
            effects,
            particles: self.effects.particles().to_vec(),
            popups: self.effects.popups().to_vec(),
            shake_offset: self.effects.shake_offset(),
        }
    }
}

fn single_char(key: &str) -> Option<char> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

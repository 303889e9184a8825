//! Falling words: spawning, movement, matching and misses.

use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::{CHAR_WIDTH_ESTIMATE, GameConfig};
use crate::difficulty::{Difficulty, DifficultyProfile};
use crate::words::{WORD_LIST, filter_words_by_difficulty};

/// Colour band by word length, used by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WordTier {
    Short,
    Medium,
    Long,
}

impl WordTier {
    pub fn for_text(text: &str) -> Self {
        match text.chars().count() {
            0..=4 => WordTier::Short,
            5..=7 => WordTier::Medium,
            _ => WordTier::Long,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            WordTier::Short => "#55ff55",
            WordTier::Medium => "#ffff55",
            WordTier::Long => "#ff5555",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FallingWord {
    pub text: String,
    pub x: f64,
    pub y: f64,
    /// Pixels per nominal frame, fixed at spawn time.
    pub speed: f64,
    pub active: bool,
}

impl FallingWord {
    pub fn new(text: impl Into<String>, x: f64, y: f64, speed: f64) -> Self {
        Self { text: text.into(), x, y, speed, active: true }
    }

    pub fn tier(&self) -> WordTier {
        WordTier::for_text(&self.text)
    }

    fn matches(&self, typed: &str) -> bool {
        self.active && self.text.to_lowercase() == typed.to_lowercase()
    }

    /// Anchor used for popups and power-up collection.
    fn anchor(&self) -> (f64, f64) {
        (self.x + self.text.chars().count() as f64 * CHAR_WIDTH_ESTIMATE, self.y)
    }
}

/// A successful `check_word`.
#[derive(Clone, Debug, PartialEq)]
pub struct WordMatch {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// Where a spawn landed and whether the separation rule held.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnReport {
    pub x: f64,
    pub resamples: u32,
    pub separated: bool,
}

pub struct WordManager {
    config: GameConfig,
    profile: &'static DifficultyProfile,
    spawnable: Vec<&'static str>,
    words: Vec<FallingWord>,
    current_speed: f64,
    // Misses swept during `tick`, waiting for `take_missed_words`.
    pending_misses: u32,
    rng: SmallRng,
}

impl WordManager {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let profile = config.default_difficulty.profile();
        Self {
            spawnable: filter_words_by_difficulty(WORD_LIST, profile),
            current_speed: profile.word_speed,
            profile,
            config,
            words: Vec::new(),
            pending_misses: 0,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn set_difficulty(&mut self, id: Difficulty) {
        self.profile = id.profile();
        self.spawnable = filter_words_by_difficulty(WORD_LIST, self.profile);
        self.current_speed = self.profile.word_speed;
        debug!("word pool for {id}: {} words", self.spawnable.len());
    }

    pub fn profile(&self) -> &'static DifficultyProfile {
        self.profile
    }

    pub fn spawnable(&self) -> &[&'static str] {
        &self.spawnable
    }

    pub fn words(&self) -> &[FallingWord] {
        &self.words
    }

    pub fn active_words(&self) -> impl Iterator<Item = &FallingWord> {
        self.words.iter().filter(|w| w.active)
    }

    pub fn current_speed(&self) -> f64 {
        self.current_speed
    }

    /// Spawn a random word above the field. Placement is best effort: after
    /// `max_spawn_attempts` resamples the last candidate is kept even if it
    /// crowds another word near the top.
    pub fn spawn_word(&mut self) -> SpawnReport {
        let text = self.spawnable[self.rng.gen_range(0..self.spawnable.len())];
        let mut x = self.random_x();
        let mut resamples = 0;
        while resamples < self.config.max_spawn_attempts && self.crowds_top(x) {
            x = self.random_x();
            resamples += 1;
        }
        let separated = !self.crowds_top(x);
        if !separated {
            debug!("spawn budget exhausted for '{text}', accepting x={x:.1}");
        }
        self.words.push(FallingWord::new(
            text,
            x,
            self.config.word_spawn_y,
            self.current_speed,
        ));
        SpawnReport { x, resamples, separated }
    }

    /// Place a word directly, bypassing the random pick and spacing rule.
    pub fn add_word(&mut self, word: FallingWord) {
        self.words.push(word);
    }

    /// Advance active words by `frames` nominal frames, record words that
    /// reached the miss line, then drop words that are inactive or past the
    /// exit line. A word that crosses both lines in one tick is still a miss.
    pub fn tick(&mut self, frames: f64) {
        let exit = self.config.word_exit_line();
        for w in self.words.iter_mut().filter(|w| w.active) {
            w.y += w.speed * frames;
        }
        self.pending_misses += self.sweep_missed();
        self.words.retain(|w| w.active && w.y < exit);
    }

    /// Case-insensitive match against active words in spawn order. Deactivates
    /// at most one word.
    pub fn check_word(&mut self, typed: &str) -> Option<WordMatch> {
        let word = self.words.iter_mut().find(|w| w.matches(typed))?;
        word.active = false;
        let (x, y) = word.anchor();
        debug!("matched '{}' at ({x:.1}, {y:.1})", word.text);
        Some(WordMatch { text: word.text.clone(), x, y })
    }

    pub fn increase_speed(&mut self, factor: f64) {
        self.current_speed = (self.current_speed * factor).min(self.config.max_word_speed);
    }

    pub fn reset_speed(&mut self) {
        self.current_speed = self.profile.word_speed;
    }

    /// Deactivate and count words that crossed the miss line since the last call.
    pub fn take_missed_words(&mut self) -> u32 {
        let swept = self.sweep_missed();
        std::mem::take(&mut self.pending_misses) + swept
    }

    pub fn clear_words(&mut self) {
        self.words.clear();
        self.pending_misses = 0;
    }

    fn sweep_missed(&mut self) -> u32 {
        let line = self.config.miss_line();
        let mut missed = 0;
        for w in self.words.iter_mut().filter(|w| w.active && w.y >= line) {
            w.active = false;
            missed += 1;
        }
        missed
    }

    fn random_x(&mut self) -> f64 {
        let (lo, hi) = self.config.word_spawn_range();
        self.rng.gen_range(lo..hi)
    }

    fn crowds_top(&self, x: f64) -> bool {
        self.words.iter().any(|w| {
            w.active
                && w.y < self.config.near_top_y
                && (w.x - x).abs() < self.config.min_word_separation
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> WordManager {
        WordManager::new(GameConfig::default(), 7)
    }

    #[test]
    fn tier_follows_length() {
        assert_eq!(WordTier::for_text("cool"), WordTier::Short);
        assert_eq!(WordTier::for_text("classic"), WordTier::Medium);
        assert_eq!(WordTier::for_text("keyboard"), WordTier::Long);
    }

    #[test]
    fn set_difficulty_resets_speed_and_pool() {
        let mut wm = manager();
        wm.increase_speed(2.0);
        wm.set_difficulty(Difficulty::Easy);
        assert_eq!(wm.current_speed(), 0.6);
        assert!(wm.spawnable().iter().all(|w| w.len() <= 5));
    }

    #[test]
    fn spawned_words_start_above_field_inside_margins() {
        let mut wm = manager();
        for _ in 0..20 {
            wm.spawn_word();
        }
        for w in wm.words() {
            assert_eq!(w.y, -20.0);
            assert!((30.0..570.0).contains(&w.x));
            assert!(wm.spawnable().contains(&w.text.as_str()));
        }
    }

    #[test]
    fn spawn_keeps_distance_or_reports_exhaustion() {
        let mut wm = manager();
        let reports: Vec<SpawnReport> = (0..3).map(|_| wm.spawn_word()).collect();
        let all_separated = reports.iter().all(|r| r.separated);
        for r in &reports {
            assert!(r.resamples <= 8);
        }
        if all_separated {
            let xs: Vec<f64> = wm.words().iter().map(|w| w.x).collect();
            for i in 0..xs.len() {
                for j in i + 1..xs.len() {
                    assert!((xs[i] - xs[j]).abs() >= 80.0);
                }
            }
        } else {
            assert!(reports.iter().any(|r| !r.separated && r.resamples == 8));
        }
    }

    #[test]
    fn crowded_top_exhausts_budget_and_still_spawns() {
        let mut wm = manager();
        // Cover the spawn band every 40px so no candidate can be 80px clear.
        let mut x = 0.0;
        while x <= 640.0 {
            wm.add_word(FallingWord::new("wall", x, 0.0, 1.0));
            x += 40.0;
        }
        let before = wm.words().len();
        let report = wm.spawn_word();
        assert_eq!(report.resamples, 8);
        assert!(!report.separated);
        assert_eq!(wm.words().len(), before + 1);
    }

    #[test]
    fn words_below_near_top_do_not_block_spawns() {
        let mut wm = manager();
        let mut x = 0.0;
        while x <= 640.0 {
            wm.add_word(FallingWord::new("low", x, 200.0, 1.0));
            x += 40.0;
        }
        let report = wm.spawn_word();
        assert_eq!(report.resamples, 0);
        assert!(report.separated);
    }

    #[test]
    fn tick_moves_and_drops_exited_words() {
        let mut wm = manager();
        wm.add_word(FallingWord::new("cat", 100.0, 10.0, 2.0));
        wm.add_word(FallingWord::new("dog", 200.0, 499.5, 1.0));
        wm.tick(1.0);
        assert_eq!(wm.words().len(), 1);
        assert_eq!(wm.words()[0].y, 12.0);
        assert_eq!(wm.take_missed_words(), 1);
        wm.tick(0.5);
        assert_eq!(wm.words()[0].y, 13.0);
    }

    #[test]
    fn check_word_matches_first_case_insensitively() {
        let mut wm = manager();
        wm.add_word(FallingWord::new("Code", 10.0, 40.0, 1.0));
        wm.add_word(FallingWord::new("code", 300.0, 20.0, 1.0));
        let m = wm.check_word("CODE").expect("match");
        assert_eq!((m.x, m.y), (34.0, 40.0));
        assert!(!wm.words()[0].active);
        assert!(wm.words()[1].active);
        let m2 = wm.check_word("code").expect("second copy");
        assert_eq!(m2.x, 324.0);
        assert!(wm.check_word("code").is_none());
    }

    #[test]
    fn inactive_words_are_compacted_on_next_tick() {
        let mut wm = manager();
        wm.add_word(FallingWord::new("cat", 100.0, 10.0, 1.0));
        wm.check_word("cat");
        assert_eq!(wm.words().len(), 1);
        wm.tick(1.0);
        assert!(wm.words().is_empty());
    }

    #[test]
    fn speed_is_capped() {
        let mut wm = manager();
        for _ in 0..50 {
            wm.increase_speed(1.1);
        }
        assert_eq!(wm.current_speed(), 3.0);
        wm.reset_speed();
        assert_eq!(wm.current_speed(), 1.0);
    }

    #[test]
    fn missed_words_are_counted_once() {
        let mut wm = manager();
        wm.add_word(FallingWord::new("a", 10.0, 450.0, 1.0));
        wm.add_word(FallingWord::new("b", 10.0, 460.0, 1.0));
        wm.add_word(FallingWord::new("c", 10.0, 449.0, 1.0));
        assert_eq!(wm.take_missed_words(), 2);
        assert_eq!(wm.take_missed_words(), 0);
        assert_eq!(wm.active_words().count(), 1);
    }

    #[test]
    fn words_jumping_past_the_exit_still_count_as_missed() {
        let mut wm = manager();
        wm.add_word(FallingWord::new("late", 200.0, 445.0, 1.0));
        wm.add_word(FallingWord::new("early", 300.0, 10.0, 1.0));
        wm.tick(60.0);
        assert_eq!(wm.words().len(), 1);
        assert_eq!(wm.take_missed_words(), 1);
        assert_eq!(wm.take_missed_words(), 0);
    }
}

//! Cosmetic effects: particle bursts, floating text and screen shake.
//!
//! Nothing in here feeds back into gameplay.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::FRAME_MS;

pub const DEFAULT_BURST_COUNT: usize = 8;
const PARTICLE_LIFE_MS: f64 = 40.0 * FRAME_MS;
const POPUP_LIFE_MS: f64 = 60.0 * FRAME_MS;
/// Downward acceleration per nominal frame.
const GRAVITY: f64 = 0.1;
/// Shake below this magnitude decays silently without moving the scene.
const SHAKE_VISIBLE_THRESHOLD: f64 = 3.0;
const SHAKE_AMPLITUDE: f64 = 2.0;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub color: String,
    pub remaining_life_ms: f64,
    pub max_life_ms: f64,
    pub size: u8,
}

impl Particle {
    fn step(&mut self, frames: f64, dt_ms: f64) -> bool {
        self.x += self.vx * frames;
        self.y += self.vy * frames;
        self.vy += GRAVITY * frames;
        self.remaining_life_ms -= dt_ms;
        self.remaining_life_ms > 1e-6
    }

    pub fn alpha(&self) -> f64 {
        (self.remaining_life_ms / self.max_life_ms).clamp(0.0, 1.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextPopup {
    pub text: String,
    pub x: f64,
    pub start_y: f64,
    pub current_y: f64,
    pub color: String,
    pub remaining_life_ms: f64,
    pub max_life_ms: f64,
}

impl TextPopup {
    fn step(&mut self, dt_ms: f64) -> bool {
        self.remaining_life_ms -= dt_ms;
        // one pixel up per three elapsed frames, in whole pixels
        let elapsed_frames = (self.max_life_ms - self.remaining_life_ms) / FRAME_MS;
        self.current_y = self.start_y - (elapsed_frames / 3.0 + 1e-9).floor();
        self.remaining_life_ms > 1e-6
    }
}

pub struct EffectsManager {
    particles: Vec<Particle>,
    popups: Vec<TextPopup>,
    shake: f64,
    shake_offset: (f64, f64),
    rng: SmallRng,
}

impl EffectsManager {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            popups: Vec::new(),
            shake: 0.0,
            shake_offset: (0.0, 0.0),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn popups(&self) -> &[TextPopup] {
        &self.popups
    }

    pub fn shake(&self) -> f64 {
        self.shake
    }

    pub fn shake_offset(&self) -> (f64, f64) {
        self.shake_offset
    }

    pub fn add_pixel_burst(&mut self, x: f64, y: f64, color: &str, count: usize) {
        for _ in 0..count {
            let particle = Particle {
                x,
                y,
                vx: self.rng.gen_range(-2.0..2.0),
                vy: self.rng.gen_range(-4.0..-1.0),
                color: color.to_string(),
                remaining_life_ms: PARTICLE_LIFE_MS,
                max_life_ms: PARTICLE_LIFE_MS,
                size: self.rng.gen_range(2..=4),
            };
            self.particles.push(particle);
        }
    }

    pub fn add_text_popup(&mut self, text: impl Into<String>, x: f64, y: f64, color: &str) {
        self.popups.push(TextPopup {
            text: text.into(),
            x,
            start_y: y,
            current_y: y,
            color: color.to_string(),
            remaining_life_ms: POPUP_LIFE_MS,
            max_life_ms: POPUP_LIFE_MS,
        });
    }

    pub fn add_screen_shake(&mut self, intensity: f64) {
        self.shake = self.shake.max(intensity);
    }

    pub fn tick(&mut self, dt_ms: f64) {
        let frames = dt_ms / FRAME_MS;
        self.particles.retain_mut(|p| p.step(frames, dt_ms));
        self.popups.retain_mut(|p| p.step(dt_ms));

        if self.shake > 0.0 {
            self.shake_offset = if self.shake > SHAKE_VISIBLE_THRESHOLD {
                (
                    self.rng.gen_range(-SHAKE_AMPLITUDE..SHAKE_AMPLITUDE),
                    self.rng.gen_range(-SHAKE_AMPLITUDE..SHAKE_AMPLITUDE),
                )
            } else {
                (0.0, 0.0)
            };
            self.shake = (self.shake - frames).max(0.0);
        } else {
            self.shake_offset = (0.0, 0.0);
        }
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.popups.clear();
        self.shake = 0.0;
        self.shake_offset = (0.0, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_particles_rise_then_expire() {
        let mut fx = EffectsManager::new(1);
        fx.add_pixel_burst(100.0, 100.0, "#55ff55", DEFAULT_BURST_COUNT);
        assert_eq!(fx.particles().len(), 8);
        for p in fx.particles() {
            assert!((-2.0..2.0).contains(&p.vx));
            assert!(p.vy < -1.0 + 1e-9);
            assert!((2..=4).contains(&p.size));
        }
        fx.tick(FRAME_MS);
        assert!(fx.particles().iter().all(|p| p.y < 100.0));
        for _ in 0..39 {
            fx.tick(FRAME_MS);
        }
        assert!(fx.particles().is_empty());
    }

    #[test]
    fn popup_drifts_up_in_whole_pixels() {
        let mut fx = EffectsManager::new(1);
        fx.add_text_popup("+1", 50.0, 200.0, "#55ff55");
        fx.tick(FRAME_MS);
        fx.tick(FRAME_MS);
        assert_eq!(fx.popups()[0].current_y, 200.0);
        fx.tick(FRAME_MS);
        assert_eq!(fx.popups()[0].current_y, 199.0);
        for _ in 0..57 {
            fx.tick(FRAME_MS);
        }
        assert!(fx.popups().is_empty());
    }

    #[test]
    fn shake_takes_max_and_decays() {
        let mut fx = EffectsManager::new(9);
        fx.add_screen_shake(8.0);
        fx.add_screen_shake(5.0);
        assert_eq!(fx.shake(), 8.0);
        fx.tick(FRAME_MS);
        let (ox, oy) = fx.shake_offset();
        assert!(ox.abs() <= 2.0 && oy.abs() <= 2.0);
        assert_eq!(fx.shake(), 7.0);
        for _ in 0..4 {
            fx.tick(FRAME_MS);
        }
        // shake is now 3: below the visible threshold
        fx.tick(FRAME_MS);
        assert_eq!(fx.shake_offset(), (0.0, 0.0));
        for _ in 0..3 {
            fx.tick(FRAME_MS);
        }
        assert_eq!(fx.shake(), 0.0);
    }

    #[test]
    fn clear_resets_everything() {
        let mut fx = EffectsManager::new(2);
        fx.add_pixel_burst(0.0, 0.0, "#fff", 3);
        fx.add_text_popup("MISS!", 0.0, 0.0, "#f55");
        fx.add_screen_shake(5.0);
        fx.tick(FRAME_MS);
        fx.clear();
        assert!(fx.particles().is_empty() && fx.popups().is_empty());
        assert_eq!(fx.shake(), 0.0);
        assert_eq!(fx.shake_offset(), (0.0, 0.0));
    }
}

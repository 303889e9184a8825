//! Falling power-ups and the timed effects they grant.

use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::{FRAME_MS, GameConfig};
use crate::error::GameError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PowerUpKind {
    /// Timed: words stop spawning and falling.
    Freeze,
    /// One-shot: empties the word field.
    Clear,
    /// One-shot: +1 life.
    ExtraLife,
    /// Timed: misses cost no lives.
    Shield,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Freeze,
        PowerUpKind::Clear,
        PowerUpKind::ExtraLife,
        PowerUpKind::Shield,
    ];

    pub fn is_timed(self) -> bool {
        matches!(self, PowerUpKind::Freeze | PowerUpKind::Shield)
    }

    pub fn color(self) -> &'static str {
        match self {
            PowerUpKind::Freeze => "#55ffff",
            PowerUpKind::Clear => "#ffff55",
            PowerUpKind::ExtraLife => "#55ff55",
            PowerUpKind::Shield => "#ff55ff",
        }
    }

    /// Popup shown when collected.
    pub fn announcement(self) -> &'static str {
        match self {
            PowerUpKind::Freeze => "FREEZE!",
            PowerUpKind::Clear => "CLEAR!",
            PowerUpKind::ExtraLife => "+LIFE!",
            PowerUpKind::Shield => "SHIELD!",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::Freeze => "FREEZE",
            PowerUpKind::Clear => "CLEAR",
            PowerUpKind::ExtraLife => "LIFE",
            PowerUpKind::Shield => "SHIELD",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub x: f64,
    pub y: f64,
    pub speed: f64,
    pub active: bool,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, x: f64, y: f64, speed: f64) -> Self {
        Self { kind, x, y, speed, active: true }
    }

    fn within(&self, x: f64, y: f64, radius: f64) -> bool {
        (self.x - x).hypot(self.y - y) < radius
    }
}

/// Remaining time on the timed effects, in milliseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct ActiveEffects {
    freeze_ms: f64,
    shield_ms: f64,
}

impl ActiveEffects {
    fn slot(&mut self, kind: PowerUpKind) -> Option<&mut f64> {
        match kind {
            PowerUpKind::Freeze => Some(&mut self.freeze_ms),
            PowerUpKind::Shield => Some(&mut self.shield_ms),
            PowerUpKind::Clear | PowerUpKind::ExtraLife => None,
        }
    }

    fn get(&self, kind: PowerUpKind) -> f64 {
        match kind {
            PowerUpKind::Freeze => self.freeze_ms,
            PowerUpKind::Shield => self.shield_ms,
            PowerUpKind::Clear | PowerUpKind::ExtraLife => 0.0,
        }
    }

    fn decay(&mut self, dt_ms: f64) {
        self.freeze_ms = countdown(self.freeze_ms, dt_ms);
        self.shield_ms = countdown(self.shield_ms, dt_ms);
    }
}

// Snap float residue to zero so N frames of FRAME_MS end an N-frame effect.
fn countdown(remaining: f64, dt_ms: f64) -> f64 {
    let left = remaining - dt_ms;
    if left > 1e-6 { left } else { 0.0 }
}

pub struct PowerUpManager {
    config: GameConfig,
    powerups: Vec<PowerUp>,
    effects: ActiveEffects,
    rng: SmallRng,
}

impl PowerUpManager {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            powerups: Vec::new(),
            effects: ActiveEffects::default(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn powerups(&self) -> &[PowerUp] {
        &self.powerups
    }

    /// Roll for a new power-up over `frames` nominal frames (the configured
    /// chance is per frame). Returns the kind spawned, if any.
    pub fn try_spawn(&mut self, frames: f64) -> Option<PowerUpKind> {
        if self.powerups.len() >= self.config.max_powerups || frames <= 0.0 {
            return None;
        }
        let per_frame = self.config.powerup_spawn_chance.clamp(0.0, 1.0);
        let chance = 1.0 - (1.0 - per_frame).powf(frames);
        if !self.rng.gen_bool(chance.clamp(0.0, 1.0)) {
            return None;
        }
        let kind = PowerUpKind::ALL[self.rng.gen_range(0..PowerUpKind::ALL.len())];
        let (lo, hi) = self.config.powerup_spawn_range();
        let x = self.rng.gen_range(lo..hi);
        self.powerups.push(PowerUp::new(
            kind,
            x,
            self.config.powerup_spawn_y,
            self.config.powerup_speed,
        ));
        debug!("spawned {kind:?} power-up at x={x:.1}");
        Some(kind)
    }

    pub fn add_powerup(&mut self, powerup: PowerUp) {
        self.powerups.push(powerup);
    }

    pub fn tick(&mut self, dt_ms: f64) {
        let frames = dt_ms / FRAME_MS;
        let exit = self.config.powerup_exit_line();
        for p in self.powerups.iter_mut() {
            p.y += p.speed * frames;
        }
        self.powerups.retain(|p| p.active && p.y < exit);
        self.effects.decay(dt_ms);
    }

    /// First active power-up within the collection radius of `(x, y)`.
    pub fn check_collection(&mut self, x: f64, y: f64) -> Option<PowerUpKind> {
        let radius = self.config.collection_radius();
        let p = self
            .powerups
            .iter_mut()
            .find(|p| p.active && p.within(x, y, radius))?;
        p.active = false;
        Some(p.kind)
    }

    /// Start or restart a timed effect.
    pub fn activate_effect(&mut self, kind: PowerUpKind, duration_ms: f64) -> Result<(), GameError> {
        let slot = self.effects.slot(kind).ok_or(GameError::NotTimedEffect(kind))?;
        *slot = duration_ms.max(0.0);
        Ok(())
    }

    pub fn is_effect_active(&self, kind: PowerUpKind) -> bool {
        self.effects.get(kind) > 0.0
    }

    pub fn effect_remaining_ms(&self, kind: PowerUpKind) -> f64 {
        self.effects.get(kind)
    }

    /// Remaining fraction of the configured duration, for the effect bars.
    pub fn effect_progress(&self, kind: PowerUpKind) -> f64 {
        let full = match kind {
            PowerUpKind::Freeze => self.config.freeze_duration_ms,
            PowerUpKind::Shield => self.config.shield_duration_ms,
            PowerUpKind::Clear | PowerUpKind::ExtraLife => return 0.0,
        };
        if full <= 0.0 {
            0.0
        } else {
            (self.effects.get(kind) / full).clamp(0.0, 1.0)
        }
    }

    pub fn clear(&mut self) {
        self.powerups.clear();
        self.effects = ActiveEffects::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn always_spawning() -> PowerUpManager {
        let cfg = GameConfig { powerup_spawn_chance: 1.0, ..GameConfig::default() };
        PowerUpManager::new(cfg, 3)
    }

    #[test]
    fn spawn_respects_cap() {
        let mut pm = always_spawning();
        assert!(pm.try_spawn(1.0).is_some());
        assert!(pm.try_spawn(1.0).is_some());
        assert!(pm.try_spawn(1.0).is_none());
        assert_eq!(pm.powerups().len(), 2);
        for p in pm.powerups() {
            assert_eq!(p.y, -30.0);
            assert!((50.0..590.0).contains(&p.x));
        }
    }

    #[test]
    fn zero_chance_never_spawns() {
        let cfg = GameConfig { powerup_spawn_chance: 0.0, ..GameConfig::default() };
        let mut pm = PowerUpManager::new(cfg, 3);
        assert!((0..1000).all(|_| pm.try_spawn(1.0).is_none()));
    }

    #[test]
    fn powerups_fall_and_leave() {
        let mut pm = always_spawning();
        pm.add_powerup(PowerUp::new(PowerUpKind::Clear, 100.0, 509.5, 0.8));
        pm.add_powerup(PowerUp::new(PowerUpKind::Shield, 200.0, 0.0, 0.8));
        pm.tick(FRAME_MS);
        assert_eq!(pm.powerups().len(), 1);
        assert!((pm.powerups()[0].y - 0.8).abs() < 1e-9);
    }

    #[test]
    fn collection_uses_radius_and_first_match() {
        let mut pm = always_spawning();
        pm.add_powerup(PowerUp::new(PowerUpKind::Freeze, 100.0, 100.0, 0.8));
        pm.add_powerup(PowerUp::new(PowerUpKind::ExtraLife, 110.0, 100.0, 0.8));
        assert_eq!(pm.check_collection(140.0, 100.0), Some(PowerUpKind::ExtraLife));
        assert_eq!(pm.check_collection(100.0, 120.0), Some(PowerUpKind::Freeze));
        assert_eq!(pm.check_collection(100.0, 120.0), None);
        assert_eq!(pm.check_collection(400.0, 400.0), None);
    }

    #[test]
    fn timed_effects_count_down() {
        let mut pm = always_spawning();
        pm.activate_effect(PowerUpKind::Freeze, 3.0 * FRAME_MS).unwrap();
        assert!(pm.is_effect_active(PowerUpKind::Freeze));
        assert!(!pm.is_effect_active(PowerUpKind::Shield));
        pm.tick(FRAME_MS);
        pm.tick(FRAME_MS);
        assert!(pm.is_effect_active(PowerUpKind::Freeze));
        pm.tick(FRAME_MS);
        assert!(!pm.is_effect_active(PowerUpKind::Freeze));
        assert_eq!(pm.effect_remaining_ms(PowerUpKind::Freeze), 0.0);
    }

    #[test]
    fn reactivation_overwrites_remaining_time() {
        let mut pm = always_spawning();
        pm.activate_effect(PowerUpKind::Shield, 10_000.0).unwrap();
        pm.tick(5_000.0);
        pm.activate_effect(PowerUpKind::Shield, 1_000.0).unwrap();
        assert_eq!(pm.effect_remaining_ms(PowerUpKind::Shield), 1_000.0);
        assert!((pm.effect_progress(PowerUpKind::Shield) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn one_shot_kinds_cannot_be_timed() {
        let mut pm = always_spawning();
        assert_eq!(
            pm.activate_effect(PowerUpKind::Clear, 100.0),
            Err(GameError::NotTimedEffect(PowerUpKind::Clear))
        );
        assert!(!pm.is_effect_active(PowerUpKind::Clear));
    }

    #[test]
    fn clear_drops_everything() {
        let mut pm = always_spawning();
        pm.try_spawn(1.0);
        pm.activate_effect(PowerUpKind::Freeze, 1000.0).unwrap();
        pm.clear();
        assert!(pm.powerups().is_empty());
        assert!(!pm.is_effect_active(PowerUpKind::Freeze));
    }
}

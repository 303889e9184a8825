//! Difficulty presets.

use std::fmt;
use std::str::FromStr;

use crate::error::GameError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Immutable tuning for one difficulty.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifficultyProfile {
    pub id: Difficulty,
    /// Initial fall speed in pixels per nominal frame.
    pub word_speed: f64,
    pub lives: u32,
    pub spawn_delay_ms: f64,
    pub max_word_length: usize,
    pub label: &'static str,
    pub description: &'static str,
    /// Menu / popup colour.
    pub color: &'static str,
}

pub const EASY: DifficultyProfile = DifficultyProfile {
    id: Difficulty::Easy,
    word_speed: 0.6,
    lives: 5,
    spawn_delay_ms: 4000.0,
    max_word_length: 5,
    label: "EASY",
    description: "BEGINNER FRIENDLY",
    color: "#55ff55",
};

pub const MEDIUM: DifficultyProfile = DifficultyProfile {
    id: Difficulty::Medium,
    word_speed: 1.0,
    lives: 3,
    spawn_delay_ms: 3000.0,
    max_word_length: 8,
    label: "MEDIUM",
    description: "BALANCED CHALLENGE",
    color: "#ffff55",
};

pub const HARD: DifficultyProfile = DifficultyProfile {
    id: Difficulty::Hard,
    word_speed: 1.5,
    lives: 2,
    spawn_delay_ms: 2200.0,
    max_word_length: 12,
    label: "HARD",
    description: "EXPERT MODE",
    color: "#ff5555",
};

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn profile(self) -> &'static DifficultyProfile {
        match self {
            Difficulty::Easy => &EASY,
            Difficulty::Medium => &MEDIUM,
            Difficulty::Hard => &HARD,
        }
    }

    /// Menu shortcut: '1' easy, '2' medium, '3' hard.
    pub fn from_digit(c: char) -> Result<Self, GameError> {
        match c {
            '1' => Ok(Difficulty::Easy),
            '2' => Ok(Difficulty::Medium),
            '3' => Ok(Difficulty::Hard),
            other => Err(GameError::UnknownDifficulty(other.to_string())),
        }
    }

    pub fn menu_digit(self) -> char {
        match self {
            Difficulty::Easy => '1',
            Difficulty::Medium => '2',
            Difficulty::Hard => '3',
        }
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(GameError::UnknownDifficulty(s.to_string())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.profile().label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_get_harder() {
        let [e, m, h] = Difficulty::ALL.map(|d| *d.profile());
        assert!(e.word_speed < m.word_speed && m.word_speed < h.word_speed);
        assert!(e.lives > m.lives && m.lives > h.lives);
        assert!(e.spawn_delay_ms > m.spawn_delay_ms && m.spawn_delay_ms > h.spawn_delay_ms);
        assert!(e.max_word_length < m.max_word_length && m.max_word_length < h.max_word_length);
    }

    #[test]
    fn digits_and_names_round_to_same_difficulty() {
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::from_digit(d.menu_digit()), Ok(d));
            assert_eq!(d.profile().label.parse::<Difficulty>(), Ok(d));
        }
    }

    #[test]
    fn unknown_ids_are_rejected() {
        assert_eq!(
            Difficulty::from_digit('4'),
            Err(GameError::UnknownDifficulty("4".into()))
        );
        assert!("nightmare".parse::<Difficulty>().is_err());
    }
}

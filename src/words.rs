//! Word catalog.

use crate::difficulty::DifficultyProfile;

/// Below this many candidates the filter falls back to the catalog head.
pub const MIN_SPAWNABLE_WORDS: usize = 10;
pub const FALLBACK_WORD_COUNT: usize = 20;

pub const WORD_LIST: &[&str] = &[
    // short (2-5 letters)
    "cat", "dog", "run", "jump", "code", "game", "play", "win", "fun", "cool",
    "fast", "slow", "big", "small", "red", "blue", "green", "black", "white",
    "good", "bad", "new", "old", "hot", "cold", "yes", "no", "go", "stop",
    // medium
    "python", "coding", "gaming", "retro", "pixel", "arcade", "classic",
    "typing", "speed", "score", "level", "power", "shield", "freeze",
    "clear", "bonus", "combo", "chain", "blast", "burst", "flash",
    "quick", "rapid", "turbo", "boost", "super", "mega", "ultra",
    // programming terms
    "function", "variable", "loop", "array", "string", "integer", "boolean",
    "object", "class", "method", "debug", "compile", "execute", "syntax",
    "algorithm", "database", "network", "server", "client", "browser",
    // long
    "programming", "computer", "keyboard", "monitor", "processor", "memory",
    "graphics", "software", "hardware", "internet", "developer", "framework",
    "interface", "structure", "directory", "exception", "condition",
];

/// Words short enough for `profile`, in catalog order. Never returns fewer
/// than `min(MIN_SPAWNABLE_WORDS, catalog)` entries.
pub fn filter_words_by_difficulty(
    catalog: &[&'static str],
    profile: &DifficultyProfile,
) -> Vec<&'static str> {
    let filtered: Vec<&'static str> = catalog
        .iter()
        .copied()
        .filter(|w| w.chars().count() <= profile.max_word_length)
        .collect();
    if filtered.len() >= MIN_SPAWNABLE_WORDS {
        filtered
    } else {
        catalog.iter().copied().take(FALLBACK_WORD_COUNT).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::{Difficulty, EASY};

    #[test]
    fn every_difficulty_has_enough_words_within_limit() {
        for d in Difficulty::ALL {
            let profile = d.profile();
            let words = filter_words_by_difficulty(WORD_LIST, profile);
            assert!(words.len() >= MIN_SPAWNABLE_WORDS, "{d} has {} words", words.len());
            assert!(words.iter().all(|w| w.len() <= profile.max_word_length));
        }
    }

    #[test]
    fn tiny_limit_falls_back_to_catalog_head() {
        let profile = DifficultyProfile { max_word_length: 2, ..EASY };
        let words = filter_words_by_difficulty(WORD_LIST, &profile);
        assert_eq!(words.len(), FALLBACK_WORD_COUNT);
        assert_eq!(words.as_slice(), &WORD_LIST[..FALLBACK_WORD_COUNT]);
    }

    #[test]
    fn fallback_is_bounded_by_catalog_size() {
        let profile = DifficultyProfile { max_word_length: 1, ..EASY };
        let small: &[&'static str] = &["alpha", "beta", "gamma"];
        assert_eq!(filter_words_by_difficulty(small, &profile), small.to_vec());
    }

    #[test]
    fn catalog_is_lowercase_ascii() {
        for w in WORD_LIST {
            assert!(!w.is_empty());
            assert!(w.chars().all(|c| c.is_ascii_lowercase()), "bad word '{w}'");
        }
    }
}

//! Retro Typer core crate.
//!
//! A falling-words typing game: words drop down a 640×480 field and the player
//! clears them by typing. The simulation ([`GameSession`] and its managers) is
//! plain Rust and fully deterministic for a given seed; the `web` module wires
//! it to a canvas, the keyboard and `requestAnimationFrame` when built for wasm.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod difficulty;
pub mod effects;
pub mod error;
pub mod powerups;
pub mod session;
pub mod snapshot;
pub mod word_manager;
pub mod words;

mod web;

pub use config::{FRAME_MS, GameConfig};
pub use difficulty::{Difficulty, DifficultyProfile};
pub use effects::{EffectsManager, Particle, TextPopup};
pub use error::GameError;
pub use powerups::{PowerUp, PowerUpKind, PowerUpManager};
pub use session::{GameSession, GameState, SoundCue, Submission};
pub use snapshot::{EffectStatus, PowerUpView, SessionSnapshot, WordView};
pub use word_manager::{FallingWord, SpawnReport, WordManager, WordMatch, WordTier};
pub use words::{WORD_LIST, filter_words_by_difficulty};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Create the canvas (or reuse `#gameCanvas`) and start the game loop.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    web::start_game()
}

use thiserror::Error;

use crate::powerups::PowerUpKind;
use crate::session::GameState;

/// Recoverable gameplay errors. None of these end a session; callers log them
/// and carry on with the current state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    #[error("unknown difficulty '{0}'")]
    UnknownDifficulty(String),
    #[error("cannot {action} while {state:?}")]
    InvalidState { action: &'static str, state: GameState },
    #[error("{0:?} is a one-shot power-up and has no duration")]
    NotTimedEffect(PowerUpKind),
    #[error("invalid config: {0}")]
    Config(String),
}

impl From<GameError> for wasm_bindgen::JsValue {
    fn from(err: GameError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}

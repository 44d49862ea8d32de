//! Error types for the host layer.
//!
//! The simulation itself never fails: gameplay edge cases (dead hero, cell
//! outside the grid, stale brick ids) are ordinary states. Errors only come from
//! configuration, asset lookup and scene wiring.

use std::fmt;

/// Top-level error enum.
#[derive(Debug)]
pub enum GameError {
    /// The JSON config document could not be parsed.
    ConfigParse(serde_json::Error),

    /// A tuning value is outside the range the simulation supports.
    InvalidTuning {
        /// Name of the tuning field.
        field: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the accepted range.
        expected: &'static str,
    },

    /// A sprite frame was requested that the atlas does not contain.
    MissingAsset {
        /// Frame or clip name.
        name: String,
    },

    /// A scene was driven before it finished entering.
    SceneNotReady {
        /// Scene name.
        scene: &'static str,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::ConfigParse(err) => write!(f, "invalid config document: {}", err),
            GameError::InvalidTuning {
                field,
                value,
                expected,
            } => write!(
                f,
                "tuning '{}' = {} is outside accepted range {}",
                field, value, expected
            ),
            GameError::MissingAsset { name } => write!(f, "asset '{}' is not loaded", name),
            GameError::SceneNotReady { scene } => {
                write!(f, "scene '{}' received a frame before entering", scene)
            }
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::ConfigParse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        GameError::ConfigParse(err)
    }
}

/// Convenience alias: a `Result` using `GameError` as the error type.
pub type GameResult<T> = Result<T, GameError>;

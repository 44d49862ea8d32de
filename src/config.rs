//! Runtime configuration document.
//!
//! [`GameConfig`] bundles [`Settings`] and [`Tuning`]. The browser host reads it
//! from an inline `<script id="game-config" type="application/json">` element;
//! any key may be omitted and falls back to the compiled default, so
//!
//! ```json
//! { "tuning": { "repair_increment": 0.25 } }
//! ```
//!
//! is a complete document.

use serde::Deserialize;

use crate::error::GameResult;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// DOM id of the inline config element
pub const CONFIG_ELEMENT_ID: &str = "game-config";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub settings: Settings,
    pub tuning: Tuning,
}

impl GameConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> GameResult<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.tuning.validate()?;
        Ok(config)
    }

    /// Parse a document, logging and falling back to defaults on any error
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(config) => {
                log::info!("Loaded game config");
                config
            }
            Err(err) => {
                log::warn!("Ignoring game config: {}", err);
                Self::default()
            }
        }
    }

    /// Load from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());

        match text {
            Some(json) if !json.trim().is_empty() => Self::from_json_or_default(&json),
            _ => {
                log::info!("Using default game config");
                Self::default()
            }
        }
    }

    /// Native builds always use compiled defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

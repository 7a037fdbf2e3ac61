//! Web-specific bindings for the fracture-game engine.
//!
//! Provides the browser implementations of the core's loader and storage
//! traits and re-exports the game logic types.

use gloo::storage::{LocalStorage, Storage};
use once_cell::sync::Lazy;

// Re-export all types from fracture-game
pub use fracture_game::*;

const SAVE_NAMESPACE: &str = "fracture.save";
/// The single campaign slot the client plays in.
pub const DEFAULT_SAVE_SLOT: &str = "campaign";

static STORY_JSON: &str = include_str!("../static/assets/data/story.json");

/// Content table parsed once from the embedded asset. A malformed table
/// degrades to an empty one: the client renders nothing instead of
/// crashing.
static STORY: Lazy<StoryData> = Lazy::new(|| match StoryData::from_json(STORY_JSON) {
    Ok(data) => data,
    Err(err) => {
        log::error!("story table failed to load: {err}");
        StoryData::empty()
    }
});

#[must_use]
pub fn story() -> &'static StoryData {
    &STORY
}

/// Loads the embedded narrative content table.
pub struct WebStoryLoader;

impl StoryLoader for WebStoryLoader {
    type Error = StoryError;

    fn load_story(&self) -> Result<StoryData, Self::Error> {
        StoryData::from_json(STORY_JSON)
    }
}

/// Game persistence backed by localStorage.
pub struct WebGameStorage;

#[derive(Debug, thiserror::Error)]
pub enum WebStorageError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GameStorage for WebGameStorage {
    type Error = WebStorageError;

    fn save_game(&self, save_name: &str, game_state: &GameState) -> Result<(), Self::Error> {
        let key = format!("{SAVE_NAMESPACE}.{save_name}");
        LocalStorage::set(&key, game_state).map_err(|e| WebStorageError::Storage(format!("{e:?}")))
    }

    fn load_game(&self, save_name: &str) -> Result<Option<GameState>, Self::Error> {
        let key = format!("{SAVE_NAMESPACE}.{save_name}");
        match LocalStorage::get(&key) {
            Ok(game_state) => Ok(Some(game_state)),
            // Missing and corrupt saves both fall back to a fresh state.
            Err(_) => Ok(None),
        }
    }

    fn delete_save(&self, save_name: &str) -> Result<(), Self::Error> {
        let key = format!("{SAVE_NAMESPACE}.{save_name}");
        LocalStorage::delete(&key);
        Ok(())
    }
}

/// Create a web-compatible game engine with `WebStoryLoader` and
/// `WebGameStorage`.
#[must_use]
pub fn create_web_game_engine() -> GameEngine<WebStoryLoader, WebGameStorage> {
    GameEngine::new(WebStoryLoader, WebGameStorage)
}

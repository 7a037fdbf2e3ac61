//! Fracture game core
//!
//! Platform-agnostic logic for the Fracture narrative client: the
//! progression store, narrative resolver, stage sequencer and the
//! movement/grounding simulator, without UI or platform-specific
//! dependencies.

pub mod kinematics;
pub mod level;
pub mod minigame;
pub mod resolver;
pub mod stage;
pub mod state;
pub mod story;

// Re-export commonly used types
pub use kinematics::{
    CameraRig, InputState, MovementSimulator, PlayerKinematics, StepEvents, TeleportLatch,
};
pub use level::{Checkpoint, GroundHit, LevelGeometry, Surface, SurfaceKind};
pub use minigame::RuneTrace;
pub use resolver::{ChoiceOutcome, NarrativeResolver, TextReveal};
pub use stage::{STAGE_COUNT, StagePhase, StageSequencer};
pub use state::{Axis, CharacterId, EndingId, FlagValue, GameState, Snapshot};
pub use story::{Effects, FlagEffect, Hotspot, Scene, StoryData, StoryError};

/// Trait for abstracting content-table loading.
/// Platform-specific implementations should provide this.
pub trait StoryLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the narrative content table from the platform-specific source.
    ///
    /// # Errors
    ///
    /// Returns an error if the content table cannot be loaded or parsed.
    fn load_story(&self) -> Result<StoryData, Self::Error>;
}

/// Trait for abstracting save/load operations.
/// Platform-specific implementations should provide this.
pub trait GameStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist the game state under the given save slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be saved.
    fn save_game(&self, save_name: &str, game_state: &GameState) -> Result<(), Self::Error>;

    /// Load the game state from the given save slot, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    fn load_game(&self, save_name: &str) -> Result<Option<GameState>, Self::Error>;

    /// Delete a saved game.
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    fn delete_save(&self, save_name: &str) -> Result<(), Self::Error>;
}

/// Main game engine tying content loading and persistence together.
pub struct GameEngine<L, S>
where
    L: StoryLoader,
    S: GameStorage,
{
    story_loader: L,
    storage: S,
}

impl<L, S> GameEngine<L, S>
where
    L: StoryLoader,
    S: GameStorage,
{
    pub const fn new(story_loader: L, storage: S) -> Self {
        Self {
            story_loader,
            storage,
        }
    }

    /// Load the content table.
    ///
    /// # Errors
    ///
    /// Returns an error if the content table cannot be loaded.
    pub fn load_story(&self) -> Result<StoryData, L::Error> {
        self.story_loader.load_story()
    }

    /// A fresh run at the initial state.
    #[must_use]
    pub fn new_game(&self) -> GameState {
        GameState::default()
    }

    /// Persist the state. Called after every store mutation.
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be saved.
    pub fn save_game(&self, save_name: &str, game_state: &GameState) -> Result<(), S::Error> {
        self.storage.save_game(save_name, game_state)
    }

    /// Load a save slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    pub fn load_game(&self, save_name: &str) -> Result<Option<GameState>, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        self.storage.load_game(save_name).map_err(Into::into)
    }

    /// Load a save slot, degrading to the initial state when the save is
    /// absent or unreadable. A corrupt save is never fatal.
    #[must_use]
    pub fn load_or_default(&self, save_name: &str) -> GameState {
        match self.storage.load_game(save_name) {
            Ok(Some(state)) => state,
            Ok(None) | Err(_) => GameState::default(),
        }
    }

    /// Delete a save slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    pub fn delete_save(&self, save_name: &str) -> Result<(), S::Error> {
        self.storage.delete_save(save_name)
    }
}

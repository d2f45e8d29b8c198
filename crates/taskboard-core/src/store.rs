use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error};

use crate::normalize::{normalize, ThemePatch};
use crate::state::ThemeState;
use crate::storage::{KeyValueStore, StorageError, THEME_STORAGE_KEY};
use crate::theme::ThemeConfiguration;

#[derive(Debug, Error)]
pub enum ThemeStoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Invalid theme JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Theme store that persists to a key/value store under [`THEME_STORAGE_KEY`].
///
/// The saved theme is loaded once, when the store is created.
#[derive(Debug)]
pub struct LocalThemeStore<S> {
    storage: S,
    state: ThemeState,
}

impl<S: KeyValueStore> LocalThemeStore<S> {
    /// Create the store and load any previously saved theme
    pub fn new(storage: S) -> Result<Self, ThemeStoreError> {
        let store = Self {
            storage,
            state: ThemeState::default(),
        };
        store.load_theme()?;
        Ok(store)
    }

    /// Snapshot of the current theme
    pub fn current_theme(&self) -> ThemeConfiguration {
        self.state.current()
    }

    /// Receiver notified on every theme change
    pub fn subscribe(&self) -> watch::Receiver<ThemeConfiguration> {
        self.state.subscribe()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Normalize `new_theme`, make it current, then persist it.
    ///
    /// The in-memory theme is replaced even when the write fails.
    pub fn update_theme(&self, new_theme: &ThemePatch) -> Result<ThemeConfiguration, ThemeStoreError> {
        let theme = normalize(new_theme);
        self.state.replace(theme.clone());

        let json = serde_json::to_string(&theme)?;
        self.storage.set(THEME_STORAGE_KEY, &json)?;
        debug!("Saved theme under '{}'", THEME_STORAGE_KEY);

        Ok(theme)
    }

    /// Restore the default theme and forget the saved one
    pub fn reset_theme(&self) -> Result<(), ThemeStoreError> {
        self.state.replace(ThemeConfiguration::default());
        self.storage.remove(THEME_STORAGE_KEY)?;
        Ok(())
    }

    fn load_theme(&self) -> Result<(), ThemeStoreError> {
        if let Err(e) = self.restore_saved() {
            error!("Error loading theme: {}", e);
            self.reset_theme()?;
        }
        Ok(())
    }

    fn restore_saved(&self) -> Result<(), ThemeStoreError> {
        match self.storage.get(THEME_STORAGE_KEY)? {
            Some(saved) if !saved.is_empty() => {
                let patch: ThemePatch = serde_json::from_str(&saved)?;
                self.update_theme(&patch)?;
            }
            _ => {}
        }
        Ok(())
    }
}

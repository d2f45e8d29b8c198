use std::sync::{Mutex, MutexGuard, PoisonError};
use taskboard_core::{normalize, Observable, ThemeConfiguration, ThemePatch, ThemeState};
use tokio::sync::watch;
use tracing::{debug, error, warn};

use crate::api::ApiError;
use crate::theme::ThemeApi;

/// Progress of the most recent backend request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStatus {
    pub loading: bool,
    pub error: Option<String>,
}

/// Theme store that keeps the server's theme as the source of truth.
///
/// Every request takes a ticket. Only the response to the latest ticket may
/// change the theme or the status; older responses are dropped.
#[derive(Debug)]
pub struct BackendThemeStore<A> {
    api: A,
    state: ThemeState,
    status: Observable<StoreStatus>,
    sequence: Mutex<u64>,
}

impl<A: ThemeApi> BackendThemeStore<A> {
    /// Create the store and fetch the saved theme from the server.
    ///
    /// A failed fetch leaves the default theme in place and is recorded in
    /// [`StoreStatus::error`].
    pub async fn new(api: A) -> Self {
        let store = Self {
            api,
            state: ThemeState::default(),
            status: Observable::default(),
            sequence: Mutex::new(0),
        };
        store.load_theme().await;
        store
    }

    pub fn current_theme(&self) -> ThemeConfiguration {
        self.state.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<ThemeConfiguration> {
        self.state.subscribe()
    }

    pub fn status(&self) -> StoreStatus {
        self.status.current()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<StoreStatus> {
        self.status.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.status.with(|status| status.loading)
    }

    pub fn error(&self) -> Option<String> {
        self.status.with(|status| status.error.clone())
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Normalize `new_theme` and save it; the server's reply becomes current.
    ///
    /// The reply is normalized too, so the stored theme is the server's echo
    /// merged over the defaults rather than the raw echo: a falsy scalar such
    /// as `"boardBackground": ""` comes back as the default value.
    pub async fn update_theme(&self, new_theme: &ThemePatch) -> Result<ThemeConfiguration, ApiError> {
        let ticket = self.begin();
        let theme = normalize(new_theme);

        match self.api.update_theme(&theme).await {
            Ok(saved) => {
                let saved = normalize(&saved);
                self.finish(ticket, Some(saved.clone()), None);
                Ok(saved)
            }
            Err(e) => {
                error!("Failed to update theme: {}", e);
                self.finish(ticket, None, Some(e.to_string()));
                Err(e)
            }
        }
    }

    /// Delete the server's theme and fall back to the default
    pub async fn reset_theme(&self) -> Result<(), ApiError> {
        let ticket = self.begin();

        match self.api.reset_theme().await {
            Ok(()) => {
                self.finish(ticket, Some(ThemeConfiguration::default()), None);
                Ok(())
            }
            Err(e) => {
                error!("Failed to reset theme: {}", e);
                self.finish(ticket, None, Some(e.to_string()));
                Err(e)
            }
        }
    }

    async fn load_theme(&self) {
        let ticket = self.begin();

        match self.api.get_current_theme().await {
            Ok(Some(saved)) => {
                self.finish(ticket, Some(normalize(&saved)), None);
            }
            Ok(None) => {
                debug!("No theme saved on the server, using defaults");
                self.finish(ticket, None, None);
            }
            Err(e) => {
                warn!("Error loading theme: {}", e);
                self.finish(ticket, None, Some(e.to_string()));
            }
        }
    }

    fn sequence(&self) -> MutexGuard<'_, u64> {
        self.sequence.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Issue the next ticket and mark the store as loading
    fn begin(&self) -> u64 {
        let mut latest = self.sequence();
        *latest += 1;
        self.status.replace(StoreStatus {
            loading: true,
            error: None,
        });
        *latest
    }

    /// Apply a response if `ticket` is still the latest; returns whether it was applied
    fn finish(&self, ticket: u64, theme: Option<ThemeConfiguration>, error: Option<String>) -> bool {
        let latest = self.sequence();
        if *latest != ticket {
            debug!("Discarding stale theme response (ticket {}, latest {})", ticket, *latest);
            return false;
        }

        if let Some(theme) = theme {
            self.state.replace(theme);
        }
        self.status.replace(StoreStatus {
            loading: false,
            error,
        });
        true
    }
}

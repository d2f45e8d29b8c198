use async_trait::async_trait;
use reqwest::Method;
use taskboard_core::{ThemeConfiguration, ThemePatch};

use crate::api::{ApiClient, ApiError};

const THEME_PATH: &str = "/theme/";

/// Remote theme persistence.
///
/// Responses are returned as partial themes; callers normalize them before use.
#[async_trait]
pub trait ThemeApi: Send + Sync {
    /// The saved theme, or `None` when the server has none yet
    async fn get_current_theme(&self) -> Result<Option<ThemePatch>, ApiError>;

    /// Save a complete theme, returning what the server stored
    async fn update_theme(&self, theme: &ThemeConfiguration) -> Result<ThemePatch, ApiError>;

    async fn reset_theme(&self) -> Result<(), ApiError>;
}

/// [`ThemeApi`] over the `/theme/` endpoint
#[derive(Debug, Clone)]
pub struct ThemeService {
    client: ApiClient,
}

impl ThemeService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

#[async_trait]
impl ThemeApi for ThemeService {
    async fn get_current_theme(&self) -> Result<Option<ThemePatch>, ApiError> {
        match self.client.get(THEME_PATH).await {
            Ok(theme) => Ok(Some(theme)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn update_theme(&self, theme: &ThemeConfiguration) -> Result<ThemePatch, ApiError> {
        self.client.send(Method::PUT, THEME_PATH, theme).await
    }

    async fn reset_theme(&self) -> Result<(), ApiError> {
        self.client.send_empty(Method::DELETE, THEME_PATH).await
    }
}

#[async_trait]
impl<A: ThemeApi + ?Sized> ThemeApi for std::sync::Arc<A> {
    async fn get_current_theme(&self) -> Result<Option<ThemePatch>, ApiError> {
        (**self).get_current_theme().await
    }

    async fn update_theme(&self, theme: &ThemeConfiguration) -> Result<ThemePatch, ApiError> {
        (**self).update_theme(theme).await
    }

    async fn reset_theme(&self) -> Result<(), ApiError> {
        (**self).reset_theme().await
    }
}

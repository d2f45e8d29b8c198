use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::{ParseEnumError, TaskStatus};

/// How a background image is sized inside its box
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    #[default]
    Cover,
    Contain,
    Custom,
}

impl ImageFit {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFit::Cover => "cover",
            ImageFit::Contain => "contain",
            ImageFit::Custom => "custom",
        }
    }

    /// Value for the CSS `background-size` property
    pub fn css_size(&self) -> &'static str {
        match self {
            ImageFit::Cover => "cover",
            ImageFit::Contain => "contain",
            // Custom sizing is driven by the position string alone
            ImageFit::Custom => "auto",
        }
    }
}

impl fmt::Display for ImageFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageFit {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cover" => Ok(ImageFit::Cover),
            "contain" => Ok(ImageFit::Contain),
            "custom" => Ok(ImageFit::Custom),
            _ => Err(ParseEnumError::new("image fit", s, "cover, contain, custom")),
        }
    }
}

/// One value per board state.
///
/// Serializes as an object with exactly the keys `ON_HOLD`, `CURRENT`,
/// `UPCOMING` and `COMPLETED`, so a map can never lose a state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct StateMap<T> {
    pub on_hold: T,
    pub current: T,
    pub upcoming: T,
    pub completed: T,
}

impl<T> StateMap<T> {
    /// Build a map by computing the value for each state
    pub fn from_fn(mut f: impl FnMut(TaskStatus) -> T) -> Self {
        Self {
            on_hold: f(TaskStatus::OnHold),
            current: f(TaskStatus::Current),
            upcoming: f(TaskStatus::Upcoming),
            completed: f(TaskStatus::Completed),
        }
    }

    pub fn get(&self, state: TaskStatus) -> &T {
        match state {
            TaskStatus::OnHold => &self.on_hold,
            TaskStatus::Current => &self.current,
            TaskStatus::Upcoming => &self.upcoming,
            TaskStatus::Completed => &self.completed,
        }
    }

    pub fn get_mut(&mut self, state: TaskStatus) -> &mut T {
        match state {
            TaskStatus::OnHold => &mut self.on_hold,
            TaskStatus::Current => &mut self.current,
            TaskStatus::Upcoming => &mut self.upcoming,
            TaskStatus::Completed => &mut self.completed,
        }
    }

    /// Iterate in board order
    pub fn iter(&self) -> impl Iterator<Item = (TaskStatus, &T)> {
        TaskStatus::ALL.into_iter().map(move |state| (state, self.get(state)))
    }
}

impl<T: Clone> StateMap<T> {
    /// Same value for every state
    pub fn splat(value: T) -> Self {
        Self::from_fn(|_| value.clone())
    }
}

/// Visual styling of the board, its columns and its cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfiguration {
    /// CSS background of the whole board
    pub board_background: String,
    pub board_background_image: Option<String>,
    pub board_image_fit: ImageFit,
    pub board_image_position: String,

    pub column_backgrounds: StateMap<String>,
    /// 0.0 - 1.0
    pub column_opacity: StateMap<f64>,
    pub column_background_images: StateMap<Option<String>>,
    pub column_image_fit: StateMap<ImageFit>,
    pub column_image_position: StateMap<String>,
    pub column_title_colors: StateMap<String>,

    pub card_backgrounds: StateMap<String>,
    pub card_background_images: StateMap<Option<String>>,
    pub card_image_fit: StateMap<ImageFit>,
    pub card_image_position: StateMap<String>,
    /// 0.0 - 1.0
    pub card_opacity: StateMap<f64>,
}

pub const DEFAULT_BOARD_BACKGROUND: &str = "linear-gradient(to bottom, #1a1a2e, #16213e)";
pub const DEFAULT_IMAGE_POSITION: &str = "center center";
pub const DEFAULT_COLUMN_OPACITY: f64 = 0.1;
pub const DEFAULT_CARD_OPACITY: f64 = 0.95;
pub const DEFAULT_CARD_BACKGROUND: &str = "rgba(255, 255, 255, 0.95)";
pub const DEFAULT_COLUMN_TITLE_COLOR: &str = "#fff";

fn default_column_background(state: TaskStatus) -> String {
    match state {
        TaskStatus::OnHold => "rgba(244, 244, 244, 0.1)",
        TaskStatus::Current | TaskStatus::Upcoming => "rgba(255, 255, 255, 0.1)",
        TaskStatus::Completed => "rgba(240, 255, 240, 0.1)",
    }
    .to_string()
}

impl Default for ThemeConfiguration {
    /// Builds a fresh default theme; no value is shared between calls
    fn default() -> Self {
        Self {
            board_background: DEFAULT_BOARD_BACKGROUND.to_string(),
            board_background_image: None,
            board_image_fit: ImageFit::Cover,
            board_image_position: DEFAULT_IMAGE_POSITION.to_string(),
            column_backgrounds: StateMap::from_fn(default_column_background),
            column_opacity: StateMap::splat(DEFAULT_COLUMN_OPACITY),
            column_background_images: StateMap::splat(None),
            column_image_fit: StateMap::splat(ImageFit::Cover),
            column_image_position: StateMap::splat(DEFAULT_IMAGE_POSITION.to_string()),
            column_title_colors: StateMap::splat(DEFAULT_COLUMN_TITLE_COLOR.to_string()),
            card_backgrounds: StateMap::splat(DEFAULT_CARD_BACKGROUND.to_string()),
            card_background_images: StateMap::splat(None),
            card_image_fit: StateMap::splat(ImageFit::Cover),
            card_image_position: StateMap::splat(DEFAULT_IMAGE_POSITION.to_string()),
            card_opacity: StateMap::splat(DEFAULT_CARD_OPACITY),
        }
    }
}

impl ThemeConfiguration {
    /// Generate CSS custom properties from the theme
    pub fn css_variables(&self) -> String {
        let mut css = String::new();

        css.push_str("  /* Board */\n");
        push_var(&mut css, "board-background", &self.board_background);
        push_var(
            &mut css,
            "board-background-image",
            &css_image(self.board_background_image.as_deref()),
        );
        push_var(&mut css, "board-background-size", self.board_image_fit.css_size());
        push_var(&mut css, "board-background-position", &self.board_image_position);

        for state in TaskStatus::ALL {
            let slug = state.slug();

            css.push_str(&format!("\n  /* Column: {} */\n", state.label()));
            push_var(
                &mut css,
                &format!("column-{slug}-background"),
                self.column_backgrounds.get(state),
            );
            push_var(
                &mut css,
                &format!("column-{slug}-opacity"),
                &self.column_opacity.get(state).to_string(),
            );
            push_var(
                &mut css,
                &format!("column-{slug}-background-image"),
                &css_image(self.column_background_images.get(state).as_deref()),
            );
            push_var(
                &mut css,
                &format!("column-{slug}-background-size"),
                self.column_image_fit.get(state).css_size(),
            );
            push_var(
                &mut css,
                &format!("column-{slug}-background-position"),
                self.column_image_position.get(state),
            );
            push_var(
                &mut css,
                &format!("column-{slug}-title-color"),
                self.column_title_colors.get(state),
            );

            css.push_str(&format!("\n  /* Card: {} */\n", state.label()));
            push_var(
                &mut css,
                &format!("card-{slug}-background"),
                self.card_backgrounds.get(state),
            );
            push_var(
                &mut css,
                &format!("card-{slug}-opacity"),
                &self.card_opacity.get(state).to_string(),
            );
            push_var(
                &mut css,
                &format!("card-{slug}-background-image"),
                &css_image(self.card_background_images.get(state).as_deref()),
            );
            push_var(
                &mut css,
                &format!("card-{slug}-background-size"),
                self.card_image_fit.get(state).css_size(),
            );
            push_var(
                &mut css,
                &format!("card-{slug}-background-position"),
                self.card_image_position.get(state),
            );
        }

        css
    }

    /// Generate a complete CSS theme block
    pub fn css_theme(&self) -> String {
        format!(":root {{\n{}}}\n", self.css_variables())
    }
}

fn push_var(css: &mut String, name: &str, value: &str) {
    css.push_str(&format!("  --{}: {};\n", name, value));
}

fn css_image(image: Option<&str>) -> String {
    match image {
        Some(url) if !url.is_empty() => format!("url(\"{}\")", url.replace('"', "\\\"")),
        _ => "none".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_column_backgrounds() {
        let theme = ThemeConfiguration::default();
        assert_eq!(theme.column_backgrounds.on_hold, "rgba(244, 244, 244, 0.1)");
        assert_eq!(theme.column_backgrounds.current, "rgba(255, 255, 255, 0.1)");
        assert_eq!(theme.column_backgrounds.upcoming, "rgba(255, 255, 255, 0.1)");
        assert_eq!(theme.column_backgrounds.completed, "rgba(240, 255, 240, 0.1)");
    }

    #[test]
    fn test_defaults_are_independent() {
        let mut first = ThemeConfiguration::default();
        first.column_opacity.current = 0.7;
        first.board_background = "red".to_string();

        let second = ThemeConfiguration::default();
        assert_eq!(second.column_opacity.current, DEFAULT_COLUMN_OPACITY);
        assert_eq!(second.board_background, DEFAULT_BOARD_BACKGROUND);
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(ThemeConfiguration::default()).unwrap();

        assert_eq!(value["boardImageFit"], "cover");
        assert!(value["boardBackgroundImage"].is_null());

        let opacity = value["columnOpacity"].as_object().unwrap();
        let mut keys: Vec<&str> = opacity.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["COMPLETED", "CURRENT", "ON_HOLD", "UPCOMING"]);
        assert_eq!(value["cardOpacity"]["ON_HOLD"], 0.95);
    }

    #[test]
    fn test_state_map_access() {
        let mut map = StateMap::splat(1);
        *map.get_mut(TaskStatus::Completed) = 4;
        let collected: Vec<(TaskStatus, i32)> = map.iter().map(|(s, v)| (s, *v)).collect();
        assert_eq!(
            collected,
            vec![
                (TaskStatus::OnHold, 1),
                (TaskStatus::Current, 1),
                (TaskStatus::Upcoming, 1),
                (TaskStatus::Completed, 4),
            ]
        );
    }

    #[test]
    fn test_image_fit_parsing() {
        assert_eq!("Contain".parse::<ImageFit>().unwrap(), ImageFit::Contain);
        assert!("stretch".parse::<ImageFit>().is_err());
        assert_eq!(ImageFit::Custom.css_size(), "auto");
    }

    #[test]
    fn test_css_generation() {
        let mut theme = ThemeConfiguration::default();
        theme.card_background_images.current = Some("https://example.com/card.png".to_string());
        let css = theme.css_theme();

        assert!(css.starts_with(":root {\n"));
        assert!(css.contains(
            "--board-background: linear-gradient(to bottom, #1a1a2e, #16213e);"
        ));
        assert!(css.contains("--board-background-image: none;"));
        assert!(css.contains("--column-on-hold-background: rgba(244, 244, 244, 0.1);"));
        assert!(css.contains("--column-current-opacity: 0.1;"));
        assert!(css.contains("--column-completed-title-color: #fff;"));
        assert!(css.contains("--card-upcoming-opacity: 0.95;"));
        assert!(css.contains(
            "--card-current-background-image: url(\"https://example.com/card.png\");"
        ));
    }
}

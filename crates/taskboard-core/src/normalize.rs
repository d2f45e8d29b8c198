//! Merging partial theme input over the defaults.
//!
//! Top-level scalar fields fall back to the default whenever the incoming
//! value is falsy (missing, `null`, `""`, `0`, `false`). The board
//! background image is the exception: it is copied as given. Per-state maps
//! are shallow-merged key by key over the default map, so a map in the
//! result always carries all four states.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use crate::models::TaskStatus;
use crate::theme::{ImageFit, StateMap, ThemeConfiguration};

/// Per-state override map, keyed by state name (`ON_HOLD`, ...).
///
/// A `None` value is an explicit JSON `null`.
pub type PatchMap<T> = BTreeMap<String, Option<T>>;

/// Partial theme input. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemePatch {
    #[serde(default, deserialize_with = "truthy", skip_serializing_if = "Option::is_none")]
    pub board_background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_background_image: Option<String>,
    #[serde(default, deserialize_with = "truthy", skip_serializing_if = "Option::is_none")]
    pub board_image_fit: Option<ImageFit>,
    #[serde(default, deserialize_with = "truthy", skip_serializing_if = "Option::is_none")]
    pub board_image_position: Option<String>,

    #[serde(default, deserialize_with = "state_map", skip_serializing_if = "BTreeMap::is_empty")]
    pub column_backgrounds: PatchMap<String>,
    #[serde(default, deserialize_with = "state_map", skip_serializing_if = "BTreeMap::is_empty")]
    pub column_opacity: PatchMap<f64>,
    #[serde(default, deserialize_with = "state_map", skip_serializing_if = "BTreeMap::is_empty")]
    pub column_background_images: PatchMap<String>,
    #[serde(default, deserialize_with = "state_map", skip_serializing_if = "BTreeMap::is_empty")]
    pub column_image_fit: PatchMap<ImageFit>,
    #[serde(default, deserialize_with = "state_map", skip_serializing_if = "BTreeMap::is_empty")]
    pub column_image_position: PatchMap<String>,
    #[serde(default, deserialize_with = "state_map", skip_serializing_if = "BTreeMap::is_empty")]
    pub column_title_colors: PatchMap<String>,

    #[serde(default, deserialize_with = "state_map", skip_serializing_if = "BTreeMap::is_empty")]
    pub card_backgrounds: PatchMap<String>,
    #[serde(default, deserialize_with = "state_map", skip_serializing_if = "BTreeMap::is_empty")]
    pub card_background_images: PatchMap<String>,
    #[serde(default, deserialize_with = "state_map", skip_serializing_if = "BTreeMap::is_empty")]
    pub card_image_fit: PatchMap<ImageFit>,
    #[serde(default, deserialize_with = "state_map", skip_serializing_if = "BTreeMap::is_empty")]
    pub card_image_position: PatchMap<String>,
    #[serde(default, deserialize_with = "state_map", skip_serializing_if = "BTreeMap::is_empty")]
    pub card_opacity: PatchMap<f64>,
}

impl ThemePatch {
    /// Merge this patch over the defaults
    pub fn normalize(&self) -> ThemeConfiguration {
        normalize(self)
    }

    /// Set one per-state override, e.g. `set(&mut patch.column_opacity, CURRENT, 0.5)`
    pub fn set<T>(map: &mut PatchMap<T>, state: TaskStatus, value: T) {
        map.insert(state.as_str().to_string(), Some(value));
    }
}

/// Produce a complete configuration from partial input plus defaults
pub fn normalize(input: &ThemePatch) -> ThemeConfiguration {
    let defaults = ThemeConfiguration::default();

    ThemeConfiguration {
        board_background: pick_str(&input.board_background, defaults.board_background),
        board_background_image: input.board_background_image.clone(),
        board_image_fit: input.board_image_fit.unwrap_or(defaults.board_image_fit),
        board_image_position: pick_str(&input.board_image_position, defaults.board_image_position),

        column_backgrounds: merge(defaults.column_backgrounds, &input.column_backgrounds),
        column_opacity: merge(defaults.column_opacity, &input.column_opacity),
        column_background_images: merge_nullable(
            defaults.column_background_images,
            &input.column_background_images,
        ),
        column_image_fit: merge(defaults.column_image_fit, &input.column_image_fit),
        column_image_position: merge(defaults.column_image_position, &input.column_image_position),
        column_title_colors: merge(defaults.column_title_colors, &input.column_title_colors),

        card_backgrounds: merge(defaults.card_backgrounds, &input.card_backgrounds),
        card_background_images: merge_nullable(
            defaults.card_background_images,
            &input.card_background_images,
        ),
        card_image_fit: merge(defaults.card_image_fit, &input.card_image_fit),
        card_image_position: merge(defaults.card_image_position, &input.card_image_position),
        card_opacity: merge(defaults.card_opacity, &input.card_opacity),
    }
}

fn pick_str(value: &Option<String>, default: String) -> String {
    match value {
        Some(s) if !s.is_empty() => s.clone(),
        _ => default,
    }
}

// A null entry in a non-nullable map keeps the default
fn merge<T: Clone>(base: StateMap<T>, patch: &PatchMap<T>) -> StateMap<T> {
    StateMap::from_fn(|state| match patch.get(state.as_str()) {
        Some(Some(value)) => value.clone(),
        _ => base.get(state).clone(),
    })
}

// A null entry in an image map clears the image
fn merge_nullable(
    base: StateMap<Option<String>>,
    patch: &PatchMap<String>,
) -> StateMap<Option<String>> {
    StateMap::from_fn(|state| match patch.get(state.as_str()) {
        Some(value) => value.clone(),
        None => base.get(state).clone(),
    })
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64().map_or(false, |f| f == 0.0 || f.is_nan()),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn truthy<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if is_falsy(&value) {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(serde::de::Error::custom)
}

// A `null` map is treated like a missing one; unknown state keys are dropped
fn state_map<'de, D, T>(deserializer: D) -> Result<PatchMap<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw: Option<BTreeMap<String, Option<T>>> = Option::deserialize(deserializer)?;
    let mut map = raw.unwrap_or_default();
    map.retain(|key, _| {
        let known = TaskStatus::ALL.iter().any(|state| state.as_str() == key);
        if !known {
            debug!("Ignoring unknown state key '{}' in theme input", key);
        }
        known
    });
    Ok(map)
}

fn state_entries<T>(map: StateMap<T>) -> PatchMap<T> {
    let StateMap {
        on_hold,
        current,
        upcoming,
        completed,
    } = map;
    BTreeMap::from([
        (TaskStatus::OnHold.as_str().to_string(), Some(on_hold)),
        (TaskStatus::Current.as_str().to_string(), Some(current)),
        (TaskStatus::Upcoming.as_str().to_string(), Some(upcoming)),
        (TaskStatus::Completed.as_str().to_string(), Some(completed)),
    ])
}

fn nullable_entries(map: StateMap<Option<String>>) -> PatchMap<String> {
    state_entries(map)
        .into_iter()
        .map(|(key, value)| (key, value.flatten()))
        .collect()
}

impl From<ThemeConfiguration> for ThemePatch {
    fn from(theme: ThemeConfiguration) -> Self {
        Self {
            board_background: Some(theme.board_background),
            board_background_image: theme.board_background_image,
            board_image_fit: Some(theme.board_image_fit),
            board_image_position: Some(theme.board_image_position),
            column_backgrounds: state_entries(theme.column_backgrounds),
            column_opacity: state_entries(theme.column_opacity),
            column_background_images: nullable_entries(theme.column_background_images),
            column_image_fit: state_entries(theme.column_image_fit),
            column_image_position: state_entries(theme.column_image_position),
            column_title_colors: state_entries(theme.column_title_colors),
            card_backgrounds: state_entries(theme.card_backgrounds),
            card_background_images: nullable_entries(theme.card_background_images),
            card_image_fit: state_entries(theme.card_image_fit),
            card_image_position: state_entries(theme.card_image_position),
            card_opacity: state_entries(theme.card_opacity),
        }
    }
}

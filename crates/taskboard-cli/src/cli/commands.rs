use anyhow::{anyhow, bail, Context, Result};
use colored::{ColoredString, Colorize};
use dialoguer::Confirm;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use taskboard_client::{ApiClient, BackendThemeStore, TaskService, ThemeService};
use taskboard_core::{
    Config, FileStore, LocalThemeStore, MemoryStore, Priority, Task, TaskDraft, TaskMove,
    TaskStatus, ThemeBackend, ThemeConfiguration, ThemePatch,
};
use tracing::debug;

use super::{TaskFields, ThemeTarget};

fn task_service(config: &Config) -> Result<TaskService> {
    let client = ApiClient::from_config(&config.api).context("Failed to create API client")?;
    Ok(TaskService::new(client))
}

fn priority_colored(priority: Priority) -> ColoredString {
    match priority {
        Priority::High => priority.label().red(),
        Priority::Medium => priority.label().yellow(),
        Priority::Low => priority.label().dimmed(),
    }
}

fn print_task_line(task: &Task) {
    let title = if task.completed {
        task.title.strikethrough()
    } else {
        task.title.normal()
    };
    println!(
        "  #{} {} [{}]",
        task.id.to_string().dimmed(),
        title,
        priority_colored(task.priority)
    );
}

fn print_task(task: &Task, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(task)?);
        return Ok(());
    }

    println!("{} {}", format!("#{}", task.id).dimmed(), task.title.cyan().bold());
    println!("  Status:    {}", task.status.label());
    println!("  Priority:  {}", priority_colored(task.priority));
    println!("  Order:     {}", task.order);
    println!(
        "  Completed: {}",
        if task.completed { "Yes".green() } else { "No".normal() }
    );
    if !task.description.is_empty() {
        println!();
        println!("{}", task.description);
    }
    Ok(())
}

/// List all tasks grouped by status column
pub async fn list_tasks(config: &Config, json: bool) -> Result<()> {
    let tasks = task_service(config)?.get_tasks().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("No tasks");
        return Ok(());
    }

    for status in TaskStatus::ALL {
        let mut column: Vec<&Task> = tasks.iter().filter(|t| t.status == status).collect();
        if column.is_empty() {
            continue;
        }
        column.sort_by_key(|t| (t.order, t.id));

        println!("{} ({})", status.label().cyan().bold(), column.len());
        for task in column {
            print_task_line(task);
        }
    }
    Ok(())
}

pub async fn show_task(config: &Config, id: i64, json: bool) -> Result<()> {
    let task = task_service(config)?
        .get_task(id)
        .await
        .with_context(|| format!("Failed to fetch task {}", id))?;
    print_task(&task, json)
}

fn apply_fields(draft: &mut TaskDraft, fields: &TaskFields) {
    if let Some(ref description) = fields.description {
        draft.description = description.clone();
    }
    if let Some(status) = fields.status {
        draft.status = status;
    }
    if let Some(priority) = fields.priority {
        draft.priority = priority;
    }
    if fields.order.is_some() {
        draft.order = fields.order;
    }
}

pub async fn add_task(config: &Config, title: &str, fields: &TaskFields, json: bool) -> Result<()> {
    if title.trim().is_empty() {
        bail!("Task title cannot be empty");
    }

    let mut draft = TaskDraft::new(title.trim());
    apply_fields(&mut draft, fields);

    let task = task_service(config)?
        .create_task(&draft)
        .await
        .context("Failed to create task")?;

    if json {
        return print_task(&task, true);
    }
    println!(
        "Created task {} in {}",
        format!("#{}", task.id).green(),
        task.status.label().cyan()
    );
    Ok(())
}

/// Fetch the task, apply the given changes and send the full replacement
pub async fn update_task(
    config: &Config,
    id: i64,
    title: Option<&str>,
    fields: &TaskFields,
    completed: Option<bool>,
    json: bool,
) -> Result<()> {
    let service = task_service(config)?;
    let existing = service
        .get_task(id)
        .await
        .with_context(|| format!("Failed to fetch task {}", id))?;

    let mut draft = TaskDraft::from(&existing);
    if let Some(title) = title {
        draft.title = title.to_string();
    }
    apply_fields(&mut draft, fields);
    if let Some(completed) = completed {
        draft.completed = completed;
    }

    let task = service
        .update_task(id, &draft)
        .await
        .with_context(|| format!("Failed to update task {}", id))?;

    if json {
        return print_task(&task, true);
    }
    println!("Updated task {}", format!("#{}", task.id).green());
    Ok(())
}

pub async fn move_task(
    config: &Config,
    id: i64,
    status: TaskStatus,
    order: Option<i64>,
    json: bool,
) -> Result<()> {
    let task = task_service(config)?
        .move_task(id, &TaskMove { status, order })
        .await
        .with_context(|| format!("Failed to move task {}", id))?;

    if json {
        return print_task(&task, true);
    }
    println!(
        "Moved task {} to {} (position {})",
        format!("#{}", task.id).green(),
        task.status.label().cyan(),
        task.order
    );
    Ok(())
}

/// Delete a task, asking first unless `force` is set or `ui.confirm_delete` is off.
///
/// JSON mode never prompts, so it refuses to delete without `force`.
pub async fn remove_task(config: &Config, id: i64, force: bool, json: bool) -> Result<()> {
    if !force && config.ui.confirm_delete {
        if json {
            bail!(
                "Deleting task #{} needs confirmation; use --force with --json",
                id
            );
        }
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete task #{}?", id))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Aborted");
            return Ok(());
        }
    }

    task_service(config)?
        .delete_task(id)
        .await
        .with_context(|| format!("Failed to delete task {}", id))?;

    if json {
        println!("{}", serde_json::json!({ "deleted": id }));
    } else {
        println!("Deleted task {}", format!("#{}", id).red());
    }
    Ok(())
}

/// Which store a theme command runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Local,
    Ephemeral,
    Remote,
}

impl ThemeVariant {
    pub fn resolve(config: &Config, target: ThemeTarget) -> Self {
        if target.ephemeral {
            ThemeVariant::Ephemeral
        } else if target.remote || config.theme.backend == ThemeBackend::Remote {
            ThemeVariant::Remote
        } else {
            ThemeVariant::Local
        }
    }
}

/// A theme store opened for one command
enum ThemeSession {
    Local(LocalThemeStore<FileStore>),
    Ephemeral(LocalThemeStore<MemoryStore>),
    Remote(BackendThemeStore<ThemeService>),
}

impl ThemeSession {
    async fn open(config: &Config, target: ThemeTarget) -> Result<Self> {
        let variant = ThemeVariant::resolve(config, target);
        debug!("Opening {:?} theme store", variant);

        let session = match variant {
            ThemeVariant::Local => {
                let storage = FileStore::new(config.storage_dir()?);
                let store = LocalThemeStore::new(storage).context("Failed to open local theme store")?;
                ThemeSession::Local(store)
            }
            ThemeVariant::Ephemeral => ThemeSession::Ephemeral(
                LocalThemeStore::new(MemoryStore::new()).context("Failed to open theme store")?,
            ),
            ThemeVariant::Remote => {
                let client = ApiClient::from_config(&config.api).context("Failed to create API client")?;
                ThemeSession::Remote(BackendThemeStore::new(ThemeService::new(client)).await)
            }
        };
        Ok(session)
    }

    /// Current theme; fails if the server could not be reached
    fn loaded_theme(&self) -> Result<ThemeConfiguration> {
        match self {
            ThemeSession::Local(store) => Ok(store.current_theme()),
            ThemeSession::Ephemeral(store) => Ok(store.current_theme()),
            ThemeSession::Remote(store) => match store.error() {
                Some(error) => Err(anyhow!("Could not load theme from server: {}", error)),
                None => Ok(store.current_theme()),
            },
        }
    }

    async fn update(&self, patch: &ThemePatch) -> Result<ThemeConfiguration> {
        let theme = match self {
            ThemeSession::Local(store) => store.update_theme(patch)?,
            ThemeSession::Ephemeral(store) => store.update_theme(patch)?,
            ThemeSession::Remote(store) => store.update_theme(patch).await?,
        };
        Ok(theme)
    }

    async fn reset(&self) -> Result<()> {
        match self {
            ThemeSession::Local(store) => store.reset_theme()?,
            ThemeSession::Ephemeral(store) => store.reset_theme()?,
            ThemeSession::Remote(store) => store.reset_theme().await?,
        }
        Ok(())
    }

    fn describe(&self) -> String {
        match self {
            ThemeSession::Local(store) => store.storage().dir().display().to_string(),
            ThemeSession::Ephemeral(_) => "memory".to_string(),
            ThemeSession::Remote(store) => store.api().client().url("/theme/"),
        }
    }
}

/// Parse a theme from a JSON file, or from stdin when `input` is `-`
pub fn read_theme_input(input: &str) -> Result<ThemePatch> {
    let content = if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read theme from stdin")?;
        buffer
    } else {
        fs::read_to_string(Path::new(input))
            .with_context(|| format!("Failed to read theme file: {}", input))?
    };

    serde_json::from_str::<ThemePatch>(&content).with_context(|| format!("Invalid theme JSON in {}", input))
}

fn or_none(image: &Option<String>) -> ColoredString {
    match image {
        Some(image) => image.normal(),
        None => "none".dimmed(),
    }
}

fn print_theme(theme: &ThemeConfiguration) {
    println!("{}", "Board".cyan().bold());
    println!("  Background: {}", theme.board_background);
    println!("  Image:      {}", or_none(&theme.board_background_image));
    println!(
        "  Image fit:  {} at {}",
        theme.board_image_fit, theme.board_image_position
    );

    for status in TaskStatus::ALL {
        println!();
        println!("{}", status.label().cyan().bold());
        println!(
            "  Column: {} (opacity {}), title {}",
            theme.column_backgrounds.get(status),
            theme.column_opacity.get(status),
            theme.column_title_colors.get(status)
        );
        println!(
            "          image {} ({} at {})",
            or_none(theme.column_background_images.get(status)),
            theme.column_image_fit.get(status),
            theme.column_image_position.get(status)
        );
        println!(
            "  Card:   {} (opacity {})",
            theme.card_backgrounds.get(status),
            theme.card_opacity.get(status)
        );
        println!(
            "          image {} ({} at {})",
            or_none(theme.card_background_images.get(status)),
            theme.card_image_fit.get(status),
            theme.card_image_position.get(status)
        );
    }
}

pub async fn show_theme(config: &Config, target: ThemeTarget, json: bool) -> Result<()> {
    let session = ThemeSession::open(config, target).await?;
    let theme = session.loaded_theme()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&theme)?);
    } else {
        print_theme(&theme);
    }
    Ok(())
}

pub async fn set_theme(config: &Config, input: &str, target: ThemeTarget, json: bool) -> Result<()> {
    let patch = read_theme_input(input)?;
    let session = ThemeSession::open(config, target).await?;
    let theme = session.update(&patch).await.context("Failed to save theme")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&theme)?);
    } else {
        println!("Theme saved to {}", session.describe().cyan());
    }
    Ok(())
}

pub async fn reset_theme(config: &Config, target: ThemeTarget, json: bool) -> Result<()> {
    let session = ThemeSession::open(config, target).await?;
    session.reset().await.context("Failed to reset theme")?;

    if json {
        println!("{}", serde_json::json!({ "reset": true }));
    } else {
        println!("Theme reset to defaults ({})", session.describe().cyan());
    }
    Ok(())
}

pub async fn theme_css(config: &Config, target: ThemeTarget, json: bool) -> Result<()> {
    let session = ThemeSession::open(config, target).await?;
    let css = session.loaded_theme()?.css_theme();

    if json {
        println!("{}", serde_json::json!({ "css": css }));
    } else {
        print!("{}", css);
    }
    Ok(())
}

pub fn config_path(custom: Option<&Path>, json: bool) -> Result<()> {
    let path = match custom {
        Some(path) => path.to_path_buf(),
        None => Config::resolved_path()?,
    };

    if json {
        println!("{}", serde_json::json!({ "path": path }));
    } else {
        println!("{}", path.display());
    }
    Ok(())
}

pub fn config_schema() -> Result<()> {
    println!("{}", Config::generate_schema()?);
    Ok(())
}

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, ConfigCommands, TaskCommands, ThemeCommands};
use taskboard_core::Config;
use tracing::Level;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // Logs go to stderr so `--json` output on stdout stays parseable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Config helpers must work even when the config file is broken
    if let Commands::Config(config_cmd) = &cli.command {
        return match config_cmd {
            ConfigCommands::Path => cli::commands::config_path(cli.config.as_deref(), cli.json),
            ConfigCommands::Schema => cli::commands::config_schema(),
        };
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    tracing::debug!("Using API at {}", config.api.base_url);

    match &cli.command {
        Commands::Tasks(task_cmd) => match task_cmd {
            TaskCommands::List => cli::commands::list_tasks(&config, cli.json).await?,
            TaskCommands::Get { id } => cli::commands::show_task(&config, *id, cli.json).await?,
            TaskCommands::Add { title, fields } => {
                cli::commands::add_task(&config, title, fields, cli.json).await?;
            }
            TaskCommands::Update {
                id,
                title,
                fields,
                completed,
            } => {
                cli::commands::update_task(
                    &config,
                    *id,
                    title.as_deref(),
                    fields,
                    *completed,
                    cli.json,
                )
                .await?;
            }
            TaskCommands::Move { id, status, order } => {
                cli::commands::move_task(&config, *id, *status, *order, cli.json).await?;
            }
            TaskCommands::Rm { id, force } => {
                cli::commands::remove_task(&config, *id, *force, cli.json).await?;
            }
        },
        Commands::Theme(theme_cmd) => match theme_cmd {
            ThemeCommands::Show { target } => {
                cli::commands::show_theme(&config, *target, cli.json).await?;
            }
            ThemeCommands::Set { input, target } => {
                cli::commands::set_theme(&config, input, *target, cli.json).await?;
            }
            ThemeCommands::Reset { target } => {
                cli::commands::reset_theme(&config, *target, cli.json).await?;
            }
            ThemeCommands::Css { target } => {
                cli::commands::theme_css(&config, *target, cli.json).await?;
            }
        },
        Commands::Config(_) => {}
    }

    Ok(())
}

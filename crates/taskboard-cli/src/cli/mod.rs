pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use taskboard_core::{Priority, TaskStatus};

#[derive(Parser)]
#[clap(name = "taskboard", about = "Task board client: tasks and board theme")]
#[clap(version)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[clap(long, global = true)]
    pub json: bool,

    /// Use this config file instead of the default one
    #[clap(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Commands for managing tasks
    #[clap(subcommand, name = "tasks")]
    Tasks(TaskCommands),

    /// Commands for the board theme
    #[clap(subcommand, name = "theme")]
    Theme(ThemeCommands),

    /// Configuration helpers
    #[clap(subcommand, name = "config")]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// List all tasks, grouped by status
    #[clap(name = "ls")]
    List,

    /// Show a single task
    #[clap(name = "get")]
    Get {
        /// Task id
        id: i64,
    },

    /// Create a task
    #[clap(name = "add")]
    Add {
        /// Title of the task
        title: String,
        #[clap(flatten)]
        fields: TaskFields,
    },

    /// Replace a task's fields
    #[clap(name = "update")]
    Update {
        /// Task id
        id: i64,
        /// New title (keeps the current one when omitted)
        #[clap(long)]
        title: Option<String>,
        #[clap(flatten)]
        fields: TaskFields,
        /// Mark the task as completed or not
        #[clap(long)]
        completed: Option<bool>,
    },

    /// Move a task to another column or position
    #[clap(name = "move")]
    Move {
        /// Task id
        id: i64,
        /// Target status (ON_HOLD, CURRENT, UPCOMING, COMPLETED)
        status: TaskStatus,
        /// Position within the target column
        #[clap(long)]
        order: Option<i64>,
    },

    /// Delete a task
    #[clap(name = "rm")]
    Rm {
        /// Task id
        id: i64,
        /// Don't ask for confirmation
        #[clap(short, long)]
        force: bool,
    },
}

#[derive(clap::Args, Debug, Default)]
pub struct TaskFields {
    /// Task description
    #[clap(long, short)]
    pub description: Option<String>,
    /// Status column (ON_HOLD, CURRENT, UPCOMING, COMPLETED)
    #[clap(long, short)]
    pub status: Option<TaskStatus>,
    /// Priority (LOW, MEDIUM, HIGH)
    #[clap(long, short)]
    pub priority: Option<Priority>,
    /// Position within the status column
    #[clap(long)]
    pub order: Option<i64>,
}

/// Which theme store a theme command talks to
#[derive(clap::Args, Debug, Default, Clone, Copy)]
pub struct ThemeTarget {
    /// Use the server's theme instead of the local one
    #[clap(long, conflicts_with = "ephemeral")]
    pub remote: bool,

    /// Use an in-memory local store; nothing is read or written on disk
    #[clap(long)]
    pub ephemeral: bool,
}

#[derive(Subcommand)]
pub enum ThemeCommands {
    /// Show the current theme
    #[clap(name = "show")]
    Show {
        #[clap(flatten)]
        target: ThemeTarget,
    },

    /// Apply a (partial) theme from a JSON file, or `-` for stdin
    #[clap(name = "set")]
    Set {
        /// Path to a JSON file
        input: String,
        #[clap(flatten)]
        target: ThemeTarget,
    },

    /// Restore the default theme
    #[clap(name = "reset")]
    Reset {
        #[clap(flatten)]
        target: ThemeTarget,
    },

    /// Print the current theme as CSS custom properties
    #[clap(name = "css")]
    Css {
        #[clap(flatten)]
        target: ThemeTarget,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the path of the config file in use
    #[clap(name = "path")]
    Path,

    /// Print the JSON schema of the config file
    #[clap(name = "schema")]
    Schema,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move() {
        let cli = Cli::try_parse_from(["taskboard", "tasks", "move", "4", "on-hold", "--order", "1"])
            .unwrap();
        match cli.command {
            Commands::Tasks(TaskCommands::Move { id, status, order }) => {
                assert_eq!(id, 4);
                assert_eq!(status, TaskStatus::OnHold);
                assert_eq!(order, Some(1));
            }
            _ => panic!("expected tasks move"),
        }
    }

    #[test]
    fn test_parse_add_with_fields() {
        let cli = Cli::try_parse_from([
            "taskboard", "--json", "tasks", "add", "Ship it", "-p", "HIGH", "-s", "CURRENT",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Tasks(TaskCommands::Add { title, fields }) => {
                assert_eq!(title, "Ship it");
                assert_eq!(fields.priority, Some(Priority::High));
                assert_eq!(fields.status, Some(TaskStatus::Current));
                assert_eq!(fields.description, None);
            }
            _ => panic!("expected tasks add"),
        }
    }

    #[test]
    fn test_bad_status_is_rejected() {
        assert!(Cli::try_parse_from(["taskboard", "tasks", "move", "4", "DONE"]).is_err());
    }

    #[test]
    fn test_theme_flags() {
        let cli = Cli::try_parse_from(["taskboard", "-vv", "theme", "css", "--remote"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Theme(ThemeCommands::Css { target }) => {
                assert!(target.remote);
                assert!(!target.ephemeral);
            }
            _ => panic!("expected theme css"),
        }

        assert!(
            Cli::try_parse_from(["taskboard", "theme", "show", "--remote", "--ephemeral"]).is_err()
        );
    }
}

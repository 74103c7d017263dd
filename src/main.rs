//! Bit's command-line front-end: parses argv with `clap`, dispatches to `bit::commands`, and
//! translates engine errors into a one-line diagnostic and a non-zero exit code. Everything
//! that actually reads or writes `.bit/` lives in the library crate.

use clap::{Parser, Subcommand};
use anyhow::Result;

use bit::commands;
use bit::ResetMode;

/// Bit - a local, content-addressed version-control engine.
///
/// Objects, refs, and the index live under `.bit/` in the repository root.
#[derive(Parser)]
#[command(name = "bit")]
#[command(version)]
#[command(about = "A local version-control engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new repository
    Init {
        /// Directory to initialize (defaults to the current directory)
        path: Option<String>,
    },

    /// Stage files for the next commit
    Add {
        /// Files to stage, or "." for everything tracked/untracked
        paths: Vec<String>,
    },

    /// Remove a tracked file from the index and the worktree
    Rm {
        path: String,
    },

    /// Record staged changes as a new commit
    Commit {
        #[arg(short, long)]
        message: String,
    },

    /// Show staged, unstaged, and untracked changes
    Status,

    /// Show commit history from HEAD
    Log,

    /// List branches, or create one pointing at HEAD
    Branch {
        name: Option<String>,
    },

    /// Switch to another branch
    Checkout {
        name: String,
        #[arg(short, long)]
        force: bool,
    },

    /// Move the current branch, optionally rewriting the index and worktree
    Reset {
        #[arg(long)]
        soft: bool,
        #[arg(long)]
        mixed: bool,
        #[arg(long)]
        hard: bool,
        /// Commit, branch name, or HEAD~N (defaults to HEAD)
        target: Option<String>,
    },

    /// Restore files from the index or from HEAD
    Restore {
        paths: Vec<String>,
        #[arg(long)]
        staged: bool,
    },

    /// Show unstaged or staged changes
    Diff {
        #[arg(long)]
        staged: bool,
    },

    /// Three-way merge a branch into HEAD
    Merge {
        branch: String,
    },

    /// Stash uncommitted changes, or reapply/list them
    Stash {
        #[command(subcommand)]
        action: Option<StashAction>,
    },

    /// Get or set a configuration value
    Config {
        #[arg(long)]
        global: bool,
        key: String,
        value: Option<String>,
    },

    /// Copy another repository and check out its current branch
    Clone {
        source: String,
        destination: Option<String>,
    },
}

#[derive(Subcommand)]
enum StashAction {
    Push { message: Option<String> },
    Pop,
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path } => {
            commands::init::run(path.as_deref().map(std::path::Path::new))?;
        }

        Commands::Add { paths } => {
            commands::add::run(paths)?;
        }

        Commands::Rm { path } => {
            commands::rm::run(&path)?;
        }

        Commands::Commit { message } => {
            commands::commit::run(&message)?;
        }

        Commands::Status => {
            commands::status::run()?;
        }

        Commands::Log => {
            commands::log::run()?;
        }

        Commands::Branch { name } => {
            commands::branch::run(name)?;
        }

        Commands::Checkout { name, force } => {
            commands::checkout::run(&name, force)?;
        }

        Commands::Reset { soft, mixed, hard, target } => {
            // --mixed is the default, so it has no effect beyond documenting intent.
            let _ = mixed;
            let mode = if hard {
                ResetMode::Hard
            } else if soft {
                ResetMode::Soft
            } else {
                ResetMode::Mixed
            };
            commands::reset::run(target.as_deref().unwrap_or("HEAD"), mode)?;
        }

        Commands::Restore { paths, staged } => {
            commands::restore::run(paths, staged)?;
        }

        Commands::Diff { staged } => {
            commands::diff::run(staged)?;
        }

        Commands::Merge { branch } => {
            commands::merge::run(&branch)?;
        }

        Commands::Stash { action } => match action.unwrap_or(StashAction::Push { message: None }) {
            StashAction::Push { message } => commands::stash::push(message)?,
            StashAction::Pop => commands::stash::pop()?,
            StashAction::List => commands::stash::list()?,
        },

        Commands::Config { global, key, value } => {
            commands::config::run(global, &key, value)?;
        }

        Commands::Clone { source, destination } => {
            commands::clone::run(&source, destination)?;
        }
    }

    Ok(())
}

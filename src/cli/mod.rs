//! Command-line interface for gidtree.
//!
//! Argument definitions live here; the command implementations are split by
//! area into [`profile`], [`mapping`] and [`ssh`]. Commands write their
//! output to a caller-supplied writer so they can be exercised in tests.

pub mod context;
pub mod mapping;
pub mod profile;
pub mod ssh;

pub use context::Context;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use gidtree_config::PathNormalizer;
use std::io::{BufRead, Write};

/// gidtree - Manage git profiles with directory-based context switching
#[derive(Debug, Parser)]
#[command(name = "gidtree")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set debug log level (overrides config and RUST_LOG)
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevelArg>,
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Off => log::LevelFilter::Off,
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the working directory (~/.gidtree/) and an empty profiles file
    Init,

    /// Manage profiles
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Map a profile to a directory
    Map {
        /// Profile name
        profile: String,
        /// Directory whose repositories should use the profile
        directory: String,
    },

    /// Remove a directory mapping
    Unmap {
        directory: String,
    },

    /// Show the active profile and all directory mappings
    Status,

    /// Manage SSH keys in the SSH agent
    Ssh {
        #[command(subcommand)]
        command: SshCommands,
    },

    /// Detect the profile for the current directory and load its SSH key
    Activate,
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommands {
    /// Create a new profile
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// Name used for commits (defaults to the profile name)
        #[arg(long)]
        author_name: Option<String>,

        /// Private key used for git over SSH
        #[arg(long, value_name = "PATH")]
        ssh_key: Option<String>,

        /// Signing key id
        #[arg(long, value_name = "KEY_ID")]
        gpg_key: Option<String>,
    },

    /// List all profiles
    List,

    /// Update an existing profile; unset flags keep their current values
    Update {
        name: String,

        #[arg(long)]
        email: Option<String>,

        #[arg(long, conflicts_with = "clear_author_name")]
        author_name: Option<String>,

        #[arg(long, value_name = "PATH", conflicts_with = "clear_ssh_key")]
        ssh_key: Option<String>,

        #[arg(long, value_name = "KEY_ID", conflicts_with = "clear_gpg_key")]
        gpg_key: Option<String>,

        #[arg(long)]
        clear_author_name: bool,

        #[arg(long)]
        clear_ssh_key: bool,

        #[arg(long)]
        clear_gpg_key: bool,
    },

    /// Delete a profile, unmapping its directories first
    Delete {
        name: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Suggest private keys found in ~/.ssh
    Keys,
}

#[derive(Debug, Subcommand)]
pub enum SshCommands {
    /// Load the SSH key of a profile into the agent
    Load { profile: String },

    /// Unload the SSH key of a profile from the agent
    Unload { profile: String },
}

/// Run a parsed command against the real environment.
pub fn run(cli: Cli) -> Result<()> {
    let paths = PathNormalizer::from_env()?;
    let stdout = std::io::stdout();
    let stdin = std::io::stdin();
    run_with_paths(paths, cli.command, &mut stdout.lock(), &mut stdin.lock())
}

/// Run `command` for the home directory behind `paths`.
///
/// `init` only needs the paths, so it runs before profiles and settings are
/// loaded and still works when those files are unreadable.
pub fn run_with_paths(
    paths: PathNormalizer,
    command: Commands,
    out: &mut dyn Write,
    input: &mut dyn BufRead,
) -> Result<()> {
    if let Commands::Init = command {
        return init(&paths, out);
    }
    let mut ctx = Context::with_paths(paths)?;
    execute(&mut ctx, command, out, input)
}

/// Create `~/.gidtree` and an empty profiles file.
pub fn init(paths: &PathNormalizer, out: &mut dyn Write) -> Result<()> {
    let dir =
        gidtree_config::storage::init(paths).context("failed to initialize working directory")?;
    writeln!(out, "✓ Initialized gidtree at {}", dir.display())?;
    Ok(())
}

/// Dispatch one command.
pub fn execute(
    ctx: &mut Context,
    command: Commands,
    out: &mut dyn Write,
    input: &mut dyn BufRead,
) -> Result<()> {
    match command {
        Commands::Init => init(&ctx.paths, out),
        Commands::Profile { command } => match command {
            ProfileCommands::Create {
                name,
                email,
                author_name,
                ssh_key,
                gpg_key,
            } => {
                let mut new_profile = gidtree_config::Profile::new(name, email);
                new_profile.author_name = author_name;
                new_profile.ssh_key_path = ssh_key;
                new_profile.gpg_key_id = gpg_key;
                profile::create(ctx, new_profile, out)
            }
            ProfileCommands::List => profile::list(ctx, out),
            ProfileCommands::Update {
                name,
                email,
                author_name,
                ssh_key,
                gpg_key,
                clear_author_name,
                clear_ssh_key,
                clear_gpg_key,
            } => {
                let changes = profile::ProfileChanges {
                    email,
                    author_name: profile::FieldChange::from_flags(author_name, clear_author_name),
                    ssh_key_path: profile::FieldChange::from_flags(ssh_key, clear_ssh_key),
                    gpg_key_id: profile::FieldChange::from_flags(gpg_key, clear_gpg_key),
                };
                profile::update(ctx, &name, changes, out)
            }
            ProfileCommands::Delete { name, yes } => profile::delete(ctx, &name, yes, out, input),
            ProfileCommands::Keys => ssh::keys(ctx, out),
        },
        Commands::Map { profile, directory } => mapping::map(ctx, &profile, &directory, out),
        Commands::Unmap { directory } => mapping::unmap(ctx, &directory, out),
        Commands::Status => {
            let cwd = current_dir()?;
            mapping::status(ctx, &cwd, out)
        }
        Commands::Ssh { command } => match command {
            SshCommands::Load { profile } => ssh::load(ctx, &profile, out),
            SshCommands::Unload { profile } => ssh::unload(ctx, &profile, out),
        },
        Commands::Activate => {
            let cwd = current_dir()?;
            mapping::activate(ctx, &cwd, out)
        }
    }
}

fn current_dir() -> Result<String> {
    let dir = std::env::current_dir().context("failed to get current directory")?;
    Ok(dir.to_string_lossy().into_owned())
}

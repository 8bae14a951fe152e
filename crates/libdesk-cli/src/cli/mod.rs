//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use libdesk_core::config::{self, PromptLayout};
use libdesk_core::logging;

mod commands;

pub use commands::login::LoginCancelled;

#[derive(Parser)]
#[command(name = "libdesk")]
#[command(version = "0.1")]
#[command(about = "Library desk staff login")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in as a staff member
    Login {
        /// Prompt presentation (plain, card); defaults to the configured layout
        #[arg(long, value_name = "LAYOUT")]
        layout: Option<PromptLayout>,

        /// Pre-fill the username
        #[arg(short, long)]
        username: Option<String>,

        /// Read the password from stdin and log in without the prompt
        #[arg(long = "password-stdin")]
        password_stdin: bool,
    },

    /// Manage staff accounts
    Staff {
        #[command(subcommand)]
        command: StaffCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum StaffCommands {
    /// Add a staff account
    Add {
        #[arg(short, long)]
        username: String,

        /// Display name (defaults to the username)
        #[arg(long = "full-name", default_value = "")]
        full_name: String,

        /// Role id (1 Admin, 2 Librarian, 3 Staff, 5 Super Admin)
        #[arg(long, default_value_t = 3)]
        role: u32,

        /// Read the password from stdin
        #[arg(long = "password-stdin")]
        password_stdin: bool,
    },
    /// List staff accounts
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Clear an account lock
    Unlock {
        #[arg(value_name = "USERNAME")]
        username: String,
    },
    /// Change a password
    Passwd {
        #[arg(value_name = "USERNAME")]
        username: String,

        /// Read the password from stdin
        #[arg(long = "password-stdin")]
        password_stdin: bool,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = config::Config::load().context("load config")?;

    // The prompt owns the terminal, so logs go to a file.
    let _log_guard = match logging::init(&config::paths::logs_dir(), &config.log_level) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: file logging disabled: {e:#}");
            None
        }
    };

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(async move { dispatch(cli, config).await })
}

async fn dispatch(cli: Cli, config: config::Config) -> Result<()> {
    match cli.command {
        Commands::Login {
            layout,
            username,
            password_stdin,
        } => {
            commands::login::run(
                &config,
                commands::login::LoginOptions {
                    layout,
                    username,
                    password_stdin,
                },
            )
            .await
        }

        Commands::Staff { command } => match command {
            StaffCommands::Add {
                username,
                full_name,
                role,
                password_stdin,
            } => commands::staff::add(&config, &username, &full_name, role, password_stdin),
            StaffCommands::List { json } => commands::staff::list(&config, json),
            StaffCommands::Unlock { username } => commands::staff::unlock(&config, &username),
            StaffCommands::Passwd {
                username,
                password_stdin,
            } => commands::staff::passwd(&config, &username, password_stdin),
        },

        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}

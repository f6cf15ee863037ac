//! Kiosk storefront entry point: serves the API and manages the admin
//! allow-list from the command line.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use kiosk_access::SqliteAdminDirectory;
use kiosk_api::{
    run_storefront_server, ExecutionMode, StorefrontServerConfig, StorefrontServerState,
};
use kiosk_store::{SqliteOrderStore, SqliteSessionDirectory, DEFAULT_TELEGRAM_ADMIN_EMAIL};

#[derive(Debug, Parser)]
#[command(name = "kiosk", about = "Telegram kiosk storefront service", version)]
struct Cli {
    #[arg(
        long = "state-dir",
        env = "KIOSK_STATE_DIR",
        default_value = ".kiosk",
        help = "Directory holding the kiosk SQLite databases",
        global = true
    )]
    state_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the storefront API server.
    Serve {
        #[arg(
            long,
            env = "KIOSK_BIND",
            default_value = "127.0.0.1:8080",
            help = "Socket address the storefront API listens on"
        )]
        bind: String,

        #[arg(
            long = "execution-mode",
            env = "KIOSK_EXECUTION_MODE",
            default_value = "production",
            value_parser = parse_execution_mode,
            help = "production or development; development relaxes the tenant-id requirement on order reads"
        )]
        execution_mode: ExecutionMode,

        #[arg(
            long = "telegram-admin-email",
            env = "KIOSK_TELEGRAM_ADMIN_EMAIL",
            default_value = DEFAULT_TELEGRAM_ADMIN_EMAIL,
            help = "Sentinel account email that marks a conventional session as the Telegram admin"
        )]
        telegram_admin_email: String,
    },
    /// Manage the admin allow-list.
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
}

#[derive(Debug, Subcommand)]
enum AdminCommand {
    /// Add a Telegram user id to the allow-list.
    Add { telegram_user_id: String },
    /// Remove a Telegram user id from the allow-list.
    Remove { telegram_user_id: String },
    /// List allow-list entries.
    List,
}

fn parse_execution_mode(value: &str) -> Result<ExecutionMode, String> {
    ExecutionMode::parse(value).map_err(|error| error.to_string())
}

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn open_admin_directory(state_dir: &PathBuf) -> Result<SqliteAdminDirectory> {
    SqliteAdminDirectory::new(state_dir.join("access.sqlite"))
        .context("failed to open admin allow-list database")
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            bind,
            execution_mode,
            telegram_admin_email,
        } => {
            let admin_directory = open_admin_directory(&cli.state_dir)?;
            let order_store = SqliteOrderStore::new(cli.state_dir.join("orders.sqlite"))
                .context("failed to open order database")?;
            let session_directory =
                SqliteSessionDirectory::new(cli.state_dir.join("sessions.sqlite"))
                    .context("failed to open session database")?;

            let state = Arc::new(StorefrontServerState::new(
                StorefrontServerConfig {
                    bind,
                    execution_mode,
                    telegram_admin_email,
                },
                Arc::new(admin_directory),
                Arc::new(order_store),
                Arc::new(session_directory),
            ));
            run_storefront_server(state).await
        }
        Command::Admin { command } => {
            let directory = open_admin_directory(&cli.state_dir)?;
            match command {
                AdminCommand::Add { telegram_user_id } => {
                    directory
                        .add_admin(&telegram_user_id)
                        .with_context(|| format!("failed to add admin '{telegram_user_id}'"))?;
                    println!("added {telegram_user_id}");
                }
                AdminCommand::Remove { telegram_user_id } => {
                    let removed = directory
                        .remove_admin(&telegram_user_id)
                        .with_context(|| format!("failed to remove admin '{telegram_user_id}'"))?;
                    if removed {
                        println!("removed {telegram_user_id}");
                    } else {
                        println!("{telegram_user_id} was not on the allow-list");
                    }
                }
                AdminCommand::List => {
                    let entries = directory
                        .list_admins()
                        .context("failed to list allow-list entries")?;
                    if entries.is_empty() {
                        println!("allow-list is empty");
                    }
                    for entry in entries {
                        println!(
                            "{}\tadded {}",
                            entry.telegram_user_id,
                            entry.added_at.to_rfc3339()
                        );
                    }
                }
            }
            Ok(())
        }
    }
}

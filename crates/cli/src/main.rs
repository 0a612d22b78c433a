//! AykaSosyal CLI - Operator tooling.
//!
//! # Usage
//!
//! ```bash
//! # Create an account (e.g. the first one on a fresh deployment)
//! ayka account create -e user@example.com -n "Display Name" -p "a strong password"
//!
//! # Remove expired sessions and password reset tokens
//! ayka prune
//!
//! # Validate configuration and ping both Supabase projects
//! ayka check
//! ```
//!
//! Every command reads the same environment variables as the web binary
//! (see `ayka_web::config`), including the `.env` file if present.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ayka")]
#[command(author, version, about = "AykaSosyal operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage accounts
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Remove expired sessions and password reset tokens
    Prune,
    /// Validate configuration and check Supabase connectivity
    Check,
}

#[derive(Subcommand)]
enum AccountAction {
    /// Create a new account
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Password (min 8 characters)
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Account { action } => match action {
            AccountAction::Create {
                email,
                name,
                password,
            } => {
                commands::account::create(&email, &name, &password).await?;
            }
        },
        Commands::Prune => commands::prune::run().await?,
        Commands::Check => commands::check::run().await?,
    }
    Ok(())
}

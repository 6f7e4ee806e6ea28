//! Proofy CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! proofy-cli migrate
//!
//! # Create a user
//! proofy-cli user create -e freelancer@example.com -p "a strong password"
//!
//! # Flip a user to the premium tier (manual upgrade path)
//! proofy-cli user premium -e freelancer@example.com
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `user create` - Create a user with a password
//! - `user premium` - Mark a user's profile as premium

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "proofy-cli")]
#[command(author, version, about = "Proofy CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (at least 8 characters)
        #[arg(short, long)]
        password: String,
    },
    /// Mark a user's profile as premium
    Premium {
        /// Email address of the user to upgrade
        #[arg(short, long)]
        email: String,
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create { email, password } => {
                commands::user::create(&email, &password).await?;
            }
            UserAction::Premium { email } => {
                commands::user::set_premium(&email).await?;
            }
        },
    }
    Ok(())
}

//! Homestyle CLI - database migrations, seeding and order management.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! hs-cli migrate
//!
//! # Load the sample catalog and the demo account (skipped if data exists)
//! hs-cli seed
//!
//! # Move an order through fulfilment
//! hs-cli order-status 12 shipped
//! ```
//!
//! All commands read `STOREFRONT_DATABASE_URL` (falling back to `DATABASE_URL`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use homestyle_core::{OrderId, OrderStatus};

mod commands;

#[derive(Parser)]
#[command(name = "hs-cli")]
#[command(author, version, about = "Homestyle CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Seed the sample catalog and demo account
    Seed,
    /// Set an order's status
    OrderStatus {
        /// Order ID
        id: i32,

        /// New status (`pending`, `processing`, `shipped`, `delivered`, `cancelled`)
        status: OrderStatus,
    },
}

#[tokio::main]
async fn main() {
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
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Seed => commands::seed::sample_data().await?,
        Commands::OrderStatus { id, status } => {
            commands::orders::set_status(OrderId::new(id), status).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_order_status_parses_status() {
        let cli = Cli::try_parse_from(["hs-cli", "order-status", "3", "shipped"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::OrderStatus {
                id: 3,
                status: OrderStatus::Shipped
            })
        ));
        assert!(Cli::try_parse_from(["hs-cli", "order-status", "3", "lost"]).is_err());
    }
}

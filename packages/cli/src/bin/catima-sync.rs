use clap::{Parser, Subcommand};
use colored::*;
use std::process;

mod cli;

use catima_cli::{init_tracing, run_server, Backend, Config};
use cli::cards::CardsCommands;
use cli::tokens::TokensCommands;
use cli::users::UsersCommands;

#[derive(Parser)]
#[command(name = "catima-sync")]
#[command(about = "Catima Sync - loyalty card sync server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the sync API server
    Serve {
        /// Address to listen on (overrides CATIMA_HOST)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides PORT)
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
        port: Option<u16>,
    },
    /// Manage user accounts
    #[command(subcommand)]
    Users(UsersCommands),
    /// Manage device tokens
    #[command(subcommand)]
    Tokens(TokensCommands),
    /// Inspect, export and import loyalty cards
    #[command(subcommand)]
    Cards(CardsCommands),
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = handle_command(cli.command).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(command: Commands) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;

    match command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            run_server(config).await
        }
        Commands::Users(cmd) => {
            let backend = Backend::open(&config).await?;
            cli::users::handle_users_command(&backend, cmd).await
        }
        Commands::Tokens(cmd) => {
            let backend = Backend::open(&config).await?;
            cli::tokens::handle_tokens_command(&backend, cmd).await
        }
        Commands::Cards(cmd) => {
            let backend = Backend::open(&config).await?;
            cli::cards::handle_cards_command(&backend, cmd).await
        }
    }
}

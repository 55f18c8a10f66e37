use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use clap::Subcommand;
use colored::*;
use serde_json::Value;
use uuid::Uuid;

use catima_cli::cards_io::{export_cards, parse_import};
use catima_cli::Backend;

use super::utils::{new_table, require_user, truncate};

#[derive(Subcommand)]
pub enum CardsCommands {
    /// List a user's cards
    List {
        #[arg(short, long)]
        user: String,
    },
    /// Print cards as wire-format JSON
    Export {
        #[arg(short, long)]
        user: String,
        /// Export a single card
        #[arg(long)]
        uuid: Option<Uuid>,
    },
    /// Import cards from a JSON file (one wire map or an array of them)
    Import {
        #[arg(short, long)]
        user: String,
        file: PathBuf,
    },
}

pub async fn handle_cards_command(backend: &Backend, command: CardsCommands) -> anyhow::Result<()> {
    match command {
        CardsCommands::List { user } => list_cards(backend, &user).await,
        CardsCommands::Export { user, uuid } => export(backend, &user, uuid).await,
        CardsCommands::Import { user, file } => import(backend, &user, &file).await,
    }
}

async fn list_cards(backend: &Backend, username: &str) -> anyhow::Result<()> {
    let user = require_user(backend, username).await?;
    let cards = backend.cards.list_cards(user.id).await?;

    if cards.is_empty() {
        println!("{}", format!("No cards for {}", user.username).yellow());
        return Ok(());
    }

    let mut table = new_table();
    table.set_header(vec!["UUID", "Store", "Card ID", "Barcode", "Balance", "Revision"]);
    for card in &cards {
        table.add_row(vec![
            card.uuid.to_string(),
            truncate(&card.store, 25),
            truncate(&card.card_id, 20),
            card.barcode_type.label().to_string(),
            format!("{} {}", card.balance, card.balance_currency),
            card.revision_id.to_string(),
        ]);
    }

    println!("{}", table);
    println!("Total: {} cards", cards.len().to_string().cyan());
    Ok(())
}

/// A single card prints as one object, otherwise as an array
async fn export(backend: &Backend, username: &str, uuid: Option<Uuid>) -> anyhow::Result<()> {
    let user = require_user(backend, username).await?;

    let cards = match uuid {
        Some(uuid) => {
            let card = backend
                .cards
                .get_card(user.id, uuid)
                .await?
                .ok_or_else(|| anyhow!("Card {} not found", uuid))?;
            vec![card]
        }
        None => backend.cards.list_cards(user.id).await?,
    };

    let exported = match export_cards(&cards)? {
        Value::Array(mut items) if uuid.is_some() && items.len() == 1 => items.remove(0),
        all => all,
    };

    println!("{}", serde_json::to_string_pretty(&exported)?);
    Ok(())
}

async fn import(backend: &Backend, username: &str, file: &Path) -> anyhow::Result<()> {
    let user = require_user(backend, username).await?;
    let text = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let cards = parse_import(&text)?;
    backend
        .cards
        .insert_cards(user.id, &cards)
        .await
        .with_context(|| format!("Failed to import {}, no cards were saved", file.display()))?;

    println!(
        "{} Imported {} cards for {}",
        "✓".green(),
        cards.len().to_string().cyan(),
        user.username.cyan()
    );
    Ok(())
}

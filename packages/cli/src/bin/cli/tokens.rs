use anyhow::bail;
use clap::Subcommand;
use colored::*;

use catima_cli::Backend;

use super::utils::{format_timestamp, new_table, require_user};

#[derive(Subcommand)]
pub enum TokensCommands {
    /// Issue a token for a device; the secret is shown only once
    Create {
        /// Owning user
        #[arg(short, long)]
        user: String,
        /// Device label
        #[arg(short, long)]
        device: Option<String>,
        /// Token name (generated when omitted)
        #[arg(short, long)]
        name: Option<String>,
        /// Token secret (generated when omitted)
        #[arg(short, long)]
        secret: Option<String>,
    },
    /// List a user's tokens
    List {
        #[arg(short, long)]
        user: String,
    },
    /// Delete a token
    Revoke {
        /// Token name
        name: String,
    },
}

pub async fn handle_tokens_command(
    backend: &Backend,
    command: TokensCommands,
) -> anyhow::Result<()> {
    match command {
        TokensCommands::Create {
            user,
            device,
            name,
            secret,
        } => {
            create_token(
                backend,
                &user,
                device.as_deref(),
                name.as_deref(),
                secret.as_deref(),
            )
            .await
        }
        TokensCommands::List { user } => list_tokens(backend, &user).await,
        TokensCommands::Revoke { name } => revoke_token(backend, &name).await,
    }
}

async fn create_token(
    backend: &Backend,
    username: &str,
    device: Option<&str>,
    name: Option<&str>,
    secret: Option<&str>,
) -> anyhow::Result<()> {
    let user = require_user(backend, username).await?;
    let issued = backend
        .authenticator
        .issue(user.id, device, name, secret)
        .await?;

    println!("{} Token created for {}", "✓".green(), user.username.cyan());
    println!();
    println!("  {}  {}", "X-Token-Username:".bold(), issued.token.token_name);
    println!("  {}    {}", "X-Token-Secret:".bold(), issued.secret);
    println!();
    println!(
        "{}",
        "Store the secret now, it cannot be shown again.".yellow()
    );
    Ok(())
}

async fn list_tokens(backend: &Backend, username: &str) -> anyhow::Result<()> {
    let user = require_user(backend, username).await?;
    let tokens = backend
        .authenticator
        .store()
        .list_tokens_for_user(user.id)
        .await?;

    if tokens.is_empty() {
        println!("{}", format!("No tokens for {}", user.username).yellow());
        return Ok(());
    }

    let mut table = new_table();
    table.set_header(vec!["Name", "Device", "Last used"]);
    for token in &tokens {
        table.add_row(vec![
            token.token_name.clone(),
            token.device_name.clone().unwrap_or_else(|| "—".to_string()),
            format_timestamp(token.last_used),
        ]);
    }

    println!("{}", table);
    println!("Total: {} tokens", tokens.len().to_string().cyan());
    Ok(())
}

async fn revoke_token(backend: &Backend, name: &str) -> anyhow::Result<()> {
    if !backend.authenticator.store().delete_token(name).await? {
        bail!("Token '{}' not found", name);
    }

    println!("{} Revoked token {}", "✓".green(), name.cyan());
    Ok(())
}

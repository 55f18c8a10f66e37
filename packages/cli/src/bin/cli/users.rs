use clap::Subcommand;
use colored::*;

use catima_cli::Backend;

use super::utils::{format_timestamp, new_table};

#[derive(Subcommand)]
pub enum UsersCommands {
    /// Create a user
    Create {
        /// Unique username
        username: String,
    },
    /// List all users
    List,
}

pub async fn handle_users_command(backend: &Backend, command: UsersCommands) -> anyhow::Result<()> {
    match command {
        UsersCommands::Create { username } => create_user(backend, &username).await,
        UsersCommands::List => list_users(backend).await,
    }
}

async fn create_user(backend: &Backend, username: &str) -> anyhow::Result<()> {
    let user = backend.users.create_user(username).await?;

    println!(
        "{} Created user {} (id {})",
        "✓".green(),
        user.username.cyan(),
        user.id
    );
    Ok(())
}

async fn list_users(backend: &Backend) -> anyhow::Result<()> {
    let users = backend.users.list_users().await?;

    if users.is_empty() {
        println!("{}", "No users found".yellow());
        println!(
            "{}",
            "Use 'catima-sync users create <username>' to add one".dimmed()
        );
        return Ok(());
    }

    let mut table = new_table();
    table.set_header(vec!["ID", "Username", "Created"]);
    for user in &users {
        table.add_row(vec![
            user.id.to_string(),
            user.username.clone(),
            format_timestamp(Some(user.created_at)),
        ]);
    }

    println!("{}", table);
    println!("Total: {} users", users.len().to_string().cyan());
    Ok(())
}

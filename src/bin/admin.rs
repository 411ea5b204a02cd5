//! CLI administration tool for the marketplace.
//!
//! Provides commands for managing accounts and API tokens, viewing statistics,
//! and performing database operations without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # Create an account and promote it
//! cargo run --bin admin -- user create --name "Jane" --email jane@example.com
//! cargo run --bin admin -- user role jane@example.com SELLER
//!
//! # Issue a token for it
//! cargo run --bin admin -- token create --user jane@example.com
//!
//! # List and revoke tokens
//! cargo run --bin admin -- token list
//! cargo run --bin admin -- token revoke 3
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `TOKEN_SIGNING_SECRET` (required for `token create`): must match the server's

use marketplace::application::services::AuthService;
use marketplace::domain::entities::{NewUser, Role, User};
use marketplace::domain::repositories::{TokenRepository, UserRepository};
use marketplace::infrastructure::persistence::{PgTokenRepository, PgUserRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing the marketplace.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create an account
    Create {
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        /// USER, SELLER or ADMIN
        #[arg(short, long, default_value = "USER")]
        role: Role,
    },

    /// List all accounts
    List,

    /// Change the role of an account
    Role {
        /// Account email or ID
        user: String,

        /// USER, SELLER or ADMIN
        role: Role,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Issue a new API token for an account
    Create {
        /// Account email or ID
        #[arg(short, long)]
        user: String,

        /// Token name (e.g., "Laptop", "Mobile App")
        #[arg(short, long)]
        name: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List tokens, optionally of one account
    List {
        /// Account email or ID
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Revoke a token
    Revoke {
        /// Token ID
        id: i64,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Token { action } => handle_token_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Resolves a numeric ID or an email to an account.
async fn find_user(users: &dyn UserRepository, user: &str) -> Result<User> {
    let found = match user.parse::<i64>() {
        Ok(id) => users.find_by_id(id).await?,
        Err(_) => users.find_by_email(&user.trim().to_lowercase()).await?,
    };

    found.with_context(|| format!("User '{user}' not found"))
}

async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let users = PgUserRepository::new(Arc::new(pool.clone()));

    match action {
        UserAction::Create { name, email, role } => create_user(&users, name, email, role).await,
        UserAction::List => list_users(&users).await,
        UserAction::Role { user, role } => {
            let user = find_user(&users, &user).await?;
            let updated = users.update_role(user.id, role).await?;

            println!(
                "{} {} is now {}",
                "Updated:".green().bold(),
                updated.email.cyan(),
                updated.role.to_string().bright_yellow()
            );
            Ok(())
        }
    }
}

async fn create_user(
    users: &PgUserRepository,
    name: Option<String>,
    email: Option<String>,
    role: Role,
) -> Result<()> {
    println!("{}", "Create account".bright_blue().bold());
    println!();

    let name = match name {
        Some(n) => n,
        None => Input::new().with_prompt("Name").interact_text()?,
    };
    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };

    let user = users
        .create(NewUser {
            name: name.trim().to_string(),
            email: email.trim().to_lowercase(),
            picture: None,
            role,
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

    println!("{}", "Account created".green().bold());
    println!("  ID:    {}", user.id.to_string().bright_white());
    println!("  Email: {}", user.email.cyan());
    println!("  Role:  {}", user.role.to_string().bright_yellow());
    println!();
    println!(
        "  Issue a token with: {} admin -- token create --user {}",
        "cargo run --bin".bright_cyan(),
        user.email
    );

    Ok(())
}

async fn list_users(users: &PgUserRepository) -> Result<()> {
    let all = users.list().await?;

    if all.is_empty() {
        println!("{}", "  No users found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<30} {:<30} {:<8}",
        "ID".bright_white().bold(),
        "Email".bright_white().bold(),
        "Name".bright_white().bold(),
        "Role".bright_white().bold()
    );
    println!("  {}", "-".repeat(75).bright_black());

    for user in &all {
        let role = match user.role {
            Role::Admin => user.role.to_string().red(),
            Role::Seller => user.role.to_string().yellow(),
            Role::User => user.role.to_string().normal(),
        };

        println!(
            "  {:<5} {:<30} {:<30} {}",
            user.id.to_string().bright_black(),
            user.email.cyan(),
            user.name,
            role
        );
    }

    println!();
    println!("  Total: {}", all.len().to_string().bright_white().bold());

    Ok(())
}

async fn handle_token_action(action: TokenAction, pool: &PgPool) -> Result<()> {
    let pool = Arc::new(pool.clone());
    let tokens = Arc::new(PgTokenRepository::new(pool.clone()));
    let users = PgUserRepository::new(pool);

    match action {
        TokenAction::Create { user, name, yes } => {
            let user = find_user(&users, &user).await?;
            create_token(tokens, user, name, yes).await
        }
        TokenAction::List { user } => {
            let user_id = match user {
                Some(u) => Some(find_user(&users, &u).await?.id),
                None => None,
            };
            list_tokens(tokens.as_ref(), user_id).await
        }
        TokenAction::Revoke { id } => revoke_token(tokens.as_ref(), id).await,
    }
}

/// Issues a token through [`AuthService`] so it is hashed with the same
/// secret the server verifies against.
///
/// The raw token is displayed once and cannot be retrieved later.
async fn create_token(
    tokens: Arc<PgTokenRepository>,
    user: User,
    name: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    let secret = std::env::var("TOKEN_SIGNING_SECRET")
        .context("TOKEN_SIGNING_SECRET must be set to issue tokens")?;

    println!("{}", "Create API token".bright_blue().bold());
    println!();

    let token_name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Token name")
            .with_initial_text("Default")
            .interact_text()?,
    };

    println!("  User:  {} ({})", user.email.cyan(), user.role);
    println!("  Name:  {}", token_name.cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this token?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    let auth = AuthService::new(tokens, secret);
    let (raw, token) = auth
        .issue_token(user.id, &token_name)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create token: {}", e))?;

    println!();
    println!(
        "{} (id {})",
        "Token created".green().bold(),
        token.id.to_string().bright_white()
    );
    println!("  Token: {}", raw.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "IMPORTANT: Save this token now! You won't be able to see it again."
            .red()
            .bold()
    );
    println!();
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/me",
        raw.bright_yellow()
    );

    Ok(())
}

async fn list_tokens(tokens: &PgTokenRepository, user_id: Option<i64>) -> Result<()> {
    let all = tokens
        .list_tokens(user_id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tokens: {}", e))?;

    if all.is_empty() {
        println!("{}", "  No tokens found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<7} {:<24} {:<18} {:<18} {:<8}",
        "ID".bright_white().bold(),
        "User".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold(),
        "Last used".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "-".repeat(85).bright_black());

    for token in &all {
        let status = if token.revoked_at.is_some() {
            "REVOKED".red()
        } else {
            "ACTIVE".green()
        };
        let last_used = token
            .last_used_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());

        println!(
            "  {:<5} {:<7} {:<24} {:<18} {:<18} {}",
            token.id.to_string().bright_black(),
            token.user_id,
            token.name.cyan(),
            token.created_at.format("%Y-%m-%d %H:%M"),
            last_used,
            status
        );
    }

    println!();
    println!("  Total: {}", all.len().to_string().bright_white().bold());

    Ok(())
}

async fn revoke_token(tokens: &PgTokenRepository, id: i64) -> Result<()> {
    let token = tokens
        .find_by_id(id)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Token not found")?;

    if token.revoked_at.is_some() {
        println!("{}", "This token is already revoked".yellow());
        return Ok(());
    }

    println!("  Token: {}", token.name.cyan());
    println!("  User:  {}", token.user_id);
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Revoke this token?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "Cancelled".red());
        return Ok(());
    }

    tokens
        .revoke_token(token.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke token: {}", e))?;

    println!("{}", "Token revoked".green().bold());

    Ok(())
}

/// Displays marketplace totals.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let count = |sql: &'static str| async move {
        sqlx::query_scalar::<_, i64>(sql).fetch_one(pool).await
    };

    let users = count("SELECT COUNT(*) FROM users").await?;
    let stores = count("SELECT COUNT(*) FROM stores").await?;
    let pending_stores = count("SELECT COUNT(*) FROM stores WHERE status = 'PENDING'").await?;
    let products = count("SELECT COUNT(*) FROM products").await?;
    let orders = count("SELECT COUNT(*) FROM orders").await?;
    let tokens = count("SELECT COUNT(*) FROM auth_tokens WHERE revoked_at IS NULL").await?;

    let revenue: Decimal = sqlx::query_scalar(
        "SELECT COALESCE(SUM(total), 0) FROM orders WHERE payment_status = 'PAID'",
    )
    .fetch_one(pool)
    .await?;

    println!("  Users:          {}", users.to_string().bright_green().bold());
    println!(
        "  Stores:         {} ({} pending)",
        stores.to_string().bright_green().bold(),
        pending_stores
    );
    println!("  Products:       {}", products.to_string().bright_green().bold());
    println!("  Orders:         {}", orders.to_string().bright_green().bold());
    println!("  Paid revenue:   {}", revenue.to_string().bright_green().bold());
    println!("  Active tokens:  {}", tokens.to_string().bright_green().bold());
    println!();

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            let countries: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM countries")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Countries:  {}", countries);
            println!();
        }
    }

    Ok(())
}

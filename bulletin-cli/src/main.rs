// Bulletin - A small multi-user publishing platform built with Rust
// Copyright (C) 2025 Bulletin Project Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use anyhow::{anyhow, Context, Result};
use bulletin_core::models::{category::Category, user::User};
use bulletin_db::repositories::{CategoryRepository, UserRepository};
use clap::{Parser, Subcommand};
use sqlx::SqlitePool;
use std::io::Write;

#[derive(Parser)]
#[command(name = "bulletin")]
#[command(about = "Bulletin CLI tool for database, user and category management")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database (create tables)
    Init,

    /// User management commands
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Category management commands
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a new user
    Create {
        /// Username
        username: String,
        /// Make user an admin
        #[arg(long)]
        admin: bool,
        /// Password (will prompt if not provided)
        #[arg(long)]
        password: Option<String>,
    },

    /// Change user password
    Password {
        username: String,
        /// New password (will prompt if not provided)
        #[arg(long)]
        password: Option<String>,
    },

    /// Grant admin rights, or take them away with --revoke
    Admin {
        username: String,
        #[arg(long)]
        revoke: bool,
    },

    /// List all users
    List,
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// Add a category articles can be filed under
    Add { name: String },

    /// List all categories
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:bulletin.db".to_string());

    match cli.command {
        Commands::Init => init_database(&database_url).await,
        Commands::User { command } => {
            let pool = bulletin_db::init_database(&database_url).await?;
            handle_user_command(command, pool).await
        }
        Commands::Category { command } => {
            let pool = bulletin_db::init_database(&database_url).await?;
            handle_category_command(command, pool).await
        }
    }
}

async fn init_database(database_url: &str) -> Result<()> {
    println!("Initializing database at: {}", database_url);
    let _pool = bulletin_db::init_database(database_url).await?;
    println!("Database initialized successfully!");
    Ok(())
}

fn read_password(given: Option<String>) -> Result<String> {
    let password = match given {
        Some(pwd) => pwd,
        None => {
            print!("Password: ");
            std::io::stdout().flush()?;
            rpassword::read_password().context("Failed to read password")?
        }
    };

    if password.is_empty() {
        anyhow::bail!("Password cannot be empty");
    }
    Ok(password)
}

async fn find_user(user_repo: &UserRepository, username: &str) -> Result<User> {
    user_repo
        .find_by_username(username)
        .await?
        .ok_or_else(|| anyhow!("User not found: {}", username))
}

async fn handle_user_command(command: UserCommands, pool: SqlitePool) -> Result<()> {
    let user_repo = UserRepository::new(pool);

    match command {
        UserCommands::Create {
            username,
            admin,
            password,
        } => {
            println!("Creating user: {}", username);

            if user_repo.username_exists(&username).await? {
                anyhow::bail!("Username is already taken: {}", username);
            }

            let password = read_password(password)?;
            let mut user = User::new(username, &password)?;
            user.is_admin = admin;

            let user_id = user_repo
                .create(&user)
                .await
                .context("Failed to create user")?;

            println!("User created successfully with ID: {}", user_id);
            if admin {
                println!("User has admin privileges");
            }
            Ok(())
        }

        UserCommands::Password { username, password } => {
            println!("Changing password for {}", username);

            let mut user = find_user(&user_repo, &username).await?;
            let password = read_password(password)?;
            user.set_password(&password)?;
            user_repo.update(&user).await?;

            println!("Password changed successfully!");
            Ok(())
        }

        UserCommands::Admin { username, revoke } => {
            let mut user = find_user(&user_repo, &username).await?;
            user.is_admin = !revoke;
            user_repo.update(&user).await?;

            if revoke {
                println!("Admin privileges revoked from {}", username);
            } else {
                println!("Admin privileges granted to {}", username);
            }
            Ok(())
        }

        UserCommands::List => {
            let users = user_repo.list().await?;
            if users.is_empty() {
                println!("No users found.");
            }
            for user in users {
                println!(
                    "{:>5}  {:<30} {}{}",
                    user.id.unwrap_or_default(),
                    user.username,
                    user.created_at.format("%Y-%m-%d"),
                    if user.is_admin { "  [admin]" } else { "" }
                );
            }
            Ok(())
        }
    }
}

async fn handle_category_command(command: CategoryCommands, pool: SqlitePool) -> Result<()> {
    let category_repo = CategoryRepository::new(pool);

    match command {
        CategoryCommands::Add { name } => {
            let category = Category::new(name);
            if category_repo.find_by_name(&category.name).await?.is_some() {
                anyhow::bail!("Category already exists: {}", category.name);
            }

            let id = category_repo.create(&category).await?;
            println!("Category '{}' created with ID: {}", category.name, id);
            Ok(())
        }

        CategoryCommands::List => {
            let categories = category_repo.list().await?;
            if categories.is_empty() {
                println!("No categories found.");
            }
            for category in categories {
                println!("{:>5}  {}", category.id.unwrap_or_default(), category.name);
            }
            Ok(())
        }
    }
}

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use datalens::{
    config::JwtSettings,
    db,
    repositories::{SqliteUserRepository, UserRepository},
    services::{user_service::CreateUserRequest, TokenService, UserService},
};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "datalens-cli")]
#[command(about = "CLI tool for managing datalens accounts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User management commands
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Access token commands
    Token {
        #[command(subcommand)]
        command: TokenCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a new user
    Create {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Show a single user
    Show {
        #[arg(long)]
        id: i64,
    },

    /// List all users
    List {
        /// Maximum number of users to display
        #[arg(short, long, default_value_t = 100)]
        limit: i64,

        /// Offset for pagination
        #[arg(short = 'o', long, default_value_t = 0)]
        offset: i64,
    },
}

#[derive(Subcommand)]
enum TokenCommands {
    /// Issue an access token for an existing user
    Issue {
        #[arg(short, long)]
        email: String,
    },
}

fn get_password(prompt: &str) -> anyhow::Result<String> {
    use std::io::{self, Write};
    print!("{}: ", prompt);
    io::stdout().flush()?;

    Ok(rpassword::read_password()?)
}

fn prompt_new_password() -> anyhow::Result<String> {
    let password = get_password("Password")?;
    let confirm = get_password("Confirm password")?;
    if password != confirm {
        bail!("Passwords do not match");
    }
    Ok(password)
}

async fn connect() -> anyhow::Result<SqlitePool> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = db::create_pool(&database_url)
        .await
        .with_context(|| format!("Failed to open database at {database_url}"))?;
    db::run_migrations(&pool).await?;
    Ok(pool)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    let pool = connect().await?;
    let user_repository: Arc<dyn UserRepository> = Arc::new(SqliteUserRepository::new(pool));
    let user_service = UserService::new(user_repository);

    match cli.command {
        Commands::User { command } => match command {
            UserCommands::Create {
                first_name,
                last_name,
                email,
                password,
            } => {
                let password = match password {
                    Some(pw) => pw,
                    None => prompt_new_password()?,
                };

                let user = user_service
                    .create_user(CreateUserRequest {
                        first_name,
                        last_name,
                        email,
                        password,
                    })
                    .await
                    .context("Failed to create user")?;

                println!("✅ User created successfully!");
                println!("  ID: {}", user.id);
                println!("  Name: {} {}", user.first_name, user.last_name);
                println!("  Email: {}", user.email);
            }

            UserCommands::Show { id } => {
                let user = user_service
                    .get_user(id)
                    .await
                    .with_context(|| format!("Failed to load user {id}"))?;

                println!("  ID: {}", user.id);
                println!("  Name: {} {}", user.first_name, user.last_name);
                println!("  Email: {}", user.email);
                println!(
                    "  Created: {}",
                    user.created_at.as_deref().unwrap_or("N/A")
                );
            }

            UserCommands::List { limit, offset } => {
                let users = user_service
                    .list_users(Some(limit), Some(offset))
                    .await
                    .context("Failed to list users")?;

                if users.is_empty() {
                    println!("No users found.");
                } else {
                    println!(
                        "{:<5} {:<40} {:<30} {:<20}",
                        "ID", "Email", "Name", "Created"
                    );
                    println!("{}", "-".repeat(95));
                    for user in users {
                        println!(
                            "{:<5} {:<40} {:<30} {:<20}",
                            user.id,
                            user.email,
                            format!("{} {}", user.first_name, user.last_name),
                            user.created_at.as_deref().unwrap_or("N/A")
                        );
                    }
                }
            }
        },

        Commands::Token { command } => match command {
            TokenCommands::Issue { email } => {
                let jwt = JwtSettings::from_env()?;
                let tokens = TokenService::new(&jwt);

                let Some(user) = user_service.find_user_by_email(&email).await? else {
                    bail!("User '{}' not found", email);
                };

                let token = tokens.issue(user.id)?;
                println!("{}", token);
            }
        },
    }

    Ok(())
}

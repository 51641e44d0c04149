//! transitdesk CLI entry point.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use transitdesk::config::Config;
use transitdesk::routing::{self, Decision};
use transitdesk::session::{
    CredentialStore, HttpAuthService, LoginRequest, RegisterRequest, SessionManager,
};

#[derive(Parser)]
#[command(name = "transitdesk", version, about = "City transit complaint service client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and persist the session on this device
    Login {
        /// Account email
        email: String,
    },
    /// Create a new account
    Register {
        /// Display name
        name: String,
        /// Account email
        email: String,
    },
    /// Drop the session on this device
    Logout,
    /// Show who is logged in on this device
    Status,
    /// Resolve an app path against the current session
    Open {
        /// Route path, e.g. /admin/dashboard
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    let store = CredentialStore::open(&config.session_db_path())?;
    let service = Arc::new(HttpAuthService::new(&config.api_url)?);
    let mut session = SessionManager::new(store, service.clone());
    session.init()?;

    match cli.command {
        Command::Login { email } => {
            let password = prompt_password()?;
            let request = LoginRequest { email, password };
            match session.login(&request).await {
                Ok(success) => {
                    println!("Logged in as {} ({})", success.user.name, success.user.email);
                    if session.is_admin() {
                        println!("This account has admin access.");
                    }
                }
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(1);
                }
            }
        }
        Command::Register { name, email } => {
            let password = prompt_password()?;
            let request = RegisterRequest {
                name,
                email,
                password,
            };
            match service.register(&request).await {
                Ok(message) => println!("{message}"),
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(1);
                }
            }
        }
        Command::Logout => {
            session.logout();
            println!("Logged out.");
        }
        Command::Status => match session.identity() {
            Some(identity) => {
                let role = if session.is_admin() { "admin" } else { "user" };
                println!("Logged in as {identity} ({role})");
            }
            None => println!("Not logged in."),
        },
        Command::Open { path } => match routing::resolve(&path, &session.snapshot()) {
            Some((route, Decision::Render)) => println!("{}: rendering", route.title),
            Some((route, Decision::RedirectTo(target))) => {
                println!("{}: redirected to {target}", route.title);
            }
            None => {
                eprintln!("No such route: {path}");
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

fn prompt_password() -> Result<String> {
    Ok(dialoguer::Password::new()
        .with_prompt("Password")
        .interact()?)
}

//! Auth command - sign in to the spreadsheet API and manage the cached token.

use std::path::PathBuf;

use chrono::Utc;
use clap::{Args, Subcommand};
use console::style;

use orderlog_sheets::{InstalledAppFlow, TokenStore, SPREADSHEETS_SCOPE};

use super::load_config;

/// Arguments for the auth command.
#[derive(Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    command: AuthCommand,
}

#[derive(Subcommand)]
enum AuthCommand {
    /// Sign in through the browser and cache the token
    Login {
        /// OAuth client secrets file (default: sheets.credentials_file)
        #[arg(long)]
        credentials: Option<PathBuf>,
    },

    /// Show whether a token is cached and when it expires
    Status,

    /// Delete the cached token
    Logout,
}

pub async fn run(args: AuthArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let store = TokenStore::new(&config.sheets.token_file);

    match args.command {
        AuthCommand::Login { credentials } => {
            let credentials = credentials.unwrap_or(config.sheets.credentials_file);
            login(&store, credentials).await
        }
        AuthCommand::Status => status(&store),
        AuthCommand::Logout => logout(&store),
    }
}

async fn login(store: &TokenStore, credentials: PathBuf) -> anyhow::Result<()> {
    if !credentials.exists() {
        anyhow::bail!(
            "Client secrets not found at {}. Download the OAuth client JSON and pass --credentials.",
            credentials.display()
        );
    }

    let flow = InstalledAppFlow::from_client_secrets_file(
        &credentials,
        vec![SPREADSHEETS_SCOPE.to_string()],
    )?;

    let token = flow
        .run_local_server(|url| {
            println!("Open this URL in your browser to authorize orderlog:");
            println!();
            println!("  {}", url);
            println!();
        })
        .await?;

    store.save(&token)?;

    println!(
        "{} Signed in; token saved to {}",
        style("✓").green(),
        store.path().display()
    );

    Ok(())
}

fn status(store: &TokenStore) -> anyhow::Result<()> {
    println!("Token file: {}", store.path().display());

    let Some(token) = store.load()? else {
        println!("Status: {}", style("not signed in").yellow());
        println!();
        println!("Run 'orderlog auth login' to sign in.");
        return Ok(());
    };

    match token.expiry {
        Some(expiry) if token.is_expired() => {
            println!("Status: {} (expired {})", style("expired").yellow(), expiry);
        }
        Some(expiry) => {
            let minutes = (expiry - Utc::now()).num_minutes();
            println!(
                "Status: {} (expires {}, in {} min)",
                style("signed in").green(),
                expiry,
                minutes
            );
        }
        None => println!("Status: {}", style("signed in").green()),
    }

    println!(
        "Refresh token: {}",
        if token.can_refresh() { "present" } else { "missing" }
    );

    Ok(())
}

fn logout(store: &TokenStore) -> anyhow::Result<()> {
    if store.delete()? {
        println!("{} Removed {}", style("✓").green(), store.path().display());
    } else {
        println!("No cached token at {}", store.path().display());
    }
    Ok(())
}

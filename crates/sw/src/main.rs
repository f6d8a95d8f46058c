//! Command line client for the sessionward session middleware.

use std::sync::Arc;

use clap::{CommandFactory, Parser};
use color_eyre::eyre::{Result, eyre};
use sessionward_core::{
    ClientSettings, Navigator, SessionClient, SessionGuard, SessionStatus,
    http::InMemoryCookieStore,
};
use tracing_subscriber::{
    EnvFilter, prelude::__tracing_subscriber_SubscriberExt as _, util::SubscriberInitExt as _,
};

use crate::command::{Cli, Commands};

mod command;

/// A terminal has nowhere to navigate to, so the redirect is reported instead.
struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn redirect(&self, path: &str) {
        eprintln!("Session lost, sign in again ({path})");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // the log level hierarchy is determined by:
    //    - if RUST_LOG is detected at runtime
    //    - if RUST_LOG is provided at compile time
    //    - default to WARN
    let filter = EnvFilter::builder()
        .with_default_directive(
            option_env!("RUST_LOG")
                .unwrap_or("warn")
                .parse()
                .expect("should provide valid log level at compile time."),
        )
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    color_eyre::install()?;

    let cli = Cli::parse();

    let Some(command) = cli.command.clone() else {
        let mut cmd = Cli::command();
        cmd.print_help()?;
        return Ok(());
    };

    let client = build_client(&cli)?;
    process_command(command, client).await
}

fn build_client(cli: &Cli) -> Result<SessionClient> {
    let mut settings = ClientSettings::from_env();
    if let Some(base_url) = &cli.base_url {
        settings.base_url = base_url.clone();
    }

    let cookies = InMemoryCookieStore::from_cookie_header(&cli.cookies)?;

    Ok(SessionClient::new(
        Some(settings),
        Arc::new(cookies),
        Arc::new(TerminalNavigator),
    ))
}

async fn process_command(command: Commands, client: SessionClient) -> Result<()> {
    match command {
        Commands::Token => {
            let token = client
                .get_auth_token()
                .await
                .ok_or_else(|| eyre!("Could not obtain an auth token"))?;
            println!("{token}");
        }
        Commands::Check => {
            let guard = SessionGuard::new(client);
            match guard.activate().await {
                SessionStatus::Authenticated => println!("authenticated"),
                status => return Err(eyre!("Session check ended as {status:?}")),
            }
        }
        Commands::Get { path } => {
            let response = client.http_client().get(client.url(&path)).send().await?;
            let status = response.status();
            let body = response.text().await?;
            println!("{body}");
            if !status.is_success() {
                return Err(eyre!("Request failed with status {status}"));
            }
        }
        Commands::Refresh => {
            let token = client.refresh_coordinator().refresh().await?;
            println!("{token}");
        }
    }

    Ok(())
}

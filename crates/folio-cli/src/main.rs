//! `folio` CLI: command-line admin for a Folio portfolio server.
//!
//! Talks to the server exclusively through `folio-client`. Commands that
//! change the portfolio log in first, load the current document, and send
//! one full replacement.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use folio_client::{ClientConfig, PortfolioClient, PortfolioSession, ProbeReport};
use folio_core::document::PortfolioDocument;

// ── ANSI color helpers ───────────────────────────────────────────────

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";

// ── CLI structure ────────────────────────────────────────────────────

/// Folio: portfolio content admin.
#[derive(Parser)]
#[command(
    name = "folio",
    version,
    about = "Folio CLI: fetch, export and edit your portfolio content",
    long_about = None,
    after_help = format!(
        "{DIM}Environment variables:{RESET}\n  \
         FOLIO_URL              Server address (default: http://127.0.0.1:3000)\n  \
         FOLIO_ADMIN_PASSWORD   Admin password for commands that write\n\n\
         {DIM}Examples:{RESET}\n  \
         folio fetch\n  \
         folio export --output portfolio.json\n  \
         folio save portfolio.json --password admin123\n  \
         folio set-password n3w-pass n3w-pass"
    ),
)]
struct Cli {
    /// Folio server address.
    #[arg(long, env = "FOLIO_URL", default_value = "http://127.0.0.1:3000")]
    url: String,

    /// Admin password.
    #[arg(long, global = true, env = "FOLIO_ADMIN_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the stored portfolio document.
    Fetch,
    /// Check the admin password against the server.
    Login,
    /// Replace the stored portfolio with the contents of a JSON file.
    Save {
        /// Path to a portfolio JSON file.
        file: PathBuf,
    },
    /// Export the current portfolio (stored sections over defaults) as JSON.
    Export {
        /// Write to this file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Replace the stored portfolio with the built-in defaults.
    Reset,
    /// Change the admin password.
    SetPassword {
        /// New password (at least 4 characters).
        new_password: String,
        /// The new password again.
        confirmation: String,
    },
    /// Set the contact form relay access key.
    SetFormKey {
        /// Access key.
        key: String,
    },
    /// Show server configuration and store connectivity diagnostics.
    Probe,
}

// ── Pretty output helpers ────────────────────────────────────────────

fn header(icon: &str, title: &str) {
    println!("{BOLD}{CYAN}{icon} {title}{RESET}");
    println!("{DIM}─────────────────────────────────────────{RESET}");
}

fn kv_line(key: &str, value: &str) {
    println!("  {DIM}{key:<20}{RESET} {WHITE}{value}{RESET}");
}

fn success(msg: &str) {
    println!("{GREEN}{BOLD}✓{RESET} {msg}");
}

fn warning(msg: &str) {
    println!("{YELLOW}{BOLD}⚠{RESET} {YELLOW}{msg}{RESET}");
}

fn yes_no(value: bool) -> String {
    if value {
        format!("{GREEN}yes{RESET}")
    } else {
        format!("{RED}no{RESET}")
    }
}

fn status_color(value: &str) -> String {
    if value.starts_with("SUCCESS") || value.starts_with("EXISTS") {
        format!("{GREEN}{value}{RESET}")
    } else if value.starts_with("FAILED") {
        format!("{RED}{value}{RESET}")
    } else {
        format!("{YELLOW}{value}{RESET}")
    }
}

// ── Entry point ──────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!();
            eprintln!("  {RED}{BOLD}✗ Error:{RESET} {e:#}");
            eprintln!();
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let client = PortfolioClient::with_config(&ClientConfig {
        base_url: cli.url,
        ..ClientConfig::default()
    })
    .context("failed to create client")?;
    let password = cli.password.filter(|p| !p.is_empty());

    match cli.command {
        Commands::Fetch => cmd_fetch(&client).await,
        Commands::Login => cmd_login(&client, password.as_deref()).await,
        Commands::Save { file } => cmd_save(client, password.as_deref(), &file).await,
        Commands::Export { output } => cmd_export(client, output.as_deref()).await,
        Commands::Reset => cmd_reset(client, password.as_deref()).await,
        Commands::SetPassword {
            new_password,
            confirmation,
        } => cmd_set_password(client, password.as_deref(), &new_password, &confirmation).await,
        Commands::SetFormKey { key } => cmd_set_form_key(client, password.as_deref(), &key).await,
        Commands::Probe => cmd_probe(&client).await,
    }
}

fn require_password(password: Option<&str>) -> Result<&str> {
    password.context("missing admin password (pass --password or set FOLIO_ADMIN_PASSWORD)")
}

/// Load the current document and log in, for commands that write.
async fn admin_session(client: PortfolioClient, password: Option<&str>) -> Result<PortfolioSession> {
    let password = require_password(password)?;
    let session = PortfolioSession::new(client);
    session
        .load()
        .await
        .context("failed to load the current portfolio")?;
    session.login(password).await.context("login failed")?;
    Ok(session)
}

// ── Commands ─────────────────────────────────────────────────────────

async fn cmd_fetch(client: &PortfolioClient) -> Result<()> {
    match client.fetch_raw().await.context("failed to fetch portfolio")? {
        Some(body) => println!("{}", serde_json::to_string_pretty(&body)?),
        None => warning("no portfolio saved yet (the site shows built-in defaults)"),
    }
    Ok(())
}

async fn cmd_login(client: &PortfolioClient, password: Option<&str>) -> Result<()> {
    let password = require_password(password)?;
    client.login(password).await.context("login failed")?;
    success("password accepted");
    Ok(())
}

async fn cmd_save(client: PortfolioClient, password: Option<&str>, file: &Path) -> Result<()> {
    if !file.exists() {
        bail!("file not found: {}", file.display());
    }
    let text = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", file.display()))?;
    let mut document = PortfolioDocument::from_value(value)
        .with_context(|| format!("{} is not a valid portfolio document", file.display()))?;

    let session = admin_session(client, password).await?;
    if document.admin_password.is_none() {
        document.admin_password = session.data().await.admin_password;
    }
    session.replace_local(document).await;
    session.save().await.context("failed to save portfolio")?;

    success(&format!("portfolio replaced from {}", file.display()));
    Ok(())
}

async fn cmd_export(client: PortfolioClient, output: Option<&Path>) -> Result<()> {
    let session = PortfolioSession::new(client);
    session
        .load()
        .await
        .context("failed to load the current portfolio")?;
    let json = session.export_json().await?;

    match output {
        Some(path) => {
            tokio::fs::write(path, format!("{json}\n"))
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            success(&format!("portfolio exported to {}", path.display()));
        }
        None => println!("{json}"),
    }
    Ok(())
}

async fn cmd_reset(client: PortfolioClient, password: Option<&str>) -> Result<()> {
    let session = admin_session(client, password).await?;
    session
        .reset_to_defaults()
        .await
        .context("failed to save default portfolio")?;
    success("portfolio reset to defaults");
    Ok(())
}

async fn cmd_set_password(
    client: PortfolioClient,
    password: Option<&str>,
    new_password: &str,
    confirmation: &str,
) -> Result<()> {
    let session = admin_session(client, password).await?;
    session
        .change_password(new_password, confirmation)
        .await
        .context("failed to change password")?;
    success("admin password changed");
    Ok(())
}

async fn cmd_set_form_key(client: PortfolioClient, password: Option<&str>, key: &str) -> Result<()> {
    let session = admin_session(client, password).await?;
    session
        .set_form_key(key)
        .await
        .context("failed to save form key")?;
    success("contact form key saved");
    Ok(())
}

async fn cmd_probe(client: &PortfolioClient) -> Result<()> {
    let report: ProbeReport = client.probe().await.context("probe request failed")?;

    header("🩺", "Folio Diagnostics");
    kv_line("Server", client.base_url());
    kv_line("Backend", &report.backend);
    kv_line("Store URI set", &yes_no(report.store_uri_set));
    kv_line("Store URI prefix", &report.store_uri_prefix);
    kv_line("Admin password set", &yes_no(report.admin_password_set));
    kv_line("Token secret set", &yes_no(report.token_secret_set));
    kv_line("Connection", &status_color(&report.connection));
    kv_line("Database", &status_color(&report.database));
    kv_line("Document", &status_color(&report.document));
    Ok(())
}

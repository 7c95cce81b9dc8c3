use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::Text;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader},
    sync::Mutex,
    task::JoinSet,
};
use walkcheck_core::{Config, ProviderConfig, WalkAdvisor};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "walkcheck", version, about = "Is it warm and calm enough for a walk?")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store provider URL, API key and coordinates in the config file.
    Configure,

    /// Check the weather once and print the recommendation.
    Check,

    /// Read commands from stdin (`check`, `errors`, `quit`) against one shared cache.
    Serve,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Check => {
                let advisor = build_advisor()?;
                if let Some(text) = advisor.check_walk().await {
                    println!("{text}");
                }
                Ok(())
            }
            Command::Serve => {
                let advisor = Arc::new(build_advisor()?);
                let input = BufReader::new(tokio::io::stdin());
                let out = Arc::new(Mutex::new(tokio::io::stdout()));
                serve(advisor, input, out).await
            }
        }
    }
}

/// Resolve config from file and environment. Fails before anything else starts.
fn provider_config() -> Result<ProviderConfig> {
    let cfg = Config::load()?.with_env_overrides(|key| std::env::var(key).ok());
    Ok(cfg.provider_config()?)
}

fn build_advisor() -> Result<WalkAdvisor> {
    let config = provider_config()?;
    WalkAdvisor::from_config(config)
}

fn configure() -> Result<()> {
    let mut cfg = Config::load()?;

    cfg.url = Some(prompt("Weather API URL:", cfg.url.as_deref())?);
    cfg.appid = Some(prompt("API key (appid):", cfg.appid.as_deref())?);
    cfg.lat = Some(prompt("Latitude:", cfg.lat.as_deref())?);
    cfg.lon = Some(prompt("Longitude:", cfg.lon.as_deref())?);

    cfg.provider_config()?;
    cfg.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn prompt(message: &str, current: Option<&str>) -> Result<String> {
    let mut text = Text::new(message);
    if let Some(current) = current {
        text = text.with_default(current);
    }
    text.prompt()
        .with_context(|| format!("Failed to read answer for '{message}'"))
}

/// Handle chat-style commands from `input` until EOF or `quit`.
///
/// Every `check` runs as its own task against the shared advisor; all of them are
/// drained before returning, so no reply is lost when input ends.
async fn serve<R, W>(advisor: Arc<WalkAdvisor>, input: R, out: Arc<Mutex<W>>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    tracing::info!("ready, commands: check, errors, quit");

    let mut lines = input.lines();
    let mut checks = JoinSet::new();

    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        match line.trim().trim_start_matches('/') {
            "" => {}
            "check" => {
                let advisor = Arc::clone(&advisor);
                let out = Arc::clone(&out);
                checks.spawn(async move {
                    match advisor.check_walk().await {
                        Some(text) => reply(&out, &text).await,
                        None => Ok(()),
                    }
                });
            }
            "errors" => reply(&out, &advisor.error_log()).await?,
            "quit" | "exit" => break,
            other => tracing::warn!(command = other, "unknown command"),
        }
    }

    while let Some(joined) = checks.join_next().await {
        joined.context("check task panicked")??;
    }

    Ok(())
}

async fn reply<W>(out: &Mutex<W>, text: &str) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut out = out.lock().await;
    out.write_all(text.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await.context("Failed to write reply")
}

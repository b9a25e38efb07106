mod clipboard;
mod config;
mod terminal;

use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use snip_core::{ShortenRequestFlow, ShortenerClient, UiState, UreqTransport, View};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::clipboard::CommandClipboard;
use crate::config::{ApiKind, Cli, Command, DynApi, LogFormat};
use crate::terminal::TerminalView;

type Flow<V> = ShortenRequestFlow<DynApi, UreqTransport, V>;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn flow<V: View>(cli: &Cli, view: V) -> Result<Flow<V>> {
    let client = ShortenerClient::over_http(cli.api()?, cli.timeout());
    Ok(ShortenRequestFlow::new(client, view))
}

async fn shorten_once(cli: &Cli, url: &str, copy: bool) -> Result<ExitCode> {
    let mut flow = flow(cli, TerminalView::stdio())?;
    if flow.submit(url, cli.options()).await.short_url().is_none() {
        return Ok(ExitCode::FAILURE);
    }
    if copy && tokio::task::block_in_place(|| flow.copy_result(&mut CommandClipboard::default())).is_err() {
        // Already reported by the view; the URL was still printed.
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}

/// One submission per stdin line; `copy` copies the last result.
async fn interactive(cli: &Cli) -> Result<ExitCode> {
    let mut flow = flow(cli, TerminalView::stdio())?;
    let mut clipboard = CommandClipboard::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut failures = 0usize;

    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let line = line.trim();
        match line {
            "" => continue,
            "copy" => {
                // Copy utilities are blocking child processes.
                let _ = tokio::task::block_in_place(|| flow.copy_result(&mut clipboard));
            }
            url => {
                if let UiState::Error(_) = flow.submit(url, cli.options()).await {
                    failures += 1;
                }
            }
        }
    }

    tracing::debug!(failures, "stdin closed");
    Ok(if failures == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

async fn info(cli: &Cli, link: &str) -> Result<ExitCode> {
    if cli.api != ApiKind::Owo {
        bail!("link info is only available for the owo API");
    }
    let client = ShortenerClient::over_http(cli.owo_api(), cli.timeout());
    match client.link_info(link).await {
        Ok(info) => {
            println!("id:          {}", info.id);
            println!("destination: {}", info.destination);
            let optional = [
                ("method", info.method),
                ("metadata", info.metadata),
                ("created at", info.created_at),
                ("status", info.status),
                ("comment", info.comment),
            ];
            for (label, value) in optional {
                if let Some(value) = value {
                    println!("{:<13}{value}", format!("{label}:"));
                }
            }
            if let Some(visits) = info.visits {
                println!("visits:      {visits}");
            }
            if let Some(scrapes) = info.scrapes {
                println!("scrapes:     {scrapes}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            tracing::debug!(error = %err, "link info failed");
            eprintln!("error: {}", err.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match &cli.command {
        Some(Command::Shorten { url, copy }) => shorten_once(&cli, url, *copy).await,
        Some(Command::Info { link }) => info(&cli, link).await,
        None => interactive(&cli).await,
    }
}

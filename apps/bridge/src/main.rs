mod config;
mod midi;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use control_core::{Bridge, Layout, ParameterCache, Router, TciClient};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{load_settings, Overrides};

/// Drives a TCI radio from a MIDI control surface.
#[derive(Parser, Debug)]
#[command(name = "midi-tci-bridge", version)]
struct Args {
    /// TCI server endpoint, e.g. ws://127.0.0.1:40001
    #[arg(long)]
    tci_url: Option<String>,
    /// Case-insensitive substring of the MIDI input port name
    #[arg(long)]
    midi_port: Option<String>,
    /// Settings file (defaults to ./bridge.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log filter; RUST_LOG is used when unset
    #[arg(long)]
    log: Option<String>,
    /// Print the available MIDI input ports and exit
    #[arg(long)]
    list_ports: bool,
}

fn init_tracing(filter: Option<&str>) {
    let filter = match filter {
        Some(filter) => EnvFilter::new(filter),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log.as_deref());

    if args.list_ports {
        for (idx, name) in midi::list_ports()?.iter().enumerate() {
            println!("{idx}. {name}");
        }
        return Ok(());
    }

    let settings = load_settings(&Overrides {
        config: args.config,
        tci_url: args.tci_url,
        midi_port: args.midi_port,
    })?;

    let cache = Arc::new(ParameterCache::new());
    let client = Arc::new(
        TciClient::connect(&settings.tci_url, cache.clone())
            .await
            .context("TCI connection failed")?,
    );
    client.ready().await?;

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    // Dropping the connection closes the port.
    let _midi = midi::open_input(settings.midi_port.as_deref(), events_tx)?;

    let bridge = Bridge::new(cache, Router::new(Layout::standard()), client.clone());
    info!(tci_url = %settings.tci_url, "bridge running");

    tokio::select! {
        _ = bridge.run(events_rx) => warn!("midi: input stopped"),
        _ = client.closed() => warn!("tci: server went away"),
        _ = tokio::signal::ctrl_c() => info!("shutting down"),
    }

    if let Err(err) = client.close().await {
        warn!(%err, "tci: close failed");
    }
    Ok(())
}

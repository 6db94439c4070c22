// SmartClip - Point d'entree
// Moteur d'historique du presse-papiers, sans interface
//
// Ce binaire demarre le moteur sur le presse-papiers du systeme,
// journalise les evenements destines a l'interface et s'arrete
// proprement sur Ctrl+C (dernieres sauvegardes ecrites).
//
// # Configuration
// Les fichiers config.json et history.json sont places dans
// `<config_dir>/clipboard`, ou dans le repertoire donne par
// `--data-dir` / SMARTCLIP_DATA_DIR. Le niveau de log suit RUST_LOG
// (`info` par defaut).

use anyhow::Context;
use clap::Parser;
use smartclip::app::{Engine, EngineOptions};
use smartclip::clipboard::port::ClipboardPort;
use smartclip::clipboard::system::SystemClipboard;
use smartclip::events::EngineEvent;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Clipboard history engine", long_about = None)]
struct Cli {
    #[arg(
        long,
        value_name = "PATH",
        env = smartclip::constants::DATA_DIR_ENV,
        help = "Directory holding config.json and history.json"
    )]
    data_dir: Option<PathBuf>,

    #[arg(
        long,
        default_value_t = 500,
        help = "Clipboard polling period in milliseconds"
    )]
    poll_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let mut options = match cli.data_dir {
        Some(dir) => EngineOptions::new(dir),
        None => EngineOptions::default(),
    };
    options = options.with_poll_interval(Duration::from_millis(cli.poll_ms.max(1)));

    let port: Option<Arc<dyn ClipboardPort>> = match SystemClipboard::new() {
        Ok(cb) => Some(Arc::new(cb)),
        Err(e) => {
            warn!(error = %e, "system clipboard unavailable");
            None
        }
    };

    let engine = Engine::start(options, port);
    let mut events = engine.subscribe();
    let logger = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(EngineEvent::HistoryUpdated) => info!(event = "historyUpdated", "history changed"),
                Ok(EngineEvent::ClipboardError(msg)) => {
                    warn!(event = "clipboardError", message = %msg, "copy rejected")
                }
                Err(RecvError::Lagged(n)) => warn!(skipped = n, "event log lagging"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl+C")?;
    info!("shutting down");
    engine.shutdown().await;
    logger.abort();
    Ok(())
}

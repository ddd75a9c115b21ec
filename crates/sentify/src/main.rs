//! Command-line entry point for Sentify.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use log::{debug, info, warn};
use sentify::config::{SentifyConfig, StoreProvider};
use sentify::core::Listing;
use sentify::protocol::SentimentLabel;
use sentify::{RecordQuery, Sentify, parse_batch_rows};
use std::io;
use std::path::PathBuf;

/// Command-line options.
#[derive(Parser)]
#[command(name = "sentify", version, about = "Sentiment classification and analytics")]
struct Cli {
    /// Optional path to a sentify.json5 config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// SQLite database path, overriding the configured store
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the store schema (safe to repeat)
    Init,
    /// Classify and store one comment
    Submit {
        /// Serial id grouping this comment
        #[arg(long, default_value = "")]
        serial: String,
        /// Comment text
        text: String,
    },
    /// Submit rows from a file, or `-` for stdin (JSON array or tab-separated lines)
    Batch { input: String },
    /// List stored records, newest first
    List {
        /// Case-insensitive serial id substring
        #[arg(long)]
        serial: Option<String>,
        #[arg(long)]
        label: Option<SentimentLabel>,
        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print summary statistics as JSON
    Summary {
        #[arg(long)]
        serial: Option<String>,
        #[arg(long)]
        label: Option<SentimentLabel>,
    },
    /// Classify text without storing it
    Classify { text: String },
    /// Serve the HTTP API
    Serve {
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    sentify::init_logging();

    let cli = Cli::parse();
    info!(
        "starting sentify (config_set={}, db_set={})",
        cli.config.is_some(),
        cli.db.is_some()
    );
    let config = load_config(&cli)?;
    let mut server_config = config.server.clone();
    let app = Sentify::from_config(config).context("failed to initialize sentify")?;

    match cli.command {
        Command::Init => {
            app.init().context("failed to initialize store")?;
            println!("store initialized");
        }
        Command::Submit { serial, text } => {
            let record = app
                .submit_one(&serial, &text)
                .context("submission rejected")?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::Batch { input } => {
            let contents = read_input(&input)?;
            let rows = parse_batch_rows(&contents)?;
            debug!("batch rows parsed (rows={})", rows.len());
            let report = app.submit_batch(rows);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::List {
            serial,
            label,
            json,
        } => {
            let listing = app.query(&RecordQuery { serial, label });
            report_degraded(&listing);
            if json {
                println!("{}", serde_json::to_string_pretty(&listing.records)?);
            } else {
                print_listing(&listing);
            }
        }
        Command::Summary { serial, label } => {
            let report = app.summary(&RecordQuery { serial, label });
            if let Some(err) = &report.error {
                warn!("summary computed over an empty listing: {err}");
                eprintln!("warning: {err}");
            }
            println!("{}", serde_json::to_string_pretty(&report.summary)?);
        }
        Command::Classify { text } => {
            let classification = app.classify(&text)?;
            println!(
                "{} (confidence {:.2}, score {:.4})",
                classification.label, classification.confidence, classification.score
            );
        }
        Command::Serve { address, port } => {
            if let Some(address) = address {
                server_config.address = address;
            }
            if let Some(port) = port {
                server_config.port = port;
            }
            sentify::server::serve(app, &server_config)
                .await
                .context("server failed")?;
        }
    }
    Ok(())
}

/// Load config from an explicit path or the layered defaults, then apply `--db`.
fn load_config(cli: &Cli) -> anyhow::Result<SentifyConfig> {
    let mut config = if let Some(path) = &cli.config {
        info!("loading config from {}", path.display());
        SentifyConfig::load_from_path(path).context("failed to load config")?
    } else {
        let cwd = std::env::current_dir().context("cwd")?;
        info!("loading layered config from cwd: {}", cwd.display());
        let layered =
            SentifyConfig::load_layered(&cwd).context("failed to load layered config")?;
        debug!("layered config loaded (layers={})", layered.layers.len());
        layered.config
    };
    if let Some(db) = &cli.db {
        config.store.provider = StoreProvider::Sqlite;
        config.store.path = db.to_string_lossy().to_string();
    }
    Ok(config)
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        return io::read_to_string(io::stdin()).context("failed to read stdin");
    }
    let contents = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read batch file {input}"))?;
    if contents.trim().is_empty() {
        bail!("batch file {input} is empty");
    }
    Ok(contents)
}

fn report_degraded(listing: &Listing) {
    if let Some(err) = &listing.error {
        eprintln!("warning: {err}");
    }
}

fn print_listing(listing: &Listing) {
    if listing.records.is_empty() {
        println!("no records");
        return;
    }
    for record in &listing.records {
        println!(
            "{}\t{}\t{}\t{}\t{:.2}\t{}",
            record.id,
            record.created_at.to_rfc3339(),
            record.serial_id,
            record.label,
            record.confidence,
            record.comment_text
        );
    }
}

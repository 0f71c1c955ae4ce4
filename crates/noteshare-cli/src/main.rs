//! noteshare: share notes through self-contained encrypted links
//!
//! Commands:
//!   share <note.json|->   - encrypt a stored note into a share URL
//!   open <url>            - decrypt a share URL and print the note
//!   config show           - display the effective configuration
//!
//! The link fragment carries both the ciphertext and its key; nothing is
//! uploaded anywhere.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use noteshare_codec::Deflate;
use noteshare_core::config::{LinkConfig, ShareConfig};
use noteshare_core::{SharePayload, SharedNote, StoredNote};
use noteshare_link::{open_shared_link, share_note};

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "noteshare",
    version,
    about = "Share notes through encrypted links",
    long_about = "noteshare: turn a note into a link that carries its own key, and open such links"
)]
struct Cli {
    /// Path to config.toml (default: ~/.config/noteshare/config.toml)
    #[arg(long, short = 'c', env = "NOTESHARE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log level or filter directive (overrides [logging].level)
    #[arg(long, env = "NOTESHARE_LOG", global = true)]
    log: Option<String>,

    /// Log format (overrides [logging].format)
    #[arg(long, env = "NOTESHARE_LOG_FORMAT", global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encrypt a stored note and print its share link
    Share {
        /// Note JSON file as kept by the note store, or `-` for stdin
        note: String,

        #[command(flatten)]
        link: LinkArgs,

        /// Skip deflate and encrypt the JSON as-is
        #[arg(long)]
        no_compress: bool,
    },

    /// Open a share link and print the note it carries
    Open {
        /// Full share URL, or just its `#c=...&k=...` fragment
        url: String,

        /// Print the decoded payload as JSON
        #[arg(long)]
        json: bool,

        /// Also write the note, ready to save, as JSON to this path
        #[arg(long)]
        draft: Option<PathBuf>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the active configuration (merged defaults + config file)
    Show,
}

/// Per-invocation overrides of the `[link]` section
#[derive(Args, Debug, Default)]
struct LinkArgs {
    /// Origin the link points at, e.g. https://notes.example.com
    #[arg(long)]
    origin: Option<String>,

    /// Path the app is served under
    #[arg(long)]
    base_path: Option<String>,

    /// Longest fragment, in characters, a link may carry
    #[arg(long)]
    max_fragment_length: Option<usize>,
}

impl LinkArgs {
    fn apply(&self, link: &mut LinkConfig) {
        if let Some(origin) = &self.origin {
            link.base_origin = origin.clone();
        }
        if let Some(base_path) = &self.base_path {
            link.base_path = base_path.clone();
        }
        if let Some(max) = self.max_fragment_length {
            link.max_fragment_length = max;
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq)]
enum LogFormat {
    Json,
    Text,
}

impl LogFormat {
    fn from_config(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = ShareConfig::load(&config_path)
        .with_context(|| format!("loading config: {}", config_path.display()))?;

    let level = cli.log.as_deref().unwrap_or(&config.logging.level);
    let format = cli
        .log_format
        .unwrap_or_else(|| LogFormat::from_config(&config.logging.format));
    init_logging(level, format);
    debug!(config = %config_path.display(), "configuration loaded");

    match cli.command {
        Commands::Share { note, link, no_compress } => {
            cmd_share(&config, &note, &link, no_compress).await
        }
        Commands::Open { url, json, draft } => cmd_open(&config, &url, json, draft.as_deref()).await,
        Commands::Config { action: ConfigAction::Show } => cmd_config_show(&config, &config_path),
    }
}

fn init_logging(level: &str, format: LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

/// `$XDG_CONFIG_HOME/noteshare/config.toml`, falling back to `~/.config`
fn default_config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        })
        .join("noteshare")
        .join("config.toml")
}

// ── `noteshare share` ─────────────────────────────────────────────────────────

async fn cmd_share(
    config: &ShareConfig,
    source: &str,
    overrides: &LinkArgs,
    no_compress: bool,
) -> Result<()> {
    let raw = read_note_source(source).await?;
    let stored: StoredNote = serde_json::from_str(&raw)
        .with_context(|| format!("parsing note JSON: {source}"))?;

    let mut link_config = config.link.clone();
    overrides.apply(&mut link_config);
    link_config
        .validate()
        .context("invalid link configuration")?;

    let codec = if no_compress {
        Deflate::disabled()
    } else {
        Deflate::from_config(&config.compression)
    };

    let payload = SharePayload::from_stored(&stored);
    let link = share_note(&payload, &codec, &link_config).map_err(|e| {
        debug!(error = %e, "share link not created");
        anyhow::anyhow!(e.sender_message())
    })?;

    info!(
        fragment_len = link.fragment_len,
        raw_size = link.raw_size,
        compressed_size = link.compressed_size,
        "share link created"
    );
    println!("{}", link.url);
    Ok(())
}

async fn read_note_source(source: &str) -> Result<String> {
    if source == "-" {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("reading note from stdin")?;
        Ok(buf)
    } else {
        tokio::fs::read_to_string(source)
            .await
            .with_context(|| format!("reading note: {source}"))
    }
}

// ── `noteshare open` ──────────────────────────────────────────────────────────

async fn cmd_open(
    config: &ShareConfig,
    url: &str,
    json: bool,
    draft_path: Option<&Path>,
) -> Result<()> {
    let payload = open_shared_link(url)?;

    if let Some(path) = draft_path {
        let draft = payload.note.to_draft(&config.notes);
        let rendered =
            serde_json::to_string_pretty(&draft).context("serializing note draft")?;
        tokio::fs::write(path, rendered + "\n")
            .await
            .with_context(|| format!("writing draft: {}", path.display()))?;
        info!(path = %path.display(), "note draft written");
    }

    if json {
        let rendered = serde_json::to_string_pretty(&payload).context("serializing payload")?;
        println!("{rendered}");
    } else {
        print!("{}", render_note(&payload.note));
    }
    Ok(())
}

/// Plain-text view of a received note.
fn render_note(note: &SharedNote) -> String {
    let content = match note.content.trim() {
        "" => "No content",
        _ => note.content.as_str(),
    };
    format!(
        "{}\nLast edited: {}\n\n{}\n",
        note.display_title(),
        format_last_edited(note),
        content
    )
}

fn format_last_edited(note: &SharedNote) -> String {
    note.updated_at_millis()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| note.updated_at.to_string())
}

// ── `noteshare config show` ───────────────────────────────────────────────────

fn cmd_config_show(config: &ShareConfig, config_path: &Path) -> Result<()> {
    if config_path.exists() {
        println!("# Configuration from: {}", config_path.display());
    } else {
        println!("# Configuration: defaults (no file at {})", config_path.display());
    }
    println!();
    let rendered = toml::to_string_pretty(config).context("serializing config to TOML")?;
    print!("{rendered}");
    Ok(())
}

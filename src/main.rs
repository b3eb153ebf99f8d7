//! Binary entrypoint for the fortunecookie CLI.
//!
//! Commands:
//! - `pick [--id <id>] [--url <link>] [--json]` - reveal a fortune
//! - `hash <input>` - print the FNV-1a hash used for deterministic picks
//! - `status` - list source, size and progress through the current random cycle
//! - `reset` - forget the current random cycle
//! - `init` - write a starter `config.toml`
//! - `tag-url <id> [--base <url>]` - print the link to program onto a tag
//!
//! See the library crate docs for module-level details: `fortunecookie::`.
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};

use fortunecookie::config::Config;
use fortunecookie::fortune::{fnv1a32, render, Mode, Selector};
use fortunecookie::invocation::{identifier_from_url, tag_url, Identifier};
use fortunecookie::logutil::escape_log;
use fortunecookie::storage::{JsonFileStore, SeenSetStore};

#[derive(Parser)]
#[command(name = "fortunecookie")]
#[command(about = "Tap-to-reveal fortune cookies, per tag or at random")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Reveal a fortune (deterministic with an id, random no-repeat without)
    Pick {
        /// Tag identifier, e.g. TAG123
        #[arg(short, long, conflicts_with = "url")]
        id: Option<String>,

        /// Full tag link; the `id` query parameter is used when present
        #[arg(short, long)]
        url: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the FNV-1a hash of an identifier
    Hash {
        input: String,
    },
    /// Show list source and random cycle progress
    Status,
    /// Clear the random cycle so every fortune is fresh again
    Reset,
    /// Initialize a new configuration file
    Init,
    /// Print the link to write onto a tag for an identifier
    TagUrl {
        id: String,

        /// Base link; defaults to `links.base_url` from the config
        #[arg(short, long)]
        base: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.command {
        Commands::Init => None,
        _ => Some(Config::load_or_default(&cli.config).await?),
    };
    init_logging(&config, cli.verbose);
    let config = config.unwrap_or_default();

    match cli.command {
        Commands::Pick { id, url, json } => {
            let identifier = match (id, url) {
                (Some(raw), _) => Identifier::parse(Some(&raw)),
                (None, Some(link)) => identifier_from_url(&link),
                (None, None) => None,
            };
            let mode = Mode::for_identifier(identifier.as_ref());
            if let Some(id) = &identifier {
                debug!("pick: identifier '{}'", escape_log(id.as_str()));
            }

            let list = config.fortune_list()?;
            let total = list.len();
            let store = JsonFileStore::new(&config.storage.data_dir);
            let mut selector = Selector::new(list, store);
            let selection = selector.new_selection(identifier.as_ref());

            if json {
                let payload = serde_json::json!({
                    "mode": mode,
                    "id": identifier.as_ref().map(Identifier::as_str),
                    "index": selection.as_ref().map(|s| s.index),
                    "value": selection.as_ref().map(|s| s.value.as_str()),
                    "seen_count": selection.as_ref().and_then(|s| s.seen_count),
                    "total": total,
                });
                println!("{}", payload);
            } else {
                println!("{}", render(selection.as_ref(), mode, total));
                match &identifier {
                    Some(id) => println!("Mode: {} ({})", mode, id),
                    None => println!("Mode: {}", mode),
                }
            }
        }
        Commands::Hash { input } => {
            let h = fnv1a32(&input);
            println!("{} (0x{:08x})", h, h);
        }
        Commands::Status => {
            let list = config.fortune_list()?;
            let source = config.fortunes.file.as_deref().unwrap_or("built-in");
            let store = JsonFileStore::new(&config.storage.data_dir);
            let state_path = store.path().display().to_string();
            let selector = Selector::new(list, store);
            println!("Fortunes: {} ({})", selector.list().len(), source);
            println!(
                "Random cycle: {} / {} seen",
                selector.seen_count(),
                selector.list().len()
            );
            println!("State file: {}", state_path);
        }
        Commands::Reset => {
            let mut store = JsonFileStore::new(&config.storage.data_dir);
            store
                .clear()
                .with_context(|| format!("Failed to clear {}", store.path().display()))?;
            info!("Cleared random cycle at {}", store.path().display());
            println!("Random cycle reset.");
        }
        Commands::Init => {
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);
            println!("Configuration file created at {}", cli.config);
        }
        Commands::TagUrl { id, base } => {
            let Some(identifier) = Identifier::parse(Some(&id)) else {
                anyhow::bail!("Identifier must not be blank");
            };
            let base = base.unwrap_or(config.links.base_url);
            println!("{}", tag_url(&base, identifier.as_str()));
        }
    }

    Ok(())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .map(|c| c.logging.level_filter())
            .unwrap_or(log::LevelFilter::Warn),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config
        .as_ref()
        .and_then(|c| c.logging.file.as_ref())
        .and_then(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        });

    if let Some(f) = log_file {
        let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
        // Mirror to the console only when someone is watching it
        let is_tty = atty::is(atty::Stream::Stderr);
        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());
            if let Ok(mut guard) = write_mutex.lock() {
                let _ = writeln!(guard, "{}", line);
            }
            if is_tty {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
        });
    }
    let _ = builder.try_init();
}

//! Diagnostic resolver.
//!
//! Loads a configuration, builds the configured spatial store and resolves a
//! single coordinate, printing the annotated place as JSON.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use larch::config::{Backend, Config};
use larch::elasticsearch::ElasticStore;
use larch::i18n::CountryCatalog;
use larch::store::{load_geonames, MemoryStore, SharedStore};
use larch::{PlaceResolver, Resolution};

#[derive(Parser, Debug)]
#[command(name = "resolve")]
#[command(about = "Resolve a coordinate into its place, city, state and nearby features")]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = "larch.toml")]
    config: PathBuf,

    /// Latitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,

    /// Longitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    lon: f64,

    /// Overall timeout in milliseconds, overriding the configuration
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Attach the decision trace to the output
    #[arg(long)]
    trace: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for the JSON result
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let config = Config::load_from_file(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;

    let store = build_store(&config).await?;

    let translator = match config.i18n.countries {
        Some(ref path) => CountryCatalog::load_from_file(path)?,
        None => CountryCatalog::new(),
    };

    let resolver = PlaceResolver::with_config(
        store,
        Arc::new(translator),
        config.resolver.country_rules(),
        config.resolver.resolver_config(),
    );

    let mut options = config.resolver.resolve_options();
    if let Some(timeout_ms) = args.timeout_ms {
        options.timeout = Duration::from_millis(timeout_ms);
    }
    if args.trace {
        options = options.traced();
    }

    info!("Resolving ({}, {})", args.lat, args.lon);

    match resolver.resolve(args.lat, args.lon, &options).await? {
        Resolution::Found(place) => println!("{}", serde_json::to_string_pretty(&place)?),
        Resolution::NotFound => {
            info!("No populated place near ({}, {})", args.lat, args.lon);
            println!("null");
        }
    }

    Ok(())
}

async fn build_store(config: &Config) -> Result<SharedStore> {
    let store: SharedStore = match config.store.backend {
        Backend::Memory => {
            let path = config
                .store
                .geonames_dump
                .as_ref()
                .context("store.geonames_dump is required for the memory backend")?;

            let mut store = MemoryStore::build(load_geonames(path)?);
            if let Some(capacity) = config.store.capacity {
                store = store.with_capacity(capacity);
            }
            Arc::new(store)
        }
        Backend::Elasticsearch => {
            info!("Connecting to Elasticsearch at {}", config.store.es_url);
            let mut store = ElasticStore::connect(&config.store.es_url, &config.store.index_prefix)
                .await
                .context("Failed to connect to Elasticsearch")?;
            if let Some(capacity) = config.store.capacity {
                store = store.with_capacity(capacity);
            }
            Arc::new(store)
        }
    };

    Ok(store)
}

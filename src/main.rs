use anyhow::Result;
use clap::{Arg, Command};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use beat_title_generator::api::{ApiServer, AppState};
use beat_title_generator::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("Beat Title Generator")
        .version(env!("CARGO_PKG_VERSION"))
        .author("TigreRoll")
        .about("Serves scraped, cleaned and cached beat titles over HTTP")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file (default: search beat-titles.toml)")
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Port to listen on")
                .value_parser(clap::value_parser!(u16))
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue)
        )
        .get_matches();

    // Load configuration
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => {
            let mut config = Config::load_from_path(&PathBuf::from(path))?;
            config.apply_env_overrides()?;
            config
        }
        None => Config::load()?,
    };

    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.port = *port;
    }

    if matches.get_flag("verbose") {
        config.logging.level = "debug".to_string();
    }

    // Initialize logging, RUST_LOG takes precedence over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("beat_title_generator={},warn", config.logging.level)));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    config.validate()?;

    info!("🚀 Beat Title Generator starting...");
    info!("{}", config.summary());

    let config = Arc::new(config);
    let state = AppState::from_config(Arc::clone(&config))?;

    if config.cache.warm_on_startup {
        let library = Arc::clone(&state.library);
        tokio::spawn(async move {
            library.warm_up().await;
        });
    }

    ApiServer::new(state, config.server.host.clone(), config.server.port)
        .start()
        .await
}

use std::process::Command;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use eyre::Result;
use log::{info, warn};

mod cli;

use cli::Cli;

fn setup_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();
}

fn tool_version(name: &str) -> Option<String> {
    Command::new(name)
        .arg("--version")
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| {
            String::from_utf8_lossy(&o.stdout)
                .trim()
                .lines()
                .next()
                .unwrap_or("")
                .to_string()
        })
}

fn check_tools() {
    match tool_version("yt-dlp") {
        Some(v) => info!("Found yt-dlp {v}"),
        None => warn!("yt-dlp not found; the Whisper fallback will be unavailable"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);
    check_tools();

    let mut config = match cli.config {
        Some(ref path) => askvid::config::Config::load_from(path)?,
        None => askvid::config::Config::load().unwrap_or_default(),
    };

    // CLI flags take priority over the config file
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }
    if let Some(lang) = cli.lang {
        config.lang = lang;
    }
    if let Some(model) = cli.model {
        config.model_path = Some(model);
    }

    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .build()?;

    let config = Arc::new(config);
    let state = askvid::server::AppState {
        client,
        config: config.clone(),
    };

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, askvid::server::router(state)).await?;

    Ok(())
}

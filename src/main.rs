use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod app;
mod commands;
mod config;
mod models;
mod services;
mod utils;

use api::hellogold::HelloGoldClient;
use app::App;
use commands::Flow;
use config::AppConfig;

const FETCH_CHANNEL_CAPACITY: usize = 64;

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hellogold_client=debug,reqwest=warn")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env();
    info!("Starting HelloGold client");
    info!("  register endpoint:   {}", config.register_url);
    info!("  spot price endpoint: {}", config.spot_price_url);
    info!("  overlap policy:      {}", config.overlap_policy);

    let api = Arc::new(HelloGoldClient::new(&config));
    let (completions_tx, mut completions) = mpsc::channel(FETCH_CHANNEL_CAPACITY);
    let mut app = App::new(config, api, completions_tx);

    println!("Sign up to see HelloGold spot prices. Type `$help` for commands.");
    prompt();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            maybe_line = lines.next_line() => {
                let line = match maybe_line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        error!("Failed to read input: {}", e);
                        break;
                    }
                };

                match commands::handle_line(&mut app, &line).await {
                    Flow::Continue(text) => {
                        if !text.is_empty() {
                            println!("{}", text);
                        }
                    }
                    Flow::Quit => break,
                }
                prompt();
            }
            Some(completion) = completions.recv() => {
                if let Some(text) = commands::price::handle_fetch_completion(&mut app, completion) {
                    println!("\n{}", text);
                    prompt();
                }
            }
        }
    }

    info!("Goodbye");
}

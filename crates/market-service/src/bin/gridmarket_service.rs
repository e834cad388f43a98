use std::sync::Arc;

use gridmarket_clock::SystemClock;
use gridmarket_service::{Director, MarketList, MarketServiceConfig, SimulatedParticipant};
use log::{info, warn};

fn print_help() {
    eprintln!(
        r#"Gridmarket Service - double-auction market rounds

USAGE:
    gridmarket-service [OPTIONS]

OPTIONS:
    --config <PATH>     Load configuration from JSON file
    --rounds <N>        Stop after N rounds (default: run forever)
    --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG            Log level filter (default: info)

EXAMPLES:
    # Run the bundled electricity market for three rounds
    gridmarket-service --config crates/market-service/config/electricity.json --rounds 3
"#
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;
    let mut rounds: Option<u64> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                let Some(path) = args.get(i) else {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                };
                config_path = Some(path.clone());
            }
            "--rounds" | "-n" => {
                i += 1;
                let Some(count) = args.get(i) else {
                    eprintln!("Error: --rounds requires a number");
                    std::process::exit(1);
                };
                rounds = Some(count.parse()?);
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let config = match config_path {
        Some(path) => {
            info!("Loading configuration from: {}", path);
            MarketServiceConfig::from_file(&path)?
        }
        None => MarketServiceConfig::default(),
    };
    info!(
        "Market period: {}s (reservation delay {}s, offer delay {}s, clear delay {}s)",
        config.market_period, config.reservation_delay, config.offer_delay, config.clear_delay
    );
    info!("Participants: {}", config.participants.len());

    let markets = Arc::new(MarketList::new());
    for participant in &config.participants {
        markets.add_market(&participant.market_name);
    }

    let director = Director::new(markets.clone(), config.clone(), Arc::new(SystemClock::new()));
    let handles: Vec<_> = config
        .participants
        .iter()
        .map(|cfg| SimulatedParticipant::from_config(cfg, markets.clone()).spawn(director.subscribe()))
        .collect();

    match rounds {
        Some(count) => {
            for report in director.run(count).await {
                for outcome in &report.cleared {
                    info!(
                        "Round {}: {} cleared at {} for {}",
                        report.round, outcome.market_name, outcome.price, outcome.quantity
                    );
                }
                for (market_name, err) in &report.errors {
                    warn!("Round {}: {}: {}", report.round, market_name, err);
                }
            }
        }
        None => {
            tokio::select! {
                _ = director.run_forever() => {}
                _ = tokio::signal::ctrl_c() => info!("Shutting down"),
            }
        }
    }

    // Closing the event bus lets participants finish
    drop(director);
    for (cfg, handle) in config.participants.iter().zip(handles) {
        let report = handle.await?;
        info!(
            "{}: {} reservations, {} offers ({} after aggregates), {} prices, {} errors",
            cfg.identity,
            report.reservations,
            report.offers,
            report.aggregates,
            report.prices.len(),
            report.errors.len()
        );
    }

    Ok(())
}

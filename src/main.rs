use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use genmap::{
    service::ClimateService,
    web::{self, WebServerConfig},
    Config, Variant,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Genmap climate snapshot tool")]
struct Cli {
    /// Path to the configuration YAML file (defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Resolve locations against the built-in catalog, no network
    #[arg(long)]
    offline: bool,

    /// Override the panel set variant
    #[arg(long, value_enum)]
    variant: Option<Variant>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve a place, fetch current conditions, and print the report
    Report {
        /// Free-text place query, e.g. "Paris" or "Reykjavik, Iceland"
        query: String,

        /// Timeline year for the projection panels (2024..2100)
        #[arg(long, default_value_t = 2024)]
        year: i32,
    },
    /// Serve the JSON API
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if cli.offline {
        config.offline = true;
    }
    if let Some(variant) = cli.variant {
        config.variant = variant;
    }

    let filter =
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let service = ClimateService::new(config);

    match cli.command {
        Command::Report { query, year } => run_report(&service, &query, year).await,
        Command::Serve { host, port } => web::run(WebServerConfig { host, port }, service).await,
    }
}

async fn run_report(service: &ClimateService, query: &str, year: i32) -> Result<()> {
    let session = service
        .load_location(query)
        .await
        .context("load was superseded before completing")?;

    if let Some(notice) = &session.notice {
        println!("! {notice}");
    }
    println!(
        "Location: {} ({:.4}, {:.4})",
        session.location.name, session.location.lat, session.location.lng
    );
    if let Some(city) = session.city_model {
        println!(
            "City model: {} ({} landmark(s), {} building(s))",
            city.name,
            city.landmarks.len(),
            city.buildings.len()
        );
    }
    println!("Weather source: {}", session.weather.source);
    println!("Data confidence: {}%", session.confidence);

    let record = session.projections.nearest(year);
    println!(
        "Timeline year {}: +{:.1}\u{b0}C, sea level +{:.2}m",
        record.year, record.temperature_increase, record.sea_level_rise_m
    );

    for report in service.render_panels(&session, year) {
        println!("\n== {} ==", report.panel);
        for metric in &report.metrics {
            println!("  {:<24} {:<20} [{}]", metric.name, metric.value, metric.severity);
        }
    }
    Ok(())
}

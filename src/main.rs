//! # crispml
//!
//! Command-line entry point: serve the demo pages, or run one demo and print its metrics.

use anyhow::Context;
use clap::{Parser, Subcommand};
use crispml::params::{MultipleParams, SimpleParams, TimeSeriesParams};
use crispml::pipeline::{run_multiple, run_simple, run_timeseries};
use crispml::render::{self, MetricRow};
use crispml::server::{self, ServerConfig};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "crispml", version)]
#[command(about = "CRISP-DM regression demos on synthetic data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Serve {
        /// Address to bind (falls back to $HOST, then 127.0.0.1)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (falls back to $PORT, then 8080)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Simple linear regression on y = a·x + 5 + noise
    Simple {
        #[command(flatten)]
        params: SimpleParams,

        /// Write the chart to this SVG file
        #[arg(long)]
        svg: Option<PathBuf>,
    },

    /// Multiple linear regression, optionally with recursive feature elimination
    Multiple {
        #[command(flatten)]
        params: MultipleParams,

        /// Write the chart to this SVG file
        #[arg(long)]
        svg: Option<PathBuf>,
    },

    /// AR(p) fit, forecast and ADF stationarity test
    #[command(name = "timeseries")]
    TimeSeries {
        #[command(flatten)]
        params: TimeSeriesParams,

        /// Write the chart to this SVG file
        #[arg(long)]
        svg: Option<PathBuf>,
    },
}

fn server_config(host: Option<String>, port: Option<u16>) -> anyhow::Result<ServerConfig> {
    let defaults = ServerConfig::default();
    let host = host
        .or_else(|| std::env::var("HOST").ok())
        .unwrap_or(defaults.host);
    let port = match port {
        Some(port) => port,
        None => match std::env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got '{}'", raw))?,
            Err(_) => defaults.port,
        },
    };
    Ok(ServerConfig { host, port })
}

fn print_table(title: &str, rows: &[MetricRow]) {
    let width = rows.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);
    println!("{}", title);
    for (label, value) in rows {
        let pad = width - label.chars().count();
        println!("  {}{}  {}", label, " ".repeat(pad), value);
    }
}

fn write_svg(path: &Path, svg: &str) -> anyhow::Result<()> {
    std::fs::write(path, svg).with_context(|| format!("writing {}", path.display()))?;
    log::info!("chart written to {}", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Commands::Serve { host, port } => {
            server::serve(server_config(host, port)?).await?;
        }
        Commands::Simple { params, svg } => {
            let report = run_simple(&params)?;
            print_table("Simple linear regression", &render::simple_metrics(&report));
            if let Some(path) = svg {
                write_svg(&path, &render::simple_chart(&report)?)?;
            }
        }
        Commands::Multiple { params, svg } => {
            let report = run_multiple(&params)?;
            print_table("Multiple linear regression", &render::multiple_metrics(&report));
            if let Some(path) = svg {
                write_svg(&path, &render::multiple_chart(&report)?)?;
            }
        }
        Commands::TimeSeries { params, svg } => {
            let report = run_timeseries(&params)?;
            print_table("Autoregressive time series", &render::timeseries_metrics(&report));
            print_table("Autocorrelation", &render::acf_rows(&report));
            if let Some(path) = svg {
                write_svg(&path, &render::timeseries_chart(&report)?)?;
            }
        }
    }

    Ok(())
}

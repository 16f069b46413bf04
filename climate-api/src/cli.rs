use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use climate_core::{ClimateDataset, Config, DatasetError, SqliteDataset, Station};
use std::{path::PathBuf, sync::Arc};

use crate::http_server;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "climate-api", version, about = "Climate observation HTTP API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Values that override the config file.
#[derive(Debug, Args)]
pub struct Overrides {
    /// Path to the SQLite dataset (e.g. "Resources/hawaii.sqlite").
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// Address to bind.
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on.
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the API over the configured dataset.
    Serve {
        #[command(flatten)]
        overrides: Overrides,
    },

    /// Persist settings to the config file.
    Configure {
        #[command(flatten)]
        overrides: Overrides,
    },

    /// Print the effective configuration.
    ShowConfig,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        match self.command {
            Command::Serve { overrides } => {
                config.apply_overrides(overrides.database, overrides.host, overrides.port);
                serve(&config).await?;
            }
            Command::Configure { overrides } => {
                config.apply_overrides(overrides.database, overrides.host, overrides.port);
                let path = config.save()?;
                println!("Saved configuration to {}", path.display());
            }
            Command::ShowConfig => {
                println!("# {}", Config::config_file_path()?.display());
                print!("{}", config.to_toml()?);
            }
        }

        Ok(())
    }
}

async fn serve(config: &Config) -> anyhow::Result<()> {
    let path = config.database_path();
    let dataset = SqliteDataset::open(path)
        .with_context(|| format!("Failed to open dataset: {}", path.display()))?;

    log_summary(&dataset).await?;

    let dataset: Arc<dyn ClimateDataset> = Arc::new(dataset);
    http_server::run_http_server(dataset, &config.bind_address()).await
}

async fn log_summary(dataset: &SqliteDataset) -> anyhow::Result<Vec<Station>> {
    let stations = dataset.stations().await.context("Failed to read stations")?;
    log::info!("Dataset {} has {} stations", dataset.path().display(), stations.len());
    for station in &stations {
        log::debug!("  - {}", describe_station(station));
    }

    match dataset.max_date().await {
        Ok(last) => log::info!("Latest measurement: {last}"),
        Err(DatasetError::EmptyDataset) => {
            log::warn!("Measurement table is empty; precipitation and tobs will fail")
        }
        Err(e) => return Err(e).context("Failed to read latest measurement date"),
    }

    Ok(stations)
}

fn describe_station(station: &Station) -> String {
    format!(
        "{} {} ({:.4}, {:.4}) elevation {} m",
        station.station, station.name, station.latitude, station.longitude, station.elevation
    )
}

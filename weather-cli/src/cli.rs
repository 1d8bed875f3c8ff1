use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use cityweather_core::{Config, Dashboard, OpenWeatherClient, WeatherQuery, build_dashboard};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use tracing::debug;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "Current weather, map and 5-day trend for a city")]
pub struct Cli {
    /// Log fetch activity to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults to `watch`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key.
    Configure,

    /// Prompt for city names and show a dashboard for each one.
    Watch,

    /// Show the dashboard for a single city.
    Show {
        /// City name, e.g. "London".
        city: String,

        /// Print the dashboard data as JSON instead of drawing it.
        #[arg(long)]
        json: bool,
    },
}

/// Settings read once at startup and shared by every submission.
struct Session {
    client: OpenWeatherClient,
    api_key: String,
    map_zoom: u8,
}

impl Session {
    fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            client: OpenWeatherClient::with_base_url(cfg.base_url()),
            api_key: cfg.resolve_api_key()?,
            map_zoom: cfg.map_zoom(),
        })
    }

    async fn dashboard(&self, city: String) -> anyhow::Result<Option<Dashboard>> {
        let Some(query) = WeatherQuery::new(city, self.api_key.clone()) else {
            return Ok(None);
        };

        let dashboard = build_dashboard(&self.client, &query, self.map_zoom)
            .await
            .with_context(|| format!("Unexpected weather data for '{}'", query.city))?;

        Ok(Some(dashboard))
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Watch) {
            Command::Configure => configure(),
            Command::Watch => {
                let session = Session::from_config(&Config::load()?)?;
                watch(&session).await
            }
            Command::Show { city, json } => {
                let session = Session::from_config(&Config::load()?)?;
                let dashboard = session
                    .dashboard(city)
                    .await?
                    .ok_or_else(|| anyhow!("City name must not be empty"))?;

                if json {
                    let out = serde_json::to_string_pretty(&dashboard)
                        .context("Failed to serialize dashboard")?;
                    println!("{out}");
                    Ok(())
                } else {
                    render::draw_inline(&dashboard)
                }
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let api_key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    cfg.set_api_key(api_key.trim().to_string());
    let path = cfg.save()?;

    println!("Saved API key to {}", path.display());
    Ok(())
}

/// Every non-empty submission reruns the whole flow; Esc or Ctrl-C ends it.
async fn watch(session: &Session) -> anyhow::Result<()> {
    loop {
        let city = match Text::new("Enter city name").with_placeholder("London").prompt() {
            Ok(city) => city,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                debug!("prompt closed");
                return Ok(());
            }
            Err(err) => return Err(err).context("Failed to read city name"),
        };

        match session.dashboard(city).await {
            Ok(Some(dashboard)) => render::draw_inline(&dashboard)?,
            Ok(None) => {}
            Err(err) => eprintln!("Error: {err:#}"),
        }
    }
}

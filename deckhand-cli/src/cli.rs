use anyhow::{Context, ensure};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use deckhand_core::{
    Config, ConfiguredLocation, Controller, Coordinates, SearchOutcome, UnitPreference,
    moon_phase_on, moon_phase_today, provider_from_config,
};
use inquire::{
    Confirm, CustomType, InquireError, Password, PasswordDisplayMode, Select, Text,
};
use std::process::ExitCode;

use crate::render::{LOADING_MESSAGE, Screen};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "deckhand", version, about = "Deckhand's Weather Charts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key, default units and home coordinates.
    Configure,

    /// Show current weather and a 5-day forecast for a place.
    Search {
        /// Place name, e.g. "Victoria, BC, Canada".
        #[arg(required = true, num_args = 1..)]
        place: Vec<String>,

        /// Show temperatures in Fahrenheit.
        #[arg(long)]
        fahrenheit: bool,
    },

    /// Show weather for the configured home location.
    Here {
        /// Show temperatures in Fahrenheit.
        #[arg(long)]
        fahrenheit: bool,
    },

    /// Print the moon phase.
    Moon {
        /// Date as YYYY-MM-DD; if absent, means today.
        #[arg(long)]
        date: Option<String>,
    },

    /// Prompt for searches until you quit.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure => {
                configure()?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Search { place, fahrenheit } => {
                let controller = session(fahrenheit)?;
                eprintln!("{LOADING_MESSAGE}");
                let outcome = controller.search(place.join(" ")).await;
                print_state(&controller);
                Ok(exit_code(outcome))
            }
            Command::Here { fahrenheit } => {
                let controller = session(fahrenheit)?;
                let outcome = controller.use_current_location().await;
                print_state(&controller);
                Ok(exit_code(outcome))
            }
            Command::Moon { date } => {
                let phase = match date {
                    Some(s) => {
                        let date = NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                            .with_context(|| format!("Invalid date '{s}', expected YYYY-MM-DD"))?;
                        moon_phase_on(date)
                    }
                    None => moon_phase_today(),
                };
                println!("{phase}");
                Ok(ExitCode::SUCCESS)
            }
            Command::Interactive => interactive(session(false)?).await,
        }
    }
}

fn session(fahrenheit: bool) -> anyhow::Result<Controller> {
    let config = Config::load()?;
    let provider = provider_from_config(&config)?;
    let unit = if fahrenheit { UnitPreference::Fahrenheit } else { config.units };

    Ok(Controller::new(provider, Box::new(ConfiguredLocation::from_config(&config))).with_unit(unit))
}

fn print_state(controller: &Controller) {
    let state = controller.state();
    print!("{}", Screen { state: &state, moon: controller.moon_phase() });
}

fn exit_code(outcome: SearchOutcome) -> ExitCode {
    match outcome {
        SearchOutcome::Loaded => ExitCode::SUCCESS,
        SearchOutcome::Failed | SearchOutcome::Superseded => ExitCode::FAILURE,
    }
}

async fn interactive(controller: Controller) -> anyhow::Result<ExitCode> {
    println!("Avast, ye Matey! Ye've found the Deckhand's Weather Charts.");
    println!("Type a port to search, `:units` to swap °C/°F, `:here` fer yer home port, `:quit` to go ashore.");

    loop {
        let line = match Text::new("Where be ye searchin' fer treasure today?")
            .with_placeholder("City, Country")
            .prompt()
        {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err.into()),
        };

        let input = line.trim();
        match input {
            ":quit" | ":q" => break,
            ":units" => {
                let unit = controller.toggle_units();
                tracing::debug!(%unit, "toggled units");
            }
            ":here" => {
                controller.use_current_location().await;
            }
            _ => {
                controller.search(input).await;
            }
        }

        print_state(&controller);
    }

    Ok(ExitCode::SUCCESS)
}

fn configure() -> anyhow::Result<()> {
    let path = Config::config_file_path()?;
    // The file alone, so an API key from the environment is never written to disk.
    let mut config = Config::load_from(&path)?;

    let key = Password::new("OpenWeather API key (leave blank to keep the current one):")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()?;
    if !key.trim().is_empty() {
        config.api_key = Some(key.trim().to_string());
    }

    let options = vec![UnitPreference::Celsius, UnitPreference::Fahrenheit];
    let cursor = options.iter().position(|u| *u == config.units).unwrap_or(0);
    config.units = Select::new("Default units:", options)
        .with_starting_cursor(cursor)
        .prompt()?;

    config.share_location = Confirm::new("Allow `deckhand here` to use yer home location?")
        .with_default(config.share_location)
        .prompt()?;

    if config.share_location
        && Confirm::new("Set home coordinates?")
            .with_default(config.home.is_none())
            .prompt()?
    {
        let latitude = CustomType::<f64>::new("Latitude:").prompt()?;
        let longitude = CustomType::<f64>::new("Longitude:").prompt()?;
        ensure!((-90.0..=90.0).contains(&latitude), "Latitude must be between -90 and 90");
        ensure!((-180.0..=180.0).contains(&longitude), "Longitude must be between -180 and 180");
        config.home = Some(Coordinates { latitude, longitude });
    }

    config.save_to(&path)?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use tracing::info;
use weatherwise_core::{
    CityWeatherView, Config, CoordinateForecastView, Coordinates,
    provider::{current_source_from_config, forecast_source_from_config},
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherwise", version, about = "Current weather by city, forecast by coordinates")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and the default city.
    Configure,

    /// Show current conditions for a city.
    City {
        /// City name; defaults to the configured default city.
        name: Option<String>,

        /// Keep prompting for another city until cancelled (Esc / Ctrl-C).
        #[arg(short, long)]
        interactive: bool,
    },

    /// Show hourly and daily forecast for a point.
    Forecast {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        match self.command {
            Command::Configure => configure(&mut config)?,
            Command::City { name, interactive } => {
                let initial = name.unwrap_or_else(|| config.default_city.clone());
                let view = CityWeatherView::new(current_source_from_config(&config)?, initial);

                view.mount().await;
                print_lines(&view.render());

                if interactive {
                    prompt_loop(&view).await?;
                }
            }
            Command::Forecast { lat, lon } => {
                let view = CoordinateForecastView::new(
                    forecast_source_from_config(&config)?,
                    Coordinates::new(lat, lon),
                );

                view.mount().await;
                print_lines(&view.render());
            }
        }

        Ok(())
    }
}

fn configure(config: &mut Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key.trim().to_string());

    let city = Text::new("Default city:")
        .with_initial_value(&config.default_city)
        .prompt()
        .context("Failed to read default city")?;
    config.set_default_city(&city);

    let path = config.save()?;
    info!(path = %path.display(), "configuration saved");
    println!("Configuration saved to {}", path.display());

    Ok(())
}

/// The text field and "Go" button: edit the city, submit, print, repeat.
async fn prompt_loop(view: &CityWeatherView) -> anyhow::Result<()> {
    loop {
        let city = view.city();
        let input = match Text::new("City:").with_initial_value(&city).prompt() {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read city"),
        };

        view.set_city(input);
        view.submit().await;
        print_lines(&view.render());
    }

    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use outfit_core::{
    Config, Language, Location, RecommendationRequest, RecommendationResult,
    RecommendationService, WeatherQuery, llm, weather,
};
use std::path::PathBuf;

use crate::server::{self, AppState};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "outfit", version, about = "Weather-aware clothing recommendations")]
pub struct Cli {
    /// Path to the config file; defaults to the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store API keys for the chat model and the weather provider.
    Configure,

    /// Run the HTTP API.
    Serve {
        /// Address to listen on, e.g. "0.0.0.0:8080".
        #[arg(long)]
        bind: Option<String>,
    },

    /// Print a recommendation for a city.
    Recommend {
        /// City name, e.g. "Istanbul".
        #[arg(long)]
        city: String,

        /// "male" or "female".
        #[arg(long)]
        gender: String,

        /// "tr" or "en".
        #[arg(long, default_value = "tr")]
        language: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config_path = match self.config {
            Some(path) => path,
            None => Config::config_file_path()?,
        };

        match self.command {
            Command::Configure => configure(&config_path),
            Command::Serve { bind } => {
                let config = load_config(&config_path)?;
                let bind = bind.unwrap_or_else(|| config.server.bind.clone());
                let state = build_state(&config)?;
                server::serve(state, &bind).await
            }
            Command::Recommend { city, gender, language } => {
                let config = load_config(&config_path)?;
                recommend(&config, city, &gender, &language).await
            }
        }
    }
}

fn load_config(path: &std::path::Path) -> anyhow::Result<Config> {
    let mut config = Config::load_from(path)?;
    config.apply_env();
    config.validate()?;
    Ok(config)
}

/// A missing LLM key is fatal; a missing weather key only disables `/api/weather` and `/api/cities`.
fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let llm = llm::chat_model_from_config(config)?;
    let recommendations = RecommendationService::new(llm, config.recommendation_settings());

    let weather = match weather::provider_from_config(config) {
        Ok(provider) => Some(provider),
        Err(err) => {
            tracing::warn!("weather lookup disabled: {err}");
            None
        }
    };

    Ok(AppState { recommendations, weather })
}

fn configure(path: &std::path::Path) -> anyhow::Result<()> {
    let mut config = Config::load_from(path)?;

    let llm_key = prompt_key("OpenAI API key (leave empty to keep current):")?;
    if !llm_key.is_empty() {
        config.upsert_llm_api_key(llm_key);
    }

    let weather_key = prompt_key("OpenWeather API key (leave empty to keep current):")?;
    if !weather_key.is_empty() {
        config.upsert_weather_api_key(weather_key);
    }

    config.save_to(path)?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

fn prompt_key(message: &str) -> anyhow::Result<String> {
    let key = Password::new(message)
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    Ok(key.trim().to_string())
}

async fn recommend(
    config: &Config,
    city: String,
    gender: &str,
    language: &str,
) -> anyhow::Result<()> {
    let state = build_state(config)?;
    let provider = state
        .weather
        .ok_or_else(|| anyhow::anyhow!("Weather lookup needs an OpenWeather API key."))?;

    let query = WeatherQuery {
        location: Location::City(city),
        language: Language::for_messages(Some(language)),
    };
    let weather_data = provider.current_weather(&query).await?;

    let request = RecommendationRequest::new(weather_data, gender, language);
    match state.recommendations.get_recommendation(&request).await {
        RecommendationResult::Success { text } => {
            println!("{text}");
            Ok(())
        }
        RecommendationResult::Failure { error_message, code, .. } => {
            bail!("{error_message} ({code})")
        }
    }
}

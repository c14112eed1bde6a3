use std::{net::SocketAddr, time::Duration};

use clap::Parser;

use crate::error::AggregateError;

pub const DEFAULT_DIRECTIONS_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";
pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

const MISSING_KEY: &str = "Missing Key";

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Route planning backend that merges directions with weather at the destination"
)]
pub struct ServerArgs {
    /// Directions provider credential, also handed to the browser map
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub google_api_key: Option<String>,

    /// Weather provider credential
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub openweather_api_key: Option<String>,

    /// Development mode: verbose logging of upstream calls
    #[arg(long, env = "APP_DEBUG")]
    pub debug: bool,

    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:5000")]
    pub bind: SocketAddr,

    #[arg(long, env = "DIRECTIONS_API_URL", default_value = DEFAULT_DIRECTIONS_URL)]
    pub directions_url: String,

    #[arg(long, env = "WEATHER_API_URL", default_value = DEFAULT_WEATHER_URL)]
    pub weather_url: String,

    /// Timeout applied to each outbound provider call
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = DEFAULT_UPSTREAM_TIMEOUT_SECS)]
    pub upstream_timeout_secs: u64,
}

/// Process configuration, built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub google_api_key: Option<String>,
    pub openweather_api_key: Option<String>,
    pub debug: bool,
    pub directions_url: String,
    pub weather_url: String,
    pub upstream_timeout: Duration,
}

/// Both provider credentials, borrowed from an [`AppConfig`] that has them.
#[derive(Debug, Clone, Copy)]
pub struct Credentials<'a> {
    pub directions_key: &'a str,
    pub weather_key: &'a str,
}

impl AppConfig {
    pub fn credentials(&self) -> Result<Credentials<'_>, AggregateError> {
        let directions_key = self
            .google_api_key
            .as_deref()
            .ok_or_else(|| AggregateError::Config(MISSING_KEY.to_string()))?;
        let weather_key = self
            .openweather_api_key
            .as_deref()
            .ok_or_else(|| AggregateError::Config(MISSING_KEY.to_string()))?;
        Ok(Credentials {
            directions_key,
            weather_key,
        })
    }

    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "backend=debug,tower_http=debug,axum::rejection=trace"
        } else {
            "backend=info,tower_http=info"
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            google_api_key: None,
            openweather_api_key: None,
            debug: false,
            directions_url: DEFAULT_DIRECTIONS_URL.to_string(),
            weather_url: DEFAULT_WEATHER_URL.to_string(),
            upstream_timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        }
    }
}

impl From<&ServerArgs> for AppConfig {
    fn from(args: &ServerArgs) -> Self {
        Self {
            google_api_key: non_empty(args.google_api_key.as_deref()),
            openweather_api_key: non_empty(args.openweather_api_key.as_deref()),
            debug: args.debug,
            directions_url: args.directions_url.clone(),
            weather_url: args.weather_url.clone(),
            upstream_timeout: Duration::from_secs(args.upstream_timeout_secs),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

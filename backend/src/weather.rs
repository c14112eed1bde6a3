//! Current-conditions client for the OpenWeather "weather" endpoint.

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::instrument;

use crate::directions::LatLng;
use crate::error::AggregateError;
use crate::models::WeatherInfo;

const UNITS: &str = "imperial";
const WEATHER_FAILURE_MESSAGE: &str = "Unable to fetch weather data";

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherResponse {
    pub main: MainReadings,
    pub weather: Vec<Condition>,
    pub wind: Wind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Condition {
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Wind {
    pub speed: f64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl WeatherResponse {
    pub fn into_weather_info(self) -> Result<WeatherInfo, AggregateError> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| AggregateError::Server("weather response has no conditions".into()))?;

        Ok(WeatherInfo {
            temperature: round_half_even(self.main.temp),
            feels_like: round_half_even(self.main.feels_like),
            description: title_case(&condition.description),
            icon: condition.icon,
            humidity: self.main.humidity,
            wind_speed: round_half_even(self.wind.speed),
        })
    }
}

/// Rounds to the nearest integer, sending exact halves to the even neighbour.
pub fn round_half_even(value: f64) -> i64 {
    value.round_ties_even() as i64
}

/// Upper-cases the first letter of every run of letters and lower-cases the
/// rest, so `"light RAIN"` becomes `"Light Rain"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    base_url: String,
}

impl WeatherClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Fetches current conditions at `location`. A non-200 answer becomes an
    /// upstream error carrying the provider's message.
    #[instrument(skip_all, fields(lat = location.lat, lon = location.lng))]
    pub async fn fetch(&self, location: LatLng, api_key: &str) -> Result<WeatherInfo, AggregateError> {
        tracing::debug!("requesting weather from {}", self.base_url);
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("lat", location.lat.to_string()),
                ("lon", location.lng.to_string()),
                ("appid", api_key.to_string()),
                ("units", UNITS.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if status != StatusCode::OK {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| WEATHER_FAILURE_MESSAGE.to_string());
            tracing::debug!(%status, "weather provider reported failure");
            return Err(AggregateError::Upstream(format!("Weather API error: {message}")));
        }

        let parsed: WeatherResponse = serde_json::from_slice(&body)?;
        parsed.into_weather_info()
    }
}

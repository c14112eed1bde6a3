use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Driving,
    Transit,
    Walking,
    Bicycling,
}

impl TravelMode {
    pub const ALL: [TravelMode; 4] = [
        TravelMode::Driving,
        TravelMode::Transit,
        TravelMode::Walking,
        TravelMode::Bicycling,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Transit => "transit",
            TravelMode::Walking => "walking",
            TravelMode::Bicycling => "bicycling",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTravelMode(pub String);

impl fmt::Display for UnknownTravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown travel mode {:?}", self.0)
    }
}

impl std::error::Error for UnknownTravelMode {}

/// Matching is exact: `"Driving"` is not a travel mode.
impl FromStr for TravelMode {
    type Err = UnknownTravelMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TravelMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| UnknownTravelMode(s.to_string()))
    }
}

/// Body of `POST /api/route-weather` as sent by the browser.
///
/// Every field is optional on the wire; the backend decides what is missing
/// or invalid so that it can answer with a structured error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteWeatherRequest {
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    /// `None` when the key is absent, `Some(None)` when it is sent as `null`.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub mode: Option<Option<String>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitStep {
    pub line: String,
    pub vehicle: String,
    pub departure: String,
    pub arrival: String,
    pub num_stops: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteInfo {
    pub distance: String,
    pub duration: String,
    pub start_address: String,
    pub end_address: String,
    pub overview_polyline: String,
    pub mode: TravelMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transit_details: Option<Vec<TransitStep>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherInfo {
    /// Degrees Fahrenheit.
    pub temperature: i64,
    pub feels_like: i64,
    pub description: String,
    pub icon: String,
    /// Percent.
    pub humidity: i64,
    /// Miles per hour.
    pub wind_speed: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteWeatherResponse {
    pub route: RouteInfo,
    pub weather: WeatherInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleKeyResponse {
    pub key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

pub use shared::{
    RouteInfo, RouteWeatherRequest, RouteWeatherResponse, TransitStep, TravelMode, WeatherInfo,
};

use crate::error::AggregateError;

/// A request whose origin and destination are present and whose mode is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub origin: String,
    pub destination: String,
    pub mode: TravelMode,
}

impl TryFrom<RouteWeatherRequest> for ValidatedRequest {
    type Error = AggregateError;

    fn try_from(req: RouteWeatherRequest) -> Result<Self, Self::Error> {
        let (origin, destination) = match (req.origin, req.destination) {
            (Some(origin), Some(destination)) if !origin.is_empty() && !destination.is_empty() => {
                (origin, destination)
            }
            _ => {
                return Err(AggregateError::Validation(
                    "Origin and destination are required".to_string(),
                ));
            }
        };

        let mode = match req.mode {
            None => TravelMode::default(),
            Some(raw) => raw
                .as_deref()
                .and_then(|raw| raw.parse().ok())
                .ok_or_else(|| AggregateError::Validation("Invalid travel mode".to_string()))?,
        };

        Ok(Self {
            origin,
            destination,
            mode,
        })
    }
}

use std::sync::Arc;

use crate::config::AppConfig;
use crate::directions::{DirectionsClient, PlannedLeg};
use crate::error::AggregateError;
use crate::models::{RouteInfo, RouteWeatherRequest, RouteWeatherResponse, TravelMode, ValidatedRequest};
use crate::transit::extract_transit_details;
use crate::weather::WeatherClient;

/// Looks up a route, then the current weather where that route ends.
///
/// The two provider calls are sequential: the weather lookup needs the
/// destination coordinate from the directions answer. Nothing is cached or
/// retried; either both calls succeed or the request fails.
#[derive(Debug, Clone)]
pub struct RouteWeatherAggregator {
    config: Arc<AppConfig>,
    directions: DirectionsClient,
    weather: WeatherClient,
}

impl RouteWeatherAggregator {
    pub fn new(config: Arc<AppConfig>) -> Result<Self, AggregateError> {
        let client = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .build()?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: Arc<AppConfig>, client: reqwest::Client) -> Self {
        let directions = DirectionsClient::new(client.clone(), config.directions_url.clone());
        let weather = WeatherClient::new(client, config.weather_url.clone());
        Self {
            config,
            directions,
            weather,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub async fn aggregate(
        &self,
        request: RouteWeatherRequest,
    ) -> Result<RouteWeatherResponse, AggregateError> {
        let request = ValidatedRequest::try_from(request)?;
        let creds = self.config.credentials()?;

        tracing::info!(
            origin = %request.origin,
            destination = %request.destination,
            mode = %request.mode,
            "route-weather request"
        );

        let planned = self
            .directions
            .fetch(&request, creds)
            .await?
            .into_planned_leg()?;
        let destination = planned.leg.end_location;
        let weather = self.weather.fetch(destination, creds.weather_key).await?;

        Ok(RouteWeatherResponse {
            route: shape_route(planned, request.mode)?,
            weather,
        })
    }
}

fn shape_route(planned: PlannedLeg, mode: TravelMode) -> Result<RouteInfo, AggregateError> {
    let PlannedLeg {
        leg,
        overview_polyline,
    } = planned;

    let transit_details = match mode {
        TravelMode::Transit => {
            Some(extract_transit_details(&leg.steps)?).filter(|found| !found.is_empty())
        }
        _ => None,
    };

    Ok(RouteInfo {
        distance: leg.distance.text,
        duration: leg.duration.text,
        start_address: leg.start_address,
        end_address: leg.end_address,
        overview_polyline,
        mode,
        transit_details,
    })
}

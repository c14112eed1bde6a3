//! Directions provider client.
//!
//! The provider speaks the Google Directions JSON format. Only the fields the
//! backend reads are modelled; everything else in the payload is ignored.

use serde::Deserialize;
use tracing::instrument;

use crate::config::Credentials;
use crate::error::AggregateError;
use crate::models::ValidatedRequest;

const STATUS_OK: &str = "OK";
const NO_ROUTE_MESSAGE: &str = "Unable to find route";

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Route {
    pub legs: Vec<Leg>,
    pub overview_polyline: Polyline,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Polyline {
    pub points: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextValue {
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Leg {
    pub distance: TextValue,
    pub duration: TextValue,
    pub start_address: String,
    pub end_address: String,
    pub end_location: LatLng,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One instruction of a leg. A step may wrap finer-grained sub-steps of the
/// same shape, to any depth.
///
/// Transit details stay raw until a transit route reads them, so a partial
/// object never fails a driving, walking or cycling lookup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub transit_details: Option<serde_json::Value>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Step {
    pub fn transit(&self) -> Option<Result<TransitDetails, serde_json::Error>> {
        self.transit_details
            .as_ref()
            .map(TransitDetails::deserialize)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransitDetails {
    pub line: TransitLine,
    pub departure_stop: TransitStop,
    pub arrival_stop: TransitStop,
    pub num_stops: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransitLine {
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub vehicle: Vehicle,
}

impl TransitLine {
    /// Short name when the provider gives one, else the long name.
    pub fn display_name(&self) -> &str {
        self.short_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Vehicle {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransitStop {
    pub name: String,
}

/// The part of a directions answer the backend uses: the first leg of the
/// first route, plus that route's encoded path.
#[derive(Debug, Clone)]
pub struct PlannedLeg {
    pub leg: Leg,
    pub overview_polyline: String,
}

impl DirectionsResponse {
    pub fn into_planned_leg(self) -> Result<PlannedLeg, AggregateError> {
        if self.status.as_deref() != Some(STATUS_OK) {
            tracing::debug!(
                status = self.status.as_deref().unwrap_or("<missing>"),
                "directions provider reported failure"
            );
            return Err(AggregateError::Upstream(
                self.error_message
                    .unwrap_or_else(|| NO_ROUTE_MESSAGE.to_string()),
            ));
        }

        let route = self
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| AggregateError::Server("directions response has no routes".into()))?;
        let leg = route
            .legs
            .into_iter()
            .next()
            .ok_or_else(|| AggregateError::Server("directions route has no legs".into()))?;

        Ok(PlannedLeg {
            leg,
            overview_polyline: route.overview_polyline.points,
        })
    }
}

#[derive(Debug, Clone)]
pub struct DirectionsClient {
    client: reqwest::Client,
    base_url: String,
}

impl DirectionsClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    #[instrument(skip_all, fields(origin = %req.origin, destination = %req.destination, mode = %req.mode))]
    pub async fn fetch(
        &self,
        req: &ValidatedRequest,
        creds: Credentials<'_>,
    ) -> Result<DirectionsResponse, AggregateError> {
        tracing::debug!("requesting directions from {}", self.base_url);
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("origin", req.origin.as_str()),
                ("destination", req.destination.as_str()),
                ("key", creds.directions_key),
                ("mode", req.mode.as_str()),
            ])
            .send()
            .await?;
        tracing::debug!("directions provider answered {}", response.status());

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

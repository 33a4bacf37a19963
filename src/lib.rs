//! # Rust GDS Flights
//!
//! Low-fare flight shopping against a GDS REST endpoint. A search posts one
//! shop request and flattens the grouped itinerary response into a short list
//! of [`FlatSummary`] records (airline, flight number, cabin, price).
//!
//! The flattener works on any already-deserialized response and has no
//! knowledge of transport or credentials:
//!
//! ```rust
//! use rust_gds_flights::flatten;
//! use serde_json::json;
//!
//! let summaries = flatten(&json!({}));
//! assert!(summaries.is_empty());
//! ```

pub mod client;
pub mod flatten;
pub mod report;
pub mod request;
pub mod response;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export main types for convenience
pub use client::{ShopClient, ShopConfig};
pub use flatten::{
    flatten, flatten_outcomes, flatten_with_report, FlattenReport, ItineraryOutcome, SkipReason,
};
pub use report::{render_table, to_json_pretty, write_json};
pub use request::ShopRequest;

/// Error types for the flights library
#[derive(Error, Debug)]
pub enum FlightError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Missing configuration: {0} must be set")]
    MissingConfig(String),

    #[error("Invalid location code: {0}")]
    InvalidLocation(String),

    #[error("Invalid date format: {0}")]
    DateParseError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Flat, display-ready summary of one itinerary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatSummary {
    pub airline: String,
    pub flight_number: String,
    pub seat_class: String,
    /// Total price followed by the currency code, e.g. `"250 USD"`
    pub price: String,
}

/// One-way search parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub adults: u32,
}

impl SearchRequest {
    /// Build a request for one adult, validating both location codes and the date
    pub fn new(origin: &str, destination: &str, date: &str) -> Result<Self, FlightError> {
        Ok(Self {
            origin: request::normalize_location(origin)?,
            destination: request::normalize_location(destination)?,
            departure_date: parse_date(date)?,
            adults: 1,
        })
    }

    pub fn with_adults(mut self, adults: u32) -> Result<Self, FlightError> {
        if adults == 0 {
            return Err(FlightError::InvalidRequest(
                "at least one adult passenger is required".to_string(),
            ));
        }
        self.adults = adults;
        Ok(self)
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(date: &str) -> Result<NaiveDate, FlightError> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|e| FlightError::DateParseError(format!("{}: {}", date, e)))
}

/// Search flights with credentials taken from the environment
pub async fn search_flights(request: &SearchRequest) -> Result<Vec<FlatSummary>, FlightError> {
    let client = ShopClient::new(ShopConfig::from_env()?)?;
    client.search(request).await
}

//! Low-fare search request payload

use crate::{FlightError, SearchRequest};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

pub const REQUEST_VERSION: &str = "6.8.0";
pub const REQUEST_TYPE: &str = "50ITINS";
const ADULT_PASSENGER_CODE: &str = "ADT";

fn location_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z]{3}$").expect("valid location regex"))
}

/// Uppercase and validate a three-letter airport or city code
pub fn normalize_location(code: &str) -> Result<String, FlightError> {
    let code = code.trim().to_uppercase();
    if location_pattern().is_match(&code) {
        Ok(code)
    } else {
        Err(FlightError::InvalidLocation(code))
    }
}

/// Body of `POST v5/offers/shop`
#[derive(Debug, Clone, Serialize)]
pub struct ShopRequest {
    #[serde(rename = "OTA_AirLowFareSearchRQ")]
    pub search: AirLowFareSearchRq,
    pub mode: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AirLowFareSearchRq {
    pub version: String,
    #[serde(rename = "POS")]
    pub pos: PointOfSale,
    pub origin_destination_information: Vec<OriginDestinationInformation>,
    pub traveler_info_summary: TravelerInfoSummary,
    #[serde(rename = "TPA_Extensions")]
    pub tpa_extensions: TpaExtensions,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PointOfSale {
    pub source: Vec<Source>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Source {
    pub pseudo_city_code: String,
    #[serde(rename = "RequestorID")]
    pub requestor_id: RequestorId,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RequestorId {
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "ID")]
    pub id: String,
    pub company_name: CompanyName,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyName {
    #[serde(rename = "Code")]
    pub code: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OriginDestinationInformation {
    pub departure_date_time: String,
    pub origin_location: Location,
    pub destination_location: Location,
}

#[derive(Debug, Clone, Serialize)]
pub struct Location {
    #[serde(rename = "LocationCode")]
    pub location_code: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TravelerInfoSummary {
    pub air_traveler_avail: Vec<AirTravelerAvail>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AirTravelerAvail {
    pub passenger_type_quantity: Vec<PassengerTypeQuantity>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PassengerTypeQuantity {
    pub code: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TpaExtensions {
    pub intelli_sell_transaction: IntelliSellTransaction,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct IntelliSellTransaction {
    pub request_type: RequestType,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestType {
    #[serde(rename = "Name")]
    pub name: String,
}

impl ShopRequest {
    /// Build the payload for a one-way search from the given pseudo-city
    pub fn new(search: &SearchRequest, pseudo_city_code: &str) -> Self {
        let departure_date_time = format!("{}T00:00:00", search.departure_date.format("%Y-%m-%d"));

        Self {
            search: AirLowFareSearchRq {
                version: REQUEST_VERSION.to_string(),
                pos: PointOfSale {
                    source: vec![Source {
                        pseudo_city_code: pseudo_city_code.to_string(),
                        requestor_id: RequestorId {
                            kind: "1".to_string(),
                            id: "1".to_string(),
                            company_name: CompanyName {
                                code: "TN".to_string(),
                            },
                        },
                    }],
                },
                origin_destination_information: vec![OriginDestinationInformation {
                    departure_date_time,
                    origin_location: Location {
                        location_code: search.origin.clone(),
                    },
                    destination_location: Location {
                        location_code: search.destination.clone(),
                    },
                }],
                traveler_info_summary: TravelerInfoSummary {
                    air_traveler_avail: vec![AirTravelerAvail {
                        passenger_type_quantity: vec![PassengerTypeQuantity {
                            code: ADULT_PASSENGER_CODE.to_string(),
                            quantity: search.adults,
                        }],
                    }],
                },
                tpa_extensions: TpaExtensions {
                    intelli_sell_transaction: IntelliSellTransaction {
                        request_type: RequestType {
                            name: REQUEST_TYPE.to_string(),
                        },
                    },
                },
            },
            mode: "live".to_string(),
        }
    }
}

//! Field access into the grouped itinerary shop response
//!
//! The upstream document is large and loosely shaped, and only a handful of
//! paths in it are ever read: the first leg reference of an itinerary, the
//! first schedule reference of a leg, the carrier of a schedule and the fare
//! of the first pricing entry. Each of those is read through a JSON pointer on
//! the raw `serde_json::Value`, so nothing outside those paths can make an
//! entry unreadable.

use serde_json::Value;
use std::fmt;

/// Top-level field holding the three collections
pub const GROUPED_RESPONSE_FIELD: &str = "groupedItineraryResponse";
pub const LEG_DESCS_FIELD: &str = "legDescs";
pub const SCHEDULE_DESCS_FIELD: &str = "scheduleDescs";
pub const ITINERARY_GROUPS_FIELD: &str = "itineraryGroups";

const ID_POINTER: &str = "/id";
const FIRST_LEG_REF_POINTER: &str = "/legs/0/ref";
const FIRST_SCHEDULE_REF_POINTER: &str = "/schedules/0/ref";
const OPERATING_CARRIER_POINTER: &str = "/carrier/operating";
const FLIGHT_NUMBER_POINTER: &str = "/carrier/marketingFlightNumber";

const CABIN_CODE_POINTER: &str = "/pricingInformation/0/fare/passengerInfoList/0/passengerInfo/fareComponents/0/segments/0/segment/cabinCode";
const TOTAL_PRICE_POINTER: &str = "/pricingInformation/0/fare/totalFare/totalPrice";
const CURRENCY_POINTER: &str = "/pricingInformation/0/fare/totalFare/currency";

/// A JSON string or number. Ids, flight numbers and prices show up as either.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl Scalar {
    /// `None` for anything that is not a string or a number
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Scalar::Text(s.clone())),
            Value::Number(n) => Some(Scalar::Number(n.clone())),
            _ => None,
        }
    }

    /// Empty strings count as missing
    pub fn non_empty(self) -> Option<Self> {
        match &self {
            Scalar::Text(s) if s.is_empty() => None,
            _ => Some(self),
        }
    }

    /// Lookup key; `1` and `"1"` land on the same key
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => write!(f, "{}", s),
            Scalar::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    return write!(f, "{}", n);
                }
                match n.as_f64() {
                    // 250.0 prints as 250
                    Some(x) if x.fract() == 0.0 && x.abs() < 1e15 => write!(f, "{}", x as i64),
                    Some(x) => write!(f, "{}", x),
                    None => write!(f, "{}", n),
                }
            }
        }
    }
}

/// Non-empty string or number at `pointer`
fn scalar_at(value: &Value, pointer: &str) -> Option<Scalar> {
    value
        .pointer(pointer)
        .and_then(Scalar::from_value)
        .and_then(Scalar::non_empty)
}

/// Lookup key of a leg or schedule descriptor
pub fn descriptor_id(descriptor: &Value) -> Option<String> {
    scalar_at(descriptor, ID_POINTER).map(|id| id.key())
}

/// Key of the leg referenced by the first entry of `itinerary.legs`
pub fn first_leg_ref(itinerary: &Value) -> Option<String> {
    scalar_at(itinerary, FIRST_LEG_REF_POINTER).map(|r| r.key())
}

/// Key of the schedule referenced by the first entry of `leg.schedules`
pub fn first_schedule_ref(leg: &Value) -> Option<String> {
    scalar_at(leg, FIRST_SCHEDULE_REF_POINTER).map(|r| r.key())
}

/// Operating airline and marketing flight number of a schedule descriptor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarrierSummary {
    pub operating: Option<Scalar>,
    pub marketing_flight_number: Option<Scalar>,
}

impl CarrierSummary {
    pub fn from_schedule(schedule: &Value) -> Self {
        Self {
            operating: scalar_at(schedule, OPERATING_CARRIER_POINTER),
            marketing_flight_number: scalar_at(schedule, FLIGHT_NUMBER_POINTER),
        }
    }
}

/// Cabin and total fare of the first pricing entry of an itinerary.
///
/// Each field is `None` when any link of its path is missing, null, empty or
/// of the wrong shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FareSummary {
    pub cabin_code: Option<Scalar>,
    pub total_price: Option<Scalar>,
    pub currency: Option<Scalar>,
}

impl FareSummary {
    pub fn from_itinerary(itinerary: &Value) -> Self {
        Self {
            cabin_code: scalar_at(itinerary, CABIN_CODE_POINTER),
            total_price: scalar_at(itinerary, TOTAL_PRICE_POINTER),
            currency: scalar_at(itinerary, CURRENCY_POINTER),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scalar(value: Value) -> Scalar {
        Scalar::from_value(&value).unwrap()
    }

    #[test]
    fn test_scalar_display() {
        assert_eq!(scalar(json!("100")).to_string(), "100");
        assert_eq!(scalar(json!(250)).to_string(), "250");
        assert_eq!(scalar(json!(250.0)).to_string(), "250");
        assert_eq!(scalar(json!(199.99)).to_string(), "199.99");
    }

    #[test]
    fn test_scalar_rejects_objects() {
        assert!(Scalar::from_value(&json!({"a": 1})).is_none());
        assert!(Scalar::from_value(&json!(true)).is_none());
        assert!(Scalar::from_value(&json!(null)).is_none());
    }

    #[test]
    fn test_numeric_and_text_ids_share_key() {
        assert_eq!(descriptor_id(&json!({"id": 7})), descriptor_id(&json!({"id": "7"})));
        assert!(descriptor_id(&json!({"id": {"nested": true}})).is_none());
        assert!(descriptor_id(&json!({"id": ""})).is_none());
        assert!(descriptor_id(&json!("junk")).is_none());
    }

    #[test]
    fn test_first_references_ignore_later_entries() {
        let itinerary = json!({"id": {"seq": 1}, "legs": [{"ref": "L1"}, null, 42]});
        assert_eq!(first_leg_ref(&itinerary), Some("L1".to_string()));

        let leg = json!({"id": "L1", "schedules": [{"ref": 3}, {"ref": {"x": 1}}]});
        assert_eq!(first_schedule_ref(&leg), Some("3".to_string()));

        assert!(first_leg_ref(&json!({"legs": "oops"})).is_none());
        assert!(first_schedule_ref(&json!({"schedules": []})).is_none());
    }

    #[test]
    fn test_carrier_summary() {
        let carrier = CarrierSummary::from_schedule(&json!({
            "id": "S1",
            "carrier": {"operating": "AA", "marketingFlightNumber": {"n": 100}}
        }));
        assert_eq!(carrier.operating, Some(Scalar::Text("AA".to_string())));
        assert!(carrier.marketing_flight_number.is_none());

        assert_eq!(CarrierSummary::from_schedule(&json!({"id": "S1"})), CarrierSummary::default());
    }

    #[test]
    fn test_fare_summary_full_path() {
        let itinerary = json!({
            "pricingInformation": [{
                "fare": {
                    "totalFare": {"totalPrice": 412.3, "currency": "EUR"},
                    "passengerInfoList": [{
                        "passengerInfo": {
                            "fareComponents": [{"segments": [{"segment": {"cabinCode": "J"}}]}]
                        }
                    }]
                }
            }]
        });

        let fare = FareSummary::from_itinerary(&itinerary);
        assert_eq!(fare.cabin_code.map(|c| c.to_string()), Some("J".to_string()));
        assert_eq!(fare.total_price.map(|p| p.to_string()), Some("412.3".to_string()));
        assert_eq!(fare.currency.map(|c| c.to_string()), Some("EUR".to_string()));
    }

    #[test]
    fn test_fare_summary_tolerates_missing_links() {
        assert_eq!(FareSummary::from_itinerary(&json!({})), FareSummary::default());

        let broken = json!({"pricingInformation": [{"fare": "not-an-object"}]});
        assert_eq!(FareSummary::from_itinerary(&broken), FareSummary::default());

        let empty_cabin = json!({
            "pricingInformation": [{
                "fare": {
                    "passengerInfoList": [{
                        "passengerInfo": {
                            "fareComponents": [{"segments": [{"segment": {"cabinCode": ""}}]}]
                        }
                    }]
                }
            }]
        });
        assert!(FareSummary::from_itinerary(&empty_cabin).cabin_code.is_none());
    }
}

//! Itinerary flattening
//!
//! Turns a grouped itinerary shop response into one [`FlatSummary`] per
//! itinerary of the first itinerary group. Leg and schedule descriptors are
//! indexed by id up front, then each itinerary is resolved on its own: a
//! dangling reference or malformed entry drops that itinerary only.
//!
//! Only the first itinerary group, the first leg of each itinerary, the first
//! schedule of that leg and the first passenger/fare component/segment of the
//! first pricing entry are consulted. Connecting flights and additional
//! passengers are not reconstructed.

use crate::response::{
    descriptor_id, first_leg_ref, first_schedule_ref, CarrierSummary, FareSummary, Scalar,
    GROUPED_RESPONSE_FIELD, ITINERARY_GROUPS_FIELD, LEG_DESCS_FIELD, SCHEDULE_DESCS_FIELD,
};
use crate::FlatSummary;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const MISSING_FIELD: &str = "N/A";
pub const DEFAULT_PRICE: &str = "0";
pub const DEFAULT_CURRENCY: &str = "USD";

/// Why an itinerary was left out of the result
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkipReason {
    #[error("itinerary has no leg reference")]
    MissingLegRef,

    #[error("leg {0} not found in legDescs")]
    UnknownLeg(String),

    #[error("leg has no schedule reference")]
    MissingScheduleRef,

    #[error("schedule {0} not found in scheduleDescs")]
    UnknownSchedule(String),
}

/// Result of flattening a single itinerary
#[derive(Debug, Clone, PartialEq)]
pub enum ItineraryOutcome {
    Parsed(FlatSummary),
    Skipped(SkipReason),
}

impl ItineraryOutcome {
    pub fn summary(self) -> Option<FlatSummary> {
        match self {
            ItineraryOutcome::Parsed(summary) => Some(summary),
            ItineraryOutcome::Skipped(_) => None,
        }
    }
}

/// Parsed summaries together with the number of itineraries that were dropped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlattenReport {
    pub summaries: Vec<FlatSummary>,
    pub skipped: usize,
}

/// Leg and schedule descriptors keyed by id, borrowed from the response.
///
/// Built by folding over the source lists, so when two descriptors share an
/// id the later one wins. Descriptors without a string or numeric `id` are
/// left out. Nothing else in a descriptor is looked at here.
#[derive(Debug, Default)]
pub struct LookupTables<'a> {
    pub legs_by_id: HashMap<String, &'a Value>,
    pub schedules_by_id: HashMap<String, &'a Value>,
}

impl<'a> LookupTables<'a> {
    pub fn build(leg_descs: &'a [Value], schedule_descs: &'a [Value]) -> Self {
        Self {
            legs_by_id: index_by_id(leg_descs, LEG_DESCS_FIELD),
            schedules_by_id: index_by_id(schedule_descs, SCHEDULE_DESCS_FIELD),
        }
    }
}

fn index_by_id<'a>(entries: &'a [Value], collection: &str) -> HashMap<String, &'a Value> {
    entries
        .iter()
        .enumerate()
        .fold(HashMap::with_capacity(entries.len()), |mut acc, (i, entry)| {
            match descriptor_id(entry) {
                Some(id) => {
                    acc.insert(id, entry);
                }
                None => {
                    debug!(collection, index = i, "Ignoring descriptor without id");
                }
            }
            acc
        })
}

/// Flatten a shop response into summaries, dropping itineraries that cannot be resolved.
///
/// Never fails and never touches the input; degraded input shows up as a
/// shorter (possibly empty) result and log lines.
pub fn flatten(document: &Value) -> Vec<FlatSummary> {
    flatten_outcomes(document)
        .into_iter()
        .filter_map(ItineraryOutcome::summary)
        .collect()
}

/// Same as [`flatten`], also counting the dropped itineraries
pub fn flatten_with_report(document: &Value) -> FlattenReport {
    flatten_outcomes(document)
        .into_iter()
        .fold(FlattenReport::default(), |mut report, outcome| {
            match outcome {
                ItineraryOutcome::Parsed(summary) => report.summaries.push(summary),
                ItineraryOutcome::Skipped(_) => report.skipped += 1,
            }
            report
        })
}

/// One outcome per itinerary of the first itinerary group, in input order
pub fn flatten_outcomes(document: &Value) -> Vec<ItineraryOutcome> {
    let Some(response) = document.get(GROUPED_RESPONSE_FIELD) else {
        info!("No flight data found in the response");
        return Vec::new();
    };

    let collection = |field: &str| response.get(field).and_then(Value::as_array);
    let (Some(leg_descs), Some(schedule_descs), Some(groups)) = (
        collection(LEG_DESCS_FIELD),
        collection(SCHEDULE_DESCS_FIELD),
        collection(ITINERARY_GROUPS_FIELD),
    ) else {
        info!("Response is missing legDescs, scheduleDescs or itineraryGroups");
        return Vec::new();
    };

    let Some(first_group) = groups.first() else {
        info!("Response contains no itinerary groups");
        return Vec::new();
    };

    let Some(itineraries) = first_group.get("itineraries").and_then(Value::as_array) else {
        info!("First itinerary group has no itineraries");
        return Vec::new();
    };

    let tables = LookupTables::build(leg_descs, schedule_descs);
    debug!(
        legs = tables.legs_by_id.len(),
        schedules = tables.schedules_by_id.len(),
        itineraries = itineraries.len(),
        "Built descriptor lookup tables"
    );

    itineraries
        .iter()
        .enumerate()
        .map(|(index, itinerary)| {
            let outcome = flatten_itinerary(itinerary, &tables);
            if let ItineraryOutcome::Skipped(reason) = &outcome {
                warn!(index, reason = %reason, "Could not parse itinerary, skipping");
            }
            outcome
        })
        .collect()
}

/// Resolve a single itinerary against the lookup tables
pub fn flatten_itinerary(itinerary: &Value, tables: &LookupTables<'_>) -> ItineraryOutcome {
    match resolve(itinerary, tables) {
        Ok(summary) => ItineraryOutcome::Parsed(summary),
        Err(reason) => ItineraryOutcome::Skipped(reason),
    }
}

fn resolve(itinerary: &Value, tables: &LookupTables<'_>) -> Result<FlatSummary, SkipReason> {
    let leg_ref = first_leg_ref(itinerary).ok_or(SkipReason::MissingLegRef)?;
    let leg = *tables
        .legs_by_id
        .get(&leg_ref)
        .ok_or(SkipReason::UnknownLeg(leg_ref))?;

    let schedule_ref = first_schedule_ref(leg).ok_or(SkipReason::MissingScheduleRef)?;
    let schedule = *tables
        .schedules_by_id
        .get(&schedule_ref)
        .ok_or(SkipReason::UnknownSchedule(schedule_ref))?;

    let text_or_default = |field: Option<Scalar>| {
        field
            .map(|s| s.to_string())
            .unwrap_or_else(|| MISSING_FIELD.to_string())
    };
    let carrier = CarrierSummary::from_schedule(schedule);
    let airline = text_or_default(carrier.operating);
    let flight_number = text_or_default(carrier.marketing_flight_number);

    let fare = FareSummary::from_itinerary(itinerary);
    let seat_class = fare
        .cabin_code
        .map(|c| c.to_string())
        .unwrap_or_else(|| MISSING_FIELD.to_string());
    let total_price = fare
        .total_price
        .map(|p| p.to_string())
        .unwrap_or_else(|| DEFAULT_PRICE.to_string());
    let currency = fare
        .currency
        .map(|c| c.to_string())
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    Ok(FlatSummary {
        airline,
        flight_number,
        seat_class,
        price: format!("{} {}", total_price, currency),
    })
}

//! Fuel consumption models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{field_matches, Shift};

/// Fuel burned for a batch, in liters
///
/// References a surge-bunker batch by serial number and batch code for
/// context only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FuelConsumption {
    pub id: String,
    /// Sequential code, e.g. "FC-001"
    pub fuel_serial_no: String,
    pub serial_no: String,
    pub product_name: String,
    pub batch_code: String,
    pub date: NaiveDate,
    pub shift: Shift,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub fuel_used: Decimal,
    pub supervisor_name: String,
    pub remarks: String,
}

impl FuelConsumption {
    pub fn matches_query(&self, normalized_query: &str) -> bool {
        field_matches(&self.serial_no, normalized_query)
            || field_matches(&self.product_name, normalized_query)
            || field_matches(&self.batch_code, normalized_query)
            || field_matches(&self.fuel_serial_no, normalized_query)
    }
}

//! Cost overlay for production reports

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::lenient_number;

/// Costs recorded against one batch of a plan
///
/// Keyed by `(serial_no, batch_code)`; saving again replaces the record.
/// `total_qty` is captured when the record is saved and not refreshed later.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CostRecord {
    pub id: String,
    pub serial_no: String,
    pub batch_code: String,
    #[serde(default, deserialize_with = "lenient_number::deserialize")]
    pub rm_cost: Decimal,
    #[serde(default, deserialize_with = "lenient_number::deserialize")]
    pub fuel_cost: Decimal,
    #[serde(default, deserialize_with = "lenient_number::deserialize")]
    pub pmt_cost: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub total_qty: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl CostRecord {
    pub fn matches_key(&self, serial_no: &str, batch_code: &str) -> bool {
        self.serial_no == serial_no && self.batch_code == batch_code
    }

    /// RM + fuel + PMT; `None` when the sum does not fit in a `Decimal`
    pub fn total_cost(&self) -> Option<Decimal> {
        self.rm_cost
            .checked_add(self.fuel_cost)?
            .checked_add(self.pmt_cost)
    }

    /// Total cost allocated per MT of output
    ///
    /// `None` when no quantity was recorded or the quotient is out of range.
    pub fn cost_per_mt(&self) -> Option<Decimal> {
        self.total_cost()?.checked_div(self.total_qty)
    }
}

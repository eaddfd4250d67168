//! Finished good models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::PptReading;
use crate::types::Shift;

/// Closure record of a batch, derived from a consumed PPT reading
///
/// The reading's raw stock detail is not carried forward.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinishedGood {
    pub id: String,
    pub ppt_reading_id: String,
    pub serial_no: String,
    pub product_name: String,
    /// Closing date
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub target_qty: Decimal,
    #[serde(with = "crate::types::lenient_number")]
    pub total_stock: Decimal,
    pub semi_finished_product_name: String,
    pub semi_finished_product_name2: String,
    pub shift: Shift,
    pub supervisor_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_code: Option<String>,
}

impl FinishedGood {
    /// Build the closure record for `reading`; `total_stock` is copied as is
    pub fn from_reading(
        id: String,
        reading: &PptReading,
        date: NaiveDate,
        shift: Shift,
        supervisor_name: String,
    ) -> Self {
        Self {
            id,
            ppt_reading_id: reading.id.clone(),
            serial_no: reading.serial_no.clone(),
            product_name: reading.product_name.clone(),
            date,
            target_qty: reading.target_qty,
            total_stock: reading.total_stock,
            semi_finished_product_name: reading.semi_finished_product_name.clone(),
            semi_finished_product_name2: reading.semi_finished_product_name2.clone(),
            shift,
            supervisor_name,
            batch_code: reading.batch_code.clone(),
        }
    }
}

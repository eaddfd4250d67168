//! PPT (in-process) reading models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Shift, StockDetail};

/// An in-process reading of a surge-bunker batch, queued for finishing
///
/// Removed from its collection when the batch is finished.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PptReading {
    pub id: String,
    pub surge_bunker_id: String,
    pub serial_no: String,
    pub product_name: String,
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub target_qty: Decimal,
    #[serde(with = "crate::types::lenient_number")]
    pub total_stock: Decimal,
    pub semi_finished_product_name: String,
    pub shift: Shift,
    pub shift_manager_name: String,
    pub rm1_stock: StockDetail,
    pub rm2_stock: StockDetail,
    pub rm3_stock: StockDetail,
    pub semi_finished_product_name2: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rm1_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rm2_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rm3_name: Option<String>,
}

impl PptReading {
    pub fn has_batch_code(&self, batch_code: &str) -> bool {
        self.batch_code.as_deref() == Some(batch_code)
    }
}

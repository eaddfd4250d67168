//! Surge bunker processing models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{calculate_total_stock, Shift, StockDetail};

/// One processing event (batch) of a composition plan
///
/// Linked to its plan by `plan_id`, but joined everywhere else by the
/// `serial_no`/`batch_code` pair. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SurgeBunkerProcess {
    pub id: String,
    pub plan_id: String,
    /// Serial number of the source plan
    pub serial_no: String,
    pub product_name: String,
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub target_qty: Decimal,
    pub shift: Shift,
    pub shift_manager_name: String,
    pub rm1_stock: StockDetail,
    pub rm2_stock: StockDetail,
    pub rm3_stock: StockDetail,
    #[serde(with = "crate::types::lenient_number")]
    pub total_stock: Decimal,
    pub semi_finished_product_name: String,
    /// "BHC-NNN", counted per serial number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rm1_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rm2_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rm3_name: Option<String>,
}

impl SurgeBunkerProcess {
    pub fn stocks(&self) -> [&StockDetail; 3] {
        [&self.rm1_stock, &self.rm2_stock, &self.rm3_stock]
    }

    /// Total recomputed from the stored stock triples
    pub fn computed_total_stock(&self) -> Option<Decimal> {
        calculate_total_stock(self.stocks())
    }

    pub fn has_batch_code(&self, batch_code: &str) -> bool {
        self.batch_code.as_deref() == Some(batch_code)
    }
}

//! PPT (in-process) readings of surge bunker batches

use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::store::{Collection, Store};
use shared::{
    calculate_total_stock, new_record_id, validate_not_blank, validate_stock_detail, PptReading,
    Shift, StockDetail, SurgeBunkerProcess,
};

/// PPT reading service
#[derive(Clone)]
pub struct PptReadingService {
    store: Store,
}

/// Input for recording a reading against a surge bunker batch
///
/// Stock slots left empty keep the batch's recorded stock.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecordReadingInput {
    pub shift: Shift,
    #[validate(custom = "validate_not_blank")]
    pub shift_manager_name: String,
    #[validate(custom = "validate_not_blank")]
    pub semi_finished_product_name2: String,
    #[serde(default)]
    #[validate(custom = "validate_stock_detail")]
    pub rm1_stock: Option<StockDetail>,
    #[serde(default)]
    #[validate(custom = "validate_stock_detail")]
    pub rm2_stock: Option<StockDetail>,
    #[serde(default)]
    #[validate(custom = "validate_stock_detail")]
    pub rm3_stock: Option<StockDetail>,
}

impl RecordReadingInput {
    pub fn new(
        shift: Shift,
        shift_manager_name: impl Into<String>,
        semi_finished_product_name2: impl Into<String>,
    ) -> Self {
        Self {
            shift,
            shift_manager_name: shift_manager_name.into(),
            semi_finished_product_name2: semi_finished_product_name2.into(),
            rm1_stock: None,
            rm2_stock: None,
            rm3_stock: None,
        }
    }
}

impl PptReadingService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Queue a reading of `process` for finishing
    pub fn record_reading(
        &self,
        process: &SurgeBunkerProcess,
        input: RecordReadingInput,
    ) -> AppResult<PptReading> {
        input.validate()?;

        let rm1_stock = input.rm1_stock.unwrap_or(process.rm1_stock);
        let rm2_stock = input.rm2_stock.unwrap_or(process.rm2_stock);
        let rm3_stock = input.rm3_stock.unwrap_or(process.rm3_stock);
        let total_stock = calculate_total_stock([&rm1_stock, &rm2_stock, &rm3_stock])
            .ok_or_else(|| AppError::validation("total_stock", "Total stock is out of range"))?;

        let reading = PptReading {
            id: new_record_id(),
            surge_bunker_id: process.id.clone(),
            serial_no: process.serial_no.clone(),
            product_name: process.product_name.clone(),
            date: process.date,
            target_qty: process.target_qty,
            total_stock,
            semi_finished_product_name: process.semi_finished_product_name.clone(),
            shift: input.shift,
            shift_manager_name: input.shift_manager_name,
            rm1_stock,
            rm2_stock,
            rm3_stock,
            semi_finished_product_name2: input.semi_finished_product_name2,
            batch_code: process.batch_code.clone(),
            rm1_name: process.rm1_name.clone(),
            rm2_name: process.rm2_name.clone(),
            rm3_name: process.rm3_name.clone(),
        };

        self.store
            .update(Collection::PptReadings, |readings: &mut Vec<PptReading>| {
                readings.push(reading.clone());
                Ok(())
            })?;

        tracing::info!(
            serial_no = %reading.serial_no,
            batch_code = ?reading.batch_code,
            total_stock = %reading.total_stock,
            "ppt reading recorded"
        );
        Ok(reading)
    }

    /// Readings waiting to be finished
    pub fn list_pending(&self) -> AppResult<Vec<PptReading>> {
        self.store.load(Collection::PptReadings)
    }

    pub fn get_reading(&self, id: &str) -> AppResult<Option<PptReading>> {
        Ok(self.list_pending()?.into_iter().find(|r| r.id == id))
    }

    /// Pending readings taken from one surge bunker batch
    pub fn readings_for_process(&self, surge_bunker_id: &str) -> AppResult<Vec<PptReading>> {
        Ok(self
            .list_pending()?
            .into_iter()
            .filter(|r| r.surge_bunker_id == surge_bunker_id)
            .collect())
    }
}

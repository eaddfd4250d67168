//! Finishing: PPT reading -> finished good

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::store::{Collection, Store};
use shared::{new_record_id, validate_not_blank, FinishedGood, PptReading, Shift};

/// Finished good service
#[derive(Clone)]
pub struct FinishedGoodService {
    store: Store,
}

/// Closure details entered when finishing a batch
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FinishInput {
    /// Closing date
    pub date: NaiveDate,
    pub shift: Shift,
    #[validate(custom = "validate_not_blank")]
    pub supervisor_name: String,
}

impl FinishedGoodService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Consume a pending reading into a finished good
    ///
    /// Appending the finished good and removing the reading happen under one
    /// write lock. A reading that is no longer pending is rejected with
    /// `NotFound`, so a batch cannot be finished twice.
    pub fn finish(&self, reading: &PptReading, input: FinishInput) -> AppResult<FinishedGood> {
        input.validate()?;

        let writer = self.store.write()?;
        let mut readings: Vec<PptReading> = writer.load(Collection::PptReadings)?;
        let before = readings.len();
        readings.retain(|r| r.id != reading.id);
        if readings.len() == before {
            tracing::warn!(reading_id = %reading.id, "finish requested for a reading that is not pending");
            return Err(AppError::NotFound(format!("PPT reading {}", reading.id)));
        }

        let finished = FinishedGood::from_reading(
            new_record_id(),
            reading,
            input.date,
            input.shift,
            input.supervisor_name,
        );

        let mut finished_goods: Vec<FinishedGood> = writer.load(Collection::FinishedGoods)?;
        finished_goods.push(finished.clone());
        writer.save(Collection::FinishedGoods, &finished_goods)?;
        writer.save(Collection::PptReadings, &readings)?;

        tracing::info!(
            serial_no = %finished.serial_no,
            batch_code = ?finished.batch_code,
            total_stock = %finished.total_stock,
            "batch finished"
        );
        Ok(finished)
    }

    pub fn list_finished_goods(&self) -> AppResult<Vec<FinishedGood>> {
        self.store.load(Collection::FinishedGoods)
    }

    /// First finished good recorded for a serial number
    pub fn find_by_serial(&self, serial_no: &str) -> AppResult<Option<FinishedGood>> {
        Ok(self
            .list_finished_goods()?
            .into_iter()
            .find(|fg| fg.serial_no == serial_no))
    }
}

//! Fuel consumption logging

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::store::{Collection, Store};
use shared::{
    checked_sum, new_record_id, next_serial_code, normalize_query, validate_non_negative,
    validate_not_blank, FuelConsumption, SerialPrefix, Shift, SurgeBunkerProcess,
};

/// Fuel service
#[derive(Clone)]
pub struct FuelService {
    store: Store,
}

/// Input for logging fuel burned on a batch
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecordFuelInput {
    #[validate(custom = "validate_not_blank")]
    pub serial_no: String,
    #[validate(custom = "validate_not_blank")]
    pub batch_code: String,
    pub date: NaiveDate,
    pub shift: Shift,
    /// Liters
    #[validate(custom = "validate_non_negative")]
    pub fuel_used: Decimal,
    #[validate(custom = "validate_not_blank")]
    pub supervisor_name: String,
    #[serde(default)]
    pub remarks: String,
}

impl FuelService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Log fuel against a serial number and batch code
    ///
    /// The serial and batch are context only. An unknown serial is accepted
    /// and recorded with an empty product name.
    pub fn record_fuel(&self, input: RecordFuelInput) -> AppResult<FuelConsumption> {
        input.validate()?;

        let processes: Vec<SurgeBunkerProcess> =
            self.store.load(Collection::SurgeBunkerProcesses)?;
        let product_name = match processes.iter().find(|p| p.serial_no == input.serial_no) {
            Some(process) => process.product_name.clone(),
            None => {
                tracing::warn!(serial_no = %input.serial_no, "fuel recorded for serial with no surge bunker batch");
                String::new()
            }
        };

        let record = self.store.update(
            Collection::FuelConsumption,
            |records: &mut Vec<FuelConsumption>| {
                let record = FuelConsumption {
                    id: new_record_id(),
                    fuel_serial_no: next_serial_code(SerialPrefix::FuelConsumption, records.len()),
                    serial_no: input.serial_no,
                    product_name,
                    batch_code: input.batch_code,
                    date: input.date,
                    shift: input.shift,
                    fuel_used: input.fuel_used,
                    supervisor_name: input.supervisor_name,
                    remarks: input.remarks,
                };
                records.push(record.clone());
                Ok(record)
            },
        )?;

        tracing::info!(
            fuel_serial_no = %record.fuel_serial_no,
            serial_no = %record.serial_no,
            fuel_used = %record.fuel_used,
            "fuel consumption recorded"
        );
        Ok(record)
    }

    pub fn list_records(&self) -> AppResult<Vec<FuelConsumption>> {
        self.store.load(Collection::FuelConsumption)
    }

    /// Free-text search over serial, product, batch and fuel serial
    pub fn search_records(&self, query: &str) -> AppResult<Vec<FuelConsumption>> {
        let records = self.list_records()?;
        let hits: Vec<FuelConsumption> = match normalize_query(query) {
            Some(q) => records.into_iter().filter(|r| r.matches_query(&q)).collect(),
            None => records,
        };
        tracing::debug!(query, hits = hits.len(), "fuel search");
        Ok(hits)
    }

    /// Liters across every record
    pub fn total_fuel_used(&self) -> AppResult<Decimal> {
        sum_fuel_used(&self.list_records()?)
    }
}

pub(crate) fn sum_fuel_used(records: &[FuelConsumption]) -> AppResult<Decimal> {
    checked_sum(records.iter().map(|r| r.fuel_used))
        .ok_or_else(|| AppError::validation("fuel_used", "Total fuel used is out of range"))
}

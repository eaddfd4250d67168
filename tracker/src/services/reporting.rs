//! Production reports joined across the pipeline collections
//!
//! All joins are by serial number, and secondarily by batch code. Each query
//! builds a [`ProductionIndex`] from one snapshot of the store, so a report
//! never mixes collections read at different times.

use std::collections::HashMap;
use std::io::Write;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;
use crate::store::{Collection, Store};
use shared::{
    calculate_total_qty, display_decimal, new_record_id, validate_non_negative,
    validate_not_blank, CompositionPlan, CostRecord, FilteredProcessDetails, FinishedGood,
    FuelConsumption, PptReading, ProcessDetails, ProductionReport, ReportStatus,
    SurgeBunkerProcess,
};

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    store: Store,
}

/// Costs entered for one batch
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertCostInput {
    #[validate(custom = "validate_not_blank")]
    pub serial_no: String,
    #[validate(custom = "validate_not_blank")]
    pub batch_code: String,
    #[validate(custom = "validate_non_negative")]
    pub rm_cost: Decimal,
    #[validate(custom = "validate_non_negative")]
    pub fuel_cost: Decimal,
    #[validate(custom = "validate_non_negative")]
    pub pmt_cost: Decimal,
}

/// Records of one serial number, in collection order
#[derive(Debug, Default)]
struct SerialRecords {
    plan: Option<CompositionPlan>,
    processes: Vec<SurgeBunkerProcess>,
    readings: Vec<PptReading>,
    finished_good: Option<FinishedGood>,
    fuel_records: Vec<FuelConsumption>,
}

/// Pipeline records grouped by serial number
///
/// Where a serial has several plans or finished goods, the first one in
/// collection order is used.
#[derive(Debug, Default)]
pub struct ProductionIndex {
    plans: Vec<CompositionPlan>,
    by_serial: HashMap<String, SerialRecords>,
}

impl ProductionIndex {
    pub fn build(
        plans: Vec<CompositionPlan>,
        processes: Vec<SurgeBunkerProcess>,
        readings: Vec<PptReading>,
        finished_goods: Vec<FinishedGood>,
        fuel_records: Vec<FuelConsumption>,
    ) -> Self {
        let mut by_serial: HashMap<String, SerialRecords> = HashMap::new();

        for plan in &plans {
            let entry = by_serial.entry(plan.serial_no.clone()).or_default();
            if entry.plan.is_none() {
                entry.plan = Some(plan.clone());
            }
        }
        for process in processes {
            by_serial
                .entry(process.serial_no.clone())
                .or_default()
                .processes
                .push(process);
        }
        for reading in readings {
            by_serial
                .entry(reading.serial_no.clone())
                .or_default()
                .readings
                .push(reading);
        }
        for finished_good in finished_goods {
            let entry = by_serial.entry(finished_good.serial_no.clone()).or_default();
            if entry.finished_good.is_none() {
                entry.finished_good = Some(finished_good);
            }
        }
        for record in fuel_records {
            by_serial
                .entry(record.serial_no.clone())
                .or_default()
                .fuel_records
                .push(record);
        }

        Self { plans, by_serial }
    }

    /// Snapshot every pipeline collection
    pub fn load(store: &Store) -> AppResult<Self> {
        Ok(Self::build(
            store.load(Collection::Plans)?,
            store.load(Collection::SurgeBunkerProcesses)?,
            store.load(Collection::PptReadings)?,
            store.load(Collection::FinishedGoods)?,
            store.load(Collection::FuelConsumption)?,
        ))
    }

    /// One report row per plan, in plan order
    ///
    /// The status is closed when a finished good exists for the serial,
    /// whatever the plan's stored status says.
    pub fn reports(&self) -> Vec<ProductionReport> {
        self.plans
            .iter()
            .map(|plan| {
                let records = self.by_serial.get(&plan.serial_no);
                let finished_good = records.and_then(|r| r.finished_good.as_ref());
                let batch_code = records
                    .and_then(|r| r.processes.first())
                    .and_then(|p| p.batch_code.clone());

                ProductionReport {
                    id: plan.id.clone(),
                    serial_no: plan.serial_no.clone(),
                    product_name: plan.product_name.clone(),
                    plan_date: plan.date,
                    close_date: finished_good.map(|fg| fg.date),
                    plan_target_qty: plan.target_qty,
                    status: if finished_good.is_some() {
                        ReportStatus::Closed
                    } else {
                        ReportStatus::Open
                    },
                    batch_code,
                }
            })
            .collect()
    }

    pub fn details(&self, serial_no: &str) -> ProcessDetails {
        match self.by_serial.get(serial_no) {
            Some(records) => ProcessDetails {
                plan: records.plan.clone(),
                surge_bunker_processes: records.processes.clone(),
                ppt_readings: records.readings.clone(),
                finished_good: records.finished_good.clone(),
                fuel_records: records.fuel_records.clone(),
            },
            None => ProcessDetails::default(),
        }
    }

    pub fn filtered_details(&self, serial_no: &str, batch_code: &str) -> FilteredProcessDetails {
        self.details(serial_no).for_batch(batch_code)
    }

    /// Batch codes of the serial's surge bunker batches, in creation order
    pub fn batch_codes(&self, serial_no: &str) -> Vec<String> {
        self.by_serial
            .get(serial_no)
            .map(|records| {
                records
                    .processes
                    .iter()
                    .filter_map(|p| p.batch_code.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Flat CSV row of the report index with its cost overlay
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportCsvRow {
    serial_no: String,
    product_name: String,
    plan_date: String,
    close_date: String,
    plan_target_qty: String,
    status: &'static str,
    batch_code: String,
    total_cost: String,
    cost_per_mt: String,
}

impl ReportingService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn index(&self) -> AppResult<ProductionIndex> {
        ProductionIndex::load(&self.store)
    }

    pub fn build_report_index(&self) -> AppResult<Vec<ProductionReport>> {
        let reports = self.index()?.reports();
        tracing::debug!(reports = reports.len(), "report index built");
        Ok(reports)
    }

    pub fn get_process_details(&self, serial_no: &str) -> AppResult<ProcessDetails> {
        Ok(self.index()?.details(serial_no))
    }

    pub fn get_filtered_process_details(
        &self,
        serial_no: &str,
        batch_code: &str,
    ) -> AppResult<FilteredProcessDetails> {
        Ok(self.index()?.filtered_details(serial_no, batch_code))
    }

    pub fn batch_codes(&self, serial_no: &str) -> AppResult<Vec<String>> {
        Ok(self.index()?.batch_codes(serial_no))
    }

    /// Replace the cost record of a batch
    ///
    /// `total_qty` is taken from the batch's records now and is not
    /// refreshed if they change later.
    pub fn upsert_cost(&self, input: UpsertCostInput) -> AppResult<CostRecord> {
        input.validate()?;

        let details = self.get_filtered_process_details(&input.serial_no, &input.batch_code)?;
        let total_qty = calculate_total_qty(&details);

        let record = CostRecord {
            id: new_record_id(),
            serial_no: input.serial_no,
            batch_code: input.batch_code,
            rm_cost: input.rm_cost,
            fuel_cost: input.fuel_cost,
            pmt_cost: input.pmt_cost,
            total_qty,
            timestamp: Utc::now(),
        };

        let replaced = self
            .store
            .update(Collection::CostRecords, |records: &mut Vec<CostRecord>| {
                let before = records.len();
                records.retain(|r| !r.matches_key(&record.serial_no, &record.batch_code));
                records.push(record.clone());
                Ok(before + 1 - records.len())
            })?;

        tracing::info!(
            serial_no = %record.serial_no,
            batch_code = %record.batch_code,
            total_qty = %record.total_qty,
            replaced,
            "cost record saved"
        );
        Ok(record)
    }

    pub fn get_cost(&self, serial_no: &str, batch_code: &str) -> AppResult<Option<CostRecord>> {
        Ok(self
            .list_costs()?
            .into_iter()
            .find(|r| r.matches_key(serial_no, batch_code)))
    }

    pub fn list_costs(&self) -> AppResult<Vec<CostRecord>> {
        self.store.load(Collection::CostRecords)
    }

    /// Write the report index as CSV, returning the number of rows
    pub fn export_report_csv<W: Write>(&self, writer: W) -> AppResult<usize> {
        let reports = self.build_report_index()?;
        let costs = self.list_costs()?;

        let mut csv_writer = csv::Writer::from_writer(writer);
        for report in &reports {
            let cost = report
                .batch_code
                .as_deref()
                .and_then(|code| costs.iter().find(|c| c.matches_key(&report.serial_no, code)));

            csv_writer.serialize(ReportCsvRow {
                serial_no: report.serial_no.clone(),
                product_name: report.product_name.clone(),
                plan_date: report.plan_date.to_string(),
                close_date: report.close_date.map(|d| d.to_string()).unwrap_or_default(),
                plan_target_qty: display_decimal(report.plan_target_qty),
                status: report.status.as_str(),
                batch_code: report.batch_code.clone().unwrap_or_default(),
                total_cost: cost
                    .and_then(CostRecord::total_cost)
                    .map(display_decimal)
                    .unwrap_or_default(),
                cost_per_mt: cost
                    .and_then(CostRecord::cost_per_mt)
                    .map(|v| display_decimal(v.round_dp(2)))
                    .unwrap_or_default(),
            })?;
        }
        csv_writer.flush()?;

        tracing::info!(rows = reports.len(), "report exported");
        Ok(reports.len())
    }
}

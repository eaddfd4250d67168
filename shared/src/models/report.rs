//! Read-side report views joined across the pipeline collections

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{CompositionPlan, FinishedGood, FuelConsumption, PptReading, SurgeBunkerProcess};

/// Report status derived from the presence of a finished good
///
/// Independent of the plan's stored [`PlanStatus`](crate::models::PlanStatus).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Open,
    Closed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Open => "open",
            ReportStatus::Closed => "closed",
        }
    }
}

/// One row of the production report, one per composition plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductionReport {
    /// Plan id
    pub id: String,
    pub serial_no: String,
    pub product_name: String,
    pub plan_date: NaiveDate,
    /// Date of the matching finished good
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_date: Option<NaiveDate>,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub plan_target_qty: Decimal,
    pub status: ReportStatus,
    /// Batch code of the first surge-bunker batch for the serial number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_code: Option<String>,
}

/// Everything recorded for one serial number
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDetails {
    pub plan: Option<CompositionPlan>,
    pub surge_bunker_processes: Vec<SurgeBunkerProcess>,
    pub ppt_readings: Vec<PptReading>,
    pub finished_good: Option<FinishedGood>,
    pub fuel_records: Vec<FuelConsumption>,
}

/// Details of one batch of a serial number
///
/// The finished good carries no batch filter: it is the serial's finished
/// good whichever batch was selected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FilteredProcessDetails {
    pub plan: Option<CompositionPlan>,
    pub surge_bunker_process: Option<SurgeBunkerProcess>,
    pub ppt_reading: Option<PptReading>,
    pub finished_good: Option<FinishedGood>,
    pub fuel_record: Option<FuelConsumption>,
}

impl ProcessDetails {
    /// Narrow to the records carrying `batch_code`
    pub fn for_batch(self, batch_code: &str) -> FilteredProcessDetails {
        FilteredProcessDetails {
            plan: self.plan,
            surge_bunker_process: self
                .surge_bunker_processes
                .into_iter()
                .find(|process| process.has_batch_code(batch_code)),
            ppt_reading: self
                .ppt_readings
                .into_iter()
                .find(|reading| reading.has_batch_code(batch_code)),
            finished_good: self.finished_good,
            fuel_record: self
                .fuel_records
                .into_iter()
                .find(|record| record.batch_code == batch_code),
        }
    }
}

/// Quantity basis for cost allocation
///
/// Finished good total, else PPT reading total, else surge-bunker total,
/// else zero.
pub fn calculate_total_qty(details: &FilteredProcessDetails) -> Decimal {
    if let Some(finished_good) = &details.finished_good {
        return finished_good.total_stock;
    }
    if let Some(reading) = &details.ppt_reading {
        return reading.total_stock;
    }
    if let Some(process) = &details.surge_bunker_process {
        return process.total_stock;
    }
    Decimal::ZERO
}

/// Headline counters for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_materials: usize,
    /// Plans whose stored status is open
    pub active_plans: usize,
    pub surge_bunker_queue: usize,
    pub ppt_reading_queue: usize,
    pub finished_goods: usize,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub total_fuel_used: Decimal,
}

impl DashboardStats {
    /// Items still waiting somewhere in the pipeline
    pub fn pending_items(&self) -> usize {
        self.surge_bunker_queue + self.ppt_reading_queue
    }
}

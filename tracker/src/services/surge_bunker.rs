//! Surge bunker processing of composition plans

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::store::{Collection, Store};
use shared::{
    calculate_total_stock, new_record_id, next_batch_code, validate_not_blank,
    validate_stock_detail, CompositionPlan, PptReading, Shift, StockDetail, SurgeBunkerProcess,
};

/// Surge bunker service for batch processing
#[derive(Clone)]
pub struct SurgeBunkerService {
    store: Store,
}

/// Stock movement for one raw material slot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotInput {
    /// Material actually charged; the plan's material is used when blank
    #[serde(default)]
    pub name: Option<String>,
    pub stock: StockDetail,
}

impl SlotInput {
    pub fn new(open_stock: Decimal, charged_qty: Decimal, close_stock: Decimal) -> Self {
        Self {
            name: None,
            stock: StockDetail::new(open_stock, charged_qty, close_stock),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn resolved_name(&self, plan_name: &str) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => plan_name.to_string(),
        }
    }
}

/// Input for processing a plan in the surge bunker
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProcessPlanInput {
    pub shift: Shift,
    #[validate(custom = "validate_not_blank")]
    pub shift_manager_name: String,
    #[validate(custom = "validate_slot")]
    pub rm1: SlotInput,
    #[validate(custom = "validate_slot")]
    pub rm2: SlotInput,
    #[validate(custom = "validate_slot")]
    pub rm3: SlotInput,
    #[validate(custom = "validate_not_blank")]
    pub semi_finished_product_name: String,
}

fn validate_slot(slot: &SlotInput) -> Result<(), validator::ValidationError> {
    validate_stock_detail(&slot.stock)
}

/// A processed batch with the total shown in the processing history
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessHistoryEntry {
    pub process: SurgeBunkerProcess,
    /// Total of the PPT reading recorded for this batch, if any, else the
    /// batch's own total
    pub display_total_stock: Decimal,
}

impl SurgeBunkerService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Record a processing batch for `plan`
    ///
    /// The plan stays open so that further batches can be recorded against
    /// it. The plan's status is not re-checked here.
    pub fn process_plan(
        &self,
        plan: &CompositionPlan,
        input: ProcessPlanInput,
    ) -> AppResult<SurgeBunkerProcess> {
        input.validate()?;

        if !plan.is_open() {
            tracing::warn!(serial_no = %plan.serial_no, "processing a closed plan");
        }

        let total_stock =
            calculate_total_stock([&input.rm1.stock, &input.rm2.stock, &input.rm3.stock])
                .ok_or_else(|| AppError::validation("total_stock", "Total stock is out of range"))?;

        let process = self.store.update(
            Collection::SurgeBunkerProcesses,
            |processes: &mut Vec<SurgeBunkerProcess>| {
                let batch_code = next_batch_code(
                    processes.iter().map(|p| p.serial_no.as_str()),
                    &plan.serial_no,
                );
                let process = SurgeBunkerProcess {
                    id: new_record_id(),
                    plan_id: plan.id.clone(),
                    serial_no: plan.serial_no.clone(),
                    product_name: plan.product_name.clone(),
                    date: plan.date,
                    target_qty: plan.target_qty,
                    shift: input.shift,
                    shift_manager_name: input.shift_manager_name,
                    rm1_name: Some(input.rm1.resolved_name(&plan.rm1.name)),
                    rm2_name: Some(input.rm2.resolved_name(&plan.rm2.name)),
                    rm3_name: Some(input.rm3.resolved_name(&plan.rm3.name)),
                    rm1_stock: input.rm1.stock,
                    rm2_stock: input.rm2.stock,
                    rm3_stock: input.rm3.stock,
                    total_stock,
                    semi_finished_product_name: input.semi_finished_product_name,
                    batch_code: Some(batch_code),
                };
                processes.push(process.clone());
                Ok(process)
            },
        )?;

        tracing::info!(
            serial_no = %process.serial_no,
            batch_code = ?process.batch_code,
            total_stock = %process.total_stock,
            "surge bunker batch recorded"
        );
        Ok(process)
    }

    pub fn list_processes(&self) -> AppResult<Vec<SurgeBunkerProcess>> {
        self.store.load(Collection::SurgeBunkerProcesses)
    }

    pub fn get_process(&self, id: &str) -> AppResult<Option<SurgeBunkerProcess>> {
        Ok(self.list_processes()?.into_iter().find(|p| p.id == id))
    }

    /// All batches of a plan serial number, in creation order
    pub fn processes_for_serial(&self, serial_no: &str) -> AppResult<Vec<SurgeBunkerProcess>> {
        Ok(self
            .list_processes()?
            .into_iter()
            .filter(|p| p.serial_no == serial_no)
            .collect())
    }

    /// Serial numbers with at least one batch, first-seen order
    pub fn serial_numbers(&self) -> AppResult<Vec<String>> {
        let mut serials: Vec<String> = Vec::new();
        for process in self.list_processes()? {
            if !serials.contains(&process.serial_no) {
                serials.push(process.serial_no);
            }
        }
        Ok(serials)
    }

    /// Batch codes recorded for a serial number
    pub fn batch_codes_for(&self, serial_no: &str) -> AppResult<Vec<String>> {
        Ok(self
            .processes_for_serial(serial_no)?
            .into_iter()
            .filter_map(|p| p.batch_code)
            .collect())
    }

    /// Processed batches with the total to display for each
    pub fn history(&self) -> AppResult<Vec<ProcessHistoryEntry>> {
        let readings: Vec<PptReading> = self.store.load(Collection::PptReadings)?;

        Ok(self
            .list_processes()?
            .into_iter()
            .map(|process| {
                let display_total_stock = readings
                    .iter()
                    .find(|r| r.surge_bunker_id == process.id)
                    .map(|r| r.total_stock)
                    .unwrap_or(process.total_stock);
                ProcessHistoryEntry {
                    process,
                    display_total_stock,
                }
            })
            .collect())
    }
}

//! Composition planning

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};
use crate::services::material::find_material;
use crate::store::{Collection, Store};
use shared::{
    calculate_mt, new_record_id, next_serial_code, normalize_query, validate_not_blank,
    validate_percentage, validate_positive, CompositionPlan, Material, PlanStatus, RawMaterial,
    SerialPrefix,
};

/// Plan service for composition plans
#[derive(Clone)]
pub struct PlanService {
    store: Store,
}

/// One raw material slot of a new plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMaterialInput {
    /// Material name; matched against registered materials for LOI and unit
    pub name: String,
    pub percentage: Decimal,
}

impl RawMaterialInput {
    pub fn new(name: impl Into<String>, percentage: Decimal) -> Self {
        Self {
            name: name.into(),
            percentage,
        }
    }
}

/// Input for creating a plan
///
/// The three percentages are not required to sum to 100.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePlanInput {
    #[validate(custom = "validate_not_blank")]
    pub product_name: String,
    pub date: NaiveDate,
    #[validate(custom = "validate_positive")]
    pub target_qty: Decimal,
    #[validate(custom = "validate_raw_material")]
    pub rm1: RawMaterialInput,
    #[validate(custom = "validate_raw_material")]
    pub rm2: RawMaterialInput,
    #[validate(custom = "validate_raw_material")]
    pub rm3: RawMaterialInput,
    #[serde(default)]
    pub remarks: String,
}

fn validate_raw_material(rm: &RawMaterialInput) -> Result<(), ValidationError> {
    validate_not_blank(&rm.name)?;
    validate_percentage(&rm.percentage)
}

impl PlanService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Create an open plan with slot masses frozen from the target quantity
    pub fn create_plan(&self, input: CreatePlanInput) -> AppResult<CompositionPlan> {
        input.validate()?;

        let materials: Vec<Material> = self.store.load(Collection::Materials)?;
        let target_qty = input.target_qty;
        let rm1 = build_raw_material(&materials, target_qty, "rm1", input.rm1)?;
        let rm2 = build_raw_material(&materials, target_qty, "rm2", input.rm2)?;
        let rm3 = build_raw_material(&materials, target_qty, "rm3", input.rm3)?;

        let plan = self
            .store
            .update(Collection::Plans, |plans: &mut Vec<CompositionPlan>| {
                let plan = CompositionPlan {
                    id: new_record_id(),
                    serial_no: next_serial_code(SerialPrefix::CompositionPlan, plans.len()),
                    product_name: input.product_name,
                    date: input.date,
                    target_qty,
                    actual_qty: Decimal::ZERO,
                    variance: Decimal::ZERO,
                    status: PlanStatus::Open,
                    rm1,
                    rm2,
                    rm3,
                    remarks: input.remarks,
                };
                plans.push(plan.clone());
                Ok(plan)
            })?;

        tracing::info!(
            serial_no = %plan.serial_no,
            product_name = %plan.product_name,
            target_qty = %plan.target_qty,
            "composition plan created"
        );
        Ok(plan)
    }

    /// Mark a plan closed
    ///
    /// Returns `None` without writing anything when no plan has `id`.
    /// Closing is one-way; closing a closed plan leaves it closed.
    pub fn close_plan(&self, id: &str) -> AppResult<Option<CompositionPlan>> {
        let writer = self.store.write()?;
        let mut plans: Vec<CompositionPlan> = writer.load(Collection::Plans)?;

        let Some(plan) = plans.iter_mut().find(|plan| plan.id == id) else {
            tracing::warn!(plan_id = %id, "close requested for unknown plan");
            return Ok(None);
        };
        plan.status = PlanStatus::Closed;
        let closed = plan.clone();

        writer.save(Collection::Plans, &plans)?;
        tracing::info!(serial_no = %closed.serial_no, "composition plan closed");
        Ok(Some(closed))
    }

    pub fn get_plan(&self, id: &str) -> AppResult<Option<CompositionPlan>> {
        Ok(self.list_all_plans()?.into_iter().find(|plan| plan.id == id))
    }

    pub fn list_all_plans(&self) -> AppResult<Vec<CompositionPlan>> {
        self.store.load(Collection::Plans)
    }

    /// Plans that can still be processed in the surge bunker
    pub fn list_open_plans(&self) -> AppResult<Vec<CompositionPlan>> {
        Ok(self
            .list_all_plans()?
            .into_iter()
            .filter(CompositionPlan::is_open)
            .collect())
    }

    /// Free-text search over all plans
    pub fn search_plans(&self, query: &str) -> AppResult<Vec<CompositionPlan>> {
        Ok(filter_plans(self.list_all_plans()?, query))
    }

    /// Free-text search over open plans only
    pub fn search_open_plans(&self, query: &str) -> AppResult<Vec<CompositionPlan>> {
        Ok(filter_plans(self.list_open_plans()?, query))
    }
}

fn filter_plans(plans: Vec<CompositionPlan>, query: &str) -> Vec<CompositionPlan> {
    let hits: Vec<CompositionPlan> = match normalize_query(query) {
        Some(q) => plans.into_iter().filter(|plan| plan.matches_query(&q)).collect(),
        None => plans,
    };
    tracing::debug!(query, hits = hits.len(), "plan search");
    hits
}

/// Unknown material names leave `loi` and `unit` empty
fn build_raw_material(
    materials: &[Material],
    target_qty: Decimal,
    slot: &str,
    input: RawMaterialInput,
) -> AppResult<RawMaterial> {
    let mt = calculate_mt(target_qty, input.percentage)
        .ok_or_else(|| AppError::validation(slot, "Planned mass is out of range"))?;

    let material = find_material(materials, &input.name);
    if material.is_none() {
        tracing::debug!(material_name = %input.name, "plan references unregistered material");
    }

    Ok(RawMaterial {
        mt,
        loi: material.map(|m| m.loi),
        unit: material.map(|m| m.unit),
        name: input.name,
        percentage: input.percentage,
    })
}

//! Dashboard counters

use crate::error::AppResult;
use crate::services::fuel::sum_fuel_used;
use crate::store::{Collection, Store};
use shared::{
    CompositionPlan, DashboardStats, FinishedGood, FuelConsumption, Material, PptReading,
    SurgeBunkerProcess,
};

/// Dashboard service
#[derive(Clone)]
pub struct DashboardService {
    store: Store,
}

impl DashboardService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn stats(&self) -> AppResult<DashboardStats> {
        let materials: Vec<Material> = self.store.load(Collection::Materials)?;
        let plans: Vec<CompositionPlan> = self.store.load(Collection::Plans)?;
        let processes: Vec<SurgeBunkerProcess> =
            self.store.load(Collection::SurgeBunkerProcesses)?;
        let readings: Vec<PptReading> = self.store.load(Collection::PptReadings)?;
        let finished_goods: Vec<FinishedGood> = self.store.load(Collection::FinishedGoods)?;
        let fuel: Vec<FuelConsumption> = self.store.load(Collection::FuelConsumption)?;

        Ok(DashboardStats {
            total_materials: materials.len(),
            active_plans: plans.iter().filter(|p| p.is_open()).count(),
            surge_bunker_queue: processes.len(),
            ppt_reading_queue: readings.len(),
            finished_goods: finished_goods.len(),
            total_fuel_used: sum_fuel_used(&fuel)?,
        })
    }

    /// Surge bunker batches plus readings waiting to be finished
    pub fn pending_items(&self) -> AppResult<usize> {
        Ok(self.stats()?.pending_items())
    }
}

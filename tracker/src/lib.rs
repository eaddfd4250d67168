//! Production Tracker
//!
//! Tracks a batch-manufacturing pipeline from raw material intake through
//! composition planning, surge bunker processing, PPT readings and finished
//! goods, with fuel logging and a cost-annotated production report.

pub mod config;
pub mod error;
pub mod logging;
pub mod services;
pub mod store;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use store::{Collection, Store};

use services::{
    DashboardService, FinishedGoodService, FuelService, MaterialService, PlanService,
    PptReadingService, ReportingService, SessionService, SurgeBunkerService,
};

/// Every service wired to one shared store
#[derive(Clone)]
pub struct Tracker {
    pub store: Store,
    pub materials: MaterialService,
    pub plans: PlanService,
    pub surge_bunker: SurgeBunkerService,
    pub ppt_readings: PptReadingService,
    pub finished_goods: FinishedGoodService,
    pub fuel: FuelService,
    pub reporting: ReportingService,
    pub dashboard: DashboardService,
    pub session: SessionService,
}

impl Tracker {
    pub fn new(store: Store) -> Self {
        Self {
            materials: MaterialService::new(store.clone()),
            plans: PlanService::new(store.clone()),
            surge_bunker: SurgeBunkerService::new(store.clone()),
            ppt_readings: PptReadingService::new(store.clone()),
            finished_goods: FinishedGoodService::new(store.clone()),
            fuel: FuelService::new(store.clone()),
            reporting: ReportingService::new(store.clone()),
            dashboard: DashboardService::new(store.clone()),
            session: SessionService::new(store.clone()),
            store,
        }
    }

    /// Open the configured store and wire the services to it
    pub fn from_config(config: &Config) -> AppResult<Self> {
        Ok(Self::new(config.open_store()?))
    }
}

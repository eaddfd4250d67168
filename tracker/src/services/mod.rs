//! Stage services of the production pipeline

pub mod dashboard;
pub mod finished_good;
pub mod fuel;
pub mod material;
pub mod plan;
pub mod ppt_reading;
pub mod reporting;
pub mod session;
pub mod surge_bunker;

pub use dashboard::DashboardService;
pub use finished_good::{FinishInput, FinishedGoodService};
pub use fuel::{FuelService, RecordFuelInput};
pub use material::{CreateMaterialInput, MaterialService};
pub use plan::{CreatePlanInput, PlanService, RawMaterialInput};
pub use ppt_reading::{PptReadingService, RecordReadingInput};
pub use reporting::{ProductionIndex, ReportingService, UpsertCostInput};
pub use session::SessionService;
pub use surge_bunker::{ProcessHistoryEntry, ProcessPlanInput, SlotInput, SurgeBunkerService};

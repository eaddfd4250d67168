//! Domain records of the production pipeline

mod cost;
mod finished_good;
mod fuel;
mod material;
mod plan;
mod ppt_reading;
mod report;
mod surge_bunker;
mod user;

pub use cost::*;
pub use finished_good::*;
pub use fuel::*;
pub use material::*;
pub use plan::*;
pub use ppt_reading::*;
pub use report::*;
pub use surge_bunker::*;
pub use user::*;

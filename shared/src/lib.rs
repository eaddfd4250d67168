//! Shared types and models for the production tracker
//!
//! This crate contains the pipeline records, code generation and the
//! quantity arithmetic shared between the tracker library and the WASM
//! bindings used by the browser front end.

pub mod codes;
pub mod models;
pub mod types;
pub mod validation;

pub use codes::*;
pub use models::*;
pub use types::*;
pub use validation::*;

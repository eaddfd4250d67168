//! Raw material (KYC) models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{display_decimal, field_matches, Unit};

/// A raw material registered through intake
///
/// Materials are immutable once created. Composition plans reference them by
/// `material_name`, not by id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: String,
    /// Sequential code, e.g. "ML-001"
    pub serial_no: String,
    pub material_name: String,
    pub unit: Unit,
    /// Loss on ignition, percent (0-100)
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub loi: Decimal,
    pub remarks: String,
}

impl Material {
    /// Free-text match over serial number, name, unit, LOI and remarks
    pub fn matches_query(&self, normalized_query: &str) -> bool {
        field_matches(&self.serial_no, normalized_query)
            || field_matches(&self.material_name, normalized_query)
            || field_matches(self.unit.as_str(), normalized_query)
            || field_matches(&display_decimal(self.loi), normalized_query)
            || field_matches(&self.remarks, normalized_query)
    }
}

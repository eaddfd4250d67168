//! Composition planning models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{display_decimal, field_matches, Unit};

/// A composition plan for one product run
///
/// Plans are immutable after creation except for `status`, which moves from
/// `open` to `closed` exactly once. A plan may feed any number of
/// surge-bunker batches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompositionPlan {
    pub id: String,
    /// Sequential code, e.g. "CP-001"
    pub serial_no: String,
    pub product_name: String,
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub target_qty: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub actual_qty: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub variance: Decimal,
    pub status: PlanStatus,
    pub rm1: RawMaterial,
    pub rm2: RawMaterial,
    pub rm3: RawMaterial,
    pub remarks: String,
}

/// Stored lifecycle status of a plan
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    Open,
    Closed,
}

impl std::fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanStatus::Open => write!(f, "open"),
            PlanStatus::Closed => write!(f, "closed"),
        }
    }
}

/// A raw material slot embedded in a plan
///
/// `loi` and `unit` are copied from the material with the same name at
/// creation time and are absent when no such material existed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawMaterial {
    pub name: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub percentage: Decimal,
    /// Planned mass in MT, frozen at creation
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub mt: Decimal,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::arbitrary_precision_option"
    )]
    pub loi: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
}

impl CompositionPlan {
    pub fn is_open(&self) -> bool {
        self.status == PlanStatus::Open
    }

    pub fn raw_materials(&self) -> [&RawMaterial; 3] {
        [&self.rm1, &self.rm2, &self.rm3]
    }

    /// Free-text match over serial number, product, date, target quantity,
    /// raw material names and remarks
    pub fn matches_query(&self, normalized_query: &str) -> bool {
        field_matches(&self.serial_no, normalized_query)
            || field_matches(&self.product_name, normalized_query)
            || field_matches(&self.date.to_string(), normalized_query)
            || field_matches(&display_decimal(self.target_qty), normalized_query)
            || self
                .raw_materials()
                .iter()
                .any(|rm| field_matches(&rm.name, normalized_query))
            || field_matches(&self.remarks, normalized_query)
    }
}

/// Planned mass of a slot: target quantity × percentage / 100
///
/// `None` when the product does not fit in a `Decimal`.
pub fn calculate_mt(target_qty: Decimal, percentage: Decimal) -> Option<Decimal> {
    target_qty
        .checked_mul(percentage)?
        .checked_div(Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn thirty_percent_of_hundred_is_thirty() {
        let mt = calculate_mt(Decimal::from(100), Decimal::from(30));
        assert_eq!(mt, Some(Decimal::new(3000, 2)));
    }

    #[test]
    fn fractional_percentages_stay_exact() {
        let mt = calculate_mt(Decimal::new(2505, 1), Decimal::new(125, 1));
        assert_eq!(mt, Some(Decimal::new(313125, 4)));
    }

    #[test]
    fn oversized_targets_have_no_mass() {
        assert_eq!(calculate_mt(Decimal::MAX, Decimal::from(50)), None);
    }

    proptest! {
        #[test]
        fn slot_masses_scale_with_percentage(target in 1u32..100_000, pct in 0u32..=100) {
            let mt = calculate_mt(Decimal::from(target), Decimal::from(pct)).unwrap();
            prop_assert!(mt <= Decimal::from(target));
            prop_assert_eq!(mt * Decimal::from(100), Decimal::from(target) * Decimal::from(pct));
        }
    }
}

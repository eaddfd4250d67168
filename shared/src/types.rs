//! Common types used across the pipeline

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Unit a raw material is measured in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Unit {
    #[serde(rename = "KG")]
    Kg,
    #[default]
    #[serde(rename = "MT")]
    Mt,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Kg => "KG",
            Unit::Mt => "MT",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Production shift
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Shift {
    A,
    B,
    C,
}

impl Shift {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shift::A => "A",
            Shift::B => "B",
            Shift::C => "C",
        }
    }
}

impl std::fmt::Display for Shift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stock movement of one raw material slot during a processing event (MT)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StockDetail {
    #[serde(default, with = "lenient_number")]
    pub open_stock: Decimal,
    #[serde(default, with = "lenient_number")]
    pub charged_qty: Decimal,
    #[serde(default, with = "lenient_number")]
    pub close_stock: Decimal,
}

impl StockDetail {
    pub fn new(open_stock: Decimal, charged_qty: Decimal, close_stock: Decimal) -> Self {
        Self {
            open_stock,
            charged_qty,
            close_stock,
        }
    }

    /// Quantity consumed from this slot: open + charged - close
    ///
    /// `None` when the result does not fit in a `Decimal`.
    pub fn slot_total(&self) -> Option<Decimal> {
        self.open_stock
            .checked_add(self.charged_qty)?
            .checked_sub(self.close_stock)
    }
}

/// Sum of the slot totals of the three raw material slots
pub fn calculate_total_stock(slots: [&StockDetail; 3]) -> Option<Decimal> {
    slots
        .iter()
        .try_fold(Decimal::ZERO, |total, slot| total.checked_add(slot.slot_total()?))
}

/// Sum that stops at the first addition leaving the `Decimal` range
pub fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |total, value| total.checked_add(value))
}

/// Exact decimal numbers for quantities the browser front end also writes
///
/// Serializes as a JSON number literal carrying every digit. Reads numbers,
/// numeric strings, `""` and `null`; the last two are what an untouched or
/// unparsable form field is saved as and both read as zero.
pub mod lenient_number {
    use std::fmt;
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use serde::de::{self, value::MapAccessDeserializer, MapAccess, Unexpected, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::arbitrary_precision::serialize(value, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        deserializer.deserialize_any(LenientVisitor)
    }

    struct LenientVisitor;

    impl<'de> Visitor<'de> for LenientVisitor {
        type Value = Decimal;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a decimal number, a numeric string, an empty string or null")
        }

        fn visit_unit<E: de::Error>(self) -> Result<Decimal, E> {
            Ok(Decimal::ZERO)
        }

        fn visit_none<E: de::Error>(self) -> Result<Decimal, E> {
            Ok(Decimal::ZERO)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Decimal, D::Error> {
            deserialize(deserializer)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Decimal, E> {
            Ok(Decimal::from(value))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Decimal, E> {
            Ok(Decimal::from(value))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Decimal, E> {
            Decimal::try_from(value).map_err(E::custom)
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Decimal, E> {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Ok(Decimal::ZERO);
            }
            Decimal::from_str(trimmed)
                .or_else(|_| Decimal::from_scientific(trimmed))
                .map_err(|_| E::invalid_value(Unexpected::Str(value), &self))
        }

        // Number literals arrive as a single-entry map under arbitrary precision
        fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Decimal, A::Error> {
            rust_decimal::serde::arbitrary_precision::deserialize(MapAccessDeserializer::new(map))
        }
    }
}

/// Lowercased, trimmed search query; `None` when the query is blank
pub fn normalize_query(query: &str) -> Option<String> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        None
    } else {
        Some(q)
    }
}

/// Case-insensitive substring match against an already normalized query
pub fn field_matches(field: &str, normalized_query: &str) -> bool {
    field.to_lowercase().contains(normalized_query)
}

/// Render a quantity the way it is shown in lists (no trailing zeros)
pub fn display_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn slot_total_subtracts_close_stock() {
        let stock = StockDetail::new(Decimal::from(10), Decimal::from(5), Decimal::from(3));
        assert_eq!(stock.slot_total(), Some(Decimal::from(12)));
    }

    #[test]
    fn total_stock_sums_all_slots() {
        let rm1 = StockDetail::new(Decimal::from(10), Decimal::from(5), Decimal::from(3));
        let rm2 = StockDetail::new(Decimal::from(4), Decimal::from(1), Decimal::ZERO);
        let rm3 = StockDetail::default();
        assert_eq!(calculate_total_stock([&rm1, &rm2, &rm3]), Some(Decimal::from(17)));
    }

    #[test]
    fn totals_out_of_range_are_none() {
        let full = StockDetail::new(Decimal::MAX, Decimal::MAX, Decimal::ZERO);
        assert_eq!(full.slot_total(), None);

        let half = StockDetail::new(Decimal::MAX, Decimal::ZERO, Decimal::ZERO);
        assert_eq!(calculate_total_stock([&half, &half, &StockDetail::default()]), None);
    }

    #[test]
    fn checked_sum_adds_until_overflow() {
        assert_eq!(checked_sum([Decimal::new(15, 1), Decimal::from(2)]), Some(Decimal::new(35, 1)));
        assert_eq!(checked_sum(Vec::new()), Some(Decimal::ZERO));
        assert_eq!(checked_sum([Decimal::MAX, Decimal::ONE]), None);
    }

    #[test]
    fn stock_keeps_every_digit_through_json() {
        let stock = StockDetail::new(
            Decimal::from_str("33.333333333333333333").unwrap(),
            Decimal::new(5, 0),
            Decimal::new(125, 2),
        );
        let json = serde_json::to_string(&stock).unwrap();
        assert_eq!(
            json,
            r#"{"openStock":33.333333333333333333,"chargedQty":5,"closeStock":1.25}"#
        );
        assert_eq!(serde_json::from_str::<StockDetail>(&json).unwrap(), stock);
    }

    #[test]
    fn blank_and_null_stock_read_as_zero() {
        let stock: StockDetail =
            serde_json::from_str(r#"{"openStock":"","chargedQty":null,"closeStock":"2.5"}"#)
                .unwrap();
        assert_eq!(stock, StockDetail::new(Decimal::ZERO, Decimal::ZERO, Decimal::new(25, 1)));

        let missing: StockDetail = serde_json::from_str(r#"{"openStock":4}"#).unwrap();
        assert_eq!(missing.slot_total(), Some(Decimal::from(4)));
    }

    #[test]
    fn non_numeric_stock_is_rejected() {
        let result = serde_json::from_str::<StockDetail>(
            r#"{"openStock":"ten","chargedQty":0,"closeStock":0}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn blank_query_normalizes_to_none() {
        assert_eq!(normalize_query("   "), None);
        assert_eq!(normalize_query(" Clinker "), Some("clinker".to_string()));
    }

    #[test]
    fn display_decimal_drops_trailing_zeros() {
        assert_eq!(display_decimal(Decimal::new(1250, 2)), "12.5");
        assert_eq!(display_decimal(Decimal::new(10000, 2)), "100");
    }

    #[test]
    fn unit_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Unit::Kg).unwrap(), "\"KG\"");
        assert_eq!(serde_json::from_str::<Unit>("\"MT\"").unwrap(), Unit::Mt);
    }
}

//! WebAssembly module for the Production Tracker
//!
//! Provides client-side computation for:
//! - Raw material mass per plan slot
//! - Surge bunker stock totals
//! - Serial and batch code formatting
//! - Report quantity basis and cost per MT

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::codes::*;
pub use shared::models::*;
pub use shared::types::*;

fn to_decimal(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or(Decimal::ZERO)
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Mass of one raw material slot: target * percentage / 100
#[wasm_bindgen]
pub fn calculate_mt(target_qty: f64, percentage: f64) -> f64 {
    shared::calculate_mt(to_decimal(target_qty), to_decimal(percentage))
        .map(to_f64)
        .unwrap_or(0.0)
}

/// Stock consumed from one slot: open + charged - close
#[wasm_bindgen]
pub fn calculate_slot_total(open_stock: f64, charged_qty: f64, close_stock: f64) -> f64 {
    let slot = StockDetail::new(
        to_decimal(open_stock),
        to_decimal(charged_qty),
        to_decimal(close_stock),
    );
    slot.slot_total().map(to_f64).unwrap_or(0.0)
}

fn total_stock_from_json(slots_json: &str) -> Result<Decimal, String> {
    let slots: [StockDetail; 3] =
        serde_json::from_str(slots_json).map_err(|e| format!("Invalid stock JSON: {}", e))?;
    shared::calculate_total_stock([&slots[0], &slots[1], &slots[2]])
        .ok_or_else(|| "Total stock is out of range".to_string())
}

/// Total stock of a batch from a JSON array of three
/// `{openStock, chargedQty, closeStock}` slots
#[wasm_bindgen]
pub fn calculate_total_stock(slots_json: &str) -> Result<f64, JsValue> {
    total_stock_from_json(slots_json)
        .map(to_f64)
        .map_err(|e| JsValue::from_str(&e))
}

fn serial_code(prefix: &str, sequence: u32) -> Result<String, String> {
    let prefix = SerialPrefix::parse(prefix).ok_or_else(|| format!("Unknown prefix: {}", prefix))?;
    Ok(format_code(prefix, sequence as usize))
}

/// Format `PREFIX-NNN` for one of the ML, CP, FC or BHC prefixes
#[wasm_bindgen]
pub fn format_serial_code(prefix: &str, sequence: u32) -> Result<String, JsValue> {
    serial_code(prefix, sequence).map_err(|e| JsValue::from_str(&e))
}

fn total_qty_from_json(details_json: &str) -> Result<Decimal, String> {
    let details: FilteredProcessDetails = serde_json::from_str(details_json)
        .map_err(|e| format!("Invalid details JSON: {}", e))?;
    Ok(shared::calculate_total_qty(&details))
}

/// Quantity basis of a batch from its filtered process details JSON
#[wasm_bindgen]
pub fn calculate_total_qty(details_json: &str) -> Result<f64, JsValue> {
    total_qty_from_json(details_json)
        .map(to_f64)
        .map_err(|e| JsValue::from_str(&e))
}

/// Total cost per MT; zero when there is no quantity or the result is out of range
#[wasm_bindgen]
pub fn calculate_cost_per_mt(rm_cost: f64, fuel_cost: f64, pmt_cost: f64, total_qty: f64) -> f64 {
    checked_sum([to_decimal(rm_cost), to_decimal(fuel_cost), to_decimal(pmt_cost)])
        .and_then(|total_cost| total_cost.checked_div(to_decimal(total_qty)))
        .map(to_f64)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_mt() {
        assert!((calculate_mt(100.0, 30.0) - 30.0).abs() < 0.0001);
        assert!((calculate_mt(250.5, 12.5) - 31.3125).abs() < 0.0001);
    }

    #[test]
    fn test_slot_total() {
        assert!((calculate_slot_total(10.0, 5.0, 3.0) - 12.0).abs() < 0.0001);
        assert_eq!(calculate_slot_total(7.0e28, 7.0e28, 0.0), 0.0);
    }

    #[test]
    fn test_calculate_mt_out_of_range() {
        assert_eq!(calculate_mt(7.9e28, 50.0), 0.0);
    }

    #[test]
    fn test_total_stock_from_json() {
        let json = r#"[
            {"openStock": 10, "chargedQty": 5, "closeStock": 3},
            {"openStock": 0, "chargedQty": 0, "closeStock": 0},
            {"openStock": 0, "chargedQty": 0, "closeStock": 0}
        ]"#;
        assert_eq!(total_stock_from_json(json).unwrap(), Decimal::from(12));
        assert!(total_stock_from_json("[]").is_err());

        let blank = r#"[
            {"openStock": "", "chargedQty": null, "closeStock": 0},
            {"openStock": 4, "chargedQty": 1, "closeStock": 0},
            {"openStock": 0, "chargedQty": 0, "closeStock": 0}
        ]"#;
        assert_eq!(total_stock_from_json(blank).unwrap(), Decimal::from(5));
    }

    #[test]
    fn test_serial_code() {
        assert_eq!(format_serial_code("ML", 1).unwrap(), "ML-001");
        assert_eq!(format_serial_code("BHC", 12).unwrap(), "BHC-012");
        assert!(serial_code("XX", 1).is_err());
    }

    #[test]
    fn test_total_qty_from_json() {
        let empty = "{}";
        assert_eq!(total_qty_from_json(empty).unwrap(), Decimal::ZERO);
        assert!(total_qty_from_json("not json").is_err());
    }

    #[test]
    fn test_cost_per_mt() {
        assert!((calculate_cost_per_mt(1200.0, 300.0, 100.0, 40.0) - 40.0).abs() < 0.0001);
        assert_eq!(calculate_cost_per_mt(1200.0, 300.0, 100.0, 0.0), 0.0);
        assert_eq!(calculate_cost_per_mt(1.0e25, 0.0, 0.0, 0.0001), 0.0);
    }
}

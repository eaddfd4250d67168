//! Persisted state tests
//!
//! Covers the on-disk layout: one JSON array per collection key, absent keys
//! read as empty, and lossless round trips of every record type.

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use tempfile::TempDir;

use production_tracker::services::{
    CreateMaterialInput, CreatePlanInput, ProcessPlanInput, RawMaterialInput, SlotInput,
};
use production_tracker::store::{FileStore, KeyValueStore};
use production_tracker::{logging, Collection, Store, Tracker};
use shared::{
    CompositionPlan, CostRecord, Material, PlanStatus, RawMaterial, Role, Shift, StockDetail,
    SurgeBunkerProcess, Unit, User,
};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn open_store(dir: &TempDir) -> Store {
    logging::init_test();
    Store::open(dir.path()).unwrap()
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
}

fn sample_plan() -> CompositionPlan {
    CompositionPlan {
        id: "plan-1".to_string(),
        serial_no: "CP-001".to_string(),
        product_name: "Clinker".to_string(),
        date: date(),
        target_qty: dec("100"),
        actual_qty: Decimal::ZERO,
        variance: Decimal::ZERO,
        status: PlanStatus::Open,
        rm1: RawMaterial {
            name: "Limestone".to_string(),
            percentage: dec("30"),
            mt: dec("30"),
            loi: Some(dec("42.5")),
            unit: Some(Unit::Mt),
        },
        rm2: RawMaterial {
            name: "Unregistered".to_string(),
            percentage: dec("12.5"),
            mt: dec("12.5"),
            loi: None,
            unit: None,
        },
        rm3: RawMaterial {
            name: "Gypsum".to_string(),
            percentage: dec("0"),
            mt: dec("0"),
            loi: Some(dec("0")),
            unit: Some(Unit::Kg),
        },
        remarks: String::new(),
    }
}

fn sample_process(batch_code: Option<&str>) -> SurgeBunkerProcess {
    let stock = StockDetail::new(dec("10"), dec("5"), dec("3"));
    SurgeBunkerProcess {
        id: "sb-1".to_string(),
        plan_id: "plan-1".to_string(),
        serial_no: "CP-001".to_string(),
        product_name: "Clinker".to_string(),
        date: date(),
        target_qty: dec("100"),
        shift: Shift::A,
        shift_manager_name: "Somchai".to_string(),
        rm1_stock: stock,
        rm2_stock: StockDetail::default(),
        rm3_stock: StockDetail::default(),
        total_stock: dec("12"),
        semi_finished_product_name: "Raw Meal".to_string(),
        batch_code: batch_code.map(str::to_string),
        rm1_name: Some("Limestone".to_string()),
        rm2_name: None,
        rm3_name: None,
    }
}

// ============================================================================
// Round Trip Tests
// ============================================================================

#[cfg(test)]
mod round_trip_tests {
    use super::*;

    #[test]
    fn test_collections_round_trip_through_files() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let plans = vec![sample_plan()];
        let processes = vec![sample_process(Some("BHC-001")), sample_process(None)];
        let costs = vec![CostRecord {
            id: "cost-1".to_string(),
            serial_no: "CP-001".to_string(),
            batch_code: "BHC-001".to_string(),
            rm_cost: dec("1200.50"),
            fuel_cost: dec("300"),
            pmt_cost: dec("0.75"),
            total_qty: dec("12"),
            timestamp: Utc.with_ymd_and_hms(2024, 7, 2, 8, 30, 0).unwrap(),
        }];

        store.save(Collection::Plans, &plans).unwrap();
        store.save(Collection::SurgeBunkerProcesses, &processes).unwrap();
        store.save(Collection::CostRecords, &costs).unwrap();

        // A fresh handle over the same directory sees the same values
        let reopened = open_store(&dir);
        let plans_back: Vec<CompositionPlan> = reopened.load(Collection::Plans).unwrap();
        let processes_back: Vec<SurgeBunkerProcess> =
            reopened.load(Collection::SurgeBunkerProcesses).unwrap();
        let costs_back: Vec<CostRecord> = reopened.load(Collection::CostRecords).unwrap();

        assert_eq!(plans_back, plans);
        assert_eq!(processes_back, processes);
        assert_eq!(costs_back, costs);
    }

    #[test]
    fn test_absent_optional_fields_are_omitted() {
        let json = serde_json::to_value(sample_process(None)).unwrap();
        assert!(json.get("batchCode").is_none());
        assert!(json.get("rm2Name").is_none());
        assert_eq!(json["rm1Name"], "Limestone");
        assert_eq!(json["shiftManagerName"], "Somchai");
        assert_eq!(json["rm1Stock"]["chargedQty"], serde_json::json!(5));

        let plan = serde_json::to_value(sample_plan()).unwrap();
        assert!(plan["rm2"].get("loi").is_none());
        assert!(plan["rm2"].get("unit").is_none());
        assert_eq!(plan["rm1"]["unit"], "MT");
        assert_eq!(plan["status"], "open");
    }

    #[test]
    fn test_missing_collection_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        for collection in Collection::ALL {
            let records: Vec<serde_json::Value> = store.load(collection).unwrap();
            assert!(records.is_empty(), "{collection} should be empty");
        }
    }

    #[test]
    fn test_records_written_by_front_end_are_readable() {
        let dir = TempDir::new().unwrap();
        let raw = r#"[{"id":"1","serialNo":"ML-001","materialName":"Clay","unit":"KG","loi":12.5,"remarks":""}]"#;
        std::fs::write(dir.path().join("materials.json"), raw).unwrap();

        let store = open_store(&dir);
        let materials: Vec<Material> = store.load(Collection::Materials).unwrap();
        assert_eq!(materials.len(), 1);
        assert_eq!(materials[0].unit, Unit::Kg);
        assert_eq!(materials[0].loi, dec("12.5"));
    }

    #[test]
    fn test_blank_and_null_front_end_numbers_read_as_zero() {
        let dir = TempDir::new().unwrap();
        let costs = r#"[{"id":"c1","serialNo":"CP-001","batchCode":"BHC-001","rmCost":"","fuelCost":"250","pmtCost":"","totalQty":10,"timestamp":"2024-07-02T08:30:00Z"}]"#;
        std::fs::write(dir.path().join("costRecords.json"), costs).unwrap();

        let mut process = serde_json::to_value(vec![sample_process(Some("BHC-001"))]).unwrap();
        process[0]["rm1Stock"]["chargedQty"] = serde_json::Value::Null;
        process[0]["totalStock"] = serde_json::Value::Null;
        std::fs::write(
            dir.path().join("surgeBunkerProcesses.json"),
            serde_json::to_string(&process).unwrap(),
        )
        .unwrap();

        let tracker = Tracker::new(open_store(&dir));
        tracker.store.save(Collection::Plans, &vec![sample_plan()]).unwrap();
        let cost = tracker.reporting.get_cost("CP-001", "BHC-001").unwrap().unwrap();
        assert_eq!(cost.rm_cost, Decimal::ZERO);
        assert_eq!(cost.pmt_cost, Decimal::ZERO);
        assert_eq!(cost.cost_per_mt(), Some(dec("25")));

        let processes = tracker.surge_bunker.list_processes().unwrap();
        assert_eq!(processes[0].rm1_stock.charged_qty, Decimal::ZERO);
        assert_eq!(processes[0].total_stock, Decimal::ZERO);

        let mut csv = Vec::new();
        assert_eq!(tracker.reporting.export_report_csv(&mut csv).unwrap(), 1);
    }

    #[test]
    fn test_plan_survives_reopen_with_every_digit() {
        let dir = TempDir::new().unwrap();
        let third = dec("33.333333333333333333");
        let plan = Tracker::new(open_store(&dir))
            .plans
            .create_plan(CreatePlanInput {
                product_name: "Clinker".to_string(),
                date: date(),
                target_qty: dec("100"),
                rm1: RawMaterialInput::new("Limestone", third),
                rm2: RawMaterialInput::new("Clay", third),
                rm3: RawMaterialInput::new("Gypsum", dec("33.333333333333333334")),
                remarks: String::new(),
            })
            .unwrap();

        let raw = std::fs::read_to_string(dir.path().join("plans.json")).unwrap();
        assert!(raw.contains(r#""percentage":33.333333333333333333"#));

        let reopened = Tracker::new(open_store(&dir));
        assert_eq!(reopened.plans.get_plan(&plan.id).unwrap().unwrap(), plan);
    }
}

// ============================================================================
// File Layout Tests
// ============================================================================

#[cfg(test)]
mod layout_tests {
    use super::*;

    #[test]
    fn test_each_collection_gets_its_own_file() {
        let dir = TempDir::new().unwrap();
        let tracker = Tracker::new(open_store(&dir));

        tracker
            .materials
            .create_material(CreateMaterialInput {
                material_name: "Limestone".to_string(),
                unit: Unit::Mt,
                loi: dec("42"),
                remarks: String::new(),
            })
            .unwrap();
        let plan = tracker
            .plans
            .create_plan(CreatePlanInput {
                product_name: "Clinker".to_string(),
                date: date(),
                target_qty: dec("100"),
                rm1: RawMaterialInput::new("Limestone", dec("30")),
                rm2: RawMaterialInput::new("Clay", dec("30")),
                rm3: RawMaterialInput::new("Gypsum", dec("40")),
                remarks: String::new(),
            })
            .unwrap();
        tracker
            .surge_bunker
            .process_plan(
                &plan,
                ProcessPlanInput {
                    shift: Shift::A,
                    shift_manager_name: "Somchai".to_string(),
                    rm1: SlotInput::new(dec("1"), dec("1"), dec("1")),
                    rm2: SlotInput::default(),
                    rm3: SlotInput::default(),
                    semi_finished_product_name: "Raw Meal".to_string(),
                },
            )
            .unwrap();

        assert!(dir.path().join("materials.json").exists());
        assert!(dir.path().join("plans.json").exists());
        assert!(dir.path().join("surgeBunkerProcesses.json").exists());
        assert!(!dir.path().join("pptReadings.json").exists());
        assert!(!dir.path().join("plans.json.tmp").exists());

        let raw = std::fs::read_to_string(dir.path().join("plans.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["serialNo"], "CP-001");
        assert_eq!(value[0]["rm1"]["loi"], serde_json::json!(42));
    }

    #[test]
    fn test_serials_continue_after_reopen() {
        let dir = TempDir::new().unwrap();
        let input = || CreateMaterialInput {
            material_name: "Clay".to_string(),
            unit: Unit::Kg,
            loi: dec("10"),
            remarks: String::new(),
        };

        let first = Tracker::new(open_store(&dir));
        first.materials.create_material(input()).unwrap();

        let second = Tracker::new(open_store(&dir));
        let material = second.materials.create_material(input()).unwrap();
        assert_eq!(material.serial_no, "ML-002");
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let backend = FileStore::open(dir.path()).unwrap();
        assert!(backend.set("../escape", "[]").is_err());
        assert!(backend.get("").is_err());
        assert_eq!(backend.data_dir(), dir.path());
    }

    #[test]
    fn test_user_key_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        assert!(store.load_user().unwrap().is_none());

        let user = User {
            id: "operator-1".to_string(),
            role: Role::Admin,
        };
        store.save_user(&user).unwrap();

        let raw = std::fs::read_to_string(dir.path().join("user.json")).unwrap();
        assert_eq!(raw, r#"{"id":"operator-1","role":"admin"}"#);
        assert_eq!(open_store(&dir).load_user().unwrap(), Some(user));

        store.clear_user().unwrap();
        assert!(store.load_user().unwrap().is_none());
        store.clear_user().unwrap();
    }
}

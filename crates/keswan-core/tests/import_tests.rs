//! Integration tests for the workbook codec and batch import pipeline.

use std::collections::HashMap;

use keswan_core::export::{
    medicine_import_template, usage_import_template, MEDICINE_IMPORT_COLUMNS,
};
use keswan_core::import::{import_medicines, import_usage, ImportError};
use keswan_core::models::{Medicine, Upt};
use keswan_core::sheet::{decode, export_file_name, Sheet};
use keswan_core::Database;

use proptest::prelude::*;

fn setup_db() -> (Database, Upt) {
    let db = Database::open_in_memory().unwrap();
    let upt = Upt::new("UPT Cibinong".into(), String::new(), String::new());
    db.insert_upt(&upt).unwrap();
    (db, upt)
}

fn register(db: &Database, name: &str, stock: i64) -> Medicine {
    let med = Medicine::new(name.into(), "Obat".into(), "ml".into(), stock);
    db.insert_medicine(&med).unwrap();
    med
}

// ============================================================================
// Round-trip
// ============================================================================

#[test]
fn encode_decode_round_trip_preserves_fields() {
    let mut sheet = Sheet::new(MEDICINE_IMPORT_COLUMNS);
    let record: HashMap<String, String> = [
        ("name", "Amoxicillin 250mg"),
        ("category", "Antibiotik"),
        ("unit", "ml"),
        ("stock_initial", "100"),
        ("stock_current", "72"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    sheet.push_record(&record);

    let rows = decode(sheet.to_csv().unwrap().as_bytes()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].field("Nama Obat", "name"), Some("Amoxicillin 250mg"));
    assert_eq!(rows[0].field("Kategori", "category"), Some("Antibiotik"));
    assert_eq!(rows[0].field("Stock Saat Ini", "stock_current"), Some("72"));
}

#[test]
fn round_trip_renders_missing_optionals_as_placeholder() {
    let mut sheet = Sheet::new(MEDICINE_IMPORT_COLUMNS);
    let record: HashMap<String, String> = [("name", "Obat Tetes"), ("stock_initial", "5")]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    sheet.push_record(&record);

    let rows = decode(sheet.to_csv().unwrap().as_bytes()).unwrap();
    assert_eq!(rows[0].field("Kategori", "category"), Some("-"));
}

proptest! {
    #[test]
    fn prop_encode_decode_round_trip(
        name in "[A-Za-z0-9][A-Za-z0-9,\"/ ]{0,18}[A-Za-z0-9]",
        category in "[A-Za-z][A-Za-z ]{0,10}[A-Za-z]",
        stock in 1i64..100_000,
    ) {
        let mut sheet = Sheet::new(MEDICINE_IMPORT_COLUMNS);
        let record: HashMap<String, String> = [
            ("name".to_string(), name.clone()),
            ("category".to_string(), category.clone()),
            ("unit".to_string(), "ml".to_string()),
            ("stock_initial".to_string(), stock.to_string()),
            ("stock_current".to_string(), stock.to_string()),
        ]
        .into_iter()
        .collect();
        sheet.push_record(&record);

        let rows = decode(sheet.to_csv().unwrap().as_bytes()).unwrap();
        prop_assert_eq!(rows.len(), 1);
        prop_assert_eq!(rows[0].field("Nama Obat", "name"), Some(name.as_str()));
        prop_assert_eq!(rows[0].field("Kategori", "category"), Some(category.as_str()));
        let stock_str = stock.to_string();
        prop_assert_eq!(
            rows[0].field("Stock Awal", "stock_initial"),
            Some(stock_str.as_str())
        );
    }
}

// ============================================================================
// Validation gate (all-or-nothing)
// ============================================================================

#[test]
fn usage_import_gate_reports_offending_row_and_writes_nothing() {
    let (mut db, upt) = setup_db();
    register(&db, "Amoxicillin", 100);

    // Row 3 (second data row) is missing its quantity
    let data = "\
Nama Obat,Jumlah Digunakan,Penyakit Diobati,Jenis Hewan,Tanggal Penggunaan
Amoxicillin,10,Helmintiasis,Kambing,2024-01-15
Amoxicillin,,Flu,Sapi,2024-01-16
";
    let result = import_usage(&mut db, &upt.id, data.as_bytes());

    match result {
        Err(ImportError::Validation(errors)) => {
            assert_eq!(errors.len(), 1);
            assert!(errors[0].starts_with("row 3:"));
            assert!(errors[0].contains("Jumlah Digunakan"));
        }
        other => panic!("expected validation error, got {:?}", other.map(|r| r.imported)),
    }

    // Zero rows written, stock untouched
    let med = db.find_medicine_by_name("Amoxicillin").unwrap().unwrap();
    assert_eq!(med.stock_current, 100);
    assert!(db.list_usage(&Default::default()).unwrap().is_empty());
}

#[test]
fn unreadable_workbook_aborts_batch() {
    let (mut db, upt) = setup_db();
    let result = import_usage(&mut db, &upt.id, "".as_bytes());
    assert!(matches!(result, Err(ImportError::Format(_))));
}

// ============================================================================
// Write phase (best effort per row)
// ============================================================================

#[test]
fn batch_partial_success_skips_unknown_medicine() {
    let (mut db, upt) = setup_db();
    register(&db, "Amoxicillin", 100);
    register(&db, "Ivermectin", 50);

    // Row 4 (third data row) references an unregistered medicine
    let data = "\
Nama Obat,Jumlah Digunakan,Penyakit Diobati,Jenis Hewan,Tanggal Penggunaan
Amoxicillin,10,Helmintiasis,Kambing,2024-01-15
Ivermectin,5,Scabies,Domba,2024-01-15
Obat Hantu,3,Flu,Ayam,2024-01-16
Amoxicillin,20,Enteritis,Sapi,2024-01-17
ivermectin,5,Scabies,Kambing,2024-01-18
";
    let report = import_usage(&mut db, &upt.id, data.as_bytes()).unwrap();

    assert_eq!(report.imported, 4);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].starts_with("row 4:"));
    assert!(report.errors[0].contains("Obat Hantu"));

    // The four valid rows were persisted and decremented
    let views = db.list_usage(&Default::default()).unwrap();
    assert_eq!(views.len(), 4);
    let amox = db.find_medicine_by_name("Amoxicillin").unwrap().unwrap();
    assert_eq!(amox.stock_current, 70);
    let iver = db.find_medicine_by_name("Ivermectin").unwrap().unwrap();
    assert_eq!(iver.stock_current, 40);
}

#[test]
fn usage_import_resolves_names_case_insensitively() {
    let (mut db, upt) = setup_db();
    let med = register(&db, "Amoxicillin", 100);

    let data = "\
Nama Obat,Jumlah Digunakan,Penyakit Diobati,Jenis Hewan,Tanggal Penggunaan
amoxicillin,10,Helmintiasis,Kambing,2024-01-15
";
    let report = import_usage(&mut db, &upt.id, data.as_bytes()).unwrap();
    assert!(report.is_clean());

    let views = db.list_usage(&Default::default()).unwrap();
    assert_eq!(views[0].medicine_id, med.id);
}

#[test]
fn usage_import_accepts_snake_case_headers() {
    let (mut db, upt) = setup_db();
    register(&db, "Amoxicillin", 100);

    let data = "\
medicine_name,quantity_used,disease_treated,animal_type,usage_date,notes
Amoxicillin,10,Helmintiasis,Kambing,2024-01-15,Dosis pagi
";
    let report = import_usage(&mut db, &upt.id, data.as_bytes()).unwrap();
    assert_eq!(report.imported, 1);

    let views = db.list_usage(&Default::default()).unwrap();
    assert_eq!(views[0].notes.as_deref(), Some("Dosis pagi"));
}

// ============================================================================
// Templates and download naming
// ============================================================================

#[test]
fn usage_template_is_importable_once_medicines_exist() {
    let (mut db, upt) = setup_db();
    register(&db, "Amoxicillin 250mg", 100);
    register(&db, "Vitamin B Complex", 50);

    let csv = usage_import_template().to_csv().unwrap();
    let report = import_usage(&mut db, &upt.id, csv.as_bytes()).unwrap();

    assert_eq!(report.imported, 2);
    assert!(report.is_clean());
}

#[test]
fn medicine_template_is_importable() {
    let db = Database::open_in_memory().unwrap();
    let csv = medicine_import_template().to_csv().unwrap();

    let report = import_medicines(&db, csv.as_bytes()).unwrap();
    assert_eq!(report.imported, 2);
    assert_eq!(db.list_medicines().unwrap().len(), 2);
}

#[test]
fn export_file_name_is_stem_and_iso_date() {
    let date = chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    assert_eq!(
        export_file_name("riwayat_penggunaan_obat", date),
        "riwayat_penggunaan_obat_2024-06-01.csv"
    );
}

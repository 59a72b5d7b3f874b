//! Workbook export surfaces and download templates.

use std::collections::HashMap;

use crate::models::UsageView;
use crate::sheet::{ColumnSpec, Sheet};

/// Download stem for the usage-history export.
pub const USAGE_EXPORT_STEM: &str = "riwayat_penggunaan_obat";

/// Columns of the usage-history export.
pub const USAGE_EXPORT_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec { header: "Tanggal", key: "tanggal", width: 12 },
    ColumnSpec { header: "UPT", key: "upt", width: 20 },
    ColumnSpec { header: "Nama Obat", key: "nama_obat", width: 25 },
    ColumnSpec { header: "Jumlah", key: "jumlah", width: 10 },
    ColumnSpec { header: "Satuan", key: "satuan", width: 10 },
    ColumnSpec { header: "Penyakit", key: "penyakit", width: 20 },
    ColumnSpec { header: "Jenis Hewan", key: "jenis_hewan", width: 15 },
    ColumnSpec { header: "Catatan", key: "catatan", width: 30 },
];

/// Columns of the usage-import template.
pub const USAGE_IMPORT_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec { header: "Nama Obat", key: "medicine_name", width: 25 },
    ColumnSpec { header: "Jumlah Digunakan", key: "quantity_used", width: 16 },
    ColumnSpec { header: "Penyakit Diobati", key: "disease_treated", width: 20 },
    ColumnSpec { header: "Jenis Hewan", key: "animal_type", width: 15 },
    ColumnSpec { header: "Tanggal Penggunaan", key: "usage_date", width: 18 },
    ColumnSpec { header: "Catatan", key: "notes", width: 30 },
];

/// Columns of the medicine-import template.
pub const MEDICINE_IMPORT_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec { header: "Nama Obat", key: "name", width: 25 },
    ColumnSpec { header: "Kategori", key: "category", width: 15 },
    ColumnSpec { header: "Satuan", key: "unit", width: 10 },
    ColumnSpec { header: "Stock Awal", key: "stock_initial", width: 12 },
    ColumnSpec { header: "Stock Saat Ini", key: "stock_current", width: 12 },
];

/// Build the usage-history sheet from filtered rows.
pub fn usage_history_sheet(rows: &[UsageView]) -> Sheet {
    let mut sheet = Sheet::new(USAGE_EXPORT_COLUMNS);
    for row in rows {
        sheet.push_record(&record(&[
            ("tanggal", row.usage_date.to_string()),
            ("upt", row.upt_name.clone()),
            ("nama_obat", row.medicine_name.clone()),
            ("jumlah", row.quantity_used.to_string()),
            ("satuan", row.unit.clone()),
            ("penyakit", row.disease_treated.clone()),
            ("jenis_hewan", row.animal_type.clone()),
            ("catatan", row.notes.clone().unwrap_or_default()),
        ]));
    }
    sheet
}

/// Usage-import template: header plus two illustrative rows.
pub fn usage_import_template() -> Sheet {
    let mut sheet = Sheet::new(USAGE_IMPORT_COLUMNS);
    sheet.push_record(&record(&[
        ("medicine_name", "Amoxicillin 250mg".into()),
        ("quantity_used", "10".into()),
        ("disease_treated", "Helmintiasis".into()),
        ("animal_type", "Kambing".into()),
        ("usage_date", "2024-01-15".into()),
        ("notes", "Pengobatan lanjutan".into()),
    ]));
    sheet.push_record(&record(&[
        ("medicine_name", "Vitamin B Complex".into()),
        ("quantity_used", "5".into()),
        ("disease_treated", "Anorexia".into()),
        ("animal_type", "Sapi".into()),
        ("usage_date", "2024-01-16".into()),
    ]));
    sheet
}

/// Medicine-import template: header plus two illustrative rows.
pub fn medicine_import_template() -> Sheet {
    let mut sheet = Sheet::new(MEDICINE_IMPORT_COLUMNS);
    sheet.push_record(&record(&[
        ("name", "Amoxicillin 250mg".into()),
        ("category", "Antibiotik".into()),
        ("unit", "ml".into()),
        ("stock_initial", "100".into()),
        ("stock_current", "100".into()),
    ]));
    sheet.push_record(&record(&[
        ("name", "Vitamin B Complex".into()),
        ("category", "Vitamin".into()),
        ("unit", "ml".into()),
        ("stock_initial", "50".into()),
        ("stock_current", "50".into()),
    ]));
    sheet
}

fn record(pairs: &[(&str, String)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

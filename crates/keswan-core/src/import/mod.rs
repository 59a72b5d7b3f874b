//! Batch import of workbook uploads.
//!
//! Three phases with distinct failure policies:
//!
//! 1. decode — a malformed file aborts the whole upload;
//! 2. validation — runs over every row first; any error means zero writes;
//! 3. write — per-row best effort: reference or store failures skip that row,
//!    the rest of the batch continues, and every failure is reported.

mod validate;

pub use validate::*;

use std::io::Read;

use thiserror::Error;
use tracing::info;

use crate::db::{Database, DbError};
use crate::models::{Medicine, MedicineUsage};
use crate::resolver::MedicineIndex;
use crate::sheet::{self, SheetError};

/// Import failures that abort the batch before the write phase.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("unreadable workbook: {0}")]
    Format(#[from] SheetError),

    #[error("validation failed with {} error(s)", .0.len())]
    Validation(Vec<String>),

    #[error(transparent)]
    Db(#[from] DbError),
}

/// Outcome of the write phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub errors: Vec<String>,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validation rules for a usage-event upload.
pub const USAGE_IMPORT_RULES: &[FieldRule] = &[
    FieldRule::required("Nama Obat", "medicine_name", FieldKind::Text),
    FieldRule::required("Jumlah Digunakan", "quantity_used", FieldKind::PositiveInt),
    FieldRule::required("Penyakit Diobati", "disease_treated", FieldKind::Text),
    FieldRule::required("Jenis Hewan", "animal_type", FieldKind::Text),
    FieldRule::required("Tanggal Penggunaan", "usage_date", FieldKind::Date),
    FieldRule::optional("Catatan", "notes", FieldKind::Text),
];

/// Validation rules for a medicine-catalog upload.
pub const MEDICINE_IMPORT_RULES: &[FieldRule] = &[
    FieldRule::required("Nama Obat", "name", FieldKind::Text),
    FieldRule::optional("Kategori", "category", FieldKind::Text),
    FieldRule::optional("Satuan", "unit", FieldKind::Text),
    FieldRule::required("Stock Awal", "stock_initial", FieldKind::PositiveInt),
    FieldRule::optional("Stock Saat Ini", "stock_current", FieldKind::PositiveInt),
];

/// Import usage events for one UPT from an uploaded workbook.
///
/// Medicine names must resolve against the pre-registered catalog; an
/// unresolved name fails only its own row. Each imported row decrements the
/// referenced medicine's stock.
pub fn import_usage<R: Read>(
    db: &mut Database,
    upt_id: &str,
    reader: R,
) -> Result<ImportReport, ImportError> {
    let rows = sheet::decode(reader)?;

    let errors = validate_batch(&rows, USAGE_IMPORT_RULES);
    if !errors.is_empty() {
        return Err(ImportError::Validation(errors));
    }

    let index = MedicineIndex::from_catalog(&db.list_medicines()?);

    let mut report = ImportReport::default();
    for (idx, row) in rows.iter().enumerate() {
        let row_num = idx + 2;

        // Fields below were checked by the validation gate
        let name = row.field("Nama Obat", "medicine_name").unwrap_or_default();
        let quantity: i64 = row
            .field("Jumlah Digunakan", "quantity_used")
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();
        let usage_date = row
            .field("Tanggal Penggunaan", "usage_date")
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        let medicine_id = match index.resolve(name) {
            Ok(id) => id.to_string(),
            Err(e) => {
                report.errors.push(format!("row {}: {}", row_num, e));
                continue;
            }
        };

        let mut usage = MedicineUsage::new(
            medicine_id,
            upt_id.to_string(),
            quantity,
            row.field("Penyakit Diobati", "disease_treated")
                .unwrap_or_default()
                .to_string(),
            row.field("Jenis Hewan", "animal_type")
                .unwrap_or_default()
                .to_string(),
            usage_date,
        );
        usage.notes = row.field("Catatan", "notes").map(str::to_string);

        match db.record_usage_event(&usage) {
            Ok(_) => report.imported += 1,
            Err(e) => report.errors.push(format!("row {}: {}", row_num, e)),
        }
    }

    info!(
        imported = report.imported,
        failed = report.errors.len(),
        "usage import finished"
    );
    Ok(report)
}

/// Import medicines into the catalog from an uploaded workbook.
pub fn import_medicines<R: Read>(
    db: &Database,
    reader: R,
) -> Result<ImportReport, ImportError> {
    let rows = sheet::decode(reader)?;

    let errors = validate_batch(&rows, MEDICINE_IMPORT_RULES);
    if !errors.is_empty() {
        return Err(ImportError::Validation(errors));
    }

    let mut report = ImportReport::default();
    for (idx, row) in rows.iter().enumerate() {
        let row_num = idx + 2;

        let name = row.field("Nama Obat", "name").unwrap_or_default();
        let stock_initial: i64 = row
            .field("Stock Awal", "stock_initial")
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        let mut medicine = Medicine::new(
            name.to_string(),
            row.field("Kategori", "category").unwrap_or("Obat").to_string(),
            row.field("Satuan", "unit").unwrap_or("ml").to_string(),
            stock_initial,
        );
        if let Some(current) = row.field("Stock Saat Ini", "stock_current") {
            if let Ok(current) = current.parse() {
                medicine.stock_current = current;
            }
        }

        match db.insert_medicine(&medicine) {
            Ok(()) => report.imported += 1,
            Err(e) => report.errors.push(format!("row {}: {}", row_num, e)),
        }
    }

    info!(
        imported = report.imported,
        failed = report.errors.len(),
        "medicine import finished"
    );
    Ok(report)
}

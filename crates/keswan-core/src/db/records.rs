//! Field record database operations.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{ActivityStatus, FieldRecord, SpeciesCounts};

impl Database {
    /// Insert a new field record.
    pub fn insert_field_record(&self, record: &FieldRecord) -> DbResult<()> {
        let counts_json = serde_json::to_string(&record.species_counts)?;
        let symptoms_json = serde_json::to_string(&record.symptoms)?;

        self.conn.execute(
            r#"
            INSERT INTO field_records (
                id, month_label, record_date, owner_name, village, district,
                species_counts, total_animals, symptoms, treatment_kind,
                dose_ml_per_head, officer, status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
            params![
                record.id,
                record.month_label,
                record.record_date.to_string(),
                record.owner_name,
                record.village,
                record.district,
                counts_json,
                record.total_animals(),
                symptoms_json,
                record.treatment_kind,
                record.dose_ml_per_head,
                record.officer,
                record.status.as_str(),
                record.created_at,
                record.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get a field record by ID.
    pub fn get_field_record(&self, id: &str) -> DbResult<Option<FieldRecord>> {
        let result = self
            .conn
            .query_row(
                r#"
                SELECT id, month_label, record_date, owner_name, village, district,
                       species_counts, symptoms, treatment_kind, dose_ml_per_head,
                       officer, status, created_at, updated_at
                FROM field_records
                WHERE id = ?
                "#,
                [id],
                map_record_row,
            )
            .optional()?;

        result.map(FieldRecordRow::into_record).transpose()
    }

    /// List field records, newest first.
    pub fn list_field_records(&self) -> DbResult<Vec<FieldRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, month_label, record_date, owner_name, village, district,
                   species_counts, symptoms, treatment_kind, dose_ml_per_head,
                   officer, status, created_at, updated_at
            FROM field_records
            ORDER BY record_date DESC, created_at DESC
            "#,
        )?;

        let rows = stmt.query_map([], map_record_row)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?.into_record()?);
        }
        Ok(records)
    }

    /// Delete a field record.
    pub fn delete_field_record(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM field_records WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for JSON-column decoding.
struct FieldRecordRow {
    id: String,
    month_label: String,
    record_date: String,
    owner_name: String,
    village: String,
    district: String,
    species_counts: String,
    symptoms: String,
    treatment_kind: String,
    dose_ml_per_head: f64,
    officer: String,
    status: String,
    created_at: String,
    updated_at: String,
}

fn map_record_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<FieldRecordRow> {
    Ok(FieldRecordRow {
        id: row.get(0)?,
        month_label: row.get(1)?,
        record_date: row.get(2)?,
        owner_name: row.get(3)?,
        village: row.get(4)?,
        district: row.get(5)?,
        species_counts: row.get(6)?,
        symptoms: row.get(7)?,
        treatment_kind: row.get(8)?,
        dose_ml_per_head: row.get(9)?,
        officer: row.get(10)?,
        status: row.get(11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}

impl FieldRecordRow {
    fn into_record(self) -> DbResult<FieldRecord> {
        let species_counts: SpeciesCounts = serde_json::from_str(&self.species_counts)?;
        let symptoms: Vec<String> = serde_json::from_str(&self.symptoms)?;
        let record_date: NaiveDate = self
            .record_date
            .parse()
            .map_err(|_| DbError::Constraint(format!("invalid record date '{}'", self.record_date)))?;
        let status = ActivityStatus::parse(&self.status)
            .ok_or_else(|| DbError::Constraint(format!("invalid status '{}'", self.status)))?;

        Ok(FieldRecord {
            id: self.id,
            month_label: self.month_label,
            record_date,
            owner_name: self.owner_name,
            village: self.village,
            district: self.district,
            species_counts,
            symptoms,
            treatment_kind: self.treatment_kind,
            dose_ml_per_head: self.dose_ml_per_head,
            officer: self.officer,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

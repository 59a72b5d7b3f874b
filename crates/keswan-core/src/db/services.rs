//! Clinic service and medicine usage database operations.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{HealthService, MedicineUsage, ServiceMedicine, ServiceStatus, ServiceType};

impl Database {
    /// Insert a new health service.
    pub fn insert_health_service(&self, service: &HealthService) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO health_services (
                id, animal_id, upt_id, service_date, service_type,
                chief_complaint, anamnesis, physical_examination, diagnosis,
                treatment_plan, follow_up_notes, veterinarian_name, status,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
            params![
                service.id,
                service.animal_id,
                service.upt_id,
                service.service_date.to_string(),
                service.service_type.as_str(),
                service.chief_complaint,
                service.anamnesis,
                service.physical_examination,
                service.diagnosis,
                service.treatment_plan,
                service.follow_up_notes,
                service.veterinarian_name,
                service.status.as_str(),
                service.created_at,
                service.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get a health service by ID.
    pub fn get_health_service(&self, id: &str) -> DbResult<Option<HealthService>> {
        let result = self
            .conn
            .query_row(
                r#"
                SELECT id, animal_id, upt_id, service_date, service_type,
                       chief_complaint, anamnesis, physical_examination, diagnosis,
                       treatment_plan, follow_up_notes, veterinarian_name, status,
                       created_at, updated_at
                FROM health_services
                WHERE id = ?
                "#,
                [id],
                map_service_row,
            )
            .optional()?;

        result.map(ServiceRow::into_service).transpose()
    }

    /// Delete a health service.
    pub fn delete_health_service(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM health_services WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// Insert a medicine line attached to a service.
    pub fn insert_service_medicine(&self, line: &ServiceMedicine) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO health_service_medicines (
                id, health_service_id, medicine_id, quantity_used,
                dosage, administration_route, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                line.id,
                line.health_service_id,
                line.medicine_id,
                line.quantity_used,
                line.dosage,
                line.administration_route,
                line.notes,
                line.created_at,
            ],
        )?;
        Ok(())
    }

    /// List medicine lines for a service.
    pub fn list_service_medicines(&self, service_id: &str) -> DbResult<Vec<ServiceMedicine>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, health_service_id, medicine_id, quantity_used,
                   dosage, administration_route, notes, created_at
            FROM health_service_medicines
            WHERE health_service_id = ?
            ORDER BY created_at
            "#,
        )?;

        let rows = stmt.query_map([service_id], |row| {
            Ok(ServiceMedicine {
                id: row.get(0)?,
                health_service_id: row.get(1)?,
                medicine_id: row.get(2)?,
                quantity_used: row.get(3)?,
                dosage: row.get(4)?,
                administration_route: row.get(5)?,
                notes: row.get(6)?,
                created_at: row.get(7)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a service medicine line.
    pub fn delete_service_medicine(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM health_service_medicines WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// Get a usage event by ID.
    pub fn get_usage(&self, id: &str) -> DbResult<Option<MedicineUsage>> {
        let result = self
            .conn
            .query_row(
                r#"
                SELECT id, medicine_id, upt_id, quantity_used, disease_treated,
                       animal_type, usage_date, notes, created_at
                FROM medicine_usage
                WHERE id = ?
                "#,
                [id],
                map_usage_row,
            )
            .optional()?;

        result.map(UsageRow::into_usage).transpose()
    }

    /// Record a usage event and decrement the referenced medicine's stock
    /// in a single transaction. Returns the new stock level.
    pub fn record_usage_event(&mut self, usage: &MedicineUsage) -> DbResult<i64> {
        let tx = self.conn.transaction()?;

        insert_usage_stmt(&tx, usage)?;

        let new_stock: Option<i64> = tx
            .query_row(
                r#"
                UPDATE medicines
                SET stock_current = stock_current - ?1,
                    updated_at = datetime('now')
                WHERE id = ?2
                RETURNING stock_current
                "#,
                params![usage.quantity_used, usage.medicine_id],
                |row| row.get(0),
            )
            .optional()?;

        let new_stock =
            new_stock.ok_or_else(|| DbError::NotFound(format!("medicine {}", usage.medicine_id)))?;

        tx.commit()?;
        Ok(new_stock)
    }

    /// Remove a usage event and restore its quantity to the stock ledger
    /// (compensating inverse of [`Database::record_usage_event`]).
    pub fn undo_usage_event(
        &mut self,
        usage_id: &str,
        medicine_id: &str,
        quantity: i64,
    ) -> DbResult<()> {
        let tx = self.conn.transaction()?;

        let deleted = tx.execute("DELETE FROM medicine_usage WHERE id = ?", [usage_id])?;
        if deleted == 0 {
            return Err(DbError::NotFound(format!("usage event {}", usage_id)));
        }

        tx.execute(
            r#"
            UPDATE medicines
            SET stock_current = stock_current + ?1,
                updated_at = datetime('now')
            WHERE id = ?2
            "#,
            params![quantity, medicine_id],
        )?;

        tx.commit()?;
        Ok(())
    }
}

fn insert_usage_stmt(conn: &rusqlite::Connection, usage: &MedicineUsage) -> DbResult<()> {
    conn.execute(
        r#"
        INSERT INTO medicine_usage (
            id, medicine_id, upt_id, quantity_used, disease_treated,
            animal_type, usage_date, notes, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
        params![
            usage.id,
            usage.medicine_id,
            usage.upt_id,
            usage.quantity_used,
            usage.disease_treated,
            usage.animal_type,
            usage.usage_date.to_string(),
            usage.notes,
            usage.created_at,
        ],
    )?;
    Ok(())
}

struct ServiceRow {
    id: String,
    animal_id: String,
    upt_id: String,
    service_date: String,
    service_type: String,
    chief_complaint: Option<String>,
    anamnesis: Option<String>,
    physical_examination: Option<String>,
    diagnosis: Option<String>,
    treatment_plan: Option<String>,
    follow_up_notes: Option<String>,
    veterinarian_name: String,
    status: String,
    created_at: String,
    updated_at: String,
}

fn map_service_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ServiceRow> {
    Ok(ServiceRow {
        id: row.get(0)?,
        animal_id: row.get(1)?,
        upt_id: row.get(2)?,
        service_date: row.get(3)?,
        service_type: row.get(4)?,
        chief_complaint: row.get(5)?,
        anamnesis: row.get(6)?,
        physical_examination: row.get(7)?,
        diagnosis: row.get(8)?,
        treatment_plan: row.get(9)?,
        follow_up_notes: row.get(10)?,
        veterinarian_name: row.get(11)?,
        status: row.get(12)?,
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
    })
}

impl ServiceRow {
    fn into_service(self) -> DbResult<HealthService> {
        let service_date: NaiveDate = self
            .service_date
            .parse()
            .map_err(|_| DbError::Constraint(format!("invalid service date '{}'", self.service_date)))?;
        let service_type = ServiceType::parse(&self.service_type)
            .ok_or_else(|| DbError::Constraint(format!("invalid service type '{}'", self.service_type)))?;
        let status = ServiceStatus::parse(&self.status)
            .ok_or_else(|| DbError::Constraint(format!("invalid service status '{}'", self.status)))?;

        Ok(HealthService {
            id: self.id,
            animal_id: self.animal_id,
            upt_id: self.upt_id,
            service_date,
            service_type,
            chief_complaint: self.chief_complaint,
            anamnesis: self.anamnesis,
            physical_examination: self.physical_examination,
            diagnosis: self.diagnosis,
            treatment_plan: self.treatment_plan,
            follow_up_notes: self.follow_up_notes,
            veterinarian_name: self.veterinarian_name,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

struct UsageRow {
    id: String,
    medicine_id: String,
    upt_id: String,
    quantity_used: i64,
    disease_treated: String,
    animal_type: String,
    usage_date: String,
    notes: Option<String>,
    created_at: String,
}

fn map_usage_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UsageRow> {
    Ok(UsageRow {
        id: row.get(0)?,
        medicine_id: row.get(1)?,
        upt_id: row.get(2)?,
        quantity_used: row.get(3)?,
        disease_treated: row.get(4)?,
        animal_type: row.get(5)?,
        usage_date: row.get(6)?,
        notes: row.get(7)?,
        created_at: row.get(8)?,
    })
}

impl UsageRow {
    fn into_usage(self) -> DbResult<MedicineUsage> {
        let usage_date: NaiveDate = self
            .usage_date
            .parse()
            .map_err(|_| DbError::Constraint(format!("invalid usage date '{}'", self.usage_date)))?;

        Ok(MedicineUsage {
            id: self.id,
            medicine_id: self.medicine_id,
            upt_id: self.upt_id,
            quantity_used: self.quantity_used,
            disease_treated: self.disease_treated,
            animal_type: self.animal_type,
            usage_date,
            notes: self.notes,
            created_at: self.created_at,
        })
    }
}

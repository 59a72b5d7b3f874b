//! Medicine inventory database operations, including the stock ledger.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::Medicine;

impl Database {
    /// Insert a new medicine.
    pub fn insert_medicine(&self, medicine: &Medicine) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO medicines (
                id, name, category, unit, stock_initial, stock_current,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                medicine.id,
                medicine.name,
                medicine.category,
                medicine.unit,
                medicine.stock_initial,
                medicine.stock_current,
                medicine.created_at,
                medicine.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get a medicine by ID.
    pub fn get_medicine(&self, id: &str) -> DbResult<Option<Medicine>> {
        self.conn
            .query_row(
                r#"
                SELECT id, name, category, unit, stock_initial, stock_current,
                       created_at, updated_at
                FROM medicines
                WHERE id = ?
                "#,
                [id],
                map_medicine,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Get a medicine by display name (case-insensitive exact match).
    pub fn find_medicine_by_name(&self, name: &str) -> DbResult<Option<Medicine>> {
        self.conn
            .query_row(
                r#"
                SELECT id, name, category, unit, stock_initial, stock_current,
                       created_at, updated_at
                FROM medicines
                WHERE LOWER(name) = LOWER(?)
                LIMIT 1
                "#,
                [name.trim()],
                map_medicine,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all medicines ordered by name.
    pub fn list_medicines(&self) -> DbResult<Vec<Medicine>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, name, category, unit, stock_initial, stock_current,
                   created_at, updated_at
            FROM medicines
            ORDER BY name
            "#,
        )?;

        let rows = stmt.query_map([], map_medicine)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Update a medicine's descriptive fields (not the stock ledger).
    pub fn update_medicine(&self, medicine: &Medicine) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE medicines SET
                name = ?2,
                category = ?3,
                unit = ?4,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![medicine.id, medicine.name, medicine.category, medicine.unit],
        )?;
        Ok(rows_affected > 0)
    }

    /// Apply a usage decrement to the stock ledger and return the new level.
    ///
    /// Single conditional UPDATE so concurrent writers cannot lose updates;
    /// the counter is allowed to go negative (over-allocation is surfaced by
    /// the low-stock flag, not prevented here).
    pub fn decrement_stock(&self, medicine_id: &str, quantity: i64) -> DbResult<i64> {
        self.conn
            .query_row(
                r#"
                UPDATE medicines
                SET stock_current = stock_current - ?1,
                    updated_at = datetime('now')
                WHERE id = ?2
                RETURNING stock_current
                "#,
                params![quantity, medicine_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| DbError::NotFound(format!("medicine {}", medicine_id)))
    }

    /// Add a delta back to the stock ledger (compensating inverse of
    /// [`Database::decrement_stock`]).
    pub fn restock(&self, medicine_id: &str, quantity: i64) -> DbResult<i64> {
        self.decrement_stock(medicine_id, -quantity)
    }
}

fn map_medicine(row: &rusqlite::Row<'_>) -> rusqlite::Result<Medicine> {
    Ok(Medicine {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        unit: row.get(3)?,
        stock_initial: row.get(4)?,
        stock_current: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

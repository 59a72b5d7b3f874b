//! UPT database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};
use crate::models::Upt;

impl Database {
    /// Insert a new UPT.
    pub fn insert_upt(&self, upt: &Upt) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO upts (id, name, address, phone, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![upt.id, upt.name, upt.address, upt.phone, upt.created_at],
        )?;
        Ok(())
    }

    /// Get a UPT by ID.
    pub fn get_upt(&self, id: &str) -> DbResult<Option<Upt>> {
        self.conn
            .query_row(
                "SELECT id, name, address, phone, created_at FROM upts WHERE id = ?",
                [id],
                |row| {
                    Ok(Upt {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        address: row.get(2)?,
                        phone: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all UPTs ordered by name.
    pub fn list_upts(&self) -> DbResult<Vec<Upt>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, address, phone, created_at FROM upts ORDER BY name")?;

        let rows = stmt.query_map([], |row| {
            Ok(Upt {
                id: row.get(0)?,
                name: row.get(1)?,
                address: row.get(2)?,
                phone: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

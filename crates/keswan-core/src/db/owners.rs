//! Animal owner and animal database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{Animal, Gender, Owner};

impl Database {
    /// Insert a new owner.
    pub fn insert_owner(&self, owner: &Owner) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO animal_owners (
                id, name, phone, address, village, district, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                owner.id,
                owner.name,
                owner.phone,
                owner.address,
                owner.village,
                owner.district,
                owner.created_at,
                owner.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get an owner by ID.
    pub fn get_owner(&self, id: &str) -> DbResult<Option<Owner>> {
        self.conn
            .query_row(
                r#"
                SELECT id, name, phone, address, village, district, created_at, updated_at
                FROM animal_owners
                WHERE id = ?
                "#,
                [id],
                map_owner,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Find an owner by (name, phone) pair.
    ///
    /// Name matching is case-insensitive exact; a missing phone on both sides
    /// counts as a match (the pair identifies the owner, not the name alone).
    pub fn find_owner(&self, name: &str, phone: Option<&str>) -> DbResult<Option<Owner>> {
        self.conn
            .query_row(
                r#"
                SELECT id, name, phone, address, village, district, created_at, updated_at
                FROM animal_owners
                WHERE LOWER(name) = LOWER(?1)
                  AND IFNULL(phone, '') = IFNULL(?2, '')
                ORDER BY created_at
                LIMIT 1
                "#,
                params![name.trim(), phone],
                map_owner,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all owners ordered by name.
    pub fn list_owners(&self) -> DbResult<Vec<Owner>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, name, phone, address, village, district, created_at, updated_at
            FROM animal_owners
            ORDER BY name
            "#,
        )?;

        let rows = stmt.query_map([], map_owner)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete an owner. Fails while animals still reference it.
    pub fn delete_owner(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM animal_owners WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// Insert a new animal.
    pub fn insert_animal(&self, animal: &Animal) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO animals (
                id, owner_id, name, species, breed, age_months, gender,
                weight_kg, color, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                animal.id,
                animal.owner_id,
                animal.name,
                animal.species,
                animal.breed,
                animal.age_months,
                animal.gender.map(|g| g.as_str()),
                animal.weight_kg,
                animal.color,
                animal.created_at,
                animal.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get an animal by ID.
    pub fn get_animal(&self, id: &str) -> DbResult<Option<Animal>> {
        let result = self
            .conn
            .query_row(
                r#"
                SELECT id, owner_id, name, species, breed, age_months, gender,
                       weight_kg, color, created_at, updated_at
                FROM animals
                WHERE id = ?
                "#,
                [id],
                map_animal_row,
            )
            .optional()?;

        result.map(AnimalRow::into_animal).transpose()
    }

    /// List animals belonging to an owner, newest first.
    pub fn list_animals_for_owner(&self, owner_id: &str) -> DbResult<Vec<Animal>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, owner_id, name, species, breed, age_months, gender,
                   weight_kg, color, created_at, updated_at
            FROM animals
            WHERE owner_id = ?
            ORDER BY created_at DESC
            "#,
        )?;

        let rows = stmt.query_map([owner_id], map_animal_row)?;
        let mut animals = Vec::new();
        for row in rows {
            animals.push(row?.into_animal()?);
        }
        Ok(animals)
    }

    /// Delete an animal.
    pub fn delete_animal(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM animals WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

fn map_owner(row: &rusqlite::Row<'_>) -> rusqlite::Result<Owner> {
    Ok(Owner {
        id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        address: row.get(3)?,
        village: row.get(4)?,
        district: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

/// Intermediate row struct; gender is stored as TEXT.
struct AnimalRow {
    id: String,
    owner_id: String,
    name: Option<String>,
    species: String,
    breed: Option<String>,
    age_months: Option<i64>,
    gender: Option<String>,
    weight_kg: Option<f64>,
    color: Option<String>,
    created_at: String,
    updated_at: String,
}

fn map_animal_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AnimalRow> {
    Ok(AnimalRow {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        name: row.get(2)?,
        species: row.get(3)?,
        breed: row.get(4)?,
        age_months: row.get(5)?,
        gender: row.get(6)?,
        weight_kg: row.get(7)?,
        color: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

impl AnimalRow {
    fn into_animal(self) -> DbResult<Animal> {
        let gender = match self.gender {
            Some(raw) => Some(
                Gender::parse(&raw)
                    .ok_or_else(|| DbError::Constraint(format!("invalid gender '{}'", raw)))?,
            ),
            None => None,
        };

        Ok(Animal {
            id: self.id,
            owner_id: self.owner_id,
            name: self.name,
            species: self.species,
            breed: self.breed,
            age_months: self.age_months,
            gender,
            weight_kg: self.weight_kg,
            color: self.color,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

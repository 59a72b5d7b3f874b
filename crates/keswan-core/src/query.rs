//! Filter and sort composition for usage listings.

use chrono::NaiveDate;
use rusqlite::params_from_iter;

use crate::db::{Database, DbResult};
use crate::models::{CurrentUser, UsageView};

/// Optional listing criteria. Present criteria are AND-combined; the
/// free-text search is OR-matched across the denormalized display fields
/// (medicine name, UPT name, disease, animal type). An empty string means
/// "no filter on that dimension".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsageFilter {
    pub search: Option<String>,
    pub upt_id: Option<String>,
    pub medicine_id: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl UsageFilter {
    /// Filter pre-scoped to what a user may see: UPT staff are pinned to
    /// their own clinic, Dinas sees everything.
    pub fn scoped(user: &CurrentUser) -> Self {
        Self {
            upt_id: user.visible_upt().map(str::to_string),
            ..Default::default()
        }
    }

    /// Apply all present criteria to one row.
    pub fn matches(&self, row: &UsageView) -> bool {
        if let Some(term) = normalized(&self.search) {
            let term = term.to_lowercase();
            let hit = row.medicine_name.to_lowercase().contains(&term)
                || row.upt_name.to_lowercase().contains(&term)
                || row.disease_treated.to_lowercase().contains(&term)
                || row.animal_type.to_lowercase().contains(&term);
            if !hit {
                return false;
            }
        }

        if let Some(upt_id) = normalized(&self.upt_id) {
            if row.upt_id != upt_id {
                return false;
            }
        }

        if let Some(medicine_id) = normalized(&self.medicine_id) {
            if row.medicine_id != medicine_id {
                return false;
            }
        }

        if let Some(from) = self.date_from {
            if row.usage_date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if row.usage_date > to {
                return false;
            }
        }

        true
    }

    /// Filter an already-fetched collection.
    pub fn apply(&self, rows: Vec<UsageView>) -> Vec<UsageView> {
        rows.into_iter().filter(|row| self.matches(row)).collect()
    }
}

fn normalized(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Sort key applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    MedicineName,
    Date,
    Quantity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

/// Sort rows in place. Name keys compare case-insensitively; date and
/// quantity compare numerically.
pub fn sort_usage(rows: &mut [UsageView], key: SortKey, dir: SortDir) {
    rows.sort_by(|a, b| {
        let ord = match key {
            SortKey::MedicineName => a
                .medicine_name
                .to_lowercase()
                .cmp(&b.medicine_name.to_lowercase()),
            SortKey::Date => a.usage_date.cmp(&b.usage_date),
            SortKey::Quantity => a.quantity_used.cmp(&b.quantity_used),
        };
        match dir {
            SortDir::Asc => ord,
            SortDir::Desc => ord.reverse(),
        }
    });
}

impl Database {
    /// List denormalized usage rows matching the filter, newest first.
    ///
    /// Composes the same predicate as [`UsageFilter::matches`] server-side;
    /// ISO date text compares correctly for the range bounds.
    pub fn list_usage(&self, filter: &UsageFilter) -> DbResult<Vec<UsageView>> {
        let mut sql = String::from(
            r#"
            SELECT u.id, u.usage_date, u.upt_id, up.name, u.medicine_id, m.name,
                   m.unit, u.quantity_used, u.disease_treated, u.animal_type, u.notes
            FROM medicine_usage u
            JOIN medicines m ON m.id = u.medicine_id
            JOIN upts up ON up.id = u.upt_id
            "#,
        );

        let mut clauses: Vec<&str> = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if let Some(term) = normalized(&filter.search) {
            clauses.push(
                "(m.name LIKE ? OR up.name LIKE ? OR u.disease_treated LIKE ? OR u.animal_type LIKE ?)",
            );
            let pattern = format!("%{}%", term);
            for _ in 0..4 {
                params.push(pattern.clone());
            }
        }
        if let Some(upt_id) = normalized(&filter.upt_id) {
            clauses.push("u.upt_id = ?");
            params.push(upt_id.to_string());
        }
        if let Some(medicine_id) = normalized(&filter.medicine_id) {
            clauses.push("u.medicine_id = ?");
            params.push(medicine_id.to_string());
        }
        if let Some(from) = filter.date_from {
            clauses.push("u.usage_date >= ?");
            params.push(from.to_string());
        }
        if let Some(to) = filter.date_to {
            clauses.push("u.usage_date <= ?");
            params.push(to.to_string());
        }

        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY u.usage_date DESC, u.created_at DESC");

        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(params.iter()), |row| {
            Ok(UsageViewRow {
                id: row.get(0)?,
                usage_date: row.get(1)?,
                upt_id: row.get(2)?,
                upt_name: row.get(3)?,
                medicine_id: row.get(4)?,
                medicine_name: row.get(5)?,
                unit: row.get(6)?,
                quantity_used: row.get(7)?,
                disease_treated: row.get(8)?,
                animal_type: row.get(9)?,
                notes: row.get(10)?,
            })
        })?;

        let mut views = Vec::new();
        for row in rows {
            views.push(row?.into_view()?);
        }
        Ok(views)
    }
}

struct UsageViewRow {
    id: String,
    usage_date: String,
    upt_id: String,
    upt_name: String,
    medicine_id: String,
    medicine_name: String,
    unit: String,
    quantity_used: i64,
    disease_treated: String,
    animal_type: String,
    notes: Option<String>,
}

impl UsageViewRow {
    fn into_view(self) -> DbResult<UsageView> {
        let usage_date: NaiveDate = self.usage_date.parse().map_err(|_| {
            crate::db::DbError::Constraint(format!("invalid usage date '{}'", self.usage_date))
        })?;

        Ok(UsageView {
            id: self.id,
            usage_date,
            upt_id: self.upt_id,
            upt_name: self.upt_name,
            medicine_id: self.medicine_id,
            medicine_name: self.medicine_name,
            unit: self.unit,
            quantity_used: self.quantity_used,
            disease_treated: self.disease_treated,
            animal_type: self.animal_type,
            notes: self.notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn view(id: &str, upt: &str, medicine: &str, disease: &str, animal: &str, d: NaiveDate) -> UsageView {
        UsageView {
            id: id.into(),
            usage_date: d,
            upt_id: upt.into(),
            upt_name: format!("UPT {}", upt),
            medicine_id: format!("med-{}", medicine),
            medicine_name: medicine.into(),
            unit: "ml".into(),
            quantity_used: 5,
            disease_treated: disease.into(),
            animal_type: animal.into(),
            notes: None,
        }
    }

    #[test]
    fn test_criteria_are_and_combined() {
        let filter = UsageFilter {
            upt_id: Some("U1".into()),
            date_from: Some(date(2024, 1, 1)),
            date_to: Some(date(2024, 1, 31)),
            ..Default::default()
        };

        let inside = view("a", "U1", "Amoxicillin", "flu", "sapi", date(2024, 1, 15));
        let wrong_upt = view("b", "U2", "Amoxicillin", "flu", "sapi", date(2024, 1, 15));
        let too_late = view("c", "U1", "Amoxicillin", "flu", "sapi", date(2024, 2, 1));

        assert!(filter.matches(&inside));
        assert!(!filter.matches(&wrong_upt));
        assert!(!filter.matches(&too_late));
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let filter = UsageFilter {
            date_from: Some(date(2024, 1, 1)),
            date_to: Some(date(2024, 1, 31)),
            ..Default::default()
        };

        assert!(filter.matches(&view("a", "U1", "X", "", "", date(2024, 1, 1))));
        assert!(filter.matches(&view("b", "U1", "X", "", "", date(2024, 1, 31))));
        assert!(!filter.matches(&view("c", "U1", "X", "", "", date(2023, 12, 31))));
    }

    #[test]
    fn test_search_or_matches_across_fields() {
        let filter = UsageFilter {
            search: Some("sapi".into()),
            ..Default::default()
        };

        // animal_type matches even though the disease does not
        let by_animal = view("a", "U1", "Amoxicillin", "flu", "sapi", date(2024, 1, 1));
        assert!(filter.matches(&by_animal));

        let by_medicine = view("b", "U1", "Obat Sapi Plus", "flu", "kambing", date(2024, 1, 1));
        assert!(filter.matches(&by_medicine));

        let no_match = view("c", "U1", "Amoxicillin", "flu", "kambing", date(2024, 1, 1));
        assert!(!filter.matches(&no_match));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let filter = UsageFilter {
            search: Some("AMOX".into()),
            ..Default::default()
        };
        assert!(filter.matches(&view("a", "U1", "Amoxicillin", "", "", date(2024, 1, 1))));
    }

    #[test]
    fn test_empty_criteria_match_everything() {
        let filter = UsageFilter {
            search: Some("   ".into()),
            upt_id: Some(String::new()),
            ..Default::default()
        };
        assert!(filter.matches(&view("a", "U1", "X", "", "", date(2024, 1, 1))));
    }

    #[test]
    fn test_scoped_filter_pins_upt() {
        let upt_user = CurrentUser::upt("u1".into(), "U7".into());
        let filter = UsageFilter::scoped(&upt_user);
        assert_eq!(filter.upt_id.as_deref(), Some("U7"));

        let dinas = CurrentUser { id: "u2".into(), role: Role::Dinas, upt_id: None };
        assert_eq!(UsageFilter::scoped(&dinas).upt_id, None);
    }

    #[test]
    fn test_sort_name_case_insensitive() {
        let mut rows = vec![
            view("a", "U1", "vitamin B", "", "", date(2024, 1, 1)),
            view("b", "U1", "Amoxicillin", "", "", date(2024, 1, 2)),
        ];
        sort_usage(&mut rows, SortKey::MedicineName, SortDir::Asc);
        assert_eq!(rows[0].medicine_name, "Amoxicillin");

        sort_usage(&mut rows, SortKey::MedicineName, SortDir::Desc);
        assert_eq!(rows[0].medicine_name, "vitamin B");
    }

    #[test]
    fn test_sort_by_date_desc() {
        let mut rows = vec![
            view("a", "U1", "X", "", "", date(2024, 1, 1)),
            view("b", "U1", "X", "", "", date(2024, 3, 1)),
        ];
        sort_usage(&mut rows, SortKey::Date, SortDir::Desc);
        assert_eq!(rows[0].id, "b");
    }
}

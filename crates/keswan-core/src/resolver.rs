//! Reference resolution: human-entered names → backing-store IDs.
//!
//! Medicines and owners resolve differently on purpose. The medicine catalog
//! is curated, so an unknown name is an error and nothing is created. Owners
//! are open-world: an unknown (name, phone) pair creates a new record.

use std::collections::HashMap;

use strsim::jaro_winkler;
use thiserror::Error;

use crate::db::{Database, DbResult};
use crate::models::{Medicine, Owner};

/// Minimum Jaro-Winkler similarity for a "closest match" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.85;

/// Resolution errors.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("medicine '{name}' is not registered{}", suggestion_suffix(.suggestion))]
    MedicineNotFound {
        name: String,
        suggestion: Option<String>,
    },
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (closest match: '{}')", s),
        None => String::new(),
    }
}

/// Case-insensitive name→ID index over the pre-fetched medicine catalog.
pub struct MedicineIndex {
    by_name: HashMap<String, String>,
    names: Vec<String>,
}

impl MedicineIndex {
    pub fn from_catalog(catalog: &[Medicine]) -> Self {
        Self {
            by_name: catalog
                .iter()
                .map(|m| (m.name.trim().to_lowercase(), m.id.clone()))
                .collect(),
            names: catalog.iter().map(|m| m.name.clone()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Resolve a display name to its medicine ID (case-insensitive exact).
    pub fn resolve(&self, name: &str) -> Result<&str, ResolveError> {
        let folded = name.trim().to_lowercase();
        self.by_name
            .get(&folded)
            .map(String::as_str)
            .ok_or_else(|| ResolveError::MedicineNotFound {
                name: name.trim().to_string(),
                suggestion: self.closest(&folded),
            })
    }

    fn closest(&self, folded: &str) -> Option<String> {
        self.names
            .iter()
            .map(|n| (n, jaro_winkler(&n.to_lowercase(), folded)))
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(n, _)| n.clone())
    }
}

/// New-owner fields as entered on a submission form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OwnerDraft {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub village: Option<String>,
    pub district: Option<String>,
}

/// Resolve an owner by (name, phone), creating one when absent.
///
/// Returns the owner and whether it was created by this call.
pub fn resolve_owner(db: &Database, draft: &OwnerDraft) -> DbResult<(Owner, bool)> {
    if let Some(existing) = db.find_owner(&draft.name, draft.phone.as_deref())? {
        return Ok((existing, false));
    }

    let mut owner = Owner::new(draft.name.trim().to_string());
    owner.phone = draft.phone.clone();
    owner.address = draft.address.clone();
    owner.village = draft.village.clone();
    owner.district = draft.district.clone();
    db.insert_owner(&owner)?;

    tracing::debug!(owner_id = %owner.id, "created new owner");
    Ok((owner, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Medicine> {
        vec![
            Medicine::new("Amoxicillin".into(), "Antibiotik".into(), "ml".into(), 100),
            Medicine::new("Ivermectin".into(), "Antiparasit".into(), "ml".into(), 50),
        ]
    }

    #[test]
    fn test_resolve_case_insensitive() {
        let catalog = catalog();
        let index = MedicineIndex::from_catalog(&catalog);
        assert_eq!(index.len(), 2);
        assert!(!index.is_empty());

        assert_eq!(index.resolve("amoxicillin").unwrap(), catalog[0].id);
        assert_eq!(index.resolve("AMOXICILLIN").unwrap(), catalog[0].id);
        assert_eq!(index.resolve("  Amoxicillin ").unwrap(), catalog[0].id);
    }

    #[test]
    fn test_resolve_miss_suggests_closest() {
        let catalog = catalog();
        let index = MedicineIndex::from_catalog(&catalog);

        let err = index.resolve("Amoxicilin").unwrap_err();
        let ResolveError::MedicineNotFound { name, suggestion } = err;
        assert_eq!(name, "Amoxicilin");
        assert_eq!(suggestion.as_deref(), Some("Amoxicillin"));
    }

    #[test]
    fn test_resolve_miss_without_plausible_suggestion() {
        let catalog = catalog();
        let index = MedicineIndex::from_catalog(&catalog);

        let err = index.resolve("Paracetamol").unwrap_err();
        let ResolveError::MedicineNotFound { suggestion, .. } = err;
        assert_eq!(suggestion, None);
    }

    #[test]
    fn test_error_message_names_the_medicine() {
        let index = MedicineIndex::from_catalog(&[]);
        let err = index.resolve("Obat Ajaib").unwrap_err();
        assert!(err.to_string().contains("Obat Ajaib"));
    }

    #[test]
    fn test_resolve_owner_creates_then_reuses() {
        let db = Database::open_in_memory().unwrap();
        let draft = OwnerDraft {
            name: "Budi Santoso".into(),
            phone: Some("0812345".into()),
            ..Default::default()
        };

        let (first, created) = resolve_owner(&db, &draft).unwrap();
        assert!(created);

        let (second, created) = resolve_owner(&db, &draft).unwrap();
        assert!(!created);
        assert_eq!(first.id, second.id);

        // Case-insensitive on the name half of the pair
        let relaxed = OwnerDraft {
            name: "budi santoso".into(),
            phone: Some("0812345".into()),
            ..Default::default()
        };
        let (third, created) = resolve_owner(&db, &relaxed).unwrap();
        assert!(!created);
        assert_eq!(first.id, third.id);
    }

    #[test]
    fn test_resolve_owner_distinct_phone_is_new_owner() {
        let db = Database::open_in_memory().unwrap();

        let (first, _) = resolve_owner(
            &db,
            &OwnerDraft { name: "Budi".into(), phone: Some("1".into()), ..Default::default() },
        )
        .unwrap();
        let (second, created) = resolve_owner(
            &db,
            &OwnerDraft { name: "Budi".into(), phone: Some("2".into()), ..Default::default() },
        )
        .unwrap();

        assert!(created);
        assert_ne!(first.id, second.id);
    }
}

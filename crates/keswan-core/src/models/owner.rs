//! Animal owner and animal models.

use serde::{Deserialize, Serialize};

/// The caretaker of one or more treated animals.
///
/// Owners are open-world: a submission that names an unknown (name, phone)
/// pair creates a new record. Dedup happens in the resolver, not here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Owner {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub village: Option<String>,
    pub district: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Owner {
    pub fn new(name: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            phone: None,
            address: None,
            village: None,
            district: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Animal gender.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Jantan,
    Betina,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Jantan => "jantan",
            Gender::Betina => "betina",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "jantan" => Some(Gender::Jantan),
            "betina" => Some(Gender::Betina),
            _ => None,
        }
    }
}

/// A single treated animal.
///
/// Append-only: every service submission inserts a fresh row, even when the
/// same physical animal is treated again. There is no animal-identity
/// reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Animal {
    pub id: String,
    pub owner_id: String,
    pub name: Option<String>,
    pub species: String,
    pub breed: Option<String>,
    pub age_months: Option<i64>,
    pub gender: Option<Gender>,
    pub weight_kg: Option<f64>,
    pub color: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Animal {
    pub fn new(owner_id: String, species: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id,
            name: None,
            species,
            breed: None,
            age_months: None,
            gender: None,
            weight_kg: None,
            color: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

//! Medicine inventory models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stock level below which a medicine is flagged for restocking.
pub const LOW_STOCK_THRESHOLD: i64 = 50;

/// A veterinary medicine in the agency inventory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medicine {
    pub id: String,
    /// Display name, unique by convention (not enforced by the store)
    pub name: String,
    /// Category (e.g., "Antibiotik", "Vitamin")
    pub category: String,
    /// Unit of measure (e.g., "ml", "tablet")
    pub unit: String,
    /// Opening stock, set once at registration
    pub stock_initial: i64,
    /// Running counter, decremented by every usage event; may go negative
    pub stock_current: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl Medicine {
    /// Create a new medicine with current stock equal to the opening stock.
    pub fn new(name: String, category: String, unit: String, stock_initial: i64) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            category,
            unit,
            stock_initial,
            stock_current: stock_initial,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Low-stock flag used by dashboards; also signals over-allocation
    /// once the counter goes negative.
    pub fn is_low_stock(&self) -> bool {
        self.stock_current < LOW_STOCK_THRESHOLD
    }
}

/// One recorded application of a medicine by a UPT.
///
/// Each insert pairs with exactly one stock decrement on the referenced
/// medicine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicineUsage {
    pub id: String,
    pub medicine_id: String,
    pub upt_id: String,
    pub quantity_used: i64,
    pub disease_treated: String,
    pub animal_type: String,
    pub usage_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: String,
}

impl MedicineUsage {
    pub fn new(
        medicine_id: String,
        upt_id: String,
        quantity_used: i64,
        disease_treated: String,
        animal_type: String,
        usage_date: NaiveDate,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            medicine_id,
            upt_id,
            quantity_used,
            disease_treated,
            animal_type,
            usage_date,
            notes: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Denormalized usage row for listings, filtering and export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UsageView {
    pub id: String,
    pub usage_date: NaiveDate,
    pub upt_id: String,
    pub upt_name: String,
    pub medicine_id: String,
    pub medicine_name: String,
    pub unit: String,
    pub quantity_used: i64,
    pub disease_treated: String,
    pub animal_type: String,
    pub notes: Option<String>,
}

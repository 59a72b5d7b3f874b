//! SQLite schema definition.

/// Complete database schema for keswan.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- UPTs (field clinics)
-- ============================================================================

CREATE TABLE IF NOT EXISTS upts (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    address TEXT NOT NULL DEFAULT '',
    phone TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- ============================================================================
-- Medicine Inventory
-- ============================================================================

CREATE TABLE IF NOT EXISTS medicines (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    category TEXT NOT NULL DEFAULT '',
    unit TEXT NOT NULL DEFAULT 'ml',
    stock_initial INTEGER NOT NULL DEFAULT 0,
    stock_current INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_medicines_name ON medicines(name);

-- ============================================================================
-- Animal Owners and Animals
-- ============================================================================

CREATE TABLE IF NOT EXISTS animal_owners (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    phone TEXT,
    address TEXT,
    village TEXT,
    district TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_owners_name ON animal_owners(name);

CREATE TABLE IF NOT EXISTS animals (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL REFERENCES animal_owners(id),
    name TEXT,
    species TEXT NOT NULL,
    breed TEXT,
    age_months INTEGER,
    gender TEXT,
    weight_kg REAL,
    color TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_animals_owner ON animals(owner_id);

-- ============================================================================
-- Field Records (rekam medis / pelayanan lapangan)
-- ============================================================================

CREATE TABLE IF NOT EXISTS field_records (
    id TEXT PRIMARY KEY,
    month_label TEXT NOT NULL,
    record_date TEXT NOT NULL,
    owner_name TEXT NOT NULL,
    village TEXT NOT NULL DEFAULT '',
    district TEXT NOT NULL DEFAULT '',
    species_counts TEXT NOT NULL DEFAULT '{}',   -- JSON object of per-species tallies
    total_animals INTEGER NOT NULL DEFAULT 0,
    symptoms TEXT NOT NULL DEFAULT '[]',         -- JSON array of symptom keys
    treatment_kind TEXT NOT NULL DEFAULT '',
    dose_ml_per_head REAL NOT NULL DEFAULT 0,
    officer TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'PASIF',
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_field_records_date ON field_records(record_date);

-- ============================================================================
-- Health Services (clinic visits)
-- ============================================================================

CREATE TABLE IF NOT EXISTS health_services (
    id TEXT PRIMARY KEY,
    animal_id TEXT NOT NULL REFERENCES animals(id),
    upt_id TEXT NOT NULL REFERENCES upts(id),
    service_date TEXT NOT NULL,
    service_type TEXT NOT NULL,
    chief_complaint TEXT,
    anamnesis TEXT,
    physical_examination TEXT,
    diagnosis TEXT,
    treatment_plan TEXT,
    follow_up_notes TEXT,
    veterinarian_name TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'selesai',
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_services_animal ON health_services(animal_id);
CREATE INDEX IF NOT EXISTS idx_services_upt ON health_services(upt_id);

CREATE TABLE IF NOT EXISTS health_service_medicines (
    id TEXT PRIMARY KEY,
    health_service_id TEXT NOT NULL REFERENCES health_services(id),
    medicine_id TEXT NOT NULL REFERENCES medicines(id),
    quantity_used INTEGER NOT NULL,
    dosage TEXT,
    administration_route TEXT,
    notes TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_service_medicines_service
    ON health_service_medicines(health_service_id);

-- ============================================================================
-- Medicine Usage (stock ledger events)
-- ============================================================================

CREATE TABLE IF NOT EXISTS medicine_usage (
    id TEXT PRIMARY KEY,
    medicine_id TEXT NOT NULL REFERENCES medicines(id),
    upt_id TEXT NOT NULL REFERENCES upts(id),
    quantity_used INTEGER NOT NULL,
    disease_treated TEXT NOT NULL DEFAULT '',
    animal_type TEXT NOT NULL DEFAULT '',
    usage_date TEXT NOT NULL,
    notes TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_usage_medicine ON medicine_usage(medicine_id);
CREATE INDEX IF NOT EXISTS idx_usage_upt ON medicine_usage(upt_id);
CREATE INDEX IF NOT EXISTS idx_usage_date ON medicine_usage(usage_date);
"#;

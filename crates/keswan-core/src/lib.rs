//! Keswan Core Library
//!
//! Domain core for a livestock agency ("Dinas") and its subordinate field
//! clinics ("UPT"): veterinary medicine inventory, animal-health service
//! records, workbook import/export, and the multi-entity submission workflow.
//!
//! # Architecture
//!
//! ```text
//! Workbook upload ──▶ sheet::decode ──▶ import::validate_batch
//!                                            │  (all-or-nothing gate)
//!                                            ▼
//!                          resolver (medicine names → IDs, strict;
//!                                    owners resolved-or-created)
//!                                            │
//!                                            ▼
//!              workflow saga: Owner → Animal → Records → Usage events
//!                             (stock decremented atomically per line,
//!                              committed steps unwound on failure)
//!                                            │
//!                                            ▼
//!              query::UsageFilter ──▶ export ──▶ sheet::encode ──▶ download
//! ```
//!
//! # Core Principle
//!
//! **The medicine catalog is curated; owners are open-world.** Imports and
//! submissions never create a medicine as a side effect, but an unknown
//! (name, phone) owner pair is created on the spot.
//!
//! # Modules
//!
//! - [`db`]: SQLite persistence layer
//! - [`models`]: domain types (Medicine, Owner, Animal, FieldRecord, ...)
//! - [`sheet`]: tabular workbook codec (dual-header decode, `-` placeholders)
//! - [`import`]: batch import pipeline with per-phase failure policies
//! - [`export`]: export column sets, templates and file naming
//! - [`resolver`]: name → ID reference resolution
//! - [`workflow`]: service-submission saga with compensations
//! - [`query`]: filter/sort composition for usage listings

pub mod db;
pub mod export;
pub mod import;
pub mod models;
pub mod query;
pub mod resolver;
pub mod sheet;
pub mod workflow;

// Re-export commonly used types
pub use db::{Database, DbError};
pub use import::{import_medicines, import_usage, ImportError, ImportReport};
pub use models::{
    ActivityStatus, Animal, CurrentUser, FieldRecord, Gender, HealthService, Medicine,
    MedicineUsage, Owner, Role, ServiceStatus, ServiceType, SpeciesCounts, Upt, UsageView,
};
pub use query::{sort_usage, SortDir, SortKey, UsageFilter};
pub use resolver::{resolve_owner, MedicineIndex, OwnerDraft, ResolveError};
pub use sheet::{ColumnSpec, Sheet, SheetError, SheetRow};
pub use workflow::{
    AnimalDraft, ClinicDraft, FieldRecordDraft, MedicineLine, ServiceSubmission, SubmissionError,
    SubmissionOutcome, SubmissionStep,
};

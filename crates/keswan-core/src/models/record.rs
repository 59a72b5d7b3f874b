//! Field-visit record ("rekam medis") models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Livestock tallied on a field record, one counter per fixed species key.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpeciesCounts {
    #[serde(default)]
    pub sapi: u32,
    #[serde(default)]
    pub kerbau: u32,
    #[serde(default)]
    pub kambing: u32,
    #[serde(default)]
    pub domba: u32,
    #[serde(default)]
    pub kucing: u32,
    #[serde(default)]
    pub kelinci: u32,
    #[serde(default)]
    pub ayam: u32,
    #[serde(default)]
    pub anjing: u32,
    #[serde(default)]
    pub lainnya: u32,
}

impl SpeciesCounts {
    pub fn total(&self) -> u32 {
        self.sapi
            + self.kerbau
            + self.kambing
            + self.domba
            + self.kucing
            + self.kelinci
            + self.ayam
            + self.anjing
            + self.lainnya
    }
}

/// Controlled vocabulary of clinical symptom tags: (key, display label).
pub const CLINICAL_SYMPTOMS: &[(&str, &str)] = &[
    ("scabies", "Scabies"),
    ("helmintiasis", "Helmintiasis"),
    ("orf", "ORF"),
    ("bloat", "Bloat"),
    ("crd_snot", "CRD/Snot"),
    ("miasis", "Miasis"),
    ("post_partus", "Post Partus"),
    ("anorexia", "Anorexia"),
    ("endoparasit", "Endoparasit"),
    ("demam", "Demam"),
    ("infeksi_luar", "Infeksi Luar"),
    ("paralysis", "Paralysis"),
    ("luka_bakar", "Luka Bakar"),
    ("pink_eye", "Pink Eye"),
    ("retebsio_plasent", "Retebsio Plasent"),
    ("otitis", "Otitis"),
    ("enteritis_diare", "Enteritis/Diare"),
    ("kurus_kahexia", "Kurus/Kahexia"),
    ("conjuctives", "Conjuctives"),
    ("flu", "Flu"),
    ("luka", "Luka"),
    ("jamur", "Jamur"),
    ("fainting", "Fainting"),
    ("maldigesti", "Maldigesti"),
];

/// Display label for a symptom key.
pub fn symptom_label(key: &str) -> Option<&'static str> {
    CLINICAL_SYMPTOMS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| *label)
}

pub fn is_known_symptom(key: &str) -> bool {
    CLINICAL_SYMPTOMS.iter().any(|(k, _)| *k == key)
}

/// Herd activity status reported on a field record.
///
/// The form offers three mutually exclusive check inputs; `from_flags`
/// collapses them, defaulting to `Pasif` when none is set.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActivityStatus {
    Aktif,
    SemiAktif,
    #[default]
    Pasif,
}

impl ActivityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::Aktif => "AKTIF",
            ActivityStatus::SemiAktif => "SEMI AKTIF",
            ActivityStatus::Pasif => "PASIF",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "AKTIF" => Some(ActivityStatus::Aktif),
            "SEMI AKTIF" => Some(ActivityStatus::SemiAktif),
            "PASIF" => Some(ActivityStatus::Pasif),
            _ => None,
        }
    }

    pub fn from_flags(aktif: bool, semi_aktif: bool) -> Self {
        if aktif {
            ActivityStatus::Aktif
        } else if semi_aktif {
            ActivityStatus::SemiAktif
        } else {
            ActivityStatus::Pasif
        }
    }
}

/// A field-visit record: per-species headcounts, observed symptom tags and
/// the treatment applied during one village visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldRecord {
    pub id: String,
    /// Reporting month label, e.g. "Januari 2024"
    pub month_label: String,
    pub record_date: NaiveDate,
    pub owner_name: String,
    pub village: String,
    pub district: String,
    pub species_counts: SpeciesCounts,
    /// Symptom keys drawn from [`CLINICAL_SYMPTOMS`]
    pub symptoms: Vec<String>,
    pub treatment_kind: String,
    pub dose_ml_per_head: f64,
    /// Reporting officer
    pub officer: String,
    pub status: ActivityStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl FieldRecord {
    pub fn new(month_label: String, record_date: NaiveDate, owner_name: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            month_label,
            record_date,
            owner_name,
            village: String::new(),
            district: String::new(),
            species_counts: SpeciesCounts::default(),
            symptoms: Vec::new(),
            treatment_kind: String::new(),
            dose_ml_per_head: 0.0,
            officer: String::new(),
            status: ActivityStatus::Pasif,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn total_animals(&self) -> u32 {
        self.species_counts.total()
    }

    /// Symptom keys outside the controlled vocabulary.
    pub fn unknown_symptoms(&self) -> Vec<&str> {
        self.symptoms
            .iter()
            .map(String::as_str)
            .filter(|s| !is_known_symptom(s))
            .collect()
    }
}

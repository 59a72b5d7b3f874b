//! Clinic-visit service models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kind of clinic service performed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Pemeriksaan,
    Pengobatan,
    Vaksinasi,
    Operasi,
    Konsultasi,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Pemeriksaan => "pemeriksaan",
            ServiceType::Pengobatan => "pengobatan",
            ServiceType::Vaksinasi => "vaksinasi",
            ServiceType::Operasi => "operasi",
            ServiceType::Konsultasi => "konsultasi",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pemeriksaan" => Some(ServiceType::Pemeriksaan),
            "pengobatan" => Some(ServiceType::Pengobatan),
            "vaksinasi" => Some(ServiceType::Vaksinasi),
            "operasi" => Some(ServiceType::Operasi),
            "konsultasi" => Some(ServiceType::Konsultasi),
            _ => None,
        }
    }
}

/// Outcome status of a clinic visit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    Selesai,
    RawatJalan,
    RawatInap,
    Rujukan,
}

impl ServiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Selesai => "selesai",
            ServiceStatus::RawatJalan => "rawat_jalan",
            ServiceStatus::RawatInap => "rawat_inap",
            ServiceStatus::Rujukan => "rujukan",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "selesai" => Some(ServiceStatus::Selesai),
            "rawat_jalan" => Some(ServiceStatus::RawatJalan),
            "rawat_inap" => Some(ServiceStatus::RawatInap),
            "rujukan" => Some(ServiceStatus::Rujukan),
            _ => None,
        }
    }
}

/// A clinic-visit record for one animal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthService {
    pub id: String,
    pub animal_id: String,
    pub upt_id: String,
    pub service_date: NaiveDate,
    pub service_type: ServiceType,
    pub chief_complaint: Option<String>,
    pub anamnesis: Option<String>,
    pub physical_examination: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment_plan: Option<String>,
    pub follow_up_notes: Option<String>,
    pub veterinarian_name: String,
    pub status: ServiceStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl HealthService {
    pub fn new(
        animal_id: String,
        upt_id: String,
        service_date: NaiveDate,
        service_type: ServiceType,
        veterinarian_name: String,
        status: ServiceStatus,
    ) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            animal_id,
            upt_id,
            service_date,
            service_type,
            chief_complaint: None,
            anamnesis: None,
            physical_examination: None,
            diagnosis: None,
            treatment_plan: None,
            follow_up_notes: None,
            veterinarian_name,
            status,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// One medicine line attached to a clinic service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceMedicine {
    pub id: String,
    pub health_service_id: String,
    pub medicine_id: String,
    pub quantity_used: i64,
    pub dosage: Option<String>,
    pub administration_route: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
}

impl ServiceMedicine {
    pub fn new(health_service_id: String, medicine_id: String, quantity_used: i64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            health_service_id,
            medicine_id,
            quantity_used,
            dosage: None,
            administration_route: None,
            notes: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_type_round_trip() {
        for ty in [
            ServiceType::Pemeriksaan,
            ServiceType::Pengobatan,
            ServiceType::Vaksinasi,
            ServiceType::Operasi,
            ServiceType::Konsultasi,
        ] {
            assert_eq!(ServiceType::parse(ty.as_str()), Some(ty));
        }
        assert_eq!(ServiceType::parse("grooming"), None);
    }

    #[test]
    fn test_service_status_round_trip() {
        for status in [
            ServiceStatus::Selesai,
            ServiceStatus::RawatJalan,
            ServiceStatus::RawatInap,
            ServiceStatus::Rujukan,
        ] {
            assert_eq!(ServiceStatus::parse(status.as_str()), Some(status));
        }
    }
}

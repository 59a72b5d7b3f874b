//! Service submission workflow.
//!
//! One interactive submission walks
//! `Draft → OwnerResolved → AnimalCreated → RecordCreated → MedicinesApplied → Done`,
//! strictly in order, one backing-store write at a time. The store offers no
//! cross-statement transaction for the whole sequence, so the runner keeps a
//! compensation list and unwinds already-committed steps when a later one
//! fails — an owner that existed before the submission is never removed.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, warn};

use crate::db::{Database, DbError};
use crate::models::{
    ActivityStatus, Animal, FieldRecord, Gender, HealthService, MedicineUsage, ServiceMedicine,
    ServiceStatus, ServiceType, SpeciesCounts,
};
use crate::resolver::{resolve_owner, OwnerDraft};

/// Workflow states, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStep {
    Draft,
    OwnerResolved,
    AnimalCreated,
    RecordCreated,
    MedicinesApplied,
    Done,
}

impl std::fmt::Display for SubmissionStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SubmissionStep::Draft => "draft",
            SubmissionStep::OwnerResolved => "owner resolution",
            SubmissionStep::AnimalCreated => "animal creation",
            SubmissionStep::RecordCreated => "record creation",
            SubmissionStep::MedicinesApplied => "medicine application",
            SubmissionStep::Done => "done",
        };
        f.write_str(name)
    }
}

/// Submission failures. `Store` reports the last step that had begun when the
/// backing store failed, and whether the unwind left the store clean.
#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("invalid submission: {0}")]
    Invalid(String),

    #[error("submission failed after {step}: {source}")]
    Store {
        step: SubmissionStep,
        #[source]
        source: DbError,
        compensated: bool,
    },
}

/// Animal fields as entered on the form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimalDraft {
    pub name: Option<String>,
    pub species: String,
    pub breed: Option<String>,
    pub age_months: Option<i64>,
    pub gender: Option<Gender>,
    pub weight_kg: Option<f64>,
    pub color: Option<String>,
}

/// Field-record section of the unified form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldRecordDraft {
    pub month_label: String,
    pub species_counts: SpeciesCounts,
    pub symptoms: Vec<String>,
    pub treatment_kind: String,
    pub dose_ml_per_head: f64,
    pub officer: String,
    pub status: ActivityStatus,
}

/// Clinic-record section of the unified form.
#[derive(Debug, Clone, PartialEq)]
pub struct ClinicDraft {
    pub service_type: ServiceType,
    pub chief_complaint: Option<String>,
    pub anamnesis: Option<String>,
    pub physical_examination: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment_plan: Option<String>,
    pub follow_up_notes: Option<String>,
    pub veterinarian_name: String,
    pub status: ServiceStatus,
}

/// One selected medicine line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MedicineLine {
    pub medicine_id: String,
    pub quantity_used: i64,
    pub dosage: Option<String>,
    pub administration_route: Option<String>,
    pub notes: Option<String>,
}

/// A complete service submission. The unified form fills both record
/// sections; standalone forms fill exactly one.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceSubmission {
    pub owner: OwnerDraft,
    pub animal: AnimalDraft,
    pub field_record: Option<FieldRecordDraft>,
    pub clinic: Option<ClinicDraft>,
    pub medicines: Vec<MedicineLine>,
    pub upt_id: String,
    pub service_date: NaiveDate,
}

/// What a completed submission wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOutcome {
    pub owner_id: String,
    pub owner_created: bool,
    pub animal_id: String,
    pub field_record_id: Option<String>,
    pub service_id: Option<String>,
    /// (medicine_id, stock level after decrement) per applied line
    pub stock_levels: Vec<(String, i64)>,
}

enum Compensation {
    DeleteOwner(String),
    DeleteAnimal(String),
    DeleteFieldRecord(String),
    DeleteService(String),
    DeleteServiceMedicine(String),
    UndoUsage {
        usage_id: String,
        medicine_id: String,
        quantity: i64,
    },
}

impl ServiceSubmission {
    /// Run the workflow to completion or failure. On failure the remaining
    /// transitions are skipped and committed steps are unwound.
    pub fn submit(self, db: &mut Database) -> Result<SubmissionOutcome, SubmissionError> {
        self.validate()?;

        let mut undo = Vec::new();
        let mut step = SubmissionStep::Draft;

        match self.run(db, &mut undo, &mut step) {
            Ok(outcome) => {
                debug!(animal_id = %outcome.animal_id, "submission done");
                Ok(outcome)
            }
            Err(source) => {
                warn!(%step, error = %source, "submission failed, unwinding");
                let compensated = compensate(db, undo);
                Err(SubmissionError::Store { step, source, compensated })
            }
        }
    }

    fn validate(&self) -> Result<(), SubmissionError> {
        if self.owner.name.trim().is_empty() {
            return Err(SubmissionError::Invalid("owner name is required".into()));
        }
        if self.animal.species.trim().is_empty() {
            return Err(SubmissionError::Invalid("animal species is required".into()));
        }
        if self.field_record.is_none() && self.clinic.is_none() {
            return Err(SubmissionError::Invalid(
                "submission needs a field record or a clinic record".into(),
            ));
        }
        if let Some(age) = self.animal.age_months {
            if age < 0 {
                return Err(SubmissionError::Invalid("animal age cannot be negative".into()));
            }
        }
        if let Some(weight) = self.animal.weight_kg {
            if weight < 0.0 {
                return Err(SubmissionError::Invalid("animal weight cannot be negative".into()));
            }
        }
        if let Some(fr) = &self.field_record {
            for symptom in &fr.symptoms {
                if !crate::models::is_known_symptom(symptom) {
                    return Err(SubmissionError::Invalid(format!(
                        "unknown clinical symptom tag '{}'",
                        symptom
                    )));
                }
            }
        }
        for (idx, line) in self.medicines.iter().enumerate() {
            if line.quantity_used <= 0 {
                return Err(SubmissionError::Invalid(format!(
                    "medicine line {}: quantity must be positive",
                    idx + 1
                )));
            }
        }
        Ok(())
    }

    fn run(
        &self,
        db: &mut Database,
        undo: &mut Vec<Compensation>,
        step: &mut SubmissionStep,
    ) -> Result<SubmissionOutcome, DbError> {
        // 1. Owner: look up by (name, phone), create if absent
        let (owner, owner_created) = resolve_owner(db, &self.owner)?;
        if owner_created {
            undo.push(Compensation::DeleteOwner(owner.id.clone()));
        }
        *step = SubmissionStep::OwnerResolved;
        debug!(owner_id = %owner.id, created = owner_created, "owner resolved");

        // 2. Animal: always a fresh row, even for a repeat patient
        let mut animal = Animal::new(owner.id.clone(), self.animal.species.clone());
        animal.name = self.animal.name.clone();
        animal.breed = self.animal.breed.clone();
        animal.age_months = self.animal.age_months;
        animal.gender = self.animal.gender;
        animal.weight_kg = self.animal.weight_kg;
        animal.color = self.animal.color.clone();
        db.insert_animal(&animal)?;
        undo.push(Compensation::DeleteAnimal(animal.id.clone()));
        *step = SubmissionStep::AnimalCreated;

        // 3. Records
        let field_record_id = match &self.field_record {
            Some(draft) => {
                let mut record = FieldRecord::new(
                    draft.month_label.clone(),
                    self.service_date,
                    self.owner.name.clone(),
                );
                record.village = self.owner.village.clone().unwrap_or_default();
                record.district = self.owner.district.clone().unwrap_or_default();
                record.species_counts = draft.species_counts.clone();
                record.symptoms = draft.symptoms.clone();
                record.treatment_kind = draft.treatment_kind.clone();
                record.dose_ml_per_head = draft.dose_ml_per_head;
                record.officer = draft.officer.clone();
                record.status = draft.status;
                db.insert_field_record(&record)?;
                undo.push(Compensation::DeleteFieldRecord(record.id.clone()));
                Some(record.id)
            }
            None => None,
        };

        let service_id = match &self.clinic {
            Some(draft) => {
                let mut service = HealthService::new(
                    animal.id.clone(),
                    self.upt_id.clone(),
                    self.service_date,
                    draft.service_type,
                    draft.veterinarian_name.clone(),
                    draft.status,
                );
                service.chief_complaint = draft.chief_complaint.clone();
                service.anamnesis = draft.anamnesis.clone();
                service.physical_examination = draft.physical_examination.clone();
                service.diagnosis = draft.diagnosis.clone();
                service.treatment_plan = draft.treatment_plan.clone();
                service.follow_up_notes = draft.follow_up_notes.clone();
                db.insert_health_service(&service)?;
                undo.push(Compensation::DeleteService(service.id.clone()));
                Some(service.id)
            }
            None => None,
        };
        *step = SubmissionStep::RecordCreated;

        // 4. Medicine lines, one insert+decrement transaction per line
        let disease = self
            .clinic
            .as_ref()
            .and_then(|c| c.diagnosis.clone())
            .or_else(|| self.field_record.as_ref().map(|f| f.treatment_kind.clone()))
            .unwrap_or_default();

        let mut stock_levels = Vec::new();
        for line in &self.medicines {
            let mut usage = MedicineUsage::new(
                line.medicine_id.clone(),
                self.upt_id.clone(),
                line.quantity_used,
                disease.clone(),
                self.animal.species.clone(),
                self.service_date,
            );
            usage.notes = line.notes.clone();

            let new_stock = db.record_usage_event(&usage)?;
            undo.push(Compensation::UndoUsage {
                usage_id: usage.id.clone(),
                medicine_id: line.medicine_id.clone(),
                quantity: line.quantity_used,
            });

            if let Some(service_id) = &service_id {
                let mut service_line = ServiceMedicine::new(
                    service_id.clone(),
                    line.medicine_id.clone(),
                    line.quantity_used,
                );
                service_line.dosage = line.dosage.clone();
                service_line.administration_route = line.administration_route.clone();
                service_line.notes = line.notes.clone();
                db.insert_service_medicine(&service_line)?;
                undo.push(Compensation::DeleteServiceMedicine(service_line.id.clone()));
            }

            stock_levels.push((line.medicine_id.clone(), new_stock));
        }
        *step = SubmissionStep::MedicinesApplied;

        let outcome = SubmissionOutcome {
            owner_id: owner.id,
            owner_created,
            animal_id: animal.id,
            field_record_id,
            service_id,
            stock_levels,
        };
        *step = SubmissionStep::Done;
        Ok(outcome)
    }
}

/// Unwind committed steps in reverse order. Best effort: a failing
/// compensation is logged and the rest still run.
fn compensate(db: &mut Database, undo: Vec<Compensation>) -> bool {
    let mut clean = true;
    for action in undo.into_iter().rev() {
        let result = match &action {
            Compensation::DeleteOwner(id) => db.delete_owner(id).map(|_| ()),
            Compensation::DeleteAnimal(id) => db.delete_animal(id).map(|_| ()),
            Compensation::DeleteFieldRecord(id) => db.delete_field_record(id).map(|_| ()),
            Compensation::DeleteService(id) => db.delete_health_service(id).map(|_| ()),
            Compensation::DeleteServiceMedicine(id) => db.delete_service_medicine(id).map(|_| ()),
            Compensation::UndoUsage { usage_id, medicine_id, quantity } => {
                db.undo_usage_event(usage_id, medicine_id, *quantity)
            }
        };
        if let Err(e) = result {
            warn!(error = %e, "compensation step failed");
            clean = false;
        }
    }
    clean
}

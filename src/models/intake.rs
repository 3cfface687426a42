//! Intake Record Models
//!
//! The stored intake row and the validated input used to create one.

use serde::{Deserialize, Serialize};

use saju_intake_core::{
    calendar_label, gender_label, source_label, CoreResult, IntakeForm, JobState, JobStatus,
    ParsedSections,
};

/// Validated, normalized intake ready to be appended to the store.
///
/// Calendar, gender and source are already mapped to their stored labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIntake {
    pub source: String,
    pub name: String,
    pub phone: String,
    pub birthdate: String,
    pub birthtime: String,
    pub calendar_type: String,
    pub gender: String,
    pub memo: String,
    pub user_agent: String,
}

impl NewIntake {
    /// Normalize a submitted form and check its required fields.
    pub fn from_form(form: &IntakeForm) -> CoreResult<Self> {
        let form = form.normalized();
        form.validate()?;
        Ok(Self {
            source: source_label(&form.source),
            name: form.name,
            phone: form.phone,
            birthdate: form.birthdate,
            birthtime: form.birthtime,
            calendar_type: calendar_label(&form.calendar_type),
            gender: gender_label(&form.gender),
            memo: form.memo,
            user_agent: form.user_agent,
        })
    }
}

/// One row of the intake table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeRecord {
    pub row_index: i64,
    pub created_at: String,
    pub source: String,
    pub name: String,
    pub phone: String,
    pub birthdate: String,
    pub birthtime: String,
    pub calendar_type: String,
    pub gender: String,
    pub memo: String,
    pub user_agent: String,
    pub status: JobStatus,
    pub processed_at: Option<String>,
    pub sections: ParsedSections,
}

impl IntakeRecord {
    /// The state a reader observes for this record.
    ///
    /// An ERROR record carries its diagnostic in the summary column.
    pub fn job_state(&self) -> JobState {
        match self.status {
            JobStatus::Pending => JobState::Pending,
            JobStatus::Done => JobState::Done {
                result: self.sections.clone(),
            },
            JobStatus::Error => JobState::Error {
                message: self.sections.summary.clone(),
            },
        }
    }
}

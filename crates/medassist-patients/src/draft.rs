use medassist_core::models::patient::{DraftPatient, PatientStatus};

use crate::error::CreateError;

/// Status every newly proposed patient starts with.
pub const DRAFT_STATUS: PatientStatus = PatientStatus::Stable;

/// Split a typed name into a draft: the first word is the first name, the
/// remaining words (single-spaced) the last name.
pub fn parse_draft(raw_name: &str) -> Result<DraftPatient, CreateError> {
    let mut words = raw_name.split_whitespace();
    let first_name = words.next().ok_or(CreateError::Rejected)?.to_string();
    let last_name = words.collect::<Vec<_>>().join(" ");

    Ok(DraftPatient {
        first_name,
        last_name,
        status: DRAFT_STATUS,
    })
}

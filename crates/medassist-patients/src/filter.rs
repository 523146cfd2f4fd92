use std::sync::Arc;

use medassist_core::models::patient::Patient;

/// Patients whose full name contains the search term, ignoring case.
///
/// The view holds a snapshot of the list taken when it was created, so it
/// can be iterated any number of times and is unaffected by a refresh that
/// lands in between. Nothing is filtered until it is iterated.
#[derive(Debug, Clone)]
pub struct FilteredView {
    patients: Arc<[Patient]>,
    needle: String,
}

impl FilteredView {
    pub fn new(patients: Arc<[Patient]>, term: &str) -> Self {
        Self {
            patients,
            needle: term.to_lowercase(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Patient> + '_ {
        self.patients.iter().filter(|p| matches_term(p, &self.needle))
    }

    pub fn to_vec(&self) -> Vec<Patient> {
        self.iter().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl<'a> IntoIterator for &'a FilteredView {
    type Item = &'a Patient;
    type IntoIter = Box<dyn Iterator<Item = &'a Patient> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// `needle` must already be lowercased. An empty needle matches everyone.
pub fn matches_term(patient: &Patient, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    format!("{} {}", patient.first_name, patient.last_name)
        .to_lowercase()
        .contains(needle)
}

//! medassist-patients
//!
//! Patient picker: fetches the patient list, normalizes inconsistent
//! payload shapes, filters by search term, tracks the selection and turns
//! a typed name into a draft patient.

pub mod draft;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod selector;
pub mod source;
pub mod token;

pub use error::{CreateError, FetchError};
pub use filter::FilteredView;
pub use normalize::Normalizer;
pub use selector::{LoadState, PatientSelector, SelectionPolicy};
pub use source::{HttpPatientSource, PatientSource, RawResponse};
pub use token::{EnvToken, StaticToken, TokenProvider};

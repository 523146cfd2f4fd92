//! medassist-core
//!
//! Pure domain types shared by the preference store and the patient picker.
//! No I/O here: this is the vocabulary the other crates and the web front
//! end (via the exported TypeScript bindings) agree on.

pub mod error;
pub mod models;

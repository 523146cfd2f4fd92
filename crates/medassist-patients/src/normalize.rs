//! Raw payload to [`Patient`] mapping.
//!
//! The patient endpoints are not consistent about where they put a
//! patient's fields: some return them at the top level, some under a
//! `user` object, some under `User`. Each field is looked up through an
//! ordered list of [`Source`]s and the first one holding a non-null value
//! wins. Supporting a new shape means adding a `Source`, not touching the
//! lookup.
//!
//! Normalization is total: anything missing or malformed degrades to the
//! field default (empty string, or `active` for the status).

use medassist_core::models::patient::{Patient, PatientStatus};
use serde_json::Value;

use crate::error::FetchError;

/// Finds the object a patient's fields are read from, if the raw element
/// has one in this position.
pub type Locate = fn(&Value) -> Option<&Value>;

/// One extraction strategy.
#[derive(Debug, Clone, Copy)]
pub struct Source {
    pub name: &'static str,
    pub locate: Locate,
}

impl Source {
    /// First alias with a usable scalar in this source.
    pub fn extract(&self, raw: &Value, aliases: &[&str]) -> Option<String> {
        let object = (self.locate)(raw)?.as_object()?;
        aliases.iter().find_map(|alias| scalar(object.get(*alias)?))
    }
}

fn top_level(raw: &Value) -> Option<&Value> {
    Some(raw)
}

fn nested_user(raw: &Value) -> Option<&Value> {
    raw.get("user")
}

fn nested_user_capitalized(raw: &Value) -> Option<&Value> {
    raw.get("User")
}

pub const TOP_LEVEL: Source = Source {
    name: "top-level",
    locate: top_level,
};

pub const NESTED_USER: Source = Source {
    name: "user",
    locate: nested_user,
};

pub const NESTED_USER_CAPITALIZED: Source = Source {
    name: "User",
    locate: nested_user_capitalized,
};

/// Field names accepted for each patient attribute, in preference order.
pub mod field {
    pub const ID: &[&str] = &["id", "patient_id", "patientId"];
    pub const FIRST_NAME: &[&str] = &["first_name", "firstName"];
    pub const LAST_NAME: &[&str] = &["last_name", "lastName"];
    pub const EMAIL: &[&str] = &["email"];
    pub const STATUS: &[&str] = &["status"];
}

/// Collection keys that may wrap the list in an object body.
pub const LIST_KEYS: &[&str] = &["patients", "data"];

/// Ordered source table used to normalize raw patient elements.
#[derive(Debug, Clone)]
pub struct Normalizer {
    sources: Vec<Source>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            sources: vec![TOP_LEVEL, NESTED_USER, NESTED_USER_CAPITALIZED],
        }
    }
}

impl Normalizer {
    /// A normalizer with no sources; every field falls back to its default.
    pub fn empty() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Append a source, tried after the existing ones.
    pub fn with_source(mut self, source: Source) -> Self {
        self.sources.push(source);
        self
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Value from the first source that has one.
    pub fn field(&self, raw: &Value, aliases: &[&str]) -> Option<String> {
        self.sources
            .iter()
            .find_map(|source| source.extract(raw, aliases))
    }

    pub fn normalize(&self, raw: &Value) -> Patient {
        let text = |aliases: &[&str]| self.field(raw, aliases).unwrap_or_default();

        let status = match self.field(raw, field::STATUS) {
            Some(s) => s.parse().unwrap_or_else(|_| {
                tracing::debug!(status = %s, "unknown patient status, using active");
                PatientStatus::Active
            }),
            None => PatientStatus::Active,
        };

        Patient {
            id: text(field::ID),
            first_name: text(field::FIRST_NAME),
            last_name: text(field::LAST_NAME),
            email: text(field::EMAIL),
            status,
        }
    }

    /// Parse a response body and normalize every element, keeping the
    /// server's order.
    pub fn parse_body(&self, body: &[u8]) -> Result<Vec<Patient>, FetchError> {
        let json: Value =
            serde_json::from_slice(body).map_err(|e| FetchError::Parse(e.to_string()))?;
        let records = locate_records(&json)?;

        let patients: Vec<Patient> = records.iter().map(|raw| self.normalize(raw)).collect();
        let missing_ids = patients.iter().filter(|p| p.id.is_empty()).count();
        if missing_ids > 0 {
            tracing::debug!(missing_ids, "patients without an id in response");
        }
        Ok(patients)
    }
}

/// The patient array in a bare-array or wrapped-object body.
pub fn locate_records(body: &Value) -> Result<&Vec<Value>, FetchError> {
    match body {
        Value::Array(records) => Ok(records),
        Value::Object(object) => LIST_KEYS
            .iter()
            .find_map(|key| object.get(*key)?.as_array())
            .ok_or_else(|| {
                FetchError::UnexpectedShape(format!(
                    "object without a {} array",
                    LIST_KEYS.join(" or ")
                ))
            }),
        other => Err(FetchError::UnexpectedShape(format!(
            "expected array or object, got {}",
            json_type(other)
        ))),
    }
}

/// Strings as-is, numbers stringified (ids are often numeric). Null,
/// booleans, arrays and objects count as absent.
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

//! Serialized form of a [`PreferenceBag`].
//!
//! ```json
//! { "version": 1, "values": { "appearance.theme": "dark", "editor.auto_save": true } }
//! ```
//!
//! Decoding is lenient per entry so that a snapshot written by an older or
//! newer catalogue still restores whatever it can.

use medassist_core::models::setting::SettingValue;
use serde_json::{Map, Value};

use crate::bag::PreferenceBag;
use crate::catalogue::{Catalogue, Declared, SettingSpec};
use crate::error::PreferenceError;

/// Current snapshot version. Bump this when changing the shape; each bump
/// requires a corresponding step in [`migrate`].
pub const CURRENT_VERSION: u64 = 1;

pub fn encode(bag: &PreferenceBag) -> Result<Vec<u8>, PreferenceError> {
    let values: Map<String, Value> = bag
        .iter()
        .map(|setting| Ok((setting.key.clone(), serde_json::to_value(&setting.value)?)))
        .collect::<Result<_, serde_json::Error>>()?;

    let snapshot = serde_json::json!({
        "version": CURRENT_VERSION,
        "values": values,
    });
    Ok(serde_json::to_vec_pretty(&snapshot)?)
}

pub fn decode(bytes: &[u8], catalogue: &Catalogue) -> Result<PreferenceBag, PreferenceError> {
    let json: Value = serde_json::from_slice(bytes)?;
    let migrated = migrate(json)?;

    let values = migrated
        .get("values")
        .and_then(Value::as_object)
        .ok_or_else(|| PreferenceError::Snapshot("missing values object".to_string()))?;

    let mut bag = PreferenceBag::defaults(catalogue);
    for (key, raw) in values {
        let Some(spec) = catalogue.get(key) else {
            tracing::debug!(key = %key, "dropping undeclared setting from snapshot");
            continue;
        };
        match restore_value(spec, raw) {
            Some(value) => bag.put(spec.key, value),
            None => {
                tracing::debug!(
                    key = %key,
                    "snapshot value does not fit declaration, using default"
                );
            }
        }
    }
    Ok(bag)
}

/// Bring a raw snapshot up to [`CURRENT_VERSION`].
///
/// Pre-versioned snapshots are a flat `{ key: value }` object with no
/// `version` field.
fn migrate(json: Value) -> Result<Value, PreferenceError> {
    let Value::Object(mut obj) = json else {
        return Err(PreferenceError::Snapshot("snapshot is not a JSON object".to_string()));
    };

    let version = match obj.get("version") {
        None => 0,
        Some(v) => v
            .as_u64()
            .ok_or_else(|| PreferenceError::Snapshot("version is not a number".to_string()))?,
    };

    if version > CURRENT_VERSION {
        return Err(PreferenceError::Snapshot(format!(
            "snapshot version {version} is newer than this build supports ({CURRENT_VERSION})"
        )));
    }

    // v0 -> v1: nest the flat map under "values"
    if version < 1 {
        let values = std::mem::take(&mut obj);
        obj.insert("version".to_string(), Value::from(1u64));
        obj.insert("values".to_string(), Value::Object(values));
        tracing::info!("migrated preference snapshot v0 -> v1");
    }

    Ok(Value::Object(obj))
}

fn restore_value(spec: &SettingSpec, raw: &Value) -> Option<SettingValue> {
    let value = match (&spec.declared, raw) {
        (Declared::Boolean { .. }, Value::Bool(b)) => SettingValue::Boolean(*b),
        (Declared::Enum { .. }, Value::String(s)) => SettingValue::Choice(s.clone()),
        (Declared::Text { .. }, Value::String(s)) => SettingValue::Text(s.clone()),
        _ => return None,
    };
    spec.accepts(&value).then_some(value)
}

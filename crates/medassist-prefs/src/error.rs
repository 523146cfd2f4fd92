use medassist_core::models::setting::SettingKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("unknown setting: {key}")]
    UnknownKey { key: String },

    #[error("setting {key} is {actual}, not {expected}")]
    KindMismatch {
        key: String,
        expected: SettingKind,
        actual: SettingKind,
    },

    #[error("invalid value {value:?} for {key} (allowed: {})", .allowed.join(", "))]
    InvalidEnumValue {
        key: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("invalid value {value:?} for {key} (expected true or false)")]
    InvalidBoolean { key: String, value: String },

    #[error("preference storage unavailable: {0}")]
    PersistenceUnavailable(String),

    #[error("unreadable snapshot: {0}")]
    Snapshot(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

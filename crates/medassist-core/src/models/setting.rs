use std::fmt;

use serde::Serialize;
use ts_rs::TS;

/// The three shapes a preference can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SettingKind {
    Boolean,
    Enum,
    Text,
}

impl SettingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Enum => "enum",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for SettingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Current value of a setting.
///
/// Serializes to a bare JSON boolean or string, which is also the shape
/// used in persisted snapshots. Decoding goes through the declared
/// catalogue instead of `Deserialize`, since a string alone cannot tell
/// an enum choice from free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum SettingValue {
    Boolean(bool),
    Choice(String),
    Text(String),
}

impl SettingValue {
    pub fn kind(&self) -> SettingKind {
        match self {
            Self::Boolean(_) => SettingKind::Boolean,
            Self::Choice(_) => SettingKind::Enum,
            Self::Text(_) => SettingKind::Text,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// String payload of an enum or text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Choice(s) | Self::Text(s) => Some(s),
            Self::Boolean(_) => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Choice(s) | Self::Text(s) => f.write_str(s),
        }
    }
}

/// A named, typed preference value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Setting {
    pub key: String,
    pub kind: SettingKind,
    pub value: SettingValue,
}

use medassist_core::models::setting::{SettingKind, SettingValue};

/// Declared shape and default of a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Declared {
    Boolean {
        default: bool,
    },
    Enum {
        allowed: &'static [&'static str],
        default: &'static str,
    },
    Text {
        default: &'static str,
    },
}

/// One entry of the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingSpec {
    pub key: &'static str,
    pub declared: Declared,
}

impl SettingSpec {
    pub const fn boolean(key: &'static str, default: bool) -> Self {
        Self {
            key,
            declared: Declared::Boolean { default },
        }
    }

    pub const fn choice(
        key: &'static str,
        allowed: &'static [&'static str],
        default: &'static str,
    ) -> Self {
        Self {
            key,
            declared: Declared::Enum { allowed, default },
        }
    }

    pub const fn text(key: &'static str, default: &'static str) -> Self {
        Self {
            key,
            declared: Declared::Text { default },
        }
    }

    pub fn kind(&self) -> SettingKind {
        match self.declared {
            Declared::Boolean { .. } => SettingKind::Boolean,
            Declared::Enum { .. } => SettingKind::Enum,
            Declared::Text { .. } => SettingKind::Text,
        }
    }

    pub fn default_value(&self) -> SettingValue {
        match self.declared {
            Declared::Boolean { default } => SettingValue::Boolean(default),
            Declared::Enum { default, .. } => SettingValue::Choice(default.to_string()),
            Declared::Text { default } => SettingValue::Text(default.to_string()),
        }
    }

    /// Allowed set for enum settings, empty for the other kinds.
    pub fn allowed(&self) -> &'static [&'static str] {
        match self.declared {
            Declared::Enum { allowed, .. } => allowed,
            _ => &[],
        }
    }

    /// Whether `value` satisfies the declared kind (and allowed set).
    pub fn accepts(&self, value: &SettingValue) -> bool {
        match (&self.declared, value) {
            (Declared::Boolean { .. }, SettingValue::Boolean(_)) => true,
            (Declared::Enum { allowed, .. }, SettingValue::Choice(v)) => {
                allowed.contains(&v.as_str())
            }
            (Declared::Text { .. }, SettingValue::Text(_)) => true,
            _ => false,
        }
    }
}

const THEMES: &[&str] = &["light", "dark", "system"];
const LANGUAGES: &[&str] = &["it", "en"];
const REPORT_FORMATS: &[&str] = &["pdf", "docx"];
const ANALYSIS_DETAIL: &[&str] = &["summary", "standard", "detailed"];

/// Settings exposed by the clinical assistant's settings screens.
pub const CLINICAL_SETTINGS: &[SettingSpec] = &[
    SettingSpec::boolean("notifications.email", true),
    SettingSpec::boolean("notifications.critical_alerts", true),
    SettingSpec::boolean("privacy.anonymize_exports", true),
    SettingSpec::boolean("editor.auto_save", false),
    SettingSpec::choice("appearance.theme", THEMES, "system"),
    SettingSpec::choice("locale.language", LANGUAGES, "it"),
    SettingSpec::choice("report.format", REPORT_FORMATS, "pdf"),
    SettingSpec::choice("analysis.detail", ANALYSIS_DETAIL, "standard"),
    SettingSpec::text("profile.display_name", ""),
    SettingSpec::text("profile.specialty", ""),
];

/// The fixed set of settings a store accepts.
#[derive(Debug, Clone)]
pub struct Catalogue {
    specs: Vec<SettingSpec>,
}

impl Catalogue {
    /// Later duplicates of a key are ignored, as are enum declarations
    /// whose default is not one of their allowed values.
    pub fn new(specs: impl IntoIterator<Item = SettingSpec>) -> Self {
        let mut unique: Vec<SettingSpec> = Vec::new();
        for spec in specs {
            if unique.iter().any(|s| s.key == spec.key) {
                tracing::warn!(key = spec.key, "duplicate setting declaration ignored");
                continue;
            }
            if !spec.accepts(&spec.default_value()) {
                tracing::warn!(
                    key = spec.key,
                    default = %spec.default_value(),
                    "default outside the allowed set, declaration ignored"
                );
                continue;
            }
            unique.push(spec);
        }
        Self { specs: unique }
    }

    pub fn clinical() -> Self {
        Self::new(CLINICAL_SETTINGS.iter().copied())
    }

    pub fn get(&self, key: &str) -> Option<&SettingSpec> {
        self.specs.iter().find(|s| s.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SettingSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for Catalogue {
    fn default() -> Self {
        Self::clinical()
    }
}

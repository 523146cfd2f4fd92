use std::collections::BTreeMap;

use medassist_core::models::setting::{Setting, SettingValue};

use crate::catalogue::Catalogue;

/// Every declared setting with its current value, keyed by setting key.
///
/// Only the store mutates a bag, so a bag always satisfies its catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceBag {
    settings: BTreeMap<String, Setting>,
}

impl PreferenceBag {
    /// The declared default bag.
    pub fn defaults(catalogue: &Catalogue) -> Self {
        let settings = catalogue
            .iter()
            .map(|spec| {
                (
                    spec.key.to_string(),
                    Setting {
                        key: spec.key.to_string(),
                        kind: spec.kind(),
                        value: spec.default_value(),
                    },
                )
            })
            .collect();
        Self { settings }
    }

    pub fn get(&self, key: &str) -> Option<&Setting> {
        self.settings.get(key)
    }

    pub fn value(&self, key: &str) -> Option<&SettingValue> {
        self.settings.get(key).map(|s| &s.value)
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        self.value(key).and_then(SettingValue::as_bool)
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.value(key).and_then(SettingValue::as_str)
    }

    /// Settings in key order.
    pub fn iter(&self) -> impl Iterator<Item = &Setting> {
        self.settings.values()
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Caller has already validated `value` against the catalogue.
    pub(crate) fn put(&mut self, key: &str, value: SettingValue) {
        if let Some(setting) = self.settings.get_mut(key) {
            setting.value = value;
        }
    }
}

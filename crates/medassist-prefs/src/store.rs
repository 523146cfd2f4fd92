use std::sync::Arc;

use medassist_core::models::setting::{SettingKind, SettingValue};

use crate::bag::PreferenceBag;
use crate::catalogue::{Catalogue, SettingSpec};
use crate::error::PreferenceError;
use crate::slot::PreferenceSlot;
use crate::snapshot;

/// Slot key the snapshot is stored under.
pub const SLOT_KEY: &str = "medassist.preferences";

/// Owns the preference bag for one UI session.
///
/// `set_*` calls only change memory. Nothing reaches the slot until
/// [`persist`](Self::persist) is called, unless auto-flush is enabled, in
/// which case every successful write is persisted immediately as well.
pub struct PreferenceStore {
    slot: Arc<dyn PreferenceSlot>,
    catalogue: Catalogue,
    bag: PreferenceBag,
    dirty: bool,
    auto_flush: bool,
}

impl PreferenceStore {
    /// Restore the last persisted bag, or the declared defaults.
    ///
    /// Never fails: a missing, unreadable or undecodable snapshot is
    /// treated as "no prior snapshot".
    pub fn initialize(slot: Arc<dyn PreferenceSlot>, catalogue: Catalogue) -> Self {
        let bag = match slot.read(SLOT_KEY) {
            Ok(Some(bytes)) => match snapshot::decode(&bytes, &catalogue) {
                Ok(bag) => {
                    tracing::debug!(settings = bag.len(), "preferences restored from snapshot");
                    bag
                }
                Err(e) => {
                    tracing::warn!(error = %e, "discarding unreadable preference snapshot");
                    PreferenceBag::defaults(&catalogue)
                }
            },
            Ok(None) => {
                tracing::debug!("no preference snapshot, starting from defaults");
                PreferenceBag::defaults(&catalogue)
            }
            Err(e) => {
                tracing::warn!(error = %e, "preference slot unreadable, starting from defaults");
                PreferenceBag::defaults(&catalogue)
            }
        };

        Self {
            slot,
            catalogue,
            bag,
            dirty: false,
            auto_flush: false,
        }
    }

    pub fn with_auto_flush(mut self, auto_flush: bool) -> Self {
        self.auto_flush = auto_flush;
        self
    }

    pub fn bag(&self) -> &PreferenceBag {
        &self.bag
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.bag.value(key)
    }

    /// True when the bag holds mutations that have not been persisted.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_boolean(
        &mut self,
        key: &str,
        value: bool,
    ) -> Result<&PreferenceBag, PreferenceError> {
        self.declared(key, SettingKind::Boolean)?;
        self.apply(key, SettingValue::Boolean(value))
    }

    pub fn set_enum(&mut self, key: &str, value: &str) -> Result<&PreferenceBag, PreferenceError> {
        let spec = self.declared(key, SettingKind::Enum)?;
        let allowed = spec.allowed();
        if !allowed.contains(&value) {
            return Err(PreferenceError::InvalidEnumValue {
                key: key.to_string(),
                value: value.to_string(),
                allowed: allowed.iter().map(|s| s.to_string()).collect(),
            });
        }
        self.apply(key, SettingValue::Choice(value.to_string()))
    }

    pub fn set_text(&mut self, key: &str, value: &str) -> Result<&PreferenceBag, PreferenceError> {
        self.declared(key, SettingKind::Text)?;
        self.apply(key, SettingValue::Text(value.to_string()))
    }

    /// Set a setting from its string form, parsed according to its declared
    /// kind (`true`/`false` for booleans).
    pub fn set_from_str(
        &mut self,
        key: &str,
        raw: &str,
    ) -> Result<&PreferenceBag, PreferenceError> {
        let spec = self.lookup(key)?;
        match spec.kind() {
            SettingKind::Boolean => {
                let value = raw
                    .trim()
                    .parse::<bool>()
                    .map_err(|_| PreferenceError::InvalidBoolean {
                        key: key.to_string(),
                        value: raw.to_string(),
                    })?;
                self.set_boolean(key, value)
            }
            SettingKind::Enum => self.set_enum(key, raw),
            SettingKind::Text => self.set_text(key, raw),
        }
    }

    /// Replace the in-memory bag with the declared defaults.
    pub fn reset_to_defaults(&mut self) -> Result<&PreferenceBag, PreferenceError> {
        self.bag = PreferenceBag::defaults(&self.catalogue);
        self.dirty = true;
        self.flush_if_auto()?;
        Ok(&self.bag)
    }

    /// Write the full bag to the slot, overwriting any previous snapshot.
    pub fn persist(&mut self) -> Result<(), PreferenceError> {
        let bytes = snapshot::encode(&self.bag)?;
        self.slot.write(SLOT_KEY, &bytes)?;
        self.dirty = false;
        tracing::info!(settings = self.bag.len(), "preferences saved");
        Ok(())
    }

    fn lookup(&self, key: &str) -> Result<SettingSpec, PreferenceError> {
        self.catalogue
            .get(key)
            .copied()
            .ok_or_else(|| PreferenceError::UnknownKey {
                key: key.to_string(),
            })
    }

    fn declared(&self, key: &str, expected: SettingKind) -> Result<SettingSpec, PreferenceError> {
        let spec = self.lookup(key)?;
        let actual = spec.kind();
        if actual != expected {
            return Err(PreferenceError::KindMismatch {
                key: key.to_string(),
                expected,
                actual,
            });
        }
        Ok(spec)
    }

    fn apply(&mut self, key: &str, value: SettingValue) -> Result<&PreferenceBag, PreferenceError> {
        self.bag.put(key, value);
        self.dirty = true;
        self.flush_if_auto()?;
        Ok(&self.bag)
    }

    /// On failure the mutation stays in memory and the store stays dirty.
    fn flush_if_auto(&mut self) -> Result<(), PreferenceError> {
        if self.auto_flush {
            self.persist()?;
        }
        Ok(())
    }
}

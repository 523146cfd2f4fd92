//! medassist-prefs
//!
//! Typed user preferences: a declared catalogue of settings, the in-memory
//! bag, and its persistence to a durable key-value slot.

pub mod bag;
pub mod catalogue;
pub mod error;
pub mod slot;
pub mod snapshot;
pub mod store;

pub use bag::PreferenceBag;
pub use catalogue::{Catalogue, Declared, SettingSpec};
pub use error::PreferenceError;
pub use slot::{FileSlot, MemorySlot, PreferenceSlot};
pub use store::PreferenceStore;

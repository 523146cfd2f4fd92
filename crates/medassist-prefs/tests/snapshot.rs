use medassist_prefs::snapshot::{self, CURRENT_VERSION};
use medassist_prefs::{Catalogue, PreferenceBag, PreferenceError, SettingSpec};

fn catalogue() -> Catalogue {
    Catalogue::new([
        SettingSpec::boolean("alerts", true),
        SettingSpec::choice("theme", &["light", "dark"], "light"),
        SettingSpec::text("name", ""),
    ])
}

#[test]
fn encode_writes_versioned_values() {
    let bag = PreferenceBag::defaults(&catalogue());
    let bytes = snapshot::encode(&bag).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(json["version"], CURRENT_VERSION);
    assert_eq!(json["values"]["alerts"], true);
    assert_eq!(json["values"]["theme"], "light");
    assert_eq!(json["values"]["name"], "");
}

#[test]
fn flat_pre_versioned_snapshot_is_migrated() {
    let raw = br#"{ "alerts": false, "theme": "dark", "name": "Anna" }"#;
    let bag = snapshot::decode(raw, &catalogue()).unwrap();

    assert_eq!(bag.bool("alerts"), Some(false));
    assert_eq!(bag.str("theme"), Some("dark"));
    assert_eq!(bag.str("name"), Some("Anna"));
}

#[test]
fn mismatched_entries_fall_back_to_defaults() {
    let raw = br#"{ "version": 1, "values": {
        "alerts": "yes",
        "theme": "sepia",
        "name": 42,
        "retired.setting": true
    } }"#;
    let bag = snapshot::decode(raw, &catalogue()).unwrap();

    assert_eq!(bag, PreferenceBag::defaults(&catalogue()));
}

#[test]
fn newer_snapshot_is_rejected() {
    let raw = br#"{ "version": 99, "values": {} }"#;
    let err = snapshot::decode(raw, &catalogue()).unwrap_err();
    assert!(matches!(err, PreferenceError::Snapshot(_)));
}

#[test]
fn non_object_snapshot_is_rejected() {
    let err = snapshot::decode(b"[1, 2]", &catalogue()).unwrap_err();
    assert!(matches!(err, PreferenceError::Snapshot(_)));

    let err = snapshot::decode(b"nope", &catalogue()).unwrap_err();
    assert!(matches!(err, PreferenceError::Serialization(_)));
}

#[test]
fn duplicate_declarations_keep_the_first() {
    let catalogue = Catalogue::new([
        SettingSpec::boolean("alerts", true),
        SettingSpec::boolean("alerts", false),
    ]);
    assert_eq!(catalogue.len(), 1);
    assert_eq!(PreferenceBag::defaults(&catalogue).bool("alerts"), Some(true));
}

#[test]
fn enum_default_outside_allowed_set_is_not_declared() {
    let catalogue = Catalogue::new([
        SettingSpec::choice("theme", &["light", "dark"], "sepia"),
        SettingSpec::choice("language", &["it", "en"], "it"),
    ]);
    assert_eq!(catalogue.len(), 1);
    assert!(catalogue.get("theme").is_none());

    let bag = PreferenceBag::defaults(&catalogue);
    assert_eq!(bag.get("theme"), None);
    assert_eq!(bag.str("language"), Some("it"));
}

#[test]
fn every_restored_value_satisfies_its_declaration() {
    let catalogue = Catalogue::new([
        SettingSpec::choice("theme", &["light", "dark"], "sepia"),
        SettingSpec::choice("density", &["compact", "comfortable"], "compact"),
    ]);
    let raw = br#"{ "version": 1, "values": { "theme": "sepia", "density": "roomy" } }"#;
    let bag = snapshot::decode(raw, &catalogue).unwrap();

    for setting in bag.iter() {
        let spec = catalogue.get(&setting.key).unwrap();
        assert!(spec.accepts(&setting.value), "{} = {}", setting.key, setting.value);
    }
    assert_eq!(bag.str("density"), Some("compact"));
    assert_eq!(bag.get("theme"), None);
}

use medassist_core::models::patient::{Patient, PatientStatus};
use medassist_patients::normalize::{self, Source};
use medassist_patients::{FetchError, Normalizer};
use serde_json::json;

#[test]
fn three_tier_fallback_for_first_name() {
    let normalizer = Normalizer::default();
    let raws = [
        json!({ "first_name": "A" }),
        json!({ "user": { "first_name": "B" } }),
        json!({ "User": { "first_name": "C" } }),
        json!({}),
    ];

    let names: Vec<String> = raws.iter().map(|r| normalizer.normalize(r).first_name).collect();
    assert_eq!(names, ["A", "B", "C", ""]);

    for raw in &raws {
        assert_eq!(normalizer.normalize(raw).status, PatientStatus::Active);
    }
}

#[test]
fn earlier_tier_wins_and_nulls_fall_through() {
    let normalizer = Normalizer::default();
    let raw = json!({
        "first_name": null,
        "last_name": "Top",
        "user": { "first_name": "Nested", "last_name": "Ignored", "email": "n@example.org" },
        "User": { "email": "ignored@example.org", "status": "stable" }
    });

    let patient = normalizer.normalize(&raw);
    assert_eq!(patient.first_name, "Nested");
    assert_eq!(patient.last_name, "Top");
    assert_eq!(patient.email, "n@example.org");
    assert_eq!(patient.status, PatientStatus::Stable);
}

#[test]
fn numeric_ids_and_camel_case_aliases() {
    let patient = Normalizer::default().normalize(&json!({
        "id": 1017,
        "firstName": "Marco",
        "lastName": "Rossi",
        "status": "MONITORING"
    }));

    assert_eq!(patient.id, "1017");
    assert_eq!(patient.first_name, "Marco");
    assert_eq!(patient.last_name, "Rossi");
    assert_eq!(patient.status, PatientStatus::Monitoring);
}

#[test]
fn malformed_fields_degrade_to_defaults() {
    let patient = Normalizer::default().normalize(&json!({
        "id": { "oid": "x" },
        "first_name": ["Anna"],
        "email": true,
        "status": "discharged",
        "user": "not an object"
    }));

    assert_eq!(patient.id, "");
    assert_eq!(patient.first_name, "");
    assert_eq!(patient.email, "");
    assert_eq!(patient.status, PatientStatus::Active);
}

#[test]
fn non_object_elements_normalize_to_defaults() {
    let normalizer = Normalizer::default();
    for raw in [json!(null), json!(7), json!("Anna"), json!([1, 2])] {
        let patient = normalizer.normalize(&raw);
        assert_eq!(patient, Patient::default());
    }
}

#[test]
fn normalization_is_deterministic() {
    let normalizer = Normalizer::default();
    let raw = json!({ "User": { "first_name": "C", "id": "u-9" }, "status": "critical" });
    assert_eq!(normalizer.normalize(&raw), normalizer.normalize(&raw));
}

#[test]
fn extra_sources_are_tried_last() {
    fn profile(raw: &serde_json::Value) -> Option<&serde_json::Value> {
        raw.get("profile")
    }

    let normalizer = Normalizer::default().with_source(Source {
        name: "profile",
        locate: profile,
    });
    let raw = json!({ "profile": { "first_name": "Paola" }, "user": { "last_name": "Neri" } });

    let patient = normalizer.normalize(&raw);
    assert_eq!(patient.first_name, "Paola");
    assert_eq!(patient.last_name, "Neri");
    assert_eq!(normalizer.sources().len(), 4);
    assert_eq!(Normalizer::empty().normalize(&raw).first_name, "");
}

#[test]
fn body_may_be_bare_array_or_wrapped() {
    let normalizer = Normalizer::default();

    let bare = normalizer.parse_body(br#"[{"id": "a"}, {"id": "b"}]"#).unwrap();
    assert_eq!(bare.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(), ["a", "b"]);

    let wrapped = normalizer
        .parse_body(br#"{"count": 1, "patients": [{"id": "c"}]}"#)
        .unwrap();
    assert_eq!(wrapped[0].id, "c");

    let data = normalizer.parse_body(br#"{"data": [{"id": "d"}]}"#).unwrap();
    assert_eq!(data[0].id, "d");
}

#[test]
fn unusable_bodies_are_errors() {
    let normalizer = Normalizer::default();

    assert!(matches!(normalizer.parse_body(b"<html>"), Err(FetchError::Parse(_))));
    assert!(matches!(
        normalizer.parse_body(br#"{"patients": "none"}"#),
        Err(FetchError::UnexpectedShape(_))
    ));
    assert!(matches!(normalizer.parse_body(b"42"), Err(FetchError::UnexpectedShape(_))));
}

#[test]
fn locate_prefers_patients_over_data() {
    let body = json!({ "data": [1], "patients": [1, 2] });
    assert_eq!(normalize::locate_records(&body).unwrap().len(), 2);
}

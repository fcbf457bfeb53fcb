use super::*;
use crate::validation::{MSG_INVALID_DATE, MSG_WEAK_PASSWORD};

fn leg_day() -> WorkoutDraft {
    WorkoutDraft {
        name: "Leg Day".into(),
        description: "Squats and lunges for 45 minutes".into(),
        duration: "45".into(),
        date: Some("2024-01-01".into()),
    }
}

// =============================================================================
// Workout parsing
// =============================================================================

#[test]
fn parses_canonical_schema() {
    let w: Workout = serde_json::from_value(json!({
        "id": "w1", "name": "Run", "description": "5k", "duration": 30, "date": "2024-02-03"
    }))
    .unwrap();
    assert_eq!(
        w,
        Workout {
            id: "w1".into(),
            name: "Run".into(),
            description: "5k".into(),
            duration: 30,
            date: Some("2024-02-03".into()),
        }
    );
}

#[test]
fn normalizes_legacy_schema() {
    let w: Workout = serde_json::from_value(json!({
        "_id": "65a1", "title": "Swim", "description": "Laps", "duration": "40", "__v": 0
    }))
    .unwrap();
    assert_eq!(w.id, "65a1");
    assert_eq!(w.name, "Swim");
    assert_eq!(w.duration, 40);
    assert_eq!(w.date, None);
}

#[test]
fn canonical_fields_win_when_both_present() {
    let w: Workout = serde_json::from_value(json!({
        "id": 7, "_id": "legacy", "name": "New", "title": "Old", "duration": 10
    }))
    .unwrap();
    assert_eq!(w.id, "7");
    assert_eq!(w.name, "New");
}

#[test]
fn rejects_missing_id_or_bad_duration() {
    assert!(Workout::from_value(&json!({ "name": "x", "duration": 5 })).is_none());
    assert!(Workout::from_value(&json!({ "id": "a", "duration": -1 })).is_none());
    assert!(Workout::from_value(&json!({ "id": "a", "duration": "soon" })).is_none());
}

#[test]
fn serializes_with_canonical_names() {
    let w = Workout::from_value(&json!({ "_id": "a", "title": "Yoga", "duration": 20 })).unwrap();
    let out = serde_json::to_value(&w).unwrap();
    assert_eq!(out, json!({ "id": "a", "name": "Yoga", "description": "", "duration": 20 }));
}

// =============================================================================
// WorkoutDraft
// =============================================================================

#[test]
fn valid_draft_coerces_duration_to_number() {
    let payload = leg_day().validate().unwrap();
    assert_eq!(payload.duration, 45);

    let body = serde_json::to_value(&payload).unwrap();
    assert!(body["duration"].is_u64());
    assert_eq!(body["name"], "Leg Day");
    assert_eq!(body["date"], "2024-01-01");
}

#[test]
fn draft_with_out_of_bounds_duration_is_rejected() {
    let mut draft = leg_day();
    draft.duration = "0".into();
    let err = draft.validate().unwrap_err();
    assert!(matches!(err, ApiError::Validation { ref fields, .. } if fields == &["duration".to_owned()]));

    draft.duration = "900".into();
    assert!(draft.validate().is_err());
}

#[test]
fn draft_with_bad_date_is_rejected_and_blank_date_dropped() {
    let mut draft = leg_day();
    draft.date = Some("31/31/2024".into());
    assert_eq!(draft.validate().unwrap_err().to_string(), MSG_INVALID_DATE);

    draft.date = Some("   ".into());
    assert_eq!(draft.validate().unwrap().date, None);
}

#[test]
fn draft_prefills_from_workout() {
    let w = Workout::from_value(&json!({ "id": "1", "name": "Row", "description": "2k", "duration": 12 })).unwrap();
    let draft = WorkoutDraft::from_workout(&w);
    assert_eq!(draft.duration, "12");
    assert_eq!(draft.validate().unwrap(), WorkoutPayload {
        name: "Row".into(),
        description: "2k".into(),
        duration: 12,
        date: None,
    });
}

// =============================================================================
// auth forms
// =============================================================================

#[test]
fn credentials_require_both_fields() {
    assert!(Credentials::new("ana@example.com", "secret").validate().is_ok());
    let err = Credentials::new("ana@example.com", " ").validate().unwrap_err();
    assert_eq!(err.to_string(), "Senha é obrigatório.");
}

#[test]
fn registration_requires_strong_password() {
    let reg = Registration { name: "Ana".into(), email: "ana@example.com".into(), password: "short".into() };
    assert_eq!(reg.validate().unwrap_err().to_string(), MSG_WEAK_PASSWORD);

    let reg = Registration { password: "abc12345".into(), ..reg };
    assert!(reg.validate().is_ok());
    assert_eq!(reg.credentials(), Credentials::new("ana@example.com", "abc12345"));
}

#[test]
fn token_extraction() {
    assert_eq!(token_from(&json!({ "token": "t" })), Some("t"));
    assert_eq!(token_from(&json!({ "token": "" })), None);
    assert_eq!(token_from(&json!({ "message": "ok" })), None);
}

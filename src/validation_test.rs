use super::*;
use serde_json::json;

fn form(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

// =============================================================================
// validate_field
// =============================================================================

#[test]
fn required_reports_exactly_once_for_absent_values() {
    let rules = Rules::new().required().min_length(3).email().min(1.0).custom(|_| Some("custom".into()));
    for value in [Value::Null, json!(""), json!("   \t")] {
        let errors = validate_field("name", &value, &rules);
        assert_eq!(errors, vec!["name é obrigatório.".to_owned()], "value {value:?}");
    }
}

#[test]
fn optional_absent_field_passes() {
    let rules = Rules::new().min_length(3).max(10.0);
    assert!(validate_field("nick", &Value::Null, &rules).is_empty());
}

#[test]
fn zero_and_false_count_as_present() {
    let rules = Rules::new().required();
    assert!(validate_field("n", &json!(0), &rules).is_empty());
    assert!(validate_field("b", &json!(false), &rules).is_empty());
}

#[test]
fn reports_all_violations_in_rule_order() {
    let rules = Rules::new()
        .required()
        .email()
        .min_length(10)
        .pattern(Regex::new(r"\.com$").unwrap(), Some("Use um .com"));
    let errors = validate_field("email", &json!("a@b"), &rules);
    assert_eq!(
        errors,
        vec![
            MSG_INVALID_EMAIL.to_owned(),
            "email deve ter no mínimo 10 caracteres.".to_owned(),
            "Use um .com".to_owned(),
        ]
    );
}

#[test]
fn pattern_without_message_uses_default() {
    let rules = Rules::new().pattern(Regex::new(r"^\d+$").unwrap(), None);
    assert_eq!(validate_field("code", &json!("12a"), &rules), vec!["code inválido.".to_owned()]);
}

#[test]
fn max_length_counts_characters() {
    let rules = Rules::new().max_length(4);
    assert!(validate_field("w", &json!("ação"), &rules).is_empty());
    assert_eq!(validate_field("w", &json!("ações"), &rules), vec!["w deve ter no máximo 4 caracteres.".to_owned()]);
}

#[test]
fn numeric_bounds_coerce_strings() {
    let rules = Rules::new().label("Duração").min(1.0).max(600.0);
    assert_eq!(validate_field("duration", &json!("0"), &rules), vec!["Duração deve ser no mínimo 1.".to_owned()]);
    assert_eq!(validate_field("duration", &json!(601), &rules), vec!["Duração deve ser no máximo 600.".to_owned()]);
    assert!(validate_field("duration", &json!("45"), &rules).is_empty());
}

#[test]
fn numeric_bounds_skip_non_numbers() {
    let rules = Rules::new().min(1.0);
    assert!(validate_field("duration", &json!("abc"), &rules).is_empty());
}

#[test]
fn custom_rule_sees_the_raw_value() {
    let rules = Rules::new().custom(|v| (v != &json!("ok")).then(|| "not ok".to_owned()));
    assert!(validate_field("x", &json!("ok"), &rules).is_empty());
    assert_eq!(validate_field("x", &json!("nope"), &rules), vec!["not ok".to_owned()]);
}

// =============================================================================
// validate_form
// =============================================================================

#[test]
fn form_keeps_full_map_and_surfaces_first_message() {
    let data = form(json!({ "email": "bad", "password": "" }));
    let result = validate_form(&data, &login_rules());

    assert!(!result.is_valid());
    assert_eq!(result.invalid_fields().collect::<Vec<_>>(), vec!["email", "password"]);
    assert_eq!(result.first_message(), Some(MSG_INVALID_EMAIL));
    assert_eq!(result.errors_for("password"), ["Senha é obrigatório.".to_owned()]);
    assert!(result.errors_for("name").is_empty());
}

#[test]
fn missing_keys_are_treated_as_null() {
    let result = validate_form(&Map::new(), &login_rules());
    assert_eq!(result.first_message(), Some("Email é obrigatório."));
}

#[test]
fn into_result_builds_validation_error() {
    let data = form(json!({ "email": "", "password": "x" }));
    let err = validate_form(&data, &login_rules()).into_result().unwrap_err();
    assert_eq!(
        err,
        ApiError::Validation { message: "Email é obrigatório.".into(), fields: vec!["email".into()] }
    );

    let ok = form(json!({ "email": "ana@example.com", "password": "x" }));
    assert!(validate_form(&ok, &login_rules()).into_result().is_ok());
}

#[test]
fn workout_rules_reject_out_of_bounds_duration() {
    for duration in [json!(0), json!(-5), json!(601), json!("1000")] {
        let data = form(json!({ "name": "Leg Day", "description": "Squats", "duration": duration }));
        let result = validate_form(&data, &workout_rules());
        assert!(!result.is_valid(), "duration {duration:?} should be rejected");
        assert!(!result.errors_for("duration").is_empty());
    }
}

#[test]
fn workout_rules_reject_fractional_and_non_numeric_duration() {
    for duration in [json!("12.5"), json!("abc")] {
        let data = form(json!({ "name": "Run", "description": "Easy", "duration": duration }));
        let result = validate_form(&data, &workout_rules());
        assert!(result.errors_for("duration").contains(&MSG_DURATION_NOT_INTEGER.to_owned()));
    }
}

#[test]
fn workout_rules_accept_valid_form_and_check_date() {
    let data = form(json!({
        "name": "Leg Day",
        "description": "Squats and lunges for 45 minutes",
        "duration": "45",
        "date": "2024-01-01"
    }));
    assert!(validate_form(&data, &workout_rules()).is_valid());

    let bad_date = form(json!({ "name": "a", "description": "b", "duration": 10, "date": "yesterday" }));
    assert_eq!(validate_form(&bad_date, &workout_rules()).errors_for("date"), [MSG_INVALID_DATE.to_owned()]);
}

#[test]
fn register_rules_require_strong_password() {
    let data = form(json!({ "name": "Ana", "email": "ana@example.com", "password": "abcdefgh" }));
    assert_eq!(validate_form(&data, &register_rules()).first_message(), Some(MSG_WEAK_PASSWORD));

    let data = form(json!({ "name": "Ana", "email": "ana@example.com", "password": "abcd1234" }));
    assert!(validate_form(&data, &register_rules()).is_valid());
}

// =============================================================================
// format checks
// =============================================================================

#[test]
fn email_check_is_structural() {
    assert!(is_valid_email("ana@example.com"));
    assert!(is_valid_email("a.b+c@sub.domain.io"));
    assert!(!is_valid_email("ana@example"));
    assert!(!is_valid_email("ana@@example.com"));
    assert!(!is_valid_email("ana @example.com"));
    assert!(!is_valid_email(""));
}

#[test]
fn strong_password_needs_letter_digit_and_length() {
    assert!(is_strong_password("abc12345"));
    assert!(is_strong_password("S3nha@forte"));
    assert!(!is_strong_password("abc1234"));
    assert!(!is_strong_password("12345678"));
    assert!(!is_strong_password("abcdefgh"));
    assert!(!is_strong_password("abc 12345"));
}

#[test]
fn date_check_accepts_common_iso_forms() {
    assert!(is_valid_date("2024-01-01"));
    assert!(is_valid_date("2024-01-01T10:30:00Z"));
    assert!(is_valid_date("2024-01-01T10:30:00.123"));
    assert!(is_valid_date("2024-01-01T10:30"));
    assert!(!is_valid_date("2024-13-01"));
    assert!(!is_valid_date("not a date"));
    assert!(!is_valid_date(""));
}

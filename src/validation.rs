//! Declarative field validation for form-like input.
//!
//! DESIGN
//! ======
//! Each field gets a [`Rules`] value; a form is an ordered [`FormRules`]
//! list. Rules are pure functions of the field's current value, with no
//! cross-field checks. Field values are `serde_json::Value`s so the same
//! rules apply to CLI flags, parsed JSON, or anything else JSON-shaped.
//!
//! A field reports every rule it violates. A form keeps the full per-field
//! map for inline display, and `first_message` picks what a single
//! notification should say: the first message of the first invalid field.

#[cfg(test)]
#[path = "validation_test.rs"]
mod validation_test;

use std::fmt;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::ApiError;

pub const MSG_INVALID_EMAIL: &str = "Email inválido.";
pub const MSG_WEAK_PASSWORD: &str = "Senha deve ter no mínimo 8 caracteres com letras e números.";
pub const MSG_INVALID_DATE: &str = "Data inválida.";
pub const MSG_DURATION_NOT_INTEGER: &str = "Duração deve ser um número inteiro de minutos.";

pub const WORKOUT_MIN_DURATION: f64 = 1.0;
pub const WORKOUT_MAX_DURATION: f64 = 600.0;

/// Custom predicate: returns an error message for a bad value.
pub type CustomRule = Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>;

// =============================================================================
// RULES
// =============================================================================

#[derive(Clone)]
pub struct Pattern {
    pub regex: Regex,
    pub message: Option<String>,
}

/// Constraints for a single field.
#[derive(Clone, Default)]
pub struct Rules {
    pub label: Option<String>,
    pub required: bool,
    pub email: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub pattern: Option<Pattern>,
    pub custom: Option<CustomRule>,
}

impl fmt::Debug for Rules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rules")
            .field("label", &self.label)
            .field("required", &self.required)
            .field("email", &self.email)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("pattern", &self.pattern.as_ref().map(|p| p.regex.as_str()))
            .field("custom", &self.custom.is_some())
            .finish()
    }
}

impl Rules {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Name used in messages instead of the field key.
    #[must_use]
    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_owned());
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn email(mut self) -> Self {
        self.email = true;
        self
    }

    #[must_use]
    pub fn min_length(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    #[must_use]
    pub fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    #[must_use]
    pub fn min(mut self, n: f64) -> Self {
        self.min = Some(n);
        self
    }

    #[must_use]
    pub fn max(mut self, n: f64) -> Self {
        self.max = Some(n);
        self
    }

    #[must_use]
    pub fn pattern(mut self, regex: Regex, message: Option<&str>) -> Self {
        self.pattern = Some(Pattern { regex, message: message.map(str::to_owned) });
        self
    }

    #[must_use]
    pub fn custom<F>(mut self, check: F) -> Self
    where
        F: Fn(&Value) -> Option<String> + Send + Sync + 'static,
    {
        self.custom = Some(Arc::new(check));
        self
    }
}

/// Ordered field rules for one form.
#[derive(Clone, Debug, Default)]
pub struct FormRules {
    fields: Vec<(String, Rules)>,
}

impl FormRules {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(mut self, name: &str, rules: Rules) -> Self {
        self.fields.push((name.to_owned(), rules));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rules)> {
        self.fields.iter().map(|(name, rules)| (name.as_str(), rules))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Rules> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }
}

// =============================================================================
// VALUE HELPERS
// =============================================================================

/// Strings count when non-empty after trim; other values when non-null.
#[must_use]
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Numeric reading of a value; strings are parsed, anything else is not a number.
#[must_use]
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Check one field against its rules, returning every violated rule's message.
#[must_use]
pub fn validate_field(name: &str, value: &Value, rules: &Rules) -> Vec<String> {
    let label = rules.label.as_deref().unwrap_or(name);
    let mut errors = Vec::new();

    if !is_present(value) {
        if rules.required {
            errors.push(format!("{label} é obrigatório."));
        }
        return errors;
    }

    let text = as_text(value);
    let length = text.chars().count();

    if rules.email && !is_valid_email(&text) {
        errors.push(MSG_INVALID_EMAIL.to_owned());
    }
    if let Some(min) = rules.min_length.filter(|min| length < *min) {
        errors.push(format!("{label} deve ter no mínimo {min} caracteres."));
    }
    if let Some(max) = rules.max_length.filter(|max| length > *max) {
        errors.push(format!("{label} deve ter no máximo {max} caracteres."));
    }

    let number = as_number(value);
    if let (Some(min), Some(n)) = (rules.min, number) {
        if n < min {
            errors.push(format!("{label} deve ser no mínimo {min}."));
        }
    }
    if let (Some(max), Some(n)) = (rules.max, number) {
        if n > max {
            errors.push(format!("{label} deve ser no máximo {max}."));
        }
    }

    if let Some(pattern) = &rules.pattern {
        if !pattern.regex.is_match(&text) {
            errors.push(pattern.message.clone().unwrap_or_else(|| format!("{label} inválido.")));
        }
    }
    if let Some(custom) = &rules.custom {
        if let Some(message) = custom(value) {
            errors.push(message);
        }
    }

    errors
}

/// Outcome of validating a whole form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormValidation {
    errors: Vec<(String, Vec<String>)>,
}

impl FormValidation {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages for `field`, empty when it passed.
    #[must_use]
    pub fn errors_for(&self, field: &str) -> &[String] {
        self.errors
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, msgs)| msgs.as_slice())
            .unwrap_or_default()
    }

    /// Invalid fields in rule order.
    pub fn invalid_fields(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|(name, _)| name.as_str())
    }

    /// First message of the first invalid field.
    #[must_use]
    pub fn first_message(&self) -> Option<&str> {
        self.errors.first().and_then(|(_, msgs)| msgs.first()).map(String::as_str)
    }

    /// Collapse into a pre-flight error, `Ok` when the form is valid.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] carrying the first message and all invalid fields.
    pub fn into_result(self) -> Result<(), ApiError> {
        let Some(message) = self.first_message().map(str::to_owned) else {
            return Ok(());
        };
        let fields = self.errors.into_iter().map(|(name, _)| name).collect();
        Err(ApiError::Validation { message, fields })
    }
}

/// Validate every field named in `rules`; absent keys are treated as null.
#[must_use]
pub fn validate_form(data: &Map<String, Value>, rules: &FormRules) -> FormValidation {
    let errors = rules
        .iter()
        .filter_map(|(name, field_rules)| {
            let value = data.get(name).unwrap_or(&Value::Null);
            let msgs = validate_field(name, value, field_rules);
            (!msgs.is_empty()).then(|| (name.to_owned(), msgs))
        })
        .collect();
    FormValidation { errors }
}

// =============================================================================
// FORMAT CHECKS
// =============================================================================

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"))
}

/// Structural single-`@` check, not full RFC 5322.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// At least 8 characters from `[A-Za-z0-9@$!%*#?&]` with a letter and a digit.
#[must_use]
pub fn is_strong_password(password: &str) -> bool {
    const SYMBOLS: &str = "@$!%*#?&";
    password.chars().count() >= 8
        && password.chars().all(|c| c.is_ascii_alphanumeric() || SYMBOLS.contains(c))
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// True when `raw` parses as a calendar date or date-time. No range checks.
#[must_use]
pub fn is_valid_date(raw: &str) -> bool {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};

    let raw = raw.trim();
    if raw.is_empty() {
        return false;
    }
    DateTime::parse_from_rfc3339(raw).is_ok()
        || NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok()
        || NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M").is_ok()
        || NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").is_ok()
}

// =============================================================================
// BUILT-IN FORMS
// =============================================================================

#[must_use]
pub fn login_rules() -> FormRules {
    FormRules::new()
        .field("email", Rules::new().label("Email").required().email())
        .field("password", Rules::new().label("Senha").required())
}

#[must_use]
pub fn register_rules() -> FormRules {
    FormRules::new()
        .field("name", Rules::new().label("Nome").required().max_length(100))
        .field("email", Rules::new().label("Email").required().email())
        .field(
            "password",
            Rules::new()
                .label("Senha")
                .required()
                .custom(|v| (!is_strong_password(&as_text(v))).then(|| MSG_WEAK_PASSWORD.to_owned())),
        )
}

#[must_use]
pub fn workout_rules() -> FormRules {
    FormRules::new()
        .field("name", Rules::new().label("Nome").required().max_length(100))
        .field("description", Rules::new().label("Descrição").required().max_length(500))
        .field(
            "duration",
            Rules::new()
                .label("Duração")
                .required()
                .min(WORKOUT_MIN_DURATION)
                .max(WORKOUT_MAX_DURATION)
                .custom(|v| match as_number(v) {
                    Some(n) if n.fract() == 0.0 => None,
                    _ => Some(MSG_DURATION_NOT_INTEGER.to_owned()),
                }),
        )
        .field(
            "date",
            Rules::new().label("Data").custom(|v| (!is_valid_date(&as_text(v))).then(|| MSG_INVALID_DATE.to_owned())),
        )
}

//! Synchronous form field validation with inline error rendering.
//!
//! # Responsibility
//! - Evaluate per-field rules on blur/change and exhaustively on submit.
//! - Render inline error state and gate submission.
//!
//! # Invariants
//! - Submit re-validates every field regardless of earlier results.
//! - On failure, focus moves to the first invalid field in declaration order.
//! - Field values are never logged.

use crate::dom::{aria_bool, UiElement};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9()\s-]+$").expect("valid phone regex"));

pub const DEFAULT_PHONE_MIN_LEN: usize = 7;
const INVALID_CLASS: &str = "invalid";

/// Permissive `local@domain.tld` check.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value.trim())
}

/// Optional `+`, then digits, spaces, parentheses and dashes.
pub fn is_valid_phone(value: &str, min_len: usize) -> bool {
    let trimmed = value.trim();
    trimmed.chars().count() >= min_len && PHONE_RE.is_match(trimmed)
}

/// One validation rule attached to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    Required,
    Email,
    Phone { min_len: usize },
    MinLength(usize),
}

impl FieldRule {
    /// Parses config spelling: `required`, `email`, `phone`, `phone:<n>`,
    /// `min_length:<n>`.
    pub fn parse(value: &str) -> Result<Self, String> {
        let normalized = value.trim();
        let (name, arg) = match normalized.split_once(':') {
            Some((name, arg)) => (name.trim(), Some(arg.trim())),
            None => (normalized, None),
        };
        let parse_arg = |arg: &str| {
            arg.parse::<usize>()
                .map_err(|_| format!("rule `{normalized}` needs a non-negative integer argument"))
        };

        match (name, arg) {
            ("required", None) => Ok(Self::Required),
            ("email", None) => Ok(Self::Email),
            ("phone", None) => Ok(Self::Phone {
                min_len: DEFAULT_PHONE_MIN_LEN,
            }),
            ("phone", Some(arg)) => Ok(Self::Phone {
                min_len: parse_arg(arg)?,
            }),
            ("min_length", Some(arg)) => Ok(Self::MinLength(parse_arg(arg)?)),
            _ => Err(format!("unsupported field rule `{normalized}`")),
        }
    }

    fn check(self, value: &FieldValue) -> Result<(), FieldError> {
        match (self, value) {
            (Self::Required, FieldValue::Checked(checked)) => {
                if *checked {
                    Ok(())
                } else {
                    Err(FieldError::NotChecked)
                }
            }
            (Self::Required, FieldValue::Text(text)) => {
                if text.trim().is_empty() {
                    Err(FieldError::Missing)
                } else {
                    Ok(())
                }
            }
            (Self::Email, FieldValue::Text(text)) => {
                if is_valid_email(text) {
                    Ok(())
                } else {
                    Err(FieldError::InvalidEmail)
                }
            }
            (Self::Phone { min_len }, FieldValue::Text(text)) => {
                if text.trim().is_empty() || is_valid_phone(text, min_len) {
                    Ok(())
                } else {
                    Err(FieldError::InvalidPhone)
                }
            }
            (Self::MinLength(min), FieldValue::Text(text)) => {
                if text.trim().chars().count() >= min {
                    Ok(())
                } else {
                    Err(FieldError::TooShort { min })
                }
            }
            // Text rules do not apply to checkboxes.
            (_, FieldValue::Checked(_)) => Ok(()),
        }
    }
}

/// Current value of one form control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Checked(bool),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

/// Why one field failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    Missing,
    NotChecked,
    InvalidEmail,
    InvalidPhone,
    TooShort { min: usize },
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "This field is required."),
            Self::NotChecked => write!(f, "Please confirm to continue."),
            Self::InvalidEmail => write!(f, "Please enter a valid email address."),
            Self::InvalidPhone => write!(f, "Please enter a valid phone number."),
            Self::TooShort { min } => write!(f, "Please enter at least {min} characters."),
        }
    }
}

impl Error for FieldError {}

/// Declaration of one validated field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub rules: Vec<FieldRule>,
    /// Overrides the default message for every failure of this field.
    pub message: Option<String>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, rules: Vec<FieldRule>) -> Self {
        Self {
            name: name.into(),
            rules,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// First failing rule wins.
    pub fn check(&self, value: &FieldValue) -> FieldState {
        let error = self
            .rules
            .iter()
            .find_map(|rule| rule.check(value).err());
        FieldState {
            valid: error.is_none(),
            error,
        }
    }

    pub fn message_for(&self, error: &FieldError) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| error.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldState {
    pub valid: bool,
    pub error: Option<FieldError>,
}

/// Supplies current control values by field name.
pub trait FieldSource {
    fn value(&self, name: &str) -> Option<FieldValue>;
}

impl FieldSource for BTreeMap<String, FieldValue> {
    fn value(&self, name: &str) -> Option<FieldValue> {
        self.get(name).cloned()
    }
}

/// Exhaustive validation result in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormReport {
    pub fields: Vec<(String, FieldState)>,
}

impl FormReport {
    pub fn is_valid(&self) -> bool {
        self.fields.iter().all(|(_, state)| state.valid)
    }

    pub fn first_invalid(&self) -> Option<&str> {
        self.fields
            .iter()
            .find(|(_, state)| !state.valid)
            .map(|(name, _)| name.as_str())
    }

    pub fn invalid_count(&self) -> usize {
        self.fields.iter().filter(|(_, state)| !state.valid).count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValidator {
    fields: Vec<FieldSpec>,
}

impl FormValidator {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    /// Drops every declared field for which `keep` returns `false`.
    pub fn retain(&mut self, keep: impl FnMut(&FieldSpec) -> bool) {
        self.fields.retain(keep);
    }

    /// Validates one field; `None` when the name is not declared.
    pub fn validate_field(&self, name: &str, value: &FieldValue) -> Option<FieldState> {
        self.field(name).map(|spec| spec.check(value))
    }

    /// Validates every field. Absent controls count as empty text.
    pub fn validate_all(&self, source: &impl FieldSource) -> FormReport {
        let fields = self
            .fields
            .iter()
            .map(|spec| {
                let value = source
                    .value(&spec.name)
                    .unwrap_or_else(|| FieldValue::Text(String::new()));
                (spec.name.clone(), spec.check(&value))
            })
            .collect();
        FormReport { fields }
    }
}

/// What happens after a successful submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitMode {
    /// Let the browser submit the form.
    #[default]
    Native,
    /// Keep the user on the page and show the success element.
    InPage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted { mode: SubmitMode },
    Rejected { first_invalid: String },
}

impl SubmitOutcome {
    /// Whether the host must cancel the native submission.
    pub fn should_prevent_default(&self) -> bool {
        !matches!(
            self,
            Self::Accepted {
                mode: SubmitMode::Native
            }
        )
    }
}

/// Input and error-container pair for one declared field.
pub struct FieldBinding<E: UiElement> {
    pub input: E,
    pub error: Option<E>,
}

pub struct FormController<E: UiElement> {
    validator: FormValidator,
    bindings: BTreeMap<String, FieldBinding<E>>,
    success: Option<E>,
    mode: SubmitMode,
}

impl<E: UiElement> FormController<E> {
    /// Declared fields without a binding are dropped from validation, so a
    /// control missing from the markup cannot block every submit.
    pub fn new(
        mut validator: FormValidator,
        bindings: BTreeMap<String, FieldBinding<E>>,
        success: Option<E>,
        mode: SubmitMode,
    ) -> Self {
        validator.retain(|spec| {
            let bound = bindings.contains_key(&spec.name);
            if !bound {
                debug!(
                    "event=form_field module=form status=skipped field={} reason=unbound",
                    spec.name
                );
            }
            bound
        });
        if let Some(success) = &success {
            success.set_flag("hidden", true);
        }
        Self {
            validator,
            bindings,
            success,
            mode,
        }
    }

    pub fn validator(&self) -> &FormValidator {
        &self.validator
    }

    /// Blur/change feedback for one field.
    pub fn on_field_event(&self, name: &str, value: &FieldValue) -> Option<FieldState> {
        let state = self.validator.validate_field(name, value)?;
        self.render_field(name, &state);
        Some(state)
    }

    /// Validates everything and decides whether the submit may proceed.
    pub fn submit(&self, source: &impl FieldSource) -> SubmitOutcome {
        let report = self.validator.validate_all(source);
        for (name, state) in &report.fields {
            self.render_field(name, state);
        }

        if let Some(first_invalid) = report.first_invalid() {
            if let Some(binding) = self.bindings.get(first_invalid) {
                binding.input.focus();
            }
            if let Some(success) = &self.success {
                success.set_flag("hidden", true);
            }
            debug!(
                "event=form_submit module=form status=rejected invalid_fields={} first_invalid={}",
                report.invalid_count(),
                first_invalid
            );
            return SubmitOutcome::Rejected {
                first_invalid: first_invalid.to_string(),
            };
        }

        if self.mode == SubmitMode::InPage {
            if let Some(success) = &self.success {
                success.set_flag("hidden", false);
            }
        }
        debug!(
            "event=form_submit module=form status=ok mode={:?}",
            self.mode
        );
        SubmitOutcome::Accepted { mode: self.mode }
    }

    /// Hides the success indicator, e.g. after a reset timeout.
    pub fn clear_success(&self) {
        if let Some(success) = &self.success {
            success.set_flag("hidden", true);
        }
    }

    fn render_field(&self, name: &str, state: &FieldState) {
        let Some(binding) = self.bindings.get(name) else {
            return;
        };
        binding
            .input
            .set_attribute("aria-invalid", aria_bool(!state.valid));
        binding.input.set_class(INVALID_CLASS, !state.valid);

        let Some(error_el) = &binding.error else {
            return;
        };
        match (&state.error, self.validator.field(name)) {
            (Some(error), Some(spec)) => {
                error_el.set_text(&spec.message_for(error));
                error_el.set_flag("hidden", false);
            }
            _ => {
                error_el.set_text("");
                error_el.set_flag("hidden", true);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{is_valid_phone, FieldRule, DEFAULT_PHONE_MIN_LEN};

    #[test]
    fn parses_rule_spellings() {
        assert_eq!(FieldRule::parse("required"), Ok(FieldRule::Required));
        assert_eq!(FieldRule::parse(" email "), Ok(FieldRule::Email));
        assert_eq!(
            FieldRule::parse("phone"),
            Ok(FieldRule::Phone {
                min_len: DEFAULT_PHONE_MIN_LEN
            })
        );
        assert_eq!(
            FieldRule::parse("phone:10"),
            Ok(FieldRule::Phone { min_len: 10 })
        );
        assert_eq!(
            FieldRule::parse("min_length:10"),
            Ok(FieldRule::MinLength(10))
        );
    }

    #[test]
    fn rejects_unknown_or_malformed_rules() {
        assert!(FieldRule::parse("zip").is_err());
        assert!(FieldRule::parse("min_length").is_err());
        assert!(FieldRule::parse("min_length:ten").is_err());
        assert!(FieldRule::parse("email:1").is_err());
    }

    #[test]
    fn phone_accepts_common_formats() {
        assert!(is_valid_phone("+1 (555) 123-4567", 7));
        assert!(is_valid_phone("5551234", 7));
        assert!(!is_valid_phone("555-12", 7));
        assert!(!is_valid_phone("call me", 7));
    }
}

//! Form field value objects

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(i64),
    Flag(bool),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    /// Only zero-length text is empty; numbers and flags never are
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Number(_) | FieldValue::Flag(_) => false,
        }
    }

    /// Get the text value (returns empty string for non-text values)
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            _ => "",
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

/// Per-field validity check
pub type Validator = Arc<dyn Fn(&FieldValue) -> bool + Send + Sync>;

/// Registration options for a field
#[derive(Clone)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub required: bool,
    pub disabled: bool,
    pub initial: FieldValue,
    pub validator: Option<Validator>,
}

impl FieldSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            label: name.to_string(),
            required: false,
            disabled: false,
            initial: FieldValue::default(),
            validator: None,
        }
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Shown but not editable from the field surface
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn initial(mut self, value: impl Into<FieldValue>) -> Self {
        self.initial = value.into();
        self
    }

    pub fn validator<F>(mut self, check: F) -> Self
    where
        F: Fn(&FieldValue) -> bool + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(check));
        self
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("disabled", &self.disabled)
            .field("initial", &self.initial)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// A registered field: value and validity are always updated together
#[derive(Clone)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub required: bool,
    pub disabled: bool,
    value: FieldValue,
    valid: bool,
    validator: Option<Validator>,
}

impl FormField {
    pub fn from_spec(spec: FieldSpec) -> Self {
        let mut field = Self {
            name: spec.name,
            label: spec.label,
            required: spec.required,
            disabled: spec.disabled,
            value: FieldValue::default(),
            valid: true,
            validator: spec.validator,
        };
        field.set_value(spec.initial);
        field
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Store a new value and its validity in one step
    pub fn set_value(&mut self, value: FieldValue) {
        self.valid = self.check(&value);
        self.value = value;
    }

    // Default rule: a required field must be non-empty.
    fn check(&self, value: &FieldValue) -> bool {
        match &self.validator {
            Some(validator) => validator(value),
            None => !self.required || !value.is_empty(),
        }
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match &self.value {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Flag(true) => "yes".to_string(),
            FieldValue::Flag(false) => "no".to_string(),
        }
    }
}

impl fmt::Debug for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormField")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("valid", &self.valid)
            .field("required", &self.required)
            .finish()
    }
}

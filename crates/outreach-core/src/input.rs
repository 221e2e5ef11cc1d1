//! # Session Submission Shape
//!
//! [`SessionInput`] is the statically declared shape of a create/update
//! request: a flat mapping of field name to scalar value. Every field is
//! optional and every scalar is a [`FieldValue`], so a missing field or a
//! number where text was expected deserializes cleanly and is reported by the
//! validator as a message, never as a deserialization abort.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A scalar field as submitted by a client: a JSON number, string, or bool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl FieldValue {
    /// Whether the value counts as absent for the required-field check:
    /// a string that is empty after trimming. Numbers and bools are never
    /// blank; zero is a present value.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Render the value as text for the string-field rules.
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Int(i) => i.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Bool(b) => b.to_string(),
        }
    }

    /// Interpret the value as an integer. Whole-number floats truncate;
    /// numeric strings are parsed after trimming. Anything else is `None`,
    /// which the validator reports as a type error rather than a range error.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            FieldValue::Float(f) if f.is_finite() => Some(*f as i64),
            FieldValue::Float(_) => None,
            FieldValue::Text(s) => s.trim().parse().ok(),
            FieldValue::Bool(_) => None,
        }
    }

    /// Interpret the value as a float, for the coordinate rules.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            FieldValue::Text(s) => s.trim().parse().ok(),
            FieldValue::Bool(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

/// One create/update request body, before validation.
///
/// Field declaration order is the order the validator walks the rules in,
/// so error messages come back in a stable, predictable sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SessionInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_name: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_type: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activator: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_group: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub male_participants: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub female_participants: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_feedback: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_date: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_duration: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<FieldValue>,
}

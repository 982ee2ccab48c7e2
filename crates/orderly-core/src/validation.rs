//! Validation utilities.
//!
//! Each validated type declares a static list of [`FieldSpec`]s and exposes
//! its field values through [`Schema::field_value`]. The standalone
//! [`validate`] function walks the whole list in one pass and reports one
//! [`Violation`] per failing field.

use crate::{OrderlyError, OrderlyResult};
use serde::{Deserialize, Serialize};
use validator::{ValidateLength, ValidateRange};

/// Rule name reported for a missing required value.
pub const RULE_REQUIRED: &str = "required";
/// Rule name reported for a value below its minimum.
pub const RULE_MIN: &str = "min";

/// A constraint checked after the required rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Numeric minimum, or minimum character count for text.
    Min(i64),
}

/// Declares the rules for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name as reported in violations (e.g. `Price`).
    pub name: &'static str,
    /// Whether the zero value (empty text, `0`) is rejected.
    pub required: bool,
    /// Additional constraint, if any.
    pub constraint: Option<Constraint>,
}

impl FieldSpec {
    /// A field whose zero value is rejected.
    #[must_use]
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            required: true,
            constraint: None,
        }
    }

    /// An optional field with a minimum.
    #[must_use]
    pub const fn min(name: &'static str, min: i64) -> Self {
        Self {
            name,
            required: false,
            constraint: Some(Constraint::Min(min)),
        }
    }
}

/// A borrowed field value handed to the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Int(i64),
}

impl FieldValue<'_> {
    const fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "string",
            Self::Int(_) => "int",
        }
    }

    const fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "String",
            Self::Int(_) => "i64",
        }
    }

    const fn is_zero(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Int(n) => *n == 0,
        }
    }

    fn satisfies(&self, constraint: Constraint) -> bool {
        match (self, constraint) {
            (Self::Text(s), Constraint::Min(min)) => {
                let min = u64::try_from(min).unwrap_or(0);
                s.validate_length(Some(min), None, None)
            }
            (Self::Int(n), Constraint::Min(min)) => n.validate_range(Some(min), None, None, None),
        }
    }

    fn to_json(self) -> serde_json::Value {
        match self {
            Self::Text(s) => serde_json::Value::from(s),
            Self::Int(n) => serde_json::Value::from(n),
        }
    }
}

/// One failed field check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Qualified path, e.g. `Order.Price`.
    pub namespace: String,
    /// Field name, e.g. `Price`.
    pub field: String,
    /// Violated rule, e.g. `min`.
    pub rule: String,
    /// Rule as declared before alias expansion.
    pub actual_rule: String,
    /// Value kind (`string`, `int`).
    pub kind: String,
    /// Concrete field type.
    #[serde(rename = "type")]
    pub type_name: String,
    /// The offending value.
    pub value: serde_json::Value,
    /// Rule parameter, empty when the rule takes none.
    pub param: String,
}

/// A type validated against a declarative field list.
pub trait Schema {
    /// Type name used as the namespace prefix (`Order`).
    const NAME: &'static str;

    /// Lowercase name used in messages and cache keys (`order`).
    const KIND: &'static str;

    /// The declared field rules, checked in order.
    fn fields() -> &'static [FieldSpec];

    /// Returns the current value of a declared field.
    fn field_value(&self, field: &str) -> Option<FieldValue<'_>>;
}

/// Checks every declared field and collects all violations.
///
/// Within a field the first failing rule wins: `required`, then the
/// constraint.
///
/// # Errors
///
/// Returns the non-empty list of violations.
pub fn validate<S: Schema + ?Sized>(value: &S) -> Result<(), Vec<Violation>> {
    let violations: Vec<Violation> = S::fields()
        .iter()
        .filter_map(|spec| {
            let field = value.field_value(spec.name)?;
            check_field::<S>(spec, field)
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn check_field<S: Schema + ?Sized>(spec: &FieldSpec, value: FieldValue<'_>) -> Option<Violation> {
    let (rule, param) = if spec.required && value.is_zero() {
        (RULE_REQUIRED, String::new())
    } else {
        match spec.constraint {
            Some(constraint @ Constraint::Min(min)) if !value.satisfies(constraint) => {
                (RULE_MIN, min.to_string())
            }
            _ => return None,
        }
    };

    Some(Violation {
        namespace: format!("{}.{}", S::NAME, spec.name),
        field: spec.name.to_string(),
        rule: rule.to_string(),
        actual_rule: rule.to_string(),
        kind: value.kind().to_string(),
        type_name: value.type_name().to_string(),
        value: value.to_json(),
        param,
    })
}

/// Extension trait for validation.
pub trait ValidateExt: Schema {
    /// Validates the value and returns an `OrderlyError` on failure.
    ///
    /// # Errors
    ///
    /// Returns `OrderlyError::Validation` carrying every violation.
    fn validate_request(&self) -> OrderlyResult<()> {
        validate(self).map_err(|violations| OrderlyError::Validation {
            resource: Self::KIND,
            violations,
        })
    }
}

impl<T: Schema> ValidateExt for T {}

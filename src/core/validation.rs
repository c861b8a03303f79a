use serde::{Deserialize, Serialize};

use crate::error::ConversionError;

use super::coercion::{parse_bool, parse_date, parse_datetime, parse_decimal};
use super::schema::{FieldDescriptor, FieldKind};

/// Why one cell of one data row could not be safely coerced.
///
/// Serialized with the column names of the error report:
/// `RowNumber`, `PropertyName` and `ConversionError`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// 1-based index of the data row, header excluded
    #[serde(rename = "RowNumber")]
    pub row_number: usize,
    #[serde(rename = "PropertyName")]
    pub field_name: String,
    #[serde(rename = "ConversionError")]
    pub message: String,
}

impl ValidationIssue {
    pub fn new(row_number: usize, field_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            row_number,
            field_name: field_name.into(),
            message: message.into(),
        }
    }

    pub fn empty_value(row_number: usize, field_name: &str) -> Self {
        Self::new(
            row_number,
            field_name,
            format!("The value for {} cannot be null or empty.", field_name),
        )
    }

    pub fn conversion(row_number: usize, field_name: &str, error: &ConversionError) -> Self {
        Self::new(row_number, field_name, error.to_string())
    }
}

/// Checks one cell before coercion.
///
/// Returns `None` when the cell is acceptable, including an empty cell on a
/// nullable field. Booleans, numerics and dates are checked against their
/// kind; other kinds are only checked for emptiness.
pub fn validate_cell(
    raw: &str,
    field: &FieldDescriptor,
    row_number: usize,
    date_format: Option<&str>,
) -> Option<ValidationIssue> {
    if raw.trim().is_empty() {
        return match field.is_nullable() {
            true => None,
            false => Some(ValidationIssue::empty_value(row_number, field.name())),
        };
    }

    let valid = match field.kind() {
        FieldKind::Bool => parse_bool(raw).is_some(),
        FieldKind::Int => raw.trim().parse::<i32>().is_ok(),
        FieldKind::Long => raw.trim().parse::<i64>().is_ok(),
        FieldKind::Decimal => parse_decimal(raw).is_some(),
        FieldKind::Date => parse_date(raw, date_format).is_some(),
        FieldKind::DateTime => parse_datetime(raw, date_format).is_some(),
        _ => true,
    };

    match valid {
        true => None,
        false => Some(ValidationIssue::conversion(
            row_number,
            field.name(),
            &ConversionError::new(raw, field.declared_type()),
        )),
    }
}

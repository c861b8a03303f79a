use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::error::ConversionError;

use super::schema::{EnumType, FieldDescriptor, FieldKind};
use super::value::Value;

static GUID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("Invalid GUID regex")
});

/// Numeric date shapes recognised without a configured format, each with the
/// chrono formats tried in order.
static DATE_SHAPES: Lazy<Vec<(Regex, &'static [&'static str])>> = Lazy::new(|| {
    let shapes: [(&str, &'static [&'static str]); 6] = [
        (r"^\d{4}-\d{1,2}-\d{1,2}$", &["%Y-%m-%d"]),
        (r"^\d{4}/\d{1,2}/\d{1,2}$", &["%Y/%m/%d"]),
        (r"^\d{1,2}/\d{1,2}/\d{4}$", &["%m/%d/%Y", "%d/%m/%Y"]),
        (r"^\d{1,2}-\d{1,2}-\d{4}$", &["%d-%m-%Y", "%m-%d-%Y"]),
        (r"^\d{1,2}\.\d{1,2}\.\d{4}$", &["%d.%m.%Y"]),
        (r"^\d{8}$", &["%Y%m%d"]),
    ];
    shapes
        .into_iter()
        .map(|(pattern, formats)| (Regex::new(pattern).expect("Invalid date regex"), formats))
        .collect()
});

/// Date and time layouts accepted by the free parse of `DateTime` fields.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%d-%m-%Y %H:%M:%S",
];

/// Value substituted for a date that could not be parsed on a non-nullable
/// field when validation is off.
pub fn zero_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or_default()
}

pub fn zero_datetime() -> NaiveDateTime {
    zero_date().and_time(chrono::NaiveTime::MIN)
}

/// Parses a date, exactly against `date_format` when one is given, else
/// against the recognised numeric shapes.
pub fn parse_date(raw: &str, date_format: Option<&str>) -> Option<NaiveDate> {
    let raw = raw.trim();
    match date_format {
        Some(format) => NaiveDate::parse_from_str(raw, format)
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, format)
                    .ok()
                    .map(|datetime| datetime.date())
            }),
        None => parse_date_shape(raw),
    }
}

/// Parses a date and time. A date without a time component resolves to
/// midnight.
pub fn parse_datetime(raw: &str, date_format: Option<&str>) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    match date_format {
        Some(format) => NaiveDateTime::parse_from_str(raw, format).ok().or_else(|| {
            NaiveDate::parse_from_str(raw, format)
                .ok()
                .map(|date| date.and_time(chrono::NaiveTime::MIN))
        }),
        None => DATETIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .or_else(|| {
                DateTime::parse_from_rfc3339(raw)
                    .ok()
                    .map(|datetime| datetime.naive_local())
            })
            .or_else(|| parse_date_shape(raw).map(|date| date.and_time(chrono::NaiveTime::MIN))),
    }
}

fn parse_date_shape(raw: &str) -> Option<NaiveDate> {
    DATE_SHAPES
        .iter()
        .filter(|(shape, _)| shape.is_match(raw))
        .flat_map(|(_, formats)| formats.iter())
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

/// Parses a boolean literal (`true`/`false`, any case) or `0`/`1`.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" => Some(true),
        "0" => Some(false),
        text if text.eq_ignore_ascii_case("true") => Some(true),
        text if text.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

/// Parses an invariant decimal. `NaN` and infinities are not decimals.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

pub fn parse_guid(raw: &str) -> Option<Uuid> {
    let raw = raw.trim();
    if !GUID_PATTERN.is_match(raw) {
        return None;
    }
    Uuid::parse_str(raw).ok()
}

/// Finds an enum member by ordinal, then by exact name.
pub fn parse_enum(raw: &str, enum_type: &EnumType) -> Option<Value> {
    let raw = raw.trim();
    let member = match raw.parse::<i64>() {
        Ok(ordinal) => enum_type.by_ordinal(ordinal),
        Err(_) => enum_type.by_name(raw),
    };
    member.map(Value::Enum)
}

/// Converts one cell into the value of `field`.
///
/// An empty cell on a nullable field is `Null` without any parse attempt.
/// Date and date-time cells never fail: an unparsable value becomes `Null`
/// on nullable fields and the zero date otherwise.
///
/// # Errors
///
/// Returns a [`ConversionError`] when the text is not a valid value of the
/// field's kind. Composite fields never bind a cell and always fail.
pub fn coerce(
    raw: &str,
    field: &FieldDescriptor,
    date_format: Option<&str>,
) -> Result<Value, ConversionError> {
    if field.is_nullable() && raw.trim().is_empty() {
        return Ok(Value::Null);
    }

    let fail = || ConversionError::new(raw, field.declared_type());

    match field.kind() {
        FieldKind::String => Ok(Value::String(raw.to_string())),
        FieldKind::Bool => parse_bool(raw).map(Value::Bool).ok_or_else(fail),
        FieldKind::Int => raw.trim().parse().map(Value::Int).map_err(|_| fail()),
        FieldKind::Long => raw.trim().parse().map(Value::Long).map_err(|_| fail()),
        FieldKind::Decimal => parse_decimal(raw).map(Value::Decimal).ok_or_else(fail),
        FieldKind::Date => Ok(match parse_date(raw, date_format) {
            Some(date) => Value::Date(date),
            None => lenient_default(raw, field, Value::Date(zero_date())),
        }),
        FieldKind::DateTime => Ok(match parse_datetime(raw, date_format) {
            Some(datetime) => Value::DateTime(datetime),
            None => lenient_default(raw, field, Value::DateTime(zero_datetime())),
        }),
        FieldKind::Guid => parse_guid(raw).map(Value::Guid).ok_or_else(fail),
        FieldKind::Enum(enum_type) => parse_enum(raw, &enum_type).ok_or_else(fail),
        FieldKind::Composite => Err(fail()),
    }
}

fn lenient_default(raw: &str, field: &FieldDescriptor, zero: Value) -> Value {
    debug!(
        "Unparsable date '{}' for field {} replaced by its default",
        raw,
        field.name()
    );
    if field.is_nullable() { Value::Null } else { zero }
}

use std::fmt::Write;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Uuid;

use crate::error::MappingError;

use super::schema::{EnumMember, FieldKind, Record};

/// Default rendering of `Date` values when no date format is configured.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Default rendering of `DateTime` values when no date format is configured.
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A coerced cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    String(String),
    Bool(bool),
    Int(i32),
    Long(i64),
    Decimal(f64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Guid(Uuid),
    Enum(EnumMember),
    Record(Values),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Decimal(_) => "decimal",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
            Value::Guid(_) => "guid",
            Value::Enum(_) => "enum",
            Value::Record(_) => "record",
        }
    }

    /// Renders the value as cell text.
    ///
    /// Dates use `date_format` when given, ISO 8601 otherwise. A date is
    /// rendered as midnight of that day, so a format carrying a time reads
    /// back to the same date. `Null` and nested records render as an empty
    /// cell.
    pub fn render(&self, date_format: Option<&str>) -> String {
        match self {
            Value::Null | Value::Record(_) => String::new(),
            Value::String(value) => value.clone(),
            Value::Bool(value) => value.to_string(),
            Value::Int(value) => value.to_string(),
            Value::Long(value) => value.to_string(),
            Value::Decimal(value) => value.to_string(),
            Value::Date(value) => render_with(
                |out, fmt| write!(out, "{}", value.and_time(NaiveTime::MIN).format(fmt)),
                date_format,
                DEFAULT_DATE_FORMAT,
            ),
            Value::DateTime(value) => render_with(
                |out, fmt| write!(out, "{}", value.format(fmt)),
                date_format,
                DEFAULT_DATETIME_FORMAT,
            ),
            Value::Guid(value) => value.hyphenated().to_string(),
            Value::Enum(member) => member.name.to_string(),
        }
    }
}

// chrono reports an invalid format string as a `fmt::Error` while rendering,
// in which case the default format is used.
fn render_with<F>(render: F, date_format: Option<&str>, default_format: &str) -> String
where
    F: Fn(&mut String, &str) -> std::fmt::Result,
{
    let mut out = String::new();
    if let Some(fmt) = date_format {
        if render(&mut out, fmt).is_ok() {
            return out;
        }
        out.clear();
    }
    // The default formats are valid
    let _ = render(&mut out, default_format);
    out
}

/// Ordered bag of field values for one record, keyed by field name.
///
/// Composite fields hold a nested [`Values`] under [`Value::Record`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Values {
    entries: Vec<(String, Value)>,
}

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Sets a value, replacing any previous value of the same field.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let index = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Nested values of a composite field, created on first access.
    pub fn record_mut(&mut self, name: &str) -> &mut Values {
        let index = match self
            .entries
            .iter()
            .position(|(key, value)| key == name && matches!(value, Value::Record(_)))
        {
            Some(index) => index,
            None => {
                self.entries.retain(|(key, _)| key != name);
                self.entries
                    .push((name.to_string(), Value::Record(Values::new())));
                self.entries.len() - 1
            }
        };

        match &mut self.entries[index].1 {
            Value::Record(values) => values,
            _ => unreachable!("entry {name} was just checked to be a record"),
        }
    }

    /// Follows a chain of composite fields and returns the leaf value.
    pub fn lookup(&self, owners: &[&str], name: &str) -> Option<&Value> {
        let mut current = self;
        for owner in owners {
            match current.get(owner) {
                Some(Value::Record(values)) => current = values,
                _ => return None,
            }
        }
        current.get(name)
    }

    /// Removes a field and converts it to `T`. A missing field yields
    /// `T::default()`.
    pub fn take<T: FieldType + Default>(&mut self, name: &str) -> Result<T, MappingError> {
        match self.remove(name) {
            Some(value) => convert(name, value),
            None => Ok(T::default()),
        }
    }

    /// Removes a composite field and builds the nested record. Returns `None`
    /// when no column of the nested record was mapped.
    pub fn take_record<R: Record>(&mut self, name: &str) -> Result<Option<R>, MappingError> {
        match self.remove(name) {
            Some(Value::Record(values)) => R::from_values(values).map(Some),
            Some(Value::Null) | None => Ok(None),
            Some(other) => Err(MappingError::FieldValue {
                field: name.to_string(),
                expected: R::schema().name().to_string(),
                found: other.kind_name(),
            }),
        }
    }

    /// Builder-style insert used by [`Record::to_values`].
    pub fn with<T: FieldType>(mut self, name: &str, value: &T) -> Self {
        self.insert(name, value.to_value());
        self
    }

    /// Builder-style insert of a composite field.
    pub fn with_record<R: Record>(mut self, name: &str, record: Option<&R>) -> Self {
        let value = match record {
            Some(record) => Value::Record(record.to_values()),
            None => Value::Null,
        };
        self.insert(name, value);
        self
    }
}

fn convert<T: FieldType>(name: &str, value: Value) -> Result<T, MappingError> {
    let found = value.kind_name();
    T::from_value(value).ok_or_else(|| MappingError::FieldValue {
        field: name.to_string(),
        expected: T::type_name(),
        found,
    })
}

/// A Rust type that can be the target of a field.
pub trait FieldType: Sized {
    fn field_kind() -> FieldKind;

    /// Name shown in conversion messages.
    fn type_name() -> String;

    fn nullable() -> bool {
        false
    }

    fn from_value(value: Value) -> Option<Self>;

    fn to_value(&self) -> Value;
}

macro_rules! impl_field_type {
    ($ty:ty, $kind:ident, $variant:ident, $name:expr) => {
        impl FieldType for $ty {
            fn field_kind() -> FieldKind {
                FieldKind::$kind
            }

            fn type_name() -> String {
                $name.to_string()
            }

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn to_value(&self) -> Value {
                Value::$variant(self.clone())
            }
        }
    };
}

impl_field_type!(String, String, String, "String");
impl_field_type!(bool, Bool, Bool, "bool");
impl_field_type!(i32, Int, Int, "i32");
impl_field_type!(i64, Long, Long, "i64");
impl_field_type!(f64, Decimal, Decimal, "f64");
impl_field_type!(NaiveDate, Date, Date, "NaiveDate");
impl_field_type!(NaiveDateTime, DateTime, DateTime, "NaiveDateTime");
impl_field_type!(Uuid, Guid, Guid, "Uuid");

impl<T: FieldType> FieldType for Option<T> {
    fn field_kind() -> FieldKind {
        T::field_kind()
    }

    fn type_name() -> String {
        format!("Option<{}>", T::type_name())
    }

    fn nullable() -> bool {
        true
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Null,
        }
    }
}

/// Implements [`FieldType`] for a fieldless enum, declaring each variant with
/// its ordinal.
///
/// # Examples
///
/// ```
/// use csv_mapper_rs::impl_field_enum;
/// use csv_mapper_rs::core::value::FieldType;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Default)]
/// enum Fuel {
///     #[default]
///     Diesel,
///     Electric,
/// }
///
/// impl_field_enum!(Fuel { Diesel = 0, Electric = 1 });
///
/// assert_eq!(Fuel::Electric.to_value().render(None), "Electric");
/// assert_eq!(Fuel::type_name(), "Fuel");
/// ```
#[macro_export]
macro_rules! impl_field_enum {
    ($ty:ident { $($variant:ident = $ordinal:expr),+ $(,)? }) => {
        impl $crate::core::value::FieldType for $ty {
            fn field_kind() -> $crate::core::schema::FieldKind {
                static MEMBERS: &[$crate::core::schema::EnumMember] = &[
                    $($crate::core::schema::EnumMember {
                        name: stringify!($variant),
                        ordinal: $ordinal,
                    }),+
                ];
                $crate::core::schema::FieldKind::Enum($crate::core::schema::EnumType {
                    name: stringify!($ty),
                    members: MEMBERS,
                })
            }

            fn type_name() -> String {
                stringify!($ty).to_string()
            }

            fn from_value(value: $crate::core::value::Value) -> Option<Self> {
                match value {
                    $crate::core::value::Value::Enum(member) => match member.name {
                        $(stringify!($variant) => Some($ty::$variant),)+
                        _ => None,
                    },
                    _ => None,
                }
            }

            fn to_value(&self) -> $crate::core::value::Value {
                match self {
                    $($ty::$variant => $crate::core::value::Value::Enum(
                        $crate::core::schema::EnumMember {
                            name: stringify!($variant),
                            ordinal: $ordinal,
                        },
                    ),)+
                }
            }
        }
    };
}

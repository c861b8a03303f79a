use std::io;

use thiserror::Error;

/// Error raised when a single cell cannot be coerced into its field's type.
///
/// The `Display` output is the message written to the error report, so its
/// wording must stay stable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot convert '{value}' to {declared_type}.")]
pub struct ConversionError {
    /// Raw cell text as read from the input
    pub value: String,
    /// Declared type of the target field
    pub declared_type: String,
}

impl ConversionError {
    pub fn new(value: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            declared_type: declared_type.into(),
        }
    }
}

#[derive(Error, Debug)]
/// Mapping error
pub enum MappingError {
    #[error("The file '{0}' does not exist.")]
    MissingFile(String),

    #[error("The file '{0}' does not contain any content.")]
    MissingContent(String),

    #[error("Row {row}, field {field}: {source}")]
    Conversion {
        row: usize,
        field: String,
        #[source]
        source: ConversionError,
    },

    #[error("Field {field} expects a {expected} value but got {found}")]
    FieldValue {
        field: String,
        expected: String,
        found: &'static str,
    },

    #[error("The records collection cannot be null or empty.")]
    NoRecords,

    #[error("Could not write the CSV file to {path}, please check the exception.")]
    FileWriting {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("ItemReader from: {0}")]
    ItemReader(String),

    #[error("ItemWriter from: {0}")]
    ItemWriter(String),
}

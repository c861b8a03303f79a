use std::marker::PhantomData;

use log::debug;

use crate::error::MappingError;

use super::coercion::coerce;
use super::resolver::ColumnMapping;
use super::schema::{FieldDescriptor, Record};
use super::validation::{validate_cell, ValidationIssue};
use super::value::Values;

/// Result of mapping one data row.
#[derive(Debug, PartialEq)]
pub enum RowOutcome<T> {
    Accepted(T),
    /// The row produced at least one issue and contributes no record.
    Rejected(Vec<ValidationIssue>),
}

/// Materializes typed records from split rows, one row at a time.
pub struct RowMapper<'a, T> {
    mapping: &'a ColumnMapping<'static>,
    date_format: Option<&'a str>,
    validate: bool,
    _record: PhantomData<T>,
}

impl<'a, T: Record> RowMapper<'a, T> {
    pub fn new(mapping: &'a ColumnMapping<'static>, date_format: Option<&'a str>, validate: bool) -> Self {
        Self {
            mapping,
            date_format,
            validate,
            _record: PhantomData,
        }
    }

    /// Maps the cells of one row.
    ///
    /// Cells beyond the end of a short row are skipped and their fields keep
    /// the record's default. Cells of composite fields are gathered into one
    /// nested value per composite field, whatever the column order.
    ///
    /// # Errors
    ///
    /// With validation off, the first cell that cannot be coerced fails the
    /// row with [`MappingError::Conversion`]. With validation on, such cells
    /// become issues and the row is rejected instead.
    pub fn map_row(&self, cells: &[&str], row_number: usize) -> Result<RowOutcome<T>, MappingError> {
        let mut values = Values::new();
        let mut issues = Vec::new();

        for binding in self.mapping.bindings() {
            let Some(raw) = cells.get(binding.column) else {
                continue;
            };
            let field = binding.path.field;

            if self.validate {
                if let Some(issue) = validate_cell(raw, field, row_number, self.date_format) {
                    issues.push(issue);
                    continue;
                }
            }

            match coerce(raw, field, self.date_format) {
                Ok(value) => slot(&mut values, &binding.path.owners).insert(field.name(), value),
                Err(error) if self.validate => {
                    issues.push(ValidationIssue::conversion(row_number, field.name(), &error));
                }
                Err(error) => {
                    return Err(MappingError::Conversion {
                        row: row_number,
                        field: field.name().to_string(),
                        source: error,
                    });
                }
            }
        }

        if !issues.is_empty() {
            debug!("Row {} rejected with {} issue(s)", row_number, issues.len());
            return Ok(RowOutcome::Rejected(issues));
        }

        T::from_values(values).map(RowOutcome::Accepted)
    }

    /// Runs the validator over the cells of one row without coercing them.
    pub fn check_row(&self, cells: &[&str], row_number: usize) -> Vec<ValidationIssue> {
        self.mapping
            .bindings()
            .iter()
            .filter_map(|binding| {
                let raw = cells.get(binding.column)?;
                validate_cell(raw, binding.path.field, row_number, self.date_format)
            })
            .collect()
    }
}

/// Values of the innermost composite owning a field, created on demand.
fn slot<'v>(values: &'v mut Values, owners: &[&FieldDescriptor]) -> &'v mut Values {
    owners
        .iter()
        .fold(values, |values, owner| values.record_mut(owner.name()))
}

use crate::error::MappingError;

use super::validation::ValidationIssue;

/// Provides the raw lines of one input, in order.
pub trait LineSource {
    /// Name used in error messages and to derive the error report name.
    fn name(&self) -> String;

    /// Reads every line of the input.
    ///
    /// Fails with [`MappingError::MissingFile`] when the input does not exist;
    /// an existing but empty input yields no lines.
    fn read_lines(&self) -> Result<Vec<String>, MappingError>;
}

/// Receives the issues of a read that produced at least one.
pub trait IssueWriter {
    fn write(&self, issues: &[ValidationIssue]) -> Result<(), MappingError>;
}

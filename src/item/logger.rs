use log::warn;

use crate::{
    core::{item::IssueWriter, validation::ValidationIssue},
    error::MappingError,
};

/// Issue sink that logs each issue at `warn` level instead of writing a
/// report file.
#[derive(Default)]
pub struct LoggerIssueWriter {}

impl IssueWriter for LoggerIssueWriter {
    fn write(&self, issues: &[ValidationIssue]) -> Result<(), MappingError> {
        issues.iter().for_each(|issue| {
            warn!(
                "Row {}, field {}: {}",
                issue.row_number, issue.field_name, issue.message
            )
        });
        Ok(())
    }
}

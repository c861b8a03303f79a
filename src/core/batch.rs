use std::time::{Duration, Instant};

use log::{info, warn};
use uuid::Uuid;

use crate::error::MappingError;

use super::mapper::{RowMapper, RowOutcome};
use super::resolver::ColumnMapping;
use super::schema::Record;
use super::validation::ValidationIssue;

const BOM: char = '\u{feff}';

/// Settings of one read. Built once by the caller and never changed while
/// the read runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingOptions {
    /// Cell separator (default `,`)
    pub delimiter: u8,
    /// Whether the first line is a header row (default `true`)
    pub has_header: bool,
    /// chrono format required for date cells; lenient parsing when `None`
    pub date_format: Option<String>,
    /// Run the validator and turn conversion failures into issues
    pub validate: bool,
    /// Rows with a hard conversion failure that may be skipped before the
    /// read aborts (only when `validate` is off)
    pub skip_limit: usize,
}

impl Default for MappingOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
            date_format: None,
            validate: false,
            skip_limit: 0,
        }
    }
}

/// Counters and timings of one read.
#[derive(Debug, Clone)]
pub struct ReadExecution {
    pub id: Uuid,
    pub start: Instant,
    pub end: Instant,
    pub duration: Duration,
    /// Data rows processed, header and empty lines excluded
    pub read_count: usize,
    pub accepted_count: usize,
    pub rejected_count: usize,
    pub skip_count: usize,
}

/// Accepted records and issues of one read, in input order.
#[derive(Debug)]
pub struct MappingResult<T> {
    pub records: Vec<T>,
    pub issues: Vec<ValidationIssue>,
    pub execution: ReadExecution,
}

impl<T> MappingResult<T> {
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// Splits the input into an optional header and the non-blank data lines.
///
/// A byte order mark is stripped from the first line of the input, whether
/// it is a header or a data row.
struct Lines<'l> {
    header: Option<Vec<&'l str>>,
    rows: Vec<&'l str>,
}

impl<'l> Lines<'l> {
    fn split(lines: &'l [String], options: &MappingOptions) -> Self {
        let delimiter = char::from(options.delimiter);
        let mut rows = lines
            .iter()
            .enumerate()
            .map(|(index, line)| {
                let line = line.trim_end_matches(['\r', '\n']);
                match index {
                    0 => line.trim_start_matches(BOM),
                    _ => line,
                }
            })
            .filter(|line| !line.trim().is_empty());

        let header = match options.has_header {
            true => rows.next().map(|line| line.split(delimiter).collect()),
            false => None,
        };

        Self {
            header,
            rows: rows.collect(),
        }
    }
}

/// Splits one line on the delimiter. Quoting is not interpreted.
fn split_cells(row: &str, delimiter: u8) -> Vec<&str> {
    row.split(char::from(delimiter)).collect()
}

/// Maps every data line of `lines` into `T`.
///
/// Rows are numbered from 1, header excluded. With validation on, rows with
/// issues are rejected and the read always completes. With validation off,
/// a conversion failure aborts the read once more than
/// [`MappingOptions::skip_limit`] rows have failed.
///
/// # Errors
///
/// Returns [`MappingError::Conversion`] when the skip limit is exceeded and
/// [`MappingError::FieldValue`] when a record rejects its values.
pub fn map_lines<T: Record>(
    lines: &[String],
    options: &MappingOptions,
) -> Result<MappingResult<T>, MappingError> {
    let id = Uuid::new_v4();
    let start = Instant::now();
    let schema = T::schema();

    info!("Start of read {} into {}", id, schema);

    let input = Lines::split(lines, options);
    let mapping = ColumnMapping::resolve(schema, input.header.as_deref());
    let mapper = RowMapper::<T>::new(&mapping, options.date_format.as_deref(), options.validate);

    let mut records = Vec::new();
    let mut issues = Vec::new();
    let mut rejected_count = 0;
    let mut skip_count = 0;

    for (index, row) in input.rows.iter().enumerate() {
        let row_number = index + 1;
        let cells = split_cells(row, options.delimiter);

        match mapper.map_row(&cells, row_number) {
            Ok(RowOutcome::Accepted(record)) => records.push(record),
            Ok(RowOutcome::Rejected(row_issues)) => {
                rejected_count += 1;
                issues.extend(row_issues);
            }
            Err(error @ MappingError::Conversion { .. }) => {
                skip_count += 1;
                if skip_count > options.skip_limit {
                    warn!("Read {} aborted: {}", id, error);
                    return Err(error);
                }
                warn!("Row {} skipped: {}", row_number, error);
            }
            Err(error) => return Err(error),
        }
    }

    let execution = ReadExecution {
        id,
        start,
        end: Instant::now(),
        duration: start.elapsed(),
        read_count: input.rows.len(),
        accepted_count: records.len(),
        rejected_count,
        skip_count,
    };

    info!(
        "End of read {}: {} accepted, {} rejected, {} skipped",
        id, execution.accepted_count, execution.rejected_count, execution.skip_count
    );

    Ok(MappingResult {
        records,
        issues,
        execution,
    })
}

/// Runs the validator over every data line of `lines` without building any
/// record, and returns all issues in input order.
pub fn validate_lines<T: Record>(lines: &[String], options: &MappingOptions) -> Vec<ValidationIssue> {
    let input = Lines::split(lines, options);
    let mapping = ColumnMapping::resolve(T::schema(), input.header.as_deref());
    let mapper = RowMapper::<T>::new(&mapping, options.date_format.as_deref(), true);

    input
        .rows
        .iter()
        .enumerate()
        .flat_map(|(index, row)| mapper.check_row(&split_cells(row, options.delimiter), index + 1))
        .collect()
}

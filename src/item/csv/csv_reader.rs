use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use log::debug;

use crate::{
    core::{
        batch::{map_lines, validate_lines, MappingOptions, MappingResult},
        item::{IssueWriter, LineSource},
        schema::Record,
        validation::ValidationIssue,
    },
    error::MappingError,
};

use super::error_report::CsvErrorReportWriter;

/// Reads the lines of a file on disk.
#[derive(Debug, Clone)]
pub struct FileLineSource {
    path: PathBuf,
}

impl FileLineSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl LineSource for FileLineSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn read_lines(&self) -> Result<Vec<String>, MappingError> {
        let file = File::open(&self.path).map_err(|error| open_error(&self.name(), error))?;

        BufReader::new(file)
            .lines()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|error| MappingError::ItemReader(error.to_string()))
    }
}

/// Serves lines from text held in memory.
#[derive(Debug, Clone)]
pub struct TextLineSource {
    name: String,
    text: String,
}

impl TextLineSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

impl LineSource for TextLineSource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn read_lines(&self) -> Result<Vec<String>, MappingError> {
        Ok(self.text.lines().map(str::to_string).collect())
    }
}

fn open_error(name: &str, error: io::Error) -> MappingError {
    match error.kind() {
        io::ErrorKind::NotFound => MappingError::MissingFile(name.to_string()),
        _ => MappingError::ItemReader(error.to_string()),
    }
}

/// Maps delimited text files into typed records.
///
/// A reader holds the settings of its reads and can be reused for any number
/// of files and record types. Each read resolves the columns of the file
/// against the record's schema, coerces every cell and returns the accepted
/// records together with the issues found.
///
/// When validation is enabled and a read produces issues, they are also
/// written to an error report named after the input file
/// (see [`CsvErrorReportWriter`]).
///
/// # Examples
///
/// ```
/// use csv_mapper_rs::core::schema::{Field, Record, Schema};
/// use csv_mapper_rs::core::value::Values;
/// use csv_mapper_rs::item::csv::csv_reader::{CsvItemReaderBuilder, TextLineSource};
/// use csv_mapper_rs::MappingError;
/// use once_cell::sync::Lazy;
///
/// #[derive(Debug, Default)]
/// struct City {
///     name: String,
///     population: i64,
/// }
///
/// impl Record for City {
///     fn schema() -> &'static Schema {
///         static SCHEMA: Lazy<Schema> = Lazy::new(|| {
///             Schema::builder("City")
///                 .field(Field::of::<String>("Name").alias("city"))
///                 .field(Field::of::<i64>("Population").alias("pop"))
///                 .build()
///         });
///         &SCHEMA
///     }
///
///     fn from_values(mut values: Values) -> Result<Self, MappingError> {
///         Ok(City {
///             name: values.take("Name")?,
///             population: values.take("Population")?,
///         })
///     }
///
///     fn to_values(&self) -> Values {
///         Values::new()
///             .with("Name", &self.name)
///             .with("Population", &self.population)
///     }
/// }
///
/// let data = "\
/// pop;city
/// 4628910;Boston
/// 42695;Concord
/// ";
///
/// let reader = CsvItemReaderBuilder::new().delimiter(b';').build();
/// let result = reader
///     .read_from::<City>(&TextLineSource::new("cities", data), None)
///     .unwrap();
///
/// assert_eq!(result.records.len(), 2);
/// assert_eq!(result.records[0].name, "Boston");
/// assert_eq!(result.records[1].population, 42695);
/// ```
#[derive(Debug, Clone)]
pub struct CsvItemReader {
    options: MappingOptions,
    error_report_path: Option<PathBuf>,
}

impl CsvItemReader {
    pub fn options(&self) -> &MappingOptions {
        &self.options
    }

    /// Reads and maps the file at `path`.
    ///
    /// # Errors
    ///
    /// - [`MappingError::MissingFile`] when the file does not exist
    /// - [`MappingError::MissingContent`] when it has no non-empty line
    /// - [`MappingError::Conversion`] when validation is off and more rows
    ///   than the skip limit fail to convert
    /// - [`MappingError::FileWriting`] when the error report cannot be written
    pub fn read<T: Record>(&self, path: impl AsRef<Path>) -> Result<MappingResult<T>, MappingError> {
        let path = path.as_ref();
        let report = self.report_writer(path);
        self.read_from(&FileLineSource::new(path), Some(&report))
    }

    /// Reads and maps the lines of any source. Issues are handed to
    /// `issue_writer`, when given, only if the read produced some.
    pub fn read_from<T: Record>(
        &self,
        source: &dyn LineSource,
        issue_writer: Option<&dyn IssueWriter>,
    ) -> Result<MappingResult<T>, MappingError> {
        let lines = source.read_lines()?;
        let result = self.map::<T>(&source.name(), &lines)?;

        if let Some(issue_writer) = issue_writer.filter(|_| result.has_issues()) {
            issue_writer.write(&result.issues)?;
        }

        Ok(result)
    }

    /// Validates the file at `path` without building any record.
    ///
    /// Every cell bound to a field is checked, whatever the reader's
    /// validation setting, and no error report is written.
    pub fn is_valid<T: Record>(&self, path: impl AsRef<Path>) -> Result<Vec<ValidationIssue>, MappingError> {
        self.is_valid_from::<T>(&FileLineSource::new(path))
    }

    pub fn is_valid_from<T: Record>(&self, source: &dyn LineSource) -> Result<Vec<ValidationIssue>, MappingError> {
        let lines = source.read_lines()?;
        self.check::<T>(&source.name(), &lines)
    }

    /// Asynchronous [`read`](Self::read). Only the file read and the report
    /// write are awaited; rows are mapped exactly as in the blocking variant.
    #[cfg(feature = "async")]
    pub async fn read_async<T: Record>(&self, path: impl AsRef<Path>) -> Result<MappingResult<T>, MappingError> {
        let path = path.as_ref();
        let lines = read_lines_async(path).await?;
        let result = self.map::<T>(&path.display().to_string(), &lines)?;

        if result.has_issues() {
            self.report_writer(path).write_async(&result.issues).await?;
        }

        Ok(result)
    }

    #[cfg(feature = "async")]
    pub async fn is_valid_async<T: Record>(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Vec<ValidationIssue>, MappingError> {
        let path = path.as_ref();
        let lines = read_lines_async(path).await?;
        self.check::<T>(&path.display().to_string(), &lines)
    }

    /// Error report writer used for reads of `input`.
    pub fn report_writer(&self, input: &Path) -> CsvErrorReportWriter {
        CsvErrorReportWriter::for_input(
            input,
            self.error_report_path.as_deref(),
            self.options.delimiter,
        )
    }

    fn map<T: Record>(&self, name: &str, lines: &[String]) -> Result<MappingResult<T>, MappingError> {
        ensure_content(name, lines)?;
        map_lines::<T>(lines, &self.options)
    }

    fn check<T: Record>(&self, name: &str, lines: &[String]) -> Result<Vec<ValidationIssue>, MappingError> {
        ensure_content(name, lines)?;
        Ok(validate_lines::<T>(lines, &self.options))
    }
}

fn ensure_content(name: &str, lines: &[String]) -> Result<(), MappingError> {
    if lines.iter().all(|line| line.trim().is_empty()) {
        debug!("No content found in {}", name);
        return Err(MappingError::MissingContent(name.to_string()));
    }
    Ok(())
}

#[cfg(feature = "async")]
async fn read_lines_async(path: &Path) -> Result<Vec<String>, MappingError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|error| open_error(&path.display().to_string(), error))?;

    Ok(text.lines().map(str::to_string).collect())
}

/// A builder for configuring CSV item reading.
///
/// # Default Configuration
///
/// - Delimiter: comma (,)
/// - Headers: enabled
/// - Date format: none, dates are parsed leniently
/// - Validation: disabled
/// - Skip limit: 0
/// - Error reports: `Errors` under the current directory
///
/// # Examples
///
/// ```
/// use csv_mapper_rs::item::csv::csv_reader::CsvItemReaderBuilder;
///
/// let reader = CsvItemReaderBuilder::new()
///     .delimiter(b';')
///     .date_format("%d/%m/%Y")
///     .validate(true)
///     .error_report_path("reports")
///     .build();
///
/// assert_eq!(reader.options().delimiter, b';');
/// assert!(reader.options().validate);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CsvItemReaderBuilder {
    options: MappingOptions,
    error_report_path: Option<PathBuf>,
}

impl CsvItemReaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.options.delimiter = delimiter;
        self
    }

    /// Whether the first line is a header row. Headerless files are mapped
    /// by explicit position or, without positions, by declaration order.
    pub fn has_headers(mut self, yes: bool) -> Self {
        self.options.has_header = yes;
        self
    }

    /// chrono format (e.g. `%Y%m%dT%H%M%S`) every date cell must match.
    pub fn date_format(mut self, date_format: impl Into<String>) -> Self {
        self.options.date_format = Some(date_format.into());
        self
    }

    pub fn validate(mut self, yes: bool) -> Self {
        self.options.validate = yes;
        self
    }

    /// Folder receiving the error reports. An empty path keeps the default.
    pub fn error_report_path(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        self.error_report_path = match path.as_os_str().is_empty() {
            true => None,
            false => Some(path.to_path_buf()),
        };
        self
    }

    /// Number of rows failing to convert that are skipped before a read
    /// without validation aborts.
    pub fn skip_limit(mut self, skip_limit: usize) -> Self {
        self.options.skip_limit = skip_limit;
        self
    }

    pub fn build(self) -> CsvItemReader {
        CsvItemReader {
            options: self.options,
            error_report_path: self.error_report_path,
        }
    }
}

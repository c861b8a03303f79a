use std::{
    env,
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use csv::WriterBuilder;
use log::info;

use crate::{
    core::{item::IssueWriter, validation::ValidationIssue},
    error::MappingError,
};

/// Name of the folder receiving error reports when none is configured.
pub const DEFAULT_ERROR_FOLDER: &str = "Errors";

/// Writes the issues of a read to `{folder}/{base_name}_errors.csv`.
///
/// The report has a `RowNumber`, `PropertyName` and `ConversionError` header
/// followed by one line per issue, in the order the issues were raised. The
/// folder is created when missing and an existing report is overwritten.
///
/// # Examples
///
/// ```
/// use csv_mapper_rs::core::validation::ValidationIssue;
/// use csv_mapper_rs::item::csv::error_report::CsvErrorReportWriter;
///
/// let writer = CsvErrorReportWriter::new("reports", "people", b';');
/// assert!(writer.path().ends_with("people_errors.csv"));
///
/// let issues = vec![ValidationIssue::new(3, "Age", "Cannot convert 'x' to i32.")];
/// let report = String::from_utf8(writer.render(&issues).unwrap()).unwrap();
/// assert_eq!(
///     report,
///     "RowNumber;PropertyName;ConversionError\n3;Age;Cannot convert 'x' to i32.\n"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct CsvErrorReportWriter {
    folder: PathBuf,
    base_name: String,
    delimiter: u8,
}

impl CsvErrorReportWriter {
    pub fn new(folder: impl Into<PathBuf>, base_name: impl Into<String>, delimiter: u8) -> Self {
        Self {
            folder: folder.into(),
            base_name: base_name.into(),
            delimiter,
        }
    }

    /// Report writer for `input`, named after the input's file stem.
    ///
    /// Without a folder, reports go to `Errors` under the current directory.
    pub fn for_input(input: &Path, folder: Option<&Path>, delimiter: u8) -> Self {
        let folder = match folder {
            Some(folder) => folder.to_path_buf(),
            None => default_folder(),
        };
        let base_name = input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self::new(folder, base_name, delimiter)
    }

    pub fn path(&self) -> PathBuf {
        self.folder.join(format!("{}_errors.csv", self.base_name))
    }

    /// Renders the report in memory.
    pub fn render(&self, issues: &[ValidationIssue]) -> Result<Vec<u8>, MappingError> {
        let mut wtr = WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(vec![]);

        for issue in issues {
            wtr.serialize(issue)
                .map_err(|error| self.writing_error(error.into()))?;
        }

        wtr.into_inner()
            .map_err(|error| self.writing_error(error.into_error()))
    }

    #[cfg(feature = "async")]
    pub async fn write_async(&self, issues: &[ValidationIssue]) -> Result<(), MappingError> {
        let content = self.render(issues)?;
        let path = self.path();

        tokio::fs::create_dir_all(&self.folder)
            .await
            .map_err(|error| self.writing_error(error))?;
        tokio::fs::write(&path, content)
            .await
            .map_err(|error| self.writing_error(error))?;

        info!("{} issue(s) written to {}", issues.len(), path.display());
        Ok(())
    }

    fn writing_error(&self, source: io::Error) -> MappingError {
        MappingError::FileWriting {
            path: self.path().display().to_string(),
            source,
        }
    }
}

impl IssueWriter for CsvErrorReportWriter {
    fn write(&self, issues: &[ValidationIssue]) -> Result<(), MappingError> {
        let content = self.render(issues)?;
        let path = self.path();

        fs::create_dir_all(&self.folder).map_err(|error| self.writing_error(error))?;
        File::create(&path)
            .and_then(|mut file| file.write_all(&content))
            .map_err(|error| self.writing_error(error))?;

        info!("{} issue(s) written to {}", issues.len(), path.display());
        Ok(())
    }
}

fn default_folder() -> PathBuf {
    env::current_dir()
        .unwrap_or_default()
        .join(DEFAULT_ERROR_FOLDER)
}

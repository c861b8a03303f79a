use std::{
    cell::{Cell, RefCell},
    fs::File,
    io::{self, Write},
    path::Path,
};

use csv::{QuoteStyle, Writer, WriterBuilder};
use log::info;

use crate::{
    core::schema::{FieldPath, Record},
    error::MappingError,
};

/// Writes typed records as delimited text.
///
/// Columns follow the record's schema: fields in declaration order, or by
/// ascending explicit position when the schema declares positions, with the
/// fields of composite records flattened inline. The header row uses each
/// field's column alias, falling back to its name. Cells are written as is,
/// without quoting, matching what the reader accepts.
pub struct CsvItemWriter<W: Write> {
    wrapper: RefCell<Writer<W>>,
    destination: String,
    has_headers: bool,
    header_written: Cell<bool>,
    date_format: Option<String>,
}

impl<W: Write> CsvItemWriter<W> {
    /// Writes `items`, preceded by the header row on the first call.
    ///
    /// # Errors
    ///
    /// [`MappingError::NoRecords`] when `items` is empty, and
    /// [`MappingError::FileWriting`] when the destination fails.
    pub fn write<T: Record>(&self, items: &[T]) -> Result<(), MappingError> {
        if items.is_empty() {
            return Err(MappingError::NoRecords);
        }

        let layout = T::schema().column_layout();

        if self.has_headers && !self.header_written.get() {
            let header: Vec<&str> = layout.iter().map(|leaf| leaf.field.column_name()).collect();
            self.write_record(&header)?;
            self.header_written.set(true);
        }

        for item in items {
            self.write_record(&self.render(item, &layout))?;
        }

        Ok(())
    }

    /// Flush the contents of the internal buffer to the underlying writer.
    pub fn flush(&self) -> Result<(), MappingError> {
        self.wrapper
            .borrow_mut()
            .flush()
            .map_err(|error| self.writing_error(error))
    }

    pub fn into_inner(self) -> Result<W, MappingError> {
        let destination = self.destination;
        self.wrapper
            .into_inner()
            .into_inner()
            .map_err(|error| MappingError::FileWriting {
                path: destination,
                source: error.into_error(),
            })
    }

    fn render<T: Record>(&self, item: &T, layout: &[FieldPath<'_>]) -> Vec<String> {
        let values = item.to_values();
        layout
            .iter()
            .map(|leaf| {
                values
                    .lookup(&leaf.owner_names(), leaf.field.name())
                    .map(|value| value.render(self.date_format.as_deref()))
                    .unwrap_or_default()
            })
            .collect()
    }

    fn write_record<I>(&self, record: I) -> Result<(), MappingError>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        self.wrapper
            .borrow_mut()
            .write_record(record)
            .map_err(|error| self.writing_error(error.into()))
    }

    fn writing_error(&self, source: io::Error) -> MappingError {
        MappingError::FileWriting {
            path: self.destination.clone(),
            source,
        }
    }
}

/// A builder for configuring CSV item writing.
///
/// # Default Configuration
///
/// - Delimiter: comma (,)
/// - Headers: enabled
/// - Date format: ISO 8601
///
/// # Examples
///
/// ```
/// use csv_mapper_rs::core::schema::{Field, Record, Schema};
/// use csv_mapper_rs::core::value::Values;
/// use csv_mapper_rs::item::csv::csv_writer::CsvItemWriterBuilder;
/// use csv_mapper_rs::MappingError;
/// use chrono::NaiveDate;
/// use once_cell::sync::Lazy;
///
/// #[derive(Debug, Default)]
/// struct Person {
///     name: String,
///     birth_date: NaiveDate,
/// }
///
/// impl Record for Person {
///     fn schema() -> &'static Schema {
///         static SCHEMA: Lazy<Schema> = Lazy::new(|| {
///             Schema::builder("Person")
///                 .field(Field::of::<String>("Name").alias("first_name"))
///                 .field(Field::of::<NaiveDate>("BirthDate"))
///                 .build()
///         });
///         &SCHEMA
///     }
///
///     fn from_values(mut values: Values) -> Result<Self, MappingError> {
///         Ok(Person {
///             name: values.take("Name")?,
///             birth_date: values.take("BirthDate")?,
///         })
///     }
///
///     fn to_values(&self) -> Values {
///         Values::new()
///             .with("Name", &self.name)
///             .with("BirthDate", &self.birth_date)
///     }
/// }
///
/// let writer = CsvItemWriterBuilder::new()
///     .delimiter(b';')
///     .date_format("%d/%m/%Y")
///     .from_writer(vec![]);
///
/// writer
///     .write(&[Person {
///         name: "Alice".to_string(),
///         birth_date: NaiveDate::from_ymd_opt(1990, 5, 15).unwrap(),
///     }])
///     .unwrap();
///
/// let data = String::from_utf8(writer.into_inner().unwrap()).unwrap();
/// assert_eq!(data, "first_name;BirthDate\nAlice;15/05/1990\n");
/// ```
#[derive(Debug, Clone)]
pub struct CsvItemWriterBuilder {
    delimiter: u8,
    has_headers: bool,
    date_format: Option<String>,
}

impl Default for CsvItemWriterBuilder {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: true,
            date_format: None,
        }
    }
}

impl CsvItemWriterBuilder {
    pub fn new() -> CsvItemWriterBuilder {
        Self::default()
    }

    pub fn delimiter(mut self, delimiter: u8) -> CsvItemWriterBuilder {
        self.delimiter = delimiter;
        self
    }

    pub fn has_headers(mut self, yes: bool) -> CsvItemWriterBuilder {
        self.has_headers = yes;
        self
    }

    /// chrono format used to render date and date-time cells.
    pub fn date_format(mut self, date_format: impl Into<String>) -> CsvItemWriterBuilder {
        self.date_format = Some(date_format.into());
        self
    }

    /// Creates (or truncates) the file at `path`.
    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<CsvItemWriter<File>, MappingError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| MappingError::FileWriting {
            path: path.display().to_string(),
            source,
        })?;

        Ok(self.build(file, path.display().to_string()))
    }

    pub fn from_writer<W: Write>(self, wtr: W) -> CsvItemWriter<W> {
        self.build(wtr, "writer".to_string())
    }

    /// Writes `items` to a new file at `path` and flushes it.
    ///
    /// Fails with [`MappingError::NoRecords`] before touching the file when
    /// `items` is empty.
    pub fn write_to_path<T: Record, P: AsRef<Path>>(self, path: P, items: &[T]) -> Result<(), MappingError> {
        if items.is_empty() {
            return Err(MappingError::NoRecords);
        }

        let path = path.as_ref();
        let writer = self.from_path(path)?;
        writer.write(items)?;
        writer.flush()?;

        info!("{} record(s) written to {}", items.len(), path.display());
        Ok(())
    }

    /// Asynchronous [`write_to_path`](Self::write_to_path). The content is
    /// rendered in memory and written in one call.
    #[cfg(feature = "async")]
    pub async fn write_to_path_async<T: Record, P: AsRef<Path>>(
        self,
        path: P,
        items: &[T],
    ) -> Result<(), MappingError> {
        let path = path.as_ref();
        let writer = self.from_writer(vec![]);
        writer.write(items)?;
        let content = writer.into_inner()?;

        tokio::fs::write(path, content)
            .await
            .map_err(|source| MappingError::FileWriting {
                path: path.display().to_string(),
                source,
            })?;

        info!("{} record(s) written to {}", items.len(), path.display());
        Ok(())
    }

    fn build<W: Write>(self, wtr: W, destination: String) -> CsvItemWriter<W> {
        let wtr = WriterBuilder::new()
            .flexible(false)
            .has_headers(false)
            .delimiter(self.delimiter)
            .quote_style(QuoteStyle::Never)
            .from_writer(wtr);

        CsvItemWriter {
            wrapper: RefCell::new(wtr),
            destination,
            has_headers: self.has_headers,
            header_written: Cell::new(false),
            date_format: self.date_format,
        }
    }
}

/// CSV support for mapping delimited text into typed records and back.
///
/// This module provides components for reading delimited files into
/// [`Record`](crate::core::schema::Record) types, writing records back out,
/// and reporting the cells that could not be converted.
///
/// # Module Architecture
///
/// The CSV module consists of three main components:
///
/// 1. **CsvItemReader**: resolves the columns of a file against the record's
///    schema (by header, explicit position or declaration order), coerces every
///    cell and returns the accepted records with the issues found.
///
/// 2. **CsvItemWriter**: writes records with a header built from column
///    aliases, composite records flattened inline.
///
/// 3. **CsvErrorReportWriter**: writes the issues of a read to
///    `{folder}/{file stem}_errors.csv`.
///
/// Reader and writer follow the builder pattern for easy configuration.
///
/// # Limitations
///
/// Lines are split on the delimiter without interpreting quotes, so a cell
/// cannot contain the delimiter. The writer never quotes cells for the same
/// reason.
///
/// # Examples
///
/// ## Round trip through a file
///
/// ```
/// use csv_mapper_rs::core::schema::{Field, Record, Schema};
/// use csv_mapper_rs::core::value::Values;
/// use csv_mapper_rs::item::csv::csv_reader::CsvItemReaderBuilder;
/// use csv_mapper_rs::item::csv::csv_writer::CsvItemWriterBuilder;
/// use csv_mapper_rs::MappingError;
/// use once_cell::sync::Lazy;
/// use std::env::temp_dir;
///
/// #[derive(Debug, Default, PartialEq, Clone)]
/// struct Car {
///     make: String,
///     year: i32,
///     electric: bool,
/// }
///
/// impl Record for Car {
///     fn schema() -> &'static Schema {
///         static SCHEMA: Lazy<Schema> = Lazy::new(|| {
///             Schema::builder("Car")
///                 .field(Field::of::<String>("Make"))
///                 .field(Field::of::<i32>("Year"))
///                 .field(Field::of::<bool>("Electric"))
///                 .build()
///         });
///         &SCHEMA
///     }
///
///     fn from_values(mut values: Values) -> Result<Self, MappingError> {
///         Ok(Car {
///             make: values.take("Make")?,
///             year: values.take("Year")?,
///             electric: values.take("Electric")?,
///         })
///     }
///
///     fn to_values(&self) -> Values {
///         Values::new()
///             .with("Make", &self.make)
///             .with("Year", &self.year)
///             .with("Electric", &self.electric)
///     }
/// }
///
/// let cars = vec![
///     Car { make: "Porsche".to_string(), year: 1948, electric: false },
///     Car { make: "Tesla".to_string(), year: 2012, electric: true },
/// ];
///
/// let path = temp_dir().join("csv-mapper-doc-cars.csv");
/// CsvItemWriterBuilder::new()
///     .delimiter(b';')
///     .write_to_path(&path, &cars)
///     .unwrap();
///
/// let result = CsvItemReaderBuilder::new()
///     .delimiter(b';')
///     .build()
///     .read::<Car>(&path)
///     .unwrap();
///
/// assert_eq!(result.records, cars);
/// assert!(result.issues.is_empty());
/// ```

/// A module providing facilities for reading CSV data records.
pub mod csv_reader;

/// A module providing facilities for writing CSV data records.
pub mod csv_writer;

/// A module providing the error report written for validation issues.
pub mod error_report;

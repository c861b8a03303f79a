#![cfg_attr(docsrs, feature(doc_cfg))]
//#![warn(missing_docs)]

/*!
 <div align="center">
   <h1>CSV Mapper for Rust</h1>
   <h3>Schema-driven mapping, coercion and validation of delimited text</h3>

   ![license](https://shields.io/badge/license-MIT%2FApache--2.0-blue)

  </div>

 # CSV Mapper for Rust

 **CSV Mapper for Rust** turns delimited text files into strongly-typed records and back.
 Each record type declares a schema once: its fields, their types, optional column aliases,
 optional explicit positions and nested records. Every read resolves the columns of the file
 against that schema, coerces each cell into its field's type and keeps the rows that cannot
 be converted apart, in a structured report, without aborting the whole file.

 ## Core Concepts

- **Schema:** the ordered field descriptors of a record type, built once through the `Record` trait.
- **Column resolution:** input columns are matched to fields by header text (alias first, then
  name, case-insensitively, nested records included), by explicit position, or by declaration
  order for headerless files.
- **Coercion:** each cell is converted to its field's type: strings, booleans, integers,
  decimals, dates, date-times, UUIDs, enumerations and nullable variants of all of them.
- **Validation:** when enabled, cells are checked before coercion and every problem becomes a
  `ValidationIssue`. Rows with issues are left out of the accepted records and the issues are
  written to an error report.

 ## Features

| **Feature**   | **Description**                                                 |
|---------------|-----------------------------------------------------------------|
| csv           | Enables the CSV reader, writer and error report writer (default) |
| logger        | Enables an issue writer that logs issues, useful for debugging   |
| async         | Enables the tokio-based `read_async`, `is_valid_async` and `write_to_path_async` |
| full          | Enables all available features                                  |

 ## Getting Started
 Make sure you activated the suitable features crate on Cargo.toml:

```toml
[dependencies]
csv-mapper-rs = { version = "<version>", features = ["<full|csv|logger|async>"] }
```

Then, on your main.rs:

```rust
# use csv_mapper_rs::{
#     core::{
#         schema::{Field, Record, Schema},
#         value::Values,
#     },
#     impl_field_enum,
#     item::csv::csv_reader::{CsvItemReaderBuilder, TextLineSource},
#     MappingError,
# };
# use chrono::NaiveDate;
# use once_cell::sync::Lazy;
#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum Fuel {
    #[default]
    Petrol,
    Electric,
}

impl_field_enum!(Fuel { Petrol = 0, Electric = 1 });

#[derive(Debug, Default)]
struct Car {
    make: String,
    built: NaiveDate,
    fuel: Fuel,
    price: Option<f64>,
}

impl Record for Car {
    fn schema() -> &'static Schema {
        static SCHEMA: Lazy<Schema> = Lazy::new(|| {
            Schema::builder("Car")
                .field(Field::of::<String>("Make").alias("brand"))
                .field(Field::of::<NaiveDate>("Built"))
                .field(Field::of::<Fuel>("Fuel"))
                .field(Field::of::<Option<f64>>("Price"))
                .build()
        });
        &SCHEMA
    }

    fn from_values(mut values: Values) -> Result<Self, MappingError> {
        Ok(Car {
            make: values.take("Make")?,
            built: values.take("Built")?,
            fuel: values.take("Fuel")?,
            price: values.take("Price")?,
        })
    }

    fn to_values(&self) -> Values {
        Values::new()
            .with("Make", &self.make)
            .with("Built", &self.built)
            .with("Fuel", &self.fuel)
            .with("Price", &self.price)
    }
}

fn main() -> Result<(), MappingError> {
    let csv = "brand;built;fuel;price
Porsche;1948-06-08;Petrol;
Tesla;2012-06-22;1;79990.5
Ford;someday;Petrol;";

    let reader = CsvItemReaderBuilder::new()
        .delimiter(b';')
        .validate(true)
        .build();

    let result = reader.read_from::<Car>(&TextLineSource::new("cars.csv", csv), None)?;

    assert_eq!(result.records.len(), 2);
    assert_eq!(result.records[1].fuel, Fuel::Electric);
    assert_eq!(result.records[0].price, None);

    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues[0].row_number, 3);
    assert_eq!(result.issues[0].message, "Cannot convert 'someday' to NaiveDate.");

    Ok(())
}
```

 ## License
 Licensed under either of

 -   Apache License, Version 2.0
     ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
 -   MIT license
     ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)

 at your option.

 ## Contribution
 Unless you explicitly state otherwise, any contribution intentionally submitted
 for inclusion in the work by you, as defined in the Apache-2.0 license, shall be
 dual licensed as above, without any additional terms or conditions

 */

/// Core module: schemas, coercion, validation and row mapping
pub mod core;

/// Error types for mapping operations
pub mod error;

#[doc(inline)]
pub use error::*;

/// Set of items readers / writers  (for exemple: csv reader and writer)
pub mod item;

#![allow(dead_code)]

mod mocks;

pub use mocks::*;

use std::{env::temp_dir, fs, path::PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use csv_mapper_rs::{
    core::{
        schema::{Field, Record, Schema},
        value::Values,
    },
    impl_field_enum, MappingError,
};
use once_cell::sync::Lazy;
use rand::distr::{Alphanumeric, SampleString};
use uuid::Uuid;

pub fn random_name() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), 16)
}

/// Writes `content` to a new file with a random name in the temp folder.
pub fn temp_csv(content: &str) -> PathBuf {
    let path = temp_dir().join(format!("{}.csv", random_name()));
    fs::write(&path, content).expect("Failed to write CSV file");
    path
}

/// A fresh, not yet existing folder for error reports.
pub fn temp_report_folder() -> PathBuf {
    temp_dir().join(format!("errors_{}", random_name()))
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Person {
    pub name: String,
    pub surname: String,
    pub birth_date: NaiveDate,
    pub email: String,
}

impl Record for Person {
    fn schema() -> &'static Schema {
        static SCHEMA: Lazy<Schema> = Lazy::new(|| {
            Schema::builder("Person")
                .field(Field::of::<String>("Name"))
                .field(Field::of::<String>("Surname"))
                .field(Field::of::<NaiveDate>("BirthDate"))
                .field(Field::of::<String>("Email"))
                .build()
        });
        &SCHEMA
    }

    fn from_values(mut values: Values) -> Result<Self, MappingError> {
        Ok(Person {
            name: values.take("Name")?,
            surname: values.take("Surname")?,
            birth_date: values.take("BirthDate")?,
            email: values.take("Email")?,
        })
    }

    fn to_values(&self) -> Values {
        Values::new()
            .with("Name", &self.name)
            .with("Surname", &self.surname)
            .with("BirthDate", &self.birth_date)
            .with("Email", &self.email)
    }
}

/// `count` persons with random names and distinct birth dates.
pub fn generate_persons(count: usize) -> Vec<Person> {
    (0..count)
        .map(|index| Person {
            name: random_name(),
            surname: random_name(),
            birth_date: date(1950, 1, 1) + chrono::Days::new(index as u64 * 97),
            email: format!("{}@example.com", random_name().to_lowercase()),
        })
        .collect()
}

pub fn persons_to_csv(persons: &[Person], delimiter: char) -> String {
    let mut content = ["Name", "Surname", "BirthDate", "Email"].join(&delimiter.to_string());
    content.push('\n');
    for person in persons {
        let line = [
            person.name.clone(),
            person.surname.clone(),
            person.birth_date.format("%Y-%m-%d").to_string(),
            person.email.clone(),
        ]
        .join(&delimiter.to_string());
        content.push_str(&line);
        content.push('\n');
    }
    content
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct PersonWithAliases {
    pub name: String,
    pub surname: String,
    pub birth_date: Option<NaiveDate>,
}

impl Record for PersonWithAliases {
    fn schema() -> &'static Schema {
        static SCHEMA: Lazy<Schema> = Lazy::new(|| {
            Schema::builder("PersonWithAliases")
                .field(Field::of::<String>("Name").alias("first_name"))
                .field(Field::of::<String>("Surname").alias("family_name"))
                .field(Field::of::<Option<NaiveDate>>("BirthDate").alias("born"))
                .build()
        });
        &SCHEMA
    }

    fn from_values(mut values: Values) -> Result<Self, MappingError> {
        Ok(PersonWithAliases {
            name: values.take("Name")?,
            surname: values.take("Surname")?,
            birth_date: values.take("BirthDate")?,
        })
    }

    fn to_values(&self) -> Values {
        Values::new()
            .with("Name", &self.name)
            .with("Surname", &self.surname)
            .with("BirthDate", &self.birth_date)
    }
}

/// Columns addressed by one-based positions, declared out of order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OneBasedPerson {
    pub name: String,
    pub surname: String,
    pub email: String,
}

impl Record for OneBasedPerson {
    fn schema() -> &'static Schema {
        static SCHEMA: Lazy<Schema> = Lazy::new(|| {
            Schema::builder("OneBasedPerson")
                .field(Field::of::<String>("Name").position(2))
                .field(Field::of::<String>("Surname").position(1))
                .field(Field::of::<String>("Email").position(4))
                .build()
        });
        &SCHEMA
    }

    fn from_values(mut values: Values) -> Result<Self, MappingError> {
        Ok(OneBasedPerson {
            name: values.take("Name")?,
            surname: values.take("Surname")?,
            email: values.take("Email")?,
        })
    }

    fn to_values(&self) -> Values {
        Values::new()
            .with("Name", &self.name)
            .with("Surname", &self.surname)
            .with("Email", &self.email)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ZeroBasedPerson {
    pub name: String,
    pub surname: String,
}

impl Record for ZeroBasedPerson {
    fn schema() -> &'static Schema {
        static SCHEMA: Lazy<Schema> = Lazy::new(|| {
            Schema::builder("ZeroBasedPerson")
                .field(Field::of::<String>("Name").position(1))
                .field(Field::of::<String>("Surname").position(0))
                .build()
        });
        &SCHEMA
    }

    fn from_values(mut values: Values) -> Result<Self, MappingError> {
        Ok(ZeroBasedPerson {
            name: values.take("Name")?,
            surname: values.take("Surname")?,
        })
    }

    fn to_values(&self) -> Values {
        Values::new()
            .with("Name", &self.name)
            .with("Surname", &self.surname)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Fuel {
    #[default]
    Petrol,
    Diesel,
    Electric,
}

impl_field_enum!(Fuel {
    Petrol = 0,
    Diesel = 1,
    Electric = 2,
});

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Car {
    pub id: Uuid,
    pub make: String,
    pub year: i32,
    pub fuel: Fuel,
    pub price: Option<f64>,
    pub registered: NaiveDateTime,
}

impl Record for Car {
    fn schema() -> &'static Schema {
        static SCHEMA: Lazy<Schema> = Lazy::new(|| {
            Schema::builder("Car")
                .field(Field::of::<Uuid>("Id"))
                .field(Field::of::<String>("Make"))
                .field(Field::of::<i32>("Year"))
                .field(Field::of::<Fuel>("Fuel"))
                .field(Field::of::<Option<f64>>("Price"))
                .field(Field::of::<NaiveDateTime>("Registered"))
                .build()
        });
        &SCHEMA
    }

    fn from_values(mut values: Values) -> Result<Self, MappingError> {
        Ok(Car {
            id: values.take("Id")?,
            make: values.take("Make")?,
            year: values.take("Year")?,
            fuel: values.take("Fuel")?,
            price: values.take("Price")?,
            registered: values.take("Registered")?,
        })
    }

    fn to_values(&self) -> Values {
        Values::new()
            .with("Id", &self.id)
            .with("Make", &self.make)
            .with("Year", &self.year)
            .with("Fuel", &self.fuel)
            .with("Price", &self.price)
            .with("Registered", &self.registered)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub zip_code: String,
}

impl Record for Address {
    fn schema() -> &'static Schema {
        static SCHEMA: Lazy<Schema> = Lazy::new(|| {
            Schema::builder("Address")
                .field(Field::of::<String>("Street"))
                .field(Field::of::<String>("City"))
                .field(Field::of::<String>("ZipCode").alias("zip"))
                .build()
        });
        &SCHEMA
    }

    fn from_values(mut values: Values) -> Result<Self, MappingError> {
        Ok(Address {
            street: values.take("Street")?,
            city: values.take("City")?,
            zip_code: values.take("ZipCode")?,
        })
    }

    fn to_values(&self) -> Values {
        Values::new()
            .with("Street", &self.street)
            .with("City", &self.city)
            .with("ZipCode", &self.zip_code)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Contact {
    pub email: String,
    pub phone: String,
}

impl Record for Contact {
    fn schema() -> &'static Schema {
        static SCHEMA: Lazy<Schema> = Lazy::new(|| {
            Schema::builder("Contact")
                .field(Field::of::<String>("Email"))
                .field(Field::of::<String>("Phone"))
                .build()
        });
        &SCHEMA
    }

    fn from_values(mut values: Values) -> Result<Self, MappingError> {
        Ok(Contact {
            email: values.take("Email")?,
            phone: values.take("Phone")?,
        })
    }

    fn to_values(&self) -> Values {
        Values::new()
            .with("Email", &self.email)
            .with("Phone", &self.phone)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Company {
    pub name: String,
    pub founded: NaiveDate,
    pub address: Option<Address>,
    pub contact: Option<Contact>,
}

impl Record for Company {
    fn schema() -> &'static Schema {
        static SCHEMA: Lazy<Schema> = Lazy::new(|| {
            Schema::builder("Company")
                .field(Field::of::<String>("Name"))
                .field(Field::of::<NaiveDate>("Founded"))
                .field(Field::composite::<Address>("Address"))
                .field(Field::composite::<Contact>("Contact"))
                .build()
        });
        &SCHEMA
    }

    fn from_values(mut values: Values) -> Result<Self, MappingError> {
        Ok(Company {
            name: values.take("Name")?,
            founded: values.take("Founded")?,
            address: values.take_record("Address")?,
            contact: values.take_record("Contact")?,
        })
    }

    fn to_values(&self) -> Values {
        Values::new()
            .with("Name", &self.name)
            .with("Founded", &self.founded)
            .with_record("Address", self.address.as_ref())
            .with_record("Contact", self.contact.as_ref())
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationTestModel {
    pub name: String,
    pub age: Option<i32>,
    pub is_active: bool,
    pub salary: f64,
    pub birth_date: NaiveDate,
    pub last_login: Option<NaiveDateTime>,
}

impl Record for ValidationTestModel {
    fn schema() -> &'static Schema {
        static SCHEMA: Lazy<Schema> = Lazy::new(|| {
            Schema::builder("ValidationTestModel")
                .field(Field::of::<String>("Name"))
                .field(Field::of::<Option<i32>>("Age"))
                .field(Field::of::<bool>("IsActive"))
                .field(Field::of::<f64>("Salary"))
                .field(Field::of::<NaiveDate>("BirthDate"))
                .field(Field::of::<Option<NaiveDateTime>>("LastLogin"))
                .build()
        });
        &SCHEMA
    }

    fn from_values(mut values: Values) -> Result<Self, MappingError> {
        Ok(ValidationTestModel {
            name: values.take("Name")?,
            age: values.take("Age")?,
            is_active: values.take("IsActive")?,
            salary: values.take("Salary")?,
            birth_date: values.take("BirthDate")?,
            last_login: values.take("LastLogin")?,
        })
    }

    fn to_values(&self) -> Values {
        Values::new()
            .with("Name", &self.name)
            .with("Age", &self.age)
            .with("IsActive", &self.is_active)
            .with("Salary", &self.salary)
            .with("BirthDate", &self.birth_date)
            .with("LastLogin", &self.last_login)
    }
}

use log::debug;

use super::schema::{FieldDescriptor, FieldPath, Schema};

/// How input columns are matched to fields for one read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    /// Header text matched against column aliases and field names.
    Header,
    /// Explicit positions declared on the schema.
    Position,
    /// Declaration order of the fields, used for headerless input.
    DeclarationOrder,
}

/// One input column bound to one leaf field.
#[derive(Debug, Clone)]
pub struct ColumnBinding<'s> {
    pub column: usize,
    pub path: FieldPath<'s>,
}

/// Column to field mapping resolved once per read.
///
/// Resolution never fails: columns without a matching field are ignored and
/// fields without a column are left unpopulated.
#[derive(Debug, Clone)]
pub struct ColumnMapping<'s> {
    mode: AddressingMode,
    bindings: Vec<ColumnBinding<'s>>,
}

impl<'s> ColumnMapping<'s> {
    /// Picks the addressing mode for `schema` and resolves the bindings.
    ///
    /// A schema declaring any explicit position is always resolved by
    /// position, even when a header row is present.
    pub fn resolve<H: AsRef<str>>(schema: &'s Schema, header: Option<&[H]>) -> Self {
        if schema.has_explicit_positions() {
            Self::by_position(schema)
        } else if let Some(header) = header {
            Self::by_header(schema, header)
        } else {
            Self::by_declaration_order(schema)
        }
    }

    pub fn by_header<H: AsRef<str>>(schema: &'s Schema, header: &[H]) -> Self {
        let bindings = header
            .iter()
            .enumerate()
            .filter_map(|(column, text)| match find_field(schema, text.as_ref()) {
                Some(path) => Some(ColumnBinding { column, path }),
                None => {
                    debug!("Column '{}' has no matching field on {}", text.as_ref(), schema);
                    None
                }
            })
            .collect();

        ColumnMapping {
            mode: AddressingMode::Header,
            bindings,
        }
    }

    /// Binds fields by explicit position.
    ///
    /// Positions are shifted by one when the smallest declared position is
    /// greater than zero, so both zero-based and one-based schemas address the
    /// first column with their first position. Fields without a position use
    /// their index in the position-ordered layout.
    pub fn by_position(schema: &'s Schema) -> Self {
        let layout = schema.column_layout();

        let origin = match layout
            .iter()
            .filter_map(|leaf| leaf.field.explicit_position())
            .min()
        {
            Some(min) if min > 0 => 1,
            _ => 0,
        };

        let bindings = layout
            .into_iter()
            .enumerate()
            .filter_map(|(index, path)| {
                let column = match path.field.explicit_position() {
                    Some(position) => usize::try_from(position - origin).ok(),
                    None => Some(index),
                };
                match column {
                    Some(column) => Some(ColumnBinding { column, path }),
                    None => {
                        debug!("Field {} has a negative position and is skipped", path.field.name());
                        None
                    }
                }
            })
            .collect();

        ColumnMapping {
            mode: AddressingMode::Position,
            bindings,
        }
    }

    pub fn by_declaration_order(schema: &'s Schema) -> Self {
        let bindings = schema
            .leaves()
            .into_iter()
            .enumerate()
            .map(|(column, path)| ColumnBinding { column, path })
            .collect();

        ColumnMapping {
            mode: AddressingMode::DeclarationOrder,
            bindings,
        }
    }

    pub fn mode(&self) -> AddressingMode {
        self.mode
    }

    pub fn bindings(&self) -> &[ColumnBinding<'s>] {
        &self.bindings
    }

    /// First field bound to `column`, if any.
    pub fn field_for_column(&self, column: usize) -> Option<&FieldPath<'s>> {
        self.bindings
            .iter()
            .find(|binding| binding.column == column)
            .map(|binding| &binding.path)
    }
}

/// Finds the field addressed by a header text.
///
/// Aliases are matched before names, both case-insensitively. When nothing
/// matches at one level, the fields of all nested schemas at the next level
/// are searched together, so nested field names share the top-level namespace.
pub fn find_field<'s>(schema: &'s Schema, header_text: &str) -> Option<FieldPath<'s>> {
    let wanted = header_text.to_lowercase();
    let mut level: Vec<(Vec<&'s FieldDescriptor>, &'s Schema)> = vec![(Vec::new(), schema)];

    while !level.is_empty() {
        let candidates: Vec<FieldPath<'s>> = level
            .iter()
            .flat_map(|(owners, schema)| {
                let schema: &'s Schema = *schema;
                schema
                    .fields()
                    .iter()
                    .filter(|field| !field.is_composite())
                    .map(move |field| FieldPath {
                        owners: owners.clone(),
                        field,
                    })
            })
            .collect();

        let by_alias = candidates.iter().position(|candidate| {
            candidate
                .field
                .column_alias()
                .is_some_and(|alias| !alias.is_empty() && alias.to_lowercase() == wanted)
        });
        let by_name = || {
            candidates
                .iter()
                .position(|candidate| candidate.field.name().to_lowercase() == wanted)
        };

        if let Some(index) = by_alias.or_else(by_name) {
            return candidates.into_iter().nth(index);
        }

        level = level
            .iter()
            .flat_map(|(owners, schema)| {
                let schema: &'s Schema = *schema;
                schema.fields().iter().filter_map(move |field| {
                    field.nested_schema().map(|nested| {
                        let mut owners = owners.clone();
                        owners.push(field);
                        (owners, nested)
                    })
                })
            })
            .collect();
    }

    None
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use once_cell::sync::Lazy;

    use crate::core::schema::{Field, Record};
    use crate::core::value::Values;
    use crate::error::MappingError;

    use super::*;

    #[derive(Debug, Default)]
    struct Address {
        street: String,
        city: String,
    }

    impl Record for Address {
        fn schema() -> &'static Schema {
            static SCHEMA: Lazy<Schema> = Lazy::new(|| {
                Schema::builder("Address")
                    .field(Field::of::<String>("Street"))
                    .field(Field::of::<String>("City").alias("town"))
                    .build()
            });
            &SCHEMA
        }

        fn from_values(mut values: Values) -> Result<Self, MappingError> {
            Ok(Address {
                street: values.take("Street")?,
                city: values.take("City")?,
            })
        }

        fn to_values(&self) -> Values {
            Values::new()
                .with("Street", &self.street)
                .with("City", &self.city)
        }
    }

    fn person_schema() -> Schema {
        Schema::builder("Person")
            .field(Field::of::<String>("Name").alias("Firstname"))
            .field(Field::of::<String>("Surname").alias("family_name"))
            .field(Field::of::<NaiveDate>("BirthDate"))
            .field(Field::composite::<Address>("Address"))
            .build()
    }

    fn names(mapping: &ColumnMapping<'_>) -> Vec<(usize, &'static str)> {
        mapping
            .bindings()
            .iter()
            .map(|binding| (binding.column, binding.path.field.name()))
            .collect()
    }

    #[test]
    fn header_should_match_alias_then_name_case_insensitively() {
        let schema = person_schema();
        let header = ["FIRSTNAME", "birthdate", "Family_Name", "unknown"];

        let mapping = ColumnMapping::resolve(&schema, Some(&header[..]));

        assert_eq!(mapping.mode(), AddressingMode::Header);
        assert_eq!(
            names(&mapping),
            vec![(0, "Name"), (1, "BirthDate"), (2, "Surname")]
        );
        assert!(mapping.field_for_column(3).is_none());
    }

    #[test]
    fn header_should_reach_nested_fields() {
        let schema = person_schema();

        let city = find_field(&schema, "TOWN").unwrap();
        assert_eq!(city.field.name(), "City");
        assert_eq!(city.owner_names(), vec!["Address"]);

        let street = find_field(&schema, "street").unwrap();
        assert_eq!(street.field.name(), "Street");

        // composite fields never bind a column themselves
        assert!(find_field(&schema, "Address").is_none());
    }

    #[test]
    fn resolving_twice_should_give_the_same_mapping() {
        let schema = person_schema();
        let header = ["Surname", "Name", "City", "Street"];

        let first = ColumnMapping::resolve(&schema, Some(&header[..]));
        let second = ColumnMapping::resolve(&schema, Some(&header[..]));

        assert_eq!(names(&first), names(&second));
    }

    #[test]
    fn one_based_positions_should_address_the_first_column() {
        let schema = Schema::builder("Person")
            .field(Field::of::<String>("Name").position(2))
            .field(Field::of::<String>("Surname").position(1))
            .field(Field::of::<String>("Email").position(4))
            .build();

        let mapping = ColumnMapping::resolve::<&str>(&schema, None);

        assert_eq!(mapping.mode(), AddressingMode::Position);
        assert_eq!(
            names(&mapping),
            vec![(0, "Surname"), (1, "Name"), (3, "Email")]
        );
    }

    #[test]
    fn zero_based_positions_should_be_used_as_is() {
        let schema = Schema::builder("Person")
            .field(Field::of::<String>("Name").position(1))
            .field(Field::of::<String>("Surname").position(0))
            .build();

        let mapping = ColumnMapping::resolve(&schema, Some(&["Name", "Surname"][..]));

        assert_eq!(mapping.mode(), AddressingMode::Position);
        assert_eq!(names(&mapping), vec![(0, "Surname"), (1, "Name")]);
    }

    #[test]
    fn fields_without_position_should_fall_back_to_layout_index() {
        let schema = Schema::builder("Person")
            .field(Field::of::<String>("Name").position(1))
            .field(Field::of::<String>("Note"))
            .build();

        let mapping = ColumnMapping::by_position(&schema);

        assert_eq!(names(&mapping), vec![(0, "Name"), (1, "Note")]);
    }

    #[test]
    fn headerless_input_should_follow_declaration_order() {
        let schema = person_schema();

        let mapping = ColumnMapping::resolve::<String>(&schema, None);

        assert_eq!(mapping.mode(), AddressingMode::DeclarationOrder);
        assert_eq!(
            names(&mapping),
            vec![
                (0, "Name"),
                (1, "Surname"),
                (2, "BirthDate"),
                (3, "Street"),
                (4, "City")
            ]
        );
    }
}

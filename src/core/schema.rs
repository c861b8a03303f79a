use std::fmt;

use crate::error::MappingError;

use super::value::{FieldType, Values};

/// A typed record that can be mapped from and to delimited text.
///
/// Implementors describe their columns once through a [`Schema`] and convert
/// between the dynamic [`Values`] bag and their own fields. The schema is
/// expected to be built lazily and cached for the lifetime of the program.
///
/// # Examples
///
/// ```
/// use csv_mapper_rs::core::schema::{Field, Record, Schema};
/// use csv_mapper_rs::core::value::Values;
/// use csv_mapper_rs::MappingError;
/// use once_cell::sync::Lazy;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct City {
///     name: String,
///     population: i32,
/// }
///
/// impl Record for City {
///     fn schema() -> &'static Schema {
///         static SCHEMA: Lazy<Schema> = Lazy::new(|| {
///             Schema::builder("City")
///                 .field(Field::of::<String>("Name"))
///                 .field(Field::of::<i32>("Population").alias("pop"))
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
/// assert_eq!(City::schema().fields().len(), 2);
/// assert!(!City::schema().has_explicit_positions());
/// ```
pub trait Record: Sized {
    /// Returns the static schema describing the record's columns.
    fn schema() -> &'static Schema;

    /// Builds the record from mapped values. Fields without a value keep
    /// their default.
    fn from_values(values: Values) -> Result<Self, MappingError>;

    /// Exposes the record's values, keyed by field name.
    fn to_values(&self) -> Values;
}

/// One member of an enumeration: its symbolic name and integer ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumMember {
    pub name: &'static str,
    pub ordinal: i64,
}

/// Declared members of an enumeration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumType {
    pub name: &'static str,
    pub members: &'static [EnumMember],
}

impl EnumType {
    /// Finds a member by its exact (case-sensitive) name.
    pub fn by_name(&self, name: &str) -> Option<EnumMember> {
        self.members.iter().find(|member| member.name == name).copied()
    }

    pub fn by_ordinal(&self, ordinal: i64) -> Option<EnumMember> {
        self.members
            .iter()
            .find(|member| member.ordinal == ordinal)
            .copied()
    }
}

/// Declared kind of a field. Nullability is carried separately on the
/// descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Bool,
    /// 32-bit signed integer
    Int,
    /// 64-bit signed integer
    Long,
    Decimal,
    Date,
    DateTime,
    Guid,
    Enum(EnumType),
    Composite,
}

/// Schema-level metadata for one target field.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: &'static str,
    kind: FieldKind,
    nullable: bool,
    type_name: String,
    column_alias: Option<&'static str>,
    explicit_position: Option<i32>,
    nested: Option<&'static Schema>,
}

impl FieldDescriptor {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Type name used in conversion messages, e.g. `NaiveDate` or `Option<i32>`.
    pub fn declared_type(&self) -> &str {
        &self.type_name
    }

    pub fn column_alias(&self) -> Option<&'static str> {
        self.column_alias
    }

    pub fn explicit_position(&self) -> Option<i32> {
        self.explicit_position
    }

    pub fn nested_schema(&self) -> Option<&'static Schema> {
        self.nested
    }

    pub fn is_composite(&self) -> bool {
        self.kind == FieldKind::Composite
    }

    /// Column header used when writing: the alias when declared, else the name.
    pub fn column_name(&self) -> &'static str {
        self.column_alias.unwrap_or(self.name)
    }
}

/// Builder for a single [`FieldDescriptor`].
pub struct Field {
    descriptor: FieldDescriptor,
}

impl Field {
    /// Declares a field whose kind is derived from the Rust type `T`.
    pub fn of<T: FieldType>(name: &'static str) -> Self {
        Self {
            descriptor: FieldDescriptor {
                name,
                kind: T::field_kind(),
                nullable: T::nullable(),
                type_name: T::type_name(),
                column_alias: None,
                explicit_position: None,
                nested: None,
            },
        }
    }

    /// Declares a composite field whose columns are described by `R`'s schema.
    pub fn composite<R: Record>(name: &'static str) -> Self {
        let nested = R::schema();
        Self {
            descriptor: FieldDescriptor {
                name,
                kind: FieldKind::Composite,
                nullable: true,
                type_name: nested.name().to_string(),
                column_alias: None,
                explicit_position: None,
                nested: Some(nested),
            },
        }
    }

    /// Header text matched (case-insensitively) before the field name.
    pub fn alias(mut self, alias: &'static str) -> Self {
        self.descriptor.column_alias = Some(alias);
        self
    }

    /// Explicit column position. Declaring one on any field switches the whole
    /// schema to position-based resolution.
    pub fn position(mut self, position: i32) -> Self {
        self.descriptor.explicit_position = Some(position);
        self
    }
}

/// A leaf field together with the chain of composite fields that own it.
#[derive(Debug, Clone)]
pub struct FieldPath<'s> {
    pub owners: Vec<&'s FieldDescriptor>,
    pub field: &'s FieldDescriptor,
}

impl FieldPath<'_> {
    /// Names of the owning composite fields, outermost first.
    pub fn owner_names(&self) -> Vec<&'static str> {
        self.owners.iter().map(|owner| owner.name()).collect()
    }
}

/// Ordered field descriptors of one record type.
#[derive(Debug, Clone)]
pub struct Schema {
    name: &'static str,
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    pub fn builder(name: &'static str) -> SchemaBuilder {
        SchemaBuilder {
            name,
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Descriptors in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn has_composites(&self) -> bool {
        self.fields.iter().any(FieldDescriptor::is_composite)
    }

    /// True when any field, including fields of nested schemas, declares an
    /// explicit position.
    pub fn has_explicit_positions(&self) -> bool {
        self.fields.iter().any(|field| match field.nested {
            Some(nested) => field.explicit_position.is_some() || nested.has_explicit_positions(),
            None => field.explicit_position.is_some(),
        })
    }

    /// Leaf fields in declaration order, with composite fields expanded inline.
    pub fn leaves(&self) -> Vec<FieldPath<'_>> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut Vec::new(), &mut leaves);
        leaves
    }

    fn collect_leaves<'s>(
        &'s self,
        owners: &mut Vec<&'s FieldDescriptor>,
        leaves: &mut Vec<FieldPath<'s>>,
    ) {
        for field in &self.fields {
            match field.nested {
                Some(nested) => {
                    owners.push(field);
                    nested.collect_leaves(owners, leaves);
                    owners.pop();
                }
                None => leaves.push(FieldPath {
                    owners: owners.clone(),
                    field,
                }),
            }
        }
    }

    /// Leaf fields in column order: ascending explicit position when the
    /// schema uses positions (fields without one keep their relative order
    /// after the positioned ones), declaration order otherwise.
    pub fn column_layout(&self) -> Vec<FieldPath<'_>> {
        let mut leaves = self.leaves();
        if self.has_explicit_positions() {
            leaves.sort_by_key(|leaf| match leaf.field.explicit_position {
                Some(position) => (0, position),
                None => (1, 0),
            });
        }
        leaves
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

pub struct SchemaBuilder {
    name: &'static str,
    fields: Vec<FieldDescriptor>,
}

impl SchemaBuilder {
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field.descriptor);
        self
    }

    pub fn build(self) -> Schema {
        Schema {
            name: self.name,
            fields: self.fields,
        }
    }
}

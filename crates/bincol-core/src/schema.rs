//! Read-back schema model: declared field names and types only.
//!
//! A [`FileSchema`] is extracted from file metadata alone; producing
//! one must never require materializing row values.

use std::fmt;

use arrow::datatypes::{DataType, Schema};

/// One field of a file schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FileField {
    /// Field name as recorded in the file.
    pub name: String,
    /// Declared Arrow data type.
    pub data_type: DataType,
    /// Whether the field admits nulls.
    pub nullable: bool,
}

impl FileField {
    /// True when the declared type is an opaque binary type.
    pub fn is_binary(&self) -> bool {
        matches!(
            self.data_type,
            DataType::Binary
                | DataType::LargeBinary
                | DataType::BinaryView
                | DataType::FixedSizeBinary(_)
        )
    }

    /// Human-readable name of the declared type.
    pub fn type_name(&self) -> String {
        match &self.data_type {
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => "string".to_string(),
            DataType::Binary | DataType::LargeBinary | DataType::BinaryView => {
                "binary".to_string()
            }
            DataType::FixedSizeBinary(width) => format!("fixed_size_binary[{width}]"),
            other => format!("{other:?}").to_lowercase(),
        }
    }
}

/// Ordered field list describing a file's columns without any values.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSchema {
    fields: Vec<FileField>,
}

impl FileSchema {
    /// Schema from an explicit field list.
    pub fn new(fields: Vec<FileField>) -> Self {
        Self { fields }
    }

    /// Capture the declared layout of an Arrow schema.
    pub fn from_arrow(schema: &Schema) -> Self {
        Self {
            fields: schema
                .fields()
                .iter()
                .map(|f| FileField {
                    name: f.name().clone(),
                    data_type: f.data_type().clone(),
                    nullable: f.is_nullable(),
                })
                .collect(),
        }
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FileField] {
        &self.fields
    }
}

impl fmt::Display for FileSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for field in &self.fields {
            let null_marker = if field.nullable { "" } else { " not null" };
            writeln!(f, "{}: {}{null_marker}", field.name, field.type_name())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::Field;

    #[test]
    fn from_arrow_preserves_order_and_nullability() {
        let arrow_schema = Schema::new(vec![
            Field::new("a", DataType::Utf8, false),
            Field::new("b", DataType::Binary, true),
        ]);

        let schema = FileSchema::from_arrow(&arrow_schema);
        let fields = schema.fields();

        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "a");
        assert_eq!(fields[0].data_type, DataType::Utf8);
        assert!(!fields[0].nullable);
        assert_eq!(fields[1].name, "b");
        assert!(fields[1].nullable);
    }

    #[test]
    fn binary_types_are_recognized() {
        let binary = |dt: DataType| FileField {
            name: "f".to_string(),
            data_type: dt,
            nullable: false,
        };

        assert!(binary(DataType::Binary).is_binary());
        assert!(binary(DataType::LargeBinary).is_binary());
        assert!(binary(DataType::FixedSizeBinary(4)).is_binary());
        assert!(!binary(DataType::Utf8).is_binary());
        assert!(!binary(DataType::Int64).is_binary());
    }

    #[test]
    fn display_lists_one_field_per_line() {
        let schema = FileSchema::new(vec![FileField {
            name: "binary".to_string(),
            data_type: DataType::Binary,
            nullable: false,
        }]);

        assert_eq!(schema.to_string(), "binary: binary not null\n");
    }

    #[test]
    fn type_names_render_without_debug_texture() {
        let field = |dt: DataType| FileField {
            name: "f".to_string(),
            data_type: dt,
            nullable: true,
        };

        assert_eq!(field(DataType::Binary).type_name(), "binary");
        assert_eq!(field(DataType::LargeBinary).type_name(), "binary");
        assert_eq!(field(DataType::Utf8).type_name(), "string");
        assert_eq!(
            field(DataType::FixedSizeBinary(16)).type_name(),
            "fixed_size_binary[16]"
        );
        assert_eq!(field(DataType::Int64).type_name(), "int64");
    }
}

/// Schema data model: tables, columns, foreign keys and SQL data types.
///
/// A [`Schema`] is the document the history manager versions. It serializes
/// as a bare JSON array of tables with camelCase field names.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// SQL column types offered by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataType {
    Uuid,
    Int,
    BigInt,
    Decimal,
    Float,
    #[default]
    Varchar,
    Char,
    Text,
    Date,
    DateTime,
    Timestamp,
    Boolean,
    Blob,
    Json,
}

impl DataType {
    /// Every type, in the order the editor lists them.
    pub const ALL: [DataType; 14] = [
        DataType::Uuid,
        DataType::Int,
        DataType::BigInt,
        DataType::Decimal,
        DataType::Float,
        DataType::Varchar,
        DataType::Char,
        DataType::Text,
        DataType::Date,
        DataType::DateTime,
        DataType::Timestamp,
        DataType::Boolean,
        DataType::Blob,
        DataType::Json,
    ];

    /// The SQL keyword for this type.
    pub fn as_str(self) -> &'static str {
        match self {
            DataType::Uuid => "UUID",
            DataType::Int => "INT",
            DataType::BigInt => "BIGINT",
            DataType::Decimal => "DECIMAL",
            DataType::Float => "FLOAT",
            DataType::Varchar => "VARCHAR",
            DataType::Char => "CHAR",
            DataType::Text => "TEXT",
            DataType::Date => "DATE",
            DataType::DateTime => "DATETIME",
            DataType::Timestamp => "TIMESTAMP",
            DataType::Boolean => "BOOLEAN",
            DataType::Blob => "BLOB",
            DataType::Json => "JSON",
        }
    }

    /// Whether a length/precision argument is rendered for this type.
    pub fn takes_length(self) -> bool {
        matches!(self, DataType::Varchar | DataType::Char | DataType::Decimal)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a type name is not one of [`DataType::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown data type: {0}")]
pub struct UnknownDataType(pub String);

impl FromStr for DataType {
    type Err = UnknownDataType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        DataType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownDataType(s.to_string()))
    }
}

fn default_true() -> bool {
    true
}

/// A single table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
    /// Length or precision, e.g. `"255"` or `"10,2"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default = "default_true")]
    pub is_nullable: bool,
}

impl Column {
    /// Creates a nullable, non-primary column without a length.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            length: None,
            is_primary: false,
            is_nullable: true,
        }
    }

    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.is_nullable = false;
        self
    }

    pub fn with_length(mut self, length: impl Into<String>) -> Self {
        self.length = Some(length.into());
        self
    }

    /// The length to render, if any: non-empty and allowed by the type.
    pub fn effective_length(&self) -> Option<&str> {
        self.length
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty() && self.data_type.takes_length())
    }
}

/// A `FOREIGN KEY (column) REFERENCES table(column)` constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKey {
    pub column_name: String,
    pub reference_table: String,
    pub reference_column: String,
}

impl ForeignKey {
    pub fn new(
        column_name: impl Into<String>,
        reference_table: impl Into<String>,
        reference_column: impl Into<String>,
    ) -> Self {
        Self {
            column_name: column_name.into(),
            reference_table: reference_table.into(),
            reference_column: reference_column.into(),
        }
    }

    /// True when every field is filled in.
    pub fn is_complete(&self) -> bool {
        !self.column_name.is_empty()
            && !self.reference_table.is_empty()
            && !self.reference_column.is_empty()
    }
}

/// A table definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_foreign_key(mut self, fk: ForeignKey) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    /// Name shown in lists, falling back to `Table N` (1-based) when unnamed.
    pub fn display_name(&self, index: usize) -> String {
        if self.name.is_empty() {
            format!("Table {}", index + 1)
        } else {
            self.name.clone()
        }
    }
}

/// The full editable document: an ordered list of tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    pub tables: Vec<Table>,
}

impl Schema {
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Finds the first table with the given name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

impl From<Vec<Table>> for Schema {
    fn from(tables: Vec<Table>) -> Self {
        Self { tables }
    }
}

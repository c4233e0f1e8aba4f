/// Built-in starter schemas.
use crate::schema::{Column, DataType, ForeignKey, Schema, Table};

/// A named, ready-made schema.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaTemplate {
    /// Short identifier used on the command line.
    pub key: &'static str,
    /// Human-readable title.
    pub name: &'static str,
    pub schema: Schema,
}

impl SchemaTemplate {
    /// One-line description for template pickers.
    pub fn summary(&self) -> String {
        format!(
            "{} tables with predefined relationships",
            self.schema.len()
        )
    }

    /// Names of the tables the template creates.
    pub fn table_names(&self) -> Vec<&str> {
        self.schema.tables.iter().map(|t| t.name.as_str()).collect()
    }
}

fn id() -> Column {
    Column::new("id", DataType::Uuid).primary().not_null()
}

fn required(name: &str, data_type: DataType) -> Column {
    Column::new(name, data_type).not_null()
}

fn blog() -> SchemaTemplate {
    SchemaTemplate {
        key: "blog",
        name: "Blog System",
        schema: Schema::new(vec![
            Table::new("users")
                .with_column(id())
                .with_column(required("email", DataType::Varchar).with_length("255"))
                .with_column(required("username", DataType::Varchar).with_length("50"))
                .with_column(required("created_at", DataType::Timestamp)),
            Table::new("posts")
                .with_column(id())
                .with_column(required("title", DataType::Varchar).with_length("255"))
                .with_column(required("content", DataType::Text))
                .with_column(required("user_id", DataType::Uuid))
                .with_column(required("created_at", DataType::Timestamp))
                .with_foreign_key(ForeignKey::new("user_id", "users", "id")),
        ]),
    }
}

fn ecommerce() -> SchemaTemplate {
    SchemaTemplate {
        key: "ecommerce",
        name: "E-commerce",
        schema: Schema::new(vec![
            Table::new("products")
                .with_column(id())
                .with_column(required("name", DataType::Varchar).with_length("255"))
                .with_column(required("price", DataType::Decimal).with_length("10,2"))
                .with_column(required("stock", DataType::Int)),
            Table::new("orders")
                .with_column(id())
                .with_column(required("user_id", DataType::Uuid))
                .with_column(required("total", DataType::Decimal).with_length("10,2"))
                .with_column(required("status", DataType::Varchar).with_length("50")),
        ]),
    }
}

/// Every built-in template.
pub fn all() -> Vec<SchemaTemplate> {
    vec![blog(), ecommerce()]
}

/// Looks up a template by key (case-insensitive).
pub fn find(key: &str) -> Option<SchemaTemplate> {
    all()
        .into_iter()
        .find(|t| t.key.eq_ignore_ascii_case(key.trim()))
}

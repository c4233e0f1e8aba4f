/// `CREATE TABLE` generation from a schema snapshot.
use crate::schema::{Column, DataType, ForeignKey, Schema, Table};

/// Renders every table as a `CREATE TABLE` statement.
///
/// Tables without a name or without columns are skipped. Statements are
/// separated by a blank line. An empty schema yields an empty string.
pub fn generate(schema: &Schema) -> String {
    schema
        .tables
        .iter()
        .filter_map(generate_table)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Renders a single table, or `None` if it is unnamed or has no columns.
pub fn generate_table(table: &Table) -> Option<String> {
    if table.name.is_empty() || table.columns.is_empty() {
        return None;
    }

    let lines: Vec<String> = table
        .columns
        .iter()
        .map(column_definition)
        .chain(table.foreign_keys.iter().map(foreign_key_definition))
        .collect();

    Some(format!(
        "CREATE TABLE {} (\n{}\n);",
        table.name,
        lines.join(",\n")
    ))
}

fn column_definition(column: &Column) -> String {
    let mut def = format!("  {} {}", column.name, column.data_type);

    if let Some(length) = column.effective_length() {
        def.push_str(&format!("({length})"));
    }

    if column.is_primary {
        def.push_str(" PRIMARY KEY");
        if column.data_type == DataType::Uuid {
            def.push_str(" DEFAULT gen_random_uuid()");
        }
    }

    if !column.is_nullable {
        def.push_str(" NOT NULL");
    }

    def
}

fn foreign_key_definition(fk: &ForeignKey) -> String {
    format!(
        "  FOREIGN KEY ({}) REFERENCES {}({})",
        fk.column_name, fk.reference_table, fk.reference_column
    )
}

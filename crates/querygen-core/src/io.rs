//! Schema import/export.
//!
//! Schemas are exchanged as JSON text: an array of tables, each with
//! `name`, `columns` and `foreignKeys`. Export cannot lose information;
//! import either yields a complete [`Schema`] or a [`ParseError`].

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::schema::Schema;

/// Why a schema could not be read.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The text is not JSON, or not shaped like a schema.
    #[error("invalid schema file (line {line}, column {column})")]
    Invalid {
        line: usize,
        column: usize,
        #[source]
        source: serde_json::Error,
    },

    /// The file could not be read.
    #[error("failed to read schema file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<serde_json::Error> for ParseError {
    fn from(source: serde_json::Error) -> Self {
        ParseError::Invalid {
            line: source.line(),
            column: source.column(),
            source,
        }
    }
}

/// Serializes a schema; `pretty` selects two-space indented output.
pub fn to_json(schema: &Schema, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(schema)
    } else {
        serde_json::to_string(schema)
    }
}

/// Parses schema JSON text.
pub fn from_json(text: &str) -> Result<Schema, ParseError> {
    Ok(serde_json::from_str(text)?)
}

/// Reads and parses a schema file.
pub fn read_file(path: &Path) -> Result<Schema, ParseError> {
    let text = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let schema = from_json(&text)?;
    tracing::info!(
        "Imported {} table(s) from {}",
        schema.len(),
        path.display()
    );
    Ok(schema)
}

/// Writes a schema to `path` as JSON.
pub fn write_file(path: &Path, schema: &Schema, pretty: bool) -> anyhow::Result<()> {
    let json = to_json(schema, pretty).context("Failed to serialize schema")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write schema file: {}", path.display()))?;
    tracing::info!("Exported {} table(s) to {}", schema.len(), path.display());
    Ok(())
}

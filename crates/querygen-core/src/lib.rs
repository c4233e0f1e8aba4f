//! Schema model and editing surface for QueryGen.
//!
//! Tables, columns and foreign keys are edited through a [`SchemaEditor`],
//! which versions every change in a linear undo/redo history. A schema
//! snapshot can be rendered as `CREATE TABLE` statements, exported to and
//! imported from JSON, or drawn as a relationship graph.

pub mod editor;
pub mod graph;
pub mod io;
pub mod schema;
pub mod shortcuts;
pub mod sql;
pub mod templates;

pub use editor::{ColumnEdit, EditError, SchemaEditor};
pub use graph::RelationshipGraph;
pub use io::ParseError;
pub use schema::{Column, DataType, ForeignKey, Schema, Table, UnknownDataType};
pub use shortcuts::{Action, KeyChord};
pub use templates::SchemaTemplate;

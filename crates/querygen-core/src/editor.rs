//! Schema editing session.
//!
//! `SchemaEditor` is the editing surface over a [`HistoryManager<Schema>`].
//! Every edit copies the present schema, changes the copy, and commits it as
//! a new snapshot, so stored history is never mutated in place. The table
//! selection is presentation state owned by the editor, not by the history.

use querygen_mod_history::HistoryManager;

use crate::io::{self, ParseError};
use crate::schema::{Column, DataType, ForeignKey, Schema, Table};
use crate::templates::SchemaTemplate;

/// Why an edit was rejected. A rejected edit commits nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("no table is selected")]
    NoTableSelected,
    #[error("table index {index} is out of range ({len} tables)")]
    TableOutOfRange { index: usize, len: usize },
    #[error("column index {index} is out of range ({len} columns)")]
    ColumnOutOfRange { index: usize, len: usize },
    #[error("foreign key index {index} is out of range ({len} foreign keys)")]
    ForeignKeyOutOfRange { index: usize, len: usize },
    #[error("please fill in all foreign key fields")]
    IncompleteForeignKey,
}

/// A change to one field of a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnEdit {
    Name(String),
    DataType(DataType),
    Length(Option<String>),
    Primary(bool),
    Nullable(bool),
}

impl ColumnEdit {
    fn apply(self, column: &mut Column) {
        match self {
            ColumnEdit::Name(name) => column.name = name,
            ColumnEdit::DataType(data_type) => column.data_type = data_type,
            ColumnEdit::Length(length) => column.length = length,
            ColumnEdit::Primary(on) => column.is_primary = on,
            ColumnEdit::Nullable(on) => column.is_nullable = on,
        }
    }
}

/// An editing session over a versioned schema.
#[derive(Debug)]
pub struct SchemaEditor {
    history: HistoryManager<Schema>,
    /// Index of the table the column and foreign-key edits apply to.
    selected: usize,
}

impl Default for SchemaEditor {
    fn default() -> Self {
        Self::new(Schema::default())
    }
}

impl SchemaEditor {
    pub fn new(initial: Schema) -> Self {
        Self {
            history: HistoryManager::new(initial),
            selected: 0,
        }
    }

    /// The present schema.
    pub fn schema(&self) -> &Schema {
        self.history.current()
    }

    pub fn history(&self) -> &HistoryManager<Schema> {
        &self.history
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// The selected table, or `None` if the selection is past the end (for
    /// instance after an undo removed the table).
    pub fn selected_table(&self) -> Option<&Table> {
        self.schema().tables.get(self.selected)
    }

    /// Selects a table for column and foreign-key edits.
    pub fn select_table(&mut self, index: usize) -> Result<(), EditError> {
        check_index(index, self.schema().len(), |index, len| {
            EditError::TableOutOfRange { index, len }
        })?;
        self.selected = index;
        Ok(())
    }

    // ── Tables ─────────────────────────────────────────────────────────

    /// Appends an unnamed empty table and selects it.
    pub fn add_table(&mut self) -> usize {
        self.add_table_named("")
    }

    /// Appends an empty table called `name` and selects it.
    pub fn add_table_named(&mut self, name: impl Into<String>) -> usize {
        let mut next = self.schema().clone();
        next.tables.push(Table::new(name));
        let index = next.len() - 1;
        self.history.commit(next);
        self.selected = index;
        tracing::debug!(index, "added table");
        index
    }

    /// Removes the table at `index`, keeping the selection in range.
    pub fn delete_table(&mut self, index: usize) -> Result<Table, EditError> {
        let mut next = self.schema().clone();
        check_index(index, next.len(), |index, len| EditError::TableOutOfRange {
            index,
            len,
        })?;
        let removed = next.tables.remove(index);
        let remaining = next.len();
        self.history.commit(next);
        if self.selected >= remaining {
            self.selected = remaining.saturating_sub(1);
        }
        tracing::debug!(index, name = %removed.name, "deleted table");
        Ok(removed)
    }

    pub fn rename_table(&mut self, index: usize, name: impl Into<String>) -> Result<(), EditError> {
        let name = name.into();
        self.edit(|schema| {
            let len = schema.len();
            let table = schema
                .tables
                .get_mut(index)
                .ok_or(EditError::TableOutOfRange { index, len })?;
            table.name = name;
            Ok(())
        })
    }

    // ── Columns (selected table) ───────────────────────────────────────

    /// Appends a column to the selected table and returns its index.
    pub fn add_column(&mut self, column: Column) -> Result<usize, EditError> {
        let mut index = 0;
        self.edit_selected(|table| {
            table.columns.push(column);
            index = table.columns.len() - 1;
            Ok(())
        })?;
        Ok(index)
    }

    pub fn update_column(&mut self, index: usize, edit: ColumnEdit) -> Result<(), EditError> {
        self.edit_selected(|table| {
            let len = table.columns.len();
            let column = table
                .columns
                .get_mut(index)
                .ok_or(EditError::ColumnOutOfRange { index, len })?;
            edit.apply(column);
            Ok(())
        })
    }

    pub fn remove_column(&mut self, index: usize) -> Result<Column, EditError> {
        let mut removed = None;
        self.edit_selected(|table| {
            check_index(index, table.columns.len(), |index, len| {
                EditError::ColumnOutOfRange { index, len }
            })?;
            removed = Some(table.columns.remove(index));
            Ok(())
        })?;
        removed.ok_or(EditError::NoTableSelected)
    }

    // ── Foreign keys (selected table) ──────────────────────────────────

    /// Adds a foreign key to the selected table. All three fields must be
    /// filled in.
    pub fn add_foreign_key(&mut self, fk: ForeignKey) -> Result<(), EditError> {
        if !fk.is_complete() {
            return Err(EditError::IncompleteForeignKey);
        }
        self.edit_selected(|table| {
            table.foreign_keys.push(fk);
            Ok(())
        })
    }

    pub fn remove_foreign_key(&mut self, index: usize) -> Result<ForeignKey, EditError> {
        let mut removed = None;
        self.edit_selected(|table| {
            check_index(index, table.foreign_keys.len(), |index, len| {
                EditError::ForeignKeyOutOfRange { index, len }
            })?;
            removed = Some(table.foreign_keys.remove(index));
            Ok(())
        })?;
        removed.ok_or(EditError::NoTableSelected)
    }

    // ── Whole-schema replacement ───────────────────────────────────────

    /// Replaces the schema with a template's tables as one undoable step.
    pub fn apply_template(&mut self, template: &SchemaTemplate) {
        tracing::debug!(template = template.key, "applying template");
        self.history.commit(template.schema.clone());
    }

    /// Replaces the schema with the result of parsing `text`.
    ///
    /// On a parse error nothing is committed and the history is unchanged.
    pub fn import_json(&mut self, text: &str) -> Result<usize, ParseError> {
        let schema = io::from_json(text)?;
        Ok(self.replace(schema))
    }

    /// Commits an already-parsed schema, returning its table count.
    pub fn replace(&mut self, schema: Schema) -> usize {
        let count = schema.len();
        self.history.commit(schema);
        count
    }

    pub fn export_json(&self, pretty: bool) -> Result<String, serde_json::Error> {
        io::to_json(self.schema(), pretty)
    }

    // ── History ────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ── Internals ──────────────────────────────────────────────────────

    /// Applies `change` to a copy of the present schema and commits the copy
    /// if `change` succeeds.
    fn edit<F>(&mut self, change: F) -> Result<(), EditError>
    where
        F: FnOnce(&mut Schema) -> Result<(), EditError>,
    {
        let mut next = self.schema().clone();
        change(&mut next)?;
        self.history.commit(next);
        Ok(())
    }

    fn edit_selected<F>(&mut self, change: F) -> Result<(), EditError>
    where
        F: FnOnce(&mut Table) -> Result<(), EditError>,
    {
        let selected = self.selected;
        self.edit(|schema| {
            let table = schema
                .tables
                .get_mut(selected)
                .ok_or(EditError::NoTableSelected)?;
            change(table)
        })
    }
}

fn check_index(
    index: usize,
    len: usize,
    err: impl FnOnce(usize, usize) -> EditError,
) -> Result<(), EditError> {
    if index < len {
        Ok(())
    } else {
        Err(err(index, len))
    }
}

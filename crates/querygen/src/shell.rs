//! Interactive editing shell.
//!
//! Reads one command per line and applies it to a [`SchemaEditor`]. Lines
//! are split into words with shell quoting rules (`rename "My Table"`,
//! `set-column 0 length ""`) and parsed with clap, so `help` and
//! `<command> --help` work as usual.
//! Rejected edits are reported and the session carries on.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use querygen_config::AppConfig;
use querygen_core::shortcuts::BINDINGS;
use querygen_core::{
    io, sql, templates, Action, Column, ColumnEdit, DataType, ForeignKey, KeyChord,
    RelationshipGraph, SchemaEditor,
};

/// Whether the shell should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Parser, Debug)]
#[command(no_binary_name = true, name = "querygen shell", disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug)]
enum ShellCommand {
    /// Add a table and select it
    AddTable { name: Option<String> },
    /// Delete the table at INDEX
    DropTable { index: usize },
    /// Select the table at INDEX
    Select { index: usize },
    /// Rename the selected table
    Rename { name: String },
    /// Add a column to the selected table
    AddColumn {
        name: String,
        /// Column type; defaults to the configured type
        #[arg(long = "type")]
        data_type: Option<DataType>,
        #[arg(long)]
        length: Option<String>,
        #[arg(long)]
        primary: bool,
        #[arg(long)]
        not_null: bool,
    },
    /// Change one field of the column at INDEX
    SetColumn {
        index: usize,
        #[arg(value_enum)]
        field: ColumnField,
        /// New value (empty string clears a length)
        value: String,
    },
    /// Delete the column at INDEX
    DropColumn { index: usize },
    /// Add a foreign key to the selected table
    AddFk {
        column: String,
        table: String,
        reference_column: String,
    },
    /// Delete the foreign key at INDEX
    DropFk { index: usize },
    Undo,
    Redo,
    /// Print the current schema
    Show,
    /// Print CREATE TABLE statements
    Sql,
    /// Print the relationship graph as DOT
    Graph,
    /// Replace the schema with a built-in template
    Template { name: String },
    /// Replace the schema with the contents of a JSON file
    Import { file: PathBuf },
    /// Write the schema as JSON (default path from config)
    Export { file: Option<PathBuf> },
    /// Run the action bound to a key chord, e.g. `mod+z`
    Key { chord: String },
    /// List keyboard shortcuts
    Shortcuts,
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColumnField {
    Name,
    Type,
    Length,
    Primary,
    Nullable,
}

impl ColumnField {
    fn to_edit(self, value: &str) -> Result<ColumnEdit> {
        Ok(match self {
            ColumnField::Name => ColumnEdit::Name(value.to_string()),
            ColumnField::Type => ColumnEdit::DataType(value.parse()?),
            ColumnField::Length => {
                let value = value.trim();
                ColumnEdit::Length((!value.is_empty()).then(|| value.to_string()))
            }
            ColumnField::Primary => ColumnEdit::Primary(parse_flag(value)?),
            ColumnField::Nullable => ColumnEdit::Nullable(parse_flag(value)?),
        })
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => anyhow::bail!("expected true or false, got '{other}'"),
    }
}

/// An editing session attached to an output stream.
pub struct Shell<W: Write> {
    editor: SchemaEditor,
    config: AppConfig,
    out: W,
}

impl<W: Write> Shell<W> {
    pub fn new(editor: SchemaEditor, config: AppConfig, out: W) -> Self {
        Self {
            editor,
            config,
            out,
        }
    }

    pub fn editor(&self) -> &SchemaEditor {
        &self.editor
    }

    /// Reads commands from `input` until end of input or `quit`.
    pub fn run<R: BufRead>(&mut self, input: R, prompt: bool) -> Result<()> {
        let mut lines = input.lines();
        loop {
            if prompt {
                write!(self.out, "querygen> ")?;
                self.out.flush()?;
            }
            let Some(line) = lines.next() else {
                break;
            };
            let line = line.context("Failed to read command")?;
            if self.execute_line(&line)? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    /// Parses and runs one command line.
    ///
    /// Usage errors and rejected edits are written to the output; only a
    /// failure to write the output itself is returned as an error.
    pub fn execute_line(&mut self, line: &str) -> Result<Flow> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Flow::Continue);
        }

        let Some(words) = shlex::split(line) else {
            writeln!(self.out, "error: unterminated quote or trailing escape")?;
            return Ok(Flow::Continue);
        };

        let parsed = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed,
            Err(e) => {
                write!(self.out, "{}", e.render())?;
                return Ok(Flow::Continue);
            }
        };

        match self.execute(parsed.command) {
            Ok(flow) => Ok(flow),
            Err(e) => {
                writeln!(self.out, "error: {e:#}")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn execute(&mut self, command: ShellCommand) -> Result<Flow> {
        match command {
            ShellCommand::AddTable { name } => {
                let index = self.editor.add_table_named(name.unwrap_or_default());
                writeln!(self.out, "added table {index}")?;
            }
            ShellCommand::DropTable { index } => {
                let table = self.editor.delete_table(index)?;
                writeln!(self.out, "deleted {}", table.display_name(index))?;
            }
            ShellCommand::Select { index } => self.editor.select_table(index)?,
            ShellCommand::Rename { name } => {
                let index = self.selected()?;
                self.editor.rename_table(index, name)?;
            }
            ShellCommand::AddColumn {
                name,
                data_type,
                length,
                primary,
                not_null,
            } => {
                let data_type = data_type.unwrap_or_else(|| self.default_type());
                let mut column = Column::new(name, data_type);
                column.is_nullable = self.config.default_column_nullable && !not_null;
                column.length = length;
                column.is_primary = primary;
                let index = self.editor.add_column(column)?;
                writeln!(self.out, "added column {index}")?;
            }
            ShellCommand::SetColumn {
                index,
                field,
                value,
            } => {
                let edit = field.to_edit(&value)?;
                self.editor.update_column(index, edit)?;
            }
            ShellCommand::DropColumn { index } => {
                let column = self.editor.remove_column(index)?;
                writeln!(self.out, "deleted column {}", column.name)?;
            }
            ShellCommand::AddFk {
                column,
                table,
                reference_column,
            } => {
                self.editor
                    .add_foreign_key(ForeignKey::new(column, table, reference_column))?;
            }
            ShellCommand::DropFk { index } => {
                self.editor.remove_foreign_key(index)?;
            }
            ShellCommand::Undo => self.run_action(Action::Undo)?,
            ShellCommand::Redo => self.run_action(Action::Redo)?,
            ShellCommand::Show => self.show()?,
            ShellCommand::Sql => self.run_action(Action::GenerateSql)?,
            ShellCommand::Graph => self.run_action(Action::ShowDiagram)?,
            ShellCommand::Template { name } => {
                let template = templates::find(&name).with_context(|| {
                    let known: Vec<_> = templates::all().iter().map(|t| t.key).collect();
                    format!("unknown template '{name}' (available: {})", known.join(", "))
                })?;
                self.editor.apply_template(&template);
                writeln!(self.out, "applied template {}", template.name)?;
            }
            ShellCommand::Import { file } => {
                // A parse failure returns before anything is committed.
                let schema = io::read_file(&file)?;
                let count = self.editor.replace(schema);
                writeln!(self.out, "imported {count} table(s)")?;
            }
            ShellCommand::Export { file } => {
                let path = file.unwrap_or_else(|| self.config.resolve_export_path());
                self.export_to(path)?;
            }
            ShellCommand::Key { chord } => {
                let chord: KeyChord = chord.parse()?;
                match Action::for_chord(&chord) {
                    Some(action) => self.run_action(action)?,
                    None => writeln!(self.out, "no action bound to {chord}")?,
                }
            }
            ShellCommand::Shortcuts => self.run_action(Action::ShowShortcuts)?,
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Runs an action the same way whether it came from a command or a
    /// key chord.
    fn run_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Undo => {
                if self.editor.can_undo() {
                    self.editor.undo();
                    writeln!(self.out, "undone")?;
                } else {
                    writeln!(self.out, "nothing to undo")?;
                }
            }
            Action::Redo => {
                if self.editor.can_redo() {
                    self.editor.redo();
                    writeln!(self.out, "redone")?;
                } else {
                    writeln!(self.out, "nothing to redo")?;
                }
            }
            Action::GenerateSql => {
                if self.editor.schema().is_empty() {
                    writeln!(self.out, "Please create at least one table")?;
                } else {
                    writeln!(self.out, "{}", sql::generate(self.editor.schema()))?;
                }
            }
            Action::ExportSchema => {
                let path = self.config.resolve_export_path();
                self.export_to(path)?;
            }
            Action::ShowDiagram => {
                let graph = RelationshipGraph::from_schema(self.editor.schema());
                write!(self.out, "{}", graph.to_dot())?;
            }
            Action::ShowShortcuts => {
                for binding in &BINDINGS {
                    writeln!(
                        self.out,
                        "{:<20} {}",
                        binding.chord.to_string(),
                        binding.action.description()
                    )?;
                }
            }
        }
        Ok(())
    }

    fn export_to(&mut self, path: PathBuf) -> Result<()> {
        io::write_file(&path, self.editor.schema(), self.config.pretty_export)?;
        writeln!(self.out, "exported to {}", path.display())?;
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        let schema = self.editor.schema();
        if schema.is_empty() {
            writeln!(self.out, "(no tables)")?;
        }
        for (i, table) in schema.tables.iter().enumerate() {
            let marker = if i == self.editor.selected_index() { '*' } else { ' ' };
            writeln!(self.out, "{marker} [{i}] {}", table.display_name(i))?;
            for (j, column) in table.columns.iter().enumerate() {
                let mut flags = Vec::new();
                if column.is_primary {
                    flags.push("PK");
                }
                if !column.is_nullable {
                    flags.push("NOT NULL");
                }
                let length = column
                    .length
                    .as_deref()
                    .filter(|l| !l.is_empty())
                    .map(|l| format!("({l})"))
                    .unwrap_or_default();
                writeln!(
                    self.out,
                    "      {j}: {} {}{length} {}",
                    column.name,
                    column.data_type,
                    flags.join(" ")
                )?;
            }
            for (j, fk) in table.foreign_keys.iter().enumerate() {
                writeln!(
                    self.out,
                    "      fk {j}: {} -> {}.{}",
                    fk.column_name, fk.reference_table, fk.reference_column
                )?;
            }
        }
        let state = self.editor.history().state();
        writeln!(
            self.out,
            "history: {} undo, {} redo",
            state.undo_depth(),
            state.redo_depth()
        )?;
        Ok(())
    }

    fn selected(&self) -> Result<usize> {
        self.editor
            .selected_table()
            .map(|_| self.editor.selected_index())
            .ok_or_else(|| querygen_core::EditError::NoTableSelected.into())
    }

    fn default_type(&self) -> DataType {
        self.config
            .default_column_type
            .parse()
            .unwrap_or_else(|e| {
                tracing::warn!("{e} in config, using VARCHAR");
                DataType::Varchar
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell() -> Shell<Vec<u8>> {
        Shell::new(SchemaEditor::default(), AppConfig::default(), Vec::new())
    }

    fn run(shell: &mut Shell<Vec<u8>>, script: &str) -> String {
        shell.out.clear();
        for line in script.lines() {
            shell.execute_line(line).unwrap();
        }
        String::from_utf8(shell.out.clone()).unwrap()
    }

    #[test]
    fn test_build_table_and_generate_sql() {
        let mut sh = shell();
        let out = run(
            &mut sh,
            "add-table users\n\
             add-column id --type uuid --primary --not-null\n\
             add-column email --length 255 --not-null\n\
             sql",
        );
        assert!(out.contains(
            "CREATE TABLE users (\n  \
             id UUID PRIMARY KEY DEFAULT gen_random_uuid() NOT NULL,\n  \
             email VARCHAR(255) NOT NULL\n);"
        ));
    }

    #[test]
    fn test_undo_redo_and_key_chords() {
        let mut sh = shell();
        run(&mut sh, "add-table a\nadd-table b");
        let out = run(&mut sh, "undo\nkey mod+z\nkey mod+z");
        assert_eq!(out, "undone\nundone\nnothing to undo\n");
        assert!(sh.editor().schema().is_empty());

        let out = run(&mut sh, "key ctrl+shift+z\nredo\nredo");
        assert_eq!(out, "redone\nredone\nnothing to redo\n");
        assert_eq!(sh.editor().schema().len(), 2);
    }

    #[test]
    fn test_rejected_edit_is_reported_not_fatal() {
        let mut sh = shell();
        let out = run(&mut sh, "add-column orphan");
        assert_eq!(out, "error: no table is selected\n");

        run(&mut sh, "add-table t");
        let out = run(&mut sh, "add-fk user_id users");
        assert!(out.contains("error"));
        assert_eq!(sh.editor().history().state().undo_depth(), 1);
    }

    #[test]
    fn test_set_column_fields() {
        let mut sh = shell();
        run(
            &mut sh,
            "add-table t\n\
             add-column c\n\
             set-column 0 type decimal\n\
             set-column 0 length 10,2\n\
             set-column 0 nullable no\n\
             set-column 0 name price",
        );
        let col = &sh.editor().schema().tables[0].columns[0];
        assert_eq!(col.name, "price");
        assert_eq!(col.data_type, DataType::Decimal);
        assert_eq!(col.length.as_deref(), Some("10,2"));
        assert!(!col.is_nullable);

        let out = run(&mut sh, "set-column 0 primary maybe");
        assert!(out.contains("expected true or false"));
    }

    #[test]
    fn test_default_column_type_from_config() {
        let config = AppConfig {
            default_column_type: "TEXT".to_string(),
            default_column_nullable: false,
            ..AppConfig::default()
        };
        let mut sh = Shell::new(SchemaEditor::default(), config, Vec::new());
        run(&mut sh, "add-table t\nadd-column body");
        let col = &sh.editor().schema().tables[0].columns[0];
        assert_eq!(col.data_type, DataType::Text);
        assert!(!col.is_nullable);
    }

    #[test]
    fn test_template_and_graph() {
        let mut sh = shell();
        let out = run(&mut sh, "template blog\ngraph");
        assert!(out.starts_with("applied template Blog System\n"));
        assert!(out.contains("digraph"));
        assert!(out.contains("user_id → id"));

        let out = run(&mut sh, "template crm");
        assert!(out.contains("unknown template 'crm' (available: blog, ecommerce)"));
    }

    #[test]
    fn test_export_and_import_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let mut sh = shell();
        run(&mut sh, "template ecommerce");
        let out = run(&mut sh, &format!("export {}", path.display()));
        assert!(out.starts_with("exported to"));

        let mut other = shell();
        let out = run(&mut other, &format!("import {}", path.display()));
        assert_eq!(out, "imported 2 table(s)\n");
        assert_eq!(other.editor().schema(), sh.editor().schema());
    }

    #[test]
    fn test_bad_import_keeps_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not json").unwrap();

        let mut sh = shell();
        run(&mut sh, "add-table t");
        let out = run(&mut sh, &format!("import {}", path.display()));
        assert!(out.starts_with("error: invalid schema file"));
        assert_eq!(sh.editor().history().state().undo_depth(), 1);
    }

    #[test]
    fn test_sql_on_empty_schema() {
        let mut sh = shell();
        let out = run(&mut sh, "key mod+s");
        assert_eq!(out, "Please create at least one table\n");
    }

    #[test]
    fn test_show_marks_selection() {
        let mut sh = shell();
        let out = run(&mut sh, "add-table\nadd-table b\nselect 0\nshow");
        assert!(out.contains("* [0] Table 1"));
        assert!(out.contains("  [1] b"));
        assert!(out.contains("history: 2 undo, 0 redo"));
    }

    #[test]
    fn test_shortcut_list() {
        let mut sh = shell();
        let out = run(&mut sh, "shortcuts");
        assert_eq!(out.lines().count(), BINDINGS.len());
        assert!(out.contains("Show Shortcuts"));
    }

    #[test]
    fn test_unknown_command_prints_usage() {
        let mut sh = shell();
        let out = run(&mut sh, "frobnicate");
        assert!(out.contains("frobnicate"));
    }

    #[test]
    fn test_run_stops_at_quit() {
        let mut sh = shell();
        let input = "add-table a\nquit\nadd-table b\n";
        sh.run(input.as_bytes(), false).unwrap();
        assert_eq!(sh.editor().schema().len(), 1);
    }

    #[test]
    fn test_quoted_arguments() {
        let mut sh = shell();
        run(
            &mut sh,
            "add-table t\n\
             add-column c --length 255\n\
             set-column 0 length \"\"\n\
             rename \"My Table\"\n\
             add-column 'created at' --type timestamp",
        );
        let table = sh.editor().selected_table().unwrap();
        assert_eq!(table.name, "My Table");
        assert_eq!(table.columns[0].length, None);
        assert_eq!(table.columns[1].name, "created at");

        let out = run(&mut sh, "sql");
        assert!(out.contains("  c VARCHAR,\n"));
    }

    #[test]
    fn test_unterminated_quote_is_reported() {
        let mut sh = shell();
        let out = run(&mut sh, "add-table \"users");
        assert!(out.starts_with("error: unterminated quote"));
        assert!(sh.editor().schema().is_empty());
    }

    #[test]
    fn test_comments_and_blank_lines_ignored() {
        let mut sh = shell();
        let out = run(&mut sh, "# a comment\n\n   \nshow");
        assert!(out.contains("(no tables)"));
    }
}

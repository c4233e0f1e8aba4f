// Integration tests for the editing surface.
//
// These walk the editor through realistic sessions (building tables,
// applying templates, importing files) and check that history, SQL output
// and the relationship graph stay consistent with each other.

use querygen_core::{
    io, sql, templates, Action, Column, ColumnEdit, DataType, ForeignKey, KeyChord,
    RelationshipGraph, Schema, SchemaEditor, Table,
};

fn build_blog_by_hand(ed: &mut SchemaEditor) {
    ed.add_table_named("users");
    ed.add_column(Column::new("id", DataType::Uuid).primary().not_null())
        .unwrap();
    ed.add_column(
        Column::new("email", DataType::Varchar)
            .with_length("255")
            .not_null(),
    )
    .unwrap();

    ed.add_table_named("posts");
    ed.add_column(Column::new("id", DataType::Uuid).primary().not_null())
        .unwrap();
    ed.add_column(Column::new("user_id", DataType::Uuid).not_null())
        .unwrap();
    ed.add_foreign_key(ForeignKey::new("user_id", "users", "id"))
        .unwrap();
}

// ── Empty Table List Walkthrough ───────────────────────────────────────

#[test]
fn test_two_tables_undo_redo_then_branch() {
    let t1 = Table::new("t1");
    let t2 = Table::new("t2");
    let t3 = Table::new("t3");

    let mut ed = SchemaEditor::default();
    ed.replace(Schema::new(vec![t1.clone()]));
    ed.replace(Schema::new(vec![t1.clone(), t2.clone()]));

    let state = ed.history().state();
    assert_eq!(
        state.past(),
        &[Schema::default(), Schema::new(vec![t1.clone()])]
    );
    assert!(ed.can_undo());
    assert!(!ed.can_redo());

    ed.undo();
    assert_eq!(ed.schema(), &Schema::new(vec![t1.clone()]));
    assert_eq!(ed.history().state().past(), &[Schema::default()]);
    assert_eq!(
        *ed.history().state().future(),
        vec![Schema::new(vec![t1.clone(), t2.clone()])]
    );
    let after_first_undo = ed.history().state().clone();

    ed.undo();
    assert!(ed.schema().is_empty());
    assert!(!ed.can_undo());
    assert_eq!(ed.history().state().redo_depth(), 2);

    ed.redo();
    assert_eq!(ed.history().state(), &after_first_undo);

    ed.replace(Schema::new(vec![t3]));
    assert!(ed.history().state().future().is_empty());
}

// ── Hand-built vs Template ─────────────────────────────────────────────

#[test]
fn test_hand_built_schema_generates_expected_sql() {
    let mut ed = SchemaEditor::default();
    build_blog_by_hand(&mut ed);

    let sql = sql::generate(ed.schema());
    assert_eq!(
        sql,
        "CREATE TABLE users (\n  \
         id UUID PRIMARY KEY DEFAULT gen_random_uuid() NOT NULL,\n  \
         email VARCHAR(255) NOT NULL\n);\n\n\
         CREATE TABLE posts (\n  \
         id UUID PRIMARY KEY DEFAULT gen_random_uuid() NOT NULL,\n  \
         user_id UUID NOT NULL,\n  \
         FOREIGN KEY (user_id) REFERENCES users(id)\n);"
    );
}

#[test]
fn test_undo_all_hand_edits_returns_to_empty() {
    let mut ed = SchemaEditor::default();
    build_blog_by_hand(&mut ed);
    let steps = ed.history().state().undo_depth();
    assert_eq!(steps, 7);

    let mut undone = 0;
    while ed.undo() {
        undone += 1;
    }
    assert_eq!(undone, steps);
    assert!(ed.schema().is_empty());
    assert_eq!(sql::generate(ed.schema()), "");

    while ed.redo() {}
    assert_eq!(ed.schema().len(), 2);
    assert_eq!(ed.schema().tables[1].foreign_keys.len(), 1);
}

#[test]
fn test_template_then_edit_then_undo_to_template() {
    let mut ed = SchemaEditor::default();
    let blog = templates::find("blog").unwrap();
    ed.apply_template(&blog);
    ed.select_table(1).unwrap();
    ed.update_column(1, ColumnEdit::Name("headline".into()))
        .unwrap();
    assert!(sql::generate(ed.schema()).contains("headline VARCHAR(255)"));

    ed.undo();
    assert_eq!(ed.schema(), &blog.schema);
}

// ── Import / Export ────────────────────────────────────────────────────

#[test]
fn test_export_file_import_into_new_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schema.json");

    let mut ed = SchemaEditor::default();
    build_blog_by_hand(&mut ed);
    io::write_file(&path, ed.schema(), true).unwrap();

    let mut fresh = SchemaEditor::default();
    let schema = io::read_file(&path).unwrap();
    fresh.replace(schema);
    assert_eq!(fresh.schema(), ed.schema());
    assert_eq!(fresh.history().state().undo_depth(), 1);
}

#[test]
fn test_bad_import_file_keeps_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "[{\"name\": 42}]").unwrap();

    let mut ed = SchemaEditor::default();
    build_blog_by_hand(&mut ed);
    let before = ed.history().state().clone();

    assert!(io::read_file(&path).is_err());
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(ed.import_json(&text).is_err());
    assert_eq!(ed.history().state(), &before);
}

// ── Graph ──────────────────────────────────────────────────────────────

#[test]
fn test_graph_follows_history() {
    let mut ed = SchemaEditor::default();
    build_blog_by_hand(&mut ed);
    let graph = RelationshipGraph::from_schema(ed.schema());
    assert_eq!(graph.relation_count(), 1);

    ed.undo();
    let graph = RelationshipGraph::from_schema(ed.schema());
    assert_eq!(graph.table_count(), 2);
    assert_eq!(graph.relation_count(), 0);
}

// ── Shortcuts ──────────────────────────────────────────────────────────

#[test]
fn test_shortcut_chords_drive_history() {
    let mut ed = SchemaEditor::default();
    ed.add_table_named("a");

    let undo: KeyChord = "mod+z".parse().unwrap();
    let redo: KeyChord = "mod+shift+z".parse().unwrap();
    assert_eq!(Action::for_chord(&undo), Some(Action::Undo));
    assert_eq!(Action::for_chord(&redo), Some(Action::Redo));

    assert!(ed.undo());
    assert!(ed.schema().is_empty());
    assert!(ed.redo());
    assert_eq!(ed.schema().tables[0].name, "a");
}

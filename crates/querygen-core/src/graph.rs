//! Relationship graph of a schema.
//!
//! Tables become nodes laid out on a diagonal; foreign keys become directed
//! edges from the owning table to the referenced table.

use std::collections::HashMap;
use std::fmt;

use petgraph::dot::Dot;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::schema::{DataType, Schema};

/// Horizontal distance between consecutive tables in the default layout.
const NODE_SPACING_X: f64 = 300.0;
/// Vertical distance between consecutive tables in the default layout.
const NODE_SPACING_Y: f64 = 100.0;

/// Column summary shown inside a table node.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLabel {
    pub name: String,
    pub data_type: DataType,
    pub is_primary: bool,
}

/// A table in the diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct TableNode {
    pub name: String,
    pub columns: Vec<ColumnLabel>,
    /// Canvas position (x, y).
    pub position: (f64, f64),
}

impl fmt::Display for TableNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A foreign key in the diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationEdge {
    pub column: String,
    pub reference_column: String,
}

impl fmt::Display for RelationEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.column, self.reference_column)
    }
}

/// Directed graph of tables and the foreign keys between them.
#[derive(Debug, Clone)]
pub struct RelationshipGraph {
    graph: DiGraph<TableNode, RelationEdge>,
}

impl RelationshipGraph {
    /// Builds the graph for a schema snapshot.
    ///
    /// Foreign keys that point at a table not present in the schema are
    /// left out. When two tables share a name, edges attach to the first.
    pub fn from_schema(schema: &Schema) -> Self {
        let mut graph = DiGraph::new();
        let mut by_name: HashMap<&str, NodeIndex> = HashMap::new();

        for (i, table) in schema.tables.iter().enumerate() {
            let node = graph.add_node(TableNode {
                name: table.name.clone(),
                columns: table
                    .columns
                    .iter()
                    .map(|c| ColumnLabel {
                        name: c.name.clone(),
                        data_type: c.data_type,
                        is_primary: c.is_primary,
                    })
                    .collect(),
                position: (i as f64 * NODE_SPACING_X, i as f64 * NODE_SPACING_Y),
            });
            by_name.entry(table.name.as_str()).or_insert(node);
        }

        for table in &schema.tables {
            let source = by_name[table.name.as_str()];
            for fk in &table.foreign_keys {
                let Some(&target) = by_name.get(fk.reference_table.as_str()) else {
                    tracing::debug!(
                        table = %table.name,
                        reference = %fk.reference_table,
                        "skipping foreign key to unknown table"
                    );
                    continue;
                };
                graph.add_edge(
                    source,
                    target,
                    RelationEdge {
                        column: fk.column_name.clone(),
                        reference_column: fk.reference_column.clone(),
                    },
                );
            }
        }

        Self { graph }
    }

    pub fn table_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn relation_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Tables in schema order.
    pub fn tables(&self) -> impl Iterator<Item = &TableNode> {
        self.graph.node_weights()
    }

    /// `(from, to, edge)` triples for every relation.
    pub fn relations(&self) -> impl Iterator<Item = (&str, &str, &RelationEdge)> {
        self.graph.edge_indices().filter_map(move |e| {
            let (from, to) = self.graph.edge_endpoints(e)?;
            Some((
                self.graph[from].name.as_str(),
                self.graph[to].name.as_str(),
                &self.graph[e],
            ))
        })
    }

    /// Names of tables that reference `name`.
    pub fn referenced_by(&self, name: &str) -> Vec<&str> {
        let Some(node) = self.graph.node_indices().find(|&n| self.graph[n].name == name) else {
            return Vec::new();
        };
        self.graph
            .neighbors_directed(node, Direction::Incoming)
            .map(|n| self.graph[n].name.as_str())
            .collect()
    }

    /// Renders the graph in Graphviz DOT format.
    pub fn to_dot(&self) -> String {
        Dot::new(&self.graph).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, ForeignKey, Table};
    use crate::templates;

    #[test]
    fn test_blog_template_graph() {
        let blog = templates::find("blog").unwrap();
        let graph = RelationshipGraph::from_schema(&blog.schema);
        assert_eq!(graph.table_count(), 2);
        assert_eq!(graph.relation_count(), 1);

        let (from, to, edge) = graph.relations().next().unwrap();
        assert_eq!((from, to), ("posts", "users"));
        assert_eq!(edge.to_string(), "user_id → id");
        assert_eq!(graph.referenced_by("users"), vec!["posts"]);
    }

    #[test]
    fn test_layout_positions_follow_index() {
        let schema = Schema::new(vec![Table::new("a"), Table::new("b"), Table::new("c")]);
        let graph = RelationshipGraph::from_schema(&schema);
        let positions: Vec<_> = graph.tables().map(|t| t.position).collect();
        assert_eq!(positions, vec![(0.0, 0.0), (300.0, 100.0), (600.0, 200.0)]);
    }

    #[test]
    fn test_dangling_foreign_key_skipped() {
        let schema = Schema::new(vec![Table::new("orders")
            .with_column(Column::new("customer_id", DataType::Int))
            .with_foreign_key(ForeignKey::new("customer_id", "customers", "id"))]);
        let graph = RelationshipGraph::from_schema(&schema);
        assert_eq!(graph.table_count(), 1);
        assert_eq!(graph.relation_count(), 0);
    }

    #[test]
    fn test_self_reference() {
        let schema = Schema::new(vec![Table::new("employees")
            .with_column(Column::new("manager_id", DataType::Int))
            .with_foreign_key(ForeignKey::new("manager_id", "employees", "id"))]);
        let graph = RelationshipGraph::from_schema(&schema);
        assert_eq!(graph.relation_count(), 1);
        assert_eq!(graph.referenced_by("employees"), vec!["employees"]);
    }

    #[test]
    fn test_columns_carry_primary_flag() {
        let blog = templates::find("blog").unwrap();
        let graph = RelationshipGraph::from_schema(&blog.schema);
        let users = graph.tables().next().unwrap();
        assert!(users.columns[0].is_primary);
        assert!(!users.columns[1].is_primary);
    }

    #[test]
    fn test_dot_output() {
        let blog = templates::find("blog").unwrap();
        let dot = RelationshipGraph::from_schema(&blog.schema).to_dot();
        assert!(dot.starts_with("digraph {"));
        assert!(dot.contains("users"));
        assert!(dot.contains("user_id → id"));
    }
}

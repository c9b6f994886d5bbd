use crate::{ColumnDescriptor, Schema, SchemaNode};

/// Trait for schema introspection
///
/// This trait provides methods for examining and querying schemas
/// without modifying them.
pub trait SchemaInspector {
    /// Get the total number of nodes (groups and leaves, root excluded)
    fn field_count(&self) -> usize;

    /// Position of a leaf column, looked up by dotted path (e.g. "address.city")
    fn column_index(&self, path: &str) -> Option<usize>;

    /// Get a leaf column by dotted path
    fn column_by_path(&self, path: &str) -> Option<&ColumnDescriptor>;

    /// Check if schema contains a specific leaf column
    fn has_column(&self, path: &str) -> bool;

    /// Get all leaf column paths in schema order
    fn all_column_paths(&self) -> Vec<String>;
}

impl SchemaInspector for Schema {
    fn field_count(&self) -> usize {
        self.roots().iter().map(count_nodes).sum()
    }

    fn column_index(&self, path: &str) -> Option<usize> {
        let parts: Vec<&str> = path.split('.').collect();
        self.columns().iter().position(|column| {
            column.path().len() == parts.len()
                && column
                    .path()
                    .iter()
                    .zip(&parts)
                    .all(|(segment, part)| segment.name == *part)
        })
    }

    fn column_by_path(&self, path: &str) -> Option<&ColumnDescriptor> {
        self.column_index(path).and_then(|index| self.column(index))
    }

    fn has_column(&self, path: &str) -> bool {
        self.column_index(path).is_some()
    }

    fn all_column_paths(&self) -> Vec<String> {
        self.columns().iter().map(ColumnDescriptor::name).collect()
    }
}

fn count_nodes(node: &SchemaNode) -> usize {
    match node {
        SchemaNode::Group { children, .. } => 1 + children.iter().map(count_nodes).sum::<usize>(),
        SchemaNode::Leaf { .. } => 1,
    }
}

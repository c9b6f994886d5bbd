use crate::{ParquetError, Result};
use std::collections::HashSet;

/// Physical leaf types supported by the encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Boolean,
    Int32,
    Int64,
    UInt32,
    UInt64,
    Float32,
    Float64,
    String,
}

/// Represents how values are repeated in Parquet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Repetition {
    /// Field must have exactly one value
    Required,
    /// Field can have 0 or 1 value
    Optional,
    /// Field can have 0 or more values
    Repeated,
}

/// One step of a column's path from the record root down to the leaf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    pub name: String,
    pub repetition: Repetition,
}

impl PathSegment {
    pub fn new<S: Into<String>>(name: S, repetition: Repetition) -> Self {
        Self {
            name: name.into(),
            repetition,
        }
    }

    pub fn required<S: Into<String>>(name: S) -> Self {
        Self::new(name, Repetition::Required)
    }

    pub fn optional<S: Into<String>>(name: S) -> Self {
        Self::new(name, Repetition::Optional)
    }

    pub fn repeated<S: Into<String>>(name: S) -> Self {
        Self::new(name, Repetition::Repeated)
    }
}

/// Describes a leaf column: its full path and physical type.
///
/// The last path segment is the leaf itself, the others are the groups that
/// enclose it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    path: Vec<PathSegment>,
    primitive_type: PrimitiveType,
    max_def_level: u16,
    max_rep_level: u16,
}

impl ColumnDescriptor {
    pub fn new(path: Vec<PathSegment>, primitive_type: PrimitiveType) -> Result<Self> {
        if path.is_empty() {
            return Err(ParquetError::schema("column path must not be empty"));
        }
        if let Some(segment) = path.iter().find(|s| s.name.is_empty() || s.name.contains('.')) {
            return Err(ParquetError::schema(format!(
                "invalid path segment name '{}'",
                segment.name
            )));
        }

        let max_def_level = path
            .iter()
            .filter(|s| s.repetition != Repetition::Required)
            .count() as u16;
        let max_rep_level = path
            .iter()
            .filter(|s| s.repetition == Repetition::Repeated)
            .count() as u16;

        Ok(Self {
            path,
            primitive_type,
            max_def_level,
            max_rep_level,
        })
    }

    /// Dotted column name, e.g. `links.forward`
    pub fn name(&self) -> String {
        self.path_in_schema().join(".")
    }

    /// Name of the leaf segment
    pub fn leaf_name(&self) -> &str {
        &self.leaf().name
    }

    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    pub fn path_in_schema(&self) -> Vec<String> {
        self.path.iter().map(|s| s.name.clone()).collect()
    }

    pub fn leaf(&self) -> &PathSegment {
        &self.path[self.path.len() - 1]
    }

    pub fn repetition(&self) -> Repetition {
        self.leaf().repetition
    }

    pub fn primitive_type(&self) -> PrimitiveType {
        self.primitive_type
    }

    pub fn max_def_level(&self) -> u16 {
        self.max_def_level
    }

    pub fn max_rep_level(&self) -> u16 {
        self.max_rep_level
    }

    /// Repetition kinds of the optional and repeated steps, root first
    pub fn nullable_steps(&self) -> Vec<Repetition> {
        self.path
            .iter()
            .map(|s| s.repetition)
            .filter(|r| *r != Repetition::Required)
            .collect()
    }
}

/// Group structure derived from the column paths, used to emit the footer
/// schema depth-first.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Group {
        name: String,
        repetition: Repetition,
        children: Vec<SchemaNode>,
    },
    Leaf {
        column: usize,
    },
}

/// Core schema representation: the ordered list of leaf columns
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    name: String,
    columns: Vec<ColumnDescriptor>,
    tree: Vec<SchemaNode>,
}

impl Schema {
    pub const DEFAULT_ROOT_NAME: &'static str = "root";

    pub fn new(columns: Vec<ColumnDescriptor>) -> Result<Self> {
        SchemaBuilder::new().with_columns(columns).build()
    }

    /// Name of the root group written to the footer
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&ColumnDescriptor> {
        self.columns.get(index)
    }

    /// Top-level nodes below the root group
    pub fn roots(&self) -> &[SchemaNode] {
        &self.tree
    }
}

/// Builder for creating schemas
pub struct SchemaBuilder {
    name: String,
    columns: Vec<ColumnDescriptor>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self {
            name: Schema::DEFAULT_ROOT_NAME.to_string(),
            columns: Vec::new(),
        }
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_column(mut self, column: ColumnDescriptor) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_columns(mut self, columns: impl IntoIterator<Item = ColumnDescriptor>) -> Self {
        self.columns.extend(columns);
        self
    }

    pub fn build(self) -> Result<Schema> {
        if self.columns.is_empty() {
            return Err(ParquetError::schema("schema must contain at least one column"));
        }

        let mut tree = Vec::new();
        for (index, column) in self.columns.iter().enumerate() {
            insert_column(&mut tree, column.path(), index, &column.name())?;
        }
        check_unique_names(&tree, &self.columns, "")?;

        Ok(Schema {
            name: self.name,
            columns: self.columns,
            tree,
        })
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// Columns sharing a group must be declared next to each other, so a group is
// only ever merged with the most recently added sibling. This keeps the
// depth-first leaf order identical to the declaration order.
fn insert_column(
    siblings: &mut Vec<SchemaNode>,
    path: &[PathSegment],
    index: usize,
    column_name: &str,
) -> Result<()> {
    let (segment, rest) = match path.split_first() {
        Some(split) => split,
        None => return Err(ParquetError::internal("empty column path")),
    };

    if rest.is_empty() {
        siblings.push(SchemaNode::Leaf { column: index });
        return Ok(());
    }

    if let Some(SchemaNode::Group {
        name,
        repetition,
        children,
    }) = siblings.last_mut()
    {
        if *name == segment.name {
            if *repetition != segment.repetition {
                return Err(ParquetError::schema(format!(
                    "group '{}' declared as both {:?} and {:?} (column '{}')",
                    name, repetition, segment.repetition, column_name
                )));
            }
            return insert_column(children, rest, index, column_name);
        }
    }

    let mut children = Vec::new();
    insert_column(&mut children, rest, index, column_name)?;
    siblings.push(SchemaNode::Group {
        name: segment.name.clone(),
        repetition: segment.repetition,
        children,
    });
    Ok(())
}

// Sibling names must be unique. A repeated name at this point means either a
// duplicate column or a group whose members were split by another column.
fn check_unique_names(nodes: &[SchemaNode], columns: &[ColumnDescriptor], prefix: &str) -> Result<()> {
    let mut seen = HashSet::new();
    for node in nodes {
        let name = match node {
            SchemaNode::Group { name, .. } => name.as_str(),
            SchemaNode::Leaf { column } => columns[*column].leaf_name(),
        };
        let full = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", prefix, name)
        };
        if !seen.insert(name) {
            return Err(ParquetError::schema(format!(
                "'{}' is declared more than once or its group members are not contiguous",
                full
            )));
        }
        if let SchemaNode::Group { children, .. } = node {
            check_unique_names(children, columns, &full)?;
        }
    }
    Ok(())
}

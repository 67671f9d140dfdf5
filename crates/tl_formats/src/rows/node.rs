use core::any::TypeId;
use std::io;

use fixedbitset::FixedBitSet;
use tl_map::metadata::Metadata;
use tl_map::shape::{Classification, TypeShape};
use tl_map::{Configure, Error, Node, NodeIter, NodeType, Options, Result, Value};

use super::dialect::{Dialect, format_error};

fn sequence_error(path: &str) -> Error {
    Error::Format(format!("`{path}` is a sequence, rows only hold flat records"))
}

fn write_line<'f>(out: &mut dyn io::Write, cells: impl IntoIterator<Item = &'f str>) -> Result<()> {
    let mut writer = Dialect::default().writer(out);
    writer.write_record(cells).map_err(format_error)?;
    writer.flush().map_err(format_error)
}

// -----------------------------------------------------------------------------
// RowNode

#[derive(Debug, Clone)]
enum Content {
    Cell(String),
    Section(Vec<RowNode>),
}

/// One record read from delimited text, regrouped into nested sections.
///
/// Cells are value nodes, sections are object nodes named after the member
/// whose columns they gathered.
#[derive(Debug, Clone)]
pub struct RowNode {
    name: Option<String>,
    path: String,
    content: Content,
    metadata: Metadata,
}

impl RowNode {
    fn cell(name: &str, path: String, text: &str) -> Self {
        Self {
            name: Some(name.to_owned()),
            path,
            content: Content::Cell(text.to_owned()),
            metadata: Metadata::new(),
        }
    }

    fn section(name: Option<&str>, path: String, children: Vec<RowNode>) -> Self {
        Self {
            name: name.map(str::to_owned),
            path,
            content: Content::Section(children),
            metadata: Metadata::new(),
        }
    }

    fn leaves<'s>(&'s self, out: &mut Vec<&'s str>) {
        match &self.content {
            Content::Cell(text) => out.push(text),
            Content::Section(children) => children.iter().for_each(|child| child.leaves(out)),
        }
    }
}

impl Node for RowNode {
    fn node_type(&self) -> NodeType {
        match self.content {
            Content::Cell(_) => NodeType::Value,
            Content::Section(_) => NodeType::Object,
        }
    }

    fn format(&self) -> &str {
        "rows"
    }

    fn path(&self) -> String {
        self.path.clone()
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn is_named(&self) -> bool {
        self.name.is_some()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn get_value(&self) -> Result<Value> {
        match &self.content {
            Content::Cell(text) => Ok(Value::from(text.as_str())),
            Content::Section(_) => Ok(Value::Null),
        }
    }

    fn set_value(&mut self, _: Value) -> Result<()> {
        Err(Error::ReadOnly {
            path: self.path.clone(),
        })
    }

    fn child_nodes(&self) -> Result<NodeIter<'_>> {
        match &self.content {
            Content::Cell(_) => Ok(Box::new(core::iter::empty())),
            Content::Section(children) => Ok(Box::new(
                children
                    .iter()
                    .map(|child| Ok(Box::new(child.clone()) as Box<dyn Node + '_>)),
            )),
        }
    }

    fn add_node(&mut self, _: &dyn Node, _: &mut Configure<'_>) -> Result<()> {
        Err(Error::ReadOnly {
            path: self.path.clone(),
        })
    }

    fn encode(&self, out: &mut dyn io::Write) -> Result<()> {
        let mut cells = Vec::new();
        self.leaves(&mut cells);
        write_line(out, cells)
    }
}

// -----------------------------------------------------------------------------
// Regrouping

/// Columns of one record, consumed while the target type is walked.
struct Record<'r> {
    header: &'r [String],
    cells: &'r [String],
    used: FixedBitSet,
    options: &'r Options,
    row: usize,
}

impl Record<'_> {
    fn column(&self, name: &str) -> Option<usize> {
        let case_sensitive = self.options.case_sensitive_names();
        (0..self.header.len()).find(|&index| {
            let column = &self.header[index];
            !self.used.contains(index)
                && if case_sensitive {
                    column == name
                } else {
                    column.eq_ignore_ascii_case(name)
                }
        })
    }

    fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map_or("", String::as_str)
    }

    /// Gathers the columns of the members of `shape`, all prefixed with
    /// `prefix`. Empty cells count as absent.
    fn gather(
        &mut self,
        shape: &TypeShape,
        prefix: &str,
        path: &str,
        stack: &mut Vec<TypeId>,
    ) -> Vec<RowNode> {
        let type_id = shape.inner_info().ty_id();
        if stack.contains(&type_id) {
            log::debug!("`{path}` nests its own type, not expanding it");
            return Vec::new();
        }
        stack.push(type_id);

        let mut nodes = Vec::new();
        for member in shape.members() {
            if !member.is_readable() {
                continue;
            }
            let name = member.external_name();
            let column = format!("{prefix}{name}");
            let member_path = format!("{path}.{name}");
            let member_shape = self.options.shapes().get(member.type_info());

            match member_shape.classification() {
                Classification::Simple => {
                    let Some(index) = self.column(&column) else {
                        continue;
                    };
                    self.used.insert(index);
                    let text = self.cell(index);
                    if !text.is_empty() {
                        nodes.push(RowNode::cell(name, member_path, text));
                    }
                }
                Classification::Complex => {
                    let children = self.gather(&member_shape, &column, &member_path, stack);
                    if !children.is_empty() {
                        nodes.push(RowNode::section(Some(name), member_path, children));
                    }
                }
                Classification::Enumerable | Classification::Dictionary => {
                    log::debug!("`{member_path}` is a container, rows cannot hold it");
                }
            }
        }

        stack.pop();
        nodes
    }

    /// Columns no member claimed, as extra leaves of the record.
    fn leftovers(&self) -> Vec<RowNode> {
        (0..self.header.len())
            .filter(|&index| !self.used.contains(index) && !self.cell(index).is_empty())
            .map(|index| {
                let name = &self.header[index];
                RowNode::cell(name, format!("[{}].{name}", self.row), self.cell(index))
            })
            .collect()
    }
}

/// Regroups the flat cells of one record into sections following `shape`.
pub(super) fn regroup(
    header: &[String],
    cells: &[String],
    row: usize,
    shape: &TypeShape,
    options: &Options,
) -> RowNode {
    let mut record = Record {
        header,
        cells,
        used: FixedBitSet::with_capacity(header.len()),
        options,
        row,
    };
    let path = format!("[{row}]");
    let mut children = record.gather(shape, "", &path, &mut Vec::new());
    children.extend(record.leftovers());
    RowNode::section(None, path, children)
}

// -----------------------------------------------------------------------------
// RowTarget

/// Flattens one record into `(column, cell)` pairs.
///
/// Children are prefixed with the name of every enclosing member, so
/// `Child.Name` lands in column `ChildName`.
#[derive(Debug)]
pub struct RowTarget {
    name: Option<String>,
    column: String,
    path: String,
    node_type: NodeType,
    cells: Vec<(String, String)>,
    metadata: Metadata,
}

impl RowTarget {
    /// The root of record number `row`.
    pub fn new(row: usize) -> Self {
        Self {
            name: None,
            column: String::new(),
            path: format!("[{row}]"),
            node_type: NodeType::Variable,
            cells: Vec::new(),
            metadata: Metadata::new(),
        }
    }

    #[inline]
    pub fn cells(&self) -> &[(String, String)] {
        &self.cells
    }

    #[inline]
    pub fn into_cells(self) -> Vec<(String, String)> {
        self.cells
    }
}

impl Node for RowTarget {
    fn node_type(&self) -> NodeType {
        self.node_type
    }

    fn set_node_type(&mut self, node_type: NodeType) -> Result<()> {
        if node_type == NodeType::Array {
            return Err(sequence_error(&self.path));
        }
        self.node_type = node_type;
        Ok(())
    }

    fn format(&self) -> &str {
        "rows"
    }

    fn path(&self) -> String {
        self.path.clone()
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn is_named(&self) -> bool {
        self.name.is_some()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn get_value(&self) -> Result<Value> {
        Ok(self
            .cells
            .first()
            .map_or(Value::Null, |(_, text)| Value::from(text.as_str())))
    }

    fn set_value(&mut self, value: Value) -> Result<()> {
        self.cells = vec![(self.column.clone(), value.to_string())];
        self.node_type = NodeType::Value;
        Ok(())
    }

    fn child_nodes(&self) -> Result<NodeIter<'_>> {
        let path = self.path.as_str();
        Ok(Box::new(self.cells.iter().map(move |(column, text)| {
            let path = format!("{path}.{column}");
            Ok(Box::new(RowNode::cell(column, path, text)) as Box<dyn Node + '_>)
        })))
    }

    fn add_node(&mut self, source: &dyn Node, configure: &mut Configure<'_>) -> Result<()> {
        let Some(name) = source.name() else {
            return Err(sequence_error(&self.path));
        };
        if self.node_type == NodeType::Variable {
            self.node_type = NodeType::Object;
        }

        let mut child = RowTarget {
            name: Some(name.to_owned()),
            column: format!("{}{name}", self.column),
            path: format!("{}.{name}", self.path),
            node_type: NodeType::Variable,
            cells: Vec::new(),
            metadata: source.metadata().clone(),
        };
        configure(&mut child)?;
        self.cells.append(&mut child.cells);
        Ok(())
    }

    fn encode(&self, out: &mut dyn io::Write) -> Result<()> {
        write_line(out, self.cells.iter().map(|(_, text)| text.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use tl_map::{Node, NodeType, Options};
    use tl_reflect::derive::Reflect;

    use super::regroup;

    #[derive(Reflect, Default, Debug, PartialEq)]
    #[reflect(default)]
    struct Inner {
        name: String,
    }

    #[derive(Reflect, Default, Debug, PartialEq)]
    #[reflect(default)]
    struct Outer {
        id: u32,
        child: Inner,
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn columns_regroup_into_sections() {
        let options = Options::default();
        let shape = options.shapes().get_type::<Outer>();
        let header = strings(&["childname", "id", "extra"]);
        let cells = strings(&["X", "1", "?"]);

        let root = regroup(&header, &cells, 4, &shape, &options);
        assert_eq!(root.node_type(), NodeType::Object);
        assert_eq!(root.path(), "[4]");

        let children: Vec<_> = root.children().unwrap().map(Result::unwrap).collect();
        let names: Vec<_> = children.iter().map(|c| c.name().unwrap().to_owned()).collect();
        assert_eq!(names, ["id", "child", "extra"]);
        assert_eq!(children[1].path(), "[4].child");

        let name = children[1].children().unwrap().next().unwrap().unwrap();
        assert_eq!(name.path(), "[4].child.name");
        assert_eq!(name.value().unwrap().to_string(), "X");
    }

    #[test]
    fn empty_sections_are_absent() {
        let options = Options::builder().case_sensitive_names(false).build();
        let shape = options.shapes().get_type::<Outer>();
        let header = strings(&["ID", "CHILDNAME"]);
        let cells = strings(&["2", ""]);

        let root = regroup(&header, &cells, 0, &shape, &options);
        let children: Vec<_> = root.children().unwrap().map(Result::unwrap).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].value().unwrap().to_string(), "2");
    }
}

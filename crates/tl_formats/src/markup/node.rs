use std::io;

use tl_map::metadata::{AsAttribute, Metadata};
use tl_map::{Configure, Error, Node, NodeIter, NodeType, Result, Value};

use super::Element;

/// Name given to children added from unnamed source nodes.
const ITEM: &str = "Item";

fn write_text(out: &mut dyn io::Write, text: &str) -> Result<()> {
    out.write_all(text.as_bytes())
        .map_err(|err| Error::Format(err.to_string()))
}

/// Attributes first, then child elements.
fn element_children<'e>(element: &'e Element, path: &'e str) -> NodeIter<'e> {
    let attributes = element.attributes.iter().map(move |(name, value)| MarkupSource {
        backing: Backing::Attribute {
            name: name.as_str(),
            value: value.as_str(),
        },
        path: format!("{path}/@{name}"),
        metadata: Metadata::new().with(AsAttribute),
    });
    let elements = element.children.iter().map(move |child| MarkupSource {
        backing: Backing::Element(child),
        path: format!("{path}/{}", child.name),
        metadata: Metadata::new(),
    });

    Box::new(
        attributes
            .chain(elements)
            .map(|child| Ok(Box::new(child) as Box<dyn Node + 'e>)),
    )
}

// -----------------------------------------------------------------------------
// MarkupSource

#[derive(Debug, Clone, Copy)]
enum Backing<'a> {
    Element(&'a Element),
    Attribute { name: &'a str, value: &'a str },
}

/// A read-only view of an [`Element`] tree.
///
/// Elements are [`Variable`](NodeType::Variable): whether `<Age>67</Age>`
/// is a value or an empty object depends on what it is mapped onto.
/// Attributes are value nodes tagged [`AsAttribute`] and come before the
/// child elements.
#[derive(Debug)]
pub struct MarkupSource<'a> {
    backing: Backing<'a>,
    path: String,
    metadata: Metadata,
}

impl<'a> MarkupSource<'a> {
    pub fn new(element: &'a Element) -> Self {
        Self {
            backing: Backing::Element(element),
            path: format!("/{}", element.name),
            metadata: Metadata::new(),
        }
    }

    fn read_only(&self) -> Error {
        Error::ReadOnly {
            path: self.path.clone(),
        }
    }
}

impl Node for MarkupSource<'_> {
    fn node_type(&self) -> NodeType {
        match self.backing {
            Backing::Element(_) => NodeType::Variable,
            Backing::Attribute { .. } => NodeType::Value,
        }
    }

    fn format(&self) -> &str {
        "markup"
    }

    fn path(&self) -> String {
        self.path.clone()
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn is_named(&self) -> bool {
        true
    }

    fn name(&self) -> Option<&str> {
        match self.backing {
            Backing::Element(element) => Some(&element.name),
            Backing::Attribute { name, .. } => Some(name),
        }
    }

    fn get_value(&self) -> Result<Value> {
        Ok(match self.backing {
            Backing::Element(element) => Value::from(element.text.as_deref().unwrap_or_default()),
            Backing::Attribute { value, .. } => Value::from(value),
        })
    }

    fn set_value(&mut self, _: Value) -> Result<()> {
        Err(self.read_only())
    }

    fn child_nodes(&self) -> Result<NodeIter<'_>> {
        match self.backing {
            Backing::Element(element) => Ok(element_children(element, &self.path)),
            Backing::Attribute { .. } => Ok(Box::new(core::iter::empty())),
        }
    }

    fn add_node(&mut self, _: &dyn Node, _: &mut Configure<'_>) -> Result<()> {
        Err(self.read_only())
    }

    fn encode(&self, out: &mut dyn io::Write) -> Result<()> {
        match self.backing {
            Backing::Element(element) => write_text(out, &element.to_string()),
            Backing::Attribute { value, .. } => write_text(out, value),
        }
    }
}

// -----------------------------------------------------------------------------
// MarkupTarget

/// Builds an [`Element`] tree.
///
/// Children whose source carries [`AsAttribute`] and that end up holding a
/// value become attributes, everything else becomes a child element.
#[derive(Debug)]
pub struct MarkupTarget {
    element: Element,
    node_type: NodeType,
    path: String,
    metadata: Metadata,
}

impl MarkupTarget {
    /// An empty root element called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: format!("/{name}"),
            element: Element::new(name),
            node_type: NodeType::Variable,
            metadata: Metadata::new(),
        }
    }

    #[inline]
    pub fn into_element(self) -> Element {
        self.element
    }
}

impl Node for MarkupTarget {
    fn node_type(&self) -> NodeType {
        self.node_type
    }

    fn set_node_type(&mut self, node_type: NodeType) -> Result<()> {
        self.node_type = node_type;
        Ok(())
    }

    fn format(&self) -> &str {
        "markup"
    }

    fn path(&self) -> String {
        self.path.clone()
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn is_named(&self) -> bool {
        true
    }

    fn name(&self) -> Option<&str> {
        Some(&self.element.name)
    }

    fn set_name(&mut self, name: &str) -> Result<()> {
        name.clone_into(&mut self.element.name);
        Ok(())
    }

    fn get_value(&self) -> Result<Value> {
        Ok(Value::from(self.element.text.clone()))
    }

    fn set_value(&mut self, value: Value) -> Result<()> {
        self.element.text = match value {
            Value::Null => None,
            value => Some(value.to_string()),
        };
        self.node_type = NodeType::Value;
        Ok(())
    }

    fn child_nodes(&self) -> Result<NodeIter<'_>> {
        Ok(element_children(&self.element, &self.path))
    }

    fn add_node(&mut self, source: &dyn Node, configure: &mut Configure<'_>) -> Result<()> {
        if self.node_type == NodeType::Variable {
            self.node_type = if source.is_named() {
                NodeType::Object
            } else {
                NodeType::Array
            };
        }

        let name = source.name().unwrap_or(ITEM);
        let mut child = MarkupTarget {
            path: format!("{}/{name}", self.path),
            element: Element::new(name),
            node_type: NodeType::Variable,
            metadata: source.metadata().clone(),
        };
        configure(&mut child)?;

        let attribute = child.node_type == NodeType::Value
            && child.metadata.contains::<AsAttribute>()
            && child.element.children.is_empty();
        if !attribute {
            self.element.children.push(child.element);
        } else if let Some(text) = child.element.text {
            self.element.attributes.push((child.element.name, text));
        }
        Ok(())
    }

    fn encode(&self, out: &mut dyn io::Write) -> Result<()> {
        write_text(out, &self.element.to_string())
    }
}

use core::fmt;
use std::io;

use tl_reflect::Reflect;

use crate::Value;
use crate::error::{Error, Result};
use crate::metadata::Metadata;
use crate::shape::TypeShape;

// -----------------------------------------------------------------------------
// NodeType

/// The structural kind of a [`Node`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// A leaf holding a [`Value`]. Never has children.
    Value,
    /// Named children.
    Object,
    /// Ordered children, names optional.
    Array,
    /// Not decided yet. Behaves as a value or a container on demand.
    Variable,
}

impl NodeType {
    /// Returns `true` for nodes that can hold a [`Value`].
    #[inline]
    pub const fn is_value_like(self) -> bool {
        matches!(self, Self::Value | Self::Variable)
    }

    /// Returns `true` for nodes that can have children.
    #[inline]
    pub const fn is_container_like(self) -> bool {
        !matches!(self, Self::Value)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Value => "value",
            Self::Object => "object",
            Self::Array => "array",
            Self::Variable => "variable",
        })
    }
}

// -----------------------------------------------------------------------------
// Node

/// Lazily produced children of a node.
pub type NodeIter<'n> = Box<dyn Iterator<Item = Result<Box<dyn Node + 'n>>> + 'n>;

/// Callback used by [`Node::add`] to populate a freshly created child.
pub type Configure<'c> = dyn FnMut(&mut dyn Node) -> Result<()> + 'c;

/// A position in a tree, shared by every format and the object graph.
///
/// Implementors provide the `*_node`/`get_`/`set_` primitives. Callers use
/// the provided [`value`](Node::value), [`children`](Node::children) and
/// [`add`](Node::add), which enforce the structural rules first:
///
/// - value nodes have no children;
/// - object nodes only adopt named children;
/// - only value and variable nodes hold a value.
///
/// Adding a child is a single call: the target creates its child from the
/// source child, hands it to the `configure` callback to be filled in, and
/// then takes ownership of the result. There is no way to hold a reference
/// to a half-built child after `add` returns.
pub trait Node {
    /// The current structural kind.
    fn node_type(&self) -> NodeType;

    /// Resolves a [`NodeType::Variable`] node.
    ///
    /// Nodes whose kind is fixed fail with [`Error::NodeTypeReadonly`].
    fn set_node_type(&mut self, node_type: NodeType) -> Result<()> {
        let _ = node_type;
        Err(Error::NodeTypeReadonly { path: self.path() })
    }

    /// A short tag naming the notation this node belongs to.
    fn format(&self) -> &str;

    /// A human readable locator in the syntax of the format.
    fn path(&self) -> String;

    fn metadata(&self) -> &Metadata;

    fn is_named(&self) -> bool;

    /// The name of the node, `None` if it is unnamed.
    fn name(&self) -> Option<&str>;

    /// Renames the node, failing with [`Error::NameNotSupported`] by default.
    fn set_name(&mut self, name: &str) -> Result<()> {
        let _ = name;
        Err(Error::NameNotSupported { path: self.path() })
    }

    /// Reads the value. Called through [`Node::value`].
    fn get_value(&self) -> Result<Value>;

    /// Writes the value.
    fn set_value(&mut self, value: Value) -> Result<()>;

    /// Produces the children. Called through [`Node::children`].
    fn child_nodes(&self) -> Result<NodeIter<'_>>;

    /// Creates a child from `source`, configures it, then adopts it.
    /// Called through [`Node::add`].
    fn add_node(&mut self, source: &dyn Node, configure: &mut Configure<'_>) -> Result<()>;

    /// Writes the tree rooted here in the native form of the format.
    fn encode(&self, out: &mut dyn io::Write) -> Result<()>;

    /// Prepares a container to receive children.
    fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    /// Checks a container once all children were added.
    fn validate(&mut self) -> Result<()> {
        Ok(())
    }

    /// Whether [`Error::UnrecognizedNode`] raised by `add` may be ignored.
    fn tolerates_unmatched(&self) -> bool {
        false
    }

    // -------------------------------------------------------------------------
    // object graph hooks

    /// The shape of the backing type, for object graph nodes.
    fn shape(&self) -> Option<&TypeShape> {
        None
    }

    /// The backing instance, for object graph nodes.
    fn instance(&self) -> Option<&dyn Reflect> {
        None
    }

    fn instance_mut(&mut self) -> Option<&mut dyn Reflect> {
        None
    }

    /// Replaces the backing instance, for object graph target nodes.
    fn set_instance(&mut self, value: Box<dyn Reflect>) -> Result<()> {
        Err(Error::ValueConversion {
            value: value.reflect_type_path().to_owned(),
            type_path: "an object graph node",
        })
    }

    // -------------------------------------------------------------------------
    // provided

    /// Reads the value of a value-like node.
    fn value(&self) -> Result<Value> {
        let node_type = self.node_type();
        if !node_type.is_value_like() {
            return Err(Error::ValueNotSupported {
                path: self.path(),
                node_type,
            });
        }
        self.get_value()
    }

    /// Iterates the children of a container-like node.
    fn children(&self) -> Result<NodeIter<'_>> {
        if !self.node_type().is_container_like() {
            return Err(Error::ChildrenNotSupported { path: self.path() });
        }
        self.child_nodes()
    }

    /// Adds a child made from `source`, see [`Node::add_node`].
    fn add(&mut self, source: &dyn Node, configure: &mut Configure<'_>) -> Result<()> {
        match self.node_type() {
            NodeType::Value => return Err(Error::ChildrenNotSupported { path: self.path() }),
            NodeType::Object if !source.is_named() => {
                return Err(Error::UnnamedChild { path: self.path() });
            }
            _ => {}
        }
        self.add_node(source, configure)
    }
}

impl fmt::Debug for dyn Node + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("format", &self.format())
            .field("node_type", &self.node_type())
            .field("path", &self.path())
            .finish()
    }
}

/// Compares two names, optionally ignoring ASCII case.
#[inline]
pub(crate) fn names_match(a: &str, b: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        a == b
    } else {
        a.eq_ignore_ascii_case(b)
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::{Configure, Node, NodeIter, NodeType};
    use crate::error::{Error, Result};
    use crate::{Metadata, Value};

    struct Leaf {
        node_type: NodeType,
        name: Option<&'static str>,
        meta: Metadata,
    }

    impl Node for Leaf {
        fn node_type(&self) -> NodeType {
            self.node_type
        }
        fn format(&self) -> &str {
            "leaf"
        }
        fn path(&self) -> String {
            self.name.unwrap_or("?").to_owned()
        }
        fn metadata(&self) -> &Metadata {
            &self.meta
        }
        fn is_named(&self) -> bool {
            self.name.is_some()
        }
        fn name(&self) -> Option<&str> {
            self.name
        }
        fn get_value(&self) -> Result<Value> {
            Ok(Value::Int(1))
        }
        fn set_value(&mut self, _: Value) -> Result<()> {
            Ok(())
        }
        fn child_nodes(&self) -> Result<NodeIter<'_>> {
            Ok(Box::new(core::iter::empty()))
        }
        fn add_node(&mut self, _: &dyn Node, _: &mut Configure<'_>) -> Result<()> {
            Ok(())
        }
        fn encode(&self, _: &mut dyn io::Write) -> Result<()> {
            Ok(())
        }
    }

    fn leaf(node_type: NodeType, name: Option<&'static str>) -> Leaf {
        Leaf {
            node_type,
            name,
            meta: Metadata::new(),
        }
    }

    #[test]
    fn value_nodes_reject_children() {
        let mut parent = leaf(NodeType::Value, Some("p"));
        let child = leaf(NodeType::Value, Some("c"));

        assert!(matches!(parent.children(), Err(Error::ChildrenNotSupported { .. })));
        let err = parent.add(&child, &mut |_| Ok(())).unwrap_err();
        assert!(matches!(err, Error::ChildrenNotSupported { .. }));
    }

    #[test]
    fn object_nodes_reject_unnamed_children() {
        let mut parent = leaf(NodeType::Object, Some("p"));
        let err = parent.add(&leaf(NodeType::Value, None), &mut |_| Ok(())).unwrap_err();
        assert!(matches!(err, Error::UnnamedChild { .. }));

        let mut array = leaf(NodeType::Array, Some("a"));
        assert!(array.add(&leaf(NodeType::Value, None), &mut |_| Ok(())).is_ok());
    }

    #[test]
    fn containers_hold_no_value() {
        let object = leaf(NodeType::Object, Some("p"));
        assert!(matches!(object.value(), Err(Error::ValueNotSupported { .. })));
        assert_eq!(leaf(NodeType::Variable, None).value().unwrap(), Value::Int(1));
    }

    #[test]
    fn fixed_nodes_refuse_renames() {
        let mut node = leaf(NodeType::Value, Some("x"));
        assert!(matches!(node.set_node_type(NodeType::Object), Err(Error::NodeTypeReadonly { .. })));
        assert!(matches!(node.set_name("y"), Err(Error::NameNotSupported { .. })));
    }
}

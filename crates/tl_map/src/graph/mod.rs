//! Object graphs seen as node trees.
//!
//! A [`GraphNode`] projects one value onto the [`Node`] contract, choosing
//! its node type from the [`Classification`] of the value's shape:
//!
//! | classification | node type | children |
//! |---|---|---|
//! | `Simple`     | value  | none |
//! | `Complex`    | object | one per mapped member |
//! | `Enumerable` | array  | one per item, named by the item type |
//! | `Dictionary` | object | one per entry, named by the key's text |
//!
//! Source nodes borrow caller owned data and never modify it. Target nodes
//! own the instance they build until the parent adopts it.

use core::any::TypeId;
use core::fmt;
use std::io;
use std::sync::Arc;

use fixedbitset::FixedBitSet;
use tl_reflect::Reflect;
use tl_reflect::info::{FieldFlags, TypeInfo, Typed};

use crate::coerce;
use crate::error::{Error, Result};
use crate::metadata::{AsAttribute, ItemName, MemberName, Metadata};
use crate::node::{Configure, Node, NodeIter, NodeType};
use crate::options::Options;
use crate::shape::{Classification, MemberDescriptor, TypeShape};
use crate::value::Value;

// -----------------------------------------------------------------------------
// Modules

mod source;
mod target;

/// The [`Node::format`] of every [`GraphNode`].
pub const FORMAT: &str = "object";

// -----------------------------------------------------------------------------
// Identity

/// The identity of a value: its address plus its type, since a struct and
/// its first field share an address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Identity {
    addr: usize,
    type_id: TypeId,
}

impl Identity {
    fn of(value: &dyn Reflect) -> Self {
        Self {
            addr: core::ptr::from_ref(value).cast::<()>().addr(),
            type_id: value.ty_id(),
        }
    }
}

// -----------------------------------------------------------------------------
// Backing

enum Backing<'a> {
    /// Borrowed data being serialized. `None` is null.
    Source(Option<&'a dyn Reflect>),
    /// An instance under construction.
    Target(Building),
}

#[derive(Default)]
struct Building {
    instance: Option<Box<dyn Reflect>>,
    /// Set when the node received null.
    null: bool,
    /// Members of a complex shape supplied so far, by position.
    supplied: FixedBitSet,
}

// -----------------------------------------------------------------------------
// GraphNode

/// A node over a value of the object graph.
///
/// ```
/// use tl_map::{GraphNode, Node, NodeType, Options, Value};
///
/// let options = Options::default();
/// let lines = vec![3_u16, 4];
/// let node = GraphNode::source(&lines, &options);
///
/// assert_eq!(node.node_type(), NodeType::Array);
/// let values: Vec<Value> = node
///     .children()
///     .unwrap()
///     .map(|child| child.unwrap().value().unwrap())
///     .collect();
/// assert_eq!(values, [Value::UInt(3), Value::UInt(4)]);
/// ```
pub struct GraphNode<'a> {
    options: &'a Options,
    shape: Arc<TypeShape>,
    name: Option<String>,
    path: String,
    metadata: Metadata,
    /// Values enclosing this one, outermost first. Only kept for sources.
    ancestors: Vec<Identity>,
    backing: Backing<'a>,
}

impl<'a> GraphNode<'a> {
    /// A root node reading `value`.
    ///
    /// The root is named after the value's type.
    pub fn source(value: &'a dyn Reflect, options: &'a Options) -> Self {
        let shape = options.shapes().get(value.reflect_type_info());
        let current = shape.unwrap(value);
        Self::root(shape, options, Backing::Source(current))
    }

    /// A root node building a `T`.
    #[inline]
    pub fn target<T: Typed>(options: &'a Options) -> Self {
        Self::target_for(T::type_info(), options)
    }

    /// A root node building a value of the type described by `info`.
    pub fn target_for(info: &'static TypeInfo, options: &'a Options) -> Self {
        let shape = options.shapes().get(info);
        Self::root(shape, options, Backing::Target(Building::default()))
    }

    fn root(shape: Arc<TypeShape>, options: &'a Options, backing: Backing<'a>) -> Self {
        let inner = shape.inner_info();
        Self {
            options,
            name: Some(inner.type_ident().to_owned()),
            path: inner.type_name().to_owned(),
            shape,
            metadata: Metadata::new(),
            ancestors: Vec::new(),
            backing,
        }
    }

    #[inline]
    pub fn options(&self) -> &'a Options {
        self.options
    }

    /// The shape of the declared type of this node.
    #[inline]
    pub fn type_shape(&self) -> &Arc<TypeShape> {
        &self.shape
    }

    /// Returns `true` for nodes reading caller data.
    #[inline]
    pub fn is_source(&self) -> bool {
        matches!(self.backing, Backing::Source(_))
    }

    /// Returns `true` if the node currently stands for null.
    pub fn is_null(&self) -> bool {
        match &self.backing {
            Backing::Source(value) => value.is_none(),
            Backing::Target(building) => building.null,
        }
    }

    /// The value of the underlying type, `None` while null or not built.
    fn current(&self) -> Option<&dyn Reflect> {
        match &self.backing {
            Backing::Source(value) => *value,
            Backing::Target(building) => building.instance.as_deref(),
        }
    }

    fn item_name_for(&self, item: &TypeShape) -> String {
        match self.metadata.get::<ItemName>() {
            Some(tag) => tag.0.clone(),
            None => item.item_name().to_owned(),
        }
    }

    /// The error for an instance that does not have the kind its shape says.
    fn unexpected(&self, value: &dyn Reflect) -> Error {
        Error::ValueConversion {
            value: value.reflect_type_path().to_owned(),
            type_path: self.shape.type_path(),
        }
    }
}

/// Tags describing a member child.
fn member_metadata(member: &MemberDescriptor) -> Metadata {
    let mut metadata = Metadata::new().with(MemberName(member.name().to_owned()));
    if member.flags().contains(FieldFlags::ATTRIBUTE) {
        metadata.push(AsAttribute);
    }
    if let Some(item_name) = member.item_name() {
        metadata.push(ItemName(item_name.to_owned()));
    }
    metadata
}

impl Node for GraphNode<'_> {
    fn node_type(&self) -> NodeType {
        if self.is_null() {
            return NodeType::Value;
        }
        match self.shape.classification() {
            Classification::Simple => NodeType::Value,
            Classification::Complex | Classification::Dictionary => NodeType::Object,
            Classification::Enumerable => NodeType::Array,
        }
    }

    fn format(&self) -> &str {
        FORMAT
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
        match self.current() {
            None => Ok(Value::Null),
            Some(value) => coerce::to_value(value, &self.shape, self.options),
        }
    }

    fn set_value(&mut self, value: Value) -> Result<()> {
        let node_type = self.node_type();
        let Backing::Target(building) = &mut self.backing else {
            return Err(Error::ReadOnly {
                path: self.path.clone(),
            });
        };

        if self.shape.classification() == Classification::Simple {
            let coerced = coerce::coerce(value, &self.shape, self.options)?;
            building.null = coerced.is_none();
            building.instance = coerced;
            return Ok(());
        }

        if !value.is_null() {
            return Err(Error::ValueNotSupported {
                path: self.path.clone(),
                node_type,
            });
        }
        if self.shape.is_nullable() {
            building.instance = None;
            building.null = true;
        } else {
            log::debug!("ignoring null for non-nullable `{}`", self.path);
        }
        Ok(())
    }

    fn child_nodes(&self) -> Result<NodeIter<'_>> {
        let Some(value) = self.current() else {
            return Ok(Box::new(core::iter::empty()));
        };
        match self.shape.classification() {
            Classification::Simple => Ok(Box::new(core::iter::empty())),
            Classification::Complex => self.member_children(value),
            Classification::Enumerable => self.item_children(value),
            Classification::Dictionary => self.entry_children(value),
        }
    }

    fn add_node(&mut self, source: &dyn Node, configure: &mut Configure<'_>) -> Result<()> {
        if self.is_source() {
            return Err(Error::ReadOnly {
                path: self.path.clone(),
            });
        }
        match self.shape.classification() {
            Classification::Complex => self.add_member(source, configure),
            Classification::Enumerable => self.add_item(source, configure),
            Classification::Dictionary => self.add_entry(source, configure),
            Classification::Simple => Err(Error::ChildrenNotSupported {
                path: self.path.clone(),
            }),
        }
    }

    fn encode(&self, _: &mut dyn io::Write) -> Result<()> {
        Err(Error::Format(format!(
            "object node `{}` has no text form",
            self.path
        )))
    }

    fn initialize(&mut self) -> Result<()> {
        self.prepare()
    }

    fn validate(&mut self) -> Result<()> {
        self.check_supplied()
    }

    fn tolerates_unmatched(&self) -> bool {
        match self.shape.classification() {
            Classification::Complex => !self.options.fail_on_unmatched_members(),
            Classification::Enumerable => !self.options.fail_on_unmatched_items(),
            Classification::Simple | Classification::Dictionary => false,
        }
    }

    fn shape(&self) -> Option<&TypeShape> {
        Some(&self.shape)
    }

    fn instance(&self) -> Option<&dyn Reflect> {
        self.current()
    }

    fn instance_mut(&mut self) -> Option<&mut dyn Reflect> {
        match &mut self.backing {
            Backing::Target(Building {
                instance: Some(value),
                ..
            }) => Some(value.as_mut()),
            _ => None,
        }
    }

    fn set_instance(&mut self, value: Box<dyn Reflect>) -> Result<()> {
        let inner = self.shape.inner_info();
        let Backing::Target(building) = &mut self.backing else {
            return Err(Error::ReadOnly {
                path: self.path.clone(),
            });
        };
        if value.ty_id() != inner.ty_id() {
            return Err(Error::ValueConversion {
                value: value.reflect_type_path().to_owned(),
                type_path: inner.type_path(),
            });
        }
        building.instance = Some(value);
        building.null = false;
        Ok(())
    }
}

impl fmt::Debug for GraphNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphNode")
            .field("type_path", &self.shape.type_path())
            .field("path", &self.path)
            .field("source", &self.is_source())
            .field("null", &self.is_null())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use tl_reflect::derive::Reflect;

    use super::GraphNode;
    use crate::metadata::{AsAttribute, ItemName, MemberName};
    use crate::{Error, Node, NodeType, Options, Value};

    #[derive(Reflect, Default, Debug, PartialEq)]
    #[reflect(default)]
    struct Contact {
        #[reflect(attribute)]
        id: u32,
        name: String,
        nickname: Option<String>,
        #[reflect(item_name = "Phone")]
        phones: Vec<String>,
        #[reflect(write_only)]
        password: String,
    }

    fn contact() -> Contact {
        Contact {
            id: 7,
            name: "Ann".into(),
            nickname: None,
            phones: vec!["555".into()],
            password: "secret".into(),
        }
    }

    #[test]
    fn object_children_skip_nulls_and_hidden_members() {
        let options = Options::default();
        let value = contact();
        let node = GraphNode::source(&value, &options);

        assert_eq!(node.node_type(), NodeType::Object);
        assert_eq!(node.path(), "Contact");

        let children: Vec<_> = node.children().unwrap().map(Result::unwrap).collect();
        let names: Vec<_> = children.iter().map(|c| c.name().unwrap()).collect();
        assert_eq!(names, ["id", "name", "phones"]);

        assert!(children[0].metadata().contains::<AsAttribute>());
        assert_eq!(children[1].metadata().get::<MemberName>().unwrap().0, "name");
        assert_eq!(children[2].metadata().get::<ItemName>().unwrap().0, "Phone");
        assert_eq!(children[1].path(), "Contact.name");
    }

    #[test]
    fn null_members_can_be_included() {
        let options = Options::builder().include_null_members(true).build();
        let value = contact();
        let node = GraphNode::source(&value, &options);

        let nickname = node
            .children()
            .unwrap()
            .map(Result::unwrap)
            .find(|c| c.name() == Some("nickname"))
            .unwrap();
        assert_eq!(nickname.node_type(), NodeType::Value);
        assert_eq!(nickname.value().unwrap(), Value::Null);
    }

    #[derive(Reflect, Default)]
    #[reflect(default)]
    struct Draft {
        title: String,
        #[reflect(optional)]
        revision: u32,
        #[reflect(optional)]
        summary: Option<String>,
        #[reflect(optional)]
        labels: Vec<String>,
    }

    fn member_names(node: &GraphNode<'_>) -> Vec<String> {
        node.children()
            .unwrap()
            .map(|c| c.unwrap().name().unwrap().to_owned())
            .collect()
    }

    #[test]
    fn optional_members_without_values_are_left_out() {
        let options = Options::builder().include_null_members(true).build();

        let empty = Draft::default();
        let node = GraphNode::source(&empty, &options);
        assert_eq!(member_names(&node), ["title"]);

        let filled = Draft {
            title: "a".into(),
            revision: 2,
            summary: Some(String::new()),
            labels: vec!["x".into()],
        };
        let node = GraphNode::source(&filled, &options);
        assert_eq!(member_names(&node), ["title", "revision", "summary", "labels"]);
    }

    #[test]
    fn sequence_items_use_item_name_override() {
        let options = Options::default();
        let value = contact();
        let node = GraphNode::source(&value, &options);
        let phones = node.children().unwrap().nth(2).unwrap().unwrap();

        assert_eq!(phones.node_type(), NodeType::Array);
        let item = phones.children().unwrap().next().unwrap().unwrap();
        assert_eq!(item.name(), Some("Phone"));
        assert_eq!(item.path(), "Contact.phones[0]");
        assert_eq!(item.value().unwrap(), Value::from("555"));
    }

    #[test]
    fn dictionary_entries_are_named_by_key() {
        let options = Options::default();
        let value = BTreeMap::from([(1_u8, true), (2, false)]);
        let node = GraphNode::source(&value, &options);

        assert_eq!(node.node_type(), NodeType::Object);
        let entries: Vec<_> = node
            .children()
            .unwrap()
            .map(|c| {
                let c = c.unwrap();
                (c.name().unwrap().to_owned(), c.value().unwrap())
            })
            .collect();
        assert_eq!(
            entries,
            [("1".to_owned(), Value::Bool(true)), ("2".to_owned(), Value::Bool(false))]
        );
    }

    #[test]
    fn sources_are_read_only() {
        let options = Options::default();
        let mut node = GraphNode::source(&5_i32, &options);
        assert_eq!(node.value().unwrap(), Value::Int(5));
        assert!(matches!(node.set_value(Value::Int(6)), Err(Error::ReadOnly { .. })));
    }

    #[test]
    fn targets_build_values() {
        let options = Options::default();
        let mut node = GraphNode::target::<Option<u16>>(&options);
        node.set_value(Value::from("12")).unwrap();
        let value = node.into_instance().unwrap();
        assert_eq!(value.take::<Option<u16>>().ok(), Some(Some(12)));

        let mut node = GraphNode::target::<Option<u16>>(&options);
        node.set_value(Value::Null).unwrap();
        assert_eq!(node.node_type(), NodeType::Value);
        let value = node.into_instance().unwrap();
        assert_eq!(value.take::<Option<u16>>().ok(), Some(None));
    }

    #[test]
    fn targets_reject_foreign_instances() {
        let options = Options::default();
        let mut node = GraphNode::target::<u16>(&options);
        assert!(node.set_instance(Box::new(1_u32)).is_err());
        node.set_instance(Box::new(1_u16)).unwrap();
        assert_eq!(node.value().unwrap(), Value::UInt(1));
    }
}

use core::mem;

use tl_reflect::Reflect;
use tl_reflect::info::Typed;

use crate::convention::{MappingRegistry, VisitingRegistry};
use crate::error::{BoxError, Error, MappingError, Position, Result};
use crate::graph::GraphNode;
use crate::node::{Node, NodeType};
use crate::options::Options;
use crate::value::Value;

// -----------------------------------------------------------------------------
// Mapper

/// Which way a [`Mapper`] moves data, deciding the conventions it consults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Object graph to document: writers and serialize visitors.
    Serialize,
    /// Document to object graph: readers and deserialize visitors.
    Deserialize,
}

/// Maps a source tree onto a target tree, one node pair at a time.
///
/// For each pair, the first matching convention replaces the structural
/// mapping. Otherwise:
///
/// - a value is copied onto a value-like target;
/// - a null value is written to a container target, which decides what
///   null means for it;
/// - containers are mapped child by child through [`Node::add`], then
///   validated;
/// - any other combination is a [`NodeTypeMismatch`](Error::NodeTypeMismatch).
///
/// Every matching visitor then runs on the pair. Errors get the position of
/// the innermost failing pair attached exactly once.
///
/// ```
/// use tl_map::{GraphNode, Mapper, Options};
///
/// let options = Options::default();
/// let items = vec![1_u8, 2];
/// let source = GraphNode::source(&items, &options);
/// let mut target = GraphNode::target::<Vec<u16>>(&options);
///
/// Mapper::deserializer(&options).map(&source, &mut target).unwrap();
/// let copy = target.into_instance().unwrap().take::<Vec<u16>>().unwrap();
/// assert_eq!(copy, [1, 2]);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Mapper<'o> {
    options: &'o Options,
    direction: Direction,
}

impl<'o> Mapper<'o> {
    #[inline]
    pub const fn new(options: &'o Options, direction: Direction) -> Self {
        Self { options, direction }
    }

    #[inline]
    pub const fn serializer(options: &'o Options) -> Self {
        Self::new(options, Direction::Serialize)
    }

    #[inline]
    pub const fn deserializer(options: &'o Options) -> Self {
        Self::new(options, Direction::Deserialize)
    }

    #[inline]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    fn conventions(&self) -> &'o MappingRegistry {
        match self.direction {
            Direction::Serialize => self.options.writers(),
            Direction::Deserialize => self.options.readers(),
        }
    }

    fn visitors(&self) -> &'o VisitingRegistry {
        match self.direction {
            Direction::Serialize => self.options.serialize_visitors(),
            Direction::Deserialize => self.options.deserialize_visitors(),
        }
    }

    fn callback_error(&self, err: BoxError) -> Error {
        match self.direction {
            Direction::Serialize => Error::from_callback(err, Error::Writer),
            Direction::Deserialize => Error::from_callback(err, Error::Reader),
        }
    }

    /// Maps `source` onto `target`.
    pub fn map(&self, source: &dyn Node, target: &mut dyn Node) -> Result<()> {
        match self.map_pair(source, target) {
            Ok(()) => Ok(()),
            Err(error) if error.is_wrapped() => Err(error),
            Err(error) => Err(MappingError::wrap(
                error,
                position(source),
                position(target),
            )),
        }
    }

    fn map_pair(&self, source: &dyn Node, target: &mut dyn Node) -> Result<()> {
        if let Some(action) = self.conventions().find(source, target) {
            log::trace!("convention maps `{}` onto `{}`", source.path(), target.path());
            action(source, &mut *target).map_err(|err| self.callback_error(err))?;
        } else {
            self.map_structure(source, target)?;
        }

        for visitor in self.visitors().matching(source, target) {
            visitor(source, &mut *target).map_err(|err| self.callback_error(err))?;
        }
        Ok(())
    }

    fn map_structure(&self, source: &dyn Node, target: &mut dyn Node) -> Result<()> {
        let mut target_type = target.node_type();
        let source_type = match source.node_type() {
            NodeType::Variable => resolve_variable(source, target_type)?,
            node_type => node_type,
        };
        if target_type == NodeType::Variable {
            target.set_node_type(source_type)?;
            target_type = target.node_type();
        }

        match (source_type, target_type) {
            (NodeType::Value, NodeType::Value | NodeType::Variable) => {
                target.set_value(source.value()?)
            }
            (NodeType::Value, _) => match source.value()? {
                Value::Null => target.set_value(Value::Null),
                _ => Err(mismatch(source, source_type, target, target_type)),
            },
            (_, NodeType::Value)
            | (NodeType::Array, NodeType::Object)
            | (NodeType::Object, NodeType::Array) => {
                Err(mismatch(source, source_type, target, target_type))
            }
            _ => self.map_children(source, target),
        }
    }

    fn map_children(&self, source: &dyn Node, target: &mut dyn Node) -> Result<()> {
        target.initialize()?;
        for child in source.children()? {
            let child = child?;
            let added = target.add(&*child, &mut |node| self.map(&*child, node));
            match added {
                Err(error) if error.is_unmatched() && target.tolerates_unmatched() => {
                    log::debug!("ignored: {error}");
                }
                added => added?,
            }
        }
        target.validate()
    }
}

/// Decides what an undecided source node stands for.
///
/// A source with children is a container whatever the target expects, so
/// it never maps onto a value.
fn resolve_variable(source: &dyn Node, target_type: NodeType) -> Result<NodeType> {
    let has_children = source.children()?.next().is_some();
    Ok(match target_type {
        NodeType::Variable | NodeType::Value if has_children => NodeType::Object,
        NodeType::Variable => NodeType::Value,
        target_type => target_type,
    })
}

fn position(node: &dyn Node) -> Position {
    Position {
        format: node.format().to_owned(),
        node_type: node.node_type(),
        path: node.path(),
    }
}

fn mismatch(source: &dyn Node, from_type: NodeType, target: &dyn Node, to_type: NodeType) -> Error {
    Error::NodeTypeMismatch {
        from_type,
        from_path: source.path(),
        to_type,
        to_path: target.path(),
    }
}

// -----------------------------------------------------------------------------
// Entry points

/// Writes `value` into the tree rooted at `target`.
pub fn serialize(value: &dyn Reflect, target: &mut dyn Node, options: &Options) -> Result<()> {
    let source = GraphNode::source(value, options);
    Mapper::serializer(options).map(&source, target)
}

/// Builds a `T` from the tree rooted at `source`.
pub fn deserialize<T: Reflect + Typed>(source: &dyn Node, options: &Options) -> Result<T> {
    let mut target = GraphNode::target::<T>(options);
    Mapper::deserializer(options).map(source, &mut target)?;
    finish_root(source, target)
}

/// Maps the tree rooted at `source` onto an existing `value`.
///
/// Top-level members the document does not mention keep their current
/// values. Members it does mention are rebuilt from the document, so a
/// nested struct it mentions starts from a fresh instance, and sequences
/// and dictionaries are replaced. On failure `value` keeps whatever was
/// mapped before the error.
pub fn deserialize_into<T: Reflect + Typed + Default>(
    source: &dyn Node,
    value: &mut T,
    options: &Options,
) -> Result<()> {
    let mut target = GraphNode::target::<T>(options);
    let seeded = !target.type_shape().is_nullable();
    if seeded {
        target.set_instance(Box::new(mem::take(value)))?;
    }

    if let Err(error) = Mapper::deserializer(options).map(source, &mut target) {
        if seeded && let Some(partial) = target.instance_mut().and_then(|v| v.downcast_mut::<T>()) {
            *value = mem::take(partial);
        }
        return Err(error);
    }
    *value = finish_root(source, target)?;
    Ok(())
}

fn finish_root<T: Reflect + Typed>(source: &dyn Node, target: GraphNode<'_>) -> Result<T> {
    let target_position = position(&target);
    target
        .into_instance()
        .and_then(|value| {
            value.take::<T>().map_err(|value| Error::ValueConversion {
                value: value.reflect_type_path().to_owned(),
                type_path: T::type_path(),
            })
        })
        .map_err(|error| MappingError::wrap(error, position(source), target_position))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    use tl_reflect::Reflect;
    use tl_reflect::derive::Reflect;
    use tl_reflect::impls::NonGenericTypeInfoCell;
    use tl_reflect::info::{NamedField, ReflectKind, StructInfo, TypeInfo, TypePath, Typed};
    use tl_reflect::ops::{ReflectMut, ReflectRef, Struct};

    use super::{Mapper, deserialize, deserialize_into};
    use crate::{Error, GraphNode, Node, NodeType, Options, Value};

    #[derive(Reflect, Default, Debug, PartialEq, Clone, Copy)]
    enum Level {
        #[default]
        Value1,
        Value2,
    }

    #[derive(Reflect, Default, Debug, PartialEq, Clone)]
    #[reflect(default)]
    struct Address {
        city: String,
    }

    #[derive(Reflect, Default, Debug, PartialEq, Clone)]
    #[reflect(default)]
    struct Person {
        name: String,
        age: i32,
        level: Level,
        address: Option<Address>,
        tags: Vec<String>,
        scores: BTreeMap<String, f64>,
        nickname: Option<String>,
    }

    #[derive(Reflect, Default, Debug, PartialEq)]
    #[reflect(default)]
    struct Flat {
        id: u32,
    }

    #[derive(Reflect, Default)]
    #[reflect(default)]
    struct Extra {
        id: u32,
        unexpected: String,
    }

    #[derive(Reflect, Default, Debug)]
    #[reflect(default)]
    struct Login {
        #[reflect(required)]
        user: String,
        pin: u16,
    }

    #[derive(Reflect, Default)]
    #[reflect(default)]
    struct Text {
        level: String,
    }

    #[derive(Reflect, Default, Debug, PartialEq)]
    #[reflect(default)]
    struct Choice {
        level: Level,
    }

    /// A struct whose `next` member is the struct itself.
    struct Ring {
        id: u32,
    }

    impl TypePath for Ring {
        fn type_path() -> &'static str {
            "tests::Ring"
        }
        fn type_name() -> &'static str {
            "Ring"
        }
        fn type_ident() -> &'static str {
            "Ring"
        }
    }

    impl Typed for Ring {
        fn type_info() -> &'static TypeInfo {
            static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| {
                TypeInfo::Struct(StructInfo::new::<Self>(&[
                    NamedField::new::<u32>("id"),
                    NamedField::new::<Ring>("next"),
                ]))
            })
        }
    }

    impl Reflect for Ring {
        fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
            *self = value.take::<Self>()?;
            Ok(())
        }
        fn reflect_kind(&self) -> ReflectKind {
            ReflectKind::Struct
        }
        fn reflect_ref(&self) -> ReflectRef<'_> {
            ReflectRef::Struct(self)
        }
        fn reflect_mut(&mut self) -> ReflectMut<'_> {
            ReflectMut::Struct(self)
        }
    }

    impl Struct for Ring {
        fn field(&self, name: &str) -> Option<&dyn Reflect> {
            match name {
                "id" => Some(&self.id),
                "next" => Some(self),
                _ => None,
            }
        }
        fn field_mut(&mut self, name: &str) -> Option<&mut dyn Reflect> {
            match name {
                "id" => Some(&mut self.id),
                _ => None,
            }
        }
        fn field_at(&self, index: usize) -> Option<&dyn Reflect> {
            match index {
                0 => Some(&self.id),
                1 => Some(self),
                _ => None,
            }
        }
        fn field_at_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
            match index {
                0 => Some(&mut self.id),
                _ => None,
            }
        }
        fn name_at(&self, index: usize) -> Option<&str> {
            ["id", "next"].get(index).copied()
        }
        fn field_len(&self) -> usize {
            2
        }
    }

    fn person() -> Person {
        Person {
            name: "Ed".into(),
            age: 67,
            level: Level::Value2,
            address: Some(Address {
                city: "Leeds".into(),
            }),
            tags: vec!["a".into(), "b".into()],
            scores: BTreeMap::from([("maths".to_owned(), 9.5), ("art".to_owned(), 7.0)]),
            nickname: None,
        }
    }

    #[test]
    fn object_graphs_round_trip() {
        let options = Options::default();
        let original = person();
        let copy: Person = deserialize(&GraphNode::source(&original, &options), &options).unwrap();
        assert_eq!(copy, original);
    }

    #[test]
    fn self_references_are_skipped() {
        let options = Options::default();
        let ring = Ring { id: 3 };
        let source = GraphNode::source(&ring, &options);

        let names: Vec<String> = source
            .children()
            .unwrap()
            .map(|child| child.unwrap().name().unwrap().to_owned())
            .collect();
        assert_eq!(names, ["id"]);

        let flat: Flat = deserialize(&source, &options).unwrap();
        assert_eq!(flat, Flat { id: 3 });
    }

    #[test]
    fn missing_required_members_are_reported_together() {
        let options = Options::default();
        let source = Flat { id: 1 };
        let err = deserialize::<Login>(&GraphNode::source(&source, &options), &options).unwrap_err();

        let Error::MissingNode { names, path } = err.kind() else {
            panic!("unexpected error: {err}");
        };
        assert_eq!(names, &["user"]);
        assert_eq!(path, "Login");
        let context = err.context().unwrap();
        assert_eq!(context.target.node_type, NodeType::Object);
        assert_eq!(context.source.format, "object");
    }

    #[test]
    fn optional_members_default_when_absent() {
        let options = Options::default();
        let source = Flat { id: 4 };
        let person = deserialize::<Person>(&GraphNode::source(&source, &options), &options).unwrap();
        assert_eq!(person, Person::default());
    }

    #[test]
    fn arrays_do_not_map_onto_objects() {
        let options = Options::default();
        let source = vec![1_u32];
        let err = deserialize::<Flat>(&GraphNode::source(&source, &options), &options).unwrap_err();

        let Error::NodeTypeMismatch {
            from_type, to_type, ..
        } = err.kind()
        else {
            panic!("unexpected error: {err}");
        };
        assert_eq!((*from_type, *to_type), (NodeType::Array, NodeType::Object));
        assert!(err.to_string().contains("`Flat`"));

        let flat = Flat { id: 1 };
        let err = deserialize::<Vec<u32>>(&GraphNode::source(&flat, &options), &options).unwrap_err();
        assert!(matches!(err.kind(), Error::NodeTypeMismatch { .. }));
    }

    #[test]
    fn unmatched_members_are_tolerated_unless_configured() {
        let source = Extra {
            id: 2,
            unexpected: "x".into(),
        };

        let options = Options::default();
        let flat: Flat = deserialize(&GraphNode::source(&source, &options), &options).unwrap();
        assert_eq!(flat.id, 2);

        let options = Options::builder().fail_on_unmatched_members(true).build();
        let err = deserialize::<Flat>(&GraphNode::source(&source, &options), &options).unwrap_err();
        assert!(matches!(err.kind(), Error::UnrecognizedNode { name, .. } if name == "unexpected"));
    }

    #[test]
    fn enum_names_honor_case_sensitivity() {
        let source = Text {
            level: "value2".into(),
        };

        let options = Options::default();
        let err = deserialize::<Choice>(&GraphNode::source(&source, &options), &options).unwrap_err();
        assert!(matches!(err.kind(), Error::ValueParse { .. }));
        assert!(matches!(err, Error::FriendlyMapping(_)));
        assert_eq!(
            err.friendly_message(),
            Some("'value2' is not a valid option, must be one of the following: Value1, Value2.")
        );

        let options = Options::builder().case_sensitive_enums(false).build();
        let choice: Choice = deserialize(&GraphNode::source(&source, &options), &options).unwrap();
        assert_eq!(choice.level, Level::Value2);
    }

    #[test]
    fn conventions_replace_structural_mapping() {
        let options = Options::builder()
            .read_value::<u32, _>(|_| Ok(99))
            .write_value::<u32, _>(|id| Ok(Value::from(id * 2)))
            .build();
        let source = Flat { id: 3 };

        let read: Flat = deserialize(&GraphNode::source(&source, &options), &options).unwrap();
        assert_eq!(read.id, 99);

        let mut target = GraphNode::target::<Flat>(&options);
        Mapper::serializer(&options)
            .map(&GraphNode::source(&source, &options), &mut target)
            .unwrap();
        let written = target.into_instance().unwrap().take::<Flat>().unwrap();
        assert_eq!(written.id, 6);
    }

    #[test]
    fn convention_errors_are_translated() {
        let source = Flat { id: 3 };

        let options = Options::builder()
            .read_value::<u32, _>(|_| Err("no ids today".into()))
            .build();
        let err = deserialize::<Flat>(&GraphNode::source(&source, &options), &options).unwrap_err();
        assert!(matches!(err.kind(), Error::Reader(_)));
        assert_eq!(err.context().unwrap().target.path, "Flat.id");

        let options = Options::builder()
            .read_value::<u32, _>(|_| Err(Error::Friendly("Ids are closed.".into()).into()))
            .build();
        let err = deserialize::<Flat>(&GraphNode::source(&source, &options), &options).unwrap_err();
        assert!(matches!(err.kind(), Error::Friendly(_)));
        assert_eq!(err.friendly_message(), Some("Ids are closed."));
    }

    #[test]
    fn writer_errors_are_wrapped_once() {
        let options = Options::builder()
            .write_value::<u32, _>(|_| Err("ids stay private".into()))
            .build();
        let source = Flat { id: 3 };
        let mut target = GraphNode::target::<Flat>(&options);
        let err = Mapper::serializer(&options)
            .map(&GraphNode::source(&source, &options), &mut target)
            .unwrap_err();

        let Error::Writer(inner) = err.kind() else {
            panic!("expected a writer error, got {:?}", err.kind());
        };
        assert_eq!(inner.to_string(), "ids stay private");
        assert!(inner.downcast_ref::<crate::MappingError>().is_none());
        let context = err.context().unwrap();
        assert_eq!(context.source.path, "Flat.id");
        assert_eq!(context.target.path, "Flat.id");
    }

    #[test]
    fn visitors_run_after_mapping_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (first, second) = (Arc::clone(&seen), Arc::clone(&seen));
        let options = Options::builder()
            .visit_deserialized::<Flat, _>(move |flat| {
                first.lock().unwrap().push(flat.id);
                flat.id += 1;
                Ok(())
            })
            .visit_deserialized::<Flat, _>(move |flat| {
                second.lock().unwrap().push(flat.id);
                Ok(())
            })
            .build();

        let source = Flat { id: 10 };
        let flat: Flat = deserialize(&GraphNode::source(&source, &options), &options).unwrap();
        assert_eq!(flat.id, 11);
        assert_eq!(*seen.lock().unwrap(), [10, 11]);
    }

    #[derive(Reflect, Default, Debug, PartialEq)]
    #[reflect(default)]
    struct Wide {
        id: u64,
        tags: Vec<u16>,
    }

    #[derive(Reflect, Default, Debug, PartialEq)]
    #[reflect(default)]
    struct Narrow {
        id: u8,
        tags: Vec<u8>,
    }

    #[test]
    fn items_convert_between_element_types() {
        let options = Options::builder().fail_on_unmatched_items(true).build();
        let items = vec![1_u8, 2];
        let widened: Vec<u16> = deserialize(&GraphNode::source(&items, &options), &options).unwrap();
        assert_eq!(widened, [1, 2]);

        let narrow = Narrow {
            id: 7,
            tags: vec![3, 4],
        };
        let wide: Wide = deserialize(&GraphNode::source(&narrow, &options), &options).unwrap();
        assert_eq!(
            wide,
            Wide {
                id: 7,
                tags: vec![3, 4]
            }
        );
    }

    #[derive(Reflect, Default, Debug, PartialEq)]
    #[reflect(default)]
    struct Place {
        city: String,
        zip: String,
    }

    #[derive(Reflect, Default, Debug, PartialEq)]
    #[reflect(default)]
    struct Home {
        label: String,
        place: Place,
    }

    #[derive(Reflect, Default)]
    #[reflect(default)]
    struct CityOnly {
        city: String,
    }

    #[derive(Reflect, Default)]
    #[reflect(default)]
    struct Move {
        place: CityOnly,
    }

    #[test]
    fn deserialize_into_rebuilds_mentioned_structs() {
        let options = Options::default();
        let mut home = Home {
            label: "work".into(),
            place: Place {
                city: "Leeds".into(),
                zip: "LS1".into(),
            },
        };
        let source = Move {
            place: CityOnly { city: "York".into() },
        };
        deserialize_into(&GraphNode::source(&source, &options), &mut home, &options).unwrap();

        assert_eq!(home.label, "work");
        assert_eq!(
            home.place,
            Place {
                city: "York".into(),
                zip: String::new(),
            }
        );
    }

    #[test]
    fn deserialize_into_keeps_unmentioned_members() {
        let options = Options::default();
        let mut person = person();
        let source = Flat { id: 1 };
        deserialize_into(&GraphNode::source(&source, &options), &mut person, &options).unwrap();
        assert_eq!(person, self::person());

        let source = Text {
            level: "Value1".into(),
        };
        let mut choice = Choice {
            level: Level::Value2,
        };
        deserialize_into(&GraphNode::source(&source, &options), &mut choice, &options).unwrap();
        assert_eq!(choice.level, Level::Value1);
    }
}

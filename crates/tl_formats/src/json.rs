//! Token trees, backed by [`serde_json::Value`].
//!
//! Source nodes take their type from the content. Target nodes start out
//! [`Variable`](NodeType::Variable) and become whatever the mapper decides.
//!
//! ```
//! use tl_map::Options;
//! use tl_reflect::derive::Reflect;
//!
//! #[derive(Reflect, Default, Debug, PartialEq)]
//! #[reflect(default)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! let options = Options::default();
//! let text = tl_formats::json::to_string(&Point { x: 1, y: -2 }, &options).unwrap();
//! assert_eq!(text, r#"{"x":1,"y":-2}"#);
//!
//! let point: Point = tl_formats::json::from_str(&text, &options).unwrap();
//! assert_eq!(point, Point { x: 1, y: -2 });
//! ```

use std::borrow::Cow;
use std::io;

use serde_json::{Map, Number};
use tl_map::metadata::Metadata;
use tl_map::{Configure, Error, Node, NodeIter, NodeType, Options, Result, Value};
use tl_reflect::Reflect;
use tl_reflect::info::Typed;

// -----------------------------------------------------------------------------
// JsonNode

/// A node of a JSON document.
///
/// Sources borrow the document, targets own the part they build.
#[derive(Debug)]
pub struct JsonNode<'a> {
    value: Cow<'a, serde_json::Value>,
    node_type: NodeType,
    writable: bool,
    name: Option<String>,
    path: String,
    metadata: Metadata,
}

impl<'a> JsonNode<'a> {
    /// A root node reading `value`.
    pub fn source(value: &'a serde_json::Value) -> Self {
        Self::reading(value, None, "$".to_owned())
    }

    fn reading(value: &'a serde_json::Value, name: Option<String>, path: String) -> Self {
        Self {
            node_type: node_type_of(value),
            value: Cow::Borrowed(value),
            writable: false,
            name,
            path,
            metadata: Metadata::new(),
        }
    }

    /// The built document, `null` if nothing was written.
    pub fn into_value(self) -> serde_json::Value {
        self.value.into_owned()
    }

    #[inline]
    pub fn as_value(&self) -> &serde_json::Value {
        &self.value
    }

    fn read_only(&self) -> Error {
        Error::ReadOnly {
            path: self.path.clone(),
        }
    }
}

impl JsonNode<'static> {
    /// An empty root node to write into.
    pub fn target() -> Self {
        Self::writing(None, "$".to_owned(), Metadata::new())
    }

    fn writing(name: Option<String>, path: String, metadata: Metadata) -> Self {
        Self {
            value: Cow::Owned(serde_json::Value::Null),
            node_type: NodeType::Variable,
            writable: true,
            name,
            path,
            metadata,
        }
    }
}

fn node_type_of(value: &serde_json::Value) -> NodeType {
    match value {
        serde_json::Value::Object(_) => NodeType::Object,
        serde_json::Value::Array(_) => NodeType::Array,
        _ => NodeType::Value,
    }
}

fn to_json(value: Value) -> Result<serde_json::Value> {
    Ok(match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(b),
        Value::Int(n) => serde_json::Value::Number(n.into()),
        Value::UInt(n) => serde_json::Value::Number(n.into()),
        Value::Float(n) => match Number::from_f64(n) {
            Some(n) => serde_json::Value::Number(n),
            None => {
                return Err(Error::ValueConversion {
                    value: format!("float {n}"),
                    type_path: "a JSON number",
                });
            }
        },
        Value::Str(s) => serde_json::Value::String(s),
    })
}

fn from_json(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(n), _) => Value::Int(n),
            (None, Some(n)) => Value::UInt(n),
            (None, None) => n.as_f64().map_or(Value::Null, Value::Float),
        },
        serde_json::Value::String(s) => Value::Str(s.clone()),
        _ => Value::Null,
    }
}

fn child_path(path: &str, name: &str) -> String {
    let simple = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if simple && !name.is_empty() {
        format!("{path}.{name}")
    } else {
        format!("{path}[{}]", serde_json::Value::from(name))
    }
}

impl Node for JsonNode<'_> {
    fn node_type(&self) -> NodeType {
        self.node_type
    }

    fn set_node_type(&mut self, node_type: NodeType) -> Result<()> {
        if !self.writable {
            return Err(Error::NodeTypeReadonly {
                path: self.path.clone(),
            });
        }
        *self.value.to_mut() = match node_type {
            NodeType::Object => serde_json::Value::Object(Map::new()),
            NodeType::Array => serde_json::Value::Array(Vec::new()),
            NodeType::Value | NodeType::Variable => serde_json::Value::Null,
        };
        self.node_type = node_type;
        Ok(())
    }

    fn format(&self) -> &str {
        "json"
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
        Ok(from_json(&self.value))
    }

    fn set_value(&mut self, value: Value) -> Result<()> {
        if !self.writable {
            return Err(self.read_only());
        }
        *self.value.to_mut() = to_json(value)?;
        self.node_type = NodeType::Value;
        Ok(())
    }

    fn child_nodes(&self) -> Result<NodeIter<'_>> {
        let path = self.path.as_str();
        match &*self.value {
            serde_json::Value::Object(map) => Ok(Box::new(map.iter().map(move |(key, value)| {
                let child = JsonNode::reading(value, Some(key.clone()), child_path(path, key));
                Ok(Box::new(child) as Box<dyn Node + '_>)
            }))),
            serde_json::Value::Array(items) => {
                Ok(Box::new(items.iter().enumerate().map(move |(index, value)| {
                    let child = JsonNode::reading(value, None, format!("{path}[{index}]"));
                    Ok(Box::new(child) as Box<dyn Node + '_>)
                })))
            }
            _ => Ok(Box::new(core::iter::empty())),
        }
    }

    fn add_node(&mut self, source: &dyn Node, configure: &mut Configure<'_>) -> Result<()> {
        if !self.writable {
            return Err(self.read_only());
        }
        if self.node_type == NodeType::Variable {
            let node_type = if source.is_named() {
                NodeType::Object
            } else {
                NodeType::Array
            };
            self.set_node_type(node_type)?;
        }

        match self.value.to_mut() {
            serde_json::Value::Object(map) => {
                let Some(name) = source.name() else {
                    return Err(Error::UnnamedChild {
                        path: self.path.clone(),
                    });
                };
                let path = child_path(&self.path, name);
                let mut child = JsonNode::writing(Some(name.to_owned()), path, source.metadata().clone());
                configure(&mut child)?;
                map.insert(name.to_owned(), child.into_value());
            }
            serde_json::Value::Array(items) => {
                let path = format!("{}[{}]", self.path, items.len());
                let mut child = JsonNode::writing(None, path, source.metadata().clone());
                configure(&mut child)?;
                items.push(child.into_value());
            }
            _ => {
                return Err(Error::ChildrenNotSupported {
                    path: self.path.clone(),
                });
            }
        }
        Ok(())
    }

    fn encode(&self, out: &mut dyn io::Write) -> Result<()> {
        serde_json::to_writer(out, &*self.value).map_err(|err| Error::Format(err.to_string()))
    }
}

// -----------------------------------------------------------------------------
// Helpers

/// Serializes `value` into a JSON document.
pub fn to_value(value: &dyn Reflect, options: &Options) -> Result<serde_json::Value> {
    let mut target = JsonNode::target();
    tl_map::serialize(value, &mut target, options)?;
    Ok(target.into_value())
}

/// Serializes `value` into compact JSON text.
pub fn to_string(value: &dyn Reflect, options: &Options) -> Result<String> {
    let mut target = JsonNode::target();
    tl_map::serialize(value, &mut target, options)?;

    let mut out = Vec::new();
    target.encode(&mut out)?;
    String::from_utf8(out).map_err(|err| Error::Format(err.to_string()))
}

/// Builds a `T` from a JSON document.
pub fn from_value<T: Reflect + Typed>(value: &serde_json::Value, options: &Options) -> Result<T> {
    tl_map::deserialize(&JsonNode::source(value), options)
}

/// Builds a `T` from JSON text.
pub fn from_str<T: Reflect + Typed>(text: &str, options: &Options) -> Result<T> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|err| Error::Format(err.to_string()))?;
    from_value(&value, options)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;
    use tl_map::{Error, Node, NodeType, Options, Value};
    use tl_reflect::derive::Reflect;

    use super::{JsonNode, from_str, from_value, to_value};

    #[derive(Reflect, Default, Debug, PartialEq, Clone)]
    #[reflect(default)]
    struct Person {
        #[reflect(rename = "Name")]
        name: String,
        #[reflect(rename = "Age")]
        age: i32,
    }

    #[derive(Reflect, Default, Debug, PartialEq)]
    #[reflect(default)]
    struct Team {
        people: Vec<Person>,
        lead: Option<Person>,
        ranks: HashMap<String, u8>,
    }

    #[test]
    fn scenario_a_token_tree_round_trip() {
        let options = Options::default();
        let ed = Person {
            name: "Ed".into(),
            age: 67,
        };

        let tree = to_value(&ed, &options).unwrap();
        assert_eq!(tree, json!({ "Name": "Ed", "Age": 67 }));

        let root = JsonNode::source(&tree);
        let children: Vec<(String, Value)> = root
            .children()
            .unwrap()
            .map(|c| {
                let c = c.unwrap();
                (c.name().unwrap().to_owned(), c.value().unwrap())
            })
            .collect();
        assert!(children.contains(&("Name".to_owned(), Value::from("Ed"))));
        assert!(children.contains(&("Age".to_owned(), Value::Int(67))));

        let back: Person = from_value(&tree, &options).unwrap();
        assert_eq!(back, ed);
    }

    #[test]
    fn nested_containers_round_trip() {
        let options = Options::default();
        let team = Team {
            people: vec![
                Person {
                    name: "Ann".into(),
                    age: 30,
                },
                Person {
                    name: "Bo".into(),
                    age: 41,
                },
            ],
            lead: None,
            ranks: HashMap::from([("Ann".to_owned(), 1), ("Bo".to_owned(), 2)]),
        };

        let tree = to_value(&team, &options).unwrap();
        assert_eq!(tree["people"][1]["Name"], "Bo");
        assert!(tree.get("lead").is_none());

        let back: Team = from_value(&tree, &options).unwrap();
        assert_eq!(back, team);
    }

    #[derive(Reflect, Debug, PartialEq)]
    struct Link {
        title: String,
        href: url::Url,
    }

    #[test]
    fn memberwise_structs_read_urls() {
        let options = Options::default();
        let link: Link = from_str(r#"{"href":"https://example.com/","title":"a"}"#, &options).unwrap();
        assert_eq!(link.href.as_str(), "https://example.com/");
        assert_eq!(link.title, "a");

        let tree = to_value(&link, &options).unwrap();
        assert_eq!(tree, json!({ "title": "a", "href": "https://example.com/" }));
    }

    #[test]
    fn nulls_are_written_when_asked() {
        let options = Options::builder().include_null_members(true).build();
        let team = Team::default();
        let tree = to_value(&team, &options).unwrap();
        assert_eq!(tree["lead"], serde_json::Value::Null);

        let back: Team = from_value(&tree, &options).unwrap();
        assert_eq!(back, team);
    }

    #[test]
    fn errors_carry_json_paths() {
        let options = Options::default();
        let err = from_str::<Team>(r#"{"people":[{"Name":"Ann","Age":"old"}]}"#, &options).unwrap_err();

        let context = err.context().unwrap();
        assert_eq!(context.source.path, "$.people[0].Age");
        assert_eq!(context.source.format, "json");
        assert_eq!(context.target.path, "Team.people[0].Age");
        assert!(err.friendly_message().unwrap().starts_with("Integer 'old'"));
    }

    #[test]
    fn structural_mismatch_names_both_sides() {
        let options = Options::default();
        let err = from_str::<Person>("[1, 2]", &options).unwrap_err();
        let Error::NodeTypeMismatch {
            from_type,
            from_path,
            to_type,
            to_path,
        } = err.kind()
        else {
            panic!("unexpected error: {err}");
        };
        assert_eq!((*from_type, from_path.as_str()), (NodeType::Array, "$"));
        assert_eq!((*to_type, to_path.as_str()), (NodeType::Object, "Person"));
    }

    #[test]
    fn sources_are_fixed() {
        let tree = json!({ "a b": [true] });
        let mut root = JsonNode::source(&tree);
        assert!(root.set_node_type(NodeType::Array).is_err());

        let child = root.children().unwrap().next().unwrap().unwrap();
        assert_eq!(child.path(), r#"$["a b"]"#);
        assert_eq!(child.node_type(), NodeType::Array);
    }

    #[test]
    fn syntax_errors_are_format_errors() {
        let err = from_str::<Person>("{", &Options::default()).unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }
}

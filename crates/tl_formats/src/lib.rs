//! Format adapters for the mapping engine.
//!
//! Each module implements [`Node`](tl_map::Node) for one notation and adds
//! `to_*`/`from_*` helpers that run a full mapping pass:
//!
//! - [`json`]: self-describing token trees on top of `serde_json`;
//! - [`markup`]: element trees whose members may be attributes;
//! - [`rows`]: delimited records with flattened nested members.
//!
//! None of them is special to the engine. Anything that implements the
//! node contract can be mapped to and from any other, including another
//! object graph.
//!
//! ```
//! use tl_formats::{json, markup};
//! use tl_map::Options;
//! use tl_reflect::derive::Reflect;
//!
//! #[derive(Reflect, Default, Debug, PartialEq)]
//! #[reflect(default)]
//! struct Person {
//!     #[reflect(attribute)]
//!     name: String,
//!     age: i32,
//! }
//!
//! let options = Options::default();
//! let person: Person = json::from_str(r#"{"name":"Ed","age":67}"#, &options).unwrap();
//!
//! let text = markup::to_string(&person, &options).unwrap();
//! assert_eq!(text, r#"<Person name="Ed"><age>67</age></Person>"#);
//! ```

// -----------------------------------------------------------------------------
// Modules

pub mod json;
pub mod markup;
pub mod rows;

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tl_map::{Error, GraphNode, Options, Value};
    use tl_reflect::derive::Reflect;

    use crate::{json, markup, rows};

    #[derive(Reflect, Debug, PartialEq, Clone, Copy)]
    enum Level {
        Value1,
        Value2,
    }

    impl Level {
        fn number(self) -> u8 {
            match self {
                Self::Value1 => 1,
                Self::Value2 => 2,
            }
        }
    }

    #[derive(Reflect, Debug, PartialEq)]
    #[reflect(default)]
    struct Choice {
        #[reflect(rename = "Name")]
        name: String,
        #[reflect(rename = "Level")]
        level: Level,
    }

    impl Default for Choice {
        fn default() -> Self {
            Self {
                name: String::new(),
                level: Level::Value1,
            }
        }
    }

    #[test]
    fn scenario_c_enum_names_ignore_case_on_request() {
        let doc = json!({ "Name": "a", "Level": "value2" });

        let lenient = Options::builder().case_sensitive_enums(false).build();
        let choice: Choice = json::from_value(&doc, &lenient).unwrap();
        assert_eq!(choice.level, Level::Value2);

        let err = json::from_value::<Choice>(&doc, &Options::default()).unwrap_err();
        assert!(matches!(err.kind(), Error::ValueParse { .. }));
        assert_eq!(
            err.friendly_message(),
            Some("'value2' is not a valid option, must be one of the following: Value1, Value2.")
        );
    }

    #[test]
    fn conventions_apply_in_every_format() {
        let options = Options::builder()
            .write_value::<Level, _>(|level| Ok(Value::from(level.number())))
            .read_value::<Level, _>(|value| match value.to_string().as_str() {
                "1" => Ok(Level::Value1),
                "2" => Ok(Level::Value2),
                other => Err(format!("no level {other}").into()),
            })
            .build();
        let choice = Choice {
            name: "b".into(),
            level: Level::Value2,
        };

        let doc = json::to_value(&choice, &options).unwrap();
        assert_eq!(doc, json!({ "Name": "b", "Level": 2 }));
        assert_eq!(json::from_value::<Choice>(&doc, &options).unwrap(), choice);

        let element = markup::to_element(&choice, &options).unwrap();
        assert_eq!(
            element.child("Level").and_then(|level| level.text.as_deref()),
            Some("2")
        );
        assert_eq!(markup::from_element::<Choice>(&element, &options).unwrap(), choice);

        let text = rows::to_string(&[choice], &options).unwrap();
        assert_eq!(text, "Name,Level\r\nb,2\r\n");

        let err = rows::from_str::<Choice>("Name,Level\r\nc,9\r\n", &options).unwrap_err();
        assert!(matches!(err.kind(), Error::Reader(_)));
    }

    #[test]
    fn formats_map_onto_each_other() {
        let options = Options::default();
        let doc = json!({ "Name": "x", "Level": "Value1" });

        let mut target = markup::MarkupTarget::new("Choice");
        tl_map::Mapper::serializer(&options)
            .map(&json::JsonNode::source(&doc), &mut target)
            .unwrap();
        let element = target.into_element();
        assert_eq!(element.to_string(), "<Choice><Level>Value1</Level><Name>x</Name></Choice>");

        let choice: Choice = markup::from_element(&element, &options).unwrap();
        let back = json::to_value(&choice, &options).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn object_graphs_copy_through_nodes() {
        let options = Options::default();
        let choice = Choice {
            name: "copy".into(),
            level: Level::Value2,
        };
        let source = GraphNode::source(&choice, &options);
        let copy: Choice = tl_map::deserialize(&source, &options).unwrap();
        assert_eq!(copy, choice);
    }
}

//! Element trees with attributes.
//!
//! [`MarkupSource`] reads an [`Element`], [`MarkupTarget`] builds one.
//! Members flagged `#[reflect(attribute)]` are written as attributes,
//! sequences use the item name of their element type unless the member
//! overrides it with `#[reflect(item_name = "...")]`.
//!
//! There is no text parser: trees are built in code and written out with
//! [`Display`](core::fmt::Display).

// -----------------------------------------------------------------------------
// Modules

mod element;
mod node;

// -----------------------------------------------------------------------------
// Exports

pub use element::Element;
pub use node::{MarkupSource, MarkupTarget};

use tl_map::{Options, Result};
use tl_reflect::Reflect;
use tl_reflect::info::Typed;

// -----------------------------------------------------------------------------
// Helpers

/// Serializes `value` into an element named after its type.
pub fn to_element(value: &dyn Reflect, options: &Options) -> Result<Element> {
    let mut target = MarkupTarget::new(value.reflect_type_ident());
    tl_map::serialize(value, &mut target, options)?;
    Ok(target.into_element())
}

/// Serializes `value` into markup text.
pub fn to_string(value: &dyn Reflect, options: &Options) -> Result<String> {
    to_element(value, options).map(|element| element.to_string())
}

/// Builds a `T` from an element tree.
pub fn from_element<T: Reflect + Typed>(element: &Element, options: &Options) -> Result<T> {
    tl_map::deserialize(&MarkupSource::new(element), options)
}

#[cfg(test)]
mod tests {
    use tl_map::{Error, Node, NodeType, Options};
    use tl_reflect::derive::Reflect;

    use super::{Element, MarkupSource, from_element, to_element, to_string};

    #[derive(Reflect, Default, Debug, PartialEq)]
    #[reflect(default)]
    struct Person {
        #[reflect(rename = "Name")]
        name: String,
        #[reflect(rename = "Age")]
        age: i32,
    }

    #[derive(Reflect, Default, Debug, PartialEq)]
    #[reflect(default)]
    struct Contact {
        #[reflect(attribute)]
        id: u32,
        name: String,
        #[reflect(item_name = "Phone")]
        phones: Vec<String>,
        friends: Vec<Person>,
    }

    fn contact() -> Contact {
        Contact {
            id: 7,
            name: "Ann <A>".into(),
            phones: vec!["555".into(), "556".into()],
            friends: vec![Person {
                name: "Ed".into(),
                age: 67,
            }],
        }
    }

    #[test]
    fn scenario_b_missing_children_keep_defaults() {
        let options = Options::default();
        let person: Person = from_element(&Element::new("Person"), &options).unwrap();
        assert_eq!(person, Person::default());
    }

    #[test]
    fn scenario_b_unexpected_children() {
        let element = Element::new("Person")
            .with_child(Element::new("Name").with_text("Ed"))
            .with_child(Element::new("Unexpected").with_text("x"));

        let lenient: Person = from_element(&element, &Options::default()).unwrap();
        assert_eq!(lenient.name, "Ed");

        let strict = Options::builder().fail_on_unmatched_members(true).build();
        let err = from_element::<Person>(&element, &strict).unwrap_err();
        let Error::UnrecognizedNode { name, .. } = err.kind() else {
            panic!("unexpected error: {err}");
        };
        assert_eq!(name, "Unexpected");
    }

    #[test]
    fn attributes_and_item_names_are_written() {
        let text = to_string(&contact(), &Options::default()).unwrap();
        assert_eq!(
            text,
            "<Contact id=\"7\"><name>Ann &lt;A&gt;</name>\
             <phones><Phone>555</Phone><Phone>556</Phone></phones>\
             <friends><Person><Name>Ed</Name><Age>67</Age></Person></friends></Contact>"
        );
    }

    #[test]
    fn element_trees_round_trip() {
        let options = Options::default();
        let element = to_element(&contact(), &options).unwrap();
        let back: Contact = from_element(&element, &options).unwrap();
        assert_eq!(back, contact());
    }

    #[test]
    fn strict_items_reject_foreign_names() {
        let element = Element::new("Contact").with_child(
            Element::new("phones")
                .with_child(Element::new("Phone").with_text("1"))
                .with_child(Element::new("Fax").with_text("2")),
        );

        let lenient: Contact = from_element(&element, &Options::default()).unwrap();
        assert_eq!(lenient.phones, ["1"]);

        let strict = Options::builder().fail_on_unmatched_items(true).build();
        let err = from_element::<Contact>(&element, &strict).unwrap_err();
        assert!(err.kind().is_unmatched());
        assert_eq!(err.context().unwrap().source.path, "/Contact/phones");
        assert!(err.to_string().contains("`Fax`"));
    }

    #[derive(Reflect, Default, Debug)]
    #[reflect(default)]
    struct Note {
        body: String,
    }

    #[test]
    fn nested_elements_do_not_map_onto_text() {
        let element = Element::new("Note")
            .with_child(Element::new("body").with_child(Element::new("b").with_text("bold")));
        let err = from_element::<Note>(&element, &Options::default()).unwrap_err();

        let Error::NodeTypeMismatch {
            from_type, to_type, ..
        } = err.kind()
        else {
            panic!("unexpected error: {err}");
        };
        assert_eq!((*from_type, *to_type), (NodeType::Object, NodeType::Value));
        assert_eq!(err.context().unwrap().source.path, "/Note/body");

        let plain = Element::new("Note").with_child(Element::new("body").with_text("plain"));
        let note: Note = from_element(&plain, &Options::default()).unwrap();
        assert_eq!(note.body, "plain");
    }

    #[test]
    fn attributes_are_value_children() {
        let element = Element::new("Contact")
            .with_attribute("id", "3")
            .with_child(Element::new("name"));
        let root = MarkupSource::new(&element);
        assert_eq!(root.node_type(), NodeType::Variable);

        let children: Vec<_> = root.children().unwrap().map(Result::unwrap).collect();
        assert_eq!(children[0].path(), "/Contact/@id");
        assert_eq!(children[0].node_type(), NodeType::Value);
        assert_eq!(children[1].path(), "/Contact/name");

        let contact: Contact = from_element(&element, &Options::default()).unwrap();
        assert_eq!((contact.id, contact.name.as_str()), (3, ""));
    }
}

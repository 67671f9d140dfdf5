use core::fmt;

use quick_xml::escape::escape;

// -----------------------------------------------------------------------------
// Element

/// A markup element: a name, attributes, child elements and optional text.
///
/// [`Display`](fmt::Display) writes the element as escaped XML.
///
/// ```
/// use tl_formats::markup::Element;
///
/// let person = Element::new("Person")
///     .with_attribute("id", "7")
///     .with_child(Element::new("Name").with_text("Ed & Co"))
///     .with_child(Element::new("Tags"));
///
/// assert_eq!(
///     person.to_string(),
///     r#"<Person id="7"><Name>Ed &amp; Co</Name><Tags/></Person>"#,
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    pub text: Option<String>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// The value of the first attribute called `name`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// The first child element called `name`.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.text.as_deref().is_none_or(str::is_empty)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for (name, value) in &self.attributes {
            write!(f, " {name}=\"{}\"", escape(value))?;
        }
        if self.is_empty() {
            return f.write_str("/>");
        }

        f.write_str(">")?;
        if let Some(text) = &self.text {
            f.write_str(&escape(text))?;
        }
        for child in &self.children {
            fmt::Display::fmt(child, f)?;
        }
        write!(f, "</{}>", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::Element;

    #[test]
    fn attributes_are_escaped() {
        let element = Element::new("a").with_attribute("title", r#"say "hi" <now>"#);
        assert_eq!(
            element.to_string(),
            r#"<a title="say &quot;hi&quot; &lt;now&gt;"/>"#
        );
    }

    #[test]
    fn text_escapes_every_special_character() {
        let element = Element::new("t").with_text("a & b's <c>");
        assert_eq!(element.to_string(), "<t>a &amp; b&apos;s &lt;c&gt;</t>");
    }

    #[test]
    fn lookups_return_first_match() {
        let element = Element::new("list")
            .with_attribute("k", "1")
            .with_attribute("k", "2")
            .with_child(Element::new("item").with_text("a"))
            .with_child(Element::new("item").with_text("b"));

        assert_eq!(element.attribute("k"), Some("1"));
        assert_eq!(element.child("item").and_then(|c| c.text.as_deref()), Some("a"));
        assert!(element.child("missing").is_none());
        assert!(!element.is_empty());
    }
}

//! XML data model

use indexmap::IndexMap;

/// XML element: tag name, attributes, body text and child elements.
///
/// All text segments of an element are collapsed into `text`; whitespace-only
/// text is `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: IndexMap<String, String>,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// First child with the given tag name
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Element nesting depth; a leaf is 1
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Self::depth).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_lookup() {
        let root = Element::new("root")
            .with_attribute("id", "1")
            .with_child(Element::new("a").with_text("x"))
            .with_child(Element::new("b").with_child(Element::new("c")));

        assert_eq!(root.attributes.get("id").map(String::as_str), Some("1"));
        assert_eq!(root.child("a").and_then(|a| a.text.as_deref()), Some("x"));
        assert!(root.child("missing").is_none());
        assert!(!root.is_leaf());
        assert_eq!(root.depth(), 3);
    }
}

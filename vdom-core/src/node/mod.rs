//! Node Model
//!
//! This module defines the immutable description of a UI tree: the input to
//! reconciliation.
//!
//! # Overview
//!
//! A [`VNode`] is either an element (tag, attributes, ordered children) or a
//! text leaf. Trees are built fresh on every render, compared against the
//! previous render's tree, and dropped afterwards. Reconciliation only ever
//! borrows them.
//!
//! # Children
//!
//! Children are an ordered sequence of *slots*. A slot may be empty
//! (`None`), standing for "no node at this position". Correspondence between
//! an old and a new tree is purely positional: child `i` of the old element
//! is compared with child `i` of the new one, whatever their content.

mod props;

pub use props::{
    event_name, is_custom_prop, is_event_prop, is_removable, AttrValue, EventHandler, Props,
    CLASS_NAME, EVENT_PREFIX, FORCE_UPDATE,
};

/// A node in a virtual tree.
#[derive(Debug, Clone, PartialEq)]
pub enum VNode {
    /// An element with a tag, attributes and children.
    Element(Element),
    /// A text leaf.
    Text(String),
}

impl VNode {
    /// Create a text node.
    pub fn text(content: impl Into<String>) -> Self {
        VNode::Text(content.into())
    }

    /// The element, if this is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            VNode::Element(e) => Some(e),
            VNode::Text(_) => None,
        }
    }

    /// The text content, if this is a text node.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            VNode::Text(t) => Some(t),
            VNode::Element(_) => None,
        }
    }

    /// The element tag, if this is an element.
    pub fn tag(&self) -> Option<&str> {
        self.as_element().map(|e| e.tag.as_str())
    }
}

impl From<Element> for VNode {
    fn from(element: Element) -> Self {
        VNode::Element(element)
    }
}

impl From<&str> for VNode {
    fn from(text: &str) -> Self {
        VNode::text(text)
    }
}

impl From<String> for VNode {
    fn from(text: String) -> Self {
        VNode::Text(text)
    }
}

/// An element node.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// The tag name. Not validated here; the surface rejects bad tags.
    pub tag: String,
    /// Attributes, event handlers and markers.
    pub props: Props,
    /// Ordered child slots. `None` marks an empty position.
    pub children: Vec<Option<VNode>>,
}

impl Element {
    /// Number of child slots, empty ones included.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// The child at `index`, or `None` if the slot is empty or out of range.
    pub fn child(&self, index: usize) -> Option<&VNode> {
        self.children.get(index).and_then(Option::as_ref)
    }
}

/// Build an element node.
///
/// Missing props become an empty map. Children are taken in order; anything
/// convertible into `Option<VNode>` is accepted, so both plain nodes and
/// explicitly empty slots can be passed.
///
/// ```rust,ignore
/// let list = create_element("ul", None, [
///     create_element("li", None, [VNode::text("one")]),
///     create_element("li", None, [VNode::text("two")]),
/// ]);
/// ```
pub fn create_element<I>(tag: impl Into<String>, props: impl Into<Option<Props>>, children: I) -> VNode
where
    I: IntoIterator,
    I::Item: Into<Option<VNode>>,
{
    VNode::Element(Element {
        tag: tag.into(),
        props: props.into().unwrap_or_default(),
        children: children.into_iter().map(Into::into).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_props_default_to_empty() {
        let node = create_element("div", None, Vec::<VNode>::new());
        let el = node.as_element().unwrap();
        assert_eq!(el.tag, "div");
        assert!(el.props.is_empty());
        assert!(el.children.is_empty());
    }

    #[test]
    fn children_keep_order_and_empty_slots() {
        let node = create_element(
            "ul",
            Props::new().with("id", "list"),
            [Some(VNode::text("a")), None, Some(VNode::text("c"))],
        );
        let el = node.as_element().unwrap();
        assert_eq!(el.child_count(), 3);
        assert_eq!(el.child(0).and_then(VNode::as_text), Some("a"));
        assert!(el.child(1).is_none());
        assert_eq!(el.child(2).and_then(VNode::as_text), Some("c"));
        assert!(el.child(3).is_none());
    }

    #[test]
    fn nested_elements() {
        let tree = create_element(
            "div",
            None,
            [create_element("span", None, [VNode::text("hi")])],
        );
        let span = tree.as_element().unwrap().child(0).unwrap();
        assert_eq!(span.tag(), Some("span"));
        assert_eq!(VNode::text("x").tag(), None);
    }
}

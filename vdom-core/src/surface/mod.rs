//! Rendering Surface
//!
//! The surface is the live, mutable tree that reconciliation writes into.
//! The core never owns it; it only drives it through the [`Surface`] trait.
//!
//! # Contract
//!
//! A surface must provide:
//!
//! - creation of element nodes (by tag) and text nodes (by content)
//! - attribute reads, writes and removals
//! - boolean live-property flags that mirror boolean attributes
//! - event-listener registration
//! - positional child operations: append, replace at index, remove at
//!   index, lookup at index, enumeration and count
//!
//! Any primitive may fail. Failures are returned as
//! [`SurfaceError`](crate::SurfaceError) and propagate unchanged through the
//! reconciler; nothing is rolled back.
//!
//! # Exclusive Access
//!
//! Every mutating primitive takes `&mut self`. A reconciliation pass holds
//! that borrow for its whole walk, so two passes can never interleave on the
//! same surface.

mod memory;

pub use memory::{LiveNodeId, MemorySurface, Mutation};

use std::fmt::Debug;

use crate::error::Result;
use crate::node::EventHandler;

/// An event delivered to a registered listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// The event name, e.g. `click`.
    pub kind: String,
    /// Optional payload, e.g. the current value of an input.
    pub value: Option<String>,
}

impl Event {
    /// Create an event without payload.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: None,
        }
    }

    /// Attach a payload.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// The live tree mutated by reconciliation.
pub trait Surface {
    /// Handle to a live node.
    type Node: Clone + PartialEq + Debug;

    /// Create a detached element node.
    fn create_element(&mut self, tag: &str) -> Result<Self::Node>;

    /// Create a detached text node.
    fn create_text(&mut self, text: &str) -> Self::Node;

    /// Set a string attribute.
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str) -> Result<()>;

    /// Read an attribute.
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Remove an attribute. Removing an absent attribute is not an error.
    fn remove_attribute(&mut self, node: &Self::Node, name: &str) -> Result<()>;

    /// Set the boolean live-property flag `name`.
    fn set_flag(&mut self, node: &Self::Node, name: &str, value: bool) -> Result<()>;

    /// Read the boolean live-property flag `name`. Unset flags read `false`.
    fn flag(&self, node: &Self::Node, name: &str) -> bool;

    /// Register a listener for `event`.
    fn add_event_listener(
        &mut self,
        node: &Self::Node,
        event: &str,
        handler: EventHandler,
    ) -> Result<()>;

    /// Append `child` as the last child of `parent`.
    fn append_child(&mut self, parent: &Self::Node, child: Self::Node) -> Result<()>;

    /// Replace the child at `index` with `child`.
    fn replace_child(&mut self, parent: &Self::Node, index: usize, child: Self::Node)
        -> Result<()>;

    /// Remove the child at `index`.
    fn remove_child(&mut self, parent: &Self::Node, index: usize) -> Result<()>;

    /// The child at `index`, if any.
    fn child_at(&self, parent: &Self::Node, index: usize) -> Option<Self::Node>;

    /// Number of children of `parent`.
    fn child_count(&self, parent: &Self::Node) -> usize;

    /// Children of `parent`, in order.
    fn children(&self, parent: &Self::Node) -> Vec<Self::Node> {
        (0..self.child_count(parent))
            .filter_map(|i| self.child_at(parent, i))
            .collect()
    }
}

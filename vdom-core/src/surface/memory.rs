//! In-Memory Surface
//!
//! An arena-backed live tree implementing [`Surface`]. Nodes are addressed
//! by [`LiveNodeId`] and never freed: removed or replaced nodes stay in the
//! arena, detached, so callers can still inspect them after a patch.
//!
//! Every mutation is appended to a log of [`Mutation`] records. The log is
//! what makes "reconciling a tree against itself performs no structural
//! work" checkable, and it can be dumped as JSON for debugging.

use std::collections::HashMap;
use std::fmt::Write as _;

use indexmap::IndexMap;
use serde::Serialize;

use super::{Event, Surface};
use crate::error::{Result, SurfaceError};
use crate::node::EventHandler;

/// Handle to a node in a [`MemorySurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LiveNodeId(u32);

impl LiveNodeId {
    /// Get the raw arena index.
    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// A single recorded surface mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    /// An element node was created.
    CreateElement { node: LiveNodeId, tag: String },
    /// A text node was created.
    CreateText { node: LiveNodeId, text: String },
    /// An attribute was written.
    SetAttribute { node: LiveNodeId, name: String, value: String },
    /// An attribute was removed.
    RemoveAttribute { node: LiveNodeId, name: String },
    /// A boolean live-property flag was written.
    SetFlag { node: LiveNodeId, name: String, value: bool },
    /// An event listener was registered.
    AddListener { node: LiveNodeId, event: String },
    /// A child was appended.
    AppendChild { parent: LiveNodeId, child: LiveNodeId },
    /// The child at `index` was swapped for `new`.
    ReplaceChild { parent: LiveNodeId, index: usize, old: LiveNodeId, new: LiveNodeId },
    /// The child at `index` was detached.
    RemoveChild { parent: LiveNodeId, index: usize, child: LiveNodeId },
}

impl Mutation {
    /// Whether this mutation creates, attaches or detaches nodes.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Mutation::CreateElement { .. }
                | Mutation::CreateText { .. }
                | Mutation::AppendChild { .. }
                | Mutation::ReplaceChild { .. }
                | Mutation::RemoveChild { .. }
        )
    }
}

#[derive(Debug)]
enum LiveData {
    Element {
        tag: String,
        attributes: IndexMap<String, String>,
        flags: HashMap<String, bool>,
        listeners: Vec<(String, EventHandler)>,
    },
    Text(String),
}

#[derive(Debug)]
struct LiveNode {
    data: LiveData,
    parent: Option<LiveNodeId>,
    children: Vec<LiveNodeId>,
}

/// Arena-based live tree with a mutation log.
#[derive(Debug)]
pub struct MemorySurface {
    nodes: Vec<LiveNode>,
    root: LiveNodeId,
    log: Vec<Mutation>,
}

impl MemorySurface {
    /// Create a surface holding a single empty root element.
    ///
    /// The root's creation is not logged.
    pub fn new() -> Self {
        let root = LiveNode {
            data: LiveData::Element {
                tag: "root".to_string(),
                attributes: IndexMap::new(),
                flags: HashMap::new(),
                listeners: Vec::new(),
            },
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            root: LiveNodeId(0),
            log: Vec::new(),
        }
    }

    /// The mount point every surface starts with.
    pub fn root(&self) -> LiveNodeId {
        self.root
    }

    /// Number of nodes ever created, detached ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds only the root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// The mutations recorded so far.
    pub fn mutations(&self) -> &[Mutation] {
        &self.log
    }

    /// Drain the mutation log.
    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.log)
    }

    /// The mutation log as pretty-printed JSON.
    pub fn mutations_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.log)?)
    }

    /// The tag of an element node.
    pub fn tag(&self, node: LiveNodeId) -> Option<&str> {
        match &self.get(node).ok()?.data {
            LiveData::Element { tag, .. } => Some(tag.as_str()),
            LiveData::Text(_) => None,
        }
    }

    /// The content of a text node.
    pub fn text(&self, node: LiveNodeId) -> Option<&str> {
        match &self.get(node).ok()?.data {
            LiveData::Text(t) => Some(t.as_str()),
            LiveData::Element { .. } => None,
        }
    }

    /// The parent of an attached node.
    pub fn parent(&self, node: LiveNodeId) -> Option<LiveNodeId> {
        self.get(node).ok()?.parent
    }

    /// Number of listeners registered on a node.
    pub fn listener_count(&self, node: LiveNodeId) -> usize {
        match self.get(node).map(|n| &n.data) {
            Ok(LiveData::Element { listeners, .. }) => listeners.len(),
            _ => 0,
        }
    }

    /// Deliver `event` to the listeners registered on `node` for its kind.
    ///
    /// Returns how many listeners ran. Events do not bubble.
    pub fn dispatch(&self, node: LiveNodeId, event: &Event) -> Result<usize> {
        let LiveData::Element { listeners, .. } = &self.get(node)?.data else {
            return Err(SurfaceError::NotAnElement);
        };
        let mut fired = 0;
        for (kind, handler) in listeners {
            if *kind == event.kind {
                handler.call(event);
                fired += 1;
            }
        }
        Ok(fired)
    }

    /// Serialize the subtree rooted at `node` to markup.
    ///
    /// Attributes appear in the order they were first written.
    pub fn to_markup(&self, node: LiveNodeId) -> String {
        let mut out = String::new();
        self.write_markup(node, &mut out);
        out
    }

    /// Serialize the children of `node` to markup, without `node` itself.
    pub fn inner_markup(&self, node: LiveNodeId) -> String {
        let mut out = String::new();
        if let Ok(n) = self.get(node) {
            for &child in &n.children {
                self.write_markup(child, &mut out);
            }
        }
        out
    }

    fn write_markup(&self, node: LiveNodeId, out: &mut String) {
        let Ok(n) = self.get(node) else {
            return;
        };
        match &n.data {
            LiveData::Text(t) => out.push_str(&escape(t)),
            LiveData::Element { tag, attributes, .. } => {
                let _ = write!(out, "<{tag}");
                for (name, value) in attributes {
                    let _ = write!(out, " {name}=\"{}\"", escape(value));
                }
                out.push('>');
                for &child in &n.children {
                    self.write_markup(child, out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }

    fn get(&self, node: LiveNodeId) -> Result<&LiveNode> {
        self.nodes
            .get(node.0 as usize)
            .ok_or(SurfaceError::UnknownNode)
    }

    fn get_mut(&mut self, node: LiveNodeId) -> Result<&mut LiveNode> {
        self.nodes
            .get_mut(node.0 as usize)
            .ok_or(SurfaceError::UnknownNode)
    }

    fn element_mut(&mut self, node: LiveNodeId) -> Result<&mut LiveData> {
        let data = &mut self.get_mut(node)?.data;
        if matches!(*data, LiveData::Text(_)) {
            return Err(SurfaceError::NotAnElement);
        }
        Ok(data)
    }

    fn push(&mut self, data: LiveData) -> LiveNodeId {
        let id = LiveNodeId(self.nodes.len() as u32);
        self.nodes.push(LiveNode {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Detach `child` from its current parent, if it has one.
    fn detach(&mut self, child: LiveNodeId) -> Result<()> {
        if let Some(parent) = self.get(child)?.parent {
            self.get_mut(parent)?.children.retain(|&c| c != child);
            self.get_mut(child)?.parent = None;
        }
        Ok(())
    }

    fn require_parent(&self, parent: LiveNodeId) -> Result<&LiveNode> {
        let node = self.get(parent)?;
        match node.data {
            LiveData::Element { .. } => Ok(node),
            LiveData::Text(_) => Err(SurfaceError::NotAnElement),
        }
    }

    fn child_index_check(&self, parent: LiveNodeId, index: usize) -> Result<LiveNodeId> {
        let children = &self.require_parent(parent)?.children;
        children.get(index).copied().ok_or(SurfaceError::MissingChild {
            index,
            len: children.len(),
        })
    }
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

/// DOM-style tag check: a leading ASCII letter, then no whitespace, control
/// or markup characters.
fn valid_tag(tag: &str) -> bool {
    let mut chars = tag.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| !c.is_whitespace() && !c.is_control() && !matches!(c, '<' | '>' | '/' | '"' | '\'' | '='))
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl Surface for MemorySurface {
    type Node = LiveNodeId;

    fn create_element(&mut self, tag: &str) -> Result<LiveNodeId> {
        if !valid_tag(tag) {
            return Err(SurfaceError::InvalidTag(tag.to_string()));
        }
        let node = self.push(LiveData::Element {
            tag: tag.to_string(),
            attributes: IndexMap::new(),
            flags: HashMap::new(),
            listeners: Vec::new(),
        });
        self.log.push(Mutation::CreateElement {
            node,
            tag: tag.to_string(),
        });
        Ok(node)
    }

    fn create_text(&mut self, text: &str) -> LiveNodeId {
        let node = self.push(LiveData::Text(text.to_string()));
        self.log.push(Mutation::CreateText {
            node,
            text: text.to_string(),
        });
        node
    }

    fn set_attribute(&mut self, node: &LiveNodeId, name: &str, value: &str) -> Result<()> {
        if let LiveData::Element { attributes, .. } = self.element_mut(*node)? {
            attributes.insert(name.to_string(), value.to_string());
        }
        self.log.push(Mutation::SetAttribute {
            node: *node,
            name: name.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn attribute(&self, node: &LiveNodeId, name: &str) -> Option<String> {
        match &self.get(*node).ok()?.data {
            LiveData::Element { attributes, .. } => attributes.get(name).cloned(),
            LiveData::Text(_) => None,
        }
    }

    fn remove_attribute(&mut self, node: &LiveNodeId, name: &str) -> Result<()> {
        if let LiveData::Element { attributes, .. } = self.element_mut(*node)? {
            attributes.shift_remove(name);
        }
        self.log.push(Mutation::RemoveAttribute {
            node: *node,
            name: name.to_string(),
        });
        Ok(())
    }

    fn set_flag(&mut self, node: &LiveNodeId, name: &str, value: bool) -> Result<()> {
        if let LiveData::Element { flags, .. } = self.element_mut(*node)? {
            flags.insert(name.to_string(), value);
        }
        self.log.push(Mutation::SetFlag {
            node: *node,
            name: name.to_string(),
            value,
        });
        Ok(())
    }

    fn flag(&self, node: &LiveNodeId, name: &str) -> bool {
        match self.get(*node).map(|n| &n.data) {
            Ok(LiveData::Element { flags, .. }) => flags.get(name).copied().unwrap_or(false),
            _ => false,
        }
    }

    fn add_event_listener(
        &mut self,
        node: &LiveNodeId,
        event: &str,
        handler: EventHandler,
    ) -> Result<()> {
        if let LiveData::Element { listeners, .. } = self.element_mut(*node)? {
            listeners.push((event.to_string(), handler));
        }
        self.log.push(Mutation::AddListener {
            node: *node,
            event: event.to_string(),
        });
        Ok(())
    }

    fn append_child(&mut self, parent: &LiveNodeId, child: LiveNodeId) -> Result<()> {
        self.require_parent(*parent)?;
        self.detach(child)?;
        self.get_mut(*parent)?.children.push(child);
        self.get_mut(child)?.parent = Some(*parent);
        self.log.push(Mutation::AppendChild {
            parent: *parent,
            child,
        });
        Ok(())
    }

    fn replace_child(&mut self, parent: &LiveNodeId, index: usize, child: LiveNodeId) -> Result<()> {
        let old = self.child_index_check(*parent, index)?;
        if old == child {
            return Ok(());
        }
        self.detach(child)?;
        // `child` may have been an earlier sibling, so locate `old` again.
        let pos = self
            .get(*parent)?
            .children
            .iter()
            .position(|&c| c == old)
            .ok_or(SurfaceError::UnknownNode)?;
        self.get_mut(*parent)?.children[pos] = child;
        self.get_mut(child)?.parent = Some(*parent);
        self.get_mut(old)?.parent = None;
        self.log.push(Mutation::ReplaceChild {
            parent: *parent,
            index,
            old,
            new: child,
        });
        Ok(())
    }

    fn remove_child(&mut self, parent: &LiveNodeId, index: usize) -> Result<()> {
        let child = self.child_index_check(*parent, index)?;
        self.get_mut(*parent)?.children.remove(index);
        self.get_mut(child)?.parent = None;
        self.log.push(Mutation::RemoveChild {
            parent: *parent,
            index,
            child,
        });
        Ok(())
    }

    fn child_at(&self, parent: &LiveNodeId, index: usize) -> Option<LiveNodeId> {
        self.get(*parent).ok()?.children.get(index).copied()
    }

    fn child_count(&self, parent: &LiveNodeId) -> usize {
        self.get(*parent).map_or(0, |n| n.children.len())
    }

    fn children(&self, parent: &LiveNodeId) -> Vec<LiveNodeId> {
        self.get(*parent).map_or_else(|_| Vec::new(), |n| n.children.clone())
    }
}

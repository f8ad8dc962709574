//! Attribute Reconciler
//!
//! Converges the attributes of one live element from an old attribute map to
//! a new one.
//!
//! # Algorithm
//!
//! 1. Take the union of names in the new and old maps (new names first).
//! 2. For each name, plan a short list of [`AttrOp`]s:
//!    - new value removable (absent, `false`, `""`, `0`) => remove
//!    - no old value, or old value differs => (re)apply
//!    - otherwise => nothing
//! 3. Apply the planned operations to the surface in order.
//!
//! Planning is a pure function of the attribute's [`AttrKind`] and its old
//! and new values. The same classification drives both the apply and the
//! remove path.

use indexmap::IndexSet;
use smallvec::{smallvec, SmallVec};

use crate::error::Result;
use crate::node::{event_name, is_custom_prop, is_event_prop, AttrValue, Props, CLASS_NAME};
use crate::surface::Surface;

/// Name of the surface attribute that `className` maps to.
const CLASS_ATTR: &str = "class";

/// How an attribute name is handled on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind {
    /// Event handlers and the replacement marker. Never written.
    Custom,
    /// `className`, written as `class`.
    ClassAlias,
    /// A boolean value: attribute plus live-property flag.
    Boolean,
    /// Anything else: a plain string attribute.
    Generic,
}

impl AttrKind {
    /// Classify an attribute by name and, for booleans, by value.
    pub fn classify(name: &str, value: Option<&AttrValue>) -> Self {
        if is_custom_prop(name) {
            AttrKind::Custom
        } else if name == CLASS_NAME {
            AttrKind::ClassAlias
        } else if value.is_some_and(AttrValue::is_bool) {
            AttrKind::Boolean
        } else {
            AttrKind::Generic
        }
    }
}

/// A single planned surface operation on one live element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrOp<'a> {
    /// Write a string attribute.
    Set { name: &'a str, value: String },
    /// Remove an attribute.
    Remove { name: &'a str },
    /// Write a boolean live-property flag.
    SetFlag { name: &'a str, value: bool },
}

/// Planned operations for one attribute. Never more than two.
pub type AttrOps<'a> = SmallVec<[AttrOp<'a>; 2]>;

/// Operations that apply `value` under `name`.
pub fn set_ops<'a>(name: &'a str, value: &AttrValue) -> AttrOps<'a> {
    match AttrKind::classify(name, Some(value)) {
        AttrKind::Custom => SmallVec::new(),
        AttrKind::ClassAlias => value
            .to_attr_string()
            .map(|value| AttrOp::Set { name: CLASS_ATTR, value })
            .into_iter()
            .collect(),
        AttrKind::Boolean => {
            if value.is_removable() {
                smallvec![AttrOp::SetFlag { name, value: false }]
            } else {
                smallvec![
                    AttrOp::Set { name, value: "true".to_string() },
                    AttrOp::SetFlag { name, value: true },
                ]
            }
        }
        AttrKind::Generic => value
            .to_attr_string()
            .map(|value| AttrOp::Set { name, value })
            .into_iter()
            .collect(),
    }
}

/// Operations that remove `name`, classified by the value it had.
pub fn remove_ops<'a>(name: &'a str, previous: Option<&AttrValue>) -> AttrOps<'a> {
    match AttrKind::classify(name, previous) {
        AttrKind::Custom => SmallVec::new(),
        AttrKind::ClassAlias => smallvec![AttrOp::Remove { name: CLASS_ATTR }],
        AttrKind::Boolean => smallvec![
            AttrOp::Remove { name },
            AttrOp::SetFlag { name, value: false },
        ],
        AttrKind::Generic => smallvec![AttrOp::Remove { name }],
    }
}

/// Operations that take `name` from `old` to `new`.
///
/// A removal is classified by the old value when there was one, otherwise
/// by the new value, so an explicit `false` still clears the flag. With no
/// old value that means a new `false` emits a `Remove` plus a
/// `SetFlag(false)` even though nothing was ever set.
pub fn plan_update<'a>(
    name: &'a str,
    new: Option<&AttrValue>,
    old: Option<&AttrValue>,
) -> AttrOps<'a> {
    match new {
        Some(value) if !value.is_removable() => {
            let stale = old.map_or(true, |previous| previous.is_removable() || previous != value);
            if stale {
                set_ops(name, value)
            } else {
                SmallVec::new()
            }
        }
        _ => remove_ops(name, old.or(new)),
    }
}

/// Execute planned operations against a live element.
pub fn apply_ops<S: Surface>(surface: &mut S, node: &S::Node, ops: &[AttrOp<'_>]) -> Result<()> {
    for op in ops {
        match op {
            AttrOp::Set { name, value } => surface.set_attribute(node, name, value)?,
            AttrOp::Remove { name } => surface.remove_attribute(node, name)?,
            AttrOp::SetFlag { name, value } => surface.set_flag(node, name, *value)?,
        }
    }
    Ok(())
}

/// Apply a single attribute.
pub fn set_prop<S: Surface>(surface: &mut S, node: &S::Node, name: &str, value: &AttrValue) -> Result<()> {
    apply_ops(surface, node, &set_ops(name, value))
}

/// Remove a single attribute that previously held `previous`.
pub fn remove_prop<S: Surface>(
    surface: &mut S,
    node: &S::Node,
    name: &str,
    previous: Option<&AttrValue>,
) -> Result<()> {
    apply_ops(surface, node, &remove_ops(name, previous))
}

/// Reconcile a single attribute.
pub fn update_prop<S: Surface>(
    surface: &mut S,
    node: &S::Node,
    name: &str,
    new: Option<&AttrValue>,
    old: Option<&AttrValue>,
) -> Result<()> {
    apply_ops(surface, node, &plan_update(name, new, old))
}

/// Apply every attribute of a freshly created element.
pub fn set_props<S: Surface>(surface: &mut S, node: &S::Node, props: &Props) -> Result<()> {
    for (name, value) in props.iter() {
        set_prop(surface, node, name, value)?;
    }
    Ok(())
}

/// Register every event-handler prop as a listener.
///
/// `onClick` registers a `click` listener. Event props whose value is not a
/// handler are ignored.
pub fn add_event_listeners<S: Surface>(surface: &mut S, node: &S::Node, props: &Props) -> Result<()> {
    for (name, value) in props.iter() {
        if !is_event_prop(name) {
            continue;
        }
        if let Some(handler) = value.as_handler() {
            surface.add_event_listener(node, &event_name(name), handler.clone())?;
        }
    }
    Ok(())
}

/// Converge the attributes of `node` from `old` to `new`.
///
/// Listeners are not touched: handlers are registered only when a node is
/// created.
pub fn update_props<S: Surface>(surface: &mut S, node: &S::Node, new: &Props, old: &Props) -> Result<()> {
    let names: IndexSet<&str> = new.names().chain(old.names()).collect();
    for name in names {
        update_prop(surface, node, name, new.get(name), old.get(name))?;
    }
    Ok(())
}

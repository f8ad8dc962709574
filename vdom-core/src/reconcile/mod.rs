//! Reconciliation
//!
//! This module turns the difference between two virtual trees into surface
//! mutations.
//!
//! # Overview
//!
//! - [`changed`] decides whether a position needs a full replacement.
//! - The attribute reconciler ([`update_props`] and friends) patches the
//!   attributes of a live element in place.
//! - [`create_surface_node`] builds new live subtrees for insertions and
//!   replacements.
//! - [`update_element`] drives the recursive walk.
//!
//! # Design Decisions
//!
//! 1. The engine is a set of free functions. It keeps no state between
//!    calls; the surface and both trees are explicit parameters.
//!
//! 2. The walk is synchronous and runs to completion. It needs `&mut` access
//!    to the surface for its whole duration.
//!
//! 3. Correspondence is positional. There are no keys.

mod attrs;
mod tree;

pub use attrs::{
    add_event_listeners, apply_ops, plan_update, remove_ops, remove_prop, set_ops, set_prop, set_props,
    update_prop, update_props, AttrKind, AttrOp, AttrOps,
};
pub use tree::{changed, clear_element, create_surface_node, mount, update_element};

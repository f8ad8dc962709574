//! VDOM Core
//!
//! This crate provides a minimal virtual DOM. It implements:
//!
//! - An immutable node model (elements, text leaves) and its factory
//! - A change predicate deciding replace vs. patch
//! - An attribute reconciler driven by a closed classification table
//! - A positional tree reconciler that mutates a live surface in place
//! - A thin component wrapper with deferred re-renders
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `node`: Node model, attribute values and the element factory
//! - `surface`: The live-tree contract and an in-memory implementation
//! - `reconcile`: Change detection, attribute patching and the tree walk
//! - `component`: State ownership and scheduled re-rendering
//! - `config`: Mount configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use vdom_core::{create_element, update_element, MemorySurface, Props, VNode};
//!
//! let mut surface = MemorySurface::new();
//! let root = surface.root();
//!
//! let old = create_element("div", Props::new().with("className", "a"), [VNode::text("hi")]);
//! let new = create_element("div", Props::new().with("className", "b"), [VNode::text("hi")]);
//!
//! update_element(&mut surface, &root, Some(&old), None, 0)?;
//! update_element(&mut surface, &root, Some(&new), Some(&old), 0)?;
//! // The same live <div> now has class="b".
//! ```

pub mod component;
pub mod config;
pub mod node;
pub mod reconcile;
pub mod surface;

mod error;

pub use component::{Component, Mounted, SceneHook};
pub use config::MountConfig;
pub use error::{Result, SurfaceError};
pub use node::{create_element, AttrValue, Element, EventHandler, Props, VNode};
pub use reconcile::{changed, create_surface_node, update_element, update_props};
pub use surface::{Event, LiveNodeId, MemorySurface, Mutation, Surface};

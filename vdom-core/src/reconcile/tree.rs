//! Tree Reconciler
//!
//! Walks an old and a new virtual tree in lockstep and mutates the live
//! surface until it matches the new tree.
//!
//! # Algorithm
//!
//! For one position (a parent live node and a child index), the first
//! matching rule wins:
//!
//! 1. No old node => create the new subtree and append it to the parent.
//! 2. No new node => remove the live child at the index.
//! 3. [`changed`] => create the new subtree and replace the live child.
//! 4. Both elements => patch attributes in place on the live child, then
//!    recurse into every child position up to the longer of the two child
//!    lists.
//! 5. Both equal text => nothing.
//!
//! Mutations happen during the walk: depth-first, parent before children,
//! left to right.
//!
//! # Positional Correspondence
//!
//! Old and new children are paired by slot index, never by identity.
//! Removing the first of three similar children patches the first two live
//! nodes with the contents of the old second and third and deletes the last
//! one. Moves are never detected.
//!
//! The live index handed to a child position counts the old live nodes that
//! precede it and are still attached. It equals the slot index except after
//! a deletion or an empty old slot in the same child list, which keeps
//! trailing deletions and patches aimed at the right live node.

use tracing::{debug_span, trace};

use super::attrs::{add_event_listeners, set_props, update_props};
use crate::error::{Result, SurfaceError};
use crate::node::VNode;
use crate::surface::Surface;

/// Whether `new` must replace `old` instead of being patched into it.
///
/// True when the two nodes have different shapes (text vs element), when two
/// texts differ, when two element tags differ, or when the new element
/// carries a truthy `forceUpdate` marker. Attribute differences alone never
/// force a replacement.
pub fn changed(new: &VNode, old: &VNode) -> bool {
    match (new, old) {
        (VNode::Text(a), VNode::Text(b)) => a != b,
        (VNode::Element(a), VNode::Element(b)) => a.tag != b.tag || a.props.forces_update(),
        _ => true,
    }
}

/// Build a detached live subtree for `node`.
///
/// Elements get their attributes applied, their event props registered as
/// listeners, and a live child appended for every non-empty child slot, in
/// order. Existing live nodes are never touched.
pub fn create_surface_node<S: Surface>(surface: &mut S, node: &VNode) -> Result<S::Node> {
    let element = match node {
        VNode::Text(text) => return Ok(surface.create_text(text)),
        VNode::Element(element) => element,
    };

    let live = surface.create_element(&element.tag)?;
    set_props(surface, &live, &element.props)?;
    add_event_listeners(surface, &live, &element.props)?;
    for child in element.children.iter().flatten() {
        let child = create_surface_node(surface, child)?;
        surface.append_child(&live, child)?;
    }
    Ok(live)
}

/// Reconcile the live child of `parent` at `index` from `old` to `new`.
///
/// Pass `old = None` for an initial render and `new = None` to remove a
/// rendered node. When both are `None` nothing happens.
///
/// Children are paired by slot position, but the live index used for a
/// child is the number of old live children before it that are still
/// attached, not the raw slot position. The two only differ after a removal
/// or an empty old slot earlier in the same list.
///
/// Errors from the surface are returned as soon as they occur; mutations
/// already applied stay applied.
pub fn update_element<S: Surface>(
    surface: &mut S,
    parent: &S::Node,
    new: Option<&VNode>,
    old: Option<&VNode>,
    index: usize,
) -> Result<()> {
    let _span = debug_span!("reconcile", index).entered();
    walk(surface, parent, new, old, index)
}

/// Render `node` as the last child of `parent`.
pub fn mount<S: Surface>(surface: &mut S, parent: &S::Node, node: &VNode) -> Result<()> {
    update_element(surface, parent, Some(node), None, 0)
}

/// Remove every live child of `node`.
pub fn clear_element<S: Surface>(surface: &mut S, node: &S::Node) -> Result<()> {
    while surface.child_count(node) > 0 {
        surface.remove_child(node, 0)?;
    }
    Ok(())
}

fn walk<S: Surface>(
    surface: &mut S,
    parent: &S::Node,
    new: Option<&VNode>,
    old: Option<&VNode>,
    index: usize,
) -> Result<()> {
    let (new, old) = match (new, old) {
        (None, None) => return Ok(()),
        (Some(new), None) => {
            trace!(index, "insert");
            let live = create_surface_node(surface, new)?;
            return surface.append_child(parent, live);
        }
        (None, Some(_)) => {
            trace!(index, "remove");
            return surface.remove_child(parent, index);
        }
        (Some(new), Some(old)) => (new, old),
    };

    if changed(new, old) {
        trace!(index, "replace");
        let live = create_surface_node(surface, new)?;
        return surface.replace_child(parent, index, live);
    }

    let (VNode::Element(new), VNode::Element(old)) = (new, old) else {
        // Equal text.
        return Ok(());
    };

    let live = surface
        .child_at(parent, index)
        .ok_or_else(|| SurfaceError::MissingChild {
            index,
            len: surface.child_count(parent),
        })?;

    trace!(index, tag = %new.tag, "patch");
    update_props(surface, &live, &new.props, &old.props)?;

    let mut live_index = 0;
    for i in 0..new.child_count().max(old.child_count()) {
        let (new_child, old_child) = (new.child(i), old.child(i));
        walk(surface, &live, new_child, old_child, live_index)?;
        if new_child.is_some() && old_child.is_some() {
            live_index += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{create_element, Props, FORCE_UPDATE};
    use crate::surface::{MemorySurface, Mutation};

    fn li(text: &str) -> VNode {
        create_element("li", None, [VNode::text(text)])
    }

    #[test]
    fn changed_predicate() {
        let div = create_element("div", None, Vec::<VNode>::new());
        let span = create_element("span", None, Vec::<VNode>::new());
        let text = VNode::text("a");

        assert!(!changed(&div, &div.clone()));
        assert!(changed(&div, &span));
        assert!(changed(&text, &div));
        assert!(changed(&div, &text));
        assert!(changed(&VNode::text("b"), &text));
        assert!(!changed(&VNode::text("a"), &text));

        let a = create_element("div", Props::new().with("id", "a"), Vec::<VNode>::new());
        let b = create_element("div", Props::new().with("id", "b"), Vec::<VNode>::new());
        assert!(!changed(&a, &b));

        let forced = create_element("div", Props::new().with(FORCE_UPDATE, true), Vec::<VNode>::new());
        assert!(changed(&forced, &div));
        assert!(!changed(&div, &forced));
    }

    #[test]
    fn create_builds_whole_subtree() {
        let mut surface = MemorySurface::new();
        let tree = create_element(
            "ul",
            Props::new().with("className", "list"),
            [Some(li("a")), None, Some(li("b"))],
        );
        let live = create_surface_node(&mut surface, &tree).unwrap();

        assert_eq!(
            surface.to_markup(live),
            "<ul class=\"list\"><li>a</li><li>b</li></ul>"
        );
        assert_eq!(surface.parent(live), None);
    }

    #[test]
    fn invalid_tag_propagates() {
        let mut surface = MemorySurface::new();
        let root = surface.root();
        let tree = create_element("div", None, [create_element("not a tag", None, Vec::<VNode>::new())]);
        let err = mount(&mut surface, &root, &tree).unwrap_err();
        assert!(matches!(err, SurfaceError::InvalidTag(_)));
    }

    #[test]
    fn fault_midway_keeps_earlier_mutations() {
        let mut surface = MemorySurface::new();
        let root = surface.root();
        let p = |id: &str| create_element("p", Props::new().with("id", id), Vec::<VNode>::new());
        let old = create_element("div", None, [p("a"), p("c")]);
        let new = create_element(
            "div",
            None,
            [p("b"), create_element("not a tag", None, Vec::<VNode>::new())],
        );
        mount(&mut surface, &root, &old).unwrap();
        let div = surface.child_at(&root, 0).unwrap();
        let first = surface.child_at(&div, 0).unwrap();

        let err = update_element(&mut surface, &root, Some(&new), Some(&old), 0).unwrap_err();

        assert!(matches!(err, SurfaceError::InvalidTag(_)));
        assert_eq!(surface.attribute(&first, "id").as_deref(), Some("b"));
        assert_eq!(surface.inner_markup(div), "<p id=\"b\"></p><p id=\"c\"></p>");
    }

    #[test]
    fn both_absent_is_noop() {
        let mut surface = MemorySurface::new();
        let root = surface.root();
        update_element(&mut surface, &root, None, None, 0).unwrap();
        assert!(surface.mutations().is_empty());
    }

    #[test]
    fn shrinking_list_removes_every_trailing_child() {
        let mut surface = MemorySurface::new();
        let root = surface.root();
        let old = create_element("ul", None, [li("1"), li("2"), li("3"), li("4")]);
        let new = create_element("ul", None, [li("1")]);
        mount(&mut surface, &root, &old).unwrap();
        surface.take_mutations();

        update_element(&mut surface, &root, Some(&new), Some(&old), 0).unwrap();

        assert_eq!(surface.inner_markup(root), "<ul><li>1</li></ul>");
        let removals = surface
            .mutations()
            .iter()
            .filter(|m| matches!(m, Mutation::RemoveChild { .. }))
            .count();
        assert_eq!(removals, 3);
    }

    #[test]
    fn empty_old_slot_keeps_live_positions_aligned() {
        let mut surface = MemorySurface::new();
        let root = surface.root();
        let old = create_element("p", None, [None, Some(VNode::text("b"))]);
        let new = create_element("p", None, [Some(VNode::text("a")), Some(VNode::text("b"))]);
        mount(&mut surface, &root, &old).unwrap();
        surface.take_mutations();

        update_element(&mut surface, &root, Some(&new), Some(&old), 0).unwrap();

        // The insertion appends; the unchanged text is left alone.
        assert_eq!(surface.inner_markup(root), "<p>ba</p>");
        assert!(!surface
            .mutations()
            .iter()
            .any(|m| matches!(m, Mutation::ReplaceChild { .. } | Mutation::RemoveChild { .. })));
    }

    #[test]
    fn patch_without_live_child_fails() {
        let mut surface = MemorySurface::new();
        let root = surface.root();
        let old = create_element("div", None, Vec::<VNode>::new());
        let new = create_element("div", Props::new().with("id", "x"), Vec::<VNode>::new());

        let err = update_element(&mut surface, &root, Some(&new), Some(&old), 0).unwrap_err();
        assert!(matches!(err, SurfaceError::MissingChild { index: 0, len: 0 }));
    }

    #[test]
    fn clear_removes_all_children() {
        let mut surface = MemorySurface::new();
        let root = surface.root();
        mount(&mut surface, &root, &li("a")).unwrap();
        mount(&mut surface, &root, &li("b")).unwrap();
        assert_eq!(surface.child_count(&root), 2);

        clear_element(&mut surface, &root).unwrap();
        assert_eq!(surface.child_count(&root), 0);
    }
}

//! Generic operations over the node tree.
//!
//! Every structural edit above this module goes through these primitives.
//! "Find parent" is a search rather than a stored pointer; the tree has no
//! back-references, so cycles are impossible by construction and `move_node`
//! only has to reject re-parenting into a node's own subtree.

use crate::id_generator::new_id;
use crate::model::EmailNode;

/// Depth-first search for a node by id. First match wins; ids are unique so
/// the order is unobservable.
pub fn find_node<'a>(root: &'a EmailNode, id: &str) -> Option<&'a EmailNode> {
    if root.id == id {
        return Some(root);
    }
    root.children.iter().find_map(|child| find_node(child, id))
}

/// Mutable variant of [`find_node`].
pub fn find_node_mut<'a>(root: &'a mut EmailNode, id: &str) -> Option<&'a mut EmailNode> {
    if root.id == id {
        return Some(root);
    }
    root.children
        .iter_mut()
        .find_map(|child| find_node_mut(child, id))
}

/// Find the container whose `children` directly holds the node with `id`.
/// `None` if `id` is the root or absent.
pub fn find_parent<'a>(root: &'a EmailNode, id: &str) -> Option<&'a EmailNode> {
    if root.children.iter().any(|c| c.id == id) {
        return Some(root);
    }
    root.children.iter().find_map(|child| find_parent(child, id))
}

/// Mutable variant of [`find_parent`].
pub fn find_parent_mut<'a>(root: &'a mut EmailNode, id: &str) -> Option<&'a mut EmailNode> {
    if root.children.iter().any(|c| c.id == id) {
        return Some(root);
    }
    root.children
        .iter_mut()
        .find_map(|child| find_parent_mut(child, id))
}

/// Splice the node with `id` out of its parent and return it. `None` if the
/// id is the root or absent. Sibling order is otherwise untouched.
pub fn detach_node(root: &mut EmailNode, id: &str) -> Option<EmailNode> {
    let parent = find_parent_mut(root, id)?;
    let index = parent.children.iter().position(|c| c.id == id)?;
    Some(parent.children.remove(index))
}

/// Remove the node with `id`. Reports whether anything was removed; removing
/// the root is a no-op.
pub fn remove_node(root: &mut EmailNode, id: &str) -> bool {
    detach_node(root, id).is_some()
}

/// Re-parent the node with `id` under `new_parent_id` at `new_index`
/// (clamped after removal). No-op returning `false` when the node or the
/// new parent is missing, or when the new parent is the node itself or one
/// of its descendants.
pub fn move_node(root: &mut EmailNode, id: &str, new_parent_id: &str, new_index: usize) -> bool {
    let Some(node) = find_node(root, id) else {
        return false;
    };
    // The target must exist and must not sit inside the moved subtree.
    if find_node(node, new_parent_id).is_some() {
        return false;
    }
    if find_node(root, new_parent_id).is_none() {
        return false;
    }

    let Some(detached) = detach_node(root, id) else {
        return false;
    };
    match find_node_mut(root, new_parent_id) {
        Some(parent) => {
            let index = new_index.min(parent.children.len());
            parent.children.insert(index, detached);
            true
        }
        // Unreachable: existence was checked before detaching and the
        // target is outside the detached subtree.
        None => false,
    }
}

/// Deep copy of a subtree with brand-new identifiers at every level.
/// Attributes, content, condition and child order are preserved; nothing is
/// shared with the original.
pub fn clone_subtree(node: &EmailNode) -> EmailNode {
    EmailNode {
        id: new_id(),
        kind: node.kind,
        attributes: node.attributes.clone(),
        children: node.children.iter().map(clone_subtree).collect(),
        html_content: node.html_content.clone(),
        condition: node.condition.clone(),
    }
}

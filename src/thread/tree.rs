//! Branching message tree.
//!
//! Every message position can hold alternate versions (branches): editing a
//! user message or regenerating an assistant reply inserts a sibling rather
//! than overwriting. The visible thread is the path from the active root
//! following each node's active child, so switching a branch restores that
//! branch's own downstream messages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub type MessageId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageNode {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub parent: Option<MessageId>,
    pub children: Vec<MessageId>,
    /// Index into `children` of the branch currently shown below this node.
    pub active_child: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MessageTree {
    nodes: BTreeMap<MessageId, MessageNode>,
    roots: Vec<MessageId>,
    active_root: usize,
    next_id: MessageId,
}

impl MessageTree {
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn get(&self, id: MessageId) -> Option<&MessageNode> {
        self.nodes.get(&id)
    }

    pub fn content(&self, id: MessageId) -> Option<&str> {
        self.nodes.get(&id).map(|n| n.content.as_str())
    }

    /// Inserts a message below `parent` (or as a root) and selects it.
    ///
    /// Inserting under a parent that already has children creates a new
    /// branch at that position.
    pub fn insert(&mut self, parent: Option<MessageId>, role: Role, content: String) -> MessageId {
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(
            id,
            MessageNode {
                id,
                role,
                content,
                parent,
                children: Vec::new(),
                active_child: 0,
            },
        );
        match parent.and_then(|p| self.nodes.get_mut(&p)) {
            Some(parent_node) => {
                parent_node.children.push(id);
                parent_node.active_child = parent_node.children.len() - 1;
            }
            None => {
                self.roots.push(id);
                self.active_root = self.roots.len() - 1;
            }
        }
        id
    }

    pub fn append_content(&mut self, id: MessageId, chunk: &str) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.content.push_str(chunk);
        }
    }

    /// The currently visible thread, root to leaf.
    pub fn path(&self) -> Vec<MessageId> {
        let mut path = Vec::new();
        let Some(&root) = self.roots.get(self.active_root.min(self.roots.len().saturating_sub(1)))
        else {
            return path;
        };
        let mut current = root;
        loop {
            path.push(current);
            let Some(node) = self.nodes.get(&current) else {
                break;
            };
            if node.children.is_empty() {
                break;
            }
            let idx = node.active_child.min(node.children.len() - 1);
            current = node.children[idx];
        }
        path
    }

    pub fn leaf(&self) -> Option<MessageId> {
        self.path().last().copied()
    }

    fn siblings(&self, id: MessageId) -> &[MessageId] {
        match self.nodes.get(&id).and_then(|n| n.parent) {
            Some(parent) => self
                .nodes
                .get(&parent)
                .map(|p| p.children.as_slice())
                .unwrap_or(&[]),
            None => &self.roots,
        }
    }

    /// 1-based position of `id` among its siblings, and the sibling count.
    pub fn branch_position(&self, id: MessageId) -> (usize, usize) {
        let siblings = self.siblings(id);
        let position = siblings.iter().position(|&s| s == id).map_or(1, |i| i + 1);
        (position, siblings.len().max(1))
    }

    /// Moves the selection at `id`'s position by `step` siblings.
    ///
    /// Returns false when the move would fall off either end.
    pub fn select_sibling(&mut self, id: MessageId, step: isize) -> bool {
        let siblings = self.siblings(id);
        let Some(idx) = siblings.iter().position(|&s| s == id) else {
            return false;
        };
        let target = idx as isize + step;
        if target < 0 || target as usize >= siblings.len() {
            return false;
        }
        let target = target as usize;
        match self.nodes.get(&id).and_then(|n| n.parent) {
            Some(parent) => {
                if let Some(parent_node) = self.nodes.get_mut(&parent) {
                    parent_node.active_child = target;
                }
            }
            None => self.active_root = target,
        }
        true
    }

    /// Removes a childless node, re-pointing its parent's selection.
    pub fn remove_leaf(&mut self, id: MessageId) -> bool {
        let Some(node) = self.nodes.get(&id) else {
            return false;
        };
        if !node.children.is_empty() {
            return false;
        }
        let parent = node.parent;
        self.nodes.remove(&id);
        match parent.and_then(|p| self.nodes.get_mut(&p)) {
            Some(parent_node) => {
                parent_node.children.retain(|&c| c != id);
                parent_node.active_child = parent_node
                    .active_child
                    .min(parent_node.children.len().saturating_sub(1));
            }
            None => {
                self.roots.retain(|&r| r != id);
                self.active_root = self.active_root.min(self.roots.len().saturating_sub(1));
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> (MessageTree, MessageId, MessageId) {
        let mut tree = MessageTree::default();
        let user = tree.insert(None, Role::User, "what is rust".into());
        let reply = tree.insert(Some(user), Role::Assistant, "a language".into());
        (tree, user, reply)
    }

    #[test]
    fn path_follows_insertions() {
        let (mut tree, user, reply) = seeded();
        let follow_up = tree.insert(Some(reply), Role::User, "say more".into());
        assert_eq!(tree.path(), vec![user, reply, follow_up]);
        assert_eq!(tree.leaf(), Some(follow_up));
    }

    #[test]
    fn sibling_insert_creates_selected_branch() {
        let (mut tree, user, first) = seeded();
        let second = tree.insert(Some(user), Role::Assistant, "a systems language".into());
        assert_eq!(tree.path(), vec![user, second]);
        assert_eq!(tree.branch_position(second), (2, 2));
        assert_eq!(tree.branch_position(first), (1, 2));
        // the lone user message is not branched
        assert_eq!(tree.branch_position(user), (1, 1));
    }

    #[test]
    fn switching_back_restores_branch_descendants() {
        let (mut tree, user, first) = seeded();
        let follow_up = tree.insert(Some(first), Role::User, "thanks".into());
        let _second = tree.insert(Some(user), Role::Assistant, "regenerated".into());
        assert!(tree.select_sibling(first, -1));
        assert_eq!(tree.path(), vec![user, first, follow_up]);
    }

    #[test]
    fn selection_is_clamped_at_the_ends() {
        let (mut tree, user, _first) = seeded();
        let second = tree.insert(Some(user), Role::Assistant, "again".into());
        assert!(!tree.select_sibling(second, 1));
        assert!(tree.select_sibling(second, -1));
        assert!(!tree.select_sibling(second, -2));
    }

    #[test]
    fn root_messages_branch_too() {
        let mut tree = MessageTree::default();
        let first = tree.insert(None, Role::User, "v1".into());
        let second = tree.insert(None, Role::User, "v2".into());
        assert_eq!(tree.branch_position(second), (2, 2));
        assert_eq!(tree.path(), vec![second]);
        assert!(tree.select_sibling(second, -1));
        assert_eq!(tree.path(), vec![first]);
    }

    #[test]
    fn remove_leaf_only_removes_childless_nodes() {
        let (mut tree, user, reply) = seeded();
        assert!(!tree.remove_leaf(user));
        assert!(tree.remove_leaf(reply));
        assert_eq!(tree.path(), vec![user]);
        assert_eq!(tree.len(), 1);
    }
}

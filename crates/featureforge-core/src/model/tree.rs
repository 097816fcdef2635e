//! Arena-backed feature forest.
//!
//! Nodes live in a slot vector and refer to each other through [`NodeId`]
//! handles, so reparenting is an index rewrite rather than a pointer dance.
//! Every node owns at least one [`Group`]; each child records the index of
//! the parent group it belongs to.

use std::collections::HashMap;
use std::fmt;

use smallvec::{smallvec, SmallVec};

use super::group::{Group, Range};
use crate::error::{FeatureModelError, Result};
use crate::identifier::Identifier;

/// Handle of a node inside a [`FeatureTree`].
///
/// Slots of removed nodes are reused, so a handle is only meaningful while
/// its node is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One position of the feature forest.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    feature: Identifier,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    groups: SmallVec<[Group; 1]>,
    group_id: usize,
    range: Range,
}

impl TreeNode {
    fn new(feature: Identifier) -> Self {
        Self {
            feature,
            parent: None,
            children: Vec::new(),
            groups: smallvec![Group::and()],
            group_id: 0,
            range: Range::OPTIONAL,
        }
    }

    /// Identifier of the feature labeling this node.
    #[inline]
    pub fn feature(&self) -> &Identifier {
        &self.feature
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Groups partitioning the children, in declaration order.
    #[inline]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, index: usize) -> Option<&Group> {
        self.groups.get(index)
    }

    /// Index of the parent group this node belongs to.
    #[inline]
    pub fn group_id(&self) -> usize {
        self.group_id
    }

    /// Own selection range relative to the parent.
    #[inline]
    pub fn range(&self) -> Range {
        self.range
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_mandatory(&self) -> bool {
        self.range == Range::MANDATORY
    }

    pub fn is_optional(&self) -> bool {
        !self.is_mandatory()
    }
}

/// A forest of feature nodes.
#[derive(Debug, Clone, Default)]
pub struct FeatureTree {
    nodes: Vec<Option<TreeNode>>,
    free: Vec<usize>,
    roots: Vec<NodeId>,
    index: HashMap<Identifier, NodeId>,
}

impl FeatureTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[inline]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    /// Returns the node labeled by `feature`.
    pub fn node_of(&self, feature: &Identifier) -> Option<NodeId> {
        self.index.get(feature).copied()
    }

    pub fn contains(&self, feature: &Identifier) -> bool {
        self.index.contains_key(feature)
    }

    fn get(&self, id: NodeId) -> Result<&TreeNode> {
        self.node(id).ok_or(FeatureModelError::UnknownNode(id))
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut TreeNode> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(FeatureModelError::UnknownNode(id))
    }

    fn alloc(&mut self, node: TreeNode) -> NodeId {
        let feature = node.feature.clone();
        let id = match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                NodeId(slot)
            }
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() - 1)
            }
        };
        self.index.insert(feature, id);
        id
    }

    fn ensure_absent(&self, feature: &Identifier) -> Result<()> {
        if self.contains(feature) {
            return Err(FeatureModelError::AlreadyInTree(feature.clone()));
        }
        Ok(())
    }

    /// Appends a new root labeled by `feature`.
    pub fn add_root(&mut self, feature: Identifier) -> Result<NodeId> {
        self.ensure_absent(&feature)?;
        let id = self.alloc(TreeNode::new(feature));
        self.roots.push(id);
        Ok(id)
    }

    /// Inserts a new leaf as the `index`-th child of `parent`, in group 0.
    pub fn add_below(&mut self, feature: Identifier, parent: NodeId, index: usize) -> Result<NodeId> {
        self.ensure_absent(&feature)?;
        let p = self.get(parent)?;
        if index > p.children.len() {
            return Err(FeatureModelError::ChildIndexOutOfRange {
                feature: p.feature.clone(),
                index,
                count: p.children.len(),
            });
        }
        self.insert_child(TreeNode::new(feature), parent, index, 0)
    }

    /// Inserts a new leaf directly after `sibling`, in the sibling's group.
    pub fn add_next_to(&mut self, feature: Identifier, sibling: NodeId) -> Result<NodeId> {
        self.ensure_absent(&feature)?;
        let s = self.get(sibling)?;
        let Some(parent) = s.parent else {
            return Err(FeatureModelError::RootSibling(s.feature.clone()));
        };
        let group_id = s.group_id;
        let position = self.position_in_parent(sibling, parent)?;
        self.insert_child(TreeNode::new(feature), parent, position + 1, group_id)
    }

    fn insert_child(&mut self, mut node: TreeNode, parent: NodeId, index: usize, group_id: usize) -> Result<NodeId> {
        node.parent = Some(parent);
        node.group_id = group_id;
        let id = self.alloc(node);
        let p = self.get_mut(parent)?;
        if p.groups.is_empty() {
            p.groups.push(Group::and());
        }
        p.children.insert(index, id);
        Ok(id)
    }

    fn position_in_parent(&self, node: NodeId, parent: NodeId) -> Result<usize> {
        self.get(parent)?
            .children
            .iter()
            .position(|c| *c == node)
            .ok_or(FeatureModelError::UnknownNode(node))
    }

    /// Detaches `node`, moving its children to its former position under its parent.
    ///
    /// If `node` is its parent's only child, the parent adopts `node`'s
    /// groups so the lifted children keep their group semantics. Otherwise
    /// the lifted children join the group `node` belonged to.
    pub fn remove(&mut self, node: NodeId) -> Result<TreeNode> {
        let n = self.get(node)?;
        let Some(parent) = n.parent else {
            return Err(FeatureModelError::RootRemoval(n.feature.clone()));
        };
        let position = self.position_in_parent(node, parent)?;
        let only_child = self.get(parent)?.children.len() == 1;

        let Some(mut removed) = self.nodes[node.0].take() else {
            return Err(FeatureModelError::UnknownNode(node));
        };
        self.free.push(node.0);
        self.index.remove(&removed.feature);

        let lifted = std::mem::take(&mut removed.children);
        for child in &lifted {
            if let Some(Some(c)) = self.nodes.get_mut(child.0) {
                c.parent = Some(parent);
                if !only_child {
                    c.group_id = removed.group_id;
                }
            }
        }

        let p = self.get_mut(parent)?;
        if only_child {
            p.groups = removed.groups.iter().map(collapsed).collect();
        }
        p.children.splice(position..=position, lifted);

        removed.parent = None;
        Ok(removed)
    }

    /// Copies every tree of `other` below `parent`, starting at child position `index`.
    ///
    /// Grafted roots join group 0 of `parent` and keep their own ranges and
    /// groups. Returns the handles of the grafted roots.
    pub fn graft(&mut self, other: &FeatureTree, parent: NodeId, index: usize) -> Result<Vec<NodeId>> {
        let p = self.get(parent)?;
        if index > p.children.len() {
            return Err(FeatureModelError::ChildIndexOutOfRange {
                feature: p.feature.clone(),
                index,
                count: p.children.len(),
            });
        }
        if let Some(clash) = other.index.keys().find(|f| self.contains(f)) {
            return Err(FeatureModelError::AlreadyInTree(clash.clone()));
        }

        let mut grafted = Vec::with_capacity(other.roots.len());
        for (offset, root) in other.roots.iter().enumerate() {
            let id = self.copy_subtree(other, *root, parent, index + offset, 0)?;
            grafted.push(id);
        }
        Ok(grafted)
    }

    fn copy_subtree(&mut self, other: &FeatureTree, source: NodeId, parent: NodeId, index: usize, group_id: usize) -> Result<NodeId> {
        let src = other.get(source)?;
        let mut node = TreeNode::new(src.feature.clone());
        node.groups = src.groups.clone();
        node.range = src.range;
        let id = self.insert_child(node, parent, index, group_id)?;
        for (i, child) in src.children.iter().enumerate() {
            let child_group = other.get(*child)?.group_id;
            self.copy_subtree(other, *child, id, i, child_group)?;
        }
        Ok(id)
    }

    /// Sets the node's own range relative to its parent.
    pub fn set_range(&mut self, node: NodeId, range: Range) -> Result<()> {
        self.get_mut(node)?.range = range;
        Ok(())
    }

    /// Makes the node mandatory.
    ///
    /// A node with upper bound 0 becomes `[1..1]` instead of the empty `[1..0]`.
    pub fn set_mandatory(&mut self, node: NodeId) -> Result<()> {
        let n = self.get_mut(node)?;
        n.range = match n.range.upper() {
            Some(0) => Range::exactly(1),
            upper => Range::new(1, upper)?,
        };
        Ok(())
    }

    /// Makes the node optional by lowering its lower bound to 0.
    pub fn set_optional(&mut self, node: NodeId) -> Result<()> {
        let n = self.get_mut(node)?;
        n.range = Range::new(0, n.range.upper())?;
        Ok(())
    }

    fn group_mut(&mut self, node: NodeId, group: usize) -> Result<&mut Group> {
        let n = self.get_mut(node)?;
        let count = n.groups.len();
        let feature = n.feature.clone();
        n.groups
            .get_mut(group)
            .ok_or(FeatureModelError::GroupIndexOutOfRange {
                feature,
                index: group,
                count,
            })
    }

    pub fn set_group_range(&mut self, node: NodeId, group: usize, range: Range) -> Result<()> {
        self.group_mut(node, group)?.set_range(range);
        Ok(())
    }

    pub fn set_and(&mut self, node: NodeId, group: usize) -> Result<()> {
        self.set_group_range(node, group, Range::AND)
    }

    pub fn set_or(&mut self, node: NodeId, group: usize) -> Result<()> {
        self.set_group_range(node, group, Range::OR)
    }

    pub fn set_alternative(&mut self, node: NodeId, group: usize) -> Result<()> {
        self.set_group_range(node, group, Range::ALTERNATIVE)
    }

    /// Appends a new, empty group to the node and returns its index.
    pub fn add_group(&mut self, node: NodeId, group: Group) -> Result<usize> {
        let n = self.get_mut(node)?;
        n.groups.push(group);
        Ok(n.groups.len() - 1)
    }

    /// Moves the node into another group of its parent.
    pub fn set_group_id(&mut self, node: NodeId, group_id: usize) -> Result<()> {
        let n = self.get(node)?;
        let (feature, count) = match n.parent {
            Some(parent) => {
                let p = self.get(parent)?;
                (p.feature.clone(), p.groups.len())
            }
            None => (n.feature.clone(), 1),
        };
        if group_id >= count {
            return Err(FeatureModelError::GroupIndexOutOfRange {
                feature,
                index: group_id,
                count,
            });
        }
        self.get_mut(node)?.group_id = group_id;
        Ok(())
    }

    /// Returns all live nodes in pre-order: each node before its
    /// descendants, children in list order, roots in root-list order.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.len());
        for root in &self.roots {
            self.preorder_into(*root, &mut out);
        }
        out
    }

    /// Returns the subtree rooted at `start` in pre-order.
    pub fn preorder_from(&self, start: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.preorder_into(start, &mut out);
        out
    }

    fn preorder_into(&self, start: NodeId, out: &mut Vec<NodeId>) {
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            out.push(id);
            stack.extend(node.children.iter().rev().copied());
        }
    }

    /// Returns the chain of ancestors of `node`, nearest first.
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.node(node).and_then(TreeNode::parent);
        while let Some(id) = current {
            out.push(id);
            current = self.node(id).and_then(TreeNode::parent);
        }
        out
    }

    /// Returns the children of `node` that belong to group `group`, in child order.
    pub fn group_children(&self, node: NodeId, group: usize) -> Vec<NodeId> {
        let Some(n) = self.node(node) else {
            return Vec::new();
        };
        n.children
            .iter()
            .copied()
            .filter(|c| self.node(*c).is_some_and(|c| c.group_id == group))
            .collect()
    }

    /// Checks the structural invariants: parent/child links agree and every
    /// child's group index addresses a group of its parent.
    pub fn validate(&self) -> Result<()> {
        for id in self.preorder() {
            let node = self.get(id)?;
            for child in &node.children {
                let c = self.get(*child)?;
                if c.parent != Some(id) {
                    return Err(FeatureModelError::UnknownNode(*child));
                }
                if c.group_id >= node.groups.len() {
                    return Err(FeatureModelError::GroupIndexOutOfRange {
                        feature: node.feature.clone(),
                        index: c.group_id,
                        count: node.groups.len(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Shape a parent adopts from its removed only child: cardinality groups
/// become OR.
fn collapsed(group: &Group) -> Group {
    if group.is_and() {
        Group::and()
    } else if group.is_alternative() {
        Group::alternative()
    } else {
        Group::or()
    }
}

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::TreeError;
use crate::member::{MemberId, MemberRecord, Position};

/// Index of a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeIdx(usize);

#[derive(Debug, Clone)]
struct Node {
    record: MemberRecord,
    level: u32,
    position: Position,
    parent: Option<NodeIdx>,
    left: Option<NodeIdx>,
    right: Option<NodeIdx>,
}

/// Sizes of a member's two legs (each leg counts the child and its
/// entire downline).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LegCounts {
    pub left: usize,
    pub right: usize,
}

impl LegCounts {
    pub fn total(&self) -> usize {
        self.left + self.right
    }
}

/// Binary organization tree backed by an index arena.
///
/// Nodes live in a flat vector; parent and child links are index
/// references, so traversal never recurses over owned children and a
/// pathologically deep tree cannot exhaust the call stack. Invariants
/// (single root, level arithmetic, unique left/right slots, unique ids)
/// are enforced at mutation time, not re-validated per render.
#[derive(Debug, Clone)]
pub struct OrgTree {
    nodes: Vec<Node>,
    index: HashMap<MemberId, NodeIdx>,
    root: NodeIdx,
}

impl OrgTree {
    /// Build a single-member tree with `root_record` at the root.
    pub fn new(root_record: MemberRecord) -> Self {
        let root = NodeIdx(0);
        let mut index = HashMap::new();
        index.insert(root_record.id.clone(), root);
        Self {
            nodes: vec![Node {
                record: root_record,
                level: 0,
                position: Position::Root,
                parent: None,
                left: None,
                right: None,
            }],
            index,
            root,
        }
    }

    pub fn root_id(&self) -> &MemberId {
        &self.nodes[self.root.0].record.id
    }

    pub fn root_record(&self) -> &MemberRecord {
        &self.nodes[self.root.0].record
    }

    /// Total number of members, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &MemberId) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &MemberId) -> Option<&MemberRecord> {
        self.index.get(id).map(|idx| &self.nodes[idx.0].record)
    }

    pub fn level_of(&self, id: &MemberId) -> Option<u32> {
        self.index.get(id).map(|idx| self.nodes[idx.0].level)
    }

    pub fn position_of(&self, id: &MemberId) -> Option<Position> {
        self.index.get(id).map(|idx| self.nodes[idx.0].position)
    }

    pub fn parent_of(&self, id: &MemberId) -> Option<&MemberId> {
        let idx = self.index.get(id)?;
        let parent = self.nodes[idx.0].parent?;
        Some(&self.nodes[parent.0].record.id)
    }

    pub fn left_child(&self, id: &MemberId) -> Option<&MemberId> {
        let idx = self.index.get(id)?;
        let left = self.nodes[idx.0].left?;
        Some(&self.nodes[left.0].record.id)
    }

    pub fn right_child(&self, id: &MemberId) -> Option<&MemberId> {
        let idx = self.index.get(id)?;
        let right = self.nodes[idx.0].right?;
        Some(&self.nodes[right.0].record.id)
    }

    /// Direct children, left before right.
    pub fn children_of(&self, id: &MemberId) -> Vec<&MemberId> {
        let mut children = Vec::new();
        if let Some(left) = self.left_child(id) {
            children.push(left);
        }
        if let Some(right) = self.right_child(id) {
            children.push(right);
        }
        children
    }

    pub fn child_count(&self, id: &MemberId) -> usize {
        self.children_of(id).len()
    }

    /// First-empty-slot placement policy: `Left` for a member with no
    /// children, `Right` for a member with exactly one, `None` for a
    /// full member. Deliberately count-based rather than slot-based;
    /// there is no explicit slot-choice surface.
    pub fn first_open_slot(&self, id: &MemberId) -> Option<Position> {
        match self.child_count(id) {
            0 => Some(Position::Left),
            1 => Some(Position::Right),
            _ => None,
        }
    }

    /// Place `record` under `parent` at `position`.
    ///
    /// Fails if the parent is unknown, the slot is occupied, or the
    /// record's id is already present. The new member's level is always
    /// the parent's level plus one.
    pub fn insert(
        &mut self,
        parent: &MemberId,
        position: Position,
        record: MemberRecord,
    ) -> Result<MemberId, TreeError> {
        if position.is_root() {
            return Err(TreeError::ChildAtRoot);
        }
        let parent_idx = *self
            .index
            .get(parent)
            .ok_or_else(|| TreeError::UnknownMember(parent.clone()))?;
        if self.index.contains_key(&record.id) {
            return Err(TreeError::DuplicateMember(record.id));
        }
        let slot = match position {
            Position::Left => self.nodes[parent_idx.0].left,
            Position::Right => self.nodes[parent_idx.0].right,
            Position::Root => unreachable!("rejected above"),
        };
        if slot.is_some() {
            return Err(TreeError::SlotOccupied {
                parent: parent.clone(),
                position,
            });
        }

        let idx = NodeIdx(self.nodes.len());
        let id = record.id.clone();
        let level = self.nodes[parent_idx.0].level + 1;
        self.nodes.push(Node {
            record,
            level,
            position,
            parent: Some(parent_idx),
            left: None,
            right: None,
        });
        match position {
            Position::Left => self.nodes[parent_idx.0].left = Some(idx),
            Position::Right => self.nodes[parent_idx.0].right = Some(idx),
            Position::Root => unreachable!("rejected above"),
        }
        self.index.insert(id.clone(), idx);
        Ok(id)
    }

    /// Iterate over all descendants of `id` in pre-order (left leg
    /// before right leg), excluding `id` itself. Uses an explicit stack.
    pub fn descendants(&self, id: &MemberId) -> Descendants<'_> {
        let mut stack = Vec::new();
        if let Some(idx) = self.index.get(id) {
            let node = &self.nodes[idx.0];
            // Right pushed first so the left leg is visited first.
            if let Some(right) = node.right {
                stack.push(right);
            }
            if let Some(left) = node.left {
                stack.push(left);
            }
        }
        Descendants { tree: self, stack }
    }

    /// Count of all descendants of `id` (the "downline"). Derived on
    /// demand; never stored.
    pub fn team_size(&self, id: &MemberId) -> usize {
        self.descendants(id).count()
    }

    /// Left and right leg sizes for `id`. Each leg counts the direct
    /// child plus its entire downline; the two always sum to
    /// `team_size(id)`.
    pub fn leg_counts(&self, id: &MemberId) -> LegCounts {
        let left = self
            .left_child(id)
            .map(|c| 1 + self.team_size(c))
            .unwrap_or(0);
        let right = self
            .right_child(id)
            .map(|c| 1 + self.team_size(c))
            .unwrap_or(0);
        LegCounts { left, right }
    }

    pub fn active_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.record.is_active).count()
    }

    /// Iterate over every member id in pre-order from the root.
    pub fn member_ids(&self) -> impl Iterator<Item = &MemberId> + '_ {
        std::iter::once(self.root_id()).chain(self.descendants(self.root_id()))
    }
}

/// Pre-order iterator over a member's downline.
pub struct Descendants<'a> {
    tree: &'a OrgTree,
    stack: Vec<NodeIdx>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a MemberId;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.stack.pop()?;
        let node = &self.tree.nodes[idx.0];
        if let Some(right) = node.right {
            self.stack.push(right);
        }
        if let Some(left) = node.left {
            self.stack.push(left);
        }
        Some(&node.record.id)
    }
}

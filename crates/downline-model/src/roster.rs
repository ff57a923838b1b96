//! Roster interchange format.
//!
//! A roster is the nested JSON form of the organization: each entry
//! carries the member's facts and an ordered `children` array where
//! index 0 is the left child and index 1 the right child. Stored
//! `level` and `position` fields are optional and, when present, are
//! validated against the structure instead of being trusted.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{RosterError, TreeError};
use crate::member::{MemberId, MemberRecord, Position};
use crate::tree::OrgTree;

/// One member entry in a roster file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: MemberId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub join_date: NaiveDate,
    pub rank: String,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RosterEntry>,
}

impl RosterEntry {
    fn record(&self) -> MemberRecord {
        MemberRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            join_date: self.join_date,
            rank: self.rank.clone(),
            is_active: self.is_active,
        }
    }

    /// Check the entry's optional stored placement against the placement
    /// implied by the structure.
    fn check_placement(&self, level: u32, position: Position) -> Result<(), TreeError> {
        if let Some(found) = self.level {
            if found != level {
                return Err(TreeError::LevelMismatch {
                    member: self.id.clone(),
                    expected: level,
                    found,
                });
            }
        }
        if let Some(found) = self.position {
            if found != position {
                return Err(TreeError::PositionMismatch {
                    member: self.id.clone(),
                    expected: position,
                    found,
                });
            }
        }
        Ok(())
    }
}

/// Build an [`OrgTree`] from a nested roster, validating what the
/// source data merely assumed: at most two children per member, unique
/// ids, and consistent stored levels/positions.
pub fn tree_from_roster(root: &RosterEntry) -> Result<OrgTree, TreeError> {
    root.check_placement(0, Position::Root)?;
    let mut tree = OrgTree::new(root.record());

    // Explicit work stack; children pushed right-first so the left leg
    // is inserted first.
    let mut stack: Vec<(&RosterEntry, MemberId, u32, Position)> = Vec::new();
    push_children(root, tree.root_id().clone(), 0, &mut stack)?;
    while let Some((entry, parent, parent_level, slot)) = stack.pop() {
        entry.check_placement(parent_level + 1, slot)?;
        let id = tree.insert(&parent, slot, entry.record())?;
        push_children(entry, id, parent_level + 1, &mut stack)?;
    }
    Ok(tree)
}

fn push_children<'a>(
    entry: &'a RosterEntry,
    parent: MemberId,
    level: u32,
    stack: &mut Vec<(&'a RosterEntry, MemberId, u32, Position)>,
) -> Result<(), TreeError> {
    if entry.children.len() > 2 {
        return Err(TreeError::TooManyChildren {
            member: entry.id.clone(),
        });
    }
    let slots = [Position::Left, Position::Right];
    for (child, slot) in entry.children.iter().zip(slots).rev() {
        stack.push((child, parent.clone(), level, slot));
    }
    Ok(())
}

/// Serialize an [`OrgTree`] back into its nested roster form, with
/// derived levels and positions written out for readability.
pub fn roster_from_tree(tree: &OrgTree) -> RosterEntry {
    build_entry(tree, tree.root_record())
}

// Depth is bounded by the organization's height; rosters are
// human-scale documents, so recursion is acceptable on the write path.
fn build_entry(tree: &OrgTree, record: &MemberRecord) -> RosterEntry {
    RosterEntry {
        id: record.id.clone(),
        name: record.name.clone(),
        email: record.email.clone(),
        phone: record.phone.clone(),
        join_date: record.join_date,
        rank: record.rank.clone(),
        is_active: record.is_active,
        level: tree.level_of(&record.id),
        position: tree.position_of(&record.id),
        children: tree
            .children_of(&record.id)
            .into_iter()
            .filter_map(|child_id| tree.get(child_id))
            .map(|child| build_entry(tree, child))
            .collect(),
    }
}

/// Read and validate a roster file into an [`OrgTree`].
pub fn read_roster(path: &Path) -> Result<OrgTree, RosterError> {
    let text = std::fs::read_to_string(path).map_err(|source| RosterError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let entry: RosterEntry = serde_json::from_str(&text)?;
    let tree = tree_from_roster(&entry)?;
    tracing::debug!(members = tree.len(), path = %path.display(), "roster loaded");
    Ok(tree)
}

/// Write an [`OrgTree`] to a roster file as pretty-printed JSON.
pub fn write_roster(path: &Path, tree: &OrgTree) -> Result<(), RosterError> {
    let entry = roster_from_tree(tree);
    let text = serde_json::to_string_pretty(&entry)?;
    std::fs::write(path, text).map_err(|source| RosterError::Write {
        path: path.to_path_buf(),
        source,
    })
}

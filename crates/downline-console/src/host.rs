//! The hosting side of the view subsystem's callback contract.
//!
//! The view layer only requests mutations; this shell owns the
//! organization tree, applies the requests, and records what happened.
//! "View Downline" re-roots the tree panel on the chosen member.

use chrono::Utc;
use downline_model::{MemberId, MemberRecord, OrgTree, Position};
use downline_view::HostAction;

use crate::event_log::{EventLog, LogCategory};

/// Rank assigned to members created from the dashboard.
const NEW_MEMBER_RANK: &str = "Bronze Partner";

pub struct Host {
    tree: OrgTree,
    view_root: MemberId,
    /// Slot reserved by a context-menu "Add Member", waiting for a name.
    pending_add: Option<(MemberId, Position)>,
}

impl Host {
    pub fn new(tree: OrgTree) -> Self {
        let view_root = tree.root_id().clone();
        Self {
            tree,
            view_root,
            pending_add: None,
        }
    }

    pub fn tree(&self) -> &OrgTree {
        &self.tree
    }

    pub fn view_root(&self) -> &MemberId {
        &self.view_root
    }

    pub fn pending_add(&self) -> Option<&(MemberId, Position)> {
        self.pending_add.as_ref()
    }

    pub fn cancel_pending_add(&mut self) -> bool {
        self.pending_add.take().is_some()
    }

    /// Return the tree panel to the organization root.
    pub fn reset_view_root(&mut self) {
        self.view_root = self.tree.root_id().clone();
    }

    pub fn apply(&mut self, action: HostAction, log: &mut EventLog) {
        match action {
            HostAction::MemberClicked(id) => {
                let name = self
                    .tree
                    .get(&id)
                    .map(|r| r.name.clone())
                    .unwrap_or_else(|| id.to_string());
                tracing::debug!(member = %id, "member clicked");
                log.push(LogCategory::Action, format!("Member clicked: {name}"));
            }
            HostAction::AddMember { parent, position } => {
                log.push(
                    LogCategory::Action,
                    format!(
                        "Adding member to {parent} on the {position} side; type the name and press Enter"
                    ),
                );
                self.pending_add = Some((parent, position));
            }
            HostAction::Contact(id) => {
                tracing::info!(member = %id, "contact requested");
                log.push(LogCategory::Action, format!("Contacting member {id}"));
            }
            HostAction::ViewDownline(id) => {
                if self.tree.contains(&id) {
                    tracing::debug!(member = %id, "view re-rooted");
                    log.push(LogCategory::View, format!("Viewing downline for member {id}"));
                    self.view_root = id;
                }
            }
        }
    }

    /// Complete a pending "Add Member" with the sponsor-entered name.
    pub fn complete_add(&mut self, name: &str, log: &mut EventLog) {
        let Some((parent, position)) = self.pending_add.take() else {
            log.push(
                LogCategory::Error,
                "No placement pending; right-click a member (or use /menu) first",
            );
            return;
        };
        match self.tree.insert(&parent, position, new_member_record(name)) {
            Ok(id) => {
                tracing::info!(member = %id, parent = %parent, %position, "member added");
                log.push(
                    LogCategory::Action,
                    format!("Added {name} on the {position} side of {parent}"),
                );
            }
            Err(err) => {
                tracing::warn!(error = %err, "add member failed");
                log.push(LogCategory::Error, format!("Could not add member: {err}"));
            }
        }
    }
}

fn new_member_record(name: &str) -> MemberRecord {
    let email = format!(
        "{}@example.com",
        name.split_whitespace()
            .map(|part| part.to_lowercase())
            .collect::<Vec<_>>()
            .join(".")
    );
    MemberRecord::new(
        MemberId::generate(),
        name,
        email,
        "",
        Utc::now().date_naive(),
        NEW_MEMBER_RANK,
        true,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use downline_model::sample_tree;

    fn id(s: &str) -> MemberId {
        MemberId::new(s.to_string())
    }

    #[test]
    fn test_add_member_flow_fills_open_slot() {
        let mut host = Host::new(sample_tree());
        let mut log = EventLog::new();
        let alice = id("left1-left");
        assert_eq!(host.tree().child_count(&alice), 0);

        host.apply(
            HostAction::AddMember {
                parent: alice.clone(),
                position: Position::Left,
            },
            &mut log,
        );
        assert!(host.pending_add().is_some());

        host.complete_add("Eve Green", &mut log);
        assert!(host.pending_add().is_none());
        assert_eq!(host.tree().child_count(&alice), 1);

        let child = host.tree().left_child(&alice).unwrap().clone();
        let record = host.tree().get(&child).unwrap();
        assert_eq!(record.name, "Eve Green");
        assert_eq!(record.email, "eve.green@example.com");
        assert_eq!(record.rank, "Bronze Partner");
        assert!(record.is_active);
        assert_eq!(host.tree().level_of(&child), Some(3));
    }

    #[test]
    fn test_complete_add_without_pending_logs_error() {
        let mut host = Host::new(sample_tree());
        let mut log = EventLog::new();
        host.complete_add("Nobody", &mut log);
        assert!(log.iter().any(|e| e.category == LogCategory::Error));
        assert_eq!(host.tree().len(), 7);
    }

    #[test]
    fn test_occupied_slot_logs_error_instead_of_panicking() {
        let mut host = Host::new(sample_tree());
        let mut log = EventLog::new();
        // Root already has both legs filled.
        host.apply(
            HostAction::AddMember {
                parent: id("root"),
                position: Position::Left,
            },
            &mut log,
        );
        host.complete_add("Eve Green", &mut log);
        assert!(log.iter().any(|e| e.category == LogCategory::Error));
        assert_eq!(host.tree().len(), 7);
    }

    #[test]
    fn test_view_downline_reroots_and_reset_restores() {
        let mut host = Host::new(sample_tree());
        let mut log = EventLog::new();
        host.apply(HostAction::ViewDownline(id("right1")), &mut log);
        assert_eq!(host.view_root(), &id("right1"));

        host.reset_view_root();
        assert_eq!(host.view_root(), &id("root"));
    }

    #[test]
    fn test_view_downline_of_unknown_member_is_ignored() {
        let mut host = Host::new(sample_tree());
        let mut log = EventLog::new();
        host.apply(HostAction::ViewDownline(id("ghost")), &mut log);
        assert_eq!(host.view_root(), &id("root"));
    }

    #[test]
    fn test_click_and_contact_only_log() {
        let mut host = Host::new(sample_tree());
        let mut log = EventLog::new();
        host.apply(HostAction::MemberClicked(id("left1")), &mut log);
        host.apply(HostAction::Contact(id("left1")), &mut log);
        assert_eq!(log.len(), 2);
        assert!(log.iter().any(|e| e.message.contains("John Doe")));
        assert_eq!(host.tree().len(), 7);
    }
}

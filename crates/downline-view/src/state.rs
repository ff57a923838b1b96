//! Interaction state for the tree view.
//!
//! An explicit state struct with pure transition functions, so every
//! behavior (zoom clamping, pan reset, context-menu policy, selection
//! lifecycle) is testable without any rendering. The hosting UI feeds
//! input events in and drains [`HostAction`]s out; the view never
//! mutates the member tree itself.

use std::collections::VecDeque;

use downline_model::{MemberId, Position};

pub const ZOOM_MIN: f64 = 0.5;
pub const ZOOM_MAX: f64 = 1.5;
pub const ZOOM_STEP: f64 = 0.1;
/// Pan nudge applied by the directional controls.
pub const PAN_STEP: i32 = 50;

/// Requests the hosting application must handle. Mirrors the four
/// injected callbacks of the dashboard's embedding contract: the host
/// applies any mutation and re-renders from the updated tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostAction {
    MemberClicked(MemberId),
    AddMember {
        parent: MemberId,
        position: Position,
    },
    Contact(MemberId),
    ViewDownline(MemberId),
}

/// One entry in an open context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextAction {
    ViewDetails,
    AddMember(Position),
    Contact,
}

impl ContextAction {
    pub fn label(&self) -> &'static str {
        match self {
            ContextAction::ViewDetails => "View Details",
            ContextAction::AddMember(_) => "Add Member",
            ContextAction::Contact => "Contact",
        }
    }
}

/// An open context menu, anchored at the cursor position that opened it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextMenu {
    pub at: (u16, u16),
    pub member: MemberId,
    pub actions: Vec<ContextAction>,
}

/// Directional pan controls. Pressing a direction shifts the viewport
/// content toward it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub struct ViewState {
    zoom: f64,
    pan: (i32, i32),
    selected: Option<MemberId>,
    context_menu: Option<ContextMenu>,
    actions: VecDeque<HostAction>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            zoom: 1.0,
            pan: (0, 0),
            selected: None,
            context_menu: None,
            actions: VecDeque::new(),
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan(&self) -> (i32, i32) {
        self.pan
    }

    pub fn selected(&self) -> Option<&MemberId> {
        self.selected.as_ref()
    }

    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.context_menu.as_ref()
    }

    // ── Zoom and pan ──

    /// Set the zoom factor, clamped to `[ZOOM_MIN, ZOOM_MAX]`. An actual
    /// change resets the pan to the origin so the scaled tree cannot
    /// drift out of the viewport; a request clamped back to the current
    /// value is a no-op.
    pub fn set_zoom(&mut self, zoom: f64) {
        let clamped = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        if (clamped - self.zoom).abs() > f64::EPSILON {
            self.zoom = clamped;
            self.pan = (0, 0);
        }
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - ZOOM_STEP);
    }

    /// Accumulate a drag gesture into the pan offset.
    pub fn pan_by(&mut self, dx: i32, dy: i32) {
        self.pan.0 += dx;
        self.pan.1 += dy;
    }

    /// Nudge the pan by the fixed step in the given direction.
    pub fn nudge(&mut self, direction: PanDirection) {
        match direction {
            PanDirection::Up => self.pan.1 += PAN_STEP,
            PanDirection::Down => self.pan.1 -= PAN_STEP,
            PanDirection::Left => self.pan.0 += PAN_STEP,
            PanDirection::Right => self.pan.0 -= PAN_STEP,
        }
    }

    // ── Selection and detail panel ──

    /// Left-click on a member: select it (opening the detail panel) and
    /// notify the host.
    pub fn click_member(&mut self, member: MemberId) {
        self.selected = Some(member.clone());
        self.actions.push_back(HostAction::MemberClicked(member));
    }

    /// Close the detail panel without firing anything.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Detail-panel "View Downline": fire the host action, then close
    /// the panel.
    pub fn view_downline(&mut self) {
        if let Some(member) = self.selected.take() {
            self.actions.push_back(HostAction::ViewDownline(member));
        }
    }

    /// Detail-panel "Contact": fire the host action, then close the
    /// panel.
    pub fn contact_selected(&mut self) {
        if let Some(member) = self.selected.take() {
            self.actions.push_back(HostAction::Contact(member));
        }
    }

    // ── Context menu ──

    /// Right-click on a member: open the context menu at the cursor.
    ///
    /// "Add Member" is offered only while the member has an open slot,
    /// carrying the first-empty-slot position: left with no children,
    /// right with one, absent with two.
    pub fn open_context_menu(&mut self, at: (u16, u16), member: MemberId, child_count: usize) {
        let mut actions = vec![ContextAction::ViewDetails];
        match child_count {
            0 => actions.push(ContextAction::AddMember(Position::Left)),
            1 => actions.push(ContextAction::AddMember(Position::Right)),
            _ => {}
        }
        actions.push(ContextAction::Contact);
        self.context_menu = Some(ContextMenu {
            at,
            member,
            actions,
        });
    }

    pub fn close_context_menu(&mut self) {
        self.context_menu = None;
    }

    /// Any press outside the menu's owned region while it is open.
    pub fn outside_click(&mut self) {
        self.close_context_menu();
    }

    /// Invoke one of the open menu's entries; the menu closes either
    /// way. Context-menu "View Details" selects the member without
    /// notifying the host (only direct clicks do that).
    pub fn invoke_context_action(&mut self, action: ContextAction) {
        let Some(menu) = self.context_menu.take() else {
            return;
        };
        match action {
            ContextAction::ViewDetails => {
                self.selected = Some(menu.member);
            }
            ContextAction::AddMember(position) => {
                self.actions.push_back(HostAction::AddMember {
                    parent: menu.member,
                    position,
                });
            }
            ContextAction::Contact => {
                self.actions.push_back(HostAction::Contact(menu.member));
            }
        }
    }

    // ── Host boundary ──

    /// Drain all pending host actions, oldest first.
    pub fn drain_actions(&mut self) -> Vec<HostAction> {
        self.actions.drain(..).collect()
    }

    pub fn has_actions(&self) -> bool {
        !self.actions.is_empty()
    }
}

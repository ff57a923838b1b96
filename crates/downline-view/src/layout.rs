//! Visible-tree layout.
//!
//! `TreeLayout::compute` walks the organization tree from a chosen view
//! root, prunes it through the display filters, and places every
//! surviving node on a grid: one row per level, children fanned
//! horizontally beneath their parent, parents centered over their
//! visible children. The output is purely derived; the member tree is
//! never mutated and traversal never recurses (explicit work stack over
//! the arena).

use downline_model::{MemberId, OrgTree};

use crate::filter::ViewFilters;

/// Width of a node box in layout cells.
pub const NODE_WIDTH: i64 = 18;
/// Horizontal gap between sibling subtrees, in layout cells.
pub const SIBLING_GAP: i64 = 4;

/// A node placed by the layout pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutNode {
    pub id: MemberId,
    pub name: String,
    pub rank: String,
    pub is_active: bool,
    /// Absolute level in the organization tree.
    pub level: u32,
    /// Depth below the view root; the view root is row 0.
    pub row: u32,
    /// Horizontal center of the node box, in layout cells.
    pub center: i64,
}

impl LayoutNode {
    pub fn left_edge(&self) -> i64 {
        self.center - NODE_WIDTH / 2
    }

    pub fn right_edge(&self) -> i64 {
        self.left_edge() + NODE_WIDTH
    }
}

/// A connector from a visible parent to a visible child, as indices
/// into [`TreeLayout::nodes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEdge {
    pub parent: usize,
    pub child: usize,
}

/// The laid-out visible tree.
#[derive(Debug, Clone, Default)]
pub struct TreeLayout {
    /// Visible nodes in pre-order (left leg before right leg).
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
    /// Total width of the laid-out tree in cells.
    pub width: i64,
    /// Number of visible rows.
    pub depth: u32,
}

struct Vis {
    id: MemberId,
    name: String,
    rank: String,
    is_active: bool,
    level: u32,
    row: u32,
    children: Vec<usize>,
}

impl TreeLayout {
    /// Lay out the subtree rooted at `view_root` under `filters`.
    ///
    /// A node excluded by any filter stops the descent: none of its
    /// descendants are visited and no connector is emitted toward it.
    /// An excluded (or unknown) view root yields an empty layout.
    pub fn compute(tree: &OrgTree, view_root: &MemberId, filters: &ViewFilters) -> TreeLayout {
        let root_level = match tree.level_of(view_root) {
            Some(level) => level,
            None => return TreeLayout::default(),
        };
        let admitted = |id: &MemberId| -> Option<u32> {
            let level = tree.level_of(id)?;
            let record = tree.get(id)?;
            filters.admits(record, level).then_some(level)
        };
        if admitted(view_root).is_none() {
            return TreeLayout::default();
        }

        // Prune pass: pre-order over admitted nodes, explicit stack.
        // Children are pushed right-first so the left leg pops first and
        // keeps the lower index; a parent always precedes its children.
        let mut vis: Vec<Vis> = Vec::new();
        let mut stack: Vec<(MemberId, u32, Option<usize>)> =
            vec![(view_root.clone(), root_level, None)];
        while let Some((id, level, parent)) = stack.pop() {
            let record = match tree.get(&id) {
                Some(record) => record,
                None => continue,
            };
            let idx = vis.len();
            vis.push(Vis {
                id: id.clone(),
                name: record.name.clone(),
                rank: record.rank.clone(),
                is_active: record.is_active,
                level,
                row: level - root_level,
                children: Vec::new(),
            });
            if let Some(parent) = parent {
                vis[parent].children.push(idx);
            }
            let mut admitted_children = Vec::new();
            for child in tree.children_of(&id) {
                if let Some(child_level) = admitted(child) {
                    admitted_children.push((child.clone(), child_level));
                }
            }
            for (child, child_level) in admitted_children.into_iter().rev() {
                stack.push((child, child_level, Some(idx)));
            }
        }

        // Width pass: children carry higher indices, so a reverse sweep
        // sees every subtree width before its parent needs it.
        let mut subtree_w = vec![NODE_WIDTH; vis.len()];
        for i in (0..vis.len()).rev() {
            if vis[i].children.is_empty() {
                continue;
            }
            let kids: i64 = vis[i]
                .children
                .iter()
                .map(|&c| subtree_w[c])
                .sum::<i64>()
                + SIBLING_GAP * (vis[i].children.len() as i64 - 1);
            subtree_w[i] = kids.max(NODE_WIDTH);
        }

        // Position pass: forward sweep assigns each subtree a span and
        // centers children within the parent's span.
        let mut x_off = vec![0i64; vis.len()];
        let mut center = vec![0i64; vis.len()];
        for i in 0..vis.len() {
            center[i] = x_off[i] + subtree_w[i] / 2;
            if vis[i].children.is_empty() {
                continue;
            }
            let total: i64 = vis[i]
                .children
                .iter()
                .map(|&c| subtree_w[c])
                .sum::<i64>()
                + SIBLING_GAP * (vis[i].children.len() as i64 - 1);
            let mut cursor = x_off[i] + (subtree_w[i] - total) / 2;
            for &c in &vis[i].children {
                x_off[c] = cursor;
                cursor += subtree_w[c] + SIBLING_GAP;
            }
        }

        let mut nodes = Vec::with_capacity(vis.len());
        let mut edges = Vec::new();
        let mut depth = 0;
        for (i, v) in vis.iter().enumerate() {
            nodes.push(LayoutNode {
                id: v.id.clone(),
                name: v.name.clone(),
                rank: v.rank.clone(),
                is_active: v.is_active,
                level: v.level,
                row: v.row,
                center: center[i],
            });
            depth = depth.max(v.row + 1);
            for &c in &v.children {
                edges.push(LayoutEdge { parent: i, child: c });
            }
        }

        tracing::trace!(
            visible = nodes.len(),
            depth,
            "tree layout computed"
        );
        TreeLayout {
            nodes,
            edges,
            width: subtree_w.first().copied().unwrap_or(0),
            depth,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolve a layout-space point to the node whose box contains it.
    /// `x` is in layout cells, `row` is the level row the point falls on.
    pub fn hit_test(&self, x: i64, row: u32) -> Option<&LayoutNode> {
        self.nodes
            .iter()
            .find(|n| n.row == row && x >= n.left_edge() && x < n.right_edge())
    }

    /// Index of a node by member id.
    pub fn index_of(&self, id: &MemberId) -> Option<usize> {
        self.nodes.iter().position(|n| &n.id == id)
    }
}

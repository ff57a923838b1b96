//! Filter semantics exercised through the layout pass, including the
//! subtree-pruning scenarios the dashboard contract guarantees.

use chrono::NaiveDate;
use downline_model::{sample_tree, MemberId, MemberRecord, OrgTree, Position};
use downline_view::{TreeLayout, ViewFilters};

fn record(id: &str, name: &str, active: bool) -> MemberRecord {
    MemberRecord::new(
        MemberId::new(id.to_string()),
        name,
        format!("{id}@example.com"),
        "",
        NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
        "Bronze Partner",
        active,
    )
}

fn visible_names(layout: &TreeLayout) -> Vec<&str> {
    layout.nodes.iter().map(|n| n.name.as_str()).collect()
}

#[test]
fn test_hidden_parent_hides_active_descendant() {
    // Root with active L and inactive R; R has an active child RC.
    // Hiding inactive members must hide RC as well - no orphaned nodes.
    let mut tree = OrgTree::new(record("root", "Root", true));
    let root = tree.root_id().clone();
    tree.insert(&root, Position::Left, record("l", "L", true)).unwrap();
    let r = tree.insert(&root, Position::Right, record("r", "R", false)).unwrap();
    tree.insert(&r, Position::Left, record("rc", "RC", true)).unwrap();

    let mut filters = ViewFilters::default();
    filters.show_inactive = false;
    let layout = TreeLayout::compute(&tree, &root, &filters);

    assert_eq!(visible_names(&layout), vec!["Root", "L"]);
}

#[test]
fn test_max_level_prunes_deeper_members() {
    let mut tree = OrgTree::new(record("root", "Root", true));
    let root = tree.root_id().clone();
    let a = tree.insert(&root, Position::Left, record("a", "A", true)).unwrap();
    let b = tree.insert(&a, Position::Left, record("b", "B", true)).unwrap();
    tree.insert(&b, Position::Left, record("c", "C", true)).unwrap();

    let mut filters = ViewFilters::default();
    filters.set_max_level(2);
    let layout = TreeLayout::compute(&tree, &root, &filters);

    assert_eq!(visible_names(&layout), vec!["Root", "A", "B"]);
    assert!(layout.nodes.iter().all(|n| n.level <= 2));
}

#[test]
fn test_search_prunes_subtree_of_nonmatching_root() {
    // Literal per-node semantics: "ali" matches Alice Smith but the
    // root "You" fails the term, so the whole tree is pruned. Ancestors
    // of a match get no exemption.
    let tree = sample_tree();
    let mut filters = ViewFilters::default();
    filters.set_search("ali");
    let layout = TreeLayout::compute(&tree, tree.root_id(), &filters);

    assert!(layout.is_empty());
}

#[test]
fn test_search_keeps_path_while_every_name_matches() {
    // "o" matches "You", "John Doe", and "Bob Johnson" but neither
    // "Jane Smith" nor "Alice Smith"; the matching path stays visible
    // and the failing branches are pruned where they fail.
    let tree = sample_tree();
    let mut filters = ViewFilters::default();
    filters.set_search("o");
    let layout = TreeLayout::compute(&tree, tree.root_id(), &filters);

    assert_eq!(visible_names(&layout), vec!["You", "John Doe", "Bob Johnson"]);
}

#[test]
fn test_search_never_shows_nonmatching_member() {
    let tree = sample_tree();
    let mut filters = ViewFilters::default();
    filters.set_search("smith");
    let layout = TreeLayout::compute(&tree, tree.root_id(), &filters);

    // "You" fails "smith" immediately; nothing below can surface.
    assert!(layout.is_empty());
}

#[test]
fn test_filters_combine() {
    let mut tree = OrgTree::new(record("root", "Ann Org", true));
    let root = tree.root_id().clone();
    let l = tree.insert(&root, Position::Left, record("l", "Ann Left", true)).unwrap();
    tree.insert(&root, Position::Right, record("r", "Ann Right", false)).unwrap();
    tree.insert(&l, Position::Left, record("ll", "Ann Deep", true)).unwrap();

    let mut filters = ViewFilters::default();
    filters.show_inactive = false;
    filters.set_max_level(1);
    filters.set_search("ann");
    let layout = TreeLayout::compute(&tree, &root, &filters);

    assert_eq!(visible_names(&layout), vec!["Ann Org", "Ann Left"]);
}

#[test]
fn test_no_filters_shows_everything() {
    let tree = sample_tree();
    let layout = TreeLayout::compute(&tree, tree.root_id(), &ViewFilters::default());
    assert_eq!(layout.nodes.len(), 7);
    assert_eq!(layout.depth, 3);
}

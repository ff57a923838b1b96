use chrono::NaiveDate;
use downline_model::{MemberId, MemberRecord, OrgTree, Position, TreeError};

fn record(id: &str, name: &str, active: bool) -> MemberRecord {
    MemberRecord::new(
        MemberId::new(id.to_string()),
        name,
        format!("{id}@example.com"),
        "(555) 000-0000",
        NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
        "Bronze Partner",
        active,
    )
}

#[test]
fn test_root_level_zero() {
    let tree = OrgTree::new(record("root", "You", true));
    assert_eq!(tree.level_of(tree.root_id()), Some(0));
    assert_eq!(tree.position_of(tree.root_id()), Some(Position::Root));
    assert_eq!(tree.len(), 1);
}

#[test]
fn test_child_level_is_parent_plus_one() {
    let mut tree = OrgTree::new(record("root", "You", true));
    let root = tree.root_id().clone();
    let a = tree.insert(&root, Position::Left, record("a", "A", true)).unwrap();
    let b = tree.insert(&a, Position::Right, record("b", "B", true)).unwrap();

    assert_eq!(tree.level_of(&a), Some(1));
    assert_eq!(tree.level_of(&b), Some(2));
    for id in tree.member_ids() {
        match tree.parent_of(id) {
            Some(parent) => {
                assert_eq!(tree.level_of(id), tree.level_of(parent).map(|l| l + 1));
            }
            None => assert_eq!(tree.level_of(id), Some(0)),
        }
    }
}

#[test]
fn test_slot_occupied_rejected() {
    let mut tree = OrgTree::new(record("root", "You", true));
    let root = tree.root_id().clone();
    tree.insert(&root, Position::Left, record("a", "A", true)).unwrap();
    let err = tree
        .insert(&root, Position::Left, record("b", "B", true))
        .unwrap_err();
    assert!(matches!(err, TreeError::SlotOccupied { position: Position::Left, .. }));
    // The right slot is still open.
    tree.insert(&root, Position::Right, record("b", "B", true)).unwrap();
}

#[test]
fn test_duplicate_id_rejected() {
    let mut tree = OrgTree::new(record("root", "You", true));
    let root = tree.root_id().clone();
    tree.insert(&root, Position::Left, record("a", "A", true)).unwrap();
    let err = tree
        .insert(&root, Position::Right, record("a", "A again", true))
        .unwrap_err();
    assert!(matches!(err, TreeError::DuplicateMember(_)));
}

#[test]
fn test_child_at_root_position_rejected() {
    let mut tree = OrgTree::new(record("root", "You", true));
    let root = tree.root_id().clone();
    let err = tree
        .insert(&root, Position::Root, record("a", "A", true))
        .unwrap_err();
    assert!(matches!(err, TreeError::ChildAtRoot));
}

#[test]
fn test_unknown_parent_rejected() {
    let mut tree = OrgTree::new(record("root", "You", true));
    let ghost = MemberId::new("ghost".to_string());
    let err = tree
        .insert(&ghost, Position::Left, record("a", "A", true))
        .unwrap_err();
    assert!(matches!(err, TreeError::UnknownMember(_)));
}

#[test]
fn test_first_open_slot_policy() {
    let mut tree = OrgTree::new(record("root", "You", true));
    let root = tree.root_id().clone();
    assert_eq!(tree.first_open_slot(&root), Some(Position::Left));

    tree.insert(&root, Position::Left, record("a", "A", true)).unwrap();
    assert_eq!(tree.first_open_slot(&root), Some(Position::Right));

    tree.insert(&root, Position::Right, record("b", "B", true)).unwrap();
    assert_eq!(tree.first_open_slot(&root), None);
}

#[test]
fn test_first_open_slot_is_count_based() {
    // A member whose single child sits in the right slot is still
    // offered "right" by the count-based policy; the insert then fails
    // on the occupied slot rather than silently moving the new member.
    let mut tree = OrgTree::new(record("root", "You", true));
    let root = tree.root_id().clone();
    tree.insert(&root, Position::Right, record("r", "R", true)).unwrap();

    assert_eq!(tree.first_open_slot(&root), Some(Position::Right));
    let err = tree
        .insert(&root, Position::Right, record("x", "X", true))
        .unwrap_err();
    assert!(matches!(err, TreeError::SlotOccupied { .. }));
}

#[test]
fn test_team_size_is_descendant_count() {
    let mut tree = OrgTree::new(record("root", "You", true));
    let root = tree.root_id().clone();
    let a = tree.insert(&root, Position::Left, record("a", "A", true)).unwrap();
    let b = tree.insert(&root, Position::Right, record("b", "B", true)).unwrap();
    let c = tree.insert(&a, Position::Left, record("c", "C", true)).unwrap();
    tree.insert(&c, Position::Left, record("d", "D", true)).unwrap();

    assert_eq!(tree.team_size(&root), 4);
    assert_eq!(tree.team_size(&a), 2);
    assert_eq!(tree.team_size(&b), 0);
    assert_eq!(tree.team_size(&c), 1);
}

#[test]
fn test_leg_counts_sum_to_team_size() {
    let mut tree = OrgTree::new(record("root", "You", true));
    let root = tree.root_id().clone();
    let a = tree.insert(&root, Position::Left, record("a", "A", true)).unwrap();
    tree.insert(&root, Position::Right, record("b", "B", true)).unwrap();
    tree.insert(&a, Position::Left, record("c", "C", true)).unwrap();
    tree.insert(&a, Position::Right, record("d", "D", true)).unwrap();

    let legs = tree.leg_counts(&root);
    assert_eq!(legs.left, 3);
    assert_eq!(legs.right, 1);
    assert_eq!(legs.total(), tree.team_size(&root));
}

#[test]
fn test_descendants_preorder_left_leg_first() {
    let mut tree = OrgTree::new(record("root", "You", true));
    let root = tree.root_id().clone();
    let a = tree.insert(&root, Position::Left, record("a", "A", true)).unwrap();
    tree.insert(&root, Position::Right, record("b", "B", true)).unwrap();
    tree.insert(&a, Position::Left, record("c", "C", true)).unwrap();
    tree.insert(&a, Position::Right, record("d", "D", true)).unwrap();

    let order: Vec<&str> = tree.descendants(&root).map(|id| id.as_str()).collect();
    assert_eq!(order, vec!["a", "c", "d", "b"]);
}

#[test]
fn test_deep_chain_traversal_does_not_recurse() {
    // A degenerate 10k-deep chain; traversal must stay iterative.
    let mut tree = OrgTree::new(record("root", "You", true));
    let mut parent = tree.root_id().clone();
    for i in 0..10_000 {
        parent = tree
            .insert(&parent, Position::Left, record(&format!("m{i}"), "M", true))
            .unwrap();
    }
    assert_eq!(tree.team_size(tree.root_id()), 10_000);
    assert_eq!(tree.level_of(&parent), Some(10_000));
}

#[test]
fn test_children_of_orders_left_before_right() {
    let mut tree = OrgTree::new(record("root", "You", true));
    let root = tree.root_id().clone();
    // Insert right first; enumeration order must still be left, right.
    tree.insert(&root, Position::Right, record("b", "B", true)).unwrap();
    tree.insert(&root, Position::Left, record("a", "A", true)).unwrap();

    let children: Vec<&str> = tree.children_of(&root).iter().map(|id| id.as_str()).collect();
    assert_eq!(children, vec!["a", "b"]);
}

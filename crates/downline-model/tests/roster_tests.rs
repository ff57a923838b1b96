use chrono::NaiveDate;
use downline_model::{
    read_roster, roster_from_tree, sample_tree, tree_from_roster, write_roster, MemberId,
    Position, RosterEntry, RosterError, TreeError,
};

fn entry(id: &str, name: &str, children: Vec<RosterEntry>) -> RosterEntry {
    RosterEntry {
        id: MemberId::new(id.to_string()),
        name: name.to_string(),
        email: format!("{id}@example.com"),
        phone: "(555) 000-0000".to_string(),
        join_date: NaiveDate::from_ymd_opt(2023, 2, 1).unwrap(),
        rank: "Bronze Partner".to_string(),
        is_active: true,
        level: None,
        position: None,
        children,
    }
}

#[test]
fn test_roster_builds_tree_with_ordered_slots() {
    let roster = entry(
        "root",
        "You",
        vec![entry("a", "A", vec![]), entry("b", "B", vec![])],
    );
    let tree = tree_from_roster(&roster).unwrap();

    assert_eq!(tree.len(), 3);
    let a = MemberId::new("a".to_string());
    let b = MemberId::new("b".to_string());
    assert_eq!(tree.position_of(&a), Some(Position::Left));
    assert_eq!(tree.position_of(&b), Some(Position::Right));
    assert_eq!(tree.level_of(&a), Some(1));
}

#[test]
fn test_roster_rejects_three_children() {
    let roster = entry(
        "root",
        "You",
        vec![
            entry("a", "A", vec![]),
            entry("b", "B", vec![]),
            entry("c", "C", vec![]),
        ],
    );
    let err = tree_from_roster(&roster).unwrap_err();
    assert!(matches!(err, TreeError::TooManyChildren { .. }));
}

#[test]
fn test_roster_rejects_duplicate_ids() {
    let roster = entry(
        "root",
        "You",
        vec![entry("a", "A", vec![]), entry("a", "A again", vec![])],
    );
    let err = tree_from_roster(&roster).unwrap_err();
    assert!(matches!(err, TreeError::DuplicateMember(_)));
}

#[test]
fn test_roster_rejects_inconsistent_stored_level() {
    let mut child = entry("a", "A", vec![]);
    child.level = Some(5);
    let roster = entry("root", "You", vec![child]);
    let err = tree_from_roster(&roster).unwrap_err();
    assert!(matches!(
        err,
        TreeError::LevelMismatch { expected: 1, found: 5, .. }
    ));
}

#[test]
fn test_roster_rejects_inconsistent_stored_position() {
    let mut child = entry("a", "A", vec![]);
    child.position = Some(Position::Right);
    let roster = entry("root", "You", vec![child]);
    let err = tree_from_roster(&roster).unwrap_err();
    assert!(matches!(err, TreeError::PositionMismatch { .. }));
}

#[test]
fn test_roster_accepts_consistent_stored_placement() {
    let mut child = entry("a", "A", vec![]);
    child.level = Some(1);
    child.position = Some(Position::Left);
    let roster = entry("root", "You", vec![child]);
    assert!(tree_from_roster(&roster).is_ok());
}

#[test]
fn test_sample_roundtrips_through_roster() {
    let tree = sample_tree();
    let roster = roster_from_tree(&tree);
    let rebuilt = tree_from_roster(&roster).unwrap();

    assert_eq!(rebuilt.len(), tree.len());
    for id in tree.member_ids() {
        assert_eq!(rebuilt.get(id), tree.get(id));
        assert_eq!(rebuilt.level_of(id), tree.level_of(id));
        assert_eq!(rebuilt.position_of(id), tree.position_of(id));
    }
}

#[test]
fn test_roster_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.json");

    let tree = sample_tree();
    write_roster(&path, &tree).unwrap();
    let rebuilt = read_roster(&path).unwrap();

    assert_eq!(rebuilt.len(), tree.len());
    assert_eq!(rebuilt.root_id(), tree.root_id());
}

#[test]
fn test_read_roster_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_roster(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, RosterError::Read { .. }));
}

#[test]
fn test_read_roster_invalid_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = read_roster(&path).unwrap_err();
    assert!(matches!(err, RosterError::Parse(_)));
}

//! Built-in sample organization, used when no roster file is supplied.

use chrono::NaiveDate;

use crate::error::TreeError;
use crate::member::{MemberId, MemberRecord, Position};
use crate::tree::OrgTree;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn member(
    id: &str,
    name: &str,
    email: &str,
    phone: &str,
    joined: NaiveDate,
    rank: &str,
    is_active: bool,
) -> MemberRecord {
    MemberRecord::new(
        MemberId::new(id.to_string()),
        name,
        email,
        phone,
        joined,
        rank,
        is_active,
    )
}

fn seed() -> Result<OrgTree, TreeError> {
    let mut tree = OrgTree::new(member(
        "root",
        "You",
        "you@example.com",
        "(555) 123-4567",
        date(2022, 1, 1),
        "Diamond Partner",
        true,
    ));
    let root = tree.root_id().clone();

    let john = tree.insert(
        &root,
        Position::Left,
        member(
            "left1",
            "John Doe",
            "john.doe@example.com",
            "(555) 234-5678",
            date(2022, 3, 15),
            "Gold Partner",
            true,
        ),
    )?;
    let jane = tree.insert(
        &root,
        Position::Right,
        member(
            "right1",
            "Jane Smith",
            "jane.smith@example.com",
            "(555) 567-8901",
            date(2022, 4, 5),
            "Platinum Partner",
            true,
        ),
    )?;

    tree.insert(
        &john,
        Position::Left,
        member(
            "left1-left",
            "Alice Smith",
            "alice@example.com",
            "(555) 345-6789",
            date(2022, 5, 20),
            "Silver Partner",
            true,
        ),
    )?;
    tree.insert(
        &john,
        Position::Right,
        member(
            "left1-right",
            "Bob Johnson",
            "bob@example.com",
            "(555) 456-7890",
            date(2022, 6, 10),
            "Bronze Partner",
            false,
        ),
    )?;

    tree.insert(
        &jane,
        Position::Left,
        member(
            "right1-left",
            "Carol Williams",
            "carol@example.com",
            "(555) 678-9012",
            date(2022, 7, 15),
            "Silver Partner",
            true,
        ),
    )?;
    tree.insert(
        &jane,
        Position::Right,
        member(
            "right1-right",
            "David Brown",
            "david@example.com",
            "(555) 789-0123",
            date(2022, 8, 1),
            "Gold Partner",
            true,
        ),
    )?;

    Ok(tree)
}

/// The seven-member demo organization: "You" at the root with the John
/// Doe and Jane Smith legs beneath, one inactive member (Bob Johnson).
pub fn sample_tree() -> OrgTree {
    seed().expect("sample organization is well-formed")
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a member of the organization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberId(pub String);

impl MemberId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Generate a fresh unique member ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Placement of a member relative to its sponsor.
///
/// The root of the organization is the only member with `Root`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Left,
    Right,
    Root,
}

impl Position {
    pub fn is_root(&self) -> bool {
        matches!(self, Position::Root)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Position::Left => write!(f, "left"),
            Position::Right => write!(f, "right"),
            Position::Root => write!(f, "root"),
        }
    }
}

/// Facts about a member, independent of tree placement.
///
/// Team size is deliberately absent: it is always derived from the tree
/// (`OrgTree::team_size`) so the stored roster can never drift from the
/// actual downline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub id: MemberId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub join_date: NaiveDate,
    /// Free-form rank label, e.g. "Gold Partner".
    pub rank: String,
    pub is_active: bool,
}

impl MemberRecord {
    pub fn new(
        id: MemberId,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        join_date: NaiveDate,
        rank: impl Into<String>,
        is_active: bool,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            join_date,
            rank: rank.into(),
            is_active,
        }
    }
}

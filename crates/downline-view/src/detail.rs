use downline_model::{MemberId, OrgTree};

/// Snapshot of one member for the detail panel. Holds nothing beyond
/// what it is given; team size is derived from the tree at projection
/// time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDetails {
    pub id: MemberId,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Long-form join date, e.g. "March 15, 2022".
    pub joined: String,
    pub rank: String,
    pub team_size: usize,
    pub is_active: bool,
}

impl MemberDetails {
    pub fn project(tree: &OrgTree, id: &MemberId) -> Option<MemberDetails> {
        let record = tree.get(id)?;
        Some(MemberDetails {
            id: record.id.clone(),
            name: record.name.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            joined: record.join_date.format("%B %-d, %Y").to_string(),
            rank: record.rank.clone(),
            team_size: tree.team_size(id),
            is_active: record.is_active,
        })
    }
}

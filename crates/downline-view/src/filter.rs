use downline_model::MemberRecord;

/// Display filters for the team tree.
///
/// Filters combine independently and are evaluated per node in a fixed
/// order: active flag, level bound, name search. A member excluded by
/// any filter is pruned together with its entire subtree; descendants
/// are never rendered orphaned. The search is strictly per node:
/// ancestors of a matching member get no exemption, so a failing
/// ancestor hides the match below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewFilters {
    /// When false, inactive members (and their subtrees) are hidden.
    pub show_inactive: bool,
    /// Members deeper than this absolute level are hidden. Always >= 1.
    pub max_level: u32,
    /// Case-insensitive substring match against the member name.
    /// Empty means no search filtering.
    pub search_term: String,
}

impl Default for ViewFilters {
    fn default() -> Self {
        Self {
            show_inactive: true,
            max_level: 3,
            search_term: String::new(),
        }
    }
}

impl ViewFilters {
    /// Clamp-setting for the level bound; a depth below 1 is meaningless.
    pub fn set_max_level(&mut self, level: u32) {
        self.max_level = level.max(1);
    }

    pub fn deepen(&mut self) {
        self.max_level = self.max_level.saturating_add(1);
    }

    pub fn shallow(&mut self) {
        self.set_max_level(self.max_level.saturating_sub(1));
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Whether a member at `level` passes every filter.
    pub fn admits(&self, record: &MemberRecord, level: u32) -> bool {
        if !self.show_inactive && !record.is_active {
            return false;
        }
        if level > self.max_level {
            return false;
        }
        if !self.search_term.is_empty() {
            let needle = self.search_term.to_lowercase();
            if !record.name.to_lowercase().contains(&needle) {
                return false;
            }
        }
        true
    }

    /// Short human summary for the status bar, e.g. `depth<=3, active only`.
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("depth<={}", self.max_level)];
        if !self.show_inactive {
            parts.push("active only".to_string());
        }
        if !self.search_term.is_empty() {
            parts.push(format!("search \"{}\"", self.search_term));
        }
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use downline_model::{MemberId, MemberRecord};

    fn record(name: &str, active: bool) -> MemberRecord {
        MemberRecord::new(
            MemberId::generate(),
            name,
            "x@example.com",
            "",
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            "Bronze Partner",
            active,
        )
    }

    #[test]
    fn test_defaults_match_initial_dashboard_state() {
        let filters = ViewFilters::default();
        assert!(filters.show_inactive);
        assert_eq!(filters.max_level, 3);
        assert!(filters.search_term.is_empty());
    }

    #[test]
    fn test_inactive_admitted_only_when_shown() {
        let mut filters = ViewFilters::default();
        assert!(filters.admits(&record("Bob", false), 1));
        filters.show_inactive = false;
        assert!(!filters.admits(&record("Bob", false), 1));
        assert!(filters.admits(&record("Ann", true), 1));
    }

    #[test]
    fn test_level_bound() {
        let mut filters = ViewFilters::default();
        filters.set_max_level(2);
        assert!(filters.admits(&record("Ann", true), 2));
        assert!(!filters.admits(&record("Ann", true), 3));
    }

    #[test]
    fn test_max_level_never_below_one() {
        let mut filters = ViewFilters::default();
        filters.set_max_level(0);
        assert_eq!(filters.max_level, 1);
        filters.set_max_level(1);
        filters.shallow();
        assert_eq!(filters.max_level, 1);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let mut filters = ViewFilters::default();
        filters.set_search("ali");
        assert!(filters.admits(&record("Alice Smith", true), 1));
        assert!(filters.admits(&record("NATALIE", true), 1));
        assert!(!filters.admits(&record("John Doe", true), 1));
    }
}

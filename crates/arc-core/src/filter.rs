//! Filter types for querying issues within a workspace.

use crate::enums::{IssueType, SortPolicy, Status};

/// Filter for the general issue-listing endpoint (`GET .../issues`).
#[derive(Debug, Clone, Default)]
pub struct IssueFilter {
    pub status: Option<Status>,
    pub issue_type: Option<IssueType>,
    pub priority: Option<i32>,
    pub assignee: Option<String>,
    /// Substring match against title/description.
    pub query: Option<String>,
    pub limit: Option<i32>,
    pub offset: Option<i32>,
}

/// Filter for the ready/blocked-work queries (`GET .../ready`, `.../blocked`).
#[derive(Debug, Clone, Default)]
pub struct WorkFilter {
    pub issue_type: Option<IssueType>,
    pub priority: Option<i32>,
    pub assignee: Option<String>,
    /// Filter for issues with no assignee.
    pub unassigned: bool,
    pub limit: Option<i32>,
    pub sort_policy: SortPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_filter_defaults() {
        let f = IssueFilter::default();
        assert!(f.status.is_none());
        assert!(f.query.is_none());
    }

    #[test]
    fn work_filter_defaults() {
        let f = WorkFilter::default();
        assert_eq!(f.sort_policy, SortPolicy::Hybrid);
        assert!(!f.unassigned);
    }
}

//! Validation rules for issues, workspaces, and shared plans.
//!
//! All failures are reported as [`ValidationError`] and mapped to
//! `ArcError::BadRequest` at the service boundary.

use crate::enums::Status;
use crate::issue::Issue;
use crate::plan::NewSharedPlan;
use crate::workspace::NewWorkspace;

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("title is required")]
    TitleRequired,
    #[error("title must be 500 characters or less (got {0})")]
    TitleTooLong(usize),
    #[error("priority must be between 0 and 4 (got {0})")]
    InvalidPriority(i32),
    #[error("closed issues must have a closed_at timestamp")]
    ClosedWithoutTimestamp,
    #[error("non-closed issues cannot have a closed_at timestamp")]
    NotClosedWithTimestamp,
    #[error("workspace name is required")]
    WorkspaceNameRequired,
    #[error("workspace prefix must be 1-15 alphanumeric/hyphen characters")]
    InvalidPrefix,
    #[error("plan title is required")]
    PlanTitleRequired,
    #[error("plan content must not be empty")]
    PlanContentRequired,
    #[error("dependency cannot reference itself")]
    SelfDependency,
}

/// Validates an issue's built-in invariants (title, priority range, the
/// closed_at/closed status coupling). `issue_type` has no invalid values
/// since unknown strings fall back to `IssueType::Custom`.
pub fn validate_issue(issue: &Issue) -> Result<(), ValidationError> {
    if issue.title.is_empty() {
        return Err(ValidationError::TitleRequired);
    }
    if issue.title.len() > 500 {
        return Err(ValidationError::TitleTooLong(issue.title.len()));
    }
    if !(0..=4).contains(&issue.priority) {
        return Err(ValidationError::InvalidPriority(issue.priority));
    }
    if issue.status == Status::Closed && issue.closed_at.is_none() {
        return Err(ValidationError::ClosedWithoutTimestamp);
    }
    if issue.status != Status::Closed && issue.closed_at.is_some() {
        return Err(ValidationError::NotClosedWithTimestamp);
    }
    Ok(())
}

/// Validates a workspace prefix: 1-15 alphanumeric/hyphen characters.
pub fn validate_prefix(prefix: &str) -> Result<(), ValidationError> {
    if prefix.is_empty() || prefix.len() > 15 {
        return Err(ValidationError::InvalidPrefix);
    }
    if !prefix.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
        return Err(ValidationError::InvalidPrefix);
    }
    Ok(())
}

pub fn validate_new_workspace(ws: &NewWorkspace) -> Result<(), ValidationError> {
    if ws.name.is_empty() {
        return Err(ValidationError::WorkspaceNameRequired);
    }
    validate_prefix(&ws.prefix)
}

pub fn validate_new_plan(plan: &NewSharedPlan) -> Result<(), ValidationError> {
    if plan.title.is_empty() {
        return Err(ValidationError::PlanTitleRequired);
    }
    if plan.content.trim().is_empty() {
        return Err(ValidationError::PlanContentRequired);
    }
    Ok(())
}

/// Validates that a dependency's two endpoints are distinct. Only
/// self-loops are rejected here; a full blocking-subgraph cycle check is
/// deliberately out of scope.
pub fn validate_dependency_endpoints(issue_id: &str, depends_on_id: &str) -> Result<(), ValidationError> {
    if issue_id == depends_on_id {
        return Err(ValidationError::SelfDependency);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::IssueBuilder;

    #[test]
    fn valid_issue_passes() {
        let issue = IssueBuilder::new("ws-abc123", "A title").build();
        assert!(validate_issue(&issue).is_ok());
    }

    #[test]
    fn empty_title_rejected() {
        let issue = IssueBuilder::new("ws-abc123", "").build();
        assert!(matches!(
            validate_issue(&issue),
            Err(ValidationError::TitleRequired)
        ));
    }

    #[test]
    fn priority_out_of_range_rejected() {
        let issue = IssueBuilder::new("ws-abc123", "Title").priority(5).build();
        assert!(matches!(
            validate_issue(&issue),
            Err(ValidationError::InvalidPriority(5))
        ));
    }

    #[test]
    fn closed_without_timestamp_rejected() {
        let issue = IssueBuilder::new("ws-abc123", "Title")
            .status(Status::Closed)
            .build();
        assert!(matches!(
            validate_issue(&issue),
            Err(ValidationError::ClosedWithoutTimestamp)
        ));
    }

    #[test]
    fn prefix_validation() {
        assert!(validate_prefix("a").is_ok());
        assert!(validate_prefix("my-prefix").is_ok());
        assert!(validate_prefix("").is_err());
        assert!(validate_prefix(&"x".repeat(16)).is_err());
        assert!(validate_prefix("has space").is_err());
    }

    #[test]
    fn plan_with_empty_content_rejected() {
        let plan = NewSharedPlan { title: "Rollout".into(), content: "   ".into() };
        assert!(matches!(
            validate_new_plan(&plan),
            Err(ValidationError::PlanContentRequired)
        ));
    }

    #[test]
    fn self_dependency_rejected() {
        assert!(validate_dependency_endpoints("a-1", "a-1").is_err());
        assert!(validate_dependency_endpoints("a-1", "a-2").is_ok());
    }
}

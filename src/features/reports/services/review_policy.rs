use crate::core::error::{AppError, Result};
use crate::features::reports::models::ReportStatus;
use crate::features::users::model::UserRole;

/// Resolve the status a freshly submitted report starts in.
///
/// Reports from reviewers (experts and admins) skip the queue and land
/// approved; everything else, including anonymous submissions, starts
/// pending.
pub fn initial_status(submitter_role: Option<UserRole>) -> ReportStatus {
    match submitter_role {
        Some(role) if role.is_privileged() => ReportStatus::Approved,
        _ => ReportStatus::Pending,
    }
}

/// Whether a status carries the verification pair. `verified_at` and
/// `verified_by` are set exactly on terminal statuses; pending rows
/// never have them.
pub fn stamps_verification(status: ReportStatus) -> bool {
    status != ReportStatus::Pending
}

/// The row fields a review decision writes. The reason column is
/// rewritten wholesale on every decision, so repeating one is an
/// idempotent rewrite and flipping one leaves no stale reason behind.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionWrite {
    pub status: ReportStatus,
    pub rejection_reason: Option<String>,
}

impl DecisionWrite {
    pub fn stamps_verification(&self) -> bool {
        stamps_verification(self.status)
    }
}

/// An approval keeps the optional reviewer note in the reason column
pub fn approval_write(note: Option<&str>) -> DecisionWrite {
    DecisionWrite {
        status: ReportStatus::Approved,
        rejection_reason: normalize_approval_note(note),
    }
}

pub fn rejection_write(reason: &str) -> Result<DecisionWrite> {
    Ok(DecisionWrite {
        status: ReportStatus::Rejected,
        rejection_reason: Some(normalize_rejection_reason(reason)?),
    })
}

/// A rejection must carry a non-blank reason
pub fn normalize_rejection_reason(reason: &str) -> Result<String> {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(
            "A rejection reason is required".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Reviewer notes on approval are optional; blank notes are dropped
pub fn normalize_approval_note(note: Option<&str>) -> Option<String> {
    note.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinary_submissions_start_pending() {
        assert_eq!(initial_status(None), ReportStatus::Pending);
        assert_eq!(initial_status(Some(UserRole::User)), ReportStatus::Pending);
    }

    #[test]
    fn reviewer_submissions_start_approved() {
        assert_eq!(
            initial_status(Some(UserRole::Expert)),
            ReportStatus::Approved
        );
        assert_eq!(
            initial_status(Some(UserRole::Admin)),
            ReportStatus::Approved
        );
    }

    #[test]
    fn rejection_reason_is_trimmed_and_required() {
        assert_eq!(
            normalize_rejection_reason("  blurry photo  ").unwrap(),
            "blurry photo"
        );
        assert!(matches!(
            normalize_rejection_reason("   "),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn verification_pair_accompanies_terminal_statuses_only() {
        assert!(!stamps_verification(ReportStatus::Pending));
        assert!(stamps_verification(ReportStatus::Approved));
        assert!(stamps_verification(ReportStatus::Rejected));

        assert!(approval_write(None).stamps_verification());
        assert!(rejection_write("wrong pest").unwrap().stamps_verification());

        // Auto-approved submissions are stamped; queued ones are not
        assert!(stamps_verification(initial_status(Some(UserRole::Expert))));
        assert!(!stamps_verification(initial_status(None)));
    }

    #[test]
    fn repeating_a_decision_is_an_idempotent_rewrite() {
        let first = approval_write(Some("confirmed on site"));
        assert_eq!(first, approval_write(Some("confirmed on site")));
        assert_eq!(first.status, ReportStatus::Approved);

        // A later approval without a note clears any stored reason
        assert_eq!(approval_write(None).rejection_reason, None);

        // Flipping the decision replaces the reason column wholesale
        let flipped = rejection_write("wrong pest").unwrap();
        assert_eq!(flipped.status, ReportStatus::Rejected);
        assert_eq!(flipped.rejection_reason.as_deref(), Some("wrong pest"));
    }

    #[test]
    fn blank_approval_notes_are_dropped() {
        assert_eq!(normalize_approval_note(None), None);
        assert_eq!(normalize_approval_note(Some("  ")), None);
        assert_eq!(
            normalize_approval_note(Some(" looks right ")),
            Some("looks right".to_string())
        );
    }
}

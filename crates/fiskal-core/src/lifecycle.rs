//! # Document Lifecycle
//!
//! The status state machine for documents.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Allowed Transitions                                │
//! │                                                                         │
//! │   draft ──► awaiting_payment ──┬──► sent ──► paid                      │
//! │                                └──► paid                                │
//! │                                                                         │
//! │   paid is terminal. Nothing ever moves back to draft.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Transition checks are pure; persisting the new status is the
//! registry's job. A transition never recomputes totals: totals are
//! fixed by line items, independent of status.

use crate::error::{CoreError, CoreResult};
use crate::types::DocumentStatus;

/// Checks whether a status change is allowed.
pub fn can_transition(from: DocumentStatus, to: DocumentStatus) -> bool {
    use DocumentStatus::*;
    matches!(
        (from, to),
        (Draft, AwaitingPayment) | (AwaitingPayment, Sent) | (AwaitingPayment, Paid) | (Sent, Paid)
    )
}

/// Validates a status change, failing with [`CoreError::InvalidTransition`].
///
/// ## Example
/// ```rust
/// use fiskal_core::lifecycle::check_transition;
/// use fiskal_core::types::DocumentStatus;
///
/// assert!(check_transition("FAK-2026-001", DocumentStatus::Draft, DocumentStatus::AwaitingPayment).is_ok());
/// assert!(check_transition("FAK-2026-001", DocumentStatus::Paid, DocumentStatus::Draft).is_err());
/// ```
pub fn check_transition(
    document_id: &str,
    from: DocumentStatus,
    to: DocumentStatus,
) -> CoreResult<()> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition {
            document_id: document_id.to_string(),
            from,
            to,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use DocumentStatus::*;

    #[test]
    fn test_allowed_transitions() {
        assert!(can_transition(Draft, AwaitingPayment));
        assert!(can_transition(AwaitingPayment, Sent));
        assert!(can_transition(AwaitingPayment, Paid));
        assert!(can_transition(Sent, Paid));
    }

    #[test]
    fn test_draft_cannot_skip_to_sent() {
        // Sending goes through awaiting_payment first
        assert!(!can_transition(Draft, Sent));
        assert!(!can_transition(Draft, Paid));
    }

    #[test]
    fn test_nothing_returns_to_draft() {
        assert!(!can_transition(AwaitingPayment, Draft));
        assert!(!can_transition(Sent, Draft));
        assert!(!can_transition(Paid, Draft));
    }

    #[test]
    fn test_paid_is_terminal() {
        for to in [Draft, AwaitingPayment, Sent, Paid] {
            assert!(!can_transition(Paid, to));
        }
    }

    #[test]
    fn test_self_transitions_rejected() {
        for status in [Draft, AwaitingPayment, Sent, Paid] {
            assert!(!can_transition(status, status));
        }
    }

    #[test]
    fn test_check_transition_error_carries_context() {
        let err = check_transition("PR-2026-007", Paid, Draft).unwrap_err();
        match err {
            CoreError::InvalidTransition { document_id, from, to } => {
                assert_eq!(document_id, "PR-2026-007");
                assert_eq!(from, Paid);
                assert_eq!(to, Draft);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

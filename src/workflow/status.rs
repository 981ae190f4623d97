//! Lifecycle states and their transition tables
//!
//! Every legal edge lives in one `match` per entity kind. Call sites never
//! compare statuses themselves; they ask the table and get back either the
//! target status or a [`TransitionError`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Enhancement status in the triage workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnhancementStatus {
    /// Submitted, awaiting triage
    Open,
    /// Accepted for implementation
    Accepted,
    /// Accepted work has shipped
    Completed,
    /// Promoted into a rule-change proposal
    Transferred,
    /// Declined during triage
    Rejected,
}

impl Default for EnhancementStatus {
    fn default() -> Self {
        EnhancementStatus::Open
    }
}

/// Reviewer actions that move an enhancement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnhancementAction {
    Accept,
    Reject,
    Complete,
    Transfer,
}

impl EnhancementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnhancementStatus::Open => "open",
            EnhancementStatus::Accepted => "accepted",
            EnhancementStatus::Completed => "completed",
            EnhancementStatus::Transferred => "transferred",
            EnhancementStatus::Rejected => "rejected",
        }
    }

    /// Transition table. `None` means the edge does not exist.
    pub fn target(self, action: EnhancementAction) -> Option<EnhancementStatus> {
        use EnhancementAction as A;
        use EnhancementStatus as S;

        match (self, action) {
            (S::Open, A::Accept) => Some(S::Accepted),
            (S::Open, A::Reject) => Some(S::Rejected),
            (S::Open, A::Transfer) => Some(S::Transferred),
            (S::Accepted, A::Complete) => Some(S::Completed),
            _ => None,
        }
    }

    pub fn apply(self, action: EnhancementAction) -> Result<EnhancementStatus, TransitionError> {
        self.target(action).ok_or_else(|| TransitionError {
            entity: "enhancement",
            from: self.as_str(),
            action: action.as_str(),
        })
    }
}

impl EnhancementAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnhancementAction::Accept => "accept",
            EnhancementAction::Reject => "reject",
            EnhancementAction::Complete => "complete",
            EnhancementAction::Transfer => "transfer",
        }
    }
}

/// Proposal status in the review workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    /// Awaiting a review decision
    Pending,
    /// Approved; a rule has been published from it
    Approved,
    /// Declined by a reviewer
    Rejected,
    /// Sent back to triage as a fresh enhancement
    Reverted,
}

impl Default for ProposalStatus {
    fn default() -> Self {
        ProposalStatus::Pending
    }
}

/// Reviewer actions on a proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalAction {
    Approve,
    Reject,
    /// Send back to triage as a fresh enhancement
    Revert,
}

impl ProposalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalStatus::Pending => "pending",
            ProposalStatus::Approved => "approved",
            ProposalStatus::Rejected => "rejected",
            ProposalStatus::Reverted => "reverted",
        }
    }

    /// Transition table. `None` means the edge does not exist.
    pub fn target(self, action: ProposalAction) -> Option<ProposalStatus> {
        use ProposalAction as A;
        use ProposalStatus as S;

        match (self, action) {
            (S::Pending, A::Approve) => Some(S::Approved),
            (S::Pending, A::Reject) => Some(S::Rejected),
            // An approved proposal already produced an immutable rule.
            (S::Pending, A::Revert) | (S::Rejected, A::Revert) => Some(S::Reverted),
            _ => None,
        }
    }

    pub fn apply(self, action: ProposalAction) -> Result<ProposalStatus, TransitionError> {
        self.target(action).ok_or_else(|| TransitionError {
            entity: "proposal",
            from: self.as_str(),
            action: action.as_str(),
        })
    }
}

impl ProposalAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalAction::Approve => "approve",
            ProposalAction::Reject => "reject",
            ProposalAction::Revert => "revert",
        }
    }
}

/// An edge missing from a transition table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot {action} {entity} with status '{from}'")]
pub struct TransitionError {
    pub entity: &'static str,
    pub from: &'static str,
    pub action: &'static str,
}

/// Unrecognized status name in a query string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for EnhancementStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(EnhancementStatus::Open),
            "accepted" => Ok(EnhancementStatus::Accepted),
            "completed" => Ok(EnhancementStatus::Completed),
            "transferred" => Ok(EnhancementStatus::Transferred),
            "rejected" => Ok(EnhancementStatus::Rejected),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

impl FromStr for ProposalStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ProposalStatus::Pending),
            "approved" => Ok(ProposalStatus::Approved),
            "rejected" => Ok(ProposalStatus::Rejected),
            "reverted" => Ok(ProposalStatus::Reverted),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

impl fmt::Display for EnhancementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ENHANCEMENT: [EnhancementStatus; 5] = [
        EnhancementStatus::Open,
        EnhancementStatus::Accepted,
        EnhancementStatus::Completed,
        EnhancementStatus::Transferred,
        EnhancementStatus::Rejected,
    ];

    const ALL_ENHANCEMENT_ACTIONS: [EnhancementAction; 4] = [
        EnhancementAction::Accept,
        EnhancementAction::Reject,
        EnhancementAction::Complete,
        EnhancementAction::Transfer,
    ];

    #[test]
    fn test_enhancement_edges_are_exactly_the_documented_ones() {
        let mut legal = Vec::new();
        for from in ALL_ENHANCEMENT {
            for action in ALL_ENHANCEMENT_ACTIONS {
                if let Some(to) = from.target(action) {
                    legal.push((from, action, to));
                }
            }
        }

        assert_eq!(
            legal,
            vec![
                (EnhancementStatus::Open, EnhancementAction::Accept, EnhancementStatus::Accepted),
                (EnhancementStatus::Open, EnhancementAction::Reject, EnhancementStatus::Rejected),
                (EnhancementStatus::Open, EnhancementAction::Transfer, EnhancementStatus::Transferred),
                (EnhancementStatus::Accepted, EnhancementAction::Complete, EnhancementStatus::Completed),
            ]
        );
    }

    #[test]
    fn test_terminal_enhancements_have_no_outgoing_edges() {
        let terminal = [
            EnhancementStatus::Completed,
            EnhancementStatus::Transferred,
            EnhancementStatus::Rejected,
        ];
        for from in terminal {
            for action in ALL_ENHANCEMENT_ACTIONS {
                assert!(from.apply(action).is_err(), "{from} --{action:?}--> should fail");
            }
        }
    }

    #[test]
    fn test_complete_requires_accepted() {
        let err = EnhancementStatus::Open
            .apply(EnhancementAction::Complete)
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot complete enhancement with status 'open'");
    }

    #[test]
    fn test_proposal_edges() {
        assert_eq!(
            ProposalStatus::Pending.apply(ProposalAction::Approve),
            Ok(ProposalStatus::Approved)
        );
        assert_eq!(
            ProposalStatus::Pending.apply(ProposalAction::Reject),
            Ok(ProposalStatus::Rejected)
        );
        assert!(ProposalStatus::Approved.apply(ProposalAction::Approve).is_err());
        assert!(ProposalStatus::Rejected.apply(ProposalAction::Approve).is_err());
        assert!(ProposalStatus::Rejected.apply(ProposalAction::Reject).is_err());
    }

    #[test]
    fn test_revert_excludes_approved() {
        assert_eq!(
            ProposalStatus::Pending.apply(ProposalAction::Revert),
            Ok(ProposalStatus::Reverted)
        );
        assert_eq!(
            ProposalStatus::Rejected.apply(ProposalAction::Revert),
            Ok(ProposalStatus::Reverted)
        );
        assert!(ProposalStatus::Approved.apply(ProposalAction::Revert).is_err());
    }

    #[test]
    fn test_reverted_proposal_is_closed() {
        for action in [ProposalAction::Approve, ProposalAction::Reject, ProposalAction::Revert] {
            assert!(
                ProposalStatus::Reverted.apply(action).is_err(),
                "reverted --{action:?}--> should fail"
            );
        }
        let err = ProposalStatus::Reverted
            .apply(ProposalAction::Approve)
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot approve proposal with status 'reverted'");
    }

    #[test]
    fn test_parse_status_names() {
        assert_eq!("Transferred".parse(), Ok(EnhancementStatus::Transferred));
        assert_eq!(" pending ".parse(), Ok(ProposalStatus::Pending));
        assert_eq!("reverted".parse(), Ok(ProposalStatus::Reverted));
        assert!("merged".parse::<ProposalStatus>().is_err());
        assert!("".parse::<EnhancementStatus>().is_err());
    }

    #[test]
    fn test_serde_names_match_display() {
        for status in ALL_ENHANCEMENT {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
    }
}

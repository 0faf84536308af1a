//! Client inquiry status machine.
//!
//! Inquiries move forward only: `open → in_review → resolved → closed`.
//! Admins may jump ahead (e.g. straight to `resolved`), but nothing moves
//! backwards and `closed` is terminal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InquiryStatus {
    #[default]
    Open,
    InReview,
    Resolved,
    Closed,
}

/// Statuses counted as awaiting staff attention.
pub const OPEN_INQUIRY_STATUSES: [InquiryStatus; 2] = [InquiryStatus::Open, InquiryStatus::InReview];

/// Status applied by a response that names none.
pub const DEFAULT_RESPONSE_STATUS: InquiryStatus = InquiryStatus::InReview;

impl InquiryStatus {
    pub const ALL: [InquiryStatus; 4] = [
        InquiryStatus::Open,
        InquiryStatus::InReview,
        InquiryStatus::Resolved,
        InquiryStatus::Closed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InquiryStatus::Open => "open",
            InquiryStatus::InReview => "in_review",
            InquiryStatus::Resolved => "resolved",
            InquiryStatus::Closed => "closed",
        }
    }

    fn stage(self) -> u8 {
        match self {
            InquiryStatus::Open => 0,
            InquiryStatus::InReview => 1,
            InquiryStatus::Resolved => 2,
            InquiryStatus::Closed => 3,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == InquiryStatus::Closed
    }
}

impl fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InquiryStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InquiryStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid inquiry status '{s}'. Must be one of: open, in_review, resolved, closed"
                ))
            })
    }
}

impl TryFrom<String> for InquiryStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Check that a response may move an inquiry from `current` to `next`.
pub fn validate_transition(current: InquiryStatus, next: InquiryStatus) -> Result<(), CoreError> {
    if current.is_terminal() {
        return Err(CoreError::Conflict("Inquiry is closed".into()));
    }
    if next.stage() < current.stage() {
        return Err(CoreError::Conflict(format!(
            "Inquiry cannot move back from '{current}' to '{next}'"
        )));
    }
    Ok(())
}

/// Resolution timestamp to persist after a status change. The first move into
/// `resolved` or `closed` stamps `now`.
pub fn resolution_stamp(
    next: InquiryStatus,
    existing: Option<Timestamp>,
    now: Timestamp,
) -> Option<Timestamp> {
    match (next, existing) {
        (_, Some(ts)) => Some(ts),
        (InquiryStatus::Resolved | InquiryStatus::Closed, None) => Some(now),
        _ => None,
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(UserId);
id_newtype!(PaperId);
id_newtype!(ReviewId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Author,
    Reviewer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Author => "author",
            Role::Reviewer => "reviewer",
            Role::Admin => "admin",
        }
    }
}

/// A user as seen by the rest of the system. Never carries a password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaperStatus {
    Submitted,
    UnderReview,
    Reviewed,
    Accepted,
    Rejected,
}

impl PaperStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PaperStatus::Submitted => "submitted",
            PaperStatus::UnderReview => "under review",
            PaperStatus::Reviewed => "reviewed",
            PaperStatus::Accepted => "accepted",
            PaperStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PaperStatus::Accepted | PaperStatus::Rejected)
    }

    /// Position on the forward path; both terminal states share the last rank.
    fn rank(&self) -> u8 {
        match self {
            PaperStatus::Submitted => 0,
            PaperStatus::UnderReview => 1,
            PaperStatus::Reviewed => 2,
            PaperStatus::Accepted | PaperStatus::Rejected => 3,
        }
    }

    /// Whether `next` is the immediate successor of this status.
    pub fn advances_to(&self, next: PaperStatus) -> bool {
        !self.is_terminal() && next.rank() == self.rank() + 1
    }
}

impl fmt::Display for PaperStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    pub id: PaperId,
    pub author_id: UserId,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub filename: String,
    pub status: PaperStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_score: Option<f64>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub paper_id: PaperId,
    pub reviewer_id: UserId,
    pub score: u8,
    pub comments: String,
    pub created_at: DateTime<Utc>,
}

/// Fields an author supplies when submitting a paper.
#[derive(Debug, Clone)]
pub struct NewPaper {
    pub author_id: UserId,
    pub title: String,
    pub abstract_text: String,
    pub filename: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperStats {
    pub total: usize,
    pub submitted: usize,
    pub under_review: usize,
    pub reviewed: usize,
    pub accepted: usize,
    pub rejected: usize,
}

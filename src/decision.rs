use serde::{Deserialize, Serialize};

use crate::db::{PaperStatus, Review};

/// An admin's verdict on a reviewed paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Accept,
    Reject,
}

impl Decision {
    pub fn status(&self) -> PaperStatus {
        match self {
            Decision::Accept => PaperStatus::Accepted,
            Decision::Reject => PaperStatus::Rejected,
        }
    }
}

/// Mean review score, or `None` when the paper has no reviews yet.
pub fn average_score<'a, I>(reviews: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a Review>,
{
    let (sum, count) = reviews
        .into_iter()
        .fold((0u32, 0u32), |(sum, count), r| (sum + u32::from(r.score), count + 1));
    if count == 0 {
        None
    } else {
        Some(f64::from(sum) / f64::from(count))
    }
}

/// Score recorded on the paper when a decision is taken.
///
/// A paper without reviews snapshots 0 even though [`format_average`] shows
/// "N/A" for the same paper.
pub fn final_score_snapshot<'a, I>(reviews: I) -> f64
where
    I: IntoIterator<Item = &'a Review>,
{
    average_score(reviews).unwrap_or(0.0)
}

pub fn format_average(average: Option<f64>) -> String {
    match average {
        Some(avg) => format!("{:.1}", avg),
        None => "N/A".to_string(),
    }
}

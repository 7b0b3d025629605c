mod models;

pub use models::*;

use chrono::{DateTime, TimeZone, Utc};
use thiserror::Error;

use crate::decision::{self, Decision};

/// Why a checked transition was refused. Nothing is changed when one is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Paper {0} not found.")]
    UnknownPaper(PaperId),
    #[error("This paper is not awaiting your review.")]
    NotPending,
    #[error("Paper is {from} and cannot move to {to}.")]
    Blocked { from: PaperStatus, to: PaperStatus },
}

/// In-memory papers and reviews, plus the list of declared winners.
///
/// Mutations on unknown ids are silent no-ops reported through their return
/// value; nothing here validates input.
#[derive(Debug, Clone, Default)]
pub struct SubmissionStore {
    papers: Vec<Paper>,
    reviews: Vec<Review>,
    winners: Vec<PaperId>,
}

impl SubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(papers: Vec<Paper>, reviews: Vec<Review>) -> Self {
        Self {
            papers,
            reviews,
            winners: Vec::new(),
        }
    }

    /// Demo data: two papers by the seeded author, one already under review
    /// with a single review from the seeded reviewer.
    pub fn seeded() -> Self {
        let at = |y, mo, d, h, mi| {
            Utc.with_ymd_and_hms(y, mo, d, h, mi, 0)
                .single()
                .unwrap_or_default()
        };
        let papers = vec![
            Paper {
                id: PaperId(1),
                author_id: UserId(2),
                title: "Advances in Machine Learning".to_string(),
                abstract_text: "This paper explores recent advances in machine learning techniques and their applications.".to_string(),
                filename: "advances_ml.pdf".to_string(),
                status: PaperStatus::UnderReview,
                final_score: None,
                submitted_at: at(2025, 4, 15, 10, 30),
            },
            Paper {
                id: PaperId(2),
                author_id: UserId(2),
                title: "Blockchain in Healthcare".to_string(),
                abstract_text: "An analysis of blockchain applications in the healthcare industry.".to_string(),
                filename: "blockchain_healthcare.pdf".to_string(),
                status: PaperStatus::Submitted,
                final_score: None,
                submitted_at: at(2025, 4, 18, 14, 45),
            },
        ];
        let reviews = vec![Review {
            id: ReviewId(1),
            paper_id: PaperId(1),
            reviewer_id: UserId(3),
            score: 7,
            comments: "Good research, but needs more experimental data to support conclusions."
                .to_string(),
            created_at: at(2025, 4, 19, 9, 15),
        }];
        Self::with_records(papers, reviews)
    }

    pub fn submit_paper(&mut self, new: NewPaper, at: DateTime<Utc>) -> Paper {
        let next_id = self.papers.iter().map(|p| p.id.0).max().unwrap_or(0) + 1;
        let paper = Paper {
            id: PaperId(next_id),
            author_id: new.author_id,
            title: new.title,
            abstract_text: new.abstract_text,
            filename: new.filename,
            status: PaperStatus::Submitted,
            final_score: None,
            submitted_at: at,
        };
        self.papers.push(paper.clone());
        paper
    }

    /// Moves the paper to `under_review` whatever its current status.
    /// The reviewer is not recorded on the paper.
    pub fn assign_reviewer(&mut self, paper_id: PaperId, _reviewer_id: UserId) -> bool {
        match self.paper_mut(paper_id) {
            Some(paper) => {
                paper.status = PaperStatus::UnderReview;
                true
            }
            None => false,
        }
    }

    /// Appends a review and marks the paper `reviewed`, even if other reviews
    /// already exist.
    pub fn submit_review(
        &mut self,
        paper_id: PaperId,
        reviewer_id: UserId,
        score: u8,
        comments: String,
        at: DateTime<Utc>,
    ) -> Option<Review> {
        let paper = self.paper_mut(paper_id)?;
        paper.status = PaperStatus::Reviewed;

        let review = Review {
            id: ReviewId(self.reviews.len() as i64 + 1),
            paper_id,
            reviewer_id,
            score,
            comments,
            created_at: at,
        };
        self.reviews.push(review.clone());
        Some(review)
    }

    /// Sets the status and overwrites the score snapshot, clearing it when
    /// `final_score` is `None`.
    pub fn update_paper_status(
        &mut self,
        paper_id: PaperId,
        status: PaperStatus,
        final_score: Option<f64>,
    ) -> bool {
        match self.paper_mut(paper_id) {
            Some(paper) => {
                paper.status = status;
                paper.final_score = final_score;
                true
            }
            None => false,
        }
    }

    /// Accepts or rejects a paper, snapshotting its average score.
    pub fn decide(&mut self, paper_id: PaperId, decision: Decision) -> Option<f64> {
        let snapshot = decision::final_score_snapshot(self.reviews_for(paper_id));
        self.update_paper_status(paper_id, decision.status(), Some(snapshot))
            .then_some(snapshot)
    }

    /// Declares an accepted paper a winner. Returns `false` for unknown,
    /// non-accepted, or already declared papers.
    pub fn declare_winner(&mut self, paper_id: PaperId) -> bool {
        let accepted = self
            .paper_by_id(paper_id)
            .is_some_and(|p| p.status == PaperStatus::Accepted);
        if !accepted || self.winners.contains(&paper_id) {
            return false;
        }
        self.winners.push(paper_id);
        true
    }

    /// Assigns a reviewer only when the paper is still `submitted`.
    pub fn assign_if_submitted(
        &mut self,
        paper_id: PaperId,
        reviewer_id: UserId,
    ) -> Result<(), TransitionError> {
        self.check_advance(paper_id, PaperStatus::UnderReview)?;
        self.assign_reviewer(paper_id, reviewer_id);
        Ok(())
    }

    /// Records a review only when the paper is pending for `reviewer_id`,
    /// so a reviewer gets one review per paper and decided papers stay decided.
    pub fn review_if_pending(
        &mut self,
        paper_id: PaperId,
        reviewer_id: UserId,
        score: u8,
        comments: String,
        at: DateTime<Utc>,
    ) -> Result<Review, TransitionError> {
        let paper = self
            .paper_by_id(paper_id)
            .ok_or(TransitionError::UnknownPaper(paper_id))?;
        if !self.is_pending_for(paper, reviewer_id) {
            return Err(TransitionError::NotPending);
        }
        self.submit_review(paper_id, reviewer_id, score, comments, at)
            .ok_or(TransitionError::UnknownPaper(paper_id))
    }

    /// Accepts or rejects a paper only once it is `reviewed`.
    pub fn decide_if_reviewed(
        &mut self,
        paper_id: PaperId,
        decision: Decision,
    ) -> Result<f64, TransitionError> {
        self.check_advance(paper_id, decision.status())?;
        self.decide(paper_id, decision)
            .ok_or(TransitionError::UnknownPaper(paper_id))
    }

    pub fn papers_by_author(&self, author_id: UserId) -> Vec<Paper> {
        self.papers
            .iter()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect()
    }

    /// Papers under review that this reviewer has not reviewed yet. A paper
    /// stays pending for every other reviewer after one of them reviews it.
    pub fn papers_pending_for_reviewer(&self, reviewer_id: UserId) -> Vec<Paper> {
        self.papers
            .iter()
            .filter(|p| self.is_pending_for(p, reviewer_id))
            .cloned()
            .collect()
    }

    pub fn all_papers(&self) -> &[Paper] {
        &self.papers
    }

    pub fn reviews_by_paper(&self, paper_id: PaperId) -> Vec<Review> {
        self.reviews_for(paper_id).cloned().collect()
    }

    pub fn paper_by_id(&self, paper_id: PaperId) -> Option<&Paper> {
        self.papers.iter().find(|p| p.id == paper_id)
    }

    pub fn stats(&self) -> PaperStats {
        let count = |status| self.papers.iter().filter(|p| p.status == status).count();
        PaperStats {
            total: self.papers.len(),
            submitted: count(PaperStatus::Submitted),
            under_review: count(PaperStatus::UnderReview),
            reviewed: count(PaperStatus::Reviewed),
            accepted: count(PaperStatus::Accepted),
            rejected: count(PaperStatus::Rejected),
        }
    }

    /// Accepted papers, best snapshot first. Papers without a snapshot rank as 0.
    pub fn winner_candidates(&self) -> Vec<Paper> {
        let mut accepted: Vec<Paper> = self
            .papers
            .iter()
            .filter(|p| p.status == PaperStatus::Accepted)
            .cloned()
            .collect();
        accepted.sort_by(|a, b| {
            let a = a.final_score.unwrap_or(0.0);
            let b = b.final_score.unwrap_or(0.0);
            b.total_cmp(&a)
        });
        accepted
    }

    pub fn winners(&self) -> Vec<Paper> {
        self.winners
            .iter()
            .filter_map(|id| self.paper_by_id(*id).cloned())
            .collect()
    }

    fn is_pending_for(&self, paper: &Paper, reviewer_id: UserId) -> bool {
        paper.status == PaperStatus::UnderReview
            && !self
                .reviews
                .iter()
                .any(|r| r.reviewer_id == reviewer_id && r.paper_id == paper.id)
    }

    fn check_advance(&self, paper_id: PaperId, to: PaperStatus) -> Result<(), TransitionError> {
        let paper = self
            .paper_by_id(paper_id)
            .ok_or(TransitionError::UnknownPaper(paper_id))?;
        if paper.status.advances_to(to) {
            Ok(())
        } else {
            Err(TransitionError::Blocked {
                from: paper.status,
                to,
            })
        }
    }

    fn reviews_for(&self, paper_id: PaperId) -> impl Iterator<Item = &Review> {
        self.reviews.iter().filter(move |r| r.paper_id == paper_id)
    }

    fn paper_mut(&mut self, paper_id: PaperId) -> Option<&mut Paper> {
        self.papers.iter_mut().find(|p| p.id == paper_id)
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;

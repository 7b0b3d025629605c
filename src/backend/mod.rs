//! The boundary between the view layer and the stores.
//!
//! Every read and write goes through [`Backend`] so the HTTP layer and the
//! session store never touch the stores directly. [`LocalBackend`] keeps
//! everything in process memory.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::auth::CredentialStore;
use crate::db::{
    Identity, NewPaper, Paper, PaperId, PaperStats, PaperStatus, Review, Role, SubmissionStore,
    TransitionError, UserId,
};
use crate::decision::Decision;

#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Rejected(#[from] TransitionError),
}

#[async_trait]
pub trait Backend: Send + Sync {
    /// `None` when no credential matches the exact triple.
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Option<Identity>, BackendError>;

    /// `None` when the email is already registered.
    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Option<Identity>, BackendError>;

    async fn user(&self, id: UserId) -> Result<Option<Identity>, BackendError>;

    async fn reviewers(&self) -> Result<Vec<Identity>, BackendError>;

    async fn submit_paper(&self, paper: NewPaper) -> Result<Paper, BackendError>;

    /// The paper must still be `submitted`.
    async fn assign_reviewer(
        &self,
        paper_id: PaperId,
        reviewer_id: UserId,
    ) -> Result<(), BackendError>;

    /// The paper must be pending for `reviewer_id`.
    async fn submit_review(
        &self,
        paper_id: PaperId,
        reviewer_id: UserId,
        score: u8,
        comments: String,
    ) -> Result<Review, BackendError>;

    async fn update_paper_status(
        &self,
        paper_id: PaperId,
        status: PaperStatus,
        final_score: Option<f64>,
    ) -> Result<bool, BackendError>;

    /// Returns the score snapshot. The paper must be `reviewed`.
    async fn decide(&self, paper_id: PaperId, decision: Decision) -> Result<f64, BackendError>;

    async fn declare_winner(&self, paper_id: PaperId) -> Result<bool, BackendError>;

    async fn papers_by_author(&self, author_id: UserId) -> Result<Vec<Paper>, BackendError>;

    async fn papers_for_reviewer(&self, reviewer_id: UserId) -> Result<Vec<Paper>, BackendError>;

    async fn all_papers(&self) -> Result<Vec<Paper>, BackendError>;

    async fn reviews_by_paper(&self, paper_id: PaperId) -> Result<Vec<Review>, BackendError>;

    async fn paper_by_id(&self, paper_id: PaperId) -> Result<Option<Paper>, BackendError>;

    async fn stats(&self) -> Result<PaperStats, BackendError>;

    async fn winner_candidates(&self) -> Result<Vec<Paper>, BackendError>;

    async fn winners(&self) -> Result<Vec<Paper>, BackendError>;
}

/// In-process backend over the credential and submission stores.
///
/// `latency` is slept before login, registration and paper submission.
/// Checked transitions test and apply under a single write guard.
pub struct LocalBackend {
    credentials: RwLock<CredentialStore>,
    submissions: RwLock<SubmissionStore>,
    latency: Duration,
}

impl LocalBackend {
    pub fn new(credentials: CredentialStore, submissions: SubmissionStore) -> Self {
        Self {
            credentials: RwLock::new(credentials),
            submissions: RwLock::new(submissions),
            latency: Duration::ZERO,
        }
    }

    /// Seeded users, and the demo papers when `with_demo_papers` is set.
    pub fn seeded(with_demo_papers: bool) -> Self {
        let submissions = if with_demo_papers {
            SubmissionStore::seeded()
        } else {
            SubmissionStore::new()
        };
        Self::new(CredentialStore::seeded(), submissions)
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl Backend for LocalBackend {
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Option<Identity>, BackendError> {
        self.simulate_latency().await;
        Ok(self.credentials.read().await.authenticate(email, password, role))
    }

    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Option<Identity>, BackendError> {
        self.simulate_latency().await;
        Ok(self.credentials.write().await.register(name, email, password))
    }

    async fn user(&self, id: UserId) -> Result<Option<Identity>, BackendError> {
        Ok(self.credentials.read().await.find(id))
    }

    async fn reviewers(&self) -> Result<Vec<Identity>, BackendError> {
        Ok(self.credentials.read().await.reviewers())
    }

    async fn submit_paper(&self, paper: NewPaper) -> Result<Paper, BackendError> {
        self.simulate_latency().await;
        Ok(self.submissions.write().await.submit_paper(paper, Utc::now()))
    }

    async fn assign_reviewer(
        &self,
        paper_id: PaperId,
        reviewer_id: UserId,
    ) -> Result<(), BackendError> {
        let mut submissions = self.submissions.write().await;
        Ok(submissions.assign_if_submitted(paper_id, reviewer_id)?)
    }

    async fn submit_review(
        &self,
        paper_id: PaperId,
        reviewer_id: UserId,
        score: u8,
        comments: String,
    ) -> Result<Review, BackendError> {
        let mut submissions = self.submissions.write().await;
        Ok(submissions.review_if_pending(paper_id, reviewer_id, score, comments, Utc::now())?)
    }

    async fn update_paper_status(
        &self,
        paper_id: PaperId,
        status: PaperStatus,
        final_score: Option<f64>,
    ) -> Result<bool, BackendError> {
        Ok(self
            .submissions
            .write()
            .await
            .update_paper_status(paper_id, status, final_score))
    }

    async fn decide(&self, paper_id: PaperId, decision: Decision) -> Result<f64, BackendError> {
        let mut submissions = self.submissions.write().await;
        Ok(submissions.decide_if_reviewed(paper_id, decision)?)
    }

    async fn declare_winner(&self, paper_id: PaperId) -> Result<bool, BackendError> {
        Ok(self.submissions.write().await.declare_winner(paper_id))
    }

    async fn papers_by_author(&self, author_id: UserId) -> Result<Vec<Paper>, BackendError> {
        Ok(self.submissions.read().await.papers_by_author(author_id))
    }

    async fn papers_for_reviewer(&self, reviewer_id: UserId) -> Result<Vec<Paper>, BackendError> {
        Ok(self
            .submissions
            .read()
            .await
            .papers_pending_for_reviewer(reviewer_id))
    }

    async fn all_papers(&self) -> Result<Vec<Paper>, BackendError> {
        Ok(self.submissions.read().await.all_papers().to_vec())
    }

    async fn reviews_by_paper(&self, paper_id: PaperId) -> Result<Vec<Review>, BackendError> {
        Ok(self.submissions.read().await.reviews_by_paper(paper_id))
    }

    async fn paper_by_id(&self, paper_id: PaperId) -> Result<Option<Paper>, BackendError> {
        Ok(self.submissions.read().await.paper_by_id(paper_id).cloned())
    }

    async fn stats(&self) -> Result<PaperStats, BackendError> {
        Ok(self.submissions.read().await.stats())
    }

    async fn winner_candidates(&self) -> Result<Vec<Paper>, BackendError> {
        Ok(self.submissions.read().await.winner_candidates())
    }

    async fn winners(&self) -> Result<Vec<Paper>, BackendError> {
        Ok(self.submissions.read().await.winners())
    }
}

mod api;
mod pages;

use std::sync::Arc;

use axum::http::{header, HeaderMap};
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::{session_key, SessionStore};
use crate::db::{Identity, Paper, PaperId, PaperStatus, Review, Role};
use crate::decision;
use crate::error::AppError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "confman_session";

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/winners", get(pages::winners))
        .route("/author-dashboard", get(pages::author_dashboard))
        .route("/reviewer-dashboard", get(pages::reviewer_dashboard))
        .route("/admin-dashboard", get(pages::admin_dashboard))
        .route("/logout", post(pages::logout))
        .route("/api/login", post(api::login))
        .route("/api/register", post(api::register))
        .route("/api/logout", post(api::logout))
        .route("/api/session", get(api::session))
        .route("/api/papers", get(api::list_papers).post(api::submit_paper))
        .route("/api/papers/:paper_id/assign", post(api::assign_reviewer))
        .route(
            "/api/papers/:paper_id/reviews",
            get(api::paper_reviews).post(api::submit_review),
        )
        .route("/api/papers/:paper_id/decision", post(api::decide))
        .route("/api/papers/:paper_id/winner", post(api::declare_winner))
        .route("/api/reviewers", get(api::reviewers))
        .route("/api/stats", get(api::stats))
        .route("/api/winners", get(api::winners))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Session id from the request cookie. Anything that is not a UUID is ignored.
fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value).ok())
        .map(|id| id.to_string())
}

/// The caller's session, restored from storage. Requests without a session
/// cookie get a fresh, logged-out session with a new id.
fn open_session(state: &AppState, headers: &HeaderMap) -> (String, SessionStore) {
    let id = session_id(headers).unwrap_or_else(crate::storage::generate_session_id);
    let store = SessionStore::restore(state.storage.clone(), session_key(&id));
    (id, store)
}

fn session_cookie(session_id: &str) -> String {
    format!("{SESSION_COOKIE}={session_id}; HttpOnly; Path=/; SameSite=Lax")
}

fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0")
}

fn require_role(session: &SessionStore, role: Role) -> Result<Identity, AppError> {
    let identity = session
        .current()
        .ok_or_else(|| AppError::Unauthorized("Please log in to continue.".to_string()))?;
    if identity.role != role {
        return Err(AppError::Forbidden);
    }
    Ok(identity.clone())
}

fn paper_not_found(paper_id: PaperId) -> AppError {
    AppError::NotFound(format!("Paper {} not found.", paper_id))
}

/// A paper as shown in dashboard tables.
#[derive(Debug, Serialize)]
pub struct PaperRow {
    pub id: PaperId,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub filename: String,
    pub status: PaperStatus,
    pub status_label: &'static str,
    pub submitted_on: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_score: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<String>,
}

impl PaperRow {
    fn new(paper: &Paper) -> Self {
        Self {
            id: paper.id,
            title: paper.title.clone(),
            abstract_text: paper.abstract_text.clone(),
            filename: paper.filename.clone(),
            status: paper.status,
            status_label: paper.status.label(),
            submitted_on: paper.submitted_at.format("%Y-%m-%d").to_string(),
            final_score: paper.final_score.map(|s| format!("{:.1}", s)),
            review_count: None,
            average: None,
        }
    }

    fn with_reviews(paper: &Paper, reviews: &[Review]) -> Self {
        Self {
            review_count: Some(reviews.len()),
            average: Some(decision::format_average(decision::average_score(reviews))),
            ..Self::new(paper)
        }
    }
}

#[cfg(test)]
#[path = "tests/routes_tests.rs"]
mod tests;

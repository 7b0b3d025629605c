use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use super::{
    expired_session_cookie, open_session, paper_not_found, require_role, session_cookie,
    session_id, PaperRow,
};
use crate::auth::{session_key, SessionStore};
use crate::db::{NewPaper, PaperId, PaperStatus, Role, UserId};
use crate::storage::generate_session_id;
use crate::decision::{self, Decision};
use crate::error::{AppError, Notice};
use crate::navigation::Viewer;
use crate::state::AppState;
use crate::validation;

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
    role: Role,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    validation::validate_login(&req.email, &req.password)?;

    // A successful login always gets a new session id; the one the client
    // arrived with is dropped.
    let new_id = generate_session_id();
    let mut session = SessionStore::restore(state.storage.clone(), session_key(&new_id));
    let ok = session
        .login(state.backend.as_ref(), &req.email, &req.password, req.role)
        .await?;
    let Some(user) = session.current().filter(|_| ok) else {
        return Err(AppError::Unauthorized(
            "Invalid email, password, or role.".to_string(),
        ));
    };
    if let Some(previous) = session_id(&headers) {
        state.storage.remove_item(&session_key(&previous))?;
    }

    let body = serde_json::json!({
        "success": true,
        "user": user,
        "redirect": session.viewer().home().path(),
        "notice": Notice::new("Login successful", format!("Welcome back, {}!", user.name)),
    });
    Ok(([(header::SET_COOKIE, session_cookie(&new_id))], Json(body)))
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    name: String,
    email: String,
    password: String,
    confirm_password: String,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    validation::validate_registration(
        &req.name,
        &req.email,
        &req.password,
        &req.confirm_password,
    )?;

    let (_, session) = open_session(&state, &headers);
    let created = session
        .register(
            state.backend.as_ref(),
            req.name.trim(),
            req.email.trim(),
            &req.password,
        )
        .await?;
    if !created {
        return Err(AppError::Conflict("Email already in use.".to_string()));
    }

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "notice": Notice::new(
                "Registration successful",
                "You can now log in with your credentials."
            ),
        })),
    ))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let (_, mut session) = open_session(&state, &headers);
    session.logout();
    (
        [(header::SET_COOKIE, expired_session_cookie())],
        Json(serde_json::json!({
            "success": true,
            "redirect": "/",
            "notice": Notice::new("Logged out", "You have been successfully logged out."),
        })),
    )
}

pub async fn session(State(state): State<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
    let (_, session) = open_session(&state, &headers);
    Json(serde_json::json!({
        "authenticated": session.is_authenticated(),
        "user": session.current(),
        "role": session.current().map(|u| u.role),
        "redirect": session.viewer().home().path(),
    }))
}

/// Papers visible to the caller: their own as an author, the ones waiting
/// for them as a reviewer, every paper with review summaries as an admin.
pub async fn list_papers(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let (_, session) = open_session(&state, &headers);
    let backend = state.backend.as_ref();

    let rows: Vec<PaperRow> = match (session.viewer(), session.current()) {
        (Viewer::Author, Some(user)) => backend
            .papers_by_author(user.id)
            .await?
            .iter()
            .map(PaperRow::new)
            .collect(),
        (Viewer::Reviewer, Some(user)) => backend
            .papers_for_reviewer(user.id)
            .await?
            .iter()
            .map(PaperRow::new)
            .collect(),
        (Viewer::Admin, Some(_)) => {
            let mut rows = Vec::new();
            for paper in backend.all_papers().await? {
                let reviews = backend.reviews_by_paper(paper.id).await?;
                rows.push(PaperRow::with_reviews(&paper, &reviews));
            }
            rows
        }
        _ => {
            return Err(AppError::Unauthorized(
                "Please log in to continue.".to_string(),
            ))
        }
    };
    Ok(Json(serde_json::json!({ "papers": rows })))
}

#[derive(Deserialize)]
pub struct SubmitPaperRequest {
    title: String,
    #[serde(rename = "abstract")]
    abstract_text: String,
    filename: String,
}

pub async fn submit_paper(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<SubmitPaperRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (_, session) = open_session(&state, &headers);
    let author = require_role(&session, Role::Author)?;
    validation::validate_submission(&req.title, &req.abstract_text, &req.filename)?;

    let paper = state
        .backend
        .submit_paper(NewPaper {
            author_id: author.id,
            title: req.title.trim().to_string(),
            abstract_text: req.abstract_text.trim().to_string(),
            filename: req.filename.trim().to_string(),
        })
        .await?;
    info!(paper_id = %paper.id, author_id = %author.id, "Paper submitted");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "paper": paper,
            "notice": Notice::new(
                "Paper submitted",
                "Your paper has been successfully submitted for review."
            ),
        })),
    ))
}

pub async fn reviewers(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let (_, session) = open_session(&state, &headers);
    require_role(&session, Role::Admin)?;
    let reviewers = state.backend.reviewers().await?;
    Ok(Json(serde_json::json!({ "reviewers": reviewers })))
}

#[derive(Deserialize, Default)]
pub struct AssignRequest {
    reviewer_id: Option<i64>,
}

/// Without a `reviewer_id` the first registered reviewer is assigned.
pub async fn assign_reviewer(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(paper_id): Path<i64>,
    body: Option<Json<AssignRequest>>,
) -> Result<impl IntoResponse, AppError> {
    let (_, session) = open_session(&state, &headers);
    require_role(&session, Role::Admin)?;
    let paper_id = PaperId(paper_id);
    let req = body.map(|Json(req)| req).unwrap_or_default();

    let reviewers = state.backend.reviewers().await?;
    let reviewer = match req.reviewer_id {
        Some(id) => reviewers.into_iter().find(|r| r.id == UserId(id)),
        None => reviewers.into_iter().next(),
    }
    .ok_or_else(|| AppError::NotFound("Reviewer not found.".to_string()))?;

    state.backend.assign_reviewer(paper_id, reviewer.id).await?;
    info!(paper_id = %paper_id, reviewer_id = %reviewer.id, "Reviewer assigned");

    Ok(Json(serde_json::json!({
        "success": true,
        "reviewer": reviewer,
        "notice": Notice::new(
            "Reviewer assigned",
            "The reviewer has been successfully assigned to the paper."
        ),
    })))
}

#[derive(Deserialize)]
pub struct ReviewRequest {
    score: i64,
    #[serde(default)]
    comments: String,
}

pub async fn submit_review(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(paper_id): Path<i64>,
    Json(req): Json<ReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (_, session) = open_session(&state, &headers);
    let reviewer = require_role(&session, Role::Reviewer)?;
    let score = validation::validate_score(req.score)?;
    let paper_id = PaperId(paper_id);

    let review = state
        .backend
        .submit_review(paper_id, reviewer.id, score, req.comments)
        .await?;
    info!(paper_id = %paper_id, reviewer_id = %reviewer.id, score, "Review submitted");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "review": review,
            "notice": Notice::new("Review submitted", "Your review has been successfully submitted."),
        })),
    ))
}

pub async fn paper_reviews(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(paper_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let (_, session) = open_session(&state, &headers);
    require_role(&session, Role::Admin)?;
    let paper_id = PaperId(paper_id);

    let paper = state
        .backend
        .paper_by_id(paper_id)
        .await?
        .ok_or_else(|| paper_not_found(paper_id))?;
    let reviews = state.backend.reviews_by_paper(paper_id).await?;

    Ok(Json(serde_json::json!({
        "paper": paper,
        "average": decision::format_average(decision::average_score(&reviews)),
        "reviews": reviews,
    })))
}

#[derive(Deserialize)]
pub struct DecisionRequest {
    decision: Decision,
}

pub async fn decide(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(paper_id): Path<i64>,
    Json(req): Json<DecisionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (_, session) = open_session(&state, &headers);
    require_role(&session, Role::Admin)?;
    let paper_id = PaperId(paper_id);
    let status = req.decision.status();

    let final_score = state.backend.decide(paper_id, req.decision).await?;
    info!(paper_id = %paper_id, status = status.label(), final_score, "Paper decided");

    Ok(Json(serde_json::json!({
        "success": true,
        "status": status,
        "final_score": final_score,
        "notice": Notice::new(
            "Paper status updated",
            format!("The paper status has been updated to {}.", status)
        ),
    })))
}

pub async fn stats(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let (_, session) = open_session(&state, &headers);
    require_role(&session, Role::Admin)?;
    Ok(Json(state.backend.stats().await?))
}

pub async fn declare_winner(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(paper_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let (_, session) = open_session(&state, &headers);
    require_role(&session, Role::Admin)?;
    let paper_id = PaperId(paper_id);

    let paper = state
        .backend
        .paper_by_id(paper_id)
        .await?
        .ok_or_else(|| paper_not_found(paper_id))?;
    if paper.status != PaperStatus::Accepted {
        return Err(AppError::Conflict(
            "Only accepted papers can be declared winners.".to_string(),
        ));
    }
    if !state.backend.declare_winner(paper_id).await? {
        return Err(AppError::Conflict(
            "This paper has already been declared a winner.".to_string(),
        ));
    }
    info!(paper_id = %paper_id, "Winner declared");

    Ok(Json(serde_json::json!({
        "success": true,
        "notice": Notice::new(
            "Winner declared",
            format!("\"{}\" has been added to the conference winners.", paper.title)
        ),
    })))
}

pub async fn winners(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let winners = super::pages::winner_views(&state).await?;
    Ok(Json(serde_json::json!({ "winners": winners })))
}

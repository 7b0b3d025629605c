use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::{Datelike, Utc};
use serde::Serialize;
use std::sync::Arc;
use tera::Context;

use super::{expired_session_cookie, open_session, PaperRow};
use crate::auth::SessionStore;
use crate::db::PaperId;
use crate::decision;
use crate::error::AppError;
use crate::navigation::{self, Navigation, Page};
use crate::state::AppState;

/// Runs the navigation gate for `page`. `Err` carries the redirect to send instead.
fn gate(session: &SessionStore, page: Page) -> Result<Context, Response> {
    match navigation::resolve(session.viewer(), page) {
        Navigation::Render(_) => {
            let mut ctx = Context::new();
            ctx.insert("user", &session.current());
            ctx.insert("year", &Utc::now().year());
            Ok(ctx)
        }
        Navigation::Redirect(target) => Err(Redirect::to(target.path()).into_response()),
    }
}

pub async fn index(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let (_, session) = open_session(&state, &headers);
    match gate(&session, Page::Home) {
        Ok(ctx) => render_template("home.html", ctx),
        Err(redirect) => redirect,
    }
}

#[derive(Debug, Serialize)]
pub struct WinnerView {
    pub id: PaperId,
    pub title: String,
    pub author: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub final_score: Option<f64>,
}

pub(super) async fn winner_views(state: &AppState) -> Result<Vec<WinnerView>, AppError> {
    let mut views = Vec::new();
    for paper in state.backend.winners().await? {
        let author = state
            .backend
            .user(paper.author_id)
            .await?
            .map(|u| u.name)
            .unwrap_or_else(|| "Unknown author".to_string());
        views.push(WinnerView {
            id: paper.id,
            title: paper.title,
            author,
            abstract_text: paper.abstract_text,
            final_score: paper.final_score,
        });
    }
    Ok(views)
}

pub async fn winners(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let (_, session) = open_session(&state, &headers);
    let mut ctx = match gate(&session, Page::Winners) {
        Ok(ctx) => ctx,
        Err(redirect) => return Ok(redirect),
    };
    ctx.insert("winners", &winner_views(&state).await?);
    Ok(render_template("winners.html", ctx))
}

pub async fn author_dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let (_, session) = open_session(&state, &headers);
    let mut ctx = match gate(&session, Page::AuthorDashboard) {
        Ok(ctx) => ctx,
        Err(redirect) => return Ok(redirect),
    };
    let papers = match session.current() {
        Some(user) => state.backend.papers_by_author(user.id).await?,
        None => Vec::new(),
    };
    let rows: Vec<PaperRow> = papers.iter().map(PaperRow::new).collect();
    ctx.insert("papers", &rows);
    Ok(render_template("author_dashboard.html", ctx))
}

pub async fn reviewer_dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let (_, session) = open_session(&state, &headers);
    let mut ctx = match gate(&session, Page::ReviewerDashboard) {
        Ok(ctx) => ctx,
        Err(redirect) => return Ok(redirect),
    };
    let papers = match session.current() {
        Some(user) => state.backend.papers_for_reviewer(user.id).await?,
        None => Vec::new(),
    };
    let rows: Vec<PaperRow> = papers.iter().map(PaperRow::new).collect();
    ctx.insert("papers", &rows);
    Ok(render_template("reviewer_dashboard.html", ctx))
}

#[derive(Debug, Serialize)]
struct CandidateRow {
    title: String,
    average: String,
    winner: bool,
}

pub async fn admin_dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let (_, session) = open_session(&state, &headers);
    let mut ctx = match gate(&session, Page::AdminDashboard) {
        Ok(ctx) => ctx,
        Err(redirect) => return Ok(redirect),
    };
    let backend = state.backend.as_ref();

    let mut rows = Vec::new();
    for paper in backend.all_papers().await? {
        let reviews = backend.reviews_by_paper(paper.id).await?;
        rows.push(PaperRow::with_reviews(&paper, &reviews));
    }

    let winners: Vec<PaperId> = backend.winners().await?.iter().map(|p| p.id).collect();
    let mut candidates = Vec::new();
    for paper in backend.winner_candidates().await? {
        let reviews = backend.reviews_by_paper(paper.id).await?;
        candidates.push(CandidateRow {
            average: decision::format_average(decision::average_score(&reviews)),
            winner: winners.contains(&paper.id),
            title: paper.title,
        });
    }

    ctx.insert("stats", &backend.stats().await?);
    ctx.insert("papers", &rows);
    ctx.insert("candidates", &candidates);
    Ok(render_template("admin_dashboard.html", ctx))
}

pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let (_, mut session) = open_session(&state, &headers);
    session.logout();
    (
        [(header::SET_COOKIE, expired_session_cookie())],
        Redirect::to(Page::Home.path()),
    )
        .into_response()
}

fn render_template(name: &str, ctx: Context) -> Response {
    let rendered = crate::templates::get_tera()
        .map_err(|e| e.to_string())
        .and_then(|tera| tera.render(name, &ctx).map_err(|e| e.to_string()));
    match rendered {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template error in {}: {}", name, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Template error: {}", name),
            )
                .into_response()
        }
    }
}

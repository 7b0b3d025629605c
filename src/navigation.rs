use serde::Serialize;

use crate::db::{Identity, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Viewer {
    Anonymous,
    Author,
    Reviewer,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Home,
    Winners,
    AuthorDashboard,
    ReviewerDashboard,
    AdminDashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Render(Page),
    Redirect(Page),
}

impl Viewer {
    pub fn from_identity(identity: Option<&Identity>) -> Self {
        match identity.map(|i| i.role) {
            None => Viewer::Anonymous,
            Some(Role::Author) => Viewer::Author,
            Some(Role::Reviewer) => Viewer::Reviewer,
            Some(Role::Admin) => Viewer::Admin,
        }
    }

    /// Where this viewer lands after login, or when sent away from a page.
    pub fn home(&self) -> Page {
        match self {
            Viewer::Anonymous => Page::Home,
            Viewer::Author => Page::AuthorDashboard,
            Viewer::Reviewer => Page::ReviewerDashboard,
            Viewer::Admin => Page::AdminDashboard,
        }
    }
}

impl Page {
    pub fn path(&self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Winners => "/winners",
            Page::AuthorDashboard => "/author-dashboard",
            Page::ReviewerDashboard => "/reviewer-dashboard",
            Page::AdminDashboard => "/admin-dashboard",
        }
    }

    /// The only viewer allowed on a dashboard; `None` for public pages.
    fn required_viewer(&self) -> Option<Viewer> {
        match self {
            Page::Home | Page::Winners => None,
            Page::AuthorDashboard => Some(Viewer::Author),
            Page::ReviewerDashboard => Some(Viewer::Reviewer),
            Page::AdminDashboard => Some(Viewer::Admin),
        }
    }
}

pub fn resolve(viewer: Viewer, page: Page) -> Navigation {
    match (page.required_viewer(), viewer) {
        (None, Viewer::Anonymous) => Navigation::Render(page),
        (None, _) if page == Page::Home => Navigation::Redirect(viewer.home()),
        (None, _) => Navigation::Render(page),
        (Some(_), Viewer::Anonymous) => Navigation::Redirect(Page::Home),
        (Some(required), _) if required == viewer => Navigation::Render(page),
        (Some(_), _) => Navigation::Redirect(viewer.home()),
    }
}

//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::models::Flash;
use crate::models::session::take_flashes;
use crate::resource::{Items, Orders, Resource, Users};

/// A resource card on the dashboard.
#[derive(Debug, Clone)]
pub struct SectionView {
    pub title: &'static str,
    pub description: &'static str,
    pub list_path: String,
    pub new_path: String,
    pub new_label: &'static str,
}

impl SectionView {
    fn of<R: Resource>(title: &'static str, description: &'static str, new_label: &'static str) -> Self {
        Self {
            title,
            description,
            list_path: R::list_path(),
            new_path: format!("{}/new", R::list_path()),
            new_label,
        }
    }
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub current_path: String,
    pub flashes: Vec<Flash>,
    pub sections: Vec<SectionView>,
}

/// Dashboard page handler.
#[instrument(skip(session))]
pub async fn index(session: Session) -> DashboardTemplate {
    DashboardTemplate {
        current_path: "/".to_string(),
        flashes: take_flashes(&session).await,
        sections: vec![
            SectionView::of::<Users>("Users", "Customer accounts", "New user"),
            SectionView::of::<Items>("Items", "Catalogue and stock", "New item"),
            SectionView::of::<Orders>("Orders", "Placed orders and their lines", "New order"),
        ],
    }
}

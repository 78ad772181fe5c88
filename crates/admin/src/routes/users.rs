//! User route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use shopdesk_core::{Order, User, UserId};
use tower_sessions::Session;
use tracing::instrument;

use crate::config::DisplayConfig;
use crate::error::AppError;
use crate::filters;
use crate::forms::{FieldErrors, UserEditForm, UserForm};
use crate::models::Flash;
use crate::models::session::{push_flash, take_flashes};
use crate::resource::{Loadable, Orders, Resource, Users};
use crate::state::AppState;

use super::orders::OrderRowView;

/// User view for templates.
#[derive(Debug, Clone)]
pub struct UserView {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl UserView {
    fn new(user: &User, display: &DisplayConfig) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            is_active: user.is_active,
            created_at: display.timestamp(&user.created_at),
            updated_at: display.timestamp(&user.updated_at),
        }
    }
}

/// Users list page template.
#[derive(Template, WebTemplate)]
#[template(path = "users/index.html")]
pub struct UsersIndexTemplate {
    pub current_path: String,
    pub flashes: Vec<Flash>,
    pub users: Vec<UserView>,
    pub error: Option<String>,
}

/// User detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "users/show.html")]
pub struct UserShowTemplate {
    pub current_path: String,
    pub flashes: Vec<Flash>,
    pub user: Option<UserView>,
    pub orders: Vec<OrderRowView>,
    pub orders_error: Option<String>,
    pub error: Option<String>,
}

/// User create page template.
#[derive(Template, WebTemplate)]
#[template(path = "users/new.html")]
pub struct UserNewTemplate {
    pub current_path: String,
    pub flashes: Vec<Flash>,
    pub form: UserForm,
    pub errors: FieldErrors,
    pub error: Option<String>,
}

/// User edit page template.
#[derive(Template, WebTemplate)]
#[template(path = "users/edit.html")]
pub struct UserEditTemplate {
    pub current_path: String,
    pub flashes: Vec<Flash>,
    pub user_id: String,
    pub form: Option<UserEditForm>,
    pub errors: FieldErrors,
    pub error: Option<String>,
}

/// Users list page handler.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> UsersIndexTemplate {
    let display = state.display();
    let (users, error) = Loadable::from_result(
        state.backend().list::<Users>().await,
        Users::load_failed_message(),
    )
    .map(|users| users.iter().map(|u| UserView::new(u, display)).collect::<Vec<_>>())
    .into_parts();

    UsersIndexTemplate {
        current_path: Users::list_path(),
        flashes: take_flashes(&session).await,
        users,
        error,
    }
}

/// User detail page handler.
///
/// Shows the user's orders below the profile.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<UserId>,
) -> UserShowTemplate {
    let display = state.display();
    let user = Loadable::from_result(
        state.backend().fetch::<Users>(id).await,
        Users::load_failed_message(),
    );

    let (user, error, orders, orders_error) = match user {
        Loadable::Ready(user) => {
            let (orders, orders_error) = Loadable::from_result(
                state.backend().list_orders_for_user(id).await,
                Orders::load_failed_message(),
            )
            .map(|orders: Vec<Order>| {
                orders
                    .iter()
                    .map(|o| OrderRowView::new(o, Some(&user.full_name), display))
                    .collect::<Vec<_>>()
            })
            .into_parts();
            (Some(UserView::new(&user, display)), None, orders, orders_error)
        }
        Loadable::Failed(message) => (None, Some(message), Vec::new(), None),
    };

    UserShowTemplate {
        current_path: Users::list_path(),
        flashes: take_flashes(&session).await,
        user,
        orders,
        orders_error,
        error,
    }
}

/// User create page handler.
#[instrument(skip(session))]
pub async fn new(session: Session) -> UserNewTemplate {
    UserNewTemplate {
        current_path: Users::list_path(),
        flashes: take_flashes(&session).await,
        form: UserForm::new_active(),
        errors: FieldErrors::default(),
        error: None,
    }
}

/// User create handler.
#[instrument(skip(state, session, form))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UserForm>,
) -> Response {
    let render = |errors: FieldErrors, error: Option<String>, form: UserForm| UserNewTemplate {
        current_path: Users::list_path(),
        flashes: Vec::new(),
        form,
        errors,
        error,
    };

    let payload = match form.validate() {
        Ok(payload) => payload,
        Err(errors) => return render(errors, None, form).into_response(),
    };

    match state.backend().create::<Users>(&payload).await {
        Ok(user) => {
            tracing::info!(user_id = %Users::id(&user), "Created user");
            push_flash(&session, Flash::success("User created.")).await;
            Redirect::to(&Users::list_path()).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create user: {e}");
            let message = e.detail_or("Failed to create user. Please try again.").to_string();
            render(FieldErrors::default(), Some(message), form).into_response()
        }
    }
}

/// User edit page handler.
#[instrument(skip(state, session))]
pub async fn edit(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<UserId>,
) -> UserEditTemplate {
    let (form, error) = match Loadable::from_result(
        state.backend().fetch::<Users>(id).await,
        Users::load_failed_message(),
    ) {
        Loadable::Ready(user) => (Some(UserEditForm::from(&user)), None),
        Loadable::Failed(message) => (None, Some(message)),
    };

    UserEditTemplate {
        current_path: Users::list_path(),
        flashes: take_flashes(&session).await,
        user_id: id.to_string(),
        form,
        errors: FieldErrors::default(),
        error,
    }
}

/// User update handler.
///
/// Sends only the fields that differ from the loaded record. With no
/// changes nothing is sent.
#[instrument(skip(state, session, form))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<UserId>,
    Form(form): Form<UserEditForm>,
) -> Result<Response, AppError> {
    let render = |errors: FieldErrors, error: Option<String>, form: UserEditForm| UserEditTemplate {
        current_path: Users::list_path(),
        flashes: Vec::new(),
        user_id: id.to_string(),
        form: Some(form),
        errors,
        error,
    };

    let changes = match form.validate() {
        Ok(changes) => changes,
        Err(errors) => return Ok(render(errors, None, form).into_response()),
    };

    if changes.is_empty() {
        tracing::debug!(user_id = %id, "No user changes to send");
        return Ok(Redirect::to(&Users::list_path()).into_response());
    }

    match state.backend().update::<Users>(id, &changes).await {
        Ok(_) => {
            tracing::info!(user_id = %id, "Updated user");
            push_flash(&session, Flash::success("User updated.")).await;
            Ok(Redirect::to(&Users::list_path()).into_response())
        }
        Err(e) if e.is_not_found() => Err(AppError::from(e)),
        Err(e) => {
            tracing::error!("Failed to update user: {e}");
            let message = e.detail_or("Failed to update user. Please try again.").to_string();
            Ok(render(FieldErrors::default(), Some(message), form).into_response())
        }
    }
}

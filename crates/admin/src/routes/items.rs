//! Item route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use shopdesk_core::{Item, ItemId};
use tower_sessions::Session;
use tracing::instrument;

use crate::config::DisplayConfig;
use crate::error::AppError;
use crate::filters;
use crate::forms::{FieldErrors, ItemForm};
use crate::models::Flash;
use crate::models::session::{push_flash, take_flashes};
use crate::resource::{Items, Loadable, Resource};
use crate::state::AppState;

/// Item view for templates.
#[derive(Debug, Clone)]
pub struct ItemView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: u64,
    pub image_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl ItemView {
    fn new(item: &Item, display: &DisplayConfig) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            description: item.description.clone().unwrap_or_default(),
            price: display.money(item.price),
            stock: item.stock,
            image_url: item.image_url.clone().filter(|url| !url.is_empty()),
            created_at: display.timestamp(&item.created_at),
            updated_at: display.timestamp(&item.updated_at),
        }
    }
}

/// Items list page template.
#[derive(Template, WebTemplate)]
#[template(path = "items/index.html")]
pub struct ItemsIndexTemplate {
    pub current_path: String,
    pub flashes: Vec<Flash>,
    pub items: Vec<ItemView>,
    pub error: Option<String>,
}

/// Item detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "items/show.html")]
pub struct ItemShowTemplate {
    pub current_path: String,
    pub flashes: Vec<Flash>,
    pub item: Option<ItemView>,
    pub error: Option<String>,
}

/// Item create and edit page template.
#[derive(Template, WebTemplate)]
#[template(path = "items/form.html")]
pub struct ItemFormTemplate {
    pub current_path: String,
    pub flashes: Vec<Flash>,
    /// `None` when creating.
    pub item_id: Option<String>,
    pub action: String,
    pub form: Option<ItemForm>,
    pub errors: FieldErrors,
    pub error: Option<String>,
}

impl ItemFormTemplate {
    fn create(form: ItemForm, errors: FieldErrors, error: Option<String>) -> Self {
        Self {
            current_path: Items::list_path(),
            flashes: Vec::new(),
            item_id: None,
            action: Items::list_path(),
            form: Some(form),
            errors,
            error,
        }
    }

    fn edit(id: ItemId, form: Option<ItemForm>, errors: FieldErrors, error: Option<String>) -> Self {
        Self {
            current_path: Items::list_path(),
            flashes: Vec::new(),
            item_id: Some(id.to_string()),
            action: format!("{}/edit", Items::detail_path(id)),
            form,
            errors,
            error,
        }
    }
}

/// Items list page handler.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> ItemsIndexTemplate {
    let display = state.display();
    let (items, error) = Loadable::from_result(
        state.backend().list::<Items>().await,
        Items::load_failed_message(),
    )
    .map(|items| items.iter().map(|i| ItemView::new(i, display)).collect::<Vec<_>>())
    .into_parts();

    ItemsIndexTemplate {
        current_path: Items::list_path(),
        flashes: take_flashes(&session).await,
        items,
        error,
    }
}

/// Item detail page handler.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ItemId>,
) -> ItemShowTemplate {
    let display = state.display();
    let (item, error) = match Loadable::from_result(
        state.backend().fetch::<Items>(id).await,
        Items::load_failed_message(),
    ) {
        Loadable::Ready(item) => (Some(ItemView::new(&item, display)), None),
        Loadable::Failed(message) => (None, Some(message)),
    };

    ItemShowTemplate {
        current_path: Items::list_path(),
        flashes: take_flashes(&session).await,
        item,
        error,
    }
}

/// Item create page handler.
#[instrument(skip(session))]
pub async fn new(session: Session) -> ItemFormTemplate {
    ItemFormTemplate {
        flashes: take_flashes(&session).await,
        ..ItemFormTemplate::create(ItemForm::blank(), FieldErrors::default(), None)
    }
}

/// Item create handler.
#[instrument(skip(state, session))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ItemForm>,
) -> Response {
    let payload = match form.validate() {
        Ok(payload) => payload,
        Err(errors) => return ItemFormTemplate::create(form, errors, None).into_response(),
    };

    match state.backend().create::<Items>(&payload).await {
        Ok(item) => {
            tracing::info!(item_id = %Items::id(&item), "Created item");
            push_flash(&session, Flash::success("Item created.")).await;
            Redirect::to(&Items::list_path()).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create item: {e}");
            let message = e.detail_or("Failed to create item. Please try again.").to_string();
            ItemFormTemplate::create(form, FieldErrors::default(), Some(message)).into_response()
        }
    }
}

/// Item edit page handler.
#[instrument(skip(state, session))]
pub async fn edit(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ItemId>,
) -> ItemFormTemplate {
    let (form, error) = match Loadable::from_result(
        state.backend().fetch::<Items>(id).await,
        Items::load_failed_message(),
    ) {
        Loadable::Ready(item) => (Some(ItemForm::from(&item)), None),
        Loadable::Failed(message) => (None, Some(message)),
    };

    ItemFormTemplate {
        flashes: take_flashes(&session).await,
        ..ItemFormTemplate::edit(id, form, FieldErrors::default(), error)
    }
}

/// Item update handler.
///
/// Replaces every editable field of the item.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ItemId>,
    Form(form): Form<ItemForm>,
) -> Result<Response, AppError> {
    let payload = match form.validate_update() {
        Ok(payload) => payload,
        Err(errors) => {
            return Ok(ItemFormTemplate::edit(id, Some(form), errors, None).into_response());
        }
    };

    match state.backend().update::<Items>(id, &payload).await {
        Ok(_) => {
            tracing::info!(item_id = %id, "Updated item");
            push_flash(&session, Flash::success("Item updated.")).await;
            Ok(Redirect::to(&Items::list_path()).into_response())
        }
        Err(e) if e.is_not_found() => Err(AppError::from(e)),
        Err(e) => {
            tracing::error!("Failed to update item: {e}");
            let message = e.detail_or("Failed to update item. Please try again.").to_string();
            Ok(ItemFormTemplate::edit(id, Some(form), FieldErrors::default(), Some(message))
                .into_response())
        }
    }
}

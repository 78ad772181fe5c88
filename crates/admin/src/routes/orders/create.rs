//! Order composition handlers.
//!
//! The draft lives in the session. Every button on the page posts the whole
//! form to `POST /orders/new` with an `action` value; the handler applies the
//! header fields and typed quantities first, then the action, stores the
//! draft, and redirects back to the page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use shopdesk_core::{DraftError, Item, ItemId, OrderDraft, OrderStatus, User, UserId, parse_quantity};
use tower_sessions::Session;
use tracing::instrument;

use crate::config::DisplayConfig;
use crate::error::AppError;
use crate::filters;
use crate::models::Flash;
use crate::models::session::{clear_draft, load_draft, push_flash, save_draft, take_flashes};
use crate::resource::{Items, Orders, Resource, Users};
use crate::state::AppState;

use super::types::{OptionView, status_options};

const QUANTITY_PREFIX: &str = "quantity.";
const REMOVE_PREFIX: &str = "remove:";

/// Path of the composition page.
fn new_order_path() -> String {
    format!("{}/new", Orders::list_path())
}

// =============================================================================
// Form Input
// =============================================================================

/// What the operator asked the draft to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftAction {
    /// Add the item chosen in the item select.
    AddItem,
    /// Only apply the header fields and quantities.
    Update,
    /// Drop the line at this index.
    Remove(usize),
    /// Start over with an empty draft.
    Reset,
    /// Create the order.
    Submit,
}

impl DraftAction {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "add_item" => Some(Self::AddItem),
            "update" => Some(Self::Update),
            "reset" => Some(Self::Reset),
            "submit" => Some(Self::Submit),
            other => other
                .strip_prefix(REMOVE_PREFIX)
                .and_then(|index| index.parse().ok())
                .map(Self::Remove),
        }
    }
}

/// The composition form, decoded from its raw fields.
///
/// Line quantities arrive as `quantity.<index>` so the field set varies
/// with the draft, which is why this is not a plain `Deserialize` struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftForm {
    pub action: DraftAction,
    pub user_id: Option<UserId>,
    pub status: Option<OrderStatus>,
    pub shipping_address: Option<String>,
    pub notes: Option<String>,
    pub item_id: Option<ItemId>,
    pub quantities: Vec<(usize, i64)>,
}

impl DraftForm {
    /// Decode the raw form fields.
    ///
    /// A missing `action` means `update`. Blank `user_id` and `item_id`
    /// mean nothing was selected.
    ///
    /// # Errors
    ///
    /// Returns a message for an unknown action or a malformed id or status.
    pub fn parse(fields: Vec<(String, String)>) -> Result<Self, String> {
        let mut form = Self {
            action: DraftAction::Update,
            user_id: None,
            status: None,
            shipping_address: None,
            notes: None,
            item_id: None,
            quantities: Vec::new(),
        };
        let mut action = None;

        for (key, value) in fields {
            match key.as_str() {
                "action" => {
                    action.get_or_insert(value);
                }
                "user_id" => form.user_id = parse_optional_id(&value)?,
                "item_id" => form.item_id = parse_optional_id(&value)?,
                "status" => form.status = Some(value.parse()?),
                "shipping_address" => form.shipping_address = Some(value),
                "notes" => form.notes = Some(value),
                other => {
                    if let Some(index) = other
                        .strip_prefix(QUANTITY_PREFIX)
                        .and_then(|index| index.parse().ok())
                    {
                        form.quantities.push((index, parse_quantity(&value)));
                    }
                }
            }
        }

        if let Some(action) = action {
            form.action =
                DraftAction::parse(&action).ok_or_else(|| format!("unknown action: {action}"))?;
        }

        Ok(form)
    }

    /// Copy the header fields and quantities into the draft.
    ///
    /// Fields absent from the form are left as they are.
    pub fn apply_to(&self, draft: &mut OrderDraft) {
        if self.user_id.is_some() {
            draft.user_id = self.user_id;
        }
        if let Some(status) = self.status {
            draft.status = status;
        }
        if let Some(address) = &self.shipping_address {
            draft.shipping_address.clone_from(address);
        }
        if let Some(notes) = &self.notes {
            draft.notes.clone_from(notes);
        }
        for &(index, quantity) in &self.quantities {
            draft.set_quantity(index, quantity);
        }
    }
}

fn parse_optional_id<T>(value: &str) -> Result<Option<T>, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value.parse().map(Some).map_err(|e: T::Err| e.to_string())
}

// =============================================================================
// Views
// =============================================================================

/// One selected line on the composition page.
#[derive(Debug, Clone)]
pub struct DraftLineView {
    pub index: usize,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub subtotal: String,
}

/// Order composition page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/new.html")]
pub struct OrderNewTemplate {
    pub current_path: String,
    pub flashes: Vec<Flash>,
    pub action: String,
    pub users: Vec<OptionView>,
    pub items: Vec<OptionView>,
    pub statuses: Vec<OptionView>,
    pub shipping_address: String,
    pub notes: String,
    pub lines: Vec<DraftLineView>,
    pub total: String,
    pub error: Option<String>,
}

impl OrderNewTemplate {
    fn new(draft: &OrderDraft, users: &[User], items: &[Item], display: &DisplayConfig) -> Self {
        // With no user chosen yet the first one is shown selected
        let selected_user = draft.user_id.or_else(|| users.first().map(|u| u.id));
        let total = draft.total();

        Self {
            current_path: Orders::list_path(),
            flashes: Vec::new(),
            action: new_order_path(),
            users: users
                .iter()
                .map(|user| OptionView {
                    value: user.id.to_string(),
                    label: format!("{} ({})", user.full_name, user.email),
                    selected: Some(user.id) == selected_user,
                })
                .collect(),
            items: items
                .iter()
                .map(|item| OptionView {
                    value: item.id.to_string(),
                    label: format!("{} ({})", item.name, display.money(item.price)),
                    selected: false,
                })
                .collect(),
            statuses: status_options(draft.status),
            shipping_address: draft.shipping_address.clone(),
            notes: draft.notes.clone(),
            lines: draft
                .lines()
                .iter()
                .enumerate()
                .map(|(index, line)| DraftLineView {
                    index,
                    name: line.name.clone(),
                    quantity: line.quantity,
                    price: display.money(line.price),
                    subtotal: display.checked_money(line.subtotal()),
                })
                .collect(),
            total: display.checked_money(total.as_ref().ok().copied()),
            error: total.err().map(|e| e.to_string()),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Order composition page handler.
///
/// Loads users and items together; if either fails the page shows an error
/// and no selects.
#[instrument(skip(state, session))]
pub async fn new(State(state): State<AppState>, session: Session) -> Result<OrderNewTemplate, AppError> {
    let draft = load_draft(&session).await?;
    let backend = state.backend();
    let (users, items) = tokio::join!(backend.list::<Users>(), backend.list::<Items>());

    let template = match (users, items) {
        (Ok(users), Ok(items)) => OrderNewTemplate::new(&draft, &users, &items, state.display()),
        (users, items) => {
            if let Err(e) = &users {
                tracing::error!("Failed to load users for order form: {e}");
            }
            if let Err(e) = &items {
                tracing::error!("Failed to load items for order form: {e}");
            }
            OrderNewTemplate {
                error: Some("Failed to load data. Please try again later.".to_string()),
                ..OrderNewTemplate::new(&draft, &[], &[], state.display())
            }
        }
    };

    Ok(OrderNewTemplate {
        flashes: take_flashes(&session).await,
        ..template
    })
}

/// Draft action handler.
///
/// Typed quantities that would overflow the total are refused and the
/// stored draft is kept. Removing a line and resetting always go through.
#[instrument(skip(state, session, fields))]
pub async fn apply(
    State(state): State<AppState>,
    session: Session,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let form = DraftForm::parse(fields).map_err(AppError::BadRequest)?;
    let mut draft = load_draft(&session).await?;
    form.apply_to(&mut draft);

    let fits = match form.action {
        DraftAction::Remove(_) | DraftAction::Reset => Ok(()),
        _ => draft.total().map(drop),
    };
    if let Err(e) = fits {
        tracing::debug!("Refusing draft quantities: {e}");
        push_flash(&session, Flash::warning(e.to_string())).await;
        return Ok(Redirect::to(&new_order_path()).into_response());
    }

    match form.action {
        DraftAction::Update => {}
        DraftAction::AddItem => add_item(&state, &session, &mut draft, form.item_id).await,
        DraftAction::Remove(index) => {
            if draft.remove(index).is_none() {
                tracing::debug!(index, "No draft line to remove");
            }
        }
        DraftAction::Reset => draft = OrderDraft::default(),
        DraftAction::Submit => {
            if let Some(response) = submit(&state, &session, &draft).await? {
                return Ok(response);
            }
        }
    }

    save_draft(&session, &draft).await?;
    Ok(Redirect::to(&new_order_path()).into_response())
}

async fn add_item(state: &AppState, session: &Session, draft: &mut OrderDraft, item_id: Option<ItemId>) {
    let Some(item_id) = item_id else {
        push_flash(session, Flash::warning("Please select an item.")).await;
        return;
    };

    if draft.contains(item_id) {
        push_flash(session, Flash::warning(DraftError::AlreadySelected(item_id).to_string())).await;
        return;
    }

    match state.backend().fetch::<Items>(item_id).await {
        Ok(item) => {
            if let Err(e) = draft.add_item(&item) {
                push_flash(session, Flash::warning(e.to_string())).await;
            }
        }
        Err(e) => {
            tracing::error!(%item_id, "Failed to fetch item for draft: {e}");
            push_flash(session, Flash::error(Items::load_failed_message())).await;
        }
    }
}

/// Create the order. Returns the response to send when the draft is done
/// with, or `None` to keep composing.
async fn submit(
    state: &AppState,
    session: &Session,
    draft: &OrderDraft,
) -> Result<Option<Response>, AppError> {
    let payload = match draft.to_payload() {
        Ok(payload) => payload,
        Err(e) => {
            push_flash(session, Flash::warning(e.to_string())).await;
            return Ok(None);
        }
    };

    match state.backend().create::<Orders>(&payload).await {
        Ok(order) => {
            let order_id = Orders::id(&order);
            tracing::info!(%order_id, total = %payload.total_amount, "Created order");
            clear_draft(session).await?;
            push_flash(session, Flash::success("Order created.")).await;
            Ok(Some(Redirect::to(&Orders::detail_path(order_id)).into_response()))
        }
        Err(e) => {
            tracing::error!("Failed to create order: {e}");
            let message = e.detail_or("Failed to create order. Please try again.");
            push_flash(session, Flash::error(message)).await;
            Ok(None)
        }
    }
}

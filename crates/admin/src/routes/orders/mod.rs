//! Order route handlers.
//!
//! This module contains handlers for the order list, detail view, order
//! composition, and header editing. Deletes go through [`super::delete`].

mod create;
mod detail;
mod edit;
mod list;
pub mod types;

pub use types::{OptionView, OrderDetailView, OrderLineView, OrderRowView, OrdersQuery};

pub use list::{OrdersIndexTemplate, index};

pub use detail::{OrderShowTemplate, show};

pub use create::{DraftAction, DraftForm, DraftLineView, OrderNewTemplate, apply, new};

pub use edit::{OrderEditForm, OrderEditTemplate, edit, update};

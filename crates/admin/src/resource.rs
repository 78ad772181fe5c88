//! Resource descriptions for the generic backend calls and views.
//!
//! Users, items, and orders share one REST contract (list, fetch, create,
//! update, delete). A [`Resource`] names the collection, the payload types,
//! and the labels the views use, so the client and the delete flow are
//! written once.

use std::fmt::{Debug, Display};
use std::str::FromStr;

use serde::Serialize;
use serde::de::DeserializeOwned;
use shopdesk_core::{
    Item, ItemCreate, ItemId, ItemUpdate, Order, OrderCreate, OrderId, OrderUpdate, User,
    UserCreate, UserId, UserUpdate,
};

/// An entity type exposed by the backend as a REST collection.
pub trait Resource: Send + Sync + 'static {
    /// Identifier type, rendered into paths with `Display`.
    type Id: Copy + Display + FromStr + DeserializeOwned + Debug + Send + Sync;
    /// Record returned by the backend.
    type Record: DeserializeOwned + Debug + Send;
    /// `POST` payload.
    type Create: Serialize + Debug + Send + Sync;
    /// `PUT` payload.
    type Update: Serialize + Debug + Send + Sync;

    /// Collection path segment, e.g. `users`.
    const COLLECTION: &'static str;
    /// Lower-case singular label, e.g. `user`.
    const SINGULAR: &'static str;
    /// Lower-case plural label, e.g. `users`.
    const PLURAL: &'static str;

    /// The record's identifier.
    fn id(record: &Self::Record) -> Self::Id;

    /// Admin path of the list page.
    #[must_use]
    fn list_path() -> String {
        format!("/{}", Self::COLLECTION)
    }

    /// Admin path of a record's detail page.
    #[must_use]
    fn detail_path(id: Self::Id) -> String {
        format!("/{}/{id}", Self::COLLECTION)
    }

    /// Message shown when the list or detail fetch fails.
    #[must_use]
    fn load_failed_message() -> String {
        format!("Failed to load {}. Please try again later.", Self::PLURAL)
    }

    /// Message shown when a delete fails.
    #[must_use]
    fn delete_failed_message() -> String {
        format!("Failed to delete {}. Please try again.", Self::SINGULAR)
    }
}

/// `/users`
#[derive(Debug)]
pub enum Users {}

/// `/items`
#[derive(Debug)]
pub enum Items {}

/// `/orders`
#[derive(Debug)]
pub enum Orders {}

impl Resource for Users {
    type Id = UserId;
    type Record = User;
    type Create = UserCreate;
    type Update = UserUpdate;

    const COLLECTION: &'static str = "users";
    const SINGULAR: &'static str = "user";
    const PLURAL: &'static str = "users";

    fn id(record: &User) -> UserId {
        record.id
    }
}

impl Resource for Items {
    type Id = ItemId;
    type Record = Item;
    type Create = ItemCreate;
    type Update = ItemUpdate;

    const COLLECTION: &'static str = "items";
    const SINGULAR: &'static str = "item";
    const PLURAL: &'static str = "items";

    fn id(record: &Item) -> ItemId {
        record.id
    }
}

impl Resource for Orders {
    type Id = OrderId;
    type Record = Order;
    type Create = OrderCreate;
    type Update = OrderUpdate;

    const COLLECTION: &'static str = "orders";
    const SINGULAR: &'static str = "order";
    const PLURAL: &'static str = "orders";

    fn id(record: &Order) -> OrderId {
        record.id
    }
}

/// Result of a page's mount-time fetch: the value, or the message to show
/// in its place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loadable<T> {
    Ready(T),
    Failed(String),
}

impl<T> Loadable<T> {
    /// Wrap a fetch result, logging the failure and keeping only `message`.
    pub fn from_result<E: Display>(result: Result<T, E>, message: impl Into<String>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(e) => {
                tracing::error!(error = %e, "Backend fetch failed");
                Self::Failed(message.into())
            }
        }
    }

    /// Map the ready value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Loadable<U> {
        match self {
            Self::Ready(value) => Loadable::Ready(f(value)),
            Self::Failed(message) => Loadable::Failed(message),
        }
    }

    /// Split into the value (or default) and the error message for templates.
    pub fn into_parts(self) -> (T, Option<String>)
    where
        T: Default,
    {
        match self {
            Self::Ready(value) => (value, None),
            Self::Failed(message) => (T::default(), Some(message)),
        }
    }
}

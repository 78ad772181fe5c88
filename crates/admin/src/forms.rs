//! Form inputs for the user and item pages, with their validation.
//!
//! Validation mirrors the backend's schemas so obviously bad input is
//! reported next to the field without a round trip. A form that fails
//! validation is re-rendered with its values and never reaches the backend.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Deserialize;
use shopdesk_core::{
    Email, Item, ItemCreate, ItemUpdate, MAX_AMOUNT, User, UserCreate, UserUpdate, parse_amount,
};

const FULL_NAME_MIN: usize = 2;
const FULL_NAME_MAX: usize = 100;
const PASSWORD_MIN: usize = 8;
const ITEM_NAME_MAX: usize = 255;

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    /// The message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    fn finish<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

fn checkbox(value: Option<&str>) -> bool {
    matches!(value, Some("on" | "true" | "1" | "yes"))
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn check_email(errors: &mut FieldErrors, raw: &str) -> Option<Email> {
    Email::parse(raw)
        .map_err(|e| errors.add("email", e.to_string()))
        .ok()
}

fn check_full_name(errors: &mut FieldErrors, raw: &str) -> String {
    let name = raw.trim().to_string();
    let len = name.chars().count();
    if len == 0 {
        errors.add("full_name", "Full name is required");
    } else if len < FULL_NAME_MIN {
        errors.add(
            "full_name",
            format!("Full name must be at least {FULL_NAME_MIN} characters"),
        );
    } else if len > FULL_NAME_MAX {
        errors.add(
            "full_name",
            format!("Full name must be at most {FULL_NAME_MAX} characters"),
        );
    }
    name
}

fn check_password(errors: &mut FieldErrors, raw: &str) {
    if raw.chars().count() < PASSWORD_MIN {
        errors.add(
            "password",
            format!("Password must be at least {PASSWORD_MIN} characters"),
        );
    }
}

// =============================================================================
// Users
// =============================================================================

/// User create form.
#[derive(Clone, Default, Deserialize)]
pub struct UserForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub is_active: Option<String>,
}

impl std::fmt::Debug for UserForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserForm")
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("password", &"[REDACTED]")
            .field("is_active", &self.is_active)
            .finish()
    }
}

impl UserForm {
    /// A blank form for a new, active user.
    #[must_use]
    pub fn new_active() -> Self {
        Self {
            is_active: Some("on".to_string()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn active(&self) -> bool {
        checkbox(self.is_active.as_deref())
    }

    /// Validate into a create payload.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when any field is invalid.
    pub fn validate(&self) -> Result<UserCreate, FieldErrors> {
        let mut errors = FieldErrors::default();
        let email = check_email(&mut errors, &self.email);
        let full_name = check_full_name(&mut errors, &self.full_name);
        if self.password.is_empty() {
            errors.add("password", "Password is required");
        } else {
            check_password(&mut errors, &self.password);
        }

        match email {
            Some(email) => errors.finish(UserCreate {
                email,
                full_name,
                password: self.password.clone(),
                is_active: self.active(),
            }),
            None => Err(errors),
        }
    }
}

/// User edit form.
///
/// The `original_*` fields echo the record as it was loaded so only the
/// fields the operator changed are sent.
#[derive(Clone, Default, Deserialize)]
pub struct UserEditForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub is_active: Option<String>,
    #[serde(default)]
    pub original_email: String,
    #[serde(default)]
    pub original_full_name: String,
    #[serde(default)]
    pub original_is_active: String,
}

impl std::fmt::Debug for UserEditForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserEditForm")
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("password", &"[REDACTED]")
            .field("is_active", &self.is_active)
            .finish_non_exhaustive()
    }
}

impl From<&User> for UserEditForm {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            password: String::new(),
            is_active: user.is_active.then(|| "on".to_string()),
            original_email: user.email.clone(),
            original_full_name: user.full_name.clone(),
            original_is_active: user.is_active.to_string(),
        }
    }
}

impl UserEditForm {
    #[must_use]
    pub fn active(&self) -> bool {
        checkbox(self.is_active.as_deref())
    }

    /// Validate and diff against the original values.
    ///
    /// An empty password leaves the password unchanged. The returned update
    /// may be empty, in which case nothing should be sent.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when any field is invalid.
    pub fn validate(&self) -> Result<UserUpdate, FieldErrors> {
        let mut errors = FieldErrors::default();
        let email = check_email(&mut errors, &self.email);
        let full_name = check_full_name(&mut errors, &self.full_name);
        let password = non_empty(&self.password);
        if let Some(password) = &password {
            check_password(&mut errors, password);
        }

        let is_active = self.active();
        let update = UserUpdate {
            email: email.filter(|e| e.as_str() != self.original_email.trim()),
            full_name: (full_name != self.original_full_name.trim()).then_some(full_name),
            password: password.map(|_| self.password.clone()),
            is_active: (is_active.to_string() != self.original_is_active).then_some(is_active),
        };
        errors.finish(update)
    }
}

// =============================================================================
// Items
// =============================================================================

/// Item create and edit form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub stock: String,
    #[serde(default)]
    pub image_url: String,
}

impl From<&Item> for ItemForm {
    fn from(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description.clone().unwrap_or_default(),
            price: item.price.normalize().to_string(),
            stock: item.stock.to_string(),
            image_url: item.image_url.clone().unwrap_or_default(),
        }
    }
}

impl ItemForm {
    /// A blank form with zero stock.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            stock: "0".to_string(),
            ..Self::default()
        }
    }

    /// Validate into a create payload.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when any field is invalid.
    pub fn validate(&self) -> Result<ItemCreate, FieldErrors> {
        let mut errors = FieldErrors::default();

        let name = self.name.trim().to_string();
        if name.is_empty() {
            errors.add("name", "Name is required");
        } else if name.chars().count() > ITEM_NAME_MAX {
            errors.add(
                "name",
                format!("Name must be at most {ITEM_NAME_MAX} characters"),
            );
        }

        let price = match parse_amount(&self.price) {
            Ok(price) if price <= Decimal::ZERO => {
                errors.add("price", "Price must be greater than 0");
                Decimal::ZERO
            }
            Ok(price) if price > MAX_AMOUNT => {
                errors.add("price", format!("Price must be at most {MAX_AMOUNT}"));
                Decimal::ZERO
            }
            Ok(price) => price,
            Err(e) => {
                errors.add("price", e.to_string());
                Decimal::ZERO
            }
        };

        let stock = match self.stock.trim().parse::<i128>() {
            Ok(stock) if stock < 0 => {
                errors.add("stock", "Stock must be 0 or greater");
                0
            }
            Ok(stock) => u64::try_from(stock).unwrap_or_else(|_| {
                errors.add("stock", "Stock is too large");
                0
            }),
            Err(_) if self.stock.trim().is_empty() => {
                errors.add("stock", "Stock is required");
                0
            }
            Err(_) => {
                errors.add("stock", "Stock must be a whole number");
                0
            }
        };

        errors.finish(ItemCreate {
            name,
            description: non_empty(&self.description),
            price,
            stock,
            image_url: non_empty(&self.image_url),
        })
    }

    /// Validate into a full-replacement update payload.
    ///
    /// # Errors
    ///
    /// As for [`Self::validate`].
    pub fn validate_update(&self) -> Result<ItemUpdate, FieldErrors> {
        self.validate().map(ItemUpdate::from)
    }
}

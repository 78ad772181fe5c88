//! Type definitions and conversions for order views.

use std::collections::HashMap;

use serde::Deserialize;
use shopdesk_core::{Item, ItemId, Order, OrderLine, OrderStatus, User, UserId};

use crate::config::DisplayConfig;

/// Shown when an order's user cannot be resolved.
pub const UNKNOWN_USER: &str = "Unknown user";

/// Shown when a line's item cannot be resolved.
pub const UNKNOWN_ITEM: &str = "Unknown item";

// =============================================================================
// Query Parameters
// =============================================================================

/// Query parameters for the orders list.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    /// Only show this user's orders.
    pub user_id: Option<String>,
}

// =============================================================================
// View Types
// =============================================================================

/// A `<select>` option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Status options with `current` preselected.
#[must_use]
pub fn status_options(current: OrderStatus) -> Vec<OptionView> {
    OrderStatus::ALL
        .iter()
        .map(|status| OptionView {
            value: status.as_str().to_string(),
            label: status.label().to_string(),
            selected: *status == current,
        })
        .collect()
}

/// Order row for list tables.
#[derive(Debug, Clone)]
pub struct OrderRowView {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub total: String,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub line_count: usize,
    pub created_at: String,
}

impl OrderRowView {
    /// Build a row; `user_name` falls back to [`UNKNOWN_USER`].
    #[must_use]
    pub fn new(order: &Order, user_name: Option<&str>, display: &DisplayConfig) -> Self {
        Self {
            id: order.id.to_string(),
            user_id: order.user_id.to_string(),
            user_name: user_name.unwrap_or(UNKNOWN_USER).to_string(),
            total: display.money(order.total_amount),
            status_label: order.status.label(),
            status_class: order.status.badge_class(),
            line_count: order.line_count(),
            created_at: display.timestamp(&order.created_at),
        }
    }
}

/// Index of user names by id.
#[must_use]
pub fn user_names(users: &[User]) -> HashMap<UserId, String> {
    users
        .iter()
        .map(|user| (user.id, user.full_name.clone()))
        .collect()
}

/// One line on the order detail page.
#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub item_id: String,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub subtotal: String,
}

impl OrderLineView {
    /// Build a line, naming it from the line itself or the item catalogue.
    #[must_use]
    pub fn new(line: &OrderLine, catalogue: &HashMap<ItemId, &Item>, display: &DisplayConfig) -> Self {
        let name = line
            .name
            .clone()
            .or_else(|| catalogue.get(&line.item_id).map(|item| item.name.clone()))
            .unwrap_or_else(|| UNKNOWN_ITEM.to_string());

        Self {
            item_id: line.item_id.to_string(),
            name,
            quantity: line.quantity,
            price: display.money(line.price_at_time),
            subtotal: display.checked_money(line.subtotal()),
        }
    }
}

/// Order detail view.
#[derive(Debug, Clone)]
pub struct OrderDetailView {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: Option<String>,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub shipping_address: String,
    pub notes: String,
    pub total: String,
    pub created_at: String,
    pub updated_at: String,
    pub lines: Vec<OrderLineView>,
}

impl OrderDetailView {
    #[must_use]
    pub fn new(
        order: &Order,
        user: Option<&User>,
        items: &[Item],
        display: &DisplayConfig,
    ) -> Self {
        let catalogue: HashMap<ItemId, &Item> = items.iter().map(|item| (item.id, item)).collect();

        Self {
            id: order.id.to_string(),
            user_id: order.user_id.to_string(),
            user_name: user.map_or_else(|| UNKNOWN_USER.to_string(), |u| u.full_name.clone()),
            user_email: user.map(|u| u.email.clone()),
            status_label: order.status.label(),
            status_class: order.status.badge_class(),
            shipping_address: order.shipping_address.clone().unwrap_or_default(),
            notes: order.notes.clone().unwrap_or_default(),
            total: display.money(order.total_amount),
            created_at: display.timestamp(&order.created_at),
            updated_at: display.timestamp(&order.updated_at),
            lines: order
                .items
                .iter()
                .map(|line| OrderLineView::new(line, &catalogue, display))
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use shopdesk_core::{OrderId, Timestamp, Uuid};

    use super::*;
    use crate::config::AMOUNT_TOO_LARGE;

    fn order(lines: Vec<OrderLine>) -> Order {
        Order {
            id: OrderId::new(Uuid::new_v4()),
            user_id: UserId::new(Uuid::new_v4()),
            status: OrderStatus::Shipped,
            shipping_address: None,
            total_amount: Decimal::new(3500, 0),
            notes: Some("Gift wrap".to_string()),
            created_at: Timestamp::parse("2024-05-01T00:00:00Z").unwrap(),
            updated_at: Timestamp::parse("2024-05-01T00:00:00Z").unwrap(),
            items: lines,
        }
    }

    fn line(item_id: ItemId, quantity: u32, price: i64) -> OrderLine {
        OrderLine {
            item_id,
            quantity,
            price_at_time: Decimal::new(price, 0),
            name: None,
        }
    }

    #[test]
    fn test_row_falls_back_to_unknown_user() {
        let order = order(vec![]);
        let row = OrderRowView::new(&order, None, &DisplayConfig::default());
        assert_eq!(row.user_name, UNKNOWN_USER);
        assert_eq!(row.total, "¥3,500");
        assert_eq!(row.status_label, "Shipped");
        assert_eq!(row.status_class, "badge-primary");
        assert_eq!(row.created_at, "2024/05/01 09:00:00");
    }

    #[test]
    fn test_detail_shows_stored_quantities_and_names() {
        let known = ItemId::new(Uuid::new_v4());
        let unknown = ItemId::new(Uuid::new_v4());
        let item = Item {
            id: known,
            name: "Sencha".to_string(),
            description: None,
            price: Decimal::new(9999, 0),
            stock: 1,
            image_url: None,
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        };
        let order = order(vec![line(known, 2, 1000), line(unknown, 3, 500)]);

        let view = OrderDetailView::new(&order, None, &[item], &DisplayConfig::default());

        assert_eq!(view.lines[0].name, "Sencha");
        assert_eq!(view.lines[0].quantity, 2);
        assert_eq!(view.lines[0].price, "¥1,000");
        assert_eq!(view.lines[0].subtotal, "¥2,000");
        assert_eq!(view.lines[1].name, UNKNOWN_ITEM);
        assert_eq!(view.lines[1].subtotal, "¥1,500");
        assert_eq!(view.notes, "Gift wrap");
    }

    #[test]
    fn test_detail_survives_out_of_range_line() {
        let order = order(vec![line(ItemId::new(Uuid::new_v4()), u32::MAX, 0)]);
        let order = Order {
            items: vec![OrderLine {
                price_at_time: Decimal::MAX,
                ..order.items[0].clone()
            }],
            ..order
        };

        let view = OrderDetailView::new(&order, None, &[], &DisplayConfig::default());

        assert_eq!(view.lines[0].subtotal, AMOUNT_TOO_LARGE);
        assert_eq!(view.total, "¥3,500");
    }

    #[test]
    fn test_status_options_preselect_current() {
        let options = status_options(OrderStatus::Delivered);
        assert_eq!(options.len(), OrderStatus::ALL.len());
        let selected: Vec<_> = options.iter().filter(|o| o.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].value, "delivered");
    }
}

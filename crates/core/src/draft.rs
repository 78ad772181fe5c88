//! Order composition.
//!
//! An [`OrderDraft`] is the selection an operator builds on the order-create
//! page: a chosen user, header fields, and an ordered list of lines. Each
//! line captures the item's price at the moment it was added. The total is a
//! checked fold over the lines and is recomputed whenever it is asked for.
//!
//! ```
//! use rust_decimal::Decimal;
//! use shopdesk_core::{DraftLine, ItemId, OrderDraft, Uuid};
//!
//! let mut draft = OrderDraft::default();
//! draft.push_line(DraftLine::new(ItemId::new(Uuid::new_v4()), "Sencha", Decimal::new(1000, 0))).unwrap();
//! draft.push_line(DraftLine::new(ItemId::new(Uuid::new_v4()), "Matcha", Decimal::new(500, 0))).unwrap();
//! draft.set_quantity(0, 2);
//! draft.set_quantity(1, 3);
//! assert_eq!(draft.total(), Ok(Decimal::new(3500, 0)));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Item, OrderCreate, OrderLineCreate};
use crate::types::{ItemId, OrderStatus, UserId};

/// Reasons a draft operation or submission is refused.
///
/// These are operator-facing warnings, not failures: the draft is left as
/// it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    /// The item is already part of the selection.
    #[error("This item has already been added.")]
    AlreadySelected(ItemId),
    /// Submission with no lines.
    #[error("Please add at least one item.")]
    EmptySelection,
    /// Submission without a user.
    #[error("Please select a user.")]
    MissingUser,
    /// A subtotal or the total does not fit a [`Decimal`].
    #[error("The order total is too large. Please lower a quantity.")]
    AmountTooLarge,
}

/// A selected item with its quantity and captured price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftLine {
    pub item_id: ItemId,
    pub name: String,
    pub quantity: u32,
    pub price: Decimal,
}

impl DraftLine {
    /// A new line with quantity 1.
    #[must_use]
    pub fn new(item_id: ItemId, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            item_id,
            name: name.into(),
            quantity: 1,
            price,
        }
    }

    /// `price × quantity`, or `None` when it does not fit a [`Decimal`].
    #[must_use]
    pub fn subtotal(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

impl From<&Item> for DraftLine {
    fn from(item: &Item) -> Self {
        Self::new(item.id, item.name.clone(), item.price)
    }
}

/// The in-progress order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub user_id: Option<UserId>,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub notes: String,
    lines: Vec<DraftLine>,
}

impl OrderDraft {
    /// The selected lines, in the order they were added.
    #[must_use]
    pub fn lines(&self) -> &[DraftLine] {
        &self.lines
    }

    /// Whether no line has been selected yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether `item_id` is already selected.
    #[must_use]
    pub fn contains(&self, item_id: ItemId) -> bool {
        self.lines.iter().any(|line| line.item_id == item_id)
    }

    /// Add an item at its current price with quantity 1.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::AlreadySelected`] and leaves the selection
    /// unchanged when the item is already present.
    pub fn add_item(&mut self, item: &Item) -> Result<(), DraftError> {
        self.push_line(DraftLine::from(item))
    }

    /// Append a prepared line.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::AlreadySelected`] when the line's item is
    /// already present and [`DraftError::AmountTooLarge`] when the total
    /// would overflow. Either way the selection is left unchanged.
    pub fn push_line(&mut self, line: DraftLine) -> Result<(), DraftError> {
        if self.contains(line.item_id) {
            return Err(DraftError::AlreadySelected(line.item_id));
        }
        self.lines.push(line);
        if let Err(e) = self.total() {
            self.lines.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Set the quantity of the line at `index`, clamped to at least 1.
    ///
    /// There is no upper bound and no stock check, so the total may stop
    /// fitting; callers check [`Self::total`] afterwards. Returns `false`
    /// when there is no such line.
    pub fn set_quantity(&mut self, index: usize, requested: i64) -> bool {
        let Some(line) = self.lines.get_mut(index) else {
            return false;
        };
        line.quantity = u32::try_from(requested.max(1)).unwrap_or(u32::MAX);
        true
    }

    /// Drop the line at `index`. Out-of-range indexes are ignored.
    pub fn remove(&mut self, index: usize) -> Option<DraftLine> {
        (index < self.lines.len()).then(|| self.lines.remove(index))
    }

    /// Subtotal of the line at `index`, if there is one and it fits.
    #[must_use]
    pub fn line_subtotal(&self, index: usize) -> Option<Decimal> {
        self.lines.get(index).and_then(DraftLine::subtotal)
    }

    /// `Σ price × quantity` over the selection.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::AmountTooLarge`] when a subtotal or the sum
    /// overflows.
    pub fn total(&self) -> Result<Decimal, DraftError> {
        self.lines.iter().try_fold(Decimal::ZERO, |total, line| {
            line.subtotal()
                .and_then(|subtotal| total.checked_add(subtotal))
                .ok_or(DraftError::AmountTooLarge)
        })
    }

    /// Build the create-order payload.
    ///
    /// Empty shipping address and notes are sent as absent.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::EmptySelection`] when no line is selected, then
    /// [`DraftError::MissingUser`] when no user is chosen, then
    /// [`DraftError::AmountTooLarge`] when the total overflows.
    pub fn to_payload(&self) -> Result<OrderCreate, DraftError> {
        if self.lines.is_empty() {
            return Err(DraftError::EmptySelection);
        }
        let user_id = self.user_id.ok_or(DraftError::MissingUser)?;
        let total_amount = self.total()?;

        Ok(OrderCreate {
            user_id,
            status: self.status,
            shipping_address: non_empty(&self.shipping_address),
            total_amount,
            notes: non_empty(&self.notes),
            items: self
                .lines
                .iter()
                .map(|line| OrderLineCreate {
                    item_id: line.item_id,
                    quantity: line.quantity,
                    price_at_time: line.price,
                })
                .collect(),
        })
    }
}

/// Parse a quantity typed into the form. Anything that is not an integer
/// counts as 1.
#[must_use]
pub fn parse_quantity(input: &str) -> i64 {
    input.trim().parse().unwrap_or(1)
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::types::Uuid;

    fn line(price: i64) -> DraftLine {
        DraftLine::new(ItemId::new(Uuid::new_v4()), "item", Decimal::new(price, 0))
    }

    fn draft_with(lines: &[(i64, i64)]) -> OrderDraft {
        let mut draft = OrderDraft::default();
        for (index, &(price, quantity)) in lines.iter().enumerate() {
            draft.push_line(line(price)).unwrap();
            draft.set_quantity(index, quantity);
        }
        draft
    }

    #[rstest]
    #[case(0, 1)]
    #[case(1000, 1)]
    #[case(1000, 7)]
    #[case(19, 250)]
    fn test_single_line_total(#[case] price: i64, #[case] quantity: i64) {
        let draft = draft_with(&[(price, quantity)]);
        assert_eq!(draft.total(), Ok(Decimal::new(price * quantity, 0)));
    }

    #[test]
    fn test_example_total() {
        let draft = draft_with(&[(1000, 2), (500, 3)]);
        assert_eq!(draft.total(), Ok(Decimal::new(3500, 0)));
        assert_eq!(draft.line_subtotal(0), Some(Decimal::new(2000, 0)));
        assert_eq!(draft.line_subtotal(1), Some(Decimal::new(1500, 0)));
        assert_eq!(draft.line_subtotal(2), None);
    }

    #[test]
    fn test_total_is_order_independent() {
        let forward = draft_with(&[(1000, 2), (500, 3), (75, 4)]);
        let backward = draft_with(&[(75, 4), (500, 3), (1000, 2)]);
        assert_eq!(forward.total(), backward.total());
    }

    #[test]
    fn test_fractional_prices() {
        let mut draft = OrderDraft::default();
        draft
            .push_line(DraftLine::new(ItemId::new(Uuid::new_v4()), "x", Decimal::new(1999, 2)))
            .unwrap();
        draft.set_quantity(0, 3);
        assert_eq!(draft.total(), Ok(Decimal::new(5997, 2)));
    }

    #[test]
    fn test_new_line_has_quantity_one() {
        let draft = draft_with(&[]);
        assert!(draft.is_empty());
        assert_eq!(line(10).quantity, 1);
    }

    #[test]
    fn test_duplicate_add_leaves_selection_unchanged() {
        let mut draft = OrderDraft::default();
        let first = line(1000);
        let duplicate = DraftLine {
            price: Decimal::new(9999, 0),
            ..first.clone()
        };
        draft.push_line(first.clone()).unwrap();
        draft.set_quantity(0, 4);
        let before = draft.clone();

        let err = draft.push_line(duplicate).unwrap_err();

        assert_eq!(err, DraftError::AlreadySelected(first.item_id));
        assert_eq!(draft, before);
    }

    #[rstest]
    #[case(0)]
    #[case(-1)]
    #[case(-250)]
    #[case(i64::MIN)]
    fn test_non_positive_quantity_clamps_to_one(#[case] requested: i64) {
        let mut draft = draft_with(&[(100, 5)]);
        assert!(draft.set_quantity(0, requested));
        assert_eq!(draft.lines()[0].quantity, 1);
    }

    #[test]
    fn test_quantity_has_no_upper_bound() {
        let mut draft = draft_with(&[(1, 1)]);
        draft.set_quantity(0, 1_000_000);
        assert_eq!(draft.lines()[0].quantity, 1_000_000);
        draft.set_quantity(0, i64::MAX);
        assert_eq!(draft.lines()[0].quantity, u32::MAX);
    }

    #[test]
    fn test_set_quantity_out_of_range() {
        let mut draft = draft_with(&[(1, 1)]);
        assert!(!draft.set_quantity(3, 2));
    }

    #[rstest]
    #[case("3", 3)]
    #[case(" 12 ", 12)]
    #[case("-4", -4)]
    #[case("", 1)]
    #[case("abc", 1)]
    fn test_parse_quantity(#[case] input: &str, #[case] expected: i64) {
        assert_eq!(parse_quantity(input), expected);
    }

    #[test]
    fn test_remove_by_position() {
        let mut draft = draft_with(&[(1, 1), (2, 1), (3, 1)]);
        let removed = draft.remove(1).unwrap();
        assert_eq!(removed.price, Decimal::new(2, 0));
        let prices: Vec<_> = draft.lines().iter().map(|l| l.price).collect();
        assert_eq!(prices, vec![Decimal::new(1, 0), Decimal::new(3, 0)]);
        assert!(draft.remove(5).is_none());
        assert_eq!(draft.lines().len(), 2);
    }

    #[test]
    fn test_payload_requires_lines_before_user() {
        let draft = OrderDraft::default();
        assert_eq!(draft.to_payload(), Err(DraftError::EmptySelection));

        let draft = draft_with(&[(1, 1)]);
        assert_eq!(draft.to_payload(), Err(DraftError::MissingUser));
    }

    #[test]
    fn test_payload_carries_total_and_lines() {
        let mut draft = draft_with(&[(1000, 2), (500, 3)]);
        draft.user_id = Some(UserId::new(Uuid::new_v4()));
        draft.status = OrderStatus::Processing;
        draft.shipping_address = "  ".to_string();
        draft.notes = " fragile ".to_string();

        let payload = draft.to_payload().unwrap();

        assert_eq!(payload.total_amount, Decimal::new(3500, 0));
        assert_eq!(payload.status, OrderStatus::Processing);
        assert_eq!(payload.shipping_address, None);
        assert_eq!(payload.notes.as_deref(), Some("fragile"));
        assert_eq!(payload.items.len(), 2);
        assert_eq!(payload.items[0].quantity, 2);
        assert_eq!(payload.items[1].price_at_time, Decimal::new(500, 0));
    }

    fn huge_line() -> DraftLine {
        DraftLine::new(
            ItemId::new(Uuid::new_v4()),
            "huge",
            crate::types::parse_amount("100000000000000000000").unwrap(),
        )
    }

    #[rstest]
    #[case(1, true)]
    #[case(100_000_000, true)]
    #[case(1_000_000_000, false)]
    #[case(i64::MAX, false)]
    fn test_total_overflow_boundary(#[case] quantity: i64, #[case] fits: bool) {
        let mut draft = OrderDraft::default();
        draft.push_line(huge_line()).unwrap();
        draft.set_quantity(0, quantity);

        assert_eq!(draft.total().is_ok(), fits);
        assert_eq!(draft.line_subtotal(0).is_some(), fits);
    }

    #[test]
    fn test_overflowing_total_blocks_payload() {
        let mut draft = OrderDraft::default();
        draft.user_id = Some(UserId::new(Uuid::new_v4()));
        draft.push_line(huge_line()).unwrap();
        draft.set_quantity(0, 1_000_000_000);

        assert_eq!(draft.total(), Err(DraftError::AmountTooLarge));
        assert_eq!(draft.to_payload(), Err(DraftError::AmountTooLarge));
    }

    #[test]
    fn test_push_line_refuses_overflowing_total() {
        let mut draft = OrderDraft::default();
        draft.push_line(huge_line()).unwrap();
        // Within 1e20 of Decimal::MAX
        draft.set_quantity(0, 792_281_625);
        assert!(draft.total().is_ok());
        let before = draft.clone();

        let err = draft.push_line(huge_line()).unwrap_err();

        assert_eq!(err, DraftError::AmountTooLarge);
        assert_eq!(draft, before);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            DraftError::EmptySelection.to_string(),
            "Please add at least one item."
        );
        assert_eq!(DraftError::MissingUser.to_string(), "Please select a user.");
    }
}

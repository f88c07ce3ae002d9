//! # Domain Types
//!
//! Core domain types used throughout Kasir POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │      Item       │   │   Transaction   │   │  TransactionDetail  │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  id             │   │  id             │◄──│  transaction_id     │   │
//! │  │  name           │   │  total_amount   │   │  item_id → Item     │   │
//! │  │  price          │   │  created_at     │   │  item_name (frozen) │   │
//! │  │  stock          │   │  details[]      │   │  unit_price (frozen)│   │
//! │  └─────────────────┘   └─────────────────┘   │  quantity, subtotal │   │
//! │                                               └─────────────────────┘   │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │ CheckoutRequest │──►│  CheckoutItem   │  transient, never persisted  │
//! │  │  items[]        │   │  item_id, qty   │                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every persisted id is an integer assigned by the store on insert.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Item
// =============================================================================

/// A purchasable item in the inventory ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Item {
    /// Unique identifier, assigned by the store.
    pub id: i64,

    /// Display name shown to the cashier and on receipts.
    pub name: String,

    /// Unit price in the smallest currency unit.
    pub price: i64,

    /// Quantity on hand. Never negative.
    pub stock: i64,
}

impl Item {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::new(self.price)
    }

    /// Checks if the requested quantity is covered by the stock on hand.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

/// Payload for creating or replacing an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewItem {
    pub name: String,
    pub price: i64,
    pub stock: i64,
}

// =============================================================================
// Checkout Request
// =============================================================================

/// One requested line of a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutItem {
    /// Item to purchase. Older clients send this as `product_id`.
    #[serde(alias = "product_id")]
    pub item_id: i64,

    /// Quantity to purchase. Must be strictly positive.
    pub quantity: i64,
}

impl CheckoutItem {
    pub const fn new(item_id: i64, quantity: i64) -> Self {
        CheckoutItem { item_id, quantity }
    }
}

/// Body of a checkout call: an ordered list of requested lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
}

// =============================================================================
// Transaction
// =============================================================================

/// The persisted record of a completed checkout.
///
/// Created exactly once per successful checkout; never updated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Transaction {
    /// Assigned by the store on creation, monotonically increasing.
    pub id: i64,

    /// Sum of all detail subtotals.
    pub total_amount: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// Line items in the order they were requested.
    pub details: Vec<TransactionDetail>,
}

impl Transaction {
    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::new(self.total_amount)
    }
}

// =============================================================================
// Transaction Detail
// =============================================================================

/// A line item of a transaction.
/// Uses the snapshot pattern to freeze item data at time of sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct TransactionDetail {
    /// Owning transaction, stamped once the transaction row exists.
    pub transaction_id: i64,
    pub item_id: i64,
    /// Item name at time of sale (frozen).
    pub item_name: String,
    /// Unit price at time of sale (frozen).
    pub unit_price: i64,
    pub quantity: i64,
    /// unit_price × quantity.
    pub subtotal: i64,
}

impl TransactionDetail {
    /// Returns the subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::new(self.subtotal)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_can_sell() {
        let item = Item {
            id: 1,
            name: "Aqua 600ml".to_string(),
            price: 4000,
            stock: 2,
        };
        assert!(item.can_sell(1));
        assert!(item.can_sell(2));
        assert!(!item.can_sell(3));
        assert_eq!(item.price(), Money::new(4000));
    }

    #[test]
    fn test_checkout_request_accepts_product_id_alias() {
        let json = r#"{"items":[{"product_id":1,"quantity":2},{"item_id":2,"quantity":3}]}"#;
        let request: CheckoutRequest = serde_json::from_str(json).unwrap();

        assert_eq!(
            request.items,
            vec![CheckoutItem::new(1, 2), CheckoutItem::new(2, 3)]
        );
    }

    #[test]
    fn test_transaction_total() {
        let detail = |item_id, quantity, unit_price| TransactionDetail {
            transaction_id: 9,
            item_id,
            item_name: format!("item-{item_id}"),
            unit_price,
            quantity,
            subtotal: unit_price * quantity,
        };
        let tx = Transaction {
            id: 9,
            total_amount: 22000,
            created_at: Utc::now(),
            details: vec![detail(1, 2, 3500), detail(2, 3, 5000)],
        };

        assert_eq!(tx.total(), Money::new(22000));
    }
}

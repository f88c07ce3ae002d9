//! # Checkout Tally
//!
//! The pure half of a checkout: stock check, line pricing and the running
//! total. The database layer feeds it freshly read items inside its atomic
//! unit of work and persists whatever the tally produced.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  for each (item_id, qty) in request order:                              │
//! │      item = read inside transaction          (kasir-db)                 │
//! │      tally.add_line(&item, qty)              (THIS MODULE)              │
//! │        ├── stock < qty?      → InsufficientStock                        │
//! │        ├── price × qty       → subtotal (checked)                       │
//! │        └── total + subtotal  → total    (checked)                       │
//! │      conditional decrement                   (kasir-db)                 │
//! │                                                                         │
//! │  id = insert transaction(tally.total())      (kasir-db)                 │
//! │  tally.into_transaction(id, now)             (THIS MODULE)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Item, Transaction, TransactionDetail};
use crate::validation::validate_quantity;

/// A priced line that is not yet attached to a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub item_id: i64,
    pub item_name: String,
    pub unit_price: Money,
    pub quantity: i64,
    pub subtotal: Money,
}

impl PricedLine {
    fn into_detail(self, transaction_id: i64) -> TransactionDetail {
        TransactionDetail {
            transaction_id,
            item_id: self.item_id,
            item_name: self.item_name,
            unit_price: self.unit_price.amount(),
            quantity: self.quantity,
            subtotal: self.subtotal.amount(),
        }
    }
}

/// Accumulates priced lines and their total for one checkout call.
///
/// The total is always the exact sum of the line subtotals: both are only
/// ever updated together in [`CheckoutTally::add_line`].
#[derive(Debug, Clone, Default)]
pub struct CheckoutTally {
    lines: Vec<PricedLine>,
    total: Money,
}

impl CheckoutTally {
    pub fn with_capacity(capacity: usize) -> Self {
        CheckoutTally {
            lines: Vec::with_capacity(capacity),
            total: Money::zero(),
        }
    }

    /// Prices `quantity` units of `item` at its current price and adds the
    /// line to the tally.
    ///
    /// ## Errors
    /// - `CoreError::Validation` - quantity not positive, or the subtotal or
    ///   running total would overflow
    /// - `CoreError::InsufficientStock` - `item.stock < quantity`
    ///
    /// On error the tally is left exactly as it was.
    pub fn add_line(&mut self, item: &Item, quantity: i64) -> CoreResult<&PricedLine> {
        validate_quantity(quantity)?;

        if !item.can_sell(quantity) {
            return Err(CoreError::InsufficientStock {
                item_id: item.id,
                available: item.stock,
                requested: quantity,
            });
        }

        let unit_price = item.price();
        let subtotal = unit_price
            .checked_mul_quantity(quantity)
            .ok_or_else(|| quantity_overflow(unit_price))?;
        let total = self
            .total
            .checked_add(subtotal)
            .ok_or_else(|| quantity_overflow(unit_price))?;

        self.total = total;
        self.lines.push(PricedLine {
            item_id: item.id,
            item_name: item.name.clone(),
            unit_price,
            quantity,
            subtotal,
        });

        Ok(&self.lines[self.lines.len() - 1])
    }

    /// Running total of every line added so far.
    #[inline]
    pub fn total(&self) -> Money {
        self.total
    }

    pub fn lines(&self) -> &[PricedLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Stamps every line with the store-assigned transaction id and
    /// assembles the final record, keeping request order.
    pub fn into_transaction(self, id: i64, created_at: DateTime<Utc>) -> Transaction {
        Transaction {
            id,
            total_amount: self.total.amount(),
            created_at,
            details: self
                .lines
                .into_iter()
                .map(|line| line.into_detail(id))
                .collect(),
        }
    }
}

fn quantity_overflow(unit_price: Money) -> CoreError {
    let max = if unit_price.is_zero() {
        i64::MAX
    } else {
        i64::MAX / unit_price.amount().abs()
    };

    CoreError::Validation(ValidationError::OutOfRange {
        field: "quantity".to_string(),
        min: 1,
        max,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

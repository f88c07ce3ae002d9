//! # Validation Module
//!
//! Input validation for Kasir POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP (axum)                                                  │
//! │  └── Type validation (JSON deserialization)                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Business rule validation, before any store access                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK (stock >= 0) constraints                         │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{CheckoutItem, NewItem};
use crate::MAX_ITEM_NAME_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Checkout Validators
// =============================================================================

/// Validates the shape of a checkout request.
///
/// ## Rules
/// - At least one line
/// - Every quantity strictly positive
///
/// Item existence is NOT checked here; that needs the store.
///
/// ## Example
/// ```rust
/// use kasir_core::types::CheckoutItem;
/// use kasir_core::validation::validate_checkout_items;
///
/// assert!(validate_checkout_items(&[CheckoutItem::new(1, 2)]).is_ok());
/// assert!(validate_checkout_items(&[]).is_err());
/// assert!(validate_checkout_items(&[CheckoutItem::new(1, 0)]).is_err());
/// ```
pub fn validate_checkout_items(items: &[CheckoutItem]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    for (idx, line) in items.iter().enumerate() {
        validate_quantity(line.quantity).map_err(|_| ValidationError::MustBePositive {
            field: format!("items[{}].quantity", idx),
        })?;
    }

    Ok(())
}

/// Validates a requested quantity.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Item Validators
// =============================================================================

/// Validates an item's display name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most MAX_ITEM_NAME_LEN characters
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_ITEM_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_ITEM_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a unit price. Free items are not sold through this system.
pub fn validate_price(price: i64) -> ValidationResult<()> {
    if price <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock level.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::Negative {
            field: "stock".to_string(),
        });
    }

    Ok(())
}

/// Validates a create/update payload field by field.
pub fn validate_new_item(item: &NewItem) -> ValidationResult<()> {
    validate_item_name(&item.name)?;
    validate_price(item.price)?;
    validate_stock(item.stock)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

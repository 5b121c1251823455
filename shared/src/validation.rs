//! Pure stock-consistency rules
//!
//! These functions carry the arithmetic and the invariants of the stock
//! mutation engine and the inventory reconciliation, without any storage
//! concern. The backend services call them inside their transactions; the
//! test suite calls them directly.

use crate::models::{MovementCategory, MovementDirection};

/// Validate the shape of a movement before it touches the ledger:
/// positive quantity and a category drawn from the direction's vocabulary.
pub fn validate_movement(
    direction: MovementDirection,
    category: MovementCategory,
    quantity: i32,
) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be a positive integer");
    }
    if !category.allowed_for(direction) {
        return Err(match direction {
            MovementDirection::Entry => "Invalid movement category for an entry",
            MovementDirection::Exit => "Invalid movement category for an exit",
        });
    }
    Ok(())
}

/// Stock level after applying a movement, assuming it was accepted.
pub fn stock_after_movement(stock: i32, direction: MovementDirection, quantity: i32) -> i32 {
    match direction {
        MovementDirection::Entry => stock + quantity,
        MovementDirection::Exit => stock - quantity,
    }
}

/// Sufficiency check for exits: no partial consumption, no negative stock.
pub fn check_exit_sufficiency(stock: i32, quantity: i32) -> Result<(), &'static str> {
    if stock < quantity {
        return Err("Insufficient stock");
    }
    Ok(())
}

/// Stock level after reversing a movement, or an error when taking back an
/// entry would drive the stock negative (its quantity has already been
/// consumed by later exits). Exit reversals only add stock back and never
/// fail.
pub fn stock_after_reversal(
    stock: i32,
    direction: MovementDirection,
    quantity: i32,
) -> Result<i32, &'static str> {
    let reversed = stock_after_movement(stock, direction.inverse(), quantity);
    if reversed < 0 {
        return Err("Reversing this movement would make the stock negative");
    }
    Ok(reversed)
}

/// Signed difference of an inventory item: counted minus expected.
pub fn compute_difference(actual_quantity: i32, expected_quantity: i32) -> i32 {
    actual_quantity - expected_quantity
}

/// The correction movement an inventory item produces on completion.
/// A zero difference records nothing; otherwise the direction follows the
/// sign of the difference and the quantity is its magnitude.
pub fn correction_for_difference(difference: i32) -> Option<(MovementDirection, i32)> {
    match difference {
        0 => None,
        d if d > 0 => Some((MovementDirection::Entry, d)),
        d => Some((MovementDirection::Exit, -d)),
    }
}

/// Classify a product's stock level into alert types.
///
/// Rupture and seuil are mutually exclusive by construction; surstock is
/// independent and may coexist with seuil when thresholds are misconfigured
/// (not prevented here).
pub fn classify_stock(stock: i32, min_stock: i32, optimal_stock: i32) -> Vec<crate::AlertType> {
    let mut alerts = Vec::new();
    if stock == 0 {
        alerts.push(crate::AlertType::Rupture);
    } else if stock <= min_stock {
        alerts.push(crate::AlertType::Seuil);
    }
    if optimal_stock > 0 && stock > optimal_stock {
        alerts.push(crate::AlertType::Surstock);
    }
    alerts
}

/// Counted quantities cannot be negative.
pub fn validate_actual_quantity(actual_quantity: i32) -> Result<(), &'static str> {
    if actual_quantity < 0 {
        return Err("Counted quantity cannot be negative");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_categories_rejected_on_exits() {
        assert!(validate_movement(
            MovementDirection::Exit,
            MovementCategory::Achat,
            1
        )
        .is_err());
        assert!(validate_movement(
            MovementDirection::Entry,
            MovementCategory::Vente,
            1
        )
        .is_err());
    }

    #[test]
    fn zero_difference_records_no_correction() {
        assert_eq!(correction_for_difference(0), None);
        assert_eq!(
            correction_for_difference(3),
            Some((MovementDirection::Entry, 3))
        );
        assert_eq!(
            correction_for_difference(-3),
            Some((MovementDirection::Exit, 3))
        );
    }
}

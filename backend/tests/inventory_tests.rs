//! Inventory reconciliation tests
//!
//! Covers item difference arithmetic, the correction movements emitted on
//! completion, and the draft-only editing rules.

use proptest::prelude::*;
use shared::{
    compute_difference, correction_for_difference, stock_after_movement, validate_actual_quantity,
    InventoryStatus, MovementDirection,
};

// ============================================================================
// Difference Arithmetic Tests
// ============================================================================

mod differences {
    use super::*;

    #[test]
    fn difference_is_actual_minus_expected() {
        assert_eq!(compute_difference(7, 10), -3);
        assert_eq!(compute_difference(12, 10), 2);
        assert_eq!(compute_difference(10, 10), 0);
    }

    #[test]
    fn counted_quantity_must_be_non_negative() {
        assert!(validate_actual_quantity(0).is_ok());
        assert!(validate_actual_quantity(42).is_ok());
        assert!(validate_actual_quantity(-1).is_err());
    }
}

// ============================================================================
// Completion Correction Tests
// ============================================================================

mod corrections {
    use super::*;

    #[test]
    fn shortage_emits_an_exit_correction() {
        // Expected 10, counted 7: difference -3, exit of 3.
        let diff = compute_difference(7, 10);
        assert_eq!(diff, -3);
        assert_eq!(
            correction_for_difference(diff),
            Some((MovementDirection::Exit, 3))
        );
    }

    #[test]
    fn surplus_emits_an_entry_correction() {
        let diff = compute_difference(12, 10);
        assert_eq!(
            correction_for_difference(diff),
            Some((MovementDirection::Entry, 2))
        );
    }

    #[test]
    fn zero_difference_emits_nothing() {
        assert_eq!(correction_for_difference(0), None);
    }

    #[test]
    fn correction_brings_expected_stock_to_counted() {
        // Completion sets stock = actual; the correction movement must
        // account for exactly the gap so the ledger stays consistent.
        let expected = 10;
        let actual = 7;
        let diff = compute_difference(actual, expected);
        let (direction, quantity) = correction_for_difference(diff).unwrap();
        assert_eq!(stock_after_movement(expected, direction, quantity), actual);
    }
}

// ============================================================================
// Status Rules Tests
// ============================================================================

mod status_rules {
    use super::*;

    #[test]
    fn only_draft_is_editable() {
        assert!(InventoryStatus::Draft.is_draft());
        assert!(!InventoryStatus::Completed.is_draft());
        assert!(!InventoryStatus::Archived.is_draft());
    }

    #[test]
    fn status_wire_values() {
        assert_eq!(
            "draft".parse::<InventoryStatus>().unwrap(),
            InventoryStatus::Draft
        );
        assert_eq!(
            "completed".parse::<InventoryStatus>().unwrap(),
            InventoryStatus::Completed
        );
        assert_eq!(
            "archived".parse::<InventoryStatus>().unwrap(),
            InventoryStatus::Archived
        );
        assert!("open".parse::<InventoryStatus>().is_err());
    }
}

// ============================================================================
// Lifecycle Guard Tests
// ============================================================================

mod lifecycle_guards {
    use super::*;

    /// Minimal lifecycle model: every mutation re-reads the status in the
    /// same step it acts, mirroring the status-lock-then-write discipline.
    struct CountSession {
        status: InventoryStatus,
        items: u32,
    }

    impl CountSession {
        fn new() -> Self {
            Self {
                status: InventoryStatus::Draft,
                items: 0,
            }
        }

        fn add_item(&mut self) -> Result<(), &'static str> {
            if !self.status.is_draft() {
                return Err("inventory is not draft");
            }
            self.items += 1;
            Ok(())
        }

        fn complete(&mut self) -> Result<(), &'static str> {
            if !self.status.is_draft() {
                return Err("already completed");
            }
            self.status = InventoryStatus::Completed;
            Ok(())
        }

        fn delete(self) -> Result<(), (&'static str, Self)> {
            if self.status == InventoryStatus::Completed {
                return Err(("completed inventory cannot be deleted", self));
            }
            Ok(())
        }
    }

    #[test]
    fn completion_is_one_way() {
        let mut session = CountSession::new();
        session.add_item().unwrap();
        session.complete().unwrap();
        assert!(session.complete().is_err());
        assert!(session.add_item().is_err());
    }

    #[test]
    fn draft_inventory_is_deletable() {
        let mut session = CountSession::new();
        session.add_item().unwrap();
        assert!(session.delete().is_ok());
    }

    #[test]
    fn completion_blocks_deletion_and_preserves_the_record() {
        // A delete racing a completion must observe the final status: once
        // completed, the record (and its audit trail) survives the delete.
        let mut session = CountSession::new();
        session.add_item().unwrap();
        session.complete().unwrap();

        let (_, survived) = session.delete().unwrap_err();
        assert_eq!(survived.status, InventoryStatus::Completed);
        assert_eq!(survived.items, 1);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod properties {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// The correction movement always moves the expected stock to the
        /// counted stock, whatever the sign of the difference.
        #[test]
        fn correction_reconciles_any_count(
            expected in 0i32..100_000,
            actual in 0i32..100_000,
        ) {
            let diff = compute_difference(actual, expected);
            match correction_for_difference(diff) {
                None => prop_assert_eq!(actual, expected),
                Some((direction, quantity)) => {
                    prop_assert!(quantity > 0);
                    prop_assert_eq!(
                        stock_after_movement(expected, direction, quantity),
                        actual
                    );
                }
            }
        }

        /// Corrections over a whole inventory sum to the total difference.
        #[test]
        fn corrections_sum_to_total_difference(
            items in prop::collection::vec((0i32..10_000, 0i32..10_000), 0..50)
        ) {
            let total_difference: i64 = items
                .iter()
                .map(|(actual, expected)| compute_difference(*actual, *expected) as i64)
                .sum();

            let signed_corrections: i64 = items
                .iter()
                .filter_map(|(actual, expected)| {
                    correction_for_difference(compute_difference(*actual, *expected))
                })
                .map(|(direction, quantity)| match direction {
                    MovementDirection::Entry => quantity as i64,
                    MovementDirection::Exit => -(quantity as i64),
                })
                .sum();

            prop_assert_eq!(signed_corrections, total_difference);
        }

        /// Recomputing the difference after an actual-quantity update keeps
        /// the original expected snapshot fixed.
        #[test]
        fn recount_keeps_expected_snapshot(
            expected in 0i32..10_000,
            first_count in 0i32..10_000,
            second_count in 0i32..10_000,
        ) {
            let first_diff = compute_difference(first_count, expected);
            let second_diff = compute_difference(second_count, expected);
            prop_assert_eq!(first_diff - second_diff, first_count - second_count);
        }
    }
}

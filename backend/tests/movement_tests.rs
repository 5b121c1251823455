//! Stock movement engine tests
//!
//! Covers the movement vocabulary, stock arithmetic, exit sufficiency
//! and movement reversal rules.

use proptest::prelude::*;
use shared::{
    check_exit_sufficiency, stock_after_movement, stock_after_reversal, validate_movement,
    MovementCategory, MovementDirection,
};

// ============================================================================
// Vocabulary Tests
// ============================================================================

mod vocabulary {
    use super::*;

    #[test]
    fn direction_wire_values() {
        assert_eq!(MovementDirection::Entry.as_str(), "entree");
        assert_eq!(MovementDirection::Exit.as_str(), "sortie");
    }

    #[test]
    fn direction_round_trips_from_str() {
        assert_eq!(
            "entree".parse::<MovementDirection>().unwrap(),
            MovementDirection::Entry
        );
        assert_eq!(
            "sortie".parse::<MovementDirection>().unwrap(),
            MovementDirection::Exit
        );
        assert!("in".parse::<MovementDirection>().is_err());
    }

    #[test]
    fn entry_categories_are_achat_retour_correction() {
        let entries = MovementCategory::entry_categories();
        assert_eq!(entries.len(), 3);
        assert!(entries.contains(&MovementCategory::Achat));
        assert!(entries.contains(&MovementCategory::Retour));
        assert!(entries.contains(&MovementCategory::Correction));
    }

    #[test]
    fn exit_categories_are_vente_perte_casse_expiration() {
        let exits = MovementCategory::exit_categories();
        assert_eq!(exits.len(), 4);
        assert!(exits.contains(&MovementCategory::Vente));
        assert!(exits.contains(&MovementCategory::Perte));
        assert!(exits.contains(&MovementCategory::Casse));
        assert!(exits.contains(&MovementCategory::Expiration));
    }

    #[test]
    fn category_sets_are_disjoint() {
        for entry in MovementCategory::entry_categories() {
            assert!(!MovementCategory::exit_categories().contains(entry));
        }
    }

    #[test]
    fn inverse_direction_flips() {
        assert_eq!(MovementDirection::Entry.inverse(), MovementDirection::Exit);
        assert_eq!(MovementDirection::Exit.inverse(), MovementDirection::Entry);
    }
}

// ============================================================================
// Movement Validation Tests
// ============================================================================

mod validation {
    use super::*;

    #[test]
    fn accepts_entry_with_entry_category() {
        assert!(validate_movement(MovementDirection::Entry, MovementCategory::Achat, 10).is_ok());
        assert!(validate_movement(MovementDirection::Entry, MovementCategory::Retour, 1).is_ok());
        assert!(
            validate_movement(MovementDirection::Entry, MovementCategory::Correction, 5).is_ok()
        );
    }

    #[test]
    fn accepts_exit_with_exit_category() {
        assert!(validate_movement(MovementDirection::Exit, MovementCategory::Vente, 3).is_ok());
        assert!(validate_movement(MovementDirection::Exit, MovementCategory::Perte, 2).is_ok());
        assert!(validate_movement(MovementDirection::Exit, MovementCategory::Casse, 1).is_ok());
        assert!(
            validate_movement(MovementDirection::Exit, MovementCategory::Expiration, 4).is_ok()
        );
    }

    #[test]
    fn rejects_exit_category_on_entry() {
        assert!(validate_movement(MovementDirection::Entry, MovementCategory::Vente, 10).is_err());
        assert!(validate_movement(MovementDirection::Entry, MovementCategory::Perte, 10).is_err());
    }

    #[test]
    fn rejects_entry_category_on_exit() {
        assert!(validate_movement(MovementDirection::Exit, MovementCategory::Achat, 10).is_err());
        assert!(validate_movement(MovementDirection::Exit, MovementCategory::Retour, 10).is_err());
    }

    #[test]
    fn correction_cannot_be_created_as_an_exit() {
        // Correction exits only ever come from inventory completion.
        assert!(
            validate_movement(MovementDirection::Exit, MovementCategory::Correction, 1).is_err()
        );
    }

    #[test]
    fn rejects_non_positive_quantities() {
        assert!(validate_movement(MovementDirection::Entry, MovementCategory::Achat, 0).is_err());
        assert!(validate_movement(MovementDirection::Entry, MovementCategory::Achat, -5).is_err());
        assert!(validate_movement(MovementDirection::Exit, MovementCategory::Vente, 0).is_err());
    }
}

// ============================================================================
// Stock Arithmetic Tests
// ============================================================================

mod stock_arithmetic {
    use super::*;

    #[test]
    fn entry_increases_stock() {
        assert_eq!(stock_after_movement(10, MovementDirection::Entry, 5), 15);
        assert_eq!(stock_after_movement(0, MovementDirection::Entry, 7), 7);
    }

    #[test]
    fn exit_decreases_stock() {
        assert_eq!(stock_after_movement(10, MovementDirection::Exit, 4), 6);
        assert_eq!(stock_after_movement(5, MovementDirection::Exit, 5), 0);
    }

    #[test]
    fn exit_sufficiency_allows_exact_drain() {
        assert!(check_exit_sufficiency(5, 5).is_ok());
        assert!(check_exit_sufficiency(10, 3).is_ok());
    }

    #[test]
    fn exit_sufficiency_rejects_overdraw() {
        assert!(check_exit_sufficiency(5, 6).is_err());
        assert!(check_exit_sufficiency(0, 1).is_err());
    }

    #[test]
    fn replayed_ledger_reproduces_stock() {
        // Stock is the initial level plus signed movement quantities.
        let movements = [
            (MovementDirection::Entry, 20),
            (MovementDirection::Exit, 5),
            (MovementDirection::Entry, 3),
            (MovementDirection::Exit, 8),
        ];
        let mut stock = 0;
        for (direction, quantity) in movements {
            check_exit_sufficiency(
                if direction == MovementDirection::Exit {
                    stock
                } else {
                    i32::MAX
                },
                quantity,
            )
            .unwrap();
            stock = stock_after_movement(stock, direction, quantity);
        }
        assert_eq!(stock, 10);
    }
}

// ============================================================================
// Reversal Tests
// ============================================================================

mod reversal {
    use super::*;

    #[test]
    fn reversing_an_exit_restores_stock() {
        // Deleting a "sortie 4" puts the 4 units back.
        assert_eq!(
            stock_after_reversal(6, MovementDirection::Exit, 4).unwrap(),
            10
        );
    }

    #[test]
    fn reversing_an_entry_takes_stock_back() {
        assert_eq!(
            stock_after_reversal(15, MovementDirection::Entry, 5).unwrap(),
            10
        );
    }

    #[test]
    fn reversing_an_entry_fails_when_stock_was_consumed() {
        // Entry of 5 was recorded but only 3 remain: reversal would go to -2.
        assert!(stock_after_reversal(3, MovementDirection::Entry, 5).is_err());
    }

    #[test]
    fn reversing_an_exit_never_fails() {
        assert!(stock_after_reversal(0, MovementDirection::Exit, 100).is_ok());
    }
}

// ============================================================================
// Reversal Idempotence Tests
// ============================================================================

mod reversal_idempotence {
    use super::*;
    use std::collections::HashMap;

    /// Minimal ledger model: reversal must find and remove the movement in
    /// the same step that applies the inverse delta, so a repeated reversal
    /// of the same id fails instead of shifting stock again.
    struct Ledger {
        stock: i32,
        movements: HashMap<u32, (MovementDirection, i32)>,
    }

    impl Ledger {
        fn new(stock: i32) -> Self {
            Self {
                stock,
                movements: HashMap::new(),
            }
        }

        fn apply(&mut self, id: u32, direction: MovementDirection, quantity: i32) {
            if direction == MovementDirection::Exit {
                check_exit_sufficiency(self.stock, quantity).unwrap();
            }
            self.stock = stock_after_movement(self.stock, direction, quantity);
            self.movements.insert(id, (direction, quantity));
        }

        fn reverse(&mut self, id: u32) -> Result<(), &'static str> {
            let (direction, quantity) =
                self.movements.remove(&id).ok_or("movement not found")?;
            match stock_after_reversal(self.stock, direction, quantity) {
                Ok(new_stock) => {
                    self.stock = new_stock;
                    Ok(())
                }
                Err(e) => {
                    // Rolled back: the movement stays in the ledger.
                    self.movements.insert(id, (direction, quantity));
                    Err(e)
                }
            }
        }
    }

    #[test]
    fn second_reversal_of_same_movement_is_rejected() {
        let mut ledger = Ledger::new(10);
        ledger.apply(1, MovementDirection::Exit, 4);
        assert_eq!(ledger.stock, 6);

        assert!(ledger.reverse(1).is_ok());
        assert_eq!(ledger.stock, 10);

        // A duplicate reversal must not re-apply the inverse delta.
        assert!(ledger.reverse(1).is_err());
        assert_eq!(ledger.stock, 10);
    }

    #[test]
    fn failed_entry_reversal_leaves_ledger_and_stock_unchanged() {
        let mut ledger = Ledger::new(0);
        ledger.apply(1, MovementDirection::Entry, 5);
        ledger.apply(2, MovementDirection::Exit, 4);
        assert_eq!(ledger.stock, 1);

        // Taking back the entry would go negative; nothing may change.
        assert!(ledger.reverse(1).is_err());
        assert_eq!(ledger.stock, 1);
        assert!(ledger.reverse(1).is_err());
        assert_eq!(ledger.stock, 1);

        // The entry is still reversible once the exit is undone.
        assert!(ledger.reverse(2).is_ok());
        assert!(ledger.reverse(1).is_ok());
        assert_eq!(ledger.stock, 0);
    }

    #[test]
    fn replay_holds_across_interleaved_reversals() {
        let mut ledger = Ledger::new(20);
        ledger.apply(1, MovementDirection::Entry, 10);
        ledger.apply(2, MovementDirection::Exit, 5);
        ledger.reverse(2).unwrap();
        assert!(ledger.reverse(2).is_err());
        ledger.apply(3, MovementDirection::Exit, 8);

        // 20 + 10 - 8, the reversed exit contributes nothing.
        assert_eq!(ledger.stock, 22);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod properties {
    use super::*;

    fn direction_strategy() -> impl Strategy<Value = MovementDirection> {
        prop_oneof![
            Just(MovementDirection::Entry),
            Just(MovementDirection::Exit),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Applying a movement then reversing it restores the original stock.
        #[test]
        fn apply_then_reverse_is_identity(
            stock in 0i32..100_000,
            direction in direction_strategy(),
            quantity in 1i32..1_000,
        ) {
            // Only consider movements that would have been accepted.
            if direction == MovementDirection::Exit && stock < quantity {
                return Ok(());
            }
            let after = stock_after_movement(stock, direction, quantity);
            prop_assert!(after >= 0);
            let restored = stock_after_reversal(after, direction, quantity).unwrap();
            prop_assert_eq!(restored, stock);
        }

        /// An accepted exit never drives stock negative.
        #[test]
        fn accepted_exit_keeps_stock_non_negative(
            stock in 0i32..100_000,
            quantity in 1i32..100_000,
        ) {
            if check_exit_sufficiency(stock, quantity).is_ok() {
                prop_assert!(stock_after_movement(stock, MovementDirection::Exit, quantity) >= 0);
            }
        }

        /// Replaying any sequence of accepted movements keeps the ledger and
        /// the stock in agreement: stock equals the signed quantity sum.
        #[test]
        fn ledger_replay_matches_signed_sum(
            movements in prop::collection::vec((direction_strategy(), 1i32..500), 0..30)
        ) {
            let mut stock = 0i64;
            let mut accepted_sum = 0i64;
            for (direction, quantity) in movements {
                match direction {
                    MovementDirection::Entry => {
                        stock += quantity as i64;
                        accepted_sum += quantity as i64;
                    }
                    MovementDirection::Exit => {
                        // Insufficient exits are rejected and leave no trace.
                        if stock >= quantity as i64 {
                            stock -= quantity as i64;
                            accepted_sum -= quantity as i64;
                        }
                    }
                }
                prop_assert!(stock >= 0);
            }
            prop_assert_eq!(stock, accepted_sum);
        }

        /// validate_movement accepts a pair iff the category belongs to the
        /// direction's vocabulary and the quantity is positive.
        #[test]
        fn validation_matches_vocabulary(
            direction in direction_strategy(),
            category_idx in 0usize..7,
            quantity in -10i32..100,
        ) {
            let all = [
                MovementCategory::Achat,
                MovementCategory::Retour,
                MovementCategory::Correction,
                MovementCategory::Vente,
                MovementCategory::Perte,
                MovementCategory::Casse,
                MovementCategory::Expiration,
            ];
            let category = all[category_idx];
            let expected_ok = quantity > 0 && category.allowed_for(direction);
            prop_assert_eq!(
                validate_movement(direction, category, quantity).is_ok(),
                expected_ok
            );
        }
    }
}

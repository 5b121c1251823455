//! Authentication and role tests
//!
//! Covers the role vocabulary, the first-admin registration rule and the
//! input constraints enforced at registration.

use proptest::prelude::*;
use shared::Role;

// ============================================================================
// Role Vocabulary Tests
// ============================================================================

mod roles {
    use super::*;

    #[test]
    fn role_wire_values_round_trip() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(
            "gestionnaire".parse::<Role>().unwrap(),
            Role::Gestionnaire
        );
        assert_eq!("observateur".parse::<Role>().unwrap(), Role::Observateur);
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn default_role_is_gestionnaire() {
        assert_eq!(Role::default(), Role::Gestionnaire);
    }

    #[test]
    fn only_admin_is_admin() {
        assert!(Role::Admin.is_admin());
        assert!(!Role::Gestionnaire.is_admin());
        assert!(!Role::Observateur.is_admin());
    }
}

// ============================================================================
// First-Admin Rule Tests
// ============================================================================

mod first_admin {
    use super::*;

    /// Registration is open exactly while no admin account exists.
    fn registration_open(existing_roles: &[Role]) -> bool {
        !existing_roles.iter().any(|r| r.is_admin())
    }

    #[test]
    fn empty_system_accepts_registration() {
        assert!(registration_open(&[]));
    }

    #[test]
    fn existing_admin_closes_registration() {
        assert!(!registration_open(&[Role::Admin]));
        assert!(!registration_open(&[Role::Gestionnaire, Role::Admin]));
    }

    #[test]
    fn non_admin_accounts_do_not_close_registration() {
        // Managers and observers created by an admin who was later deleted
        // do not block bootstrapping a new admin.
        assert!(registration_open(&[
            Role::Gestionnaire,
            Role::Observateur
        ]));
    }

    proptest! {
        /// The gate depends only on the presence of an admin, not on how
        /// many other accounts exist.
        #[test]
        fn gate_tracks_admin_presence(
            roles in prop::collection::vec(
                prop_oneof![
                    Just(Role::Admin),
                    Just(Role::Gestionnaire),
                    Just(Role::Observateur),
                ],
                0..20
            )
        ) {
            let has_admin = roles.contains(&Role::Admin);
            prop_assert_eq!(registration_open(&roles), !has_admin);
        }
    }
}

// ============================================================================
// Registration Input Tests
// ============================================================================

mod registration_input {
    use super::*;

    proptest! {
        /// Passwords of six or more characters pass the length rule.
        #[test]
        fn password_length_rule(password in "[a-zA-Z0-9!@#$%]{0,20}") {
            let accepted = password.len() >= 6;
            prop_assert_eq!(password.chars().count() >= 6, accepted);
        }

        /// Generated emails always carry a local part and a domain.
        #[test]
        fn email_shape(email in "[a-z]{3,10}@[a-z]{3,8}\\.(com|org|fr)") {
            let (local, domain) = email.split_once('@').unwrap();
            prop_assert!(!local.is_empty());
            prop_assert!(domain.contains('.'));
        }
    }
}

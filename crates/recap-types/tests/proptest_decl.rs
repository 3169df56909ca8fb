//! Property-based tests for declaration handling.
//!
//! These verify that normalization and extent scanning handle arbitrary
//! declaration text safely and consistently; malformed input must degrade
//! to a default, never panic.

use proptest::prelude::*;

use recap_types::decl::{classify_declaration, normalize_declaration};
use recap_types::extent::length_annotation;
use recap_types::tables::OverrideTables;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// Normalization never panics on arbitrary input.
    #[test]
    fn normalize_never_panics(raw in ".{0,256}") {
        let _ = normalize_declaration(&raw);
    }

    /// Normalizing already-normalized text is a no-op.
    #[test]
    fn normalize_is_idempotent(raw in ".{0,256}") {
        let once = normalize_declaration(&raw);
        prop_assert_eq!(normalize_declaration(&once), once);
    }

    /// Normalized output never retains parenthesized-group content.
    #[test]
    fn normalize_drops_groups(
        head in "[A-Za-z ]{0,16}",
        body in "[A-Za-z ]{1,16}",
        tail in "[A-Za-z ]{0,16}",
    ) {
        let raw = format!("{head} ( {body} ) {tail}");
        let cleaned = normalize_declaration(&raw);
        prop_assert!(!cleaned.contains('('));
        prop_assert!(!cleaned.contains(')'));
    }

    /// Classification never panics and never invents indirection for
    /// star-free input.
    #[test]
    fn classify_never_panics(raw in "[A-Za-z_ ]{0,128}") {
        let tables = OverrideTables::dx12();
        let parsed = classify_declaration(&raw, &tables);
        if !raw.contains('*') {
            // Aliases may add at most one level.
            prop_assert!(parsed.pointer_depth <= 1);
        }
    }

    /// The extent scan never panics, whatever the parenthesis balance.
    #[test]
    fn length_annotation_never_panics(full in ".{0,256}", base in "[A-Za-z_]{0,24}") {
        let _ = length_annotation(&full, &base);
    }

    /// Declarations without an opening parenthesis never produce an extent.
    #[test]
    fn no_group_means_no_extent(full in "[^(]{0,128}") {
        prop_assert_eq!(length_annotation(&full, "BYTE"), None);
    }
}

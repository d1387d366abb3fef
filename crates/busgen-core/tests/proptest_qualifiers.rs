#![allow(non_snake_case)]

use busgen_core::{QualifierSet, qualifiers_match};
use proptest::prelude::*;

fn name_set() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-c]{1,2}", 0..4)
}

proptest! {
    #[test]
    fn qualifiers_match___is_symmetric(a in name_set(), b in name_set()) {
        let a = QualifierSet::from_names(a);
        let b = QualifierSet::from_names(b);

        prop_assert_eq!(
            qualifiers_match(Some(&a), Some(&b)),
            qualifiers_match(Some(&b), Some(&a))
        );
        prop_assert_eq!(qualifiers_match(Some(&a), None), qualifiers_match(None, Some(&a)));
    }

    #[test]
    fn qualifiers_match___ignores_insertion_order(names in name_set()) {
        let forward = QualifierSet::from_names(names.clone());
        let backward = QualifierSet::from_names(names.into_iter().rev());

        prop_assert!(qualifiers_match(Some(&forward), Some(&backward)));
    }

    #[test]
    fn qualifiers_match___absent_equals_only_empty(names in name_set()) {
        let set = QualifierSet::from_names(names);

        prop_assert_eq!(qualifiers_match(Some(&set), None), set.is_empty());
    }
}

#![allow(non_snake_case)]

use super::*;
use std::collections::HashSet;
use test_case::test_case;

// JavaType tests

#[test_case("java.lang.String", "java.lang.String")]
#[test_case("java.util.List<java.lang.String>", "java.util.List")]
#[test_case("java.util.Map<java.lang.String, java.util.List<java.lang.Long>>", "java.util.Map")]
#[test_case("java.util.List<java.lang.String>[]", "java.util.List[]")]
#[test_case("int", "int")]
fn JavaType___erasure___strips_generic_arguments(ty: &str, erased: &str) {
    assert_eq!(JavaType::new(ty).erasure(), erased);
}

#[test]
fn JavaType___element_name___strips_array_brackets() {
    assert_eq!(JavaType::new("java.lang.String[][]").element_name(), "java.lang.String");
}

#[test]
fn JavaType___is_primitive___recognizes_primitives_only() {
    assert!(JavaType::new("int").is_primitive());
    assert!(JavaType::new("boolean").is_primitive());
    assert!(!JavaType::new("java.lang.Integer").is_primitive());
    assert!(!JavaType::void().is_primitive());
    assert!(JavaType::void().is_void());
}

// QualifierSet tests

#[test]
fn QualifierSet___eq___ignores_insertion_order() {
    let a = QualifierSet::from_names(["p.Urgent", "p.Audited"]);
    let b = QualifierSet::from_names(["p.Audited", "p.Urgent"]);

    assert_eq!(a, b);
}

#[test]
fn QualifierSet___eq___ignores_member_values() {
    let mut a = QualifierSet::new();
    a.insert(Qualifier {
        name: "p.Named".into(),
        members: [("value".to_string(), "\"x\"".to_string())].into(),
    });
    let b = QualifierSet::from_names(["p.Named"]);

    assert_eq!(a, b);
}

#[test]
fn QualifierSet___hash___consistent_with_eq() {
    let mut set = HashSet::new();

    set.insert(QualifierSet::from_names(["a", "b"]));
    set.insert(QualifierSet::from_names(["b", "a"]));

    assert_eq!(set.len(), 1);
}

#[test]
fn QualifierSet___names___sorted() {
    let set = QualifierSet::from_names(["z", "a", "m"]);

    assert_eq!(set.names().collect::<Vec<_>>(), vec!["a", "m", "z"]);
}

// qualifiers_match tests

#[test]
fn qualifiers_match___empty_and_absent___match() {
    let empty = QualifierSet::new();

    assert!(qualifiers_match(Some(&empty), None));
    assert!(qualifiers_match(None, Some(&empty)));
    assert!(qualifiers_match(None, None));
}

#[test]
fn qualifiers_match___same_names___match() {
    let a = QualifierSet::from_names(["a"]);
    let b = QualifierSet::from_names(["a"]);

    assert!(qualifiers_match(Some(&a), Some(&b)));
}

#[test]
fn qualifiers_match___different_names___do_not_match() {
    let a = QualifierSet::from_names(["a"]);
    let b = QualifierSet::from_names(["b"]);

    assert!(!qualifiers_match(Some(&a), Some(&b)));
}

#[test]
fn qualifiers_match___non_empty_and_absent___do_not_match() {
    let a = QualifierSet::from_names(["a"]);

    assert!(!qualifiers_match(Some(&a), None));
    assert!(!qualifiers_match(None, Some(&a)));
}

#[test]
fn qualifiers_match___subset___does_not_match() {
    let a = QualifierSet::from_names(["a"]);
    let ab = QualifierSet::from_names(["a", "b"]);

    assert!(!qualifiers_match(Some(&a), Some(&ab)));
}

// MethodDescriptor tests

#[test]
fn MethodDescriptor___typed_endpoint___encodes_erased_parameter_types() {
    let method = MethodDescriptor {
        name: "bar".into(),
        return_type: JavaType::void(),
        annotations: vec![],
        parameters: vec![
            ParameterDescriptor {
                name: "a0".into(),
                ty: JavaType::new("java.lang.String"),
                annotations: vec![],
                qualifiers: QualifierSet::new(),
            },
            ParameterDescriptor {
                name: "a1".into(),
                ty: JavaType::new("java.util.List<java.lang.Long>"),
                annotations: vec![],
                qualifiers: QualifierSet::new(),
            },
        ],
    };

    assert_eq!(method.typed_endpoint(), "bar:java.lang.String:java.util.List:");
}

#[test]
fn MethodDescriptor___typed_endpoint___no_parameters() {
    let method = MethodDescriptor {
        name: "ping".into(),
        return_type: JavaType::void(),
        annotations: vec![],
        parameters: vec![],
    };

    assert_eq!(method.typed_endpoint(), "ping:");
}

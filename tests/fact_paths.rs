mod common;

use serde_json::{json, Value};
use smartfilter::{parse, FilterError, Predicate};

fn document(filter: &str) -> Value {
    match parse(filter, &common::fields()).expect("parse ok") {
        Predicate::Containment(containment) => {
            assert_eq!(containment.path, "ansible_facts__contains");
            containment.value
        }
        other => panic!("{filter:?} should compile to containment, got {other}"),
    }
}

#[test]
fn single_segment() {
    assert_eq!(document("ansible_facts__os_family=RedHat"), json!({"os_family": "RedHat"}));
}

#[test]
fn nested_object_with_trailing_array() {
    assert_eq!(document(r#"ansible_facts__a__b[]="x""#), json!({"a": {"b": ["x"]}}));
}

#[test]
fn array_in_the_middle_of_a_path() {
    assert_eq!(
        document(r#"ansible_facts__ansible_mounts[]__mount="/boot""#),
        json!({"ansible_mounts": [{"mount": "/boot"}]})
    );
}

#[test]
fn consecutive_arrays() {
    assert_eq!(document("ansible_facts__a[]__b[]=1"), json!({"a": [{"b": [1]}]}));
}

#[test]
fn leaf_values_are_coerced() {
    assert_eq!(document("ansible_facts__a=true"), json!({"a": true}));
    assert_eq!(document("ansible_facts__a=3"), json!({"a": 3}));
    assert_eq!(document("ansible_facts__a=7.5"), json!({"a": 7.5}));
    assert_eq!(document(r#"ansible_facts__a="7.4""#), json!({"a": 7.4}));
    assert_eq!(document(r#"ansible_facts__a="""#), json!({"a": ""}));
}

#[test]
fn oversized_decimals_stay_text() {
    let big = format!("{}.5", "9".repeat(400));
    assert_eq!(document(&format!("ansible_facts__a={big}")), json!({"a": big}));
}

#[test]
fn bare_null_is_the_plain_word() {
    assert_eq!(document("ansible_facts__a=null"), json!({"a": "null"}));
}

#[test]
fn quoted_null_keeps_its_quotes() {
    assert_eq!(document(r#"ansible_facts__a="null""#), json!({"a": "\"null\""}));
}

#[test]
fn only_the_exact_null_literal_keeps_quotes() {
    assert_eq!(document(r#"ansible_facts__a="nullable""#), json!({"a": "nullable"}));
    assert_eq!(document(r#"ansible_facts__a="NULL""#), json!({"a": "NULL"}));
}

#[test]
fn quoted_keys_reach_the_namespace() {
    assert_eq!(document(r#""ansible_facts__a b"=1"#), json!({"a b": 1}));
}

#[test]
fn unicode_fact_values() {
    assert_eq!(
        document("ansible_facts__ansible_distribution=レッドハット"),
        json!({"ansible_distribution": "レッドハット"})
    );
}

#[test]
fn exact_lookup_is_dropped() {
    assert_eq!(
        document(r#"ansible_facts__ansible_distribution__exact="CentOS""#),
        json!({"ansible_distribution": "CentOS"})
    );
}

#[test]
fn other_lookups_are_rejected() {
    for lookup in ["icontains", "has_keys", "gt", "in"] {
        let filter = format!("ansible_facts__ansible_distribution__{lookup}=cent");
        let err = parse(&filter, &common::fields()).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("ansible_facts does not support searching with __{lookup}")
        );
    }
}

#[test]
fn empty_segments_are_malformed() {
    for filter in [
        "ansible_facts=1",
        "ansible_facts__=1",
        "ansible_facts__a____b=1",
        "ansible_facts__a__=1",
        "ansible_facts__[]=1",
        "ansible_facts__a__[]=1",
    ] {
        let err = parse(filter, &common::fields()).unwrap_err();
        assert!(matches!(err, FilterError::MalformedPath { .. }), "{filter}: {err:?}");
    }
}

#[test]
fn namespace_search_is_a_path_not_a_search() {
    assert_eq!(document("ansible_facts__search=x"), json!({"search": "x"}));
}

#[test]
fn mixes_with_field_clauses() {
    let predicate = parse(
        r#"name=web01 and ansible_facts__os_family="Debian""#,
        &common::fields(),
    )
    .expect("parse ok");
    assert_eq!(
        predicate.to_string(),
        r#"(name="web01" AND ansible_facts__contains={"os_family":"Debian"})"#
    );
}

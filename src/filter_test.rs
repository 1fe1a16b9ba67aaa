use super::*;
use serde_json::json;

fn values(value: serde_json::Value) -> FieldValues {
    value.as_object().cloned().expect("object literal")
}

// =============================================================================
// FieldSet
// =============================================================================

#[test]
fn field_set_keeps_first_occurrence_order() {
    let set: FieldSet = ["b", "a", "b", "c", "a"].into_iter().collect();
    assert_eq!(set.as_slice(), &["b".to_owned(), "a".to_owned(), "c".to_owned()]);
    assert_eq!(set.len(), 3);
}

#[test]
fn field_set_insert_reports_novelty() {
    let mut set = FieldSet::new();
    assert!(set.is_empty());
    assert!(set.insert("a"));
    assert!(!set.insert("a".to_owned()));
    assert!(set.contains("a"));
    assert!(!set.contains("b"));
    assert_eq!(set.iter().collect::<Vec<_>>(), vec!["a"]);
}

// =============================================================================
// FieldFilter
// =============================================================================

#[test]
fn all_admits_everything_but_timestamp() {
    let filter = FieldFilter::All;
    assert!(filter.admits("anything"));
    assert!(!filter.admits(TIMESTAMP_FIELD));
    assert_eq!(filter.watch_names(), None);
}

#[test]
fn exclude_drops_named_fields() {
    let filter = FieldFilter::Exclude(["b"].into_iter().collect());
    let kept = filter.retain(values(json!({"a": 1, "b": 2, "c": 3})));
    assert_eq!(kept, values(json!({"a": 1, "c": 3})));
    assert_eq!(filter.watch_names(), None);
}

#[test]
fn include_keeps_only_named_fields() {
    let filter = FieldFilter::Include(["b"].into_iter().collect());
    let kept = filter.retain(values(json!({"a": 1, "b": 2, "c": 3})));
    assert_eq!(kept, values(json!({"b": 2})));
    assert_eq!(filter.watch_names(), Some(&["b".to_owned()][..]));
}

#[test]
fn empty_exclude_behaves_like_all() {
    let filter = FieldFilter::Exclude(FieldSet::new());
    let input = values(json!({"a": 1, "b": 2}));
    assert_eq!(filter.retain(input.clone()), FieldFilter::All.retain(input));
}

#[test]
fn empty_include_admits_nothing() {
    let filter = FieldFilter::Include(FieldSet::new());
    assert!(filter.retain(values(json!({"a": 1}))).is_empty());
}

#[test]
fn retain_strips_reserved_timestamp() {
    let kept = FieldFilter::All.retain(values(json!({"a": 1, "_timestamp": 7})));
    assert_eq!(kept, values(json!({"a": 1})));
}

use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| vars.get(key).cloned()
}

// =============================================================================
// defaults
// =============================================================================

#[test]
fn defaults_watch_everything_with_no_flags() {
    let options = PersistOptions::new();
    assert_eq!(options.field_filter(), &FieldFilter::All);
    assert_eq!(options.set_value_options(), SetValueOptions::default());
    assert_eq!(options.expiry(), None);
    assert!(options.on_data_restored.is_none());
    assert!(options.on_timeout.is_none());
}

#[test]
fn zero_timeout_disables_expiry() {
    let options = PersistOptions::new().timeout(Duration::ZERO);
    assert_eq!(options.expiry(), None);
}

// =============================================================================
// builder
// =============================================================================

#[test]
fn include_then_exclude_last_wins() {
    let options = PersistOptions::new().include(["a"]).exclude(["b"]);
    assert_eq!(options.field_filter(), &FieldFilter::Exclude(["b"].into_iter().collect()));

    let options = PersistOptions::new().exclude(["b"]).include(["a", "a"]);
    assert_eq!(options.field_filter(), &FieldFilter::Include(["a"].into_iter().collect()));
}

#[test]
fn flags_are_independent() {
    let options = PersistOptions::new().dirty(true);
    assert_eq!(options.set_value_options(), SetValueOptions { validate: false, dirty: true, touch: false });

    let options = PersistOptions::new().validate(true).touch(true);
    assert_eq!(options.set_value_options(), SetValueOptions { validate: true, dirty: false, touch: true });
}

#[test]
fn debug_hides_callbacks() {
    let options = PersistOptions::new().on_timeout(|| {});
    let rendered = format!("{options:?}");
    assert!(rendered.contains("on_timeout: true"));
    assert!(rendered.contains("on_data_restored: false"));
}

// =============================================================================
// from_lookup
// =============================================================================

#[test]
fn from_lookup_empty_matches_defaults() {
    let options = PersistOptions::from_lookup(|_| None);
    assert_eq!(options.expiry(), None);
    assert_eq!(options.set_value_options(), SetValueOptions::default());
}

#[test]
fn from_lookup_parses_values() {
    let options = PersistOptions::from_lookup(lookup_from(&[
        ("FORM_PERSIST_TIMEOUT_MS", "1500"),
        ("FORM_PERSIST_VALIDATE", "true"),
        ("FORM_PERSIST_DIRTY", " true "),
        ("FORM_PERSIST_TOUCH", "false"),
    ]));
    assert_eq!(options.expiry(), Some(Duration::from_millis(1500)));
    assert_eq!(options.set_value_options(), SetValueOptions { validate: true, dirty: true, touch: false });
}

#[test]
fn from_lookup_invalid_values_fall_back() {
    let options = PersistOptions::from_lookup(lookup_from(&[
        ("FORM_PERSIST_TIMEOUT_MS", "soon"),
        ("FORM_PERSIST_VALIDATE", "yes"),
    ]));
    assert_eq!(options.expiry(), None);
    assert!(!options.set_value_options().validate);
}

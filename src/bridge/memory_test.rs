use super::*;
use serde_json::json;

#[test]
fn with_fields_registers_empty_strings() {
    let form = MemoryForm::with_fields(["foo", "bar"]);
    assert_eq!(form.values(), json!({"foo": "", "bar": ""}).as_object().cloned().unwrap());
    let foo = form.field("foo").unwrap();
    assert!(!foo.dirty);
    assert!(!foo.touched);
}

#[test]
fn register_does_not_overwrite() {
    let form = MemoryForm::new();
    form.register("a", json!(1));
    form.register("a", json!(2));
    assert_eq!(form.value("a"), Some(json!(1)));
}

#[test]
fn input_reports_change_and_marks_dirty() {
    let form = MemoryForm::with_fields(["foo"]);
    assert!(form.input("foo", "f"));
    assert!(!form.input("foo", "f"));
    let foo = form.field("foo").unwrap();
    assert_eq!(foo.value, json!("f"));
    assert!(foo.dirty);
}

#[test]
fn watch_scoped_to_known_names() {
    let form = MemoryForm::with_fields(["a", "b", "c"]);
    form.input("b", "bee");
    let names = vec!["b".to_owned(), "missing".to_owned()];
    assert_eq!(form.watch(Some(&names)), json!({"b": "bee"}).as_object().cloned().unwrap());
}

#[test]
fn set_value_applies_only_requested_flags() {
    let form = MemoryForm::with_fields(["a"]);
    form.set_value("a", json!("x"), SetValueOptions::default());
    let a = form.field("a").unwrap();
    assert_eq!(a.value, json!("x"));
    assert!(!a.dirty && !a.touched);
    assert_eq!(a.validations, 0);

    form.set_value("a", json!("y"), SetValueOptions { validate: true, dirty: false, touch: true });
    let a = form.field("a").unwrap();
    assert!(!a.dirty);
    assert!(a.touched);
    assert_eq!(a.validations, 1);
}

#[test]
fn set_value_on_unknown_field_registers_it() {
    let form = MemoryForm::new();
    form.set_value("late", json!(3), SetValueOptions { validate: false, dirty: true, touch: false });
    assert_eq!(form.value("late"), Some(json!(3)));
    assert!(form.field("late").unwrap().dirty);
}

#[test]
fn clones_share_state() {
    let form = MemoryForm::with_fields(["a"]);
    let other = form.clone();
    other.input("a", "typed");
    assert_eq!(form.value("a"), Some(json!("typed")));
}

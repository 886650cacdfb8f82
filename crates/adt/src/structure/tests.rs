use super::*;
use crate::errors::AdtErrorKind;
use crate::Kind;
use pretty_assertions::assert_eq;

fn person(freeze: bool) -> StructClass {
    StructClass::new(
        Name::intern("Person"),
        Schema::new().attr("id", Kind::Int).attr("name", Kind::Str),
        freeze,
        None,
    )
}

#[test]
fn test_bind_positional_in_schema_order() {
    let class = person(true);
    let values = class
        .bind(Args::positional([Value::int(1), Value::string("Jo")]), "Person")
        .unwrap();
    assert_eq!(values, vec![Value::int(1), Value::string("Jo")]);
}

#[test]
fn test_bind_fills_missing_with_nil() {
    let class = person(true);
    let values = class.bind(Args::named([("name", "Jo")]), "Person").unwrap();
    assert_eq!(values, vec![Value::Nil, Value::string("Jo")]);

    let values = class.bind(Args::positional([1i64]), "Person").unwrap();
    assert_eq!(values, vec![Value::int(1), Value::Nil]);
}

#[test]
fn test_bind_ignores_unknown_names() {
    let class = person(true);
    let values = class
        .bind(Args::new().set("id", 3i64).set("nickname", "J"), "Person")
        .unwrap();
    assert_eq!(values, vec![Value::int(3), Value::Nil]);
}

#[test]
fn test_bind_rejects_mixed_arguments() {
    let class = person(true);
    let err = class
        .bind(Args::positional([1i64]).set("name", "Jo"), "Person")
        .unwrap_err();
    assert!(matches!(
        err.kind,
        AdtErrorKind::InvalidArgumentCombination { .. }
    ));
    assert_eq!(
        err.to_string(),
        "must construct ADT values with EITHER positional or named arguments, not both"
    );
}

#[test]
fn test_bind_rejects_extra_positionals() {
    let class = person(true);
    let err = class
        .bind(Args::positional([1i64, 2, 3]), "Person")
        .unwrap_err();
    assert_eq!(err.to_string(), "Person takes 2 positional arguments, got 3");
}

#[test]
fn test_validate_reports_first_mismatch() {
    let class = person(true);
    let err = class
        .validate(vec![Value::string("1"), Value::int(2)], &Kind::Nil)
        .unwrap_err();
    assert_eq!(
        err.kind,
        AdtErrorKind::AttributeTypeMismatch {
            attribute: Name::intern("id"),
            expected: "int".to_string(),
            actual: "str".to_string(),
        }
    );
    assert_eq!(
        err.to_string(),
        "id should have type `int`, but it has type `str`"
    );
}

#[test]
fn test_validate_failure_freezes_nothing() {
    let class = person(true);
    let name = Value::string("Jo");
    assert!(class
        .validate(vec![Value::Nil, name.clone()], &Kind::Nil)
        .is_err());
    assert!(!name.is_frozen());
}

#[test]
fn test_validate_freeze_policy() {
    let name = Value::string("Jo");
    person(true)
        .validate(vec![Value::int(1), name.clone()], &Kind::Nil)
        .unwrap();
    assert!(name.is_frozen());

    let name = Value::string("Jo");
    person(false)
        .validate(vec![Value::int(1), name.clone()], &Kind::Nil)
        .unwrap();
    assert!(!name.is_frozen());
}

#[test]
fn test_access_and_map_dump() {
    let class = person(true);
    let fields = class
        .validate(vec![Value::int(1), Value::string("Jo")], &Kind::Nil)
        .unwrap();

    assert_eq!(class.get(&fields, "name"), Some(&Value::string("Jo")));
    assert_eq!(class.get(&fields, "missing_attribute"), None);
    assert_eq!(class.to_map(&fields).to_string(), "{:id => 1, :name => \"Jo\"}");
}

#[test]
fn test_merge_applies_known_updates() {
    let class = person(true);
    let fields = class
        .validate(vec![Value::int(1), Value::string("Jo")], &Kind::Nil)
        .unwrap();
    let args = class.merge(
        &fields,
        vec![
            ("id", Value::int(2)),
            ("never_declared_update", Value::Nil),
        ],
    );
    assert_eq!(
        class.bind(args, "Person").unwrap(),
        vec![Value::int(2), Value::string("Jo")]
    );
}

#[test]
fn test_require_unknown_attribute() {
    let err = person(true).require("age").unwrap_err();
    assert_eq!(err.to_string(), "no attribute age");
    assert_eq!(Name::lookup("never_declared_attribute"), None);
    assert!(person(true).require("never_declared_attribute").is_err());
    assert_eq!(Name::lookup("never_declared_attribute"), None);
}

#[test]
fn test_methods_without_bundle() {
    let class = person(true);
    assert!(!class.responds_to("greet"));
    let err = class
        .call(&Value::Nil, "greet", &[], "Person")
        .unwrap_err();
    assert_eq!(err.to_string(), "no method 'greet' on Person");
}

#[test]
fn test_methods_with_bundle() {
    let functions = Functions::new().define("echo", |receiver, _| Ok(receiver.clone()));
    let class = StructClass::new(
        Name::intern("Echo"),
        Schema::new(),
        true,
        Some(Arc::new(functions)),
    );
    assert!(class.responds_to("echo"));
    assert_eq!(
        class.call(&Value::int(5), "echo", &[], "Echo").unwrap(),
        Value::int(5)
    );
}

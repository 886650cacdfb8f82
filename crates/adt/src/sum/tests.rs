use super::*;
use crate::errors::AdtErrorKind;
use crate::{Functions, Kind};
use pretty_assertions::assert_eq;
use std::collections::hash_map::DefaultHasher;

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn foo_bar() -> SumType {
    crate::sum("FooBar", |b| {
        b.data(
            "MyStruct",
            Schema::new().attr("id", Kind::Int).attr("name", Kind::Str),
        )?;
        b.data("Empty", Schema::new())?;
        Ok(())
    })
    .unwrap()
}

#[test]
fn test_constructor_table_in_declaration_order() {
    let ty = foo_bar();
    let tags: Vec<_> = ty.constructors().map(Name::as_str).collect();
    assert_eq!(tags, vec!["MyStruct", "Empty"]);
    let table: Vec<_> = ty.constructor_table().iter().map(Constructor::tag).collect();
    assert_eq!(table, ty.constructors().collect::<Vec<_>>());
    assert_eq!(ty.len(), 2);
    assert!(ty.has_constructor("Empty"));
    assert!(!ty.has_constructor("Full"));
    assert_eq!(ty.schema("MyStruct").map(Schema::len), Some(2));
}

#[test]
fn test_unknown_constructor_reference() {
    let err = foo_bar().constructor("Full").unwrap_err();
    assert_eq!(
        err.kind,
        AdtErrorKind::InvalidConstructorReference {
            constructor: "Full".to_string()
        }
    );
}

#[test]
fn test_display() {
    let ty = foo_bar();
    let value = ty
        .construct("MyStruct", Args::named([("id", Value::int(1)), ("name", Value::string("Jo"))]))
        .unwrap();
    assert_eq!(value.to_string(), "FooBar.MyStruct(id: 1, name: \"Jo\")");
    assert_eq!(ty.construct("Empty", Args::new()).unwrap().to_string(), "FooBar.Empty");
    assert_eq!(ty.constructor("Empty").unwrap().to_string(), "FooBar.Empty");
}

#[test]
fn test_anonymous_display_and_predicate_name() {
    let ty = crate::sum_with(None, SumOptions::default(), |b| {
        b.data("Leaf", Schema::new().attr("n", Kind::Int))?;
        Ok(())
    })
    .unwrap();
    let leaf = ty.constructor("Leaf").unwrap().positional([1i64]).unwrap();
    assert_eq!(leaf.to_string(), "Leaf(n: 1)");
    assert_eq!(ty.name(), None);
    assert_eq!(TypePredicate::name(&ty), "ADT::Type");
}

#[test]
fn test_to_map_appends_constructor_last() {
    let value = foo_bar()
        .construct("MyStruct", Args::positional([Value::int(1), Value::string("Jo")]))
        .unwrap();
    let keys: Vec<_> = value.to_map().keys().map(ToString::to_string).collect();
    assert_eq!(keys, vec![":id", ":name", ":__constructor__"]);
    assert_eq!(
        value.to_map().get_name(Name::intern(CONSTRUCTOR_KEY)),
        Some(&Value::symbol("MyStruct"))
    );
}

#[test]
fn test_from_map_round_trip() {
    let ty = foo_bar();
    let value = ty
        .construct("MyStruct", Args::positional([Value::int(1), Value::string("Jo")]))
        .unwrap();
    assert_eq!(ty.from_map(&value.to_map()).unwrap(), value);
}

#[test]
fn test_from_map_accepts_string_keys_and_tag() {
    let ty = foo_bar();
    let map: MapValue = [
        (Value::string("id"), Value::int(4)),
        (Value::string("name"), Value::string("Al")),
        (Value::string(CONSTRUCTOR_KEY), Value::string("MyStruct")),
    ]
    .into_iter()
    .collect();
    let value = ty.from_map(&map).unwrap();
    assert_eq!(value.get("id"), Some(&Value::int(4)));
    assert_eq!(value.tag(), "MyStruct");
}

#[test]
fn test_from_map_missing_or_unknown_tag() {
    let ty = foo_bar();
    let err = ty.from_map(&MapValue::new()).unwrap_err();
    assert_eq!(err.kind, AdtErrorKind::UnknownConstructor { constructor: None });
    assert_eq!(err.to_string(), "missing `__constructor__` key");

    let map: MapValue = [(Value::symbol(CONSTRUCTOR_KEY), Value::symbol("Nope"))]
        .into_iter()
        .collect();
    let err = ty.from_map(&map).unwrap_err();
    assert_eq!(err.to_string(), "unknown constructor `:Nope`");
}

#[test]
fn test_unknown_names_are_not_interned() {
    let ty = foo_bar();
    let tags: Vec<String> = (0..64).map(|i| format!("never_declared_tag_{i}")).collect();
    for tag in &tags {
        let map: MapValue = [(Value::symbol(CONSTRUCTOR_KEY), Value::string(tag.as_str()))]
            .into_iter()
            .collect();
        let err = ty.from_map(&map).unwrap_err();
        assert_eq!(
            err.kind,
            AdtErrorKind::UnknownConstructor {
                constructor: Some(tag.clone())
            }
        );
    }
    assert!(tags.iter().all(|tag| Name::lookup(tag).is_none()));

    assert!(ty.constructor("never_declared_constructor").is_err());
    assert_eq!(Name::lookup("never_declared_constructor"), None);

    let value = ty
        .construct("MyStruct", Args::positional([Value::int(1), Value::string("Jo")]))
        .unwrap();
    let updated = value.with([("never_declared_attr", Value::int(2))]).unwrap();
    assert_eq!(updated, value);
    assert!(value.over("never_declared_over", |v| v.clone()).is_err());
    assert!(value.call("never_declared_method", &[]).is_err());
    for name in ["never_declared_attr", "never_declared_over", "never_declared_method"] {
        assert_eq!(Name::lookup(name), None, "{name} was interned");
    }
}

#[test]
fn test_type_mismatch_carries_context_note() {
    let err = foo_bar()
        .construct("MyStruct", Args::positional([Value::string("1")]))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "id should have type `int`, but it has type `str`"
    );
    assert_eq!(err.notes, vec!["while constructing FooBar.MyStruct".to_string()]);
}

#[test]
fn test_equality_and_hash() {
    let ty = foo_bar();
    let make = |id: i64| {
        ty.construct("MyStruct", Args::positional([Value::int(id), Value::string("Jo")]))
            .unwrap()
    };
    assert_eq!(make(1), make(1));
    assert_eq!(hash_of(&make(1)), hash_of(&make(1)));
    assert_ne!(make(1), make(2));
    assert_ne!(make(1), ty.construct("Empty", Args::new()).unwrap());
}

#[test]
fn test_same_shape_in_different_types_is_not_equal() {
    let a = foo_bar().construct("Empty", Args::new()).unwrap();
    let b = foo_bar().construct("Empty", Args::new()).unwrap();
    assert_ne!(a, b);
    assert!(!a.sum_type().is_member(&Value::Variant(b)));
}

#[test]
fn test_membership() {
    let ty = foo_bar();
    let empty = ty.construct("Empty", Args::new()).unwrap();
    assert!(ty.is_member(&Value::Variant(empty)));
    assert!(!ty.is_member(&Value::Nil));
    assert!(Kind::Variant.is_member(&ty.construct("Empty", Args::new()).unwrap().into()));
}

#[test]
fn test_with_revalidates_and_leaves_receiver() {
    let ty = foo_bar();
    let original = ty
        .construct("MyStruct", Args::positional([Value::int(1), Value::string("Jo")]))
        .unwrap();
    let updated = original.with([("name", "Al")]).unwrap();
    assert_eq!(updated.get("name"), Some(&Value::string("Al")));
    assert_eq!(original.get("name"), Some(&Value::string("Jo")));

    let err = original.with([("id", "one")]).unwrap_err();
    assert!(matches!(err.kind, AdtErrorKind::AttributeTypeMismatch { .. }));
}

#[test]
fn test_over() {
    let value = foo_bar()
        .construct("MyStruct", Args::positional([Value::int(1), Value::string("Jo")]))
        .unwrap();
    let bumped = value
        .over("id", |id| Value::int(id.as_int().unwrap_or(0) + 1))
        .unwrap();
    assert_eq!(bumped.get("id"), Some(&Value::int(2)));

    let err = value.over("age", Clone::clone).unwrap_err();
    assert_eq!(
        err.kind,
        AdtErrorKind::UnknownAttribute {
            attribute: "age".to_string()
        }
    );
}

#[test]
fn test_attribute_named_constructor_does_not_shadow_tag() {
    let ty = crate::sum("Shadow", |b| {
        b.data("Tagged", Schema::new().attr("constructor", Kind::Str))?;
        Ok(())
    })
    .unwrap();
    let value = ty
        .constructor("Tagged")
        .unwrap()
        .named([("constructor", "mine")])
        .unwrap();
    assert_eq!(value.constructor(), "Tagged");
    assert_eq!(value.get("constructor"), Some(&Value::string("mine")));
}

#[test]
fn test_self_referencing_schema() {
    let list = crate::sum("IntList", |b| {
        b.data("Nil", Schema::new())?;
        b.data(
            "Cons",
            Schema::new().attr("head", Kind::Int).attr_self("tail"),
        )?;
        Ok(())
    })
    .unwrap();
    let nil = list.construct("Nil", Args::new()).unwrap();
    let one = list
        .construct("Cons", Args::positional([Value::int(1), nil.into()]))
        .unwrap();
    assert_eq!(one.to_string(), "IntList.Cons(head: 1, tail: IntList.Nil)");

    let err = list
        .construct("Cons", Args::positional([Value::int(1), Value::int(2)]))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "tail should have type `IntList`, but it has type `int`"
    );
}

#[test]
fn test_shared_functions() {
    let shape = crate::sum("Shape", |b| {
        b.data("Square", Schema::new().attr("side", Kind::Int))?;
        b.data("Rect", Schema::new().attr("w", Kind::Int).attr("h", Kind::Int))?;
        b.functions(Functions::new().define("area", |receiver, _| {
            let get = |name| receiver.attr(name).and_then(Value::as_int);
            let area = match (get("side"), get("w"), get("h")) {
                (Some(side), _, _) => side * side,
                (None, Some(w), Some(h)) => w * h,
                _ => 0,
            };
            Ok(Value::int(area))
        }));
        Ok(())
    })
    .unwrap();

    let square = shape.construct("Square", Args::positional([3i64])).unwrap();
    let rect = shape.construct("Rect", Args::positional([2i64, 5])).unwrap();
    assert!(square.responds_to("area"));
    assert_eq!(square.call("area", &[]).unwrap(), Value::int(9));
    assert_eq!(rect.call("area", &[]).unwrap(), Value::int(10));

    let err = square.call("perimeter", &[]).unwrap_err();
    assert_eq!(err.to_string(), "no method 'perimeter' on Shape.Square");
}

#[test]
fn test_freeze_policy_applies_to_all_variants() {
    let frozen = foo_bar();
    assert!(frozen.freeze_policy());

    let thawed = crate::sum_with(Some("Loose"), SumOptions { freeze: false }, |b| {
        b.data("Named", Schema::new().attr("name", Kind::Str))?;
        Ok(())
    })
    .unwrap();
    let name = Value::string("Jo");
    let value = thawed
        .construct("Named", Args::positional([name.clone()]))
        .unwrap();
    assert!(!name.is_frozen());
    value.get("name").unwrap().push_str("e").unwrap();
    assert_eq!(value.get("name"), Some(&Value::string("Joe")));
}

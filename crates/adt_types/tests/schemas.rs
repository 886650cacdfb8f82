//! Combinators used inside sum type and record schemas.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::sync::{Arc, OnceLock};

use adt::{AdtErrorKind, Args, Kind, MapValue, Name, Schema, SumType, Value};
use adt_types::{shared, Any, Lazy, ListOf, MapOf, Nilable};
use pretty_assertions::assert_eq;

fn scores() -> SumType {
    adt::sum("Scores", |b| {
        b.data(
            "Table",
            Schema::new().attr("by_name", MapOf::new(Kind::Symbol, Kind::Int)),
        )?;
        Ok(())
    })
    .unwrap()
}

#[test]
fn test_hash_attribute_accepts_matching_map() {
    let map: MapValue = [(Value::symbol("foo"), Value::int(123))].into_iter().collect();
    let table = scores()
        .construct("Table", Args::positional([Value::map(map)]))
        .unwrap();
    assert_eq!(table.to_string(), "Scores.Table(by_name: {:foo => 123})");
}

#[test]
fn test_hash_attribute_rejects_string_keys() {
    let map: MapValue = [(Value::string("foo"), Value::int(123))].into_iter().collect();
    let err = scores()
        .construct("Table", Args::positional([Value::map(map)]))
        .unwrap_err();
    assert_eq!(
        err.kind,
        AdtErrorKind::AttributeTypeMismatch {
            attribute: Name::intern("by_name"),
            expected: "Hash[symbol => int]".to_string(),
            actual: "map".to_string(),
        }
    );
}

#[test]
fn test_hash_attribute_rejects_string_values() {
    let map: MapValue = [(Value::symbol("foo"), Value::string("123"))]
        .into_iter()
        .collect();
    assert!(scores()
        .construct("Table", Args::positional([Value::map(map)]))
        .is_err());
}

#[test]
fn test_optional_attribute_reads_back_absent() {
    let contact = adt::sum("Contact", |b| {
        b.data("Email", Schema::new().attr("email", Kind::Str))?;
        b.data("Named", Schema::new().attr("name", Nilable::new(Kind::Str)))?;
        Ok(())
    })
    .unwrap();

    let err = contact.construct("Email", Args::new()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "email should have type `str`, but it has type `nil`"
    );

    let named = contact.construct("Named", Args::new()).unwrap();
    assert_eq!(named.get("name"), Some(&Value::Nil));

    let err = contact
        .construct("Named", Args::positional([1i64]))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "name should have type `ADT::Nilable[str]`, but it has type `int`"
    );
}

#[test]
fn test_mutually_recursive_types_through_lazy() {
    // Forest = Forest(trees: [Tree]); Tree = Tree(label: str, children: Forest)
    let forest_slot: Arc<OnceLock<SumType>> = Arc::new(OnceLock::new());
    let slot = Arc::clone(&forest_slot);
    let lazy_forest = Lazy::new(move || match slot.get() {
        Some(forest) => shared(forest.clone()),
        None => shared(Kind::Nil),
    });

    let tree = adt::sum("Tree", |b| {
        b.data(
            "Tree",
            Schema::new()
                .attr("label", Kind::Str)
                .attr("children", lazy_forest),
        )?;
        Ok(())
    })
    .unwrap();
    let forest = adt::sum("Forest", |b| {
        b.data("Forest", Schema::new().attr("trees", ListOf::new(tree.clone())))?;
        Ok(())
    })
    .unwrap();
    forest_slot.set(forest.clone()).unwrap();

    let empty = forest
        .construct("Forest", Args::positional([Value::list(vec![])]))
        .unwrap();
    let leaf = tree
        .construct("Tree", Args::positional([Value::string("leaf"), empty.into()]))
        .unwrap();
    let wood = forest
        .construct("Forest", Args::positional([Value::list(vec![leaf.into()])]))
        .unwrap();
    assert_eq!(
        wood.to_string(),
        "Forest.Forest(trees: [Tree.Tree(label: \"leaf\", children: Forest.Forest(trees: []))])"
    );

    let err = tree
        .construct("Tree", Args::positional([Value::string("x"), Value::int(1)]))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "children should have type `Forest`, but it has type `int`"
    );
}

#[test]
fn test_variant_holding_a_self_containing_list() {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let crate_ty = adt::sum("Crate", |b| {
        b.data("Box", Schema::new().attr("items", ListOf::new(Any)))?;
        Ok(())
    })
    .unwrap();
    let boxed = |first: i64| {
        let items = Value::list(vec![Value::int(first)]);
        items.push(items.clone()).unwrap();
        crate_ty
            .construct("Box", Args::positional([items]))
            .unwrap()
    };

    let value = boxed(1);
    assert_eq!(value.to_string(), "Crate.Box(items: [1, [...]])");

    let hash = |v: &adt::VariantValue| {
        let mut hasher = DefaultHasher::new();
        v.hash(&mut hasher);
        hasher.finish()
    };
    let twin = boxed(1);
    assert_eq!(value, twin);
    assert_eq!(hash(&value), hash(&twin));
    assert_ne!(value, boxed(2));
}

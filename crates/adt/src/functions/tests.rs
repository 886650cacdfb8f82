use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_define_and_lookup() {
    let functions = Functions::new()
        .define("double", |_, args| {
            let n = args.first().and_then(Value::as_int).unwrap_or(0);
            Ok(Value::int(n * 2))
        })
        .define("describe", |receiver, _| Ok(Value::string(receiver.to_string())));

    assert_eq!(functions.len(), 2);
    assert!(functions.contains(Name::intern("double")));
    assert!(!functions.contains(Name::intern("triple")));

    let double = functions.get(Name::intern("double")).unwrap();
    assert_eq!(double(&Value::Nil, &[Value::int(21)]).unwrap(), Value::int(42));

    let describe = functions.get(Name::intern("describe")).unwrap();
    assert_eq!(describe(&Value::int(7), &[]).unwrap(), Value::string("7"));
}

#[test]
fn test_redefine_replaces() {
    let functions = Functions::new()
        .define("f", |_, _| Ok(Value::int(1)))
        .define("f", |_, _| Ok(Value::int(2)));
    assert_eq!(functions.len(), 1);
    let f = functions.get(Name::intern("f")).unwrap();
    assert_eq!(f(&Value::Nil, &[]).unwrap(), Value::int(2));
}

#[test]
fn test_debug_lists_sorted_names() {
    let functions = Functions::new()
        .define("zeta", |_, _| Ok(Value::Nil))
        .define("alpha", |_, _| Ok(Value::Nil));
    assert_eq!(format!("{functions:?}"), "{\"alpha\", \"zeta\"}");
    assert!(Functions::new().is_empty());
}

use super::*;
use serde_json::json;

#[test]
fn fallbacks_follow_the_kind_table() {
    assert_eq!(PropertyDescriptor::numeric("n", 3, 9).default_value(), json!(3));
    assert_eq!(PropertyDescriptor::real("r", -1.5, 2.0).default_value(), json!(-1.5));
    assert_eq!(PropertyDescriptor::boolean("b").default_value(), json!(false));
    assert_eq!(
        PropertyDescriptor::enumeration("e", ["first", "second"]).default_value(),
        json!("first")
    );
    assert_eq!(PropertyDescriptor::file("f").default_value(), json!(FALLBACK_FILE));
    assert_eq!(
        PropertyDescriptor::directory("d").default_value(),
        json!(FALLBACK_DIRECTORY)
    );
    assert_eq!(PropertyDescriptor::device("v").default_value(), json!(FALLBACK_DEVICE));
    assert_eq!(
        PropertyDescriptor::constant("c", "fixed").default_value(),
        json!("fixed")
    );
}

#[test]
fn numeric_fallback_is_lower_bound_not_midpoint() {
    let prop = PropertyDescriptor::numeric("speed", -200, 200);
    assert_eq!(prop.default_value(), json!(-200));
}

#[test]
fn declared_default_wins_over_fallback() {
    let prop = PropertyDescriptor::numeric("n", 0, 100).with_default(42);
    assert_eq!(prop.default_value(), json!(42));
}

#[test]
fn resolve_fills_missing_and_null_positions() {
    let schema = FilterSchema::new(vec![
        PropertyDescriptor::numeric("a", 1, 5),
        PropertyDescriptor::numeric("b", 0, 5).with_default(4),
        PropertyDescriptor::boolean("c"),
    ]);
    assert_eq!(schema.resolve(&[]), vec![json!(1), json!(4), json!(false)]);
    assert_eq!(
        schema.resolve(&[json!(3), Value::Null]),
        vec![json!(3), json!(4), json!(false)]
    );
    assert_eq!(
        schema.resolve(&[json!(2), json!(2), json!(true), json!("extra")]),
        vec![json!(2), json!(2), json!(true)]
    );
}

#[test]
fn resolve_clamps_numbers_into_declared_range() {
    let schema = FilterSchema::new(vec![
        PropertyDescriptor::numeric("radius", 0, 100),
        PropertyDescriptor::numeric("speed", -200, 200),
        PropertyDescriptor::real("gain", -1.5, 2.0),
        PropertyDescriptor::numeric("width", 1, 1024),
        PropertyDescriptor::numeric("level", 0, 10),
    ]);
    let resolved = schema.resolve(&[
        json!(50_000_000),
        json!(-7),
        json!(9.75),
        json!(u64::MAX),
        json!(12.0),
    ]);
    assert_eq!(
        resolved,
        vec![json!(100), json!(-7), json!(2.0), json!(1024), json!(10)]
    );
}

#[test]
fn clamping_passes_non_numbers_through() {
    let schema = FilterSchema::new(vec![
        PropertyDescriptor::numeric("n", 0, 10),
        PropertyDescriptor::enumeration("mode", ["a", "b"]),
    ]);
    let resolved = schema.resolve(&[json!("ten"), json!("zzz")]);
    assert_eq!(resolved, vec![json!("ten"), json!("zzz")]);
    let params = FilterParams::new("demo", &schema, &resolved);
    assert!(matches!(
        params.int(0).unwrap_err(),
        LayercamError::InvalidParameter(_)
    ));
}

#[test]
fn typed_params_reject_wrong_json_types() {
    let schema = FilterSchema::new(vec![
        PropertyDescriptor::numeric("n", 0, 10),
        PropertyDescriptor::boolean("b"),
    ]);
    let values = vec![json!("ten"), json!(1)];
    let params = FilterParams::new("demo", &schema, &values);
    let err = params.int(0).unwrap_err();
    assert!(matches!(err, LayercamError::InvalidParameter(_)));
    assert!(err.to_string().contains("demo.n"));
    assert!(params.boolean(1).unwrap());
    assert!(params.int(5).is_err());
}

#[test]
fn integral_floats_are_accepted_as_integers() {
    let schema = FilterSchema::new(vec![PropertyDescriptor::numeric("n", 0, 10)]);
    let ok = vec![json!(4.0)];
    assert_eq!(FilterParams::new("x", &schema, &ok).int(0).unwrap(), 4);
    let bad = vec![json!(4.5)];
    assert!(FilterParams::new("x", &schema, &bad).int(0).is_err());
}

#[test]
fn schema_serializes_with_kind_tags() {
    let schema = FilterSchema::new(vec![
        PropertyDescriptor::numeric("n", 0, 10).with_default(5),
        PropertyDescriptor::enumeration("mode", ["a"]),
    ]);
    let v = serde_json::to_value(&schema).unwrap();
    assert_eq!(
        v,
        json!([
            { "name": "n", "type": "numeric", "min": 0, "max": 10, "default": 5 },
            { "name": "mode", "type": "enum", "options": ["a"] }
        ])
    );
}

use super::*;
use serde_json::json;

const DOC: &str = r#"{
    "width": 8,
    "height": 4,
    "layers": [
        { "input": [["blur", 5, 5], ["roll", 2]] },
        { "foreground": [] },
        { "previous": [["stripes", 2, 10, 1]] }
    ]
}"#;

fn registry() -> FilterRegistry {
    FilterRegistry::with_builtin_filters().unwrap()
}

#[test]
fn parses_layers_in_order() {
    let cfg = Configuration::from_json_str(DOC).unwrap();
    assert_eq!(cfg.canvas().unwrap(), Some(Canvas::new(8, 4).unwrap()));
    let kinds: Vec<LayerKind> = cfg.layers.iter().map(|l| l.kind).collect();
    assert_eq!(
        kinds,
        vec![LayerKind::Input, LayerKind::Foreground, LayerKind::Previous]
    );
    assert_eq!(
        cfg.layers[0].filters[1],
        FilterSpec::new("roll", vec![json!(2)])
    );
}

#[test]
fn json_round_trip_keeps_shape() {
    let cfg = Configuration::from_json_str(DOC).unwrap();
    let v: Value = serde_json::from_str(&cfg.to_json_pretty().unwrap()).unwrap();
    assert_eq!(v["layers"][0]["input"][0], json!(["blur", 5, 5]));
    assert_eq!(v["layers"][1], json!({ "foreground": [] }));
}

#[test]
fn dimensions_are_optional_but_paired() {
    let cfg = Configuration::from_json_str(r#"{ "layers": [] }"#).unwrap();
    assert_eq!(cfg.canvas().unwrap(), None);
    let half = Configuration::from_json_str(r#"{ "width": 3, "layers": [] }"#).unwrap();
    assert!(half.canvas().is_err());
}

#[test]
fn malformed_layers_are_rejected() {
    for doc in [
        r#"{ "layers": [ {} ] }"#,
        r#"{ "layers": [ { "input": [], "empty": [] } ] }"#,
        r#"{ "layers": [ { "camera": [] } ] }"#,
        r#"{ "layers": [ { "input": [[]] } ] }"#,
        r#"{ "layers": [ { "input": [[5, 1]] } ] }"#,
    ] {
        assert!(Configuration::from_json_str(doc).is_err(), "{doc}");
    }
}

#[test]
fn layer_kind_parses_and_displays() {
    for kind in LayerKind::ALL {
        assert_eq!(kind.to_string().parse::<LayerKind>().unwrap(), kind);
    }
    assert!("camera".parse::<LayerKind>().is_err());
}

#[test]
fn switch_filter_type_resets_params_to_defaults() {
    let registry = registry();
    let mut cfg = Configuration::from_json_str(DOC).unwrap();
    cfg.switch_filter_type(0, 0, &registry, "stripes").unwrap();
    assert_eq!(
        cfg.layers[0].filters[0],
        FilterSpec::new("stripes", vec![json!(2), json!(10), json!(0)])
    );
    assert!(matches!(
        cfg.switch_filter_type(0, 0, &registry, "gaussian_blur"),
        Err(LayercamError::UnknownFilterType(_))
    ));
    assert!(cfg.switch_filter_type(0, 9, &registry, "roll").is_err());
}

#[test]
fn set_filter_param_pads_with_null() {
    let mut cfg = Configuration::new(vec![LayerSpec::new(
        LayerKind::Input,
        vec![FilterSpec::new("stripes", vec![])],
    )]);
    cfg.set_filter_param(0, 0, 2, json!(3)).unwrap();
    assert_eq!(
        cfg.layers[0].filters[0].params,
        vec![Value::Null, Value::Null, json!(3)]
    );
    cfg.set_filter_param(0, 0, 0, json!(4)).unwrap();
    assert_eq!(cfg.layers[0].filters[0].params[0], json!(4));
}

#[test]
fn layer_and_filter_edits_validate_indices() {
    let mut cfg = Configuration::default();
    cfg.insert_layer(0, LayerKind::Input).unwrap();
    cfg.insert_layer(1, LayerKind::Empty).unwrap();
    assert!(cfg.insert_layer(5, LayerKind::Input).is_err());
    cfg.set_layer_kind(1, LayerKind::Previous).unwrap();
    assert_eq!(cfg.layers[1].kind, LayerKind::Previous);

    cfg.insert_filter(0, 0, FilterSpec::new("roll", vec![json!(1), json!(0)]))
        .unwrap();
    cfg.insert_filter(0, 0, FilterSpec::new("blur", vec![])).unwrap();
    assert_eq!(cfg.layers[0].filters[0].type_name, "blur");
    assert!(cfg.insert_filter(0, 3, FilterSpec::new("blur", vec![])).is_err());

    let removed = cfg.remove_filter(0, 1).unwrap();
    assert_eq!(removed.type_name, "roll");
    assert!(cfg.remove_filter(0, 1).is_err());

    let layer = cfg.remove_layer(0).unwrap();
    assert_eq!(layer.kind, LayerKind::Input);
    assert_eq!(cfg.layers.len(), 1);
    assert!(cfg.remove_layer(1).is_err());
}

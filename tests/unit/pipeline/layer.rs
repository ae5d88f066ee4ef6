use super::*;
use crate::config::model::FilterSpec;
use serde_json::json;

fn registry() -> FilterRegistry {
    FilterRegistry::with_builtin_filters().unwrap()
}

fn canvas() -> Canvas {
    Canvas::new(4, 2).unwrap()
}

#[test]
fn build_keeps_filter_order() {
    let spec = LayerSpec::new(
        LayerKind::Input,
        vec![
            FilterSpec::new("stripes", vec![]),
            FilterSpec::new("blur", vec![json!(1)]),
            FilterSpec::new("roll", vec![json!(1), json!(0)]),
        ],
    );
    let layer = Layer::build(&spec, &registry()).unwrap();
    assert_eq!(layer.filter_names(), vec!["stripes", "blur", "roll"]);
    assert_eq!(layer.kind(), LayerKind::Input);
}

#[test]
fn build_fails_on_unknown_type() {
    let spec = LayerSpec::new(
        LayerKind::Input,
        vec![
            FilterSpec::new("blur", vec![]),
            FilterSpec::new("sepia", vec![]),
        ],
    );
    assert!(matches!(
        Layer::build(&spec, &registry()),
        Err(LayercamError::UnknownFilterType(name)) if name == "sepia"
    ));
}

#[test]
fn sources_follow_layer_kind() {
    let input = Frame::solid(canvas(), [1, 1, 1, 255]);
    let fg = Frame::solid(canvas(), [2, 2, 2, 128]);
    let prev = Frame::solid(canvas(), [3, 3, 3, 255]);
    let ctx = LayerContext {
        canvas: canvas(),
        input: &input,
        foreground: Some(&fg),
        previous: Some(&prev),
    };
    let reg = registry();
    let source = |kind| {
        Layer::build(&LayerSpec::new(kind, vec![]), &reg)
            .unwrap()
            .source(&ctx)
            .unwrap()
    };
    assert_eq!(source(LayerKind::Input), input);
    assert_eq!(source(LayerKind::Foreground), fg);
    assert_eq!(source(LayerKind::Previous), prev);
    assert_eq!(source(LayerKind::Empty), Frame::transparent(canvas()));
}

#[test]
fn previous_is_blank_before_first_output() {
    let input = Frame::solid(canvas(), [9, 9, 9, 255]);
    let ctx = LayerContext {
        canvas: canvas(),
        input: &input,
        foreground: None,
        previous: None,
    };
    let mut layer = Layer::build(&LayerSpec::new(LayerKind::Previous, vec![]), &registry())
        .unwrap();
    assert_eq!(layer.produce(&ctx).unwrap(), Frame::transparent(canvas()));
}

#[test]
fn missing_foreground_and_wrong_size_are_errors() {
    let small = Frame::solid(Canvas::new(2, 2).unwrap(), [0, 0, 0, 255]);
    let ctx = LayerContext {
        canvas: canvas(),
        input: &small,
        foreground: None,
        previous: None,
    };
    let reg = registry();
    let fg = Layer::build(&LayerSpec::new(LayerKind::Foreground, vec![]), &reg).unwrap();
    assert!(matches!(fg.source(&ctx), Err(LayercamError::Device(_))));
    let input = Layer::build(&LayerSpec::new(LayerKind::Input, vec![]), &reg).unwrap();
    assert!(input.source(&ctx).unwrap_err().is_shape_mismatch());
}

#[test]
fn chain_applies_filters_in_spec_order() {
    // Roll then stripes differs from stripes then roll when the roll is vertical.
    let reg = registry();
    let roll_first = LayerSpec::new(
        LayerKind::Input,
        vec![
            FilterSpec::new("roll", vec![json!(0), json!(1)]),
            FilterSpec::new("stripes", vec![json!(1), json!(50), json!(0)]),
        ],
    );
    let mut input = Frame::solid(Canvas::new(1, 2).unwrap(), [100, 100, 100, 255]);
    input.set_pixel(0, 0, [10, 10, 10, 255]);
    let mut layer = Layer::build(&roll_first, &reg).unwrap();
    let out = layer.apply_chain(input).unwrap();
    // After the roll row 0 holds 100 and row 1 holds 10; stripes darkens row 0, brightens row 1.
    assert_eq!(out.pixel(0, 0)[0], 50);
    assert_eq!(out.pixel(0, 1)[0], 60);
}

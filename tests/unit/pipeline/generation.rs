use super::*;
use crate::config::model::{Configuration, FilterSpec, LayerKind, LayerSpec};
use crate::filters::registry::FilterRegistry;
use crate::foundation::core::Canvas;
use serde_json::json;

fn pipeline(marker: u128, speed: i64) -> Pipeline {
    let cfg = Configuration::new(vec![LayerSpec::new(
        LayerKind::Input,
        vec![FilterSpec::new("roll", vec![json!(speed), json!(0)])],
    )]);
    let registry = FilterRegistry::with_builtin_filters().unwrap();
    Pipeline::build(&cfg, &registry, Some(ConfigMarker(marker))).unwrap()
}

#[test]
fn publish_replaces_active_generation_with_increasing_ids() {
    let handle = GenerationHandle::new(pipeline(1, 0));
    let first = handle.load();
    assert_eq!(first.id(), GenerationId(1));
    assert_eq!(first.marker(), Some(ConfigMarker(1)));

    let second = handle.publish(pipeline(2, 1));
    assert_eq!(second.id(), GenerationId(2));
    assert_eq!(handle.load().id(), GenerationId(2));
    assert_eq!(handle.load().marker(), Some(ConfigMarker(2)));
    assert_eq!(GenerationId(2).to_string(), "gen#2");
}

#[test]
fn held_snapshot_keeps_working_after_swap() {
    let handle = GenerationHandle::new(pipeline(1, 1));
    let snapshot = handle.load();
    handle.publish(pipeline(2, 0));

    let mut input = Frame::transparent(Canvas::new(3, 1).unwrap());
    input.set_pixel(0, 0, [9, 9, 9, 255]);
    let inputs = ComposeInputs {
        input: &input,
        foreground: None,
    };
    // Old snapshot still rolls; the new generation does not.
    assert_eq!(snapshot.compose(&inputs).unwrap().pixel(1, 0), [9, 9, 9, 255]);
    assert_eq!(handle.load().compose(&inputs).unwrap().pixel(0, 0), [9, 9, 9, 255]);
}

#[test]
fn new_generation_starts_with_fresh_state() {
    let handle = GenerationHandle::new(pipeline(1, 1));
    let mut input = Frame::transparent(Canvas::new(4, 1).unwrap());
    input.set_pixel(0, 0, [1, 1, 1, 255]);
    let inputs = ComposeInputs {
        input: &input,
        foreground: None,
    };
    let gen1 = handle.load();
    gen1.compose(&inputs).unwrap();
    assert_eq!(gen1.compose(&inputs).unwrap().pixel(2, 0), [1, 1, 1, 255]);

    let gen2 = handle.publish(pipeline(2, 1));
    assert!(gen2.with_pipeline(|p| p.previous_output().is_none()));
    assert_eq!(gen2.compose(&inputs).unwrap().pixel(1, 0), [1, 1, 1, 255]);
    assert!(!gen2.needs_foreground());
}

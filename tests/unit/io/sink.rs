use super::*;
use crate::foundation::core::Canvas;

fn cfg() -> SinkConfig {
    SinkConfig {
        canvas: Canvas::new(2, 2).unwrap(),
        fps: Fps::default(),
    }
}

#[test]
fn in_memory_sink_records_frames_in_order() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    let frame = Frame::solid(cfg().canvas, [1, 1, 1, 255]);
    sink.push_frame(FrameIndex(0), &frame).unwrap();
    sink.push_frame(FrameIndex(1), &frame).unwrap();
    sink.end().unwrap();

    assert_eq!(sink.config(), Some(cfg()));
    assert_eq!(sink.frames().len(), 2);
    assert_eq!(sink.frames()[1].0, FrameIndex(1));
    assert!(sink.is_ended());
}

#[test]
fn in_memory_sink_rejects_push_before_begin() {
    let mut sink = InMemorySink::new();
    let frame = Frame::transparent(cfg().canvas);
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
}

#[test]
fn in_memory_sink_rejects_repeated_index() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    let frame = Frame::transparent(cfg().canvas);
    sink.push_frame(FrameIndex(3), &frame).unwrap();
    assert!(sink.push_frame(FrameIndex(3), &frame).is_err());
    assert!(sink.push_frame(FrameIndex(2), &frame).is_err());
}

#[test]
fn null_sink_accepts_anything() {
    let mut sink: Box<dyn FrameSink> = Box::new(NullSink);
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(9), &Frame::transparent(cfg().canvas))
        .unwrap();
    sink.end().unwrap();
}

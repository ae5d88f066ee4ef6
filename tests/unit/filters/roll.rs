use super::*;
use crate::foundation::core::Canvas;

fn numbered(w: u32, h: u32) -> Frame {
    let mut f = Frame::transparent(Canvas::new(w, h).unwrap());
    for y in 0..h {
        for x in 0..w {
            f.set_pixel(x, y, [x as u8, y as u8, 7, (x + y) as u8]);
        }
    }
    f
}

#[test]
fn zero_speed_is_identity() {
    let src = numbered(5, 4);
    let mut f = src.clone();
    let mut roll = Roll::new(0, 0);
    for _ in 0..3 {
        roll.apply(&mut f);
    }
    assert_eq!(f, src);
    assert_eq!(roll.position(), (0, 0));
}

#[test]
fn full_cycle_returns_to_origin() {
    let mut roll = Roll::new(1, 0);
    let mut f = numbered(10, 2);
    for i in 1..=10u32 {
        roll.apply(&mut f);
        assert_eq!(roll.position().0, i % 10);
    }
    assert_eq!(roll.position(), (0, 0));
}

#[test]
fn negative_speed_wraps_to_positive_positions() {
    let mut roll = Roll::new(-1, 0);
    let mut f = numbered(10, 1);
    let mut seen = Vec::new();
    for _ in 0..3 {
        let mut frame = f.clone();
        roll.apply(&mut frame);
        seen.push(roll.position().0);
        f = frame;
    }
    assert_eq!(seen, vec![9, 8, 7]);
}

#[test]
fn shift_moves_all_channels_cyclically() {
    let src = numbered(4, 3);
    let mut f = src.clone();
    Roll::new(1, 2).apply(&mut f);
    for y in 0..3 {
        for x in 0..4 {
            assert_eq!(f.pixel((x + 1) % 4, (y + 2) % 3), src.pixel(x, y));
        }
    }
}

#[test]
fn position_accumulates_across_frames() {
    let mut roll = Roll::new(2, 0);
    let canvas = Canvas::new(100, 50).unwrap();
    for _ in 0..3 {
        roll.apply(&mut Frame::transparent(canvas));
    }
    assert_eq!(roll.position(), (6, 0));
    for _ in 3..50 {
        roll.apply(&mut Frame::transparent(canvas));
    }
    assert_eq!(roll.position(), (0, 0));
}

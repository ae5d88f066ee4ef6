use super::*;
use crate::foundation::core::Canvas;

#[test]
fn over_opaque_src_replaces_dst() {
    assert_eq!(over([1, 2, 3, 255], [9, 8, 7, 255]), [9, 8, 7, 255]);
}

#[test]
fn over_transparent_src_keeps_dst() {
    assert_eq!(over([1, 2, 3, 200], [9, 8, 7, 0]), [1, 2, 3, 200]);
}

#[test]
fn over_half_alpha_on_opaque_mixes_evenly() {
    let out = over([0, 0, 0, 255], [200, 100, 50, 128]);
    assert_eq!(out[3], 255);
    assert!((i32::from(out[0]) - 100).abs() <= 1);
    assert!((i32::from(out[1]) - 50).abs() <= 1);
    assert!((i32::from(out[2]) - 25).abs() <= 1);
}

#[test]
fn over_half_alpha_on_transparent_keeps_src_color() {
    let out = over([0, 0, 0, 0], [200, 100, 50, 128]);
    assert_eq!(out, [200, 100, 50, 128]);
}

#[test]
fn over_in_place_rejects_mismatched_frames() {
    let mut dst = Frame::transparent(Canvas::new(2, 2).unwrap());
    let src = Frame::transparent(Canvas::new(2, 1).unwrap());
    assert!(over_in_place(&mut dst, &src).unwrap_err().is_shape_mismatch());
}

#[test]
fn flatten_over_bg_makes_pixels_opaque() {
    let src = vec![0u8, 0, 0, 0, 10, 20, 30, 255];
    let mut dst = vec![0u8; 8];
    flatten_over_bg(&mut dst, &src, [5, 6, 7]);
    assert_eq!(dst, vec![5, 6, 7, 255, 10, 20, 30, 255]);
}

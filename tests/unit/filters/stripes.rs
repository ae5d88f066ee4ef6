use super::*;
use crate::foundation::core::Canvas;

fn gray(w: u32, h: u32, v: u8) -> Frame {
    Frame::solid(Canvas::new(w, h).unwrap(), [v, v, v, 200])
}

#[test]
fn zero_intensity_is_identity_for_any_speed() {
    for (width, speed) in [(1, 0), (2, 1), (5, -3), (7, 200)] {
        let mut src = gray(3, 11, 90);
        src.set_pixel(1, 4, [0, 255, 17, 3]);
        let mut f = src.clone();
        let mut s = Stripes::new(width, 0, speed).unwrap();
        s.apply(&mut f);
        s.apply(&mut f);
        assert_eq!(f, src);
    }
}

#[test]
fn width_below_one_is_rejected() {
    assert!(Stripes::new(0, 10, 1).is_err());
    assert!(Stripes::new(-3, 10, 1).is_err());
}

#[test]
fn one_frame_on_gray_matches_band_pattern() {
    let mut f = gray(2, 8, 128);
    let mut s = Stripes::new(2, 10, 1).unwrap();
    s.apply(&mut f);
    assert_eq!(s.phase(), 1);
    let rows: Vec<u8> = (0..8).map(|y| f.pixel(0, y)[0]).collect();
    assert_eq!(rows, vec![138, 118, 118, 138, 138, 118, 118, 138]);
    for y in 0..8 {
        assert_eq!(f.pixel(1, y)[3], 200);
    }
}

#[test]
fn outputs_saturate_at_domain_bounds() {
    for base in [0u8, 5, 250, 255] {
        let mut f = gray(1, 6, base);
        let mut s = Stripes::new(1, 255, 1).unwrap();
        s.apply(&mut f);
        for y in 0..6 {
            let px = f.pixel(0, y);
            assert!(px[0] == 0 || px[0] == 255);
            assert_eq!(px[3], 200);
        }
    }
}

#[test]
fn huge_and_negative_intensity_stay_in_domain() {
    let mut f = gray(1, 4, 100);
    let mut s = Stripes::new(1, -1_000_000, 0).unwrap();
    s.apply(&mut f);
    let rows: Vec<u8> = (0..4).map(|y| f.pixel(0, y)[0]).collect();
    assert_eq!(rows, vec![255, 0, 255, 0]);
}

#[test]
fn negative_speed_keeps_phase_non_negative() {
    let mut s = Stripes::new(3, 1, -1).unwrap();
    let mut f = gray(1, 1, 0);
    let mut phases = Vec::new();
    for _ in 0..4 {
        s.apply(&mut f);
        phases.push(s.phase());
    }
    assert_eq!(phases, vec![5, 4, 3, 2]);
}

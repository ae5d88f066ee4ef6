use super::*;

#[test]
fn mul_div255_rounds_to_nearest() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(128, 255), 128);
    assert_eq!(mul_div255_u16(255, 0), 0);
    assert_eq!(mul_div255_u16(100, 128), 50);
}

#[test]
fn clamp_channel_saturates_both_ends() {
    assert_eq!(clamp_channel(-20), 0);
    assert_eq!(clamp_channel(300), 255);
    assert_eq!(clamp_channel(128), 128);
}

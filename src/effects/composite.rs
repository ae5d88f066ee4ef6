use crate::foundation::error::LayercamResult;
use crate::foundation::math::mul_div255_u16;
use crate::render::frame::Frame;

/// Straight-alpha RGBA8 pixel.
pub type Rgba8 = [u8; 4];

/// Porter-Duff "over" for straight-alpha pixels: `src` drawn on top of `dst`.
pub fn over(dst: Rgba8, src: Rgba8) -> Rgba8 {
    let sa = u16::from(src[3]);
    if sa == 255 {
        return src;
    }
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - sa;
    let da = mul_div255_u16(u16::from(dst[3]), inv);
    let out_a = u32::from(sa + da);
    if out_a == 0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    out[3] = out_a.min(255) as u8;
    for i in 0..3 {
        let sc = u32::from(src[i]) * u32::from(sa);
        let dc = u32::from(dst[i]) * u32::from(da);
        out[i] = ((sc + dc + out_a / 2) / out_a).min(255) as u8;
    }
    out
}

/// Blend `src` over `dst` pixel by pixel. Both frames must share dimensions.
pub fn over_in_place(dst: &mut Frame, src: &Frame) -> LayercamResult<()> {
    src.ensure_canvas(dst.canvas())?;
    for (d, s) in dst
        .data_mut()
        .chunks_exact_mut(4)
        .zip(src.data().chunks_exact(4))
    {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Flatten straight-alpha RGBA8 over an opaque background color.
pub fn flatten_over_bg(dst: &mut [u8], src: &[u8], bg_rgb: [u8; 3]) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([bg_rgb[0], bg_rgb[1], bg_rgb[2], 255], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
        d[3] = 255;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;

use crate::types::Scale;

/// Maps a texture onto a viewport, returning the multipliers for the unit
/// quad's half extents.
///
/// Textures strictly smaller than the viewport on both axes are shown at
/// native pixel density. Anything else shrinks to fit, bound by width first and
/// by height when the width fit would overflow vertically, always keeping the
/// texture's aspect ratio. A zero viewport dimension is treated as one pixel.
pub fn fit(tex_w: u32, tex_h: u32, vp_w: u32, vp_h: u32) -> Scale {
    let tex_w = tex_w.max(1) as f32;
    let tex_h = tex_h.max(1) as f32;
    let vp_w = vp_w.max(1) as f32;
    let vp_h = vp_h.max(1) as f32;

    if tex_w < vp_w && tex_h < vp_h {
        return Scale {
            x: tex_w / vp_w,
            y: tex_h / vp_h,
        };
    }

    let mut width = vp_w;
    let mut height = vp_w * tex_h / tex_w;
    if height > vp_h {
        height = vp_h;
        width = vp_h * tex_w / tex_h;
    }

    Scale {
        x: width / vp_w,
        y: height / vp_h,
    }
}

use crate::foundation::error::{QrStampError, QrStampResult};

/// Requested placement of the symbol, in full-resolution pixels and modules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    /// Pixels per module (>= 1).
    pub scale: u32,
    /// Quiet-zone width in modules.
    pub border: u32,
    pub x: u32,
    pub y: u32,
}

/// Resolved placement: the symbol occupies `[origin_x, origin_x + total_px)` x
/// `[origin_y, origin_y + total_px)`, which always lies inside the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    /// Pixels per module after shrinking to fit.
    pub scale: u32,
    /// Quiet-zone width in pixels.
    pub border_px: u32,
    pub origin_x: u32,
    pub origin_y: u32,
    /// Side of the painted square in pixels, quiet zone included.
    pub total_px: u32,
    /// Side of the module matrix.
    pub qrwidth: u32,
}

impl Geometry {
    /// Side of the coded area (modules only) in pixels.
    pub fn code_px(&self) -> u32 {
        self.qrwidth * self.scale
    }
}

/// Fit a `qrwidth`-module symbol into a `frame_w`x`frame_h` frame.
///
/// The scale only ever shrinks: first to fit the width, then (starting from that result) to
/// fit the height. The origin is then pulled back so the square ends inside the frame.
pub fn resolve(
    frame_w: u32,
    frame_h: u32,
    qrwidth: u32,
    cfg: &RenderConfig,
) -> QrStampResult<Geometry> {
    if frame_w == 0 || frame_h == 0 {
        return Err(QrStampError::validation(format!(
            "frame dimensions must be non-zero (got {frame_w}x{frame_h})"
        )));
    }
    if qrwidth == 0 {
        return Err(QrStampError::validation("module matrix is empty"));
    }
    if cfg.scale == 0 {
        return Err(QrStampError::validation("scale must be >= 1"));
    }

    let fw = u64::from(frame_w);
    let fh = u64::from(frame_h);
    let size = 2 * u64::from(cfg.border) + u64::from(qrwidth);
    let mut scale = u64::from(cfg.scale);
    let mut w = scale.saturating_mul(size);

    if w > fw {
        scale = fw / size;
        w = scale * size;
    }
    if w > fh {
        scale = fh / size;
        w = scale * size;
    }
    if scale == 0 {
        return Err(QrStampError::geometry(format!(
            "{size}x{size} module symbol does not fit a {frame_w}x{frame_h} frame at scale 1"
        )));
    }

    let clamp = |pos: u32, extent: u64| -> u64 {
        let pos = u64::from(pos);
        if pos + w <= extent { pos } else { extent - w }
    };
    let origin_x = clamp(cfg.x, fw);
    let origin_y = clamp(cfg.y, fh);

    // Everything below is bounded by the frame dimensions, so it fits u32.
    Ok(Geometry {
        scale: scale as u32,
        border_px: (u64::from(cfg.border) * scale) as u32,
        origin_x: origin_x as u32,
        origin_y: origin_y as u32,
        total_px: w as u32,
        qrwidth,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/geometry.rs"]
mod tests;

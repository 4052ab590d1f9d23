use crate::foundation::core::{sub_ceil, sub_floor};
use crate::foundation::error::{QrStampError, QrStampResult};
use crate::frame::video::PlaneDescriptor;
use crate::render::geometry::Geometry;
use crate::symbol::matrix::ModuleMatrix;

/// Half-open sample rectangle in one plane's own (possibly subsampled) coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaneRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl PlaneRect {
    /// Map the full-resolution span `[x, x + w)` x `[y, y + h)` into a plane.
    ///
    /// The start rounds down and the end rounds up, so every full-resolution pixel of the span
    /// is covered and the result never reaches past the plane when the span is inside the frame.
    pub fn map(x: u32, y: u32, w: u32, h: u32, hsub: u8, vsub: u8) -> Self {
        Self {
            x0: sub_floor(x, hsub),
            y0: sub_floor(y, vsub),
            x1: sub_ceil(x.saturating_add(w), hsub),
            y1: sub_ceil(y.saturating_add(h), vsub),
        }
    }

    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }

    pub fn contains(&self, col: u32, row: u32) -> bool {
        (self.x0..self.x1).contains(&col) && (self.y0..self.y1).contains(&row)
    }
}

/// Plane-local footprint of a resolved [`Geometry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaneFootprint {
    /// Whole symbol including the quiet zone.
    pub outer: PlaneRect,
    /// Samples whose full-resolution position falls inside the module area.
    pub code: PlaneRect,
}

impl PlaneFootprint {
    pub fn new(geom: &Geometry, hsub: u8, vsub: u8) -> Self {
        let outer = PlaneRect::map(
            geom.origin_x,
            geom.origin_y,
            geom.total_px,
            geom.total_px,
            hsub,
            vsub,
        );
        let cx = geom.origin_x.saturating_add(geom.border_px);
        let cy = geom.origin_y.saturating_add(geom.border_px);
        let code_px = geom.qrwidth.saturating_mul(geom.scale);
        // A sample belongs to the module area when its full-resolution position does, so
        // both ends of the code span round up.
        let code = PlaneRect {
            x0: sub_ceil(cx, hsub),
            y0: sub_ceil(cy, vsub),
            x1: sub_ceil(cx.saturating_add(code_px), hsub),
            y1: sub_ceil(cy.saturating_add(code_px), vsub),
        };
        Self { outer, code }
    }
}

/// Paint the symbol into one component of a frame buffer.
///
/// The whole footprint is first filled with the background (maximum value, or the neutral
/// mid-value for components that are not `full_contrast`). Full-contrast components then get
/// the module pattern: 0 for dark modules, maximum for light ones.
///
/// Fails without writing when `geom` was resolved for a different matrix side, is internally
/// inconsistent, or reaches past the end of `data`.
pub fn composite_plane(
    data: &mut [u8],
    plane: &PlaneDescriptor,
    geom: &Geometry,
    matrix: &ModuleMatrix,
    full_contrast: bool,
) -> QrStampResult<()> {
    check_inputs(data.len(), plane, geom, matrix)?;

    let fp = PlaneFootprint::new(geom, plane.hsub, plane.vsub);
    let max = plane.max_value();
    let background = if full_contrast {
        max
    } else {
        plane.neutral_value()
    };

    for row in fp.outer.y0..fp.outer.y1 {
        for col in fp.outer.x0..fp.outer.x1 {
            plane.write_sample(data, plane.sample_index(col, row), background);
        }
    }

    if !full_contrast || fp.code.width() == 0 || fp.code.height() == 0 {
        return Ok(());
    }

    let cx = geom.origin_x + geom.border_px;
    let cy = geom.origin_y + geom.border_px;
    let module_of = |sample: u32, shift: u8, start: u32| -> usize {
        (((sample << shift) - start) / geom.scale) as usize
    };
    let columns: Vec<(u32, usize)> = (fp.code.x0..fp.code.x1)
        .map(|col| (col, module_of(col, plane.hsub, cx)))
        .collect();

    for row in fp.code.y0..fp.code.y1 {
        let module_row = module_of(row, plane.vsub, cy);
        for &(col, module_col) in &columns {
            let value = if matrix.is_light(module_row, module_col) {
                max
            } else {
                0
            };
            plane.write_sample(data, plane.sample_index(col, row), value);
        }
    }
    Ok(())
}

fn check_inputs(
    len: usize,
    plane: &PlaneDescriptor,
    geom: &Geometry,
    matrix: &ModuleMatrix,
) -> QrStampResult<()> {
    plane
        .check_sample_format()
        .map_err(QrStampError::validation)?;

    if geom.scale == 0 || geom.qrwidth == 0 {
        return Err(QrStampError::geometry(format!(
            "scale {} and module count {} must both be non-zero",
            geom.scale, geom.qrwidth
        )));
    }
    if usize::try_from(geom.qrwidth).ok() != Some(matrix.width()) {
        return Err(QrStampError::geometry(format!(
            "placement was resolved for {} modules but the matrix has {}",
            geom.qrwidth,
            matrix.width()
        )));
    }
    let total = geom
        .qrwidth
        .checked_mul(geom.scale)
        .and_then(|code| geom.border_px.checked_mul(2)?.checked_add(code));
    let fits_u32 = geom.origin_x.checked_add(geom.total_px).is_some()
        && geom.origin_y.checked_add(geom.total_px).is_some();
    if total != Some(geom.total_px) || !fits_u32 {
        return Err(QrStampError::geometry(format!("inconsistent placement {geom:?}")));
    }

    // Sample offsets grow with row and column, so the last sample bounds every write.
    let fp = PlaneFootprint::new(geom, plane.hsub, plane.vsub);
    let end = plane.sample_end(fp.outer.x1 - 1, fp.outer.y1 - 1);
    match end {
        Some(end) if end <= len => Ok(()),
        _ => Err(QrStampError::validation(format!(
            "symbol footprint ends past the {len}-byte buffer"
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;

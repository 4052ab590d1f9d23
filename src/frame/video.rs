use crate::foundation::core::sub_ceil;
use crate::foundation::error::{QrStampError, QrStampResult};
use crate::frame::format::ColorModel;

/// Largest supported subsampling shift (1/16 resolution).
pub const MAX_SUB_SHIFT: u8 = 4;

/// Sample layout of one color component inside the frame buffer.
///
/// Components of packed formats share the bytes of a single plane and differ only in
/// `offset`; planar components point at disjoint regions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaneDescriptor {
    /// Byte offset of the component's first sample.
    pub offset: usize,
    /// Bytes between the starts of two consecutive rows.
    pub stride: usize,
    /// Bytes between two consecutive samples of this component within a row.
    pub pixel_stride: usize,
    /// Significant bits per sample (1..=16).
    pub depth: u8,
    pub hsub: u8,
    pub vsub: u8,
    /// Byte order of two-byte samples.
    pub big_endian: bool,
}

impl PlaneDescriptor {
    /// Bytes occupied by one sample: 1 up to 8 bits of depth, 2 above.
    pub fn sample_bytes(&self) -> usize {
        if self.depth <= 8 { 1 } else { 2 }
    }

    /// Largest representable sample value.
    pub fn max_value(&self) -> u16 {
        ((1u32 << self.depth) - 1) as u16
    }

    /// Value that carries no color shift in a chroma component.
    pub fn neutral_value(&self) -> u16 {
        self.max_value() / 2
    }

    /// Samples per row at this component's resolution.
    pub fn plane_width(&self, frame_width: u32) -> u32 {
        sub_ceil(frame_width, self.hsub)
    }

    /// Rows at this component's resolution.
    pub fn plane_height(&self, frame_height: u32) -> u32 {
        sub_ceil(frame_height, self.vsub)
    }

    /// Byte index of the sample at plane-local `(col, row)`.
    pub fn sample_index(&self, col: u32, row: u32) -> usize {
        self.offset + row as usize * self.stride + col as usize * self.pixel_stride
    }

    pub(crate) fn write_sample(&self, data: &mut [u8], idx: usize, value: u16) {
        if self.sample_bytes() == 1 {
            data[idx] = value as u8;
        } else {
            let bytes = if self.big_endian {
                value.to_be_bytes()
            } else {
                value.to_le_bytes()
            };
            data[idx..idx + 2].copy_from_slice(&bytes);
        }
    }

    pub fn read_sample(&self, data: &[u8], idx: usize) -> u16 {
        if self.sample_bytes() == 1 {
            u16::from(data[idx])
        } else if self.big_endian {
            u16::from_be_bytes([data[idx], data[idx + 1]])
        } else {
            u16::from_le_bytes([data[idx], data[idx + 1]])
        }
    }

    /// Depth, subsampling and pixel stride checks that do not depend on the frame size.
    pub(crate) fn check_sample_format(&self) -> Result<(), String> {
        if self.depth == 0 || self.depth > 16 {
            return Err(format!("unsupported bit depth {}", self.depth));
        }
        if self.hsub > MAX_SUB_SHIFT || self.vsub > MAX_SUB_SHIFT {
            return Err(format!(
                "subsampling shift {}x{} exceeds {MAX_SUB_SHIFT}",
                self.hsub, self.vsub
            ));
        }
        if self.pixel_stride < self.sample_bytes() {
            return Err(format!(
                "pixel stride {} is smaller than a {}-byte sample",
                self.pixel_stride,
                self.sample_bytes()
            ));
        }
        Ok(())
    }

    /// One past the last byte of the sample at plane-local `(col, row)`.
    pub(crate) fn sample_end(&self, col: u32, row: u32) -> Option<usize> {
        (row as usize)
            .checked_mul(self.stride)?
            .checked_add((col as usize).checked_mul(self.pixel_stride)?)?
            .checked_add(self.offset)?
            .checked_add(self.sample_bytes())
    }

    /// One past the last byte this component touches in a `width`x`height` frame.
    fn end_byte(&self, width: u32, height: u32) -> Option<usize> {
        let last_col = self.plane_width(width).checked_sub(1)?;
        let last_row = self.plane_height(height).checked_sub(1)?;
        self.sample_end(last_col, last_row)
    }
}

/// Dimensions, color model and component layout of a raw video frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameInfo {
    pub width: u32,
    pub height: u32,
    pub color_model: ColorModel,
    /// Format name exposed to payload templates (`%f`).
    pub format_name: String,
    pub planes: Vec<PlaneDescriptor>,
    /// Bytes per frame including row padding, as laid out in a raw stream.
    pub size: usize,
}

impl FrameInfo {
    /// Minimum buffer length that holds every component.
    pub fn min_buffer_len(&self) -> usize {
        self.planes
            .iter()
            .filter_map(|p| p.end_byte(self.width, self.height))
            .max()
            .unwrap_or(0)
    }

    /// Reject descriptors that could make the compositor read or write outside `buffer_len`.
    pub fn validate(&self, buffer_len: usize) -> QrStampResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(QrStampError::validation(format!(
                "frame dimensions must be non-zero (got {}x{})",
                self.width, self.height
            )));
        }
        if self.planes.is_empty() {
            return Err(QrStampError::validation("frame has no planes"));
        }

        for (idx, plane) in self.planes.iter().enumerate() {
            plane
                .check_sample_format()
                .map_err(|e| QrStampError::validation(format!("plane {idx}: {e}")))?;
            let row_bytes = (plane.plane_width(self.width) as usize - 1) * plane.pixel_stride
                + plane.sample_bytes();
            if plane.stride < row_bytes {
                return Err(QrStampError::validation(format!(
                    "plane {idx}: stride {} is smaller than a {row_bytes}-byte row",
                    plane.stride
                )));
            }
            let end = plane.end_byte(self.width, self.height).ok_or_else(|| {
                QrStampError::validation(format!("plane {idx}: layout overflows usize"))
            })?;
            if end > buffer_len {
                return Err(QrStampError::validation(format!(
                    "plane {idx}: needs {end} bytes but buffer holds {buffer_len}"
                )));
            }
        }
        Ok(())
    }
}

/// A frame buffer mapped read-write for the duration of one stamp call.
#[derive(Debug)]
pub struct VideoFrameMut<'a> {
    info: &'a FrameInfo,
    data: &'a mut [u8],
}

impl<'a> VideoFrameMut<'a> {
    /// Validate `info` against `data` and wrap both. Fails before any byte is touched.
    pub fn new(info: &'a FrameInfo, data: &'a mut [u8]) -> QrStampResult<Self> {
        info.validate(data.len())?;
        Ok(Self { info, data })
    }

    pub fn info(&self) -> &FrameInfo {
        self.info
    }

    pub fn width(&self) -> u32 {
        self.info.width
    }

    pub fn height(&self) -> u32 {
        self.info.height
    }

    pub fn data(&self) -> &[u8] {
        self.data
    }

    pub(crate) fn parts_mut(&mut self) -> (&FrameInfo, &mut [u8]) {
        (self.info, self.data)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/video.rs"]
mod tests;

use crate::foundation::core::sub_ceil;
use crate::foundation::error::QrStampError;
use crate::frame::video::{FrameInfo, PlaneDescriptor};

/// Color model of a frame; decides how each component is painted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorModel {
    Rgb,
    Gray,
    Yuv,
}

impl ColorModel {
    /// Whether component `index` receives the black/white module pattern.
    ///
    /// Every RGB and gray component does. For YUV only luma does; chroma is held at the
    /// neutral value so the symbol adds no tint.
    pub fn is_full_contrast(self, index: usize) -> bool {
        match self {
            ColorModel::Rgb | ColorModel::Gray => true,
            ColorModel::Yuv => index == 0,
        }
    }
}

/// Raw video layouts with a built-in component table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum PixelFormat {
    Gray8,
    Gray16Le,
    Gray16Be,
    Rgb,
    Bgr,
    Rgbx,
    Bgrx,
    Xrgb,
    Xbgr,
    I420,
    Yv12,
    Y42b,
    Y444,
    Nv12,
    Nv21,
    Yuy2,
    Uyvy,
    I420_10Le,
}

impl PixelFormat {
    pub const ALL: [PixelFormat; 18] = [
        PixelFormat::Gray8,
        PixelFormat::Gray16Le,
        PixelFormat::Gray16Be,
        PixelFormat::Rgb,
        PixelFormat::Bgr,
        PixelFormat::Rgbx,
        PixelFormat::Bgrx,
        PixelFormat::Xrgb,
        PixelFormat::Xbgr,
        PixelFormat::I420,
        PixelFormat::Yv12,
        PixelFormat::Y42b,
        PixelFormat::Y444,
        PixelFormat::Nv12,
        PixelFormat::Nv21,
        PixelFormat::Yuy2,
        PixelFormat::Uyvy,
        PixelFormat::I420_10Le,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PixelFormat::Gray8 => "GRAY8",
            PixelFormat::Gray16Le => "GRAY16_LE",
            PixelFormat::Gray16Be => "GRAY16_BE",
            PixelFormat::Rgb => "RGB",
            PixelFormat::Bgr => "BGR",
            PixelFormat::Rgbx => "RGBx",
            PixelFormat::Bgrx => "BGRx",
            PixelFormat::Xrgb => "xRGB",
            PixelFormat::Xbgr => "xBGR",
            PixelFormat::I420 => "I420",
            PixelFormat::Yv12 => "YV12",
            PixelFormat::Y42b => "Y42B",
            PixelFormat::Y444 => "Y444",
            PixelFormat::Nv12 => "NV12",
            PixelFormat::Nv21 => "NV21",
            PixelFormat::Yuy2 => "YUY2",
            PixelFormat::Uyvy => "UYVY",
            PixelFormat::I420_10Le => "I420_10LE",
        }
    }

    pub fn color_model(self) -> ColorModel {
        match self {
            PixelFormat::Gray8 | PixelFormat::Gray16Le | PixelFormat::Gray16Be => ColorModel::Gray,
            PixelFormat::Rgb
            | PixelFormat::Bgr
            | PixelFormat::Rgbx
            | PixelFormat::Bgrx
            | PixelFormat::Xrgb
            | PixelFormat::Xbgr => ColorModel::Rgb,
            _ => ColorModel::Yuv,
        }
    }

    /// Layout with rows padded to 4 bytes, the usual raw-video convention.
    pub fn frame_info(self, width: u32, height: u32) -> FrameInfo {
        self.frame_info_aligned(width, height, 4)
    }

    /// Layout with rows padded to a multiple of `row_align` bytes (`1` means tightly packed).
    pub fn frame_info_aligned(self, width: u32, height: u32, row_align: usize) -> FrameInfo {
        let align = row_align.max(1);
        let round = |n: usize| n.div_ceil(align) * align;
        let w = width as usize;
        let h = height as usize;
        let cw = sub_ceil(width, 1) as usize;
        let ch = sub_ceil(height, 1) as usize;

        let planes = match self {
            PixelFormat::Gray8 => vec![comp(0, round(w), 1, 8, 0, 0)],
            PixelFormat::Gray16Le => vec![comp(0, round(w * 2), 2, 16, 0, 0)],
            PixelFormat::Gray16Be => vec![PlaneDescriptor {
                big_endian: true,
                ..comp(0, round(w * 2), 2, 16, 0, 0)
            }],
            PixelFormat::Rgb => packed(round(w * 3), 3, [0, 1, 2]),
            PixelFormat::Bgr => packed(round(w * 3), 3, [2, 1, 0]),
            PixelFormat::Rgbx => packed(round(w * 4), 4, [0, 1, 2]),
            PixelFormat::Bgrx => packed(round(w * 4), 4, [2, 1, 0]),
            PixelFormat::Xrgb => packed(round(w * 4), 4, [1, 2, 3]),
            PixelFormat::Xbgr => packed(round(w * 4), 4, [3, 2, 1]),
            PixelFormat::I420 | PixelFormat::Yv12 => {
                let ys = round(w);
                let cs = round(cw);
                let y_size = ys * h;
                let c_size = cs * ch;
                let (u_off, v_off) = if self == PixelFormat::I420 {
                    (y_size, y_size + c_size)
                } else {
                    (y_size + c_size, y_size)
                };
                vec![
                    comp(0, ys, 1, 8, 0, 0),
                    comp(u_off, cs, 1, 8, 1, 1),
                    comp(v_off, cs, 1, 8, 1, 1),
                ]
            }
            PixelFormat::Y42b => {
                let ys = round(w);
                let cs = round(cw);
                let y_size = ys * h;
                vec![
                    comp(0, ys, 1, 8, 0, 0),
                    comp(y_size, cs, 1, 8, 1, 0),
                    comp(y_size + cs * h, cs, 1, 8, 1, 0),
                ]
            }
            PixelFormat::Y444 => {
                let s = round(w);
                vec![
                    comp(0, s, 1, 8, 0, 0),
                    comp(s * h, s, 1, 8, 0, 0),
                    comp(2 * s * h, s, 1, 8, 0, 0),
                ]
            }
            PixelFormat::Nv12 | PixelFormat::Nv21 => {
                let ys = round(w);
                let cs = round(cw * 2);
                let uv = ys * h;
                let (u, v) = if self == PixelFormat::Nv12 {
                    (uv, uv + 1)
                } else {
                    (uv + 1, uv)
                };
                vec![
                    comp(0, ys, 1, 8, 0, 0),
                    comp(u, cs, 2, 8, 1, 1),
                    comp(v, cs, 2, 8, 1, 1),
                ]
            }
            PixelFormat::Yuy2 => {
                let s = round(cw * 4);
                vec![comp(0, s, 2, 8, 0, 0), comp(1, s, 4, 8, 1, 0), comp(3, s, 4, 8, 1, 0)]
            }
            PixelFormat::Uyvy => {
                let s = round(cw * 4);
                vec![comp(1, s, 2, 8, 0, 0), comp(0, s, 4, 8, 1, 0), comp(2, s, 4, 8, 1, 0)]
            }
            PixelFormat::I420_10Le => {
                let ys = round(w * 2);
                let cs = round(cw * 2);
                let y_size = ys * h;
                let c_size = cs * ch;
                vec![
                    comp(0, ys, 2, 10, 0, 0),
                    comp(y_size, cs, 2, 10, 1, 1),
                    comp(y_size + c_size, cs, 2, 10, 1, 1),
                ]
            }
        };

        let size = match self {
            PixelFormat::I420 | PixelFormat::Yv12 => round(w) * h + 2 * round(cw) * ch,
            PixelFormat::I420_10Le => round(w * 2) * h + 2 * round(cw * 2) * ch,
            PixelFormat::Y42b => round(w) * h + 2 * round(cw) * h,
            PixelFormat::Y444 => 3 * round(w) * h,
            PixelFormat::Nv12 | PixelFormat::Nv21 => round(w) * h + round(cw * 2) * ch,
            _ => planes[0].stride * h,
        };

        FrameInfo {
            width,
            height,
            color_model: self.color_model(),
            format_name: self.name().to_owned(),
            planes,
            size,
        }
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for PixelFormat {
    type Err = QrStampError;

    /// Case-insensitive lookup by [`PixelFormat::name`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PixelFormat::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| QrStampError::validation(format!("unknown pixel format '{s}'")))
    }
}

fn comp(
    offset: usize,
    stride: usize,
    pixel_stride: usize,
    depth: u8,
    hsub: u8,
    vsub: u8,
) -> PlaneDescriptor {
    PlaneDescriptor {
        offset,
        stride,
        pixel_stride,
        depth,
        hsub,
        vsub,
        big_endian: false,
    }
}

// R, G, B byte positions within one packed pixel.
fn packed(stride: usize, pixel_stride: usize, offsets: [usize; 3]) -> Vec<PlaneDescriptor> {
    offsets
        .into_iter()
        .map(|off| comp(off, stride, pixel_stride, 8, 0, 0))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/frame/format.rs"]
mod tests;

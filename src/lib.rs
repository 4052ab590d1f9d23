//! qrstamp burns a QR code carrying per-frame metadata into raw video frames, in place.
//!
//! # Pipeline overview
//!
//! For every frame:
//!
//! 1. **Format**: `Template + MetadataSnapshot -> payload` (`%t`, `%n`, `%f`, ... escapes)
//! 2. **Encode**: `payload -> ModuleMatrix` through a [`SymbolEncoder`] (the `qrcode` crate by
//!    default). A failed encode skips the frame and leaves it untouched.
//! 3. **Resolve**: `frame size + RenderConfig + matrix side -> Geometry`, shrinking the scale
//!    and pulling the origin back until the symbol fits inside the frame.
//! 4. **Composite**: paint background and modules into every component, mapped through the
//!    component's subsampling. RGB and gray components get the black/white pattern; YUV chroma
//!    is held at the neutral mid-value.
//!
//! [`QrOverlay::stamp`] runs all four steps. Frames are described by [`FrameInfo`] (one
//! [`PlaneDescriptor`] per color component) and borrowed as [`VideoFrameMut`], which is
//! validated before any byte is written.
//!
//! Logging goes through `tracing`; install a subscriber to see it.
#![forbid(unsafe_code)]

mod foundation;
mod frame;
mod overlay;
mod payload;
mod render;
mod symbol;

pub use foundation::core::Fps;
pub use foundation::error::{QrStampError, QrStampResult};
pub use frame::format::{ColorModel, PixelFormat};
pub use frame::video::{FrameInfo, MAX_SUB_SHIFT, PlaneDescriptor, VideoFrameMut};
pub use overlay::settings::{
    DEFAULT_BORDER, DEFAULT_SCALE, DEFAULT_X, DEFAULT_Y, MAX_COORD, MAX_SCALE, OverlaySettings,
};
pub use overlay::stamper::{QrOverlay, SkipReason, StampOutcome};
pub use payload::template::{
    DEFAULT_TEMPLATE, DroppedEscape, Field, LEGACY_TEMPLATE, MetadataSnapshot, Template,
    format_payload,
};
pub use render::composite::{PlaneFootprint, PlaneRect, composite_plane};
pub use render::geometry::{Geometry, RenderConfig, resolve};
pub use symbol::encoder::{
    EncodeMode, EncodeParams, ErrorCorrection, MAX_VERSION, QrcodeEncoder, SymbolEncoder,
};
pub use symbol::matrix::{DARK, LIGHT, ModuleMatrix};

use crate::foundation::error::{QrStampError, QrStampResult};
use crate::frame::video::VideoFrameMut;
use crate::overlay::settings::OverlaySettings;
use crate::payload::template::{MetadataSnapshot, Template};
use crate::render::composite::composite_plane;
use crate::render::geometry::{Geometry, resolve};
use crate::symbol::encoder::{QrcodeEncoder, SymbolEncoder};

/// Why a frame passed through without a symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The encoder rejected the payload (too long, invalid for the mode, ...).
    EncoderFailed(String),
    /// The encoder produced a matrix with no modules.
    EmptyMatrix,
}

/// Result of one [`QrOverlay::stamp`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StampOutcome {
    Stamped { geometry: Geometry, payload_len: usize },
    Skipped(SkipReason),
}

impl StampOutcome {
    pub fn is_stamped(&self) -> bool {
        matches!(self, StampOutcome::Stamped { .. })
    }
}

/// Burns a QR symbol carrying frame metadata into video frames, one frame at a time.
#[derive(Debug)]
pub struct QrOverlay<E = QrcodeEncoder> {
    settings: OverlaySettings,
    template: Template,
    encoder: E,
}

impl QrOverlay<QrcodeEncoder> {
    pub fn new(settings: OverlaySettings) -> QrStampResult<Self> {
        Self::with_encoder(settings, QrcodeEncoder)
    }
}

impl<E: SymbolEncoder> QrOverlay<E> {
    pub fn with_encoder(settings: OverlaySettings, encoder: E) -> QrStampResult<Self> {
        settings.validate()?;
        let template = parse_template(settings.template());
        Ok(Self {
            settings,
            template,
            encoder,
        })
    }

    pub fn settings(&self) -> &OverlaySettings {
        &self.settings
    }

    /// Swap in new settings between frames.
    pub fn set_settings(&mut self, settings: OverlaySettings) -> QrStampResult<()> {
        settings.validate()?;
        if settings.template() != self.template.source() {
            self.template = parse_template(settings.template());
        }
        self.settings = settings;
        Ok(())
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Render the payload for `meta` without touching any frame.
    pub fn payload(&self, meta: &MetadataSnapshot) -> String {
        self.template.render(meta)
    }

    /// Format, encode, place and paint the symbol for one frame.
    ///
    /// Encoder failures are not errors: the frame is left untouched and the outcome says why.
    /// A symbol that cannot fit the frame even at scale 1 is a geometry error, reported before
    /// any write.
    #[tracing::instrument(
        level = "trace",
        skip_all,
        fields(frame = meta.frame_number, format = %frame.info().format_name)
    )]
    pub fn stamp(
        &self,
        frame: &mut VideoFrameMut<'_>,
        meta: &MetadataSnapshot,
    ) -> QrStampResult<StampOutcome> {
        let payload = self.template.render(meta);

        let matrix = match self.encoder.encode(payload.as_bytes(), self.settings.encoding()) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    payload_len = payload.len(),
                    "skipping frame: encode failed"
                );
                return Ok(StampOutcome::Skipped(SkipReason::EncoderFailed(e.to_string())));
            }
        };
        if matrix.is_empty() {
            tracing::debug!("skipping frame: empty module matrix");
            return Ok(StampOutcome::Skipped(SkipReason::EmptyMatrix));
        }

        let qrwidth = u32::try_from(matrix.width()).map_err(|_| {
            QrStampError::geometry(format!("module matrix side {} overflows", matrix.width()))
        })?;
        let geometry = resolve(
            frame.width(),
            frame.height(),
            qrwidth,
            &self.settings.render_config(),
        )?;
        tracing::debug!(
            scale = geometry.scale,
            x = geometry.origin_x,
            y = geometry.origin_y,
            size = geometry.total_px,
            "resolved placement"
        );

        let (info, data) = frame.parts_mut();
        for (idx, plane) in info.planes.iter().enumerate() {
            composite_plane(
                data,
                plane,
                &geometry,
                &matrix,
                info.color_model.is_full_contrast(idx),
            )?;
        }

        Ok(StampOutcome::Stamped {
            geometry,
            payload_len: payload.len(),
        })
    }
}

fn parse_template(source: &str) -> Template {
    let template = Template::parse(source);
    for d in template.dropped() {
        match d.code {
            Some(code) => {
                tracing::warn!(offset = d.offset, %code, "unrecognized template escape is dropped")
            }
            None => tracing::warn!(offset = d.offset, "trailing '%' in template is dropped"),
        }
    }
    template
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/stamper.rs"]
mod tests;

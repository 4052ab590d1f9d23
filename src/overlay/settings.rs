use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::error::{QrStampError, QrStampResult};
use crate::payload::template::DEFAULT_TEMPLATE;
use crate::render::geometry::RenderConfig;
use crate::symbol::encoder::EncodeParams;

pub const DEFAULT_SCALE: u32 = 1;
pub const DEFAULT_X: u32 = 10;
pub const DEFAULT_Y: u32 = 10;
pub const DEFAULT_BORDER: u32 = 2;

pub const MAX_SCALE: u32 = u8::MAX as u32;
/// Upper bound for positions and border width.
pub const MAX_COORD: u32 = i32::MAX as u32;

/// Configuration surface of the overlay.
///
/// JSON keys: `scale`, `x`, `y`, `border`, `format` and `encoding`. Missing keys take their
/// defaults; unknown keys are rejected.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlaySettings {
    scale: u32,
    x: u32,
    y: u32,
    border: u32,
    #[serde(rename = "format")]
    template: String,
    encoding: EncodeParams,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            x: DEFAULT_X,
            y: DEFAULT_Y,
            border: DEFAULT_BORDER,
            template: DEFAULT_TEMPLATE.to_owned(),
            encoding: EncodeParams::default(),
        }
    }
}

impl OverlaySettings {
    /// Parse settings from a JSON reader and validate them.
    pub fn from_reader<R: std::io::Read>(r: R) -> QrStampResult<Self> {
        let settings: Self = serde_json::from_reader(r)
            .map_err(|e| QrStampError::serde(format!("parse overlay settings JSON: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> QrStampResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            QrStampError::validation(format!("open settings JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn to_json(&self) -> QrStampResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| QrStampError::serde(format!("serialize overlay settings: {e}")))
    }

    pub fn validate(&self) -> QrStampResult<()> {
        check_range("scale", self.scale, 1, MAX_SCALE)?;
        check_range("x", self.x, 0, MAX_COORD)?;
        check_range("y", self.y, 0, MAX_COORD)?;
        check_range("border", self.border, 0, MAX_COORD)?;
        self.encoding.validate()
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: u32) -> QrStampResult<()> {
        check_range("scale", scale, 1, MAX_SCALE)?;
        self.scale = scale;
        Ok(())
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn set_x(&mut self, x: u32) -> QrStampResult<()> {
        check_range("x", x, 0, MAX_COORD)?;
        self.x = x;
        Ok(())
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    pub fn set_y(&mut self, y: u32) -> QrStampResult<()> {
        check_range("y", y, 0, MAX_COORD)?;
        self.y = y;
        Ok(())
    }

    pub fn border(&self) -> u32 {
        self.border
    }

    pub fn set_border(&mut self, border: u32) -> QrStampResult<()> {
        check_range("border", border, 0, MAX_COORD)?;
        self.border = border;
        Ok(())
    }

    /// Payload template (see [`crate::Template`]).
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn set_template(&mut self, template: impl Into<String>) {
        self.template = template.into();
    }

    pub fn encoding(&self) -> &EncodeParams {
        &self.encoding
    }

    pub fn set_encoding(&mut self, encoding: EncodeParams) -> QrStampResult<()> {
        encoding.validate()?;
        self.encoding = encoding;
        Ok(())
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            scale: self.scale,
            border: self.border,
            x: self.x,
            y: self.y,
        }
    }
}

fn check_range(name: &str, value: u32, min: u32, max: u32) -> QrStampResult<()> {
    if value < min || value > max {
        return Err(QrStampError::validation(format!(
            "{name} must be in {min}..={max}, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/settings.rs"]
mod tests;

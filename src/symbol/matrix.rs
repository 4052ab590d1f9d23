use crate::foundation::error::{QrStampError, QrStampResult};

/// Module code for a dark module (bit 0 clear).
pub const DARK: u8 = 0;
/// Module code for a light module (bit 0 set).
pub const LIGHT: u8 = 1;

/// Square grid of QR modules, row-major.
///
/// Only bit 0 of each code is significant: clear means dark, set means light.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleMatrix {
    width: usize,
    modules: Vec<u8>,
}

impl ModuleMatrix {
    pub fn new(width: usize, modules: Vec<u8>) -> QrStampResult<Self> {
        let expected = width
            .checked_mul(width)
            .ok_or_else(|| QrStampError::validation("module matrix side overflows"))?;
        if modules.len() != expected {
            return Err(QrStampError::validation(format!(
                "module matrix of side {width} needs {expected} codes, got {}",
                modules.len()
            )));
        }
        Ok(Self { width, modules })
    }

    /// Side length in modules.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0
    }

    pub fn modules(&self) -> &[u8] {
        &self.modules
    }

    pub fn is_light(&self, row: usize, col: usize) -> bool {
        self.modules[row * self.width + col] & 1 == 1
    }

    /// One row of module codes.
    pub fn row(&self, row: usize) -> &[u8] {
        &self.modules[row * self.width..(row + 1) * self.width]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/symbol/matrix.rs"]
mod tests;

use crate::foundation::error::{QrStampError, QrStampResult};

/// Rational framerate. `0/1` marks a variable framerate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> QrStampResult<Self> {
        if den == 0 {
            return Err(QrStampError::validation("Fps den must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn variable() -> Self {
        Self { num: 0, den: 1 }
    }

    pub fn is_variable(self) -> bool {
        self.num == 0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Presentation time of frame `index` in microseconds, `None` for variable rates.
    pub fn frame_to_us(self, index: u64) -> Option<u64> {
        if self.is_variable() {
            return None;
        }
        let us = u128::from(index) * 1_000_000 * u128::from(self.den) / u128::from(self.num);
        u64::try_from(us).ok()
    }
}

impl std::str::FromStr for Fps {
    type Err = QrStampError;

    /// Parses `N/D` or a bare integer `N` (meaning `N/1`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (num, den) = match s.split_once('/') {
            Some((n, d)) => (n.trim(), d.trim()),
            None => (s.trim(), "1"),
        };
        let num = num
            .parse::<u32>()
            .map_err(|e| QrStampError::validation(format!("invalid fps numerator '{num}': {e}")))?;
        let den = den.parse::<u32>().map_err(|e| {
            QrStampError::validation(format!("invalid fps denominator '{den}': {e}"))
        })?;
        Self::new(num, den)
    }
}

/// Map a full-resolution coordinate into a subsampled plane, rounding down.
pub(crate) fn sub_floor(v: u32, shift: u8) -> u32 {
    v.checked_shr(u32::from(shift)).unwrap_or(0)
}

/// Map a full-resolution extent into a subsampled plane, rounding up.
pub(crate) fn sub_ceil(v: u32, shift: u8) -> u32 {
    let shift = shift.min(32);
    let v = u64::from(v);
    ((v + (1u64 << shift) - 1) >> shift) as u32
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;

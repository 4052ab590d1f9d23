use qrcode::bits::Bits;
use qrcode::types::QrError;
use qrcode::{Color, EcLevel, QrCode, Version};

use crate::foundation::error::{QrStampError, QrStampResult};
use crate::symbol::matrix::{DARK, LIGHT, ModuleMatrix};

/// Highest QR symbol version.
pub const MAX_VERSION: u8 = 40;

/// Error-correction level of the symbol.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCorrection {
    L,
    #[default]
    M,
    Q,
    H,
}

impl ErrorCorrection {
    fn level(self) -> EcLevel {
        match self {
            ErrorCorrection::L => EcLevel::L,
            ErrorCorrection::M => EcLevel::M,
            ErrorCorrection::Q => EcLevel::Q,
            ErrorCorrection::H => EcLevel::H,
        }
    }
}

impl std::str::FromStr for ErrorCorrection {
    type Err = QrStampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "l" => Ok(ErrorCorrection::L),
            "m" => Ok(ErrorCorrection::M),
            "q" => Ok(ErrorCorrection::Q),
            "h" => Ok(ErrorCorrection::H),
            _ => Err(QrStampError::validation(format!(
                "unknown error-correction level '{s}' (expected l, m, q or h)"
            ))),
        }
    }
}

/// Data segment mode used for the whole payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodeMode {
    Numeric,
    Alphanumeric,
    #[default]
    Byte,
    Kanji,
}

/// Parameters handed to a [`SymbolEncoder`] along with the payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodeParams {
    /// Symbol version; 0 picks the smallest version that fits.
    pub version: u8,
    pub ec_level: ErrorCorrection,
    pub mode: EncodeMode,
    /// When false, ASCII letters are upper-cased before encoding (except in Kanji mode).
    pub case_sensitive: bool,
}

impl Default for EncodeParams {
    fn default() -> Self {
        Self {
            version: 0,
            ec_level: ErrorCorrection::M,
            mode: EncodeMode::Byte,
            case_sensitive: true,
        }
    }
}

impl EncodeParams {
    pub fn validate(&self) -> QrStampResult<()> {
        if self.version > MAX_VERSION {
            return Err(QrStampError::validation(format!(
                "QR version must be 0 (auto) or 1..={MAX_VERSION}, got {}",
                self.version
            )));
        }
        Ok(())
    }
}

/// Turns payload bytes into a module matrix. The matrix generator is a black box to the
/// overlay; failures make the overlay skip the frame.
pub trait SymbolEncoder {
    fn encode(&self, payload: &[u8], params: &EncodeParams) -> QrStampResult<ModuleMatrix>;
}

/// [`SymbolEncoder`] backed by the `qrcode` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct QrcodeEncoder;

impl SymbolEncoder for QrcodeEncoder {
    fn encode(&self, payload: &[u8], params: &EncodeParams) -> QrStampResult<ModuleMatrix> {
        params.validate()?;

        // Kanji trail bytes overlap ASCII letters, so they are never case-folded.
        let data = if params.case_sensitive || params.mode == EncodeMode::Kanji {
            payload.to_vec()
        } else {
            payload.to_ascii_uppercase()
        };
        check_alphabet(&data, params.mode)?;

        let ec = params.ec_level.level();
        let bits = if params.version == 0 {
            smallest_fit(&data, params.mode, ec)?
        } else {
            build_bits(&data, Version::Normal(i16::from(params.version)), params.mode, ec)
                .map_err(|e| encode_error(e, params.version))?
        };
        let code = QrCode::with_bits(bits, ec).map_err(|e| encode_error(e, params.version))?;

        let modules = code
            .to_colors()
            .into_iter()
            .map(|c| match c {
                Color::Dark => DARK,
                Color::Light => LIGHT,
            })
            .collect();
        ModuleMatrix::new(code.width(), modules)
    }
}

fn build_bits(
    data: &[u8],
    version: Version,
    mode: EncodeMode,
    ec: EcLevel,
) -> Result<Bits, QrError> {
    let mut bits = Bits::new(version);
    match mode {
        EncodeMode::Numeric => bits.push_numeric_data(data)?,
        EncodeMode::Alphanumeric => bits.push_alphanumeric_data(data)?,
        EncodeMode::Byte => bits.push_byte_data(data)?,
        EncodeMode::Kanji => bits.push_kanji_data(data)?,
    }
    bits.push_terminator(ec)?;
    Ok(bits)
}

fn smallest_fit(data: &[u8], mode: EncodeMode, ec: EcLevel) -> QrStampResult<Bits> {
    for v in 1..=MAX_VERSION {
        match build_bits(data, Version::Normal(i16::from(v)), mode, ec) {
            Ok(bits) => return Ok(bits),
            Err(QrError::DataTooLong) => continue,
            Err(e) => return Err(encode_error(e, v)),
        }
    }
    Err(QrStampError::encode(format!(
        "payload of {} bytes does not fit any QR version",
        data.len()
    )))
}

fn check_alphabet(data: &[u8], mode: EncodeMode) -> QrStampResult<()> {
    let ok = match mode {
        EncodeMode::Numeric => data.iter().all(u8::is_ascii_digit),
        EncodeMode::Alphanumeric => data
            .iter()
            .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase() || b" $%*+-./:".contains(b)),
        EncodeMode::Kanji => {
            data.len() % 2 == 0
                && data.chunks_exact(2).all(|pair| {
                    let code = u16::from_be_bytes([pair[0], pair[1]]);
                    matches!(code, 0x8140..=0x9FFC | 0xE040..=0xEBBF)
                })
        }
        EncodeMode::Byte => true,
    };
    if ok {
        Ok(())
    } else {
        Err(QrStampError::encode(format!(
            "payload contains characters outside the {mode:?} alphabet"
        )))
    }
}

fn encode_error(e: QrError, version: u8) -> QrStampError {
    QrStampError::encode(format!("QR version {version}: {e}"))
}

#[cfg(test)]
#[path = "../../tests/unit/symbol/encoder.rs"]
mod tests;

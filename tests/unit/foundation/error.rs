use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        QrStampError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        QrStampError::geometry("x")
            .to_string()
            .contains("geometry error:")
    );
    assert!(
        QrStampError::encode("x")
            .to_string()
            .contains("encode error:")
    );
    assert!(
        QrStampError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = QrStampError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

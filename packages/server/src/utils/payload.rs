use base64::Engine;
use base64::engine::general_purpose::STANDARD;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Image content must not be empty")]
    Empty,
    #[error("Image content is not valid base64: {0}")]
    InvalidBase64(String),
    #[error("Image is too large ({actual} > {limit} bytes)")]
    TooLarge { actual: u64, limit: u64 },
}

/// Decode a base64 image payload.
///
/// Accepts an optional `data:<type>;base64,` prefix and ignores ASCII
/// whitespace, so line-wrapped encoder output decodes as-is.
pub fn decode_base64_payload(raw: &str, max_size: u64) -> Result<Vec<u8>, PayloadError> {
    let body = match raw.trim_start().strip_prefix("data:") {
        Some(rest) => rest
            .split_once(";base64,")
            .map(|(_, data)| data)
            .ok_or_else(|| PayloadError::InvalidBase64("data URI is not base64".into()))?,
        None => raw,
    };

    let compact: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Err(PayloadError::Empty);
    }

    // Reject before decoding anything that cannot fit.
    let estimated = (compact.len() as u64 / 4) * 3;
    if estimated > max_size.saturating_add(2) {
        return Err(PayloadError::TooLarge {
            actual: estimated,
            limit: max_size,
        });
    }

    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| PayloadError::InvalidBase64(e.to_string()))?;

    if bytes.is_empty() {
        return Err(PayloadError::Empty);
    }
    if bytes.len() as u64 > max_size {
        return Err(PayloadError::TooLarge {
            actual: bytes.len() as u64,
            limit: max_size,
        });
    }
    Ok(bytes)
}

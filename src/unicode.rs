//! The UTF-8 validation boundary and the UTF-8 ↔ UTF-32 codepoint
//! conversions the string module's callers rely on.
//!
//! Case mapping and collation tables are an external collaborator per this
//! crate's scope (see the crate-level docs) — this module only covers
//! encoding validity and codepoint round-tripping, both of which Rust's
//! standard library already implements to the same quality the spec asks
//! for from "any equivalent high-quality implementation."

use crate::error::PolyError;

/// Validates that `bytes` is well-formed UTF-8.
///
/// Returns `Ok(())` if valid, or `Err` with the byte offset of the first
/// invalid byte otherwise. Never panics or aborts — this is the one
/// genuinely recoverable encoding error this crate's error taxonomy names.
pub fn validate_utf8(bytes: &[u8]) -> Result<(), PolyError> {
    match std::str::from_utf8(bytes) {
        Ok(_) => Ok(()),
        Err(e) => Err(PolyError::InvalidUtf8 {
            offset: e.valid_up_to(),
        }),
    }
}

/// Decodes well-formed UTF-8 into a sequence of UTF-32 codepoints.
///
/// # Errors
/// Returns [`PolyError::InvalidUtf8`] at the offset of the first invalid
/// byte if `bytes` is not valid UTF-8.
pub fn utf8_to_utf32(bytes: &[u8]) -> Result<Vec<u32>, PolyError> {
    let s = std::str::from_utf8(bytes).map_err(|e| PolyError::InvalidUtf8 {
        offset: e.valid_up_to(),
    })?;
    Ok(s.chars().map(|c| c as u32).collect())
}

/// Encodes a sequence of UTF-32 codepoints back into UTF-8 bytes.
///
/// # Errors
/// Returns [`PolyError::InvalidUtf8`] (offset is the codepoint's index, not
/// a byte offset — there is no byte stream yet to offset into) if any
/// codepoint is not a valid Unicode scalar value, e.g. a surrogate half.
pub fn utf32_to_utf8(code_points: &[u32]) -> Result<Vec<u8>, PolyError> {
    let mut out = String::with_capacity(code_points.len());
    for (i, &cp) in code_points.iter().enumerate() {
        match char::from_u32(cp) {
            Some(c) => out.push(c),
            None => return Err(PolyError::InvalidUtf8 { offset: i }),
        }
    }
    Ok(out.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_well_formed_utf8() {
        assert!(validate_utf8("héllo wörld".as_bytes()).is_ok());
        assert!(validate_utf8(b"").is_ok());
    }

    #[test]
    fn validate_reports_the_offset_of_the_first_invalid_byte() {
        let mut bytes = b"ok-".to_vec();
        bytes.push(0xFF);
        let err = validate_utf8(&bytes).unwrap_err();
        match err {
            PolyError::InvalidUtf8 { offset } => assert_eq!(offset, 3),
            other => panic!("expected InvalidUtf8, got {other:?}"),
        }
    }

    #[test]
    fn utf8_utf32_utf8_round_trips_bit_identical_bytes() {
        let samples: &[&[u8]] = &[
            b"",
            b"hello",
            "héllo wörld".as_bytes(),
            "日本語のテキスト".as_bytes(),
            "emoji: \u{1F600}\u{1F4A9}".as_bytes(),
        ];
        for &sample in samples {
            let codepoints = utf8_to_utf32(sample).expect("sample is valid utf-8");
            let reencoded = utf32_to_utf8(&codepoints).expect("codepoints are valid scalars");
            assert_eq!(reencoded, sample);
        }
    }

    #[test]
    fn invalid_utf8_is_rejected_without_panicking() {
        let bytes = [0xC0, 0x80]; // overlong encoding, never valid
        assert!(utf8_to_utf32(&bytes).is_err());
    }

    #[test]
    fn surrogate_half_codepoints_are_rejected() {
        let err = utf32_to_utf8(&[0xD800]).unwrap_err();
        match err {
            PolyError::InvalidUtf8 { offset } => assert_eq!(offset, 0),
            other => panic!("expected InvalidUtf8, got {other:?}"),
        }
    }
}

//! Framed-transport codec (C1, spec.md §4.1).
//!
//! An SHDLC-style framing: `0x7E` delimiters, `0x7D` byte-stuffing over the
//! reserved set `{0x7E, 0x7D, 0x11, 0x13}` via XOR `0x20`, and a one's
//! complement checksum. Grounded on the original firmware's `shdlc.c`
//! (`SHDLC_CalculateDataSize`, `SHDLC_revertByteStuffing`) for decode, and on
//! `dvdsk-sps30-async`'s `checksum`/`hldc` module for the idiomatic Rust
//! shape of the encode side.

use crate::error::CodecError;

const FLAG: u8 = 0x7E;
const ESCAPE: u8 = 0x7D;
const XOR: u8 = 0x20;

fn needs_escaping(byte: u8) -> bool {
    matches!(byte, 0x7E | 0x7D | 0x11 | 0x13)
}

/// Checksum over the unescaped payload: the bitwise NOT of the low byte of
/// the sum of all bytes (spec.md §4.1; matches `255 - cksum` in the
/// reference SPS30 driver).
pub fn checksum(data: &[u8]) -> u8 {
    let sum: u8 = data.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    !sum
}

/// Encodes `payload` (already including address/command/length/data, but not
/// the checksum or delimiters) into a framed, byte-stuffed message ready for
/// the wire.
pub fn encode(payload: &[u8]) -> Vec<u8> {
    let chk = checksum(payload);

    let mut out = Vec::with_capacity(payload.len() + 4);
    out.push(FLAG);
    for &byte in payload.iter().chain(std::iter::once(&chk)) {
        if needs_escaping(byte) {
            out.push(ESCAPE);
            out.push(byte ^ XOR);
        } else {
            out.push(byte);
        }
    }
    out.push(FLAG);
    out
}

/// Decodes a single framed message: strips delimiters, reverses byte
/// stuffing, and validates the checksum. Returns the payload with the
/// trailing checksum byte removed.
pub fn decode(frame: &[u8]) -> Result<Vec<u8>, CodecError> {
    let start = frame.iter().position(|&b| b == FLAG).ok_or(CodecError::Framing)?;
    let end = frame[start + 1..]
        .iter()
        .position(|&b| b == FLAG)
        .map(|i| start + 1 + i)
        .ok_or(CodecError::Framing)?;

    if end <= start + 1 {
        return Err(CodecError::Framing);
    }
    let stuffed = &frame[start + 1..end];

    let mut unstuffed = Vec::with_capacity(stuffed.len());
    let mut iter = stuffed.iter().copied();
    while let Some(byte) = iter.next() {
        if byte == ESCAPE {
            let next = iter.next().ok_or(CodecError::Stuffing)?;
            unstuffed.push(next ^ XOR);
        } else {
            unstuffed.push(byte);
        }
    }

    if unstuffed.is_empty() {
        return Err(CodecError::PayloadTooShort { need: 1, got: 0 });
    }

    let (payload, &chk) = unstuffed.split_at(unstuffed.len() - 1);
    if checksum(payload) != chk {
        return Err(CodecError::Checksum);
    }

    Ok(payload.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_plain_payload() {
        let payload = [0x00, 0x03, 0x00];
        let framed = encode(&payload);
        let decoded = decode(&framed).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn roundtrip_payload_needing_escapes() {
        let payload = [0x7E, 0x11, 0x7D, 0x13];
        let framed = encode(&payload);
        assert_eq!(framed[0], FLAG);
        assert_eq!(*framed.last().unwrap(), FLAG);
        let decoded = decode(&framed).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn missing_delimiters_is_a_framing_error() {
        let bytes = [0x01, 0x02, 0x03];
        assert_eq!(decode(&bytes), Err(CodecError::Framing));
    }

    #[test]
    fn dangling_escape_byte_is_a_stuffing_error() {
        let mut frame = vec![FLAG, 0x01, ESCAPE];
        frame.push(FLAG);
        assert_eq!(decode(&frame), Err(CodecError::Stuffing));
    }

    #[test]
    fn corrupted_checksum_is_detected() {
        let payload = [0x00, 0x03, 0x00];
        let mut framed = encode(&payload);
        let last_data_idx = framed.len() - 2;
        framed[last_data_idx] ^= 0xFF;
        assert_eq!(decode(&framed), Err(CodecError::Checksum));
    }

    #[test]
    fn checksum_matches_reference_formula() {
        let data = [0x00, 0x00, 0x02, 0x01, 0x03];
        let sum: u32 = data.iter().map(|&b| b as u32).sum();
        let expected = !(sum % 256) as u8;
        assert_eq!(checksum(&data), expected);
    }
}

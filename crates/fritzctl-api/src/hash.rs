//! Login challenge hashing.
//!
//! The device expects `"{challenge}-{md5}"` where the digest is taken over
//! the UTF-16LE encoding of `"{challenge}-{password}"`. Any deviation in the
//! byte encoding makes every login fail, so the conversion is explicit here.

use md5::{Digest, Md5};

/// Compute the login response for a challenge.
pub fn challenge_response(challenge: &str, password: &str) -> String {
    let input = format!("{challenge}-{password}");
    let digest = Md5::digest(utf16le_bytes(&input));
    format!("{challenge}-{}", unpadded_hex(&digest))
}

fn utf16le_bytes(s: &str) -> Vec<u8> {
    s.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

/// Render bytes as a big-endian unsigned integer in lowercase hex.
///
/// Leading zero digits are dropped; an all-zero input renders as `"0"`.
fn unpadded_hex(bytes: &[u8]) -> String {
    let encoded = hex::encode(bytes);
    match encoded.trim_start_matches('0') {
        "" => "0".into(),
        trimmed => trimmed.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_vector() {
        assert_eq!(
            challenge_response("1234567z", "testpwd"),
            "1234567z-650b72c6ff7576d7721daa519760126d"
        );
    }

    #[test]
    fn leading_zero_nibble_is_not_padded() {
        // md5 of this input starts with 0x08
        assert_eq!(
            challenge_response("00000009", "testpwd"),
            "00000009-8c9e97fb36dc6c1109b52c9ec5af284"
        );
    }

    #[test]
    fn non_ascii_password_is_utf16_encoded() {
        assert_eq!(
            challenge_response("1234567z", "äbc"),
            "1234567z-9e224a41eeefa284df7bb0f26c2913e2"
        );
    }

    #[test]
    fn utf16le_interleaves_zero_bytes_for_ascii() {
        assert_eq!(utf16le_bytes("ab-"), vec![b'a', 0, b'b', 0, b'-', 0]);
    }

    #[test]
    fn unpadded_hex_edge_cases() {
        assert_eq!(unpadded_hex(&[0, 0]), "0");
        assert_eq!(unpadded_hex(&[0, 0x0a, 0xff]), "aff");
        assert_eq!(unpadded_hex(&[0x10]), "10");
    }

    #[test]
    fn unpadded_hex_keeps_inner_and_trailing_zeros() {
        assert_eq!(unpadded_hex(&[0x00, 0x01, 0x00]), "100");
        assert_eq!(unpadded_hex(&[0xab, 0x00]), "ab00");
        assert_eq!(unpadded_hex(&[]), "0");
    }
}

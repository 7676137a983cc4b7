//! Control protocol encoding and decoding
//!
//! Wire format: one frame per connection, text fields joined by a single
//! delimiter byte (ASCII backspace). There is no length prefix and no
//! escaping; fields must not contain the delimiter byte themselves. This
//! is a constraint on allowed argument content, not something the codec
//! checks.

use std::fmt;

/// Byte separating fields on the wire. Chosen because it is extremely
/// unlikely to appear in command-line arguments.
pub const FIELD_DELIMITER: u8 = 0x08;

/// Maximum allowed message size (64KB)
pub const MAX_MESSAGE_SIZE: usize = 64 * 1024;

/// Protocol errors
#[derive(Debug)]
pub enum ProtocolError {
    /// Message exceeds maximum allowed size
    MessageTooLarge(usize),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::MessageTooLarge(size) => {
                write!(
                    f,
                    "Message too large: {} bytes (max: {})",
                    size, MAX_MESSAGE_SIZE
                )
            }
        }
    }
}

impl std::error::Error for ProtocolError {}

/// Encode an ordered field sequence into one wire frame
pub fn encode(fields: &[String]) -> Result<Vec<u8>, ProtocolError> {
    let size: usize =
        fields.iter().map(String::len).sum::<usize>() + fields.len().saturating_sub(1);
    if size > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge(size));
    }

    let mut buf = Vec::with_capacity(size);
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            buf.push(FIELD_DELIMITER);
        }
        buf.extend_from_slice(field.as_bytes());
    }
    Ok(buf)
}

/// Decode a wire frame into its ordered field sequence
///
/// Splits on the delimiter byte only; no trimming or validation is
/// performed. Non-UTF-8 bytes are replaced lossily.
pub fn decode(payload: &[u8]) -> Vec<String> {
    payload
        .split(|b| *b == FIELD_DELIMITER)
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn encode_decode_roundtrip() {
        let original = fields(&["-f", "%{time} %{message}"]);
        let encoded = encode(&original).unwrap();
        assert_eq!(decode(&encoded), original);
    }

    #[test]
    fn single_field_has_no_delimiter() {
        let encoded = encode(&fields(&["-q"])).unwrap();
        assert_eq!(encoded, b"-q");
        assert_eq!(decode(&encoded), fields(&["-q"]));
    }

    #[test]
    fn fields_may_contain_spaces_and_semicolons() {
        let original = fields(&["-r", "a=debug;b=info"]);
        let encoded = encode(&original).unwrap();
        assert_eq!(encoded.iter().filter(|b| **b == FIELD_DELIMITER).count(), 1);
        assert_eq!(decode(&encoded), original);
    }

    #[test]
    fn empty_payload_decodes_to_one_empty_field() {
        // Degenerate input; the dispatcher rejects it as malformed
        assert_eq!(decode(b""), fields(&[""]));
    }

    #[test]
    fn oversize_message_is_rejected() {
        let big = fields(&["-f", &"x".repeat(MAX_MESSAGE_SIZE)]);
        assert!(matches!(
            encode(&big),
            Err(ProtocolError::MessageTooLarge(_))
        ));
    }
}

//! Wire format primitives shared by the descriptor decoder and encoder.

use bytes::BufMut;

use crate::Error;

/// Denotes the type of a field in an encoded protobuf message.
///
/// Protobuf messages are a series of key-value pairs. When encoded each key-value pair
/// is turned into a record consisting of a field number, a [`WireType`], and a payload.
/// The [`WireType`] indicates how large the proceeding payload is.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum WireType {
    /// Variable length integer.
    Varint = 0,
    /// 64-bit integer.
    I64 = 1,
    /// Variable length field.
    Len = 2,
    /// Group start (deprecated).
    SGroup = 3,
    /// Group end (deprecated).
    EGroup = 4,
    /// 32-bit integer.
    I32 = 5,
}

impl TryFrom<u8> for WireType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        match value {
            0 => Ok(Self::Varint),
            1 => Ok(Self::I64),
            2 => Ok(Self::Len),
            3 => Ok(Self::SGroup),
            4 => Ok(Self::EGroup),
            5 => Ok(Self::I32),
            _ => Err(Error::InvalidWireType(value)),
        }
    }
}

/// Encode a varint (LEB128).
pub fn encode_varint(mut value: u64, buf: &mut impl BufMut) {
    while value >= 0x80 {
        buf.put_u8((value as u8 & 0x7F) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

/// Encode a field key (tag number + wire type).
pub fn encode_key(field_number: u32, wire_type: WireType, buf: &mut impl BufMut) {
    encode_varint(((field_number as u64) << 3) | wire_type as u64, buf);
}

/// Encode a length-delimited payload under `field_number`.
pub fn encode_bytes(field_number: u32, payload: &[u8], buf: &mut impl BufMut) {
    encode_key(field_number, WireType::Len, buf);
    encode_varint(payload.len() as u64, buf);
    buf.put_slice(payload);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_valid_values() {
        for i in u8::MIN..u8::MAX {
            let wire_type = WireType::try_from(i);
            match (i, wire_type) {
                (0, Ok(WireType::Varint))
                | (1, Ok(WireType::I64))
                | (2, Ok(WireType::Len))
                | (3, Ok(WireType::SGroup))
                | (4, Ok(WireType::EGroup))
                | (5, Ok(WireType::I32)) => (),
                (_, Err(Error::InvalidWireType(v))) => assert_eq!(v, i),
                other => panic!("unexpected value {other:?}"),
            }
        }
    }

    #[test]
    fn test_encode_varint() {
        let mut buf = Vec::new();
        encode_varint(1, &mut buf);
        assert_eq!(buf, [0x01]);

        let mut buf = Vec::new();
        encode_varint(300, &mut buf);
        assert_eq!(buf, [0xAC, 0x02]);

        let mut buf = Vec::new();
        encode_varint(u64::MAX, &mut buf);
        assert_eq!(buf, [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]);
    }

    #[test]
    fn test_encode_key() {
        let mut buf = Vec::new();
        encode_key(15, WireType::Len, &mut buf);
        assert_eq!(buf, [0x7A]);
    }
}

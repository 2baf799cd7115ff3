//! Decoder for plugin requests and descriptor sets from protobuf binary format.

use bytes::Buf;

use super::wire::WireType;
use super::*;
use crate::Error;

/// Maximum size for a single message (64MB).
/// This prevents DoS attacks from malicious input with huge length values.
const MAX_MESSAGE_SIZE: usize = 64 * 1024 * 1024;

/// Maximum bytes for a 64-bit varint (10 bytes).
const MAX_VARINT_BYTES: usize = 10;

/// Maximum nesting of message types inside one another.
const MAX_NESTING_DEPTH: usize = 100;

/// Decode a CodeGeneratorRequest as written to a plugin's stdin.
pub fn decode_code_generator_request(data: &[u8]) -> Result<CodeGeneratorRequest, Error> {
    let mut buf = data;
    let mut req = CodeGeneratorRequest::default();

    while buf.has_remaining() {
        let (field_number, wire_type) = decode_key(&mut buf)?;
        match field_number {
            1 => req.file_to_generate.push(decode_string(&mut buf)?),
            2 => req.parameter = Some(decode_string(&mut buf)?),
            3 => req.compiler_version = Some(decode_version(decode_slice(&mut buf)?)?),
            15 => req
                .proto_file
                .push(decode_file_descriptor_proto(decode_slice(&mut buf)?)?),
            _ => skip_field(&mut buf, wire_type)?,
        }
    }

    Ok(req)
}

/// Decode a FileDescriptorSet, as written by `protoc --descriptor_set_out`.
pub fn decode_file_descriptor_set(data: &[u8]) -> Result<FileDescriptorSet, Error> {
    let mut buf = data;
    let mut fds = FileDescriptorSet::default();

    while buf.has_remaining() {
        let (field_number, wire_type) = decode_key(&mut buf)?;
        match field_number {
            1 => fds
                .file
                .push(decode_file_descriptor_proto(decode_slice(&mut buf)?)?),
            _ => skip_field(&mut buf, wire_type)?,
        }
    }

    Ok(fds)
}

/// Decode a compiler Version.
fn decode_version(data: &[u8]) -> Result<Version, Error> {
    let mut buf = data;
    let mut version = Version::default();

    while buf.has_remaining() {
        let (field_number, wire_type) = decode_key(&mut buf)?;
        match field_number {
            1 => version.major = Some(decode_varint(&mut buf)? as i32),
            2 => version.minor = Some(decode_varint(&mut buf)? as i32),
            3 => version.patch = Some(decode_varint(&mut buf)? as i32),
            4 => version.suffix = Some(decode_string(&mut buf)?),
            _ => skip_field(&mut buf, wire_type)?,
        }
    }

    Ok(version)
}

/// Decode a FileDescriptorProto.
fn decode_file_descriptor_proto(data: &[u8]) -> Result<FileDescriptorProto, Error> {
    let mut buf = data;
    let mut fdp = FileDescriptorProto::default();

    while buf.has_remaining() {
        let (field_number, wire_type) = decode_key(&mut buf)?;
        match field_number {
            1 => fdp.name = Some(decode_string(&mut buf)?),
            2 => fdp.package = Some(decode_string(&mut buf)?),
            3 => fdp.dependency.push(decode_string(&mut buf)?),
            4 => fdp
                .message_type
                .push(decode_descriptor_proto(decode_slice(&mut buf)?, 0)?),
            5 => fdp
                .enum_type
                .push(decode_enum_descriptor_proto(decode_slice(&mut buf)?)?),
            12 => fdp.syntax = Some(decode_string(&mut buf)?),
            _ => skip_field(&mut buf, wire_type)?,
        }
    }

    Ok(fdp)
}

/// Decode a DescriptorProto (message type) nested `depth` levels deep.
fn decode_descriptor_proto(data: &[u8], depth: usize) -> Result<DescriptorProto, Error> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(Error::Decode(format!(
            "message nesting exceeds {} levels",
            MAX_NESTING_DEPTH
        )));
    }

    let mut buf = data;
    let mut dp = DescriptorProto::default();

    while buf.has_remaining() {
        let (field_number, wire_type) = decode_key(&mut buf)?;
        match field_number {
            1 => dp.name = Some(decode_string(&mut buf)?),
            2 => dp
                .field
                .push(decode_field_descriptor_proto(decode_slice(&mut buf)?)?),
            3 => dp
                .nested_type
                .push(decode_descriptor_proto(decode_slice(&mut buf)?, depth + 1)?),
            4 => dp
                .enum_type
                .push(decode_enum_descriptor_proto(decode_slice(&mut buf)?)?),
            _ => skip_field(&mut buf, wire_type)?,
        }
    }

    Ok(dp)
}

/// Decode a FieldDescriptorProto.
fn decode_field_descriptor_proto(data: &[u8]) -> Result<FieldDescriptorProto, Error> {
    let mut buf = data;
    let mut fdp = FieldDescriptorProto::default();

    while buf.has_remaining() {
        let (field_number, wire_type) = decode_key(&mut buf)?;
        match field_number {
            1 => fdp.name = Some(decode_string(&mut buf)?),
            3 => fdp.number = Some(decode_varint(&mut buf)? as i32),
            4 => fdp.label = Some(decode_varint(&mut buf)? as i32),
            5 => fdp.r#type = Some(decode_varint(&mut buf)? as i32),
            6 => fdp.type_name = Some(decode_string(&mut buf)?),
            _ => skip_field(&mut buf, wire_type)?,
        }
    }

    Ok(fdp)
}

/// Decode an EnumDescriptorProto.
fn decode_enum_descriptor_proto(data: &[u8]) -> Result<EnumDescriptorProto, Error> {
    let mut buf = data;
    let mut edp = EnumDescriptorProto::default();

    while buf.has_remaining() {
        let (field_number, wire_type) = decode_key(&mut buf)?;
        match field_number {
            1 => edp.name = Some(decode_string(&mut buf)?),
            2 => edp
                .value
                .push(decode_enum_value_descriptor_proto(decode_slice(&mut buf)?)?),
            _ => skip_field(&mut buf, wire_type)?,
        }
    }

    Ok(edp)
}

/// Decode an EnumValueDescriptorProto.
fn decode_enum_value_descriptor_proto(data: &[u8]) -> Result<EnumValueDescriptorProto, Error> {
    let mut buf = data;
    let mut evdp = EnumValueDescriptorProto::default();

    while buf.has_remaining() {
        let (field_number, wire_type) = decode_key(&mut buf)?;
        match field_number {
            1 => evdp.name = Some(decode_string(&mut buf)?),
            // Negative enum numbers are sign-extended to ten bytes on the wire.
            2 => evdp.number = Some(decode_varint(&mut buf)? as i32),
            _ => skip_field(&mut buf, wire_type)?,
        }
    }

    Ok(evdp)
}

/// Decode a field key (tag number + wire type).
fn decode_key(buf: &mut &[u8]) -> Result<(u32, WireType), Error> {
    let key = decode_varint(buf)?;
    let wire_type = WireType::try_from((key & 0x07) as u8)?;
    let field_number = (key >> 3) as u32;
    Ok((field_number, wire_type))
}

/// Decode a varint (LEB128) with iteration limit to prevent infinite loops.
///
/// Varints can be at most 10 bytes for 64-bit values. The 10th byte can only
/// have its lowest bit set (representing bit 63 of the result).
fn decode_varint(buf: &mut &[u8]) -> Result<u64, Error> {
    let mut result: u64 = 0;

    for i in 0..MAX_VARINT_BYTES {
        if !buf.has_remaining() {
            return Err(Error::UnexpectedEof);
        }
        let byte = buf.get_u8();
        let shift = 7 * i;

        if shift == 63 && (byte & 0x7E) != 0 {
            return Err(Error::InvalidVarint);
        }

        result |= ((byte & 0x7F) as u64) << shift;

        if byte & 0x80 == 0 {
            return Ok(result);
        }
    }

    // Continuation bit still set on the 10th byte.
    Err(Error::InvalidVarint)
}

/// Decode a length value and validate it's within bounds.
fn decode_len(buf: &mut &[u8]) -> Result<usize, Error> {
    let len = decode_varint(buf)?;
    if len > MAX_MESSAGE_SIZE as u64 {
        return Err(Error::Decode("message size exceeds maximum".into()));
    }
    let len = len as usize;
    if buf.remaining() < len {
        return Err(Error::UnexpectedEof);
    }
    Ok(len)
}

/// Split a length-delimited payload off the front of `buf`.
fn decode_slice<'a>(buf: &mut &'a [u8]) -> Result<&'a [u8], Error> {
    let len = decode_len(buf)?;
    let data: &'a [u8] = *buf;
    let (payload, rest) = data.split_at(len);
    *buf = rest;
    Ok(payload)
}

/// Decode a length-delimited string.
fn decode_string(buf: &mut &[u8]) -> Result<String, Error> {
    let payload = decode_slice(buf)?;
    std::str::from_utf8(payload)
        .map(str::to_string)
        .map_err(|_| Error::InvalidUtf8)
}

/// Skip a field based on its wire type.
fn skip_field(buf: &mut &[u8], wire_type: WireType) -> Result<(), Error> {
    let width = match wire_type {
        WireType::Varint => {
            decode_varint(buf)?;
            return Ok(());
        }
        WireType::Len => decode_len(buf)?,
        WireType::I64 => 8,
        WireType::I32 => 4,
        WireType::SGroup | WireType::EGroup => {
            return Err(Error::InvalidWireType(wire_type as u8));
        }
    };
    if buf.remaining() < width {
        return Err(Error::UnexpectedEof);
    }
    buf.advance(width);
    Ok(())
}

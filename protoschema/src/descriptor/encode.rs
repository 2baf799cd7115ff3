//! Encoder for plugin responses.

use super::wire::{encode_bytes, encode_key, encode_varint, WireType};
use super::{CodeGeneratorResponse, GeneratedFile};

/// Encode a CodeGeneratorResponse to be written to the plugin's stdout.
///
/// Absent optional fields are not emitted.
pub fn encode_code_generator_response(resp: &CodeGeneratorResponse) -> Vec<u8> {
    let mut buf = Vec::new();

    if let Some(error) = &resp.error {
        encode_bytes(1, error.as_bytes(), &mut buf);
    }
    if let Some(features) = resp.supported_features {
        encode_key(2, WireType::Varint, &mut buf);
        encode_varint(features, &mut buf);
    }
    for file in &resp.file {
        encode_bytes(15, &encode_generated_file(file), &mut buf);
    }

    buf
}

fn encode_generated_file(file: &GeneratedFile) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(name) = &file.name {
        encode_bytes(1, name.as_bytes(), &mut buf);
    }
    if let Some(insertion_point) = &file.insertion_point {
        encode_bytes(2, insertion_point.as_bytes(), &mut buf);
    }
    if let Some(content) = &file.content {
        encode_bytes(15, content.as_bytes(), &mut buf);
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_empty_response() {
        assert!(encode_code_generator_response(&CodeGeneratorResponse::default()).is_empty());
    }

    #[test]
    fn test_encode_error_response() {
        let resp = CodeGeneratorResponse {
            error: Some("boom".into()),
            ..Default::default()
        };
        assert_eq!(
            encode_code_generator_response(&resp),
            [0x0A, 0x04, b'b', b'o', b'o', b'm']
        );
    }

    #[test]
    fn test_encode_files() {
        let resp = CodeGeneratorResponse {
            error: None,
            supported_features: Some(CodeGeneratorResponse::FEATURE_PROTO3_OPTIONAL),
            file: vec![GeneratedFile::new("A.jsonschema", "{}")],
        };

        let mut expected = vec![0x10, 0x01, 0x7A, 18];
        expected.extend_from_slice(&[0x0A, 12]);
        expected.extend_from_slice(b"A.jsonschema");
        expected.extend_from_slice(&[0x7A, 2]);
        expected.extend_from_slice(b"{}");

        assert_eq!(encode_code_generator_response(&resp), expected);
    }
}

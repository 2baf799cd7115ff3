//! Error types for protoschema.

use std::io;

/// Errors that can occur while converting protobuf descriptors to JSON Schema.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A package or nested message segment did not resolve.
    #[error("no such package nor message `{segment}` in `{scope}`")]
    NotFound { segment: String, scope: String },
    /// A field references a type that could not be resolved from any
    /// enclosing package.
    #[error("no such message type named {0}")]
    NoSuchType(String),
    /// A field declares a kind outside of the supported set.
    #[error("unrecognized field type: {0}")]
    UnrecognizedFieldType(i32),
    /// A schema document could not be serialized.
    #[error("failed to encode JSON Schema: {0}")]
    Encoding(#[from] serde_json::Error),
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Invalid varint encoding.
    #[error("invalid varint encoding")]
    InvalidVarint,
    /// Unexpected end of buffer.
    #[error("unexpected end of buffer")]
    UnexpectedEof,
    /// Invalid wire type.
    #[error("invalid wire type: {0}")]
    InvalidWireType(u8),
    /// Invalid UTF-8 in string field.
    #[error("invalid UTF-8 in string field")]
    InvalidUtf8,
    /// Malformed protobuf input.
    #[error("failed to decode protobuf input: {0}")]
    Decode(String),
    /// The plugin request did not name any file to generate.
    #[error("no files to generate")]
    NoFilesToGenerate,
    /// protoc not found.
    #[error("protoc not found. Set PROTOC env var or install protoc.")]
    ProtocNotFound,
    /// protoc invocation failed.
    #[error("protoc failed: {}", truncate(.0))]
    ProtocFailed(String),
    /// Missing OUT_DIR environment variable.
    #[error("OUT_DIR not set. Run from build.rs or set out_dir().")]
    MissingOutDir,
    /// Missing file_descriptor_set_path when skip_protoc is set.
    #[error("file_descriptor_set_path required when skip_protoc is set")]
    MissingDescriptorPath,
    /// Conversion of one input unit failed.
    #[error("failed to convert {file}: {source}")]
    File {
        file: String,
        #[source]
        source: Box<Error>,
    },
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(_: std::string::FromUtf8Error) -> Self {
        Self::InvalidUtf8
    }
}

/// Keep very long protoc output readable.
fn truncate(msg: &str) -> String {
    const MAX_LEN: usize = 1000;
    match msg.char_indices().nth(MAX_LEN) {
        Some((idx, _)) => format!("{}... (truncated)", &msg[..idx]),
        None => msg.to_string(),
    }
}

//! Plugin envelope types.
//!
//! These mirror google/protobuf/compiler/plugin.proto.

use super::FileDescriptorProto;

/// The version number of protocol compiler.
/// Corresponds to google.protobuf.compiler.Version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Version {
    pub major: Option<i32>,      // field 1
    pub minor: Option<i32>,      // field 2
    pub patch: Option<i32>,      // field 3
    pub suffix: Option<String>, // field 4
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            self.major.unwrap_or_default(),
            self.minor.unwrap_or_default(),
            self.patch.unwrap_or_default()
        )?;
        match self.suffix.as_deref() {
            Some(suffix) if !suffix.is_empty() => write!(f, "-{}", suffix),
            _ => Ok(()),
        }
    }
}

/// An encoded CodeGeneratorRequest is written to the plugin's stdin.
/// Corresponds to google.protobuf.compiler.CodeGeneratorRequest.
#[derive(Debug, Clone, Default)]
pub struct CodeGeneratorRequest {
    /// The .proto files that were explicitly listed on the command-line.
    pub file_to_generate: Vec<String>, // field 1
    /// The generator parameter passed on the command-line.
    pub parameter: Option<String>, // field 2
    /// The version number of protocol compiler.
    pub compiler_version: Option<Version>, // field 3
    /// Every file in `file_to_generate` and everything they import, in
    /// topological order.
    pub proto_file: Vec<FileDescriptorProto>, // field 15
}

/// The plugin writes an encoded CodeGeneratorResponse to stdout.
/// Corresponds to google.protobuf.compiler.CodeGeneratorResponse.
#[derive(Debug, Clone, Default)]
pub struct CodeGeneratorResponse {
    /// Set when the request could not be processed.
    pub error: Option<String>, // field 1
    /// Bitmask of `FEATURE_*` values supported by the plugin.
    pub supported_features: Option<u64>, // field 2
    /// Generated files.
    pub file: Vec<GeneratedFile>, // field 15
}

impl CodeGeneratorResponse {
    /// Corresponds to CodeGeneratorResponse.Feature.FEATURE_PROTO3_OPTIONAL.
    pub const FEATURE_PROTO3_OPTIONAL: u64 = 1;
}

/// A single generated document.
/// Corresponds to google.protobuf.compiler.CodeGeneratorResponse.File.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedFile {
    /// The file name, relative to the output directory.
    pub name: Option<String>, // field 1
    /// Insertion point in an existing file. Never set by this generator.
    pub insertion_point: Option<String>, // field 2
    /// The file contents.
    pub content: Option<String>, // field 15
}

impl GeneratedFile {
    /// Create a document with the given name and contents.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            insertion_point: None,
            content: Some(content.into()),
        }
    }

    /// The file name, or `""` when absent.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// The file contents, or `""` when absent.
    pub fn content(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }
}

//! `protoc` plugin request handling.

use tracing::debug;

use crate::descriptor::{CodeGeneratorRequest, CodeGeneratorResponse};
use crate::generator::generate;
use crate::options::Options;
use crate::Error;

/// Produce the response for a decoded plugin request.
///
/// Options come from the request `parameter`. Every message of every file in
/// the request is visible for resolution, but only `file_to_generate` yields
/// documents.
pub fn handle_request(request: &CodeGeneratorRequest) -> Result<CodeGeneratorResponse, Error> {
    let options = Options::from_parameter(request.parameter.as_deref().unwrap_or_default());
    handle_request_with(request, options)
}

/// Like [`handle_request`], with options already parsed.
pub fn handle_request_with(
    request: &CodeGeneratorRequest,
    options: Options,
) -> Result<CodeGeneratorResponse, Error> {
    if request.file_to_generate.is_empty() {
        return Err(Error::NoFilesToGenerate);
    }
    if let Some(version) = &request.compiler_version {
        debug!("request from protoc {}", version);
    }

    let file = generate(&request.proto_file, &request.file_to_generate, options)?;
    Ok(CodeGeneratorResponse {
        error: None,
        supported_features: Some(CodeGeneratorResponse::FEATURE_PROTO3_OPTIONAL),
        file,
    })
}

/// A response reporting `err` to `protoc` with no files.
pub fn error_response(err: &Error) -> CodeGeneratorResponse {
    CodeGeneratorResponse {
        error: Some(err.to_string()),
        supported_features: None,
        file: Vec::new(),
    }
}

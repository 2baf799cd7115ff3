//! `protoschema` converts protobuf descriptors into JSON Schema documents.
//!
//! Every top-level message of a `.proto` file becomes one
//! `<Message>.jsonschema` document with all referenced messages inlined.
//! Files that declare only enums produce one document per enum instead.
//!
//! # Example
//!
//! ```rust,no_run
//! fn main() -> Result<(), protoschema::Error> {
//!     protoschema::compile_protos(&["proto/shop.proto"], &["proto/"])?;
//!     Ok(())
//! }
//! ```
//!
//! # Options
//!
//! The same switches are accepted by the `protoc` plugin as a comma
//! separated parameter (`--jsonschema_opt=allow_null_values`):
//!
//! - `allow_null_values`: every node also accepts `null`.
//! - `disallow_additional_properties`: message objects reject properties
//!   that are not declared.
//! - `disallow_bigints_as_strings`: 64-bit integers must be JSON numbers.
//!   By default they may also be strings, since many JSON consumers lose
//!   precision beyond 2^53.
//!
//! ```rust,no_run
//! fn main() -> Result<(), protoschema::Error> {
//!     protoschema::Config::new()
//!         .allow_null_values(true)
//!         .out_dir("schemas")
//!         .compile_protos(&["proto/shop.proto"], &["proto/"])?;
//!     Ok(())
//! }
//! ```
//!
//! # Recursive Messages
//!
//! Messages that reference themselves, directly or through other messages,
//! are expanded until the first repetition. The repeated reference becomes
//! an open object (`"additionalProperties": true`) so generation terminates.
//!
//! # Plugin Mode
//!
//! [`handle_request`] turns a decoded `CodeGeneratorRequest` into a
//! `CodeGeneratorResponse`; the `protoc-gen-jsonschema` binary wraps it with
//! stdin/stdout handling.

mod config;
pub mod convert;
pub mod descriptor;
mod error;
mod generator;
mod options;
mod plugin;
mod protoc;
pub mod registry;

pub use config::Config;
pub use convert::{convert_enum, Converter, SchemaNode};
pub use error::Error;
pub use generator::{convert_file, generate, SCHEMA_EXTENSION};
pub use options::Options;
pub use plugin::{error_response, handle_request, handle_request_with};
pub use registry::Registry;

use std::path::{Path, PathBuf};

/// Generate JSON Schema files for `.proto` files with default settings.
///
/// Output goes to `OUT_DIR`. Returns the paths of the files written.
///
/// # Arguments
/// * `protos` - Paths to `.proto` files to convert
/// * `includes` - Include paths for resolving imports
pub fn compile_protos(
    protos: &[impl AsRef<Path>],
    includes: &[impl AsRef<Path>],
) -> Result<Vec<PathBuf>, Error> {
    Config::new().compile_protos(protos, includes)
}

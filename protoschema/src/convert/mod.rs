//! Conversion of protobuf descriptors into JSON Schema nodes.
//!
//! Every referenced message is inlined where it is used. There is no `$ref`
//! sharing, so the output of each conversion is a plain tree.

mod enumeration;
mod field;
mod message;
mod recursion;
mod schema;

pub use enumeration::convert_enum;
pub use schema::{Kind, Literal, SchemaNode, DRAFT_04};

use crate::options::Options;
use crate::registry::Registry;

use recursion::ExpansionPath;

/// Converts fields and messages, resolving message references through a
/// [`Registry`].
///
/// A converter borrows a fully built registry; registration must be finished
/// before conversion starts.
pub struct Converter<'r, 'a> {
    registry: &'r Registry<'a>,
    options: Options,
    path: ExpansionPath,
}

impl<'r, 'a> Converter<'r, 'a> {
    /// Create a converter over `registry` applying `options`.
    pub fn new(registry: &'r Registry<'a>, options: Options) -> Self {
        Self {
            registry,
            options,
            path: ExpansionPath::default(),
        }
    }

    /// The registry this converter resolves against.
    pub fn registry(&self) -> &'r Registry<'a> {
        self.registry
    }
}

//! Message schema generation.

use tracing::{debug, error};

use crate::descriptor::DescriptorProto;
use crate::registry::PackageId;
use crate::Error;

use super::schema::{Kind, SchemaNode, DRAFT_04};
use super::Converter;

impl<'r, 'a> Converter<'r, 'a> {
    /// Convert a top-level message declared in `package`.
    pub fn convert_message(
        &mut self,
        package: PackageId,
        message: &DescriptorProto,
    ) -> Result<SchemaNode, Error> {
        let full_name = format!("{}.{}", self.registry.package(package).name(), message.name());
        self.convert_resolved(package, &full_name, message)
    }

    /// Convert `message`, known under `full_name`, with field references
    /// resolved from `package`.
    pub(super) fn convert_resolved(
        &mut self,
        package: PackageId,
        full_name: &str,
        message: &DescriptorProto,
    ) -> Result<SchemaNode, Error> {
        let mut node = SchemaNode {
            schema: Some(DRAFT_04),
            additional_properties: Some(!self.options.disallow_additional_properties),
            ..SchemaNode::leaf(Kind::Object, self.options.allow_null_values)
        };

        self.path.enter(full_name);
        debug!("converting {} at depth {}", full_name, self.path.depth());
        let result = self.convert_fields(package, message, &mut node);
        self.path.leave();
        result?;

        Ok(node)
    }

    fn convert_fields(
        &mut self,
        package: PackageId,
        message: &DescriptorProto,
        node: &mut SchemaNode,
    ) -> Result<(), Error> {
        for field in &message.field {
            let property = self.convert_field(package, field, message).map_err(|err| {
                error!(
                    "failed to convert field {} in {}: {}",
                    field.name(),
                    message.name(),
                    err
                );
                err
            })?;
            node.properties.insert(field.name().to_string(), property);
        }
        Ok(())
    }
}

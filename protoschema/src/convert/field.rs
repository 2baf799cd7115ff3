//! Field schema generation.

use tracing::debug;

use crate::descriptor::{DescriptorProto, FieldDescriptorProto, Label, Type};
use crate::registry::PackageId;
use crate::Error;

use super::enumeration::nested_enum_literals;
use super::schema::{Kind, SchemaNode};
use super::Converter;

impl<'r, 'a> Converter<'r, 'a> {
    /// Convert one field of `parent`.
    ///
    /// `package` is the package that owns `parent`; message references are
    /// resolved relative to it.
    pub fn convert_field(
        &mut self,
        package: PackageId,
        field: &FieldDescriptorProto,
        parent: &DescriptorProto,
    ) -> Result<SchemaNode, Error> {
        let proto_type = field
            .field_type()
            .ok_or(Error::UnrecognizedFieldType(field.r#type.unwrap_or(-1)))?;
        let label = field.label();
        // Repeated fields take `null` on the array, never on the element.
        let nullable = self.options.allow_null_values && label != Label::Repeated;

        let mut node = match proto_type {
            Type::Double | Type::Float => SchemaNode::leaf(Kind::Number, nullable),

            Type::Int32 | Type::Uint32 | Type::Fixed32 | Type::Sfixed32 | Type::Sint32 => {
                SchemaNode::leaf(Kind::Integer, nullable)
            }

            // 64-bit values overflow the safe integer range of most JSON
            // consumers, so strings are accepted unless disabled.
            Type::Int64 | Type::Uint64 | Type::Fixed64 | Type::Sfixed64 | Type::Sint64 => {
                let mut kinds = vec![Kind::Integer];
                if !self.options.disallow_bigints_as_strings {
                    kinds.push(Kind::String);
                }
                if nullable {
                    kinds.push(Kind::Null);
                }
                SchemaNode::one_of(kinds)
            }

            Type::String | Type::Bytes => SchemaNode::leaf(Kind::String, nullable),

            Type::Bool => SchemaNode::leaf(Kind::Boolean, nullable),

            Type::Enum => {
                let mut kinds = vec![Kind::String, Kind::Integer];
                if nullable {
                    kinds.push(Kind::Null);
                }
                SchemaNode {
                    literals: nested_enum_literals(parent, field.type_name()),
                    ..SchemaNode::one_of(kinds)
                }
            }

            Type::Group | Type::Message => SchemaNode {
                additional_properties: match label {
                    Label::Optional => Some(true),
                    Label::Required => Some(false),
                    Label::Repeated => None,
                },
                ..SchemaNode::of(Kind::Object)
            },
        };

        if node.kind != Some(Kind::Object) {
            if label == Label::Repeated {
                node = self.repeated(node);
            }
            return Ok(node);
        }

        self.expand_message_field(package, field, label, &mut node)?;

        if self.options.allow_null_values {
            let kind = node.kind.take();
            node.one_of = [Some(Kind::Null), kind]
                .into_iter()
                .flatten()
                .map(SchemaNode::of)
                .collect();
        }

        Ok(node)
    }

    /// Move a scalar or enum node into the `items` of a new array node.
    fn repeated(&self, element: SchemaNode) -> SchemaNode {
        let array = SchemaNode::leaf(Kind::Array, self.options.allow_null_values);
        SchemaNode {
            items: Some(Box::new(element)),
            ..array
        }
    }

    /// Resolve the message a field refers to and inline its schema into `node`.
    fn expand_message_field(
        &mut self,
        package: PackageId,
        field: &FieldDescriptorProto,
        label: Label,
        node: &mut SchemaNode,
    ) -> Result<(), Error> {
        let type_name = field.type_name();
        let target = self
            .registry
            .lookup_relative(package, type_name)
            .map_err(|_| Error::NoSuchType(type_name.to_string()))?;

        let expanded = if self.path.contains(&target.full_name) {
            debug!(
                "recursive message {}, leaving field {} open",
                self.path.cycle(&target.full_name),
                field.name()
            );
            None
        } else {
            Some(self.convert_resolved(target.package, &target.full_name, target.message)?)
        };

        match (label, expanded) {
            (Label::Repeated, Some(element)) => {
                node.items = Some(Box::new(element));
                node.kind = Some(Kind::Array);
            }
            (Label::Repeated, None) => {
                node.items = Some(Box::new(SchemaNode {
                    additional_properties: Some(true),
                    ..SchemaNode::of(Kind::Object)
                }));
                node.kind = Some(Kind::Array);
            }
            (_, Some(message)) => node.properties = message.properties,
            (_, None) => node.additional_properties = Some(true),
        }

        Ok(())
    }
}

//! Enum schema generation.

use crate::descriptor::{DescriptorProto, EnumDescriptorProto};

use super::schema::{Kind, Literal, SchemaNode, DRAFT_04};

/// Convert a standalone enum.
///
/// The result accepts either a string or an integer. Its `enum` keyword lists
/// every value twice, once by name and once by number, flattened into a
/// single list: `[RED, 0, GREEN, 1]`.
pub fn convert_enum(enum_type: &EnumDescriptorProto) -> SchemaNode {
    SchemaNode {
        schema: Some(DRAFT_04),
        literals: enum_literals(enum_type),
        ..SchemaNode::one_of([Kind::String, Kind::Integer])
    }
}

/// Flattened name/number literals for every value of `enum_type`.
pub(super) fn enum_literals(enum_type: &EnumDescriptorProto) -> Vec<Literal> {
    enum_type
        .value
        .iter()
        .flat_map(|value| {
            [
                Literal::Name(value.name.clone().unwrap_or_default()),
                Literal::Number(value.number.unwrap_or_default()),
            ]
        })
        .collect()
}

/// Literals of the enum declared directly inside `parent` that `type_name`
/// refers to, or an empty list when the enum lives elsewhere.
///
/// Matching is by the `.<Parent>.<Enum>` suffix of the referenced name.
pub(super) fn nested_enum_literals(parent: &DescriptorProto, type_name: &str) -> Vec<Literal> {
    parent
        .enum_type
        .iter()
        .filter(|enum_type| type_name.ends_with(&format!(".{}.{}", parent.name(), enum_type.name())))
        .flat_map(enum_literals)
        .collect()
}

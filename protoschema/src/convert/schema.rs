//! JSON Schema nodes produced by the converter.

use std::collections::BTreeMap;

use serde::Serialize;

/// The `$schema` URI stamped on every converted message and enum.
pub const DRAFT_04: &str = "http://json-schema.org/draft-04/schema#";

/// A primitive JSON Schema type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Object,
    Array,
}

/// One entry of an `enum` keyword. Symbolic names and numbers share a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Literal {
    Name(String),
    Number(i32),
}

/// A JSON Schema fragment.
///
/// Field order matches the rendered key order. Empty keywords are omitted
/// when serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaNode {
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, SchemaNode>,
    /// `Some(true)` allows any extra property, `Some(false)` forbids
    /// properties that are not listed.
    #[serde(rename = "additionalProperties", skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<bool>,
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub literals: Vec<Literal>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<Kind>,
    #[serde(rename = "oneOf", skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<SchemaNode>,
}

impl SchemaNode {
    /// A node of a single primitive kind.
    pub fn of(kind: Kind) -> Self {
        Self {
            kind: Some(kind),
            ..Default::default()
        }
    }

    /// A node accepting any of `kinds`, in order.
    pub fn one_of(kinds: impl IntoIterator<Item = Kind>) -> Self {
        Self {
            one_of: kinds.into_iter().map(Self::of).collect(),
            ..Default::default()
        }
    }

    /// `kind`, or `[null, kind]` when `nullable` is set.
    pub fn leaf(kind: Kind, nullable: bool) -> Self {
        if nullable {
            Self::one_of([Kind::Null, kind])
        } else {
            Self::of(kind)
        }
    }

    /// Every kind this node accepts, whether declared directly or through
    /// `oneOf` alternatives.
    pub fn kinds(&self) -> Vec<Kind> {
        self.kind
            .into_iter()
            .chain(self.one_of.iter().filter_map(|alt| alt.kind))
            .collect()
    }

    /// Whether `null` is accepted.
    pub fn is_nullable(&self) -> bool {
        self.kinds().contains(&Kind::Null)
    }

    /// Render as a standalone document with four-space indentation.
    pub fn to_document(&self) -> Result<String, crate::Error> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        Ok(String::from_utf8(buf)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_keywords_are_omitted() {
        let node = SchemaNode::of(Kind::String);
        assert_eq!(serde_json::to_value(&node).unwrap(), json!({"type": "string"}));
    }

    #[test]
    fn test_literals_are_flat() {
        let node = SchemaNode {
            literals: vec![Literal::Name("RED".into()), Literal::Number(0)],
            ..SchemaNode::one_of([Kind::String, Kind::Integer])
        };
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({
                "enum": ["RED", 0],
                "oneOf": [{"type": "string"}, {"type": "integer"}]
            })
        );
    }

    #[test]
    fn test_kinds() {
        assert_eq!(SchemaNode::leaf(Kind::Number, true).kinds(), [Kind::Null, Kind::Number]);
        assert!(!SchemaNode::leaf(Kind::Number, false).is_nullable());
    }

    #[test]
    fn test_document_key_order() {
        let mut node = SchemaNode {
            schema: Some(DRAFT_04),
            additional_properties: Some(false),
            ..SchemaNode::of(Kind::Object)
        };
        node.properties.insert("id".into(), SchemaNode::of(Kind::Integer));

        insta::assert_snapshot!(node.to_document().unwrap(), @r##"
        {
            "$schema": "http://json-schema.org/draft-04/schema#",
            "properties": {
                "id": {
                    "type": "integer"
                }
            },
            "additionalProperties": false,
            "type": "object"
        }
        "##);
    }
}

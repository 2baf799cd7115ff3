//! Document assembly: one JSON Schema document per top-level type.

use tracing::{debug, info, warn};

use crate::convert::{convert_enum, Converter};
use crate::descriptor::{FileDescriptorProto, GeneratedFile};
use crate::options::Options;
use crate::registry::Registry;
use crate::Error;

/// Suffix of every generated document name.
pub const SCHEMA_EXTENSION: &str = "jsonschema";

/// Convert the units named in `targets`.
///
/// Every message of every file in `files` is registered first so that
/// references across files resolve. A target with no matching file is
/// skipped. The first failure aborts the batch and is wrapped with the name
/// of the unit it came from.
pub fn generate(
    files: &[FileDescriptorProto],
    targets: &[String],
    options: Options,
) -> Result<Vec<GeneratedFile>, Error> {
    let registry = Registry::from_files(files);
    let mut converter = Converter::new(&registry, options);
    let mut generated = Vec::new();

    for target in targets {
        let Some(file) = files.iter().find(|file| file.name() == target) else {
            debug!("no descriptor for {}, skipping", target);
            continue;
        };

        debug!("converting {}", target);
        let documents = convert_file(&mut converter, file).map_err(|err| Error::File {
            file: target.clone(),
            source: Box::new(err),
        })?;
        generated.extend(documents);
    }

    Ok(generated)
}

/// Convert a single unit using an existing converter.
pub fn convert_file(
    converter: &mut Converter<'_, '_>,
    file: &FileDescriptorProto,
) -> Result<Vec<GeneratedFile>, Error> {
    if file.message_type.is_empty() {
        if file.enum_type.len() > 1 {
            warn!(
                "{} declares {} enums and no messages; writing one schema per enum",
                file.name(),
                file.enum_type.len()
            );
        }

        let mut documents = Vec::with_capacity(file.enum_type.len());
        for enum_type in &file.enum_type {
            let name = document_name(enum_type.name());
            info!("generating JSON schema for stand-alone enum {}", name);
            documents.push(GeneratedFile::new(name, convert_enum(enum_type).to_document()?));
        }
        return Ok(documents);
    }

    let package = converter.registry().lookup_package(file.package())?;
    let mut documents = Vec::with_capacity(file.message_type.len());
    for message in &file.message_type {
        let name = document_name(message.name());
        info!("generating JSON schema for message {}", name);
        let schema = converter.convert_message(package, message)?;
        documents.push(GeneratedFile::new(name, schema.to_document()?));
    }
    Ok(documents)
}

fn document_name(type_name: &str) -> String {
    format!("{}.{}", type_name, SCHEMA_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto};

    fn enumeration(name: &str) -> EnumDescriptorProto {
        EnumDescriptorProto {
            name: Some(name.to_string()),
            value: vec![EnumValueDescriptorProto {
                name: Some("UNKNOWN".into()),
                number: Some(0),
            }],
        }
    }

    fn message(name: &str) -> DescriptorProto {
        DescriptorProto {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_enum_only_unit() {
        let files = vec![FileDescriptorProto {
            name: Some("enums.proto".into()),
            package: Some("e".into()),
            enum_type: vec![enumeration("Color"), enumeration("Size")],
            ..Default::default()
        }];

        let out = generate(&files, &["enums.proto".to_string()], Options::default()).unwrap();
        let names: Vec<_> = out.iter().map(GeneratedFile::name).collect();
        assert_eq!(names, ["Color.jsonschema", "Size.jsonschema"]);
    }

    #[test]
    fn test_enums_ignored_when_messages_present() {
        let files = vec![FileDescriptorProto {
            name: Some("mixed.proto".into()),
            package: Some("m".into()),
            message_type: vec![message("Order"), message("Item")],
            enum_type: vec![enumeration("Status")],
            ..Default::default()
        }];

        let out = generate(&files, &["mixed.proto".to_string()], Options::default()).unwrap();
        let names: Vec<_> = out.iter().map(GeneratedFile::name).collect();
        assert_eq!(names, ["Order.jsonschema", "Item.jsonschema"]);
    }

    #[test]
    fn test_empty_unit() {
        let files = vec![FileDescriptorProto {
            name: Some("empty.proto".into()),
            ..Default::default()
        }];
        let out = generate(&files, &["empty.proto".to_string()], Options::default()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_only_targets_are_converted() {
        let files = vec![
            FileDescriptorProto {
                name: Some("dep.proto".into()),
                package: Some("dep".into()),
                message_type: vec![message("Shared")],
                ..Default::default()
            },
            FileDescriptorProto {
                name: Some("main.proto".into()),
                package: Some("app".into()),
                message_type: vec![message("Main")],
                ..Default::default()
            },
        ];

        let out = generate(&files, &["main.proto".to_string()], Options::default()).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name(), "Main.jsonschema");
    }

    #[test]
    fn test_error_names_the_unit() {
        let mut broken = message("Broken");
        broken.field.push(crate::descriptor::FieldDescriptorProto {
            name: Some("f".into()),
            r#type: Some(99),
            ..Default::default()
        });
        let files = vec![FileDescriptorProto {
            name: Some("broken.proto".into()),
            message_type: vec![broken],
            ..Default::default()
        }];

        let err = generate(&files, &["broken.proto".to_string()], Options::default()).unwrap_err();
        assert_eq!(err.to_string(), "failed to convert broken.proto: unrecognized field type: 99");
    }
}

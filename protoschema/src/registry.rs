//! Namespace registry for type resolution.
//!
//! Packages form a tree rooted at the unnamed package. Each package node owns
//! its children and holds the top-level messages declared directly in it.
//! Nested messages are not registered; they are reached structurally through
//! their enclosing message.
//!
//! The registry borrows the descriptors it indexes, so it lives exactly as long
//! as the batch of files it was built from and is read-only once built.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::descriptor::{DescriptorProto, FileDescriptorProto};
use crate::Error;

/// Index of a package node inside a [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackageId(usize);

/// One namespace level in the package tree.
#[derive(Debug)]
pub struct PackageNode<'a> {
    /// Fully-qualified dotted path, e.g. `.a.b`. Empty for the root.
    name: String,
    /// Enclosing package. `None` only for the root.
    parent: Option<PackageId>,
    children: HashMap<String, PackageId>,
    types: HashMap<String, &'a DescriptorProto>,
}

impl<'a> PackageNode<'a> {
    fn new(name: String, parent: Option<PackageId>) -> Self {
        Self {
            name,
            parent,
            children: HashMap::new(),
            types: HashMap::new(),
        }
    }

    /// Fully-qualified dotted path of this package.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The enclosing package, if any.
    pub fn parent(&self) -> Option<PackageId> {
        self.parent
    }

    /// The message declared directly in this package under `name`.
    pub fn get_type(&self, name: &str) -> Option<&'a DescriptorProto> {
        self.types.get(name).copied()
    }

    /// Number of messages declared directly in this package.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Name used for this package in diagnostics.
    fn scope(&self) -> &str {
        if self.name.is_empty() {
            "."
        } else {
            &self.name
        }
    }
}

/// A message found by a registry lookup.
#[derive(Debug, Clone)]
pub struct Resolved<'a> {
    /// The package that declares the message, or its outermost enclosing
    /// message for nested types.
    pub package: PackageId,
    /// Fully-qualified name, e.g. `.a.b.Outer.Inner`.
    pub full_name: String,
    /// The message descriptor.
    pub message: &'a DescriptorProto,
}

/// The package tree built from one batch of files.
#[derive(Debug)]
pub struct Registry<'a> {
    packages: Vec<PackageNode<'a>>,
}

impl Default for Registry<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Registry<'a> {
    /// The root package.
    pub const ROOT: PackageId = PackageId(0);

    /// Create an empty registry holding only the root package.
    pub fn new() -> Self {
        Self {
            packages: vec![PackageNode::new(String::new(), None)],
        }
    }

    /// Build a registry holding every top-level message of `files`.
    pub fn from_files(files: &'a [FileDescriptorProto]) -> Self {
        let mut registry = Self::new();
        for file in files {
            for message in &file.message_type {
                debug!(
                    "loading message type {} from package {}",
                    message.name(),
                    file.package()
                );
                registry.register(file.package(), message);
            }
        }
        registry
    }

    /// Get a package node.
    pub fn package(&self, id: PackageId) -> &PackageNode<'a> {
        &self.packages[id.0]
    }

    /// Insert `message` into the package addressed by `package`, creating
    /// intermediate packages as needed. A later registration of the same
    /// name replaces the earlier one.
    pub fn register(&mut self, package: &str, message: &'a DescriptorProto) -> PackageId {
        let mut current = Self::ROOT;
        for segment in segments(package) {
            current = match self.packages[current.0].children.get(segment) {
                Some(&child) => child,
                None => {
                    let child = PackageId(self.packages.len());
                    let name = format!("{}.{}", self.packages[current.0].name, segment);
                    self.packages.push(PackageNode::new(name, Some(current)));
                    self.packages[current.0]
                        .children
                        .insert(segment.to_string(), child);
                    child
                }
            };
        }

        let node = &mut self.packages[current.0];
        if node.types.insert(message.name().to_string(), message).is_some() {
            warn!(
                "message {} registered more than once in package {}",
                message.name(),
                node.scope()
            );
        }
        current
    }

    /// Resolve a package path to its node.
    ///
    /// The empty path and `.` resolve to the root package.
    pub fn lookup_package(&self, name: &str) -> Result<PackageId, Error> {
        let mut current = Self::ROOT;
        for segment in segments(name) {
            let node = self.package(current);
            current = *node.children.get(segment).ok_or_else(|| Error::NotFound {
                segment: segment.to_string(),
                scope: node.scope().to_string(),
            })?;
        }
        Ok(current)
    }

    /// Resolve a fully-qualified name such as `.a.b.Message.Nested` from the
    /// root package.
    pub fn lookup_absolute(&self, name: &str) -> Result<Resolved<'a>, Error> {
        let path = name.strip_prefix('.').unwrap_or(name);
        self.resolve_in(Self::ROOT, path)
    }

    /// Resolve `name` the way protobuf scoping does: names with a leading `.`
    /// are absolute, anything else is tried in `start` and then in each
    /// enclosing package up to the root.
    pub fn lookup_relative(&self, start: PackageId, name: &str) -> Result<Resolved<'a>, Error> {
        if name.starts_with('.') {
            return self.lookup_absolute(name);
        }

        let mut scope = Some(start);
        let mut last_err = None;
        while let Some(id) = scope {
            match self.resolve_in(id, name) {
                Ok(found) => return Ok(found),
                Err(err) => last_err = Some(err),
            }
            scope = self.package(id).parent;
        }

        // The loop runs at least once because `start` is always present.
        Err(last_err.unwrap_or_else(|| Error::NotFound {
            segment: name.to_string(),
            scope: self.package(start).scope().to_string(),
        }))
    }

    /// Resolve a dotted path starting at package `id`.
    ///
    /// Each leading segment must name a child package or a message declared in
    /// the current package; once a message matches, the rest of the path names
    /// nested messages.
    fn resolve_in(&self, id: PackageId, path: &str) -> Result<Resolved<'a>, Error> {
        let node = self.package(id);
        let (head, tail) = match path.split_once('.') {
            Some((head, tail)) => (head, Some(tail)),
            None => (path, None),
        };

        if let Some(tail) = tail {
            debug!("looking for {} in {} at {}", tail, head, node.scope());
            if let Some(&child) = node.children.get(head) {
                return self.resolve_in(child, tail);
            }
        }

        let message = node.get_type(head).ok_or_else(|| Error::NotFound {
            segment: head.to_string(),
            scope: node.scope().to_string(),
        })?;
        let full_name = format!("{}.{}", node.name, head);

        match tail {
            None => Ok(Resolved {
                package: id,
                full_name,
                message,
            }),
            Some(tail) => resolve_nested(id, full_name, message, tail),
        }
    }
}

/// Walk `path` through the nested messages of `message`.
fn resolve_nested<'a>(
    package: PackageId,
    mut full_name: String,
    mut message: &'a DescriptorProto,
    path: &str,
) -> Result<Resolved<'a>, Error> {
    for segment in path.split('.') {
        message = message
            .nested_type
            .iter()
            .find(|nested| nested.name() == segment)
            .ok_or_else(|| Error::NotFound {
                segment: segment.to_string(),
                scope: full_name.clone(),
            })?;
        full_name.push('.');
        full_name.push_str(segment);
    }

    Ok(Resolved {
        package,
        full_name,
        message,
    })
}

/// Split a dotted package path, skipping the leading separator.
fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.strip_prefix('.')
        .unwrap_or(path)
        .split('.')
        .filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(name: &str) -> DescriptorProto {
        DescriptorProto {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    fn with_nested(name: &str, nested: Vec<DescriptorProto>) -> DescriptorProto {
        DescriptorProto {
            name: Some(name.to_string()),
            nested_type: nested,
            ..Default::default()
        }
    }

    #[test]
    fn test_register_creates_packages() {
        let foo = message("Foo");
        let mut registry = Registry::new();
        let id = registry.register("a.b", &foo);

        let node = registry.package(id);
        assert_eq!(node.name(), ".a.b");
        let parent = registry.package(node.parent().unwrap());
        assert_eq!(parent.name(), ".a");
        assert_eq!(parent.parent(), Some(Registry::ROOT));
        assert_eq!(registry.package(Registry::ROOT).parent(), None);
    }

    #[test]
    fn test_leading_separator_is_root() {
        let foo = message("Foo");
        let mut registry = Registry::new();
        let dotted = registry.register(".a", &foo);
        let plain = registry.register("a", &foo);
        assert_eq!(dotted, plain);
        assert_eq!(registry.package(dotted).name(), ".a");

        let root = registry.register("", &foo);
        assert_eq!(root, Registry::ROOT);
        assert_eq!(registry.lookup_absolute(".Foo").unwrap().full_name, ".Foo");
    }

    #[test]
    fn test_register_twice_last_write_wins() {
        let first = DescriptorProto {
            name: Some("Foo".into()),
            field: vec![Default::default()],
            ..Default::default()
        };
        let second = message("Foo");

        let mut registry = Registry::new();
        let id = registry.register("a", &first);
        registry.register("a", &second);

        assert_eq!(registry.package(id).type_count(), 1);
        let found = registry.lookup_absolute(".a.Foo").unwrap();
        assert!(found.message.field.is_empty());
        let again = registry.lookup_absolute(".a.Foo").unwrap();
        assert!(std::ptr::eq(found.message, again.message));
        assert_eq!(found.full_name, again.full_name);
    }

    #[test]
    fn test_lookup_absolute() {
        let inner = message("Inner");
        let outer = with_nested("Outer", vec![with_nested("Middle", vec![inner])]);
        let mut registry = Registry::new();
        let id = registry.register("a.b", &outer);

        let found = registry.lookup_absolute(".a.b.Outer").unwrap();
        assert_eq!(found.full_name, ".a.b.Outer");
        assert_eq!(found.package, id);

        let found = registry.lookup_absolute(".a.b.Outer.Middle.Inner").unwrap();
        assert_eq!(found.message.name(), "Inner");
        assert_eq!(found.full_name, ".a.b.Outer.Middle.Inner");
        assert_eq!(found.package, id);
    }

    #[test]
    fn test_lookup_absolute_not_found() {
        let outer = with_nested("Outer", vec![message("Inner")]);
        let mut registry = Registry::new();
        registry.register("a", &outer);

        match registry.lookup_absolute(".a.Outer.Missing") {
            Err(Error::NotFound { segment, scope }) => {
                assert_eq!(segment, "Missing");
                assert_eq!(scope, ".a.Outer");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            registry.lookup_absolute(".b.Outer"),
            Err(Error::NotFound { .. })
        ));
        assert!(matches!(
            registry.lookup_absolute(".a.Nope"),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn test_child_package_shadows_message() {
        // A child package named like a message wins the segment.
        let shadowed = with_nested("b", vec![message("Foo")]);
        let foo = message("Foo");
        let mut registry = Registry::new();
        registry.register("a", &shadowed);
        let pkg = registry.register("a.b", &foo);

        let found = registry.lookup_absolute(".a.b.Foo").unwrap();
        assert_eq!(found.package, pkg);
        assert!(std::ptr::eq(found.message, &foo));
    }

    #[test]
    fn test_lookup_relative_walks_up() {
        let foo = message("Foo");
        let bar = message("Bar");
        let mut registry = Registry::new();
        let ab = registry.register("a.b", &foo);
        let a = registry.register("a", &bar);

        // Bar lives in `.a` but is visible from `.a.b`.
        let found = registry.lookup_relative(ab, "Bar").unwrap();
        assert_eq!(found.full_name, ".a.Bar");
        assert_eq!(found.package, a);

        // `b.Foo` from `.a` descends into the child package.
        let found = registry.lookup_relative(a, "b.Foo").unwrap();
        assert_eq!(found.full_name, ".a.b.Foo");

        // Unqualified `Foo` is not visible from `.a`.
        assert!(matches!(
            registry.lookup_relative(a, "Foo"),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn test_lookup_relative_prefers_innermost() {
        let outer = message("Foo");
        let inner = message("Foo");
        let mut registry = Registry::new();
        registry.register("a", &outer);
        let ab = registry.register("a.b", &inner);

        let found = registry.lookup_relative(ab, "Foo").unwrap();
        assert!(std::ptr::eq(found.message, &inner));
        assert_eq!(found.full_name, ".a.b.Foo");
    }

    #[test]
    fn test_lookup_relative_reaches_root() {
        let top = message("Top");
        let leaf = message("Leaf");
        let mut registry = Registry::new();
        registry.register("", &top);
        let deep = registry.register("x.y.z", &leaf);

        let found = registry.lookup_relative(deep, "Top").unwrap();
        assert_eq!(found.full_name, ".Top");
        assert_eq!(found.package, Registry::ROOT);

        assert!(matches!(
            registry.lookup_relative(deep, "Nowhere"),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn test_lookup_relative_absolute_name() {
        let foo = message("Foo");
        let mut registry = Registry::new();
        let ab = registry.register("a.b", &foo);
        let c = registry.register("c", &foo);

        assert!(registry.lookup_relative(c, ".a.b.Foo").is_ok());
        // A leading separator disables the upward walk.
        assert!(registry.lookup_relative(ab, ".Foo").is_err());
    }

    #[test]
    fn test_lookup_package() {
        let foo = message("Foo");
        let mut registry = Registry::new();
        let ab = registry.register("a.b", &foo);

        assert_eq!(registry.lookup_package("a.b").unwrap(), ab);
        assert_eq!(registry.lookup_package(".a.b").unwrap(), ab);
        assert_eq!(registry.lookup_package("").unwrap(), Registry::ROOT);
        match registry.lookup_package("a.c") {
            Err(Error::NotFound { segment, scope }) => {
                assert_eq!(segment, "c");
                assert_eq!(scope, ".a");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_from_files() {
        let files = vec![
            FileDescriptorProto {
                name: Some("a.proto".into()),
                package: Some("a".into()),
                message_type: vec![message("Bar")],
                ..Default::default()
            },
            FileDescriptorProto {
                name: Some("b.proto".into()),
                package: Some("a.b".into()),
                message_type: vec![message("Foo"), message("Baz")],
                ..Default::default()
            },
        ];
        let registry = Registry::from_files(&files);

        let ab = registry.lookup_package("a.b").unwrap();
        assert_eq!(registry.package(ab).type_count(), 2);
        assert!(registry.lookup_relative(ab, "Bar").is_ok());
    }
}

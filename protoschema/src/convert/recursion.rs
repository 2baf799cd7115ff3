//! Recursive message detection.
//!
//! Protobuf messages can have recursive definitions, either directly:
//! ```protobuf
//! message Node {
//!   optional Node child = 1;
//! }
//! ```
//!
//! Or indirectly:
//! ```protobuf
//! message A {
//!   optional B b = 1;
//! }
//! message B {
//!   optional A a = 1;
//! }
//! ```
//!
//! Schemas are inlined rather than referenced, so expanding such a field would
//! never terminate. The converter keeps the chain of messages it is currently
//! expanding and stops at any field that points back into that chain.

/// The messages currently being expanded, outermost first.
#[derive(Debug, Default)]
pub struct ExpansionPath {
    in_path: Vec<String>,
}

impl ExpansionPath {
    /// Start expanding `full_name`.
    pub fn enter(&mut self, full_name: &str) {
        self.in_path.push(full_name.to_string());
    }

    /// Finish expanding the innermost message.
    pub fn leave(&mut self) {
        self.in_path.pop();
    }

    /// Whether expanding `full_name` would close a cycle.
    pub fn contains(&self, full_name: &str) -> bool {
        self.in_path.iter().any(|name| name == full_name)
    }

    /// Render the cycle closed by `full_name`, e.g. `.p.A -> .p.B -> .p.A`.
    pub fn cycle(&self, full_name: &str) -> String {
        let start = self
            .in_path
            .iter()
            .position(|name| name == full_name)
            .unwrap_or(0);
        let mut cycle: Vec<&str> = self.in_path[start..].iter().map(String::as_str).collect();
        cycle.push(full_name);
        cycle.join(" -> ")
    }

    /// Number of messages being expanded.
    pub fn depth(&self) -> usize {
        self.in_path.len()
    }
}

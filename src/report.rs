use serde::{Deserialize, Serialize};

use crate::node::SchemaNode;

/// Supported builder type tags, in dispatch order.
const SUPPORTED_TYPES: [&str; 8] = [
    "alternatives",
    "any",
    "array",
    "boolean",
    "date",
    "number",
    "object",
    "string",
];

/// Pre-flight survey of a schema tree.
///
/// Records everything a conversion would reject outright (missing or
/// unsupported type tags) or silently drop (tests no rule recognizes), each
/// located by a dot-notation path, so a caller can point at the offending
/// branch or decide to strip it before converting. Surveying never changes
/// conversion semantics; it is a read-only walk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionReport {
    pub node_count: usize,
    pub unconvertible: Vec<UnconvertibleNode>,
    pub ignored_tests: Vec<IgnoredTest>,
}

/// A node the conversion engine would reject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnconvertibleNode {
    pub path: String,
    pub reason: UnconvertibleReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnconvertibleReason {
    MissingType,
    UnsupportedType(String),
}

/// A test the matching type rule would silently drop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IgnoredTest {
    pub path: String,
    pub type_name: String,
    pub test_name: String,
}

impl ConversionReport {
    /// Survey the tree rooted at `root`.
    pub fn survey(root: &SchemaNode) -> Self {
        let mut report = Self::default();
        report.visit(root, String::new());
        report
    }

    /// Whether `convert` would succeed on the surveyed tree.
    pub fn is_convertible(&self) -> bool {
        self.unconvertible.is_empty()
    }

    pub fn has_ignored_tests(&self) -> bool {
        !self.ignored_tests.is_empty()
    }

    fn visit(&mut self, node: &SchemaNode, path: String) {
        self.node_count += 1;

        match node.type_name.as_deref() {
            None => self.unconvertible.push(UnconvertibleNode {
                path: display_path(&path),
                reason: UnconvertibleReason::MissingType,
            }),
            Some(type_name) if !SUPPORTED_TYPES.contains(&type_name) => {
                self.unconvertible.push(UnconvertibleNode {
                    path: display_path(&path),
                    reason: UnconvertibleReason::UnsupportedType(type_name.to_string()),
                })
            }
            Some(type_name) => {
                let recognized = recognized_tests(type_name);
                for test in &node.tests {
                    if !recognized.contains(&test.name.as_str()) {
                        self.ignored_tests.push(IgnoredTest {
                            path: display_path(&path),
                            type_name: type_name.to_string(),
                            test_name: test.name.clone(),
                        });
                    }
                }
            }
        }

        // Walk all structural collections regardless of the type tag.
        for child in &node.inner.children {
            self.visit(&child.schema, join(&path, &child.key));
        }
        for (index, item) in node.inner.items.iter().enumerate() {
            self.visit(item, join(&path, &format!("items[{index}]")));
        }
        for (index, candidate) in node.inner.matches.iter().enumerate() {
            self.visit(candidate, join(&path, &format!("matches[{index}]")));
        }
    }
}

/// Test names the given type's conversion rule understands.
fn recognized_tests(type_name: &str) -> &'static [&'static str] {
    match type_name {
        "string" => &["email", "regex", "min", "max", "length"],
        "number" => &["integer", "less", "greater", "min", "max"],
        "array" => &["unique", "length", "min", "max"],
        _ => &[],
    }
}

fn join(base: &str, segment: &str) -> String {
    if base.is_empty() {
        segment.to_string()
    } else {
        format!("{base}.{segment}")
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "(root)".to_string()
    } else {
        path.to_string()
    }
}

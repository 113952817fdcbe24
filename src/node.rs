use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One node of a schema-builder validation tree.
///
/// This mirrors the subset of the builder's internal node shape the
/// conversion engine reads. The serde field names are the builder's
/// serialized vocabulary, so trees dumped by a builder in another process
/// deserialize directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaNode {
    /// The builder type tag (`object`, `string`, `alternatives`, ...).
    /// A node without one cannot be converted.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,

    /// Ordered constraint descriptors attached to this node.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tests: Vec<Test>,

    /// Cross-cutting metadata flags.
    pub flags: Flags,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Explicitly allowed literal values, in declaration order.
    /// Empty means "no restriction".
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub valids: Vec<Value>,

    /// Structural children; which collection is meaningful depends on
    /// the type tag.
    #[serde(skip_serializing_if = "Inner::is_empty")]
    pub inner: Inner,
}

/// A named constraint predicate, e.g. `(min, 5)` or `(unique, -)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Test {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arg: Option<Value>,
}

/// Cross-cutting node metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Flags {
    pub presence: Presence,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Object nodes only: whether properties outside the declared set are
    /// acceptable. Ignored on every other type.
    #[serde(rename = "allowUnknown", skip_serializing_if = "is_false")]
    pub allow_unknown: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Presence requirement of a node within its parent object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    #[default]
    Optional,
    Required,
    Forbidden,
}

// Unrecognized presence values from newer builder versions degrade to
// `Optional` instead of failing deserialization.
impl<'de> Deserialize<'de> for Presence {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "required" => Presence::Required,
            "forbidden" => Presence::Forbidden,
            _ => Presence::Optional,
        })
    }
}

/// Structural child collections. Object nodes use `children`, array nodes
/// use `items`, alternatives nodes use `matches`; the rest stay empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Inner {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Child>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<SchemaNode>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub matches: Vec<SchemaNode>,
}

impl Inner {
    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.items.is_empty() && self.matches.is_empty()
    }
}

/// A named object property and its schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub key: String,
    pub schema: SchemaNode,
}

impl SchemaNode {
    /// Node with the given builder type tag and nothing else.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            ..Self::default()
        }
    }

    /// Node without a type tag. Conversion rejects these.
    pub fn untyped() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.flags.default = Some(value.into());
        self
    }

    /// Mark this node as required within its parent object.
    pub fn required(mut self) -> Self {
        self.flags.presence = Presence::Required;
        self
    }

    pub fn with_allow_unknown(mut self, allow: bool) -> Self {
        self.flags.allow_unknown = allow;
        self
    }

    /// Append one allowed literal value.
    pub fn with_valid(mut self, value: impl Into<Value>) -> Self {
        self.valids.push(value.into());
        self
    }

    /// Append a constraint test with an argument.
    pub fn with_test(mut self, name: impl Into<String>, arg: impl Into<Value>) -> Self {
        self.tests.push(Test {
            name: name.into(),
            arg: Some(arg.into()),
        });
        self
    }

    /// Append an argument-less constraint test (`unique`, `integer`, `email`).
    pub fn with_bare_test(mut self, name: impl Into<String>) -> Self {
        self.tests.push(Test {
            name: name.into(),
            arg: None,
        });
        self
    }

    /// Append a named property child (object nodes).
    pub fn with_child(mut self, key: impl Into<String>, schema: SchemaNode) -> Self {
        self.inner.children.push(Child {
            key: key.into(),
            schema,
        });
        self
    }

    /// Append an item shape (array nodes).
    pub fn with_item(mut self, schema: SchemaNode) -> Self {
        self.inner.items.push(schema);
        self
    }

    /// Append a candidate shape (alternatives nodes).
    pub fn with_match(mut self, schema: SchemaNode) -> Self {
        self.inner.matches.push(schema);
        self
    }
}

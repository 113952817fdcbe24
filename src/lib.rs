// Validation-schema tree to JSON Schema conversion
pub mod engine;
pub mod node;
pub mod report;
pub mod schema;

// Re-export core types for convenience
pub use engine::{convert, ConvertError};
pub use node::{Child, Flags, Inner, Presence, SchemaNode, Test};
pub use report::{ConversionReport, IgnoredTest, UnconvertibleNode, UnconvertibleReason};
pub use schema::{JsonSchema, TypeLabel, PRIMITIVE_TYPE_NAMES};

use serde_json::{Number, Value};
use thiserror::Error;

use crate::{
    node::{Presence, SchemaNode, Test},
    schema::{JsonSchema, TypeLabel, PRIMITIVE_TYPE_NAMES},
};

/// Errors that can occur while converting a schema tree
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Schema node has no type tag")]
    MissingType,

    #[error("Cannot convert schema node of type `{0}`")]
    UnsupportedType(String),
}

/// Convert a schema-builder node into a JSON Schema document fragment.
///
/// Cross-cutting metadata (`description`, `default`, `valids`) is merged
/// first, uniformly for every type; the node then dispatches on its type tag
/// to the matching rule, which recurses back into `convert` for nested nodes.
/// Unknown test names and malformed test arguments contribute nothing to the
/// fragment; a missing or unsupported type tag is a hard failure.
pub fn convert(node: &SchemaNode) -> Result<JsonSchema, ConvertError> {
    let type_name = node.type_name.as_deref().ok_or(ConvertError::MissingType)?;
    let schema = base_fragment(node);

    match type_name {
        "alternatives" => convert_alternatives(node, schema),
        "any" => Ok(convert_any(schema)),
        "array" => convert_array(node, schema),
        "boolean" => Ok(convert_boolean(schema)),
        "date" => Ok(convert_date(schema)),
        "number" => Ok(convert_number(node, schema)),
        "object" => convert_object(node, schema),
        "string" => Ok(convert_string(node, schema)),
        other => Err(ConvertError::UnsupportedType(other.to_string())),
    }
}

/// Metadata shared by all types, merged before type dispatch.
fn base_fragment(node: &SchemaNode) -> JsonSchema {
    let mut schema = JsonSchema::default();

    if let Some(description) = node.description.as_deref().filter(|d| !d.is_empty()) {
        schema.description = Some(description.to_string());
    }

    // Key presence decides; falsy defaults (0, "", false) survive the copy.
    if let Some(default) = &node.flags.default {
        schema.default = Some(default.clone());
    }

    if !node.valids.is_empty() {
        schema.enum_values = Some(node.valids.clone());
    }

    schema
}

fn convert_boolean(mut schema: JsonSchema) -> JsonSchema {
    schema.schema_type = Some(TypeLabel::one("boolean"));
    schema
}

fn convert_date(mut schema: JsonSchema) -> JsonSchema {
    schema.schema_type = Some(TypeLabel::one("string"));
    schema.format = Some("date-time".to_string());
    schema
}

fn convert_any(mut schema: JsonSchema) -> JsonSchema {
    schema.schema_type = Some(TypeLabel::many(PRIMITIVE_TYPE_NAMES));
    schema
}

fn convert_string(node: &SchemaNode, mut schema: JsonSchema) -> JsonSchema {
    schema.schema_type = Some(TypeLabel::one("string"));

    for test in &node.tests {
        match test.name.as_str() {
            "email" => schema.format = Some("email".to_string()),
            "regex" => {
                if let Some(pattern) = test.arg.as_ref().and_then(Value::as_str) {
                    schema.pattern = Some(pattern.to_string());
                }
            }
            "min" => {
                if let Some(n) = count_arg(test) {
                    schema.min_length = Some(n);
                }
            }
            "max" => {
                if let Some(n) = count_arg(test) {
                    schema.max_length = Some(n);
                }
            }
            "length" => {
                if let Some(n) = count_arg(test) {
                    schema.min_length = Some(n);
                    schema.max_length = Some(n);
                }
            }
            _ => {}
        }
    }

    schema
}

fn convert_number(node: &SchemaNode, mut schema: JsonSchema) -> JsonSchema {
    schema.schema_type = Some(TypeLabel::one("number"));

    for test in &node.tests {
        match test.name.as_str() {
            "integer" => schema.schema_type = Some(TypeLabel::one("integer")),
            "less" => {
                if let Some(n) = bound_arg(test) {
                    schema.exclusive_maximum = Some(true);
                    schema.maximum = Some(n);
                }
            }
            "greater" => {
                if let Some(n) = bound_arg(test) {
                    schema.exclusive_minimum = Some(true);
                    schema.minimum = Some(n);
                }
            }
            "min" => {
                if let Some(n) = bound_arg(test) {
                    schema.minimum = Some(n);
                }
            }
            "max" => {
                if let Some(n) = bound_arg(test) {
                    schema.maximum = Some(n);
                }
            }
            _ => {}
        }
    }

    schema
}

fn convert_array(node: &SchemaNode, mut schema: JsonSchema) -> Result<JsonSchema, ConvertError> {
    schema.schema_type = Some(TypeLabel::one("array"));

    for test in &node.tests {
        match test.name.as_str() {
            "unique" => schema.unique_items = Some(true),
            "length" => {
                if let Some(n) = count_arg(test) {
                    schema.min_items = Some(n);
                    schema.max_items = Some(n);
                }
            }
            "min" => {
                if let Some(n) = count_arg(test) {
                    schema.min_items = Some(n);
                }
            }
            "max" => {
                if let Some(n) = count_arg(test) {
                    schema.max_items = Some(n);
                }
            }
            _ => {}
        }
    }

    if !node.inner.items.is_empty() {
        let mut items = Vec::with_capacity(node.inner.items.len());
        for item in &node.inner.items {
            items.push(convert(item)?);
        }
        schema.items = Some(items);
    }

    Ok(schema)
}

fn convert_alternatives(
    node: &SchemaNode,
    mut schema: JsonSchema,
) -> Result<JsonSchema, ConvertError> {
    let mut one_of = Vec::with_capacity(node.inner.matches.len());
    for candidate in &node.inner.matches {
        one_of.push(convert(candidate)?);
    }
    schema.one_of = Some(one_of);

    Ok(schema)
}

fn convert_object(node: &SchemaNode, mut schema: JsonSchema) -> Result<JsonSchema, ConvertError> {
    schema.schema_type = Some(TypeLabel::one("object"));

    let mut properties = std::collections::BTreeMap::new();
    let mut required: Vec<String> = Vec::new();

    for child in &node.inner.children {
        properties.insert(child.key.clone(), convert(&child.schema)?);
        if child.schema.flags.presence == Presence::Required {
            required.push(child.key.clone());
        }
    }

    schema.properties = Some(properties);
    schema.additional_properties = Some(node.flags.allow_unknown);
    if !required.is_empty() {
        schema.required = Some(required);
    }

    Ok(schema)
}

/// Count argument (`minLength`, `maxItems`, ...). Skips the test unless the
/// argument is a non-negative integer.
fn count_arg(test: &Test) -> Option<u64> {
    test.arg.as_ref().and_then(Value::as_u64)
}

/// Bound argument (`minimum`, `maximum`). Copied digit-for-digit so integer
/// literals stay integers.
fn bound_arg(test: &Test) -> Option<Number> {
    match &test.arg {
        Some(Value::Number(n)) => Some(n.clone()),
        _ => None,
    }
}

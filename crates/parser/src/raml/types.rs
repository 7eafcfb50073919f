//! RAML type declarations and YAML node helpers
//!
//! Maps RAML type expressions (`string`, `User[]`, `string | nil`) and
//! expanded declarations (`type`, `properties`, `items`, facets) to [`Shape`].

use crate::model::{ObjectShape, Property, ScalarKind, ScalarShape, Shape};
use serde_yaml::{Mapping, Value};

/// Read a scalar node as a string (strings, numbers and booleans)
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Read `key` from a mapping as a scalar string
pub fn get_string(map: &Mapping, key: &str) -> Option<String> {
    map.get(key).and_then(scalar_string)
}

/// Read a node that may be a single string or a list of strings
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Sequence(items)) => items.iter().filter_map(scalar_string).collect(),
        Some(other) => scalar_string(other).into_iter().collect(),
        None => Vec::new(),
    }
}

/// Convert a YAML node to JSON, dropping entries with non-string keys
pub fn yaml_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                serde_json::Value::from(i)
            } else if let Some(u) = n.as_u64() {
                serde_json::Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null)
            }
        }
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Sequence(items) => serde_json::Value::Array(items.iter().map(yaml_to_json).collect()),
        Value::Mapping(map) => serde_json::Value::Object(
            map.iter()
                .filter_map(|(k, v)| scalar_string(k).map(|k| (k, yaml_to_json(v))))
                .collect(),
        ),
        Value::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}

/// Map a built-in RAML scalar type name to its kind
fn scalar_kind(name: &str) -> Option<ScalarKind> {
    match name {
        "string" => Some(ScalarKind::String),
        "integer" => Some(ScalarKind::Integer),
        "number" => Some(ScalarKind::Number),
        "boolean" => Some(ScalarKind::Boolean),
        "date" | "date-only" => Some(ScalarKind::Date),
        "datetime" | "datetime-only" => Some(ScalarKind::DateTime),
        "time-only" => Some(ScalarKind::Time),
        "file" => Some(ScalarKind::File),
        _ => None,
    }
}

/// Parse a JSON schema literal if the text looks like one
pub fn json_schema_literal(text: &str) -> Option<Shape> {
    let trimmed = text.trim_start();
    if !trimmed.starts_with('{') {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(schema) => Some(Shape::JsonSchema(schema)),
        Err(_) => Some(Shape::Any),
    }
}

/// Parse a RAML type expression
pub fn parse_type_expression(expr: &str) -> Shape {
    let expr = expr.trim();

    if let Some(shape) = json_schema_literal(expr) {
        return shape;
    }
    if expr.starts_with('<') {
        // XML schemas have no OpenAPI 2.0 counterpart
        return Shape::Any;
    }

    let members = split_union(expr);
    if members.len() > 1 {
        let members: Vec<&str> = members
            .into_iter()
            .filter(|m| !m.is_empty() && *m != "nil")
            .collect();
        return match members.as_slice() {
            [single] => parse_type_expression(single),
            _ => Shape::Any,
        };
    }

    if let Some(inner) = expr.strip_suffix("[]") {
        return Shape::Array {
            items: Box::new(parse_type_expression(inner)),
            description: None,
        };
    }

    if let Some(inner) = expr.strip_prefix('(').and_then(|e| e.strip_suffix(')')) {
        return parse_type_expression(inner);
    }

    match expr {
        "" | "any" | "nil" => Shape::Any,
        "object" => Shape::Object(ObjectShape::default()),
        "array" => Shape::Array {
            items: Box::new(Shape::Any),
            description: None,
        },
        name => match scalar_kind(name) {
            Some(kind) => Shape::scalar(kind),
            None => Shape::Reference(name.to_string()),
        },
    }
}

/// Split a type expression on `|` outside parentheses
fn split_union(expr: &str) -> Vec<&str> {
    let mut members = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in expr.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '|' if depth == 0 => {
                members.push(expr[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    members.push(expr[start..].trim());
    members
}

/// Parse a type declaration node (shorthand string or expanded mapping)
pub fn parse_type_declaration(value: &Value) -> Shape {
    match value {
        Value::Null => Shape::string(),
        Value::Mapping(map) => parse_expanded_declaration(map),
        Value::Tagged(tagged) => parse_type_declaration(&tagged.value),
        Value::Sequence(_) => Shape::Any,
        other => scalar_string(other)
            .map(|s| parse_type_expression(&s))
            .unwrap_or(Shape::Any),
    }
}

fn parse_expanded_declaration(map: &Mapping) -> Shape {
    let description = get_string(map, "description");
    let declared = map.get("type").or_else(|| map.get("schema"));

    let base = match declared {
        Some(Value::Mapping(inner)) => parse_expanded_declaration(inner),
        // multiple inheritance: the first parent wins
        Some(Value::Sequence(parents)) => parents
            .first()
            .map(parse_type_declaration)
            .unwrap_or(Shape::Any),
        Some(other) => scalar_string(other)
            .map(|s| parse_type_expression(&s))
            .unwrap_or(Shape::Any),
        None if map.contains_key("properties") => Shape::Object(ObjectShape::default()),
        None if map.contains_key("items") => Shape::Array {
            items: Box::new(Shape::Any),
            description: None,
        },
        None => Shape::string(),
    };

    let shape = match base {
        Shape::Scalar(scalar) => Shape::Scalar(apply_scalar_facets(scalar, map)),
        Shape::Array { items, description } => {
            let items = map
                .get("items")
                .map(|i| Box::new(parse_type_declaration(i)))
                .unwrap_or(items);
            Shape::Array { items, description }
        }
        Shape::Object(mut object) => {
            object.properties.extend(parse_properties(map.get("properties")));
            Shape::Object(object)
        }
        Shape::Reference(_) if map.contains_key("properties") => {
            // extended parent type: keep the locally declared properties
            Shape::Object(ObjectShape {
                description: None,
                properties: parse_properties(map.get("properties")),
            })
        }
        other => other,
    };

    shape.with_description(description)
}

fn parse_properties(value: Option<&Value>) -> Vec<Property> {
    let Some(Value::Mapping(props)) = value else {
        return Vec::new();
    };

    props
        .iter()
        .filter_map(|(key, decl)| {
            let raw_name = scalar_string(key)?;
            let (name, optional) = match raw_name.strip_suffix('?') {
                Some(stripped) => (stripped.to_string(), true),
                None => (raw_name, false),
            };
            let required = match decl {
                Value::Mapping(m) => m
                    .get("required")
                    .and_then(Value::as_bool)
                    .unwrap_or(!optional),
                _ => !optional,
            };
            Some(Property {
                name,
                required,
                shape: parse_type_declaration(decl),
            })
        })
        .collect()
}

fn apply_scalar_facets(mut scalar: ScalarShape, map: &Mapping) -> ScalarShape {
    if let Some(Value::Sequence(values)) = map.get("enum") {
        scalar.enum_values = values.iter().map(yaml_to_json).collect();
    }
    scalar.format = get_string(map, "format").or(scalar.format);
    scalar.default = map.get("default").map(yaml_to_json).or(scalar.default);
    scalar.example = map.get("example").map(yaml_to_json).or(scalar.example);
    scalar.pattern = get_string(map, "pattern").or(scalar.pattern);
    scalar.minimum = map.get("minimum").map(yaml_to_json).or(scalar.minimum);
    scalar.maximum = map.get("maximum").map(yaml_to_json).or(scalar.maximum);
    scalar.min_length = map
        .get("minLength")
        .and_then(Value::as_u64)
        .or(scalar.min_length);
    scalar.max_length = map
        .get("maxLength")
        .and_then(Value::as_u64)
        .or(scalar.max_length);
    scalar
}

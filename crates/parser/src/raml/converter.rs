//! Converts a loaded RAML document to the ApiModel IR

use super::types::{
    get_string, json_schema_literal, parse_type_declaration, parse_type_expression,
    scalar_string, string_list,
};
use crate::model::{
    ApiModel, Endpoint, HttpMethod, ObjectShape, Operation, Parameter, Payload, Property,
    Response, Shape,
};
use raml_api_docs_common::{ModelingError, RamlVersion};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;

const DEFAULT_MEDIA_TYPE: &str = "application/json";

/// Version-dependent conversion rules
struct ConversionContext {
    version: RamlVersion,
    default_media_type: String,
}

/// Convert a parsed RAML document to an ApiModel
pub fn convert_raml_to_model(doc: &Value, version: RamlVersion) -> Result<ApiModel, ModelingError> {
    let root = doc
        .as_mapping()
        .ok_or_else(|| ModelingError::Parse("RAML document root must be a mapping".to_string()))?;

    let title = get_string(root, "title")
        .ok_or_else(|| ModelingError::Parse("missing required field 'title'".to_string()))?;

    let mut model = ApiModel::new(version, title);
    model.version = get_string(root, "version");
    model.description = get_string(root, "description");
    model.base_uri = get_string(root, "baseUri").map(|uri| match &model.version {
        Some(v) => uri.replace("{version}", v),
        None => uri,
    });
    model.protocols = string_list(root.get("protocols"))
        .into_iter()
        .map(|p| p.to_lowercase())
        .collect();
    model.media_types = string_list(root.get("mediaType"));

    let ctx = ConversionContext {
        version,
        default_media_type: model
            .media_types
            .first()
            .cloned()
            .unwrap_or_else(|| DEFAULT_MEDIA_TYPE.to_string()),
    };

    model.types = extract_types(root, &ctx);

    let mut endpoints = Vec::new();
    collect_resources(root, "", &[], &ctx, &mut endpoints);
    model.endpoints = endpoints;

    if let Some(name) = first_undeclared_reference(&model) {
        return Err(ModelingError::Parse(format!("unknown type '{}'", name)));
    }

    Ok(model)
}

/// First type name referenced anywhere in the model without a declaration
fn first_undeclared_reference(model: &ApiModel) -> Option<&str> {
    let types = &model.types;
    types
        .values()
        .find_map(|shape| undeclared_in(shape, types))
        .or_else(|| {
            model.endpoints.iter().find_map(|endpoint| {
                undeclared_in_parameters(&endpoint.uri_parameters, types).or_else(|| {
                    endpoint
                        .operations
                        .iter()
                        .find_map(|op| undeclared_in_operation(op, types))
                })
            })
        })
}

fn undeclared_in_operation<'a>(
    op: &'a Operation,
    types: &BTreeMap<String, Shape>,
) -> Option<&'a str> {
    undeclared_in_parameters(&op.query_parameters, types)
        .or_else(|| undeclared_in_parameters(&op.headers, types))
        .or_else(|| undeclared_in_payloads(&op.request_bodies, types))
        .or_else(|| {
            op.responses.iter().find_map(|r| {
                undeclared_in_parameters(&r.headers, types)
                    .or_else(|| undeclared_in_payloads(&r.bodies, types))
            })
        })
}

fn undeclared_in_parameters<'a>(
    params: &'a [Parameter],
    types: &BTreeMap<String, Shape>,
) -> Option<&'a str> {
    params.iter().find_map(|p| undeclared_in(&p.shape, types))
}

fn undeclared_in_payloads<'a>(
    bodies: &'a [Payload],
    types: &BTreeMap<String, Shape>,
) -> Option<&'a str> {
    bodies
        .iter()
        .filter_map(|b| b.shape.as_ref())
        .find_map(|shape| undeclared_in(shape, types))
}

fn undeclared_in<'a>(shape: &'a Shape, types: &BTreeMap<String, Shape>) -> Option<&'a str> {
    match shape {
        Shape::Reference(name) if !types.contains_key(name) => Some(name.as_str()),
        Shape::Array { items, .. } => undeclared_in(items, types),
        Shape::Object(object) => object
            .properties
            .iter()
            .find_map(|p| undeclared_in(&p.shape, types)),
        _ => None,
    }
}

/// Extract named types from `schemas` (0.8, 1.0) and `types` (1.0)
fn extract_types(root: &Mapping, ctx: &ConversionContext) -> BTreeMap<String, Shape> {
    let mut types = BTreeMap::new();

    let mut sections = vec![root.get("schemas")];
    if ctx.version == RamlVersion::V10 {
        sections.push(root.get("types"));
    }

    for section in sections.into_iter().flatten() {
        match section {
            Value::Mapping(map) => insert_type_entries(map, ctx, &mut types),
            // 0.8 form: a list of single-entry maps
            Value::Sequence(entries) => {
                for entry in entries {
                    if let Value::Mapping(map) = entry {
                        insert_type_entries(map, ctx, &mut types);
                    }
                }
            }
            _ => {}
        }
    }

    types
}

fn insert_type_entries(map: &Mapping, ctx: &ConversionContext, types: &mut BTreeMap<String, Shape>) {
    for (key, decl) in map {
        if let Some(name) = scalar_string(key) {
            types.insert(name, schema_declaration(decl, ctx));
        }
    }
}

/// Parse a schema or type declaration honoring the grammar version
fn schema_declaration(decl: &Value, ctx: &ConversionContext) -> Shape {
    match (ctx.version, decl) {
        (RamlVersion::V08, Value::String(text)) => schema_reference(text),
        (RamlVersion::V08, _) => Shape::Any,
        (RamlVersion::V10, _) => parse_type_declaration(decl),
    }
}

/// 0.8 schema text: an inline JSON schema, an XML schema or a schema name
fn schema_reference(text: &str) -> Shape {
    if let Some(shape) = json_schema_literal(text) {
        return shape;
    }
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.starts_with('<') || trimmed.contains('\n') {
        Shape::Any
    } else {
        Shape::Reference(trimmed.to_string())
    }
}

fn collect_resources(
    node: &Mapping,
    parent_path: &str,
    inherited: &[Parameter],
    ctx: &ConversionContext,
    out: &mut Vec<Endpoint>,
) {
    for (key, value) in node {
        let Some(segment) = key.as_str().filter(|k| k.starts_with('/')) else {
            continue;
        };

        let path = format!("{}{}", parent_path, segment);
        let empty = Mapping::new();
        let resource = value.as_mapping().unwrap_or(&empty);

        let mut uri_parameters = inherited.to_vec();
        for param in parse_parameters(resource.get("uriParameters"), true, ctx) {
            uri_parameters.retain(|p| p.name != param.name);
            uri_parameters.push(param);
        }
        for name in path_template_names(&path) {
            if !uri_parameters.iter().any(|p| p.name == name) {
                uri_parameters.push(Parameter {
                    name,
                    description: None,
                    required: true,
                    shape: Shape::string(),
                });
            }
        }

        let operations: Vec<Operation> = HttpMethod::ALL
            .iter()
            .filter_map(|method| {
                resource
                    .get(method.as_str())
                    .map(|node| parse_operation(*method, node, ctx))
            })
            .collect();

        if !operations.is_empty() {
            out.push(Endpoint {
                path: path.clone(),
                display_name: get_string(resource, "displayName"),
                description: get_string(resource, "description"),
                uri_parameters: uri_parameters.clone(),
                operations,
            });
        }

        collect_resources(resource, &path, &uri_parameters, ctx, out);
    }
}

/// Names of `{param}` segments in a path template
fn path_template_names(path: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = path;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let name = &rest[start + 1..start + len];
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
        rest = &rest[start + len + 1..];
    }
    names
}

fn parse_operation(method: HttpMethod, node: &Value, ctx: &ConversionContext) -> Operation {
    let mut operation = Operation::new(method);
    let Some(map) = node.as_mapping() else {
        return operation;
    };

    // query parameters and headers are required by default only in 1.0
    let default_required = ctx.version == RamlVersion::V10;

    operation.display_name = get_string(map, "displayName");
    operation.description = get_string(map, "description");
    operation.query_parameters = parse_parameters(map.get("queryParameters"), default_required, ctx);
    operation.headers = parse_parameters(map.get("headers"), default_required, ctx);
    operation.request_bodies = parse_bodies(map.get("body"), ctx);
    operation.responses = parse_responses(map.get("responses"), ctx);
    operation
}

fn parse_parameters(
    node: Option<&Value>,
    default_required: bool,
    ctx: &ConversionContext,
) -> Vec<Parameter> {
    let Some(Value::Mapping(params)) = node else {
        return Vec::new();
    };

    params
        .iter()
        .filter_map(|(key, decl)| {
            let raw_name = scalar_string(key)?;
            let (name, optional) = match raw_name.strip_suffix('?') {
                Some(stripped) if ctx.version == RamlVersion::V10 => (stripped.to_string(), true),
                _ => (raw_name, false),
            };

            let (description, required) = match decl {
                Value::Mapping(m) => (
                    get_string(m, "description"),
                    m.get("required")
                        .and_then(Value::as_bool)
                        .unwrap_or(default_required && !optional),
                ),
                _ => (None, default_required && !optional),
            };

            Some(Parameter {
                name,
                description,
                required,
                shape: parse_type_declaration(decl),
            })
        })
        .collect()
}

fn parse_bodies(node: Option<&Value>, ctx: &ConversionContext) -> Vec<Payload> {
    let Some(node) = node else {
        return Vec::new();
    };

    let keyed_by_media_type = node
        .as_mapping()
        .map(|m| m.keys().any(|k| k.as_str().is_some_and(|k| k.contains('/'))))
        .unwrap_or(false);

    if keyed_by_media_type {
        node.as_mapping()
            .into_iter()
            .flatten()
            .filter_map(|(key, value)| {
                Some(Payload {
                    media_type: scalar_string(key)?,
                    shape: parse_payload_shape(value, ctx),
                })
            })
            .collect()
    } else {
        // 1.0 body declared directly with the default media type
        vec![Payload {
            media_type: ctx.default_media_type.clone(),
            shape: parse_payload_shape(node, ctx),
        }]
    }
}

fn parse_payload_shape(value: &Value, ctx: &ConversionContext) -> Option<Shape> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(match ctx.version {
            RamlVersion::V08 => schema_reference(text),
            RamlVersion::V10 => parse_type_expression(text),
        }),
        Value::Mapping(map) => {
            if let Some(Value::Mapping(form)) = map.get("formParameters") {
                let properties = form
                    .iter()
                    .filter_map(|(key, decl)| {
                        let required = decl
                            .as_mapping()
                            .and_then(|m| m.get("required"))
                            .and_then(Value::as_bool)
                            .unwrap_or(false);
                        Some(Property {
                            name: scalar_string(key)?,
                            required,
                            shape: parse_type_declaration(decl),
                        })
                    })
                    .collect();
                return Some(Shape::Object(ObjectShape {
                    description: None,
                    properties,
                }));
            }

            match ctx.version {
                RamlVersion::V08 => match map.get("schema") {
                    Some(Value::String(text)) => Some(schema_reference(text)),
                    _ => None,
                },
                RamlVersion::V10 => {
                    let declares_shape = ["type", "schema", "properties", "items"]
                        .iter()
                        .any(|k| map.contains_key(*k));
                    declares_shape.then(|| parse_type_declaration(value))
                }
            }
        }
        _ => None,
    }
}

fn parse_responses(node: Option<&Value>, ctx: &ConversionContext) -> Vec<Response> {
    let Some(Value::Mapping(responses)) = node else {
        return Vec::new();
    };

    responses
        .iter()
        .filter_map(|(code, value)| {
            let status = scalar_string(code)?;
            let map = value.as_mapping();
            Some(Response {
                status,
                description: map.and_then(|m| get_string(m, "description")),
                headers: parse_parameters(map.and_then(|m| m.get("headers")), false, ctx),
                bodies: parse_bodies(map.and_then(|m| m.get("body")), ctx),
            })
        })
        .collect()
}

//! Converts the ApiModel IR to an OpenAPI 2.0 document

use super::types::{
    Info, Operation, Parameter, ParameterLocation, PathItem, Response, Schema, SwaggerSpec,
};
use crate::model::{self, ApiModel, HttpMethod, ScalarKind, Shape};
use serde_json::Value;
use std::collections::BTreeMap;
use url::Url;

const DEFAULT_API_VERSION: &str = "1.0";

const FORM_MEDIA_TYPES: [&str; 2] = ["application/x-www-form-urlencoded", "multipart/form-data"];

/// Convert an ApiModel to a Swagger document
pub fn convert_model_to_swagger(model: &ApiModel) -> SwaggerSpec {
    let (host, base_path, uri_scheme) = split_base_uri(model.base_uri.as_deref());

    let schemes = if model.protocols.is_empty() {
        uri_scheme.into_iter().collect()
    } else {
        model.protocols.clone()
    };

    let mut paths = BTreeMap::new();
    for endpoint in &model.endpoints {
        let item: &mut PathItem = paths.entry(endpoint.path.clone()).or_default();
        for op in &endpoint.operations {
            let converted = convert_operation(model, endpoint, op);
            let slot = match op.method {
                HttpMethod::Get => &mut item.get,
                HttpMethod::Post => &mut item.post,
                HttpMethod::Put => &mut item.put,
                HttpMethod::Patch => &mut item.patch,
                HttpMethod::Delete => &mut item.delete,
                HttpMethod::Head => &mut item.head,
                HttpMethod::Options => &mut item.options,
            };
            *slot = Some(converted);
        }
    }

    let definitions = model
        .types
        .iter()
        .map(|(name, shape)| (name.clone(), shape_to_schema(shape)))
        .collect();

    SwaggerSpec {
        swagger: "2.0".to_string(),
        info: Info {
            title: model.title.clone(),
            version: model
                .version
                .clone()
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            description: model.description.clone(),
        },
        host,
        base_path,
        schemes,
        consumes: model.media_types.clone(),
        produces: model.media_types.clone(),
        paths,
        definitions,
    }
}

/// Split a base URI into host, base path and scheme
fn split_base_uri(base_uri: Option<&str>) -> (Option<String>, Option<String>, Option<String>) {
    let Some(raw) = base_uri else {
        return (None, None, None);
    };

    match Url::parse(raw) {
        Ok(url) => {
            let host = url.host_str().map(|h| match url.port() {
                Some(port) => format!("{}:{}", h, port),
                None => h.to_string(),
            });
            let path = url.path().trim_end_matches('/');
            let base_path = (!path.is_empty()).then(|| path.to_string());
            (host, base_path, Some(url.scheme().to_string()))
        }
        Err(e) => {
            tracing::debug!("Ignoring unparseable baseUri '{}': {}", raw, e);
            (None, None, None)
        }
    }
}

fn convert_operation(
    model: &ApiModel,
    endpoint: &model::Endpoint,
    op: &model::Operation,
) -> Operation {
    let mut parameters = Vec::new();

    for param in &endpoint.uri_parameters {
        let mut converted = convert_parameter(param, ParameterLocation::Path);
        // path parameters are always required in Swagger
        converted.required = true;
        parameters.push(converted);
    }
    parameters.extend(
        op.query_parameters
            .iter()
            .map(|p| convert_parameter(p, ParameterLocation::Query)),
    );
    parameters.extend(
        op.headers
            .iter()
            .map(|p| convert_parameter(p, ParameterLocation::Header)),
    );

    if let Some(payload) = op.request_bodies.first() {
        if FORM_MEDIA_TYPES.contains(&payload.media_type.as_str()) {
            parameters.extend(form_parameters(payload.shape.as_ref()));
        } else {
            parameters.push(Parameter {
                name: "body".to_string(),
                location: ParameterLocation::Body,
                description: None,
                required: true,
                schema: Some(payload.shape.as_ref().map(shape_to_schema).unwrap_or_default()),
                type_info: Schema::default(),
            });
        }
    }

    let mut responses: BTreeMap<String, Response> = op
        .responses
        .iter()
        .map(|r| (r.status.clone(), convert_response(r)))
        .collect();
    if responses.is_empty() {
        responses.insert(
            "default".to_string(),
            Response {
                description: String::new(),
                schema: None,
                headers: BTreeMap::new(),
            },
        );
    }

    let consumes = media_types_if_different(
        op.request_bodies.iter().map(|p| p.media_type.clone()),
        &model.media_types,
    );
    let produces = media_types_if_different(
        op.responses
            .iter()
            .flat_map(|r| r.bodies.iter().map(|p| p.media_type.clone())),
        &model.media_types,
    );

    Operation {
        summary: op.display_name.clone(),
        description: op.description.clone(),
        consumes,
        produces,
        parameters,
        responses,
    }
}

/// Collect distinct media types, empty when they match the document defaults
fn media_types_if_different(
    media_types: impl Iterator<Item = String>,
    defaults: &[String],
) -> Vec<String> {
    let mut distinct: Vec<String> = Vec::new();
    for media_type in media_types {
        if !distinct.contains(&media_type) {
            distinct.push(media_type);
        }
    }
    if distinct.iter().all(|m| defaults.contains(m)) {
        Vec::new()
    } else {
        distinct
    }
}

fn convert_parameter(param: &model::Parameter, location: ParameterLocation) -> Parameter {
    Parameter {
        name: param.name.clone(),
        location,
        description: param.description.clone().or_else(|| shape_description(&param.shape)),
        required: param.required,
        schema: None,
        type_info: simple_type_schema(&param.shape),
    }
}

fn form_parameters(shape: Option<&Shape>) -> Vec<Parameter> {
    let Some(Shape::Object(object)) = shape else {
        return Vec::new();
    };
    object
        .properties
        .iter()
        .map(|prop| Parameter {
            name: prop.name.clone(),
            location: ParameterLocation::FormData,
            description: shape_description(&prop.shape),
            required: prop.required,
            schema: None,
            type_info: simple_type_schema(&prop.shape),
        })
        .collect()
}

fn convert_response(response: &model::Response) -> Response {
    let schema = response
        .bodies
        .iter()
        .find_map(|p| p.shape.as_ref())
        .map(shape_to_schema);

    let headers = response
        .headers
        .iter()
        .map(|h| {
            let mut schema = simple_type_schema(&h.shape);
            schema.description = h.description.clone().or_else(|| shape_description(&h.shape));
            (h.name.clone(), schema)
        })
        .collect();

    Response {
        description: response.description.clone().unwrap_or_default(),
        schema,
        headers,
    }
}

fn shape_description(shape: &Shape) -> Option<String> {
    match shape {
        Shape::Scalar(s) => s.description.clone(),
        Shape::Object(o) => o.description.clone(),
        Shape::Array { description, .. } => description.clone(),
        _ => None,
    }
}

fn scalar_type(kind: ScalarKind) -> (&'static str, Option<&'static str>) {
    match kind {
        ScalarKind::String | ScalarKind::Time => ("string", None),
        ScalarKind::Integer => ("integer", None),
        ScalarKind::Number => ("number", None),
        ScalarKind::Boolean => ("boolean", None),
        ScalarKind::Date => ("string", Some("date")),
        ScalarKind::DateTime => ("string", Some("date-time")),
        ScalarKind::File => ("file", None),
    }
}

/// Inline type for non-body parameters and headers, which cannot be objects or references
fn simple_type_schema(shape: &Shape) -> Schema {
    let mut schema = match shape {
        Shape::Scalar(_) => shape_to_schema(shape),
        Shape::Array { items, .. } => Schema {
            schema_type: Some("array".to_string()),
            items: Some(Box::new(simple_type_schema(items))),
            ..Default::default()
        },
        _ => Schema::typed("string", None),
    };
    // parameters and headers carry neither descriptions nor examples inline
    schema.description = None;
    schema.example = None;
    schema
}

/// Convert a shape to a full schema object
pub fn shape_to_schema(shape: &Shape) -> Schema {
    match shape {
        Shape::Scalar(scalar) => {
            let (schema_type, default_format) = scalar_type(scalar.kind);
            Schema {
                schema_type: Some(schema_type.to_string()),
                format: scalar
                    .format
                    .clone()
                    .or_else(|| default_format.map(str::to_string)),
                description: scalar.description.clone(),
                enum_values: scalar.enum_values.clone(),
                default: scalar.default.clone(),
                example: scalar.example.clone(),
                pattern: scalar.pattern.clone(),
                minimum: scalar.minimum.clone(),
                maximum: scalar.maximum.clone(),
                min_length: scalar.min_length,
                max_length: scalar.max_length,
                ..Default::default()
            }
        }
        Shape::Array { items, description } => Schema {
            schema_type: Some("array".to_string()),
            description: description.clone(),
            items: Some(Box::new(shape_to_schema(items))),
            ..Default::default()
        },
        Shape::Object(object) => Schema {
            schema_type: Some("object".to_string()),
            description: object.description.clone(),
            properties: object
                .properties
                .iter()
                .map(|p| (p.name.clone(), shape_to_schema(&p.shape)))
                .collect(),
            required: object
                .properties
                .iter()
                .filter(|p| p.required)
                .map(|p| p.name.clone())
                .collect(),
            ..Default::default()
        },
        Shape::Reference(name) => Schema::reference(name),
        Shape::JsonSchema(raw) => json_schema_to_swagger(raw),
        Shape::Any => Schema::default(),
    }
}

/// Carry an inline JSON schema into a Swagger schema
fn json_schema_to_swagger(raw: &Value) -> Schema {
    let mut raw = raw.clone();
    if let Value::Object(map) = &mut raw {
        // draft identifiers are not valid Swagger schema keywords
        map.remove("$schema");
        map.remove("id");
    }

    match serde_json::from_value::<Schema>(raw.clone()) {
        Ok(schema) => schema,
        Err(_) => match raw {
            Value::Object(map) => Schema {
                extra: map.into_iter().collect(),
                ..Default::default()
            },
            _ => Schema::default(),
        },
    }
}

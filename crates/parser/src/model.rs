//! Intermediate API model
//!
//! Version-neutral representation produced by the RAML modelers and
//! consumed by the OpenAPI 2.0 generator.

use raml_api_docs_common::RamlVersion;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Parsed API definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiModel {
    /// Grammar the model was read from
    pub raml_version: RamlVersion,

    /// API title
    pub title: String,

    /// API version (e.g., "v1")
    pub version: Option<String>,

    pub description: Option<String>,

    /// Base URI with `{version}` already substituted
    pub base_uri: Option<String>,

    /// Lowercase protocols (e.g., "https")
    pub protocols: Vec<String>,

    /// Default media types
    pub media_types: Vec<String>,

    /// Named data types
    pub types: BTreeMap<String, Shape>,

    /// Resources flattened to absolute paths, in declaration order
    pub endpoints: Vec<Endpoint>,
}

impl ApiModel {
    /// Create a model with only a title
    pub fn new(raml_version: RamlVersion, title: impl Into<String>) -> Self {
        Self {
            raml_version,
            title: title.into(),
            version: None,
            description: None,
            base_uri: None,
            protocols: Vec::new(),
            media_types: Vec::new(),
            types: BTreeMap::new(),
            endpoints: Vec::new(),
        }
    }

    /// Find an endpoint by its absolute path
    pub fn endpoint(&self, path: &str) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.path == path)
    }
}

/// A resource at an absolute path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Absolute path (e.g., "/users/{userId}")
    pub path: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    /// URI parameters, including those inherited from parent resources
    pub uri_parameters: Vec<Parameter>,
    pub operations: Vec<Operation>,
}

impl Endpoint {
    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        self.operations.iter().find(|op| op.method == method)
    }
}

/// HTTP methods RAML resources may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
        HttpMethod::Head,
        HttpMethod::Options,
    ];

    /// Lowercase key used in both RAML and OpenAPI documents
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A method on a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub method: HttpMethod,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub query_parameters: Vec<Parameter>,
    pub headers: Vec<Parameter>,
    pub request_bodies: Vec<Payload>,
    pub responses: Vec<Response>,
}

impl Operation {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            display_name: None,
            description: None,
            query_parameters: Vec::new(),
            headers: Vec::new(),
            request_bodies: Vec::new(),
            responses: Vec::new(),
        }
    }

    pub fn response(&self, status: &str) -> Option<&Response> {
        self.responses.iter().find(|r| r.status == status)
    }
}

/// Named parameter (URI, query or header)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub description: Option<String>,
    pub required: bool,
    pub shape: Shape,
}

/// Body content for one media type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub media_type: String,
    pub shape: Option<Shape>,
}

/// Response for one status code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Status code as written (e.g., "200")
    pub status: String,
    pub description: Option<String>,
    pub headers: Vec<Parameter>,
    pub bodies: Vec<Payload>,
}

/// Data shape of a parameter, property, body or named type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Scalar(ScalarShape),
    Array {
        items: Box<Shape>,
        description: Option<String>,
    },
    Object(ObjectShape),
    /// Reference to a named type
    Reference(String),
    /// Inline JSON schema carried through as-is
    JsonSchema(Value),
    Any,
}

impl Shape {
    pub fn scalar(kind: ScalarKind) -> Self {
        Shape::Scalar(ScalarShape::new(kind))
    }

    pub fn string() -> Self {
        Self::scalar(ScalarKind::String)
    }

    /// Attach a description where the shape can carry one
    pub fn with_description(mut self, text: Option<String>) -> Self {
        if text.is_none() {
            return self;
        }
        match &mut self {
            Shape::Scalar(s) => s.description = text,
            Shape::Object(o) => o.description = text,
            Shape::Array { description, .. } => *description = text,
            Shape::Reference(_) | Shape::JsonSchema(_) | Shape::Any => {}
        }
        self
    }
}

/// Scalar type kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalarKind {
    String,
    Integer,
    Number,
    Boolean,
    Date,
    DateTime,
    Time,
    File,
}

/// Scalar shape with its facets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarShape {
    pub kind: ScalarKind,
    pub format: Option<String>,
    pub description: Option<String>,
    pub enum_values: Vec<Value>,
    pub default: Option<Value>,
    pub example: Option<Value>,
    pub pattern: Option<String>,
    pub minimum: Option<Value>,
    pub maximum: Option<Value>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
}

impl ScalarShape {
    pub fn new(kind: ScalarKind) -> Self {
        Self {
            kind,
            format: None,
            description: None,
            enum_values: Vec::new(),
            default: None,
            example: None,
            pattern: None,
            minimum: None,
            maximum: None,
            min_length: None,
            max_length: None,
        }
    }
}

/// Object shape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectShape {
    pub description: Option<String>,
    pub properties: Vec<Property>,
}

/// Object property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub required: bool,
    pub shape: Shape,
}

use crate::path_params::{extract_path_parameters, find_operation_id_clash, operation_id_base};
use crate::routes::RouteTable;
use crate::serializer::serialize_yaml;
use anyhow::Result;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

/// Swagger version emitted in every document
pub const SWAGGER_VERSION: &str = "2.0";
/// Name of the single security scheme every operation refers to
pub const SECURITY_SCHEME_NAME: &str = "firebase";
/// Token issuer host; the project id is appended as the issuer path
pub const TOKEN_ISSUER_BASE: &str = "https://securetoken.google.com";
/// Public key set used to verify issued tokens
pub const JWKS_URI: &str =
    "https://www.googleapis.com/service_accounts/v1/metadata/x509/securetoken@system.gserviceaccount.com";
/// Protocol the gateway uses to reach backends
pub const BACKEND_PROTOCOL: &str = "h2";
/// Gateway path translation mode
pub const PATH_TRANSLATION: &str = "APPEND_PATH_TO_ADDRESS";
const JSON_MEDIA_TYPE: &str = "application/json";

/// Gateway document builder
pub struct OpenApiBuilder {
    /// Swagger info section
    info: Info,
    /// Externally visible service name, used as `host`
    service_name: String,
    /// Project identity the token issuer and audience are bound to
    project_id: String,
    /// Paths collection (route template -> PathItem)
    paths: IndexMap<String, PathItem>,
}

/// HTTP methods generated for every route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Every generated method, in document order
    pub const ALL: [HttpMethod; 4] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
    ];

    /// Upper-case method name, as used in summaries
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Suffix appended to the operation id base
    fn operation_suffix(&self) -> &'static str {
        match self {
            HttpMethod::Get => "Get",
            HttpMethod::Post => "Post",
            HttpMethod::Put => "Put",
            HttpMethod::Delete => "Delete",
        }
    }

    /// Whether the method carries a request body parameter
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }

    /// Response codes declared for the method.
    ///
    /// PUT only declares `200`, the same set the template-based generator emitted.
    /// Whether it should match the other methods is still unconfirmed.
    fn response_codes(&self) -> &'static [(&'static str, &'static str)] {
        const FULL: &[(&str, &str)] = &[
            ("200", "OK"),
            ("400", "Bad request"),
            ("500", "Server error"),
        ];
        const OK_ONLY: &[(&str, &str)] = &[("200", "OK")];

        match self {
            HttpMethod::Put => OK_ONLY,
            _ => FULL,
        }
    }
}

/// Swagger Info object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    /// API title
    pub title: String,
    /// API description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// API version
    pub version: String,
}

impl Default for Info {
    fn default() -> Self {
        Self {
            title: "API Gateway".to_string(),
            description: Some("ESPv2 Gateway with Firebase JWT validation".to_string()),
            version: "1.0.0".to_string(),
        }
    }
}

/// `x-google-endpoints` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub name: String,
    #[serde(rename = "allowCors")]
    pub allow_cors: bool,
}

/// OAuth2 implicit-flow security scheme validated by the gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityScheme {
    #[serde(rename = "authorizationUrl")]
    pub authorization_url: String,
    pub flow: String,
    #[serde(rename = "type")]
    pub scheme_type: String,
    #[serde(rename = "x-google-issuer")]
    pub issuer: String,
    #[serde(rename = "x-google-jwks_uri")]
    pub jwks_uri: String,
    #[serde(rename = "x-google-audiences")]
    pub audiences: String,
}

impl SecurityScheme {
    /// Build the token scheme bound to `project_id`
    pub fn firebase(project_id: &str) -> Self {
        Self {
            authorization_url: String::new(),
            flow: "implicit".to_string(),
            scheme_type: "oauth2".to_string(),
            issuer: format!("{}/{}", TOKEN_ISSUER_BASE, project_id),
            jwks_uri: JWKS_URI.to_string(),
            audiences: project_id.to_string(),
        }
    }
}

/// Swagger PathItem object - all operations for a single route
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
}

impl PathItem {
    /// Operation registered for `method`, if any
    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
        }
    }

    /// Iterate over the present operations in document order
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> {
        HttpMethod::ALL
            .into_iter()
            .filter_map(move |method| self.operation(method).map(|op| (method, op)))
    }

    fn set_operation(&mut self, method: HttpMethod, operation: Operation) {
        match method {
            HttpMethod::Get => self.get = Some(operation),
            HttpMethod::Post => self.post = Some(operation),
            HttpMethod::Put => self.put = Some(operation),
            HttpMethod::Delete => self.delete = Some(operation),
        }
    }
}

/// Security requirement: scheme name -> scopes
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

/// Swagger Operation object with the gateway backend extension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub summary: String,
    #[serde(rename = "operationId")]
    pub operation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,
    #[serde(rename = "x-google-backend")]
    pub backend: BackendRouting,
    pub security: Vec<SecurityRequirement>,
    pub responses: IndexMap<String, Response>,
}

/// Swagger 2.0 Parameter object.
///
/// Path parameters carry a `type`; the body parameter carries a `schema` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    pub required: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

impl Parameter {
    /// Required string parameter located in the path
    pub fn path(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: "path".to_string(),
            required: true,
            param_type: Some("string".to_string()),
            schema: None,
        }
    }

    /// Required generic object request body
    pub fn body() -> Self {
        Self {
            name: "body".to_string(),
            location: "body".to_string(),
            required: true,
            param_type: None,
            schema: Some(Schema {
                schema_type: "object".to_string(),
            }),
        }
    }
}

/// Minimal schema used by the body parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "type")]
    pub schema_type: String,
}

/// `x-google-backend` routing descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendRouting {
    pub address: String,
    pub protocol: String,
    pub jwt_audience: String,
    pub path_translation: String,
}

impl BackendRouting {
    /// Route to `address`, using it as the JWT audience as well
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            protocol: BACKEND_PROTOCOL.to_string(),
            jwt_audience: address.to_string(),
            path_translation: PATH_TRANSLATION.to_string(),
        }
    }
}

/// Swagger Response object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub description: String,
}

/// Complete Swagger 2.0 gateway document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwaggerDocument {
    pub swagger: String,
    pub info: Info,
    pub host: String,
    pub schemes: Vec<String>,
    pub produces: Vec<String>,
    pub consumes: Vec<String>,
    #[serde(rename = "x-google-endpoints")]
    pub endpoints: Vec<Endpoint>,
    #[serde(rename = "securityDefinitions")]
    pub security_definitions: IndexMap<String, SecurityScheme>,
    pub paths: IndexMap<String, PathItem>,
}

impl SwaggerDocument {
    /// Total number of operations across all paths
    pub fn operation_count(&self) -> usize {
        self.paths.values().map(|item| item.operations().count()).sum()
    }
}

impl OpenApiBuilder {
    /// Create a builder for the gateway serving `service_name`, with tokens issued for `project_id`
    pub fn new(service_name: impl Into<String>, project_id: impl Into<String>) -> Self {
        let service_name = service_name.into();
        let project_id = project_id.into();
        debug!(
            "Initializing OpenApiBuilder for service {} (project {})",
            service_name, project_id
        );
        Self {
            info: Info::default(),
            service_name,
            project_id,
            paths: IndexMap::new(),
        }
    }

    /// Set custom info for the API
    pub fn with_info(mut self, info: Info) -> Self {
        self.info = info;
        self
    }

    /// Add every route of `routes` in table order
    pub fn add_routes(&mut self, routes: &RouteTable) {
        for (path, backend_address) in routes.iter() {
            self.add_route(path, backend_address);
        }
    }

    /// Add the GET, POST, PUT and DELETE operations for one route.
    ///
    /// Adding a path twice replaces its operations.
    pub fn add_route(&mut self, path: &str, backend_address: &str) {
        debug!("Adding route: {} -> {}", path, backend_address);

        let id_base = operation_id_base(path);
        let path_parameters: Vec<Parameter> = extract_path_parameters(path)
            .into_iter()
            .map(Parameter::path)
            .collect();
        debug!("Route {} has {} path parameter(s)", path, path_parameters.len());

        let mut path_item = PathItem::default();
        for method in HttpMethod::ALL {
            let operation = self.build_operation(&id_base, method, &path_parameters, backend_address);
            path_item.set_operation(method, operation);
        }

        self.paths.insert(path.to_string(), path_item);
    }

    fn build_operation(
        &self,
        id_base: &str,
        method: HttpMethod,
        path_parameters: &[Parameter],
        backend_address: &str,
    ) -> Operation {
        let mut parameters = path_parameters.to_vec();
        if method.has_body() {
            parameters.push(Parameter::body());
        }

        let responses = method
            .response_codes()
            .iter()
            .map(|(code, description)| {
                (
                    code.to_string(),
                    Response {
                        description: description.to_string(),
                    },
                )
            })
            .collect();

        let mut requirement = SecurityRequirement::new();
        requirement.insert(SECURITY_SCHEME_NAME.to_string(), Vec::new());

        Operation {
            summary: format!("{} ({})", id_base, method.as_str()),
            operation_id: format!("{}{}", id_base, method.operation_suffix()),
            parameters: if parameters.is_empty() {
                None
            } else {
                Some(parameters)
            },
            backend: BackendRouting::new(backend_address),
            security: vec![requirement],
            responses,
        }
    }

    /// Build the final gateway document
    pub fn build(self) -> SwaggerDocument {
        debug!("Building final gateway document with {} path(s)", self.paths.len());

        let mut security_definitions = IndexMap::new();
        security_definitions.insert(
            SECURITY_SCHEME_NAME.to_string(),
            SecurityScheme::firebase(&self.project_id),
        );

        SwaggerDocument {
            swagger: SWAGGER_VERSION.to_string(),
            info: self.info,
            host: self.service_name.clone(),
            schemes: vec!["https".to_string()],
            produces: vec![JSON_MEDIA_TYPE.to_string()],
            consumes: vec![JSON_MEDIA_TYPE.to_string()],
            endpoints: vec![Endpoint {
                name: self.service_name,
                allow_cors: true,
            }],
            security_definitions,
            paths: self.paths,
        }
    }
}

/// Generate the serialized YAML gateway document for `routes`.
///
/// # Errors
///
/// Fails if two routes would share an `operationId`, or if serialization fails.
///
/// # Example
///
/// ```
/// use espv2_openapi::openapi_builder::generate_openapi_spec;
/// use espv2_openapi::routes::RouteTable;
///
/// let routes: RouteTable = [("/hello", "https://hello-abc123-uc.a.run.app")]
///     .into_iter()
///     .collect();
/// let yaml = generate_openapi_spec(
///     &routes,
///     "api.endpoints.my-gcp-project.cloud.goog",
///     "my-gcp-project",
/// )
/// .unwrap();
/// assert!(yaml.contains("/hello:"));
/// ```
pub fn generate_openapi_spec(routes: &RouteTable, service_name: &str, project_id: &str) -> Result<String> {
    if let Some((first, second)) = find_operation_id_clash(routes.iter().map(|(path, _)| path)) {
        anyhow::bail!(
            "Routes {} and {} produce the same operationId base '{}'",
            first,
            second,
            operation_id_base(second)
        );
    }

    let mut builder = OpenApiBuilder::new(service_name, project_id);
    builder.add_routes(routes);
    serialize_yaml(&builder.build())
}

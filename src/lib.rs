//! ESPv2 OpenAPI Generator - Swagger 2.0 gateway documents from a route table.
//!
//! Given a mapping of route path templates to backend addresses, this library produces the
//! Swagger 2.0 document an ESPv2 API gateway is provisioned with. Every route gets GET, POST,
//! PUT and DELETE operations carrying an `x-google-backend` routing block and a requirement on
//! the single Firebase JWT security scheme.
//!
//! # Architecture
//!
//! 1. [`path_params`] - Extracts `{name}` parameters from route templates
//! 2. [`routes`] - Ordered, unique-by-path route table
//! 3. [`openapi_builder`] - Typed document model and the builder that fills it
//! 4. [`serializer`] - Serializes the document to YAML or JSON
//! 5. [`config`] - Gateway configuration file and route table construction
//!
//! # Example Usage
//!
//! ```
//! use espv2_openapi::{openapi_builder::OpenApiBuilder, routes::RouteTable, serializer::serialize_yaml};
//!
//! let mut routes = RouteTable::new();
//! routes.insert("/hello", "https://hello-abc123-uc.a.run.app");
//! routes.insert("/items/{id}", "https://items-abc123-uc.a.run.app");
//!
//! let mut builder = OpenApiBuilder::new("api.endpoints.my-gcp-project.cloud.goog", "my-gcp-project");
//! builder.add_routes(&routes);
//! let document = builder.build();
//! assert_eq!(document.operation_count(), 8);
//!
//! let yaml = serialize_yaml(&document).unwrap();
//! println!("{}", yaml);
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod cli;
pub mod config;
pub mod error;
pub mod openapi_builder;
pub mod path_params;
pub mod routes;
pub mod serializer;

use espv2_openapi::{
    cli::{render, OutputFormat},
    config::GatewayConfig,
    openapi_builder::{generate_openapi_spec, SwaggerDocument},
    path_params::extract_path_parameters,
    routes::RouteTable,
};
use pretty_assertions::assert_eq;
use serde_yaml::Value;
use tempfile::TempDir;

const SERVICE: &str = "api.endpoints.my-gcp-project.cloud.goog";
const PROJECT: &str = "my-gcp-project";

fn routes(entries: &[(&str, &str)]) -> RouteTable {
    entries.iter().copied().collect()
}

fn generate(entries: &[(&str, &str)]) -> Value {
    let yaml = generate_openapi_spec(&routes(entries), SERVICE, PROJECT)
        .expect("Failed to generate gateway document");
    serde_yaml::from_str(&yaml).expect("Generated document should be valid YAML")
}

#[test]
fn test_hello_route_scenario() {
    let backend = "https://hello-abc123-uc.a.run.app";
    let doc = generate(&[("/hello", backend)]);

    assert_eq!(doc["host"].as_str(), Some(SERVICE));

    let hello = &doc["paths"]["/hello"];
    for method in ["get", "post", "put", "delete"] {
        assert_eq!(
            hello[method]["x-google-backend"]["address"].as_str(),
            Some(backend),
            "{} should route to the backend",
            method
        );
        assert_eq!(hello[method]["x-google-backend"]["jwt_audience"].as_str(), Some(backend));
        assert_eq!(hello[method]["x-google-backend"]["protocol"].as_str(), Some("h2"));
        assert_eq!(
            hello[method]["x-google-backend"]["path_translation"].as_str(),
            Some("APPEND_PATH_TO_ADDRESS")
        );
    }

    assert!(hello["get"].get("parameters").is_none());
    assert!(hello["delete"].get("parameters").is_none());
}

#[test]
fn test_empty_routes_scenario() {
    let doc = generate(&[]);

    assert_eq!(doc["swagger"].as_str(), Some("2.0"));
    assert_eq!(doc["host"].as_str(), Some(SERVICE));
    assert_eq!(doc["schemes"][0].as_str(), Some("https"));
    assert_eq!(doc["x-google-endpoints"][0]["name"].as_str(), Some(SERVICE));
    assert_eq!(doc["x-google-endpoints"][0]["allowCors"].as_bool(), Some(true));

    let firebase = &doc["securityDefinitions"]["firebase"];
    assert_eq!(firebase["type"].as_str(), Some("oauth2"));
    assert_eq!(firebase["flow"].as_str(), Some("implicit"));
    assert_eq!(firebase["authorizationUrl"].as_str(), Some(""));
    assert_eq!(
        firebase["x-google-issuer"].as_str(),
        Some("https://securetoken.google.com/my-gcp-project")
    );
    assert_eq!(firebase["x-google-audiences"].as_str(), Some(PROJECT));

    let paths = doc["paths"].as_mapping().expect("paths should be a mapping");
    assert!(paths.is_empty());
}

#[test]
fn test_path_parameter_scenario() {
    let doc = generate(&[("/items/{id}", "https://items-abc123-uc.a.run.app")]);
    let item = &doc["paths"]["/items/{id}"];

    let get_params = item["get"]["parameters"].as_sequence().unwrap();
    assert_eq!(get_params.len(), 1);
    assert_eq!(get_params[0]["name"].as_str(), Some("id"));
    assert_eq!(get_params[0]["in"].as_str(), Some("path"));
    assert_eq!(get_params[0]["required"].as_bool(), Some(true));
    assert_eq!(get_params[0]["type"].as_str(), Some("string"));

    let post_params = item["post"]["parameters"].as_sequence().unwrap();
    assert_eq!(post_params.len(), 2);
    assert_eq!(post_params[0]["name"].as_str(), Some("id"));
    assert_eq!(post_params[1]["name"].as_str(), Some("body"));
    assert_eq!(post_params[1]["in"].as_str(), Some("body"));
    assert_eq!(post_params[1]["schema"]["type"].as_str(), Some("object"));

    assert_eq!(item["get"]["operationId"].as_str(), Some("itemsidGet"));
    assert_eq!(item["delete"]["operationId"].as_str(), Some("itemsidDelete"));
}

#[test]
fn test_operation_count_and_security() {
    let entries = [
        ("/hello", "https://hello.example"),
        ("/items/{id}", "https://items.example"),
        ("/users/{user}/orders/{order}", "https://orders.example"),
    ];
    let yaml = generate_openapi_spec(&routes(&entries), SERVICE, PROJECT).unwrap();
    let doc: SwaggerDocument = serde_yaml::from_str(&yaml).unwrap();

    assert_eq!(doc.operation_count(), 4 * entries.len());
    assert_eq!(doc.security_definitions["firebase"].audiences, PROJECT);

    for (path, item) in &doc.paths {
        let expected_params = extract_path_parameters(path);
        for (method, op) in item.operations() {
            assert!(op.security.iter().all(|req| req
                .keys()
                .all(|name| doc.security_definitions.contains_key(name))));

            let declared: Vec<String> = op
                .parameters
                .iter()
                .flatten()
                .filter(|p| p.location == "path")
                .map(|p| p.name.clone())
                .collect();
            assert_eq!(declared, expected_params, "{} {}", method.as_str(), path);
        }
    }
}

#[test]
fn test_generation_is_idempotent() {
    let table = routes(&[
        ("/b", "https://b.example"),
        ("/a/{x}", "https://a.example"),
    ]);

    let first = generate_openapi_spec(&table, SERVICE, PROJECT).unwrap();
    let second = generate_openapi_spec(&table, SERVICE, PROJECT).unwrap();

    assert_eq!(first, second);
    assert!(first.find("/b:").unwrap() < first.find("/a/{x}:").unwrap());
}

#[test]
fn test_config_file_end_to_end() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("gateway.yaml");
    std::fs::write(
        &config_path,
        "projectId: my-gcp-project\nbackendServices:\n  - hello\nroutes:\n  /items/{id}: https://items.example\n",
    )
    .expect("Failed to write config");

    let config = GatewayConfig::from_file(&config_path).expect("Failed to load config");
    let yaml = render(&config, OutputFormat::Yaml).expect("Failed to render YAML");
    let json = render(&config, OutputFormat::Json).expect("Failed to render JSON");

    let from_yaml: SwaggerDocument = serde_yaml::from_str(&yaml).unwrap();
    let from_json: SwaggerDocument = serde_json::from_str(&json).unwrap();
    assert_eq!(from_yaml, from_json);

    assert_eq!(from_yaml.host, SERVICE);
    let paths: Vec<&String> = from_yaml.paths.keys().collect();
    assert_eq!(paths, vec!["/hello", "/items/{id}"]);
    assert_eq!(
        from_yaml.paths["/hello"].get.as_ref().unwrap().backend.address,
        "https://hello-HASH-uc.a.run.app"
    );
}

#[test]
fn test_clashing_operation_ids_are_rejected() {
    let table = routes(&[
        ("/items/{id}", "https://items.example"),
        ("/items/id", "https://other.example"),
    ]);

    let err = generate_openapi_spec(&table, SERVICE, PROJECT).unwrap_err();
    assert!(err.to_string().contains("itemsid"));
}

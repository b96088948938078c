//! HTTP-level tests: the full client stack (reqwest transport included)
//! against a wiremock Portainer.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use secrecy::SecretString;
use serde_json::{json, Value};
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use manager_config::ManagerConfig;
use portainer_client::{PortainerError, PortainerService, ReqwestTransport};
use stack_shared_types::{MinecraftConfig, StackMetadata, StackStatus};

fn config_for(server: &MockServer) -> ManagerConfig {
    ManagerConfig {
        base_url: Url::parse(&server.uri()).unwrap(),
        username: "admin".to_string(),
        password: SecretString::new("hunter2".to_string()),
        volume_root: PathBuf::from("/srv/minecraft"),
        listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
    }
}

fn service_for(server: &MockServer) -> PortainerService {
    PortainerService::new(&config_for(server), Arc::new(ReqwestTransport::new()))
}

async fn mount_auth(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jwt": "tok"})))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_list_stacks_over_http() {
    let server = MockServer::start().await;
    mount_auth(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/stacks"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"Id": 1, "Name": "survival_base", "Status": 1,
             "Env": [{"name": "PORTAINER_MINECRAFT_STACK", "value": "1"}]},
            {"Id": 2, "Name": "unrelated", "Status": 1, "Env": []},
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/stacks/1/file"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "StackFileContent":
                "version: '3'\nx-metadata:\n  name: survival base\n  description: ''\n  owner: kryten\nservices: {}\n"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stacks = service_for(&server).list_stacks().await.unwrap();

    assert_eq!(stacks.len(), 1);
    assert_eq!(stacks[0].name, "survival base");
    assert_eq!(stacks[0].status, StackStatus::Active);
    assert_eq!(stacks[0].owner, "kryten");
}

#[tokio::test]
async fn test_create_stack_over_http() {
    let server = MockServer::start().await;
    mount_auth(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/endpoints"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"Id": 4}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/stacks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"Id": 5, "Name": "running_world", "Status": 1,
             "Env": [{"name": "PORTAINER_MINECRAFT_STACK", "value": "1"}]},
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/stacks/5/file"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "StackFileContent": "version: '3'\nservices: {}\n"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/stacks/5/stop"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/stacks"))
        .and(query_param("type", "2"))
        .and(query_param("method", "string"))
        .and(query_param("endpointId", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Id": 6})))
        .expect(1)
        .mount(&server)
        .await;

    let metadata = StackMetadata {
        name: "fresh world".to_string(),
        description: String::new(),
        owner: "cat".to_string(),
    };
    service_for(&server)
        .create_stack(&MinecraftConfig::default(), &metadata)
        .await
        .unwrap();

    let create = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.method.as_str() == "POST" && r.url.path() == "/api/stacks")
        .unwrap();
    let body: Value = serde_json::from_slice(&create.body).unwrap();
    assert_eq!(body["name"], "fresh_world");
    assert_eq!(body["env"][0]["name"], "PORTAINER_MINECRAFT_STACK");
    let content = body["stackFileContent"].as_str().unwrap();
    assert!(content.contains("EULA: true"));
    assert!(content.contains("/srv/minecraft/fresh_world:/data"));
}

#[tokio::test]
async fn test_expired_token_recovers_over_http() {
    let server = MockServer::start().await;

    // First login hands out a token the probe will reject; second login
    // hands out a good one.
    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jwt": "stale"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jwt": "fresh"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid JWT token"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/stacks"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/stacks"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let service = service_for(&server);
    // First list logs in with the stale token and succeeds (no probe on a
    // cold cache); the second list's probe gets the 401 and re-authenticates.
    service.list_stacks().await.unwrap();
    let stacks = service.list_stacks().await.unwrap();

    assert_eq!(stacks.len(), 0);
    let auth_calls = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/api/auth")
        .count();
    assert_eq!(auth_calls, 2);
}

#[tokio::test]
async fn test_rejected_login_is_fatal_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let err = service_for(&server).list_stacks().await.unwrap_err();
    assert!(matches!(err, PortainerError::Authentication(_)));
}

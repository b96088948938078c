//! REST surface tests: the axum router wired to an in-memory transport.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::{json, Value};
use tower::util::ServiceExt;
use url::Url;

use manager_api::{router, ApiState};
use manager_config::ManagerConfig;
use portainer_client::{Method, MockTransport, PortainerService};

fn test_state(transport: Arc<MockTransport>) -> ApiState {
    let config = ManagerConfig {
        base_url: Url::parse("http://portainer.local:9000").unwrap(),
        username: "admin".to_string(),
        password: SecretString::new("hunter2".to_string()),
        volume_root: PathBuf::from("/srv/minecraft"),
        listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
    };
    ApiState::new(Arc::new(PortainerService::new(&config, transport)))
}

fn mount_auth(transport: &MockTransport) {
    transport.on(Method::Post, "/api/auth", 200, json!({"jwt": "tok"}));
    transport.on(Method::Get, "/api/status", 200, json!({}));
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_list_returns_managed_stacks() {
    let transport = Arc::new(MockTransport::new());
    mount_auth(&transport);
    transport.on(
        Method::Get,
        "/api/stacks",
        200,
        json!([
            {"Id": 1, "Name": "survival_base", "Status": 1,
             "Env": [{"name": "PORTAINER_MINECRAFT_STACK", "value": "1"}]},
            {"Id": 2, "Name": "wordpress", "Status": 1, "Env": []},
        ]),
    );
    transport.on(
        Method::Get,
        "/api/stacks/1/file",
        200,
        json!({"StackFileContent": "version: '3'\nx-metadata:\n  name: survival base\n  description: main server\n  owner: kryten\nservices: {}\n"}),
    );
    let app = router(test_state(transport));

    let response = app
        .oneshot(Request::builder().uri("/api/list").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body,
        json!([{
            "id": 1,
            "name": "survival base",
            "status": "active",
            "owner": "kryten",
            "description": "main server"
        }])
    );
}

#[tokio::test]
async fn test_start_and_stop_report_ok() {
    let transport = Arc::new(MockTransport::new());
    mount_auth(&transport);
    transport.on(Method::Post, "/api/stacks/5/start", 200, Value::Null);
    transport.on(Method::Post, "/api/stacks/5/stop", 200, Value::Null);
    let state = test_state(transport.clone());

    let response = router(state.clone())
        .oneshot(Request::builder().uri("/api/start/5").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"status": "ok"}));

    let response = router(state)
        .oneshot(Request::builder().uri("/api/stop/5").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(transport.calls_to(Method::Post, "/api/stacks/5/start"), 1);
    assert_eq!(transport.calls_to(Method::Post, "/api/stacks/5/stop"), 1);
}

#[tokio::test]
async fn test_create_without_name_is_bad_request() {
    let transport = Arc::new(MockTransport::new());
    let app = router(test_state(transport.clone()));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/create")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"pvp": true}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "the stack name must be provided");
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_create_splits_metadata_from_config() {
    let transport = Arc::new(MockTransport::new());
    mount_auth(&transport);
    transport.on(Method::Get, "/api/endpoints", 200, json!([{"Id": 1}]));
    transport.on(Method::Get, "/api/stacks", 200, json!([]));
    transport.on(Method::Post, "/api/stacks", 200, json!({"Id": 9}));
    let app = router(test_state(transport.clone()));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/create")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "name": "family server",
                        "owner": "lister",
                        "gameMode": "creative",
                        "pvp": false
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"status": "ok"}));

    let create = transport
        .requests()
        .into_iter()
        .find(|r| r.method == Method::Post && r.url.path() == "/api/stacks")
        .unwrap();
    let body = create.body.unwrap();
    assert_eq!(body["name"], "family_server");
    let content = body["stackFileContent"].as_str().unwrap();
    assert!(content.contains("GAME_MODE: creative"));
    // Metadata fields must not leak into the environment.
    assert!(!content.contains("OWNER:"));
    assert!(!content.contains("NAME: family"));
}

#[tokio::test]
async fn test_upstream_failure_maps_to_bad_gateway() {
    let transport = Arc::new(MockTransport::new());
    mount_auth(&transport);
    transport.on(Method::Get, "/api/stacks", 502, json!({"message": "upstream down"}));
    let app = router(test_state(transport));

    let response = app
        .oneshot(Request::builder().uri("/api/list").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("upstream down"));
}

// ABOUTME: Integration tests for the deployment HTTP API.
// ABOUTME: Sends requests straight into the router and checks status codes and bodies.

mod support;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use gangway::adapter::AdapterClient;
use gangway::api::{ApiState, ErrorBody, router};
use gangway::deploy::{DeploymentFull, DeploymentLite, DeploymentManager, Metadata};
use gangway::repo::{DeploymentRepo, MemoryRepo};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use support::FakeAdapter;
use tower::ServiceExt;

fn app() -> (Router, Arc<FakeAdapter>) {
    support::init_tracing();
    let adapter = Arc::new(FakeAdapter::new().with_metadata(json!({"kind": "fake"})));
    let repo: Arc<dyn DeploymentRepo> = Arc::new(MemoryRepo::new());
    let client: Arc<dyn AdapterClient> = adapter.clone();
    let state = ApiState::new(DeploymentManager::new(repo, client));
    (router(state), adapter)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&value).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

fn parse<T: DeserializeOwned>(bytes: &[u8]) -> T {
    serde_json::from_slice(bytes).unwrap()
}

fn wordpress_blueprint() -> Value {
    json!({
        "template": {
            "name": "wp",
            "images": [
                {"name": "wordpress", "source": "wordpress:4", "deployment": {"count": 1}},
                {"name": "mysql", "source": "mysql:5"}
            ]
        },
        "override": {
            "images": [{"name": "mysql", "source": "mysql:8"}]
        }
    })
}

async fn create(app: &Router) -> DeploymentLite {
    let (status, body) = send(app, Method::POST, "/deployments", Some(wordpress_blueprint())).await;
    assert_eq!(status, StatusCode::CREATED);
    parse(&body)
}

#[tokio::test]
async fn create_returns_lite_view() {
    let (app, _) = app();

    let (status, body) = send(&app, Method::POST, "/deployments", Some(wordpress_blueprint())).await;

    assert_eq!(status, StatusCode::CREATED);
    let body: Value = parse(&body);
    assert_eq!(body["name"], "wp");
    assert_eq!(body["redeployable"], true);
    assert_eq!(body["serviceIDs"], json!(["svc-1", "svc-2"]));
    assert!(body["id"].is_u64());
}

#[tokio::test]
async fn invalid_blueprint_is_bad_request() {
    let (app, adapter) = app();
    let blueprint = json!({"template": {"name": "empty", "images": []}});

    let (status, body) = send(&app, Method::POST, "/deployments", Some(blueprint)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorBody = parse(&body);
    assert_eq!(error.error, "validation_error");
    assert!(error.message.contains("no images"));
    assert!(adapter.calls().is_empty());
}

#[tokio::test]
async fn list_and_get_return_created_deployment() {
    let (app, _) = app();
    let created = create(&app).await;

    let (status, body) = send(&app, Method::GET, "/deployments", None).await;
    assert_eq!(status, StatusCode::OK);
    let listed: Vec<DeploymentLite> = parse(&body);
    assert_eq!(listed, vec![created.clone()]);

    let (status, body) = send(&app, Method::GET, &format!("/deployments/{}", created.id), None).await;
    assert_eq!(status, StatusCode::OK);
    let full: DeploymentFull = parse(&body);
    assert_eq!(full.id, created.id);
    assert_eq!(full.status.services.len(), 2);
    assert_eq!(full.status.services[0].actual_state.as_deref(), Some("running"));
}

#[tokio::test]
async fn unknown_deployment_is_not_found() {
    let (app, _) = app();

    let (status, body) = send(&app, Method::GET, "/deployments/77", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ErrorBody = parse(&body);
    assert_eq!(error.error, "not_found");
}

#[tokio::test]
async fn delete_removes_deployment() {
    let (app, _) = app();
    let created = create(&app).await;
    let uri = format!("/deployments/{}", created.id);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn partial_delete_is_bad_gateway() {
    let (app, adapter) = app();
    let created = create(&app).await;
    adapter.fail_delete("svc-2");

    let (status, body) = send(&app, Method::DELETE, &format!("/deployments/{}", created.id), None).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let error: ErrorBody = parse(&body);
    assert_eq!(error.error, "partial_failure");
}

#[tokio::test]
async fn redeploy_creates_new_deployment() {
    let (app, _) = app();
    let created = create(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/deployments/{}/redeploy", created.id),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let redeployed: DeploymentLite = parse(&body);
    assert_ne!(redeployed.id, created.id);
    assert_eq!(redeployed.name, "wp");
}

#[tokio::test]
async fn metadata_reports_agent_and_adapter() {
    let (app, _) = app();

    let (status, body) = send(&app, Method::GET, "/metadata", None).await;

    assert_eq!(status, StatusCode::OK);
    let metadata: Metadata = parse(&body);
    assert_eq!(metadata.agent.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(metadata.adapter, Some(json!({"kind": "fake"})));
}

#[tokio::test]
async fn non_numeric_id_is_rejected() {
    let (app, _) = app();

    let (status, _) = send(&app, Method::GET, "/deployments/abc", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

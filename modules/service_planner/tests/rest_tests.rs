//! REST surface tests driving the router with in-memory repositories

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use common::*;
use serde_json::{json, Value};
use service_planner::api::rest::register_routes;
use service_planner::domain::PlannerEvent;
use std::sync::Arc;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    events: Arc<RecordingPublisher>,
}

impl TestApp {
    fn new() -> Self {
        let Harness {
            planner, events, ..
        } = Harness::new();
        Self {
            router: register_routes(Router::new(), Arc::new(planner)),
            events,
        }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-user-id", "alice");
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        self.call(builder.body(body).unwrap()).await
    }

    async fn call(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_template(&self) -> Value {
        let (status, body) = self
            .send(
                Method::POST,
                "/templates",
                Some(json!({
                    "name": "Sunday Morning",
                    "description": "Weekly gathering",
                    "slots": [
                        { "kind": "Prayer", "title": "Opening Prayer", "order": 1 },
                        { "kind": "Song", "title": "Opening Hymn", "order": 2 },
                        { "kind": "Speaker", "title": "Main Message", "order": 3 }
                    ]
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }
}

#[tokio::test]
async fn test_song_endpoints() {
    let app = TestApp::new();

    let (status, created) = app
        .send(
            Method::POST,
            "/songs",
            Some(json!({ "name": "Amazing Grace", "category": "Hymn", "key": "G" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["speed"], "Medium");
    assert_eq!(created["publisher"], "Unknown");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, fetched) = app.send(Method::GET, &format!("/songs/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Amazing Grace");

    let (status, list) = app.send(Method::GET, "/songs?search=Grace", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 1);

    let (_, categories) = app.send(Method::GET, "/songs/categories", None).await;
    assert_eq!(categories["items"], json!(["Hymn"]));

    let (status, disabled) = app
        .send(
            Method::PUT,
            &format!("/songs/{id}/disabled"),
            Some(json!({ "disabled": true })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(disabled["disabled"], true);

    let (_, active) = app.send(Method::GET, "/songs", None).await;
    assert_eq!(active["total"], 0);
    let (_, everything) = app
        .send(Method::GET, "/songs?include_disabled=true", None)
        .await;
    assert_eq!(everything["total"], 1);

    let (status, _) = app.send(Method::DELETE, &format!("/songs/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, problem) = app.send(Method::GET, &format!("/songs/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(problem["status"], 404);
}

#[tokio::test]
async fn test_validation_problem_names_field() {
    let app = TestApp::new();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/songs")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "name": "" }).to_string()))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/problem+json"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let problem: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(problem["field"], "name");
    assert_eq!(problem["title"], "Validation Error");
}

#[tokio::test]
async fn test_explicit_blank_artist_is_rejected() {
    let app = TestApp::new();

    let (status, problem) = app
        .send(
            Method::POST,
            "/songs",
            Some(json!({ "name": "Cornerstone", "artist": "" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["field"], "artist");
    let (_, list) = app
        .send(Method::GET, "/songs?include_disabled=true", None)
        .await;
    assert_eq!(list["total"], 0);
}

#[tokio::test]
async fn test_import_endpoint_takes_raw_text() {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/songs/import")
        .header(header::CONTENT_TYPE, "text/csv")
        .body(Body::from(
            "SongName,Artist\n\"Holy, Holy, Holy\",Traditional\nCornerstone,Hillsong,extra\n",
        ))
        .unwrap();

    let (status, body) = app.call(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["imported"], 1);
    assert_eq!(body["items"][0]["name"], "Holy, Holy, Holy");
}

#[tokio::test]
async fn test_template_and_service_flow() {
    let app = TestApp::new();
    let template = app.create_template().await;
    let template_id = template["id"].as_str().unwrap().to_string();

    let (_, usage) = app
        .send(Method::GET, &format!("/templates/{template_id}/usage"), None)
        .await;
    assert_eq!(usage["in_use"], false);

    let (status, service) = app
        .send(
            Method::POST,
            "/services",
            Some(json!({
                "name": "Palm Sunday",
                "service_date": "2025-04-13",
                "template_id": template_id
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let instances = service["instances"].as_array().unwrap();
    assert_eq!(instances.len(), 3);
    assert_eq!(instances[0]["slot_id"], template["slots"][0]["id"]);
    let service_id = service["id"].as_str().unwrap().to_string();
    let hymn_id = instances[1]["id"].clone();

    let (status, updated) = app
        .send(
            Method::PUT,
            &format!("/services/{service_id}"),
            Some(json!({
                "name": "Palm Sunday",
                "service_date": "2025-04-13",
                "instances": [ { "id": hymn_id, "song_title": "Hosanna" } ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["instances"].as_array().unwrap().len(), 3);
    assert_eq!(updated["instances"][1]["song_title"], "Hosanna");

    let (_, last) = app
        .send(Method::GET, "/songs/last-played?title=Hosanna", None)
        .await;
    assert_eq!(last["last_played"], "2025-04-13");

    let (_, usage) = app
        .send(Method::GET, &format!("/templates/{template_id}/usage"), None)
        .await;
    assert_eq!(usage["in_use"], true);

    let (status, edited) = app
        .send(
            Method::PUT,
            &format!("/templates/{template_id}"),
            Some(json!({ "name": "Renamed", "slots": [] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["name"], "Renamed");
    assert_eq!(edited["slots"].as_array().unwrap().len(), 3);

    let (status, problem) = app
        .send(Method::DELETE, &format!("/templates/{template_id}"), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(problem["status"], 409);

    let (status, _) = app
        .send(Method::DELETE, &format!("/services/{service_id}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app
        .send(Method::DELETE, &format!("/templates/{template_id}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let created_by_alice = app.events.events().iter().any(|e| {
        matches!(e, PlannerEvent::ServiceCreated(ev) if ev.user_id.as_deref() == Some("alice"))
    });
    assert!(created_by_alice);
}

#[tokio::test]
async fn test_service_listing_requires_both_bounds() {
    let app = TestApp::new();
    let template = app.create_template().await;
    for on in ["2025-01-05", "2025-02-02"] {
        app.send(
            Method::POST,
            "/services",
            Some(json!({ "name": on, "service_date": on, "template_id": template["id"] })),
        )
        .await;
    }

    let (status, list) = app
        .send(Method::GET, "/services?start=2025-01-01&end=2025-01-31", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 1);
    assert_eq!(list["items"][0]["name"], "2025-01-05");

    let (_, all) = app.send(Method::GET, "/services", None).await;
    assert_eq!(all["items"][0]["name"], "2025-02-02");

    let (status, problem) = app
        .send(Method::GET, "/services?start=2025-01-01", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["field"], "end");
}

#[tokio::test]
async fn test_unknown_template_usage_is_not_found() {
    let app = TestApp::new();
    let (status, _) = app
        .send(
            Method::GET,
            &format!("/templates/{}/usage", uuid::Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = TestApp::new();
    let (status, doc) = app.send(Method::GET, "/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(doc["openapi"].as_str().unwrap().starts_with("3."));
}

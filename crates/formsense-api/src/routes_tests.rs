use super::*;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use formsense_pipeline::{CacheConfig, FormPipeline};
use formsense_protocols::completion::{CompletionBackend, CompletionRequest, StructuredOutcome};
use formsense_protocols::detection::FormDetection;
use formsense_protocols::mapping::FormMapping;
use formsense_protocols::store::{DetectionStore, MappingStore};
use formsense_store::{MemoryDetectionStore, MemoryMappingStore};

struct ScriptedBackend {
    outcomes: Mutex<VecDeque<StructuredOutcome>>,
}

impl ScriptedBackend {
    fn new(outcomes: Vec<StructuredOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
        }
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(&self, _request: CompletionRequest) -> StructuredOutcome {
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| StructuredOutcome::ServiceError("script exhausted".to_string()))
    }
}

struct TestApp {
    router: Router,
    store: Arc<MemoryMappingStore>,
    detections: Arc<MemoryDetectionStore>,
}

fn test_router(outcomes: Vec<StructuredOutcome>) -> TestApp {
    let backend = Arc::new(ScriptedBackend::new(outcomes));
    let store = Arc::new(MemoryMappingStore::new());
    let detections = Arc::new(MemoryDetectionStore::new());
    let pipeline = Arc::new(FormPipeline::new(
        backend,
        store.clone(),
        CacheConfig::default(),
    ));
    let router = create_router(AppState::new(pipeline, store.clone(), detections.clone()));
    TestApp {
        router,
        store,
        detections,
    }
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_router(Vec::new()).router;
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_form_lookup_returns_mapping() {
    let TestApp { router, store, .. } = test_router(Vec::new());
    store
        .save(FormMapping::detected("example.com", "div.q"))
        .await
        .unwrap();

    let response = router
        .oneshot(post_json("/api/v1/form/example.com", serde_json::json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["mapping"]["containerSelector"], "div.q");
    assert_eq!(json["domain"], "example.com");
}

#[tokio::test]
async fn test_form_lookup_unknown_domain_is_404() {
    let app = test_router(Vec::new()).router;

    let response = app
        .oneshot(post_json("/api/v1/form/unknown.example", serde_json::json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("unknown.example"));
}

#[tokio::test]
async fn test_form_with_dom_returns_fill_envelope() {
    let app = test_router(vec![
        StructuredOutcome::Ok(serde_json::json!({"containerSelector": "div.q"})),
        StructuredOutcome::Ok(serde_json::json!([
            {"inputSelector": "#name", "label": "Your name"}
        ])),
        StructuredOutcome::Ok(serde_json::json!([
            {"inputSelector": "#name", "label": "Your name", "value": "Ada"}
        ])),
    ])
    .router;

    let body = serde_json::json!({
        "dom": "<form><div class=\"q\"><label for=\"name\">Your name</label><input id=\"name\"></div></form>",
        "userPrompt": "I am Ada"
    });
    let response = app
        .oneshot(post_json("/api/v1/form/example.com", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["type"], "direct");
    assert_eq!(json["domain"], "example.com");
    assert_eq!(json["fillJSON"][0]["value"], "Ada");
}

#[tokio::test]
async fn test_form_with_empty_page_is_422() {
    let app = test_router(vec![
        StructuredOutcome::ServiceError("down".to_string()),
        StructuredOutcome::ServiceError("down".to_string()),
    ])
    .router;

    let body = serde_json::json!({ "dom": "<html><body><p>no form</p></body></html>" });
    let response = app
        .oneshot(post_json("/api/v1/form/example.com", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_form_detect_known_and_unknown() {
    let TestApp {
        router, detections, ..
    } = test_router(Vec::new());
    detections
        .save(FormDetection::new(
            "https://example.com/signup",
            "example.com",
            true,
        ))
        .await
        .unwrap();

    let body = serde_json::json!(["https://nothing.example/x", "https://example.com/signup"]);
    let response = router
        .clone()
        .oneshot(post_json("/api/v1/form-detect", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["form"], true);

    let body = serde_json::json!(["https://nothing.example/x", "::::"]);
    let response = router
        .oneshot(post_json("/api/v1/form-detect", body))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["form"], false);
}

#[tokio::test]
async fn test_form_detect_answers_from_detections_not_mappings() {
    let TestApp {
        router,
        store,
        detections,
    } = test_router(Vec::new());
    // Detected but never mapped: detection records alone decide.
    detections
        .save(FormDetection::new(
            "https://fresh.example/apply",
            "fresh.example",
            true,
        ))
        .await
        .unwrap();
    assert!(store.find("fresh.example").await.unwrap().is_none());

    let body = serde_json::json!(["https://fresh.example/apply"]);
    let response = router
        .oneshot(post_json("/api/v1/form-detect", body))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["form"], true);
}

#[tokio::test]
async fn test_false_positive_blacklisted_domain() {
    let TestApp {
        router, detections, ..
    } = test_router(Vec::new());
    detections
        .save(FormDetection::new(
            "https://ads.example/banner",
            "ads.example",
            false,
        ))
        .await
        .unwrap();

    let body = serde_json::json!({"url": "https://ads.example/banner"});
    let response = router
        .oneshot(post_json("/api/v1/false-positive-forms", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["form"], false);
}

#[tokio::test]
async fn test_false_positive_detected_domain_is_not_blacklisted() {
    let TestApp {
        router, detections, ..
    } = test_router(Vec::new());
    detections
        .save(FormDetection::new(
            "https://example.com/signup",
            "example.com",
            true,
        ))
        .await
        .unwrap();

    let body = serde_json::json!({"url": "https://example.com/signup"});
    let response = router
        .oneshot(post_json("/api/v1/false-positive-forms", body))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["form"], true);
}

#[tokio::test]
async fn test_false_positive_unknown_domain_is_not_blacklisted() {
    let app = test_router(Vec::new()).router;

    let body = serde_json::json!({"url": "https://unseen.example/page"});
    let response = app
        .oneshot(post_json("/api/v1/false-positive-forms", body))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["form"], true);
}

#[tokio::test]
async fn test_false_positive_unparseable_url() {
    let app = test_router(Vec::new()).router;

    let body = serde_json::json!({"url": "::::"});
    let response = app
        .oneshot(post_json("/api/v1/false-positive-forms", body))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["form"], false);
}

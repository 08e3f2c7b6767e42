use actix_web::{http::StatusCode, test};
use gatewatch_api::{
    AppState, DenylistConfig, DetectionConfig, GeoConfig, MetricsConfig, ResolverConfig,
    create_app, create_base_app,
};

/// App state with network-dependent geolocation disabled, suitable for tests
fn test_state() -> AppState {
    AppState::new(
        ResolverConfig::default(),
        DenylistConfig::default(),
        DetectionConfig::default(),
        GeoConfig {
            enabled: false,
            ..GeoConfig::default()
        },
        MetricsConfig::default(),
    )
}

/// Integration test for the health check endpoint
///
/// Uses the full app setup including the interception middleware stack to
/// verify the endpoint works with all components wired together.
#[actix_web::test]
async fn test_health_endpoint_integration() {
    let app = test::init_service(create_app(test_state())).await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK, "Expected 200 OK status");

    let content_type = resp.headers().get("content-type");
    assert!(content_type.is_some(), "Content-Type header should be present");
    assert!(
        content_type.unwrap().to_str().unwrap().contains("application/json"),
        "Expected JSON content type"
    );

    let body = test::read_body(resp).await;
    let json: serde_json::Value = serde_json::from_slice(&body).expect("Failed to parse JSON");
    assert_eq!(json, serde_json::json!({ "status": "healthy" }));
}

/// Integration test for the version endpoint
#[actix_web::test]
async fn test_version_endpoint_integration() {
    let app = test::init_service(create_app(test_state())).await;

    let req = test::TestRequest::get().uri("/api/version").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK, "Expected 200 OK status");

    let body = test::read_body(resp).await;
    let json: serde_json::Value = serde_json::from_slice(&body).expect("Failed to parse JSON");

    assert!(json.get("version").and_then(|v| v.as_str()).is_some());
    assert!(json.get("commit").and_then(|v| v.as_str()).is_some());
    assert!(json.get("build_time").and_then(|v| v.as_str()).is_some());
    assert_eq!(json["version"], "0.1.0", "Expected version to match package version");
}

/// Integration test for the Prometheus metrics endpoint
#[actix_web::test]
async fn test_metrics_endpoint_integration() {
    let app = test::init_service(create_app(test_state())).await;

    // Generate some traffic first so counters exist
    let req = test::TestRequest::get().uri("/api/health").to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/api/metrics").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);

    let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.contains("text/plain"));

    let body = test::read_body(resp).await;
    let body_str = std::str::from_utf8(&body).unwrap();
    assert!(body_str.contains("http_requests_total"));
    assert!(body_str.contains("app_uptime_seconds"));
    assert!(body_str.contains("app_info"));
}

/// The OpenAPI spec endpoint serves a parseable JSON document
#[actix_web::test]
async fn test_openapi_spec_endpoint() {
    let app = test::init_service(create_base_app()).await;

    let req = test::TestRequest::get().uri("/api/spec/v2").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let json: serde_json::Value = serde_json::from_slice(&body).expect("Spec should be JSON");
    assert_eq!(json["info"]["title"], "Gatewatch API");
}

/// Responses carry a request ID header from the request-ID middleware
#[actix_web::test]
async fn test_request_id_header_present() {
    let app = test::init_service(create_app(test_state())).await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.headers().get("x-request-id").is_some());

    // A provided request ID is echoed back
    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header(("X-Request-ID", "test-trace-42"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(
        resp.headers().get("x-request-id").unwrap().to_str().unwrap(),
        "test-trace-42"
    );
}

/// Denylist administration: add, list, idempotent re-add, remove
#[actix_web::test]
async fn test_denylist_admin_roundtrip() {
    let app = test::init_service(create_app(test_state())).await;

    // Add an address
    let req = test::TestRequest::post()
        .uri("/api/denylist")
        .set_json(serde_json::json!({ "address": "198.51.100.9" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Adding it again is a no-op, not an error
    let req = test::TestRequest::post()
        .uri("/api/denylist")
        .set_json(serde_json::json!({ "address": "198.51.100.9" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // The listing contains exactly one entry
    let req = test::TestRequest::get().uri("/api/denylist").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["addresses"], serde_json::json!(["198.51.100.9"]));

    // Remove it
    let req = test::TestRequest::delete()
        .uri("/api/denylist/198.51.100.9")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Removing an absent address is a 404
    let req = test::TestRequest::delete()
        .uri("/api/denylist/198.51.100.9")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

/// Dashboard endpoints respond with their empty-state shapes on a fresh app
#[actix_web::test]
async fn test_dashboard_empty_state() {
    let app = test::init_service(create_app(test_state())).await;

    let req = test::TestRequest::get().uri("/api/dashboard/top").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, serde_json::json!([]));

    let req = test::TestRequest::get()
        .uri("/api/dashboard/suspicious")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["entries"], serde_json::json!([]));

    let req = test::TestRequest::get()
        .uri("/api/dashboard/summary")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "total": 0, "blocked": 0, "suspicious": 0, "normal": 0 })
    );
}

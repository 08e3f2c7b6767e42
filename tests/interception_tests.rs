//! End-to-end tests of the request interception pipeline: address
//! resolution, denylist enforcement, failure policies, and request logging.

use std::sync::Arc;

use actix_web::{http::StatusCode, test};
use chrono::{DateTime, Utc};
use gatewatch_api::{
    AppState, Denylist, DenylistConfig, DenylistError, DenylistFailurePolicy, DetectionConfig,
    GeoConfig, LogError, MemoryDenylist, MemoryRequestLog, MemorySuspicionLedger, MetricsConfig,
    RequestLedger, RequestRecord, ResolverConfig, SuspicionLedger, create_app,
};

fn geo_disabled() -> GeoConfig {
    GeoConfig {
        enabled: false,
        ..GeoConfig::default()
    }
}

/// State over in-memory stores, returning handles for assertions
fn observable_state() -> (AppState, Arc<MemoryDenylist>, Arc<MemoryRequestLog>, Arc<MemorySuspicionLedger>) {
    let denylist = Arc::new(MemoryDenylist::new());
    let request_log = Arc::new(MemoryRequestLog::new());
    let suspicious = Arc::new(MemorySuspicionLedger::new());
    let state = AppState::with_stores(
        ResolverConfig::default(),
        DenylistConfig::default(),
        DetectionConfig::default(),
        geo_disabled(),
        MetricsConfig::default(),
        denylist.clone(),
        request_log.clone(),
        suspicious.clone(),
    );
    (state, denylist, request_log, suspicious)
}

/// A denylist whose backing store is unreachable
struct UnavailableDenylist;

impl Denylist for UnavailableDenylist {
    fn contains(&self, _address: &str) -> Result<bool, DenylistError> {
        Err(DenylistError::Unavailable("store offline".to_string()))
    }
    fn add(&self, _address: String) -> Result<bool, DenylistError> {
        Err(DenylistError::Unavailable("store offline".to_string()))
    }
    fn remove(&self, _address: &str) -> Result<bool, DenylistError> {
        Err(DenylistError::Unavailable("store offline".to_string()))
    }
    fn entries(&self) -> Result<Vec<String>, DenylistError> {
        Err(DenylistError::Unavailable("store offline".to_string()))
    }
    fn len(&self) -> Result<usize, DenylistError> {
        Err(DenylistError::Unavailable("store offline".to_string()))
    }
}

/// A request ledger whose writes always fail
struct FailingRequestLog;

impl RequestLedger for FailingRequestLog {
    fn append(&self, _record: RequestRecord) -> Result<(), LogError> {
        Err(LogError::Unavailable("ledger offline".to_string()))
    }
    fn recent(&self, _n: usize) -> Result<Vec<RequestRecord>, LogError> {
        Ok(Vec::new())
    }
    fn count_by_address(&self) -> Result<std::collections::HashMap<String, usize>, LogError> {
        Ok(std::collections::HashMap::new())
    }
    fn count_since(&self, _address: &str, _cutoff: DateTime<Utc>) -> Result<usize, LogError> {
        Ok(0)
    }
    fn total(&self) -> Result<usize, LogError> {
        Ok(0)
    }
}

/// A blocked address is rejected with a 403 and produces no request record
/// and no new suspicion entries
#[actix_web::test]
async fn test_blocked_address_is_rejected_without_a_record() {
    let (state, denylist, request_log, suspicious) = observable_state();
    denylist.add("198.51.100.9".to_string()).unwrap();

    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::get()
        .uri("/")
        .insert_header(("X-Forwarded-For", "198.51.100.9"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body = test::read_body(resp).await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "Forbidden");

    assert_eq!(request_log.total().unwrap(), 0, "No record for denied request");
    assert_eq!(suspicious.len().unwrap(), 0, "No suspicion entries for denied request");
}

/// Denylist enforcement also covers the control-plane endpoints
#[actix_web::test]
async fn test_blocked_address_cannot_reach_dashboard() {
    let (state, denylist, _, _) = observable_state();
    denylist.add("198.51.100.9".to_string()).unwrap();

    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::get()
        .uri("/api/dashboard/summary")
        .insert_header(("X-Forwarded-For", "198.51.100.9"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

/// Control-plane paths are enforced but never observed: an admitted request
/// to an /api/ endpoint leaves no trace in the request ledger
#[actix_web::test]
async fn test_control_plane_request_is_not_recorded() {
    let (state, _, request_log, suspicious) = observable_state();
    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header(("X-Forwarded-For", "203.0.113.7"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(request_log.total().unwrap(), 0);
    assert_eq!(suspicious.len().unwrap(), 0);
}

/// An admitted request produces exactly one record carrying the resolved
/// forwarding-header address
#[actix_web::test]
async fn test_admitted_request_is_logged_with_resolved_address() {
    let (state, _, request_log, _) = observable_state();
    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::get()
        .uri("/welcome")
        .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1"))
        .peer_addr("192.0.2.1:40000".parse().unwrap())
        .to_request();
    let resp = test::call_service(&app, req).await;

    // No route is mounted at /welcome; the request is admitted and observed
    // regardless of what the inner service answers.
    assert_ne!(resp.status(), StatusCode::FORBIDDEN);

    let records = request_log.recent(10).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].address, "203.0.113.7");
    assert_eq!(records[0].path, "/welcome");
    assert_eq!(records[0].country, None);
    assert_eq!(records[0].city, None);
}

/// Without a forwarding header the transport peer address is used, and with
/// nothing parseable the sentinel address is logged
#[actix_web::test]
async fn test_peer_addr_fallback_and_sentinel() {
    let (state, _, request_log, _) = observable_state();
    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::get()
        .uri("/a")
        .peer_addr("192.0.2.1:40000".parse().unwrap())
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/b").to_request();
    test::call_service(&app, req).await;

    let records = request_log.recent(10).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].address, "0.0.0.0", "Sentinel when nothing is parseable");
    assert_eq!(records[1].address, "192.0.2.1", "Peer address without port");
}

/// Fail-open policy admits traffic when the denylist store is unreachable
#[actix_web::test]
async fn test_denylist_unavailable_fail_open_admits() {
    let request_log = Arc::new(MemoryRequestLog::new());
    let state = AppState::with_stores(
        ResolverConfig::default(),
        DenylistConfig {
            failure_policy: DenylistFailurePolicy::FailOpen,
        },
        DetectionConfig::default(),
        geo_disabled(),
        MetricsConfig::default(),
        Arc::new(UnavailableDenylist),
        request_log.clone(),
        Arc::new(MemorySuspicionLedger::new()),
    );
    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::get()
        .uri("/open")
        .insert_header(("X-Forwarded-For", "203.0.113.7"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_ne!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(request_log.total().unwrap(), 1);
}

/// Fail-closed policy rejects all traffic when the denylist store is
/// unreachable, and nothing is logged
#[actix_web::test]
async fn test_denylist_unavailable_fail_closed_rejects() {
    let request_log = Arc::new(MemoryRequestLog::new());
    let state = AppState::with_stores(
        ResolverConfig::default(),
        DenylistConfig {
            failure_policy: DenylistFailurePolicy::FailClosed,
        },
        DetectionConfig::default(),
        geo_disabled(),
        MetricsConfig::default(),
        Arc::new(UnavailableDenylist),
        request_log.clone(),
        Arc::new(MemorySuspicionLedger::new()),
    );
    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::get()
        .uri("/closed")
        .insert_header(("X-Forwarded-For", "203.0.113.7"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(request_log.total().unwrap(), 0);
}

/// A failed ledger append never fails the enclosing request
#[actix_web::test]
async fn test_log_write_failure_still_admits() {
    let state = AppState::with_stores(
        ResolverConfig::default(),
        DenylistConfig::default(),
        DetectionConfig::default(),
        geo_disabled(),
        MetricsConfig::default(),
        Arc::new(MemoryDenylist::new()),
        Arc::new(FailingRequestLog),
        Arc::new(MemorySuspicionLedger::new()),
    );
    let metrics = state.pipeline.metrics.clone();
    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::get()
        .uri("/degraded")
        .insert_header(("X-Forwarded-For", "203.0.113.7"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_ne!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        metrics.log_write_failures_total.get(),
        1,
        "Lost append is surfaced operationally"
    );
}

/// Every admitted request from a non-blocked address yields exactly one
/// record with that address
#[actix_web::test]
async fn test_one_record_per_admitted_request() {
    let (state, _, request_log, _) = observable_state();
    let app = test::init_service(create_app(state)).await;

    for i in 0..7 {
        let req = test::TestRequest::get()
            .uri(&format!("/page/{i}"))
            .insert_header(("X-Forwarded-For", "203.0.113.7"))
            .to_request();
        test::call_service(&app, req).await;
    }

    assert_eq!(request_log.total().unwrap(), 7);
    let counts = request_log.count_by_address().unwrap();
    assert_eq!(counts.get("203.0.113.7"), Some(&7));
}

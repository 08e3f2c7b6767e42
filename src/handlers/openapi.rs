//! OpenAPI specification generation and app factory.

use std::sync::Arc;

use crate::{
    config::{DenylistConfig, DetectionConfig, GeoConfig, MetricsConfig, ResolverConfig},
    handlers::{
        block_address, get_metrics, health, list_blocked, recent_requests, summary,
        suspicious_addresses, top_addresses, unblock_address, version,
    },
    middleware::{Interception, InterceptionPipeline, MetricsMiddleware, RequestIdMiddleware},
    services::{
        AddressResolver, AnalyticsAggregator, AnomalyDetector, AppMetrics, Denylist, GeoLocator,
        MemoryDenylist, MemoryRequestLog, MemorySuspicionLedger, RequestLedger, SuspicionLedger,
    },
};
use actix_web::App;
use paperclip::actix::{OpenApiExt, web};
use paperclip::v2::models::{DefaultApiRaw, Info};

/// Shared application state: the interception pipeline and the analytics
/// views over the same stores
///
/// Construct one instance and clone it into the server factory so every
/// worker shares the same denylist and ledgers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: InterceptionPipeline,
    pub aggregator: AnalyticsAggregator,
    pub metrics_config: MetricsConfig,
}

impl AppState {
    /// Build state from environment-based configuration with in-memory stores
    pub fn from_env() -> Self {
        Self::new(
            ResolverConfig::from_env(),
            DenylistConfig::from_env(),
            DetectionConfig::from_env(),
            GeoConfig::from_env(),
            MetricsConfig::from_env(),
        )
    }

    /// Build state with in-memory stores and the given configuration
    pub fn new(
        resolver: ResolverConfig,
        denylist: DenylistConfig,
        detection: DetectionConfig,
        geo: GeoConfig,
        metrics: MetricsConfig,
    ) -> Self {
        Self::with_stores(
            resolver,
            denylist,
            detection,
            geo,
            metrics,
            Arc::new(MemoryDenylist::new()),
            Arc::new(MemoryRequestLog::new()),
            Arc::new(MemorySuspicionLedger::new()),
        )
    }

    /// Build state over externally supplied stores
    #[allow(clippy::too_many_arguments)]
    pub fn with_stores(
        resolver: ResolverConfig,
        denylist_config: DenylistConfig,
        detection: DetectionConfig,
        geo: GeoConfig,
        metrics_config: MetricsConfig,
        denylist: Arc<dyn Denylist>,
        request_log: Arc<dyn RequestLedger>,
        suspicious: Arc<dyn SuspicionLedger>,
    ) -> Self {
        let detector = Arc::new(AnomalyDetector::new(
            detection,
            request_log.clone(),
            suspicious.clone(),
        ));
        let geo = Arc::new(GeoLocator::new(geo).expect("Failed to create geo client"));
        let metrics = AppMetrics::new().expect("Failed to create metrics");

        let pipeline = InterceptionPipeline {
            resolver: AddressResolver::new(resolver),
            denylist: denylist.clone(),
            failure_policy: denylist_config.failure_policy,
            geo,
            request_log: request_log.clone(),
            detector,
            metrics,
        };

        let aggregator = AnalyticsAggregator::new(request_log, denylist, suspicious);

        Self {
            pipeline,
            aggregator,
            metrics_config,
        }
    }
}

/// Creates the shared OpenAPI specification for the API
pub fn create_openapi_spec() -> DefaultApiRaw {
    DefaultApiRaw {
        info: Info {
            title: "Gatewatch API".into(),
            version: "1.0.0".into(),
            description: Some(
                "Inbound traffic observation and denylist enforcement.\n\n\
                Every request is intercepted: the originating address is resolved \
                (honoring the configured trusted forwarding header), checked against \
                the denylist, logged with best-effort geolocation, and evaluated by \
                the anomaly detector. Blocked addresses receive a 403 and are never \
                logged.\n\
                \n\
                **Dashboard endpoints** expose read-only aggregated views: traffic \
                summary, top addresses by volume, recent requests, and the suspicion \
                ledger.\n\
                \n\
                **Denylist endpoints** administer the blocked-address set. Operator \
                authentication is expected to be provided by the surrounding \
                deployment.\n\
                \n\
                **Configuration** (environment variables): `TRUSTED_FORWARDING_HEADER`, \
                `DENYLIST_FAILURE_POLICY` (fail-open | fail-closed), \
                `RATE_WINDOW_SECONDS`, `RATE_THRESHOLD`, `SENSITIVE_PATHS`, \
                `FLAG_COOLDOWN_SECONDS`, `GEO_LOOKUP_TIMEOUT_MS`, `GEO_LOOKUP_URL`, \
                `GEO_CACHE_TTL_SECONDS`, `METRICS_ENABLED`."
                    .into(),
            ),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Creates the application from shared state
///
/// Middleware runs outermost-last-registered: request-ID logging, then
/// metrics, then the interception pipeline, so denied requests still show up
/// in the HTTP metrics and request log lines.
pub fn create_app(
    state: AppState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let denylist = state.pipeline.denylist.clone();

    App::new()
        .wrap(Interception::new(state.pipeline.clone()))
        .wrap(MetricsMiddleware)
        .wrap(RequestIdMiddleware)
        .wrap_api_with_spec(create_openapi_spec())
        .app_data(web::Data::new(state.metrics_config))
        .app_data(web::Data::new(state.pipeline.metrics.clone()))
        .app_data(web::Data::new(state.aggregator.clone()))
        .app_data(web::Data::from(denylist))
        .service(web::resource("/api/health").route(web::get().to(health)))
        .service(web::resource("/api/version").route(web::get().to(version)))
        .service(web::resource("/api/metrics").route(web::get().to(get_metrics)))
        .service(web::resource("/api/dashboard/summary").route(web::get().to(summary)))
        .service(web::resource("/api/dashboard/top").route(web::get().to(top_addresses)))
        .service(web::resource("/api/dashboard/recent").route(web::get().to(recent_requests)))
        .service(
            web::resource("/api/dashboard/suspicious").route(web::get().to(suspicious_addresses)),
        )
        .service(
            web::resource("/api/denylist")
                .route(web::get().to(list_blocked))
                .route(web::post().to(block_address)),
        )
        .service(web::resource("/api/denylist/{address}").route(web::delete().to(unblock_address)))
        .with_json_spec_at("/api/spec/v2")
        .build()
}

/// Creates an app with environment-based configuration and fresh stores
///
/// Suitable for tests; the server shares one [`AppState`] across workers
/// instead.
pub fn create_base_app() -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    create_app(AppState::from_env())
}

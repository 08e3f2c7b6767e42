//! Request interception pipeline: resolve, enforce, log, detect.

use std::{
    future::{Ready, ready},
    pin::Pin,
    rc::Rc,
    sync::Arc,
};

use actix_web::{
    Error, HttpResponse,
    body::{BoxBody, MessageBody},
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::{
    config::DenylistFailurePolicy,
    models::RequestRecord,
    services::{
        AddressResolver, AnomalyDetector, AppMetrics, Denylist, GeoLocator, RequestLedger,
    },
};

/// Origin metadata for one request, threaded explicitly through the pipeline
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub address: String,
    pub path: String,
    pub timestamp: DateTime<Utc>,
}

/// Path prefix of the service's own control-plane surface
///
/// Denylist enforcement applies everywhere, but dashboard and admin
/// endpoints are not themselves recorded as observed traffic; the stats
/// they serve would otherwise include the queries that read them.
pub const CONTROL_PLANE_PREFIX: &str = "/api/";

/// Shared dependencies of the interception pipeline
///
/// Constructed once and cloned into the middleware; every store is shared
/// with the dashboard layer through the same `Arc`s.
#[derive(Clone)]
pub struct InterceptionPipeline {
    pub resolver: AddressResolver,
    pub denylist: Arc<dyn Denylist>,
    pub failure_policy: DenylistFailurePolicy,
    pub geo: Arc<GeoLocator>,
    pub request_log: Arc<dyn RequestLedger>,
    pub detector: Arc<AnomalyDetector>,
    pub metrics: AppMetrics,
}

/// Interception middleware factory
///
/// Per request: resolve the client address, reject it outright if it is on
/// the denylist (no record is created), otherwise geolocate (best effort),
/// append to the request ledger (best effort), run anomaly detection, and
/// only then hand the request to the inner service. Detection outcome never
/// alters the admitted response.
pub struct Interception {
    pipeline: InterceptionPipeline,
}

impl Interception {
    /// Create the middleware with an explicitly constructed pipeline
    pub fn new(pipeline: InterceptionPipeline) -> Self {
        Self { pipeline }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Interception
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = InterceptionService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(InterceptionService {
            service: Rc::new(service),
            pipeline: self.pipeline.clone(),
        }))
    }
}

/// The actual interception middleware service
pub struct InterceptionService<S> {
    service: Rc<S>,
    pipeline: InterceptionPipeline,
}

impl<S, B> Service<ServiceRequest> for InterceptionService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let pipeline = self.pipeline.clone();

        let peer_addr = req.peer_addr().map(|a| a.to_string());
        let address = pipeline.resolver.resolve(req.headers(), peer_addr.as_deref());
        let ctx = RequestContext {
            address,
            path: req.path().to_string(),
            timestamp: Utc::now(),
        };

        Box::pin(async move {
            let admit = match pipeline.denylist.contains(&ctx.address) {
                Ok(blocked) => !blocked,
                Err(e) => {
                    // Explicit, configured choice between fail-open and
                    // fail-closed; never silent either way.
                    warn!(
                        target: "interception",
                        error = %e,
                        policy = ?pipeline.failure_policy,
                        "Denylist unavailable"
                    );
                    pipeline.failure_policy == DenylistFailurePolicy::FailOpen
                }
            };

            if !admit {
                pipeline.metrics.record_denied();
                debug!(target: "interception", address = %ctx.address, path = %ctx.path, "Request denied");
                let response = HttpResponse::Forbidden()
                    .json(serde_json::json!({
                        "error": "Forbidden",
                        "message": "Requests from this address are not accepted."
                    }));
                return Ok(req.into_response(response));
            }

            // The control plane is enforced but not observed
            if ctx.path.starts_with(CONTROL_PLANE_PREFIX) {
                let res = service.call(req).await?;
                return Ok(res.map_into_boxed_body());
            }

            let (country, city) = match pipeline.geo.locate(&ctx.address).await {
                Ok(geo) => geo,
                Err(e) => {
                    pipeline.metrics.geo_lookup_failures_total.inc();
                    debug!(target: "interception", address = %ctx.address, error = %e, "Geo lookup failed");
                    (None, None)
                }
            };

            let record =
                RequestRecord::new(ctx.address.clone(), ctx.path.clone(), ctx.timestamp)
                    .with_geo(country, city);
            if let Err(e) = pipeline.request_log.append(record) {
                // Losing one audit record is preferable to rejecting
                // legitimate traffic; surface the loss operationally.
                pipeline.metrics.log_write_failures_total.inc();
                warn!(target: "interception", error = %e, "Request ledger append failed");
            }

            for reason in pipeline
                .detector
                .evaluate(&ctx.address, &ctx.path, ctx.timestamp)
            {
                pipeline.metrics.record_flag(&reason);
            }

            let res = service.call(req).await?;
            Ok(res.map_into_boxed_body())
        })
    }
}

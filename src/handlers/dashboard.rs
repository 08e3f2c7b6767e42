//! Dashboard query handlers.
//!
//! Read-only views over the traffic stores, rendered by an external UI
//! layer. All queries go through the [`AnalyticsAggregator`](crate::services::AnalyticsAggregator)
//! and never mutate state.

use crate::{
    models::{AddressCount, LimitQuery, RecentRequestsResponse, SuspiciousListResponse, TrafficSummary},
    services::AnalyticsAggregator,
};
use actix_web::{Error, HttpRequest, Result, web};
use paperclip::actix::api_v2_operation;

/// Default number of entries in the top-addresses listing
const DEFAULT_TOP_LIMIT: usize = 10;
/// Default number of entries in the recent-requests listing
const DEFAULT_RECENT_LIMIT: usize = 50;

fn aggregator(req: &HttpRequest) -> Result<&AnalyticsAggregator, Error> {
    req.app_data::<web::Data<AnalyticsAggregator>>()
        .map(|data| data.get_ref())
        .ok_or_else(|| actix_web::error::ErrorServiceUnavailable("Analytics not available"))
}

/// Traffic summary endpoint
#[api_v2_operation(
    summary = "Traffic Summary",
    description = "Returns counts of total, blocked, suspicious, and inferred-normal traffic.",
    tags("Dashboard"),
    responses(
        (status = 200, description = "Successful response", body = TrafficSummary)
    )
)]
pub async fn summary(req: HttpRequest) -> Result<web::Json<TrafficSummary>, Error> {
    Ok(web::Json(aggregator(&req)?.summary()))
}

/// Top addresses by request volume
#[api_v2_operation(
    summary = "Top Addresses",
    description = "Returns the top addresses by total request count, ordered by count descending with ties broken by address.",
    tags("Dashboard"),
    responses(
        (status = 200, description = "Successful response")
    )
)]
pub async fn top_addresses(
    req: HttpRequest,
    query: web::Query<LimitQuery>,
) -> Result<web::Json<Vec<AddressCount>>, Error> {
    let limit = query.limit.unwrap_or(DEFAULT_TOP_LIMIT);
    Ok(web::Json(aggregator(&req)?.top_addresses(limit)))
}

/// Recent request records
#[api_v2_operation(
    summary = "Recent Requests",
    description = "Returns the most recently observed requests in reverse-chronological order.",
    tags("Dashboard"),
    responses(
        (status = 200, description = "Successful response", body = RecentRequestsResponse)
    )
)]
pub async fn recent_requests(
    req: HttpRequest,
    query: web::Query<LimitQuery>,
) -> Result<web::Json<RecentRequestsResponse>, Error> {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    Ok(web::Json(RecentRequestsResponse {
        requests: aggregator(&req)?.recent(limit),
    }))
}

/// Suspicious address listing
#[api_v2_operation(
    summary = "Suspicious Addresses",
    description = "Returns every recorded suspicion flag, newest first.",
    tags("Dashboard"),
    responses(
        (status = 200, description = "Successful response", body = SuspiciousListResponse)
    )
)]
pub async fn suspicious_addresses(req: HttpRequest) -> Result<web::Json<SuspiciousListResponse>, Error> {
    Ok(web::Json(SuspiciousListResponse {
        entries: aggregator(&req)?.suspicious_entries(),
    }))
}

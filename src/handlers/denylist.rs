//! Denylist administration handlers.

use crate::{
    models::{DenylistEntry, DenylistResponse},
    services::Denylist,
};
use actix_web::{Error, HttpRequest, HttpResponse, Result, web};
use paperclip::actix::api_v2_operation;
use tracing::info;

fn denylist(req: &HttpRequest) -> Result<&web::Data<dyn Denylist>, Error> {
    req.app_data::<web::Data<dyn Denylist>>()
        .ok_or_else(|| actix_web::error::ErrorServiceUnavailable("Denylist not available"))
}

/// Blocked address listing
#[api_v2_operation(
    summary = "List Blocked Addresses",
    description = "Returns every address currently on the denylist.",
    tags("Denylist"),
    responses(
        (status = 200, description = "Successful response", body = DenylistResponse)
    )
)]
pub async fn list_blocked(req: HttpRequest) -> Result<web::Json<DenylistResponse>, Error> {
    let addresses = denylist(&req)?
        .entries()
        .map_err(actix_web::error::ErrorInternalServerError)?;
    Ok(web::Json(DenylistResponse { addresses }))
}

/// Block an address
///
/// Adding an address that is already blocked is a no-op; membership is
/// boolean, not a counter.
#[api_v2_operation(
    summary = "Block Address",
    description = "Adds an address to the denylist. Subsequent requests from it are rejected.",
    tags("Denylist"),
    responses(
        (status = 201, description = "Address added to the denylist"),
        (status = 200, description = "Address was already on the denylist")
    )
)]
pub async fn block_address(
    req: HttpRequest,
    entry: web::Json<DenylistEntry>,
) -> Result<HttpResponse, Error> {
    let address = entry.into_inner().address;
    let inserted = denylist(&req)?
        .add(address.clone())
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if inserted {
        info!(target: "denylist", address = %address, "Address blocked");
        Ok(HttpResponse::Created().json(DenylistEntry { address }))
    } else {
        Ok(HttpResponse::Ok().json(DenylistEntry { address }))
    }
}

/// Unblock an address
#[api_v2_operation(
    summary = "Unblock Address",
    description = "Removes an address from the denylist.",
    tags("Denylist"),
    responses(
        (status = 200, description = "Address removed from the denylist"),
        (status = 404, description = "Address was not on the denylist")
    )
)]
pub async fn unblock_address(
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let address = path.into_inner();
    let removed = denylist(&req)?
        .remove(&address)
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if removed {
        info!(target: "denylist", address = %address, "Address unblocked");
        Ok(HttpResponse::Ok().json(DenylistEntry { address }))
    } else {
        Ok(HttpResponse::NotFound().json(serde_json::json!({
            "error": "Not Found",
            "message": format!("Address {address} is not on the denylist")
        })))
    }
}

use crate::helpers::ApiError;
use crate::middleware::authentication::get_header;
use crate::services::admin_auth::{AdminAuth, INVALID_TOKEN};
use actix_web::dev::ServiceRequest;
use actix_web::HttpMessage;
use chrono::Utc;
use std::sync::Arc;

#[tracing::instrument(name = "Authenticate admin with JWT", skip_all, fields(path = %req.path()))]
pub fn try_jwt(req: &mut ServiceRequest, auth: &AdminAuth) -> Result<(), ApiError> {
    let authorization = get_header::<String>(req, "authorization").map_err(|err| {
        tracing::debug!("unreadable authorization header: {}", err);
        ApiError::unauthorized(INVALID_TOKEN)
    })?;

    let claims = auth.authorize(authorization.as_deref(), Utc::now())?;
    tracing::debug!("admin token accepted, expires at {:?}", claims.expires_at());

    if req.extensions_mut().insert(Arc::new(claims)).is_some() {
        tracing::error!("admin claims already attached to the request");
        return Err(ApiError::internal("authentication failed"));
    }

    Ok(())
}

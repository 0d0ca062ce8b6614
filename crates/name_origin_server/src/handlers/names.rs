//! GET /names/?name= - probable countries of origin for a name.

use std::sync::Arc;

use axum::{Extension, Json};
use name_origin_core::{NameResponse, OriginService};

use crate::auth::Principal;
use crate::error::AppError;
use crate::extract::ValidName;

pub async fn get_name_origin(
    ValidName(name): ValidName,
    principal: Principal,
    Extension(service): Extension<Arc<OriginService>>,
) -> Result<Json<NameResponse>, AppError> {
    tracing::debug!(subject = principal.subject.as_str(), name = name.as_str(), "name lookup");
    let resp = service.lookup_name(&name).await?;
    Ok(Json(resp))
}

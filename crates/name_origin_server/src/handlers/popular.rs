//! GET /popular-names/?country= - most requested names for a country.

use std::sync::Arc;

use axum::{Extension, Json};
use name_origin_core::{OriginService, PopularNamesResponse};

use crate::auth::Principal;
use crate::error::AppError;
use crate::extract::CountryCode;

pub async fn get_popular_names(
    CountryCode(country): CountryCode,
    _principal: Principal,
    Extension(service): Extension<Arc<OriginService>>,
) -> Result<Json<PopularNamesResponse>, AppError> {
    let resp = service.popular_names(&country).await?;
    Ok(Json(resp))
}

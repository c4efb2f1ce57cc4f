use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::controllers::pace;
use crate::errors::{ErrorBody, QuotationError};
use crate::models::quotation::{
    LocationTier, PropertyType, QuotationInput, QuotationOptions, QuotationRequest,
    QuotationResponse, RoofType, UsagePattern,
};
use crate::services::quotation_engine;
use crate::shared_state::AppState;

/// POST /api/quotations
/// Generate a solar system quotation
///
/// Sizes a system from the monthly bill and roof area, then prices it and
/// projects savings and payback. Invalid input is rejected as a whole with
/// a `400` and an `InvalidInput` error body.
#[utoipa::path(
    post,
    path = "/api/quotations",
    request_body = QuotationRequest,
    responses(
        (status = 200, description = "Quotation generated", body = QuotationResponse),
        (status = 400, description = "Invalid input", body = ErrorBody)
    )
)]
pub async fn create_quotation(
    State(state): State<AppState>,
    State(config): State<Config>,
    payload: Result<Json<QuotationRequest>, JsonRejection>,
) -> Result<Json<QuotationResponse>, QuotationError> {
    let quotation = payload
        .map_err(|rejection| QuotationError::invalid(rejection.body_text()))
        .and_then(|Json(req)| QuotationInput::try_from(req))
        .and_then(|input| quotation_engine::generate_quotation(&input).map(|q| (input, q)));

    let (input, quotation) = match quotation {
        Ok(ok) => ok,
        Err(e) => {
            state.record_rejection();
            warn!(error = %e, "quotation rejected");
            return Err(e);
        }
    };

    pace(config.quotation.response_delay_ms).await;

    state.record_quotation();
    info!(
        system_size_kw = quotation.system_size_kw,
        total_cost = quotation.total_cost,
        payback = %quotation.payback_years,
        property_type = %input.property_type,
        location_tier = %input.location_tier,
        "quotation generated"
    );

    Ok(Json(QuotationResponse {
        quotation_id: Uuid::new_v4(),
        generated_at: chrono::Utc::now(),
        input,
        quotation,
    }))
}

/// GET /api/quotations/options
/// Accepted form values and pricing constants
///
/// Lists every value accepted for the enum fields of a quotation request,
/// together with the constants the engine prices with.
#[utoipa::path(
    get,
    path = "/api/quotations/options",
    responses(
        (status = 200, description = "Accepted values and pricing constants", body = QuotationOptions)
    )
)]
pub async fn get_quotation_options() -> Json<QuotationOptions> {
    Json(QuotationOptions {
        property_types: PropertyType::accepted(),
        roof_types: RoofType::accepted(),
        location_tiers: LocationTier::accepted(),
        usage_patterns: UsagePattern::accepted(),
        pricing: quotation_engine::pricing_constants(),
    })
}

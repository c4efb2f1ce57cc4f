use utoipa::OpenApi;
use crate::controllers::{chat_controller, quotation_controller, system_controller};
use crate::errors;
use crate::models::{chat, quotation, system};

#[derive(OpenApi)]
#[openapi(
    paths(
        quotation_controller::create_quotation,
        quotation_controller::get_quotation_options,
        chat_controller::post_chat_message,
        system_controller::get_health
    ),
    components(
        schemas(
            quotation::QuotationRequest,
            quotation::NumericField,
            quotation::QuotationInput,
            quotation::QuotationResult,
            quotation::QuotationResponse,
            quotation::QuotationOptions,
            quotation::PricingConstants,
            quotation::PropertyType,
            quotation::RoofType,
            quotation::LocationTier,
            quotation::UsagePattern,
            quotation::InverterClass,
            chat::ChatRequest,
            chat::ChatReply,
            system::HealthStatus,
            errors::ErrorBody
        )
    ),
    tags(
        (name = "solar-quote", description = "Solar Quotation API")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_quotation_path() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/quotations"));
        assert!(doc.paths.paths.contains_key("/api/chat"));
    }
}

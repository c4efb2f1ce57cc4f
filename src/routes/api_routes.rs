use axum::{routing::{get, post}, Router};
use crate::controllers::{
    // Quotations
    quotation_controller::{create_quotation, get_quotation_options},
    // Assistant
    chat_controller::post_chat_message,
    // System
    system_controller::get_health,
};
use crate::shared_state::SharedState;

/// Build the `/api/*` sub-router.
pub fn api_routes(shared: SharedState) -> Router {
    Router::new()
        .route("/quotations",          post(create_quotation))
        .route("/quotations/options",  get(get_quotation_options))
        .route("/chat",                post(post_chat_message))
        .route("/health",              get(get_health))
        .with_state(shared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt; // for oneshot

    fn app_with(config: Config) -> Router {
        api_routes(SharedState::new(config))
    }

    fn app() -> Router {
        app_with(Config::default())
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_response(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        serde_json::from_slice(&body).expect("Failed to parse JSON")
    }

    #[tokio::test]
    async fn test_create_quotation() {
        let body = json!({
            "monthlyBill": 10000,
            "roofArea": 50,
            "propertyType": "residential",
            "roofType": "concrete",
            "locationTier": "western",
            "usagePattern": "evening"
        });
        let response = app()
            .oneshot(post_json("/quotations", &body.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let v = json_response(response).await;
        assert!(v["quotationId"].is_string());
        assert!(v["generatedAt"].is_string());
        assert_eq!(v["input"]["roofType"], "concrete");
        assert_eq!(v["quotation"]["systemSizeKw"], 0.5);
        assert_eq!(v["quotation"]["panelCount"], 2);
        assert_eq!(v["quotation"]["inverterClass"], "String Inverter (3kW)");
        assert_eq!(v["quotation"]["batteryStorageKwh"], 3);
        assert_eq!(v["quotation"]["totalCost"], 431_250);
        assert_eq!(v["quotation"]["paybackYears"], 20.0);
    }

    #[tokio::test]
    async fn test_invalid_quotation_is_400_with_kind() {
        let body = json!({
            "monthlyBill": -100,
            "roofArea": 50,
            "propertyType": "residential",
            "roofType": "concrete",
            "locationTier": "western",
            "usagePattern": "evening"
        });
        let response = app()
            .oneshot(post_json("/quotations", &body.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let v = json_response(response).await;
        assert_eq!(v["kind"], "InvalidInput");
        assert!(v["message"].as_str().unwrap().contains("monthlyBill"));
        assert!(v.get("quotation").is_none());
    }

    #[tokio::test]
    async fn test_malformed_json_is_invalid_input() {
        let response = app()
            .oneshot(post_json("/quotations", "{ monthlyBill: "))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let v = json_response(response).await;
        assert_eq!(v["kind"], "InvalidInput");
    }

    #[tokio::test]
    async fn test_rejections_counted_in_health() {
        let shared = SharedState::new(Config::default());
        let router = api_routes(shared.clone());

        let _ = router
            .clone()
            .oneshot(post_json("/quotations", "{}"))
            .await
            .unwrap();

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let v = json_response(response).await;
        assert_eq!(v["status"], "ok");
        assert_eq!(v["quotationsRejected"], 1);
        assert_eq!(v["quotationsGenerated"], 0);
        assert_eq!(v["chatEnabled"], true);
        assert!(v.get("quotations_rejected").is_none());
        assert_eq!(shared.app.quotations_rejected(), 1);
    }

    #[tokio::test]
    async fn test_quotation_options() {
        let response = app()
            .oneshot(Request::builder().uri("/quotations/options").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let v = json_response(response).await;
        assert_eq!(v["usagePatterns"], json!(["daytime", "evening", "mixed"]));
        assert_eq!(v["locationTiers"], json!(["western", "other"]));
        assert_eq!(v["pricing"]["ratePerKwh"], 30.0);
        assert_eq!(v["pricing"]["otherMultiplier"], 1.1);
    }

    #[tokio::test]
    async fn test_chat_answers() {
        let response = app()
            .oneshot(post_json("/chat", r#"{"message": "Do I need a battery for the night?"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let v = json_response(response).await;
        assert_eq!(v["topic"], "battery");
    }

    #[tokio::test]
    async fn test_chat_disabled() {
        let mut config = Config::default();
        config.chat.enabled = false;
        let response = app_with(config)
            .oneshot(post_json("/chat", r#"{"message": "hello"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let v = json_response(response).await;
        assert_eq!(v["kind"], "Unavailable");
        assert_eq!(v["message"], "Chat assistant is disabled");
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_applies_to_successful_quotations_only() {
        let mut config = Config::default();
        config.quotation.response_delay_ms = 1_500;
        let router = app_with(config);
        let valid = json!({
            "monthlyBill": 30000,
            "roofArea": 500,
            "propertyType": "commercial",
            "roofType": "metal",
            "locationTier": "other",
            "usagePattern": "daytime"
        });

        let started = tokio::time::Instant::now();
        let response = router
            .clone()
            .oneshot(post_json("/quotations", &valid.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(started.elapsed() >= std::time::Duration::from_millis(1_500));

        let started = tokio::time::Instant::now();
        let response = router
            .oneshot(post_json("/quotations", r#"{"monthlyBill": -100}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(started.elapsed() < std::time::Duration::from_millis(1_500));
    }

    #[tokio::test]
    async fn test_chat_empty_message() {
        let response = app()
            .oneshot(post_json("/chat", r#"{"message": ""}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let v = json_response(response).await;
        assert_eq!(v["kind"], "InvalidInput");
    }
}

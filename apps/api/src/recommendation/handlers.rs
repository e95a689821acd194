//! Axum route handlers for the recommendation relay.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::profile::{validate_profile, Profile};
use crate::recommendation::models::Recommendations;
use crate::recommendation::relay::recommend;
use crate::state::AppState;

/// POST /functions/v1/career-advisor
///
/// Validates the profile, resolves the gateway credential and relays one
/// recommendation request. Every failure becomes an `{"error": ...}` body.
pub async fn handle_recommend(
    State(state): State<AppState>,
    payload: Result<Json<Profile>, JsonRejection>,
) -> Result<Json<Recommendations>, AppError> {
    let request_id = Uuid::new_v4();

    async move {
        let Json(profile) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
        validate_profile(&profile)?;

        let api_key = state.config.credential.resolve()?;
        let recommendations = recommend(&profile, &state.llm, &api_key).await?;

        Ok::<_, AppError>(Json(recommendations))
    }
    .instrument(info_span!("recommend", %request_id))
    .await
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        body::{to_bytes, Body},
        http::{header, HeaderMap, Request, StatusCode},
        response::Response,
        routing::post,
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::{Config, GatewayCredential};
    use crate::errors::{CREDITS_EXHAUSTED_MESSAGE, GATEWAY_ERROR_MESSAGE, RATE_LIMIT_MESSAGE};
    use crate::llm_client::MODEL;
    use crate::routes::build_router;

    use super::*;

    const ENDPOINT: &str = "/functions/v1/career-advisor";

    #[derive(Clone, Default)]
    struct Captured {
        requests: Arc<Mutex<Vec<(HeaderMap, Value)>>>,
    }

    impl Captured {
        fn count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        fn last(&self) -> (HeaderMap, Value) {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    /// Serves one canned gateway response on an ephemeral port.
    async fn spawn_gateway(status: StatusCode, body: String) -> (String, Captured) {
        let captured = Captured::default();
        let sink = captured.clone();

        let app = Router::new().route(
            "/v1/chat/completions",
            post(move |headers: HeaderMap, Json(request): Json<Value>| {
                let body = body.clone();
                let sink = sink.clone();
                async move {
                    sink.requests.lock().unwrap().push((headers, request));
                    (status, [(header::CONTENT_TYPE, "application/json")], body)
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}/v1/chat/completions"), captured)
    }

    fn app(gateway_url: &str, credential: GatewayCredential) -> Router {
        let config = Config {
            port: 0,
            rust_log: "debug".to_string(),
            gateway_url: gateway_url.to_string(),
            gateway_timeout_secs: 10,
            credential,
        };
        build_router(AppState::new(config).unwrap())
    }

    fn test_key() -> GatewayCredential {
        GatewayCredential::Static("sk-test".to_string())
    }

    fn profile_json() -> Value {
        json!({
            "interests": "fastapi, nodejs",
            "degree": "Computer Science",
            "cgpa": 3.5,
            "careerGoal": "become a data scientist"
        })
    }

    fn recommendations_json() -> Value {
        json!({
            "careers": [
                {"title": "Data Scientist", "description": "Matches your stated goal.", "relevance": "High"},
                {"title": "Machine Learning Engineer", "description": "Builds on your API experience.", "relevance": "Medium"},
                {"title": "Backend Developer", "description": "Uses fastapi and nodejs directly.", "relevance": "Low"}
            ],
            "skills": ["Python", "Statistics", "SQL", "Pandas", "scikit-learn", "Data Visualization"],
            "advice": "Lean on your backend skills while building a statistics foundation."
        })
    }

    fn tool_call_response(arguments: &str) -> String {
        json!({
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {"name": "provide_recommendations", "arguments": arguments}
                    }]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": {"prompt_tokens": 120, "completion_tokens": 240, "total_tokens": 360}
        })
        .to_string()
    }

    async fn post_profile(app: Router, body: String) -> Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri(ENDPOINT)
                .header(header::ORIGIN, "https://example.app")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_tool_call_arguments_relayed_unchanged() {
        let expected = recommendations_json();
        let (url, _) =
            spawn_gateway(StatusCode::OK, tool_call_response(&expected.to_string())).await;

        let response = post_profile(app(&url, test_key()), profile_json().to_string()).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        assert_eq!(body_json(response).await, expected);
    }

    #[tokio::test]
    async fn test_partial_usage_does_not_fail_the_relay() {
        let expected = recommendations_json();
        let body = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {
                            "name": "provide_recommendations",
                            "arguments": expected.to_string()
                        }
                    }]
                }
            }],
            "usage": {"total_tokens": 360}
        })
        .to_string();
        let (url, _) = spawn_gateway(StatusCode::OK, body).await;

        let response = post_profile(app(&url, test_key()), profile_json().to_string()).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, expected);
    }

    #[tokio::test]
    async fn test_upstream_request_shape() {
        let (url, captured) = spawn_gateway(
            StatusCode::OK,
            tool_call_response(&recommendations_json().to_string()),
        )
        .await;

        post_profile(app(&url, test_key()), profile_json().to_string()).await;

        assert_eq!(captured.count(), 1);
        let (headers, request) = captured.last();
        assert_eq!(headers[header::AUTHORIZATION], "Bearer sk-test");
        assert_eq!(request["model"], MODEL);
        assert_eq!(request["messages"][0]["role"], "system");
        assert_eq!(request["messages"][1]["role"], "user");
        assert!(request["messages"][1]["content"]
            .as_str()
            .unwrap()
            .contains("- CGPA: 3.5/4.0"));
        assert_eq!(request["tools"][0]["function"]["name"], "provide_recommendations");
        assert_eq!(request["tool_choice"]["type"], "function");
        assert_eq!(
            request["tool_choice"]["function"]["name"],
            "provide_recommendations"
        );
    }

    #[tokio::test]
    async fn test_upstream_429_relayed_with_fixed_message() {
        let (url, _) = spawn_gateway(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error":{"message":"quota window exceeded for org-123"}}"#.to_string(),
        )
        .await;

        let response = post_profile(app(&url, test_key()), profile_json().to_string()).await;

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        let body = body_json(response).await;
        assert_eq!(body["error"], RATE_LIMIT_MESSAGE);
        assert!(!body.to_string().contains("org-123"));
    }

    #[tokio::test]
    async fn test_upstream_402_relayed_with_distinct_message() {
        let (url, _) =
            spawn_gateway(StatusCode::PAYMENT_REQUIRED, r#"{"error":"pay up"}"#.to_string()).await;

        let response = post_profile(app(&url, test_key()), profile_json().to_string()).await;

        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
        let body = body_json(response).await;
        assert_eq!(body["error"], CREDITS_EXHAUSTED_MESSAGE);
        assert_ne!(body["error"], RATE_LIMIT_MESSAGE);
    }

    #[tokio::test]
    async fn test_other_upstream_failure_is_generic_500() {
        let (url, _) = spawn_gateway(
            StatusCode::BAD_GATEWAY,
            "<html>upstream exploded</html>".to_string(),
        )
        .await;

        let response = post_profile(app(&url, test_key()), profile_json().to_string()).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], GATEWAY_ERROR_MESSAGE);
        assert!(!body.to_string().contains("exploded"));
    }

    #[tokio::test]
    async fn test_missing_tool_call_is_500_with_error_field() {
        let body = json!({
            "choices": [{"message": {"role": "assistant", "content": "Here are some ideas..."}}]
        })
        .to_string();
        let (url, _) = spawn_gateway(StatusCode::OK, body).await;

        let response = post_profile(app(&url, test_key()), profile_json().to_string()).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["error"].is_string());
        assert_eq!(body["code"], "NO_TOOL_CALL");
    }

    #[tokio::test]
    async fn test_choice_without_message_is_missing_tool_call() {
        let (url, _) = spawn_gateway(
            StatusCode::OK,
            json!({"choices": [{"finish_reason": "stop"}]}).to_string(),
        )
        .await;

        let response = post_profile(app(&url, test_key()), profile_json().to_string()).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["code"], "NO_TOOL_CALL");
    }

    #[tokio::test]
    async fn test_malformed_arguments_are_500() {
        let (url, _) = spawn_gateway(
            StatusCode::OK,
            tool_call_response(r#"{"careers": "not a list"}"#),
        )
        .await;

        let response = post_profile(app(&url, test_key()), profile_json().to_string()).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], GATEWAY_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_500() {
        let response = post_profile(
            app("http://127.0.0.1:1/v1/chat/completions", test_key()),
            profile_json().to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], GATEWAY_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_missing_credential_fails_before_upstream_call() {
        let (url, captured) = spawn_gateway(StatusCode::OK, "{}".to_string()).await;
        let credential = GatewayCredential::Env("CAREER_ADVISOR_HANDLER_TEST_KEY_UNSET".into());

        let response = post_profile(app(&url, credential), profile_json().to_string()).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["code"], "CONFIGURATION_ERROR");
        assert_eq!(captured.count(), 0);
    }

    #[tokio::test]
    async fn test_out_of_range_profile_rejected_server_side() {
        let (url, captured) = spawn_gateway(StatusCode::OK, "{}".to_string()).await;
        let mut profile = profile_json();
        profile["cgpa"] = json!(7.2);

        let response = post_profile(app(&url, test_key()), profile.to_string()).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "cgpa: CGPA must be at most 4.0");
        assert_eq!(captured.count(), 0);
    }

    #[tokio::test]
    async fn test_unparseable_body_is_400_json() {
        let (url, captured) = spawn_gateway(StatusCode::OK, "{}".to_string()).await;

        let response = post_profile(app(&url, test_key()), "{\"interests\":".to_string()).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
        assert_eq!(captured.count(), 0);
    }

    #[tokio::test]
    async fn test_preflight_answered_without_body() {
        let response = app("http://127.0.0.1:1", test_key())
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri(ENDPOINT)
                    .header(header::ORIGIN, "https://example.app")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "apikey, content-type")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers().clone();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let allowed = headers[header::ACCESS_CONTROL_ALLOW_HEADERS]
            .to_str()
            .unwrap()
            .to_string();
        assert!(allowed.contains("apikey"));
        assert!(allowed.contains("x-supabase-client-runtime-version"));
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_bare_options_is_empty_200() {
        let response = app("http://127.0.0.1:1", test_key())
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri(ENDPOINT)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_health() {
        let response = app("http://127.0.0.1:1", test_key())
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }
}

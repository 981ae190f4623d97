//! Route definitions and router setup
//!
//! Configures all API routes and middleware.

mod audit;
mod bug_report;
mod enhancement;
mod proposal;
mod rule;

use crate::config::Settings;
use crate::error::{validation_error, AppError};
use crate::state::SharedState;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::MakeRequestUuid,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    ServiceBuilderExt,
};
use tracing::Level;

/// Every mounted API route as (method, path, summary), for the startup banner
pub const ENDPOINTS: &[(&str, &str, &str)] = &[
    ("POST", "/api/enhancements", "Submit a suggestion"),
    ("GET", "/api/enhancements", "List suggestions (?status=)"),
    ("GET", "/api/enhancements/{id}", "Get one suggestion"),
    ("POST", "/api/enhancements/{id}/accept", "Accept"),
    ("POST", "/api/enhancements/{id}/reject", "Reject"),
    ("POST", "/api/enhancements/{id}/complete", "Mark done"),
    ("POST", "/api/enhancements/{id}/transfer", "Promote to proposal"),
    ("POST", "/api/proposals", "Submit a proposal"),
    ("GET", "/api/proposals", "List proposals (?status=)"),
    ("GET", "/api/proposals/{id}", "Get one proposal"),
    ("POST", "/api/proposals/{id}/approve", "Approve into a rule"),
    ("POST", "/api/proposals/{id}/reject", "Reject"),
    ("POST", "/api/proposals/{id}/revert", "Send back as enhancement"),
    ("POST", "/api/proposals/{id}/feedback", "Leave reviewer feedback"),
    ("GET", "/api/proposals/{id}/feedback", "List reviewer feedback"),
    ("GET", "/api/rules", "List rules (?categories=&tags=&project=)"),
    ("GET", "/api/rules/{id}", "Get one rule"),
    ("POST", "/api/bug-reports", "Report a bug"),
    ("GET", "/api/bug-reports", "List bug reports"),
    ("GET", "/api/audit", "Audit trail (?resourceType=&resourceId=&limit=)"),
    ("GET", "/health", "Health check"),
];

/// Create the application router with all routes and middleware
pub fn create_router(state: SharedState, settings: &Settings) -> Router {
    // Build CORS layer
    let cors = build_cors_layer(settings);

    // Build tracing/logging layer
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Build middleware stack
    let middleware = ServiceBuilder::new()
        .set_x_request_id(MakeRequestUuid)
        .layer(trace_layer)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            settings.http.request_timeout,
        ))
        .layer(CompressionLayer::new())
        .layer(cors)
        .propagate_x_request_id();

    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Enhancement routes
        .route(
            "/api/enhancements",
            get(enhancement::list_enhancements).post(enhancement::submit_enhancement),
        )
        .route("/api/enhancements/{id}", get(enhancement::get_enhancement))
        .route("/api/enhancements/{id}/accept", post(enhancement::accept_enhancement))
        .route("/api/enhancements/{id}/reject", post(enhancement::reject_enhancement))
        .route("/api/enhancements/{id}/complete", post(enhancement::complete_enhancement))
        .route("/api/enhancements/{id}/transfer", post(enhancement::transfer_enhancement))

        // Proposal routes
        .route(
            "/api/proposals",
            get(proposal::list_proposals).post(proposal::submit_proposal),
        )
        .route("/api/proposals/{id}", get(proposal::get_proposal))
        .route("/api/proposals/{id}/approve", post(proposal::approve_proposal))
        .route("/api/proposals/{id}/reject", post(proposal::reject_proposal))
        .route("/api/proposals/{id}/revert", post(proposal::revert_proposal))
        .route(
            "/api/proposals/{id}/feedback",
            get(proposal::list_feedback).post(proposal::submit_feedback),
        )

        // Rule routes
        .route("/api/rules", get(rule::list_rules))
        .route("/api/rules/{id}", get(rule::get_rule))

        // Bug reports and audit trail
        .route(
            "/api/bug-reports",
            get(bug_report::list_bug_reports).post(bug_report::submit_bug_report),
        )
        .route("/api/audit", get(audit::list_audit_entries))

        // Apply middleware and state
        .layer(DefaultBodyLimit::max(settings.http.max_body_bytes))
        .layer(middleware)
        .with_state(state)
}

/// Build CORS layer from settings
fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<HeaderValue> = settings
        .cors
        .allowed_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    let layer = if origins.is_empty() {
        CorsLayer::new().allow_origin(Any)
    } else {
        CorsLayer::new().allow_origin(origins)
    };

    layer
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Decode a JSON body; malformed input is a validation error
fn required_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| validation_error(format!("Invalid request body: {}", e)))
}

/// Like [`required_json`], but an empty body yields the default value
fn optional_json<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    required_json(body)
}

/// Health check endpoint
async fn health_check(State(state): State<SharedState>) -> Json<serde_json::Value> {
    let stats = state.workflow.stats().await;
    Json(serde_json::json!({
        "success": true,
        "message": "Server is running fine.",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "stats": stats
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use axum::{body::Body, http::Request};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn app() -> Router {
        create_router(Arc::new(AppState::new()), &Settings::default())
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn submit_enhancement(app: &Router) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/enhancements",
            Some(json!({
                "description": "Prefer early returns",
                "suggestedBy": "ana",
                "categories": ["style"],
                "tags": ["control-flow"],
                "project": "web"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"]["enhancement"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_enhancement_to_rule_over_http() {
        let app = app();
        let enhancement_id = submit_enhancement(&app).await;

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/enhancements/{}/transfer", enhancement_id),
            Some(json!({ "ruleType": "lint" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], json!(true));
        let proposal_id = body["data"]["proposalId"].as_str().unwrap().to_string();
        assert_eq!(body["data"]["proposal"]["status"], json!("pending"));
        assert_eq!(body["data"]["proposal"]["submittedBy"], json!("ana"));

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/api/enhancements/{}", enhancement_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["enhancement"]["status"], json!("transferred"));
        assert_eq!(body["data"]["enhancement"]["transferredTo"], json!(proposal_id));

        // Approve without a body
        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/proposals/{}/approve", proposal_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["rule"]["proposalId"], json!(proposal_id));
        assert_eq!(body["data"]["rule"]["categories"], json!(["style"]));

        let (status, body) = send(&app, Method::GET, "/api/rules?categories=style,naming", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["rules"].as_array().unwrap().len(), 1);

        let (_, body) = send(&app, Method::GET, "/api/rules?categories=naming", None).await;
        assert!(body["data"]["rules"].as_array().unwrap().is_empty());

        let (_, body) = send(&app, Method::GET, "/api/rules?tags=control-flow&project=web", None).await;
        assert_eq!(body["data"]["rules"].as_array().unwrap().len(), 1);

        // Second approval is refused
        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/proposals/{}/approve", proposal_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["code"], json!("INVALID_STATE"));
    }

    #[tokio::test]
    async fn test_revert_over_http() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/proposals",
            Some(json!({
                "ruleType": "lint",
                "description": "No wildcard imports",
                "diff": "- use foo::*;\n+ use foo::Bar;"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let proposal_id = body["data"]["proposal"]["id"].as_str().unwrap().to_string();

        let uri = format!("/api/proposals/{}/revert", proposal_id);
        let (status, body) = send(&app, Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["enhancement"]["status"], json!("open"));
        assert_eq!(body["data"]["enhancement"]["sourceProposal"], json!(proposal_id));

        let (status, _) = send(&app, Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        // A reverted proposal is closed for review decisions
        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/proposals/{}/approve", proposal_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], json!("INVALID_STATE"));

        let (_, body) = send(&app, Method::GET, "/api/proposals?status=reverted", None).await;
        assert_eq!(body["data"]["proposals"][0]["id"], json!(proposal_id));
        assert_eq!(body["data"]["proposals"][0]["status"], json!("reverted"));
    }

    #[tokio::test]
    async fn test_error_codes() {
        let app = app();

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/api/enhancements/{}", Uuid::new_v4()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], json!("NOT_FOUND"));

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/enhancements",
            Some(json!({ "description": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], json!("VALIDATION_ERROR"));

        let (status, _) = send(&app, Method::POST, "/api/enhancements", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, Method::GET, "/api/proposals?status=merged", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], json!("VALIDATION_ERROR"));

        // Transfer needs a rule type
        let enhancement_id = submit_enhancement(&app).await;
        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/api/enhancements/{}/transfer", enhancement_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // Completing an open enhancement skips a step
        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/enhancements/{}/complete", enhancement_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], json!("INVALID_STATE"));
    }

    #[tokio::test]
    async fn test_status_filter_and_feedback() {
        let app = app();
        let first = submit_enhancement(&app).await;
        let second = submit_enhancement(&app).await;

        let (status, _) = send(&app, Method::POST, &format!("/api/enhancements/{}/accept", first), None).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, Method::GET, "/api/enhancements?status=accepted", None).await;
        let listed = body["data"]["enhancements"].as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["id"], json!(first));

        let (_, body) = send(
            &app,
            Method::POST,
            &format!("/api/enhancements/{}/transfer", second),
            Some(json!({ "ruleType": "style" })),
        )
        .await;
        let proposal_id = body["data"]["proposalId"].as_str().unwrap().to_string();

        let feedback_uri = format!("/api/proposals/{}/feedback", proposal_id);
        let (status, _) = send(
            &app,
            Method::POST,
            &feedback_uri,
            Some(json!({ "feedbackType": "needs_changes", "comments": "Add an example" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, body) = send(&app, Method::GET, &feedback_uri, None).await;
        assert_eq!(body["data"]["feedback"][0]["feedbackType"], json!("needs_changes"));
    }

    #[tokio::test]
    async fn test_bug_reports_and_audit() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/bug-reports",
            Some(json!({ "description": "Rules page is blank", "page": "/rules" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let report_id = body["data"]["id"].as_str().unwrap().to_string();

        let (_, body) = send(&app, Method::GET, "/api/bug-reports", None).await;
        assert_eq!(body["data"]["bugReports"][0]["id"], json!(report_id));

        let (_, body) = send(&app, Method::GET, "/api/audit?resourceType=bug_report", None).await;
        let entries = body["data"]["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["action"], json!("bug_reported"));
    }

    #[tokio::test]
    async fn test_malformed_path_and_query_use_error_body() {
        let app = app();

        let (status, body) = send(&app, Method::GET, "/api/enhancements/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["code"], json!("VALIDATION_ERROR"));

        let (status, body) = send(&app, Method::POST, "/api/proposals/42/approve", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], json!("VALIDATION_ERROR"));

        let (status, body) = send(&app, Method::GET, "/api/audit?limit=lots", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], json!("VALIDATION_ERROR"));

        let (status, body) = send(&app, Method::GET, "/api/audit?resourceId=nope", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], json!("VALIDATION_ERROR"));
    }

    #[tokio::test]
    async fn test_rule_content_round_trips_over_http() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/proposals",
            Some(json!({
                "ruleType": "lint",
                "description": "No unwrap in handlers",
                "examples": "let v = map.get(k)?;",
                "appliesTo": ["src/routes"],
                "userStory": "As an operator I want no panics",
                "currentRule": "unwrap tolerated"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let proposal = &body["data"]["proposal"];
        assert_eq!(proposal["appliesTo"], json!(["src/routes"]));
        let proposal_id = proposal["id"].as_str().unwrap().to_string();

        let (_, body) = send(
            &app,
            Method::POST,
            &format!("/api/proposals/{}/approve", proposal_id),
            None,
        )
        .await;
        let rule = &body["data"]["rule"];
        assert_eq!(rule["examples"], json!("let v = map.get(k)?;"));
        assert_eq!(rule["appliesTo"], json!(["src/routes"]));
        assert_eq!(rule["userStory"], json!("As an operator I want no panics"));
        assert_eq!(rule["currentRule"], json!("unwrap tolerated"));
    }

    #[tokio::test]
    async fn test_every_listed_endpoint_is_mounted() {
        let app = app();
        for (method, path, _) in ENDPOINTS {
            let uri = path.replace("{id}", &Uuid::new_v4().to_string());
            let method: Method = method.parse().unwrap();
            let (status, body) = send(&app, method.clone(), &uri, None).await;

            assert_ne!(status, StatusCode::METHOD_NOT_ALLOWED, "{method} {path}");
            // Unknown ids answer with the JSON error body; unmatched routes have none.
            if status == StatusCode::NOT_FOUND {
                assert_eq!(body["code"], json!("NOT_FOUND"), "{method} {path}");
            }
        }
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = app();
        submit_enhancement(&app).await;

        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stats"]["enhancements"], json!(1));
    }

    #[test]
    fn test_optional_json_accepts_empty_body() {
        #[derive(Debug, Default, serde::Deserialize)]
        struct Payload {
            name: Option<String>,
        }

        let parsed: Payload = optional_json(&Bytes::from_static(b"  ")).unwrap();
        assert_eq!(parsed.name, None);
        assert!(optional_json::<Payload>(&Bytes::from_static(b"{oops")).is_err());
    }
}

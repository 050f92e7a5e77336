//! Status mapping and redaction behaviour.

use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::rstest;
use serde_json::Value;

use super::*;

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("no"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("gone"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("taken"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("later"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn every_code_maps_to_a_status(#[case] error: Error, #[case] expected: StatusCode) {
    assert_eq!(error.status_code(), expected);
}

#[actix_web::test]
async fn internal_errors_are_redacted_in_the_body() {
    let error = Error::internal("pool exhausted on shard 7").with_trace_id("trace-abc");
    let response = error.error_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|v| v.to_str().ok()),
        Some("trace-abc")
    );

    let body = to_bytes(response.into_body()).await.expect("body bytes");
    let value: Value = serde_json::from_slice(&body).expect("json body");
    assert_eq!(
        value.get("message").and_then(Value::as_str),
        Some("Internal server error")
    );
    assert_eq!(
        value.get("traceId").and_then(Value::as_str),
        Some("trace-abc")
    );
}

#[actix_web::test]
async fn client_errors_keep_their_message_and_details() {
    let error = field_error("email", "email is already registered");
    let response = error.error_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = to_bytes(response.into_body()).await.expect("body bytes");
    let value: Value = serde_json::from_slice(&body).expect("json body");
    assert_eq!(
        value.get("message").and_then(Value::as_str),
        Some("email is already registered")
    );
    assert_eq!(
        value["details"]["fieldErrors"]["email"].as_str(),
        Some("email is already registered")
    );
}

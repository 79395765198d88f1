use super::*;
use serde_json::json;

// =============================================================================
// SessionError
// =============================================================================

#[test]
fn rejected_displays_backend_message() {
    let err = SessionError::Rejected { status: 500, message: "Error during logout!".into() };
    assert_eq!(err.to_string(), "Error during logout!");
    assert_eq!(err.status(), 500);
}

#[test]
fn transport_reports_500() {
    assert_eq!(SessionError::Transport("dns".into()).status(), 500);
}

// =============================================================================
// BackendResponse
// =============================================================================

#[test]
fn success_range() {
    let ok = BackendResponse { status: 204, body: None };
    let redirect = BackendResponse { status: 307, body: None };
    assert!(ok.is_success());
    assert!(!redirect.is_success());
}

#[test]
fn message_reads_string_field() {
    let resp = BackendResponse { status: 401, body: Some(json!({ "message": "nope" })) };
    assert_eq!(resp.message(), Some("nope"));

    let no_body = BackendResponse { status: 401, body: None };
    assert_eq!(no_body.message(), None);
}

// =============================================================================
// SessionCheck::from_response
// =============================================================================

#[test]
fn fetched_extracts_data() {
    let resp = BackendResponse { status: 200, body: Some(json!({ "success": true, "data": { "user_id": "u1" } })) };
    let check = SessionCheck::from_response(Ok(resp));
    assert_eq!(check, SessionCheck::Fetched { status: 200, data: json!({ "user_id": "u1" }) });
}

#[test]
fn non_success_is_rejected() {
    let resp = BackendResponse { status: 500, body: None };
    match SessionCheck::from_response(Ok(resp)) {
        SessionCheck::Failed { status, error: SessionError::Rejected { status: s, .. } } => {
            assert_eq!(status, 500);
            assert_eq!(s, 500);
        }
        other => panic!("expected rejected failure, got {other:?}"),
    }
}

#[test]
fn non_success_uses_backend_message() {
    let resp = BackendResponse { status: 401, body: Some(json!({ "message": "Unauthorized" })) };
    let SessionCheck::Failed { error, .. } = SessionCheck::from_response(Ok(resp)) else {
        panic!("expected failure");
    };
    assert_eq!(error.to_string(), "Unauthorized");
}

#[test]
fn transport_error_is_failure() {
    let check = SessionCheck::from_response(Err(SessionError::Transport("connection refused".into())));
    assert!(matches!(check, SessionCheck::Failed { status: 500, error: SessionError::Transport(_) }));
}

#[test]
fn missing_data_is_payload_failure() {
    let resp = BackendResponse { status: 200, body: Some(json!({ "message": "hi" })) };
    assert!(matches!(
        SessionCheck::from_response(Ok(resp)),
        SessionCheck::Failed { status: 200, error: SessionError::Payload(_) }
    ));
}

// =============================================================================
// Envelope
// =============================================================================

#[test]
fn login_envelope_wire_shape() {
    let env = Envelope { status: 307, data: LoginRedirect { redirect_uri: "http://be/api/auth/google/login?r=client".into() } };
    let value = serde_json::to_value(&env).unwrap();
    assert_eq!(value, json!({ "status": 307, "data": { "redirectURI": "http://be/api/auth/google/login?r=client" } }));
}

mod common;

use std::time::{Duration, Instant};

use handpoint_core::client::{CompositingService, HttpClient};
use handpoint_core::config::ClientConfig;
use handpoint_core::error::HandpointError;
use handpoint_core::geometry::SourcePoint;
use handpoint_core::protocol::{ProcessRequest, ProcessResponse};
use handpoint_core::telemetry::{HttpTelemetry, TelemetryEvent, TelemetrySink};
use serde_json::json;

use common::{unreachable_url, StubServer};

fn client_for(server: &StubServer) -> HttpClient {
    let config = ClientConfig {
        server_url: server.url(),
        ..ClientConfig::default()
    };
    HttpClient::new(&config).unwrap()
}

fn request() -> ProcessRequest {
    ProcessRequest::new(
        "data:image/png;base64,AQID".into(),
        SourcePoint { x: 200, y: 100 },
        1,
    )
}

// ---------------------------------------------------------------------------
// POST /process
// ---------------------------------------------------------------------------

#[test]
fn test_process_posts_camel_case_body() {
    let server = StubServer::fixed(
        200,
        "application/json",
        r#"{"result": "/img/out2.webp", "nextOverlayIndex": 2}"#,
    );
    let client = client_for(&server);

    let response = client.process(&request()).unwrap();
    assert_eq!(
        response,
        ProcessResponse::Success {
            result: "/img/out2.webp".into(),
            next_overlay_index: 2,
        }
    );

    let received = server.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].method, "POST");
    assert_eq!(received[0].path, "/process");
    assert_eq!(
        received[0].json(),
        json!({"image": "data:image/png;base64,AQID", "x": 200, "y": 100, "overlayIndex": 1})
    );
}

#[test]
fn test_error_body_with_failing_status_is_a_server_failure() {
    let server = StubServer::fixed(
        500,
        "application/json",
        r#"{"error": "An error occurred processing the image"}"#,
    );
    let client = client_for(&server);

    let response = client.process(&request()).unwrap();
    assert_eq!(
        response,
        ProcessResponse::Failure {
            error: "An error occurred processing the image".into(),
        }
    );
}

#[test]
fn test_error_body_with_bad_request_status() {
    let server = StubServer::fixed(400, "application/json", r#"{"error": "No image provided"}"#);
    let client = client_for(&server);

    assert!(matches!(
        client.process(&request()),
        Ok(ProcessResponse::Failure { ref error }) if error == "No image provided"
    ));
}

#[test]
fn test_non_json_failure_is_unexpected_status() {
    let server = StubServer::fixed(502, "text/html", "<html>Bad Gateway</html>");
    let client = client_for(&server);

    let err = client.process(&request()).unwrap_err();
    assert!(
        matches!(err, HandpointError::UnexpectedStatus { status: 502 }),
        "got: {err:?}"
    );
}

#[test]
fn test_non_json_success_is_a_decode_error() {
    let server = StubServer::fixed(200, "text/plain", "ok");
    let client = client_for(&server);

    let err = client.process(&request()).unwrap_err();
    assert!(matches!(err, HandpointError::Json(_)), "got: {err:?}");
}

#[test]
fn test_unreachable_server_is_a_transport_error() {
    let config = ClientConfig {
        server_url: unreachable_url(),
        ..ClientConfig::default()
    };
    let client = HttpClient::new(&config).unwrap();

    let err = client.process(&request()).unwrap_err();
    assert!(matches!(err, HandpointError::Http(_)), "got: {err:?}");
}

// ---------------------------------------------------------------------------
// Result download and stats
// ---------------------------------------------------------------------------

#[test]
fn test_fetch_result_resolves_relative_path() {
    let server = StubServer::start(|_| (200, "image/jpeg", b"JPEGDATA".to_vec()));
    let client = client_for(&server);

    let bytes = client.fetch_result("/static/results/r1.jpg").unwrap();
    assert_eq!(bytes, b"JPEGDATA");
    assert_eq!(server.received()[0].path, "/static/results/r1.jpg");
}

#[test]
fn test_fetch_result_missing_file_is_an_error() {
    let server = StubServer::fixed(404, "text/plain", "not found");
    let client = client_for(&server);

    assert!(client.fetch_result("/static/results/gone.jpg").is_err());
}

#[test]
fn test_fetch_stats_sends_basic_auth_and_days() {
    let server = StubServer::fixed(
        200,
        "application/json",
        r#"{"event_counts": [{"event_type": "image_clicked", "count": 4}], "unique_users": 2, "period_days": 30}"#,
    );
    let client = client_for(&server);

    let stats = client.fetch_stats(30, "admin", "pw").unwrap();
    assert_eq!(stats.unique_users, 2);
    assert_eq!(stats.total_events(), 4);

    let received = server.received();
    assert_eq!(received[0].path, "/stats?days=30");
    assert_eq!(received[0].header("authorization"), Some("Basic YWRtaW46cHc="));
}

#[test]
fn test_fetch_stats_rejects_out_of_range_period() {
    let server = StubServer::fixed(200, "application/json", "{}");
    let client = client_for(&server);

    assert!(matches!(
        client.fetch_stats(0, "admin", "pw"),
        Err(HandpointError::InvalidStatsPeriod(0))
    ));
    assert!(matches!(
        client.fetch_stats(366, "admin", "pw"),
        Err(HandpointError::InvalidStatsPeriod(366))
    ));
    assert!(server.received().is_empty());
}

// ---------------------------------------------------------------------------
// POST /log-event
// ---------------------------------------------------------------------------

#[test]
fn test_flush_waits_for_every_event() {
    let server = StubServer::fixed(200, "application/json", r#"{"status": "success"}"#);
    let telemetry = HttpTelemetry::new(&server.url()).unwrap();

    telemetry.emit(TelemetryEvent::AppReset);
    telemetry.emit(TelemetryEvent::ImageSaved {
        filename: "pointing_1.jpg".into(),
    });

    assert!(telemetry.flush(Duration::from_secs(10)));
    assert_eq!(telemetry.pending(), 0);

    let mut events: Vec<String> = server
        .received()
        .iter()
        .map(|r| {
            assert_eq!(r.path, "/log-event");
            r.json()["event"].as_str().unwrap_or_default().to_string()
        })
        .collect();
    events.sort();
    assert_eq!(events, vec!["app_reset", "image_saved"]);
}

#[test]
fn test_unreachable_telemetry_never_blocks_or_fails() {
    let telemetry = HttpTelemetry::new(&unreachable_url()).unwrap();

    let started = Instant::now();
    for _ in 0..5 {
        telemetry.emit(TelemetryEvent::AppReset);
    }
    assert!(started.elapsed() < Duration::from_secs(1));

    // Failed posts still count as finished.
    assert!(telemetry.flush(Duration::from_secs(10)));
    assert_eq!(telemetry.pending(), 0);
}

#[test]
fn test_rejected_telemetry_is_swallowed() {
    let server = StubServer::fixed(500, "application/json", r#"{"error": "db down"}"#);
    let telemetry = HttpTelemetry::new(&server.url()).unwrap();

    telemetry.emit(TelemetryEvent::ProcessError {
        error: "boom".into(),
    });

    assert!(telemetry.flush(Duration::from_secs(10)));
    assert_eq!(server.received().len(), 1);
}

#[test]
fn test_flush_with_nothing_sent_returns_immediately() {
    let telemetry = HttpTelemetry::new(&unreachable_url()).unwrap();
    assert!(telemetry.flush(Duration::ZERO));
}

#[test]
fn test_controller_flush_delivers_last_event() {
    use std::sync::Arc;

    use handpoint_core::config::UploadConfig;
    use handpoint_core::controller::Controller;

    let server = StubServer::fixed(200, "application/json", r#"{"status": "success"}"#);
    let telemetry = Arc::new(HttpTelemetry::new(&server.url()).unwrap());
    let mut controller = Controller::new(UploadConfig::default(), telemetry);

    controller.reset();

    assert!(controller.flush_telemetry(Duration::from_secs(10)));
    let received = server.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].json(), json!({"event": "app_reset", "details": {}}));
}

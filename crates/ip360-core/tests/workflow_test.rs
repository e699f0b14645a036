#![allow(clippy::unwrap_used)]
// Scan workflow tests against a wiremock XML-RPC appliance.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use url::Url;
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ip360_api::xmlrpc::{encode_fault, encode_response};
use ip360_api::{EntityClass, MethodCall, Value};
use ip360_core::{ApplianceConfig, CoreError, ScanRequest, Session, run_scan};

// ── Helpers ─────────────────────────────────────────────────────────

const LOGIN: &str = "<methodName>login</methodName>";
const LOGOUT: &str = "<methodName>logout</methodName>";
const DP_SEARCH: &str = "<string>class.DP</string>";
const SP_SEARCH: &str = "<string>class.ScanProfile</string>";
const NET_SEARCH: &str = "<string>class.Network</string>";
const START_SCAN: &str = "<string>startScan</string>";

fn config(server: &MockServer) -> ApplianceConfig {
    ApplianceConfig::new(
        Url::parse(&format!("{}/api2xmlrpc", server.uri())).unwrap(),
        "admin",
        SecretString::from("hunter2".to_string()),
    )
}

fn request() -> ScanRequest {
    ScanRequest::new("Default", "Default", "Corp").with_range("10.0.0.0/24")
}

fn reply(value: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(encode_response(&value))
}

fn ids(items: &[&str]) -> Value {
    Value::Array(items.iter().map(|s| Value::from(*s)).collect())
}

async fn mount(server: &MockServer, marker: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(body_string_contains(marker))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Mount login + logout plus the three searches with the given results.
async fn mount_appliance(server: &MockServer, dp: Value, sp: Value, net: Value) {
    mount(server, LOGIN, reply(Value::from("sess-1"))).await;
    mount(server, LOGOUT, reply(Value::Int(1))).await;
    mount(server, DP_SEARCH, reply(dp)).await;
    mount(server, SP_SEARCH, reply(sp)).await;
    mount(server, NET_SEARCH, reply(net)).await;
}

async fn received_calls(server: &MockServer) -> Vec<MethodCall> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|req| MethodCall::parse(std::str::from_utf8(&req.body).unwrap()).unwrap())
        .collect()
}

/// `method` for top-level calls, `target.method` for `call(...)`.
fn call_names(calls: &[MethodCall]) -> Vec<String> {
    calls
        .iter()
        .map(|c| match (c.method.as_str(), c.params.get(1), c.params.get(2)) {
            ("call", Some(target), Some(name)) => format!("{target}.{name}"),
            (other, _, _) => other.to_owned(),
        })
        .collect()
}

// ── Happy path ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_end_to_end_scan() {
    let server = MockServer::start().await;
    mount_appliance(&server, ids(&["dp1"]), ids(&["sp1"]), ids(&["net1"])).await;
    mount(&server, START_SCAN, reply(Value::from("Audit.42"))).await;

    let outcome = run_scan(&config(&server), &request()).await.unwrap();

    assert!(outcome.changed);
    assert_eq!(outcome.scan, Value::from("Audit.42"));

    let calls = received_calls(&server).await;
    assert_eq!(
        call_names(&calls),
        vec![
            "login",
            "class.DP.search",
            "class.ScanProfile.search",
            "class.Network.search",
            "dp1.startScan",
            "logout",
        ]
    );
    assert_eq!(
        calls[4].params,
        vec![
            Value::from("sess-1"),
            Value::from("dp1"),
            Value::from("startScan"),
            Value::structure([
                ("network", Value::from("net1")),
                ("range", Value::from("10.0.0.0/24")),
                ("scanProfile", Value::from("sp1")),
            ]),
        ]
    );
}

#[tokio::test]
async fn test_integer_ids_are_sent_as_strings() {
    let server = MockServer::start().await;
    let int_ids = |id| Value::Array(vec![Value::Int(id)]);
    mount_appliance(&server, int_ids(7), int_ids(12), int_ids(31)).await;
    mount(&server, START_SCAN, reply(Value::from("Audit.43"))).await;

    run_scan(&config(&server), &request()).await.unwrap();

    let calls = received_calls(&server).await;
    assert_eq!(
        calls[4].params,
        vec![
            Value::from("sess-1"),
            Value::from("7"),
            Value::from("startScan"),
            Value::structure([
                ("network", Value::from("31")),
                ("range", Value::from("10.0.0.0/24")),
                ("scanProfile", Value::from("12")),
            ]),
        ]
    );
}

#[tokio::test]
async fn test_first_match_is_used() {
    let server = MockServer::start().await;
    mount_appliance(
        &server,
        ids(&["DP.3", "DP.8"]),
        ids(&["ScanProfile.1", "ScanProfile.2"]),
        ids(&["Network.5", "Network.6", "Network.7"]),
    )
    .await;
    mount(&server, START_SCAN, reply(Value::Int(991))).await;

    let outcome = run_scan(&config(&server), &request()).await.unwrap();

    assert_eq!(outcome.device_profiler, "DP.3");
    assert_eq!(outcome.scan_profile, "ScanProfile.1");
    assert_eq!(outcome.network, "Network.5");
    assert_eq!(outcome.scan, Value::Int(991));
}

#[tokio::test]
async fn test_search_queries_use_name_equality() {
    let server = MockServer::start().await;
    mount_appliance(&server, ids(&["dp1"]), ids(&["sp1"]), ids(&["net1"])).await;
    mount(&server, START_SCAN, reply(Value::from("Audit.1"))).await;

    run_scan(&config(&server), &request()).await.unwrap();

    let calls = received_calls(&server).await;
    let queries: Vec<_> = calls[1..4].iter().map(|c| c.params[3].clone()).collect();
    assert_eq!(
        queries,
        vec![
            Value::structure([("query", Value::from("name = 'Default'"))]),
            Value::structure([("query", Value::from("name = 'Default'"))]),
            Value::structure([("query", Value::from("name = 'Corp'"))]),
        ]
    );
}

#[tokio::test]
async fn test_range_omitted_when_unset() {
    let server = MockServer::start().await;
    mount_appliance(&server, ids(&["dp1"]), ids(&["sp1"]), ids(&["net1"])).await;
    mount(&server, START_SCAN, reply(Value::from("Audit.2"))).await;

    let request = ScanRequest::new("Default", "Default", "Corp");
    let outcome = run_scan(&config(&server), &request).await.unwrap();
    assert_eq!(outcome.range, None);

    let calls = received_calls(&server).await;
    assert_eq!(
        calls[4].params[3],
        Value::structure([
            ("network", Value::from("net1")),
            ("scanProfile", Value::from("sp1")),
        ])
    );
}

// ── Resolution failures ─────────────────────────────────────────────

async fn assert_not_found(dp: Value, sp: Value, net: Value, expected: EntityClass) {
    let server = MockServer::start().await;
    mount_appliance(&server, dp, sp, net).await;
    Mock::given(method("POST"))
        .and(body_string_contains(START_SCAN))
        .respond_with(reply(Value::from("never")))
        .expect(0)
        .mount(&server)
        .await;

    let err = run_scan(&config(&server), &request()).await.unwrap_err();

    assert!(
        err.to_string().contains(&format!("{expected} not found")),
        "unexpected message: {err}"
    );
    match err {
        CoreError::NotFound { kind, .. } => assert_eq!(kind, expected),
        other => panic!("expected NotFound, got: {other:?}"),
    }

    // The session is still released.
    let names = call_names(&received_calls(&server).await);
    assert_eq!(names.last().map(String::as_str), Some("logout"));
    assert!(!names.iter().any(|n| n.ends_with(".startScan")));
}

#[tokio::test]
async fn test_device_profiler_not_found() {
    assert_not_found(
        ids(&[]),
        ids(&["sp1"]),
        ids(&["net1"]),
        EntityClass::DeviceProfiler,
    )
    .await;
}

#[tokio::test]
async fn test_scan_profile_not_found() {
    assert_not_found(
        ids(&["dp1"]),
        ids(&[]),
        ids(&["net1"]),
        EntityClass::ScanProfile,
    )
    .await;
}

#[tokio::test]
async fn test_network_not_found() {
    assert_not_found(ids(&["dp1"]), ids(&["sp1"]), ids(&[]), EntityClass::Network).await;
}

// ── Remote errors ───────────────────────────────────────────────────

#[tokio::test]
async fn test_start_scan_fault_surfaces_code_and_string() {
    let server = MockServer::start().await;
    mount_appliance(&server, ids(&["dp1"]), ids(&["sp1"]), ids(&["net1"])).await;
    mount(
        &server,
        START_SCAN,
        ResponseTemplate::new(200).set_body_string(encode_fault(302, "Range outside network")),
    )
    .await;

    let err = run_scan(&config(&server), &request()).await.unwrap_err();

    assert!(matches!(err, CoreError::RemoteFault { code: 302, .. }));
    assert_eq!(err.to_string(), "xmlrpc fault: 302 Range outside network");

    let names = call_names(&received_calls(&server).await);
    assert_eq!(names.last().map(String::as_str), Some("logout"));
}

#[tokio::test]
async fn test_login_protocol_error_stops_workflow() {
    let server = MockServer::start().await;
    mount(&server, LOGIN, ResponseTemplate::new(500)).await;

    let err = run_scan(&config(&server), &request()).await.unwrap_err();

    assert!(matches!(err, CoreError::Protocol { status: 500, .. }));
    assert_eq!(
        err.to_string(),
        "xmlrpc protocol error: 500 Internal Server Error"
    );

    // Nothing after the failed login, not even logout.
    assert_eq!(call_names(&received_calls(&server).await), vec!["login"]);
}

#[tokio::test]
async fn test_login_fault_is_authentication_failure() {
    let server = MockServer::start().await;
    mount(
        &server,
        LOGIN,
        ResponseTemplate::new(200).set_body_string(encode_fault(1, "Bad username or password")),
    )
    .await;

    let err = run_scan(&config(&server), &request()).await.unwrap_err();

    match err {
        CoreError::AuthenticationFailed { ref message } => {
            assert_eq!(message, "xmlrpc fault: 1 Bad username or password");
        }
        other => panic!("expected AuthenticationFailed, got: {other:?}"),
    }
    assert_eq!(call_names(&received_calls(&server).await), vec!["login"]);
}

#[tokio::test]
async fn test_logout_failure_is_not_fatal() {
    let server = MockServer::start().await;
    mount(&server, LOGIN, reply(Value::from("sess-1"))).await;
    mount(&server, LOGOUT, ResponseTemplate::new(500)).await;
    mount(&server, DP_SEARCH, reply(ids(&["dp1"]))).await;
    mount(&server, SP_SEARCH, reply(ids(&["sp1"]))).await;
    mount(&server, NET_SEARCH, reply(ids(&["net1"]))).await;
    mount(&server, START_SCAN, reply(Value::from("Audit.9"))).await;

    let outcome = run_scan(&config(&server), &request()).await.unwrap();
    assert_eq!(outcome.scan, Value::from("Audit.9"));
}

#[tokio::test]
async fn test_slow_appliance_times_out() {
    let server = MockServer::start().await;
    mount_appliance(&server, ids(&["dp1"]), ids(&["sp1"]), ids(&["net1"])).await;
    mount(
        &server,
        START_SCAN,
        reply(Value::from("Audit.9")).set_delay(Duration::from_secs(3)),
    )
    .await;

    let mut config = config(&server);
    config.timeout = Duration::from_secs(1);

    let err = run_scan(&config, &request()).await.unwrap_err();
    assert!(
        matches!(err, CoreError::Timeout { ref url } if url.ends_with("/api2xmlrpc")),
        "{err:?}"
    );
    let names = call_names(&received_calls(&server).await);
    assert_eq!(names.last().map(String::as_str), Some("logout"));
}

// ── Session helpers ─────────────────────────────────────────────────

#[tokio::test]
async fn test_scoped_search_lists_all_matches() {
    let server = MockServer::start().await;
    mount_appliance(&server, ids(&["DP.1", "DP.2"]), ids(&[]), ids(&[])).await;

    let found = Session::scoped(&config(&server), async |session| {
        session.search(EntityClass::DeviceProfiler, "Edge").await
    })
    .await
    .unwrap();

    assert_eq!(found, vec![Value::from("DP.1"), Value::from("DP.2")]);
    assert_eq!(
        call_names(&received_calls(&server).await),
        vec!["login", "class.DP.search", "logout"]
    );
}

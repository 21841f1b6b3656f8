#![allow(clippy::unwrap_used)]
// Integration tests for `Connector` and `Session` against a mock device.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use wiremock::matchers::{body_string, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fritzctl_api::{
    ActionRequest, CallKind, Connector, ConnectorConfig, Error, GuestWifiConfig, HttpTransport,
    SessionId, TransportConfig,
};

const CHALLENGE: &str = "1234567z";
const PASSWORD: &str = "testpwd";
const RESPONSE: &str = "1234567z-650b72c6ff7576d7721daa519760126d";
const SID: &str = "a1b2c3d4e5f60718";

// ── Helpers ─────────────────────────────────────────────────────────

fn session_info(sid: &str, challenge: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?><SessionInfo><SID>{sid}</SID><Challenge>{challenge}</Challenge><BlockTime>0</BlockTime><Rights></Rights></SessionInfo>"#
    )
}

fn fast_config() -> ConnectorConfig {
    ConnectorConfig {
        poll_interval: Duration::from_millis(1),
        settle_delay: Duration::ZERO,
        ..ConnectorConfig::default()
    }
}

async fn setup() -> (MockServer, Connector) {
    let server = MockServer::start().await;
    let transport = Arc::new(HttpTransport::new(&TransportConfig::default()).unwrap());
    let connector =
        Connector::with_transport(server.address().to_string(), transport, fast_config());
    (server, connector)
}

async fn mount_challenge(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/login_sid.lua"))
        .and(query_param_is_missing("response"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(session_info(SessionId::SENTINEL, CHALLENGE)),
        )
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_login_answer(server: &MockServer, sid: &str) {
    Mock::given(method("GET"))
        .and(path("/login_sid.lua"))
        .and(query_param("user", ""))
        .and(query_param("response", RESPONSE))
        .respond_with(ResponseTemplate::new(200).set_body_string(session_info(sid, CHALLENGE)))
        .expect(1)
        .mount(server)
        .await;
}

fn password() -> SecretString {
    PASSWORD.to_string().into()
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, connector) = setup().await;
    mount_challenge(&server).await;
    mount_login_answer(&server, SID).await;

    let session = connector.login(&password()).await.unwrap();

    assert_eq!(session.sid().as_str(), SID);
    assert_eq!(session.address(), server.address().to_string());
}

#[tokio::test]
async fn test_login_sentinel_sid_is_authentication_error() {
    let (server, connector) = setup().await;
    mount_challenge(&server).await;
    mount_login_answer(&server, SessionId::SENTINEL).await;

    let result = connector.login(&password()).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_login_malformed_sid() {
    let (server, connector) = setup().await;
    mount_challenge(&server).await;
    mount_login_answer(&server, "not-a-sid").await;

    let result = connector.login(&password()).await;

    assert!(
        matches!(result, Err(Error::Extraction { .. })),
        "expected Extraction error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_login_challenge_http_error() {
    let (server, connector) = setup().await;

    Mock::given(method("GET"))
        .and(path("/login_sid.lua"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = connector.login(&password()).await;

    assert!(
        matches!(result, Err(Error::Transport(_))),
        "expected Transport error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_login_connection_refused() {
    // Grab a free port, then close the listener so nothing listens there.
    let address = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().to_string()
    };
    let connector = Connector::new(address, fast_config()).unwrap();

    let result = connector.login(&password()).await;

    match result {
        Err(ref err @ Error::Transport(_)) => assert!(err.is_transient(), "{err:?}"),
        other => panic!("expected Transport error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_resume_rejects_sentinel() {
    let (_server, connector) = setup().await;
    let result = connector.resume(SessionId::SENTINEL.parse().unwrap());
    assert!(matches!(result, Err(Error::Authentication { .. })));
}

#[tokio::test]
async fn test_sessions_build_identical_urls() {
    let (_server, connector) = setup().await;
    let a = connector.resume(SID.parse().unwrap()).unwrap();
    let b = connector.resume(SID.parse().unwrap()).unwrap();

    let params = [("useajax", "1"), ("action", "connect")];
    assert_eq!(
        a.request_url("internet/inetstat_monitor", &params).unwrap(),
        b.request_url("internet/inetstat_monitor", &params).unwrap()
    );
    assert_eq!(
        a.request_url("fon_num/foncalls_list", &[("csv", "")])
            .unwrap()
            .query(),
        Some("sid=a1b2c3d4e5f60718&csv=")
    );
}

// ── Guest WiFi tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_turn_on_guest_wifi() {
    let (server, connector) = setup().await;
    let session = connector.resume(SID.parse().unwrap()).unwrap();

    Mock::given(method("POST"))
        .and(path("/wlan/guest_access.lua"))
        .and(query_param("sid", SID))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let config = GuestWifiConfig {
        activate_push_service: false,
        limit_web_access: true,
        allow_client_communication: false,
        ..GuestWifiConfig::new("Guests", "secret123")
    };
    session.turn_on_guest_wifi(&config).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8(requests[0].body.clone()).unwrap();
    assert!(body.starts_with("activate_guest_access=on&autoupdate=on"), "{body}");
    assert!(body.contains("guest_ssid=Guests"), "{body}");
    assert!(body.contains("sec_mode=3"), "{body}");
    assert!(body.contains("group_access=on"), "{body}");
    assert!(!body.contains("push_service=on"), "{body}");
    assert!(!body.contains("user_isolation=on"), "{body}");
    assert_eq!(
        requests[0].headers.get("content-type").unwrap(),
        "application/x-www-form-urlencoded"
    );
}

#[tokio::test]
async fn test_turn_off_guest_wifi() {
    let (server, connector) = setup().await;
    let session = connector.resume(SID.parse().unwrap()).unwrap();

    Mock::given(method("POST"))
        .and(path("/wlan/guest_access.lua"))
        .and(query_param("sid", SID))
        .and(body_string("autoupdate=on"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    session.turn_off_guest_wifi().await.unwrap();
}

// ── Internet tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_internet_ip() {
    let (server, connector) = setup().await;
    let session = connector.resume(SID.parse().unwrap()).unwrap();

    Mock::given(method("GET"))
        .and(path("/internet/inetstat_monitor.lua"))
        .and(query_param("sid", SID))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<table><tr><td><div><span>IP-Adresse: 203.0.113.7</span></div></td></tr><tr><td>",
        ))
        .mount(&server)
        .await;

    assert_eq!(session.internet_ip().await.unwrap(), "203.0.113.7");
}

#[tokio::test]
async fn test_internet_ip_expired_session() {
    let (server, connector) = setup().await;
    let session = connector.resume(SID.parse().unwrap()).unwrap();

    Mock::given(method("GET"))
        .and(path("/internet/inetstat_monitor.lua"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>Anmeldung</body></html>"),
        )
        .mount(&server)
        .await;

    let result = session.internet_ip().await;
    assert!(
        matches!(result, Err(Error::Extraction { .. })),
        "expected Extraction error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_reconnect_polls_disconnect_then_connect() {
    let (server, connector) = setup().await;
    let session = connector.resume(SID.parse().unwrap()).unwrap();

    Mock::given(method("GET"))
        .and(path("/internet/inetstat_monitor.lua"))
        .and(query_param("action", "disconnect"))
        .respond_with(ResponseTemplate::new(200).set_body_string("done:0"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/internet/inetstat_monitor.lua"))
        .and(query_param("action", "disconnect"))
        .respond_with(ResponseTemplate::new(200).set_body_string("done:1"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/internet/inetstat_monitor.lua"))
        .and(query_param("useajax", "1"))
        .and(query_param("action", "connect"))
        .respond_with(ResponseTemplate::new(200).set_body_string("done:1"))
        .expect(1)
        .mount(&server)
        .await;

    session.reconnect_to_internet().await.unwrap();

    let actions: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter_map(|r| {
            r.url
                .query_pairs()
                .find(|(k, _)| k == "action")
                .map(|(_, v)| v.into_owned())
        })
        .collect();
    assert_eq!(
        actions,
        vec!["disconnect", "disconnect", "disconnect", "connect"]
    );
}

#[tokio::test]
async fn test_reconnect_propagates_transport_error() {
    let (server, connector) = setup().await;
    let session = connector.resume(SID.parse().unwrap()).unwrap();

    Mock::given(method("GET"))
        .and(path("/internet/inetstat_monitor.lua"))
        .and(query_param("action", "disconnect"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("action", "connect"))
        .respond_with(ResponseTemplate::new(200).set_body_string("done:1"))
        .expect(0)
        .mount(&server)
        .await;

    let result = session.reconnect_to_internet().await;
    assert!(
        matches!(result, Err(Error::Transport(_))),
        "expected Transport error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_fire_and_forget_failure_goes_to_sink() {
    let (server, connector) = setup().await;
    let failures = Arc::new(Mutex::new(Vec::new()));
    let sink_failures = Arc::clone(&failures);
    let connector = connector.with_error_sink(Arc::new(
        move |req: &ActionRequest, err: &Error| {
            sink_failures
                .lock()
                .unwrap()
                .push(format!("{} {err}", req.url.path()));
        },
    ));
    let session = connector.resume(SID.parse().unwrap()).unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let url = session
        .request_url("internet/inetstat_monitor", &[("useajax", "1"), ("action", "connect")])
        .unwrap();
    let request = ActionRequest::new(url)
        .poll_interval(Duration::from_millis(1))
        .fire_and_forget();

    session.executor().execute(request).await.unwrap();
    session.executor().wait_idle().await;

    let failures = failures.lock().unwrap();
    assert_eq!(failures.len(), 1);
    assert!(
        failures[0].starts_with("/internet/inetstat_monitor.lua"),
        "{}",
        failures[0]
    );
}

// ── Call list tests ─────────────────────────────────────────────────

#[tokio::test]
async fn test_call_list() {
    let (server, connector) = setup().await;
    let session = connector.resume(SID.parse().unwrap()).unwrap();

    let csv = "sep=;\n\
        Typ;Datum;Name;Rufnummer;Nebenstelle;Eigene Rufnummer;Dauer\n\
        1;17.10.26 09:15;Erika Mustermann;0301234567;Telefon;SIP: 987654;0:03\n\
        2;16.10.26 18:02;;01701234567;Mobilteil 1;SIP: 987654;0:00\n";

    Mock::given(method("GET"))
        .and(path("/fon_num/foncalls_list.lua"))
        .and(query_param("sid", SID))
        .and(query_param("csv", ""))
        .respond_with(ResponseTemplate::new(200).set_body_string(csv))
        .expect(1)
        .mount(&server)
        .await;

    let calls = session.call_list().await.unwrap();

    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].kind, CallKind::Incoming);
    assert_eq!(calls[0].name, "Erika Mustermann");
    assert_eq!(calls[1].kind, CallKind::Missed);
    assert_eq!(calls[1].number, "01701234567");
}

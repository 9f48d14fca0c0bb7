#![allow(clippy::unwrap_used)]
// End-to-end gateway tests over HTTP against a wiremock backend.

use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rua_core::{
    CoreError, CoreStatus, DocumentKind, Gateway, GatewayConfig, NodeView, NotificationLevel,
    SyncErrorKind,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Gateway) {
    let server = MockServer::start().await;
    let mut config = GatewayConfig::new(server.uri().parse().unwrap());
    config.timeout = Duration::from_secs(2);
    let gateway = Gateway::over_http(config).unwrap();
    (server, gateway)
}

fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "code": 200, "data": data }))
}

fn core_document() -> Value {
    json!({
        "log": { "loglevel": "warning" },
        "inbounds": [
            { "port": 1080, "listen": "127.0.0.1", "tag": "socks", "protocol": "socks",
              "settings": { "auth": "noauth", "udp": true } },
            { "port": 1087, "listen": "127.0.0.1", "tag": "http", "protocol": "http" }
        ],
        "outbounds": [],
        "routing": {
            "domainStrategy": "IPIfNonMatch",
            "rules": [
                { "type": "field", "inboundTag": ["api"], "port": "53", "network": "udp",
                  "outboundTag": "direct" }
            ]
        },
        "policy": { "levels": { "0": { "handshake": 4, "connIdle": 300 } } }
    })
}

async fn mount_core(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/get_core_config"))
        .respond_with(ok(core_document()))
        .mount(server)
        .await;
}

// ── Reload ──────────────────────────────────────────────────────────

#[tokio::test]
async fn reload_runtime_populates_rows() {
    let (server, gw) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/get_rua_config"))
        .respond_with(ok(json!({
            "core_status": "Started",
            "currentId": "n2",
            "subscriptions": [
                { "name": "A", "url": "https://a.example/sub", "nodes": [
                    { "ps": "a1", "add": "a1.example", "port": 443, "nodeId": "n1" },
                    { "ps": "a2", "add": "a2.example", "port": "8443", "nodeId": "n2",
                      "connectivity": true, "delay": 88 }
                ]},
                { "name": "B", "url": "https://b.example/sub", "nodes": null }
            ]
        })))
        .mount(&server)
        .await;

    gw.reload(DocumentKind::Runtime).await.unwrap();

    let snap = gw.store().snapshot();
    assert_eq!(snap.config().rua().core_status, CoreStatus::Started);
    let rows = NodeView::new().project(&snap);
    assert_eq!(rows.len(), 2);
    assert!(rows[1].is_current);
    assert_eq!(rows[1].delay_label().as_deref(), Some("88ms"));
    assert_eq!(rows[0].node.port, "443");
}

#[tokio::test]
async fn reload_failure_reports_fetch_and_keeps_state() {
    let (server, gw) = setup().await;
    let mut notes = gw.notifications();

    Mock::given(method("POST"))
        .and(path("/api/get_core_config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 1002,
            "message": "cannot read core config"
        })))
        .mount(&server)
        .await;

    let err = gw.reload(DocumentKind::Core).await.unwrap_err();

    assert_eq!(err.kind, SyncErrorKind::Fetch);
    assert!(err.cause.contains("cannot read core config"));
    assert!(gw.store().core_config().is_none());
    assert_eq!(notes.recv().await.unwrap().level, NotificationLevel::Error);
}

// ── Push ────────────────────────────────────────────────────────────

#[tokio::test]
async fn socks_edit_then_push_sends_edited_document() {
    let (server, gw) = setup().await;
    mount_core(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/update_config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 200 })))
        .expect(1)
        .mount(&server)
        .await;

    gw.reload(DocumentKind::Core).await.unwrap();
    gw.store().mutate_socks_inbound(|i| i.port = 1089).unwrap();
    gw.push(DocumentKind::Core).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let update = requests
        .iter()
        .find(|r| r.url.path() == "/api/update_config")
        .unwrap();
    let body: Value = serde_json::from_slice(&update.body).unwrap();
    assert!(body.get("ruaConfig").is_none());
    let inbounds = &body["coreConfig"]["inbounds"];
    assert_eq!(inbounds[0]["port"], 1089);
    assert_eq!(inbounds[1], core_document()["inbounds"][1]);
    assert_eq!(body["coreConfig"]["routing"]["domainStrategy"], "IPIfNonMatch");
    assert_eq!(
        body["coreConfig"]["routing"]["rules"],
        core_document()["routing"]["rules"]
    );
    assert_eq!(body["coreConfig"]["policy"]["levels"]["0"]["connIdle"], 300);
}

#[tokio::test]
async fn rejected_push_keeps_local_edit() {
    let (server, gw) = setup().await;
    mount_core(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/update_config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 1004,
            "message": "write core config failed"
        })))
        .mount(&server)
        .await;

    gw.reload(DocumentKind::Core).await.unwrap();
    gw.store().mutate_socks_inbound(|i| i.port = 2080).unwrap();

    let err = gw.push(DocumentKind::Core).await.unwrap_err();

    assert_eq!(err.kind, SyncErrorKind::Write);
    let core = gw.store().core_config().unwrap();
    assert_eq!(core.socks_inbound().unwrap().port, 2080);
}

// ── Node actions ────────────────────────────────────────────────────

#[tokio::test]
async fn select_node_posts_node_id() {
    let (server, gw) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/select_node"))
        .and(body_json(json!({ "nodeId": "n9" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 200 })))
        .expect(1)
        .mount(&server)
        .await;

    gw.select_node("n9").await.unwrap();
}

#[tokio::test]
async fn select_node_rejection_is_surfaced() {
    let (server, gw) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/select_node"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 1000,
            "message": "node not found"
        })))
        .mount(&server)
        .await;

    let err = gw.select_node("missing").await.unwrap_err();
    assert!(matches!(err, CoreError::Rejected { .. }));
}

#[tokio::test]
async fn ready_hits_event_endpoint_once() {
    let (server, gw) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/events/ready"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 200 })))
        .expect(1)
        .mount(&server)
        .await;

    gw.announce_ready().await.unwrap();
    gw.announce_ready().await.unwrap();
}

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cluster_source::{
    ClusterSource, FetchPolicy, RelayConfig, RelaySource, ResourceKind, SourceError,
    LEGACY_AGENT_PREFIX,
};

fn fast_policy(attempts: u32) -> FetchPolicy {
    FetchPolicy {
        timeout: Duration::from_millis(500),
        attempts,
        retry_delay: Duration::from_millis(10),
    }
}

#[tokio::test]
async fn relays_raw_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/docker/raw/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"ID": "n1"}])))
        .expect(1)
        .mount(&server)
        .await;

    let relay = RelaySource::new(RelayConfig::new(server.uri()), fast_policy(2)).unwrap();
    let payload = relay.fetch_raw(ResourceKind::Nodes).await.unwrap();

    assert_eq!(payload, json!([{"ID": "n1"}]));
}

#[tokio::test]
async fn legacy_prefix_targets_plain_paths() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/docker/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Swarm": {"LocalNodeState": "active"}})))
        .mount(&server)
        .await;

    let relay = RelaySource::new(
        RelayConfig::new(server.uri()).with_path_prefix(LEGACY_AGENT_PREFIX),
        fast_policy(1),
    )
    .unwrap();
    let payload = relay.fetch_raw(ResourceKind::Info).await.unwrap();

    assert_eq!(payload["Swarm"]["LocalNodeState"], "active");
}

#[tokio::test]
async fn upstream_error_status_carries_its_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/docker/raw/health"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({"connected": false, "error": "connect ENOENT /var/run/docker.sock"})),
        )
        .expect(2)
        .mount(&server)
        .await;

    let relay = RelaySource::new(RelayConfig::new(server.uri()), fast_policy(2)).unwrap();
    let err = relay.fetch_raw(ResourceKind::Info).await.unwrap_err();

    assert_eq!(
        err,
        SourceError::status(500, "connect ENOENT /var/run/docker.sock")
    );
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let relay = RelaySource::new(RelayConfig::new(server.uri()), fast_policy(2)).unwrap();
    let err = relay.fetch_raw(ResourceKind::Services).await.unwrap_err();

    assert!(matches!(err, SourceError::Status { status: 404, .. }));
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let policy = FetchPolicy {
        timeout: Duration::from_millis(100),
        attempts: 1,
        retry_delay: Duration::from_millis(1),
    };
    let relay = RelaySource::new(RelayConfig::new(server.uri()), policy).unwrap();
    let err = relay.fetch_raw(ResourceKind::Nodes).await.unwrap_err();

    assert_eq!(err, SourceError::Timeout(Duration::from_millis(100)));
}

#[tokio::test]
async fn non_json_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let relay = RelaySource::new(RelayConfig::new(server.uri()), fast_policy(2)).unwrap();
    let err = relay.fetch_raw(ResourceKind::Nodes).await.unwrap_err();

    assert!(matches!(err, SourceError::Decode(_)));
}

#[tokio::test]
async fn unreachable_upstream_is_connect_error() {
    // Bind then drop a listener to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let relay = RelaySource::new(
        RelayConfig::new(format!("http://{}", addr)),
        fast_policy(2),
    )
    .unwrap();
    let err = relay.fetch_raw(ResourceKind::Info).await.unwrap_err();

    assert!(matches!(err, SourceError::Connect(_)), "unexpected error: {err:?}");
}

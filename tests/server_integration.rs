//! Integration tests for the HTTP server.
//!
//! These tests start the real Axum server on a free port and drive its JSON
//! API end-to-end: the health check, the merged suggestion endpoint, the
//! catalog record endpoint, and the direct lookup function.

use culturevault::config::Config;
use culturevault::server::run_server;
use serde_json::{json, Value};
use tempfile::TempDir;

// ─── Helpers ────────────────────────────────────────────────────────

/// Config for a server on `port` with the gateway disabled.
fn server_config(tmp: &TempDir, port: u16) -> Config {
    let config_content = format!(
        r#"
[gateway]
provider = "disabled"

[storage]
data_dir = "{}/data"

[server]
host = "127.0.0.1"
port = {}
"#,
        tmp.path().display(),
        port
    );
    toml::from_str(&config_content).unwrap()
}

fn cv_binary() -> std::path::PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("cv");
    path
}

/// Kills the spawned `cv serve` process when the test ends, pass or fail.
struct ServeGuard(std::process::Child);

impl Drop for ServeGuard {
    fn drop(&mut self) {
        self.0.kill().ok();
        self.0.wait().ok();
    }
}

fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

async fn wait_for_server(port: u16) {
    let client = reqwest::Client::new();
    let url = format!("http://127.0.0.1:{}/health", port);
    for _ in 0..50 {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        if let Ok(resp) = client.get(&url).send().await {
            if resp.status().is_success() {
                return;
            }
        }
    }
    panic!("Server did not become ready within 5 seconds");
}

// ─── Tests ──────────────────────────────────────────────────────────

/// Prove that the health check reports the running version.
#[tokio::test]
async fn test_health_reports_version() {
    let port = find_free_port();
    let tmp = TempDir::new().unwrap();
    let config = server_config(&tmp, port);

    let server_handle = tokio::spawn(async move {
        run_server(&config).await.ok();
    });
    wait_for_server(port).await;

    let client = reqwest::Client::new();
    let resp = client
        .get(format!("http://127.0.0.1:{}/health", port))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

    server_handle.abort();
}

/// Prove that the search endpoint serves the default slice for an empty
/// query, merged filter hits for a real one, and honors `limit`.
#[tokio::test]
async fn test_search_endpoint_filters_and_limits() {
    let port = find_free_port();
    let tmp = TempDir::new().unwrap();
    let config = server_config(&tmp, port);

    let server_handle = tokio::spawn(async move {
        run_server(&config).await.ok();
    });
    wait_for_server(port).await;

    let client = reqwest::Client::new();
    let base = format!("http://127.0.0.1:{}", port);

    // Empty query: the default catalog slice
    let resp = client
        .get(format!("{}/search?q=", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["query"], "");
    assert_eq!(
        body["suggestions"].as_array().unwrap().len(),
        24,
        "got: {}",
        body
    );

    // A catalog hit comes back as a local suggestion
    let resp = client
        .get(format!("{}/search?q=kyoto", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let rows = body["suggestions"].as_array().unwrap();
    assert_eq!(rows.len(), 1, "got: {}", body);
    assert_eq!(rows[0]["id"], "kyoto");
    assert_eq!(rows[0]["remote"], false);

    // limit truncates the merged list
    let resp = client
        .get(format!("{}/search?q=&limit=5", base))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["suggestions"].as_array().unwrap().len(), 5);

    server_handle.abort();
}

/// Prove that the place endpoint serves full records and structured 404s.
#[tokio::test]
async fn test_place_endpoint_returns_record_or_not_found() {
    let port = find_free_port();
    let tmp = TempDir::new().unwrap();
    let config = server_config(&tmp, port);

    let server_handle = tokio::spawn(async move {
        run_server(&config).await.ok();
    });
    wait_for_server(port).await;

    let client = reqwest::Client::new();
    let base = format!("http://127.0.0.1:{}", port);

    let resp = client
        .get(format!("{}/place/kyoto", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["name"], "Kyoto");
    assert_eq!(body["country"], "Japan");
    assert!(
        body["cultures"].as_array().is_some(),
        "Record should carry its cultural entries, got: {}",
        body
    );

    let resp = client
        .get(format!("{}/place/atlantis", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "not_found");
    assert!(
        body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("atlantis"),
        "got: {}",
        body
    );

    server_handle.abort();
}

/// Prove that the lookup function endpoint rejects blank queries with a
/// structured 400 and relays the gateway envelope for valid ones.
#[tokio::test]
async fn test_generate_endpoint_validates_and_relays_envelope() {
    let port = find_free_port();
    let tmp = TempDir::new().unwrap();
    let config = server_config(&tmp, port);

    let server_handle = tokio::spawn(async move {
        run_server(&config).await.ok();
    });
    wait_for_server(port).await;

    let client = reqwest::Client::new();
    let url = format!("http://127.0.0.1:{}/functions/generate-place-info", port);

    // Missing query field
    let resp = client.post(&url).json(&json!({})).send().await.unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "bad_request");

    // Whitespace-only query
    let resp = client
        .post(&url)
        .json(&json!({ "query": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // A valid query against the disabled provider: HTTP 200, failure envelope
    let resp = client
        .post(&url)
        .json(&json!({ "query": "lisbon" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Remote lookup is disabled");

    server_handle.abort();
}

/// Prove that a gateway the server cannot reach maps to HTTP 500 while
/// still carrying the failure envelope.
#[tokio::test]
async fn test_generate_endpoint_maps_unreachable_gateway_to_500() {
    let port = find_free_port();
    let tmp = TempDir::new().unwrap();

    // A live provider pointed at a port nothing listens on
    std::env::set_var("CULTUREVAULT_SERVER_TEST_KEY", "test-key");
    let config_content = format!(
        r#"
[gateway]
provider = "lovable"
base_url = "http://127.0.0.1:1/v1/chat/completions"
api_key_env = "CULTUREVAULT_SERVER_TEST_KEY"
timeout_secs = 5

[storage]
data_dir = "{}/data"

[server]
host = "127.0.0.1"
port = {}
"#,
        tmp.path().display(),
        port
    );
    let config: Config = toml::from_str(&config_content).unwrap();

    let server_handle = tokio::spawn(async move {
        run_server(&config).await.ok();
    });
    wait_for_server(port).await;

    let client = reqwest::Client::new();
    let resp = client
        .post(format!(
            "http://127.0.0.1:{}/functions/generate-place-info",
            port
        ))
        .json(&json!({ "query": "anywhere" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(
        !body["error"].as_str().unwrap_or("").is_empty(),
        "The envelope should carry the transport error, got: {}",
        body
    );

    server_handle.abort();
}

/// Prove that `cv serve` boots the same server from the CLI, honoring the
/// `--port` override over the configured port.
#[tokio::test]
async fn test_serve_command_honors_port_override() {
    let port = find_free_port();
    let tmp = TempDir::new().unwrap();

    let config_content = format!(
        r#"
[gateway]
provider = "disabled"

[storage]
data_dir = "{}/data"
"#,
        tmp.path().display()
    );
    let config_path = tmp.path().join("culturevault.toml");
    std::fs::write(&config_path, config_content).unwrap();

    let child = std::process::Command::new(cv_binary())
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .arg("serve")
        .arg("--port")
        .arg(port.to_string())
        .current_dir(tmp.path())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .unwrap();
    let _guard = ServeGuard(child);

    wait_for_server(port).await;

    let client = reqwest::Client::new();
    let base = format!("http://127.0.0.1:{}", port);

    let resp = client
        .get(format!("{}/health", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    // The child loaded the bundled catalog and serves the full API
    let resp = client
        .get(format!("{}/search?q=kyoto", base))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["suggestions"][0]["id"], "kyoto");
}

//! End-to-end tests of the `santuri-mcp` binary against a mock API.

use serde_json::{json, Value};
use std::collections::HashMap;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{ChildStdin, ChildStdout, Command};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn run_cli(api_url: &str, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_santuri-mcp"))
        .args(args)
        .env("SANTURI_API_URL", api_url)
        .env("SANTURI_STACK_ID", "cli-stack")
        .env_remove("SANTURI_API_KEY")
        .env("RUST_LOG", "warn")
        .output()
        .await
        .unwrap_or_else(|e| panic!("Failed to run santuri-mcp: {}", e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

async fn send(stdin: &mut ChildStdin, message: &Value) {
    stdin
        .write_all(format!("{}\n", message).as_bytes())
        .await
        .unwrap();
    stdin.flush().await.unwrap();
}

/// Next JSON-RPC message from the server that carries an id.
async fn next_reply(lines: &mut Lines<BufReader<ChildStdout>>) -> Value {
    loop {
        let line = tokio::time::timeout(Duration::from_secs(10), lines.next_line())
            .await
            .expect("timed out waiting for a reply")
            .unwrap()
            .expect("server closed stdout");
        let message: Value = serde_json::from_str(&line)
            .unwrap_or_else(|e| panic!("non-JSON line on stdout ({}): {}", e, line));
        if message.get("id").is_some() {
            return message;
        }
    }
}

/// Run `serve mcp`, complete the handshake (id 0), send `requests` and
/// collect every reply by id. Closing stdin must shut the server down.
async fn run_mcp_session(api_url: &str, requests: &[Value]) -> HashMap<u64, Value> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_santuri-mcp"))
        .args(["serve", "mcp"])
        .env("SANTURI_API_URL", api_url)
        .env("SANTURI_STACK_ID", "cli-stack")
        .env_remove("SANTURI_API_KEY")
        .env("RUST_LOG", "warn")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .unwrap_or_else(|e| panic!("Failed to run santuri-mcp: {}", e));

    let mut stdin = child.stdin.take().unwrap();
    let mut lines = BufReader::new(child.stdout.take().unwrap()).lines();

    send(
        &mut stdin,
        &json!({
            "jsonrpc": "2.0",
            "id": 0,
            "method": "initialize",
            "params": {
                "protocolVersion": "2025-03-26",
                "capabilities": {},
                "clientInfo": { "name": "cli-test", "version": "0.0.0" }
            }
        }),
    )
    .await;
    let mut replies = HashMap::new();
    replies.insert(0, next_reply(&mut lines).await);

    send(
        &mut stdin,
        &json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
    )
    .await;
    for request in requests {
        send(&mut stdin, request).await;
    }

    while replies.len() <= requests.len() {
        let reply = next_reply(&mut lines).await;
        let id = reply["id"].as_u64().expect("numeric reply id");
        replies.insert(id, reply);
    }

    drop(stdin);
    let status = tokio::time::timeout(Duration::from_secs(10), child.wait())
        .await
        .expect("server did not exit after stdin closed")
        .unwrap();
    assert!(status.success());

    replies
}

async fn mock_api() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/mcp/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "sourceId": "neon",
                "sourceName": "Neon",
                "sourceSlug": "neon",
                "category": "Database",
                "title": "Branching",
                "snippet": "Create a branch from any point in time.",
                "score": 0.72
            }],
            "usage": { "used": 2, "limit": 20 }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/mcp/sources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sources": [{
                "id": "neon",
                "name": "Neon",
                "slug": "neon",
                "category": "Database",
                "description": null,
                "llmsTxtUrl": "https://neon.tech/llms.txt"
            }]
        })))
        .mount(&server)
        .await;
    server
}

#[tokio::test(flavor = "multi_thread")]
async fn test_search_command() {
    let server = mock_api().await;

    let (stdout, stderr, success) =
        run_cli(&server.uri(), &["search", "branching", "--limit", "3"]).await;
    assert!(success, "search failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("# Search Results for \"branching\""));
    assert!(stdout.contains("in stack cli-stack"));
    assert!(stdout.contains("**Relevance Score:** 72%"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_search_command_rejects_bad_limit() {
    let server = mock_api().await;

    let (_stdout, stderr, success) =
        run_cli(&server.uri(), &["search", "branching", "--limit", "80"]).await;
    assert!(!success);
    assert!(stderr.contains("Error searching documentation"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sources_command() {
    let server = mock_api().await;

    let (stdout, stderr, success) = run_cli(&server.uri(), &["sources"]).await;
    assert!(success, "sources failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("## Database"));
    assert!(stdout.contains("### Neon"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_source_command() {
    let server = mock_api().await;

    let (stdout, _stderr, success) = run_cli(&server.uri(), &["source", "neon"]).await;
    assert!(success);
    assert!(stdout.contains("# Neon"));

    let (_stdout, stderr, success) = run_cli(&server.uri(), &["source", "missing"]).await;
    assert!(!success);
    assert!(stderr.contains("missing"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_serve_mcp_over_stdio() {
    let server = mock_api().await;

    let replies = run_mcp_session(
        &server.uri(),
        &[
            json!({
                "jsonrpc": "2.0", "id": 1, "method": "tools/call",
                "params": { "name": "nope", "arguments": {} }
            }),
            json!({
                "jsonrpc": "2.0", "id": 2, "method": "tools/call",
                "params": { "name": "list_sources" }
            }),
            json!({
                "jsonrpc": "2.0", "id": 3, "method": "resources/read",
                "params": { "uri": "santuri://x" }
            }),
            json!({ "jsonrpc": "2.0", "id": 4, "method": "resources/list", "params": {} }),
            json!({
                "jsonrpc": "2.0", "id": 5, "method": "resources/templates/list", "params": {}
            }),
        ],
    )
    .await;

    assert_eq!(replies[&0]["result"]["serverInfo"]["name"], "santuri");

    let unknown = &replies[&1]["result"];
    assert_eq!(unknown["isError"], true);
    assert_eq!(
        unknown["content"][0]["text"],
        "Error calling tool: Unknown tool: nope"
    );

    // No `arguments` at all is the same as `{}`.
    let listed = &replies[&2]["result"];
    assert_ne!(listed["isError"], true, "list_sources failed: {}", listed);
    let text = listed["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("## Database"));
    assert!(text.contains("### Neon"));
    let requests = server.received_requests().await.unwrap();
    assert!(requests
        .iter()
        .any(|r| r.url.path() == "/api/mcp/sources"
            && r.url.query() == Some("stackId=cli-stack")));

    let not_found = &replies[&3]["error"];
    assert_eq!(not_found["code"], -32002);
    assert_eq!(
        not_found["message"],
        "Resource not found: santuri://x. Use search_documentation to find content."
    );

    assert_eq!(replies[&4]["result"]["resources"], json!([]));
    assert_eq!(replies[&5]["result"]["resourceTemplates"], json!([]));
}

//! Polling fallback against scripted and HTTP remotes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use agentrun::agent_loop::{poll_run, PollOptions, RecordingSink, RunPoller};
use agentrun::error::{AgentRunError, Result};
use agentrun::remote::{HttpRunClient, RemoteRunClient};
use agentrun::types::{RunId, RunResult, RunStatus, ToolCallStatus};

/// Remote that never finishes.
#[derive(Default)]
struct StuckRemote {
    fetches: AtomicUsize,
}

#[async_trait]
impl RemoteRunClient for StuckRemote {
    async fn fetch_run(&self, _run_id: &RunId) -> Result<RunResult> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(RunResult::started("still going"))
    }
}

#[tokio::test(start_paused = true)]
async fn exhausted_budget_returns_last_state_without_error() {
    let remote = StuckRemote::default();
    let sink = RecordingSink::new();
    let started = tokio::time::Instant::now();

    let result = poll_run(&remote, &RunId::from("run_d"), PollOptions::default(), &sink)
        .await
        .unwrap();

    assert_eq!(result.status, RunStatus::InProgress);
    assert_eq!(remote.fetches.load(Ordering::SeqCst), 300);
    assert_eq!(sink.len(), 300);
    // No sleep after the final attempt.
    assert_eq!(started.elapsed(), Duration::from_secs(2 * 299));
}

#[tokio::test(start_paused = true)]
async fn poller_honours_custom_options() {
    let remote = Arc::new(StuckRemote::default());
    let poller = RunPoller::new(remote.clone()).with_options(
        PollOptions::builder()
            .interval(Duration::from_millis(250))
            .max_attempts(4)
            .build(),
    );

    let result = poller
        .poll(&RunId::from("run_x"), &RecordingSink::new())
        .await
        .unwrap();

    assert_eq!(result.prompt, "still going");
    assert_eq!(remote.fetches.load(Ordering::SeqCst), 4);
}

fn in_progress_body() -> serde_json::Value {
    json!({
        "status": "IN_PROGRESS",
        "prompt": "Summarise my inbox",
        "steps": [
            { "type": "text", "text": "Reading mail." },
            {
                "type": "tool-call",
                "toolCallId": "c1",
                "toolName": "gmail_list",
                "displayName": "@pieces/gmail: list_emails",
                "kind": "PIECE",
                "pieceName": "@pieces/gmail",
                "pieceVersion": "0.3.1",
                "actionName": "list_emails",
                "status": "IN_PROGRESS",
                "input": {},
                "startTime": "2026-10-16T09:00:00Z"
            }
        ]
    })
}

fn completed_body() -> serde_json::Value {
    json!({
        "status": "COMPLETED",
        "prompt": "Summarise my inbox",
        "message": "Reading mail.\nThree unread.",
        "output": { "unread": 3 },
        "steps": [
            { "type": "text", "text": "Reading mail." },
            { "type": "text", "text": "Three unread." }
        ]
    })
}

#[tokio::test]
async fn http_client_maps_run_body_and_sends_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/agent-runs/run_42"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(in_progress_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpRunClient::new(format!("{}/", server.uri())).with_api_key("sk-test");
    let result = client.fetch_run(&RunId::from("run_42")).await.unwrap();

    assert_eq!(result.status, RunStatus::InProgress);
    assert_eq!(result.prompt, "Summarise my inbox");
    assert_eq!(result.message, "");
    let call = result.tool_calls().next().unwrap();
    assert_eq!(call.status, ToolCallStatus::InProgress);
    assert_eq!(call.display_name, "@pieces/gmail: list_emails");
}

#[tokio::test]
async fn http_client_surfaces_not_found_as_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/agent-runs/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "run not found" })),
        )
        .mount(&server)
        .await;

    let err = HttpRunClient::new(server.uri())
        .fetch_run(&RunId::from("missing"))
        .await
        .unwrap_err();

    assert!(
        matches!(err, AgentRunError::Api { status: 404, ref message } if message == "run not found")
    );
}

#[tokio::test]
async fn polling_over_http_stops_at_terminal_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/agent-runs/run_7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(in_progress_body()))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/agent-runs/run_7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completed_body()))
        .mount(&server)
        .await;

    let poller = RunPoller::new(Arc::new(HttpRunClient::new(server.uri()))).with_options(
        PollOptions::builder()
            .interval(Duration::from_millis(10))
            .max_attempts(10)
            .build(),
    );
    let sink = RecordingSink::new();

    let result = poller.poll(&RunId::from("run_7"), &sink).await.unwrap();

    assert_eq!(result.status, RunStatus::Completed);
    assert_eq!(result.structured_output, Some(json!({ "unread": 3 })));
    assert_eq!(result.message, "Reading mail.\nThree unread.");
    let statuses: Vec<_> = sink.snapshots().iter().map(|s| s.status).collect();
    assert_eq!(
        statuses,
        vec![RunStatus::InProgress, RunStatus::InProgress, RunStatus::Completed]
    );
}

#[tokio::test]
async fn polling_aborts_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let sink = RecordingSink::new();
    let err = poll_run(
        &HttpRunClient::new(server.uri()),
        &RunId::from("run_9"),
        PollOptions::default(),
        &sink,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AgentRunError::Api { status: 503, .. }));
    assert!(sink.is_empty());
}

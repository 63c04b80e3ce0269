#![allow(clippy::tests_outside_test_module, reason = "integration tests live in tests/ dir")]
#![allow(clippy::unwrap_used, clippy::expect_used, reason = "integration test: panics are the assertion mechanism")]

use std::time::Duration;

use claude_proxy_core::proxy::upstream::{AnthropicClient, UpstreamError, UpstreamProvider};
use claude_proxy_types::protocol::claude::{ClaudeMessage, ClaudeRole, MessagesRequest, StreamEvent};
use claude_proxy_types::ProxyConfig;
use futures::StreamExt;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn params() -> MessagesRequest {
    MessagesRequest {
        model: "claude-3-haiku-20240307".to_string(),
        max_tokens: 64,
        messages: vec![ClaudeMessage { role: ClaudeRole::User, content: "Hi".to_string() }],
        system: Some("Be brief".to_string()),
        temperature: None,
    }
}

fn client_for(server: &MockServer, timeout_secs: u64) -> AnthropicClient {
    client_at(server.uri(), timeout_secs)
}

fn client_at(base_url: String, timeout_secs: u64) -> AnthropicClient {
    let mut config = ProxyConfig::new("proxy-key", "sk-ant-test");
    config.anthropic_base_url = base_url;
    config.request_timeout = timeout_secs;
    AnthropicClient::new(&config).expect("client builds")
}

/// Serves one connection: reads the request and writes `head` and `body`.
/// With `hold_open` the socket then stays silent, otherwise it is closed.
async fn raw_upstream(head: &'static str, body: String, hold_open: bool) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 16 * 1024];
        let _ = socket.read(&mut buf).await;
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(body.as_bytes()).await.unwrap();
        socket.flush().await.unwrap();
        if hold_open {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
    });
    format!("http://{}", addr)
}

fn sse_body(events: &[serde_json::Value]) -> String {
    events
        .iter()
        .map(|e| format!("event: {}\ndata: {}\n\n", e["type"].as_str().unwrap(), e))
        .collect()
}

#[tokio::test]
async fn test_create_message_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "sk-ant-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-3-haiku-20240307",
            "max_tokens": 64,
            "system": "Be brief",
            "messages": [{"role": "user", "content": "Hi"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "model": "claude-3-haiku-20240307",
            "content": [{"type": "text", "text": "Hello!"}],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 5, "output_tokens": 2}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client_for(&server, 5).create_message(&params()).await.expect("success");

    assert_eq!(resp.text, "Hello!");
    assert_eq!(resp.input_tokens, 5);
    assert_eq!(resp.output_tokens, 2);
}

#[tokio::test]
async fn test_non_streaming_body_has_no_stream_flag() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [], "usage": {"input_tokens": 1, "output_tokens": 0}
        })))
        .mount(&server)
        .await;

    client_for(&server, 5).create_message(&params()).await.expect("success");

    let received = server.received_requests().await.expect("recording enabled");
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert!(body.get("stream").is_none());
    assert!(body.get("temperature").is_none());
}

#[tokio::test]
async fn test_status_error_uses_api_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "type": "error",
            "error": {"type": "authentication_error", "message": "invalid x-api-key"}
        })))
        .mount(&server)
        .await;

    let err = client_for(&server, 5).create_message(&params()).await.unwrap_err();

    assert_eq!(err, UpstreamError::Status { status: 401, message: "invalid x-api-key".to_string() });
    assert_eq!(err.category(), "APIStatusError");
}

#[tokio::test]
async fn test_status_error_falls_back_to_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client_for(&server, 5).create_message(&params()).await.unwrap_err();

    assert_eq!(err, UpstreamError::Status { status: 502, message: "Bad Gateway".to_string() });
}

#[tokio::test]
async fn test_create_message_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let err = client_for(&server, 1).create_message(&params()).await.unwrap_err();

    assert_eq!(err, UpstreamError::Timeout { secs: 1 });
    assert_eq!(err.category(), "APITimeoutError");
}

#[tokio::test]
async fn test_stream_message_parses_events() {
    let server = MockServer::start().await;
    let body = sse_body(&[
        json!({"type": "message_start", "message": {"id": "msg_01"}}),
        json!({"type": "content_block_start", "index": 0, "content_block": {"type": "text", "text": ""}}),
        json!({"type": "ping"}),
        json!({"type": "content_block_delta", "index": 0, "delta": {"type": "text_delta", "text": "Hello"}}),
        json!({"type": "content_block_delta", "index": 0, "delta": {"type": "text_delta", "text": " world"}}),
        json!({"type": "content_block_stop", "index": 0}),
        json!({"type": "message_delta", "delta": {"stop_reason": "end_turn"}, "usage": {"output_tokens": 2}}),
        json!({"type": "message_stop"}),
    ]);
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_partial_json(json!({"stream": true})))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .expect(1)
        .mount(&server)
        .await;

    let stream = client_for(&server, 5).stream_message(&params()).await.expect("stream opens");
    let events: Vec<StreamEvent> =
        stream.map(|item| item.expect("event parses")).collect().await;

    let text: String = events.iter().filter_map(StreamEvent::text_delta).collect();
    assert_eq!(text, "Hello world");
    assert_eq!(events.len(), 8);
    assert_eq!(events.last(), Some(&StreamEvent::MessageStop));
}

#[tokio::test]
async fn test_stream_message_in_band_error_event() {
    let server = MockServer::start().await;
    let body = sse_body(&[
        json!({"type": "message_start", "message": {}}),
        json!({"type": "error", "error": {"type": "overloaded_error", "message": "Overloaded"}}),
    ]);
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let stream = client_for(&server, 5).stream_message(&params()).await.expect("stream opens");
    let events: Vec<_> = stream.collect().await;

    match events.last() {
        Some(Ok(StreamEvent::Error { error })) => {
            assert_eq!(error.error_type, "overloaded_error");
            assert_eq!(error.message, "Overloaded");
        },
        other => panic!("expected error event, got {:?}", other),
    }
}

#[tokio::test]
async fn test_stream_message_malformed_payload_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("data: {not json\n\n", "text/event-stream"),
        )
        .mount(&server)
        .await;

    let stream = client_for(&server, 5).stream_message(&params()).await.expect("stream opens");
    let events: Vec<_> = stream.collect().await;

    assert_eq!(events.len(), 1);
    let err = events[0].as_ref().unwrap_err();
    assert_eq!(err.category(), "APIResponseValidationError");
}

#[tokio::test]
async fn test_stream_message_open_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(529).set_body_json(json!({
            "type": "error",
            "error": {"type": "overloaded_error", "message": "Overloaded"}
        })))
        .mount(&server)
        .await;

    let result = client_for(&server, 5).stream_message(&params()).await;

    match result {
        Err(UpstreamError::Status { status, message }) => {
            assert_eq!(status, 529);
            assert_eq!(message, "Overloaded");
        },
        Err(other) => panic!("expected status error, got {:?}", other),
        Ok(_) => panic!("expected status error, got an open stream"),
    }
}

#[tokio::test]
async fn test_stream_message_idle_gap_times_out() {
    let event = "event: content_block_delta\n\
                 data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"Hi\"}}\n\n";
    let base_url = raw_upstream(
        "HTTP/1.1 200 OK\r\ncontent-type: text/event-stream\r\ntransfer-encoding: chunked\r\n\r\n",
        format!("{:x}\r\n{}\r\n", event.len(), event),
        true,
    )
    .await;

    let mut stream = client_at(base_url, 1).stream_message(&params()).await.expect("stream opens");

    let first = stream.next().await.expect("first event").expect("event parses");
    assert_eq!(first.text_delta(), Some("Hi"));

    let next = tokio::time::timeout(Duration::from_secs(10), stream.next())
        .await
        .expect("a stalled stream must surface an error");
    let err = next.expect("stream yields the error").unwrap_err();
    assert_eq!(err, UpstreamError::Timeout { secs: 1 });
    assert_eq!(err.category(), "APITimeoutError");
}

#[tokio::test]
async fn test_status_error_with_unreadable_body_keeps_the_read_failure() {
    let base_url = raw_upstream(
        "HTTP/1.1 500 Internal Server Error\r\ncontent-type: text/plain\r\ncontent-length: 64\r\n\r\n",
        "trunc".to_string(),
        false,
    )
    .await;

    let err = client_at(base_url, 5).create_message(&params()).await.unwrap_err();

    match err {
        UpstreamError::Status { status, message } => {
            assert_eq!(status, 500);
            assert!(message.starts_with("failed to read error body"), "got: {}", message);
        },
        other => panic!("expected status error, got {:?}", other),
    }
}

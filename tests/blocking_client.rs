mod common;

use std::time::{Duration, Instant};

use aurelio_sdk::{
    ApiError, BlockingClient, ChunkRequest, ChunkingOptions, ClientConfig, ExtractOptions,
    TaskStatus, UploadSource, WaitBudget,
};
use common::{API_KEY, chunk_body, embedding_body, extract_body};
use httpmock::{Method::GET, Method::POST, MockServer};

fn client(server: &MockServer) -> BlockingClient {
    BlockingClient::new(ClientConfig::new(API_KEY).with_base_url(server.base_url()))
        .expect("client builds")
}

#[test]
fn chunk_with_semantic_options() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chunk")
            .header("Authorization", "Bearer sk-test")
            .json_body_partial(
                r#"{ "processing_options": { "chunker_type": "semantic", "window_size": 5 } }"#,
            );
        then.status(200).json_body(chunk_body(4));
    });

    let response = client(&server)
        .chunk(ChunkRequest::new("some text").with_options(ChunkingOptions::semantic(5, 300)))
        .expect("chunk succeeds");

    mock.assert();
    assert_eq!(response.document.num_chunks, 4);
}

#[test]
fn server_errors_are_retried_up_to_budget() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/chunk");
        then.status(502).body("bad gateway");
    });

    let error = client(&server)
        .chunk(ChunkRequest::new("text").with_retries(5))
        .expect_err("server error");

    mock.assert_hits(5);
    assert!(matches!(error, ApiError::ServerError { status: 502, .. }));
}

#[test]
fn client_errors_fail_fast() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/embeddings");
        then.status(422).body(r#"{"detail":"input is required"}"#);
    });

    let error = client(&server).embedding("x").expect_err("client error");

    mock.assert_hits(1);
    match error {
        ApiError::ClientError { status, body, .. } => {
            assert_eq!(status, 422);
            assert!(body.contains("input is required"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn immediate_wait_skips_status_checks() {
    let server = MockServer::start();
    let submit = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/extract/file")
            .body_contains("name=\"wait\"\r\n\r\n0");
        then.status(200).json_body(extract_body("pending"));
    });
    let status = server.mock(|when, then| {
        when.method(GET).path("/v1/extract/document/doc_1");
        then.status(200).json_body(extract_body("completed"));
    });

    let response = client(&server)
        .extract_file(
            UploadSource::named_bytes("scan.pdf", b"bytes".to_vec()),
            ExtractOptions::default().with_wait(WaitBudget::Immediate),
        )
        .expect("submission");

    submit.assert();
    status.assert_hits(0);
    assert_eq!(response.status, TaskStatus::Pending);
}

#[test]
fn streams_path_uploads_through_the_blocking_reader() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("clip.mp4");
    std::fs::write(&path, "not really a video").expect("write upload");

    let server = MockServer::start();
    let submit = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/extract/file")
            .body_contains("filename=\"clip.mp4\"")
            .body_contains("Content-Type: video/mp4")
            .body_contains("not really a video");
        then.status(200).json_body(extract_body("completed"));
    });

    let response = client(&server)
        .extract_file(UploadSource::path(&path), ExtractOptions::default())
        .expect("extraction");

    submit.assert();
    assert_eq!(response.status, TaskStatus::Completed);
}

#[test]
fn polling_stops_at_deadline() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/extract/url");
        then.status(200).json_body(extract_body("pending"));
    });
    let status = server.mock(|when, then| {
        when.method(GET).path("/v1/extract/document/doc_1");
        then.status(200).json_body(extract_body("pending"));
    });

    let started = Instant::now();
    let response = client(&server)
        .extract_url(
            "https://example.com/report.pdf",
            ExtractOptions::default()
                .with_wait(WaitBudget::from_secs(1))
                .with_polling_interval(Duration::from_millis(200)),
        )
        .expect("deadline is not an error");

    assert_eq!(response.status, TaskStatus::Pending);
    assert!(started.elapsed() >= Duration::from_secs(1));
    assert!(status.hits() >= 2);
}

#[test]
fn wait_for_returns_failed_documents() {
    let server = MockServer::start();
    let status = server.mock(|when, then| {
        when.method(GET).path("/v1/extract/document/doc_1");
        then.status(200).json_body(extract_body("failed"));
    });

    let response = client(&server)
        .wait_for("doc_1", WaitBudget::from_secs(30), Duration::from_millis(10))
        .expect("failed is terminal");

    status.assert_hits(1);
    assert_eq!(response.status, TaskStatus::Failed);
}

#[test]
fn embedding_round_trip() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/embeddings")
            .json_body_partial(r#"{ "input": "hello world", "model": "bm25" }"#);
        then.status(200).json_body(embedding_body());
    });

    let response = client(&server).embedding("hello world").expect("embedding");

    mock.assert();
    assert_eq!(response.usage.total_tokens, 4);
    assert_eq!(response.data.len(), 1);
}

#[test]
fn blank_document_id_is_rejected() {
    let server = MockServer::start();
    let error = client(&server)
        .get_document("", Default::default())
        .expect_err("validation");
    assert!(error.is_validation());
}

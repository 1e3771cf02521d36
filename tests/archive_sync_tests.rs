//! Archive Sync Tests
//!
//! Read and write archives against a mock HTTP endpoint.

use manuscript::archive::{Archive, ArchiveResource, ArchiveStore, HttpStorageClient, ARCHIVE_PART};
use manuscript::config::StorageConfig;
use manuscript::editing::FieldEditCommands;
use manuscript::error::{ArchiveIoCause, ManuscriptError};
use manuscript::figure::{FigureModel, MetadataField, Panel};
use manuscript::session::{DocumentSession, SyncState};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0xff];

/// One decoded multipart section: its header block and its content
struct FormPart {
    headers: String,
    content: Vec<u8>,
}

impl FormPart {
    fn is_named(&self, name: &str) -> bool {
        self.headers.contains(&format!("name=\"{}\"", name))
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Split a multipart/form-data request body into its parts
fn form_parts(request: &Request) -> Vec<FormPart> {
    let content_type = request
        .headers
        .get("content-type")
        .expect("content-type header")
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data"));
    let boundary = content_type
        .split("boundary=")
        .nth(1)
        .expect("multipart boundary")
        .trim_matches('"');
    let delimiter = format!("--{}", boundary).into_bytes();

    let mut parts = Vec::new();
    let mut rest: &[u8] = &request.body;
    while let Some(start) = find(rest, &delimiter) {
        rest = &rest[start + delimiter.len()..];
        if rest.starts_with(b"--") {
            break;
        }
        let end = find(rest, &delimiter).unwrap_or(rest.len());
        let section = &rest[..end];
        let section = section.strip_prefix(b"\r\n").unwrap_or(section);
        let section = section.strip_suffix(b"\r\n").unwrap_or(section);

        let split = find(section, b"\r\n\r\n").expect("part header terminator");
        parts.push(FormPart {
            headers: String::from_utf8_lossy(&section[..split]).into_owned(),
            content: section[split + 4..].to_vec(),
        });
    }
    parts
}

fn client_for(server: &MockServer) -> HttpStorageClient {
    let config = StorageConfig::new(format!("{}/archives", server.uri()))
        .with_header("Authorization", "Bearer test-token");
    HttpStorageClient::new(config).unwrap()
}

fn blob_archive() -> Archive {
    let mut archive = Archive::new();
    archive.set_body(json!({"panels": []}));
    archive.insert_resource("img.png", ArchiveResource::blob("r1", PNG_BYTES.to_vec()));
    archive.insert_resource(
        "manifest.json",
        ArchiveResource::json("m1", json!({"title": "Figure 1"})),
    );
    archive
}

// === Read ===

#[tokio::test]
async fn test_read_returns_parsed_archive() {
    let server = MockServer::start().await;
    let raw = json!({
        "id": "doc-1",
        "resources": {"img.png": {"id": "r1", "encoding": "blob"}},
        "body": {"panels": []}
    });
    Mock::given(method("GET"))
        .and(path("/archives/doc-1"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(raw.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let read = client_for(&server).read(Some("doc-1")).await.unwrap();

    assert_eq!(read, raw);
}

#[tokio::test]
async fn test_read_without_id_targets_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/archives"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"resources": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let read = client_for(&server).read(None).await.unwrap();

    assert_eq!(read, json!({"resources": {}}));
}

#[tokio::test]
async fn test_read_malformed_json_is_archive_io() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/archives/doc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"resources\": {"))
        .mount(&server)
        .await;

    let err = client_for(&server).read(Some("doc-1")).await.unwrap_err();

    match err {
        ManuscriptError::ArchiveIo { source, url, .. } => {
            assert!(matches!(source, ArchiveIoCause::MalformedJson(_)));
            assert!(url.ends_with("/archives/doc-1"));
        }
        other => panic!("expected ArchiveIo, got {other:?}"),
    }
}

#[tokio::test]
async fn test_read_server_error_is_retryable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .mount(&server)
        .await;

    let err = client_for(&server).read(Some("doc-1")).await.unwrap_err();

    assert!(err.is_retryable());
    assert!(matches!(
        err,
        ManuscriptError::ArchiveIo {
            source: ArchiveIoCause::Status { status: 503, .. },
            ..
        }
    ));
}

// === Write ===

#[tokio::test]
async fn test_write_splits_blobs_from_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/archives/doc-1"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&server)
        .await;

    let ack = client_for(&server)
        .write(Some("doc-1"), blob_archive())
        .await
        .unwrap();
    assert_eq!(ack.status, 200);
    assert_eq!(ack.body, "OK");

    let requests = server.received_requests().await.unwrap();
    let parts = form_parts(&requests[0]);
    assert_eq!(parts.len(), 2);

    let blob = parts.iter().find(|p| p.is_named("r1")).expect("blob part");
    assert!(blob.headers.contains("filename=\"img.png\""));
    assert_eq!(blob.content, PNG_BYTES);

    let envelope_part = parts
        .iter()
        .find(|p| p.is_named(ARCHIVE_PART))
        .expect("archive part");
    let envelope: Value = serde_json::from_slice(&envelope_part.content).unwrap();
    assert_eq!(
        envelope["resources"]["img.png"],
        json!({"id": "r1", "encoding": "blob"})
    );
    assert_eq!(
        envelope["resources"]["manifest.json"]["data"],
        json!({"title": "Figure 1"})
    );
    assert_eq!(find(&envelope_part.content, PNG_BYTES), None);
}

#[tokio::test]
async fn test_write_without_id_creates() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/archives"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "doc-42"})))
        .expect(1)
        .mount(&server)
        .await;

    let ack = client_for(&server).write(None, Archive::new()).await.unwrap();

    assert_eq!(ack.status, 201);
    assert_eq!(ack.archive_id(), Some("doc-42".to_string()));
}

#[tokio::test]
async fn test_write_rejected_is_archive_io() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad archive"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .write(Some("doc-1"), blob_archive())
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "ARCHIVE_IO");
    assert!(!err.is_retryable());
}

// === Session over HTTP ===

#[tokio::test]
async fn test_session_save_and_reopen() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/archives"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "doc-7"})))
        .expect(1)
        .mount(&server)
        .await;

    let figure = FigureModel::new(vec![Panel::with_fields(vec![MetadataField::new(
        "Field I",
        vec!["Value A", "Value B"],
    )])]);
    let mut session = DocumentSession::new(client_for(&server), figure);
    session
        .edit(|figure, selection| FieldEditCommands::add_metadata_field(figure, selection))
        .unwrap();
    session
        .insert_resource("img.png", ArchiveResource::blob("r1", PNG_BYTES.to_vec()))
        .unwrap();

    session.save().await.unwrap();
    assert_eq!(session.state(), SyncState::Synced);
    assert_eq!(session.archive_id(), Some("doc-7"));

    // Serve back what was sent, as the store would
    let requests = server.received_requests().await.unwrap();
    let parts = form_parts(&requests[0]);
    let envelope_part = parts.iter().find(|p| p.is_named(ARCHIVE_PART)).unwrap();
    let mut stored: Value = serde_json::from_slice(&envelope_part.content).unwrap();
    stored["id"] = json!("doc-7");

    Mock::given(method("GET"))
        .and(path("/archives/doc-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored))
        .mount(&server)
        .await;

    let reopened = DocumentSession::open(client_for(&server), "doc-7").await.unwrap();
    assert_eq!(reopened.figure().panel(0).unwrap().len(), 2);
    assert_eq!(reopened.resources()["img.png"].id(), "r1");
}

#[tokio::test]
async fn test_failed_save_leaves_document_unsynced() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut session = DocumentSession::new(client_for(&server), FigureModel::default());
    let err = session.save().await.unwrap_err();

    assert_eq!(err.error_code(), "ARCHIVE_IO");
    assert_eq!(session.state(), SyncState::Unsynced);
    assert_eq!(session.archive_id(), None);
}

#[tokio::test]
async fn test_create_without_reported_id_keeps_creating() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/archives"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(2)
        .mount(&server)
        .await;

    let mut session = DocumentSession::new(client_for(&server), FigureModel::default());
    session.save().await.unwrap();
    assert_eq!(session.state(), SyncState::Synced);
    assert_eq!(session.archive_id(), None);

    session.save().await.unwrap();
    assert_eq!(session.archive_id(), None);
}

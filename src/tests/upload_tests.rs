//! End-to-end upload tests through the mock transport.

use super::mock_client;
use crate::errors::{BotError, FileError, RequestError};
use crate::fixtures::{self, responses};
use crate::mocks::MockHttpTransport;
use crate::types::{InputFile, InputMedia, Params};
use bytes::Bytes;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::time::Duration;

async fn temp_file(name: &str, content: &[u8]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tg-upload-{}", uuid::Uuid::new_v4()));
    tokio::fs::create_dir_all(&dir).await.unwrap();
    let path = dir.join(name);
    tokio::fs::write(&path, content).await.unwrap();
    path
}

#[tokio::test]
async fn test_photo_upload_from_path() {
    let path = temp_file("a.jpg", b"jpeg-data").await;
    let (mut client, transport) =
        mock_client(MockHttpTransport::new().add_json_response(&responses::photo_message()));

    client
        .upload_file(
            "sendPhoto",
            Params::new().with("chat_id", 1).with("photo", InputFile::path(&path)),
            "photo",
        )
        .await
        .unwrap();

    let request = transport.last_request().unwrap();
    assert_eq!(request.url, "sendPhoto");
    assert_eq!(request.method, "POST");
    assert!(request.is_multipart);
    assert_eq!(request.part_names(), vec!["chat_id", "photo"]);
    assert_eq!(request.field("chat_id"), Some("1"));
    assert_eq!(request.files[0].file_name, "a.jpg");
    assert_eq!(request.files[0].mime_type, "image/jpeg");
    assert_eq!(request.files[0].content, Bytes::from_static(b"jpeg-data"));

    if let Some(dir) = path.parent() {
        tokio::fs::remove_dir_all(dir).await.unwrap();
    }
}

#[tokio::test]
async fn test_missing_upload_field_sends_nothing() {
    let (mut client, transport) = mock_client(MockHttpTransport::new());

    let result = client
        .upload_file("sendPhoto", Params::new().with("chat_id", 1), "photo")
        .await;

    match result {
        Err(BotError::Request(RequestError::MissingUploadParam { field })) => {
            assert_eq!(field, "photo")
        }
        other => panic!("expected missing upload param, got {:?}", other),
    }
    assert_eq!(transport.request_count(), 0);
    assert!(client.last_response().is_none());
}

#[tokio::test]
async fn test_media_group_upload() {
    let file = InputFile::bytes(b"x-bytes".to_vec(), "x.jpg");
    let token = file.attach_name().to_string();
    let (mut client, transport) =
        mock_client(MockHttpTransport::new().add_json_response(&responses::media_group(2)));

    client
        .upload_file(
            "sendMediaGroup",
            Params::new().with(
                "media",
                vec![
                    InputMedia::photo(file),
                    InputMedia::photo("AgADBQADqacxG3ZBvVC1iuc3ej"),
                ],
            ),
            "media",
        )
        .await
        .unwrap();

    let request = transport.last_request().unwrap();
    assert_eq!(request.part_names(), vec!["media", token.as_str()]);

    let media: Value = serde_json::from_str(request.field("media").unwrap()).unwrap();
    assert_eq!(
        media,
        json!([
            {"type": "photo", "media": format!("attach://{}", token)},
            {"type": "photo", "media": "AgADBQADqacxG3ZBvVC1iuc3ej"}
        ])
    );
    assert_eq!(request.files[0].file_name, "x.jpg");
    assert_eq!(request.files[0].content, Bytes::from_static(b"x-bytes"));
}

#[tokio::test]
async fn test_invalid_entity_sends_nothing() {
    let (mut client, transport) = mock_client(MockHttpTransport::new());

    let result = client
        .upload_file(
            "sendPhoto",
            Params::new().with("photo", "not-a-file-and-not-an-id-object"),
            "photo",
        )
        .await;

    match result {
        Err(err @ BotError::Request(RequestError::InvalidInputFileEntity { .. })) => {
            assert!(err.is_validation_error());
            assert_eq!(err.to_string(), "Request error: Invalid input file entity: photo");
        }
        other => panic!("expected invalid entity, got {:?}", other),
    }
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_unreadable_source_sends_nothing() {
    let (mut client, transport) = mock_client(MockHttpTransport::new());

    let result = client
        .upload_file(
            "sendDocument",
            Params::new()
                .with("chat_id", 1)
                .with("document", InputFile::path("/definitely/not/here.pdf")),
            "document",
        )
        .await;

    assert!(matches!(
        result,
        Err(BotError::File(FileError::UnreadableSource { .. }))
    ));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_known_identifier_stays_multipart() {
    let (mut client, transport) =
        mock_client(MockHttpTransport::new().add_json_response(&responses::photo_message()));

    client
        .upload_file(
            "sendPhoto",
            Params::new()
                .with("chat_id", 1)
                .with("photo", fixtures::PHOTO_FILE_ID),
            "photo",
        )
        .await
        .unwrap();

    let request = transport.last_request().unwrap();
    assert!(request.is_multipart);
    assert!(request.files.is_empty());
    assert_eq!(request.field("photo"), Some(fixtures::PHOTO_FILE_ID));
}

#[tokio::test]
async fn test_remote_url_is_fetched_and_uploaded() {
    let url = url::Url::parse("https://example.com/docs/report.pdf").unwrap();
    let (mut client, transport) = mock_client(MockHttpTransport::new().add_responses([
        crate::mocks::MockResponse::ok("%PDF-1.4"),
        crate::mocks::MockResponse::json(&responses::message("")),
    ]));

    client
        .upload_file(
            "sendDocument",
            Params::new().with("chat_id", 1).with("document", InputFile::url(url)),
            "document",
        )
        .await
        .unwrap();

    let requests = transport.recorded_requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].url, "https://example.com/docs/report.pdf");
    assert_eq!(requests[1].files[0].file_name, "report.pdf");
    assert_eq!(requests[1].files[0].mime_type, "application/pdf");
}

#[tokio::test]
async fn test_remote_fetch_uses_client_timeouts() {
    let url = url::Url::parse("https://example.com/docs/report.pdf").unwrap();
    let (mut client, transport) = mock_client(MockHttpTransport::new().add_responses([
        crate::mocks::MockResponse::ok("%PDF-1.4"),
        crate::mocks::MockResponse::json(&responses::message("")),
    ]));
    client.set_timeout(Duration::from_millis(750));
    client.set_connect_timeout(Duration::from_millis(250));

    client
        .upload_file(
            "sendDocument",
            Params::new().with("chat_id", 1).with("document", InputFile::url(url)),
            "document",
        )
        .await
        .unwrap();

    let fetch = &transport.recorded_requests()[0];
    assert_eq!(fetch.timeout, Some(Duration::from_millis(750)));
    assert_eq!(fetch.connect_timeout, Some(Duration::from_millis(250)));
}

#[tokio::test]
async fn test_post_with_upload_flag_skips_field_validation() {
    let (mut client, transport) =
        mock_client(MockHttpTransport::new().add_json_response(&responses::message("")));

    client
        .post(
            "sendDocument",
            Params::new()
                .with("chat_id", 1)
                .with("document", InputFile::bytes(b"abc".to_vec(), "abc.txt")),
            true,
        )
        .await
        .unwrap();

    let request = transport.last_request().unwrap();
    assert!(request.is_multipart);
    assert_eq!(request.part_names(), vec!["chat_id", "document"]);
}

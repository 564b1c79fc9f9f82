//! Convenience method tests.

use super::mock_client;
use crate::fixtures::{self, responses};
use crate::mocks::MockHttpTransport;
use crate::types::{InlineKeyboardButton, InputFile, InputMedia, ReplyMarkup};
use serde_json::Value;

#[tokio::test]
async fn test_get_me() {
    let (mut client, transport) =
        mock_client(MockHttpTransport::new().add_json_response(&responses::get_me()));

    let me = client.get_me().await.unwrap();

    assert_eq!(me.id, 123456);
    assert!(me.is_bot);
    assert_eq!(me.username.as_deref(), Some("fixture_bot"));
    assert_eq!(transport.last_request().unwrap().method, "GET");
}

#[tokio::test]
async fn test_get_file() {
    let (mut client, _transport) = mock_client(
        MockHttpTransport::new().add_json_response(&responses::get_file("documents/file_1.pdf")),
    );

    let file = client.get_file(fixtures::DOCUMENT_FILE_ID).await.unwrap();
    assert_eq!(file.file_id, fixtures::DOCUMENT_FILE_ID);
    assert_eq!(file.file_path.as_deref(), Some("documents/file_1.pdf"));
}

#[tokio::test]
async fn test_send_message_with_keyboard() {
    let (mut client, transport) =
        mock_client(MockHttpTransport::new().add_json_response(&responses::message("Pick")));
    let markup = ReplyMarkup::inline(vec![vec![InlineKeyboardButton::callback("A", "a")]]);

    let message = client
        .send_message(1001, "Pick", Some(markup.clone()))
        .await
        .unwrap();
    assert_eq!(message.text.as_deref(), Some("Pick"));

    let request = transport.last_request().unwrap();
    assert_eq!(request.url, "sendMessage");
    assert_eq!(request.field("reply_markup"), Some(markup.to_string().as_str()));
}

#[tokio::test]
async fn test_send_message_without_keyboard() {
    let (mut client, transport) =
        mock_client(MockHttpTransport::new().add_json_response(&responses::message("Hi")));

    client.send_message("@channel", "Hi", None).await.unwrap();

    let request = transport.last_request().unwrap();
    assert_eq!(request.field("chat_id"), Some("@channel"));
    assert_eq!(request.field("reply_markup"), None);
}

#[tokio::test]
async fn test_send_photo() {
    let (mut client, transport) =
        mock_client(MockHttpTransport::new().add_json_response(&responses::photo_message()));

    let message = client
        .send_photo(1001, InputFile::bytes(b"img".to_vec(), "cat.png"), Some("cat"))
        .await
        .unwrap();
    assert_eq!(message.photo[0].file_id, fixtures::PHOTO_FILE_ID);

    let request = transport.last_request().unwrap();
    assert_eq!(request.part_names(), vec!["chat_id", "caption", "photo"]);
    assert_eq!(request.files[0].mime_type, "image/png");
}

#[tokio::test]
async fn test_send_document_by_id() {
    let (mut client, transport) =
        mock_client(MockHttpTransport::new().add_json_response(&responses::message("")));

    client
        .send_document(1001, InputFile::file_id(fixtures::DOCUMENT_FILE_ID), None)
        .await
        .unwrap();

    let request = transport.last_request().unwrap();
    assert!(request.files.is_empty());
    assert_eq!(request.field("document"), Some(fixtures::DOCUMENT_FILE_ID));
}

#[tokio::test]
async fn test_send_media_group() {
    let first = InputFile::bytes(b"1".to_vec(), "1.jpg");
    let second = InputFile::bytes(b"2".to_vec(), "2.jpg");
    let names = vec![first.attach_name().to_string(), second.attach_name().to_string()];
    let (mut client, transport) =
        mock_client(MockHttpTransport::new().add_json_response(&responses::media_group(2)));

    let messages = client
        .send_media_group(
            1001,
            vec![InputMedia::photo(first).caption("one"), InputMedia::photo(second)],
        )
        .await
        .unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].media_group_id.as_deref(), Some("13579"));

    let request = transport.last_request().unwrap();
    assert_eq!(
        request.part_names(),
        vec!["chat_id", "media", names[0].as_str(), names[1].as_str()]
    );
    let media: Value = serde_json::from_str(request.field("media").unwrap()).unwrap();
    assert_eq!(media[0]["caption"], "one");
    assert_eq!(media[1]["media"], format!("attach://{}", names[1]));
}

//! Typed wrappers over common Bot API methods.

use super::BotClient;
use crate::errors::BotResult;
use crate::request::MEDIA_GROUP_FIELD;
use crate::types::{File, InputFile, InputMedia, Message, ParamValue, Params, ReplyMarkup, User};

impl BotClient {
    /// Basic information about the bot
    pub async fn get_me(&mut self) -> BotResult<User> {
        self.get("getMe", Params::new()).await?.decode()
    }

    /// Basic information about a stored file, including its download path
    pub async fn get_file(&mut self, file_id: &str) -> BotResult<File> {
        self.get("getFile", Params::new().with("file_id", file_id))
            .await?
            .decode()
    }

    /// Send a text message
    pub async fn send_message(
        &mut self,
        chat_id: impl Into<ParamValue>,
        text: &str,
        reply_markup: Option<ReplyMarkup>,
    ) -> BotResult<Message> {
        let params = Params::new()
            .with("chat_id", chat_id)
            .with("text", text)
            .with("reply_markup", reply_markup);

        self.post("sendMessage", params, false).await?.decode()
    }

    /// Send a photo
    pub async fn send_photo(
        &mut self,
        chat_id: impl Into<ParamValue>,
        photo: InputFile,
        caption: Option<&str>,
    ) -> BotResult<Message> {
        let params = Params::new()
            .with("chat_id", chat_id)
            .with("photo", photo)
            .with("caption", caption);

        self.upload_file("sendPhoto", params, "photo").await?.decode()
    }

    /// Send a general file
    pub async fn send_document(
        &mut self,
        chat_id: impl Into<ParamValue>,
        document: InputFile,
        caption: Option<&str>,
    ) -> BotResult<Message> {
        let params = Params::new()
            .with("chat_id", chat_id)
            .with("document", document)
            .with("caption", caption);

        self.upload_file("sendDocument", params, "document")
            .await?
            .decode()
    }

    /// Send a group of photos, videos, documents, or audios as an album
    pub async fn send_media_group(
        &mut self,
        chat_id: impl Into<ParamValue>,
        media: Vec<InputMedia>,
    ) -> BotResult<Vec<Message>> {
        let params = Params::new()
            .with("chat_id", chat_id)
            .with(MEDIA_GROUP_FIELD, media);

        self.upload_file("sendMediaGroup", params, MEDIA_GROUP_FIELD)
            .await?
            .decode()
    }
}

//! File references for uploads.

use crate::errors::{BotResult, FileError};
use crate::transport::{FileUpload, HttpTransport, RawRequest, Timeouts};
use bytes::Bytes;
use std::path::{Path, PathBuf};
use url::Url;

/// Prefix of symbolic references to sibling multipart parts
pub const ATTACH_PREFIX: &str = "attach://";

/// Where the bytes of an [`InputFile`] come from
#[derive(Debug, Clone, PartialEq)]
pub enum FileSource {
    /// A file on the local filesystem
    Path(PathBuf),
    /// An in-memory buffer
    Bytes(Bytes),
    /// A remote URL fetched at send time
    Url(Url),
    /// A file already stored by the platform
    FileId(String),
}

/// A file to send with a request.
///
/// Content is read lazily, once per send, by [`InputFile::into_upload`].
/// Each value carries an attach name generated at construction; clones share
/// it, so a cloned reference still resolves to a single multipart part.
#[derive(Debug, Clone, PartialEq)]
pub struct InputFile {
    source: FileSource,
    filename: Option<String>,
    mime_type: Option<mime::Mime>,
    attach_name: String,
}

impl InputFile {
    fn from_source(source: FileSource) -> Self {
        Self {
            source,
            filename: None,
            mime_type: None,
            attach_name: uuid::Uuid::new_v4().simple().to_string(),
        }
    }

    /// Reference a local file
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::from_source(FileSource::Path(path.into()))
    }

    /// Reference an in-memory buffer
    pub fn bytes(content: impl Into<Bytes>, filename: impl Into<String>) -> Self {
        Self::from_source(FileSource::Bytes(content.into())).with_filename(filename)
    }

    /// Reference a remote URL
    pub fn url(url: Url) -> Self {
        Self::from_source(FileSource::Url(url))
    }

    /// Reference a file the platform already stores
    pub fn file_id(id: impl Into<String>) -> Self {
        Self::from_source(FileSource::FileId(id.into()))
    }

    /// Set the display filename
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Set the MIME type hint
    pub fn with_mime_type(mut self, mime_type: mime::Mime) -> Self {
        self.mime_type = Some(mime_type);
        self
    }

    /// Get the byte source
    pub fn source(&self) -> &FileSource {
        &self.source
    }

    /// Whether this reference needs its bytes uploaded
    pub fn is_upload(&self) -> bool {
        !matches!(self.source, FileSource::FileId(_))
    }

    /// The platform file id, if this reference is one
    pub fn as_file_id(&self) -> Option<&str> {
        match &self.source {
            FileSource::FileId(id) => Some(id),
            _ => None,
        }
    }

    /// Name of the multipart part this file is attached under
    pub fn attach_name(&self) -> &str {
        &self.attach_name
    }

    /// Symbolic `attach://<name>` reference for use inside JSON fields
    pub fn attach_string(&self) -> String {
        format!("{}{}", ATTACH_PREFIX, self.attach_name)
    }

    /// The filename sent with the multipart part
    pub fn filename(&self) -> String {
        if let Some(name) = &self.filename {
            return name.clone();
        }

        let derived = match &self.source {
            FileSource::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned()),
            FileSource::Url(url) => url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .filter(|segment| !segment.is_empty())
                .map(String::from),
            FileSource::Bytes(_) | FileSource::FileId(_) => None,
        };

        derived.unwrap_or_else(|| self.attach_name.clone())
    }

    /// Plain-field rendering, used when the file travels without a multipart body
    pub(crate) fn form_value(&self) -> Option<String> {
        match &self.source {
            FileSource::FileId(id) => Some(id.clone()),
            FileSource::Url(url) => Some(url.to_string()),
            FileSource::Path(_) | FileSource::Bytes(_) => None,
        }
    }

    fn source_name(&self) -> String {
        match &self.source {
            FileSource::Path(path) => path.display().to_string(),
            FileSource::Url(url) => url.to_string(),
            FileSource::Bytes(_) => self.attach_string(),
            FileSource::FileId(id) => id.clone(),
        }
    }

    /// Read the content and produce the part handed to the transport.
    ///
    /// URL sources are fetched through `transport` under `timeouts`.
    pub async fn into_upload(
        self,
        field_name: impl Into<String>,
        transport: &dyn HttpTransport,
        timeouts: Timeouts,
    ) -> BotResult<FileUpload> {
        let filename = self.filename();
        let source_name = self.source_name();
        let unreadable = |message: String| FileError::UnreadableSource {
            source_name: source_name.clone(),
            message,
        };

        let content = match self.source {
            FileSource::Bytes(content) => content,
            FileSource::Path(path) => read_path(&path).await.map_err(|e| unreadable(e.to_string()))?,
            FileSource::Url(url) => transport
                .send_raw(RawRequest::get(url.as_str()).with_timeouts(timeouts))
                .await
                .map_err(|e| unreadable(e.to_string()))?,
            FileSource::FileId(_) => {
                return Err(unreadable("file ids carry no content to upload".to_string()).into())
            }
        };

        let upload = FileUpload::new(field_name, filename, content);
        Ok(match self.mime_type {
            Some(mime_type) => upload.with_mime_type(mime_type.to_string()),
            None => upload,
        })
    }
}

async fn read_path(path: &Path) -> std::io::Result<Bytes> {
    tokio::fs::read(path).await.map(Bytes::from)
}

impl From<PathBuf> for InputFile {
    fn from(path: PathBuf) -> Self {
        Self::path(path)
    }
}

impl From<&Path> for InputFile {
    fn from(path: &Path) -> Self {
        Self::path(path)
    }
}

impl From<Url> for InputFile {
    fn from(url: Url) -> Self {
        Self::url(url)
    }
}

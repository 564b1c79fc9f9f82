//! Request body construction.
//!
//! Call parameters become either URL-encoded fields or a list of multipart
//! parts. File contents are not touched here; they are read when the body
//! is turned into a [`TransportBody`] right before sending.

pub mod multipart;
pub mod normalizer;

pub use multipart::{build_multipart, validate_upload, FileEntity, UploadPlan, MEDIA_GROUP_FIELD};
pub use normalizer::normalize;

use crate::errors::BotResult;
use crate::transport::{HttpTransport, MultipartRequest, Timeouts, TransportBody};
use crate::types::InputFile;
use futures::future::try_join_all;

/// One named segment of a multipart body
#[derive(Debug, Clone, PartialEq)]
pub enum MultipartPart {
    /// Text or JSON content
    Text {
        /// Part name
        name: String,
        /// Part contents
        value: String,
    },
    /// File content, read at send time
    File {
        /// Part name
        name: String,
        /// File reference
        file: InputFile,
    },
}

impl MultipartPart {
    /// The part name
    pub fn name(&self) -> &str {
        match self {
            Self::Text { name, .. } | Self::File { name, .. } => name,
        }
    }

    /// Text contents, if this is a text part
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text { value, .. } => Some(value),
            Self::File { .. } => None,
        }
    }

    /// File reference, if this is a file part
    pub fn file(&self) -> Option<&InputFile> {
        match self {
            Self::File { file, .. } => Some(file),
            Self::Text { .. } => None,
        }
    }
}

/// Normalized request body
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// URL-encoded fields
    Form(Vec<(String, String)>),
    /// Multipart parts, text parts first
    Multipart(Vec<MultipartPart>),
}

impl RequestBody {
    /// Whether the body is multipart
    pub fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }

    /// Read file contents and produce the body handed to the transport.
    ///
    /// Every file source is read exactly once; the reads run concurrently.
    /// URL sources are fetched under `timeouts`.
    pub async fn into_transport_body(
        self,
        transport: &dyn HttpTransport,
        timeouts: Timeouts,
    ) -> BotResult<TransportBody> {
        let parts = match self {
            Self::Form(fields) => return Ok(TransportBody::Form(fields)),
            Self::Multipart(parts) => parts,
        };

        let mut multipart = MultipartRequest::new();
        let mut pending = Vec::new();
        for part in parts {
            match part {
                MultipartPart::Text { name, value } => multipart = multipart.field(name, value),
                MultipartPart::File { name, file } => pending.push(file.into_upload(name, transport, timeouts)),
            }
        }

        multipart.files = try_join_all(pending).await?;
        Ok(TransportBody::Multipart(multipart))
    }
}

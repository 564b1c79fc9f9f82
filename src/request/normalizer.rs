//! Parameter normalization.

use super::multipart::encode_parts;
use super::RequestBody;
use crate::types::{MediaSlot, ParamValue, Params};
use tracing::warn;

/// Normalize call parameters into a request body.
///
/// Non-upload calls produce URL-encoded fields: markup values are rendered
/// through their string form, nested values are JSON encoded, and nulls are
/// dropped. Upload calls produce multipart parts without validating any
/// particular upload field.
pub fn normalize(params: Params, is_file_upload: bool) -> RequestBody {
    if is_file_upload {
        return RequestBody::Multipart(encode_parts(params));
    }

    let fields = params
        .into_iter()
        .filter_map(|(name, value)| {
            if leaves_unsent_file(&value) {
                warn!(field = %name, "File content in a form body is not sent; only its attach reference is");
            }
            value.to_field_string().map(|text| (name, text))
        })
        .collect();

    RequestBody::Form(fields)
}

/// Whether the form rendering of `value` refers to file content that a form
/// body cannot carry
fn leaves_unsent_file(value: &ParamValue) -> bool {
    match value {
        ParamValue::File(file) => file.form_value().is_none(),
        nested => embeds_upload(nested),
    }
}

/// Whether a JSON rendering of `value` contains an attach reference
fn embeds_upload(value: &ParamValue) -> bool {
    match value {
        ParamValue::File(file) => file.is_upload(),
        ParamValue::Media(media) => {
            matches!(media.media(), MediaSlot::File(file) if file.is_upload())
        }
        ParamValue::List(items) => items.iter().any(embeds_upload),
        _ => false,
    }
}

//! Multipart body construction for uploads.
//!
//! Uploads are validated first by [`validate_upload`], which takes the
//! parameters and classifies every value under the upload field once.
//! [`UploadPlan::build`] then emits text parts followed by file parts from
//! the same parameters.
//!
//! Every `attach://<name>` string written into a JSON part has exactly one
//! file part called `<name>` in the same list.

use super::MultipartPart;
use crate::errors::RequestError;
use crate::types::{
    is_file_id, InputFile, MediaSlot, OneOrMany, ParamValue, Params, MEDIA_KEY,
};
use serde_json::Value;
use std::collections::HashSet;

/// Field holding a media group
pub const MEDIA_GROUP_FIELD: &str = "media";

/// Classification of one value found under the upload field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEntity {
    /// A file reference whose bytes are uploaded
    FileReference,
    /// A file the platform already stores, sent as a plain field
    KnownIdentifier,
    /// Anything else
    Invalid,
}

impl FileEntity {
    /// Classify a top-level value
    pub fn of_value(value: &ParamValue) -> Self {
        match value {
            ParamValue::File(file) if file.is_upload() => Self::FileReference,
            ParamValue::File(_) => Self::KnownIdentifier,
            ParamValue::Text(text) | ParamValue::Json(Value::String(text)) => Self::of_text(text),
            _ => Self::Invalid,
        }
    }

    /// Classify a media group item by its nested `media` value
    pub fn of_media_item(item: &ParamValue) -> Self {
        match item {
            ParamValue::Media(media) => match media.media() {
                MediaSlot::File(file) if file.is_upload() => Self::FileReference,
                MediaSlot::File(_) => Self::KnownIdentifier,
                MediaSlot::Text(text) => Self::of_text(text),
            },
            ParamValue::Json(Value::Object(object)) => object
                .get(MEDIA_KEY)
                .and_then(Value::as_str)
                .map_or(Self::Invalid, Self::of_text),
            _ => Self::Invalid,
        }
    }

    fn of_text(text: &str) -> Self {
        if is_file_id(text) {
            Self::KnownIdentifier
        } else {
            Self::Invalid
        }
    }
}

/// Validated upload: the parameters plus the classification of every value
/// under the upload field, in order
#[derive(Debug, Clone, PartialEq)]
pub struct UploadPlan {
    field: String,
    entities: Vec<FileEntity>,
    params: Params,
}

impl UploadPlan {
    /// The upload field
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Classification of each value under the upload field
    pub fn entities(&self) -> &[FileEntity] {
        &self.entities
    }

    /// The validated parameters, with the upload field in list form when it
    /// held more than one value
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Number of files that will be uploaded
    pub fn upload_count(&self) -> usize {
        self.entities
            .iter()
            .filter(|entity| **entity == FileEntity::FileReference)
            .count()
    }

    /// Emit the multipart parts for the validated parameters
    pub fn build(self) -> Vec<MultipartPart> {
        let Self {
            field,
            entities,
            params,
        } = self;
        let mut parts = PartCollector::default();

        for (name, value) in params {
            if value.is_null() {
                continue;
            }

            if name == field {
                emit_upload_field(&mut parts, &name, value, &entities);
            } else {
                parts.generate(&name, value);
            }
        }

        parts.finish()
    }
}

fn emit_upload_field(
    parts: &mut PartCollector,
    name: &str,
    value: ParamValue,
    entities: &[FileEntity],
) {
    let (items, was_single) = promote(value).into_vec();

    if name == MEDIA_GROUP_FIELD {
        parts.media_descriptor(name, &items, was_single);
        for (item, entity) in items.into_iter().zip(entities) {
            if *entity == FileEntity::FileReference {
                parts.attach_embedded(item);
            }
        }
        return;
    }

    for (item, entity) in items.into_iter().zip(entities) {
        match (entity, item) {
            (FileEntity::FileReference, ParamValue::File(file)) => parts.named_file(name, file),
            (_, item) => {
                if let Some(text) = item.to_field_string() {
                    parts.text(name, text);
                }
            }
        }
    }
}

/// Validate the upload field of `params` and keep them in the returned plan.
///
/// A JSON array under the upload field is rewritten as a list so each
/// element is classified and emitted on its own. Validation is pure:
/// running it twice on equal parameters gives the same outcome and the
/// same field label.
pub fn validate_upload(mut params: Params, file_field: &str) -> Result<UploadPlan, RequestError> {
    let missing = || RequestError::MissingUploadParam {
        field: file_field.to_string(),
    };

    let value = params
        .get_mut(file_field)
        .filter(|value| !value.is_null())
        .ok_or_else(missing)?;

    if matches!(value, ParamValue::Json(Value::Array(_))) {
        let (items, _) = promote(std::mem::replace(value, ParamValue::Null)).into_vec();
        *value = ParamValue::List(items);
    }

    let items = match &*value {
        ParamValue::List(items) if items.is_empty() => return Err(missing()),
        ParamValue::List(items) => OneOrMany::Many(items.iter().collect::<Vec<_>>()),
        other => OneOrMany::One(other),
    };

    let is_media = file_field == MEDIA_GROUP_FIELD;
    let single = items.is_one();

    let entities = items
        .as_slice()
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let entity = if is_media {
                FileEntity::of_media_item(item)
            } else {
                FileEntity::of_value(item)
            };

            if entity == FileEntity::Invalid {
                Err(RequestError::InvalidInputFileEntity {
                    field: field_label(file_field, single, index),
                })
            } else {
                Ok(entity)
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(UploadPlan {
        field: file_field.to_string(),
        entities,
        params,
    })
}

/// Validate and build the multipart parts of an upload
pub fn build_multipart(params: Params, file_field: &str) -> Result<Vec<MultipartPart>, RequestError> {
    Ok(validate_upload(params, file_field)?.build())
}

/// Build multipart parts without an upload field
pub(crate) fn encode_parts(params: Params) -> Vec<MultipartPart> {
    let mut parts = PartCollector::default();
    for (name, value) in params {
        parts.generate(&name, value);
    }
    parts.finish()
}

fn field_label(field: &str, single: bool, index: usize) -> String {
    if single {
        field.to_string()
    } else {
        format!("{} #{}", field, index)
    }
}

fn promote(value: ParamValue) -> OneOrMany<ParamValue> {
    match value {
        ParamValue::List(items) => OneOrMany::Many(items),
        ParamValue::Json(Value::Array(items)) => {
            OneOrMany::Many(items.into_iter().map(ParamValue::Json).collect())
        }
        other => OneOrMany::One(other),
    }
}

/// Accumulates parts in emission order: text parts, then files referenced
/// by attach name, then files named after their field.
#[derive(Default)]
struct PartCollector {
    texts: Vec<MultipartPart>,
    attached: Vec<MultipartPart>,
    named: Vec<MultipartPart>,
    attach_names: HashSet<String>,
}

impl PartCollector {
    fn text(&mut self, name: &str, value: String) {
        self.texts.push(MultipartPart::Text {
            name: name.to_string(),
            value,
        });
    }

    fn named_file(&mut self, name: &str, file: InputFile) {
        self.named.push(MultipartPart::File {
            name: name.to_string(),
            file,
        });
    }

    fn attach(&mut self, file: InputFile) {
        if file.is_upload() && self.attach_names.insert(file.attach_name().to_string()) {
            self.attached.push(MultipartPart::File {
                name: file.attach_name().to_string(),
                file,
            });
        }
    }

    /// Attach every file a JSON rendering of `value` refers to
    fn attach_embedded(&mut self, value: ParamValue) {
        match value {
            ParamValue::File(file) => self.attach(file),
            ParamValue::Media(media) => {
                if let MediaSlot::File(file) = media.into_media() {
                    self.attach(file);
                }
            }
            ParamValue::List(items) => {
                for item in items {
                    self.attach_embedded(item);
                }
            }
            _ => {}
        }
    }

    fn media_descriptor(&mut self, name: &str, items: &[ParamValue], was_single: bool) {
        let descriptors: Vec<Value> = items.iter().map(ParamValue::to_json).collect();
        let json = match OneOrMany::from_vec(descriptors, was_single) {
            OneOrMany::One(descriptor) => descriptor,
            OneOrMany::Many(descriptors) => Value::Array(descriptors),
        };
        self.text(name, json.to_string());
    }

    fn generate(&mut self, name: &str, value: ParamValue) {
        match value {
            ParamValue::Null => {}
            value if name == MEDIA_GROUP_FIELD => {
                let (items, was_single) = promote(value).into_vec();
                self.media_descriptor(name, &items, was_single);
                for item in items {
                    self.attach_embedded(item);
                }
            }
            ParamValue::File(file) if file.is_upload() => self.named_file(name, file),
            value @ (ParamValue::List(_) | ParamValue::Media(_)) => {
                self.text(name, value.to_json().to_string());
                self.attach_embedded(value);
            }
            value => {
                if let Some(text) = value.to_field_string() {
                    self.text(name, text);
                }
            }
        }
    }

    fn finish(self) -> Vec<MultipartPart> {
        let mut parts = self.texts;
        parts.extend(self.attached);
        parts.extend(self.named);
        parts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InputMedia, ReplyMarkup, InlineKeyboardButton, ATTACH_PREFIX};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const PHOTO_ID: &str = "AgADBQADqacxG3ZBvVC1iuc3ej";

    fn attach_refs(value: &Value, out: &mut Vec<String>) {
        match value {
            Value::String(s) => {
                if let Some(name) = s.strip_prefix(ATTACH_PREFIX) {
                    out.push(name.to_string());
                }
            }
            Value::Array(items) => items.iter().for_each(|item| attach_refs(item, out)),
            Value::Object(map) => map.values().for_each(|item| attach_refs(item, out)),
            _ => {}
        }
    }

    /// Every attach reference in a JSON part names exactly one part
    fn assert_attach_consistency(parts: &[MultipartPart]) {
        let mut refs = Vec::new();
        for part in parts {
            if let Some(Ok(json)) = part.text().map(serde_json::from_str::<Value>) {
                attach_refs(&json, &mut refs);
            }
        }
        for name in refs {
            let count = parts.iter().filter(|part| part.name() == name).count();
            assert_eq!(count, 1, "attach://{} must name exactly one part", name);
        }
    }

    #[test]
    fn test_single_photo_upload() {
        let photo = InputFile::path("/tmp/a.jpg");
        let params = Params::new().with("chat_id", 1).with("photo", photo.clone());

        let parts = build_multipart(params, "photo").unwrap();

        assert_eq!(
            parts,
            vec![
                MultipartPart::Text {
                    name: "chat_id".to_string(),
                    value: "1".to_string(),
                },
                MultipartPart::File {
                    name: "photo".to_string(),
                    file: photo,
                },
            ]
        );
        assert_eq!(parts[1].file().unwrap().filename(), "a.jpg");
    }

    #[test]
    fn test_missing_upload_field() {
        let params = Params::new().with("chat_id", 1);
        assert_eq!(
            build_multipart(params, "photo"),
            Err(RequestError::MissingUploadParam {
                field: "photo".to_string()
            })
        );

        let params = Params::new().with("photo", ParamValue::Null);
        assert!(matches!(
            build_multipart(params, "photo"),
            Err(RequestError::MissingUploadParam { .. })
        ));

        let params = Params::new().with("photo", ParamValue::List(vec![]));
        assert!(matches!(
            build_multipart(params, "photo"),
            Err(RequestError::MissingUploadParam { .. })
        ));
    }

    #[test]
    fn test_invalid_entity_single() {
        let params = Params::new().with("photo", "not-a-file-and-not-an-id-object");
        assert_eq!(
            build_multipart(params, "photo"),
            Err(RequestError::InvalidInputFileEntity {
                field: "photo".to_string()
            })
        );

        let params = Params::new().with("photo", json!({"path": "/tmp/a.jpg"}));
        assert!(matches!(
            build_multipart(params, "photo"),
            Err(RequestError::InvalidInputFileEntity { field }) if field == "photo"
        ));
    }

    #[test]
    fn test_invalid_entity_in_list_has_index() {
        let params = Params::new().with(
            "document",
            ParamValue::List(vec![
                InputFile::bytes(b"a".to_vec(), "a.txt").into(),
                42.into(),
            ]),
        );

        assert_eq!(
            validate_upload(params, "document"),
            Err(RequestError::InvalidInputFileEntity {
                field: "document #1".to_string()
            })
        );
    }

    #[test]
    fn test_validation_is_repeatable() {
        let good = Params::new()
            .with("chat_id", 1)
            .with("photo", InputFile::bytes(b"a".to_vec(), "a.jpg"));
        assert_eq!(
            validate_upload(good.clone(), "photo"),
            validate_upload(good, "photo")
        );

        let bad = Params::new().with(
            "media",
            ParamValue::List(vec![InputMedia::photo(PHOTO_ID).into(), json!({"type": "photo"}).into()]),
        );
        let first = validate_upload(bad.clone(), "media");
        assert_eq!(
            first,
            Err(RequestError::InvalidInputFileEntity {
                field: "media #1".to_string()
            })
        );
        assert_eq!(first, validate_upload(bad, "media"));
    }

    #[test]
    fn test_singleton_and_list_give_same_parts() {
        let file = InputFile::bytes(b"pdf".to_vec(), "doc.pdf");

        let single = Params::new()
            .with("chat_id", 5)
            .with("document", file.clone());
        let listed = Params::new()
            .with("chat_id", 5)
            .with("document", vec![file]);

        assert_eq!(
            build_multipart(single, "document").unwrap(),
            build_multipart(listed, "document").unwrap()
        );
    }

    #[test]
    fn test_known_identifier_is_sent_as_text() {
        let params = Params::new().with("chat_id", 1).with("photo", PHOTO_ID);
        let plan = validate_upload(params, "photo").unwrap();
        assert_eq!(plan.entities(), &[FileEntity::KnownIdentifier]);
        assert_eq!(plan.upload_count(), 0);
        assert_eq!(plan.params().len(), 2);

        let parts = plan.build();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1].name(), "photo");
        assert_eq!(parts[1].text(), Some(PHOTO_ID));

        let params = Params::new().with("photo", InputFile::file_id("abc"));
        let parts = build_multipart(params, "photo").unwrap();
        assert_eq!(parts[0].text(), Some("abc"));
    }

    #[test]
    fn test_media_group_with_file_and_identifier() {
        let file = InputFile::path("x.jpg");
        let token = file.attach_name().to_string();
        let params = Params::new().with(
            "media",
            vec![InputMedia::photo(file.clone()), InputMedia::photo(PHOTO_ID)],
        );

        let parts = build_multipart(params, "media").unwrap();

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].name(), "media");
        let json: Value = serde_json::from_str(parts[0].text().unwrap()).unwrap();
        assert_eq!(
            json,
            json!([
                {"type": "photo", "media": format!("attach://{}", token)},
                {"type": "photo", "media": PHOTO_ID}
            ])
        );
        assert_eq!(
            parts[1],
            MultipartPart::File {
                name: token,
                file,
            }
        );
        assert_attach_consistency(&parts);
    }

    #[test]
    fn test_media_group_json_items_pass_through() {
        let params = Params::new().with(
            "media",
            vec![
                ParamValue::from(json!({"type": "video", "media": PHOTO_ID, "caption": "c"})),
                InputMedia::document(InputFile::bytes(b"d".to_vec(), "d.txt"))
                    .caption("doc")
                    .into(),
            ],
        );

        let parts = build_multipart(params, "media").unwrap();
        let json: Value = serde_json::from_str(parts[0].text().unwrap()).unwrap();

        assert_eq!(json[0], json!({"type": "video", "media": PHOTO_ID, "caption": "c"}));
        assert_eq!(json[1]["caption"], json!("doc"));
        assert_eq!(json[1]["type"], json!("document"));
        assert_attach_consistency(&parts);
    }

    #[test]
    fn test_json_array_media_group_is_a_list() {
        const OTHER_ID: &str = "AgADBQADqacxG3ZBvVC1iuc3ek";
        let media = json!([
            {"type": "photo", "media": PHOTO_ID},
            {"type": "photo", "media": OTHER_ID, "caption": "second"}
        ]);
        let params = Params::new().with("chat_id", 1).with("media", media.clone());

        let plan = validate_upload(params, "media").unwrap();
        assert_eq!(
            plan.entities(),
            &[FileEntity::KnownIdentifier, FileEntity::KnownIdentifier]
        );
        assert!(matches!(plan.params().get("media"), Some(ParamValue::List(items)) if items.len() == 2));

        let parts = plan.build();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1].name(), "media");
        let json: Value = serde_json::from_str(parts[1].text().unwrap()).unwrap();
        assert_eq!(json, media);
    }

    #[test]
    fn test_json_array_reports_bad_element_index() {
        let params = Params::new().with(
            "media",
            json!([{"type": "photo", "media": PHOTO_ID}, {"type": "photo"}]),
        );
        assert_eq!(
            build_multipart(params, "media"),
            Err(RequestError::InvalidInputFileEntity {
                field: "media #1".to_string()
            })
        );

        let params = Params::new().with("media", json!([]));
        assert!(matches!(
            build_multipart(params, "media"),
            Err(RequestError::MissingUploadParam { .. })
        ));
    }

    #[test]
    fn test_json_array_of_ids_under_file_field() {
        let params = Params::new().with("document", json!([PHOTO_ID]));
        let parts = build_multipart(params, "document").unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].text(), Some(PHOTO_ID));
    }

    #[test]
    fn test_single_media_item_stays_an_object() {
        let params = Params::new().with(
            "media",
            InputMedia::photo(InputFile::bytes(b"x".to_vec(), "x.jpg")),
        );
        let parts = build_multipart(params, "media").unwrap();
        let json: Value = serde_json::from_str(parts[0].text().unwrap()).unwrap();
        assert!(json.is_object());

        let params = Params::new().with(
            "media",
            vec![
                InputMedia::photo(InputFile::bytes(b"x".to_vec(), "x.jpg")),
                InputMedia::photo(InputFile::bytes(b"y".to_vec(), "y.jpg")),
            ],
        );
        let parts = build_multipart(params, "media").unwrap();
        let json: Value = serde_json::from_str(parts[0].text().unwrap()).unwrap();
        assert_eq!(json.as_array().map(Vec::len), Some(2));
        assert_eq!(parts.len(), 3);
        assert_attach_consistency(&parts);
    }

    #[test]
    fn test_shared_file_is_attached_once() {
        let file = InputFile::bytes(b"x".to_vec(), "x.jpg");
        let params = Params::new().with(
            "media",
            vec![InputMedia::photo(file.clone()), InputMedia::photo(file)],
        );

        let parts = build_multipart(params, "media").unwrap();
        assert_eq!(parts.len(), 2);
        assert_attach_consistency(&parts);
    }

    #[test]
    fn test_text_parts_precede_file_parts() {
        let markup = ReplyMarkup::inline(vec![vec![InlineKeyboardButton::callback("a", "b")]]);
        let params = Params::new()
            .with("photo", InputFile::bytes(b"p".to_vec(), "p.jpg"))
            .with("chat_id", 1)
            .with("thumbnail", InputFile::bytes(b"t".to_vec(), "t.jpg"))
            .with("caption", "hello")
            .with("reply_markup", markup.clone())
            .with("disable_notification", ParamValue::Null);

        let parts = build_multipart(params, "photo").unwrap();
        let names: Vec<_> = parts.iter().map(MultipartPart::name).collect();

        assert_eq!(names, vec!["chat_id", "caption", "reply_markup", "photo", "thumbnail"]);
        assert_eq!(parts[2].text(), Some(markup.to_string().as_str()));
    }

    #[test]
    fn test_files_inside_lists_are_attached() {
        let file = InputFile::bytes(b"s".to_vec(), "s.webp");
        let params = Params::new()
            .with("user_id", 1)
            .with("stickers", vec![ParamValue::from(file.clone())]);

        let parts = encode_parts(params);
        assert_eq!(parts[1].text(), Some(format!(r#"["{}"]"#, file.attach_string()).as_str()));
        assert_eq!(parts[2].name(), file.attach_name());
        assert_attach_consistency(&parts);
    }
}

pub type PictureId = i64;

/// Caller-defined picture fields, everything except `id`.
pub type PictureFields = serde_json::Map<String, serde_json::Value>;

/// Body of a picture creation request.
///
/// The `id` is optional; when left out the server assigns one.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct PicturePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PictureId>,
    #[serde(flatten)]
    pub fields: PictureFields,
}

impl PicturePayload {
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.fields.is_empty()
    }
}

use serde::{Deserialize, Serialize};

pub use picture_store_api_structs::{PictureFields, PictureId, PicturePayload};

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Picture {
    pub id: PictureId,
    #[serde(flatten)]
    pub fields: PictureFields,
}

impl Picture {
    pub fn from_payload(id: PictureId, payload: PicturePayload) -> Self {
        Picture {
            id,
            fields: payload.fields,
        }
    }

    /// Overwrites or adds every given field, never touching `id`.
    pub fn merge(&mut self, fields: PictureFields) {
        for (key, value) in fields {
            if key != "id" {
                self.fields.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> PictureFields {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn serializes_flat() {
        let picture = Picture {
            id: 2,
            fields: fields(json!({"title": "b"})),
        };
        assert_eq!(serde_json::to_value(&picture).unwrap(), json!({"id": 2, "title": "b"}));
    }

    #[test]
    fn requires_integer_id() {
        assert!(serde_json::from_value::<Picture>(json!({"title": "a"})).is_err());
        assert!(serde_json::from_value::<Picture>(json!({"id": "1"})).is_err());
    }

    #[test]
    fn merge_keeps_id_and_untouched_fields() {
        let mut picture = Picture {
            id: 5,
            fields: fields(json!({"color": "blue", "title": "sunset"})),
        };
        picture.merge(fields(json!({"id": 999, "color": "red"})));

        assert_eq!(picture.id, 5);
        assert_eq!(
            serde_json::to_value(&picture).unwrap(),
            json!({"id": 5, "color": "red", "title": "sunset"})
        );
    }

    #[test]
    fn merge_adds_new_fields() {
        let mut picture = Picture {
            id: 1,
            ..Default::default()
        };
        picture.merge(fields(json!({"nested": {"a": [1, 2]}})));
        assert_eq!(picture.fields.get("nested"), Some(&json!({"a": [1, 2]})));
    }
}

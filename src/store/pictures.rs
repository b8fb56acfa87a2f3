use crate::models::pictures::{Picture, PictureFields, PictureId, PicturePayload};

use super::{PictureStore, StoreError};

pub trait PictureProvider {
    fn count_pictures(&self) -> Result<usize, StoreError>;

    /// All pictures in insertion order, or `None` for an unset store.
    fn list_pictures(&self) -> Option<&[Picture]>;

    fn get_picture_by_id(&self, picture_id: PictureId) -> Result<&Picture, StoreError>;

    fn insert_picture(&mut self, payload: PicturePayload) -> Result<&Picture, StoreError>;

    fn update_picture(
        &mut self,
        picture_id: PictureId,
        fields: PictureFields,
    ) -> Result<&Picture, StoreError>;

    fn delete_picture(&mut self, picture_id: PictureId) -> Result<(), StoreError>;
}

impl PictureProvider for PictureStore {
    fn count_pictures(&self) -> Result<usize, StoreError> {
        Ok(self.pictures()?.len())
    }

    fn list_pictures(&self) -> Option<&[Picture]> {
        self.pictures.as_deref()
    }

    fn get_picture_by_id(&self, picture_id: PictureId) -> Result<&Picture, StoreError> {
        self.pictures()?
            .iter()
            .find(|p| p.id == picture_id)
            .ok_or(StoreError::NotFound(picture_id))
    }

    fn insert_picture(&mut self, payload: PicturePayload) -> Result<&Picture, StoreError> {
        let pictures = self.pictures_mut()?;

        let id = match payload.id {
            Some(id) if pictures.iter().any(|p| p.id == id) => {
                return Err(StoreError::Conflict(id));
            },
            Some(id) => id,
            // Only monotonic against the current maximum, so a deleted id can come back.
            None => pictures
                .iter()
                .map(|p| p.id)
                .max()
                .unwrap_or(0)
                .checked_add(1)
                .ok_or(StoreError::IdSpaceExhausted)?,
        };

        pictures.push(Picture::from_payload(id, payload));
        tracing::debug!(picture_id = id, "Inserted picture");

        Ok(&pictures[pictures.len() - 1])
    }

    fn update_picture(
        &mut self,
        picture_id: PictureId,
        fields: PictureFields,
    ) -> Result<&Picture, StoreError> {
        let picture = self
            .pictures_mut()?
            .iter_mut()
            .find(|p| p.id == picture_id)
            .ok_or(StoreError::NotFound(picture_id))?;

        picture.merge(fields);

        Ok(&*picture)
    }

    fn delete_picture(&mut self, picture_id: PictureId) -> Result<(), StoreError> {
        let pictures = self.pictures_mut()?;
        let idx = pictures
            .iter()
            .position(|p| p.id == picture_id)
            .ok_or(StoreError::NotFound(picture_id))?;

        pictures.remove(idx);
        tracing::debug!(picture_id, "Deleted picture");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn store(data: serde_json::Value) -> PictureStore {
        PictureStore::from_slice(data.to_string().as_bytes()).unwrap()
    }

    fn payload(data: serde_json::Value) -> PicturePayload {
        serde_json::from_value(data).unwrap()
    }

    fn fields(data: serde_json::Value) -> PictureFields {
        serde_json::from_value(data).unwrap()
    }

    fn ids(store: &PictureStore) -> Vec<PictureId> {
        store.list_pictures().unwrap().iter().map(|p| p.id).collect()
    }

    #[test]
    fn assigns_next_id_after_maximum() {
        let mut store = store(json!([{"id": 1}, {"id": 3}]));
        let created = store.insert_picture(payload(json!({"title": "c"}))).unwrap();
        assert_eq!(created.id, 4);
        assert_eq!(ids(&store), vec![1, 3, 4]);
    }

    #[test]
    fn first_assigned_id_is_one() {
        let mut store = store(json!([]));
        let created = store.insert_picture(payload(json!({"title": "a"}))).unwrap();
        assert_eq!(serde_json::to_value(created).unwrap(), json!({"id": 1, "title": "a"}));
    }

    #[test]
    fn explicit_id_is_kept() {
        let mut store = store(json!([{"id": 10}]));
        let created = store.insert_picture(payload(json!({"id": 2}))).unwrap();
        assert_eq!(created.id, 2);
        assert_eq!(ids(&store), vec![10, 2]);
    }

    #[test]
    fn conflicting_id_leaves_store_untouched() {
        let mut store = store(json!([{"id": 1, "title": "a"}]));
        let err = store
            .insert_picture(payload(json!({"id": 1, "title": "b"})))
            .unwrap_err();

        assert_eq!(err, StoreError::Conflict(1));
        assert_eq!(store.count_pictures(), Ok(1));
        assert_eq!(
            store.get_picture_by_id(1).unwrap().fields.get("title"),
            Some(&json!("a"))
        );
    }

    #[test]
    fn deleted_maximum_id_is_reused() {
        let mut store = store(json!([{"id": 1}, {"id": 2}]));
        store.delete_picture(2).unwrap();
        let created = store.insert_picture(PicturePayload::default()).unwrap();
        assert_eq!(created.id, 2);
    }

    #[test]
    fn id_space_exhaustion() {
        let mut store = store(json!([{ "id": i64::MAX }]));
        assert_eq!(
            store.insert_picture(PicturePayload::default()).unwrap_err(),
            StoreError::IdSpaceExhausted
        );
        assert_eq!(store.count_pictures(), Ok(1));
    }

    #[test]
    fn update_merges_fields() {
        let mut store = store(json!([{"id": 5, "color": "blue", "title": "sunset"}]));
        let updated = store
            .update_picture(5, fields(json!({"id": 999, "color": "red"})))
            .unwrap();

        assert_eq!(
            serde_json::to_value(updated).unwrap(),
            json!({"id": 5, "color": "red", "title": "sunset"})
        );
        assert_eq!(store.get_picture_by_id(999), Err(StoreError::NotFound(999)));
    }

    #[test]
    fn update_missing_picture() {
        let mut store = store(json!([{"id": 1}]));
        assert_eq!(
            store.update_picture(2, fields(json!({"a": 1}))).unwrap_err(),
            StoreError::NotFound(2)
        );
    }

    #[test]
    fn delete_preserves_order() {
        let mut store = store(json!([{"id": 1}, {"id": 2}, {"id": 3}]));
        store.delete_picture(2).unwrap();
        assert_eq!(ids(&store), vec![1, 3]);
        assert_eq!(store.delete_picture(2), Err(StoreError::NotFound(2)));
        assert_eq!(ids(&store), vec![1, 3]);
    }

    #[test]
    fn unset_store() {
        let mut store = PictureStore::unset();
        assert!(store.list_pictures().is_none());
        assert_eq!(store.count_pictures(), Err(StoreError::Unavailable));
        assert_eq!(store.get_picture_by_id(1), Err(StoreError::Unavailable));
        assert_eq!(
            store.insert_picture(PicturePayload::default()).unwrap_err(),
            StoreError::Unavailable
        );
        assert_eq!(store.delete_picture(1), Err(StoreError::Unavailable));
    }
}

use std::path::Path;
use std::sync::Arc;

use async_std::sync::Mutex;
use thiserror::Error;

use crate::models::pictures::{Picture, PictureId};

pub mod pictures;

pub type SharedStore = Arc<Mutex<PictureStore>>;

#[derive(Error, Debug, PartialEq)]
pub enum StoreError {
    #[error("picture with id {0} not found")]
    NotFound(PictureId),
    #[error("picture with id {0} already present")]
    Conflict(PictureId),
    #[error("picture store is not initialized")]
    Unavailable,
    #[error("no picture id left to assign")]
    IdSpaceExhausted,
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("couldn't read picture data")]
    Io(#[from] std::io::Error),
    #[error("picture data is not a valid JSON array of pictures")]
    Json(#[from] serde_json::Error),
    #[error("picture id {0} appears more than once")]
    DuplicateId(PictureId),
}

/// In-memory, ordered picture collection.
///
/// `pictures` is `None` when the data source held a JSON `null`.
#[derive(Debug)]
pub struct PictureStore {
    pictures: Option<Vec<Picture>>,
}

impl PictureStore {
    pub fn new(pictures: Vec<Picture>) -> Result<Self, LoadError> {
        for (idx, picture) in pictures.iter().enumerate() {
            if pictures[..idx].iter().any(|p| p.id == picture.id) {
                return Err(LoadError::DuplicateId(picture.id));
            }
        }

        Ok(PictureStore {
            pictures: Some(pictures),
        })
    }

    pub fn unset() -> Self {
        PictureStore { pictures: None }
    }

    pub fn from_slice(data: &[u8]) -> Result<Self, LoadError> {
        let pictures: Option<Vec<Picture>> = serde_json::from_slice(data)?;
        match pictures {
            Some(pictures) => Self::new(pictures),
            None => Ok(Self::unset()),
        }
    }

    pub fn is_set(&self) -> bool {
        self.pictures.is_some()
    }

    pub fn shared(self) -> SharedStore {
        Arc::new(Mutex::new(self))
    }

    fn pictures(&self) -> Result<&Vec<Picture>, StoreError> {
        self.pictures.as_ref().ok_or(StoreError::Unavailable)
    }

    fn pictures_mut(&mut self) -> Result<&mut Vec<Picture>, StoreError> {
        self.pictures.as_mut().ok_or(StoreError::Unavailable)
    }
}

pub async fn load(path: &Path) -> Result<PictureStore, LoadError> {
    let data = async_std::fs::read(path).await?;
    let store = PictureStore::from_slice(&data)?;

    match &store.pictures {
        Some(pictures) => tracing::info!(
            path = %path.display(),
            count = pictures.len(),
            "Loaded pictures"
        ),
        None => tracing::warn!(path = %path.display(), "Picture data is null, store left unset"),
    }

    Ok(store)
}

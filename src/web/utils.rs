use serde::de::DeserializeOwned;
use tide::http::StatusCode;
use tide::{Request, Response};

use crate::models::pictures::PictureId;
use crate::store::StoreError;

/// Reads the request body as a non-empty JSON object and deserializes it.
///
/// Returns `None` when the body is missing, not JSON, an empty object, or
/// doesn't fit `T`.
pub async fn read_json_body<T: DeserializeOwned>(
    req: &mut Request<crate::State>,
) -> tide::Result<Option<T>> {
    let body = req.body_bytes().await?;

    match serde_json::from_slice(&body) {
        Ok(serde_json::Value::Object(map)) if !map.is_empty() => {
            Ok(serde_json::from_value(serde_json::Value::Object(map)).ok())
        },
        _ => Ok(None),
    }
}

pub fn picture_id_param(req: &Request<crate::State>) -> Option<PictureId> {
    req.param("picture_id").ok()?.parse().ok()
}

pub fn bad_request() -> Response {
    Response::builder(StatusCode::BadRequest)
        .body(tide::convert::json!({
            "message": "Request body must be JSON",
        }))
        .build()
}

pub fn internal_server_error() -> Response {
    Response::builder(StatusCode::InternalServerError)
        .body(tide::convert::json!({
            "message": "Internal server error",
        }))
        .build()
}

pub fn store_error_response(err: StoreError) -> Response {
    match err {
        StoreError::NotFound(_) => Response::builder(StatusCode::NotFound).build(),
        StoreError::Conflict(picture_id) => Response::builder(StatusCode::Found)
            .body(tide::convert::json!({
                "Message": format!("picture with id {} already present", picture_id),
            }))
            .build(),
        StoreError::Unavailable | StoreError::IdSpaceExhausted => {
            tide::log::error!("Picture store operation failed: {}", err);
            internal_server_error()
        },
    }
}

macro_rules! require_json_body {
    ($request:ident) => {
        match crate::web::utils::read_json_body(&mut $request).await? {
            Some(payload) => payload,
            None => return Ok(crate::web::utils::bad_request()),
        }
    };
}

macro_rules! require_picture_id {
    ($request:ident) => {
        match crate::web::utils::picture_id_param(&$request) {
            Some(picture_id) => picture_id,
            None => return Ok(tide::Response::builder(tide::http::StatusCode::NotFound).build()),
        }
    };
}

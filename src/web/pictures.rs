use tide::http::{headers, StatusCode};
use tide::{Body, Request, Response};

use crate::models::pictures::{PictureFields, PicturePayload};
use crate::store::pictures::PictureProvider;
use crate::web::utils::store_error_response;

pub(super) fn mount(mut route: tide::Route<crate::State>) {
    route.get(list_pictures).post(create_picture);

    route
        .at("/:picture_id")
        .get(get_picture)
        .put(update_picture)
        .delete(delete_picture);
}

async fn list_pictures(req: Request<crate::State>) -> tide::Result<Response> {
    let store = req.state().pictures.lock().await;

    let res = Response::builder(StatusCode::Ok)
        .body(Body::from_json(&store.list_pictures())?)
        .build();
    Ok(res)
}

async fn get_picture(req: Request<crate::State>) -> tide::Result<Response> {
    let picture_id = require_picture_id!(req);
    let store = req.state().pictures.lock().await;

    let res = match store.get_picture_by_id(picture_id) {
        Ok(picture) => Response::builder(StatusCode::Ok)
            .body(Body::from_json(picture)?)
            .build(),
        Err(err) => store_error_response(err),
    };
    Ok(res)
}

async fn create_picture(mut req: Request<crate::State>) -> tide::Result<Response> {
    let payload: PicturePayload = require_json_body!(req);
    tide::log::debug!("Received picture payload: {:#?}", payload);

    let mut store = req.state().pictures.lock().await;

    let res = match store.insert_picture(payload) {
        Ok(picture) => Response::builder(StatusCode::Created)
            .body(Body::from_json(picture)?)
            .header(headers::LOCATION, format!("/picture/{}", picture.id))
            .build(),
        Err(err) => {
            tide::log::info!("Rejected picture: {}", err);
            store_error_response(err)
        },
    };
    Ok(res)
}

async fn update_picture(mut req: Request<crate::State>) -> tide::Result<Response> {
    let picture_id = require_picture_id!(req);
    let fields: PictureFields = require_json_body!(req);
    tide::log::debug!("Received payload: {:#?}", fields);

    let mut store = req.state().pictures.lock().await;

    let res = match store.update_picture(picture_id, fields) {
        Ok(picture) => Response::builder(StatusCode::Ok)
            .body(Body::from_json(picture)?)
            .build(),
        Err(err) => store_error_response(err),
    };
    Ok(res)
}

async fn delete_picture(req: Request<crate::State>) -> tide::Result<Response> {
    let picture_id = require_picture_id!(req);
    let mut store = req.state().pictures.lock().await;

    let res = match store.delete_picture(picture_id) {
        Ok(()) => Response::builder(StatusCode::NoContent).build(),
        Err(err) => store_error_response(err),
    };
    Ok(res)
}

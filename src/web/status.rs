use tide::http::StatusCode;
use tide::{Request, Response};

use crate::store::pictures::PictureProvider;
use crate::web::utils::store_error_response;

pub(super) fn mount(app: &mut tide::Server<crate::State>) {
    app.at("/health").get(health);
    app.at("/count").get(count);
}

async fn health(_req: Request<crate::State>) -> tide::Result<Response> {
    Ok(Response::builder(StatusCode::Ok)
        .body(tide::convert::json!({
            "status": "OK",
        }))
        .build())
}

async fn count(req: Request<crate::State>) -> tide::Result<Response> {
    let store = req.state().pictures.lock().await;

    let res = match store.count_pictures() {
        Ok(length) => Response::builder(StatusCode::Ok)
            .body(tide::convert::json!({
                "length": length,
            }))
            .build(),
        Err(err) => store_error_response(err),
    };
    Ok(res)
}

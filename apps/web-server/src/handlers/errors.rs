//! Fallback handlers: 404 for unmatched paths, 500 for unhandled faults.

use actix_web::{
    HttpRequest, HttpResponse,
    dev::ServiceResponse,
    http::header::{self, HeaderValue},
    middleware::ErrorHandlerResponse,
};

use crate::pages;

/// Any path no route claims.
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(pages::not_found(req.path()))
}

/// ErrorHandlers hook: dress any 500 in the generic error page.
pub fn render_500<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let (req, res) = res.into_parts();
    let mut res = res.set_body(pages::server_error());
    res.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    let res = ServiceResponse::new(req, res)
        .map_into_boxed_body()
        .map_into_right_body();
    Ok(ErrorHandlerResponse::Response(res))
}

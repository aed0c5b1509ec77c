//! HTTP handlers and route configuration.

mod errors;
mod feed;
mod posts;
mod profile;

#[cfg(test)]
mod tests;

pub use errors::render_500;

use actix_web::{HttpResponse, http::header, web};
use serde::Deserialize;

use gazette_core::domain::PostDetail;
use gazette_core::pagination::Window;
use gazette_shared::dto::{GroupRef, PageMeta, PostView};

/// Configure all application routes.
///
/// `/new/` is registered ahead of the `/{username}/` family so the literal
/// segment wins the match.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(feed::index))
        .route("/group/{slug}/", web::get().to(feed::group_posts))
        .service(
            web::resource("/new/")
                .route(web::get().to(posts::new_post))
                .route(web::post().to(posts::create_post)),
        )
        .route("/{username}/", web::get().to(profile::profile))
        .route("/{username}/{post_id}/", web::get().to(posts::post_detail))
        .service(
            web::resource("/{username}/{post_id}/edit/")
                .route(web::get().to(posts::edit_post))
                .route(web::post().to(posts::update_post)),
        )
        .default_service(web::route().to(errors::not_found));
}

/// Query string shared by every listing page.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

pub(crate) fn html(markup: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(markup)
}

/// Redirect-after-POST.
pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.to_string()))
        .finish()
}

pub(crate) fn page_meta(window: &Window, total_items: u64) -> PageMeta {
    PageMeta {
        number: window.number,
        total_pages: window.total_pages,
        total_items,
        has_previous: window.number > 1,
        has_next: window.number < window.total_pages,
    }
}

pub(crate) fn post_view(detail: &PostDetail) -> PostView {
    PostView {
        id: detail.post.id.to_string(),
        author: detail.author.username.clone(),
        text: detail.post.text.clone(),
        pub_date: detail.post.pub_date.format("%Y-%m-%d %H:%M").to_string(),
        group: detail.group.as_ref().map(|g| GroupRef {
            title: g.title.clone(),
            slug: g.slug.clone(),
        }),
    }
}

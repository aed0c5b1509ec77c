//! Author profile pages.

use actix_web::{HttpRequest, HttpResponse, web};

use gazette_core::pagination;
use gazette_shared::dto::AuthorView;

use crate::middleware::error::{AppError, AppResult};
use crate::pages;
use crate::state::AppState;

use super::{PageQuery, html, page_meta, post_view};

/// GET /{username}/
pub async fn profile(
    req: HttpRequest,
    state: web::Data<AppState>,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let author = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound(req.path().to_string()))?;

    let total = state.posts.count_by_author(author.id).await?;
    let window = pagination::window(query.page.as_deref(), total);
    let posts = state
        .posts
        .by_author(author.id, window.offset, window.limit)
        .await?;

    let views: Vec<_> = posts.iter().map(post_view).collect();
    let view = AuthorView {
        username: author.username,
        post_count: total,
    };
    Ok(html(pages::profile(
        &view,
        &page_meta(&window, total),
        &views,
    )))
}

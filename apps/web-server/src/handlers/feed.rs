//! The home feed and per-group feeds.

use actix_web::{HttpRequest, HttpResponse, web};

use gazette_core::pagination;
use gazette_shared::dto::GroupView;

use crate::middleware::error::{AppError, AppResult};
use crate::pages;
use crate::state::AppState;

use super::{PageQuery, html, page_meta, post_view};

/// GET /
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let total = state.posts.count().await?;
    let window = pagination::window(query.page.as_deref(), total);
    let posts = state.posts.recent(window.offset, window.limit).await?;

    let views: Vec<_> = posts.iter().map(post_view).collect();
    Ok(html(pages::home(&page_meta(&window, total), &views)))
}

/// GET /group/{slug}/
pub async fn group_posts(
    req: HttpRequest,
    state: web::Data<AppState>,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let group = state
        .groups
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(req.path().to_string()))?;

    let total = state.posts.count_by_group(group.id).await?;
    let window = pagination::window(query.page.as_deref(), total);
    let posts = state
        .posts
        .by_group(group.id, window.offset, window.limit)
        .await?;

    let views: Vec<_> = posts.iter().map(post_view).collect();
    let view = GroupView {
        title: group.title,
        slug: group.slug,
        description: group.description,
    };
    Ok(html(pages::group(&view, &page_meta(&window, total), &views)))
}

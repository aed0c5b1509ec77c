//! Single post pages and the create/edit actions.

use actix_web::{HttpRequest, HttpResponse, web};
use uuid::Uuid;

use gazette_core::domain::{Post, PostDetail, User};
use gazette_core::form::{FieldErrors, GroupChoice, PostInput};
use gazette_shared::dto::{GroupRef, PostFormView};

use crate::middleware::error::{AppError, AppResult};
use crate::middleware::identity::{Identity, OptionalIdentity};
use crate::pages;
use crate::state::AppState;

use super::{html, post_view, see_other};

fn post_path(username: &str, post_id: Uuid) -> String {
    format!("/{username}/{post_id}/")
}

/// Resolve a `/{username}/{post_id}/` pair, or 404 with the attempted path.
/// An unparsable id or an author/post mismatch reads as "no such page".
async fn lookup_post(
    state: &AppState,
    username: &str,
    post_id: &str,
    path: &str,
) -> Result<(User, Post), AppError> {
    let not_found = || AppError::NotFound(path.to_string());

    let author = state
        .users
        .find_by_username(username)
        .await?
        .ok_or_else(not_found)?;
    let id = Uuid::parse_str(post_id).map_err(|_| not_found())?;
    let post = state.posts.find_by_id(id).await?.ok_or_else(not_found)?;
    if post.author_id != author.id {
        return Err(not_found());
    }

    Ok((author, post))
}

async fn group_options(state: &AppState) -> Result<Vec<GroupRef>, AppError> {
    Ok(state
        .groups
        .all()
        .await?
        .into_iter()
        .map(|g| GroupRef {
            title: g.title,
            slug: g.slug,
        })
        .collect())
}

/// Resolve the submitted group slug against the store.
async fn group_choice(state: &AppState, input: &PostInput) -> Result<GroupChoice, AppError> {
    match input.wants_group() {
        None => Ok(GroupChoice::None),
        Some(slug) => Ok(match state.groups.find_by_slug(slug).await? {
            Some(group) => GroupChoice::Found(group.id),
            None => GroupChoice::Unknown,
        }),
    }
}

/// Render the post form, echoing the given input and field errors.
async fn form_page(
    state: &AppState,
    title: &str,
    action: &str,
    input: PostInput,
    errors: &FieldErrors,
) -> Result<HttpResponse, AppError> {
    let form = PostFormView {
        text: input.text,
        group: input.group,
        text_error: errors.get("text").map(str::to_string),
        group_error: errors.get("group").map(str::to_string),
        groups: group_options(state).await?,
    };
    Ok(html(pages::post_form(title, action, &form)))
}

/// GET /new/
pub async fn new_post(state: web::Data<AppState>, _identity: Identity) -> AppResult<HttpResponse> {
    form_page(
        &state,
        "New post",
        "/new/",
        PostInput::default(),
        &FieldErrors::default(),
    )
    .await
}

/// POST /new/
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    form: web::Form<PostInput>,
) -> AppResult<HttpResponse> {
    let input = form.into_inner();
    let choice = group_choice(&state, &input).await?;

    match input.validate(choice) {
        Ok(draft) => {
            // The author is the authenticated identity, never a form field.
            let post = Post::new(identity.user_id, draft.text, draft.group_id);
            state.posts.save(post).await?;
            tracing::info!(author = %identity.username, "Post published");
            Ok(see_other("/"))
        }
        Err(errors) => form_page(&state, "New post", "/new/", input, &errors).await,
    }
}

/// GET /{username}/{post_id}/
pub async fn post_detail(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let (username, post_id) = path.into_inner();
    let (author, post) = lookup_post(&state, &username, &post_id, req.path()).await?;

    let group = match post.group_id {
        Some(id) => state.groups.find_by_id(id).await?,
        None => None,
    };
    let can_edit = identity.0.is_some_and(|i| i.user_id == post.author_id);
    let detail = PostDetail {
        post,
        author,
        group,
    };
    Ok(html(pages::post_detail(&post_view(&detail), can_edit)))
}

/// GET /{username}/{post_id}/edit/
pub async fn edit_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(String, String)>,
) -> AppResult<HttpResponse> {
    let (username, post_id) = path.into_inner();
    let (author, post) = lookup_post(&state, &username, &post_id, req.path()).await?;

    if identity.user_id != post.author_id {
        return Ok(see_other(&post_path(&author.username, post.id)));
    }

    let group = match post.group_id {
        Some(id) => state
            .groups
            .find_by_id(id)
            .await?
            .map(|g| g.slug)
            .unwrap_or_default(),
        None => String::new(),
    };
    let input = PostInput {
        text: post.text,
        group,
    };
    form_page(&state, "Edit post", req.path(), input, &FieldErrors::default()).await
}

/// POST /{username}/{post_id}/edit/
pub async fn update_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(String, String)>,
    form: web::Form<PostInput>,
) -> AppResult<HttpResponse> {
    let (username, post_id) = path.into_inner();
    let (author, mut post) = lookup_post(&state, &username, &post_id, req.path()).await?;

    // Only the author may edit; anyone else is bounced to the post page
    // with nothing saved.
    if identity.user_id != post.author_id {
        return Ok(see_other(&post_path(&author.username, post.id)));
    }

    let input = form.into_inner();
    let choice = group_choice(&state, &input).await?;

    match input.validate(choice) {
        Ok(draft) => {
            post.text = draft.text;
            post.group_id = draft.group_id;
            let saved = state.posts.save(post).await?;
            tracing::info!(author = %identity.username, post_id = %saved.id, "Post edited");
            Ok(see_other(&post_path(&author.username, saved.id)))
        }
        Err(errors) => form_page(&state, "Edit post", req.path(), input, &errors).await,
    }
}

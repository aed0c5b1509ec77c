//! Page rendering - route bodies assembled from the shared HTML builders.

use std::fmt::Write;

use gazette_shared::dto::{AuthorView, GroupView, PageMeta, PostFormView, PostView};
use gazette_shared::html::{document, escape, escape_attr, pagination_nav, paragraphs};

fn post_card(post: &PostView) -> String {
    let mut card = String::from("<article class=\"post\">\n<header>");
    let _ = write!(
        card,
        "<a href=\"/{author}/\">{author_name}</a> <time>{date}</time>",
        author = escape_attr(&post.author),
        author_name = escape(&post.author),
        date = escape(&post.pub_date),
    );
    if let Some(group) = &post.group {
        let _ = write!(
            card,
            " in <a href=\"/group/{slug}/\">{title}</a>",
            slug = escape_attr(&group.slug),
            title = escape(&group.title),
        );
    }
    card.push_str("</header>\n");
    card.push_str(&paragraphs(&post.text));
    let _ = write!(
        card,
        "\n<footer><a href=\"/{author}/{id}/\">Permalink</a></footer>\n</article>\n",
        author = escape_attr(&post.author),
        id = escape_attr(&post.id),
    );
    card
}

fn post_list(posts: &[PostView]) -> String {
    if posts.is_empty() {
        return "<p>No posts yet.</p>\n".to_string();
    }
    posts.iter().map(post_card).collect()
}

/// The home feed.
pub fn home(meta: &PageMeta, posts: &[PostView]) -> String {
    let mut body = String::from("<h1>Latest posts</h1>\n");
    body.push_str(&post_list(posts));
    body.push_str(&pagination_nav(meta, "/"));
    document("Latest posts", &body)
}

/// A group's feed.
pub fn group(group: &GroupView, meta: &PageMeta, posts: &[PostView]) -> String {
    let mut body = String::new();
    let _ = writeln!(
        body,
        "<h1>{}</h1>\n<p>{}</p>",
        escape(&group.title),
        escape(&group.description)
    );
    body.push_str(&post_list(posts));
    body.push_str(&pagination_nav(meta, &format!("/group/{}/", group.slug)));
    document(&group.title, &body)
}

/// An author's profile feed, with their total post count.
pub fn profile(author: &AuthorView, meta: &PageMeta, posts: &[PostView]) -> String {
    let mut body = String::new();
    let _ = writeln!(
        body,
        "<h1>{}</h1>\n<p>{} post{}</p>",
        escape(&author.username),
        author.post_count,
        if author.post_count == 1 { "" } else { "s" },
    );
    body.push_str(&post_list(posts));
    body.push_str(&pagination_nav(meta, &format!("/{}/", author.username)));
    document(&author.username, &body)
}

/// A single post on its own page.
pub fn post_detail(post: &PostView, can_edit: bool) -> String {
    let mut body = post_card(post);
    if can_edit {
        let _ = writeln!(
            body,
            "<p><a href=\"/{author}/{id}/edit/\">Edit</a></p>",
            author = escape_attr(&post.author),
            id = escape_attr(&post.id),
        );
    }
    let title = format!("Post by {}", post.author);
    document(&title, &body)
}

/// The create/edit form. Submitted values are echoed back and field errors
/// render next to their fields.
pub fn post_form(title: &str, action: &str, form: &PostFormView) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<h1>{}</h1>", escape(title));
    let _ = writeln!(
        body,
        "<form method=\"post\" action=\"{}\">",
        escape_attr(action)
    );

    body.push_str("<label for=\"id_text\">Text</label>\n");
    if let Some(error) = &form.text_error {
        let _ = writeln!(body, "<p class=\"error\">{}</p>", escape(error));
    }
    let _ = writeln!(
        body,
        "<textarea id=\"id_text\" name=\"text\">{}</textarea>",
        escape(&form.text),
    );

    body.push_str("<label for=\"id_group\">Group</label>\n");
    if let Some(error) = &form.group_error {
        let _ = writeln!(body, "<p class=\"error\">{}</p>", escape(error));
    }
    body.push_str("<select id=\"id_group\" name=\"group\">\n<option value=\"\">No group</option>\n");
    for option in &form.groups {
        let selected = if option.slug == form.group {
            " selected"
        } else {
            ""
        };
        let _ = writeln!(
            body,
            "<option value=\"{}\"{}>{}</option>",
            escape_attr(&option.slug),
            selected,
            escape(&option.title),
        );
    }
    body.push_str("</select>\n<button type=\"submit\">Save</button>\n</form>\n");
    document(title, &body)
}

/// 404 page, carrying the attempted path.
pub fn not_found(path: &str) -> String {
    let body = format!(
        "<h1>Page not found</h1>\n<p>No page at <code>{}</code>.</p>\n",
        escape(path),
    );
    document("Page not found", &body)
}

/// Generic 500 page.
pub fn server_error() -> String {
    document(
        "Server error",
        "<h1>Server error</h1>\n<p>Something went wrong on our side. Please try again later.</p>\n",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use gazette_shared::dto::GroupRef;

    #[test]
    fn form_echoes_values_and_marks_selection() {
        let form = PostFormView {
            text: "draft <text>".to_string(),
            group: "rust".to_string(),
            text_error: None,
            group_error: None,
            groups: vec![
                GroupRef {
                    title: "Jazz".to_string(),
                    slug: "jazz".to_string(),
                },
                GroupRef {
                    title: "Rustaceans".to_string(),
                    slug: "rust".to_string(),
                },
            ],
        };
        let page = post_form("New post", "/new/", &form);
        assert!(page.contains("draft &lt;text&gt;"));
        assert!(page.contains("<option value=\"rust\" selected>"));
        assert!(page.contains("<option value=\"jazz\">"));
    }

    #[test]
    fn field_errors_render_next_to_fields() {
        let form = PostFormView {
            text_error: Some("Enter the post text.".to_string()),
            ..Default::default()
        };
        let page = post_form("New post", "/new/", &form);
        assert!(page.contains("class=\"error\""));
        assert!(page.contains("Enter the post text."));
    }

    #[test]
    fn not_found_carries_the_path() {
        let page = not_found("/ghost/42/");
        assert!(page.contains("/ghost/42/"));
    }
}

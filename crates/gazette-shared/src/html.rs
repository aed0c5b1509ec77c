//! Hand-built HTML output.
//!
//! Gazette renders pages without a template engine: small builders assemble
//! escaped fragments into a shared document shell.

use std::fmt::Write;

use crate::dto::PageMeta;

/// Escape text content for element bodies.
pub fn escape(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

/// Escape a value for a double-quoted attribute.
pub fn escape_attr(value: &str) -> String {
    html_escape::encode_double_quoted_attribute(value).into_owned()
}

/// Render post text as paragraphs, preserving line breaks.
pub fn paragraphs(text: &str) -> String {
    let mut out = String::from("<p>");
    for (i, line) in escape(text).lines().enumerate() {
        if i > 0 {
            out.push_str("<br>");
        }
        out.push_str(line);
    }
    out.push_str("</p>");
    out
}

/// Wrap a page body in the shared document shell.
pub fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title} - Gazette</title>\n\
         </head>\n\
         <body>\n\
         <header><nav><a href=\"/\">Gazette</a> <a href=\"/new/\">New post</a></nav></header>\n\
         <main>\n{body}</main>\n\
         </body>\n\
         </html>\n",
        title = escape(title),
        body = body,
    )
}

/// Previous/next navigation for a paginated listing.
///
/// `base_path` is the listing's own path; page links append `?page=N`.
pub fn pagination_nav(meta: &PageMeta, base_path: &str) -> String {
    if meta.total_pages <= 1 {
        return String::new();
    }

    let mut nav = String::from("<nav class=\"pagination\">");
    if meta.has_previous {
        let _ = write!(
            nav,
            "<a rel=\"prev\" href=\"{}?page={}\">Previous</a> ",
            escape_attr(base_path),
            meta.number - 1
        );
    }
    let _ = write!(
        nav,
        "<span>Page {} of {}</span>",
        meta.number, meta.total_pages
    );
    if meta.has_next {
        let _ = write!(
            nav,
            " <a rel=\"next\" href=\"{}?page={}\">Next</a>",
            escape_attr(base_path),
            meta.number + 1
        );
    }
    nav.push_str("</nav>");
    nav
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(number: u64, total_pages: u64) -> PageMeta {
        PageMeta {
            number,
            total_pages,
            total_items: total_pages * 10,
            has_previous: number > 1,
            has_next: number < total_pages,
        }
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(escape("<script>"), "&lt;script&gt;");
        assert!(paragraphs("a <b> & c").contains("&lt;b&gt;"));
    }

    #[test]
    fn paragraphs_preserve_line_breaks() {
        assert_eq!(paragraphs("one\ntwo"), "<p>one<br>two</p>");
    }

    #[test]
    fn document_wraps_body_and_escapes_title() {
        let doc = document("Tom & Jerry", "<p>hi</p>");
        assert!(doc.contains("Tom &amp; Jerry - Gazette"));
        assert!(doc.contains("<p>hi</p>"));
    }

    #[test]
    fn single_page_has_no_nav() {
        assert_eq!(pagination_nav(&meta(1, 1), "/"), "");
    }

    #[test]
    fn middle_page_links_both_ways() {
        let nav = pagination_nav(&meta(2, 3), "/group/rust/");
        assert!(nav.contains("/group/rust/?page=1"));
        assert!(nav.contains("/group/rust/?page=3"));
        assert!(nav.contains("Page 2 of 3"));
    }

    #[test]
    fn edges_drop_the_missing_direction() {
        let first = pagination_nav(&meta(1, 3), "/");
        assert!(!first.contains("rel=\"prev\""));
        assert!(first.contains("rel=\"next\""));

        let last = pagination_nav(&meta(3, 3), "/");
        assert!(last.contains("rel=\"prev\""));
        assert!(!last.contains("rel=\"next\""));
    }
}

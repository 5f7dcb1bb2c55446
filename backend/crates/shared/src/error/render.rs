//! Centralized error-page renderer
//!
//! Every error page in the application (the 404 fallback, the 500 path,
//! and errors surfaced through [`AppError`](super::app_error::AppError))
//! is produced here, so status pages stay consistent and diagnostic
//! detail has exactly one gate.

use super::kind::ErrorKind;

/// Escape text for interpolation into HTML.
pub fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render an error page.
///
/// `detail` is diagnostic text (a backtrace-equivalent) and must only be
/// passed in development configuration; production callers pass `None`.
pub fn error_page(kind: ErrorKind, message: &str, detail: Option<&str>) -> String {
    let title = kind.as_str();
    let status = kind.status_code();

    let detail_block = match detail {
        Some(d) => format!("<pre class=\"detail\">{}</pre>", html_escape(d)),
        None => String::new(),
    };

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{status} {title}</title>\n</head>\n<body>\n\
         <main>\n<h1>{status} &mdash; {title}</h1>\n<p>{message}</p>\n{detail_block}\n\
         <p><a href=\"/\">Back to home</a></p>\n</main>\n</body>\n</html>\n",
        status = status,
        title = html_escape(title),
        message = html_escape(message),
        detail_block = detail_block,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape("<script>\"a\" & 'b'</script>"),
            "&lt;script&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/script&gt;"
        );
        assert_eq!(html_escape("plain"), "plain");
    }

    #[test]
    fn test_error_page_contains_status_and_message() {
        let page = error_page(ErrorKind::NotFound, "Page not found!", None);
        assert!(page.contains("404"));
        assert!(page.contains("Not Found"));
        assert!(page.contains("Page not found!"));
        assert!(!page.contains("class=\"detail\""));
    }

    #[test]
    fn test_error_page_detail_only_when_given() {
        let page = error_page(
            ErrorKind::InternalServerError,
            "Something broke",
            Some("stack: line 1"),
        );
        assert!(page.contains("class=\"detail\""));
        assert!(page.contains("stack: line 1"));
    }

    #[test]
    fn test_error_page_escapes_message() {
        let page = error_page(ErrorKind::BadRequest, "<img src=x>", None);
        assert!(!page.contains("<img"));
        assert!(page.contains("&lt;img"));
    }
}

use http::HeaderValue;
use mime_guess::mime;

const OCTET_STREAM: &str = "application/octet-stream";

/// Guess the `Content-Type` for a file extension such as `".css"`.
///
/// Textual types carry an explicit `charset=utf-8`. Returns `None` for unknown extensions.
pub fn content_type_for(extension: &str) -> Option<HeaderValue> {
    let extension = extension.strip_prefix('.').unwrap_or(extension);
    if extension.is_empty() {
        return None;
    }

    let guess = mime_guess::from_ext(extension).first()?;
    let value = if is_textual(&guess) {
        format!("{}; charset=utf-8", guess.essence_str())
    } else {
        guess.essence_str().to_owned()
    };

    HeaderValue::from_str(&value).ok()
}

/// Like [`content_type_for`] but falls back to `application/octet-stream`.
pub(crate) fn content_type_or_default(extension: &str) -> HeaderValue {
    content_type_for(extension).unwrap_or_else(|| HeaderValue::from_static(OCTET_STREAM))
}

fn is_textual(mime: &mime::Mime) -> bool {
    if mime.type_() == mime::TEXT {
        return true;
    }

    mime.type_() == mime::APPLICATION
        && matches!(mime.subtype().as_str(), "javascript" | "json" | "xml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textual_types_get_charset() {
        assert_eq!(content_type_for(".css").unwrap(), "text/css; charset=utf-8");
        assert_eq!(content_type_for(".txt").unwrap(), "text/plain; charset=utf-8");
        assert_eq!(content_type_for(".html").unwrap(), "text/html; charset=utf-8");
        assert_eq!(
            content_type_for(".json").unwrap(),
            "application/json; charset=utf-8"
        );
    }

    #[test]
    fn binary_types_have_no_charset() {
        assert_eq!(content_type_for(".jpg").unwrap(), "image/jpeg");
        assert_eq!(content_type_for(".png").unwrap(), "image/png");
    }

    #[test]
    fn dot_is_optional() {
        assert_eq!(content_type_for("css"), content_type_for(".css"));
    }

    #[test]
    fn unknown_extension() {
        assert!(content_type_for(".definitely-not-a-type").is_none());
        assert!(content_type_for(".").is_none());
        assert_eq!(
            content_type_or_default(".definitely-not-a-type"),
            "application/octet-stream"
        );
    }
}

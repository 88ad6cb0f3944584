use http::StatusCode;

/// Why a request path was turned away before touching the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// The path is not valid UTF-8 once percent-decoded.
    #[error("request path is not valid percent-encoded UTF-8")]
    InvalidEncoding,
    /// The requested file name starts with `.` and hidden files are not served.
    #[error("hidden files are not served")]
    HiddenFile,
    /// The requested file name has no extension.
    #[error("files without an extension are not served")]
    MissingExtension,
    /// A request path segment is `..` or would otherwise step out of its directory.
    #[error("request path leaves the directory it is resolved in")]
    EscapingSegment,
    /// An allow-list is configured and the extension is not on it.
    #[error("file extension is not allowed")]
    ExtensionNotAllowed,
}

impl Rejection {
    pub fn status(self) -> StatusCode {
        match self {
            Rejection::HiddenFile | Rejection::ExtensionNotAllowed => StatusCode::FORBIDDEN,
            Rejection::InvalidEncoding
            | Rejection::MissingExtension
            | Rejection::EscapingSegment => StatusCode::NOT_FOUND,
        }
    }
}

impl From<Rejection> for StatusCode {
    fn from(rejection: Rejection) -> Self {
        rejection.status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_violations_are_forbidden() {
        assert_eq!(Rejection::HiddenFile.status(), StatusCode::FORBIDDEN);
        assert_eq!(Rejection::ExtensionNotAllowed.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn everything_else_is_not_found() {
        assert_eq!(Rejection::MissingExtension.status(), StatusCode::NOT_FOUND);
        assert_eq!(Rejection::EscapingSegment.status(), StatusCode::NOT_FOUND);
        assert_eq!(StatusCode::from(Rejection::InvalidEncoding), StatusCode::NOT_FOUND);
    }
}

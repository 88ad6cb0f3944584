//! Turning a request path into the file path to serve.
//!
//! Everything here is pure string work. Whether the file exists, and whether it really
//! lives under the serve root, is decided later by [`respond`](crate::respond()).

use std::iter;
use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;

use crate::config::ServeConfig;
use crate::error::Rejection;

/// A percent-decoded request path split into directory, file name and extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
    dir: String,
    base: String,
    extension: String,
}

impl ParsedPath {
    /// Split an already decoded path.
    ///
    /// Trailing slashes are ignored. The extension starts at the last `.` of the file
    /// name, unless that `.` is its first character: `.bashrc` has no extension,
    /// `.hidden_file.txt` has `.txt`.
    pub fn parse(decoded: &str) -> Self {
        let trimmed = decoded.trim_end_matches('/');
        let (dir, base) = match trimmed.rfind('/') {
            Some(idx) => (&trimmed[..idx], &trimmed[idx + 1..]),
            None => ("", trimmed),
        };
        let extension = match base.rfind('.') {
            None | Some(0) => "",
            Some(idx) => &base[idx..],
        };

        Self {
            dir: dir.to_owned(),
            base: base.to_owned(),
            extension: extension.to_owned(),
        }
    }

    pub fn dir(&self) -> &str {
        &self.dir
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// The extension including its leading `.`, or `""`.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn is_hidden(&self) -> bool {
        self.base.starts_with('.')
    }

    /// Non-empty directory segments followed by the file name.
    fn segments(&self) -> impl Iterator<Item = &str> {
        self.dir
            .split('/')
            .filter(|segment| !segment.is_empty())
            .chain(iter::once(self.base.as_str()))
    }
}

/// A path that passed every policy check. It may not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFilePath {
    path: PathBuf,
    root: PathBuf,
    extension: String,
}

impl ResolvedFilePath {
    /// The file to read, relative to the filesystem's base.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The directory the file must stay inside: the serve path, or `.` without one.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }
}

impl AsRef<Path> for ResolvedFilePath {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

/// Map the path component of a request URL to a file path, or reject it.
///
/// Checks run in a fixed order and the first failure wins: decoding, hidden file name,
/// missing extension, `..` or rooted request segments, then the extension allow-list.
pub fn resolve(url_path: &str, config: &ServeConfig) -> Result<ResolvedFilePath, Rejection> {
    let decoded = percent_decode_str(url_path)
        .decode_utf8()
        .map_err(|_| Rejection::InvalidEncoding)?;
    let parsed = ParsedPath::parse(&decoded);

    // only the file name is checked, hidden directories are walked through
    if !config.serve_hidden_files && parsed.is_hidden() {
        return Err(Rejection::HiddenFile);
    }

    if parsed.extension().is_empty() {
        return Err(Rejection::MissingExtension);
    }

    // the configured serve path is trusted as given, only request segments are checked
    if !parsed.segments().all(stays_in_place) {
        return Err(Rejection::EscapingSegment);
    }

    let (path, root) = match config.serve_path() {
        None => {
            let path = if decoded.starts_with('/') {
                format!(".{decoded}")
            } else {
                format!("./{decoded}")
            };
            (path, ".".to_owned())
        }
        Some(serve_path) => join_under_serve_path(serve_path, &parsed),
    };

    if !config.extension_allowed(parsed.extension()) {
        return Err(Rejection::ExtensionNotAllowed);
    }

    Ok(ResolvedFilePath {
        path: PathBuf::from(path),
        root: PathBuf::from(root),
        extension: parsed.extension,
    })
}

/// Returns the joined file path and the serve root, both prefixed with `./`.
fn join_under_serve_path(serve_path: &str, parsed: &ParsedPath) -> (String, String) {
    let mut serve_segments: Vec<&str> = serve_path.split('/').collect();
    if matches!(serve_segments.first(), Some(&"." | &"")) {
        serve_segments.remove(0);
    }

    let mut request_segments = parsed.segments().peekable();
    // a single exact match between the serve path's last segment and the request's
    // first one, never a longer prefix
    if serve_segments.last().is_some() && serve_segments.last() == request_segments.peek() {
        request_segments.next();
    }

    let root = join_segments(serve_segments.iter().copied());
    let path = join_segments(serve_segments.iter().copied().chain(request_segments));

    (format!("./{path}"), format!("./{root}"))
}

/// A request segment may only name an entry inside the directory it is resolved in.
fn stays_in_place(segment: &str) -> bool {
    // protect against segments like `c:`
    Path::new(segment)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

fn join_segments<'a>(segments: impl Iterator<Item = &'a str>) -> String {
    segments
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

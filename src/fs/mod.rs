use std::io;
use std::path::{Path, PathBuf};

use futures_util::future::BoxFuture;
use tokio::io::AsyncRead;

#[cfg(feature = "disk")]
pub mod disk;
#[cfg(feature = "include-dir")]
pub mod include_dir;

/// What [`respond`](crate::respond()) needs to know about an opened file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    pub len: u64,
    pub is_dir: bool,
}

pub trait FileExt {
    fn metadata(&self) -> BoxFuture<'_, io::Result<Metadata>>;
}

/// Storage the files are read from.
///
/// Closing a file is dropping it.
pub trait Filesystem {
    type File: AsyncRead + FileExt + Send + Unpin;

    /// Resolve `path` to its real location, following symlinks.
    ///
    /// `path` is relative to the filesystem's base and may step out of it with `..`.
    /// Paths with a root or a prefix, and paths that don't exist, fail with
    /// [`io::ErrorKind::NotFound`].
    fn canonicalize<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, io::Result<PathBuf>>;

    /// Open a path previously returned by [`Filesystem::canonicalize`].
    fn open<'a>(&'a self, real_path: &'a Path) -> BoxFuture<'a, io::Result<Self::File>>;
}

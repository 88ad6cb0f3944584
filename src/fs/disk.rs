use std::io;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use tokio::fs;
use tokio::fs::File;
use tokio::io::{AsyncRead, ReadBuf};

use crate::fs::{FileExt, Filesystem, Metadata};

#[derive(Debug)]
pub struct DiskFile(File);

impl AsyncRead for DiskFile {
    #[inline]
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().0).poll_read(cx, buf)
    }
}

impl FileExt for DiskFile {
    fn metadata(&self) -> BoxFuture<'_, io::Result<Metadata>> {
        async move {
            let raw_metadata = self.0.metadata().await?;

            Ok(Metadata {
                len: raw_metadata.len(),
                is_dir: raw_metadata.is_dir(),
            })
        }
        .boxed()
    }
}

/// Files on local disk, with request paths taken relative to `base`.
///
/// The default base is the current working directory.
#[derive(Debug, Clone)]
pub struct DiskFilesystem {
    base: PathBuf,
}

impl Default for DiskFilesystem {
    fn default() -> Self {
        Self::new(PathBuf::from("."))
    }
}

impl From<&str> for DiskFilesystem {
    fn from(value: &str) -> Self {
        Self::new(PathBuf::from(value))
    }
}

impl From<&Path> for DiskFilesystem {
    fn from(value: &Path) -> Self {
        Self::new(value.to_path_buf())
    }
}

impl From<PathBuf> for DiskFilesystem {
    fn from(value: PathBuf) -> Self {
        Self::new(value)
    }
}

impl DiskFilesystem {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    fn build_and_validate_path(&self, path: &Path) -> Option<PathBuf> {
        let mut path_to_file = self.base.clone();
        for component in path.components() {
            match component {
                Component::Normal(comp) => {
                    // protect against paths like `/foo/c:/bar/baz`
                    if Path::new(&comp)
                        .components()
                        .all(|c| matches!(c, Component::Normal(_)))
                    {
                        path_to_file.push(comp)
                    } else {
                        return None;
                    }
                }
                Component::CurDir => {}
                // resolved by the canonicalization that follows
                Component::ParentDir => path_to_file.push(".."),
                Component::Prefix(_) | Component::RootDir => {
                    return None;
                }
            }
        }
        Some(path_to_file)
    }
}

impl Filesystem for DiskFilesystem {
    type File = DiskFile;

    fn canonicalize<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, io::Result<PathBuf>> {
        async move {
            let path = match self.build_and_validate_path(path) {
                None => return Err(io::Error::from(ErrorKind::NotFound)),
                Some(path) => path,
            };

            fs::canonicalize(&path).await
        }
        .boxed()
    }

    fn open<'a>(&'a self, real_path: &'a Path) -> BoxFuture<'a, io::Result<Self::File>> {
        async move {
            let file = File::open(real_path).await?;

            Ok(DiskFile(file))
        }
        .boxed()
    }
}

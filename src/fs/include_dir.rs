use std::io;
use std::io::{Error, ErrorKind};
use std::path::{Component, Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::future::{ready, BoxFuture};
use futures_util::FutureExt;
use include_dir::{Dir, File};
use tokio::io::{AsyncRead, ReadBuf};

use crate::fs::{FileExt, Filesystem, Metadata};

pub struct IncludeDirFile {
    index: usize,
    file: &'static File<'static>,
}

impl AsyncRead for IncludeDirFile {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let file = self.file;
        let data = file.contents();
        if self.index >= data.len() {
            return Poll::Ready(Ok(()));
        }

        let remaining = &data[self.index..];
        let n = remaining.len().min(buf.remaining());
        buf.put_slice(&remaining[..n]);
        self.index += n;

        Poll::Ready(Ok(()))
    }
}

impl FileExt for IncludeDirFile {
    fn metadata(&self) -> BoxFuture<'_, io::Result<Metadata>> {
        ready(Ok(Metadata {
            len: self.file.contents().len() as u64,
            is_dir: false,
        }))
        .boxed()
    }
}

/// Files embedded into the binary with [`include_dir::include_dir!`].
///
/// Request paths are taken relative to the embedded directory.
#[derive(Debug, Clone)]
pub struct IncludeDirFilesystem {
    dir: &'static Dir<'static>,
}

impl IncludeDirFilesystem {
    pub fn new(dir: &'static Dir<'static>) -> Self {
        Self { dir }
    }

    fn normalize(path: &Path) -> Option<PathBuf> {
        let mut normalized = PathBuf::new();
        for component in path.components() {
            match component {
                Component::Normal(comp) => normalized.push(comp),
                Component::CurDir => {}
                // never above the embedded root
                Component::ParentDir => {
                    if !normalized.pop() {
                        return None;
                    }
                }
                Component::Prefix(_) | Component::RootDir => {
                    return None;
                }
            }
        }
        Some(normalized)
    }
}

impl From<&'static Dir<'static>> for IncludeDirFilesystem {
    fn from(value: &'static Dir<'static>) -> Self {
        Self::new(value)
    }
}

impl Filesystem for IncludeDirFilesystem {
    type File = IncludeDirFile;

    fn canonicalize<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, io::Result<PathBuf>> {
        let result = match Self::normalize(path) {
            // the embedded root itself
            Some(path) if path.as_os_str().is_empty() => Ok(path),
            Some(path) if self.dir.get_entry(&path).is_some() => Ok(path),
            _ => Err(Error::from(ErrorKind::NotFound)),
        };

        ready(result).boxed()
    }

    fn open<'a>(&'a self, real_path: &'a Path) -> BoxFuture<'a, io::Result<Self::File>> {
        let dir = self.dir;
        ready(
            dir.get_file(real_path)
                .ok_or_else(|| Error::from(ErrorKind::NotFound))
                .map(|file| IncludeDirFile { index: 0, file }),
        )
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use include_dir::include_dir;
    use tokio::io::AsyncReadExt;

    use super::*;

    static TEST_DATA: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/test_data");

    #[tokio::test]
    async fn reads_embedded_file() {
        let fs = IncludeDirFilesystem::new(&TEST_DATA);

        let real = fs.canonicalize(Path::new("./css/test.css")).await.unwrap();
        assert_eq!(real, Path::new("css/test.css"));

        let mut file = fs.open(&real).await.unwrap();
        let meta = file.metadata().await.unwrap();
        let mut contents = Vec::new();
        file.read_to_end(&mut contents).await.unwrap();

        let expected = std::fs::read("test_data/css/test.css").unwrap();
        assert_eq!(meta.len, expected.len() as u64);
        assert_eq!(contents, expected);
    }

    #[tokio::test]
    async fn root_and_directories_canonicalize_but_do_not_open() {
        let fs = IncludeDirFilesystem::new(&TEST_DATA);

        assert_eq!(fs.canonicalize(Path::new(".")).await.unwrap(), PathBuf::new());

        let real = fs.canonicalize(Path::new("images")).await.unwrap();
        let err = fs.open(&real).await.err().unwrap();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn parent_components_inside_the_root() {
        let fs = IncludeDirFilesystem::new(&TEST_DATA);

        let real = fs.canonicalize(Path::new("./css/../hello.txt")).await.unwrap();

        assert_eq!(real, Path::new("hello.txt"));
    }

    #[tokio::test]
    async fn rejects_escaping_and_missing() {
        let fs = IncludeDirFilesystem::new(&TEST_DATA);

        for path in ["../Cargo.toml", "css/../../Cargo.toml", "/hello.txt", "nope.txt"] {
            let err = fs.canonicalize(Path::new(path)).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound, "{path}");
        }
    }
}

use std::io;
use std::io::ErrorKind;

use bytes::Bytes;
use http::{header, Response, StatusCode};
use http_body::{Body, Empty, Full};
use tokio::io::AsyncReadExt;

use crate::content_type::content_type_or_default;
use crate::fs::{FileExt, Filesystem};
use crate::resolve::ResolvedFilePath;
use crate::ResponseBody;

/// Read the resolved file and build the response for it.
///
/// Any filesystem failure, including a permission error or a real path outside the
/// serve root, becomes an empty `404 Not Found`.
pub async fn respond<FS: Filesystem>(
    filesystem: &FS,
    resolved: &ResolvedFilePath,
) -> Response<ResponseBody> {
    match read_file(filesystem, resolved).await {
        Ok(contents) => build_response(contents, resolved.extension()),

        Err(err) => {
            tracing::debug!(
                path = %resolved.path().display(),
                error = %err,
                "file could not be read"
            );

            not_found()
        }
    }
}

async fn read_file<FS: Filesystem>(
    filesystem: &FS,
    resolved: &ResolvedFilePath,
) -> io::Result<Bytes> {
    let real_root = filesystem.canonicalize(resolved.root()).await?;
    let real_path = filesystem.canonicalize(resolved.path()).await?;
    if !real_path.starts_with(&real_root) {
        return Err(io::Error::new(
            ErrorKind::PermissionDenied,
            "file is outside the serve root",
        ));
    }

    let mut file = filesystem.open(&real_path).await?;
    let meta = file.metadata().await?;
    if meta.is_dir {
        return Err(io::Error::new(ErrorKind::Other, "path is a directory"));
    }

    let capacity = usize::try_from(meta.len)
        .map_err(|_| io::Error::new(ErrorKind::Other, "file too large to buffer"))?;
    let mut contents = Vec::new();
    contents
        .try_reserve_exact(capacity)
        .map_err(|_| io::Error::from(ErrorKind::OutOfMemory))?;
    (&mut file).take(meta.len).read_to_end(&mut contents).await?;

    // the file shrank between stat and read
    if contents.len() != capacity {
        return Err(io::Error::from(ErrorKind::UnexpectedEof));
    }

    Ok(Bytes::from(contents))
}

pub(crate) fn response_with_status(status: StatusCode) -> Response<ResponseBody> {
    Response::builder()
        .status(status)
        .body(empty_body())
        .unwrap()
}

pub(crate) fn not_found() -> Response<ResponseBody> {
    response_with_status(StatusCode::NOT_FOUND)
}

fn empty_body() -> ResponseBody {
    let body = Empty::new().map_err(|err| match err {}).boxed_unsync();
    ResponseBody::new(body)
}

fn body_from_bytes(bytes: Bytes) -> ResponseBody {
    let body = Full::from(bytes).map_err(|err| match err {}).boxed_unsync();
    ResponseBody::new(body)
}

fn build_response(contents: Bytes, extension: &str) -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_or_default(extension))
        .header(header::CONTENT_LENGTH, contents.len().to_string())
        .body(body_from_bytes(contents))
        .unwrap()
}

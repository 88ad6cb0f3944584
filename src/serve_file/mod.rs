use std::convert::Infallible;
use std::task::{Context, Poll};

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use http::{Request, Response};
use tower_service::Service;

use crate::config::ServeConfig;
#[cfg(feature = "disk")]
use crate::fs::disk::DiskFilesystem;
use crate::fs::Filesystem;
use crate::resolve::resolve;
use crate::respond::{respond, response_with_status};
use crate::ResponseBody;

/// Service that maps each request path to a single file on the [`Filesystem`].
///
/// Only the path of the request URI is looked at; method, headers and query are ignored.
///
/// An empty response with status `403 Forbidden` is returned if:
///
/// - The file name starts with `.` and hidden files are not served
/// - An extension allow-list is configured and doesn't contain the file's extension
///
/// An empty response with status `404 Not Found` is returned if:
///
/// - The file name has no extension
/// - The file doesn't exist, is a directory or can't be read
/// - Any segment of the request path is `..`
/// - The file's real path is outside the serve path
///
/// The serve path itself is trusted and may point outside the filesystem's base,
/// e.g. `"../site"`.
///
/// # Example
///
/// ```
/// use serve_file::{ServeConfig, ServeFile};
/// use serve_file::fs::disk::DiskFilesystem;
///
/// let service = ServeFile::new(DiskFilesystem::default()).with_config(
///     ServeConfig::new()
///         .with_serve_path("./public/")
///         .with_allowed_extensions([".html", ".css", ".js"]),
/// );
///
/// # async {
/// let addr = std::net::SocketAddr::from(([127, 0, 0, 1], 3000));
/// hyper::Server::bind(&addr)
///     .serve(tower::make::Shared::new(service))
///     .await
///     .expect("server error");
/// # };
/// ```
#[derive(Debug, Clone)]
pub struct ServeFile<FS> {
    config: ServeConfig,
    filesystem: FS,
}

impl<FS> ServeFile<FS> {
    /// Create a new [`ServeFile`] with the default [`ServeConfig`].
    pub fn new(filesystem: FS) -> Self {
        Self {
            config: ServeConfig::default(),
            filesystem,
        }
    }

    pub fn with_config(mut self, config: ServeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ServeConfig {
        &self.config
    }
}

impl<FS: Filesystem> ServeFile<FS> {
    /// Build the response for the path component of a request URI.
    pub async fn serve_path(&self, url_path: &str) -> Response<ResponseBody> {
        match resolve(url_path, &self.config) {
            Ok(resolved) => respond(&self.filesystem, &resolved).await,

            Err(rejection) => {
                tracing::debug!(path = url_path, reason = %rejection, "request rejected");

                response_with_status(rejection.status())
            }
        }
    }
}

impl<ReqBody, FS> Service<Request<ReqBody>> for ServeFile<FS>
where
    FS: Filesystem + Clone + Send + Sync + 'static,
{
    type Response = Response<ResponseBody>;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    #[inline]
    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let this = self.clone();
        let path = req.uri().path().to_owned();

        async move { Ok(this.serve_path(&path).await) }.boxed()
    }
}

/// Serve the file a request points at, relative to the current working directory.
#[cfg(feature = "disk")]
pub async fn serve_file<B>(req: &Request<B>, config: &ServeConfig) -> Response<ResponseBody> {
    ServeFile::new(DiskFilesystem::default())
        .with_config(config.clone())
        .serve_path(req.uri().path())
        .await
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::StatusCode;
    use http_body::Body as HttpBody;
    use hyper::Body;
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn basic() {
        let svc = ServeFile::new(DiskFilesystem::default());

        let req = Request::builder()
            .uri("/test_data/hello.txt")
            .body(Body::empty())
            .unwrap();
        let res = svc.oneshot(req).await.unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()["content-type"], "text/plain; charset=utf-8");

        let body = body_into_text(res.into_body()).await;

        let contents = std::fs::read_to_string("./test_data/hello.txt").unwrap();
        assert_eq!(body, contents);
    }

    #[tokio::test]
    async fn method_and_query_are_ignored() {
        let svc = ServeFile::new(DiskFilesystem::default());

        let req = Request::builder()
            .method("DELETE")
            .uri("https://test.local/test_data/hello.txt?download=1")
            .body(Body::empty())
            .unwrap();
        let res = svc.oneshot(req).await.unwrap();

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn rejection_has_empty_body() {
        let svc = ServeFile::new(DiskFilesystem::default())
            .with_config(ServeConfig::new().with_allowed_extensions([".css"]));

        let req = Request::builder()
            .uri("/test_data/hello.txt")
            .body(Body::empty())
            .unwrap();
        let res = svc.oneshot(req).await.unwrap();

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert!(res.headers().is_empty());
        assert_eq!(body_into_text(res.into_body()).await, "");
    }

    #[tokio::test]
    async fn free_function() {
        let req = Request::builder()
            .uri("/css/test.css")
            .body(())
            .unwrap();

        let res = serve_file(&req, &ServeConfig::new().with_serve_path("./test_data/")).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()["content-type"], "text/css; charset=utf-8");
    }

    async fn body_into_text<B>(body: B) -> String
    where
        B: HttpBody<Data = Bytes> + Unpin,
        B::Error: std::fmt::Debug,
    {
        let bytes = hyper::body::to_bytes(body).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }
}

//! Serve a single file per HTTP request, with three independent access policies:
//! an extension allow-list, hidden-file suppression, and confinement to a serve path.
//!
//! A request path is first [resolved](resolve()) into a file path without touching
//! storage, then the file is read from a [`Filesystem`](fs::Filesystem) and
//! [returned](respond()) whole. Users can implement their own [`Filesystem`](fs::Filesystem),
//! or use [`DiskFilesystem`](fs::disk::DiskFilesystem) or
//! [`IncludeDirFilesystem`](fs::include_dir::IncludeDirFilesystem) directly.
//!
//! Responses are `200 OK` with `content-type` and `content-length`, or an empty
//! `403 Forbidden` / `404 Not Found`.
//!
//! # Example
//! ```
//! use serve_file::{ServeConfig, ServeFile};
//! use serve_file::fs::disk::DiskFilesystem;
//!
//! // This will serve `./test_data/css/test.css` for `/css/test.css`
//! let service = ServeFile::new(DiskFilesystem::default())
//!     .with_config(ServeConfig::new().with_serve_path("./test_data/"));
//!
//! # async {
//! // Run our service using `hyper`
//! let addr = std::net::SocketAddr::from(([127, 0, 0, 1], 3000));
//! hyper::Server::bind(&addr)
//!     .serve(tower::make::Shared::new(service))
//!     .await
//!     .expect("server error");
//! # };
//! ```

use std::io;

use bytes::Bytes;
use http_body::combinators::UnsyncBoxBody;

pub use config::ServeConfig;
pub use content_type::content_type_for;
pub use error::Rejection;
pub use resolve::{resolve, ParsedPath, ResolvedFilePath};
pub use respond::respond;
#[cfg(feature = "disk")]
pub use serve_file::serve_file;
pub use serve_file::ServeFile;

mod config;
mod content_type;
mod error;
pub mod fs;
mod resolve;
mod respond;
mod serve_file;

pub type ResponseBody = UnsyncBoxBody<Bytes, io::Error>;

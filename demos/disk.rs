use serve_file::fs::disk::DiskFilesystem;
use serve_file::{ServeConfig, ServeFile};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // `/css/test.css` is read from `./test_data/css/test.css`
    let service = ServeFile::new(DiskFilesystem::default()).with_config(
        ServeConfig::new()
            .with_serve_path("./test_data/")
            .with_allowed_extensions([".css", ".jpg", ".txt"]),
    );

    // Run our service using `hyper`
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], 3000));
    hyper::Server::bind(&addr)
        .serve(tower::make::Shared::new(service))
        .await
        .expect("server error");
}

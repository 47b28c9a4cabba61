pub mod catalog;
pub mod http_client;
pub mod target;

pub use catalog::RemoteCatalog;
pub use http_client::HttpClient;
pub use target::{resolve_url, Platform, DOWNLOAD_BASE};

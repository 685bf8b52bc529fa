pub mod http_client;
pub mod static_fetcher;

pub use http_client::{FetchMode, ReqwestFetcher};
pub use static_fetcher::StaticFetcher;

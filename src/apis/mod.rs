pub mod booking;
pub mod books;
pub mod httpbin;
pub mod quotes;
pub mod skyscanner;

pub use booking::BookingClient;
pub use books::BooksCrawler;
pub use httpbin::HttpbinProbe;
pub use quotes::QuotesCrawler;
pub use skyscanner::{Market, SkyscannerClient};

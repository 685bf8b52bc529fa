pub mod books;
pub mod flights;
pub mod hotels;
pub mod quotes;
pub mod selectors;

pub use books::parse_books;
pub use flights::FlightExtraction;
pub use hotels::HotelExtraction;
pub use quotes::{parse_quotes, QuotePage};
pub use selectors::{summarize_page, PageSummary};
